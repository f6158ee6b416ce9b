use thiserror::Error;

pub type WpResult<T> = Result<T, WpError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WpError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}
