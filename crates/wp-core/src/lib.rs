//! wp-core: shared foundation for the wellprop converters.
//!
//! Contains:
//! - units (uom SI types, constructors, and text quantity parsing)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod quantity;
pub mod units;

pub use error::{WpError, WpResult};
pub use numeric::*;
pub use quantity::{Quantity, UnitError, parse_quantity};
pub use units::*;
