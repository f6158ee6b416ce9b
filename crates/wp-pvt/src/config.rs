//! Conversion settings, loadable from YAML.
//!
//! ```yaml
//! mode: PH
//! label: N2_LIFT
//! tolerance: 1.0e-12
//! std_pressure: 1 atm
//! std_temperature: 288.71 K
//! ```

use crate::error::{PvtError, PvtResult};
use crate::property::AxisMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use wp_core::units::constants;
use wp_core::{Pressure, Quantity, Temperature, Tolerances, ensure_finite, parse_quantity};

/// Reference conditions written into the table header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardConditions {
    pub pressure: Pressure,
    pub temperature: Temperature,
}

impl Default for StandardConditions {
    fn default() -> Self {
        Self {
            pressure: constants::std_pressure(),
            temperature: constants::std_temperature(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionConfig {
    /// Secondary axis of the wellprop export.
    pub mode: AxisMode,
    /// Table label and output file stem; defaults to the input folder name.
    pub label: Option<String>,
    /// Coordinate steps and chain-rule divisors at or below this are singular.
    pub tolerance: f64,
    /// Standard pressure, with unit.
    pub std_pressure: String,
    /// Standard temperature, with unit.
    pub std_temperature: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            mode: AxisMode::Ph,
            label: None,
            tolerance: Tolerances::default().abs,
            std_pressure: "1 atm".to_string(),
            std_temperature: format!("{} K", constants::STD_TEMPERATURE_K),
        }
    }
}

impl ConversionConfig {
    pub fn with_mode(mode: AxisMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn from_yaml_str(text: &str) -> PvtResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> PvtResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> PvtResult<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(PvtError::Config(format!(
                "tolerance must be a finite non-negative number, got {}",
                self.tolerance
            )));
        }
        if let Some(label) = &self.label {
            validate_label(label)?;
        }
        self.standard_conditions().map(|_| ())
    }

    pub fn standard_conditions(&self) -> PvtResult<StandardConditions> {
        let p = ensure_finite(
            parse_quantity(&self.std_pressure, Quantity::Pressure)?,
            "standard pressure",
        )?;
        let t = ensure_finite(
            parse_quantity(&self.std_temperature, Quantity::Temperature)?,
            "standard temperature",
        )?;
        Ok(StandardConditions {
            pressure: wp_core::pa(p),
            temperature: wp_core::k(t),
        })
    }
}

/// A table label is quoted in the `.tab` header and names the output file.
pub fn validate_label(label: &str) -> PvtResult<()> {
    if label.trim().is_empty() {
        return Err(PvtError::Config("label must not be empty".to_string()));
    }
    if label.contains(['/', '\\', '"']) {
        return Err(PvtError::Config(format!(
            "label '{label}' must not contain path separators or quotes"
        )));
    }
    Ok(())
}

/// Read and validate a YAML conversion config.
pub fn load_config(path: &Path) -> PvtResult<ConversionConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| PvtError::io(path, e))?;
    ConversionConfig::from_yaml_str(&text)
}
