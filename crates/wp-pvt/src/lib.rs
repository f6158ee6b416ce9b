//! wp-pvt: wellprop property exports → tabulated PVT model files.
//!
//! Provides:
//! - Typed identifiers for wellprop files and table columns
//! - CSV grid loading with graceful handling of absent files
//! - Finite-difference derivatives on non-uniform axes
//! - PT and PH density-derivative strategies (chain-rule recovery for PH)
//! - Table composition and `.tab` rendering
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use wp_pvt::{AxisMode, ConversionConfig, PvtTableConverter};
//!
//! let converter = PvtTableConverter::new(
//!     Path::new("wellprop/N2_LIFT"),
//!     ConversionConfig::with_mode(AxisMode::Ph),
//! )
//! .unwrap();
//! let report = converter.generate_pvt_table_file(Path::new("out")).unwrap();
//! println!("{} rows -> {}", report.rows, report.path.display());
//! ```

pub mod config;
pub mod converter;
pub mod derivatives;
pub mod digest;
pub mod error;
pub mod finite_difference;
pub mod grid;
pub mod loader;
pub mod property;
pub mod tab_format;
pub mod table;

// Re-exports for ergonomics
pub use config::{ConversionConfig, StandardConditions, load_config, validate_label};
pub use converter::{ConversionReport, PvtTableConverter};
pub use derivatives::{
    DensityDerivatives, DensitySource, DerivativeTransform, PhDerivatives, PtDerivatives,
    ph_density_derivatives, pt_density_derivatives,
};
pub use digest::table_digest;
pub use error::{PvtError, PvtResult};
pub use finite_difference::{
    differentiate, differentiate_along_pressure, differentiate_along_secondary,
};
pub use grid::{GridAxes, GridSet, PropertyGrid};
pub use loader::{load_grid_set, parse_property_grid, read_property_grid};
pub use property::{AxisMode, Phase, PropertyId, PropertyKind, PvtColumn};
pub use tab_format::{format_sci, render_pvt_table, table_file_path};
pub use table::{PvtTableData, SecondaryAxis, TableComposer};
