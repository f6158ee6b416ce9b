//! Wellprop export → PVT table conversion.

use crate::config::{ConversionConfig, StandardConditions, validate_label};
use crate::derivatives::{DensitySource, DerivativeTransform};
use crate::digest::table_digest;
use crate::error::{PvtError, PvtResult};
use crate::grid::{GridSet, PropertyGrid};
use crate::loader::load_grid_set;
use crate::property::{AxisMode, Phase, PropertyId, PropertyKind, PvtColumn};
use crate::table::{PvtTableData, TableComposer};
use crate::tab_format::{render_pvt_table, table_file_path};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wp_core::kelvin_to_celsius;

/// Table columns copied straight from a wellprop grid.
const RAW_COLUMNS: [(PvtColumn, Phase, PropertyKind); 10] = [
    (PvtColumn::Rs, Phase::Gas, PropertyKind::MassFraction),
    (PvtColumn::Visg, Phase::Gas, PropertyKind::Viscosity),
    (PvtColumn::Vishl, Phase::EquivLiquid, PropertyKind::Viscosity),
    (PvtColumn::Cpg, Phase::Gas, PropertyKind::SpecificHeat),
    (PvtColumn::Cphl, Phase::EquivLiquid, PropertyKind::SpecificHeat),
    (PvtColumn::Hg, Phase::Gas, PropertyKind::Enthalpy),
    (PvtColumn::Hhl, Phase::EquivLiquid, PropertyKind::Enthalpy),
    (PvtColumn::Tcg, Phase::Gas, PropertyKind::Conductivity),
    (PvtColumn::Tchl, Phase::EquivLiquid, PropertyKind::Conductivity),
    (PvtColumn::Sigghl, Phase::EquivLiquid, PropertyKind::InterfacialTension),
];

/// Outcome of writing a table file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub path: PathBuf,
    pub mode: AxisMode,
    pub rows: usize,
    /// Grid cells whose chain-rule divisor was singular (PH only).
    pub singular_points: usize,
    /// SHA-256 of the written text.
    pub digest: String,
}

/// Converts one wellprop export folder into a PVT table.
///
/// Grids are read eagerly on construction; [`convert`](Self::convert) only computes.
#[derive(Debug, Clone)]
pub struct PvtTableConverter {
    name: String,
    std_conditions: StandardConditions,
    grids: GridSet,
    transform: DerivativeTransform,
}

impl PvtTableConverter {
    /// Load the export in `folder`. The table label defaults to the folder name.
    pub fn new(folder: &Path, config: ConversionConfig) -> PvtResult<Self> {
        config.validate()?;
        let name = match &config.label {
            Some(label) => label.clone(),
            None => folder_label(folder)?,
        };
        validate_label(&name)?;
        let grids = load_grid_set(folder, config.mode)?;
        Self::from_grids(name, grids, &config)
    }

    /// Build a converter over already loaded grids.
    pub fn from_grids(
        name: impl Into<String>,
        grids: GridSet,
        config: &ConversionConfig,
    ) -> PvtResult<Self> {
        if grids.mode() != config.mode {
            return Err(PvtError::Config(format!(
                "grids were loaded in {} mode but the configuration asks for {}",
                grids.mode(),
                config.mode
            )));
        }
        let std_conditions = config.standard_conditions()?;
        let transform = DerivativeTransform::for_grids(&grids, config.tolerance);
        Ok(Self {
            name: name.into(),
            std_conditions,
            grids,
            transform,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> AxisMode {
        self.grids.mode()
    }

    pub fn grids(&self) -> &GridSet {
        &self.grids
    }

    /// Compute derivatives and compose the table.
    pub fn convert(&self) -> PvtResult<PvtTableData> {
        let (data, _) = self.convert_counting_singular()?;
        Ok(data)
    }

    fn convert_counting_singular(&self) -> PvtResult<(PvtTableData, usize)> {
        let mode = self.mode();
        let axes = self.grids.axes();
        let mut sources: BTreeMap<PvtColumn, Option<Vec<f64>>> = BTreeMap::new();
        let mut singular_points = 0;

        for source in DensitySource::ALL {
            let density = self.grids.get(source.property());
            sources.insert(source.density_column(), density.map(PropertyGrid::flatten));
            let Some(density) = density else { continue };

            let derivatives = self.transform.apply(axes, density.values())?;
            // the divisor field is shared by both densities
            singular_points = singular_points.max(derivatives.singular_points());
            for (column, values) in derivatives.columns(source) {
                sources.insert(column, Some(values));
            }
        }

        for (column, phase, kind) in RAW_COLUMNS {
            sources.insert(column, self.grids.flattened(PropertyId::new(phase, kind)));
        }

        let secondary = match mode {
            AxisMode::Pt => axes.secondary.iter().copied().map(kelvin_to_celsius).collect(),
            AxisMode::Ph => {
                let temperature = self
                    .grids
                    .flattened(PropertyId::MIXTURE_TEMPERATURE)
                    .map(|t| t.into_iter().map(kelvin_to_celsius).collect());
                sources.insert(PvtColumn::Tm, temperature);
                axes.secondary.clone()
            }
        };

        if singular_points > 0 {
            warn!(
                table = %self.name,
                singular_points,
                "temperature is flat against enthalpy at some points; derivatives left as NaN"
            );
        }

        let data = TableComposer::new(mode, axes.pressures.clone(), secondary)
            .compose(self.name.clone(), sources)?;
        info!(
            table = %self.name,
            mode = %mode,
            rows = data.row_count(),
            columns = data.columns().len(),
            "PVT table composed"
        );
        Ok((data, singular_points))
    }

    /// Render `data` with this converter's standard conditions.
    pub fn render(&self, data: &PvtTableData) -> String {
        render_pvt_table(data, &self.std_conditions)
    }

    /// Convert and render in one step.
    pub fn render_table(&self) -> PvtResult<String> {
        Ok(self.render(&self.convert()?))
    }

    /// Convert and write `<dest_dir>/<name>.tab`.
    pub fn generate_pvt_table_file(&self, dest_dir: &Path) -> PvtResult<ConversionReport> {
        let (data, singular_points) = self.convert_counting_singular()?;
        let content = self.render(&data);
        let path = table_file_path(&data, dest_dir);
        std::fs::write(&path, &content).map_err(|e| PvtError::io(&path, e))?;
        info!(path = %path.display(), rows = data.row_count(), "PVT table written");

        Ok(ConversionReport {
            path,
            mode: data.mode(),
            rows: data.row_count(),
            singular_points,
            digest: table_digest(&content),
        })
    }
}

/// Name of `folder`; `.` and `..` resolve to the directory they point at.
fn folder_label(folder: &Path) -> PvtResult<String> {
    let resolved = match folder.file_name() {
        Some(name) => return Ok(name.to_string_lossy().into_owned()),
        None => folder.canonicalize().map_err(|e| PvtError::io(folder, e))?,
    };
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            PvtError::Config(format!(
                "cannot derive a table label from '{}'",
                folder.display()
            ))
        })
}
