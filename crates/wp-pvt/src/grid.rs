//! Two-dimensional property grids and the set loaded for one conversion.

use crate::error::{PvtError, PvtResult};
use crate::property::{AxisMode, PropertyId};
use nalgebra::DMatrix;
use std::collections::BTreeMap;
use tracing::warn;
use wp_core::{Tolerances, nearly_equal};

/// A property tabulated over (pressure, secondary axis).
///
/// Rows follow the pressure coordinates and columns the secondary
/// coordinates (temperature in K for PT files, enthalpy in J/kg for PH files).
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyGrid {
    pressures: Vec<f64>,
    secondary: Vec<f64>,
    values: DMatrix<f64>,
}

impl PropertyGrid {
    pub fn new(pressures: Vec<f64>, secondary: Vec<f64>, values: DMatrix<f64>) -> PvtResult<Self> {
        let expected = (pressures.len(), secondary.len());
        let actual = values.shape();
        if expected != actual {
            return Err(PvtError::DimensionMismatch {
                what: "grid values".to_string(),
                expected,
                actual,
            });
        }
        Ok(Self {
            pressures,
            secondary,
            values,
        })
    }

    /// Build a grid from row vectors, one row per pressure.
    pub fn from_rows(pressures: Vec<f64>, secondary: Vec<f64>, rows: &[Vec<f64>]) -> PvtResult<Self> {
        let ncols = secondary.len();
        if rows.len() != pressures.len() || rows.iter().any(|r| r.len() != ncols) {
            return Err(PvtError::DimensionMismatch {
                what: "grid rows".to_string(),
                expected: (pressures.len(), ncols),
                actual: (rows.len(), rows.first().map_or(0, Vec::len)),
            });
        }
        let values = DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]);
        Self::new(pressures, secondary, values)
    }

    pub fn pressures(&self) -> &[f64] {
        &self.pressures
    }

    pub fn secondary(&self) -> &[f64] {
        &self.secondary
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// Values in pressure-major order.
    pub fn flatten(&self) -> Vec<f64> {
        flatten_pressure_major(&self.values)
    }
}

/// Flatten a (pressure × secondary) matrix row by row.
pub fn flatten_pressure_major(matrix: &DMatrix<f64>) -> Vec<f64> {
    let (nrows, ncols) = matrix.shape();
    let mut out = Vec::with_capacity(nrows * ncols);
    for i in 0..nrows {
        for j in 0..ncols {
            out.push(matrix[(i, j)]);
        }
    }
    out
}

/// Axis coordinates shared by every grid of one conversion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridAxes {
    pub pressures: Vec<f64>,
    pub secondary: Vec<f64>,
}

impl GridAxes {
    pub fn shape(&self) -> (usize, usize) {
        (self.pressures.len(), self.secondary.len())
    }

    /// Number of (pressure, secondary) pairs.
    pub fn point_count(&self) -> usize {
        self.pressures.len() * self.secondary.len()
    }

    /// Fail unless `matrix` has shape (len(pressures), len(secondary)).
    pub fn check_shape(&self, what: impl Into<String>, matrix: &DMatrix<f64>) -> PvtResult<()> {
        let expected = self.shape();
        let actual = matrix.shape();
        if expected == actual {
            Ok(())
        } else {
            Err(PvtError::DimensionMismatch {
                what: what.into(),
                expected,
                actual,
            })
        }
    }
}

/// The grids loaded for one conversion, keyed by property.
///
/// Absent files have no entry; there is no empty-grid placeholder.
#[derive(Debug, Clone)]
pub struct GridSet {
    mode: AxisMode,
    axes: GridAxes,
    grids: BTreeMap<PropertyId, PropertyGrid>,
}

impl GridSet {
    /// Assemble a set from loaded entries, validating that every present
    /// grid matches the axes of the first present one (canonical order).
    pub fn from_entries<I>(mode: AxisMode, entries: I) -> PvtResult<Self>
    where
        I: IntoIterator<Item = (PropertyId, Option<PropertyGrid>)>,
    {
        let mut axes: Option<GridAxes> = None;
        let mut grids = BTreeMap::new();

        for (id, grid) in entries {
            let Some(grid) = grid else { continue };
            match &axes {
                None => {
                    axes = Some(GridAxes {
                        pressures: grid.pressures.clone(),
                        secondary: grid.secondary.clone(),
                    });
                }
                Some(shared) => {
                    shared.check_shape(id.file_stem(), &grid.values)?;
                    if !same_coordinates(&shared.pressures, &grid.pressures)
                        || !same_coordinates(&shared.secondary, &grid.secondary)
                    {
                        warn!(property = %id, "axis coordinates differ from the shared axes");
                    }
                }
            }
            grids.insert(id, grid);
        }

        Ok(Self {
            mode,
            axes: axes.unwrap_or_default(),
            grids,
        })
    }

    pub fn mode(&self) -> AxisMode {
        self.mode
    }

    pub fn axes(&self) -> &GridAxes {
        &self.axes
    }

    pub fn get(&self, id: PropertyId) -> Option<&PropertyGrid> {
        self.grids.get(&id)
    }

    /// Number of present grids.
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Flattened values of `id`, or `None` when its file was absent.
    pub fn flattened(&self, id: PropertyId) -> Option<Vec<f64>> {
        self.get(id).map(PropertyGrid::flatten)
    }
}

fn same_coordinates(a: &[f64], b: &[f64]) -> bool {
    let tol = Tolerances::default();
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| nearly_equal(*x, *y, tol))
}
