//! Consolidated PVT table and its composer.

use crate::error::{PvtError, PvtResult};
use crate::property::{AxisMode, PvtColumn};
use std::collections::BTreeMap;
use tracing::debug;

/// Secondary-axis coordinates as they appear in the output table.
#[derive(Debug, Clone, PartialEq)]
pub enum SecondaryAxis {
    /// Temperatures in °C (PT tables).
    TemperatureC(Vec<f64>),
    /// Specific enthalpies in J/kg (PH tables).
    Enthalpy(Vec<f64>),
}

impl SecondaryAxis {
    pub fn values(&self) -> &[f64] {
        match self {
            Self::TemperatureC(v) | Self::Enthalpy(v) => v,
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

/// A composed PVT table, ready for serialization.
///
/// Rows enumerate (pressure, secondary) pairs in pressure-major order; the
/// first two values of every row are those coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PvtTableData {
    name: String,
    mode: AxisMode,
    pressures: Vec<f64>,
    secondary: SecondaryAxis,
    columns: Vec<PvtColumn>,
    rows: Vec<Vec<f64>>,
}

impl PvtTableData {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> AxisMode {
        self.mode
    }

    pub fn pressures(&self) -> &[f64] {
        &self.pressures
    }

    pub fn secondary(&self) -> &SecondaryAxis {
        &self.secondary
    }

    pub fn columns(&self) -> &[PvtColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All values of `column`, or `None` if the table has no such column.
    pub fn column(&self, column: PvtColumn) -> Option<Vec<f64>> {
        let index = self.columns.iter().position(|c| *c == column)?;
        Some(self.rows.iter().map(|row| row[index]).collect())
    }

    /// Value of `column` at pressure index `i` and secondary index `j`.
    pub fn value(&self, column: PvtColumn, i: usize, j: usize) -> Option<f64> {
        if j >= self.secondary.len() {
            return None;
        }
        let index = self.columns.iter().position(|c| *c == column)?;
        let row = self.rows.get(i * self.secondary.len() + j)?;
        Some(row[index])
    }
}

/// Lays property vectors out as table columns.
///
/// This is the one place where absent data becomes zeros.
#[derive(Debug, Clone)]
pub struct TableComposer {
    mode: AxisMode,
    pressures: Vec<f64>,
    secondary: Vec<f64>,
}

impl TableComposer {
    /// `secondary` holds output coordinates: °C for PT, J/kg for PH.
    pub fn new(mode: AxisMode, pressures: Vec<f64>, secondary: Vec<f64>) -> Self {
        Self {
            mode,
            pressures,
            secondary,
        }
    }

    pub fn point_count(&self) -> usize {
        self.pressures.len() * self.secondary.len()
    }

    /// Build the table. `sources` maps property columns to flattened
    /// pressure-major vectors; missing, `None` or empty entries are zero-filled.
    pub fn compose(
        self,
        name: impl Into<String>,
        mut sources: BTreeMap<PvtColumn, Option<Vec<f64>>>,
    ) -> PvtResult<PvtTableData> {
        let n = self.point_count();
        let layout = PvtColumn::layout(self.mode);
        let property_columns = PvtColumn::property_columns(self.mode);

        let mut values: Vec<Vec<f64>> = Vec::with_capacity(property_columns.len());
        for &column in property_columns {
            let data = match sources.remove(&column).flatten() {
                Some(v) if !v.is_empty() => v,
                _ => {
                    debug!(column = %column, "no source data, zero-filling");
                    vec![0.0; n]
                }
            };
            if data.len() != n {
                return Err(PvtError::ColumnLength {
                    column,
                    expected: n,
                    actual: data.len(),
                });
            }
            values.push(data);
        }
        for column in sources.keys() {
            debug!(column = %column, mode = %self.mode, "column not part of this layout, ignored");
        }

        let nx = self.secondary.len();
        let mut rows = Vec::with_capacity(n);
        for (i, p) in self.pressures.iter().enumerate() {
            for (j, x) in self.secondary.iter().enumerate() {
                let k = i * nx + j;
                let mut row = Vec::with_capacity(layout.len());
                row.push(*p);
                row.push(*x);
                row.extend(values.iter().map(|col| col[k]));
                rows.push(row);
            }
        }

        let secondary = match self.mode {
            AxisMode::Pt => SecondaryAxis::TemperatureC(self.secondary),
            AxisMode::Ph => SecondaryAxis::Enthalpy(self.secondary),
        };

        Ok(PvtTableData {
            name: name.into(),
            mode: self.mode,
            pressures: self.pressures,
            secondary,
            columns: layout.to_vec(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer(mode: AxisMode) -> TableComposer {
        TableComposer::new(mode, vec![1e5, 2e5], vec![26.85, 76.85, 126.85])
    }

    #[test]
    fn leading_columns_are_the_cartesian_product() {
        let table = composer(AxisMode::Pt).compose("t", BTreeMap::new()).unwrap();
        assert_eq!(table.row_count(), 6);
        let coords: Vec<(f64, f64)> = table.rows().iter().map(|r| (r[0], r[1])).collect();
        assert_eq!(
            coords,
            vec![
                (1e5, 26.85),
                (1e5, 76.85),
                (1e5, 126.85),
                (2e5, 26.85),
                (2e5, 76.85),
                (2e5, 126.85),
            ]
        );
    }

    #[test]
    fn absent_properties_are_zero_columns() {
        let mut sources = BTreeMap::new();
        sources.insert(PvtColumn::Rog, Some(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        sources.insert(PvtColumn::Visg, None);
        sources.insert(PvtColumn::Cpg, Some(Vec::new()));
        let table = composer(AxisMode::Pt).compose("t", sources).unwrap();

        assert_eq!(table.column(PvtColumn::Rog).unwrap(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        for column in [PvtColumn::Visg, PvtColumn::Cpg, PvtColumn::Sigghl, PvtColumn::Rohl] {
            assert_eq!(table.column(column).unwrap(), vec![0.0; 6], "{column}");
        }
    }

    #[test]
    fn wrong_length_is_rejected() {
        let mut sources = BTreeMap::new();
        sources.insert(PvtColumn::Rohl, Some(vec![1.0; 5]));
        let err = composer(AxisMode::Pt).compose("t", sources).unwrap_err();
        assert!(matches!(
            err,
            PvtError::ColumnLength {
                column: PvtColumn::Rohl,
                expected: 6,
                actual: 5
            }
        ));
    }

    #[test]
    fn temperature_column_only_in_ph_tables() {
        let pt = composer(AxisMode::Pt).compose("t", BTreeMap::new()).unwrap();
        assert_eq!(pt.columns().iter().filter(|c| **c == PvtColumn::Tm).count(), 1);
        assert!(pt.column(PvtColumn::Htot).is_none());

        let mut sources = BTreeMap::new();
        sources.insert(PvtColumn::Tm, Some(vec![7.0; 6]));
        let ph = composer(AxisMode::Ph).compose("t", sources).unwrap();
        assert_eq!(ph.columns()[1], PvtColumn::Htot);
        assert_eq!(ph.column(PvtColumn::Tm).unwrap(), vec![7.0; 6]);
        assert!(matches!(ph.secondary(), SecondaryAxis::Enthalpy(_)));
    }

    #[test]
    fn value_lookup_by_grid_index() {
        let mut sources = BTreeMap::new();
        sources.insert(PvtColumn::Rog, Some(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        let table = composer(AxisMode::Pt).compose("t", sources).unwrap();
        assert_eq!(table.value(PvtColumn::Rog, 1, 2), Some(6.0));
        assert_eq!(table.value(PvtColumn::Pt, 1, 0), Some(2e5));
        assert_eq!(table.value(PvtColumn::Rog, 0, 3), None);
        assert_eq!(table.value(PvtColumn::Rog, 2, 0), None);
    }

    #[test]
    fn empty_axes_give_empty_table() {
        let table = TableComposer::new(AxisMode::Ph, vec![], vec![])
            .compose("empty", BTreeMap::new())
            .unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.columns().len(), PvtColumn::layout(AxisMode::Ph).len());
    }
}
