//! Wellprop CSV export reader.
//!
//! Each export file is a table whose header row holds the secondary-axis
//! coordinates (after an index-name cell) and whose following rows start with
//! a pressure followed by one value per secondary coordinate:
//!
//! ```text
//! ,300.0,350.0
//! 100000.0,800.0,780.0
//! 200000.0,810.0,790.0
//! ```

use crate::error::{PvtError, PvtResult};
use crate::grid::{GridSet, PropertyGrid};
use crate::property::{AxisMode, PropertyId};
use nalgebra::DMatrix;
use std::path::Path;
use tracing::{debug, info};

/// Load every wellprop file of `mode` from `folder`.
///
/// Absent files are skipped; a file that is present but malformed fails the load.
pub fn load_grid_set(folder: &Path, mode: AxisMode) -> PvtResult<GridSet> {
    let mut entries = Vec::new();
    for id in PropertyId::wellprop_files() {
        let path = folder.join(id.file_name(mode));
        let grid = if path.is_file() {
            let grid = read_property_grid(&path)?;
            debug!(property = %id, shape = ?grid.shape(), "loaded wellprop grid");
            Some(grid)
        } else {
            debug!(property = %id, path = %path.display(), "wellprop file absent");
            None
        };
        entries.push((id, grid));
    }

    let set = GridSet::from_entries(mode, entries)?;
    info!(
        folder = %folder.display(),
        mode = %mode,
        present = set.len(),
        shape = ?set.axes().shape(),
        "wellprop grids loaded"
    );
    Ok(set)
}

/// Read and parse a single wellprop CSV file.
pub fn read_property_grid(path: &Path) -> PvtResult<PropertyGrid> {
    let text = std::fs::read_to_string(path).map_err(|e| PvtError::io(path, e))?;
    parse_property_grid(&text, path)
}

/// Parse wellprop CSV text. `origin` is only used in error messages.
pub fn parse_property_grid(text: &str, origin: &Path) -> PvtResult<PropertyGrid> {
    let parse_error = |line: usize, message: String| PvtError::Parse {
        path: origin.to_path_buf(),
        line,
        message,
    };

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| parse_error(1, "missing header row".to_string()))?;

    // first header cell names the pressure index
    let secondary = split_cells(header)
        .skip(1)
        .map(|cell| parse_coordinate(cell).map_err(|m| parse_error(header_line, m)))
        .collect::<PvtResult<Vec<f64>>>()?;

    let mut pressures = Vec::new();
    let mut rows = Vec::new();
    for (line_no, line) in lines {
        let mut cells = split_cells(line);
        let pressure = cells
            .next()
            .ok_or_else(|| parse_error(line_no, "empty row".to_string()))
            .and_then(|c| parse_coordinate(c).map_err(|m| parse_error(line_no, m)))?;
        let row = cells
            .map(|cell| parse_value(cell).map_err(|m| parse_error(line_no, m)))
            .collect::<PvtResult<Vec<f64>>>()?;
        if row.len() != secondary.len() {
            return Err(parse_error(
                line_no,
                format!(
                    "expected {} values after the pressure, found {}",
                    secondary.len(),
                    row.len()
                ),
            ));
        }
        pressures.push(pressure);
        rows.push(row);
    }

    let values = DMatrix::from_fn(rows.len(), secondary.len(), |i, j| rows[i][j]);
    PropertyGrid::new(pressures, secondary, values)
}

fn split_cells(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(|c| c.trim().trim_matches('"').trim())
}

/// Axis coordinates must be real numbers.
fn parse_coordinate(cell: &str) -> Result<f64, String> {
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("invalid axis coordinate '{cell}'")),
    }
}

/// Property values may be blank or `nan` where the package produced nothing.
fn parse_value(cell: &str) -> Result<f64, String> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .map_err(|_| format!("invalid numeric value '{cell}'"))
}
