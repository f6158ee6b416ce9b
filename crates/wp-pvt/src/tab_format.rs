//! Writer for the simulator's tabulated PVT model (`.tab`) format.
//!
//! Rendering only: the caller decides where the text goes.
//!
//! The simulator reads this format positionally and by keyword: keyword
//! spelling, directive order and column order must not change.
//!
//! ```text
//! PVTTABLE LABEL = "FLUID", PHASE = TWO,\
//! PVTFORMULATION = PH,\
//! STDPRESSURE = 1.000000e+00 ATM,\
//! STDTEMPERATURE = 2.887100e+02 K,\
//! PRESSURE = (1.000000e+05, 2.000000e+05) Pa,\
//! NOENTHALPY = (3, 3),\
//! COLUMNS = (PT, HTOT, ROG, ...)
//! PVTTABLE POINT = (1.000000e+05, 2.500000e+05, ...)
//! ```

use crate::config::StandardConditions;
use crate::property::AxisMode;
use crate::table::{PvtTableData, SecondaryAxis};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use wp_core::{in_atm, in_kelvin};

/// Phase-count label; the tables describe gas plus an equivalent liquid.
pub const PHASE_LABEL: &str = "TWO";

/// Extension of PVT table files.
pub const TAB_EXTENSION: &str = "tab";

/// Format `v` like C's `%.6e`: `1.000000e+05`, `-4.000000e-01`, `nan`, `inf`.
pub fn format_sci(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let formatted = format!("{v:.6e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exponent.abs())
        }
        None => formatted,
    }
}

fn format_list(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format_sci(*v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render `data` as the complete text of a `.tab` file.
pub fn render_pvt_table(data: &PvtTableData, std_conditions: &StandardConditions) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_table(&mut out, data, std_conditions);
    out
}

fn write_table(
    out: &mut String,
    data: &PvtTableData,
    std_conditions: &StandardConditions,
) -> std::fmt::Result {
    writeln!(
        out,
        "PVTTABLE LABEL = \"{}\", PHASE = {PHASE_LABEL},\\",
        data.name()
    )?;
    if data.mode() == AxisMode::Ph {
        writeln!(out, "PVTFORMULATION = PH,\\")?;
    }
    writeln!(
        out,
        "STDPRESSURE = {} ATM,\\",
        format_sci(in_atm(std_conditions.pressure))
    )?;
    writeln!(
        out,
        "STDTEMPERATURE = {} K,\\",
        format_sci(in_kelvin(std_conditions.temperature))
    )?;
    writeln!(out, "PRESSURE = ({}) Pa,\\", format_list(data.pressures()))?;
    match data.secondary() {
        SecondaryAxis::TemperatureC(temperatures) => {
            writeln!(out, "TEMPERATURE = ({}) C,\\", format_list(temperatures))?;
        }
        SecondaryAxis::Enthalpy(enthalpies) => {
            // number of enthalpy points tabulated at each pressure
            let counts = vec![enthalpies.len().to_string(); data.pressures().len()];
            writeln!(out, "NOENTHALPY = ({}),\\", counts.join(", "))?;
        }
    }
    let keywords: Vec<&str> = data.columns().iter().map(|c| c.keyword()).collect();
    writeln!(out, "COLUMNS = ({})", keywords.join(", "))?;
    for row in data.rows() {
        writeln!(out, "PVTTABLE POINT = ({})", format_list(row))?;
    }
    Ok(())
}

/// Path of the `.tab` file for `data` inside `dest_dir`.
pub fn table_file_path(data: &PvtTableData, dest_dir: &Path) -> PathBuf {
    dest_dir.join(format!("{}.{TAB_EXTENSION}", data.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PvtColumn;
    use crate::table::TableComposer;
    use std::collections::BTreeMap;

    #[test]
    fn sci_formatting_matches_printf() {
        assert_eq!(format_sci(1e5), "1.000000e+05");
        assert_eq!(format_sci(-0.4), "-4.000000e-01");
        assert_eq!(format_sci(0.0), "0.000000e+00");
        assert_eq!(format_sci(288.71), "2.887100e+02");
        assert_eq!(format_sci(1.23456789e-123), "1.234568e-123");
        assert_eq!(format_sci(f64::NAN), "nan");
        assert_eq!(format_sci(f64::NEG_INFINITY), "-inf");
    }

    fn pt_table() -> PvtTableData {
        let mut sources = BTreeMap::new();
        sources.insert(PvtColumn::Rog, Some(vec![1.0, 2.0, 3.0, 4.0]));
        TableComposer::new(AxisMode::Pt, vec![1e5, 2e5], vec![26.85, 76.85])
            .compose("FLUID", sources)
            .unwrap()
    }

    #[test]
    fn pt_header_and_points() {
        let text = render_pvt_table(&pt_table(), &StandardConditions::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "PVTTABLE LABEL = \"FLUID\", PHASE = TWO,\\");
        assert_eq!(lines[1], "STDPRESSURE = 1.000000e+00 ATM,\\");
        assert_eq!(lines[2], "STDTEMPERATURE = 2.887100e+02 K,\\");
        assert_eq!(lines[3], "PRESSURE = (1.000000e+05, 2.000000e+05) Pa,\\");
        assert_eq!(lines[4], "TEMPERATURE = (2.685000e+01, 7.685000e+01) C,\\");
        assert!(lines[5].starts_with("COLUMNS = (PT, TM, ROG, ROHL, DROGDP,"));
        assert!(lines[5].ends_with("SIGGHL)"));
        assert_eq!(lines.len(), 6 + 4);
        assert!(lines[6].starts_with("PVTTABLE POINT = (1.000000e+05, 2.685000e+01, 1.000000e+00, 0.000000e+00,"));
        assert!(!text.contains("PVTFORMULATION"));
    }

    #[test]
    fn ph_header_uses_enthalpy_counts() {
        let table = TableComposer::new(AxisMode::Ph, vec![1e5, 2e5, 3e5], vec![1e4, 2e4])
            .compose("PHFLUID", BTreeMap::new())
            .unwrap();
        let text = render_pvt_table(&table, &StandardConditions::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "PVTFORMULATION = PH,\\");
        assert_eq!(lines[5], "NOENTHALPY = (2, 2, 2),\\");
        assert!(lines[6].starts_with("COLUMNS = (PT, HTOT, ROG, ROHL, DROGDTP,"));
        assert!(lines[6].ends_with("SIGGHL, TM)"));
        assert!(!text.contains("TEMPERATURE = ("));
        assert_eq!(text.matches("PVTTABLE POINT").count(), 6);
    }

    #[test]
    fn rendering_is_deterministic() {
        let std = StandardConditions::default();
        assert_eq!(render_pvt_table(&pt_table(), &std), render_pvt_table(&pt_table(), &std));
    }

    #[test]
    fn file_is_named_after_the_table() {
        let path = table_file_path(&pt_table(), Path::new("out"));
        assert_eq!(path, Path::new("out").join("FLUID.tab"));
    }
}
