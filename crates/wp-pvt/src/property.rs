//! Closed identifiers for wellprop input files and PVT table columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which quantity spans the second grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisMode {
    /// Pressure × temperature.
    #[serde(rename = "PT", alias = "pt")]
    Pt,
    /// Pressure × specific enthalpy.
    #[serde(rename = "PH", alias = "ph")]
    Ph,
}

impl AxisMode {
    /// File name prefix of the wellprop export for this mode.
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::Pt => "temperature_",
            Self::Ph => "enthalpy_",
        }
    }
}

impl fmt::Display for AxisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pt => write!(f, "PT"),
            Self::Ph => write!(f, "PH"),
        }
    }
}

impl FromStr for AxisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PT" => Ok(Self::Pt),
            "PH" => Ok(Self::Ph),
            other => Err(format!("unknown axis mode '{other}' (expected PT or PH)")),
        }
    }
}

/// Phase label used in wellprop file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Gas,
    EquivLiquid,
    Water,
    Mixture,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Gas => "GAS",
            Self::EquivLiquid => "equivLIQUID",
            Self::Water => "WATER",
            Self::Mixture => "MIXTURE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKind {
    Conductivity,
    SpecificHeat,
    Density,
    Enthalpy,
    InterfacialTension,
    MassFraction,
    Viscosity,
    Temperature,
}

impl PropertyKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Conductivity => "conductivity",
            Self::SpecificHeat => "cp",
            Self::Density => "density",
            Self::Enthalpy => "enthalpy",
            Self::InterfacialTension => "interfacial_tension",
            Self::MassFraction => "mass_fraction",
            Self::Viscosity => "viscosity",
            Self::Temperature => "temperature",
        }
    }
}

/// One wellprop property file: a (phase, property) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId {
    pub phase: Phase,
    pub kind: PropertyKind,
}

const fn id(phase: Phase, kind: PropertyKind) -> PropertyId {
    PropertyId { phase, kind }
}

const PHASE_PROPERTIES: [PropertyKind; 7] = [
    PropertyKind::Conductivity,
    PropertyKind::SpecificHeat,
    PropertyKind::Density,
    PropertyKind::Enthalpy,
    PropertyKind::InterfacialTension,
    PropertyKind::MassFraction,
    PropertyKind::Viscosity,
];

impl PropertyId {
    pub const GAS_DENSITY: Self = id(Phase::Gas, PropertyKind::Density);
    pub const LIQUID_DENSITY: Self = id(Phase::EquivLiquid, PropertyKind::Density);
    pub const MIXTURE_TEMPERATURE: Self = id(Phase::Mixture, PropertyKind::Temperature);

    /// Every file a wellprop export may contain, in canonical order.
    pub fn wellprop_files() -> impl Iterator<Item = PropertyId> {
        [Phase::Gas, Phase::EquivLiquid, Phase::Water]
            .into_iter()
            .flat_map(|phase| PHASE_PROPERTIES.into_iter().map(move |kind| id(phase, kind)))
            .chain(std::iter::once(Self::MIXTURE_TEMPERATURE))
    }

    pub fn new(phase: Phase, kind: PropertyKind) -> Self {
        id(phase, kind)
    }

    /// File stem without the mode prefix, e.g. `GAS_cp`.
    pub fn file_stem(self) -> String {
        format!("{}_{}", self.phase.label(), self.kind.label())
    }

    /// File name for the given mode, e.g. `enthalpy_GAS_cp.csv`.
    pub fn file_name(self, mode: AxisMode) -> String {
        format!("{}{}.csv", mode.file_prefix(), self.file_stem())
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_stem())
    }
}

/// Output column of a PVT table, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PvtColumn {
    Pt,
    Tm,
    Htot,
    Rog,
    Rohl,
    DrogDp,
    DrohlDp,
    DrogDt,
    DrohlDt,
    DrogDtConstP,
    DrohlDtConstP,
    DrogDpConstT,
    DrohlDpConstT,
    DrogDpConstH,
    DrohlDpConstH,
    DrogDhConstP,
    DrohlDhConstP,
    Rs,
    Visg,
    Vishl,
    Cpg,
    Cphl,
    Hg,
    Hhl,
    Tcg,
    Tchl,
    Sigghl,
}

impl PvtColumn {
    /// Keyword the simulator expects in the `COLUMNS` directive.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Pt => "PT",
            Self::Tm => "TM",
            Self::Htot => "HTOT",
            Self::Rog => "ROG",
            Self::Rohl => "ROHL",
            Self::DrogDp => "DROGDP",
            Self::DrohlDp => "DROHLDP",
            Self::DrogDt => "DROGDT",
            Self::DrohlDt => "DROHLDT",
            Self::DrogDtConstP => "DROGDTP",
            Self::DrohlDtConstP => "DROHLDTP",
            Self::DrogDpConstT => "DROGDPT",
            Self::DrohlDpConstT => "DROHLDPT",
            Self::DrogDpConstH => "DROGDPH",
            Self::DrohlDpConstH => "DROHLDPH",
            Self::DrogDhConstP => "DROGDHP",
            Self::DrohlDhConstP => "DROHLDHP",
            Self::Rs => "RS",
            Self::Visg => "VISG",
            Self::Vishl => "VISHL",
            Self::Cpg => "CPG",
            Self::Cphl => "CPHL",
            Self::Hg => "HG",
            Self::Hhl => "HHL",
            Self::Tcg => "TCG",
            Self::Tchl => "TCHL",
            Self::Sigghl => "SIGGHL",
        }
    }

    /// Full column layout of a table in `mode`, axis columns first.
    pub fn layout(mode: AxisMode) -> &'static [PvtColumn] {
        use PvtColumn::*;
        match mode {
            AxisMode::Pt => &[
                Pt, Tm, Rog, Rohl, DrogDp, DrohlDp, DrogDt, DrohlDt, Rs, Visg, Vishl, Cpg, Cphl,
                Hg, Hhl, Tcg, Tchl, Sigghl,
            ],
            AxisMode::Ph => &[
                Pt,
                Htot,
                Rog,
                Rohl,
                DrogDtConstP,
                DrohlDtConstP,
                DrogDpConstT,
                DrohlDpConstT,
                DrogDpConstH,
                DrohlDpConstH,
                DrogDhConstP,
                DrohlDhConstP,
                Rs,
                Visg,
                Vishl,
                Cpg,
                Cphl,
                Hg,
                Hhl,
                Tcg,
                Tchl,
                Sigghl,
                Tm,
            ],
        }
    }

    /// Property columns of `mode`, i.e. the layout minus the two axis columns.
    pub fn property_columns(mode: AxisMode) -> &'static [PvtColumn] {
        &Self::layout(mode)[2..]
    }
}

impl fmt::Display for PvtColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_file_list() {
        let names: Vec<String> = PropertyId::wellprop_files().map(|p| p.file_stem()).collect();
        assert_eq!(names.len(), 22);
        assert_eq!(names[0], "GAS_conductivity");
        assert_eq!(names[1], "GAS_cp");
        assert_eq!(names[9], "equivLIQUID_density");
        assert_eq!(names[20], "WATER_viscosity");
        assert_eq!(names[21], "MIXTURE_temperature");
    }

    #[test]
    fn file_name_carries_mode_prefix() {
        assert_eq!(
            PropertyId::GAS_DENSITY.file_name(AxisMode::Pt),
            "temperature_GAS_density.csv"
        );
        assert_eq!(
            PropertyId::MIXTURE_TEMPERATURE.file_name(AxisMode::Ph),
            "enthalpy_MIXTURE_temperature.csv"
        );
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("pt".parse::<AxisMode>().unwrap(), AxisMode::Pt);
        assert_eq!(" PH ".parse::<AxisMode>().unwrap(), AxisMode::Ph);
        assert!("PX".parse::<AxisMode>().is_err());
    }

    #[test]
    fn layouts_start_with_axis_columns() {
        let pt = PvtColumn::layout(AxisMode::Pt);
        assert_eq!(&pt[..2], &[PvtColumn::Pt, PvtColumn::Tm]);
        assert_eq!(pt.len(), 18);

        let ph = PvtColumn::layout(AxisMode::Ph);
        assert_eq!(&ph[..2], &[PvtColumn::Pt, PvtColumn::Htot]);
        assert_eq!(ph.last(), Some(&PvtColumn::Tm));
        assert_eq!(ph.len(), 23);
    }

    #[test]
    fn ph_layout_has_eight_density_derivatives() {
        let derivatives = PvtColumn::property_columns(AxisMode::Ph)
            .iter()
            .filter(|c| c.keyword().starts_with("DRO"))
            .count();
        assert_eq!(derivatives, 8);

        let pt_derivatives = PvtColumn::property_columns(AxisMode::Pt)
            .iter()
            .filter(|c| c.keyword().starts_with("DRO"))
            .count();
        assert_eq!(pt_derivatives, 4);
    }
}
