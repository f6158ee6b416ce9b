//! Density derivatives required by the simulator's equation-of-state closure.
//!
//! The simulator needs `(∂ρ/∂P)_T` and `(∂ρ/∂T)_P`. On a PT grid both are plain
//! finite differences along an axis. On a PH grid temperature is a dependent
//! field, so the derivatives are taken along pressure and enthalpy and then
//! recombined with the implicit-function chain rule:
//!
//! ```text
//! (∂ρ/∂T)_P = (∂ρ/∂h)_P / (∂T/∂h)_P
//! (∂ρ/∂P)_T = (∂ρ/∂P)_h − (∂ρ/∂h)_P · (∂T/∂P)_h / (∂T/∂h)_P
//! ```
//!
//! Both divide by `(∂T/∂h)_P`. Where that divisor is within the tolerance of
//! zero (a two-phase plateau, or a NaN from the differencing itself) the
//! recovered cells are NaN.

use crate::error::{PvtError, PvtResult};
use crate::finite_difference::{differentiate_along_pressure, differentiate_along_secondary};
use crate::grid::{GridAxes, GridSet, flatten_pressure_major};
use crate::property::{AxisMode, PropertyId, PvtColumn};
use nalgebra::DMatrix;
use wp_core::is_usable_divisor;

/// Density grid a derivative set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DensitySource {
    Gas,
    Liquid,
}

impl DensitySource {
    pub const ALL: [DensitySource; 2] = [DensitySource::Gas, DensitySource::Liquid];

    pub fn property(self) -> PropertyId {
        match self {
            Self::Gas => PropertyId::GAS_DENSITY,
            Self::Liquid => PropertyId::LIQUID_DENSITY,
        }
    }

    pub fn density_column(self) -> PvtColumn {
        match self {
            Self::Gas => PvtColumn::Rog,
            Self::Liquid => PvtColumn::Rohl,
        }
    }

    /// Derivative columns produced for this density in `mode`.
    pub fn derivative_columns(self, mode: AxisMode) -> &'static [PvtColumn] {
        use PvtColumn::*;
        match (mode, self) {
            (AxisMode::Pt, Self::Gas) => &[DrogDp, DrogDt],
            (AxisMode::Pt, Self::Liquid) => &[DrohlDp, DrohlDt],
            (AxisMode::Ph, Self::Gas) => &[DrogDtConstP, DrogDpConstT, DrogDpConstH, DrogDhConstP],
            (AxisMode::Ph, Self::Liquid) => {
                &[DrohlDtConstP, DrohlDpConstT, DrohlDpConstH, DrohlDhConstP]
            }
        }
    }
}

/// Derivatives of a density tabulated over (P, T).
#[derive(Debug, Clone, PartialEq)]
pub struct PtDerivatives {
    /// `(∂ρ/∂P)_T`
    pub drho_dp_t: DMatrix<f64>,
    /// `(∂ρ/∂T)_P`
    pub drho_dt_p: DMatrix<f64>,
}

/// Derivatives of a density tabulated over (P, h).
#[derive(Debug, Clone, PartialEq)]
pub struct PhDerivatives {
    /// `(∂ρ/∂T)_P`, recovered by the chain rule
    pub drho_dt_p: DMatrix<f64>,
    /// `(∂ρ/∂P)_T`, recovered by the chain rule
    pub drho_dp_t: DMatrix<f64>,
    /// `(∂ρ/∂P)_h`
    pub drho_dp_h: DMatrix<f64>,
    /// `(∂ρ/∂h)_P`
    pub drho_dh_p: DMatrix<f64>,
    /// Cells where `(∂T/∂h)_P` was unusable as a divisor.
    pub singular_points: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DensityDerivatives {
    Pt(PtDerivatives),
    Ph(PhDerivatives),
}

impl DensityDerivatives {
    /// Flattened derivative columns for `source`, in the order of
    /// [`DensitySource::derivative_columns`].
    pub fn columns(&self, source: DensitySource) -> Vec<(PvtColumn, Vec<f64>)> {
        let (mode, fields): (AxisMode, Vec<&DMatrix<f64>>) = match self {
            Self::Pt(d) => (AxisMode::Pt, vec![&d.drho_dp_t, &d.drho_dt_p]),
            Self::Ph(d) => (
                AxisMode::Ph,
                vec![&d.drho_dt_p, &d.drho_dp_t, &d.drho_dp_h, &d.drho_dh_p],
            ),
        };
        source
            .derivative_columns(mode)
            .iter()
            .copied()
            .zip(fields)
            .map(|(column, field)| (column, flatten_pressure_major(field)))
            .collect()
    }

    pub fn singular_points(&self) -> usize {
        match self {
            Self::Pt(_) => 0,
            Self::Ph(d) => d.singular_points,
        }
    }
}

/// Derivative strategy, fixed for the lifetime of a converter.
///
/// The PH variant carries the mixture-temperature field it needs, so the
/// chain-rule path can only run with one.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivativeTransform {
    Pt {
        tolerance: f64,
    },
    Ph {
        /// Mixture temperature over (P, h); `None` when the export lacks it.
        temperature: Option<DMatrix<f64>>,
        tolerance: f64,
    },
}

impl DerivativeTransform {
    /// Pick the strategy matching the mode of `grids`.
    pub fn for_grids(grids: &GridSet, tolerance: f64) -> Self {
        match grids.mode() {
            AxisMode::Pt => Self::Pt { tolerance },
            AxisMode::Ph => Self::Ph {
                temperature: grids
                    .get(PropertyId::MIXTURE_TEMPERATURE)
                    .map(|g| g.values().clone()),
                tolerance,
            },
        }
    }

    pub fn apply(&self, axes: &GridAxes, density: &DMatrix<f64>) -> PvtResult<DensityDerivatives> {
        match self {
            Self::Pt { tolerance } => {
                pt_density_derivatives(&axes.pressures, &axes.secondary, density, *tolerance)
                    .map(DensityDerivatives::Pt)
            }
            Self::Ph {
                temperature,
                tolerance,
            } => {
                let Some(temperature) = temperature else {
                    return Err(PvtError::DimensionMismatch {
                        what: PropertyId::MIXTURE_TEMPERATURE.file_stem(),
                        expected: axes.shape(),
                        actual: (0, 0),
                    });
                };
                ph_density_derivatives(
                    &axes.pressures,
                    &axes.secondary,
                    density,
                    temperature,
                    *tolerance,
                )
                .map(DensityDerivatives::Ph)
            }
        }
    }
}

/// Density derivatives on a (P, T) grid.
pub fn pt_density_derivatives(
    pressures: &[f64],
    temperatures: &[f64],
    density: &DMatrix<f64>,
    tolerance: f64,
) -> PvtResult<PtDerivatives> {
    let axes = GridAxes {
        pressures: pressures.to_vec(),
        secondary: temperatures.to_vec(),
    };
    axes.check_shape("density", density)?;

    Ok(PtDerivatives {
        drho_dp_t: differentiate_along_pressure(density, pressures, tolerance)?,
        drho_dt_p: differentiate_along_secondary(density, temperatures, tolerance)?,
    })
}

/// Density derivatives on a (P, h) grid with a dependent temperature field.
///
/// Shapes are validated before any differencing.
pub fn ph_density_derivatives(
    pressures: &[f64],
    enthalpies: &[f64],
    density: &DMatrix<f64>,
    temperature: &DMatrix<f64>,
    tolerance: f64,
) -> PvtResult<PhDerivatives> {
    let axes = GridAxes {
        pressures: pressures.to_vec(),
        secondary: enthalpies.to_vec(),
    };
    axes.check_shape("density", density)?;
    axes.check_shape(PropertyId::MIXTURE_TEMPERATURE.file_stem(), temperature)?;

    let drho_dp_h = differentiate_along_pressure(density, pressures, tolerance)?;
    let drho_dh_p = differentiate_along_secondary(density, enthalpies, tolerance)?;
    let dt_dp_h = differentiate_along_pressure(temperature, pressures, tolerance)?;
    let dt_dh_p = differentiate_along_secondary(temperature, enthalpies, tolerance)?;

    let (nrows, ncols) = density.shape();
    let mut drho_dt_p = DMatrix::from_element(nrows, ncols, f64::NAN);
    let mut drho_dp_t = DMatrix::from_element(nrows, ncols, f64::NAN);
    let mut singular_points = 0;

    for i in 0..nrows {
        for j in 0..ncols {
            let divisor = dt_dh_p[(i, j)];
            if !is_usable_divisor(divisor, tolerance) {
                singular_points += 1;
                continue;
            }
            drho_dt_p[(i, j)] = drho_dh_p[(i, j)] / divisor;
            drho_dp_t[(i, j)] = drho_dp_h[(i, j)] - drho_dh_p[(i, j)] * dt_dp_h[(i, j)] / divisor;
        }
    }

    Ok(PhDerivatives {
        drho_dt_p,
        drho_dp_t,
        drho_dp_h,
        drho_dh_p,
        singular_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * (1.0 + b.abs())
    }

    fn ph_axes() -> (Vec<f64>, Vec<f64>) {
        (vec![1e5, 2e5, 4e5], vec![1e5, 1.5e5, 2.5e5, 3e5])
    }

    #[test]
    fn pt_matches_hand_computed_differences() {
        let p = [1e5, 2e5];
        let t = [300.0, 350.0];
        let rho = DMatrix::from_row_slice(2, 2, &[800.0, 780.0, 810.0, 790.0]);
        let d = pt_density_derivatives(&p, &t, &rho, TOL).unwrap();
        assert!(close(d.drho_dp_t[(0, 0)], 1e-4));
        assert!(close(d.drho_dt_p[(0, 0)], -0.4));
    }

    #[test]
    fn ph_recovers_affine_derivatives() {
        // T = 200 + 2e-3 h + 1e-5 P, rho = 900 - 1e-4 h + 2e-6 P
        let (p, h) = ph_axes();
        let temperature = DMatrix::from_fn(p.len(), h.len(), |i, j| 200.0 + 2e-3 * h[j] + 1e-5 * p[i]);
        let rho = DMatrix::from_fn(p.len(), h.len(), |i, j| 900.0 - 1e-4 * h[j] + 2e-6 * p[i]);

        let d = ph_density_derivatives(&p, &h, &rho, &temperature, TOL).unwrap();
        assert_eq!(d.singular_points, 0);
        for v in d.drho_dt_p.iter() {
            assert!(close(*v, -0.05), "drho/dT = {v}");
        }
        for v in d.drho_dp_t.iter() {
            assert!(close(*v, 2.5e-6), "drho/dP = {v}");
        }
        for v in d.drho_dp_h.iter() {
            assert!(close(*v, 2e-6));
        }
        for v in d.drho_dh_p.iter() {
            assert!(close(*v, -1e-4));
        }
    }

    #[test]
    fn flat_temperature_leaves_nan_without_error() {
        let (p, h) = ph_axes();
        // pressure row 1 sits on a plateau: T does not move with h there
        let temperature = DMatrix::from_fn(p.len(), h.len(), |i, j| {
            if i == 1 { 400.0 } else { 300.0 + 1e-3 * h[j] }
        });
        let rho = DMatrix::from_fn(p.len(), h.len(), |i, j| 700.0 - 1e-4 * h[j] + 1e-6 * p[i]);

        let d = ph_density_derivatives(&p, &h, &rho, &temperature, TOL).unwrap();
        assert_eq!(d.singular_points, h.len());
        for j in 0..h.len() {
            assert!(d.drho_dt_p[(1, j)].is_nan());
            assert!(d.drho_dp_t[(1, j)].is_nan());
            assert!(d.drho_dt_p[(0, j)].is_finite());
            assert!(d.drho_dp_t[(2, j)].is_finite());
        }
        // raw derivatives are still reported
        assert!(d.drho_dh_p[(1, 0)].is_finite());
    }

    #[test]
    fn isolated_zero_slope_affects_only_that_cell() {
        let p = vec![1e5, 2e5];
        let h = vec![1.0, 2.0, 3.0];
        // central difference at j = 1 is (300 - 300) / 2 = 0
        let temperature = DMatrix::from_row_slice(2, 3, &[300.0, 310.0, 300.0, 305.0, 315.0, 325.0]);
        let rho = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 1.5, 2.5, 3.5]);

        let d = ph_density_derivatives(&p, &h, &rho, &temperature, TOL).unwrap();
        assert_eq!(d.singular_points, 1);
        assert!(d.drho_dt_p[(0, 1)].is_nan());
        assert!(d.drho_dp_t[(0, 1)].is_nan());
        assert!(close(d.drho_dt_p[(0, 0)], 0.1));
        assert!(close(d.drho_dt_p[(1, 1)], 0.1));
    }

    #[test]
    fn ph_shape_mismatch_is_fatal() {
        let (p, h) = ph_axes();
        let rho = DMatrix::from_element(p.len(), h.len(), 1.0);
        let temperature = DMatrix::from_element(p.len(), h.len() - 1, 300.0);
        match ph_density_derivatives(&p, &h, &rho, &temperature, TOL).unwrap_err() {
            PvtError::DimensionMismatch {
                what,
                expected,
                actual,
            } => {
                assert_eq!(what, "MIXTURE_temperature");
                assert_eq!(expected, (3, 4));
                assert_eq!(actual, (3, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ph_transform_without_temperature_is_fatal() {
        let (p, h) = ph_axes();
        let axes = GridAxes {
            pressures: p.clone(),
            secondary: h.clone(),
        };
        let transform = DerivativeTransform::Ph {
            temperature: None,
            tolerance: TOL,
        };
        let rho = DMatrix::from_element(p.len(), h.len(), 1.0);
        assert!(matches!(
            transform.apply(&axes, &rho),
            Err(PvtError::DimensionMismatch { actual: (0, 0), .. })
        ));
    }

    #[test]
    fn columns_follow_the_source_phase() {
        let p = [1e5, 2e5];
        let t = [300.0, 350.0];
        let rho = DMatrix::from_row_slice(2, 2, &[800.0, 780.0, 810.0, 790.0]);
        let d = DensityDerivatives::Pt(pt_density_derivatives(&p, &t, &rho, TOL).unwrap());

        let gas = d.columns(DensitySource::Gas);
        assert_eq!(gas[0].0, PvtColumn::DrogDp);
        assert_eq!(gas[1].0, PvtColumn::DrogDt);
        assert_eq!(gas[1].1.len(), 4);

        let liquid = d.columns(DensitySource::Liquid);
        assert_eq!(liquid[0].0, PvtColumn::DrohlDp);
    }
}
