// wp-core/src/units.rs

use uom::si::f64::{
    Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn atm(v: f64) -> Pressure {
    use uom::si::pressure::atmosphere;
    Pressure::new::<atmosphere>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn in_atm(p: Pressure) -> f64 {
    use uom::si::pressure::atmosphere;
    p.get::<atmosphere>()
}

#[inline]
pub fn in_kelvin(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

/// Offset between the kelvin and celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Absolute temperature in K to °C.
///
/// Plain subtraction so that table columns and axis headers agree bit for bit.
#[inline]
pub fn kelvin_to_celsius(v: f64) -> f64 {
    v - KELVIN_OFFSET
}

pub mod constants {
    use super::*;

    /// Simulator standard temperature [K].
    pub const STD_TEMPERATURE_K: f64 = 288.71;

    #[inline]
    pub fn std_pressure() -> Pressure {
        atm(1.0)
    }

    #[inline]
    pub fn std_temperature() -> Temperature {
        k(STD_TEMPERATURE_K)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
    }

    #[test]
    fn atmosphere_roundtrip() {
        assert!((in_atm(pa(101_325.0)) - 1.0).abs() < 1e-12);
        assert!((in_atm(constants::std_pressure()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn celsius_offset() {
        assert_eq!(kelvin_to_celsius(273.15), 0.0);
        assert!((in_kelvin(constants::std_temperature()) - 288.71).abs() < 1e-9);
    }
}
