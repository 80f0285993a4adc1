//! Unit conversion between the native units of the row builders and the
//! units a PHPP worksheet column expects (SI or IP)
//!
//! Every unit is parsed into a dimension plus a linear mapping onto that
//! dimension's SI base unit. Converting is then `to_base` followed by
//! `from_base`, and only units of the same dimension convert.

use crate::error::{PhppError, PhppResult};

/// Physical dimension of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Length,
    Area,
    Volume,
    Flow,
    Temperature,
    TemperatureDelta,
    Conductivity,
    UValue,
    RValue,
    LossRate,
    EnergyPerArea,
    Irradiance,
    ElectricEfficiency,
    Power,
    Energy,
    Dimensionless,
}

/// A parsed unit: `base = value * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    pub dimension: Dimension,
    scale: f64,
    offset: f64,
}

impl Unit {
    const fn linear(dimension: Dimension, scale: f64) -> Self {
        Self {
            dimension,
            scale,
            offset: 0.0,
        }
    }

    /// Parse a unit string ("M2", "btu/hr-ft2-f", "cfm", ...)
    ///
    /// Case and whitespace are ignored. Unknown units give `None`.
    pub fn parse(unit: &str) -> Option<Self> {
        use Dimension::*;
        let key = normalize(unit);
        let parsed = match key.as_str() {
            // Length (base M)
            "M" => Unit::linear(Length, 1.0),
            "MM" => Unit::linear(Length, 0.001),
            "CM" => Unit::linear(Length, 0.01),
            "FT" => Unit::linear(Length, 0.3048),
            "IN" => Unit::linear(Length, 0.0254),
            // Area (base M2)
            "M2" => Unit::linear(Area, 1.0),
            "FT2" => Unit::linear(Area, 0.092_903_04),
            // Volume (base M3)
            "M3" => Unit::linear(Volume, 1.0),
            "LITER" | "LITRE" | "L" => Unit::linear(Volume, 0.001),
            "GALLON" | "GAL" => Unit::linear(Volume, 0.003_785_411_784),
            "FT3" => Unit::linear(Volume, 0.028_316_846_592),
            // Air flow (base M3/HR)
            "M3/HR" | "M3/H" => Unit::linear(Flow, 1.0),
            "CFM" => Unit::linear(Flow, 1.699_010_796),
            "L/S" => Unit::linear(Flow, 3.6),
            // Temperature (base C)
            "C" | "DEG-C" => Unit::linear(Temperature, 1.0),
            "F" | "DEG-F" => Unit {
                dimension: Temperature,
                scale: 5.0 / 9.0,
                offset: -32.0 * 5.0 / 9.0,
            },
            "K" => Unit {
                dimension: Temperature,
                scale: 1.0,
                offset: -273.15,
            },
            "DELTA-C" | "DELTA-K" => Unit::linear(TemperatureDelta, 1.0),
            "DELTA-F" => Unit::linear(TemperatureDelta, 5.0 / 9.0),
            // Thermal
            "W/MK" | "W/M-K" => Unit::linear(Conductivity, 1.0),
            "BTU/HR-FT-F" => Unit::linear(Conductivity, 1.730_734_666),
            "W/M2K" | "W/M2-K" => Unit::linear(UValue, 1.0),
            "BTU/HR-FT2-F" => Unit::linear(UValue, 5.678_263_341),
            "M2K/W" | "M2-K/W" => Unit::linear(RValue, 1.0),
            "HR-FT2-F/BTU" => Unit::linear(RValue, 0.176_110_184),
            "W/K" => Unit::linear(LossRate, 1.0),
            "BTU/HR-F" => Unit::linear(LossRate, 0.527_527_926),
            // Energy
            "KWH/M2" => Unit::linear(EnergyPerArea, 1.0),
            "KBTU/FT2" => Unit::linear(EnergyPerArea, 3.154_590_745),
            "W/M2" => Unit::linear(Irradiance, 1.0),
            "BTU/HR-FT2" => Unit::linear(Irradiance, 3.154_590_745),
            "WH/M3" => Unit::linear(ElectricEfficiency, 1.0),
            "W/CFM" => Unit::linear(ElectricEfficiency, 1.0 / 1.699_010_796),
            "W" => Unit::linear(Power, 1.0),
            "KW" => Unit::linear(Power, 1000.0),
            "BTU/HR" => Unit::linear(Power, 0.293_071_070),
            "KWH" => Unit::linear(Energy, 1.0),
            "KBTU" => Unit::linear(Energy, 0.293_071_070),
            "-" | "" | "%" => Unit::linear(Dimensionless, 1.0),
            _ => return None,
        };
        Some(parsed)
    }

    fn to_base(self, value: f64) -> f64 {
        value * self.scale + self.offset
    }

    fn from_base(self, value: f64) -> f64 {
        (value - self.offset) / self.scale
    }
}

fn normalize(unit: &str) -> String {
    unit.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Convert `value` from unit `from` to unit `to`.
///
/// Identical units (after normalizing case and whitespace) return the value
/// unchanged, even for units this module does not know. Any other pair must
/// parse to the same dimension or the conversion fails.
pub fn convert(value: f64, from: &str, to: &str) -> PhppResult<f64> {
    if normalize(from) == normalize(to) {
        return Ok(value);
    }

    let fail = || PhppError::UnitConversion {
        value,
        from: from.to_string(),
        to: to.to_string(),
    };

    let source = Unit::parse(from).ok_or_else(fail)?;
    let target = Unit::parse(to).ok_or_else(fail)?;
    if source.dimension != target.dimension {
        return Err(fail());
    }

    Ok(target.from_base(source.to_base(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_same_unit_is_identity() {
        assert_eq!(convert(12.5, "M", "m").unwrap(), 12.5);
        assert_eq!(convert(3.0, "WIDGETS", "widgets").unwrap(), 3.0);
        assert_eq!(convert(0.5, "-", "-").unwrap(), 0.5);
    }

    #[test]
    fn test_length_and_area() {
        assert!(close(convert(1.0, "M", "FT").unwrap(), 3.28084));
        assert!(close(convert(25.4, "MM", "IN").unwrap(), 1.0));
        assert!(close(convert(10.0, "M2", "FT2").unwrap(), 107.639));
    }

    #[test]
    fn test_temperature_offsets() {
        assert!(close(convert(20.0, "C", "F").unwrap(), 68.0));
        assert!(close(convert(-40.0, "F", "C").unwrap(), -40.0));
        assert!(close(convert(10.0, "DELTA-C", "DELTA-F").unwrap(), 18.0));
    }

    #[test]
    fn test_thermal_units() {
        assert!(close(convert(1.0, "W/M2K", "BTU/HR-FT2-F").unwrap(), 0.17611));
        assert!(close(convert(0.04, "W/MK", "BTU/HR-FT-F").unwrap(), 0.02311));
        assert!(close(convert(100.0, "M3/HR", "CFM").unwrap(), 58.858));
    }

    #[test]
    fn test_incompatible_units_fail() {
        assert!(convert(1.0, "M", "M2").is_err());
        assert!(convert(1.0, "M", "FURLONG").is_err());
        let err = convert(2.0, "C", "W").unwrap_err();
        assert!(err.to_string().contains("'C'"));
    }
}
