//! Unit normalization and syringe conversion.
//!
//! Every mass is converted to micrograms before any ratio is taken, so the
//! calculators never mix units in a single expression.

use crate::{ConcentrationUnit, Error, MassUnit, Result, SyringeType};
use std::fmt;
use std::str::FromStr;

/// Micrograms per milligram
pub const MCG_PER_MG: f64 = 1000.0;

impl MassUnit {
    /// Convert a value in this unit to micrograms
    pub fn to_mcg(self, value: f64) -> f64 {
        match self {
            MassUnit::Mg => value * MCG_PER_MG,
            MassUnit::Mcg => value,
        }
    }

    /// Convert a microgram value back into this unit
    pub fn from_mcg(self, mcg: f64) -> f64 {
        match self {
            MassUnit::Mg => mcg / MCG_PER_MG,
            MassUnit::Mcg => mcg,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MassUnit::Mg => "mg",
            MassUnit::Mcg => "mcg",
        }
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MassUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mg" => Ok(MassUnit::Mg),
            "mcg" | "ug" | "µg" => Ok(MassUnit::Mcg),
            other => Err(Error::Parse(format!("unknown mass unit '{}'", other))),
        }
    }
}

impl SyringeType {
    /// Graduation units per millilitre
    pub fn units_per_ml(self) -> f64 {
        match self {
            SyringeType::U100 | SyringeType::Tuberculin | SyringeType::Standard1Ml => 100.0,
            SyringeType::U40 => 40.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SyringeType::U100 => "u100",
            SyringeType::U40 => "u40",
            SyringeType::Tuberculin => "tuberculin",
            SyringeType::Standard1Ml => "standard_1ml",
        }
    }
}

impl fmt::Display for SyringeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyringeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "").as_str() {
            "u100" => Ok(SyringeType::U100),
            "u40" => Ok(SyringeType::U40),
            "tuberculin" => Ok(SyringeType::Tuberculin),
            "standard_1ml" | "standard1ml" => Ok(SyringeType::Standard1Ml),
            other => Err(Error::Parse(format!("unknown syringe type '{}'", other))),
        }
    }
}

impl fmt::Display for ConcentrationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcentrationUnit::MgPerMl => f.write_str("mg/mL"),
            ConcentrationUnit::McgPerMl => f.write_str("mcg/mL"),
        }
    }
}

/// Round to two decimals, halves rounding up
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Pick the display unit for a concentration given in mcg/mL
///
/// Anything at or above 1 mg/mL is shown in mg/mL, otherwise mcg/mL.
pub fn display_concentration(mcg_per_ml: f64) -> (f64, ConcentrationUnit) {
    let mg_per_ml = mcg_per_ml / MCG_PER_MG;
    if mg_per_ml >= 1.0 {
        (mg_per_ml, ConcentrationUnit::MgPerMl)
    } else {
        (mcg_per_ml, ConcentrationUnit::McgPerMl)
    }
}

/// Convert syringe units to millilitres
pub fn units_to_ml(units: f64, syringe: SyringeType) -> f64 {
    units / syringe.units_per_ml()
}

/// Convert millilitres to syringe units
pub fn ml_to_units(ml: f64, syringe: SyringeType) -> f64 {
    ml * syringe.units_per_ml()
}

/// Format a dose for display, switching sub-milligram values to mcg
pub fn format_dose(value: f64, unit: MassUnit) -> String {
    if unit == MassUnit::Mg && value < 1.0 {
        return format!("{} mcg", value * MCG_PER_MG);
    }
    format!("{} {}", value, unit)
}
