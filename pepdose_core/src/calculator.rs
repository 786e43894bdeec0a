//! Single-peptide dose calculator.
//!
//! Converts a reconstituted vial (strength + diluent volume) and a desired
//! dose into syringe units to draw, plus vial economics:
//! - Concentration, reported in mg/mL or mcg/mL by magnitude
//! - Whole doses per vial
//! - Days the vial lasts at a given frequency
//!
//! `calculate_dose` trusts its caller to have run
//! `validate_calculation_input` first; zero or negative inputs produce
//! infinite or NaN fields rather than an error. `try_calculate_dose` does
//! both steps and fails closed.

use crate::units::{display_concentration, ml_to_units, round2};
use crate::{CalculationInput, CalculationResult, Error, Result, Validation};

impl Validation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
        }
    }

    /// Convert into a `Result`, mapping failure to `Error::InvalidInput`
    pub fn into_result(self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(Error::InvalidInput(
                self.error.unwrap_or_else(|| "invalid input".to_string()),
            ))
        }
    }
}

/// Calculate syringe units and vial economics for a single peptide
///
/// ## Steps
///
/// 1. Normalize vial strength and dose to mcg
/// 2. Concentration = vial mcg / diluent mL
/// 3. Volume = dose mcg / concentration
/// 4. Units = volume x syringe graduations per mL
/// 5. Doses per vial = floor(vial mcg / dose mcg)
/// 6. Vial duration = doses x days per dose (0 without a frequency)
pub fn calculate_dose(input: &CalculationInput) -> CalculationResult {
    let vial_strength_mcg = input.vial_strength_unit.to_mcg(input.vial_strength);
    let desired_dose_mcg = input.desired_dose_unit.to_mcg(input.desired_dose);

    let concentration_mcg_per_ml = vial_strength_mcg / input.diluent_volume;
    let volume_needed_ml = desired_dose_mcg / concentration_mcg_per_ml;
    let units_to_draw = ml_to_units(volume_needed_ml, input.syringe_type);

    let total_doses = (vial_strength_mcg / desired_dose_mcg).floor() as u64;

    let vial_duration = match &input.dosing_frequency {
        Some(frequency) => total_doses as f64 * frequency.days_per_dose(),
        None => 0.0,
    };

    let (concentration, concentration_unit) = display_concentration(concentration_mcg_per_ml);

    tracing::debug!(
        "Dose: {} mcg from {} mcg in {} mL -> {:.4} mL ({} syringe)",
        desired_dose_mcg,
        vial_strength_mcg,
        input.diluent_volume,
        volume_needed_ml,
        input.syringe_type
    );

    CalculationResult {
        units_to_draw: round2(units_to_draw),
        concentration: round2(concentration),
        concentration_unit,
        total_doses,
        vial_duration,
    }
}

/// Check a single-dose input before calculating
///
/// The dose-versus-vial check compares the raw numbers in their own stated
/// units; callers are expected to pass the dose in the vial's unit.
pub fn validate_calculation_input(input: &CalculationInput) -> Validation {
    if input.vial_strength <= 0.0 {
        return Validation::fail("Vial strength must be greater than 0");
    }
    if input.diluent_volume <= 0.0 {
        return Validation::fail("Diluent volume must be greater than 0");
    }
    if input.desired_dose <= 0.0 {
        return Validation::fail("Desired dose must be greater than 0");
    }
    if input.desired_dose > input.vial_strength {
        return Validation::fail("Desired dose cannot exceed vial strength");
    }
    Validation::ok()
}

/// Validate, then calculate; rejects invalid input with `Error::InvalidInput`
pub fn try_calculate_dose(input: &CalculationInput) -> Result<CalculationResult> {
    validate_calculation_input(input).into_result()?;
    Ok(calculate_dose(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConcentrationUnit, DosingFrequency, MassUnit, SyringeType};

    fn base_input() -> CalculationInput {
        CalculationInput {
            peptide_id: None,
            vial_strength: 5.0,
            vial_strength_unit: MassUnit::Mg,
            diluent_volume: 2.0,
            syringe_type: SyringeType::U100,
            desired_dose: 250.0,
            desired_dose_unit: MassUnit::Mcg,
            dosing_frequency: None,
        }
    }

    #[test]
    fn test_u100_scenario() {
        let result = calculate_dose(&base_input());

        assert_eq!(result.concentration, 2.5);
        assert_eq!(result.concentration_unit, ConcentrationUnit::MgPerMl);
        assert_eq!(result.units_to_draw, 10.0);
        assert_eq!(result.total_doses, 20);
        assert_eq!(result.vial_duration, 0.0);
    }

    #[test]
    fn test_u40_scenario() {
        let mut input = base_input();
        input.syringe_type = SyringeType::U40;

        let result = calculate_dose(&input);
        assert_eq!(result.units_to_draw, 4.0);
        assert_eq!(result.total_doses, 20);
    }

    #[test]
    fn test_syringe_factor_property() {
        let units = |syringe| {
            let mut input = base_input();
            input.syringe_type = syringe;
            calculate_dose(&input).units_to_draw
        };

        let u100 = units(SyringeType::U100);
        assert_eq!(u100, units(SyringeType::Tuberculin));
        assert_eq!(u100, units(SyringeType::Standard1Ml));
        assert_eq!(u100, 2.5 * units(SyringeType::U40));
    }

    #[test]
    fn test_unit_invariance() {
        let in_mg = base_input();
        let in_mcg = CalculationInput {
            vial_strength: 5000.0,
            vial_strength_unit: MassUnit::Mcg,
            desired_dose: 0.25,
            desired_dose_unit: MassUnit::Mg,
            ..base_input()
        };

        let a = calculate_dose(&in_mg);
        let b = calculate_dose(&in_mcg);
        assert_eq!(a.units_to_draw, b.units_to_draw);
        assert_eq!(a.total_doses, b.total_doses);
        assert_eq!(a.concentration, b.concentration);
    }

    #[test]
    fn test_deterministic() {
        crate::logging::init_test();
        let input = base_input();
        assert_eq!(calculate_dose(&input), calculate_dose(&input));
    }

    #[test]
    fn test_low_concentration_reported_in_mcg() {
        let input = CalculationInput {
            vial_strength: 500.0,
            vial_strength_unit: MassUnit::Mcg,
            diluent_volume: 1.0,
            desired_dose: 100.0,
            ..base_input()
        };

        let result = calculate_dose(&input);
        assert_eq!(result.concentration, 500.0);
        assert_eq!(result.concentration_unit, ConcentrationUnit::McgPerMl);
        assert_eq!(result.units_to_draw, 20.0);
        assert_eq!(result.total_doses, 5);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        let input = CalculationInput {
            diluent_volume: 3.0,
            ..base_input()
        };

        let result = calculate_dose(&input);
        // 5000/3 mcg/mL -> 0.15 mL -> 15 units; concentration 1.6666 mg/mL
        assert_eq!(result.units_to_draw, 15.0);
        assert_eq!(result.concentration, 1.67);
    }

    #[test]
    fn test_total_doses_floors() {
        let input = CalculationInput {
            desired_dose: 300.0,
            ..base_input()
        };
        assert_eq!(calculate_dose(&input).total_doses, 16);
    }

    #[test]
    fn test_vial_duration_with_frequency() {
        let with = |frequency| {
            let input = CalculationInput {
                dosing_frequency: Some(frequency),
                ..base_input()
            };
            calculate_dose(&input).vial_duration
        };

        assert_eq!(with(DosingFrequency::Daily), 20.0);
        assert_eq!(with(DosingFrequency::EveryOtherDay), 40.0);
        assert_eq!(with(DosingFrequency::Weekly), 140.0);
        assert_eq!(with(DosingFrequency::TwiceWeekly), 70.0);
        assert_eq!(with(DosingFrequency::Custom { days_per_dose: 3.0 }), 60.0);
        assert_eq!(with(DosingFrequency::from_text("twice weekly")), 140.0);
    }

    #[test]
    fn test_unvalidated_zero_diluent_is_not_finite() {
        let input = CalculationInput {
            diluent_volume: 0.0,
            ..base_input()
        };

        let result = calculate_dose(&input);
        // infinite concentration, so no volume is ever drawn
        assert!(result.concentration.is_infinite());
        assert_eq!(result.units_to_draw, 0.0);
    }

    #[test]
    fn test_validation_accepts_valid_input() {
        let input = CalculationInput {
            desired_dose: 0.25,
            desired_dose_unit: MassUnit::Mg,
            ..base_input()
        };
        assert_eq!(validate_calculation_input(&input), Validation::ok());
    }

    #[test]
    fn test_validation_rejects_zero_fields() {
        let cases = [
            (
                CalculationInput {
                    vial_strength: 0.0,
                    ..base_input()
                },
                "Vial strength must be greater than 0",
            ),
            (
                CalculationInput {
                    diluent_volume: 0.0,
                    ..base_input()
                },
                "Diluent volume must be greater than 0",
            ),
            (
                CalculationInput {
                    desired_dose: 0.0,
                    ..base_input()
                },
                "Desired dose must be greater than 0",
            ),
        ];

        for (input, message) in cases {
            let validation = validate_calculation_input(&input);
            assert!(!validation.valid);
            assert_eq!(validation.error.as_deref(), Some(message));
        }
    }

    #[test]
    fn test_validation_dose_equal_to_vial_is_valid() {
        let input = CalculationInput {
            desired_dose: 5.0,
            desired_dose_unit: MassUnit::Mg,
            ..base_input()
        };
        assert!(validate_calculation_input(&input).valid);

        let over = CalculationInput {
            desired_dose: 5.01,
            ..input
        };
        let validation = validate_calculation_input(&over);
        assert!(!validation.valid);
        assert_eq!(
            validation.error.as_deref(),
            Some("Desired dose cannot exceed vial strength")
        );
    }

    #[test]
    fn test_validation_compares_raw_numbers() {
        // 250 mcg is less than 5 mg, but the check compares 250 > 5
        let validation = validate_calculation_input(&base_input());
        assert!(!validation.valid);
    }

    #[test]
    fn test_try_calculate_fails_closed() {
        let input = CalculationInput {
            diluent_volume: 0.0,
            ..base_input()
        };

        let err = try_calculate_dose(&input).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("Diluent volume"));
    }

    #[test]
    fn test_try_calculate_success() {
        let input = CalculationInput {
            desired_dose: 0.25,
            desired_dose_unit: MassUnit::Mg,
            ..base_input()
        };

        let result = try_calculate_dose(&input).unwrap();
        assert_eq!(result.units_to_draw, 10.0);
    }
}
