//! Multi-peptide blend calculator.
//!
//! A blend vial holds several peptides in a fixed ratio. One draw delivers
//! all of them at once, so the aggregate draw is computed exactly like a
//! single dose against the total vial strength, then split by each
//! component's share of the total mass.

use crate::units::{display_concentration, ml_to_units, round2};
use crate::{
    BlendCalculationInput, BlendCalculationResult, ComponentResult, Result, Validation,
};

/// Component mass may exceed the stated vial strength by this fraction
pub const BLEND_TOLERANCE: f64 = 0.01;

/// Calculate the aggregate draw and per-component breakdown for a blend
///
/// Components are handled independently: percentages are each component's
/// share of the stated vial strength and are not rescaled to sum to 100.
pub fn calculate_blend_dose(input: &BlendCalculationInput) -> BlendCalculationResult {
    let total_vial_strength_mcg = input.vial_strength_unit.to_mcg(input.total_vial_strength);
    let desired_dose_mcg = input.desired_dose_unit.to_mcg(input.desired_dose);

    let total_concentration_mcg_per_ml = total_vial_strength_mcg / input.diluent_volume;
    let volume_needed_ml = desired_dose_mcg / total_concentration_mcg_per_ml;
    let total_units_to_draw = ml_to_units(volume_needed_ml, input.syringe_type);

    let component_results = input
        .components
        .iter()
        .map(|component| {
            let amount_mcg = component.unit.to_mcg(component.amount);
            let percentage = amount_mcg / total_vial_strength_mcg * 100.0;
            let amount_in_dose_mcg = desired_dose_mcg * percentage / 100.0;
            let units_to_draw = total_units_to_draw * percentage / 100.0;

            ComponentResult {
                peptide_name: component.peptide_name.clone(),
                amount_in_dose: round2(component.unit.from_mcg(amount_in_dose_mcg)),
                unit: component.unit,
                units_to_draw: round2(units_to_draw),
                percentage: round2(percentage),
            }
        })
        .collect();

    let total_doses = (total_vial_strength_mcg / desired_dose_mcg).floor() as u64;

    let (total_concentration, concentration_unit) =
        display_concentration(total_concentration_mcg_per_ml);

    tracing::debug!(
        "Blend: {} components, {} mcg per dose from {} mcg vial -> {:.4} mL",
        input.components.len(),
        desired_dose_mcg,
        total_vial_strength_mcg,
        volume_needed_ml
    );

    BlendCalculationResult {
        total_units_to_draw: round2(total_units_to_draw),
        total_concentration: round2(total_concentration),
        concentration_unit,
        total_doses,
        component_results,
    }
}

/// Check a blend input before calculating; first failing check wins
pub fn validate_blend_input(input: &BlendCalculationInput) -> Validation {
    if input.components.len() < 2 {
        return Validation::fail("Blend must contain at least 2 peptides");
    }
    if input.total_vial_strength <= 0.0 {
        return Validation::fail("Total vial strength must be greater than 0");
    }
    if input.diluent_volume <= 0.0 {
        return Validation::fail("Diluent volume must be greater than 0");
    }
    if input.desired_dose <= 0.0 {
        return Validation::fail("Desired dose must be greater than 0");
    }

    let total_component_mcg: f64 = input
        .components
        .iter()
        .map(|c| c.unit.to_mcg(c.amount))
        .sum();
    let total_vial_mcg = input.vial_strength_unit.to_mcg(input.total_vial_strength);

    if total_component_mcg > total_vial_mcg * (1.0 + BLEND_TOLERANCE) {
        return Validation::fail("Component amounts exceed total vial strength");
    }

    Validation::ok()
}

/// Validate, then calculate; rejects invalid input with `Error::InvalidInput`
pub fn try_calculate_blend_dose(input: &BlendCalculationInput) -> Result<BlendCalculationResult> {
    validate_blend_input(input).into_result()?;
    Ok(calculate_blend_dose(input))
}
