//! Core domain types for the Pepdose system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Mass, concentration and syringe units
//! - Dose and blend calculator inputs and results
//! - Peptide reference data
//! - Scheduled injections and saved calculations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Unit Types
// ============================================================================

/// Mass unit for vial strengths, doses and blend components
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MassUnit {
    Mg,
    Mcg,
}

/// Unit a concentration is reported in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConcentrationUnit {
    #[serde(rename = "mg/mL")]
    MgPerMl,
    #[serde(rename = "mcg/mL")]
    McgPerMl,
}

/// Syringe the dose is drawn with
///
/// U-100, tuberculin and standard 1 mL syringes are all graduated at
/// 100 units per mL; only U-40 differs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SyringeType {
    #[default]
    #[serde(rename = "u100")]
    U100,
    #[serde(rename = "u40")]
    U40,
    #[serde(rename = "tuberculin")]
    Tuberculin,
    #[serde(rename = "standard_1ml")]
    Standard1Ml,
}

/// How often a dose is taken, used to estimate how long a vial lasts
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DosingFrequency {
    Daily,
    EveryOtherDay,
    Weekly,
    TwiceWeekly,
    /// Anything not covered above, with an explicit interval
    Custom { days_per_dose: f64 },
}

// ============================================================================
// Single Dose Calculator Types
// ============================================================================

/// Input for a single-peptide dose calculation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalculationInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peptide_id: Option<String>,
    pub vial_strength: f64,
    pub vial_strength_unit: MassUnit,
    /// Bacteriostatic water added to the vial, in mL
    pub diluent_volume: f64,
    pub syringe_type: SyringeType,
    pub desired_dose: f64,
    pub desired_dose_unit: MassUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosing_frequency: Option<DosingFrequency>,
}

/// Output of a single-peptide dose calculation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalculationResult {
    pub units_to_draw: f64,
    pub concentration: f64,
    pub concentration_unit: ConcentrationUnit,
    pub total_doses: u64,
    /// Days the vial lasts; 0 when no frequency was given
    pub vial_duration: f64,
}

/// Outcome of an input validation check
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Blend Calculator Types
// ============================================================================

/// One peptide in a multi-peptide vial
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BlendComponent {
    pub peptide_id: String,
    pub peptide_name: String,
    pub amount: f64,
    pub unit: MassUnit,
}

/// Input for a blend dose calculation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BlendCalculationInput {
    pub components: Vec<BlendComponent>,
    pub total_vial_strength: f64,
    pub vial_strength_unit: MassUnit,
    pub diluent_volume: f64,
    pub syringe_type: SyringeType,
    pub desired_dose: f64,
    pub desired_dose_unit: MassUnit,
}

/// Per-component share of a blend dose
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ComponentResult {
    pub peptide_name: String,
    /// Amount of this component in one dose, in `unit`
    pub amount_in_dose: f64,
    pub unit: MassUnit,
    pub units_to_draw: f64,
    pub percentage: f64,
}

/// Output of a blend dose calculation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BlendCalculationResult {
    pub total_units_to_draw: f64,
    pub total_concentration: f64,
    pub concentration_unit: ConcentrationUnit,
    pub total_doses: u64,
    pub component_results: Vec<ComponentResult>,
}

// ============================================================================
// Peptide Reference Types
// ============================================================================

/// Broad therapeutic category of a peptide
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PeptideCategory {
    GrowthFactors,
    Metabolic,
    Cognitive,
    Recovery,
    AntiAging,
    Skin,
    Sleep,
}

/// Commonly cited dosing range for a peptide
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DosingRange {
    pub min: f64,
    pub max: f64,
    pub unit: MassUnit,
    /// Free-text frequency, e.g. "daily or EOD"
    pub frequency: String,
    pub cycle_length: Option<String>,
}

/// How often a side effect shows up
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SideEffectKind {
    Common,
    Rare,
    Serious,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SideEffect {
    pub kind: SideEffectKind,
    pub description: String,
    /// Reported incidence, e.g. "Rare" or "Very common"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
}

/// A peptide reference entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Peptide {
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    pub category: PeptideCategory,
    pub mechanism: String,
    pub benefits: Vec<String>,
    pub dosing_range: DosingRange,
    pub side_effects: Vec<SideEffect>,
    pub contraindications: Vec<String>,
    pub research_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconstitution_tips: Option<String>,
}

// ============================================================================
// Schedule and History Types
// ============================================================================

/// Interval between scheduled injections
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleFrequency {
    #[default]
    Daily,
    Eod,
    Weekly,
    Biweekly,
}

/// Lifecycle state of a scheduled injection
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InjectionStatus {
    Scheduled,
    Completed,
    Missed,
    Skipped,
}

/// A single planned injection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduledInjection {
    pub id: Uuid,
    pub peptide_id: String,
    pub peptide_name: String,
    pub scheduled_time: DateTime<Utc>,
    pub dose: f64,
    pub unit: MassUnit,
    pub status: InjectionStatus,
    /// Set when the injection is marked completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A calculation the user chose to keep
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedCalculation {
    pub id: Uuid,
    pub name: String,
    pub input: CalculationInput,
    pub result: CalculationResult,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Catalog Type
// ============================================================================

/// The peptide reference library, keyed by peptide id
#[derive(Clone, Debug)]
pub struct Catalog {
    pub peptides: HashMap<String, Peptide>,
}
