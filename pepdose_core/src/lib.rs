#![forbid(unsafe_code)]

//! Core domain model and dose arithmetic for the Pepdose system.
//!
//! This crate provides:
//! - Domain types (units, syringes, calculator inputs and results)
//! - Single-peptide and blend dose calculators with validation
//! - Peptide reference catalog
//! - Injection scheduling and CSV export
//! - Key-value persistence for saved calculations

pub mod types;
pub mod error;
pub mod units;
pub mod frequency;
pub mod calculator;
pub mod blend;
pub mod catalog;
pub mod schedule;
pub mod store;
pub mod csv_export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use calculator::{calculate_dose, try_calculate_dose, validate_calculation_input};
pub use blend::{calculate_blend_dose, try_calculate_blend_dose, validate_blend_input};
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use schedule::{generate_cycle_schedule, CycleSchedule, InjectionTemplate};
pub use store::{JsonFileStore, KeyValueStore};
