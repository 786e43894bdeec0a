//! Default peptide reference library.
//!
//! This module provides the built-in peptides and their commonly cited
//! dosing ranges. It is reference data only; nothing here feeds the
//! calculators except as a convenience for picking a frequency.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn effect(kind: SideEffectKind, description: &str, frequency: &str) -> SideEffect {
    SideEffect {
        kind,
        description: description.into(),
        frequency: Some(frequency.into()),
    }
}

fn range(min: f64, max: f64, unit: MassUnit, frequency: &str, cycle_length: &str) -> DosingRange {
    DosingRange {
        min,
        max,
        unit,
        frequency: frequency.into(),
        cycle_length: Some(cycle_length.into()),
    }
}

const FRIDGE: &str = "Store reconstituted solution in refrigerator (2-8°C)";

/// Builds the default catalog
///
/// Prefer `get_default_catalog()`, which returns a cached reference.
pub fn build_default_catalog() -> Catalog {
    use MassUnit::{Mcg, Mg};
    use PeptideCategory::*;
    use SideEffectKind::{Common, Rare};

    let entries = vec![
        Peptide {
            id: "bpc157".into(),
            name: "BPC-157".into(),
            scientific_name: "Body Protection Compound-157".into(),
            category: Recovery,
            mechanism: "Synthetic peptide derived from a protein found in gastric juice. \
                Promotes healing by increasing blood flow to damaged tissue, stimulating \
                new blood vessel formation and accelerating repair of tendons, ligaments \
                and muscle."
                .into(),
            benefits: strings(&[
                "Accelerates healing of injuries",
                "Reduces inflammation",
                "Protects and heals gut lining",
                "Improves joint health",
                "Enhances recovery from workouts",
            ]),
            dosing_range: range(200.0, 500.0, Mcg, "daily or twice daily", "4-8 weeks"),
            side_effects: vec![effect(Common, "Mild injection site redness", "Rare")],
            contraindications: strings(&["Pregnancy", "Lactation"]),
            research_notes: "Extensive research in animal models shows strong healing \
                properties. Human research is limited but promising."
                .into(),
            storage_requirements: Some(FRIDGE.into()),
            reconstitution_tips: Some(
                "Reconstitute with bacteriostatic water. Use within 30 days of reconstitution."
                    .into(),
            ),
        },
        Peptide {
            id: "tb500".into(),
            name: "TB-500".into(),
            scientific_name: "Thymosin Beta-4 Fragment".into(),
            category: Recovery,
            mechanism: "Synthetic version of a naturally occurring peptide involved in cell \
                development, migration and healing. Regulates actin and stimulates new \
                blood vessel formation."
                .into(),
            benefits: strings(&[
                "Accelerates wound healing",
                "Reduces inflammation",
                "Improves flexibility and range of motion",
                "Enhances muscle recovery",
                "Promotes hair growth",
            ]),
            dosing_range: range(2.0, 5.0, Mg, "twice weekly", "6-12 weeks"),
            side_effects: vec![effect(Common, "Mild injection site discomfort", "Rare")],
            contraindications: strings(&["Pregnancy", "Lactation", "Active cancer"]),
            research_notes: "Well-studied peptide with strong evidence for healing \
                properties. Often stacked with BPC-157."
                .into(),
            storage_requirements: Some(FRIDGE.into()),
            reconstitution_tips: Some(
                "Reconstitute with bacteriostatic water. Stable for 30 days after reconstitution."
                    .into(),
            ),
        },
        Peptide {
            id: "ipamorelin".into(),
            name: "Ipamorelin".into(),
            scientific_name: "Growth Hormone Releasing Peptide".into(),
            category: GrowthFactors,
            mechanism: "Growth hormone secretagogue that stimulates the pituitary to release \
                growth hormone without significantly raising cortisol or prolactin."
                .into(),
            benefits: strings(&[
                "Increases growth hormone levels",
                "Promotes fat loss",
                "Improves sleep quality",
                "Enhances muscle recovery",
                "May improve skin quality",
            ]),
            dosing_range: range(200.0, 500.0, Mcg, "daily (typically before bed)", "8-16 weeks"),
            side_effects: vec![
                effect(Common, "Mild hunger increase", "Common"),
                effect(Rare, "Water retention", "Rare"),
            ],
            contraindications: strings(&["Pregnancy", "Lactation", "Active cancer"]),
            research_notes: "Well-tolerated GHRP with minimal side effects. Often stacked \
                with CJC-1295."
                .into(),
            storage_requirements: Some(FRIDGE.into()),
            reconstitution_tips: Some(
                "Reconstitute with bacteriostatic water. Best taken on empty stomach.".into(),
            ),
        },
        Peptide {
            id: "cjc1295".into(),
            name: "CJC-1295".into(),
            scientific_name: "Growth Hormone Releasing Hormone Analog".into(),
            category: GrowthFactors,
            mechanism: "Modified growth hormone releasing hormone (GHRH) that binds GHRH \
                receptors in the pituitary and raises growth hormone and IGF-1."
                .into(),
            benefits: strings(&[
                "Increases growth hormone and IGF-1",
                "Promotes muscle growth",
                "Enhances fat loss",
                "Improves recovery",
                "May improve sleep",
            ]),
            dosing_range: range(1.0, 2.0, Mg, "daily or twice weekly", "8-16 weeks"),
            side_effects: vec![
                effect(Common, "Injection site redness", "Common"),
                effect(Rare, "Mild water retention", "Rare"),
            ],
            contraindications: strings(&["Pregnancy", "Lactation", "Active cancer"]),
            research_notes: "Effective GHRH analog. Commonly stacked with Ipamorelin."
                .into(),
            storage_requirements: Some(FRIDGE.into()),
            reconstitution_tips: Some(
                "Reconstitute with bacteriostatic water. Can be taken with or without Ipamorelin."
                    .into(),
            ),
        },
        Peptide {
            id: "epitalon".into(),
            name: "Epitalon".into(),
            scientific_name: "Epithalamin / Tetrapeptide".into(),
            category: AntiAging,
            mechanism: "Synthetic version of epithalamin, a pineal gland peptide. Believed \
                to help regulate circadian rhythm and support telomere health."
                .into(),
            benefits: strings(&[
                "May support healthy aging",
                "Improves sleep quality",
                "Regulates circadian rhythms",
                "May support telomere health",
                "Potential antioxidant effects",
            ]),
            dosing_range: range(
                5.0,
                10.0,
                Mg,
                "daily (typically before bed)",
                "10-20 days, repeated 2-3 times per year",
            ),
            side_effects: vec![effect(
                Rare,
                "Very well tolerated, minimal side effects",
                "Very rare",
            )],
            contraindications: strings(&["Pregnancy", "Lactation"]),
            research_notes: "Research primarily in animal models and some human studies."
                .into(),
            storage_requirements: Some(FRIDGE.into()),
            reconstitution_tips: Some(
                "Reconstitute with bacteriostatic water. Best taken before bedtime.".into(),
            ),
        },
        Peptide {
            id: "ghrp2".into(),
            name: "GHRP-2".into(),
            scientific_name: "Growth Hormone Releasing Peptide-2".into(),
            category: GrowthFactors,
            mechanism: "Growth hormone secretagogue, more potent than Ipamorelin but with \
                more hunger and slight cortisol and prolactin increases."
                .into(),
            benefits: strings(&[
                "Increases growth hormone",
                "Promotes fat loss",
                "Enhances muscle recovery",
                "May improve sleep",
            ]),
            dosing_range: range(100.0, 300.0, Mcg, "2-3 times daily", "8-16 weeks"),
            side_effects: vec![
                effect(Common, "Increased hunger", "Very common"),
                effect(Common, "Mild water retention", "Common"),
            ],
            contraindications: strings(&["Pregnancy", "Lactation", "Active cancer"]),
            research_notes: "Effective but may cause more side effects than Ipamorelin."
                .into(),
            storage_requirements: Some(FRIDGE.into()),
            reconstitution_tips: Some(
                "Reconstitute with bacteriostatic water. Take on empty stomach.".into(),
            ),
        },
        Peptide {
            id: "pt141".into(),
            name: "PT-141 (Bremelanotide)".into(),
            scientific_name: "Melanotan II Fragment".into(),
            category: Metabolic,
            mechanism: "Activates melanocortin receptors, particularly MC4R. FDA-approved \
                for certain sexual dysfunctions."
                .into(),
            benefits: strings(&[
                "May support metabolic health",
                "FDA-approved for certain conditions",
                "Well-researched",
            ]),
            dosing_range: range(1.0, 2.0, Mg, "as needed or weekly", "Varies"),
            side_effects: vec![
                effect(Common, "Nausea", "Common"),
                effect(Common, "Flushing", "Common"),
            ],
            contraindications: strings(&["Pregnancy", "Lactation", "Cardiovascular disease"]),
            research_notes: "FDA-approved peptide with extensive research.".into(),
            storage_requirements: Some(FRIDGE.into()),
            reconstitution_tips: Some(
                "Reconstitute with bacteriostatic water. Follow medical guidance.".into(),
            ),
        },
        Peptide {
            id: "semax".into(),
            name: "Semax".into(),
            scientific_name: "ACTH(4-10) Analog".into(),
            category: Cognitive,
            mechanism: "ACTH-derived peptide that raises BDNF and improves neurotransmitter \
                activity. May be neuroprotective."
                .into(),
            benefits: strings(&[
                "Enhances cognitive function",
                "Improves memory and focus",
                "May have neuroprotective effects",
                "Increases mental clarity",
                "Supports brain health",
            ]),
            dosing_range: range(200.0, 600.0, Mcg, "daily (intranasal or injection)", "4-12 weeks"),
            side_effects: vec![effect(
                Rare,
                "Very well tolerated, minimal side effects",
                "Very rare",
            )],
            contraindications: strings(&["Pregnancy", "Lactation"]),
            research_notes: "Extensively researched in Russia for cognitive enhancement \
                and neuroprotection."
                .into(),
            storage_requirements: Some("Store in refrigerator (2-8°C). Protect from light.".into()),
            reconstitution_tips: Some(
                "Can be used intranasally or via injection. Follow manufacturer instructions."
                    .into(),
            ),
        },
        Peptide {
            id: "selank".into(),
            name: "Selank".into(),
            scientific_name: "Thymus-Derived Peptide".into(),
            category: Cognitive,
            mechanism: "Modulates immune function and neurotransmitter systems. May be \
                anxiolytic and cognitive-enhancing."
                .into(),
            benefits: strings(&[
                "Reduces anxiety",
                "Improves mood",
                "Enhances cognitive function",
                "May improve sleep",
                "Supports immune function",
            ]),
            dosing_range: range(200.0, 400.0, Mcg, "daily (intranasal or injection)", "4-8 weeks"),
            side_effects: vec![effect(Rare, "Very well tolerated", "Very rare")],
            contraindications: strings(&["Pregnancy", "Lactation"]),
            research_notes: "Research primarily in Russia. Often used alongside Semax."
                .into(),
            storage_requirements: Some("Store in refrigerator (2-8°C)".into()),
            reconstitution_tips: Some(
                "Commonly used intranasally. Can also be injected subcutaneously.".into(),
            ),
        },
        Peptide {
            id: "ghkcu".into(),
            name: "GHK-Cu".into(),
            scientific_name: "Copper Peptide".into(),
            category: Skin,
            mechanism: "Naturally occurring copper-binding peptide that promotes wound \
                healing and collagen production. Anti-inflammatory and antioxidant."
                .into(),
            benefits: strings(&[
                "Improves skin quality",
                "Promotes collagen production",
                "Reduces wrinkles",
                "Enhances wound healing",
                "Has antioxidant effects",
            ]),
            dosing_range: range(1.0, 2.0, Mg, "daily or EOD", "8-16 weeks"),
            side_effects: vec![effect(Rare, "Mild injection site irritation", "Rare")],
            contraindications: strings(&["Pregnancy", "Lactation", "Copper sensitivity"]),
            research_notes: "Well-researched for skin health. Also common in topical \
                formulations."
                .into(),
            storage_requirements: Some(FRIDGE.into()),
            reconstitution_tips: Some(
                "Reconstitute with bacteriostatic water. Can be used topically or injected."
                    .into(),
            ),
        },
        Peptide {
            id: "dsip".into(),
            name: "DSIP".into(),
            scientific_name: "Delta Sleep-Inducing Peptide".into(),
            category: Sleep,
            mechanism: "Naturally occurring peptide that promotes deep sleep by influencing \
                sleep-wake cycles and neurotransmitter activity."
                .into(),
            benefits: strings(&[
                "Improves sleep quality",
                "Promotes deep sleep",
                "May help with insomnia",
                "Supports circadian rhythm",
                "May reduce stress",
            ]),
            dosing_range: range(100.0, 200.0, Mcg, "daily (before bed)", "4-8 weeks"),
            side_effects: vec![effect(Rare, "Very well tolerated", "Very rare")],
            contraindications: strings(&["Pregnancy", "Lactation"]),
            research_notes: "Promising for sleep improvement. Best taken before bedtime."
                .into(),
            storage_requirements: Some(FRIDGE.into()),
            reconstitution_tips: Some(
                "Reconstitute with bacteriostatic water. Take 30-60 minutes before bed.".into(),
            ),
        },
        Peptide {
            id: "hexarelin".into(),
            name: "Hexarelin".into(),
            scientific_name: "Growth Hormone Releasing Hexapeptide".into(),
            category: GrowthFactors,
            mechanism: "Strong growth hormone secretagogue, more potent than GHRP-2, with \
                more hunger and cortisol increase."
                .into(),
            benefits: strings(&[
                "Strongly increases growth hormone",
                "Promotes muscle growth",
                "Enhances fat loss",
                "Improves recovery",
            ]),
            dosing_range: range(100.0, 200.0, Mcg, "2-3 times daily", "8-16 weeks"),
            side_effects: vec![
                effect(Common, "Increased hunger", "Very common"),
                effect(Common, "May increase cortisol", "Common"),
            ],
            contraindications: strings(&["Pregnancy", "Lactation", "Active cancer"]),
            research_notes: "Very potent GHRP. May cause more side effects than Ipamorelin \
                or GHRP-2."
                .into(),
            storage_requirements: Some(FRIDGE.into()),
            reconstitution_tips: Some(
                "Reconstitute with bacteriostatic water. Take on empty stomach.".into(),
            ),
        },
    ];

    let peptides = entries
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect::<HashMap<_, _>>();

    Catalog { peptides }
}

impl Catalog {
    /// Look up a peptide by id
    pub fn get(&self, id: &str) -> Option<&Peptide> {
        self.peptides.get(id)
    }

    /// Look up a peptide by id, failing with `Error::UnknownPeptide`
    pub fn require(&self, id: &str) -> Result<&Peptide> {
        self.get(id)
            .ok_or_else(|| Error::UnknownPeptide(id.to_string()))
    }

    /// All peptides, sorted by name
    pub fn all(&self) -> Vec<&Peptide> {
        let mut peptides: Vec<_> = self.peptides.values().collect();
        peptides.sort_by(|a, b| a.name.cmp(&b.name));
        peptides
    }

    /// Peptides in a category, sorted by name
    pub fn by_category(&self, category: PeptideCategory) -> Vec<&Peptide> {
        self.all()
            .into_iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Case-insensitive substring match on name or scientific name, sorted by name
    ///
    /// An empty query matches every peptide.
    pub fn search(&self, query: &str) -> Vec<&Peptide> {
        let query = query.trim().to_lowercase();
        self.all()
            .into_iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.scientific_name.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Check the catalog for internal consistency
    ///
    /// Returns a list of problems; empty means the catalog is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut names = HashSet::new();

        for (key, peptide) in &self.peptides {
            if key != &peptide.id {
                errors.push(format!(
                    "Peptide '{}' stored under mismatched key '{}'",
                    peptide.id, key
                ));
            }
            if peptide.name.trim().is_empty() {
                errors.push(format!("Peptide '{}' has an empty name", peptide.id));
            } else if !names.insert(peptide.name.as_str()) {
                errors.push(format!("Duplicate peptide name '{}'", peptide.name));
            }

            if peptide.scientific_name.trim().is_empty() {
                errors.push(format!("Peptide '{}' has an empty scientific name", peptide.id));
            }

            let range = &peptide.dosing_range;
            if range.min <= 0.0 || range.max <= 0.0 {
                errors.push(format!(
                    "Peptide '{}': dosing range must be positive",
                    peptide.id
                ));
            }
            if range.min > range.max {
                errors.push(format!(
                    "Peptide '{}': min dose {} > max {}",
                    peptide.id, range.min, range.max
                ));
            }
        }

        errors
    }
}

impl Peptide {
    /// Frequency implied by the reference dosing text
    pub fn dosing_frequency(&self) -> DosingFrequency {
        DosingFrequency::from_text(&self.dosing_range.frequency)
    }
}

impl PeptideCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PeptideCategory::GrowthFactors => "growth_factors",
            PeptideCategory::Metabolic => "metabolic",
            PeptideCategory::Cognitive => "cognitive",
            PeptideCategory::Recovery => "recovery",
            PeptideCategory::AntiAging => "anti_aging",
            PeptideCategory::Skin => "skin",
            PeptideCategory::Sleep => "sleep",
        }
    }
}

impl SideEffectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SideEffectKind::Common => "common",
            SideEffectKind::Rare => "rare",
            SideEffectKind::Serious => "serious",
        }
    }
}

impl fmt::Display for PeptideCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeptideCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "growth_factors" => Ok(PeptideCategory::GrowthFactors),
            "metabolic" => Ok(PeptideCategory::Metabolic),
            "cognitive" => Ok(PeptideCategory::Cognitive),
            "recovery" => Ok(PeptideCategory::Recovery),
            "anti_aging" => Ok(PeptideCategory::AntiAging),
            "skin" => Ok(PeptideCategory::Skin),
            "sleep" => Ok(PeptideCategory::Sleep),
            other => Err(Error::Parse(format!("unknown peptide category '{}'", other))),
        }
    }
}
