use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use pepdose_core::schedule::MAX_CYCLE_WEEKS;
use pepdose_core::store::{
    delete_calculation, delete_injection, load_calculations, load_injections, save_calculation,
    save_injections, update_injection_status,
};
use pepdose_core::units::format_dose;
use pepdose_core::*;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "pepdose")]
#[command(about = "Peptide reconstitution and dosing calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate syringe units for a single-peptide vial
    Dose {
        /// Amount of peptide in the vial
        #[arg(long)]
        vial_strength: f64,

        /// Unit of the vial strength (mg, mcg)
        #[arg(long, default_value = "mg")]
        vial_unit: MassUnit,

        /// Diluent added to the vial, in mL
        #[arg(long)]
        diluent: f64,

        /// Desired dose per injection
        #[arg(long)]
        dose: f64,

        /// Unit of the desired dose (defaults to config)
        #[arg(long)]
        dose_unit: Option<MassUnit>,

        /// Syringe type (u100, u40, tuberculin, standard_1ml)
        #[arg(long)]
        syringe: Option<SyringeType>,

        /// Dosing frequency ("daily", "eod", "weekly", or days between doses)
        #[arg(long)]
        frequency: Option<DosingFrequency>,

        /// Catalog peptide id; supplies a default frequency
        #[arg(long)]
        peptide: Option<String>,

        /// Save the calculation under this name
        #[arg(long)]
        save: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Calculate a dose drawn from a multi-peptide blend vial
    Blend {
        /// Total peptide mass in the vial
        #[arg(long)]
        vial_strength: f64,

        #[arg(long, default_value = "mg")]
        vial_unit: MassUnit,

        /// Diluent added to the vial, in mL
        #[arg(long)]
        diluent: f64,

        /// Desired total dose per injection
        #[arg(long)]
        dose: f64,

        #[arg(long)]
        dose_unit: Option<MassUnit>,

        #[arg(long)]
        syringe: Option<SyringeType>,

        /// Blend component as ID=AMOUNT, e.g. bpc157=3mg (repeatable)
        #[arg(long = "component", required = true)]
        components: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse the peptide reference library
    Library {
        /// Only show one category
        #[arg(long)]
        category: Option<PeptideCategory>,

        /// Show full details for a single peptide
        #[arg(long)]
        id: Option<String>,

        /// Match name or scientific name, ignoring case
        #[arg(long)]
        search: Option<String>,
    },

    /// Plan the injections of a dosing cycle
    Schedule {
        /// Catalog peptide id
        #[arg(long)]
        peptide: String,

        #[arg(long)]
        dose: f64,

        #[arg(long)]
        dose_unit: Option<MassUnit>,

        /// Cycle length in weeks
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_CYCLE_WEEKS)))]
        weeks: u32,

        /// daily, eod, weekly or biweekly (defaults to config)
        #[arg(long)]
        frequency: Option<ScheduleFrequency>,

        /// First injection as RFC 3339 (defaults to now)
        #[arg(long)]
        start: Option<String>,

        /// Store the injections
        #[arg(long)]
        save: bool,

        /// Also write the schedule to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// List stored injections that are due or overdue
    Due {
        /// List every stored injection with its status
        #[arg(long)]
        all: bool,
    },

    /// Mark a stored injection as completed
    Complete {
        /// Injection id, as shown by `due`
        id: Uuid,
    },

    /// Mark a stored injection as skipped
    Skip { id: Uuid },

    /// Mark a stored injection as missed
    Miss { id: Uuid },

    /// Remove a stored injection
    Cancel { id: Uuid },

    /// List saved calculations
    History {
        /// Delete the saved calculation with this id
        #[arg(long)]
        delete: Option<Uuid>,
    },
}

fn main() -> Result<()> {
    pepdose_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);
    let store = JsonFileStore::new(data_dir);

    match cli.command {
        Commands::Dose {
            vial_strength,
            vial_unit,
            diluent,
            dose,
            dose_unit,
            syringe,
            frequency,
            peptide,
            save,
            json,
        } => {
            let dose_unit = dose_unit.unwrap_or(config.calculator.default_dose_unit);
            let frequency = match (frequency, &peptide) {
                (Some(f), _) => Some(f),
                (None, Some(id)) => Some(get_default_catalog().require(id)?.dosing_frequency()),
                (None, None) => None,
            };

            // Validation compares raw numbers, so both quantities go in as mcg
            let input = CalculationInput {
                peptide_id: peptide,
                vial_strength: vial_unit.to_mcg(vial_strength),
                vial_strength_unit: MassUnit::Mcg,
                diluent_volume: diluent,
                syringe_type: syringe.unwrap_or(config.calculator.default_syringe),
                desired_dose: dose_unit.to_mcg(dose),
                desired_dose_unit: MassUnit::Mcg,
                dosing_frequency: frequency,
            };
            cmd_dose(&store, input, save, json)
        }
        Commands::Blend {
            vial_strength,
            vial_unit,
            diluent,
            dose,
            dose_unit,
            syringe,
            components,
            json,
        } => {
            let components = components
                .iter()
                .map(|c| parse_component(c))
                .collect::<Result<Vec<_>>>()?;

            let input = BlendCalculationInput {
                components,
                total_vial_strength: vial_strength,
                vial_strength_unit: vial_unit,
                diluent_volume: diluent,
                syringe_type: syringe.unwrap_or(config.calculator.default_syringe),
                desired_dose: dose,
                desired_dose_unit: dose_unit.unwrap_or(config.calculator.default_dose_unit),
            };
            cmd_blend(input, json)
        }
        Commands::Library {
            category,
            id,
            search,
        } => cmd_library(category, id, search),
        Commands::Schedule {
            peptide,
            dose,
            dose_unit,
            weeks,
            frequency,
            start,
            save,
            csv,
        } => {
            let peptide = get_default_catalog().require(&peptide)?;
            let template = InjectionTemplate {
                peptide_id: peptide.id.clone(),
                peptide_name: peptide.name.clone(),
                dose,
                unit: dose_unit.unwrap_or(config.calculator.default_dose_unit),
            };
            let start = match start {
                Some(s) => parse_start(&s)?,
                None => Utc::now(),
            };
            let frequency = frequency.unwrap_or(config.schedule.default_frequency);
            cmd_schedule(&store, &template, start, weeks, frequency, save, csv)
        }
        Commands::Due { all } => cmd_due(&store, &config, all),
        Commands::Complete { id } => cmd_mark(&store, id, InjectionStatus::Completed),
        Commands::Skip { id } => cmd_mark(&store, id, InjectionStatus::Skipped),
        Commands::Miss { id } => cmd_mark(&store, id, InjectionStatus::Missed),
        Commands::Cancel { id } => {
            delete_injection(&store, id)?;
            println!("✓ Injection {} removed", id);
            Ok(())
        }
        Commands::History { delete } => cmd_history(&store, delete),
    }
}

fn cmd_dose(
    store: &JsonFileStore,
    input: CalculationInput,
    save: Option<String>,
    json: bool,
) -> Result<()> {
    let result = try_calculate_dose(&input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  Draw {} units on a {} syringe",
            result.units_to_draw, input.syringe_type
        );
        println!(
            "  Concentration: {} {}",
            result.concentration, result.concentration_unit
        );
        println!("  Doses per vial: {}", result.total_doses);
        if let Some(ref frequency) = input.dosing_frequency {
            println!(
                "  Vial lasts: {} days ({})",
                result.vial_duration, frequency
            );
        }
        println!();
    }

    if let Some(name) = save {
        let saved = SavedCalculation {
            id: uuid::Uuid::new_v4(),
            name,
            input,
            result,
            created_at: Utc::now(),
        };
        save_calculation(store, saved)?;
        if !json {
            println!("✓ Calculation saved");
        }
    }

    Ok(())
}

fn cmd_blend(input: BlendCalculationInput, json: bool) -> Result<()> {
    let result = try_calculate_blend_dose(&input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    println!(
        "  Draw {} units on a {} syringe",
        result.total_units_to_draw, input.syringe_type
    );
    println!(
        "  Concentration: {} {}",
        result.total_concentration, result.concentration_unit
    );
    println!("  Doses per vial: {}", result.total_doses);
    println!();

    for component in &result.component_results {
        println!(
            "  → {}: {} ({}%, {} units)",
            component.peptide_name,
            format_dose(component.amount_in_dose, component.unit),
            component.percentage,
            component.units_to_draw
        );
    }
    println!();

    Ok(())
}

fn cmd_library(
    category: Option<PeptideCategory>,
    id: Option<String>,
    search: Option<String>,
) -> Result<()> {
    let catalog = get_default_catalog();

    if let Some(id) = id {
        print_peptide_details(catalog.require(&id)?);
        return Ok(());
    }

    let mut peptides = match search {
        Some(query) => catalog.search(&query),
        None => catalog.all(),
    };
    if let Some(category) = category {
        peptides.retain(|p| p.category == category);
    }

    if peptides.is_empty() {
        println!("No matching peptides.");
    }

    for peptide in peptides {
        let range = &peptide.dosing_range;
        println!("{} [{}] ({})", peptide.name, peptide.id, peptide.category);
        println!(
            "  {}-{} {}, {}",
            range.min, range.max, range.unit, range.frequency
        );
        if let Some(ref cycle) = range.cycle_length {
            println!("  Cycle: {}", cycle);
        }
    }

    Ok(())
}

fn print_peptide_details(peptide: &Peptide) {
    let range = &peptide.dosing_range;

    println!("{} [{}]", peptide.name, peptide.id);
    println!("  {}", peptide.scientific_name);
    println!("  Category: {}", peptide.category);
    println!();
    println!("  {}", peptide.mechanism);
    println!();
    println!(
        "  Dosing: {}-{} {}, {}",
        range.min, range.max, range.unit, range.frequency
    );
    if let Some(ref cycle) = range.cycle_length {
        println!("  Cycle: {}", cycle);
    }

    println!();
    println!("  Benefits:");
    for benefit in &peptide.benefits {
        println!("    - {}", benefit);
    }

    println!("  Side effects:");
    for effect in &peptide.side_effects {
        match effect.frequency {
            Some(ref frequency) => println!(
                "    - {} ({}, {})",
                effect.description,
                effect.kind.as_str(),
                frequency
            ),
            None => println!("    - {} ({})", effect.description, effect.kind.as_str()),
        }
    }

    println!("  Contraindications: {}", peptide.contraindications.join(", "));
    println!();
    println!("  Research: {}", peptide.research_notes);
    if let Some(ref storage) = peptide.storage_requirements {
        println!("  Storage: {}", storage);
    }
    if let Some(ref tips) = peptide.reconstitution_tips {
        println!("  Reconstitution: {}", tips);
    }
}

fn cmd_schedule(
    store: &JsonFileStore,
    template: &InjectionTemplate,
    start: DateTime<Utc>,
    weeks: u32,
    frequency: ScheduleFrequency,
    save: bool,
    csv: Option<PathBuf>,
) -> Result<()> {
    let schedule = generate_cycle_schedule(template, start, weeks, frequency)?;

    println!(
        "{} {} {}, {} injections from {} to {}",
        template.peptide_name,
        format_dose(template.dose, template.unit),
        frequency,
        schedule.injections.len(),
        schedule.start_date.format("%Y-%m-%d"),
        schedule.end_date.format("%Y-%m-%d")
    );
    for injection in &schedule.injections {
        println!("  {}", injection.scheduled_time.format("%Y-%m-%d %H:%M"));
    }

    if let Some(path) = csv {
        let count = pepdose_core::csv_export::write_schedule_csv(&schedule.injections, &path)?;
        println!("✓ Wrote {} injections to {}", count, path.display());
    }

    if save {
        save_injections(store, &schedule.injections)?;
        println!("✓ Schedule saved");
    }

    Ok(())
}

fn cmd_due(store: &JsonFileStore, config: &Config, all: bool) -> Result<()> {
    let now = Utc::now();
    let grace = config.schedule.grace_period();
    let injections = load_injections(store)?;

    let mut shown = 0;
    for injection in &injections {
        let label = if injection.is_overdue(now, grace) {
            "OVERDUE".to_string()
        } else if injection.is_due(now, grace) {
            "DUE".to_string()
        } else if all {
            injection.status.as_str().to_uppercase()
        } else {
            continue;
        };
        shown += 1;
        println!(
            "{:<9} {} {} at {}  [{}]",
            label,
            injection.peptide_name,
            format_dose(injection.dose, injection.unit),
            injection.scheduled_time.format("%Y-%m-%d %H:%M"),
            injection.id
        );
    }

    if shown == 0 {
        println!("Nothing due.");
    }

    Ok(())
}

fn cmd_mark(store: &JsonFileStore, id: Uuid, status: InjectionStatus) -> Result<()> {
    let injection = update_injection_status(store, id, status, Utc::now())?;
    println!(
        "✓ {} {} at {} marked {}",
        injection.peptide_name,
        format_dose(injection.dose, injection.unit),
        injection.scheduled_time.format("%Y-%m-%d %H:%M"),
        injection.status
    );
    Ok(())
}

fn cmd_history(store: &JsonFileStore, delete: Option<Uuid>) -> Result<()> {
    if let Some(id) = delete {
        delete_calculation(store, id)?;
        println!("✓ Calculation {} deleted", id);
        return Ok(());
    }

    let saved = load_calculations(store)?;

    if saved.is_empty() {
        println!("No saved calculations.");
        return Ok(());
    }

    for calc in &saved {
        println!(
            "{}  {}: {} units ({} {}), {} doses  [{}]",
            calc.created_at.format("%Y-%m-%d"),
            calc.name,
            calc.result.units_to_draw,
            calc.result.concentration,
            calc.result.concentration_unit,
            calc.result.total_doses,
            calc.id
        );
    }

    Ok(())
}

/// Parse `ID=AMOUNT` into a blend component, naming it from the catalog if known
fn parse_component(arg: &str) -> Result<BlendComponent> {
    let (id, amount) = arg
        .split_once('=')
        .ok_or_else(|| Error::Parse(format!("component '{}' must look like ID=AMOUNT", arg)))?;
    let id = id.trim();
    let (amount, unit) = parse_amount(amount)?;

    let peptide_name = get_default_catalog()
        .get(id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| id.to_string());

    Ok(BlendComponent {
        peptide_id: id.to_string(),
        peptide_name,
        amount,
        unit,
    })
}

/// Parse an amount with a unit suffix such as `3mg`, `500 mcg` or `1e3mcg`
fn parse_amount(text: &str) -> Result<(f64, MassUnit)> {
    let text = text.trim();
    let number = text.trim_end_matches(char::is_alphabetic);
    if number.len() == text.len() {
        return Err(Error::Parse(format!("amount '{}' is missing a unit", text)));
    }
    let unit = &text[number.len()..];
    let amount = number
        .trim()
        .parse::<f64>()
        .map_err(|e| Error::Parse(format!("invalid amount '{}': {}", number.trim(), e)))?;
    Ok((amount, unit.parse()?))
}

fn parse_start(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Parse(format!("invalid start time '{}': {}", text, e)))
}
