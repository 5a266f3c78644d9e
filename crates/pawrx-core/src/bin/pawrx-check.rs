//! PawRx command-line checker.
//!
//! Runs interaction checks and catalog lookups against the bundled (or
//! `PAWRX_*`-configured) reference datasets without a database.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pawrx_ai::{
    analyze_or_fallback, AnalysisRequest, HttpAnalysisClient, MedicationContext, PetContext,
    SYSTEM_PROMPT,
};
use pawrx_core::config::{init_tracing, Config};
use pawrx_core::{InteractionEngine, Species};

#[derive(Parser)]
#[command(name = "pawrx-check")]
#[command(version, about = "Pet medication safety checker", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check medications for interactions and species toxicity
    Check {
        /// Pet species (dog, cat, bird, rabbit, hamster, guinea pig, ferret, other)
        #[arg(short, long)]
        species: String,

        /// Number of active medications on record, if more than those listed
        #[arg(long)]
        active: Option<usize>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Medication names
        #[arg(required = true)]
        medications: Vec<String>,
    },

    /// Search the medication catalog
    Search {
        query: String,

        #[arg(short, long)]
        species: Option<String>,
    },

    /// Show common doses for a medication or brand name
    Doses { name: String },

    /// Suggest alternatives to a medication
    Alternatives {
        medication: String,

        #[arg(short, long)]
        species: Option<String>,

        /// Condition being treated
        #[arg(short, long)]
        condition: Option<String>,
    },

    /// Ask the AI service about a regimen
    Analyze {
        #[arg(short, long)]
        species: String,

        /// Weight in kilograms
        #[arg(short, long, default_value = "0")]
        weight: f64,

        /// Age in years
        #[arg(short, long, default_value = "0")]
        age: f64,

        /// Question for the analysis
        #[arg(short, long)]
        query: Option<String>,

        /// Print the prompts that would be sent and exit
        #[arg(long)]
        print_prompt: bool,

        #[arg(required = true)]
        medications: Vec<String>,
    },
}

fn parse_species(value: &str) -> anyhow::Result<Species> {
    value
        .parse()
        .with_context(|| format!("unrecognised species '{}'", value))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    init_tracing(if cli.verbose { "debug" } else { config.log_filter.as_str() });

    let engine = InteractionEngine::new(
        config.load_reference().context("loading interaction data")?,
        config.load_catalog().context("loading medication catalog")?,
    );

    match cli.command {
        Commands::Check {
            species,
            active,
            json,
            medications,
        } => cmd_check(&engine, &species, active, json, &medications)?,

        Commands::Search { query, species } => {
            let species = species.as_deref().map(parse_species).transpose()?;
            for med in engine.catalog().search(&query, species) {
                println!(
                    "{:<24} {:<24} {}",
                    med.canonical_name,
                    med.brand_names.join(", "),
                    med.category.as_deref().unwrap_or("-")
                );
            }
        }

        Commands::Doses { name } => {
            let doses = engine.catalog().common_doses(&name);
            if doses.is_empty() {
                println!("No doses listed for {}", name);
            } else {
                println!("{}", doses.join(", "));
            }
        }

        Commands::Alternatives {
            medication,
            species,
            condition,
        } => {
            let species = species.as_deref().map(parse_species).transpose()?;
            for med in engine
                .catalog()
                .alternatives(&medication, species, condition.as_deref())
            {
                println!(
                    "{:<24} {}",
                    med.canonical_name,
                    med.category.as_deref().unwrap_or("-")
                );
            }
        }

        Commands::Analyze {
            species,
            weight,
            age,
            query,
            print_prompt,
            medications,
        } => {
            let species = parse_species(&species)?;
            let request = AnalysisRequest::new(
                PetContext {
                    species: species.as_str().to_string(),
                    breed: None,
                    weight,
                    weight_unit: "kg".into(),
                    age,
                    age_unit: "years".into(),
                    medical_history: None,
                },
                medications.into_iter().map(MedicationContext::named).collect(),
                query.as_deref(),
            );
            if print_prompt {
                println!("{}\n\n{}", SYSTEM_PROMPT, request.prompt());
                return Ok(());
            }

            let url = config
                .ai_url
                .as_deref()
                .context("set PAWRX_AI_URL or ML_SERVICE_URL to use analysis")?;
            let client = HttpAnalysisClient::new(url, config.ai_timeout_secs)?;
            let outcome = analyze_or_fallback(&client, &request);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}

fn cmd_check(
    engine: &InteractionEngine,
    species: &str,
    active: Option<usize>,
    json: bool,
    medications: &[String],
) -> anyhow::Result<()> {
    let species = parse_species(species)?;
    let active = active.unwrap_or(0).max(medications.len());
    let result = engine.check_interactions_for_pet(species, medications, active);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Overall risk: {}", result.overall_risk_level);
    for interaction in &result.drug_interactions {
        println!(
            "  {} [{}] {}",
            interaction.pair_label(),
            interaction.risk_level,
            interaction.mechanism
        );
    }
    for toxic in &result.toxic_medications {
        println!(
            "  {} is {} toxic to {}",
            toxic.medication,
            toxic.toxic_data.toxicity_level,
            species.plural()
        );
    }
    if !result.unmatched_medications.is_empty() {
        println!("Not recognised: {}", result.unmatched_medications.join(", "));
        for name in &result.unmatched_medications {
            let suggestions = engine.catalog().suggest(name, 3);
            if !suggestions.is_empty() {
                println!("  {}: did you mean {}?", name, suggestions.join(" or "));
            }
        }
    }
    println!();
    for rec in &result.recommendations {
        println!("[{}] {}", rec.action.as_str(), rec.message);
    }
    Ok(())
}
