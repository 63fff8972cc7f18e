use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use stress_insight_core::{
    filter_records, registry, ClassFilter, HistoryStore, HttpPredictionClient, JsonFileStore,
    ServiceConfig, SubmissionController, SubmissionState,
};

/// Terminal front end for the stress-insight pipeline.
#[derive(Parser)]
#[command(name = "stress-insight", version, about)]
struct Cli {
    /// Directory holding the persisted history.
    #[arg(long, default_value = ".stress-insight")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a measurement vector and print the classification.
    Predict {
        /// Field overrides on an all-zero baseline, e.g. `anxiety_level=15`.
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        overrides: Vec<String>,
    },
    /// List past predictions, newest first.
    History {
        /// Case-insensitive term matched against dates and field names.
        #[arg(long, default_value = "")]
        search: String,
        /// One of: all, low, medium, high.
        #[arg(long, default_value = "all")]
        level: ClassFilter,
    },
    /// Remove one record by its position in the newest-first listing.
    Delete { position: usize },
    /// Remove all history. Irreversible.
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Print the recognized fields and their maxima.
    Fields,
}

fn parse_override(raw: &str) -> Result<(String, u32)> {
    let (field, value) = raw
        .split_once('=')
        .with_context(|| format!("expected FIELD=VALUE, got `{raw}`"))?;
    let value: u32 = value
        .parse()
        .with_context(|| format!("`{field}` needs an integer value, got `{value}`"))?;
    Ok((field.to_string(), value))
}

fn open_history(data_dir: &Path) -> HistoryStore<JsonFileStore> {
    HistoryStore::load(JsonFileStore::new(data_dir))
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Predict { overrides } => {
            let mut values: BTreeMap<String, u32> = registry::all_field_names()
                .map(|name| (name.to_string(), 0))
                .collect();
            for raw in &overrides {
                let (field, value) = parse_override(raw)?;
                values.insert(field, value);
            }

            let config = ServiceConfig::from_env();
            let client = HttpPredictionClient::new(&config)?;
            let mut controller = SubmissionController::new(client, open_history(&cli.data_dir));

            match controller.submit(values).await {
                SubmissionState::Success { result, advice } => {
                    println!("Predicted stress level: {result}");
                    if let Some(advice) = advice {
                        println!("\n{advice}");
                    }
                }
                SubmissionState::Failed { message } => bail!("prediction failed: {message}"),
                state => bail!("unexpected submission state: {state:?}"),
            }
        }
        Command::History { search, level } => {
            let history = open_history(&cli.data_dir);
            let matched = filter_records(history.all(), &search, level);
            println!("{} of {} predictions", matched.len(), history.len());
            for (position, record) in matched.iter().enumerate() {
                let advice_mark = if record.advice.is_some() { " *" } else { "" };
                println!("{position:>3}  {}  {}{advice_mark}", record.date, record.result);
            }
        }
        Command::Delete { position } => {
            let mut history = open_history(&cli.data_dir);
            let before = history.len();
            history.delete_at(position);
            if history.len() == before {
                bail!("no record at position {position}");
            }
            println!("deleted record {position}");
        }
        Command::Clear { yes } => {
            if !yes {
                bail!("refusing to clear history without --yes");
            }
            let mut history = open_history(&cli.data_dir);
            history.clear();
            println!("history cleared");
        }
        Command::Fields => {
            for spec in &registry::FIELDS {
                println!("{:<30} 0..={:<3} {}", spec.name, spec.max, spec.label());
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .init();
    run(Cli::parse()).await
}
