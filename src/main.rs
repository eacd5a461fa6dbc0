//! Carbon Tracker CLI
//!
//! Personal monthly carbon footprint estimator.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use carbon_tracker::advisor::{GeminiClient, TipProvider, UnconfiguredProvider};
use carbon_tracker::report::{self, FootprintSummary};
use carbon_tracker::{logging, repl, ActivityInput, Config, HistoryStore, Session};

#[derive(Parser)]
#[command(name = "carbon-tracker")]
#[command(about = "Personal monthly carbon footprint estimator")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Monthly target in kg CO2e to compare against
    #[arg(long, global = true, value_parser = carbon_tracker::config::parse_monthly_target)]
    target: Option<f64>,

    /// Keep at most this many results in the session history
    #[arg(long, global = true)]
    history_capacity: Option<usize>,

    /// Timeout for the tip request, in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a footprint once and print it
    Calc {
        /// Kilometers travelled per month
        #[arg(short, long, default_value = "500")]
        distance: f64,

        /// Primary mode of transport (gasoline_car, electric_car, public_transport, flight)
        #[arg(short, long, default_value = "gasoline_car")]
        transport: String,

        /// Electricity consumed per month in kWh
        #[arg(short, long, default_value = "300")]
        electricity: f64,

        /// Typical diet (high_meat, medium_meat, low_meat, vegetarian, vegan, none)
        #[arg(long, default_value = "high_meat")]
        diet: String,

        /// Waste generated per month in kg
        #[arg(short, long, default_value = "15")]
        waste: f64,

        /// Also ask for reduction tips
        #[arg(long)]
        tips: bool,

        /// Print the record as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// List the emission factor table
    Factors,

    /// Start an interactive session reading commands from stdin
    Session,
}

fn load_config(cli: &Cli) -> Config {
    let mut config = Config::from_env();
    if let Some(target) = cli.target {
        config.monthly_target_kg = target;
    }
    if let Some(capacity) = cli.history_capacity {
        config.history_capacity = Some(capacity).filter(|&n| n > 0);
    }
    if let Some(secs) = cli.timeout {
        config.http_timeout = Duration::from_secs(secs);
    }
    config
}

fn tip_provider(config: &Config) -> Result<Box<dyn TipProvider>> {
    match GeminiClient::try_new(config) {
        Ok(client) => Ok(Box::new(client)),
        Err(carbon_tracker::AdvisoryError::NotConfigured) => Ok(Box::new(UnconfiguredProvider)),
        Err(err) => Err(err).context("failed to set up the tip service client"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let config = load_config(&cli);
    let history = HistoryStore::with_capacity(config.history_capacity)?;
    let mut session = Session::with_history(history);

    match cli.command {
        Commands::Calc {
            distance,
            transport,
            electricity,
            diet,
            waste,
            tips,
            json,
        } => {
            let input = ActivityInput::from_labels(distance, &transport, electricity, &diet, waste)?;
            let record = session.calculate_today(&input)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print!(
                    "{}",
                    FootprintSummary {
                        record: &record,
                        target_kg: config.monthly_target_kg,
                    }
                );
            }

            if tips {
                let provider = tip_provider(&config)?;
                if session.awaits_tips() {
                    eprintln!("Asking for reduction tips...");
                }
                if let Some(outcome) = session.request_tips(provider.as_ref()).await {
                    println!("\nReduction tips:\n{}", report::advice_message(&outcome));
                }
            }
        }

        Commands::Factors => {
            print!("{}", report::format_factors(&session.factors().rows()));
        }

        Commands::Session => {
            let provider = tip_provider(&config)?;
            let stdin = io::stdin();
            repl::run(
                &mut session,
                provider.as_ref(),
                config.monthly_target_kg,
                stdin.lock(),
                io::stdout(),
            )
            .await?;
        }
    }

    Ok(())
}
