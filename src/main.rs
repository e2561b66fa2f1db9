use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use assignment_priority::models::PriorityLevel;
use assignment_priority::priority::PriorityCalculator;
use assignment_priority::settings::Settings;
use assignment_priority::weights::PartialWeights;
use assignment_priority::{import, logging, report, settings};

#[derive(Parser)]
#[command(name = "assignment-priority")]
#[command(about = "Rank LMS assignments by urgency, grade impact and course standing", long_about = None)]
struct Cli {
    /// Settings file with weight and threshold overrides
    #[arg(long, global = true, env = "PRIORITY_CONFIG")]
    config: Option<PathBuf>,
    /// Score as of this instant (RFC 3339) instead of the current time
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score and rank assignments from a detector export (.csv or .json)
    Score {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Only show assignments at or above this level
        #[arg(long)]
        min_level: Option<PriorityLevel>,
        /// Print the scored records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown digest
    Report {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "priority-report.md")]
        out: PathBuf,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Print the effective settings, loadable via --config, optionally applying a weight update first
    Weights {
        #[arg(long)]
        grade_impact: Option<f64>,
        #[arg(long)]
        course_grade: Option<f64>,
        #[arg(long)]
        due_date: Option<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let config = settings::load_config(cli.config.as_deref()).context("failed to load settings")?;
    let mut calculator = PriorityCalculator::new(config).context("invalid scoring settings")?;
    let now = cli.now.unwrap_or_else(Utc::now);

    match cli.command {
        Commands::Score {
            input,
            limit,
            min_level,
            json,
        } => {
            let records = import::load_records(&input)
                .with_context(|| format!("failed to load assignments from {}", input.display()))?;
            let mut ranked = calculator.rank(&records, now);
            if let Some(min_level) = min_level {
                ranked.retain(|item| item.priority.level >= min_level);
            }
            ranked.truncate(limit);

            if json {
                println!("{}", serde_json::to_string_pretty(&ranked)?);
                return Ok(());
            }

            if ranked.is_empty() {
                println!("No assignments to rank.");
                return Ok(());
            }

            println!("Assignments by priority:");
            for item in &ranked {
                println!(
                    "- [{}] {} ({}) score {:.2}, {}",
                    item.priority.level,
                    item.record.title,
                    item.priority.refined_type,
                    item.priority.score,
                    report::describe_due(item)
                );
            }
        }
        Commands::Report { input, out, limit } => {
            let records = import::load_records(&input)
                .with_context(|| format!("failed to load assignments from {}", input.display()))?;
            let ranked = calculator.rank(&records, now);
            let digest = report::build_report(now, &ranked, limit);
            std::fs::write(&out, digest)
                .with_context(|| format!("failed to write report to {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Weights {
            grade_impact,
            course_grade,
            due_date,
        } => {
            let update = PartialWeights {
                grade_impact,
                course_grade,
                due_date,
                types: None,
            };
            if !update.is_empty() {
                match calculator.set_weights(&update) {
                    Ok(()) => println!("Weights updated."),
                    Err(err) => println!("Update rejected ({err}); keeping previous weights."),
                }
            }
            let printed = Settings::from_config(calculator.config());
            print!("{}", toml::to_string_pretty(&printed)?);
        }
    }

    Ok(())
}
