#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # shule
//! ## Introduction
//!
//! Classifies examination marks into percentages, letter grades and grade
//! points, and serves a small grade-records API.
//!
//! ## Usage
//!
//! `shule classify 67 80 O_LEVEL`, `shule scale university`,
//! `shule stats grades.json`, `shule serve`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use shule::{
    config,
    grade::{self, GradeResult, aggregate, aggregate_all, report},
    server::{self, AppState},
    store::{GradeRecord, InMemoryGradeStore},
    types::AcademicLevel,
};
use tracing::metadata::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Classify one set of marks
    Classify {
        /// Print JSON instead of a table
        json:  bool,
        /// Marks obtained
        raw:   f64,
        /// Maximum marks
        max:   f64,
        /// Academic level, config default when absent
        level: Option<String>,
    },
    /// Print a level's threshold table
    Scale(Option<String>),
    /// Summarise a JSON export of grade records
    Stats {
        /// Print JSON instead of tables
        json: bool,
        /// Only this examination
        exam: Option<String>,
        /// Path to the export
        file: PathBuf,
    },
    /// Serve the REST API
    Serve(Option<String>),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses the `--json` switch
    fn json() -> impl Parser<bool> {
        long("json").help("Print JSON instead of tables").switch()
    }

    /// parses an optional academic level
    fn level() -> impl Parser<Option<String>> {
        positional("LEVEL")
            .help("PRIMARY, O_LEVEL, A_LEVEL or UNIVERSITY")
            .optional()
    }

    let classify = {
        let json = json();
        let raw = positional::<f64>("RAW").help("Marks obtained");
        let max = positional::<f64>("MAX").help("Maximum marks for the examination");
        let level = level();
        construct!(Cmd::Classify {
            json,
            raw,
            max,
            level
        })
        .to_options()
        .command("classify")
        .help("Compute percentage, letter grade and points")
    };

    let scale = construct!(Cmd::Scale(level()))
        .to_options()
        .command("scale")
        .help("Print the threshold table for a level");

    let stats = {
        let json = json();
        let exam = long("exam")
            .argument::<String>("ID")
            .help("Only summarise this examination")
            .optional();
        let file = positional::<PathBuf>("FILE").help("JSON array of grade records");
        construct!(Cmd::Stats { json, exam, file })
            .to_options()
            .command("stats")
            .help("Summarise exported grade records per examination")
    };

    let serve = long("bind")
        .argument::<String>("ADDR")
        .help("Address to listen on, overrides SHULE_BIND_ADDR")
        .optional()
        .map(Cmd::Serve)
        .to_options()
        .command("serve")
        .help("Serve the grade records API");

    let cmd = construct!([classify, scale, stats, serve]);

    cmd.to_options()
        .descr("Grade classification for school examinations")
        .run()
}

/// Resolves an optional level argument against the configured default.
fn resolve_level(level: Option<String>, cfg: &config::ConfigHandle) -> Result<AcademicLevel> {
    match level {
        Some(level) => Ok(level.parse::<AcademicLevel>()?),
        None => Ok(cfg.default_level()),
    }
}

/// One-line colored summary printed under the classification table.
fn verdict(result: &GradeResult) -> String {
    let letter = result.letter_grade.as_str();
    if result.letter_grade.is_pass() {
        format!("Grade {}", letter.green().bold())
    } else {
        format!("Grade {}", letter.red().bold())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cfg = config::ensure_initialized()?;

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(cfg.log_level());
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let cmd = options();

    match cmd {
        Cmd::Classify {
            json,
            raw,
            max,
            level,
        } => {
            let level = resolve_level(level, &cfg)?;
            let result = grade::classify(raw, max, level)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", report::render_result(level, &result));
                println!("{}", verdict(&result));
            }
        }
        Cmd::Scale(level) => {
            let level = resolve_level(level, &cfg)?;
            println!("{}", report::render_scale(level));
        }
        Cmd::Stats { json, exam, file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Could not read {}", file.display()))?;
            let records: Vec<GradeRecord> = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a JSON array of grade records", file.display()))?;
            tracing::debug!("Loaded {} grade records from {}", records.len(), file.display());

            let stats = match &exam {
                Some(id) => vec![aggregate(id, &records)],
                None => aggregate_all(&records),
            };

            if let (Some(id), false) = (&exam, json) {
                println!("{}", report::render_examination(id, &records));
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else if stats.is_empty() {
                tracing::warn!("No grade records in {}", file.display());
            } else {
                for s in &stats {
                    println!("{}", report::render_stats(s));
                }
            }
        }
        Cmd::Serve(bind) => {
            let addr = bind.unwrap_or_else(|| cfg.bind_addr().to_string());
            server::serve(&addr, AppState::new(InMemoryGradeStore::new())).await?;
        }
    };

    Ok(())
}
