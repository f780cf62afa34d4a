mod commands;
mod logging;
mod progress;
mod table;

use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, DecayArgs};
use dotenv::dotenv;
use plex_audit_core::report::{format_date, format_gb, format_optional_date, DisplayRow, SectionRow};
use plex_audit_core::storage::Database;
use plex_audit_core::{export, AppConfig, AuditEngine};
use progress::CliReporter;
use tracing::{error, info, warn};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let mut config = match plex_audit_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };
    if let Some(db) = args.db {
        config.database_path = db;
    }

    let result = match args.command {
        Some(Commands::Sections) => run_sections(&config),
        Some(Commands::Decay(decay_args)) => run_decay(&config, decay_args),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn open_database(config: &AppConfig) -> Result<Database> {
    Database::open(&config.database_path)
        .with_context(|| format!("Opening library database '{}'", config.database_path))
}

fn run_sections(config: &AppConfig) -> Result<()> {
    let db = open_database(config)?;
    let sections = AuditEngine::new(config)
        .sections(&db)
        .context("Listing library sections")?;

    let rows: Vec<SectionRow> = sections.iter().map(SectionRow::from).collect();
    println!("{}", table::sections(&rows));
    Ok(())
}

fn run_decay(config: &AppConfig, args: DecayArgs) -> Result<()> {
    let section = args
        .section
        .or(config.section_id)
        .context("No library section selected; run `plex-audit sections` to list them")?;
    let months = args.months.unwrap_or(config.window_months);
    let now = match args.now.as_deref() {
        Some(date) => parse_date(date)?,
        None => Utc::now(),
    };

    let db = open_database(config)?;
    let engine = AuditEngine::new(config).with_window_months(months);
    let reporter = CliReporter::new();
    let result = engine
        .run_section(&db, section, now, &reporter)
        .with_context(|| format!("Auditing section {}", section))?;
    let report = &result.report;

    let rows: Vec<DisplayRow> = report.rows.iter().map(DisplayRow::from).collect();
    println!();
    println!("{}", table::decaying(&rows));
    println!();

    info!(
        "Views from {} to {}, cutoff {} ({} months)",
        format_optional_date(report.oldest_view).cyan(),
        format_optional_date(report.newest_view).cyan(),
        format_date(report.cutoff).cyan(),
        months,
    );
    info!(
        "{} decaying of {} items, {} Gb reclaimable ({} healthy, {} too new)",
        format!("{}", report.len()).red(),
        result.item_count,
        format_gb(report.reclaimable_bytes()).red(),
        report.healthy,
        report.too_new,
    );

    info!(
        "Hierarchy: {}, Views: {}",
        format!("{:.2}s", result.hierarchy_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.events_duration.as_secs_f64()).green(),
    );

    let quality = result.quality;
    if quality.warnings() > 0 {
        warn!(
            "Data quality: {} rows skipped, {} groups without a parent, {} repeated groups",
            format!("{}", quality.skipped_rows).yellow(),
            format!("{}", quality.orphaned_groups).yellow(),
            format!("{}", quality.duplicate_groups).yellow(),
        );
    }

    if let Some(path) = args.csv.as_deref().or(config.export_path.as_deref()) {
        export::write_csv_file(report, Path::new(path))
            .with_context(|| format!("Writing CSV export to '{}'", path))?;
    }

    Ok(())
}

fn parse_date(date: &str) -> Result<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date))?;
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("Invalid date '{}'", date))?;
    Ok(midnight.and_utc())
}
