//! Citrine Calc - Entry Point
//!
//! Loads the reference tables, restores saved levels and runs one command
//! against them. Logs go to stderr so stdout stays parseable in JSON mode.

use citrine_calc::calc::{format_citrine, CostBreakdown, GroupTotal};
use citrine_calc::core::config::{CalculatorConfig, DataConfig};
use citrine_calc::core::error::Result;
use citrine_calc::data::defaults::write_default_data;
use citrine_calc::data::ViewFilter;
use citrine_calc::{AbilityRow, CitrineSource, EditOutcome, Session};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Citrine cost calculator for ability breakthroughs
#[derive(Parser, Debug)]
#[command(name = "citrine", version)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding abilities.json, stages.json and breakthroughs.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Level store file
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Which record supplies citrinePerBook
    #[arg(long, global = true)]
    citrine_source: Option<CitrineSource>,

    /// Keep levels in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show abilities with their level and cost
    List {
        #[arg(long)]
        path: Option<String>,
        #[arg(long)]
        stage: Option<String>,
    },
    /// Set an ability's level
    Set {
        /// Ability id (path/stage/name) or unique name
        ability: String,
        #[arg(allow_negative_numbers = true)]
        level: f64,
    },
    /// Price an ability at a level without saving it
    Cost {
        ability: String,
        #[arg(allow_negative_numbers = true)]
        level: f64,
        /// Show every breakthrough tier
        #[arg(long)]
        breakdown: bool,
    },
    /// Grand total across all abilities
    Total {
        #[arg(long, value_enum)]
        by: Option<Grouping>,
    },
    /// List ability paths
    Paths,
    /// List cultivation stages
    Stages,
    /// Write the bundled stage and breakthrough tables
    Init {
        dir: PathBuf,
        /// Replace existing files
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Grouping {
    Stage,
    Path,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "citrine_calc=debug,citrine=debug"
    } else {
        "citrine_calc=info,citrine=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "citrine failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> Result<CalculatorConfig> {
    let mut config = match &cli.config {
        Some(path) => CalculatorConfig::load(path)?,
        None => CalculatorConfig::default(),
    };

    if let Some(dir) = &cli.data_dir {
        config.data = DataConfig::in_dir(dir);
    }
    if let Some(store) = &cli.store {
        config.store_path = store.clone();
    }
    if let Some(source) = cli.citrine_source {
        config.citrine_source = source;
    }

    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    if let Command::Init { dir, force } = &cli.command {
        let files = write_default_data(dir, *force)?;
        for path in &files.written {
            println!("wrote {}", path.display());
        }
        for path in &files.skipped {
            println!("kept  {} (use --force to replace)", path.display());
        }
        return Ok(());
    }

    let config = build_config(&cli)?;
    tracing::debug!(?config, "Configuration resolved");

    // Reference data must be in memory before anything is priced
    let rt = Runtime::new()?;
    let mut session = rt.block_on(Session::open(&config, cli.ephemeral))?;

    match cli.command {
        Command::List { path, stage } => {
            let filter = ViewFilter { path, stage };
            let rows = session.rows(&filter);
            let visible_total = session.visible_total(&filter);
            let total = session.total();
            match cli.format {
                Format::Json => print_json(&ListOutput {
                    rows,
                    visible_total,
                    total,
                })?,
                Format::Text => print_rows(&rows, &filter, visible_total, total),
            }
        }
        Command::Set { ability, level } => {
            let outcome = session.edit(&ability, level)?;
            match cli.format {
                Format::Json => print_json(&outcome)?,
                Format::Text => print_edit(&outcome),
            }
        }
        Command::Cost {
            ability,
            level,
            breakdown,
        } => {
            let (ability, cost) = session.what_if(&ability, level)?;
            match cli.format {
                Format::Json => print_json(&cost)?,
                Format::Text => print_cost(&ability.id.to_string(), &cost, breakdown),
            }
        }
        Command::Total { by } => {
            let groups = match by {
                Some(Grouping::Stage) => session.stage_totals(),
                Some(Grouping::Path) => session.path_totals(),
                None => Vec::new(),
            };
            let total = session.total();
            match cli.format {
                Format::Json => print_json(&TotalOutput { groups, total })?,
                Format::Text => print_totals(&groups, total),
            }
        }
        Command::Paths => {
            let paths = session.paths();
            match cli.format {
                Format::Json => print_json(&paths)?,
                Format::Text => paths.iter().for_each(|p| println!("{}", p)),
            }
        }
        Command::Stages => {
            let stages = session.stages();
            match cli.format {
                Format::Json => print_json(&stages)?,
                Format::Text => stages.iter().for_each(|s| println!("{}", s)),
            }
        }
        Command::Init { .. } => unreachable!("handled before loading data"),
    }

    Ok(())
}

#[derive(Serialize)]
struct ListOutput {
    rows: Vec<AbilityRow>,
    visible_total: f64,
    total: f64,
}

#[derive(Serialize)]
struct TotalOutput {
    groups: Vec<GroupTotal>,
    total: f64,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_rows(rows: &[AbilityRow], filter: &ViewFilter, visible_total: f64, total: f64) {
    if rows.is_empty() {
        println!("No abilities to show.");
    }

    let mut current_stage: Option<&str> = None;
    for row in rows {
        if current_stage != Some(row.stage.as_str()) {
            println!();
            println!("=== {} ===", row.stage);
            current_stage = Some(row.stage.as_str());
        }
        println!(
            "  {:<28} {:<12} {:>3}/{:<3} {:>10}",
            row.name,
            row.path,
            row.level,
            row.max_level,
            format_citrine(row.cost)
        );
    }

    println!();
    if !filter.is_unfiltered() {
        println!("Visible Citrine: {}", format_citrine(visible_total));
    }
    println!("Total Citrine: {}", format_citrine(total));
}

fn print_edit(outcome: &EditOutcome) {
    println!(
        "{}: level {} -> {} ({} Citrine)",
        outcome.id,
        outcome.previous_level,
        outcome.level,
        format_citrine(outcome.cost)
    );
    println!("Total Citrine: {}", format_citrine(outcome.total));
}

fn print_cost(id: &str, cost: &CostBreakdown, show_tiers: bool) {
    println!(
        "{} at level {}: {} books x {} = {} Citrine",
        id,
        cost.level,
        cost.total_books,
        format_citrine(cost.citrine_per_book),
        format_citrine(cost.total)
    );

    if show_tiers {
        for tier in &cost.tiers {
            println!(
                "  level {:>3}: {:>4} books  {:>10}",
                tier.level,
                tier.books,
                format_citrine(tier.citrine)
            );
        }
    }

    if let Some(next) = &cost.next {
        println!(
            "Next breakthrough at level {}: {} books ({} Citrine)",
            next.level,
            next.books,
            format_citrine(next.citrine)
        );
    }
}

fn print_totals(groups: &[GroupTotal], total: f64) {
    for group in groups {
        println!(
            "  {:<28} {:>3} abilities {:>12}",
            group.group,
            group.abilities,
            format_citrine(group.total)
        );
    }
    println!("Total Citrine: {}", format_citrine(total));
}
