//! Stripping Guide - BOP stripping procedure decision support
//!
//! Evaluates the active procedure path and barrier valve state for a
//! pressure / operation snapshot.
//!
//! # Usage
//!
//! ```bash
//! # Scenario 2, joint in the stack, lower chamber near casing pressure
//! stripping-guide --scenario 2 --passing-joint --p2 4.6 --p3 5
//!
//! # Stream operator updates (one JSON object per line)
//! echo '{"scenario": 3, "passing_joint": true, "direction": "pooh"}' | stripping-guide --stdin
//!
//! # List scenarios / print a procedure tree
//! stripping-guide scenarios
//! stripping-guide tree --scenario 3
//! ```
//!
//! # Environment Variables
//!
//! - `STRIPPING_GUIDE_CONFIG`: Path to a guide_config.toml
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

use stripping_guide::config::{self, GuideConfig, OutputFormat, Preset};
use stripping_guide::guide::{self, Snapshot, SnapshotUpdate};
use stripping_guide::procedure;
use stripping_guide::report;
use stripping_guide::{Direction, Scenario};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "stripping-guide")]
#[command(about = "BOP stripping procedure guide: active step and barrier state")]
#[command(version)]
struct CliArgs {
    /// Scenario: 1 (direct push), 2 (double ram), 3 (annular/ram hybrid)
    #[arg(short, long, value_parser = parse_scenario)]
    scenario: Option<Scenario>,

    /// Tubing pressure P0 (MPa)
    #[arg(long, allow_negative_numbers = true)]
    p0: Option<f64>,

    /// Upper chamber pressure P1 (MPa)
    #[arg(long, allow_negative_numbers = true)]
    p1: Option<f64>,

    /// Lower chamber pressure P2 (MPa)
    #[arg(long, allow_negative_numbers = true)]
    p2: Option<f64>,

    /// Casing pressure P3 (MPa)
    #[arg(long, allow_negative_numbers = true)]
    p3: Option<f64>,

    /// A tool joint is transiting the stack (`-j`, or `-j false` to clear a config default)
    #[arg(
        short = 'j',
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    passing_joint: Option<bool>,

    /// Tripping direction: rih or pooh
    #[arg(short, long, value_parser = parse_direction)]
    direction: Option<Direction>,

    /// Start from a pressure preset: normal or fault (gauge flags override it)
    #[arg(long, value_parser = parse_preset)]
    preset: Option<Preset>,

    /// Output format: text or json
    #[arg(short, long, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// Include inactive steps in text reports
    #[arg(long)]
    show_inactive: bool,

    /// Read JSON snapshot updates from stdin, one per line
    #[arg(long)]
    stdin: bool,

    /// Explicit config file (otherwise STRIPPING_GUIDE_CONFIG / ./guide_config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// List the available scenarios
    Scenarios,

    /// Print a scenario's procedure tree with its activation conditions
    Tree {
        #[arg(short, long, value_parser = parse_scenario)]
        scenario: Scenario,
    },
}

fn parse_scenario(s: &str) -> Result<Scenario, String> {
    s.parse::<Scenario>().map_err(|e| e.to_string())
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    Direction::from_str(s).ok_or_else(|| format!("unknown direction '{s}' (expected rih or pooh)"))
}

fn parse_preset(s: &str) -> Result<Preset, String> {
    Preset::from_str(s).ok_or_else(|| format!("unknown preset '{s}' (expected normal or fault)"))
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_str(s).ok_or_else(|| format!("unknown format '{s}' (expected text or json)"))
}

impl CliArgs {
    /// Operator overrides given on the command line
    fn as_update(&self) -> SnapshotUpdate {
        SnapshotUpdate {
            scenario: self.scenario,
            preset: self.preset,
            p0: self.p0,
            p1: self.p1,
            p2: self.p2,
            p3: self.p3,
            passing_joint: self.passing_joint,
            direction: self.direction,
        }
    }
}

// ============================================================================
// Output
// ============================================================================

fn emit(
    out: &mut impl Write,
    evaluation: &guide::Evaluation,
    format: OutputFormat,
    show_inactive: bool,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "{}", report::render_text(evaluation, show_inactive))?;
        }
        OutputFormat::Json => writeln!(
            out,
            "{}",
            report::render_json(evaluation).context("Failed to serialize report")?
        )?,
    }
    Ok(())
}

fn print_scenarios(out: &mut impl Write) -> Result<()> {
    for scenario in Scenario::ALL {
        writeln!(
            out,
            "{}  {:<14} {}\n   {}",
            scenario.id(),
            scenario.short_code(),
            scenario.display_name(),
            scenario.description()
        )?;
    }
    Ok(())
}

fn print_tree(out: &mut impl Write, scenario: Scenario) -> Result<()> {
    let tree = procedure::tree(scenario);
    writeln!(out, "{} ({} steps)", scenario.display_name(), tree.len())?;
    for (depth, node) in tree.root().walk() {
        let condition = node
            .condition
            .as_ref()
            .map_or_else(String::new, |c| format!("  when {c}"));
        writeln!(
            out,
            "{}[{}] {} <{}>{}",
            "  ".repeat(depth),
            node.category,
            node.label,
            node.id,
            condition
        )?;
    }
    Ok(())
}

// ============================================================================
// Stdin Stream
// ============================================================================

/// Apply each update line to the running snapshot and report it.
///
/// Malformed lines are logged and skipped; the snapshot is left as it was.
fn run_stdin(
    mut snapshot: Snapshot,
    config: &GuideConfig,
    format: OutputFormat,
    show_inactive: bool,
) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut evaluated = 0_u64;
    let mut skipped = 0_u64;

    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line.context("Failed to read stdin")?;
        match SnapshotUpdate::parse_line(&line) {
            Ok(Some(update)) => {
                snapshot.apply(&update, &config.presets);
                emit(&mut out, &guide::evaluate(&snapshot), format, show_inactive)?;
                out.flush()?;
                evaluated += 1;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipping invalid snapshot line");
                skipped += 1;
            }
        }
    }

    info!(evaluated, skipped, "Stdin stream finished");
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();

    let stdout = io::stdout();
    match &args.command {
        Some(SubCommand::Scenarios) => return print_scenarios(&mut stdout.lock()),
        Some(SubCommand::Tree { scenario }) => return print_tree(&mut stdout.lock(), *scenario),
        None => {}
    }

    let guide_config = match &args.config {
        Some(path) => GuideConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GuideConfig::load(),
    };
    config::init(guide_config);
    let cfg = config::get();

    let format = args.format.unwrap_or(cfg.output.format);
    let show_inactive = args.show_inactive || cfg.output.show_inactive;

    let mut snapshot = Snapshot::from_config(cfg);
    snapshot.apply(&args.as_update(), &cfg.presets);

    if args.stdin {
        info!(scenario = snapshot.scenario.short_code(), "Reading snapshot updates from stdin");
        return run_stdin(snapshot, cfg, format, show_inactive);
    }

    emit(&mut stdout.lock(), &guide::evaluate(&snapshot), format, show_inactive)
}
