//! # pon
//!
//! Command-line power budget calculator for passive optical networks.
//!
//! ```bash
//! pon levels network.json                 # per-node table and receiver budget
//! pon levels network.json --json          # document annotated with levels
//! pon check network.json                  # structural audit, exit 1 on errors
//! pon catalog                             # standard splitter presets
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pon::engine::{assess, propagate_with, BudgetReport, BudgetStatus, EngineConfig};
use pon::io::{load_topology_with, save_topology};
use pon::topology::catalog::{balanced_presets, unbalanced_presets};
use pon::topology::{check, has_errors, Node, Severity, Topology};
use pon::types::{InputLevel, DEFAULT_LOSS_DB_PER_KM, DEFAULT_RECEIVER_SENSITIVITY_DBM};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── CLI ────────────────────────────────────────────────────────────

/// Optical power budget calculator for passive optical networks
#[derive(Parser, Debug)]
#[command(name = "pon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute signal levels for every node in a topology document
    Levels(LevelsArgs),
    /// Report structural problems in a topology document
    Check {
        /// Path to the topology document (JSON)
        file: PathBuf,
    },
    /// List standard splitter presets
    Catalog,
}

#[derive(Args, Debug)]
struct LevelsArgs {
    /// Path to the topology document (JSON)
    file: PathBuf,

    /// Write the document with computed levels as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Receiver sensitivity threshold in dBm
    #[arg(long, value_name = "DBM", default_value_t = DEFAULT_RECEIVER_SENSITIVITY_DBM, allow_negative_numbers = true)]
    sensitivity: f64,

    /// Fiber loss for links that do not specify one, in dB/km
    #[arg(long, value_name = "DB_PER_KM", default_value_t = DEFAULT_LOSS_DB_PER_KM, env = "PON_FIBER_LOSS")]
    fiber_loss: f64,
}

impl LevelsArgs {
    fn engine_config(&self) -> Result<EngineConfig> {
        let config = EngineConfig {
            receiver_sensitivity_dbm: self.sensitivity,
            default_loss_db_per_km: self.fiber_loss,
            ..EngineConfig::default()
        };
        config.validate().context("invalid engine settings")?;
        Ok(config)
    }
}

// ── Commands ───────────────────────────────────────────────────────

fn load(path: &Path, config: &EngineConfig) -> Result<Topology> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let topology = load_topology_with(BufReader::new(file), config)
        .with_context(|| format!("cannot load {}", path.display()))?;
    info!(
        path = %path.display(),
        nodes = topology.nodes().len(),
        links = topology.links().len(),
        "topology loaded"
    );
    Ok(topology)
}

fn run_levels(args: &LevelsArgs) -> Result<ExitCode> {
    let config = args.engine_config()?;
    let topology = load(&args.file, &config)?;

    let violations = check(&topology);
    if has_errors(&violations) {
        warn!(
            errors = violations.iter().filter(|v| v.severity == Severity::Error).count(),
            "topology has structural errors; levels depend on link order (run `pon check`)"
        );
    }

    let (levels, stats) = propagate_with(&config, topology.nodes(), topology.links());
    debug!(?stats, "propagation finished");

    if args.json {
        let stdout = io::stdout().lock();
        save_topology(stdout, &topology, Some(&levels)).context("cannot write document")?;
        println!();
        return Ok(ExitCode::SUCCESS);
    }

    print_levels(&levels);
    println!();
    print_budget(&assess(&config, &levels));
    Ok(ExitCode::SUCCESS)
}

fn run_check(path: &Path) -> Result<ExitCode> {
    let topology = load(path, &EngineConfig::default())?;
    let violations = check(&topology);
    if violations.is_empty() {
        println!("{}: no problems found", path.display());
        return Ok(ExitCode::SUCCESS);
    }
    for v in &violations {
        println!("{v}");
    }
    let failed = has_errors(&violations);
    println!(
        "\n{} problem(s), {}",
        violations.len(),
        if failed { "errors present" } else { "no errors" }
    );
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run_catalog() -> ExitCode {
    println!("Balanced splitters");
    for p in balanced_presets() {
        println!("  {:<8} {:>5.1} dB", p.ratio(), p.loss_db);
    }
    println!();
    println!("Unbalanced splitters");
    for p in unbalanced_presets() {
        println!(
            "  {:<8} {:>6} {:>5.1} dB   {:>6} {:>5.1} dB",
            format!("{}/{}", p.tap_percent, p.through_percent),
            p.tap_port().as_str(),
            p.tap_loss_db,
            p.through_port().as_str(),
            p.through_loss_db
        );
    }
    ExitCode::SUCCESS
}

// ── Output ─────────────────────────────────────────────────────────

fn format_input(level: InputLevel) -> String {
    match level {
        InputLevel::Dbm(v) => format!("{v:.3} dBm"),
        InputLevel::NoSignal => "no signal".to_string(),
        InputLevel::NotApplicable => "-".to_string(),
    }
}

fn format_outputs(node: &Node) -> String {
    node.levels
        .outputs
        .iter()
        .map(|(port, dbm)| format!("{port}={dbm:.3}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_levels(levels: &[Node]) {
    let width = levels.iter().map(|n| n.id.as_str().len()).max().unwrap_or(2).max(2);
    println!("{:<width$}  {:<19}  {:>13}  OUTPUTS (dBm)", "ID", "KIND", "INPUT");
    for node in levels {
        println!(
            "{:<width$}  {:<19}  {:>13}  {}",
            node.id.as_str(),
            node.kind.name(),
            format_input(node.levels.input),
            format_outputs(node)
        );
    }
}

fn print_budget(report: &BudgetReport) {
    println!(
        "Receivers: {} ok, {} below sensitivity, {} without signal (sensitivity {:.1} dBm)",
        report.count(BudgetStatus::Ok),
        report.count(BudgetStatus::BelowSensitivity),
        report.count(BudgetStatus::NoSignal),
        report.sensitivity_dbm
    );
    for r in report.receivers.iter().filter(|r| r.status != BudgetStatus::Ok) {
        match r.margin_db {
            Some(m) => println!("  {} ({}): {} by {:.3} dB", r.id, r.label, r.status, -m),
            None => println!("  {} ({}): {}", r.id, r.label, r.status),
        }
    }
    if let Some(w) = report.weakest() {
        if let (Some(dbm), Some(margin)) = (w.input_dbm, w.margin_db) {
            println!("Weakest: {} at {dbm:.3} dBm (margin {margin:.3} dB)", w.id);
        }
    }
}

fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Levels(args) => run_levels(&args),
        Commands::Check { file } => run_check(&file),
        Commands::Catalog => Ok(run_catalog()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pon::topology::NodeKind;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn levels_flags_map_onto_config() {
        let cli = Cli::try_parse_from([
            "pon",
            "levels",
            "net.json",
            "--sensitivity",
            "-28",
            "--fiber-loss",
            "0.3",
        ])
        .unwrap();
        let Commands::Levels(args) = cli.command else {
            panic!("expected levels subcommand");
        };
        let config = args.engine_config().unwrap();
        assert_eq!(config.receiver_sensitivity_dbm, -28.0);
        assert_eq!(config.default_loss_db_per_km, 0.3);
        assert!(!args.json);
    }

    #[test]
    fn negative_fiber_loss_is_rejected() {
        let cli =
            Cli::try_parse_from(["pon", "levels", "net.json", "--fiber-loss", "-1"]).unwrap();
        let Commands::Levels(args) = cli.command else {
            panic!("expected levels subcommand");
        };
        assert!(args.engine_config().is_err());
    }

    #[test]
    fn input_formatting() {
        assert_eq!(format_input(InputLevel::Dbm(-0.85)), "-0.850 dBm");
        assert_eq!(format_input(InputLevel::NoSignal), "no signal");
        assert_eq!(format_input(InputLevel::NotApplicable), "-");
    }

    #[test]
    fn output_formatting_follows_port_order() {
        let mut node = Node::new("s", NodeKind::balanced("1:2", 3.5));
        node.levels.outputs.insert("out-1".into(), -0.5);
        node.levels.outputs.insert("out".into(), -0.5);
        assert_eq!(format_outputs(&node), "out-1=-0.500 out=-0.500");
    }
}
