//! Command-line arguments and subcommand dispatch.
//!
//! Precedence for every setting: flag, then `PATHWAY_*` env var, then the
//! settings file, then compiled defaults. Output goes to stdout as JSON;
//! logs go to stderr.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pathway_engine::{
    FiredRule, Recommendation, RuleEngine, Ruleset, StageSummary, StudentInput, load_input,
    load_ruleset,
};
use pathway_settings::{LogLevel, PathwaySettings, load_settings, load_settings_from_path};
use pathway_telemetry::{TelemetryConfig, init_telemetry};
use serde::Serialize;
use tracing::{Level, info, warn};

/// Input path that means "read from stdin".
const STDIN: &str = "-";

/// College pathway rule engine.
#[derive(Debug, Parser)]
#[command(name = "pathway", version, about = "College pathway rule engine")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Settings file (defaults to `~/.pathway/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, global = true, value_parser = parse_log_level)]
    log_level: Option<LogLevel>,

    /// Write logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate one intake record and print the recommendation.
    Evaluate(EvaluateArgs),
    /// Print a summary of a ruleset's stages.
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
struct EvaluateArgs {
    /// Intake record JSON file, or `-` for stdin.
    #[arg(long, short)]
    input: PathBuf,

    /// Ruleset JSON file (overrides settings).
    #[arg(long, short)]
    ruleset: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Also print the rules that fired, in firing order.
    #[arg(long)]
    explain: bool,
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// Ruleset JSON file (overrides settings).
    #[arg(long, short)]
    ruleset: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

/// `evaluate --explain` output.
#[derive(Debug, Serialize)]
struct Explained<'a> {
    recommendation: &'a Recommendation,
    fired: &'a [FiredRule],
}

impl Cli {
    /// Run the selected subcommand.
    pub fn run(self) -> Result<()> {
        let settings = self.resolve_settings()?;
        init_telemetry(&telemetry_config(&settings)).context("failed to initialize logging")?;

        let output = match &self.command {
            Command::Evaluate(args) => evaluate(args, &settings, std::io::stdin().lock())?,
            Command::Inspect(args) => inspect(args, &settings)?,
        };

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{output}").context("failed to write output")?;
        Ok(())
    }

    fn resolve_settings(&self) -> Result<PathwaySettings> {
        let mut settings = match &self.settings {
            Some(path) => load_settings_from_path(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => load_settings().context("failed to load settings")?,
        };
        if let Some(level) = self.log_level {
            settings.logging.level = level;
        }
        if self.json_logs {
            settings.logging.json = true;
        }
        Ok(settings)
    }
}

fn parse_log_level(value: &str) -> std::result::Result<LogLevel, String> {
    LogLevel::parse(value).ok_or_else(|| format!("unknown log level `{value}`"))
}

fn telemetry_config(settings: &PathwaySettings) -> TelemetryConfig {
    let log_level = match settings.logging.level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    };
    TelemetryConfig {
        log_level,
        json: settings.logging.json,
    }
}

// ── Subcommands ─────────────────────────────────────────────────────────────

fn evaluate(args: &EvaluateArgs, settings: &PathwaySettings, stdin: impl Read) -> Result<String> {
    let ruleset = read_ruleset(args.ruleset.as_deref(), settings)?;
    let input = read_input(&args.input, stdin)?;

    let evaluation = RuleEngine::new(&ruleset).run(&input);
    let fired = evaluation.fired.clone();
    let recommendation = evaluation.into_recommendation(&ruleset);
    info!(
        template_key = %recommendation.template_key,
        fired = fired.len(),
        "evaluation complete"
    );

    if args.explain {
        let explained = Explained {
            recommendation: &recommendation,
            fired: &fired,
        };
        to_json(&explained, args.pretty)
    } else {
        to_json(&recommendation, args.pretty)
    }
}

fn inspect(args: &InspectArgs, settings: &PathwaySettings) -> Result<String> {
    let ruleset = read_ruleset(args.ruleset.as_deref(), settings)?;
    to_json(&ruleset.stage_summary(), args.pretty)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn read_ruleset(flag: Option<&Path>, settings: &PathwaySettings) -> Result<Ruleset> {
    let path = flag.map_or_else(
        || PathBuf::from(&settings.engine.ruleset_path),
        Path::to_path_buf,
    );
    let ruleset = load_ruleset(&path)
        .with_context(|| format!("failed to load ruleset from {}", path.display()))?;
    warn_orphans(&ruleset.stage_summary());
    Ok(ruleset)
}

fn read_input(path: &Path, mut stdin: impl Read) -> Result<StudentInput> {
    if path.as_os_str() != STDIN {
        return load_input(path)
            .with_context(|| format!("failed to load input from {}", path.display()));
    }
    let mut json = String::new();
    let _ = stdin
        .read_to_string(&mut json)
        .context("failed to read input from stdin")?;
    StudentInput::from_json_str(&json).context("failed to parse input from stdin")
}

fn warn_orphans(summary: &StageSummary) {
    for stage in &summary.orphan_stages {
        warn!(stage = %stage, "stage is not in execution_order, its rules never run");
    }
}

fn to_json(value: &impl Serialize, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("failed to serialize output")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
