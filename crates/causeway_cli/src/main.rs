//! Causeway CLI
//!
//! Check, run and export state-transition programs.

#![warn(missing_docs)]
#![warn(clippy::all)]

use causeway_engine::{EngineConfig, TransitionResult, Universe};
use causeway_export::ToBrain;
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "causeway")]
#[command(about = "Causeway - deterministic state-transition DSL", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check that a program parses and evaluates
    Check {
        /// Program file
        file: PathBuf,
    },
    /// Evaluate a program and apply transitions in order
    Run {
        /// Program file
        file: PathBuf,
        /// Transition to apply; repeatable
        #[arg(long = "apply", value_name = "NAME")]
        apply: Vec<String>,
    },
    /// Export the program's graph as JSON
    Export {
        /// Program file
        file: PathBuf,
        /// Domain tag
        #[arg(short, long)]
        domain: String,
        /// Transition to apply before exporting; repeatable
        #[arg(long = "apply", value_name = "NAME")]
        apply: Vec<String>,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the merkle root of the history
    Root {
        /// Program file
        file: PathBuf,
        /// Transition to apply; repeatable
        #[arg(long = "apply", value_name = "NAME")]
        apply: Vec<String>,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    EngineConfig::from_json(&json)
        .wrap_err_with(|| format!("invalid config {}", path.display()))
}

fn read_source(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).wrap_err_with(|| format!("failed to read {}", file.display()))
}

fn load_universe(file: &Path, config: &EngineConfig) -> Result<Universe> {
    let source = read_source(file)?;
    causeway_engine::evaluate_with(&source, config.clone())
        .wrap_err_with(|| format!("failed to evaluate {}", file.display()))
}

fn apply_all(universe: &mut Universe, names: &[String]) -> Vec<TransitionResult> {
    names
        .iter()
        .map(|name| {
            let result = universe.apply_transition(name);
            if let Some(error) = &result.error {
                warn!(transition = %name, %error, "transition rejected");
            }
            result
        })
        .collect()
}

/// Apply transitions, failing if any was rejected
fn apply_each(universe: &mut Universe, names: &[String]) -> Result<()> {
    let rejected: Vec<String> = apply_all(universe, names)
        .into_iter()
        .filter(|result| !result.is_valid())
        .map(|result| match result.error {
            Some(error) => error.to_string(),
            None => format!("transition `{}` rejected", result.transition),
        })
        .collect();
    if rejected.is_empty() {
        Ok(())
    } else {
        Err(eyre!("{}", rejected.join("; ")))
    }
}

/// Run a command; returns what to print on stdout
fn execute(command: &Commands, config: &EngineConfig) -> Result<String> {
    match command {
        Commands::Check { file } => {
            let source = read_source(file)?;
            let validation = causeway_lang::validate_source_with(&source, config.lex_mode);
            if let Some(error) = validation.error {
                return Err(eyre!("{}: {error}", file.display()));
            }
            causeway_engine::evaluate_with(&source, config.clone())
                .wrap_err_with(|| format!("{}", file.display()))?;
            Ok("ok".to_string())
        }
        Commands::Run { file, apply } => {
            let mut universe = load_universe(file, config)?;
            let mut lines = Vec::with_capacity(apply.len() + 1);
            for result in apply_all(&mut universe, apply) {
                lines.push(serde_json::to_string(&result)?);
            }
            lines.push(universe.merkle_root().to_hex());
            Ok(lines.join("\n"))
        }
        Commands::Export {
            file,
            domain,
            apply,
            output,
        } => {
            let mut universe = load_universe(file, config)?;
            apply_each(&mut universe, apply)?;
            let json = universe.to_brain(domain).to_json()?;
            match output {
                Some(path) => {
                    std::fs::write(path, &json)
                        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), domain = %domain, "brain written");
                    Ok(String::new())
                }
                None => Ok(json),
            }
        }
        Commands::Root { file, apply } => {
            let mut universe = load_universe(file, config)?;
            apply_each(&mut universe, apply)?;
            Ok(universe.merkle_root().to_hex())
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = load_config(cli.config.as_deref())?;
    let out = execute(&cli.command, &config)?;
    if !out.is_empty() {
        println!("{out}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeway_export::Brain;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCENARIO: &str = "state A { x = 1 }\nstate B { x = 2 }\ntransition go : A -> B";

    fn program(source: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(source.as_bytes()).unwrap();
        file
    }

    fn run(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(args)?;
        let config = load_config(cli.config.as_deref())?;
        execute(&cli.command, &config)
    }

    #[test]
    fn test_check() {
        let file = program(SCENARIO);
        let path = file.path().to_str().unwrap();
        assert_eq!(run(&["causeway", "check", path]).unwrap(), "ok");

        let broken = program("state A {\n  x =\n}");
        let err = run(&["causeway", "check", broken.path().to_str().unwrap()]).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_check_strict_config() {
        let file = program("state A { x = 1 } @");
        let path = file.path().to_str().unwrap();
        assert_eq!(run(&["causeway", "check", path]).unwrap(), "ok");

        let config = program(r#"{"lex_mode": "strict"}"#);
        let config_path = config.path().to_str().unwrap();
        assert!(run(&["causeway", "check", path, "--config", config_path]).is_err());
    }

    #[test]
    fn test_run_prints_results_and_root() {
        let file = program(SCENARIO);
        let path = file.path().to_str().unwrap();
        let out = run(&["causeway", "run", path, "--apply", "go", "--apply", "gone"]).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["valid"], true);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["valid"], false);
        assert_eq!(lines[2].len(), 64);
        assert_ne!(lines[2], "0".repeat(64));
    }

    #[test]
    fn test_root_matches_run() {
        let file = program(SCENARIO);
        let path = file.path().to_str().unwrap();
        let empty = run(&["causeway", "root", path]).unwrap();
        assert_eq!(empty, "0".repeat(64));

        let root = run(&["causeway", "root", path, "--apply", "go"]).unwrap();
        let out = run(&["causeway", "run", path, "--apply", "go"]).unwrap();
        assert_eq!(out.lines().last(), Some(root.as_str()));
    }

    #[test]
    fn test_root_fails_on_rejected_transition() {
        let file = program(SCENARIO);
        let path = file.path().to_str().unwrap();
        let err = run(&["causeway", "root", path, "--apply", "gone"]).unwrap_err();
        assert!(err.to_string().contains("unknown transition `gone`"));

        let err = run(&[
            "causeway", "export", path, "--domain", "core", "--apply", "go", "--apply", "gone",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("`gone`"));
    }

    #[test]
    fn test_export_to_file() {
        let file = program(SCENARIO);
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("brain.json");
        let out = run(&[
            "causeway",
            "export",
            file.path().to_str().unwrap(),
            "--domain",
            "core",
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        assert!(out.is_empty());

        let brain = Brain::from_json(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(brain.domain, "core");
        assert_eq!(brain.graph.nodes.len(), 2);
        assert!(brain.verify().is_ok());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = run(&["causeway", "root", "/nonexistent/program.cw"]).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/program.cw"));
    }

    #[test]
    fn test_log_format_flag() {
        let cli = Cli::try_parse_from(["causeway", "--log-format", "json", "root", "x"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(Cli::try_parse_from(["causeway", "--log-format", "xml", "root", "x"]).is_err());
    }
}
