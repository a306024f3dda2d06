mod common;
mod logic;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use gamebridge_core::BridgeConfig;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::split_csv;
use logic::{LogicTester, Scenario, ScenarioResult, get_scenario, list_scenarios};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "gamebridge-tester", version = "0.1.0")]
#[command(about = "Scripted QA runs for GameBridge achievement and session plumbing")]
struct Args {
    /// Scenarios to run (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional JSON bridge configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    let config = load_config(&args)?;
    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let start_time = Instant::now();
    let scenarios = resolve_scenarios(&args.scenarios);
    let tester = LogicTester::new(config, args.verbose);
    let results = tester.run_all(&scenarios).await;

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:15} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn load_config(args: &Args) -> Result<BridgeConfig> {
    match &args.config {
        Some(path) => BridgeConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(BridgeConfig::default()),
    }
}

fn announce_banner() {
    println!("{}", "🎮 GameBridge Automated Tester".bright_cyan().bold());
    println!("{}", "==============================".cyan());
}

fn resolve_scenarios(scenarios_arg: &str) -> Vec<Box<dyn Scenario>> {
    let names = split_csv(scenarios_arg);
    if names.iter().any(|n| n == "all") {
        return logic::catalog();
    }
    names
        .iter()
        .filter_map(|name| {
            let scenario = get_scenario(name);
            if scenario.is_none() {
                eprintln!("⚠️  Unknown scenario: {}", name.yellow());
            }
            scenario
        })
        .collect()
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => {
            logic::reports::generate_json_report(&mut output_target, results)?;
        }
        ReportFormat::Markdown => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# GameBridge Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        ReportFormat::Console => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            let duration = start_time.elapsed();
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            scenarios: "all".to_string(),
            list_scenarios: false,
            report: ReportFormat::Json,
            config: None,
            verbose: false,
            output: None,
        }
    }

    #[test]
    fn resolve_all_expands_catalog() {
        assert_eq!(resolve_scenarios("all").len(), logic::catalog().len());
    }

    #[test]
    fn resolve_skips_unknown_names() {
        let scenarios = resolve_scenarios("smoke,bogus,refresh");
        let names: Vec<_> = scenarios.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["smoke", "refresh"]);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let mut args = base_args();
        args.config = Some(PathBuf::from("/nonexistent/bridge.json"));
        let err = load_config(&args).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/bridge.json"));
    }

    #[test]
    fn defaults_without_config_file() {
        assert_eq!(load_config(&base_args()).unwrap(), BridgeConfig::default());
    }
}
