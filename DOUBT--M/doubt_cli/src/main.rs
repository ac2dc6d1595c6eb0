use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doubt_engine::{
    report, telemetry::FileEventPublisher, AnalysisContext, AnalysisInput, ConvergenceStudy,
    DoubtOptions, DoubtRuntime, DoubtTelemetry, EvidenceContext,
};
use serde::Serialize;
use shared_logging::LogLevel;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "doubt", version, about = "Recursive doubt analysis of statements")]
struct Cli {
    /// TOML file with engine options.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// JSON-lines log destination.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// JSON-lines event destination.
    #[arg(long, global = true)]
    event_log: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Walks the doubt levels over a statement.
    Analyze {
        statement: String,
        #[arg(long)]
        context: Option<String>,
        #[arg(long, default_value_t = 5)]
        depth: u32,
        #[arg(long)]
        json: bool,
    },
    /// Scores certainty of a statement against evidence.
    Assess {
        statement: String,
        /// Repeat for each piece of evidence.
        #[arg(long)]
        evidence: Vec<String>,
        #[arg(long)]
        methodology: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Measures agreement between a topic and perspectives on it.
    Converge {
        topic: String,
        /// Repeat for each perspective.
        #[arg(long)]
        perspective: Vec<String>,
        #[arg(long)]
        framework: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Analyzes every line of a JSON-lines file and prints aggregate statistics.
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = match &cli.config {
        Some(path) => DoubtOptions::load(path)?,
        None => DoubtOptions::default(),
    };
    let mut runtime = DoubtRuntime::new(options)?;
    if let Some(telemetry) = build_telemetry(cli.log_file.as_deref(), cli.event_log.as_deref())? {
        runtime = runtime.with_telemetry(telemetry);
    }
    let executor = Runtime::new().context("starting tokio runtime")?;
    executor.block_on(run(&runtime, cli.command))
}

fn build_telemetry(
    log_file: Option<&Path>,
    event_log: Option<&Path>,
) -> Result<Option<DoubtTelemetry>> {
    if log_file.is_none() && event_log.is_none() {
        return Ok(None);
    }
    let mut builder = DoubtTelemetry::builder("doubt-cli");
    if let Some(path) = log_file {
        builder = builder.log_path(path);
    }
    if let Some(path) = event_log {
        builder = builder.event_publisher(Arc::new(FileEventPublisher::new(path)?));
    }
    builder.build().map(Some)
}

async fn run(runtime: &DoubtRuntime, command: Commands) -> Result<()> {
    match command {
        Commands::Analyze {
            statement,
            context,
            depth,
            json,
        } => {
            let mut input = AnalysisInput::new(statement).with_depth(depth);
            if let Some(context) = context {
                input = input.with_context(AnalysisContext::Text(context));
            }
            let analysis = runtime.analyze(input).await?;
            emit(&analysis, json, || report::render_analysis(&analysis))
        }
        Commands::Assess {
            statement,
            evidence,
            methodology,
            json,
        } => {
            let context = EvidenceContext {
                evidence,
                methodology,
            };
            let assessment = runtime.assess_certainty(&statement, Some(context)).await?;
            emit(&assessment, json, || report::render_assessment(&assessment))
        }
        Commands::Converge {
            topic,
            perspective,
            framework,
            json,
        } => {
            let study = ConvergenceStudy {
                topic,
                perspectives: perspective,
                philosophical_framework: framework,
            };
            let outcome = runtime.study(&study).await?;
            emit(&outcome, json, || report::render_study(&outcome))
        }
        Commands::Batch { input, json } => {
            let inputs = read_inputs(&input)?;
            for (line, request) in inputs {
                if let Err(err) = runtime.analyze(request).await {
                    if let Some(tel) = runtime.telemetry() {
                        let _ = tel.log(
                            LogLevel::Warn,
                            "doubt.batch.skipped",
                            serde_json::json!({ "line": line, "error": err.to_string() }),
                        );
                    }
                    eprintln!("line {line}: {err}");
                }
            }
            let stats = runtime.statistics();
            emit(&stats, json, || report::render_statistics(&stats))
        }
    }
}

fn emit<T: Serialize>(value: &T, json: bool, render: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", render());
    }
    Ok(())
}

fn read_inputs(path: &Path) -> Result<Vec<(usize, AnalysisInput)>> {
    let file = File::open(path).with_context(|| format!("opening batch input {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut inputs = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let input: AnalysisInput = serde_json::from_str(&line)
            .with_context(|| format!("parsing {} line {}", path.display(), index + 1))?;
        inputs.push((index + 1, input));
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "doubt",
            "analyze",
            "The sky is blue",
            "--depth",
            "3",
            "--log-file",
            "doubt.log",
        ])
        .unwrap();
        assert_eq!(cli.log_file, Some(PathBuf::from("doubt.log")));
        match cli.command {
            Commands::Analyze { depth, json, .. } => {
                assert_eq!(depth, 3);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn repeated_flags_collect() {
        let cli = Cli::try_parse_from([
            "doubt",
            "converge",
            "Mind is physical",
            "--perspective",
            "a",
            "--perspective",
            "b",
        ])
        .unwrap();
        match cli.command {
            Commands::Converge { perspective, framework, .. } => {
                assert_eq!(perspective, vec!["a", "b"]);
                assert!(framework.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn batch_input_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inputs.jsonl");
        fs::write(
            &path,
            "{\"statement\":\"The sky is blue\",\"depth\":2}\n\n\
             {\"statement\":\"Water is wet\",\"context\":\"kitchen\"}\n",
        )
        .unwrap();
        let inputs = read_inputs(&path).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].0, 1);
        assert_eq!(inputs[0].1.depth, Some(2));
        assert_eq!(inputs[1].0, 3);
        assert_eq!(
            inputs[1].1.context,
            Some(AnalysisContext::Text("kitchen".into()))
        );
    }

    #[test]
    fn batch_run_aggregates() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("inputs.jsonl");
        let log = dir.path().join("logs/doubt.log");
        fs::write(
            &input,
            "{\"statement\":\"The sky is blue\",\"depth\":2}\n\
             {\"statement\":\" \"}\n\
             {\"depth\":2}\n",
        )
        .unwrap();
        let telemetry = build_telemetry(Some(&log), None).unwrap().unwrap();
        let runtime = DoubtRuntime::new(DoubtOptions::default())
            .unwrap()
            .with_telemetry(telemetry);
        Runtime::new()
            .unwrap()
            .block_on(run(&runtime, Commands::Batch { input, json: true }))
            .unwrap();
        assert_eq!(runtime.statistics().total_analyses, 1);
        let content = fs::read_to_string(log).unwrap();
        assert!(content.contains("doubt.batch.skipped"));
    }
}
