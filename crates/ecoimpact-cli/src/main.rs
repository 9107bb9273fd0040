//! EcoImpact command-line front end.
//!
//! Reads detection or material-count JSON from a file or stdin, runs the
//! impact pipeline and prints the result as JSON on stdout. Logs go to
//! stderr.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ecoimpact_core::{
    extract_detections_from_str, Aggregator, DetectionPipeline, ImpactError, ImpactOutcome,
    PipelineConfig,
};
use ecoimpact_models::{material_catalog, MaterialCount};

/// Exit code for rejected input (unknown material, non-positive count).
const EXIT_VALIDATION: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "ecoimpact", version, about = "Turn recyclable detections into an impact report")]
struct Cli {
    /// Minimum detector confidence (overrides ECOIMPACT_CONFIDENCE_MIN)
    #[arg(long, global = true)]
    confidence_min: Option<f64>,

    /// Minimum bounding-box area (overrides ECOIMPACT_AREA_MIN)
    #[arg(long, global = true)]
    area_min: Option<f64>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Filter, classify and score raw detections (or a vision workflow payload)
    Analyze {
        /// Input file; omit or use "-" for stdin
        file: Option<PathBuf>,
    },
    /// Score a batch of (material, count) pairs
    Calculate {
        /// Input file; omit or use "-" for stdin
        file: Option<PathBuf>,
    },
    /// List supported materials and their factors
    Materials,
}

/// Accepted shapes for `calculate` input.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CalculateRequest {
    Wrapped { detections: Vec<MaterialCount> },
    Bare(Vec<MaterialCount>),
}

impl CalculateRequest {
    fn into_pairs(self) -> Vec<MaterialCount> {
        match self {
            CalculateRequest::Wrapped { detections } => detections,
            CalculateRequest::Bare(pairs) => pairs,
        }
    }
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ecoimpact=info,ecoimpact_core=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true),
            )
            .with(env_filter)
            .init();
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn pipeline_config(cli: &Cli) -> PipelineConfig {
    let mut config = PipelineConfig::from_env();
    if let Some(confidence_min) = cli.confidence_min {
        config = config.with_confidence_min(confidence_min);
    }
    if let Some(area_min) = cli.area_min {
        config = config.with_area_min(area_min);
    }
    config
}

fn analyze(config: PipelineConfig, input: &str) -> Result<Value> {
    let detections = extract_detections_from_str(input)?;
    let pipeline = DetectionPipeline::new(config)?;
    let analysis = pipeline.analyze(&detections)?;
    Ok(serde_json::to_value(analysis)?)
}

fn calculate(config: PipelineConfig, input: &str) -> Result<Value> {
    let request: CalculateRequest =
        serde_json::from_str(input).context("Expected a list of {material, count} pairs")?;
    let aggregator = Aggregator::default().with_parallel(config.parallel_aggregation);

    match aggregator.aggregate(&request.into_pairs())? {
        ImpactOutcome::Report(report) => {
            info!("{}", report.to_description());
            Ok(serde_json::to_value(report)?)
        }
        ImpactOutcome::Empty => Ok(json!({ "message": "nothing to report" })),
    }
}

fn run(cli: &Cli) -> Result<Value> {
    let config = pipeline_config(cli);
    match &cli.command {
        Command::Analyze { file } => analyze(config, &read_input(file.as_deref())?),
        Command::Calculate { file } => calculate(config, &read_input(file.as_deref())?),
        Command::Materials => Ok(serde_json::to_value(material_catalog())?),
    }
}

fn is_validation_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ImpactError>()
        .map(ImpactError::is_validation)
        .unwrap_or(false)
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let output = run(&cli).and_then(|value| {
        let text = if cli.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(text)
    });

    match output {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            if is_validation_error(&e) {
                ExitCode::from(EXIT_VALIDATION)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
