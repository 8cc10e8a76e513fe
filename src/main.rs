//! Gaze Fixation CLI
//!
//! Classifies gaze recordings into fixation events.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gaze_fixation::{
    classify_fixations, classify_subjects, BatchOptions, BatchOutcome, Config, GazeRecording,
    Mode, ReportBuilder, VERSION,
};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gaze-fixation")]
#[command(version = VERSION)]
#[command(about = "Fixation detection (I-VT / I-DT) for eye-tracking recordings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a recording (or a JSON array of recordings)
    Classify {
        /// Input file with {"x": [...], "y": [...]}, or - for stdin
        #[arg(long, short)]
        input: PathBuf,

        /// Combination mode (and, or, ivt, idt or 0-3)
        #[arg(long)]
        mode: Option<Mode>,

        /// I-VT threshold in pixels per second
        #[arg(long)]
        velocity_threshold: Option<f64>,

        /// I-DT threshold in pixels
        #[arg(long)]
        dispersion_threshold: Option<f64>,

        /// Minimum fixation duration in seconds
        #[arg(long)]
        min_duration: Option<f64>,

        /// Sampling rate in Hz
        #[arg(long, conflicts_with_all = ["time_interval", "dataset"])]
        sample_rate: Option<f64>,

        /// Seconds between samples
        #[arg(long)]
        time_interval: Option<f64>,

        /// Dataset catalogue file (dataset_config.json)
        #[arg(long, requires = "dataset")]
        dataset_config: Option<PathBuf>,

        /// Dataset whose sampling rate to use
        #[arg(long, requires = "dataset_config")]
        dataset: Option<String>,

        /// Pass raw scanpaths through instead of reducing them to fixations
        #[arg(long)]
        raw: bool,

        /// Output format (json or jsonl)
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Show configuration
    Config {
        /// Write the current configuration to the config file
        #[arg(long)]
        save: bool,
    },

    /// List combination modes
    Modes,
}

/// Either a single recording or several.
#[derive(Deserialize)]
#[serde(untagged)]
enum Input {
    Many(Vec<GazeRecording>),
    One(GazeRecording),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Classify {
            input,
            mode,
            velocity_threshold,
            dispersion_threshold,
            min_duration,
            sample_rate,
            time_interval,
            dataset_config,
            dataset,
            raw,
            format,
        } => {
            let overrides = Overrides {
                mode,
                velocity_threshold,
                dispersion_threshold,
                min_duration,
                sample_rate,
                time_interval,
                dataset_config,
                dataset,
                raw,
            };
            cmd_classify(&input, overrides, &format)
        }
        Commands::Config { save } => cmd_config(save),
        Commands::Modes => {
            cmd_modes();
            Ok(())
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Command-line values that take precedence over the config file.
struct Overrides {
    mode: Option<Mode>,
    velocity_threshold: Option<f64>,
    dispersion_threshold: Option<f64>,
    min_duration: Option<f64>,
    sample_rate: Option<f64>,
    time_interval: Option<f64>,
    dataset_config: Option<PathBuf>,
    dataset: Option<String>,
    raw: bool,
}

impl Overrides {
    fn apply(self, mut config: Config) -> (Config, Option<f64>) {
        if let Some(mode) = self.mode {
            config.params.mode = mode;
        }
        if let Some(v) = self.velocity_threshold {
            config.params.velocity_threshold = v;
        }
        if let Some(d) = self.dispersion_threshold {
            config.params.dispersion_threshold = d;
        }
        if let Some(m) = self.min_duration {
            config.params.min_fixation_duration = m;
        }
        if let Some(rate) = self.sample_rate {
            config.sample_rate_hz = rate;
            config.dataset = None;
        }
        if self.dataset_config.is_some() {
            config.dataset_config_path = self.dataset_config;
            config.dataset = self.dataset;
        }
        if self.raw {
            config.compute_fixations = false;
        }
        (config, self.time_interval)
    }
}

fn read_input(path: &Path) -> Result<Input> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };

    serde_json::from_str(&content).context("parsing recording JSON")
}

fn cmd_classify(input: &Path, overrides: Overrides, format: &str) -> Result<()> {
    if format != "json" && format != "jsonl" {
        bail!("unknown format `{format}` (use json or jsonl)");
    }

    let (config, time_interval) = overrides.apply(Config::load().unwrap_or_default());
    let time_interval = match time_interval {
        Some(t) => t,
        None => config.time_interval()?,
    };
    info!(
        mode = %config.params.mode,
        time_interval,
        compute_fixations = config.compute_fixations,
        "classifying"
    );

    match read_input(input)? {
        Input::One(recording) if config.compute_fixations => {
            let series = recording.series(time_interval)?;
            let result = classify_fixations(&series, &config.params)?;
            let report = ReportBuilder::new().build(
                recording.subject.as_deref(),
                &result,
                &config.params,
                time_interval,
            );
            print_json(&report, format)?;
        }
        Input::One(recording) => print_batch(vec![recording], &config, time_interval, format)?,
        Input::Many(recordings) => print_batch(recordings, &config, time_interval, format)?,
    }

    Ok(())
}

fn print_batch(
    recordings: Vec<GazeRecording>,
    config: &Config,
    time_interval: f64,
    format: &str,
) -> Result<()> {
    let options = BatchOptions::new(config.params, time_interval)
        .with_compute_fixations(config.compute_fixations);
    // Per-subject failures are logged by the batch and listed in the JSON body.
    let outcome = classify_subjects(&recordings, &options)?;

    if format == "jsonl" {
        for scanpath in outcome.scanpaths.values() {
            println!("{}", serde_json::to_string(scanpath)?);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&batch_body(&outcome))?);
    }

    Ok(())
}

fn batch_body(outcome: &BatchOutcome) -> serde_json::Value {
    let failures: std::collections::BTreeMap<&str, String> = outcome
        .failures
        .iter()
        .map(|(k, e)| (k.as_str(), e.to_string()))
        .collect();
    serde_json::json!({
        "max_scanpath_len": outcome.max_scanpath_len(),
        "scanpaths": outcome.scanpaths,
        "failures": failures,
    })
}

fn print_json<T: serde::Serialize>(value: &T, format: &str) -> Result<()> {
    let text = if format == "jsonl" {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{text}");
    Ok(())
}

fn cmd_config(save: bool) -> Result<()> {
    let config = Config::load()?;
    config.validate()?;

    println!("Configuration file: {}", Config::config_path().display());
    println!("{}", serde_json::to_string_pretty(&config)?);

    if save {
        config.save()?;
        println!();
        println!("Saved.");
    }
    Ok(())
}

fn cmd_modes() {
    println!("Combination modes:");
    for mode in Mode::ALL {
        let name = serde_json::to_value(mode)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        println!("  {}  {:<8} {:<5} {}", mode.code(), name, mode.label(), describe(mode));
    }
}

fn describe(mode: Mode) -> &'static str {
    match mode {
        Mode::And => "fixation where both I-VT and I-DT agree",
        Mode::Or => "fixation where either I-VT or I-DT reports one",
        Mode::VtOnly => "velocity threshold only",
        Mode::DtOnly => "dispersion threshold only",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rate_conflicts_with_dataset() {
        let result = Cli::try_parse_from([
            "gaze-fixation",
            "classify",
            "--input",
            "rec.json",
            "--sample-rate",
            "500",
            "--dataset-config",
            "dataset_config.json",
            "--dataset",
            "MIT1003",
        ]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "gaze-fixation",
            "classify",
            "--input",
            "rec.json",
            "--sample-rate",
            "500",
            "--time-interval",
            "0.002",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_batch_body_lists_failures() {
        let recordings = vec![
            GazeRecording::new("good", vec![0.0, 0.0, 0.0], vec![0.0, 0.0, 0.0]),
            GazeRecording::new("bad", vec![0.0, 1.0], vec![0.0]),
        ];
        let options = BatchOptions::new(Default::default(), 0.1);
        let outcome = classify_subjects(&recordings, &options).unwrap();

        let body = batch_body(&outcome);
        assert!(body["scanpaths"].get("good").is_some());
        assert!(body["scanpaths"].get("bad").is_none());
        assert_eq!(body["failures"].as_object().map(|f| f.len()), Some(1));
        assert!(body["failures"]["bad"]
            .as_str()
            .is_some_and(|msg| msg.contains("length mismatch")));
    }

    #[test]
    fn test_classify_flags_parse() {
        let cli = Cli::try_parse_from([
            "gaze-fixation",
            "classify",
            "--input",
            "-",
            "--mode",
            "or",
            "--sample-rate",
            "500",
        ])
        .unwrap();

        match cli.command {
            Commands::Classify {
                mode, sample_rate, ..
            } => {
                assert_eq!(mode, Some(Mode::Or));
                assert_eq!(sample_rate, Some(500.0));
            }
            _ => panic!("expected classify"),
        }
    }
}
