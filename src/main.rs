use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use lanerev::{CpuFeatures, RemainderPolicy, ReverserConfig, Species, VectorReverser, CONFIG};
use log::{debug, info};
use serde::Serialize;

/// Reverse a list of 32-bit integers with SIMD lane shuffles.
#[derive(Debug, Parser)]
#[command(name = "lanerev", version)]
struct Cli {
    /// Integers to reverse. Read whitespace-separated from stdin when absent.
    #[arg(allow_negative_numbers = true, value_name = "VALUE")]
    values: Vec<i32>,

    /// Force a backend: avx512, avx2, sse2, neon or portable.
    #[arg(long, value_name = "NAME")]
    species: Option<Species>,

    /// Reject inputs whose length is not a multiple of the lane width.
    #[arg(long)]
    strict: bool,

    /// JSON config file. Overrides LANEREV_CONFIG.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print JSON: the reversed array, or the `--features` report.
    #[arg(long)]
    json: bool,

    /// Print detected CPU features and lane widths, then exit.
    #[arg(long)]
    features: bool,
}

fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();

    if cli.features {
        let report = FeatureReport::current();
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            report.print_table();
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => ReverserConfig::load(path)?,
        None => *CONFIG,
    };
    if let Some(species) = cli.species {
        config.species = Some(species);
    }
    if cli.strict {
        config.remainder = RemainderPolicy::Strict;
    }

    let reverser =
        VectorReverser::from_config(&config).context("Failed to set up the reverser")?;
    info!(
        "Using {} ({} lanes, {:?})",
        reverser.species(),
        reverser.lane_width(),
        reverser.policy()
    );

    let values = if cli.values.is_empty() {
        read_stdin_values()?
    } else {
        cli.values
    };
    debug!("Read {} values", values.len());

    let reversed = reverser
        .reverse(&values)
        .context("Failed to reverse input")?;

    if cli.json {
        println!("{}", serde_json::to_string(&reversed)?);
    } else {
        let line: Vec<String> = reversed.iter().map(i32::to_string).collect();
        println!("{}", line.join(" "));
    }

    Ok(())
}

fn read_stdin_values() -> anyhow::Result<Vec<i32>> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read values from stdin")?;

    let mut values = Vec::new();
    for token in text.split_whitespace() {
        match token.parse::<i32>() {
            Ok(v) => values.push(v),
            Err(e) => bail!("Invalid integer '{}' on stdin: {}", token, e),
        }
    }
    Ok(values)
}

/// What `--features` reports about the running CPU.
#[derive(Debug, Serialize)]
struct FeatureReport {
    arch: &'static str,
    features: CpuFeatures,
    preferred: Species,
    supported: Vec<Species>,
}

impl FeatureReport {
    fn current() -> Self {
        let arch = if cfg!(target_arch = "x86_64") {
            "x86_64"
        } else if cfg!(target_arch = "aarch64") {
            "aarch64"
        } else {
            "other"
        };
        Self {
            arch,
            features: CpuFeatures::current(),
            preferred: Species::preferred(),
            supported: Species::supported(),
        }
    }

    fn print_table(&self) {
        println!("Architecture: {}", self.arch);
        println!("Features: {:?}", self.features);
        println!("{:<10} {:<6} {:<14}", "Species", "Lanes", "Status");
        for species in Species::ALL {
            let status = if self.supported.contains(&species) {
                "Supported"
            } else {
                "Not Supported"
            };
            println!("{:<10} {:<6} {:<14}", species.name(), species.lane_width(), status);
        }
        println!("Preferred: {}", self.preferred);
    }
}
