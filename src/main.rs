//! Tidal yield entry point: CLI wiring and config-driven analysis runs.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tidal_yield::config::AnalysisConfig;
use tidal_yield::io::export::{export_curve_csv, export_flow_csv, export_power_csv};
use tidal_yield::pipeline::{run_energy, run_opportunity};

/// Tidal-turbine energy yield and maintenance-window analysis.
#[derive(Parser, Debug)]
#[command(name = "tidal-yield", version, about, long_about = None)]
struct Cli {
    /// Load analysis configuration from a TOML file
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Use a built-in preset (baseline, rotor_20m, rotor_16m)
    #[arg(long)]
    preset: Option<String>,

    /// Override the directory data paths are resolved against
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Skip the energy yield analysis
    #[arg(long)]
    skip_energy: bool,

    /// Skip the opportunity-window analysis
    #[arg(long)]
    skip_opportunity: bool,

    /// Export per-sample rotor power to CSV
    #[arg(long)]
    power_out: Option<PathBuf>,

    /// Export depth-averaged flow speed to CSV
    #[arg(long)]
    flow_out: Option<PathBuf>,

    /// Export measured vs fitted powercurves to CSV
    #[arg(long)]
    curve_out: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    // --config takes priority, then --preset, then baseline default
    let mut cfg = if let Some(ref path) = cli.config {
        AnalysisConfig::from_toml_file(path)?
    } else if let Some(ref name) = cli.preset {
        AnalysisConfig::from_preset(name)?
    } else {
        AnalysisConfig::baseline()
    };

    if let Some(ref dir) = cli.data_dir {
        cfg.data_dir = dir.clone();
    }

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("invalid configuration ({} errors)", errors.len());
    }
    Ok(cfg)
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = load_config(cli)?;

    if !cli.skip_energy {
        let outcome = run_energy(&cfg).context("energy yield analysis failed")?;
        println!("{}", outcome.report);

        let rate = outcome.report.sample_rate_hours;
        if let Some(ref path) = cli.power_out {
            export_power_csv(&outcome.report.rotors, rate, path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Rotor power written to {}", path.display());
        }
        if let Some(ref path) = cli.flow_out {
            export_flow_csv(&outcome.mean_speed_ms, rate, path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Flow speed written to {}", path.display());
        }
        if let Some(ref path) = cli.curve_out {
            export_curve_csv(&outcome.curve_rows(), path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Powercurves written to {}", path.display());
        }
    }

    if !cli.skip_opportunity {
        let report = run_opportunity(&cfg).context("opportunity analysis failed")?;
        if !cli.skip_energy {
            println!();
        }
        println!("{report}");
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
