use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use stationcfg::{paths, util, ConfidentialOptions, HardwareFacts, MachineOptions};

#[derive(Parser)]
#[command(name = "station", about = "Declarative workstation configuration composer", version)]
struct Cli {
    /// Machine options file
    #[arg(long, global = true)]
    machine: Option<PathBuf>,

    /// Confidential options file
    #[arg(long, global = true)]
    confidential: Option<PathBuf>,

    /// Hardware facts file
    #[arg(long, global = true)]
    hardware: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose the resolved system spec from the machine inputs
    Render {
        /// Write the resolved spec here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Validate the machine inputs without producing a spec
    Check,
}

fn load_inputs(cli: &Cli) -> Result<(MachineOptions, ConfidentialOptions, HardwareFacts)> {
    let machine_path = cli
        .machine
        .clone()
        .unwrap_or_else(paths::machine_options_file);
    let confidential_path = cli
        .confidential
        .clone()
        .unwrap_or_else(paths::confidential_file);
    let hardware_path = cli
        .hardware
        .clone()
        .unwrap_or_else(paths::hardware_facts_file);

    let options = MachineOptions::load(machine_path)?;
    let confidential = ConfidentialOptions::load(confidential_path)?;
    let facts = HardwareFacts::load(hardware_path)?;

    Ok((options, confidential, facts))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Render { output } => {
            let (options, confidential, facts) = load_inputs(&cli)?;
            let spec = stationcfg::render(&options, &confidential, &facts)?;

            let rendered = toml::to_string_pretty(&spec)
                .context("Failed to serialize resolved spec")?;

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        util::ensure_dir(parent)?;
                    }
                    util::atomic_write(path, rendered.as_bytes())?;
                    eprintln!("Resolved spec written to {}", path.display());
                }
                None => print!("{rendered}"),
            }
        }
        Commands::Check => {
            load_inputs(&cli)?;
            eprintln!("Machine inputs are valid");
        }
    }

    Ok(())
}
