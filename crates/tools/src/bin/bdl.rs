//!
//! Interpreter for the Bridge Description Language.
//!
//! Usage: `bdl <generate|validate|graph> FILE`

use bdl_tools::commands::{self, CommandError, GenerateOptions, Warnings};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "bdl", version)]
#[command(about = "Interpreter for the Bridge Description Language")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the Kubernetes manifests of a Bridge
    Generate {
        /// Path to the Bridge description file
        file: PathBuf,

        /// Wrap the manifests in a Bridge object
        #[arg(long)]
        bridge: bool,

        /// Write YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },

    /// Validate a Bridge without writing anything
    Validate {
        /// Path to the Bridge description file
        file: PathBuf,
    },

    /// Write the component graph of a Bridge in DOT format
    Graph {
        /// Path to the Bridge description file
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    bdl_tools::init_logging();

    let args = Args::parse();

    let stdout = io::stdout().lock();
    let result: Result<Warnings, CommandError> = match &args.command {
        Command::Generate { file, bridge, yaml } => {
            let opts = GenerateOptions {
                bridge: *bridge,
                yaml: *yaml,
            };
            commands::generate(file, opts, stdout)
        }
        Command::Validate { file } => commands::validate(file),
        Command::Graph { file } => commands::graph(file, stdout),
    };

    match result {
        Ok(warnings) => {
            if let Some(warnings) = warnings {
                eprint!("{warnings}");
            }
            Ok(())
        }
        Err(CommandError::Diagnostics(diags)) => {
            eprint!("{diags}");
            process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}
