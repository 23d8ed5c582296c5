// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::{Parser, Subcommand};
use labelsnip_cli::{process, rescale, restructure};

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Process(process::ProcessArgs),
    Rescale(rescale::RescaleArgs),
    Restructure(restructure::RestructureArgs),
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Process(process_args)) => process::process(process_args),
        Some(Commands::Rescale(rescale_args)) => rescale::rescale(rescale_args),
        Some(Commands::Restructure(restructure_args)) => restructure::restructure(restructure_args),
        None => {}
    }
}
