// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use clap::Args;

use labelsnip_core::pipeline;

#[derive(Debug, Args)]
#[command(about = "Switch a snippet directory between label and annotation folder layouts.")]
pub struct RestructureArgs {
    #[arg(short = 'i', long, help = "Snippet directory.", required = true)]
    pub input: Option<String>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn restructure(args: &RestructureArgs) {
    let input = args.input.to_owned().unwrap_or_default();

    pipeline::restructure(&input, args.verbose).unwrap_or_else(|err| {
        eprintln!("[labelsnip::restructure] ERROR: {}", err);
        std::process::exit(1);
    });
}
