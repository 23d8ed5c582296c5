// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::PathBuf;

use clap::Args;

use labelsnip_core::pipeline::{self, ProcessOptions, SaveMode};
use labelsnip_core::ut;

#[derive(Debug, Args)]
#[command(about = "Cut labelled polygons out of annotated images into snippet folders.")]
pub struct ProcessArgs {
    #[arg(short = 'i', long, help = "Directory of annotation files.", required = true)]
    pub input: Option<String>,

    #[arg(
        short = 'o',
        long,
        help = "Snippet directory. Defaults to Snippets inside the input directory."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'a',
        long,
        help = "Archive for processed annotation files. Defaults to Archive inside the input directory."
    )]
    pub archive: Option<String>,

    #[arg(
        short = 'm',
        long,
        help = "Save mode of a new snippet directory. One of labels or annotations."
    )]
    pub mode: Option<String>,

    #[arg(long, help = "Skip annotation files that cannot be decoded.")]
    pub skip_invalid: bool,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn process(args: &ProcessArgs) {
    let save_mode = args
        .mode
        .as_deref()
        .map(str::parse::<SaveMode>)
        .transpose()
        .unwrap_or_else(|err| {
            eprintln!("[labelsnip::process] ERROR: {}", err);
            std::process::exit(1);
        });

    let input = args.input.to_owned().unwrap_or_else(|| {
        eprintln!("[labelsnip::process] ERROR: An input directory must be provided.");
        std::process::exit(1);
    });

    let config = ProcessOptions::new(&input)
        .with_output_dir(args.output.to_owned().map(PathBuf::from))
        .with_archive_dir(args.archive.to_owned().map(PathBuf::from))
        .with_save_mode(save_mode)
        .with_skip_invalid(args.skip_invalid)
        .with_verbose(args.verbose)
        .resolve()
        .unwrap_or_else(|err| {
            eprintln!("[labelsnip::process] ERROR: {}", err);
            std::process::exit(1);
        });

    let batch = pipeline::process_batch(&config).unwrap_or_else(|err| {
        eprintln!("[labelsnip::process] ERROR: {}", err);
        std::process::exit(1);
    });

    if !batch.skipped.is_empty() {
        ut::track::progress_warn(&format!(
            "{} annotation files could not be decoded and were skipped: {}",
            batch.skipped.len(),
            batch.skipped.join(", ")
        ));
    }
}
