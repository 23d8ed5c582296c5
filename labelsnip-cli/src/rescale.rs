// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::Path;

use clap::Args;

use labelsnip_core::pipeline;
use labelsnip_core::ut;

#[derive(Debug, Args)]
#[command(about = "Rewrite an annotation file for an image with a different resolution.")]
pub struct RescaleArgs {
    #[arg(short = 'i', long, help = "Annotation file (.json).", required = true)]
    pub input: Option<String>,

    #[arg(short = 's', long, help = "Source resolution in ppi.", required = true)]
    pub src_ppi: Option<f64>,

    #[arg(short = 't', long, help = "Target resolution in ppi.", required = true)]
    pub target_ppi: Option<f64>,

    #[arg(
        short = 'o',
        long,
        help = "Output directory. Defaults to the directory of the annotation file."
    )]
    pub output: Option<String>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn rescale(args: &RescaleArgs) {
    let input = args.input.to_owned().unwrap_or_default();

    let is_json = Path::new(&input)
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if !is_json {
        eprintln!("[labelsnip::rescale] ERROR: Invalid file extension. Input must end with .json.");
        std::process::exit(1);
    }

    let (Some(src_ppi), Some(target_ppi)) = (args.src_ppi, args.target_ppi) else {
        eprintln!("[labelsnip::rescale] ERROR: Source and target resolution must be provided.");
        std::process::exit(1);
    };

    if let Some(output) = args.output.as_deref() {
        if !Path::new(output).is_dir() {
            eprintln!("[labelsnip::rescale] ERROR: Output directory {} does not exist.", output);
            std::process::exit(1);
        }
    }

    let output = pipeline::rescale_annotation(
        &input,
        src_ppi,
        target_ppi,
        args.output.as_deref().map(Path::new),
    )
    .unwrap_or_else(|err| {
        eprintln!("[labelsnip::rescale] ERROR: {}", err);
        std::process::exit(1);
    });

    ut::track::progress_log(
        &format!(
            "Rescaled {} by {} and saved {}.",
            input,
            target_ppi / src_ppi,
            output.display()
        ),
        args.verbose,
    );
}
