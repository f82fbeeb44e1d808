use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use skew_sudoku::cli::DEFAULT_SKEW_INPUT;
use skew_sudoku::logging::init_logging;
use skew_sudoku::{
    draw_segments, draw_skew_indicator, estimate_skew, load_grayscale, save_image, SkewCli,
    SkewConfig, VisionError,
};

fn run(cli: &SkewCli) -> Result<()> {
    // Load input image
    let src = load_grayscale(&cli.input)?;
    let config = SkewConfig::default();

    let estimate = estimate_skew(&src, &config)?;

    println!("Median angle: {}", estimate.median_angle);
    println!("Corrected Angle: {}", estimate.corrected_angle);

    if let Some(path) = &cli.segments {
        let overlay = draw_segments(&estimate.edges, &estimate.segments);
        save_image(&overlay, path).context("Failed to save segment overlay")?;
        tracing::info!(?path, "saved segment overlay");
    }

    // Save result
    let output_path = cli.output_path();
    let annotated = draw_skew_indicator(&src, estimate.corrected_angle);
    save_image(&annotated, &output_path)
        .with_context(|| format!("Failed to save output: {:?}", output_path))?;
    tracing::info!(path = ?output_path, "saved skew indicator");

    Ok(())
}

fn main() -> ExitCode {
    let cli = SkewCli::parse();

    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {:#}", err);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            if matches!(err.downcast_ref::<VisionError>(), Some(VisionError::ImageLoad { .. })) {
                eprintln!("Usage: skew [image_name -- default {}]", DEFAULT_SKEW_INPUT);
            }
            // -1 as seen by the shell
            ExitCode::from(255)
        }
    }
}
