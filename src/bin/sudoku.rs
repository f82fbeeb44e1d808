use anyhow::{Context, Result};
use clap::Parser;

use skew_sudoku::cli::SUDOKU_USAGE;
use skew_sudoku::logging::init_logging;
use skew_sudoku::{analyze_sudoku, load_grayscale, save_image, SudokuCli, SudokuConfig};

fn main() -> Result<()> {
    let cli = SudokuCli::parse();

    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {:#}", err);
    }

    let Some((input, quad)) = cli.job()? else {
        println!("{}", SUDOKU_USAGE);
        return Ok(());
    };

    let config = SudokuConfig::default();
    let img = load_grayscale(input)?;

    tracing::debug!(?quad, "grid corners");

    let analysis = analyze_sudoku(&img, &quad, &config)
        .context("Failed to analyze Sudoku grid")?;

    // Print 9x9 array
    print!("{}", analysis.occupancy);

    if let Some(path) = &cli.warped {
        save_image(&analysis.warped, path).context("Failed to save rectified image")?;
        tracing::info!(?path, "saved rectified edges");
    }

    // Save visualization
    let output_path = cli.output_path(input);
    let annotated = analysis.render(&img, cli.background, &config);
    save_image(&annotated, &output_path)
        .with_context(|| format!("Failed to save output: {:?}", output_path))?;
    tracing::info!(path = ?output_path, "saved grid overlay");

    Ok(())
}
