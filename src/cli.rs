use clap::Parser;
use std::path::{Path, PathBuf};

use crate::error::{Result, VisionError};
use crate::geometry::Quad;
use crate::sudoku::Background;

pub const DEFAULT_SKEW_INPUT: &str = "rotation/bricks.png";

pub const SUDOKU_USAGE: &str =
    "Usage: sudoku <input_filename>.png x_UL y_UL x_UR y_UR x_LL y_LL x_LR y_LR";

#[derive(Parser, Debug)]
#[command(name = "skew")]
#[command(version, about = "Estimate the skew angle of an image from its dominant line segments")]
pub struct SkewCli {
    /// Input image path
    #[arg(default_value = DEFAULT_SKEW_INPUT)]
    pub input: PathBuf,

    /// Output path [default: input with .png replaced by _sudoku.png]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the detected segments drawn over the edge map
    #[arg(long)]
    pub segments: Option<PathBuf>,

    /// Show detection details
    #[arg(short, long)]
    pub verbose: bool,
}

impl SkewCli {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| derive_output_path(&self.input))
    }
}

#[derive(Parser, Debug)]
#[command(name = "sudoku")]
#[command(
    version,
    about = "Detect which cells of a Sudoku grid hold a digit",
    override_usage = "sudoku <input_filename>.png x_UL y_UL x_UR y_UR x_LL y_LL x_LR y_LR"
)]
pub struct SudokuCli {
    /// Input image path
    pub input: Option<PathBuf>,

    /// Corner coordinates: x_UL y_UL x_UR y_UR x_LL y_LL x_LR y_LR
    #[arg(allow_negative_numbers = true)]
    pub coords: Vec<String>,

    /// Output path [default: input with .png replaced by _sudoku.png]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the rectified edge image
    #[arg(long)]
    pub warped: Option<PathBuf>,

    /// Image the grid overlay is drawn on
    #[arg(long, value_enum, default_value_t = Background::Edges)]
    pub background: Background,

    /// Show detection details
    #[arg(short, long)]
    pub verbose: bool,
}

impl SudokuCli {
    /// Input path and corners, or None when the positional count is not exactly nine.
    ///
    /// The count is checked before any coordinate is parsed.
    pub fn job(&self) -> Result<Option<(&Path, Quad)>> {
        let Some(input) = self.input.as_deref() else {
            return Ok(None);
        };
        if self.coords.len() != 8 {
            return Ok(None);
        }

        let mut coords = [0.0; 8];
        for (slot, text) in coords.iter_mut().zip(&self.coords) {
            *slot = parse_coordinate(text)?;
        }
        Ok(Some((input, Quad::from_coords(coords))))
    }

    pub fn output_path(&self, input: &Path) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| derive_output_path(input))
    }
}

fn parse_coordinate(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| VisionError::InvalidCoordinate(text.to_string()))
}

/// Replace every `.png` in the path with `_sudoku.png`.
///
/// Paths without `.png` get the suffix appended so the input is never overwritten.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let text = input.to_string_lossy();
    if text.contains(".png") {
        PathBuf::from(text.replace(".png", "_sudoku.png"))
    } else {
        PathBuf::from(format!("{}_sudoku.png", text))
    }
}
