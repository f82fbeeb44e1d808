pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod hough;
pub mod io;
pub mod logging;
pub mod occupancy;
pub mod render;
pub mod sudoku;
pub mod transform;

pub use cli::{derive_output_path, SkewCli, SudokuCli};
pub use config::{SkewConfig, SudokuConfig};
pub use detection::{estimate_skew, SkewEstimate};
pub use error::{Result, VisionError};
pub use geometry::{normalize_angle, PerspectiveMapping, Quad, Segment};
pub use io::{load_grayscale, save_image};
pub use occupancy::OccupancyGrid;
pub use render::{draw_segments, draw_skew_indicator};
pub use sudoku::{analyze_sudoku, Background, SudokuAnalysis};
