//! Error types shared by the skew and Sudoku pipelines

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, VisionError>;

#[derive(Error, Debug)]
pub enum VisionError {
    /// Input image could not be opened or decoded
    #[error("Error opening image: {path:?}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Annotated image could not be written
    #[error("Failed to save image: {path:?}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Line detection produced zero segments
    #[error("No lines were found")]
    NoLinesFound,

    /// The four corners do not span a quadrilateral
    #[error("Corner points are degenerate, cannot compute perspective transform")]
    DegenerateQuad,

    /// A corner coordinate on the command line is not a number
    #[error("Invalid coordinate value: {0}")]
    InvalidCoordinate(String),

    /// Image has zero width or height
    #[error("Image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}
