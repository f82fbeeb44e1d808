use image::GrayImage;
use imageproc::filter::gaussian_blur_f32;
use tracing::{debug, info};

use crate::config::SudokuConfig;
use crate::detection::detect_edges;
use crate::error::{Result, VisionError};
use crate::geometry::{PerspectiveMapping, Quad};
use crate::occupancy::{classify_grid, OccupancyGrid};
use crate::render::draw_grid_overlay;
use crate::transform::warp_perspective;

/// Result of the Sudoku pipeline
#[derive(Debug, Clone)]
pub struct SudokuAnalysis {
    /// Edge map in original image coordinates
    pub edges: GrayImage,
    /// Edge map rectified onto the square grid
    pub warped: GrayImage,
    pub mapping: PerspectiveMapping,
    pub occupancy: OccupancyGrid,
}

/// Which image the overlay is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Background {
    /// Edge map of the input
    #[default]
    Edges,
    /// Grayscale input
    Source,
}

/// Blur then edge-detect the raw grayscale input
pub fn preprocess(gray: &GrayImage, config: &SudokuConfig) -> GrayImage {
    let blurred = gaussian_blur_f32(gray, config.blur_sigma);
    detect_edges(&blurred, &config.canny)
}

/// Main Sudoku function: rectify the grid and decide which cells hold a digit
pub fn analyze_sudoku(gray: &GrayImage, quad: &Quad, config: &SudokuConfig) -> Result<SudokuAnalysis> {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return Err(VisionError::EmptyImage { width, height });
    }

    let edges = preprocess(gray, config);
    debug!(
        sigma = config.blur_sigma,
        low = config.canny.low,
        high = config.canny.high,
        "applied blur and Canny edge detection"
    );

    let mapping = PerspectiveMapping::to_square(quad, config.warp_size)?;
    debug!(?mapping, "perspective mapping");

    let warped = warp_perspective(&edges, &mapping.forward, config.warp_size, config.warp_size)?;
    let occupancy = classify_grid(&warped, &config.cell);

    info!(occupied = occupancy.count(), "classified grid cells");

    Ok(SudokuAnalysis {
        edges,
        warped,
        mapping,
        occupancy,
    })
}

impl SudokuAnalysis {
    /// Annotate the chosen background with the grid and occupancy markers
    pub fn render(
        &self,
        source: &GrayImage,
        background: Background,
        config: &SudokuConfig,
    ) -> image::RgbImage {
        let canvas = match background {
            Background::Edges => &self.edges,
            Background::Source => source,
        };
        draw_grid_overlay(canvas, &self.occupancy, &self.mapping, config.warp_size)
    }
}
