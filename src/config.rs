//! Tuned parameters for both pipelines.
//!
//! The defaults were tuned empirically against scanned puzzles and brick
//! photographs; changing them shifts which edges and cells are picked up.

use crate::occupancy::GRID_SIZE;

/// Hysteresis thresholds for Canny edge detection (3x3 Sobel gradients)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannyParams {
    pub low: f32,
    pub high: f32,
}

impl CannyParams {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }
}

impl Default for CannyParams {
    fn default() -> Self {
        Self::new(50.0, 200.0)
    }
}

/// Parameters for the probabilistic Hough transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoughParams {
    /// Distance resolution of the accumulator, in pixels
    pub rho: f64,
    /// Angle resolution of the accumulator, in radians
    pub theta: f64,
    /// Minimum accumulator votes before a line is traced
    pub vote_threshold: u32,
    /// Minimum extent of a kept segment along either axis
    pub min_line_length: u32,
    /// Maximum run of missing edge pixels bridged while tracing
    pub max_line_gap: u32,
    /// Seed for the edge-pixel visiting order
    pub seed: u64,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta: std::f64::consts::PI / 180.0,
            vote_threshold: 50,
            min_line_length: 150,
            max_line_gap: 12,
            seed: 0xFFFF_FFFF,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkewConfig {
    pub canny: CannyParams,
    pub hough: HoughParams,
}

/// Mean-C adaptive threshold, inverted so dark ink becomes foreground
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveThresholdParams {
    /// Side of the square neighbourhood; must be odd
    pub block_size: u32,
    /// Constant subtracted from the local mean
    pub offset: i32,
}

impl Default for AdaptiveThresholdParams {
    fn default() -> Self {
        Self {
            block_size: 7,
            offset: 8,
        }
    }
}

/// Controls the per-cell "does this cell hold a digit" decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellClassifierParams {
    /// Linear fraction of the cell kept around its centre
    pub crop_scale: f64,
    pub threshold: AdaptiveThresholdParams,
    /// Side of the square structuring element used for opening
    pub opening_size: u32,
    /// Foreground ratio above which a cell counts as occupied
    pub density_threshold: f64,
}

impl Default for CellClassifierParams {
    fn default() -> Self {
        Self {
            crop_scale: 0.8,
            threshold: AdaptiveThresholdParams::default(),
            opening_size: 2,
            density_threshold: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SudokuConfig {
    /// Side length of the rectified square
    pub warp_size: u32,
    /// Gaussian sigma matching a 5x5 kernel
    pub blur_sigma: f32,
    pub canny: CannyParams,
    pub cell: CellClassifierParams,
}

impl Default for SudokuConfig {
    fn default() -> Self {
        Self {
            warp_size: 450,
            blur_sigma: 1.1,
            canny: CannyParams::new(50.0, 75.0),
            cell: CellClassifierParams::default(),
        }
    }
}

impl SudokuConfig {
    /// Side length of one cell in the rectified image
    pub fn cell_size(&self) -> u32 {
        self.warp_size / GRID_SIZE as u32
    }
}
