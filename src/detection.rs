use image::GrayImage;
use imageproc::edges::canny;
use tracing::{debug, info};

use crate::config::{CannyParams, SkewConfig};
use crate::error::{Result, VisionError};
use crate::geometry::{median, normalize_angle, Segment};
use crate::hough::detect_segments;

/// Result of the skew estimation pipeline
#[derive(Debug, Clone)]
pub struct SkewEstimate {
    /// Median of the per-segment angles, before folding
    pub median_angle: f64,
    /// Median folded into (-90, 90]
    pub corrected_angle: f64,
    /// Segments that contributed to the estimate
    pub segments: Vec<Segment>,
    /// Edge map the segments were found in
    pub edges: GrayImage,
}

/// Apply Canny edge detection
pub fn detect_edges(gray: &GrayImage, params: &CannyParams) -> GrayImage {
    canny(gray, params.low, params.high)
}

/// Main skew function: find line segments and reduce their angles to one estimate
pub fn estimate_skew(gray: &GrayImage, config: &SkewConfig) -> Result<SkewEstimate> {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return Err(VisionError::EmptyImage { width, height });
    }

    let edges = detect_edges(gray, &config.canny);
    debug!(
        low = config.canny.low,
        high = config.canny.high,
        "applied Canny edge detection"
    );

    let segments = detect_segments(&edges, &config.hough);
    if segments.is_empty() {
        return Err(VisionError::NoLinesFound);
    }

    let angles: Vec<f64> = segments.iter().map(Segment::angle_degrees).collect();
    for (segment, angle) in segments.iter().zip(&angles) {
        debug!(?segment, angle, "segment");
    }

    let median_angle = median(&angles).ok_or(VisionError::NoLinesFound)?;
    let corrected_angle = normalize_angle(median_angle);

    info!(
        segments = segments.len(),
        median_angle, corrected_angle, "estimated skew"
    );

    Ok(SkewEstimate {
        median_angle,
        corrected_angle,
        segments,
        edges,
    })
}
