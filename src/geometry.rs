use imageproc::geometric_transformations::Projection;

use crate::error::{Result, VisionError};

/// A detected line segment between two pixel endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Segment {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Angle in degrees, positive when the segment rises to the right.
    ///
    /// Image y grows downward, so the atan2 result is negated.
    pub fn angle_degrees(&self) -> f64 {
        let dy = (self.y2 - self.y1) as f64;
        let dx = (self.x2 - self.x1) as f64;
        -dy.atan2(dx).to_degrees()
    }
}

/// Median of a set of angles; the mean of the two middle values for even counts
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Fold a line orientation into (-90, 90].
///
/// A line and its 180° twin describe the same skew, so only the orientation
/// modulo 180° is kept.
pub fn normalize_angle(degrees: f64) -> f64 {
    let mut degrees = degrees;
    while degrees <= -90.0 {
        degrees += 180.0;
    }
    while degrees > 90.0 {
        degrees -= 180.0;
    }
    degrees
}

/// Endpoint of the skew indicator drawn from `center`.
///
/// The direction starts at straight up and is rotated by `angle_degrees`.
pub fn indicator_endpoint(center: (i32, i32), length: f64, angle_degrees: f64) -> (i32, i32) {
    let angle_rad = angle_degrees.to_radians();
    let end_x = center.0 as f64 + length * (-angle_rad).sin();
    let end_y = center.1 as f64 - length * (-angle_rad).cos();
    (end_x as i32, end_y as i32)
}

/// Four corners of the grid as supplied on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub upper_left: (f64, f64),
    pub upper_right: (f64, f64),
    pub lower_left: (f64, f64),
    pub lower_right: (f64, f64),
}

impl Quad {
    pub fn new(
        upper_left: (f64, f64),
        upper_right: (f64, f64),
        lower_left: (f64, f64),
        lower_right: (f64, f64),
    ) -> Self {
        Self {
            upper_left,
            upper_right,
            lower_left,
            lower_right,
        }
    }

    /// Build from `[x_UL, y_UL, x_UR, y_UR, x_LL, y_LL, x_LR, y_LR]`
    pub fn from_coords(c: [f64; 8]) -> Self {
        Self::new((c[0], c[1]), (c[2], c[3]), (c[4], c[5]), (c[6], c[7]))
    }

    /// Axis-aligned square with corners at 0 and `size - 1`
    pub fn square(size: u32) -> Self {
        let far = size as f64 - 1.0;
        Self::new((0.0, 0.0), (far, 0.0), (0.0, far), (far, far))
    }

    /// Corners in UL, UR, LL, LR order
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            self.upper_left,
            self.upper_right,
            self.lower_left,
            self.lower_right,
        ]
    }

    fn control_points(&self) -> [(f32, f32); 4] {
        self.corners().map(|(x, y)| (x as f32, y as f32))
    }

    /// True when any three corners are (nearly) collinear or a coordinate is not finite
    pub fn is_degenerate(&self) -> bool {
        let c = self.corners();
        if c.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return true;
        }

        let cross = |a: (f64, f64), b: (f64, f64), o: (f64, f64)| {
            (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
        };
        [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)]
            .iter()
            .any(|&(i, j, k)| cross(c[j], c[k], c[i]).abs() < 1e-6)
    }
}

/// Forward (original -> rectified) and inverse (rectified -> original) homographies
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveMapping {
    pub forward: Projection,
    pub inverse: Projection,
}

impl PerspectiveMapping {
    /// Rectify `quad` onto a `size` x `size` square.
    ///
    /// Both directions are solved independently from the same four pairs.
    pub fn to_square(quad: &Quad, size: u32) -> Result<Self> {
        if quad.is_degenerate() {
            return Err(VisionError::DegenerateQuad);
        }

        let from = quad.control_points();
        let to = Quad::square(size).control_points();

        Ok(Self {
            forward: Projection::from_control_points(from, to).ok_or(VisionError::DegenerateQuad)?,
            inverse: Projection::from_control_points(to, from).ok_or(VisionError::DegenerateQuad)?,
        })
    }

    /// Map a point from rectified space back into the original image
    pub fn to_original(&self, x: f64, y: f64) -> (f64, f64) {
        let (u, v) = self.inverse * (x as f32, y as f32);
        (u as f64, v as f64)
    }

    /// Map a point from the original image into rectified space
    pub fn to_rectified(&self, x: f64, y: f64) -> (f64, f64) {
        let (u, v) = self.forward * (x as f32, y as f32);
        (u as f64, v as f64)
    }
}
