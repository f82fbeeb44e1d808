use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::geometry::{indicator_endpoint, PerspectiveMapping, Segment};
use crate::occupancy::{OccupancyGrid, GRID_SIZE};

pub const MAGENTA: Rgb<u8> = Rgb([255, 0, 255]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const CYAN: Rgb<u8> = Rgb([0, 255, 255]);
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

const MARKER_RADIUS: i32 = 8;

/// Promote a grayscale image to RGB so colored annotations can be drawn on it
pub fn to_rgb(gray: &GrayImage) -> RgbImage {
    DynamicImage::ImageLuma8(gray.clone()).to_rgb8()
}

/// Draw a line `thickness` pixels wide as a bundle of parallel 1px lines
pub fn draw_thick_line(
    canvas: &mut RgbImage,
    start: (f32, f32),
    end: (f32, f32),
    thickness: u32,
    color: Rgb<u8>,
) {
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        let radius = (thickness / 2) as i32;
        draw_filled_circle_mut(canvas, (start.0 as i32, start.1 as i32), radius, color);
        return;
    }

    // Unit normal
    let (nx, ny) = (-dy / length, dx / length);
    let half = (thickness.max(1) as f32 - 1.0) / 2.0;

    let mut offset = -half;
    while offset <= half + 1e-3 {
        draw_line_segment_mut(
            canvas,
            (start.0 + nx * offset, start.1 + ny * offset),
            (end.0 + nx * offset, end.1 + ny * offset),
            color,
        );
        offset += 0.5;
    }
}

/// Overlay the skew direction: a line from the image centre, rotated from vertical
pub fn draw_skew_indicator(source: &GrayImage, corrected_angle: f64) -> RgbImage {
    let mut canvas = to_rgb(source);
    let (w, h) = source.dimensions();
    let center = ((w / 2) as i32, (h / 2) as i32);
    let length = w.max(h) as f64;
    let end = indicator_endpoint(center, length, corrected_angle);

    draw_thick_line(
        &mut canvas,
        (center.0 as f32, center.1 as f32),
        (end.0 as f32, end.1 as f32),
        2,
        MAGENTA,
    );
    canvas
}

/// Draw every detected segment on a color copy of the edge map
pub fn draw_segments(edges: &GrayImage, segments: &[Segment]) -> RgbImage {
    let mut canvas = to_rgb(edges);
    for s in segments {
        draw_thick_line(
            &mut canvas,
            (s.x1 as f32, s.y1 as f32),
            (s.x2 as f32, s.y2 as f32),
            3,
            RED,
        );
    }
    canvas
}

/// Map a rectified point into the original image, truncated to whole pixels
fn mapped_pixel(mapping: &PerspectiveMapping, x: f64, y: f64) -> (i32, i32) {
    let (ox, oy) = mapping.to_original(x, y);
    (ox as i32, oy as i32)
}

fn as_f32(p: (i32, i32)) -> (f32, f32) {
    (p.0 as f32, p.1 as f32)
}

/// Draw the grid and occupancy markers back on the unrectified image.
///
/// Box boundaries (every third line) are thick red, the rest thin cyan.
/// Occupied cells get a filled green disc at their mapped centre.
pub fn draw_grid_overlay(
    background: &GrayImage,
    occupancy: &OccupancyGrid,
    mapping: &PerspectiveMapping,
    size: u32,
) -> RgbImage {
    let mut out = to_rgb(background);
    let cell = (size / GRID_SIZE as u32) as f64;
    let size = size as f64;

    for i in 0..=GRID_SIZE {
        let (thickness, color) = if i % 3 == 0 { (3, RED) } else { (2, CYAN) };
        let offset = (i as f64 * cell).trunc();

        // Horizontal boundary
        let p1 = mapped_pixel(mapping, 0.0, offset);
        let p2 = mapped_pixel(mapping, size, offset);
        draw_thick_line(&mut out, as_f32(p1), as_f32(p2), thickness, color);

        // Vertical boundary
        let p1 = mapped_pixel(mapping, offset, 0.0);
        let p2 = mapped_pixel(mapping, offset, size);
        draw_thick_line(&mut out, as_f32(p1), as_f32(p2), thickness, color);
    }

    for (r, c) in occupancy.occupied() {
        let cx = ((c as f64 + 0.5) * cell).trunc();
        let cy = ((r as f64 + 0.5) * cell).trunc();
        let center = mapped_pixel(mapping, cx, cy);
        draw_filled_circle_mut(&mut out, center, MARKER_RADIUS, GREEN);
    }

    out
}
