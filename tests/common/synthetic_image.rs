#![allow(dead_code)]

use image::{GrayImage, Luma};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use skew_sudoku::{PerspectiveMapping, Quad};

/// White page crossed by dark stripes that rise to the right by `angle_degrees`.
///
/// Stripes are `thickness` pixels tall and spaced `spacing` pixels apart
/// vertically, all passing through the column `x = width / 2`.
pub fn striped_page(
    width: u32,
    height: u32,
    angle_degrees: f64,
    spacing: u32,
    thickness: u32,
) -> GrayImage {
    let mut img = GrayImage::from_pixel(width, height, Luma([255]));
    let angle = angle_degrees.to_radians();
    let (dx, dy) = (angle.cos() as f32, -angle.sin() as f32);
    let reach = (width + height) as f32;
    let cx = (width / 2) as f32;

    let mut cy = spacing as f32;
    while cy < height as f32 - spacing as f32 / 2.0 {
        for t in 0..thickness {
            let y = cy + t as f32;
            draw_line_segment_mut(
                &mut img,
                (cx - dx * reach, y - dy * reach),
                (cx + dx * reach, y + dy * reach),
                Luma([0]),
            );
        }
        cy += spacing as f32;
    }

    img
}

/// A 600x600 white page whose grid square spans (50, 50) to (549, 549), with one
/// dark blob drawn inside the grid cell at `row`, `col`.
pub fn page_with_marked_cell(row: u32, col: u32) -> (GrayImage, [f64; 8]) {
    marked_page([50.0, 50.0, 549.0, 50.0, 50.0, 549.0, 549.0, 549.0], row, col)
}

/// A 600x600 white page with one dark 20x24 blob centred on where cell
/// `row`, `col` of the grid spanned by `corners` lands on the page.
pub fn marked_page(corners: [f64; 8], row: u32, col: u32) -> (GrayImage, [f64; 8]) {
    let mut img = GrayImage::from_pixel(600, 600, Luma([255]));
    let mapping = PerspectiveMapping::to_square(&Quad::from_coords(corners), 450).unwrap();
    let (cx, cy) = mapping.to_original(col as f64 * 50.0 + 25.0, row as f64 * 50.0 + 25.0);

    draw_filled_rect_mut(
        &mut img,
        Rect::at(cx as i32 - 10, cy as i32 - 12).of_size(20, 24),
        Luma([0]),
    );

    (img, corners)
}
