//! Per-cell digit presence for a rectified Sudoku grid.

use std::fmt;

use image::{GrayImage, Luma};
use imageproc::integral_image::{integral_image, sum_image_pixels};
use imageproc::morphology::{grayscale_open, Mask};

use crate::config::{AdaptiveThresholdParams, CellClassifierParams};
use crate::transform::crop;

pub const GRID_SIZE: usize = 9;

/// Which of the 81 cells hold a digit, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OccupancyGrid {
    cells: [[bool; GRID_SIZE]; GRID_SIZE],
}

impl OccupancyGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, row: usize, col: usize, occupied: bool) {
        self.cells[row][col] = occupied;
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    /// Occupied cells as (row, col), row-major
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..GRID_SIZE)
            .flat_map(|r| (0..GRID_SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| self.cells[r][c])
    }

    pub fn count(&self) -> usize {
        self.occupied().count()
    }
}

/// Nine lines of nine `0`/`1` characters
impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for &cell in row {
                write!(f, "{}", if cell { '1' } else { '0' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A cell cut out of the rectified image together with its grid position
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub image: GrayImage,
}

/// Split a rectified image into `grid_size` x `grid_size` equal cells, row-major.
///
/// Cell size is the integer quotient, so any remainder on the right and bottom is dropped.
pub fn subdivide_cells(warped: &GrayImage, grid_size: u32) -> Vec<Cell> {
    let (width, height) = warped.dimensions();
    let (cell_w, cell_h) = (width / grid_size, height / grid_size);

    (0..grid_size)
        .flat_map(|r| (0..grid_size).map(move |c| (r, c)))
        .map(|(r, c)| Cell {
            row: r as usize,
            col: c as usize,
            image: crop(warped, c * cell_w, r * cell_h, cell_w, cell_h),
        })
        .collect()
}

/// Keep the central `scale` fraction of a cell to drop grid-line residue at its border
pub fn crop_center(cell: &GrayImage, scale: f64) -> GrayImage {
    let (w, h) = cell.dimensions();
    let new_w = (w as f64 * scale) as u32;
    let new_h = (h as f64 * scale) as u32;
    crop(cell, (w - new_w) / 2, (h - new_h) / 2, new_w, new_h)
}

/// Inverted mean-C threshold.
///
/// A pixel becomes foreground (255) when it is at least `offset` darker than
/// the rounded mean of its `block_size` x `block_size` neighbourhood. Borders
/// replicate the nearest edge pixel.
pub fn adaptive_threshold_inv(img: &GrayImage, params: &AdaptiveThresholdParams) -> GrayImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return GrayImage::new(width, height);
    }

    let radius = params.block_size / 2;
    let padded = GrayImage::from_fn(width + 2 * radius, height + 2 * radius, |x, y| {
        let sx = (x as i64 - radius as i64).clamp(0, width as i64 - 1) as u32;
        let sy = (y as i64 - radius as i64).clamp(0, height as i64 - 1) as u32;
        *img.get_pixel(sx, sy)
    });
    let integral = integral_image::<_, u32>(&padded);
    let area = ((2 * radius + 1) * (2 * radius + 1)) as f64;

    let mut binary = GrayImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels() {
        // Window [x - r, x + r] in the source is [x, x + 2r] in the padded image
        let sum = sum_image_pixels(&integral, x, y, x + 2 * radius, y + 2 * radius)[0];
        let mean = (sum as f64 / area).round() as i32;
        if (pixel[0] as i32) <= mean - params.offset {
            binary.put_pixel(x, y, Luma([255]));
        }
    }
    binary
}

/// Morphological opening with a `size` x `size` rectangle anchored at its centre.
///
/// For even sizes the anchor sits at (size / 2, size / 2), so a 2x2 opening
/// moves surviving blocks one pixel right and down.
pub fn open_rect(binary: &GrayImage, size: u32) -> GrayImage {
    if size <= 1 {
        return binary.clone();
    }
    let kernel = GrayImage::from_pixel(size, size, Luma([255]));
    let anchor = (size / 2) as u8;
    grayscale_open(binary, &Mask::from_image(&kernel, anchor, anchor))
}

/// Share of non-zero pixels
pub fn foreground_ratio(binary: &GrayImage) -> f64 {
    let total = binary.width() as u64 * binary.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let on = binary.pixels().filter(|p| p[0] > 0).count() as u64;
    on as f64 / total as f64
}

/// Decide if a cell contains a digit or is empty
pub fn cell_has_digit(cell: &GrayImage, params: &CellClassifierParams) -> bool {
    let center = crop_center(cell, params.crop_scale);
    let binary = adaptive_threshold_inv(&center, &params.threshold);
    let cleaned = open_rect(&binary, params.opening_size);
    foreground_ratio(&cleaned) > params.density_threshold
}

/// Classify every cell of a rectified edge image
pub fn classify_grid(warped: &GrayImage, params: &CellClassifierParams) -> OccupancyGrid {
    let mut grid = OccupancyGrid::new();
    for cell in subdivide_cells(warped, GRID_SIZE as u32) {
        grid.set(cell.row, cell.col, cell_has_digit(&cell.image, params));
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    /// White horizontal strokes every 4 rows across the middle of a black cell
    fn hatched_cell() -> GrayImage {
        let mut cell = GrayImage::new(50, 50);
        for y in (13..37).step_by(4) {
            for x in 12..38 {
                cell.put_pixel(x, y, Luma([255]));
            }
        }
        cell
    }

    #[test]
    fn test_grid_display() {
        let mut grid = OccupancyGrid::new();
        grid.set(0, 0, true);
        grid.set(8, 8, true);
        let text = grid.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "100000000");
        assert_eq!(lines[4], "000000000");
        assert_eq!(lines[8], "000000001");
        assert_eq!(grid.count(), 2);
    }

    #[test]
    fn test_subdivide_row_major() {
        let mut warped = GrayImage::new(450, 450);
        warped.put_pixel(4 * 50 + 10, 3 * 50 + 10, Luma([99]));

        let cells = subdivide_cells(&warped, 9);
        assert_eq!(cells.len(), 81);
        assert!(cells.iter().all(|c| c.image.dimensions() == (50, 50)));

        let marked = &cells[3 * 9 + 4];
        assert_eq!((marked.row, marked.col), (3, 4));
        assert_eq!(marked.image.get_pixel(10, 10)[0], 99);
    }

    #[test]
    fn test_crop_center_keeps_eighty_percent() {
        let cell = GrayImage::new(50, 50);
        assert_eq!(crop_center(&cell, 0.8).dimensions(), (40, 40));
    }

    #[test]
    fn test_threshold_flat_image_is_background() {
        let params = AdaptiveThresholdParams::default();
        for value in [0u8, 128, 255] {
            let img = GrayImage::from_pixel(20, 20, Luma([value]));
            let binary = adaptive_threshold_inv(&img, &params);
            assert_eq!(foreground_ratio(&binary), 0.0);
        }
    }

    #[test]
    fn test_threshold_marks_dark_pixels_near_bright() {
        let mut img = GrayImage::new(20, 20);
        for y in 0..20 {
            img.put_pixel(10, y, Luma([255]));
        }
        let binary = adaptive_threshold_inv(&img, &AdaptiveThresholdParams::default());

        assert_eq!(binary.get_pixel(10, 10)[0], 0);
        assert_eq!(binary.get_pixel(9, 10)[0], 255);
        assert_eq!(binary.get_pixel(12, 10)[0], 255);
        assert_eq!(binary.get_pixel(2, 10)[0], 0);
    }

    #[test]
    fn test_opening_removes_isolated_pixels() {
        let mut binary = GrayImage::new(10, 10);
        binary.put_pixel(2, 2, Luma([255]));
        for y in 5..8 {
            for x in 5..8 {
                binary.put_pixel(x, y, Luma([255]));
            }
        }

        let opened = open_rect(&binary, 2);
        assert_eq!(opened.get_pixel(2, 2)[0], 0);
        // Anchor (1, 1): the surviving block lands one pixel right and down
        for y in 6..9 {
            for x in 6..9 {
                assert_eq!(opened.get_pixel(x, y)[0], 255, "({}, {})", x, y);
            }
        }
        assert_eq!(opened.get_pixel(5, 5)[0], 0);
        assert_eq!(foreground_ratio(&opened), 9.0 / 100.0);
    }

    #[test]
    fn test_opening_drops_one_pixel_wide_strokes() {
        let mut binary = GrayImage::new(12, 12);
        for i in 1..11 {
            binary.put_pixel(i, 3, Luma([255]));
            binary.put_pixel(8, i, Luma([255]));
        }
        assert_eq!(foreground_ratio(&open_rect(&binary, 2)), 0.0);
    }

    #[test]
    fn test_threshold_rounds_local_mean() {
        // Window sum 48 * 12 + 4 = 580, mean 11.84: rounds to 12, truncates to 11
        let mut img = GrayImage::from_pixel(9, 9, Luma([12]));
        img.put_pixel(4, 4, Luma([4]));
        let binary = adaptive_threshold_inv(&img, &AdaptiveThresholdParams::default());

        assert_eq!(binary.get_pixel(4, 4)[0], 255);
        assert_eq!(foreground_ratio(&binary), 1.0 / 81.0);
    }

    #[test]
    fn test_threshold_matches_replicated_border_reference() {
        let mut state = 12345u32;
        let img = GrayImage::from_fn(40, 40, |_, _| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            Luma([(state >> 16) as u8])
        });
        let params = AdaptiveThresholdParams::default();
        let binary = adaptive_threshold_inv(&img, &params);

        let r = (params.block_size / 2) as i64;
        for (x, y, pixel) in img.enumerate_pixels() {
            let mut sum = 0u32;
            for dy in -r..=r {
                for dx in -r..=r {
                    let sx = (x as i64 + dx).clamp(0, 39) as u32;
                    let sy = (y as i64 + dy).clamp(0, 39) as u32;
                    sum += img.get_pixel(sx, sy)[0] as u32;
                }
            }
            let mean = (sum as f64 / 49.0).round() as i32;
            let expected = if (pixel[0] as i32) <= mean - params.offset { 255 } else { 0 };
            assert_eq!(binary.get_pixel(x, y)[0], expected, "({}, {})", x, y);
        }
    }

    #[test]
    fn test_blank_cell_is_empty() {
        let params = CellClassifierParams::default();
        assert!(!cell_has_digit(&GrayImage::new(50, 50), &params));
        assert!(!cell_has_digit(&GrayImage::from_pixel(50, 50, Luma([255])), &params));
    }

    #[test]
    fn test_dense_cell_is_occupied() {
        assert!(cell_has_digit(&hatched_cell(), &CellClassifierParams::default()));
    }

    #[test]
    fn test_border_only_cell_is_empty() {
        // Grid-line residue on the cell boundary falls outside the centre crop
        let mut cell = GrayImage::new(50, 50);
        for i in 0..50 {
            cell.put_pixel(i, 0, Luma([255]));
            cell.put_pixel(i, 49, Luma([255]));
            cell.put_pixel(0, i, Luma([255]));
            cell.put_pixel(49, i, Luma([255]));
        }
        assert!(!cell_has_digit(&cell, &CellClassifierParams::default()));
    }

    #[test]
    fn test_classify_grid_marks_single_cell() {
        let mut warped = GrayImage::new(450, 450);
        let cell = hatched_cell();
        for (x, y, p) in cell.enumerate_pixels() {
            warped.put_pixel(4 * 50 + x, 3 * 50 + y, *p);
        }

        let grid = classify_grid(&warped, &CellClassifierParams::default());
        assert_eq!(grid.occupied().collect::<Vec<_>>(), vec![(3, 4)]);
    }
}
