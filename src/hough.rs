//! Progressive probabilistic Hough transform.
//!
//! `imageproc::hough` only reports infinite polar lines. Skew estimation needs
//! finite segments with endpoints, so this module votes edge pixels in random
//! order and traces a segment along each line the moment it gathers enough
//! votes. Pixels belonging to a traced segment are withdrawn so they cannot
//! vote for a second line.

use image::GrayImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::config::HoughParams;
use crate::geometry::Segment;

/// Accumulator over (angle, distance) bins with precomputed trig tables
struct Accumulator {
    num_angles: usize,
    num_rho: usize,
    inv_rho: f64,
    cos_table: Vec<f64>,
    sin_table: Vec<f64>,
    votes: Vec<u32>,
}

impl Accumulator {
    fn new(width: u32, height: u32, params: &HoughParams) -> Self {
        let num_angles = ((std::f64::consts::PI / params.theta).round() as usize).max(1);
        let num_rho = ((((width + height) * 2 + 1) as f64) / params.rho).round() as usize;
        let (cos_table, sin_table): (Vec<f64>, Vec<f64>) = (0..num_angles)
            .map(|n| {
                let angle = n as f64 * params.theta;
                (angle.cos(), angle.sin())
            })
            .unzip();

        Self {
            num_angles,
            num_rho,
            inv_rho: 1.0 / params.rho,
            cos_table,
            sin_table,
            votes: vec![0; num_angles * num_rho],
        }
    }

    fn rho_index(&self, n: usize, x: u32, y: u32) -> usize {
        let r = ((x as f64 * self.cos_table[n] + y as f64 * self.sin_table[n]) * self.inv_rho).round()
            as i64;
        (r + (self.num_rho as i64 - 1) / 2) as usize
    }

    /// Add one pixel's votes; returns the strongest bin it touched as (votes, angle index)
    fn vote(&mut self, x: u32, y: u32) -> (u32, usize) {
        let mut best = (0, 0);
        for n in 0..self.num_angles {
            let idx = n * self.num_rho + self.rho_index(n, x, y);
            self.votes[idx] += 1;
            if self.votes[idx] > best.0 {
                best = (self.votes[idx], n);
            }
        }
        best
    }

    fn unvote(&mut self, x: u32, y: u32) {
        for n in 0..self.num_angles {
            let idx = n * self.num_rho + self.rho_index(n, x, y);
            self.votes[idx] = self.votes[idx].saturating_sub(1);
        }
    }

    /// Unit step along the line for angle bin `n`, normalised so the major axis moves one pixel
    fn step(&self, n: usize) -> (f64, f64) {
        let a = -self.sin_table[n];
        let b = self.cos_table[n];
        if a.abs() > b.abs() {
            (a.signum(), b / a.abs())
        } else {
            (a / b.abs(), b.signum())
        }
    }
}

/// Walk from `start` along `step` until more than `max_gap` non-edge pixels in a row.
///
/// Returns the last edge pixel visited.
fn trace(
    mask: &[bool],
    width: u32,
    height: u32,
    start: (u32, u32),
    step: (f64, f64),
    max_gap: u32,
) -> (u32, u32) {
    let mut end = start;
    let mut gap = 0;
    let (mut fx, mut fy) = (start.0 as f64, start.1 as f64);

    loop {
        let (px, py) = (fx.round() as i64, fy.round() as i64);
        if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
            break;
        }

        if mask[py as usize * width as usize + px as usize] {
            gap = 0;
            end = (px as u32, py as u32);
        } else {
            gap += 1;
            if gap > max_gap {
                break;
            }
        }

        fx += step.0;
        fy += step.1;
    }

    end
}

/// Pixels on the straight run from `start` to `end` using `step`, inclusive of both
fn walk(start: (u32, u32), end: (u32, u32), step: (f64, f64)) -> Vec<(u32, u32)> {
    let steps = (end.0 as i64 - start.0 as i64)
        .abs()
        .max((end.1 as i64 - start.1 as i64).abs());

    (0..=steps)
        .filter_map(|k| {
            let px = (start.0 as f64 + step.0 * k as f64).round();
            let py = (start.1 as f64 + step.1 * k as f64).round();
            (px >= 0.0 && py >= 0.0).then_some((px as u32, py as u32))
        })
        .collect()
}

/// Detect line segments in a binary edge image.
///
/// Any non-zero pixel counts as an edge. The visiting order is shuffled with
/// a seeded generator so repeated runs return identical segments.
pub fn detect_segments(edges: &GrayImage, params: &HoughParams) -> Vec<Segment> {
    let (width, height) = edges.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut mask: Vec<bool> = edges.pixels().map(|p| p[0] != 0).collect();
    let mut points: Vec<(u32, u32)> = edges
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] != 0)
        .map(|(x, y, _)| (x, y))
        .collect();

    let mut rng = StdRng::seed_from_u64(params.seed);
    points.shuffle(&mut rng);

    let mut accumulator = Accumulator::new(width, height, params);
    let mut segments = Vec::new();
    let index = |x: u32, y: u32| y as usize * width as usize + x as usize;

    debug!(edge_pixels = points.len(), "running probabilistic Hough");

    for &(x, y) in &points {
        // Already consumed by an earlier trace
        if !mask[index(x, y)] {
            continue;
        }

        let (max_votes, best_angle) = accumulator.vote(x, y);
        if max_votes < params.vote_threshold {
            continue;
        }

        let step = accumulator.step(best_angle);
        let backward = (-step.0, -step.1);
        let ends = [
            trace(&mask, width, height, (x, y), step, params.max_line_gap),
            trace(&mask, width, height, (x, y), backward, params.max_line_gap),
        ];

        let min_length = params.min_line_length as i64;
        let good_line = (ends[1].0 as i64 - ends[0].0 as i64).abs() >= min_length
            || (ends[1].1 as i64 - ends[0].1 as i64).abs() >= min_length;

        for (end, direction) in ends.iter().zip([step, backward]) {
            for (px, py) in walk((x, y), *end, direction) {
                if px >= width || py >= height || !mask[index(px, py)] {
                    continue;
                }
                if good_line {
                    accumulator.unvote(px, py);
                }
                mask[index(px, py)] = false;
            }
        }

        if good_line {
            segments.push(Segment::new(
                ends[0].0 as i32,
                ends[0].1 as i32,
                ends[1].0 as i32,
                ends[1].1 as i32,
            ));
        }
    }

    debug!(segments = segments.len(), "probabilistic Hough finished");

    segments
}
