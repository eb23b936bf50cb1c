use std::path::Path;

use anyhow::Context;
use image::{DynamicImage, GrayImage, Luma};
use log::debug;

use crate::grid::{build_grid, Grid, Point};

pub fn load_image(path: &Path) -> Result<DynamicImage, anyhow::Error> {
    image::open(path).with_context(|| format!("Failed to open maze image {}", path.display()))
}

/// Otsu's method: the threshold that maximises the variance between the
/// pixels at or below it and the pixels above it.
pub fn otsu_threshold(img: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for p in img.pixels() {
        histogram[p.0[0] as usize] += 1;
    }

    let total = histogram.iter().sum::<u64>() as f64;
    let sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut weight_below = 0.0;
    let mut sum_below = 0.0;
    let mut best = (0u8, 0.0);

    for (level, &count) in histogram.iter().enumerate() {
        weight_below += count as f64;
        if weight_below == 0.0 {
            continue;
        }
        let weight_above = total - weight_below;
        if weight_above == 0.0 {
            break;
        }

        sum_below += level as f64 * count as f64;
        let mean_below = sum_below / weight_below;
        let mean_above = (sum - sum_below) / weight_above;
        let variance = weight_below * weight_above * (mean_below - mean_above).powi(2);

        if variance > best.1 {
            best = (level as u8, variance);
        }
    }

    best.0
}

/// Convert to luma and split the pixels into 0 and 255 around the Otsu threshold
pub fn binarize(img: &DynamicImage) -> GrayImage {
    let mut gray = img.to_luma8();
    let threshold = otsu_threshold(&gray);
    debug!("binarizing with threshold {}", threshold);

    for p in gray.pixels_mut() {
        *p = Luma([if p.0[0] > threshold { 255 } else { 0 }]);
    }
    gray
}

/// Build a grid from an image, the wall value of each cell being the
/// binarized pixel at the same position
pub fn parse_img(img: &DynamicImage, entry: Point, exit: Point) -> Result<Grid, anyhow::Error> {
    let bw = binarize(img);
    let width = bw.width() as usize;
    let height = bw.height() as usize;

    // GrayImage pixels are stored row-major, as are grid cells
    let walls = bw.pixels().map(|p| i32::from(p.0[0])).collect();

    let grid = build_grid(width, height, walls, entry, exit)
        .with_context(|| format!("Failed to build a {}x{} grid", width, height))?;
    Ok(grid)
}
