use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use image::{Rgb, RgbImage};

use crate::grid::Point;

pub const ENTRY_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const EXIT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const PATH_COLOR: Rgb<u8> = Rgb([170, 0, 170]);

pub const MARKER_RADIUS: i64 = 3;
pub const PATH_THICKNESS: u32 = 2;

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

pub fn draw_disc(img: &mut RgbImage, center: Point, radius: i64, color: Rgb<u8>) {
    let (cx, cy) = (center.x as i64, center.y as i64);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}

fn draw_brush(img: &mut RgbImage, x: i64, y: i64, thickness: u32, color: Rgb<u8>) {
    let size = i64::from(thickness.max(1));
    // centered on the point, odd sizes are symmetric
    let offset = (size - 1) / 2;
    for dy in 0..size {
        for dx in 0..size {
            put(img, x - offset + dx, y - offset + dy, color);
        }
    }
}

pub fn draw_line(img: &mut RgbImage, from: Point, to: Point, thickness: u32, color: Rgb<u8>) {
    let (x0, y0) = (from.x as i64, from.y as i64);
    let (x1, y1) = (to.x as i64, to.y as i64);
    let steps = (x1 - x0).abs().max((y1 - y0).abs());

    if steps == 0 {
        draw_brush(img, x0, y0, thickness, color);
        return;
    }

    for i in 0..=steps {
        let x = x0 + ((x1 - x0) * i + steps / 2).div_euclid(steps);
        let y = y0 + ((y1 - y0) * i + steps / 2).div_euclid(steps);
        draw_brush(img, x, y, thickness, color);
    }
}

pub fn draw_markers(img: &mut RgbImage, entry: Point, exit: Point) {
    draw_disc(img, entry, MARKER_RADIUS, ENTRY_COLOR);
    draw_disc(img, exit, MARKER_RADIUS, EXIT_COLOR);
}

pub fn draw_path(img: &mut RgbImage, path: &[Point], thickness: u32) {
    match path {
        [] => {}
        [single] => draw_line(img, *single, *single, thickness, PATH_COLOR),
        _ => {
            for w in path.windows(2) {
                draw_line(img, w[0], w[1], thickness, PATH_COLOR);
            }
        }
    }
}

/// Save the image as `name` inside `dir`, creating the directory if needed
pub fn save(img: &RgbImage, dir: &Path, name: &str) -> Result<PathBuf, anyhow::Error> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(name);
    img.save(&path)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(path)
}
