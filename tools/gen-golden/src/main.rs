//! Generates the golden set for `crates/hough-circles`: synthetic ring
//! masks under `testdata/images` and the matching detection dumps under
//! `testdata/golden`. Run from the `crates/hough-circles` directory so
//! the paths line up with the golden test.

use anyhow::Result;
use hough_circles::{find_circles_image, AngularMode, HoughParams};
use hough_circles_core::CircleLut;
use image::{GrayImage, Luma};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct GoldenCircle {
    x: u32,
    y: u32,
    radius: u32,
    votes: u32,
    merged: u32,
}

fn stamp_ring(img: &mut GrayImage, cx: i64, cy: i64, r: u32) -> Result<()> {
    let lut = CircleLut::build(r, r, AngularMode::Fixed(8 * r.max(1)))?;
    let w = img.width() as i64;
    let h = img.height() as i64;
    for &(dx, dy) in lut.row(0) {
        for (sx, sy) in [(1i64, 1i64), (1, -1), (-1, 1), (-1, -1)] {
            let x = cx + sx * dx as i64;
            let y = cy + sy * dy as i64;
            if x >= 0 && y >= 0 && x < w && y < h {
                img.put_pixel(x as u32, y as u32, Luma([255u8]));
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    std::fs::create_dir_all("testdata/images")?;
    std::fs::create_dir_all("testdata/golden")?;

    let mut scenes: Vec<(&str, GrayImage)> = Vec::new();

    let mut ring = GrayImage::from_pixel(96, 96, Luma([0u8]));
    stamp_ring(&mut ring, 48, 48, 20)?;
    scenes.push(("ring20", ring));

    let mut pair = GrayImage::from_pixel(160, 96, Luma([0u8]));
    stamp_ring(&mut pair, 40, 48, 14)?;
    stamp_ring(&mut pair, 120, 48, 14)?;
    scenes.push(("two_rings14", pair));

    let mut clipped = GrayImage::from_pixel(96, 96, Luma([0u8]));
    stamp_ring(&mut clipped, 8, 48, 24)?;
    scenes.push(("clipped_ring24", clipped));

    let params = HoughParams::default();

    for (name, img) in scenes {
        let img_path = Path::new("testdata/images").join(format!("{name}.png"));
        img.save(&img_path)?;

        let detections = find_circles_image(&img, &params)?;
        let golden: Vec<GoldenCircle> = detections
            .iter()
            .map(|d| GoldenCircle {
                x: d.center_x,
                y: d.center_y,
                radius: d.radius,
                votes: d.max_votes,
                merged: d.num_merged,
            })
            .collect();

        let gold_path = Path::new("testdata/golden").join(format!("{name}.json"));
        std::fs::write(&gold_path, serde_json::to_string_pretty(&golden)?)?;
        println!(
            "golden: {} -> {} ({} circles)",
            img_path.display(),
            gold_path.display(),
            golden.len()
        );
    }

    Ok(())
}
