//! Shared application-level helpers for CLI and examples.
//!
//! These functions wire up I/O (load mask image, JSON/PNG output) around
//! the detection APIs so the CLI example and the golden tool can share
//! the same behavior.

use crate::image::find_circles_image_roi;
use anyhow::{Context, Result};
use hough_circles_core::{AngularMode, CircleLut, Detection, HoughParams, Roi};
use image::{GrayImage, ImageReader, Luma};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Write, path::Path, path::PathBuf};

/// Detection run description, loadable from a JSON file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectionConfig {
    /// Edge-mask image; any nonzero luma counts as an edge pixel.
    pub image: PathBuf,
    pub rmin: u32,
    pub rmax: u32,
    /// Angular subdivisions; omit for auto (`8 * rmax`).
    pub mode: Option<u32>,
    pub min_votes: Option<u32>,
    pub merge_radius: Option<u32>,
    /// `[x0, y0, x1, y1]`, exclusive upper bounds; omit for the full image.
    pub roi: Option<[usize; 4]>,
    pub output_json: Option<PathBuf>,
    pub output_png: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Serialize)]
pub struct CircleOut {
    pub x: u32,
    pub y: u32,
    pub radius: u32,
    pub votes: u32,
    pub merged: u32,
}

#[derive(Serialize)]
pub struct DetectionDump {
    pub image: String,
    pub width: u32,
    pub height: u32,
    pub rmin: u32,
    pub rmax: u32,
    pub mode: Option<u32>,
    pub min_votes: u32,
    pub merge_radius: u32,
    pub circles: Vec<CircleOut>,
}

/// Map config fields onto detector parameters, filling defaults.
pub fn params_from_config(cfg: &DetectionConfig) -> HoughParams {
    let defaults = HoughParams::default();
    HoughParams {
        rmin: cfg.rmin,
        rmax: cfg.rmax,
        mode: match cfg.mode {
            Some(mode) => AngularMode::Fixed(mode),
            None => AngularMode::Auto,
        },
        min_votes: cfg.min_votes.unwrap_or(defaults.min_votes),
        merge_radius: cfg.merge_radius.unwrap_or(defaults.merge_radius),
    }
}

/// Run one detection described by `cfg`: load the mask, detect, write
/// the JSON dump and the PNG overlay.
pub fn run_detection(cfg: DetectionConfig) -> Result<()> {
    if let Some(level) = &cfg.log_level {
        crate::logger::init(level);
    }

    let img = ImageReader::open(&cfg.image)
        .with_context(|| format!("opening mask {}", cfg.image.display()))?
        .decode()?
        .to_luma8();
    let params = params_from_config(&cfg);
    let roi = match cfg.roi {
        Some([x0, y0, x1, y1]) => Roi { x0, y0, x1, y1 },
        None => Roi::full(img.width() as usize, img.height() as usize),
    };

    log::info!(
        "detecting circles in {} ({}x{}), radii {}..={}",
        cfg.image.display(),
        img.width(),
        img.height(),
        params.rmin,
        params.rmax
    );

    let detections = find_circles_image_roi(&img, roi, &params)
        .with_context(|| format!("detecting circles in {}", cfg.image.display()))?;
    log::info!("{} circle(s) found", detections.len());

    let json_out = cfg
        .output_json
        .unwrap_or_else(|| cfg.image.with_extension("circles.json"));
    let dump = DetectionDump {
        image: cfg.image.to_string_lossy().into_owned(),
        width: img.width(),
        height: img.height(),
        rmin: params.rmin,
        rmax: params.rmax,
        mode: cfg.mode,
        min_votes: params.min_votes,
        merge_radius: params.merge_radius,
        circles: detections
            .iter()
            .map(|d| CircleOut {
                x: d.center_x,
                y: d.center_y,
                radius: d.radius,
                votes: d.max_votes,
                merged: d.num_merged,
            })
            .collect(),
    };
    write_json(&json_out, &dump)?;

    let png_out = cfg
        .output_png
        .unwrap_or_else(|| cfg.image.with_extension("circles.png"));
    let mut vis = img.clone();
    draw_circles(&mut vis, &detections);
    vis.save(&png_out)
        .with_context(|| format!("saving overlay {}", png_out.display()))?;

    Ok(())
}

/// Stamp detected circle outlines into the visualization image.
fn draw_circles(vis: &mut GrayImage, detections: &[Detection]) {
    let w = vis.width() as i64;
    let h = vis.height() as i64;
    for d in detections {
        let Ok(lut) = CircleLut::build(d.radius, d.radius, AngularMode::Fixed(8 * d.radius.max(1)))
        else {
            continue;
        };
        let cx = d.center_x as i64;
        let cy = d.center_y as i64;
        for &(dx, dy) in lut.row(0) {
            for (sx, sy) in [(1i64, 1i64), (1, -1), (-1, 1), (-1, -1)] {
                let x = cx + sx * dx as i64;
                let y = cy + sy * dy as i64;
                if x >= 0 && y >= 0 && x < w && y < h {
                    vis.put_pixel(x as u32, y as u32, Luma([255u8]));
                }
            }
        }
    }
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut json_file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(&mut json_file, value)?;
    json_file.write_all(b"\n")?;
    Ok(())
}

/// Read a [`DetectionConfig`] from a JSON file.
pub fn load_config(path: &Path) -> Result<DetectionConfig> {
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let cfg: DetectionConfig = serde_json::from_reader(file)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}
