use anyhow::Context;
use hough_circles::{detect_circles_with_trace, AngularMode, HoughParams};
use image::ImageReader;
use serde::Serialize;
use std::time::Instant;
use std::{fs::File, io::Write, path::PathBuf};

#[derive(Serialize)]
struct CircleOut {
    x: u32,
    y: u32,
    radius: u32,
    votes: u32,
    merged: u32,
}

#[derive(Serialize)]
struct CircleDump {
    image: String,
    width: u32,
    height: u32,
    rmin: u32,
    rmax: u32,
    circles: Vec<CircleOut>,
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let input: PathBuf = args
        .next()
        .expect("usage: dump_circles <mask> --rmin N --rmax N [--mode N] [--min-votes N] [--merge-radius N]")
        .into();

    let mut params = HoughParams::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--rmin" => {
                let v = args.next().context("expected an integer after --rmin")?;
                params.rmin = v.parse().context("could not parse rmin")?;
            }
            "--rmax" => {
                let v = args.next().context("expected an integer after --rmax")?;
                params.rmax = v.parse().context("could not parse rmax")?;
            }
            "--mode" => {
                let v = args.next().context("expected an integer after --mode")?;
                params.mode = AngularMode::Fixed(v.parse().context("could not parse mode")?);
            }
            "--min-votes" => {
                let v = args.next().context("expected an integer after --min-votes")?;
                params.min_votes = v.parse().context("could not parse min votes")?;
            }
            "--merge-radius" => {
                let v = args
                    .next()
                    .context("expected an integer after --merge-radius")?;
                params.merge_radius = v.parse().context("could not parse merge radius")?;
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    let img = ImageReader::open(&input)?.decode()?.to_luma8();
    let w = img.width() as usize;
    let h = img.height() as usize;

    let started = Instant::now();
    let res = detect_circles_with_trace(img.as_raw(), w, h, &params)?;
    let total_ms = started.elapsed().as_secs_f64() * 1000.0;

    println!("mask {}x{} pixels", img.width(), img.height());
    println!("hough: {total_ms:5.2} ms");
    println!(" -     lut: {:5.2} ms", res.lut_ms);
    println!(" -    vote: {:5.2} ms", res.vote_ms);
    println!(" - extract: {:5.2} ms", res.extract_ms);
    println!(" - cluster: {:5.2} ms", res.cluster_ms);
    println!(
        "Detected {} circle(s) (radii {}..={})",
        res.detections.len(),
        params.rmin,
        params.rmax
    );

    let json_out = input.with_extension("circles.json");
    let dump = CircleDump {
        image: input.to_string_lossy().into_owned(),
        width: img.width(),
        height: img.height(),
        rmin: params.rmin,
        rmax: params.rmax,
        circles: res
            .detections
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
    let mut json_file = File::create(&json_out)?;
    serde_json::to_writer_pretty(&mut json_file, &dump)?;
    json_file.write_all(b"\n")?;
    println!("Saved JSON dump to {}", json_out.display());

    Ok(())
}
