//! Demonstration of fixation classification.
//!
//! This example shows how to:
//! 1. Build a gaze series from raw coordinates
//! 2. Classify it under each combination mode
//! 3. Summarise the resulting scanpath
//! 4. Compute crop regions around each fixation
//! 5. Export a JSON report
//!
//! Run with: cargo run --example classify_demo

use gaze_fixation::{
    classify_fixations, crop_regions, FixationParams, GazeSeries, Mode, ReportBuilder,
    ScanpathSummary,
};

/// Sampling rate of the synthetic recording.
const SAMPLE_RATE_HZ: f64 = 240.0;

/// Three fixations joined by fast saccades, with a little tremor.
fn synthetic_trace() -> (Vec<f64>, Vec<f64>) {
    let targets = [(200.0, 150.0, 60), (520.0, 300.0, 48), (310.0, 420.0, 72)];
    let saccade_samples = 6;

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut previous: Option<(f64, f64)> = None;

    for (tx, ty, dwell) in targets {
        if let Some((px, py)) = previous {
            for k in 1..=saccade_samples {
                let t = k as f64 / (saccade_samples + 1) as f64;
                x.push(px + (tx - px) * t);
                y.push(py + (ty - py) * t);
            }
        }
        for k in 0..dwell {
            let phase = k as f64 * 0.7;
            x.push(tx + 2.0 * phase.sin());
            y.push(ty + 2.0 * (phase * 1.3).cos());
        }
        previous = Some((tx, ty));
    }

    (x, y)
}

fn main() {
    println!("Gaze Fixation - Classification Demo");
    println!("===================================");
    println!();

    let (x, y) = synthetic_trace();
    let series = match GazeSeries::from_sample_rate(&x, &y, SAMPLE_RATE_HZ) {
        Ok(series) => series,
        Err(e) => {
            eprintln!("Invalid recording: {e}");
            return;
        }
    };
    println!(
        "Recording: {} samples at {} Hz ({:.2} s)",
        series.len(),
        SAMPLE_RATE_HZ,
        series.duration_secs()
    );
    println!();

    for mode in Mode::ALL {
        let params = FixationParams::default().with_mode(mode);
        let result = match classify_fixations(&series, &params) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("{mode}: {e}");
                continue;
            }
        };

        println!("[{mode}] {} fixation(s)", result.event_count());
        for event in &result.events {
            println!(
                "  samples {:>3}..{:<3} {:>6.1} ms at ({:.1}, {:.1})",
                event.start,
                event.end,
                event.duration_secs(series.time_interval()) * 1000.0,
                event.centroid_x,
                event.centroid_y
            );
        }
    }
    println!();

    let params = FixationParams::default();
    let result = match classify_fixations(&series, &params) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Classification failed: {e}");
            return;
        }
    };

    let summary = ScanpathSummary::from_result(&result, series.time_interval());
    println!("Summary (AND):");
    println!("  Fixations: {}", summary.fixation_count);
    println!("  Mean duration: {:.1} ms", summary.mean_fixation_secs * 1000.0);
    println!("  Fixation ratio: {:.2}", summary.fixation_ratio);
    println!("  Scanpath length: {:.1} px", summary.scanpath_length_px);
    println!();

    match crop_regions(&result.avg_x, &result.avg_y, 50, 640, 480) {
        Ok(regions) => {
            println!("Crop regions (50 px field of view, 640x480 image):");
            for region in regions {
                println!(
                    "  ({}, {}) - ({}, {})",
                    region.x1, region.y1, region.x2, region.y2
                );
            }
        }
        Err(e) => eprintln!("Crop regions failed: {e}"),
    }
    println!();

    let report = ReportBuilder::new().build(Some("demo"), &result, &params, series.time_interval());
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("Report:\n{json}"),
        Err(e) => eprintln!("Could not serialize report: {e}"),
    }
}
