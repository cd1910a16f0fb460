use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

use rusty_hands::output::CSV_HEADER;

#[derive(Debug, Default)]
struct Summary {
    frames: usize,
    gestures: BTreeMap<String, usize>,
    fingers_total: u64,
    fps_total: f64,
    fps_samples: usize,
    skipped: usize,
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: summarize_report <performance_csv>");
        return Ok(());
    }

    let file = File::open(&args[1]).with_context(|| format!("Failed to open {}", args[1]))?;
    let summary = summarize(BufReader::new(file))?;

    println!("Report: {}", args[1]);
    println!("Frames: {} (skipped {} malformed rows)", summary.frames, summary.skipped);
    if summary.frames == 0 {
        return Ok(());
    }

    println!("--------------------------------------------------");
    for (gesture, n) in &summary.gestures {
        let share = *n as f64 * 100.0 / summary.frames as f64;
        println!("{:<12} {:>6}  {:>5.1}%", gesture, n, share);
    }
    println!("--------------------------------------------------");
    println!(
        "Mean fingers: {:.2}",
        summary.fingers_total as f64 / summary.frames as f64
    );
    if summary.fps_samples > 0 {
        println!("Mean fps: {:.2}", summary.fps_total / summary.fps_samples as f64);
    }

    Ok(())
}

fn summarize(reader: impl BufRead) -> Result<Summary> {
    let columns: Vec<&str> = CSV_HEADER.split(',').collect();
    let col = |name: &str| columns.iter().position(|c| *c == name);
    let (Some(fingers_col), Some(fps_col), Some(gesture_col)) =
        (col("fingers"), col("fps"), col("gesture"))
    else {
        anyhow::bail!("telemetry header is missing expected columns");
    };

    let mut summary = Summary::default();
    for line in reader.lines().skip(1) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != columns.len() {
            summary.skipped += 1;
            continue;
        }
        let Ok(fingers) = fields[fingers_col].parse::<u64>() else {
            summary.skipped += 1;
            continue;
        };

        summary.frames += 1;
        summary.fingers_total += fingers;
        if let Ok(fps) = fields[fps_col].parse::<f64>() {
            summary.fps_total += fps;
            summary.fps_samples += 1;
        }

        let gesture = match fields[gesture_col] {
            "" => "(none)",
            g => g,
        };
        *summary.gestures.entry(gesture.to_string()).or_default() += 1;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_counts_gestures() {
        let csv = format!(
            "{}\n0,2,9000.00,1.00,2.00,3,40.00,30.00,10.00,0.1000,Peace\n\
             1,5,9000.00,1.00,2.00,6,50.00,10.00,,,Palm\n\
             bad,row\n\
             2,2,9000.00,1.00,2.00,3,40.00,20.00,10.00,0.1000,Peace\n",
            CSV_HEADER
        );
        let summary = summarize(csv.as_bytes()).unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.gestures["Peace"], 2);
        assert_eq!(summary.gestures["Palm"], 1);
        assert_eq!(summary.fingers_total, 9);
        assert!((summary.fps_total / summary.fps_samples as f64 - 20.0).abs() < 1e-9);
    }
}
