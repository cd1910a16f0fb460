use anyhow::{Context, Result};
use colored::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::metrics::PerformanceSample;
use crate::types::FrameReport;

pub const CSV_HEADER: &str =
    "frame,fingers,maxContourArea,centerX,centerY,convexDefects,avgAngle,fps,usedMemoryMB,cpuLoad,gesture";

/// Append-only CSV performance log, one row per analysed frame
pub struct TelemetryWriter<W: Write> {
    out: W,
    rows: u64,
}

impl TelemetryWriter<BufWriter<File>> {
    /// Creates `performance_<timestamp>.csv` inside `dir`.
    pub fn create(dir: impl AsRef<Path>) -> Result<(Self, PathBuf)> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create report directory {}", dir.display()))?;

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("performance_{}.csv", stamp));
        let file = File::create(&path)
            .with_context(|| format!("Failed to create CSV {}", path.display()))?;

        Ok((Self::new(BufWriter::new(file))?, path))
    }
}

impl<W: Write> TelemetryWriter<W> {
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "{}", CSV_HEADER)?;
        out.flush()?;
        Ok(Self { out, rows: 0 })
    }

    pub fn write(&mut self, report: &FrameReport, perf: &PerformanceSample) -> Result<()> {
        writeln!(self.out, "{}", format_row(report, perf))?;
        // Flushed per row so a killed process still leaves a usable log
        self.out.flush()?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn format_row(report: &FrameReport, perf: &PerformanceSample) -> String {
    let r = &report.result;
    let memory = perf
        .used_memory_mb
        .map(|m| format!("{:.2}", m))
        .unwrap_or_default();
    let cpu = perf
        .cpu_load
        .map(|c| format!("{:.4}", c))
        .unwrap_or_default();

    format!(
        "{},{},{:.2},{:.2},{:.2},{},{:.2},{:.2},{},{},{}",
        report.index,
        r.fingers.count,
        r.area,
        r.centroid.x,
        r.centroid.y,
        r.defect_count,
        r.fingers.avg_angle,
        perf.fps,
        memory,
        cpu,
        r.gesture
    )
}

/// One-line on-screen style annotation for a frame
pub fn annotate(report: &FrameReport) -> String {
    let r = &report.result;
    if !r.has_region() {
        return format!("[{:>5}] {}", report.index, "no hand".dimmed());
    }
    format!(
        "[{:>5}] Fingers: {} - {}",
        report.index,
        r.fingers.count.to_string().yellow(),
        r.gesture.to_string().green().bold()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FingerData, FrameResult, GestureLabel, Point2D};

    fn peace_report() -> FrameReport {
        FrameReport {
            index: 12,
            result: FrameResult {
                fingers: FingerData {
                    count: 2,
                    avg_angle: 41.234,
                    valid_defects: 1,
                },
                gesture: GestureLabel::Peace,
                centroid: Point2D::new(320.456, 240.0),
                area: 15234.5,
                defect_count: 4,
            },
        }
    }

    #[test]
    fn test_row_format() {
        let perf = PerformanceSample {
            fps: 29.97,
            used_memory_mb: Some(48.126),
            cpu_load: Some(0.12346),
        };
        assert_eq!(
            format_row(&peace_report(), &perf),
            "12,2,15234.50,320.46,240.00,4,41.23,29.97,48.13,0.1235,Peace"
        );
    }

    #[test]
    fn test_unknown_metrics_left_empty() {
        let perf = PerformanceSample {
            fps: 10.0,
            ..Default::default()
        };
        let row = format_row(&peace_report(), &perf);
        assert!(row.ends_with(",10.00,,,Peace"), "{}", row);
    }

    #[test]
    fn test_writer_appends_rows_after_header() {
        let mut writer = TelemetryWriter::new(Vec::new()).unwrap();
        writer
            .write(&peace_report(), &PerformanceSample::default())
            .unwrap();
        assert_eq!(writer.rows(), 1);

        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].starts_with("12,2,"));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_create_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (_writer, path) = TelemetryWriter::create(dir.path().join("csvs")).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), CSV_HEADER);
    }
}
