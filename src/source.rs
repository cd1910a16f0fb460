use anyhow::{Context, Result};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::types::{BoundaryPolygon, ContourFrame, Point2D};

/// Anything that yields one frame of candidate outlines at a time
pub trait FrameSource {
    fn name(&self) -> String;
    /// `Ok(None)` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<ContourFrame>>;
}

/// Replays recorded contour output, one JSON `ContourFrame` per line.
pub struct ReplaySource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl ReplaySource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .with_context(|| format!("Failed to open frame file {}", path.display()))?;
        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            line_no: 0,
        })
    }
}

impl FrameSource for ReplaySource {
    fn name(&self) -> String {
        format!("Replay ({})", self.path.display())
    }

    fn next_frame(&mut self) -> Result<Option<ContourFrame>> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            let line = line.with_context(|| format!("Failed to read line {}", self.line_no))?;
            if line.trim().is_empty() {
                continue;
            }
            // A corrupt record costs one frame, not the stream
            let frame = match serde_json::from_str::<ContourFrame>(&line) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!("Skipping malformed frame at line {}: {}", self.line_no, e);
                    ContourFrame::default()
                }
            };
            return Ok(Some(frame));
        }
        Ok(None)
    }
}

/// Reads pre-segmented binary masks (`*.png`, sorted by name) and traces the
/// outer border of every foreground blob.
pub struct MaskSource {
    dir: PathBuf,
    files: std::vec::IntoIter<PathBuf>,
    threshold: u8,
}

impl MaskSource {
    pub fn open(dir: impl AsRef<Path>, threshold: u8) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let mut files: Vec<PathBuf> = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read mask directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
            })
            .collect();
        files.sort();

        tracing::info!("Found {} mask frames in {}", files.len(), dir.display());
        Ok(Self {
            dir,
            files: files.into_iter(),
            threshold,
        })
    }
}

impl FrameSource for MaskSource {
    fn name(&self) -> String {
        format!("Masks ({})", self.dir.display())
    }

    fn next_frame(&mut self) -> Result<Option<ContourFrame>> {
        let Some(path) = self.files.next() else {
            return Ok(None);
        };

        let mask = match image::open(&path) {
            Ok(img) => img.to_luma8(),
            Err(e) => {
                tracing::warn!("Skipping unreadable mask {}: {}", path.display(), e);
                return Ok(Some(ContourFrame::default()));
            }
        };

        Ok(Some(ContourFrame {
            contours: external_contours(&mask, self.threshold),
        }))
    }
}

/// Outer borders of top-level blobs only; holes and nested blobs are dropped.
pub fn external_contours(mask: &GrayImage, threshold: u8) -> Vec<BoundaryPolygon> {
    let mut binary = mask.clone();
    for pixel in binary.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > threshold { 255 } else { 0 };
    }

    find_contours::<i32>(&binary)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| {
            BoundaryPolygon::new(
                c.points
                    .iter()
                    .map(|p| Point2D::new(p.x as f64, p.y as f64))
                    .collect(),
            )
        })
        .collect()
}
