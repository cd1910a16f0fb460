use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub thresholds: Thresholds,
    pub contour: ContourConfig,
    pub telemetry: TelemetryConfig,
}

/// Empirically tuned for a 640x480 selfie camera at arm's length.
/// Re-tune per deployment rather than touching the algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// A region must strictly exceed this area (px²) to count as a hand
    pub min_region_area: f64,
    /// Shallower defects are contour jaggedness, not finger valleys (px)
    pub min_defect_depth: f64,
    /// Wider valleys are thumb/palm base or wrist gaps (degrees)
    pub max_defect_angle: f64,
    /// Horizontal spread of the two topmost points separating Peace from Rock (px)
    pub peace_min_spread: f64,
    /// Closest boundary point pair below this reads as a thumb/index pinch (px)
    pub ok_max_pinch_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourConfig {
    /// Douglas-Peucker tolerance applied before hull analysis (px). 0 disables it.
    pub approx_epsilon: f64,
    /// Mask pixels above this value are foreground
    pub mask_threshold: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub report_dir: PathBuf,
    pub log_empty_frames: bool,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_region_area: 5000.0,
            min_defect_depth: 25.0,
            max_defect_angle: 85.0,
            peace_min_spread: 40.0,
            ok_max_pinch_distance: 50.0,
        }
    }
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            approx_epsilon: 3.0,
            mask_threshold: 127,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            report_dir: PathBuf::from("reports"),
            log_empty_frames: false,
        }
    }
}

impl AppConfig {
    pub const DEFAULT_PATH: &'static str = "config.json";

    /// Loads the config at `path`, falling back to defaults when the file is
    /// missing or unparsable. The result is written back so new fields show up.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            match serde_json::from_str::<AppConfig>(&content) {
                Ok(c) => {
                    tracing::info!("Loaded configuration from {}", path.display());
                    c
                }
                Err(e) => {
                    tracing::warn!("Error parsing config: {}. Loading defaults.", e);
                    Self::default()
                }
            }
        } else {
            tracing::info!(
                "Configuration file not found. Creating default at {}",
                path.display()
            );
            Self::default()
        };

        config.save(path)?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }
}
