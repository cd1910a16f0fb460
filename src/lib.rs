//! Hand gesture recognition from region silhouettes.
//!
//! Picks the hand-sized outline from a frame's contours, counts fingers from
//! the convexity defects of its hull and maps the count plus a few shape
//! cues to a gesture label.

pub mod config;
pub mod error;
pub mod fingers;
pub mod geometry;
pub mod gesture;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod region;
pub mod source;
pub mod types;

pub use config::{AppConfig, Thresholds};
pub use error::AnalysisError;
pub use fingers::FingerCounter;
pub use gesture::GestureClassifier;
pub use pipeline::GesturePipeline;
pub use region::RegionSelector;
pub use types::{
    BoundaryPolygon, ContourFrame, ConvexityDefect, FingerData, FrameContext, FrameReport,
    FrameResult, GestureLabel, Point2D, RegionGeometry,
};
