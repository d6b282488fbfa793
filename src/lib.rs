//! Echo Path Core
//!
//! The path model of a rotation-based 3D maze: a ball rolls across a graph of
//! tiles whose position and connectivity depend on the camera angle.
//! - Vector math across the absolute/world/screen frames
//! - Angle ranges for camera-dependent shortcuts
//! - Tile variants: plain, static, freeform, escalator, launcher, intersection
//! - Stage arena with the hole sentinel, level map and per-angle caches
//! - Track cursor for walking the graph one tile at a time

pub mod config;
pub mod constants;
pub mod error;
pub mod grid;
pub mod logging;
pub mod math;
pub mod stage;

pub use config::{CameraOverridePolicy, StageConfig};
pub use error::{PathError, PathResult};
pub use grid::{Grid, GridShape, Links, TileId, TileInfo};
pub use math::{AngleRange, Vector3};
pub use stage::{Stage, Step, TrackCursor};
