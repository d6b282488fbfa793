use serde::{Deserialize, Serialize};

use super::{GridShape, TileInfo};
use crate::math::Vector3;

/// A tile pinned in absolute space.
///
/// It does not turn with the world, so its world position changes with the
/// camera. Launch arcs are built from these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticGrid {
    absolute: Vector3,
}

impl StaticGrid {
    /// `info` is a world position as seen from `camera`
    pub fn new(info: TileInfo, camera: Vector3) -> Self {
        Self {
            absolute: info.pos.world_to_absolute(camera),
        }
    }

    pub fn from_absolute(absolute: Vector3) -> Self {
        Self { absolute }
    }

    pub fn absolute(&self) -> Vector3 {
        self.absolute
    }
}

impl GridShape for StaticGrid {
    fn info_at(&self, angle: Vector3) -> TileInfo {
        TileInfo::new(self.absolute.absolute_to_world(angle))
    }
}
