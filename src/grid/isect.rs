//! Intersection tiles: resolve which stacked level a straight roll lands on.
//!
//! Several tiles can overlap on screen while sitting at different heights.
//! An intersection tile extends the ball's trajectory to its own level's
//! plane and picks whichever tile of that level the trajectory hits. At steep
//! camera pitches it also looks along the view ray for a tile on another
//! level that visually covers it (the camera override).

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GridShape, StaticGrid, TileId, TileInfo};
use crate::config::CameraOverridePolicy;
use crate::math::Vector3;
use crate::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionGrid {
    pub base: StaticGrid,
    /// Height of the level plane this tile belongs to
    pub level_y: f32,
}

impl IntersectionGrid {
    pub fn new(info: TileInfo, camera: Vector3) -> Self {
        Self {
            base: StaticGrid::new(info, camera),
            level_y: info.pos.y,
        }
    }
}

impl GridShape for IntersectionGrid {
    fn info_at(&self, angle: Vector3) -> TileInfo {
        self.base.info_at(angle)
    }
}

/// Where the ray from `from` along `vec` crosses height `level_y`.
///
/// A level ray (`vec.y == 0`) ends at `from + vec`. A ray heading away from
/// the level never reaches it.
pub fn end_pt(from: Vector3, vec: Vector3, level_y: f32) -> Option<Vector3> {
    if vec.y == 0.0 {
        return Some(from + vec);
    }
    let delta_y = level_y - from.y;
    if (delta_y > 0.0 && vec.y < 0.0) || (delta_y < 0.0 && vec.y > 0.0) {
        return None;
    }
    Some(from + vec * (delta_y / vec.y))
}

/// First tile of `level` whose footprint holds `pt`
fn check_level(stage: &mut Stage, level: &[TileId], pt: Vector3, angle: Vector3) -> Option<TileId> {
    level
        .iter()
        .copied()
        .find(|tile| stage.is_point_on(*tile, angle, pt))
}

/// Scan levels in the given order for the first tile the ray hits
fn check_levels(
    stage: &mut Stage,
    levels: Vec<(f32, Vec<TileId>)>,
    from: Vector3,
    vec: Vector3,
    angle: Vector3,
) -> Option<TileId> {
    levels.into_iter().find_map(|(height, tiles)| {
        end_pt(from, vec, height).and_then(|pt| check_level(stage, &tiles, pt, angle))
    })
}

/// Camera override first, then the tile of this level the trajectory lands
/// on, then the plain track.
pub(crate) fn next(
    stage: &mut Stage,
    id: TileId,
    isect: IntersectionGrid,
    angle: Vector3,
    current: Option<TileId>,
) -> Option<TileId> {
    stage.refresh(id, angle);
    if let Some(cam) = stage.camera_override(id) {
        return Some(cam);
    }
    let fallback = |stage: &mut Stage| stage.links(id).and_then(|links| links.forward_from(current));

    let own = stage.position(id, angle)?.pos;
    let prev_pos = stage
        .real_prev(id)
        .and_then(|prev| stage.info(prev, angle))
        .map(|info| info.pos);

    let target = match prev_pos {
        Some(from) => match end_pt(from, own - from, isect.level_y) {
            Some(pt) => pt,
            None => return fallback(stage),
        },
        None => own,
    };

    let level = stage.level_tiles(isect.level_y);
    check_level(stage, &level, target, angle).or_else(|| fallback(stage))
}

/// Recompute the camera override for `id` at `camera`
pub(crate) fn refresh_camera_override(
    stage: &mut Stage,
    id: TileId,
    isect: IntersectionGrid,
    camera: Vector3,
) {
    let (band_min, band_max) = stage.config().steep_band;
    let pitch = camera.x.abs();
    if pitch < band_min || pitch > band_max {
        if stage.config().camera_override == CameraOverridePolicy::ClearOutsideBand {
            stage.set_camera_override(id, None);
        }
        return;
    }

    let Some(own) = stage.position(id, camera).map(|info| info.pos) else {
        return;
    };
    let toward_camera = camera.angle_to_real();
    let above = stage.levels_higher_than(isect.level_y);
    let below = stage.levels_lower_than(isect.level_y);

    let found = if toward_camera.y > 0.0 {
        check_levels(stage, above, own, toward_camera, camera)
            .or_else(|| check_levels(stage, below, own, toward_camera, camera))
    } else {
        check_levels(stage, below, own, toward_camera, camera)
            .or_else(|| check_levels(stage, above, own, toward_camera, camera))
    };

    if let Some(cam) = found {
        debug!(tile = %id, covered_by = %cam, "camera override found");
    }
    stage.set_camera_override(id, found);
}
