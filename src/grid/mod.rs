//! Tiles ("grids") of the maze graph.
//!
//! Tiles live in a [`crate::stage::Stage`] arena and refer to each other by
//! [`TileId`]. Each variant is a plain data type implementing [`GridShape`]
//! (where it is and what its footprint looks like); the angle-dependent
//! traversal rules that need the rest of the stage live next to each variant
//! as `next` functions taking the stage explicitly.

pub mod escalator;
pub mod freeform;
pub mod isect;
pub mod launcher;
pub mod static_grid;

pub use escalator::EscalatorGrid;
pub use freeform::FreeformGrid;
pub use isect::IntersectionGrid;
pub use launcher::LauncherGrid;
pub use static_grid::StaticGrid;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, Key};
use std::fmt;

use crate::constants::{EPSILON, GRID_HALF_SIZE};
use crate::math::{line_seg_intersect, point_on_segment, Vector3};

new_key_type! {
    /// Generational handle of a tile inside its stage's arena. A handle to a
    /// removed tile stays dead even after its slot is reused.
    pub struct TileId;
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:?}", self.data())
    }
}

/// Distinct live-looking handles for unit tests that need ids without a stage
#[cfg(test)]
pub(crate) fn test_ids(n: usize) -> Vec<TileId> {
    let mut keys = slotmap::SlotMap::<TileId, ()>::with_key();
    (0..n).map(|_| keys.insert(())).collect()
}

/// Position of a tile in some frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TileInfo {
    pub pos: Vector3,
}

impl TileInfo {
    pub fn new(pos: Vector3) -> Self {
        Self { pos }
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(Vector3::new(x, y, z))
    }
}

/// Non-owning neighbour links along the track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    pub prev: Option<TileId>,
    pub next: Option<TileId>,
}

impl Links {
    pub fn new(prev: Option<TileId>, next: Option<TileId>) -> Self {
        Self { prev, next }
    }

    /// The default traversal rule: keep rolling the way we came. Arriving from
    /// `next` sends the ball back to `prev`; anything else goes to `next`.
    pub fn forward_from(&self, current: Option<TileId>) -> Option<TileId> {
        match (current, self.next) {
            (Some(came_from), Some(next)) if came_from == next => self.prev,
            _ => self.next,
        }
    }
}

/// Where a tile is and what it covers
pub trait GridShape {
    /// The tile's position as seen at camera `angle`
    fn info_at(&self, angle: Vector3) -> TileInfo;

    /// Footprint corners around `info.pos`, in fan order
    fn generate_points(&self, info: &TileInfo) -> [Vector3; 4] {
        square_points(info.pos, GRID_HALF_SIZE)
    }
}

/// Square footprint in the x/z plane, ordered `(+,+) (-,+) (-,-) (+,-)`
pub fn square_points(pos: Vector3, half: f32) -> [Vector3; 4] {
    [
        pos + Vector3::new(half, 0.0, half),
        pos + Vector3::new(-half, 0.0, half),
        pos + Vector3::new(-half, 0.0, -half),
        pos + Vector3::new(half, 0.0, -half),
    ]
}

/// Is `pt` inside (or on the edge of) the convex footprint `points`,
/// compared in the x/z plane
pub fn footprint_contains(points: &[Vector3; 4], pt: Vector3) -> bool {
    let flat = |v: Vector3| Vector3::new(v.x, v.z, 0.0);
    let corners = points.map(flat);
    let target = flat(pt);
    let center = corners
        .iter()
        .fold(Vector3::ZERO, |acc, c| acc + *c)
        * 0.25;

    (0..corners.len()).all(|i| {
        let a = corners[i];
        let b = corners[(i + 1) % corners.len()];
        !line_seg_intersect(center, target, a, b) || point_on_segment(target, a, b, EPSILON)
    })
}

/// A regular tile fixed in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlainGrid {
    pub info: TileInfo,
}

impl PlainGrid {
    pub fn new(info: TileInfo) -> Self {
        Self { info }
    }
}

impl GridShape for PlainGrid {
    fn info_at(&self, _angle: Vector3) -> TileInfo {
        self.info
    }
}

/// Every kind of tile a stage can hold
#[derive(Debug, Clone)]
pub enum Grid {
    /// The "fell out of the world" sentinel
    Hole,
    Plain(PlainGrid),
    Static(StaticGrid),
    Freeform(FreeformGrid),
    Escalator(EscalatorGrid),
    Launcher(LauncherGrid),
    Intersection(IntersectionGrid),
}

impl Grid {
    /// Positional behaviour, `None` for the hole
    pub fn shape(&self) -> Option<&dyn GridShape> {
        match self {
            Grid::Hole => None,
            Grid::Plain(g) => Some(g),
            Grid::Static(g) => Some(g),
            Grid::Freeform(g) => Some(g),
            Grid::Escalator(g) => Some(g),
            Grid::Launcher(g) => Some(g),
            Grid::Intersection(g) => Some(g),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Grid::Hole => "hole",
            Grid::Plain(_) => "grid",
            Grid::Static(_) => "static",
            Grid::Freeform(_) => "freeform",
            Grid::Escalator(_) => "escalator",
            Grid::Launcher(_) => "launcher",
            Grid::Intersection(_) => "isect",
        }
    }

    /// Escape tiles this tile may hand traversal to
    pub fn escape_targets(&self) -> Vec<TileId> {
        match self {
            Grid::Escalator(g) => g.escape_tiles().collect(),
            Grid::Launcher(g) => g.escalator.escape_tiles().collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_grid_ignores_angle() {
        let g = PlainGrid::new(TileInfo::at(1.0, 2.0, 3.0));
        assert_eq!(g.info_at(Vector3::new(40.0, 90.0, 0.0)).pos, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_square_points_order() {
        let pts = square_points(Vector3::ZERO, 0.5);
        assert_eq!(pts[0], Vector3::new(0.5, 0.0, 0.5));
        assert_eq!(pts[1], Vector3::new(-0.5, 0.0, 0.5));
        assert_eq!(pts[2], Vector3::new(-0.5, 0.0, -0.5));
        assert_eq!(pts[3], Vector3::new(0.5, 0.0, -0.5));
    }

    #[test]
    fn test_footprint_contains() {
        let pts = square_points(Vector3::new(2.0, 1.0, 2.0), 0.5);
        assert!(footprint_contains(&pts, Vector3::new(2.0, 1.0, 2.0)));
        assert!(footprint_contains(&pts, Vector3::new(2.3, 1.0, 1.8)));
        assert!(footprint_contains(&pts, Vector3::new(2.5, 1.0, 2.0)), "edge counts");
        assert!(!footprint_contains(&pts, Vector3::new(3.0, 1.0, 2.0)));
        assert!(!footprint_contains(&pts, Vector3::new(2.0, 1.0, 0.0)));
    }

    #[test]
    fn test_forward_from() {
        let ids = test_ids(2);
        let (a, b) = (ids[0], ids[1]);
        let links = Links::new(Some(a), Some(b));
        assert_eq!(links.forward_from(None), Some(b));
        assert_eq!(links.forward_from(Some(a)), Some(b));
        assert_eq!(links.forward_from(Some(b)), Some(a));
    }

    #[test]
    fn test_hole_has_no_shape() {
        assert!(Grid::Hole.shape().is_none());
        assert_eq!(Grid::Hole.kind_name(), "hole");
    }
}
