//! Launchers: escalator tiles that fling the ball along a generated arc.

use tracing::debug;

use super::{EscalatorGrid, Grid, GridShape, Links, StaticGrid, TileId, TileInfo};
use crate::constants::{launch_arc_y, STATIC_STEP, VERTEX_Z};
use crate::math::{to_deg, Vector3};
use crate::stage::Stage;

/// A launcher routes its declared prev/next through the hole and keeps the
/// physical track neighbours as `real`. The launch chain it generates is
/// owned here and released when the next chain is built.
#[derive(Debug, Clone)]
pub struct LauncherGrid {
    pub escalator: EscalatorGrid,
    pub real: Links,
    chain: Vec<TileId>,
}

impl LauncherGrid {
    pub fn new(escalator: EscalatorGrid, real: Links) -> Self {
        Self {
            escalator,
            real,
            chain: Vec::new(),
        }
    }

    /// A launcher with no escape ranges
    pub fn plain(info: TileInfo, real: Links) -> Self {
        Self::new(EscalatorGrid::new(info, Vec::new()), real)
    }

    /// Segments of the most recently generated chain, head first
    pub fn chain(&self) -> &[TileId] {
        &self.chain
    }
}

impl GridShape for LauncherGrid {
    fn info_at(&self, angle: Vector3) -> TileInfo {
        self.escalator.info_at(angle)
    }
}

/// Yaw (degrees) of a launch heading along `direction`
pub fn launch_angle(direction: Vector3) -> f32 {
    to_deg(direction.x.atan2(direction.z))
}

/// Local arc points, rotated to `angle` and moved to `origin`
pub fn arc_points(angle: f32, origin: Vector3) -> Vec<Vector3> {
    let mut points = Vec::new();
    let mut z = 0.0;
    while z <= VERTEX_Z {
        let local = Vector3::new(0.0, launch_arc_y(z), z);
        points.push(local.rotate_about_y(angle) + origin);
        z += STATIC_STEP;
    }
    points
}

/// Escape if a range matches; otherwise build a fresh launch chain and return
/// its head.
pub(crate) fn next(
    stage: &mut Stage,
    id: TileId,
    escape: Option<TileId>,
    angle: Vector3,
    current: Option<TileId>,
    depth: usize,
) -> Option<TileId> {
    if let Some(alt) = escape {
        return stage.next_at_depth(alt, angle, current, depth + 1);
    }
    let pos = stage.position(id, angle)?.pos;

    let direction = stage
        .real_prev(id)
        .and_then(|prev| stage.info(prev, angle))
        .and_then(|prev_info| (pos - prev_info.pos).normalize())
        .unwrap_or(Vector3::UNIT_Z);
    let launch = launch_angle(direction);

    stage.release_chain(id);

    let hole = stage.hole();
    let mut chain = Vec::new();
    let mut prev = id;
    for point in arc_points(launch, pos) {
        let segment = stage.insert(
            Grid::Static(StaticGrid::new(TileInfo::new(point), angle)),
            Links::new(Some(prev), Some(hole)),
        );
        if prev != id {
            stage.set_real_next(prev, Some(segment));
        }
        chain.push(segment);
        prev = segment;
    }

    let head = chain.first().copied();
    debug!(
        launcher = %id,
        launch_angle = launch,
        head = ?head,
        segments = chain.len(),
        "launch chain generated"
    );

    if let Some(Grid::Launcher(launcher)) = stage.grid_mut(id) {
        launcher.chain = chain;
    }
    head
}
