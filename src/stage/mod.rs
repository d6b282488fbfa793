//! Stage: the arena that owns every tile of a loaded world.
//!
//! Tiles reference each other by generational [`TileId`] handles; the hole is
//! created with the stage and never removed. All tile operations go through the stage so that variants needing the level
//! map or other tiles (intersections, launchers) get them explicitly.
//!
//! Per-angle state is kept in an [`AngleCache`] next to each tile. `refresh`
//! only recomputes when the requested angle differs from the cached one.

pub mod cursor;
pub mod levels;

pub use cursor::{Step, TrackCursor};
pub use levels::{LevelHeight, LevelMap};

use slotmap::SlotMap;
use tracing::{trace, warn};

use crate::config::StageConfig;
use crate::constants::MAX_ESCAPE_DEPTH;
use crate::error::{PathError, PathResult};
use crate::grid::{
    escalator, footprint_contains, isect, launcher, EscalatorGrid, FreeformGrid, Grid,
    IntersectionGrid, LauncherGrid, Links, PlainGrid, StaticGrid, TileId, TileInfo,
};
use crate::math::{AngleRange, Vector3};

/// Angle-keyed memo for one tile
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngleCache {
    /// Angle the cache was computed at; `None` until the first refresh
    pub angle: Option<Vector3>,
    pub info: Option<TileInfo>,
    /// Tile covering this one from the camera's point of view
    pub cam_override: Option<TileId>,
}

impl AngleCache {
    pub fn is_warm(&self, angle: Vector3) -> bool {
        self.angle == Some(angle)
    }
}

#[derive(Debug, Clone)]
struct Tile {
    grid: Grid,
    links: Links,
    cache: AngleCache,
}

impl Tile {
    fn new(grid: Grid, links: Links) -> Self {
        Self {
            grid,
            links,
            cache: AngleCache::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Stage {
    tiles: SlotMap<TileId, Tile>,
    hole: TileId,
    levels: LevelMap,
    config: StageConfig,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    pub fn new() -> Self {
        Self::with_config(StageConfig::default())
    }

    pub fn with_config(config: StageConfig) -> Self {
        let mut tiles = SlotMap::with_key();
        let hole = tiles.insert(Tile::new(Grid::Hole, Links::default()));
        Self {
            tiles,
            hole,
            levels: LevelMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// The "fell out of the world" tile
    pub fn hole(&self) -> TileId {
        self.hole
    }

    pub fn is_hole(&self, id: TileId) -> bool {
        id == self.hole()
    }

    /// Number of live tiles, the hole included
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Whether `id` names a live tile; false for released launch segments
    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.contains_key(id)
    }

    fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id)
    }

    fn require(&self, id: TileId) -> PathResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(PathError::UnknownTile(id))
        }
    }

    fn require_links(&self, links: &Links) -> PathResult<()> {
        for id in links.prev.iter().chain(links.next.iter()) {
            self.require(*id)?;
        }
        Ok(())
    }

    // =====================================================
    // Building
    // =====================================================

    /// Store a tile without checking its links
    pub(crate) fn insert(&mut self, grid: Grid, links: Links) -> TileId {
        self.tiles.insert(Tile::new(grid, links))
    }

    /// A regular tile fixed in the world
    pub fn add_grid(
        &mut self,
        info: TileInfo,
        prev: Option<TileId>,
        next: Option<TileId>,
    ) -> PathResult<TileId> {
        self.add(Grid::Plain(PlainGrid::new(info)), Links::new(prev, next))
    }

    /// A tile pinned in absolute space; `info` is its world position at `camera`
    pub fn add_static(
        &mut self,
        info: TileInfo,
        prev: Option<TileId>,
        next: Option<TileId>,
        camera: Vector3,
    ) -> PathResult<TileId> {
        self.add(
            Grid::Static(StaticGrid::new(info, camera)),
            Links::new(prev, next),
        )
    }

    pub fn add_freeform(
        &mut self,
        freeform: FreeformGrid,
        prev: Option<TileId>,
        next: Option<TileId>,
    ) -> PathResult<TileId> {
        self.add(Grid::Freeform(freeform), Links::new(prev, next))
    }

    pub fn add_escalator(
        &mut self,
        escalator: EscalatorGrid,
        prev: Option<TileId>,
        next: Option<TileId>,
    ) -> PathResult<TileId> {
        self.require_escapes(escalator.escape_tiles())?;
        self.add(Grid::Escalator(escalator), Links::new(prev, next))
    }

    /// A launcher on the physical track `real_prev` -> launcher -> `real_next`.
    /// Its declared neighbours are the hole.
    pub fn add_launcher(
        &mut self,
        info: TileInfo,
        real_prev: Option<TileId>,
        real_next: Option<TileId>,
        escapes: Vec<(AngleRange, TileId)>,
    ) -> PathResult<TileId> {
        self.add_launcher_grid(EscalatorGrid::new(info, escapes), real_prev, real_next)
    }

    /// A launcher that escapes to `esc_tile` at exactly `esc_angle`, where it
    /// appears at `esc_info`
    pub fn add_launcher_with_escape(
        &mut self,
        esc_angle: Vector3,
        normal_info: TileInfo,
        esc_info: TileInfo,
        esc_tile: TileId,
        real_prev: Option<TileId>,
        real_next: Option<TileId>,
    ) -> PathResult<TileId> {
        let escalator =
            EscalatorGrid::with_escape_angle(esc_angle, normal_info, esc_info, esc_tile);
        self.add_launcher_grid(escalator, real_prev, real_next)
    }

    fn add_launcher_grid(
        &mut self,
        escalator: EscalatorGrid,
        real_prev: Option<TileId>,
        real_next: Option<TileId>,
    ) -> PathResult<TileId> {
        self.require_escapes(escalator.escape_tiles())?;
        let real = Links::new(real_prev, real_next);
        self.require_links(&real)?;
        let hole = Some(self.hole());
        self.add(
            Grid::Launcher(LauncherGrid::new(escalator, real)),
            Links::new(hole, hole),
        )
    }

    /// An intersection tile; its level is the height of `info`
    pub fn add_intersection(
        &mut self,
        info: TileInfo,
        prev: Option<TileId>,
        next: Option<TileId>,
        camera: Vector3,
    ) -> PathResult<TileId> {
        self.add(
            Grid::Intersection(IntersectionGrid::new(info, camera)),
            Links::new(prev, next),
        )
    }

    fn add(&mut self, grid: Grid, links: Links) -> PathResult<TileId> {
        self.require_links(&links)?;
        Ok(self.insert(grid, links))
    }

    fn require_escapes(&self, mut escapes: impl Iterator<Item = TileId>) -> PathResult<()> {
        match escapes.find(|id| !self.contains(*id) || self.is_hole(*id)) {
            Some(bad) => {
                warn!(tile = %bad, "escalator escape points at a missing tile");
                Err(PathError::Configuration(format!(
                    "escape tile {bad} does not exist"
                )))
            }
            None => Ok(()),
        }
    }

    /// Connect `a` -> `b` along the physical track
    pub fn link(&mut self, a: TileId, b: TileId) -> PathResult<()> {
        self.require(a)?;
        self.require(b)?;
        self.set_real_next(a, Some(b));
        self.set_real_prev(b, Some(a));
        Ok(())
    }

    /// Connect consecutive tiles of `track`
    pub fn link_track(&mut self, track: &[TileId]) -> PathResult<()> {
        for pair in track.windows(2) {
            self.link(pair[0], pair[1])?;
        }
        Ok(())
    }

    /// Register `id` as part of the level at `height`
    pub fn add_to_level(&mut self, height: f32, id: TileId) -> PathResult<()> {
        self.require(id)?;
        self.levels.insert(height, id);
        Ok(())
    }

    // =====================================================
    // Links
    // =====================================================

    pub fn grid(&self, id: TileId) -> Option<&Grid> {
        self.tile(id).map(|t| &t.grid)
    }

    pub fn grid_mut(&mut self, id: TileId) -> Option<&mut Grid> {
        self.tile_mut(id).map(|t| &mut t.grid)
    }

    /// Declared neighbours (the hole for launchers)
    pub fn links(&self, id: TileId) -> Option<Links> {
        self.tile(id).map(|t| t.links)
    }

    pub fn set_links(&mut self, id: TileId, links: Links) -> PathResult<()> {
        self.require_links(&links)?;
        let tile = self.tile_mut(id).ok_or(PathError::UnknownTile(id))?;
        tile.links = links;
        Ok(())
    }

    /// Physical neighbours along the track
    pub fn real_links(&self, id: TileId) -> Option<Links> {
        let tile = self.tile(id)?;
        match &tile.grid {
            Grid::Launcher(l) => Some(l.real),
            _ => Some(tile.links),
        }
    }

    pub fn real_prev(&self, id: TileId) -> Option<TileId> {
        self.real_links(id).and_then(|l| l.prev)
    }

    pub fn real_next(&self, id: TileId) -> Option<TileId> {
        self.real_links(id).and_then(|l| l.next)
    }

    pub fn set_real_prev(&mut self, id: TileId, prev: Option<TileId>) {
        if let Some(tile) = self.tile_mut(id) {
            match &mut tile.grid {
                Grid::Launcher(l) => l.real.prev = prev,
                _ => tile.links.prev = prev,
            }
        }
    }

    pub fn set_real_next(&mut self, id: TileId, next: Option<TileId>) {
        if let Some(tile) = self.tile_mut(id) {
            match &mut tile.grid {
                Grid::Launcher(l) => l.real.next = next,
                _ => tile.links.next = next,
            }
        }
    }

    /// Drop the segments of a launcher's previous chain. Their ids go stale.
    pub(crate) fn release_chain(&mut self, id: TileId) {
        let chain = match self.grid(id) {
            Some(Grid::Launcher(l)) => l.chain().to_vec(),
            _ => return,
        };
        for segment in chain {
            if self.tiles.remove(segment).is_some() {
                self.levels.remove(segment);
            }
        }
    }

    // =====================================================
    // Levels
    // =====================================================

    pub fn levels(&self) -> &LevelMap {
        &self.levels
    }

    pub fn level_tiles(&self, height: f32) -> Vec<TileId> {
        self.levels.level(height).to_vec()
    }

    /// Levels above `y`, nearest first
    pub fn levels_higher_than(&self, y: f32) -> Vec<(f32, Vec<TileId>)> {
        self.levels
            .higher_than(y)
            .map(|(h, tiles)| (h, tiles.to_vec()))
            .collect()
    }

    /// Levels below `y`, nearest first
    pub fn levels_lower_than(&self, y: f32) -> Vec<(f32, Vec<TileId>)> {
        self.levels
            .lower_than(y)
            .map(|(h, tiles)| (h, tiles.to_vec()))
            .collect()
    }

    // =====================================================
    // Per-angle state
    // =====================================================

    pub fn cache(&self, id: TileId) -> Option<AngleCache> {
        self.tile(id).map(|t| t.cache)
    }

    /// Recompute `id`'s cached state unless it is already warm for `angle`
    pub fn refresh(&mut self, id: TileId, angle: Vector3) {
        let warm = self.tile(id).is_some_and(|t| t.cache.is_warm(angle));
        if !warm {
            self.force_refresh(id, angle);
        }
    }

    /// Recompute `id`'s cached state for `angle`
    pub fn force_refresh(&mut self, id: TileId, angle: Vector3) {
        let Some(tile) = self.tile_mut(id) else {
            return;
        };
        tile.cache.angle = Some(angle);
        tile.cache.info = tile.grid.shape().map(|shape| shape.info_at(angle));
        trace!(tile = %id, kind = tile.grid.kind_name(), %angle, "refreshed");

        if let Grid::Intersection(g) = tile.grid {
            isect::refresh_camera_override(self, id, g, angle);
        }
    }

    pub fn camera_override(&self, id: TileId) -> Option<TileId> {
        self.tile(id).and_then(|t| t.cache.cam_override)
    }

    pub(crate) fn set_camera_override(&mut self, id: TileId, cam: Option<TileId>) {
        if let Some(tile) = self.tile_mut(id) {
            tile.cache.cam_override = cam;
        }
    }

    // =====================================================
    // Queries
    // =====================================================

    /// The tile's own position at `angle`
    pub fn position(&mut self, id: TileId, angle: Vector3) -> Option<TileInfo> {
        self.refresh(id, angle);
        self.tile(id).and_then(|t| t.cache.info)
    }

    /// Where the tile appears at `angle`: its camera override's position if it
    /// has one, else its own. `None` for the hole.
    pub fn info(&mut self, id: TileId, angle: Vector3) -> Option<TileInfo> {
        self.refresh(id, angle);
        match self.camera_override(id) {
            Some(cam) if cam != id => self.position(cam, angle),
            _ => self.tile(id).and_then(|t| t.cache.info),
        }
    }

    /// Footprint corners at `angle`
    pub fn generate_points(&mut self, id: TileId, angle: Vector3) -> Option<[Vector3; 4]> {
        let info = self.position(id, angle)?;
        let shape = self.tile(id)?.grid.shape()?;
        Some(shape.generate_points(&info))
    }

    /// Does `pt` fall on the tile's footprint at `angle`
    pub fn is_point_on(&mut self, id: TileId, angle: Vector3, pt: Vector3) -> bool {
        self.generate_points(id, angle)
            .is_some_and(|points| footprint_contains(&points, pt))
    }

    /// The tile to roll onto after `id`, having arrived from `current`.
    /// `None` at the end of the track or from the hole.
    pub fn next(&mut self, id: TileId, angle: Vector3, current: Option<TileId>) -> Option<TileId> {
        self.next_at_depth(id, angle, current, 0)
    }

    pub(crate) fn next_at_depth(
        &mut self,
        id: TileId,
        angle: Vector3,
        current: Option<TileId>,
        depth: usize,
    ) -> Option<TileId> {
        if depth > MAX_ESCAPE_DEPTH {
            warn!(tile = %id, "escape chain too deep, stopping");
            return None;
        }
        self.refresh(id, angle);
        let tile = self.tile(id)?;
        match &tile.grid {
            Grid::Hole => None,
            Grid::Plain(_) | Grid::Static(_) | Grid::Freeform(_) => {
                tile.links.forward_from(current)
            }
            Grid::Escalator(esc) => {
                let escape = esc.esc(angle);
                escalator::next(self, id, escape, angle, current, depth)
            }
            Grid::Launcher(l) => {
                let escape = l.escalator.esc(angle);
                launcher::next(self, id, escape, angle, current, depth)
            }
            Grid::Intersection(g) => {
                let g = *g;
                isect::next(self, id, g, angle, current)
            }
        }
    }
}
