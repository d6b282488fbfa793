//! Escalator tiles ("escgrids"): alternate paths selected by camera angle.

use super::{GridShape, TileId, TileInfo};
use crate::error::{PathError, PathResult};
use crate::math::{AngleRange, Vector3};
use crate::stage::Stage;

/// A tile with a normal path plus alternate ("escape") tiles.
///
/// Each escape is guarded by an [`AngleRange`]; the first range (in
/// construction order) containing the current camera angle wins.
#[derive(Debug, Clone, PartialEq)]
pub struct EscalatorGrid {
    pub normal_info: TileInfo,
    /// Where the tile appears while an escape is active
    pub esc_info: Option<TileInfo>,
    /// The angle this escalator was authored for, if built from one
    pub esc_angle: Option<Vector3>,
    escapes: Vec<(AngleRange, TileId)>,
}

impl EscalatorGrid {
    pub fn new(info: TileInfo, escapes: Vec<(AngleRange, TileId)>) -> Self {
        Self {
            normal_info: info,
            esc_info: None,
            esc_angle: None,
            escapes,
        }
    }

    /// Escapes from parallel lists; the lists must be the same length
    pub fn from_parallel(
        info: TileInfo,
        ranges: Vec<AngleRange>,
        tiles: Vec<TileId>,
    ) -> PathResult<Self> {
        if ranges.len() != tiles.len() {
            return Err(PathError::Configuration(format!(
                "escalator has {} angle ranges but {} escape tiles",
                ranges.len(),
                tiles.len()
            )));
        }
        Ok(Self::new(info, ranges.into_iter().zip(tiles).collect()))
    }

    /// A single escape triggered by exactly `esc_angle`
    pub fn with_escape_angle(
        esc_angle: Vector3,
        normal_info: TileInfo,
        esc_info: TileInfo,
        esc_tile: TileId,
    ) -> Self {
        Self {
            normal_info,
            esc_info: Some(esc_info),
            esc_angle: Some(esc_angle),
            escapes: vec![(AngleRange::single(esc_angle), esc_tile)],
        }
    }

    pub fn push_escape(&mut self, range: AngleRange, tile: TileId) {
        self.escapes.push((range, tile));
    }

    pub fn escapes(&self) -> &[(AngleRange, TileId)] {
        &self.escapes
    }

    pub fn escape_tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.escapes.iter().map(|(_, tile)| *tile)
    }

    /// First escape tile whose range holds `angle`
    pub fn esc(&self, angle: Vector3) -> Option<TileId> {
        self.escapes
            .iter()
            .find(|(range, _)| range.is_vector_in(angle))
            .map(|(_, tile)| *tile)
    }
}

impl GridShape for EscalatorGrid {
    fn info_at(&self, angle: Vector3) -> TileInfo {
        match self.esc_info {
            Some(info) if self.esc(angle).is_some() => info,
            _ => self.normal_info,
        }
    }
}

/// Escape into the matching alternate tile, or follow the track
pub(crate) fn next(
    stage: &mut Stage,
    id: TileId,
    escape: Option<TileId>,
    angle: Vector3,
    current: Option<TileId>,
    depth: usize,
) -> Option<TileId> {
    match escape {
        Some(alt) => stage.next_at_depth(alt, angle, current, depth + 1),
        None => stage.links(id).and_then(|links| links.forward_from(current)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::test_ids;

    fn angle(x: f32, y: f32) -> Vector3 {
        Vector3::new(x, y, 0.0)
    }

    #[test]
    fn test_first_matching_range_wins() {
        let ids = test_ids(2);
        let esc = EscalatorGrid::new(
            TileInfo::default(),
            vec![
                (AngleRange::new(angle(0.0, 0.0), angle(0.0, 90.0)), ids[0]),
                (AngleRange::new(angle(0.0, 45.0), angle(0.0, 135.0)), ids[1]),
            ],
        );
        assert_eq!(esc.esc(angle(0.0, 60.0)), Some(ids[0]));
        assert_eq!(esc.esc(angle(0.0, 120.0)), Some(ids[1]));
        assert_eq!(esc.esc(angle(0.0, 200.0)), None);
    }

    #[test]
    fn test_from_parallel_rejects_mismatch() {
        let ids = test_ids(2);
        let err = EscalatorGrid::from_parallel(
            TileInfo::default(),
            vec![AngleRange::single(Vector3::ZERO)],
            ids,
        )
        .unwrap_err();
        assert!(matches!(err, PathError::Configuration(_)));
    }

    #[test]
    fn test_from_parallel_keeps_order() {
        let ids = test_ids(2);
        let esc = EscalatorGrid::from_parallel(
            TileInfo::default(),
            vec![AngleRange::single(angle(10.0, 0.0)), AngleRange::single(angle(20.0, 0.0))],
            ids.clone(),
        )
        .unwrap();
        let tiles: Vec<_> = esc.escape_tiles().collect();
        assert_eq!(tiles, ids);
    }

    #[test]
    fn test_escape_info_follows_angle() {
        let escape = test_ids(1)[0];
        let esc = EscalatorGrid::with_escape_angle(
            angle(30.0, 90.0),
            TileInfo::at(0.0, 0.0, 0.0),
            TileInfo::at(0.0, 1.0, 0.0),
            escape,
        );
        assert_eq!(esc.info_at(angle(30.0, 90.0)).pos, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(esc.info_at(angle(0.0, 0.0)).pos, Vector3::ZERO);
        assert_eq!(esc.esc(angle(30.0, 90.0)), Some(escape));
    }
}
