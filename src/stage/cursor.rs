//! The rolling ball's place in the tile graph.

use super::Stage;
use crate::grid::{TileId, TileInfo};
use crate::math::Vector3;

/// Outcome of one [`TrackCursor::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved(TileId),
    /// Rolled onto the hole
    Fell,
    /// No successor: end of track, or already in the hole
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackCursor {
    pub current: TileId,
    pub previous: Option<TileId>,
}

impl TrackCursor {
    pub fn new(start: TileId) -> Self {
        Self {
            current: start,
            previous: None,
        }
    }

    /// Roll one tile forward at `angle`
    pub fn advance(&mut self, stage: &mut Stage, angle: Vector3) -> Step {
        match stage.next(self.current, angle, self.previous) {
            Some(next) => {
                self.previous = Some(self.current);
                self.current = next;
                if stage.is_hole(next) {
                    Step::Fell
                } else {
                    Step::Moved(next)
                }
            }
            None => Step::Stopped,
        }
    }

    pub fn position(&self, stage: &mut Stage, angle: Vector3) -> Option<TileInfo> {
        stage.info(self.current, angle)
    }

    pub fn has_fallen(&self, stage: &Stage) -> bool {
        stage.is_hole(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_to_end_of_track() {
        let mut stage = Stage::new();
        let a = stage.add_grid(TileInfo::at(0.0, 0.0, 0.0), None, None).unwrap();
        let b = stage.add_grid(TileInfo::at(1.0, 0.0, 0.0), None, None).unwrap();
        stage.link(a, b).unwrap();

        let mut cursor = TrackCursor::new(a);
        assert_eq!(cursor.advance(&mut stage, Vector3::ZERO), Step::Moved(b));
        assert_eq!(cursor.previous, Some(a));
        assert_eq!(
            cursor.position(&mut stage, Vector3::ZERO).unwrap().pos,
            Vector3::new(1.0, 0.0, 0.0)
        );
        assert_eq!(cursor.advance(&mut stage, Vector3::ZERO), Step::Stopped);
        assert_eq!(cursor.current, b, "stopping does not move the cursor");
    }

    #[test]
    fn test_fall_into_hole() {
        let mut stage = Stage::new();
        let hole = stage.hole();
        let a = stage.add_grid(TileInfo::default(), None, Some(hole)).unwrap();

        let mut cursor = TrackCursor::new(a);
        assert_eq!(cursor.advance(&mut stage, Vector3::ZERO), Step::Fell);
        assert!(cursor.has_fallen(&stage));
        assert!(cursor.position(&mut stage, Vector3::ZERO).is_none());
        assert_eq!(cursor.advance(&mut stage, Vector3::ZERO), Step::Stopped);
    }
}
