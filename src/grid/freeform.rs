use serde::{Deserialize, Serialize};

use super::{GridShape, TileInfo};
use crate::math::Vector3;

/// A floor segment shaped like a parallelogram spanned by `dir` and `width`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreeformGrid {
    pub info: TileInfo,
    pub dir: Vector3,
    pub width: Vector3,
}

impl Default for FreeformGrid {
    /// Sloping right and up
    fn default() -> Self {
        Self {
            info: TileInfo::default(),
            dir: Vector3::new(0.5, 0.5, 0.0),
            width: Vector3::new(0.0, 0.0, 0.5),
        }
    }
}

impl FreeformGrid {
    pub fn new(info: TileInfo, dir: Vector3, width: Vector3) -> Self {
        Self { info, dir, width }
    }
}

impl GridShape for FreeformGrid {
    fn info_at(&self, _angle: Vector3) -> TileInfo {
        self.info
    }

    /// `pos ± dir ± width` as `(+,+) (-,+) (-,-) (+,-)`; renderers fan over
    /// this order
    fn generate_points(&self, info: &TileInfo) -> [Vector3; 4] {
        let pos = info.pos;
        [
            pos + self.dir + self.width,
            pos - self.dir + self.width,
            pos - self.dir - self.width,
            pos + self.dir - self.width,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::footprint_contains;

    #[test]
    fn test_generate_points_order() {
        let g = FreeformGrid::new(
            TileInfo::at(1.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.5),
        );
        let pts = g.generate_points(&g.info);
        assert_eq!(pts[0], Vector3::new(2.0, 0.0, 1.5));
        assert_eq!(pts[1], Vector3::new(0.0, 0.0, 1.5));
        assert_eq!(pts[2], Vector3::new(0.0, 0.0, 0.5));
        assert_eq!(pts[3], Vector3::new(2.0, 0.0, 0.5));
    }

    #[test]
    fn test_default_slopes_up() {
        let g = FreeformGrid::default();
        let pts = g.generate_points(&g.info);
        assert_eq!(pts[0], Vector3::new(0.5, 0.5, 0.5));
        assert_eq!(pts[2], Vector3::new(-0.5, -0.5, -0.5));
    }

    #[test]
    fn test_skewed_footprint() {
        let g = FreeformGrid::new(
            TileInfo::default(),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(0.5, 0.0, -0.5),
        );
        let pts = g.generate_points(&g.info);
        assert!(footprint_contains(&pts, Vector3::new(0.9, 0.0, 0.9)));
        assert!(!footprint_contains(&pts, Vector3::new(1.0, 0.0, -1.0)));
    }
}
