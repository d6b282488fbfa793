//! Camera-angle intervals used to trigger escalator paths.

use serde::{Deserialize, Serialize};

use super::Vector3;
use crate::constants::EPSILON;

/// Interval of camera angles bounded by two angle vectors.
///
/// Pitch (`x`) is compared linearly. Yaw (`y`) is circular: the range covers
/// the shorter arc between the two bounds, so 350..10 contains 0 but not 180.
/// Bounds exactly half a turn apart cover the arc going up from `v1.y`.
/// Both ends are widened by `EPSILON`, which makes every range contain its
/// own bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    v1: Vector3,
    v2: Vector3,
}

impl AngleRange {
    pub fn new(v1: Vector3, v2: Vector3) -> Self {
        Self { v1, v2 }
    }

    /// Degenerate range matching a single angle
    pub fn single(v: Vector3) -> Self {
        Self { v1: v, v2: v }
    }

    pub fn bounds(&self) -> (Vector3, Vector3) {
        (self.v1, self.v2)
    }

    /// Is the given camera angle inside the range
    pub fn is_vector_in(&self, v: Vector3) -> bool {
        let lo = self.v1.x.min(self.v2.x) - EPSILON;
        let hi = self.v1.x.max(self.v2.x) + EPSILON;
        if v.x < lo || v.x > hi {
            return false;
        }

        let (start, span) = self.yaw_arc();
        let offset = (v.y - start).rem_euclid(360.0);
        offset <= span + EPSILON || offset >= 360.0 - EPSILON
    }

    /// Start and length of the yaw arc, in degrees
    fn yaw_arc(&self) -> (f32, f32) {
        let a = self.v1.y.rem_euclid(360.0);
        let b = self.v2.y.rem_euclid(360.0);
        let forward = (b - a).rem_euclid(360.0);
        if forward <= 180.0 {
            (a, forward)
        } else {
            (b, 360.0 - forward)
        }
    }
}
