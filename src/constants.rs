//! Centralized constants for the echo path core.
//!
//! The launcher arc and the steep-camera band are part of the track's
//! physical contract: changing them changes where balls land.

// =====================================================
// Math
// =====================================================

/// Pi, at the precision the track geometry was authored with
pub const PI: f32 = 3.141_592_6;

/// Range of error for vector similarity (per component)
pub const EPSILON: f32 = 5e-2;

/// World up; fixed point used by `Vector3::dist_with_up`
pub const UP: glam::Vec3 = glam::Vec3::Y;

// =====================================================
// Tiles
// =====================================================

/// Half the side of a default square tile footprint
pub const GRID_HALF_SIZE: f32 = 0.5;

/// Longest chain of escalator hand-offs followed in one `next` call
pub const MAX_ESCAPE_DEPTH: usize = 16;

// =====================================================
// Launcher arc: y = VERTEX_Y - (z - VERTEX_Z)^2
// =====================================================

/// Local z of the arc's apex (and the last generated segment)
pub const VERTEX_Z: f32 = 2.0;

/// Local height of the arc's apex
pub const VERTEX_Y: f32 = 4.0;

/// Local z distance between generated segments
pub const STATIC_STEP: f32 = 0.25;

/// Height of the launch arc at local `z`
pub fn launch_arc_y(z: f32) -> f32 {
    VERTEX_Y - (z - VERTEX_Z).powi(2)
}

/// Number of segments in a generated launch chain
pub fn launch_segment_count() -> usize {
    (VERTEX_Z / STATIC_STEP).ceil() as usize + 1
}

// =====================================================
// Camera
// =====================================================

/// Lowest absolute camera pitch (degrees) that counts as a steep view
pub const STEEP_PITCH_MIN: f32 = 35.0;

/// Highest absolute camera pitch (degrees) that counts as a steep view
pub const STEEP_PITCH_MAX: f32 = 50.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_endpoints() {
        assert!(launch_arc_y(0.0).abs() < f32::EPSILON);
        assert!((launch_arc_y(VERTEX_Z) - VERTEX_Y).abs() < f32::EPSILON);
    }

    #[test]
    fn test_segment_count() {
        assert_eq!(launch_segment_count(), 9);
    }
}
