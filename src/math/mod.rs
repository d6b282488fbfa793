//! Vector math for the rotating world.
//!
//! Three coordinate frames are in play:
//! 1. World position - what gets rendered, after the world rotation.
//! 2. Absolute position - the position as if there were no rotation. Used by
//!    things that are not attached to the world (falling balls, launch arcs).
//! 3. Screen position - the world position as seen on screen (z negligible).
//!
//! Every conversion takes the current camera angle `(x-rotation, y-rotation)`
//! in degrees and comes in an inverse pair:
//! `absolute_to_world` / `world_to_absolute` and
//! `world_to_screen` / `screen_to_world`.

pub mod angle_range;

pub use angle_range::AngleRange;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Mul, Neg, Sub};

use crate::constants::{EPSILON, PI, UP};
use crate::error::{PathError, PathResult};

pub fn to_rad(deg: f32) -> f32 {
    deg / 180.0 * PI
}

pub fn to_deg(rad: f32) -> f32 {
    rad / PI * 180.0
}

/// Camera angle -> rotation taking absolute space into the world
fn world_rotation(rot: Vector3) -> Quat {
    Quat::from_rotation_y(to_rad(rot.y)) * Quat::from_rotation_x(to_rad(rot.x))
}

/// Camera angle -> rotation taking screen space into the world
fn screen_rotation(rot: Vector3) -> Quat {
    Quat::from_rotation_x(to_rad(rot.x)) * Quat::from_rotation_y(to_rad(rot.y))
}

/// Three floats: a point, a direction, or a camera angle.
///
/// For camera angles `x` is the pitch, `y` the yaw, and `z` is unused.
/// Equality is approximate: two vectors are equal when every component
/// differs by less than `EPSILON`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector3(pub Vec3);

impl Vector3 {
    pub const ZERO: Vector3 = Vector3(Vec3::ZERO);
    pub const UNIT_Z: Vector3 = Vector3(Vec3::Z);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// Euclidean length
    pub fn length(&self) -> f32 {
        self.0.length()
    }

    pub fn dot(&self, other: &Vector3) -> f32 {
        self.0.dot(other.0)
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector
    pub fn normalize(&self) -> Option<Vector3> {
        self.0.try_normalize().map(Vector3)
    }

    /// Angle with up (+y) in degrees, on [0, 180]
    pub fn scalar_angle_with_up(&self) -> f32 {
        to_deg(self.0.angle_between(UP))
    }

    /// The x and y rotations (degrees) that take `<0, 0, 1>` onto this
    /// direction. Inverse of [`Vector3::angle_to_real`].
    pub fn angle_xy(&self) -> Vector3 {
        let flat = Vec2::new(self.x, self.z).length();
        Vector3::new(
            to_deg(self.y.atan2(flat)),
            to_deg(self.x.atan2(self.z)),
            0.0,
        )
    }

    /// Treats this vector as a camera angle and returns the unit direction
    /// from the world toward the camera. Positive pitch puts the camera above.
    pub fn angle_to_real(&self) -> Vector3 {
        let tilt = Quat::from_rotation_y(to_rad(self.y)) * Quat::from_rotation_x(-to_rad(self.x));
        Vector3(tilt * Vec3::Z)
    }

    /// Rotation about the x axis by `deg` degrees
    pub fn rotate_about_x(&self, deg: f32) -> Vector3 {
        Vector3(Quat::from_rotation_x(to_rad(deg)) * self.0)
    }

    /// Rotation about the y axis by `deg` degrees; `<0, 0, 1>` turns toward +x
    pub fn rotate_about_y(&self, deg: f32) -> Vector3 {
        Vector3(Quat::from_rotation_y(to_rad(deg)) * self.0)
    }

    /// Absolute position -> world position
    pub fn absolute_to_world(&self, rot: Vector3) -> Vector3 {
        Vector3(world_rotation(rot) * self.0)
    }

    /// World position -> absolute position
    pub fn world_to_absolute(&self, rot: Vector3) -> Vector3 {
        Vector3(world_rotation(rot).inverse() * self.0)
    }

    /// World position -> screen position
    pub fn world_to_screen(&self, rot: Vector3) -> Vector3 {
        Vector3(screen_rotation(rot).inverse() * self.0)
    }

    /// Screen position -> world position
    pub fn screen_to_world(&self, rot: Vector3) -> Vector3 {
        Vector3(screen_rotation(rot) * self.0)
    }

    pub fn negate(&self) -> Vector3 {
        -*self
    }

    pub fn dist(&self, other: &Vector3) -> f32 {
        self.0.distance(other.0)
    }

    /// Distance to `<0, 1, 0>`; shortcut for IK solvers
    pub fn dist_with_up(&self) -> f32 {
        self.0.distance(UP)
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl Deref for Vector3 {
    type Target = Vec3;

    fn deref(&self) -> &Vec3 {
        &self.0
    }
}

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Vector3(v)
    }
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Self) -> bool {
        (self.0 - other.0).abs().cmplt(Vec3::splat(EPSILON)).all()
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3(self.0 + rhs.0)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        self.0 += rhs.0;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3(self.0 - rhs.0)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;

    fn mul(self, f: f32) -> Vector3 {
        Vector3(self.0 * f)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3(-self.0)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.x, self.y, self.z)
    }
}

/// Angle (degrees) between `length1` and `length2` that makes the third side
/// of the triangle exactly `distance` long.
pub fn ik_angle(length1: f32, length2: f32, distance: f32) -> PathResult<f32> {
    let invalid = || PathError::InvalidTriangle {
        l1: length1,
        l2: length2,
        distance,
    };
    if !(length1.is_finite() && length2.is_finite() && distance.is_finite()) {
        return Err(invalid());
    }
    if length1 <= 0.0 || length2 <= 0.0 || distance < 0.0 {
        return Err(invalid());
    }
    if distance > length1 + length2 || distance < (length1 - length2).abs() {
        return Err(invalid());
    }
    let cos = (length1 * length1 + length2 * length2 - distance * distance)
        / (2.0 * length1 * length2);
    Ok(to_deg(cos.clamp(-1.0, 1.0).acos()))
}

/// Segment intersection in the x/y plane (z is ignored). Touching endpoints
/// count; parallel and collinear segments do not.
pub fn line_seg_intersect(a1: Vector3, a2: Vector3, b1: Vector3, b2: Vector3) -> bool {
    let denom = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denom == 0.0 {
        return false;
    }
    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denom;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denom;
    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// Whether `p` lies on segment `a`-`b` in the x/y plane, within `tolerance`
pub fn point_on_segment(p: Vector3, a: Vector3, b: Vector3, tolerance: f32) -> bool {
    let ab = Vector3::new(b.x - a.x, b.y - a.y, 0.0);
    let ap = Vector3::new(p.x - a.x, p.y - a.y, 0.0);
    let len_sq = ab.dot(&ab);
    if len_sq < f32::EPSILON {
        return ap.length() <= tolerance;
    }
    let t = (ap.dot(&ab) / len_sq).clamp(0.0, 1.0);
    (ap - ab * t).length() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_length_and_dist() {
        let v = Vector3::new(3.0, 4.0, 0.0);
        assert!(close(v.length(), 5.0));
        assert!(close(v.dist(&Vector3::ZERO), 5.0));
        assert!(close(Vector3::new(0.0, 1.0, 0.0).dist_with_up(), 0.0));
        assert!(close(Vector3::new(0.0, 3.0, 0.0).dist_with_up(), 2.0));
    }

    #[test]
    fn test_approximate_equality() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(a, Vector3::new(1.04, 1.96, 3.0));
        assert_ne!(a, Vector3::new(1.06, 2.0, 3.0));
        assert_ne!(a, Vector3::new(1.0, 2.0, 2.9));
    }

    #[test]
    fn test_operators() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(0.5, -1.0, 2.0);
        assert_eq!(a + b, Vector3::new(1.5, 1.0, 5.0));
        assert_eq!(a - b, Vector3::new(0.5, 3.0, 1.0));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(a.negate(), Vector3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn test_angle_with_up() {
        assert!(close(Vector3::new(0.0, 2.0, 0.0).scalar_angle_with_up(), 0.0));
        assert!(close(Vector3::new(1.0, 0.0, 0.0).scalar_angle_with_up(), 90.0));
        assert!(close(Vector3::new(0.0, -1.0, 0.0).scalar_angle_with_up(), 180.0));
        assert!(close(Vector3::new(1.0, 1.0, 0.0).scalar_angle_with_up(), 45.0));
    }

    #[test]
    fn test_angle_xy_matches_angle_to_real() {
        let dir = Vector3::new(1.0, 1.0, 1.0);
        let angle = dir.angle_xy();
        assert!(close(angle.y, 45.0));
        assert!(close(angle.x, 35.264));
        let back = angle.angle_to_real();
        assert_eq!(back, dir.normalize().unwrap());
    }

    #[test]
    fn test_angle_xy_of_unit_z_is_zero() {
        assert_eq!(Vector3::UNIT_Z.angle_xy(), Vector3::ZERO);
    }

    #[test]
    fn test_camera_above_points_up() {
        let real = Vector3::new(40.0, 0.0, 0.0).angle_to_real();
        assert!(real.y > 0.0, "positive pitch should look down from above");
        let real = Vector3::new(-40.0, 0.0, 0.0).angle_to_real();
        assert!(real.y < 0.0);
    }

    #[test]
    fn test_rotate_about_y_turns_z_toward_x() {
        let r = Vector3::UNIT_Z.rotate_about_y(90.0);
        assert_eq!(r, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotation_pairs_are_inverse() {
        let p = Vector3::new(1.5, -2.0, 0.75);
        let rot = Vector3::new(30.0, 120.0, 0.0);
        assert_eq!(p.world_to_absolute(rot).absolute_to_world(rot), p);
        assert_eq!(p.absolute_to_world(rot).world_to_absolute(rot), p);
        assert_eq!(p.screen_to_world(rot).world_to_screen(rot), p);
        assert_eq!(p.world_to_screen(rot).screen_to_world(rot), p);
    }

    #[test]
    fn test_world_rotation_is_yaw_after_pitch() {
        let p = Vector3::new(0.25, -1.0, 2.0);
        let rot = Vector3::new(35.0, -70.0, 0.0);
        let yxz = Quat::from_euler(glam::EulerRot::YXZ, to_rad(rot.y), to_rad(rot.x), 0.0);
        assert_eq!(p.absolute_to_world(rot), Vector3(yxz * p.0));
        assert_eq!(
            p.absolute_to_world(rot),
            p.rotate_about_x(rot.x).rotate_about_y(rot.y)
        );
        assert_eq!(
            p.world_to_screen(rot),
            p.rotate_about_x(-rot.x).rotate_about_y(-rot.y)
        );
    }

    #[test]
    fn test_serializes_as_plain_triple() {
        let json = serde_json::to_string(&Vector3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0]");
        let back: Vector3 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let p = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(p.absolute_to_world(Vector3::ZERO), p);
        assert_eq!(p.world_to_screen(Vector3::ZERO), p);
    }

    #[test]
    fn test_normalize_zero() {
        assert!(Vector3::ZERO.normalize().is_none());
    }

    #[test]
    fn test_ik_angle_right_triangle() {
        let angle = ik_angle(3.0, 4.0, 5.0).unwrap();
        assert!(close(angle, 90.0));
    }

    #[test]
    fn test_ik_angle_straight_and_folded() {
        assert!(close(ik_angle(1.0, 1.0, 2.0).unwrap(), 180.0));
        assert!(close(ik_angle(2.0, 1.0, 1.0).unwrap(), 0.0));
    }

    #[test]
    fn test_ik_angle_invalid_triangle() {
        let err = ik_angle(1.0, 1.0, 3.0).unwrap_err();
        assert!(matches!(err, PathError::InvalidTriangle { .. }));
        assert!(ik_angle(5.0, 1.0, 1.0).is_err());
        assert!(ik_angle(0.0, 1.0, 1.0).is_err());
        assert!(ik_angle(f32::NAN, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_line_seg_intersect_crossing() {
        let a1 = Vector3::new(0.0, 0.0, 0.0);
        let a2 = Vector3::new(2.0, 2.0, 0.0);
        let b1 = Vector3::new(0.0, 2.0, 0.0);
        let b2 = Vector3::new(2.0, 0.0, 0.0);
        assert!(line_seg_intersect(a1, a2, b1, b2));
    }

    #[test]
    fn test_line_seg_intersect_misses() {
        let a1 = Vector3::new(0.0, 0.0, 0.0);
        let a2 = Vector3::new(1.0, 0.0, 0.0);
        let b1 = Vector3::new(2.0, -1.0, 0.0);
        let b2 = Vector3::new(2.0, 1.0, 0.0);
        assert!(!line_seg_intersect(a1, a2, b1, b2));
        // parallel
        let b1 = Vector3::new(0.0, 1.0, 0.0);
        let b2 = Vector3::new(1.0, 1.0, 0.0);
        assert!(!line_seg_intersect(a1, a2, b1, b2));
    }

    #[test]
    fn test_point_on_segment() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(2.0, 0.0, 0.0);
        assert!(point_on_segment(Vector3::new(1.0, 0.0, 0.0), a, b, 1e-3));
        assert!(!point_on_segment(Vector3::new(1.0, 0.5, 0.0), a, b, 1e-3));
        assert!(!point_on_segment(Vector3::new(3.0, 0.0, 0.0), a, b, 1e-3));
    }
}
