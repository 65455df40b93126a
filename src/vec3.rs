// src/vec3.rs
//
// Vector3 keeps cartesian (x, y, z) and spherical (r, theta, phi) forms side by side.
// Both are recomputed together on every construction or in-place update, so the
// cached spherical angles never drift from the cartesian components.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::params::DELTA;

/// 3D vector dot product.
#[inline]
pub fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// 3D vector cross product: a × b.
#[inline]
pub fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < DELTA
}

/// Vector with cached spherical coordinates.
///
/// `theta` is the polar angle from +z, `phi` the azimuth from +x. The zero vector
/// has `theta = phi = 0` (`atan2(0, 0) = 0`), which is a valid degenerate direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vector3 {
    x: f64,
    y: f64,
    z: f64,
    r: f64,
    theta: f64,
    phi: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        let r = (x * x + y * y + z * z).sqrt();
        let theta = (x * x + y * y).sqrt().atan2(z);
        let phi = y.atan2(x);
        Self {
            x,
            y,
            z,
            r,
            theta,
            phi,
        }
    }

    /// Build from spherical coordinates (r, theta, phi).
    pub fn from_spherical(r: f64, theta: f64, phi: f64) -> Self {
        let sin_theta = theta.sin();
        Self {
            x: r * sin_theta * phi.cos(),
            y: r * sin_theta * phi.sin(),
            z: r * theta.cos(),
            r,
            theta,
            phi,
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn unit_x() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    pub fn unit_y() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    pub fn unit_z() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Length of the vector.
    #[inline]
    pub fn norm(&self) -> f64 {
        self.r
    }

    #[inline]
    pub fn theta(&self) -> f64 {
        self.theta
    }

    #[inline]
    pub fn phi(&self) -> f64 {
        self.phi
    }

    #[inline]
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn dot(&self, other: &Vector3) -> f64 {
        dot(self.to_array(), other.to_array())
    }

    #[inline]
    pub fn cross(&self, other: &Vector3) -> Vector3 {
        cross(self.to_array(), other.to_array()).into()
    }

    /// Rescale to unit length in place, keeping the cached direction angles.
    ///
    /// The zero vector becomes (0, 0, 1).
    pub fn normalize(&mut self) {
        *self = Self::from_spherical(1.0, self.theta, self.phi);
    }

    /// Unit vector along `self`, without mutating it.
    pub fn direction(&self) -> Vector3 {
        let mut v = *self;
        v.normalize();
        v
    }

    /// Signed angle of `self` measured from `other`, in the plane with normal `normal`.
    ///
    /// The in-plane basis is `e_x = other / |other|`, `e_y = normal × e_x` (normalised),
    /// and the result is `atan2(self · e_y, self · e_x)` in (-pi, pi].
    pub fn angle_to_in_plane(&self, other: &Vector3, normal: &Vector3) -> f64 {
        let e_x = other.direction();
        let e_y = normal.cross(&e_x).direction();
        self.dot(&e_y).atan2(self.dot(&e_x))
    }

    /// Unsigned angle between `self` and `other`, in [0, pi].
    pub fn angle_to(&self, other: &Vector3) -> f64 {
        let c = self.direction().dot(&other.direction());
        c.clamp(-1.0, 1.0).acos()
    }

    /// True when `|self × other|` vanishes relative to the magnitudes involved.
    pub fn is_collinear(&self, other: &Vector3) -> bool {
        let scale = self.r * other.r;
        if scale == 0.0 {
            return true;
        }
        self.cross(other).norm() < DELTA * scale
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

/// Approximate equality: all six cached components agree within `DELTA`.
impl PartialEq for Vector3 {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x)
            && approx_eq(self.y, other.y)
            && approx_eq(self.z, other.z)
            && approx_eq(self.r, other.r)
            && approx_eq(self.theta, other.theta)
            && approx_eq(self.phi, other.phi)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2e}, {:.2e}, {:.2e})", self.x, self.y, self.z)
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;
    fn mul(self, c: f64) -> Vector3 {
        Vector3::new(self.x * c, self.y * c, self.z * c)
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;
    fn mul(self, v: Vector3) -> Vector3 {
        v * self
    }
}

impl Div<f64> for Vector3 {
    type Output = Vector3;
    fn div(self, c: f64) -> Vector3 {
        Vector3::new(self.x / c, self.y / c, self.z / c)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Vector3) {
        *self = *self - rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn cartesian_round_trip_through_spherical() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let x = rng.gen_range(-10.0..10.0);
            let y = rng.gen_range(-10.0..10.0);
            let z = rng.gen_range(-10.0..10.0);
            let v = Vector3::new(x, y, z);
            let back = Vector3::from_spherical(v.norm(), v.theta(), v.phi());
            assert!(
                (back.x() - x).abs() < DELTA * 10.0
                    && (back.y() - y).abs() < DELTA * 10.0
                    && (back.z() - z).abs() < DELTA * 10.0,
                "round trip drifted: {:?} -> {:?}",
                v,
                back
            );
        }
    }

    #[test]
    fn spherical_matches_closed_form() {
        let (r, theta, phi) = (2.5, 0.7, -1.9);
        let v = Vector3::from_spherical(r, theta, phi);
        assert!(approx_eq(v.x(), r * theta.sin() * phi.cos()));
        assert!(approx_eq(v.y(), r * theta.sin() * phi.sin()));
        assert!(approx_eq(v.z(), r * theta.cos()));
    }

    #[test]
    fn zero_vector_is_a_valid_direction() {
        let v = Vector3::zero();
        assert_eq!(v.theta(), 0.0);
        assert_eq!(v.phi(), 0.0);
        assert_eq!(v.direction(), Vector3::unit_z());
    }

    #[test]
    fn normalize_in_place_keeps_direction() {
        let mut v = Vector3::new(0.0, 3.0, -4.0);
        v.normalize();
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert!((v - Vector3::new(0.0, 0.6, -0.8)).norm() < 1e-12);
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        let z = Vector3::unit_x().cross(&Vector3::unit_y());
        assert_eq!(z, Vector3::unit_z());
        assert!(Vector3::unit_x().is_collinear(&Vector3::new(-3.0, 0.0, 0.0)));
        assert!(!Vector3::unit_x().is_collinear(&Vector3::new(1.0, 1e-3, 0.0)));
    }

    #[test]
    fn in_plane_angle_is_signed() {
        let normal = Vector3::unit_z();
        let a = Vector3::unit_y().angle_to_in_plane(&Vector3::unit_x(), &normal);
        assert!((a - FRAC_PI_2).abs() < DELTA);
        let b = Vector3::new(0.0, -2.0, 0.0).angle_to_in_plane(&Vector3::unit_x(), &normal);
        assert!((b + FRAC_PI_2).abs() < DELTA);
        let c = Vector3::new(-1.0, 0.0, 0.0).angle_to_in_plane(&Vector3::unit_x(), &normal);
        assert!((c.abs() - PI).abs() < DELTA);
    }

    #[test]
    fn unsigned_angle_uses_unit_vectors() {
        let a = Vector3::new(3.0, 0.0, 0.0).angle_to(&Vector3::new(0.0, 0.0, 0.5));
        assert!((a - FRAC_PI_2).abs() < DELTA);
    }

    #[test]
    fn serde_uses_plain_arrays() {
        let v = Vector3::new(1.0, -2.0, 0.5);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[1.0,-2.0,0.5]");
        let back: Vector3 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
