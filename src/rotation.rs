// src/rotation.rs
//
// 3×3 rotation matrices: Rodrigues' formula about an arbitrary axis, plus the
// closed-form rotations about the three basis axes.

use std::fmt;
use std::ops::Mul;

use crate::vec3::{approx_eq, Vector3};

/// One of the three canonical basis axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vector3 {
        match self {
            Axis::X => Vector3::unit_x(),
            Axis::Y => Vector3::unit_y(),
            Axis::Z => Vector3::unit_z(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RotationMatrix {
    m: [[f64; 3]; 3],
}

impl RotationMatrix {
    /// Wrap arbitrary rows (not checked for orthogonality).
    pub fn from_rows(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    pub fn identity() -> Self {
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Rotation by `theta` about `axis` (Rodrigues):
    ///   R = I cosθ + (1 - cosθ) v vᵀ + sinθ [v]×
    ///
    /// `axis` is normalised here if it is not already unit length.
    pub fn about(axis: &Vector3, theta: f64) -> Self {
        let v = if approx_eq(axis.norm(), 1.0) {
            *axis
        } else {
            axis.direction()
        };
        let (x, y, z) = (v.x(), v.y(), v.z());
        let c = theta.cos();
        let s = theta.sin();
        let t = 1.0 - c;
        Self::from_rows([
            [c + t * x * x, t * x * y - s * z, t * x * z + s * y],
            [t * y * x + s * z, c + t * y * y, t * y * z - s * x],
            [t * z * x - s * y, t * z * y + s * x, c + t * z * z],
        ])
    }

    /// Rotation by `theta` about a basis axis.
    pub fn about_basis(axis: Axis, theta: f64) -> Self {
        let c = theta.cos();
        let s = theta.sin();
        let m = match axis {
            Axis::X => [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]],
            Axis::Y => [[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]],
            Axis::Z => [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]],
        };
        Self::from_rows(m)
    }

    #[inline]
    pub fn rows(&self) -> &[[f64; 3]; 3] {
        &self.m
    }

    /// Rotated copy of `v`.
    pub fn apply(&self, v: &Vector3) -> Vector3 {
        let a = v.to_array();
        let row = |i: usize| self.m[i][0] * a[0] + self.m[i][1] * a[1] + self.m[i][2] * a[2];
        Vector3::new(row(0), row(1), row(2))
    }
}

impl Mul<Vector3> for RotationMatrix {
    type Output = Vector3;
    fn mul(self, v: Vector3) -> Vector3 {
        self.apply(&v)
    }
}

impl PartialEq for RotationMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| approx_eq(*a, *b))
    }
}

impl fmt::Display for RotationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.m.iter().enumerate() {
            write!(f, "({}, {}, {})", row[0], row[1], row[2])?;
            if i != 2 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn thetas() -> [f64; 6] {
        [0.0, 1.0, FRAC_PI_2, PI, 2.0 * PI, FRAC_PI_4]
    }

    #[test]
    fn matrix_times_vector() {
        let m = RotationMatrix::from_rows([[4.0, 5.0, 6.0], [7.0, 8.0, 9.0], [10.0, 11.0, 12.0]]);
        let res = m * Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(res, Vector3::new(32.0, 50.0, 68.0));
    }

    #[test]
    fn rodrigues_agrees_with_basis_rotations() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            for theta in thetas() {
                let expected = RotationMatrix::about_basis(axis, theta);
                let general = RotationMatrix::about(&axis.unit(), theta);
                assert_eq!(
                    expected, general,
                    "axis {:?}, theta {}:\n{}\nvs\n{}",
                    axis, theta, expected, general
                );
            }
        }
    }

    #[test]
    fn axis_is_normalised_internally() {
        let a = RotationMatrix::about(&Vector3::new(0.0, 0.0, 5.0), 0.3);
        assert_eq!(a, RotationMatrix::about_basis(Axis::Z, 0.3));
    }

    #[test]
    fn quarter_turn_about_z_maps_x_to_y() {
        let r = RotationMatrix::about(&Vector3::unit_z(), FRAC_PI_2);
        assert_eq!(r.apply(&Vector3::unit_x()), Vector3::unit_y());
        assert_eq!(RotationMatrix::about(&Vector3::unit_z(), 0.0), RotationMatrix::identity());
    }

    #[test]
    fn rotation_preserves_length_about_oblique_axis() {
        let r = RotationMatrix::about(&Vector3::new(1.0, -2.0, 0.5), 1.234);
        let v = Vector3::new(0.3, 0.4, -1.2);
        let w = r.apply(&v);
        assert!((w.norm() - v.norm()).abs() < 1e-12);
    }
}
