// src/initial_states.rs
//
// Direction generators for initial moments and anisotropy axes.
//
// Conventions:
// - All generated directions are unit vectors.
// - Angles in settings are given in degrees; theta is measured from +z, phi from +x.

use rand::Rng;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::SimError;
use crate::vec3::Vector3;

/// How a direction is chosen for each particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DirectionMode {
    /// Uniform on the sphere.
    Random3D,
    /// Uniform on the equator (xy-plane).
    Random2D,
    /// The same direction for every particle (radians).
    Fixed { theta: f64, phi: f64 },
}

impl DirectionMode {
    /// Decode a settings mode code (0, 1, 2); `theta_deg`/`phi_deg` are used by `Fixed`.
    pub fn from_code(code: u8, theta_deg: f64, phi_deg: f64) -> Result<Self, SimError> {
        match code {
            0 => Ok(Self::Random3D),
            1 => Ok(Self::Random2D),
            2 => Ok(Self::Fixed {
                theta: theta_deg.to_radians(),
                phi: phi_deg.to_radians(),
            }),
            other => Err(SimError::InvalidSettings(format!(
                "direction mode must be 0 (random 3D), 1 (random 2D) or 2 (fixed), got {other}"
            ))),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector3 {
        match *self {
            Self::Random3D => Vector3::from_spherical(1.0, random_theta(rng), random_phi(rng)),
            Self::Random2D => Vector3::from_spherical(1.0, FRAC_PI_2, random_phi(rng)),
            Self::Fixed { theta, phi } => Vector3::from_spherical(1.0, theta, phi),
        }
    }
}

/// Polar angle of a direction uniform on the sphere (inverse-cosine sampling).
pub fn random_theta<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (2.0 * rng.gen::<f64>() - 1.0).acos()
}

pub fn random_phi<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    2.0 * PI * rng.gen::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_3d_is_isotropic_on_average() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = 20_000;
        let mut sum = Vector3::zero();
        let mut upper = 0usize;
        for _ in 0..n {
            let v = DirectionMode::Random3D.sample(&mut rng);
            assert!((v.norm() - 1.0).abs() < 1e-12);
            if v.z() > 0.5 {
                upper += 1;
            }
            sum += v;
        }
        // |mean| ~ 1/sqrt(n); cap z > 0.5 holds a quarter of the sphere area.
        assert!((sum / n as f64).norm() < 0.03);
        let frac = upper as f64 / n as f64;
        assert!((frac - 0.25).abs() < 0.02, "cap fraction {frac}");
    }

    #[test]
    fn random_2d_stays_in_plane() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let v = DirectionMode::Random2D.sample(&mut rng);
            assert!(v.z().abs() < 1e-12);
        }
    }

    #[test]
    fn fixed_mode_uses_degrees() {
        let mode = DirectionMode::from_code(2, 90.0, 90.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(mode.sample(&mut rng), Vector3::unit_y());
    }

    #[test]
    fn unknown_code_is_invalid_settings() {
        assert!(matches!(
            DirectionMode::from_code(7, 0.0, 0.0),
            Err(SimError::InvalidSettings(_))
        ));
    }
}
