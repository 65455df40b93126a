// src/params.rs

use crate::config::Settings;

/// Tolerance for floating-point comparisons.
pub const DELTA: f64 = 1e-10;

/// Bohr magneton (J/T).
pub const MU_B: f64 = 9.274_010_078_3e-24;

/// Electron-volt in joules.
pub const EV_TO_J: f64 = 1.602_176_634e-19;

/// Boltzmann constant (J/K).
pub const BOLTZMANN: f64 = 1.380_649e-23;

/// mu0 / 4pi (T·m/A) with distances measured in nanometres: 1e-7 / (1e-9)^3.
pub const DIPOLE_CONST: f64 = 1e20;

/// Seconds to nanoseconds.
pub const S_TO_NS: f64 = 1e9;

/// Relaxation stops once |E_old - E_new| / E_old falls below this.
pub const RELATIVE_ENERGY_PRECISION: f64 = 1e-6;

/// Physical constants of a sample, in SI units (energies in J, fields in T,
/// lengths in nm, times in ns).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalParams {
    pub moment_magnitude: f64, // J/T
    pub anisotropy: f64,       // J
    pub exchange: f64,         // T^2/J
    pub kt: f64,               // J
    pub viscosity: f64,        // 0..=1
    pub time_step: f64,        // ns
    pub total_time: f64,       // ns
    pub precision: usize,      // max relaxation passes
    pub dipole_distance: f64,  // nm
    pub exchange_distance: f64, // nm
}

impl PhysicalParams {
    /// Convert settings (Bohr magnetons, eV, T^2/eV, K, s) into working units.
    pub fn from_settings(s: &Settings) -> Self {
        Self {
            moment_magnitude: s.m * MU_B,
            anisotropy: s.kan * EV_TO_J,
            exchange: s.jex / EV_TO_J,
            kt: s.t * BOLTZMANN,
            viscosity: s.viscosity,
            time_step: s.time_step,
            total_time: s.time * S_TO_NS,
            precision: s.precision,
            dipole_distance: s.dipole_distance,
            exchange_distance: s.exchange_distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_conversion_from_default_settings() {
        let s = Settings::default();
        let p = PhysicalParams::from_settings(&s);
        assert!((p.moment_magnitude - s.m * MU_B).abs() < 1e-30);
        assert!((p.anisotropy / EV_TO_J - s.kan).abs() < 1e-15);
        assert!((p.total_time - s.time * 1e9).abs() < 1e-6);
        assert_eq!(p.precision, s.precision);
        assert_eq!(p.kt, 0.0);
    }
}
