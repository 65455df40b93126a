// src/config.rs
//
// Run settings, read from / written to JSON. Every key is optional in the file;
// missing keys fall back to `Settings::default()`.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::error::SimError;
use crate::initial_states::DirectionMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // lattice: cells along x, y, z and particles per ring
    pub x: usize,
    pub y: usize,
    pub z: usize,
    pub n: usize,

    pub r: f64,      // particle radius [nm]
    pub d: f64,      // ring diameter [nm]
    pub offset: f64, // gap between cells [nm]

    pub m: f64,   // moment [Bohr magnetons]
    pub kan: f64, // anisotropy constant [eV]
    pub jex: f64, // exchange constant [T^2/eV]

    pub dipole_distance: f64,   // [nm]
    pub exchange_distance: f64, // [nm]

    /// Fraction of the gap to the minimum closed per pass, 0 <= viscosity <= 1.
    pub viscosity: f64,
    /// Temperature [K]; thermal jumps are only attempted when > 0.
    pub t: f64,

    /// Initial moments: 0 random 3D, 1 random in the xy-plane, 2 fixed.
    pub moment_mode: u8,
    pub moment_theta: f64, // [deg]
    pub moment_phi: f64,   // [deg]

    /// Anisotropy axes: 0 random 3D, 1 random in the xy-plane, 2 fixed.
    pub axis_mode: u8,
    pub axis_theta: f64, // [deg]
    pub axis_phi: f64,   // [deg]

    pub b_x: f64, // [T]
    pub b_y: f64,
    pub b_z: f64,

    pub time: f64,      // simulated time [s]
    pub time_step: f64, // jump attempt interval [ns]

    /// Maximum number of relaxation passes.
    pub precision: usize,

    pub load: bool,
    pub json_path: PathBuf,
    pub hysteresis: bool,

    pub parallel: bool,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            x: 1,
            y: 1,
            z: 1,
            n: 50,

            r: 1.5,
            d: 60.0,
            offset: 4.0,

            m: 800.0,
            kan: 0.0165,
            jex: 5.0,

            dipole_distance: 30.0,
            exchange_distance: 4.0,

            viscosity: 0.9,
            t: 0.0,

            moment_mode: 0,
            moment_theta: 90.0,
            moment_phi: 0.0,

            axis_mode: 2,
            axis_theta: 90.0,
            axis_phi: 0.0,

            b_x: 0.0,
            b_y: 0.0,
            b_z: 0.0,

            time: 1.0e-6,
            time_step: 100.0,

            precision: 7,

            load: false,
            json_path: PathBuf::from("out/sample.json"),
            hysteresis: false,

            parallel: false,
            seed: None,
        }
    }
}

impl Settings {
    pub fn from_json_file(path: &Path) -> Result<Self, SimError> {
        let file = File::open(path)?;
        let settings = serde_json::from_reader(BufReader::new(file))?;
        Ok(settings)
    }

    pub fn write_json_file(&self, path: &Path) -> Result<(), SimError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn field(&self) -> [f64; 3] {
        [self.b_x, self.b_y, self.b_z]
    }

    pub fn moment_direction_mode(&self) -> Result<DirectionMode, SimError> {
        DirectionMode::from_code(self.moment_mode, self.moment_theta, self.moment_phi)
    }

    pub fn axis_direction_mode(&self) -> Result<DirectionMode, SimError> {
        DirectionMode::from_code(self.axis_mode, self.axis_theta, self.axis_phi)
    }

    /// Reject settings the model cannot run with.
    pub fn validate(&self) -> Result<(), SimError> {
        let fail = |msg: String| Err(SimError::InvalidSettings(msg));

        if self.x == 0 || self.y == 0 || self.z == 0 || self.n == 0 {
            return fail(format!(
                "lattice dimensions must be positive, got x={} y={} z={} n={}",
                self.x, self.y, self.z, self.n
            ));
        }
        if self.n > 1 && !(self.d > 0.0) {
            return fail(format!(
                "ring diameter must be positive with {} particles per ring, got {}",
                self.n, self.d
            ));
        }
        if !(0.0..=1.0).contains(&self.viscosity) {
            return fail(format!("viscosity must lie in [0, 1], got {}", self.viscosity));
        }
        if self.precision == 0 {
            return fail("precision must be at least 1".to_string());
        }
        if self.t < 0.0 {
            return fail(format!("temperature must be non-negative, got {}", self.t));
        }
        if self.t > 0.0 && !(self.time_step > 0.0) {
            return fail(format!(
                "time_step must be positive when t > 0, got {}",
                self.time_step
            ));
        }
        if self.dipole_distance < 0.0 || self.exchange_distance < 0.0 {
            return fail("interaction distances must be non-negative".to_string());
        }
        if self.m <= 0.0 {
            return fail(format!("moment must be positive, got {}", self.m));
        }
        self.moment_direction_mode()?;
        self.axis_direction_mode()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn missing_keys_use_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "n": 4, "b_z": 0.25 }"#).unwrap();
        assert_eq!(s.n, 4);
        assert_eq!(s.b_z, 0.25);
        assert_eq!(s.precision, Settings::default().precision);
    }

    #[test]
    fn unknown_axis_mode_is_rejected() {
        let s = Settings {
            axis_mode: 3,
            ..Settings::default()
        };
        assert!(matches!(s.validate(), Err(SimError::InvalidSettings(_))));
    }

    #[test]
    fn collapsed_ring_is_rejected() {
        let s = Settings {
            n: 4,
            d: 0.0,
            ..Settings::default()
        };
        assert!(matches!(s.validate(), Err(SimError::InvalidSettings(_))));
        // a single particle per ring has no diameter to speak of
        let single = Settings { n: 1, ..s };
        assert!(single.validate().is_ok());
    }

    #[test]
    fn viscosity_out_of_range_is_rejected() {
        let s = Settings {
            viscosity: 1.5,
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn json_file_round_trip() {
        let dir = std::env::temp_dir().join("mamca_config_test");
        let path = dir.join("settings.json");
        let s = Settings {
            n: 12,
            seed: Some(3),
            ..Settings::default()
        };
        s.write_json_file(&path).unwrap();
        let back = Settings::from_json_file(&path).unwrap();
        assert_eq!(s, back);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
