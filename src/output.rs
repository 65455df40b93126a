// src/output.rs
//
// Plain-text moment dumps and the JSON run summary.
//
// Dump format, one particle per line:
//   x1 y1 z1 x2 y2 z2 x y z [cx cy cz]
// where (x1, y1, z1) and (x2, y2, z2) are the ends of an arrow of half-length
// `scale` along the moment, centred at the particle location (x, y, z).

use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::energy::EnergyBreakdown;
use crate::equilibrate::ModelReport;
use crate::params::EV_TO_J;
use crate::particle::Particle;
use crate::sample::Sample;

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    Ok(())
}

/// Write the moment dump for `particles`. Cell indices are appended when
/// `with_cells` is set and the particle has one.
pub fn write_moment_dump(
    path: &Path,
    particles: &[Particle],
    scale: f64,
    with_cells: bool,
) -> std::io::Result<()> {
    ensure_parent_dir(path)?;
    let mut w = BufWriter::new(File::create(path)?);
    for p in particles {
        let loc = p.location();
        let m = p.moment() * scale;
        let a = loc - m;
        let b = loc + m;
        write!(
            w,
            "{} {} {} {} {} {} {} {} {}",
            a.x(),
            a.y(),
            a.z(),
            b.x(),
            b.y(),
            b.z(),
            loc.x(),
            loc.y(),
            loc.z()
        )?;
        match p.cell() {
            Some([cx, cy, cz]) if with_cells => writeln!(w, " {cx} {cy} {cz}")?,
            _ => writeln!(w)?,
        }
    }
    w.flush()
}

/// Energies in eV.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EnergySummary {
    pub total: f64,
    pub anisotropy: f64,
    pub interaction: f64,
    pub zeeman: f64,
}

impl From<EnergyBreakdown> for EnergySummary {
    fn from(e: EnergyBreakdown) -> Self {
        Self {
            total: e.total() / EV_TO_J,
            anisotropy: e.anisotropy / EV_TO_J,
            interaction: e.interaction / EV_TO_J,
            zeeman: e.zeeman / EV_TO_J,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub particles: usize,
    pub field: [f64; 3],
    pub start_energy_ev: EnergySummary,
    pub end_energy_ev: EnergySummary,
    pub total_steps: usize,
    pub jumps: usize,
    pub jump_times_s: Vec<f64>,
    pub stopped_early: bool,
    pub budget_exhausted: bool,
    pub two_minimum_particles: usize,
}

impl RunSummary {
    pub fn new(sample: &Sample, report: &ModelReport) -> Self {
        Self {
            particles: sample.particles().len(),
            field: sample.external_field().to_array(),
            start_energy_ev: report.start.into(),
            end_energy_ev: report.end.into(),
            total_steps: report.total_steps,
            jumps: report.jumps,
            jump_times_s: report.jump_times_ns.iter().map(|t| t * 1e-9).collect(),
            stopped_early: report.stopped_early,
            budget_exhausted: report.budget_exhausted,
            two_minimum_particles: sample.two_minimum_particles().len(),
        }
    }

    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        ensure_parent_dir(path)?;
        let w = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(w, self).map_err(std::io::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighbors::NeighborLists;
    use crate::particle::ParticleState;
    use crate::vec3::Vector3;

    #[test]
    fn dump_lines_hold_arrow_ends_centre_and_cell() {
        let locs = [Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, 0.0)];
        let particles = vec![
            ParticleState::new(locs[0], Vector3::unit_x(), Vector3::unit_z())
                .with_cell([1, 0, 2])
                .attach_neighbors(0, NeighborLists::default(), &locs),
            ParticleState::new(locs[1], Vector3::unit_y(), Vector3::unit_z())
                .attach_neighbors(1, NeighborLists::default(), &locs),
        ];

        let dir = std::env::temp_dir().join(format!("mamca_dump_{}", std::process::id()));
        let path = dir.join("momenta.txt");
        write_moment_dump(&path, &particles, 0.5, true).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_dir_all(&dir);

        let lines: Vec<Vec<f64>> = text
            .lines()
            .map(|l| l.split_whitespace().map(|v| v.parse().unwrap()).collect())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], vec![0.5, 2.0, 3.0, 1.5, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 0.0, 2.0]);
        // no cell recorded: nine columns
        assert_eq!(lines[1].len(), 9);
        assert!((lines[1][4] - 0.5).abs() < 1e-12);
    }
}
