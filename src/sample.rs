// src/sample.rs
//
// A sample owns every particle, the external field and the run constants.
//
// One optimisation pass is Jacobi-style:
//   1) every particle rotates toward its minimum using its own frozen B_eff
//   2) every B_eff is rebuilt from a snapshot of the updated moments
// so no particle ever sees a neighbour's in-pass update. Both fan-outs may run on
// rayon; the two-minimum set is filled afterwards on the calling thread.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::energy::EnergyBreakdown;
use crate::error::SimError;
use crate::lattice::RingLattice;
use crate::minimize::Optimization;
use crate::neighbors::{build_neighbor_lists, first_coincident_pair};
use crate::params::PhysicalParams;
use crate::particle::{Particle, ParticleState};
use crate::quartic::{BracketingSolver, QuarticSolver};
use crate::state::SampleRecord;
use crate::vec3::Vector3;

pub struct Sample {
    pub(crate) external_field: Vector3,
    pub(crate) particles: Vec<Particle>,
    pub(crate) params: PhysicalParams,
    pub(crate) parallel: bool,
    /// Indices of particles that ended the last pass between two minima.
    pub(crate) two_minimum: BTreeSet<usize>,
    pub(crate) jump_count: usize,
    pub(crate) rng: StdRng,
    pub(crate) solver: Box<dyn QuarticSolver>,
}

fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Two particles at one point would make the dipole sum divide by zero.
fn check_distinct_locations(locations: &[Vector3]) -> Result<(), SimError> {
    match first_coincident_pair(locations) {
        Some((i, j)) => Err(SimError::InvalidSettings(format!(
            "particles {i} and {j} share the location {}",
            locations[i]
        ))),
        None => Ok(()),
    }
}

impl Sample {
    /// Place particles on the ring lattice with initial moments and axes drawn
    /// from the configured modes, then wire up neighbours.
    pub fn from_settings(settings: &Settings) -> Result<Self, SimError> {
        settings.validate()?;
        let moment_mode = settings.moment_direction_mode()?;
        let axis_mode = settings.axis_direction_mode()?;
        let lattice = RingLattice::from_settings(settings);
        let mut rng = rng_from_seed(settings.seed);

        let states: Vec<ParticleState> = lattice
            .sites()
            .map(|(cell, loc)| {
                let moment = moment_mode.sample(&mut rng);
                let axis = axis_mode.sample(&mut rng);
                ParticleState::new(loc, moment, axis).with_cell(cell)
            })
            .collect();

        let locations: Vec<Vector3> = states.iter().map(|s| s.location).collect();
        check_distinct_locations(&locations)?;

        if lattice.ring_particles_overlap(settings.r) {
            warn!(
                n = settings.n,
                r = settings.r,
                d = settings.d,
                "boundaries of ring particles overlap"
            );
        }
        if lattice.rings_overlap(settings.r) {
            warn!(r = settings.r, offset = settings.offset, "rings overlap");
        }

        info!(
            particles = states.len(),
            cells = lattice.n_cells(),
            "sample generated"
        );

        Ok(Self::from_states(
            states,
            Vector3::from(settings.field()),
            PhysicalParams::from_settings(settings),
            settings.parallel,
            rng,
        ))
    }

    /// Rebuild a sample from persisted state. Constants, the parallel switch and
    /// the seed come from `settings`; the field stays the one stored in the
    /// record (see [`Sample::load_or_generate`] for the resume path, which
    /// replaces it with the field from `settings`).
    pub fn from_record(record: SampleRecord, settings: &Settings) -> Result<Self, SimError> {
        settings.validate()?;
        let locations: Vec<Vector3> = record.particles.iter().map(|s| s.location).collect();
        check_distinct_locations(&locations)?;
        Ok(Self::from_states(
            record.particles,
            record.external_field,
            PhysicalParams::from_settings(settings),
            settings.parallel,
            rng_from_seed(settings.seed),
        ))
    }

    /// With `settings.load` set, resume from `settings.json_path` (a missing or
    /// unreadable file is an error) and apply the field of the current step from
    /// `settings`. Otherwise generate a fresh sample.
    pub fn load_or_generate(settings: &Settings) -> Result<Self, SimError> {
        if !settings.load {
            return Self::from_settings(settings);
        }
        info!(path = %settings.json_path.display(), "resuming sample");
        let record = SampleRecord::read_json(&settings.json_path)?;
        let mut sample = Self::from_record(record, settings)?;
        sample.set_external_field(Vector3::from(settings.field()));
        Ok(sample)
    }

    /// Seal `states` with neighbour lists built from the cutoffs in `params`.
    pub fn from_states(
        states: Vec<ParticleState>,
        external_field: Vector3,
        params: PhysicalParams,
        parallel: bool,
        rng: StdRng,
    ) -> Self {
        let locations: Vec<Vector3> = states.iter().map(|s| s.location).collect();
        let lists = build_neighbor_lists(
            &locations,
            params.dipole_distance,
            params.exchange_distance,
        );
        let particles = states
            .into_iter()
            .zip(lists)
            .enumerate()
            .map(|(id, (state, nb))| state.attach_neighbors(id, nb, &locations))
            .collect();

        Self {
            external_field,
            particles,
            params,
            parallel,
            two_minimum: BTreeSet::new(),
            jump_count: 0,
            rng,
            solver: Box::new(BracketingSolver::default()),
        }
    }

    /// Replace the root finder.
    pub fn with_solver(mut self, solver: Box<dyn QuarticSolver>) -> Self {
        self.solver = solver;
        self
    }

    pub fn to_record(&self) -> SampleRecord {
        SampleRecord {
            external_field: self.external_field,
            particles: self.particles.iter().map(Particle::state).collect(),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn params(&self) -> &PhysicalParams {
        &self.params
    }

    pub fn external_field(&self) -> Vector3 {
        self.external_field
    }

    /// Change the background field; effective fields are rebuilt by the next relax.
    pub fn set_external_field(&mut self, b: Vector3) {
        self.external_field = b;
    }

    pub fn two_minimum_particles(&self) -> &BTreeSet<usize> {
        &self.two_minimum
    }

    pub fn jump_count(&self) -> usize {
        self.jump_count
    }

    pub fn moments(&self) -> Vec<Vector3> {
        self.particles.iter().map(|p| p.moment).collect()
    }

    /// Rebuild every B_eff from a snapshot of the current moments.
    pub fn compute_effective_fields(&mut self) {
        let moments = self.moments();
        let b_ext = self.external_field;
        let params = &self.params;
        if self.parallel {
            self.particles
                .par_iter_mut()
                .for_each(|p| p.compute_effective_field(b_ext, &moments, params));
        } else {
            self.particles
                .iter_mut()
                .for_each(|p| p.compute_effective_field(b_ext, &moments, params));
        }
    }

    /// Sum of particle energies in the current effective fields (J).
    pub fn total_energy(&self) -> f64 {
        self.particles
            .iter()
            .map(|p| p.compute_energy(&self.params))
            .sum()
    }

    pub fn energies(&self) -> EnergyBreakdown {
        self.particles
            .iter()
            .map(|p| p.compute_energies(&self.params))
            .sum()
    }

    /// One optimisation pass over all particles. `previous` is the energy the
    /// last pass ended with; returns `(old, new)` total energies.
    ///
    /// The first particle error aborts the pass.
    pub fn optimize_pass(&mut self, previous: Option<f64>) -> Result<(f64, f64), SimError> {
        self.two_minimum.clear();
        let old = match previous {
            Some(e) => e,
            None => self.total_energy(),
        };

        let params = self.params;
        let solver: &dyn QuarticSolver = self.solver.as_ref();
        let outcomes: Vec<Optimization> = if self.parallel {
            self.particles
                .par_iter_mut()
                .map(|p| p.optimize_energy(&params, solver))
                .collect::<Result<Vec<_>, SimError>>()?
        } else {
            self.particles
                .iter_mut()
                .map(|p| p.optimize_energy(&params, solver))
                .collect::<Result<Vec<_>, SimError>>()?
        };

        self.two_minimum.extend(
            outcomes
                .iter()
                .enumerate()
                .filter(|(_, o)| o.two_minima)
                .map(|(i, _)| i),
        );

        self.compute_effective_fields();
        let new = self.total_energy();
        debug!(
            old,
            new,
            two_minima = self.two_minimum.len(),
            "optimisation pass"
        );
        Ok((old, new))
    }
}
