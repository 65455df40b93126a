// src/state.rs
//
// Persistable sample state: the external field plus every particle's
// location, moment, easy axis and cell. Neighbour lists are rebuilt on load.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::SimError;
use crate::particle::ParticleState;
use crate::vec3::Vector3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub external_field: Vector3,
    pub particles: Vec<ParticleState>,
}

impl SampleRecord {
    pub fn read_json(path: &Path) -> Result<Self, SimError> {
        let file = File::open(path)?;
        let record = serde_json::from_reader(BufReader::new(file))?;
        Ok(record)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), SimError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }
}
