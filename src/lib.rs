// src/lib.rs

pub mod config;
pub mod effective_field;
pub mod energy;
pub mod equilibrate;
pub mod error;
pub mod initial_states;
pub mod lattice;
pub mod minimize;
pub mod neighbors;
pub mod output;
pub mod params;
pub mod particle;
pub mod quartic;
pub mod relax;
pub mod rotation;
pub mod sample;
pub mod state;
pub mod thermal;
pub mod vec3;
