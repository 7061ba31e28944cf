//! Metropolis driver for the CDT sampler.
//!
//! [`Simulation`] owns the universe, the single RNG stream and the
//! registered observables, and runs the thermalization/measurement
//! schedule. The [`observable`] module provides the measurement capability
//! set and the BFS toolbox shared by all observables.

pub mod config;
pub mod manifest;
pub mod observable;
pub mod observables;
pub mod simulation;

pub use config::Config;
pub use manifest::RunManifest;
pub use observable::{BfsScratch, MeasureContext, Observable};
pub use simulation::{Simulation, SweepCounts};
