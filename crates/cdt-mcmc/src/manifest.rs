//! Run manifest: the reproducibility record written next to the data files.

use std::fs;
use std::path::Path;

use cdt_core::{CdtError, ErrorInfo};
use serde::{Deserialize, Serialize};

/// Couplings, schedule and final state of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    /// Inverse Newton coupling.
    pub k0: f64,
    /// Cosmological coupling as configured.
    pub k3_start: f64,
    /// Cosmological coupling after tuning.
    pub k3_final: f64,
    /// Volume-fixing strength.
    pub epsilon: f64,
    /// RNG master seed.
    pub seed: u64,
    /// Thermalization sweeps performed.
    pub thermal_sweeps: usize,
    /// Measurement sweeps performed.
    pub measure_sweeps: usize,
    /// Thousands of attempts per sweep.
    pub ksteps: usize,
    /// Move family frequencies.
    pub move_freqs: [u32; 3],
    /// Volume target (0 = unfixed).
    pub target_volume: usize,
    /// 2-d volume target (0 = no 2-d measurements).
    pub target2_volume: usize,
    /// Which volume the soft constraint acted on.
    pub volfix_switch: u32,
    /// Number of time slices.
    pub n_slices: usize,
    /// Final tetrahedron count.
    pub final_n3: usize,
    /// Final (3,1) count.
    pub final_n31: usize,
    /// Canonical hash of the final geometry.
    pub geometry_hash: String,
}

impl RunManifest {
    /// Serializes the manifest as pretty JSON at `path`.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), CdtError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            CdtError::Serde(ErrorInfo::new("manifest-encode", err.to_string()))
        })?;
        fs::write(path, json).map_err(|err| {
            CdtError::Io(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Loads a manifest written by [`RunManifest::write`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CdtError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            CdtError::Io(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&text).map_err(|err| {
            CdtError::Serde(
                ErrorInfo::new("manifest-decode", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}
