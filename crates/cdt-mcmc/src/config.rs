//! Flat `key value` configuration file reader.
//!
//! One whitespace-separated key/value pair per line. Every key below is
//! required; a missing or unparsable entry aborts startup with a structured
//! error naming the offending key.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use cdt_core::{CdtError, ErrorInfo};

/// Parsed run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Inverse Newton coupling.
    pub k0: f64,
    /// Cosmological coupling; starting point for the tuner.
    pub k3: f64,
    /// Spatial topology genus; only genus 0 (the 2-sphere) is simulated.
    pub genus: u32,
    /// Soft-fixed volume target (0 disables volume fixing).
    pub target_volume: usize,
    /// Spatial slice volume triggering 2-d measurements (0 disables them).
    pub target2_volume: usize,
    /// 0 fixes the (3,1)-count, 1 fixes the full tetrahedron count.
    pub volfix_switch: u32,
    /// Volume-fixing strength.
    pub epsilon: f64,
    /// RNG master seed.
    pub seed: u64,
    /// Directory receiving observable data files and the run manifest.
    pub output_dir: String,
    /// Identifier suffixed to every output file of this run.
    pub file_id: String,
    /// Thermalization sweeps.
    pub thermal_sweeps: usize,
    /// Measurement sweeps.
    pub measure_sweeps: usize,
    /// Thousands of move attempts per sweep.
    pub ksteps: usize,
    /// Manifold strictness level.
    pub strictness: u32,
    /// Relative frequencies of (add/delete, flip, shift/ishift) attempts.
    pub move_freqs: [u32; 3],
    /// Input geometry path.
    pub infile: String,
    /// Output geometry path for periodic exports.
    pub outfile: String,
}

fn missing(key: &str) -> CdtError {
    CdtError::Config(
        ErrorInfo::new("missing-key", "required configuration key is absent")
            .with_context("key", key.to_string()),
    )
}

fn unparsable(key: &str, value: &str) -> CdtError {
    CdtError::Config(
        ErrorInfo::new("bad-value", "configuration value failed to parse")
            .with_context("key", key.to_string())
            .with_context("value", value.to_string()),
    )
}

struct Dict(HashMap<String, String>);

impl Dict {
    fn get(&self, key: &str) -> Result<&str, CdtError> {
        self.0.get(key).map(String::as_str).ok_or_else(|| missing(key))
    }

    fn parse<T: std::str::FromStr>(&self, key: &str) -> Result<T, CdtError> {
        let value = self.get(key)?;
        value.parse().map_err(|_| unparsable(key, value))
    }
}

impl Config {
    /// Reads and parses the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CdtError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            CdtError::Io(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::parse(&text)
    }

    /// Parses configuration text (see the module docs).
    pub fn parse(text: &str) -> Result<Self, CdtError> {
        let mut dict = HashMap::new();
        let mut tokens = text.split_whitespace();
        while let Some(key) = tokens.next() {
            let value = tokens.next().ok_or_else(|| {
                CdtError::Config(
                    ErrorInfo::new("dangling-key", "configuration key has no value")
                        .with_context("key", key.to_string()),
                )
            })?;
            dict.insert(key.to_string(), value.to_string());
        }
        let dict = Dict(dict);

        Ok(Self {
            k0: dict.parse("k0")?,
            k3: dict.parse("k3")?,
            genus: dict.parse("genus")?,
            target_volume: dict.parse("targetvolume")?,
            target2_volume: dict.parse("target2volume")?,
            volfix_switch: dict.parse("volfixswitch")?,
            epsilon: dict.parse("epsilon")?,
            seed: dict.parse("seed")?,
            output_dir: dict.get("outputdir")?.to_string(),
            file_id: dict.get("fileid")?.to_string(),
            thermal_sweeps: dict.parse("thermalsweeps")?,
            measure_sweeps: dict.parse("measuresweeps")?,
            ksteps: dict.parse("ksteps")?,
            strictness: dict.parse("strictness")?,
            move_freqs: [
                dict.parse("v1")?,
                dict.parse("v2")?,
                dict.parse("v3")?,
            ],
            infile: dict.get("infile")?.to_string(),
            outfile: dict.get("outfile")?.to_string(),
        })
    }
}
