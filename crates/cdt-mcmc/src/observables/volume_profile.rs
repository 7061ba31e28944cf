use cdt_universe::Universe;

use crate::observable::{MeasureContext, Observable};

/// Per-slice spatial volume: one (3,1)-count per slice, space separated.
pub struct VolumeProfile {
    identifier: String,
}

impl VolumeProfile {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

impl Observable for VolumeProfile {
    fn name(&self) -> &str {
        "volume_profile"
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn process(&mut self, universe: &Universe, _ctx: &mut MeasureContext<'_>) -> String {
        universe
            .slice_sizes
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
