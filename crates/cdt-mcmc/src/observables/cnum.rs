use cdt_universe::Universe;

use crate::observable::{MeasureContext, Observable};

const BINS: usize = 750;

/// Histogram of spatial coordination numbers over the vertices of slices
/// matching the 2-d target volume.
pub struct CnumHistogram {
    identifier: String,
}

impl CnumHistogram {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

impl Observable for CnumHistogram {
    fn name(&self) -> &str {
        "cnum"
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn process(&mut self, universe: &Universe, ctx: &mut MeasureContext<'_>) -> String {
        let mut histogram = [0usize; BINS];
        for &v in &universe.vertex_list {
            let vertex = universe.vertex(v);
            if universe.slice_sizes[vertex.time] != ctx.target2_volume {
                continue;
            }
            let bin = vertex.scnum as usize;
            if bin >= BINS {
                println!("coordination overflow: scnum {}", vertex.scnum);
                continue;
            }
            histogram[bin] += 1;
        }
        histogram
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
