use cdt_universe::Universe;

use crate::observable::{sphere2d, MeasureContext, Observable};

const MAX_RADIUS: usize = 30;

/// Sphere-volume profile on a spatial slice: for each radius up to
/// [`MAX_RADIUS`], the size of a 2-d sphere around a freshly sampled vertex
/// of a slice matching the 2-d target volume.
pub struct Hausdorff2d {
    identifier: String,
}

impl Hausdorff2d {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

impl Observable for Hausdorff2d {
    fn name(&self) -> &str {
        "hausdorff2d"
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn process(&mut self, universe: &Universe, ctx: &mut MeasureContext<'_>) -> String {
        let mut profile = vec![0usize; MAX_RADIUS];
        for radius in 1..=MAX_RADIUS {
            let origin = loop {
                let v = universe.vertices_all.pick(ctx.rng);
                if universe.slice_sizes[universe.vertex(v).time] == ctx.target2_volume {
                    break v;
                }
            };
            profile[radius - 1] = sphere2d(universe, ctx.scratch, origin, radius).len();
        }
        profile
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
