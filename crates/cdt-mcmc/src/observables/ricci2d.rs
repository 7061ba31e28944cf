use cdt_universe::{Universe, VertexId};
use rand::Rng;

use crate::observable::{sphere2d, MeasureContext, Observable};

/// Coarse Ollivier-style curvature proxy on spatial slices: the average
/// link distance between an ε-sphere and the ε-sphere of one of its
/// members, normalized by ε, for ε = 1..=eps_max.
pub struct Ricci2d {
    identifier: String,
    eps_max: usize,
}

impl Ricci2d {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            eps_max: 10,
        }
    }
}

impl Observable for Ricci2d {
    fn name(&self) -> &str {
        "ricci2d"
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn process(&mut self, universe: &Universe, ctx: &mut MeasureContext<'_>) -> String {
        let mut origins = Vec::with_capacity(self.eps_max);
        for _ in 0..self.eps_max {
            let origin = loop {
                let v = universe.vertices_all.pick(ctx.rng);
                if universe.slice_sizes[universe.vertex(v).time] == ctx.target2_volume {
                    break v;
                }
            };
            origins.push(origin);
        }

        let mut distances = Vec::with_capacity(self.eps_max);
        for (i, &origin) in origins.iter().enumerate() {
            let epsilon = i + 1;
            distances.push(average_sphere_distance(universe, ctx, origin, epsilon));
        }

        distances
            .iter()
            .map(|d| format!("{d:.6}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Average distance from the ε-sphere of `p1` to the ε-sphere of a random
/// member of it, in units of ε.
fn average_sphere_distance(
    universe: &Universe,
    ctx: &mut MeasureContext<'_>,
    p1: VertexId,
    epsilon: usize,
) -> f64 {
    let mut s1 = sphere2d(universe, ctx.scratch, p1, epsilon);
    if s1.is_empty() {
        return 0.0;
    }
    let p2 = s1[ctx.rng.gen_range(0..s1.len())];
    let mut s2 = sphere2d(universe, ctx.scratch, p2, epsilon);
    if s2.is_empty() {
        return 0.0;
    }
    if s2.len() < s1.len() {
        std::mem::swap(&mut s1, &mut s2);
    }

    let bound = universe.vertex_label_bound();
    let mut visited = vec![false; bound];
    let mut is_target = vec![false; bound];
    let mut distance_sum = 0usize;
    let mut pair_count = 0usize;

    for &b in &s1 {
        visited.iter_mut().for_each(|flag| *flag = false);
        is_target.iter_mut().for_each(|flag| *flag = false);
        for &v in &s2 {
            is_target[v.index()] = true;
        }
        let mut countdown = s2.len();

        let mut this_depth = vec![b];
        let mut next_depth: Vec<VertexId> = Vec::new();
        visited[b.index()] = true;

        for depth in 0..(3 * epsilon + 1) {
            for &v in &this_depth {
                if depth == 0 && is_target[v.index()] {
                    // b itself lies on the target sphere.
                    is_target[v.index()] = false;
                    countdown -= 1;
                    pair_count += 1;
                }
                for &neighbor in &universe.vertex_neighbors[v.index()] {
                    if universe.vertex(neighbor).time != universe.vertex(v).time {
                        continue;
                    }
                    if !visited[neighbor.index()] {
                        visited[neighbor.index()] = true;
                        next_depth.push(neighbor);
                        if is_target[neighbor.index()] {
                            is_target[neighbor.index()] = false;
                            countdown -= 1;
                            distance_sum += depth + 1;
                            pair_count += 1;
                        }
                    }
                    if countdown == 0 {
                        break;
                    }
                }
                if countdown == 0 {
                    break;
                }
            }
            std::mem::swap(&mut this_depth, &mut next_depth);
            next_depth.clear();
            if countdown == 0 {
                break;
            }
        }
        assert_eq!(countdown, 0, "target sphere out of reach at 3ε+1");
    }

    distance_sum as f64 / (epsilon * pair_count) as f64
}
