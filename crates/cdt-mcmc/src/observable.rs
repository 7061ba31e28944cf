//! Observable capability set, file sink and the shared BFS toolbox.
//!
//! An observable turns the universe into one output line per measurement;
//! the framework appends it to `<data_dir>/<name>-<identifier>.dat`. The
//! BFS helpers operate on the derived connectivity, so they must only be
//! called between a geometry refresh and the next mutating move.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use cdt_core::{CdtError, ErrorInfo, RngHandle};
use cdt_universe::{TetraId, TriangleId, Universe, VertexId};

/// Engine-owned state lent to observables during a measurement.
pub struct MeasureContext<'a> {
    /// The run's single RNG stream.
    pub rng: &'a mut RngHandle,
    /// Shared BFS scratch buffer.
    pub scratch: &'a mut BfsScratch,
    /// Slice volume that 2-d observables filter on.
    pub target2_volume: usize,
}

/// A measurable quantity of the triangulation.
pub trait Observable {
    /// Observable name; first component of the output file name.
    fn name(&self) -> &str;

    /// Run identifier; second component of the output file name.
    fn identifier(&self) -> &str;

    /// Computes one measurement line. Runs against the latest derived
    /// geometry, read-only.
    fn process(&mut self, universe: &Universe, ctx: &mut MeasureContext<'_>) -> String;

    /// Resets per-observable state at the start of a run.
    fn reset(&mut self) {}
}

fn output_path(data_dir: &str, observable: &dyn Observable) -> PathBuf {
    Path::new(data_dir).join(format!(
        "{}-{}.dat",
        observable.name(),
        observable.identifier()
    ))
}

/// Processes the observable and appends its line to the data file.
pub fn measure(
    observable: &mut dyn Observable,
    universe: &Universe,
    ctx: &mut MeasureContext<'_>,
    data_dir: &str,
) -> Result<(), CdtError> {
    let line = observable.process(universe, ctx);
    let path = output_path(data_dir, observable);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|err| {
            CdtError::Io(
                ErrorInfo::new("observable-open", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
    writeln!(file, "{line}").map_err(|err| {
        CdtError::Io(
            ErrorInfo::new("observable-write", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })
}

/// Ensures the data file exists and resets the observable's state. The file
/// is never truncated; output accumulates across runs with the same
/// identifier.
pub fn clear(observable: &mut dyn Observable, data_dir: &str) -> Result<(), CdtError> {
    let path = output_path(data_dir, observable);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|err| {
            CdtError::Io(
                ErrorInfo::new("observable-create", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
    observable.reset();
    Ok(())
}

/// Process-wide boolean scratch for the BFS helpers, resized on demand.
///
/// Every helper restores the entries it touched before returning, so the
/// buffer is all-false between calls and may be shared across entity types.
#[derive(Debug, Default)]
pub struct BfsScratch {
    done: Vec<bool>,
}

impl BfsScratch {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self, bound: usize) {
        if self.done.len() < bound {
            self.done.resize(bound, false);
        }
    }

    #[cfg(test)]
    fn is_clean(&self) -> bool {
        self.done.iter().all(|&flag| !flag)
    }
}

/// Vertices at link distance exactly `radius` from `origin`.
pub fn sphere(
    universe: &Universe,
    scratch: &mut BfsScratch,
    origin: VertexId,
    radius: usize,
) -> Vec<VertexId> {
    scratch.ensure(universe.vertex_neighbors.len());
    let done = &mut scratch.done;

    let mut this_depth = vec![origin];
    let mut next_depth: Vec<VertexId> = Vec::new();
    let mut flipped = vec![origin];
    let mut shell: Vec<VertexId> = Vec::new();
    done[origin.index()] = true;

    for depth in 0..radius {
        for &v in &this_depth {
            for &neighbor in &universe.vertex_neighbors[v.index()] {
                if !done[neighbor.index()] {
                    done[neighbor.index()] = true;
                    flipped.push(neighbor);
                    next_depth.push(neighbor);
                    if depth == radius - 1 {
                        shell.push(neighbor);
                    }
                }
            }
        }
        std::mem::swap(&mut this_depth, &mut next_depth);
        next_depth.clear();
    }

    for v in flipped {
        done[v.index()] = false;
    }
    shell
}

/// Vertices at link distance exactly `radius` from `origin`, restricted to
/// the origin's slice.
pub fn sphere2d(
    universe: &Universe,
    scratch: &mut BfsScratch,
    origin: VertexId,
    radius: usize,
) -> Vec<VertexId> {
    scratch.ensure(universe.vertex_neighbors.len());
    let time = universe.vertex(origin).time;
    let done = &mut scratch.done;

    let mut this_depth = vec![origin];
    let mut next_depth: Vec<VertexId> = Vec::new();
    let mut flipped = vec![origin];
    let mut shell: Vec<VertexId> = Vec::new();
    done[origin.index()] = true;

    for depth in 0..radius {
        for &v in &this_depth {
            for &neighbor in &universe.vertex_neighbors[v.index()] {
                if universe.vertex(neighbor).time != time {
                    continue;
                }
                if !done[neighbor.index()] {
                    done[neighbor.index()] = true;
                    flipped.push(neighbor);
                    next_depth.push(neighbor);
                    if depth == radius - 1 {
                        shell.push(neighbor);
                    }
                }
            }
        }
        std::mem::swap(&mut this_depth, &mut next_depth);
        next_depth.clear();
    }

    for v in flipped {
        done[v.index()] = false;
    }
    shell
}

/// Tetrahedra at dual distance exactly `radius` from `origin`.
pub fn sphere_dual(
    universe: &Universe,
    scratch: &mut BfsScratch,
    origin: TetraId,
    radius: usize,
) -> Vec<TetraId> {
    scratch.ensure(universe.tetra_label_bound());
    let done = &mut scratch.done;

    let mut this_depth = vec![origin];
    let mut next_depth: Vec<TetraId> = Vec::new();
    let mut flipped = vec![origin];
    let mut shell: Vec<TetraId> = Vec::new();
    done[origin.index()] = true;

    for depth in 0..radius {
        for &t in &this_depth {
            for &neighbor in &universe.tetra(t).tnbr {
                if !done[neighbor.index()] {
                    done[neighbor.index()] = true;
                    flipped.push(neighbor);
                    next_depth.push(neighbor);
                    if depth == radius - 1 {
                        shell.push(neighbor);
                    }
                }
            }
        }
        std::mem::swap(&mut this_depth, &mut next_depth);
        next_depth.clear();
    }

    for t in flipped {
        done[t.index()] = false;
    }
    shell
}

/// Triangles at distance exactly `radius` from `origin` in the dual graph
/// of its slice.
pub fn sphere2d_dual(
    universe: &Universe,
    scratch: &mut BfsScratch,
    origin: TriangleId,
    radius: usize,
) -> Vec<TriangleId> {
    scratch.ensure(universe.triangle_label_bound());
    let done = &mut scratch.done;

    let mut this_depth = vec![origin];
    let mut next_depth: Vec<TriangleId> = Vec::new();
    let mut flipped = vec![origin];
    let mut shell: Vec<TriangleId> = Vec::new();
    done[origin.index()] = true;

    for depth in 0..radius {
        for &tr in &this_depth {
            for &neighbor in &universe.triangle(tr).trnbr {
                if !done[neighbor.index()] {
                    done[neighbor.index()] = true;
                    flipped.push(neighbor);
                    next_depth.push(neighbor);
                    if depth == radius - 1 {
                        shell.push(neighbor);
                    }
                }
            }
        }
        std::mem::swap(&mut this_depth, &mut next_depth);
        next_depth.clear();
    }

    for tr in flipped {
        done[tr.index()] = false;
    }
    shell
}

/// Link distance between two vertices.
pub fn vertex_distance(
    universe: &Universe,
    scratch: &mut BfsScratch,
    v1: VertexId,
    v2: VertexId,
) -> usize {
    if v1 == v2 {
        return 0;
    }
    scratch.ensure(universe.vertex_neighbors.len());
    let done = &mut scratch.done;

    let mut this_depth = vec![v1];
    let mut next_depth: Vec<VertexId> = Vec::new();
    let mut flipped = vec![v1];
    done[v1.index()] = true;

    let mut depth = 0;
    let mut found = None;
    'search: while !this_depth.is_empty() {
        depth += 1;
        for &v in &this_depth {
            for &neighbor in &universe.vertex_neighbors[v.index()] {
                if !done[neighbor.index()] {
                    done[neighbor.index()] = true;
                    flipped.push(neighbor);
                    next_depth.push(neighbor);
                    if neighbor == v2 {
                        found = Some(depth);
                        break 'search;
                    }
                }
            }
        }
        std::mem::swap(&mut this_depth, &mut next_depth);
        next_depth.clear();
    }

    for v in flipped {
        done[v.index()] = false;
    }
    found.unwrap_or_else(|| panic!("vertices {v1} and {v2} are not connected"))
}

/// Dual-graph distance between two tetrahedra.
pub fn dual_distance(
    universe: &Universe,
    scratch: &mut BfsScratch,
    t1: TetraId,
    t2: TetraId,
) -> usize {
    if t1 == t2 {
        return 0;
    }
    scratch.ensure(universe.tetra_label_bound());
    let done = &mut scratch.done;

    let mut this_depth = vec![t1];
    let mut next_depth: Vec<TetraId> = Vec::new();
    let mut flipped = vec![t1];
    done[t1.index()] = true;

    let mut depth = 0;
    let mut found = None;
    'search: while !this_depth.is_empty() {
        depth += 1;
        for &t in &this_depth {
            for &neighbor in &universe.tetra(t).tnbr {
                if !done[neighbor.index()] {
                    done[neighbor.index()] = true;
                    flipped.push(neighbor);
                    next_depth.push(neighbor);
                    if neighbor == t2 {
                        found = Some(depth);
                        break 'search;
                    }
                }
            }
        }
        std::mem::swap(&mut this_depth, &mut next_depth);
        next_depth.clear();
    }

    for t in flipped {
        done[t.index()] = false;
    }
    found.unwrap_or_else(|| panic!("tetrahedra {t1} and {t2} are not connected"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = include_str!("../../cdt-universe/tests/data/minimal_s1s2.dat");

    fn prepared_universe() -> Universe {
        let mut universe = Universe::parse(MINIMAL, 0).expect("fixture parses");
        universe.update_geometry();
        universe
    }

    #[test]
    fn sphere_radius_one_matches_neighbor_list() {
        let universe = prepared_universe();
        let mut scratch = BfsScratch::new();
        let v = universe.all_vertices()[0];

        let mut shell = sphere(&universe, &mut scratch, v, 1);
        shell.sort_unstable();
        let mut expected = universe.vertex_neighbors[v.index()].clone();
        expected.sort_unstable();
        assert_eq!(shell, expected);
        assert!(scratch.is_clean());
    }

    #[test]
    fn sphere2d_stays_in_slice() {
        let universe = prepared_universe();
        let mut scratch = BfsScratch::new();
        let v = universe.all_vertices()[0];
        let time = universe.vertex(v).time;

        // On a three-vertex slice the radius-1 shell is the other two.
        let shell = sphere2d(&universe, &mut scratch, v, 1);
        assert_eq!(shell.len(), 2);
        for w in shell {
            assert_eq!(universe.vertex(w).time, time);
        }
        assert!(scratch.is_clean());
    }

    #[test]
    fn dual_sphere_radius_one_has_four_tetras() {
        let universe = prepared_universe();
        let mut scratch = BfsScratch::new();
        let t = universe.all_31()[0];
        let shell = sphere_dual(&universe, &mut scratch, t, 1);
        assert_eq!(shell.len(), 4);
        assert!(scratch.is_clean());
    }

    #[test]
    fn sphere2d_dual_walks_the_pillow() {
        let universe = prepared_universe();
        let mut scratch = BfsScratch::new();
        let tr = universe.triangle_list[0];
        // Two triangles per slice; the other one is the full radius-1 shell.
        let shell = sphere2d_dual(&universe, &mut scratch, tr, 1);
        assert_eq!(shell.len(), 1);
        assert_eq!(
            universe.triangle(shell[0]).time,
            universe.triangle(tr).time
        );
    }

    #[test]
    fn distances_are_symmetric() {
        let universe = prepared_universe();
        let mut scratch = BfsScratch::new();
        let vs = universe.all_vertices();
        for &a in &vs {
            for &b in &vs {
                let d = vertex_distance(&universe, &mut scratch, a, b);
                let r = vertex_distance(&universe, &mut scratch, b, a);
                assert_eq!(d, r);
                assert_eq!(d == 0, a == b);
            }
        }
        assert!(scratch.is_clean());
    }
}
