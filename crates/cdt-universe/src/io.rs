//! Geometry file reading and writing.
//!
//! Whitespace-separated ASCII integers: an `ordered` flag, the vertex count
//! and per-vertex slice indices (terminated by a repeat of the count), then
//! the tetrahedron count and per-tetrahedron vertex and neighbor rows
//! (again terminated by a repeat of the count). Exported files always use
//! `ordered=1`, meaning the i-th neighbor is opposite the i-th vertex.

use std::fs;
use std::path::Path;

use cdt_core::{CdtError, ErrorInfo};

use crate::simplices::{TetraId, Vertex, VertexId};
use crate::universe::Universe;

struct TokenReader<'a> {
    tokens: std::str::SplitWhitespace<'a>,
    consumed: usize,
}

impl<'a> TokenReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            tokens: text.split_whitespace(),
            consumed: 0,
        }
    }

    fn next_int(&mut self) -> Result<i64, CdtError> {
        let token = self.tokens.next().ok_or_else(|| {
            CdtError::Geometry(
                ErrorInfo::new("truncated-geometry", "geometry stream ended early")
                    .with_context("tokens_read", self.consumed.to_string()),
            )
        })?;
        self.consumed += 1;
        token.parse::<i64>().map_err(|_| {
            CdtError::Geometry(
                ErrorInfo::new("bad-token", "expected an integer")
                    .with_context("token", token.to_string())
                    .with_context("position", self.consumed.to_string()),
            )
        })
    }

    fn next_index(&mut self, bound: usize, what: &str) -> Result<usize, CdtError> {
        let value = self.next_int()?;
        if value < 0 || value as usize >= bound {
            return Err(CdtError::Geometry(
                ErrorInfo::new("index-out-of-range", format!("{what} index out of range"))
                    .with_context("index", value.to_string())
                    .with_context("bound", bound.to_string()),
            ));
        }
        Ok(value as usize)
    }
}

impl Universe {
    /// Reads a geometry file and builds the universe it describes.
    pub fn load(path: impl AsRef<Path>, strictness: u32) -> Result<Self, CdtError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            CdtError::Io(
                ErrorInfo::new("geometry-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::parse(&text, strictness)
    }

    /// Builds a universe from geometry text (see the module docs).
    pub fn parse(text: &str, strictness: u32) -> Result<Self, CdtError> {
        let mut reader = TokenReader::new(text);
        let mut universe = Universe::empty(strictness);

        let ordered = reader.next_int()? != 0;

        let n0 = reader.next_int()?;
        if n0 <= 0 {
            return Err(CdtError::Geometry(
                ErrorInfo::new("bad-vertex-count", "vertex count must be positive")
                    .with_context("n0", n0.to_string()),
            ));
        }
        let n0 = n0 as usize;

        let mut max_time = 0;
        let mut vs: Vec<VertexId> = Vec::with_capacity(n0);
        for _ in 0..n0 {
            let time = reader.next_int()?;
            if time < 0 {
                return Err(CdtError::Geometry(
                    ErrorInfo::new("bad-slice", "vertex slice index must be non-negative")
                        .with_context("time", time.to_string()),
                ));
            }
            let time = time as usize;
            let v = universe.vertices.create(Vertex::at_slice(time));
            universe.vertices_all.add(v);
            vs.push(v);
            max_time = max_time.max(time);
        }
        if reader.next_int()? != n0 as i64 {
            return Err(CdtError::Geometry(ErrorInfo::new(
                "vertex-sentinel",
                "vertex block sentinel does not match the vertex count",
            )));
        }

        universe.n_slices = max_time + 1;
        universe.slab_sizes = vec![0; universe.n_slices];
        universe.slice_sizes = vec![0; universe.n_slices];

        let n3 = reader.next_int()?;
        if n3 <= 0 {
            return Err(CdtError::Geometry(
                ErrorInfo::new("bad-tetra-count", "tetrahedron count must be positive")
                    .with_context("n3", n3.to_string()),
            ));
        }
        let n3 = n3 as usize;

        for _ in 0..n3 {
            let t = universe.create_tetra();
            let mut tvs = [vs[0]; 4];
            for slot in &mut tvs {
                *slot = vs[reader.next_index(n0, "vertex")?];
            }
            let mut tts = [TetraId::from_raw(0); 4];
            for slot in &mut tts {
                *slot = TetraId::from_raw(reader.next_index(n3, "tetrahedron")? as u32);
            }

            universe.set_vertices(t, tvs[0], tvs[1], tvs[2], tvs[3]);
            universe.set_tetras(t, tts[0], tts[1], tts[2], tts[3]);

            if universe.tetra(t).is31() {
                for &v in &tvs[0..3] {
                    universe.vertex_mut(v).tetra = Some(t);
                }
            }

            universe.tetras_all.add(t);
            let time = universe.tetra(t).time;
            universe.slab_sizes[time] += 1;
            if universe.tetra(t).is31() {
                universe.tetras31.add(t);
                universe.slice_sizes[time] += 1;
            }
        }
        if reader.next_int()? != n3 as i64 {
            return Err(CdtError::Geometry(ErrorInfo::new(
                "tetra-sentinel",
                "tetrahedron block sentinel does not match the tetrahedron count",
            )));
        }

        if !ordered {
            universe.sort_neighbors()?;
        }
        universe.recount_coordination();

        Ok(universe)
    }

    /// Reorders every tetrahedron's neighbor row so that `tnbr[i]` is the
    /// neighbor opposite `vs[i]`, by matching which neighbor is missing
    /// which vertex.
    fn sort_neighbors(&mut self) -> Result<(), CdtError> {
        let all: Vec<TetraId> = self.tetras_all.iter().collect();
        for t in all {
            let tetra = &self.tetras[t];
            let vs = tetra.vs;
            let tnbr = tetra.tnbr;
            let mut sorted = [None; 4];
            for tn in tnbr {
                for i in 0..4 {
                    if !self.tetras[tn].has_vertex(vs[i]) {
                        sorted[i] = Some(tn);
                        break;
                    }
                }
            }
            let resolve = |slot: Option<TetraId>| {
                slot.ok_or_else(|| {
                    CdtError::Geometry(
                        ErrorInfo::new(
                            "unsortable-neighbors",
                            "neighbor shares all four vertices; opposite-vertex order is ambiguous",
                        )
                        .with_context("tetra", t.to_string()),
                    )
                })
            };
            let ordered = [
                resolve(sorted[0])?,
                resolve(sorted[1])?,
                resolve(sorted[2])?,
                resolve(sorted[3])?,
            ];
            self.set_tetras(t, ordered[0], ordered[1], ordered[2], ordered[3]);
        }
        Ok(())
    }

    /// Recomputes `cnum` and `scnum` for every vertex in one scan over the
    /// live tetrahedra. On a closed spatial surface the number of incident
    /// base triangles equals the spatial edge degree.
    fn recount_coordination(&mut self) {
        let vertices: Vec<VertexId> = self.vertices_all.iter().collect();
        for &v in &vertices {
            let record = self.vertex_mut(v);
            record.cnum = 0;
            record.scnum = 0;
        }
        let tetras: Vec<TetraId> = self.tetras_all.iter().collect();
        for t in tetras {
            let tetra = &self.tetras[t];
            let vs = tetra.vs;
            let is31 = tetra.is31();
            for v in vs {
                self.vertex_mut(v).cnum += 1;
            }
            if is31 {
                for &v in &vs[0..3] {
                    self.vertex_mut(v).scnum += 1;
                }
            }
        }
    }

    /// Serializes the triangulation in the geometry file format, with live
    /// entities densely renumbered in label order.
    pub fn serialize_geometry(&self) -> String {
        let mut vertex_index = vec![0usize; self.vertices.label_bound()];
        let live_vertices: Vec<VertexId> = self.vertices.iter().collect();
        for (i, &v) in live_vertices.iter().enumerate() {
            vertex_index[v.index()] = i;
        }

        let mut tetra_index = vec![0usize; self.tetras.label_bound()];
        let live_tetras: Vec<TetraId> = self.tetras.iter().collect();
        for (i, &t) in live_tetras.iter().enumerate() {
            tetra_index[t.index()] = i;
        }

        let mut out = String::new();
        out.push_str("1\n");
        out.push_str(&format!("{}\n", live_vertices.len()));
        for &v in &live_vertices {
            out.push_str(&format!("{}\n", self.vertices[v].time));
        }
        out.push_str(&format!("{}\n", live_vertices.len()));
        out.push_str(&format!("{}\n", live_tetras.len()));
        for &t in &live_tetras {
            let tetra = &self.tetras[t];
            for v in tetra.vs {
                out.push_str(&format!("{}\n", vertex_index[v.index()]));
            }
            for tn in tetra.tnbr {
                out.push_str(&format!("{}\n", tetra_index[tn.index()]));
            }
        }
        out.push_str(&format!("{}\n", live_tetras.len()));
        out
    }

    /// Writes the geometry file at `path`.
    pub fn export_geometry(&self, path: impl AsRef<Path>) -> Result<(), CdtError> {
        let path = path.as_ref();
        fs::write(path, self.serialize_geometry()).map_err(|err| {
            CdtError::Io(
                ErrorInfo::new("geometry-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}
