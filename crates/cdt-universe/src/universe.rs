//! The global triangulation state.

use cdt_core::{Bag, Pool};

use crate::simplices::{
    HalfEdge, HalfEdgeId, Tetra, TetraId, TetraKind, Triangle, TriangleId, Vertex, VertexId,
};

/// Pool capacities; labels are array subscripts, so these bound the label
/// range for a whole run and must cover the largest target volume.
pub const VERTEX_CAPACITY: usize = 3_000_000;
pub const TETRA_CAPACITY: usize = 5_000_000;
pub const HALF_EDGE_CAPACITY: usize = 5_000_000;
pub const TRIANGLE_CAPACITY: usize = 1_000_000;

/// Causally sliced triangulation of S¹×S²: entity pools, sampling bags,
/// slab/slice bookkeeping and the derived per-slice connectivity.
///
/// Vertices and tetrahedra are long-lived and maintained incrementally by
/// the moves. Half-edges and triangles are rebuilt from scratch by
/// [`Universe::update_geometry`] and are only valid until the next move.
#[derive(Debug, Clone)]
pub struct Universe {
    pub(crate) vertices: Pool<Vertex>,
    pub(crate) tetras: Pool<Tetra>,
    pub(crate) half_edges: Pool<HalfEdge>,
    pub(crate) triangles: Pool<Triangle>,

    /// All live tetrahedra.
    pub tetras_all: Bag<Tetra>,
    /// Live (3,1)-tetrahedra only; seed set for most moves.
    pub tetras31: Bag<Tetra>,
    /// All live vertices.
    pub vertices_all: Bag<Vertex>,

    /// Number of discrete time slices.
    pub n_slices: usize,
    /// `slab_sizes[t]`: tetrahedra whose lower slice is `t`.
    pub slab_sizes: Vec<usize>,
    /// `slice_sizes[t]`: (3,1)-tetrahedra with base in slice `t`, which is
    /// also the number of spatial triangles of slice `t`.
    pub slice_sizes: Vec<usize>,

    /// Manifold strictness level gating the moves (see the move docs).
    pub strictness: u32,

    /// Live vertex labels, refreshed by [`Universe::update_vertex_data`].
    pub vertex_list: Vec<VertexId>,
    /// Live half-edge labels, refreshed by [`Universe::update_half_edge_data`].
    pub half_edge_list: Vec<HalfEdgeId>,
    /// Live triangle labels, refreshed by [`Universe::update_triangle_data`].
    pub triangle_list: Vec<TriangleId>,
    /// `vertex_neighbors[v.index()]`: all vertices sharing a tetrahedron
    /// with `v`, refreshed by [`Universe::update_vertex_data`].
    pub vertex_neighbors: Vec<Vec<VertexId>>,
}

impl Universe {
    pub(crate) fn empty(strictness: u32) -> Self {
        Self {
            vertices: Pool::with_capacity(VERTEX_CAPACITY),
            tetras: Pool::with_capacity(TETRA_CAPACITY),
            half_edges: Pool::with_capacity(HALF_EDGE_CAPACITY),
            triangles: Pool::with_capacity(TRIANGLE_CAPACITY),
            tetras_all: Bag::with_capacity(TETRA_CAPACITY),
            tetras31: Bag::with_capacity(TETRA_CAPACITY),
            vertices_all: Bag::with_capacity(VERTEX_CAPACITY),
            n_slices: 0,
            slab_sizes: Vec::new(),
            slice_sizes: Vec::new(),
            strictness,
            vertex_list: Vec::new(),
            half_edge_list: Vec::new(),
            triangle_list: Vec::new(),
            vertex_neighbors: Vec::new(),
        }
    }

    /// Shared view of a vertex record.
    pub fn vertex(&self, v: VertexId) -> &Vertex {
        &self.vertices[v]
    }

    pub(crate) fn vertex_mut(&mut self, v: VertexId) -> &mut Vertex {
        &mut self.vertices[v]
    }

    /// Shared view of a tetrahedron record.
    pub fn tetra(&self, t: TetraId) -> &Tetra {
        &self.tetras[t]
    }

    pub(crate) fn tetra_mut(&mut self, t: TetraId) -> &mut Tetra {
        &mut self.tetras[t]
    }

    /// Shared view of a triangle record.
    pub fn triangle(&self, tr: TriangleId) -> &Triangle {
        &self.triangles[tr]
    }

    /// Shared view of a half-edge record.
    pub fn half_edge(&self, h: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[h]
    }

    /// Number of live vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of live tetrahedra.
    pub fn tetra_count(&self) -> usize {
        self.tetras.len()
    }

    /// Exclusive upper bound on raw tetrahedron labels; sizes label-indexed
    /// side tables.
    pub fn tetra_label_bound(&self) -> usize {
        self.tetras.label_bound()
    }

    /// Exclusive upper bound on raw vertex labels.
    pub fn vertex_label_bound(&self) -> usize {
        self.vertices.label_bound()
    }

    /// Exclusive upper bound on raw triangle labels.
    pub fn triangle_label_bound(&self) -> usize {
        self.triangles.label_bound()
    }

    /// Witness (3,1)-tetrahedron of `v`.
    pub fn witness(&self, v: VertexId) -> TetraId {
        self.vertices[v]
            .tetra
            .unwrap_or_else(|| panic!("vertex {v} has no witness tetrahedron"))
    }

    /// The vertex of `tetra_opposite(t, v)` that lies opposite the shared
    /// face, i.e. the one not on the face of `t` facing `v`.
    pub fn vertex_opposite(&self, t: TetraId, v: VertexId) -> VertexId {
        let tetra = &self.tetras[t];
        let tn = tetra.tetra_opposite(v);
        let mut face = [v; 3];
        let mut i = 0;
        for &tv in &tetra.vs {
            if tv != v {
                face[i] = tv;
                i += 1;
            }
        }
        debug_assert_eq!(i, 3);
        for &tnv in &self.tetras[tn].vs {
            if !face.contains(&tnv) {
                return tnv;
            }
        }
        panic!("neighbor of {t} opposite {v} shares all four vertices");
    }

    /// Returns whether `v` and `w` are connected by an edge, by walking the
    /// tetrahedra containing `v` from its witness.
    pub fn neighbors_vertex(&self, v: VertexId, w: VertexId) -> bool {
        if v == w {
            return false;
        }
        let mut done: Vec<TetraId> = Vec::new();
        let mut current = vec![self.witness(v)];
        let mut next = Vec::new();
        while !current.is_empty() {
            for &tc in &current {
                for &tcn in &self.tetras[tc].tnbr {
                    if !self.tetras[tcn].has_vertex(v) {
                        continue;
                    }
                    if !done.contains(&tcn) {
                        if self.tetras[tcn].has_vertex(w) {
                            return true;
                        }
                        done.push(tcn);
                        next.push(tcn);
                    }
                }
            }
            std::mem::swap(&mut current, &mut next);
            next.clear();
        }
        false
    }

    /// Assigns vertices to a tetrahedron slot, deriving its kind and slab
    /// time from the vertex slices.
    pub(crate) fn set_vertices(
        &mut self,
        t: TetraId,
        v0: VertexId,
        v1: VertexId,
        v2: VertexId,
        v3: VertexId,
    ) {
        let t0 = self.vertices[v0].time;
        let t1 = self.vertices[v1].time;
        let t2 = self.vertices[v2].time;
        let t3 = self.vertices[v3].time;
        assert_ne!(t0, t3, "tetrahedron must span two slices");

        let kind = if t0 == t1 && t0 == t2 {
            TetraKind::ThreeOne
        } else if t1 == t2 && t1 == t3 {
            TetraKind::OneThree
        } else if t0 == t1 && t2 == t3 {
            TetraKind::TwoTwo
        } else {
            panic!("vertex times {t0},{t1},{t2},{t3} match no tetrahedron kind");
        };

        let tetra = &mut self.tetras[t];
        tetra.kind = kind;
        tetra.time = t0;
        tetra.vs = [v0, v1, v2, v3];
    }

    pub(crate) fn set_tetras(
        &mut self,
        t: TetraId,
        n0: TetraId,
        n1: TetraId,
        n2: TetraId,
        n3: TetraId,
    ) {
        self.tetras[t].tnbr = [n0, n1, n2, n3];
    }

    /// Allocates an unlinked tetrahedron slot; the caller must assign
    /// vertices and neighbors before the record is read.
    pub(crate) fn create_tetra(&mut self) -> TetraId {
        let nil = TetraId::from_raw(u32::MAX);
        let vnil = VertexId::from_raw(u32::MAX);
        self.tetras.create(Tetra {
            kind: TetraKind::TwoTwo,
            time: 0,
            vs: [vnil; 4],
            tnbr: [nil; 4],
            hes: [None; 3],
        })
    }
}
