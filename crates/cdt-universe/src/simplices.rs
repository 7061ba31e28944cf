//! Pool-resident entity records of the causal triangulation.
//!
//! All cross-references are labels into the owning pools; there is no owning
//! pointer graph. Ordering conventions:
//!
//! - (3,1): `vs[0..2]` is the lower base triangle in cyclic order, `vs[3]`
//!   the upper apex. `tnbr[i]` is the neighbor opposite `vs[i]`; `tnbr[3]`
//!   is the (1,3) mirror sharing the base.
//! - (1,3): `vs[0]` is the lower apex, `vs[1..3]` the upper base; `tnbr[0]`
//!   is the (3,1) sharing the base.
//! - (2,2): `vs[0..1]` lower pair, `vs[2..3]` upper pair.

use cdt_core::Label;

/// Label of a [`Vertex`].
pub type VertexId = Label<Vertex>;
/// Label of a [`Tetra`].
pub type TetraId = Label<Tetra>;
/// Label of a [`HalfEdge`].
pub type HalfEdgeId = Label<HalfEdge>;
/// Label of a [`Triangle`].
pub type TriangleId = Label<Triangle>;

/// Vertex of the triangulation.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// Slice index, `0 <= time < n_slices`.
    pub time: usize,
    /// Spatial coordination number: spatial neighbors reached through
    /// (3,1)-tetrahedron bases in the vertex's own slice.
    pub scnum: i32,
    /// Total coordination number: live tetrahedra containing this vertex.
    pub cnum: i32,
    /// Witness (3,1)-tetrahedron with this vertex in its base; BFS seed for
    /// neighborhood reconstruction.
    pub tetra: Option<TetraId>,
}

impl Vertex {
    /// A fresh vertex at `time` with no witness assigned yet.
    pub fn at_slice(time: usize) -> Self {
        Self {
            time,
            scnum: 0,
            cnum: 0,
            tetra: None,
        }
    }
}

/// Split of a tetrahedron's vertices across its two slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TetraKind {
    /// Three vertices in the lower slice, apex above.
    ThreeOne,
    /// Apex below, three vertices in the upper slice.
    OneThree,
    /// Two vertices in each slice.
    TwoTwo,
}

impl TetraKind {
    /// Short form used in diagnostics ("31", "13", "22").
    pub fn as_str(self) -> &'static str {
        match self {
            TetraKind::ThreeOne => "31",
            TetraKind::OneThree => "13",
            TetraKind::TwoTwo => "22",
        }
    }
}

/// Tetrahedron spanning two adjacent slices.
///
/// The three kinds share one layout; the kind tag fixes how `vs` and `tnbr`
/// are to be read (see the module docs).
#[derive(Debug, Clone)]
pub struct Tetra {
    /// Vertex split across the two slices.
    pub kind: TetraKind,
    /// Lower slice of the slab this tetrahedron lives in.
    pub time: usize,
    /// Vertex labels in the kind's ordering convention.
    pub vs: [VertexId; 4],
    /// `tnbr[i]` is the neighbor sharing the face opposite `vs[i]`.
    pub tnbr: [TetraId; 4],
    /// For a (3,1): the directed base edges `vs[0]→vs[1]`, `vs[1]→vs[2]`,
    /// `vs[2]→vs[0]`. Unset outside the derived-geometry window.
    pub hes: [Option<HalfEdgeId>; 3],
}

impl Tetra {
    pub fn is31(&self) -> bool {
        self.kind == TetraKind::ThreeOne
    }

    pub fn is13(&self) -> bool {
        self.kind == TetraKind::OneThree
    }

    pub fn is22(&self) -> bool {
        self.kind == TetraKind::TwoTwo
    }

    /// Returns whether `v` is one of the four vertices.
    pub fn has_vertex(&self, v: VertexId) -> bool {
        self.vs.contains(&v)
    }

    /// Returns whether `t` is one of the four neighbors.
    pub fn neighbors_tetra(&self, t: TetraId) -> bool {
        self.tnbr.contains(&t)
    }

    /// Neighbor sharing the face opposite `v`.
    pub fn tetra_opposite(&self, v: VertexId) -> TetraId {
        for i in 0..4 {
            if self.vs[i] == v {
                return self.tnbr[i];
            }
        }
        panic!("tetra does not contain vertex {v}");
    }

    /// Own vertex opposite the shared face with neighbor `tn`.
    pub fn vertex_opposite_tetra(&self, tn: TetraId) -> VertexId {
        for i in 0..4 {
            if self.tnbr[i] == tn {
                return self.vs[i];
            }
        }
        panic!("tetra does not neighbor {tn}");
    }

    /// Replaces the neighbor opposite `v` with `tn`, preserving the
    /// neighbor-opposite-`vs[i]` ordering invariant.
    pub fn exchange_tetra_opposite(&mut self, v: VertexId, tn: TetraId) {
        for i in 0..4 {
            if self.vs[i] == v {
                self.tnbr[i] = tn;
            }
        }
    }

    /// The own half-edge ending at `v`, if the base edges are set.
    pub fn half_edge_to(&self, v: VertexId, half_edges: &cdt_core::Pool<HalfEdge>) -> Option<HalfEdgeId> {
        self.hes
            .iter()
            .flatten()
            .copied()
            .find(|&h| half_edges[h].vs[1] == v)
    }
}

/// Spatial triangle, one per (3,1)-tetrahedron base.
///
/// Triangles (and half-edges) are ephemeral: destroyed and rebuilt from the
/// live (3,1)-tetrahedra on every geometry refresh.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Slice this triangle lies in.
    pub time: usize,
    /// The base vertices, same cyclic order as the owning (3,1).
    pub vs: [VertexId; 3],
    /// The three bounding half-edges.
    pub hes: [HalfEdgeId; 3],
    /// `trnbr[i]` is the triangle across `hes[i]`.
    pub trnbr: [TriangleId; 3],
}

/// Directed edge of a spatial triangle.
#[derive(Debug, Clone)]
pub struct HalfEdge {
    /// (from, to), both in the same slice.
    pub vs: [VertexId; 2],
    /// Successor in the CCW cycle of the owning triangle.
    pub next: HalfEdgeId,
    /// Predecessor in the CCW cycle.
    pub prev: HalfEdgeId,
    /// Opposite half-edge in the neighboring triangle.
    pub adj: HalfEdgeId,
    /// Owning (3,1)-tetrahedron.
    pub tetra: TetraId,
    /// Owning triangle.
    pub triangle: TriangleId,
}
