//! Derived per-slice connectivity, rebuilt before every measurement.
//!
//! Half-edges and triangles are torn down and recreated from the live
//! (3,1)-tetrahedra; vertex adjacency lists are recollected by walking each
//! vertex's star of tetrahedra. None of this runs during a sweep.

use crate::simplices::{HalfEdge, HalfEdgeId, TetraId, Triangle, TriangleId, VertexId};
use crate::universe::Universe;

impl Universe {
    /// Recollects the live vertex list and, for every vertex, the set of
    /// vertices sharing a tetrahedron with it, by BFS through the star of
    /// the vertex starting at its witness.
    pub fn update_vertex_data(&mut self) {
        self.vertex_list.clear();
        let mut max_label = 0;
        for v in self.vertices_all.iter() {
            self.vertex_list.push(v);
            max_label = max_label.max(v.index());
        }
        self.vertex_neighbors.clear();
        self.vertex_neighbors.resize(max_label + 1, Vec::new());

        for idx in 0..self.vertex_list.len() {
            let v = self.vertex_list[idx];
            let mut done: Vec<TetraId> = Vec::new();
            let mut current = vec![self.witness(v)];
            let mut next: Vec<TetraId> = Vec::new();

            while !current.is_empty() {
                for &tc in &current {
                    for &tcn in &self.tetras[tc].tnbr {
                        if !self.tetras[tcn].has_vertex(v) {
                            continue;
                        }
                        if !done.contains(&tcn) {
                            done.push(tcn);
                            next.push(tcn);
                        }
                    }
                }
                std::mem::swap(&mut current, &mut next);
                next.clear();
            }

            let mut nbr: Vec<VertexId> = Vec::new();
            for &td in &done {
                for &vd in &self.tetras[td].vs {
                    if vd != v && !nbr.contains(&vd) {
                        nbr.push(vd);
                    }
                }
            }
            self.vertex_neighbors[v.index()] = nbr;
        }
    }

    /// Destroys all half-edges and recreates the three base edges of every
    /// (3,1), then pairs opposite half-edges by walking across the chain of
    /// (2,2)-tetrahedra that borders each spatial edge.
    pub fn update_half_edge_data(&mut self) {
        let stale: Vec<HalfEdgeId> = self.half_edges.iter().collect();
        for h in stale {
            self.half_edges.destroy(h);
        }
        assert!(self.half_edges.is_empty());
        self.half_edge_list.clear();

        let nil_h = HalfEdgeId::from_raw(u32::MAX);
        let nil_tr = TriangleId::from_raw(u32::MAX);
        let t31s: Vec<TetraId> = self.tetras31.iter().collect();

        for &t in &t31s {
            let vs = self.tetras[t].vs;
            let mut these = [nil_h; 3];
            for (i, slot) in these.iter_mut().enumerate() {
                let h = self.half_edges.create(HalfEdge {
                    vs: [vs[i], vs[(i + 1) % 3]],
                    next: nil_h,
                    prev: nil_h,
                    adj: nil_h,
                    tetra: t,
                    triangle: nil_tr,
                });
                *slot = h;
                self.half_edge_list.push(h);
            }
            self.tetras[t].hes = [Some(these[0]), Some(these[1]), Some(these[2])];
            for i in 0..3 {
                self.half_edges[these[i]].next = these[(i + 1) % 3];
                self.half_edges[these[i]].prev = these[(i + 2) % 3];
            }
        }

        for &t in &t31s {
            for i in 0..3 {
                // Cross the neighbor opposite vs[i] and keep following the
                // base edge (vs[i+1], vs[i+2]) through any (2,2)s until the
                // (3,1) on the far side.
                let mut tc = self.tetras[t].tetra_opposite(self.tetras[t].vs[i]);
                let mut v = self.tetras[t].vs[3];
                while self.tetras[tc].is22() {
                    let tn = self.tetras[tc].tetra_opposite(v);
                    let upper = &self.tetras[tc];
                    v = if upper.vs[2] == v {
                        upper.vs[3]
                    } else {
                        upper.vs[2]
                    };
                    tc = tn;
                }
                assert!(
                    self.tetras[tc].is31(),
                    "spatial edge chain must end on a (3,1)"
                );

                let hthis = self.tetras[t].hes[(i + 1) % 3].unwrap();
                let target = self.tetras[t].vs[(i + 1) % 3];
                let hthat = self.tetras[tc]
                    .half_edge_to(target, &self.half_edges)
                    .expect("far (3,1) must carry the reverse half-edge");
                self.half_edges[hthis].adj = hthat;
                self.half_edges[hthat].adj = hthis;
            }
        }
    }

    /// Destroys all triangles and recreates one per (3,1) base, attaching
    /// the half-edges and wiring `trnbr` through their `adj` links.
    pub fn update_triangle_data(&mut self) {
        let stale: Vec<TriangleId> = self.triangles.iter().collect();
        for tr in stale {
            self.triangles.destroy(tr);
        }
        self.triangle_list.clear();

        let nil_tr = TriangleId::from_raw(u32::MAX);
        let t31s: Vec<TetraId> = self.tetras31.iter().collect();

        for &t in &t31s {
            let vs = self.tetras[t].vs;
            let hes = self.tetras[t].hes.map(|h| h.unwrap());
            let time = self.vertices[vs[0]].time;
            assert!(
                self.vertices[vs[1]].time == time && self.vertices[vs[2]].time == time,
                "triangle vertices must share a slice"
            );
            let tr = self.triangles.create(Triangle {
                time,
                vs: [vs[0], vs[1], vs[2]],
                hes,
                trnbr: [nil_tr; 3],
            });
            for h in hes {
                self.half_edges[h].triangle = tr;
            }
            self.triangle_list.push(tr);
        }

        for idx in 0..self.triangle_list.len() {
            let tr = self.triangle_list[idx];
            let hes = self.triangles[tr].hes;
            let trnbr = hes.map(|h| self.half_edges[self.half_edges[h].adj].triangle);
            self.triangles[tr].trnbr = trnbr;
        }
    }

    /// Full derived-state refresh; the half-edge/triangle structures are
    /// valid from here until the next mutating move.
    pub fn update_geometry(&mut self) {
        self.update_vertex_data();
        self.update_half_edge_data();
        self.update_triangle_data();
    }
}
