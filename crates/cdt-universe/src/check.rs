//! Full structural invariant sweep, for tests and debugging.

use crate::simplices::{TetraId, VertexId};
use crate::universe::Universe;

impl Universe {
    /// Validates every structural invariant of the triangulation. Panics on
    /// the first violation; intended for tests and debug runs, not sweeps.
    pub fn check(&self) {
        assert_eq!(self.tetras_all.len(), self.tetras.len());
        assert_eq!(self.vertices_all.len(), self.vertices.len());

        let mut n31 = 0;
        let mut n13 = 0;
        let mut n22 = 0;

        for t in self.tetras_all.iter() {
            let tetra = self.tetra(t);
            match tetra.kind {
                crate::simplices::TetraKind::ThreeOne => n31 += 1,
                crate::simplices::TetraKind::OneThree => n13 += 1,
                crate::simplices::TetraKind::TwoTwo => n22 += 1,
            }
            assert_eq!(
                tetra.is31(),
                self.tetras31.contains(t),
                "(3,1) bag out of sync for tetra {t}"
            );

            for i in 0..4 {
                assert!(
                    self.vertices_all.contains(tetra.vs[i]),
                    "tetra {t} references a dead vertex"
                );
                for j in (i + 1)..4 {
                    assert_ne!(tetra.vs[i], tetra.vs[j], "tetra {t} repeats a vertex");
                }
            }

            for i in 0..4 {
                let tn = tetra.tnbr[i];
                assert!(
                    self.tetras_all.contains(tn),
                    "tetra {t} references a dead neighbor"
                );
                assert_ne!(tn, t, "tetra {t} neighbors itself");
                assert!(
                    self.tetra(tn).neighbors_tetra(t),
                    "neighbor link {t}->{tn} is not reciprocal"
                );

                let shared = self
                    .tetra(tn)
                    .vs
                    .iter()
                    .filter(|&&w| tetra.has_vertex(w))
                    .count();
                assert!(
                    shared >= 3,
                    "tetra {t} and neighbor {tn} share only {shared} vertices"
                );

                if tetra.is31() {
                    if i < 3 {
                        assert!(
                            self.tetra(tn).is31() || self.tetra(tn).is22(),
                            "spatial neighbor of a (3,1) must be (3,1) or (2,2)"
                        );
                    } else {
                        assert!(self.tetra(tn).is13(), "mirror of a (3,1) must be a (1,3)");
                    }
                } else if tetra.is13() {
                    if i == 0 {
                        assert!(self.tetra(tn).is31(), "mirror of a (1,3) must be a (3,1)");
                    } else {
                        assert!(
                            self.tetra(tn).is13() || self.tetra(tn).is22(),
                            "spatial neighbor of a (1,3) must be (1,3) or (2,2)"
                        );
                    }
                }
            }

            for i in 0..4 {
                assert_eq!(
                    tetra.tetra_opposite(tetra.vs[i]),
                    tetra.tnbr[i],
                    "opposite-vertex order broken in tetra {t}"
                );
                let back = self.vertex_opposite(t, tetra.vs[i]);
                assert_eq!(
                    self.tetra(tetra.tnbr[i]).tetra_opposite(back),
                    t,
                    "opposite-vertex reciprocity broken across {t}"
                );
            }
        }

        assert_eq!(n13 + n22, self.tetras_all.len() - n31);
        assert_eq!(n31, self.tetras31.len());
        assert_eq!(self.slice_sizes.iter().sum::<usize>(), n31);
        assert_eq!(
            self.slab_sizes.iter().sum::<usize>(),
            self.tetras_all.len()
        );

        self.check_coordination();
        self.check_vertices();
        self.check_derived();
    }

    fn check_coordination(&self) {
        let bound = self.vertices.label_bound();
        let mut cnum = vec![0i32; bound];
        let mut scnum = vec![0i32; bound];
        for t in self.tetras_all.iter() {
            let tetra = self.tetra(t);
            for v in tetra.vs {
                cnum[v.index()] += 1;
            }
            if tetra.is31() {
                for &v in &tetra.vs[0..3] {
                    scnum[v.index()] += 1;
                }
            }
        }
        for v in self.vertices_all.iter() {
            assert_eq!(
                self.vertex(v).cnum,
                cnum[v.index()],
                "stale cnum at vertex {v}"
            );
            assert_eq!(
                self.vertex(v).scnum,
                scnum[v.index()],
                "stale scnum at vertex {v}"
            );
        }
    }

    fn check_vertices(&self) {
        for v in self.vertices_all.iter() {
            let witness = self.witness(v);
            assert!(
                self.tetras_all.contains(witness),
                "vertex {v} has a dead witness"
            );
            let tetra = self.tetra(witness);
            assert!(tetra.is31(), "witness of vertex {v} is not a (3,1)");
            assert!(
                tetra.vs[0..3].contains(&v),
                "vertex {v} is not in its witness base"
            );

            if self.strictness == 1 {
                assert!(self.vertex(v).scnum >= 2, "tadpole at vertex {v}");
            } else if self.strictness >= 2 {
                assert!(self.vertex(v).scnum >= 3, "self-energy at vertex {v}");
            }
        }
    }

    /// Derived half-edge/triangle invariants; skipped when no derived state
    /// has been built yet.
    fn check_derived(&self) {
        if self.triangles.is_empty() {
            return;
        }
        assert_eq!(self.half_edges.len(), 3 * self.tetras31.len());
        assert_eq!(self.triangles.len(), self.tetras31.len());

        for h in self.half_edges.iter() {
            let he = self.half_edge(h);
            assert_eq!(self.half_edge(he.adj).adj, h, "adj is not an involution");
            let n3 = self.half_edge(self.half_edge(he.next).next).next;
            assert_eq!(n3, h, "next does not close a 3-cycle");
            let p3 = self.half_edge(self.half_edge(he.prev).prev).prev;
            assert_eq!(p3, h, "prev does not close a 3-cycle");
            assert_eq!(
                self.vertex(he.vs[0]).time,
                self.vertex(he.vs[1]).time,
                "half-edge spans slices"
            );
        }

        for tr in self.triangles.iter() {
            for trn in self.triangle(tr).trnbr {
                assert!(
                    self.triangle(trn).trnbr.contains(&tr),
                    "triangle adjacency {tr}->{trn} is not reciprocal"
                );
            }
        }
    }

    /// Slice sizes recomputed from scratch; exposed for tests comparing
    /// incrementally maintained counters against ground truth.
    pub fn recount_slice_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.n_slices];
        for t in self.tetras31.iter() {
            sizes[self.tetra(t).time] += 1;
        }
        sizes
    }

    /// Multiset of (kind, sorted vertex times) over all live tetrahedra;
    /// label-independent content signature for round-trip tests.
    pub fn content_signature(&self) -> Vec<(String, [usize; 4])> {
        let mut signature: Vec<(String, [usize; 4])> = self
            .tetras_all
            .iter()
            .map(|t| {
                let tetra = self.tetra(t);
                let mut times = tetra.vs.map(|v| self.vertex(v).time);
                times.sort_unstable();
                (tetra.kind.as_str().to_string(), times)
            })
            .collect();
        signature.sort();
        signature
    }

    /// All live (3,1) labels, in bag order; convenience for tests.
    pub fn all_31(&self) -> Vec<TetraId> {
        self.tetras31.iter().collect()
    }

    /// All live vertex labels, in bag order; convenience for tests.
    pub fn all_vertices(&self) -> Vec<VertexId> {
        self.vertices_all.iter().collect()
    }
}
