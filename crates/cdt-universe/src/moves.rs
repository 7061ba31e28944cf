//! The five families of local, causality-preserving moves.
//!
//! Every move validates its structural preconditions before touching any
//! state, so a `false` return implies the triangulation is unchanged and no
//! rollback is ever needed. Boundary rewiring goes through
//! [`Tetra::exchange_tetra_opposite`], which preserves the
//! neighbor-opposite-`vs[i]` ordering invariant.

use crate::simplices::{TetraId, Vertex, VertexId};
use crate::universe::Universe;

impl Universe {
    /// (2,6)-move: splits a (3,1)/(1,3) mirror pair around a new vertex at
    /// the barycenter of their shared base triangle.
    ///
    /// Always succeeds on a live (3,1) seed. Volume change: +4 tetrahedra
    /// (+3 in the base slice count).
    pub fn move_26(&mut self, t: TetraId) -> bool {
        assert!(self.tetra(t).is31(), "move_26 seed must be a (3,1)");
        let time = self.tetra(t).time;
        let tv = self.tetra(t).tnbr[3];
        assert!(self.tetra(tv).is13(), "mirror of a (3,1) must be a (1,3)");

        let [v0, v1, v2, vt] = self.tetra(t).vs;
        let vb = self.tetra(tv).vs[0];

        let vn = self.vertices.create(Vertex {
            time,
            scnum: 3,
            cnum: 6,
            tetra: None,
        });
        self.vertices_all.add(vn);

        let tn01 = self.create_tetra();
        let tn12 = self.create_tetra();
        let tn20 = self.create_tetra();
        let tvn01 = self.create_tetra();
        let tvn12 = self.create_tetra();
        let tvn20 = self.create_tetra();

        for tn in [tn01, tn12, tn20, tvn01, tvn12, tvn20] {
            self.tetras_all.add(tn);
        }
        for tn in [tn01, tn12, tn20] {
            self.tetras31.add(tn);
        }

        let to0 = self.tetra(t).tetra_opposite(v0);
        let to1 = self.tetra(t).tetra_opposite(v1);
        let to2 = self.tetra(t).tetra_opposite(v2);
        let tvo0 = self.tetra(tv).tetra_opposite(v0);
        let tvo1 = self.tetra(tv).tetra_opposite(v1);
        let tvo2 = self.tetra(tv).tetra_opposite(v2);

        self.set_vertices(tn01, v0, v1, vn, vt);
        self.set_vertices(tn12, v1, v2, vn, vt);
        self.set_vertices(tn20, v2, v0, vn, vt);
        self.set_vertices(tvn01, vb, v0, v1, vn);
        self.set_vertices(tvn12, vb, v1, v2, vn);
        self.set_vertices(tvn20, vb, v2, v0, vn);

        self.set_tetras(tn01, tn12, tn20, to2, tvn01);
        self.set_tetras(tn12, tn20, tn01, to0, tvn12);
        self.set_tetras(tn20, tn01, tn12, to1, tvn20);
        self.set_tetras(tvn01, tn01, tvn12, tvn20, tvo2);
        self.set_tetras(tvn12, tn12, tvn20, tvn01, tvo0);
        self.set_tetras(tvn20, tn20, tvn01, tvn12, tvo1);

        let o0 = self.vertex_opposite(t, v0);
        let o1 = self.vertex_opposite(t, v1);
        let o2 = self.vertex_opposite(t, v2);
        let vo0 = self.vertex_opposite(tv, v0);
        let vo1 = self.vertex_opposite(tv, v1);
        let vo2 = self.vertex_opposite(tv, v2);
        self.tetra_mut(to0).exchange_tetra_opposite(o0, tn12);
        self.tetra_mut(to1).exchange_tetra_opposite(o1, tn20);
        self.tetra_mut(to2).exchange_tetra_opposite(o2, tn01);
        self.tetra_mut(tvo0).exchange_tetra_opposite(vo0, tvn12);
        self.tetra_mut(tvo1).exchange_tetra_opposite(vo1, tvn20);
        self.tetra_mut(tvo2).exchange_tetra_opposite(vo2, tvn01);

        self.slab_sizes[time] += 2;
        self.slab_sizes[(time + self.n_slices - 1) % self.n_slices] += 2;
        self.slice_sizes[time] += 2;

        self.tetras_all.remove(t);
        self.tetras31.remove(t);
        self.tetras_all.remove(tv);
        self.tetras.destroy(t);
        self.tetras.destroy(tv);

        self.vertex_mut(vn).tetra = Some(tn01);
        self.vertex_mut(v0).tetra = Some(tn01);
        self.vertex_mut(v1).tetra = Some(tn12);
        self.vertex_mut(v2).tetra = Some(tn20);

        for v in [v0, v1, v2] {
            self.vertex_mut(v).scnum += 1;
        }
        for v in [v0, v1, v2, vt, vb] {
            self.vertex_mut(v).cnum += 2;
        }

        true
    }

    /// (6,2)-move: deletes a vertex of coordination six, fusing its six
    /// surrounding tetrahedra back into a mirror pair. Inverse of
    /// [`Universe::move_26`].
    pub fn move_62(&mut self, v: VertexId) -> bool {
        if self.vertex(v).cnum != 6 || self.vertex(v).scnum != 3 {
            return false;
        }
        let time = self.vertex(v).time;
        let t01 = self.witness(v);
        let tv01 = self.tetra(t01).tnbr[3];

        let vpos = (0..3)
            .find(|&i| self.tetra(t01).vs[i] == v)
            .expect("witness base must contain the vertex");
        let v0 = self.tetra(t01).vs[(vpos + 1) % 3];
        let v1 = self.tetra(t01).vs[(vpos + 2) % 3];
        let v2 = self.vertex_opposite(t01, v0);

        let t12 = self.tetra(t01).tetra_opposite(v0);
        let t20 = self.tetra(t01).tetra_opposite(v1);
        let tv12 = self.tetra(tv01).tetra_opposite(v0);
        let tv20 = self.tetra(tv01).tetra_opposite(v1);

        assert!(
            self.tetra(t01).is31() && self.tetra(t12).is31() && self.tetra(t20).is31(),
            "star of a coordination-six vertex must hold three (3,1)s"
        );
        assert!(
            self.tetra(tv01).is13() && self.tetra(tv12).is13() && self.tetra(tv20).is13(),
            "star of a coordination-six vertex must hold three (1,3)s"
        );

        // Manifold conditions: spatial neighbors may not drop below the
        // minimum coordination for the configured strictness.
        if self.strictness == 1 {
            if self.vertex(v0).scnum < 3 || self.vertex(v1).scnum < 3 || self.vertex(v2).scnum < 3 {
                return false;
            }
        } else if self.strictness >= 2 {
            if self.vertex(v0).scnum < 4 || self.vertex(v1).scnum < 4 || self.vertex(v2).scnum < 4 {
                return false;
            }
        }

        let to01 = self.tetra(t01).tetra_opposite(v);
        let to12 = self.tetra(t12).tetra_opposite(v);
        let to20 = self.tetra(t20).tetra_opposite(v);
        let tvo01 = self.tetra(tv01).tetra_opposite(v);
        let tvo12 = self.tetra(tv12).tetra_opposite(v);
        let tvo20 = self.tetra(tv20).tetra_opposite(v);

        let o01 = self.vertex_opposite(t01, v);
        let o12 = self.vertex_opposite(t12, v);
        let o20 = self.vertex_opposite(t20, v);
        let vo01 = self.vertex_opposite(tv01, v);
        let vo12 = self.vertex_opposite(tv12, v);
        let vo20 = self.vertex_opposite(tv20, v);

        let vt = self.tetra(t01).vs[3];
        let vb = self.tetra(tv01).vs[0];

        let tn = self.create_tetra();
        let tvn = self.create_tetra();
        self.tetras_all.add(tn);
        self.tetras31.add(tn);
        self.tetras_all.add(tvn);

        self.set_vertices(tn, v0, v1, v2, vt);
        self.set_vertices(tvn, vb, v0, v1, v2);
        self.set_tetras(tn, to12, to20, to01, tvn);
        self.set_tetras(tvn, tn, tvo12, tvo20, tvo01);

        for w in [v0, v1, v2] {
            self.vertex_mut(w).tetra = Some(tn);
            self.vertex_mut(w).scnum -= 1;
        }
        for w in [v0, v1, v2, vt, vb] {
            self.vertex_mut(w).cnum -= 2;
        }

        self.tetra_mut(to01).exchange_tetra_opposite(o01, tn);
        self.tetra_mut(to12).exchange_tetra_opposite(o12, tn);
        self.tetra_mut(to20).exchange_tetra_opposite(o20, tn);
        self.tetra_mut(tvo01).exchange_tetra_opposite(vo01, tvn);
        self.tetra_mut(tvo12).exchange_tetra_opposite(vo12, tvn);
        self.tetra_mut(tvo20).exchange_tetra_opposite(vo20, tvn);

        for t in [t01, t12, t20] {
            self.tetras_all.remove(t);
            self.tetras31.remove(t);
            self.tetras.destroy(t);
        }
        for t in [tv01, tv12, tv20] {
            self.tetras_all.remove(t);
            self.tetras.destroy(t);
        }

        self.vertices_all.remove(v);
        self.vertices.destroy(v);

        self.slab_sizes[time] -= 2;
        self.slab_sizes[(time + self.n_slices - 1) % self.n_slices] -= 2;
        self.slice_sizes[time] -= 2;

        true
    }

    /// (4,4)-move: flips the spatial edge shared by two adjacent (3,1)s
    /// (and, through the mirrors, by the two (1,3)s below). Replaces edge
    /// (v0,v2) with (v1,v3). Volume preserving.
    ///
    /// The four tetrahedron slots are reused; only the outer neighbors whose
    /// shared face migrates to the other slot get rewired.
    pub fn move_44(&mut self, t012: TetraId, t230: TetraId) -> bool {
        debug_assert!(self.tetra(t012).is31() && self.tetra(t230).is31());
        let v1 = self.tetra(t012).vertex_opposite_tetra(t230);
        let v3 = self.tetra(t230).vertex_opposite_tetra(t012);
        let v1pos = (0..3)
            .find(|&i| self.tetra(t012).vs[i] == v1)
            .expect("opposite vertex of a spatial neighbor lies in the base");
        let v2 = self.tetra(t012).vs[(v1pos + 1) % 3];
        let v0 = self.tetra(t012).vs[(v1pos + 2) % 3];

        let tv012 = self.tetra(t012).tnbr[3];
        let tv230 = self.tetra(t230).tnbr[3];
        debug_assert!(self.tetra(tv012).neighbors_tetra(tv230));

        if self.strictness >= 1 && v1 == v3 {
            return false;
        }
        if self.strictness >= 2 && (self.vertex(v0).scnum == 3 || self.vertex(v2).scnum == 3) {
            return false;
        }
        if self.strictness >= 3 && self.neighbors_vertex(v1, v3) {
            return false;
        }

        let ta01 = self.tetra(t012).tetra_opposite(v2);
        let ta23 = self.tetra(t230).tetra_opposite(v0);
        let tva01 = self.tetra(tv012).tetra_opposite(v2);
        let tva23 = self.tetra(tv230).tetra_opposite(v0);
        let ta12 = self.tetra(t012).tetra_opposite(v0);
        let ta30 = self.tetra(t230).tetra_opposite(v2);
        let tva12 = self.tetra(tv012).tetra_opposite(v0);
        let tva30 = self.tetra(tv230).tetra_opposite(v2);

        if ta01 == t230 || ta23 == t012 || tva01 == tv230 || tva23 == tv012 {
            return false;
        }

        // Opposite vertices of the migrating outer faces, read before the
        // slots are overwritten.
        let oa01 = self.vertex_opposite(t012, v2);
        let oa23 = self.vertex_opposite(t230, v0);
        let ova01 = self.vertex_opposite(tv012, v2);
        let ova23 = self.vertex_opposite(tv230, v0);

        let vt = self.tetra(t012).vs[3];
        let vb = self.tetra(tv012).vs[0];

        let tn013 = t230;
        let tn123 = t012;
        let tvn013 = tv230;
        let tvn123 = tv012;

        self.set_vertices(tn013, v0, v1, v3, vt);
        self.set_vertices(tn123, v1, v2, v3, vt);
        self.set_vertices(tvn013, vb, v0, v1, v3);
        self.set_vertices(tvn123, vb, v1, v2, v3);

        self.set_tetras(tn013, tn123, ta30, ta01, tvn013);
        self.set_tetras(tn123, ta23, tn013, ta12, tvn123);
        self.set_tetras(tvn013, tn013, tvn123, tva30, tva01);
        self.set_tetras(tvn123, tn123, tva23, tvn013, tva12);

        self.tetra_mut(ta01).exchange_tetra_opposite(oa01, tn013);
        self.tetra_mut(ta23).exchange_tetra_opposite(oa23, tn123);
        self.tetra_mut(tva01).exchange_tetra_opposite(ova01, tvn013);
        self.tetra_mut(tva23).exchange_tetra_opposite(ova23, tvn123);

        self.vertex_mut(v0).scnum -= 1;
        self.vertex_mut(v1).scnum += 1;
        self.vertex_mut(v2).scnum -= 1;
        self.vertex_mut(v3).scnum += 1;
        self.vertex_mut(v0).cnum -= 2;
        self.vertex_mut(v1).cnum += 2;
        self.vertex_mut(v2).cnum -= 2;
        self.vertex_mut(v3).cnum += 2;

        self.vertex_mut(v0).tetra = Some(tn013);
        self.vertex_mut(v2).tetra = Some(tn123);

        if self.strictness >= 2 {
            assert!(self.vertex(v0).scnum >= 3 && self.vertex(v2).scnum >= 3);
        }

        true
    }

    /// (2,3)-move, upward slab: trades a (3,1)+(2,2) pair for a
    /// (3,1)+(2,2)+(2,2) triple, creating the timelike edge (v0,v1).
    /// Volume change: +1 in `slab_sizes` only.
    pub fn move_23u(&mut self, t31: TetraId, t22: TetraId) -> bool {
        debug_assert!(self.tetra(t31).is31() && self.tetra(t22).is22());
        let v0 = self.tetra(t31).vertex_opposite_tetra(t22);
        let v1 = self.tetra(t22).vertex_opposite_tetra(t31);

        let v0pos = (0..3)
            .find(|&i| self.tetra(t31).vs[i] == v0)
            .expect("opposite vertex of a spatial neighbor lies in the base");
        let v2 = self.tetra(t31).vs[(v0pos + 1) % 3];
        let v4 = self.tetra(t31).vs[(v0pos + 2) % 3];
        let v3 = self.tetra(t31).vs[3];

        let ta023 = self.tetra(t31).tetra_opposite(v4);
        let ta034 = self.tetra(t31).tetra_opposite(v2);
        let ta123 = self.tetra(t22).tetra_opposite(v4);
        let ta124 = self.tetra(t22).tetra_opposite(v3);
        let ta134 = self.tetra(t22).tetra_opposite(v2);

        // The new edge (v0,v1) must not already exist, directly or through
        // the outer neighbors.
        if self.tetra(ta023).has_vertex(v1)
            || self.tetra(ta123).has_vertex(v0)
            || self.tetra(ta034).has_vertex(v1)
            || self.tetra(ta134).has_vertex(v0)
            || self.neighbors_vertex(v0, v1)
        {
            return false;
        }

        let t13 = self.tetra(t31).tnbr[3];

        let o023 = self.vertex_opposite(t31, v4);
        let o034 = self.vertex_opposite(t31, v2);
        let o123 = self.vertex_opposite(t22, v4);
        let o124 = self.vertex_opposite(t22, v3);
        let o134 = self.vertex_opposite(t22, v2);

        let tn31 = self.create_tetra();
        let tn22l = self.create_tetra();
        let tn22r = self.create_tetra();
        self.tetras_all.add(tn31);
        self.tetras31.add(tn31);
        self.tetras_all.add(tn22l);
        self.tetras_all.add(tn22r);

        self.set_vertices(tn31, v0, v2, v4, v1);
        self.set_vertices(tn22l, v0, v2, v1, v3);
        self.set_vertices(tn22r, v0, v4, v1, v3);

        self.set_tetras(tn31, ta124, tn22r, tn22l, t13);
        self.set_tetras(tn22l, ta123, tn22r, ta023, tn31);
        self.set_tetras(tn22r, ta134, tn22l, ta034, tn31);

        let time = self.tetra(tn31).time;
        self.slab_sizes[time] += 1;

        let apex = self.tetra(t13).vs[0];
        self.tetra_mut(t13).exchange_tetra_opposite(apex, tn31);
        self.tetra_mut(ta023).exchange_tetra_opposite(o023, tn22l);
        self.tetra_mut(ta034).exchange_tetra_opposite(o034, tn22r);
        self.tetra_mut(ta123).exchange_tetra_opposite(o123, tn22l);
        self.tetra_mut(ta124).exchange_tetra_opposite(o124, tn31);
        self.tetra_mut(ta134).exchange_tetra_opposite(o134, tn22r);

        self.vertex_mut(v0).cnum += 2;
        self.vertex_mut(v1).cnum += 2;

        self.tetras_all.remove(t31);
        self.tetras31.remove(t31);
        self.tetras_all.remove(t22);
        self.tetras.destroy(t31);
        self.tetras.destroy(t22);

        for i in 0..3 {
            let w = self.tetra(tn31).vs[i];
            self.vertex_mut(w).tetra = Some(tn31);
        }

        true
    }

    /// (3,2)-move, upward slab: inverse of [`Universe::move_23u`], removing
    /// the timelike edge (v0,v1). Volume change: −1 in `slab_sizes` only.
    pub fn move_32u(&mut self, t31: TetraId, t22l: TetraId, t22r: TetraId) -> bool {
        debug_assert!(
            self.tetra(t31).is31() && self.tetra(t22l).is22() && self.tetra(t22r).is22()
        );
        let v1 = self.tetra(t31).vs[3];
        let v3 = self.tetra(t22l).vertex_opposite_tetra(t31);
        let v4 = self.tetra(t31).vertex_opposite_tetra(t22l);

        let v4pos = (0..3)
            .find(|&i| self.tetra(t31).vs[i] == v4)
            .expect("opposite vertex of a spatial neighbor lies in the base");
        let v0 = self.tetra(t31).vs[(v4pos + 1) % 3];
        let v2 = self.tetra(t31).vs[(v4pos + 2) % 3];

        let ta023 = self.tetra(t22l).tetra_opposite(v1);
        let ta034 = self.tetra(t22r).tetra_opposite(v1);
        let ta123 = self.tetra(t22l).tetra_opposite(v0);
        let ta124 = self.tetra(t31).tetra_opposite(v0);
        let ta134 = self.tetra(t22r).tetra_opposite(v0);

        if self.tetra(ta023).has_vertex(v4)
            || self.tetra(ta123).has_vertex(v4)
            || self.tetra(ta034).has_vertex(v2)
            || self.tetra(ta124).has_vertex(v3)
            || self.tetra(ta134).has_vertex(v2)
        {
            return false;
        }

        let t13 = self.tetra(t31).tnbr[3];

        let o023 = self.vertex_opposite(t22l, v1);
        let o034 = self.vertex_opposite(t22r, v1);
        let o123 = self.vertex_opposite(t22l, v0);
        let o124 = self.vertex_opposite(t31, v0);
        let o134 = self.vertex_opposite(t22r, v0);

        let tn31 = self.create_tetra();
        let tn22 = self.create_tetra();
        self.tetras_all.add(tn31);
        self.tetras31.add(tn31);
        self.tetras_all.add(tn22);

        self.set_vertices(tn31, v0, v2, v4, v3);
        self.set_vertices(tn22, v2, v4, v1, v3);

        self.set_tetras(tn31, tn22, ta034, ta023, t13);
        self.set_tetras(tn22, ta134, ta123, tn31, ta124);

        let apex = self.tetra(t13).vs[0];
        self.tetra_mut(t13).exchange_tetra_opposite(apex, tn31);
        self.tetra_mut(ta023).exchange_tetra_opposite(o023, tn31);
        self.tetra_mut(ta034).exchange_tetra_opposite(o034, tn31);
        self.tetra_mut(ta123).exchange_tetra_opposite(o123, tn22);
        self.tetra_mut(ta124).exchange_tetra_opposite(o124, tn22);
        self.tetra_mut(ta134).exchange_tetra_opposite(o134, tn22);

        self.vertex_mut(v0).cnum -= 2;
        self.vertex_mut(v1).cnum -= 2;

        self.tetras_all.remove(t31);
        self.tetras31.remove(t31);
        self.tetras_all.remove(t22l);
        self.tetras_all.remove(t22r);
        self.tetras.destroy(t31);
        self.tetras.destroy(t22l);
        self.tetras.destroy(t22r);

        let time = self.tetra(tn31).time;
        self.slab_sizes[time] -= 1;

        for i in 0..3 {
            let w = self.tetra(tn31).vs[i];
            self.vertex_mut(w).tetra = Some(tn31);
        }

        true
    }

    /// (2,3)-move, downward slab: the mirror of [`Universe::move_23u`]
    /// through the (1,3) below the seed, creating the timelike edge (v0,v1)
    /// with v1 in the lower slice.
    pub fn move_23d(&mut self, t13: TetraId, t22: TetraId) -> bool {
        debug_assert!(self.tetra(t13).is13() && self.tetra(t22).is22());
        let v0 = self.tetra(t13).vertex_opposite_tetra(t22);
        let v1 = self.tetra(t22).vertex_opposite_tetra(t13);

        let t31 = self.tetra(t13).tnbr[0];
        let v0pos = (0..3)
            .find(|&i| self.tetra(t31).vs[i] == v0)
            .expect("base of the paired (3,1) must contain v0");
        let v2 = self.tetra(t31).vs[(v0pos + 1) % 3];
        let v4 = self.tetra(t31).vs[(v0pos + 2) % 3];
        let v3 = self.tetra(t13).vs[0];

        let ta023 = self.tetra(t13).tetra_opposite(v4);
        let ta034 = self.tetra(t13).tetra_opposite(v2);
        let ta123 = self.tetra(t22).tetra_opposite(v4);
        let ta124 = self.tetra(t22).tetra_opposite(v3);
        let ta134 = self.tetra(t22).tetra_opposite(v2);

        if self.tetra(ta023).has_vertex(v1)
            || self.tetra(ta123).has_vertex(v0)
            || self.tetra(ta034).has_vertex(v1)
            || self.tetra(ta134).has_vertex(v0)
            || self.neighbors_vertex(v0, v1)
        {
            return false;
        }

        let o023 = self.vertex_opposite(t13, v4);
        let o034 = self.vertex_opposite(t13, v2);
        let o123 = self.vertex_opposite(t22, v4);
        let o124 = self.vertex_opposite(t22, v3);
        let o134 = self.vertex_opposite(t22, v2);

        let tn13 = self.create_tetra();
        let tn22l = self.create_tetra();
        let tn22r = self.create_tetra();
        self.tetras_all.add(tn13);
        self.tetras_all.add(tn22l);
        self.tetras_all.add(tn22r);

        self.set_vertices(tn13, v1, v0, v2, v4);
        self.set_vertices(tn22l, v1, v3, v0, v2);
        self.set_vertices(tn22r, v1, v3, v0, v4);

        self.set_tetras(tn13, t31, ta124, tn22r, tn22l);
        self.set_tetras(tn22l, ta023, tn13, ta123, tn22r);
        self.set_tetras(tn22r, ta034, tn13, ta134, tn22l);

        let time = self.tetra(tn13).time;
        self.slab_sizes[time] += 1;

        let apex = self.tetra(t31).vs[3];
        self.tetra_mut(t31).exchange_tetra_opposite(apex, tn13);
        self.tetra_mut(ta023).exchange_tetra_opposite(o023, tn22l);
        self.tetra_mut(ta034).exchange_tetra_opposite(o034, tn22r);
        self.tetra_mut(ta123).exchange_tetra_opposite(o123, tn22l);
        self.tetra_mut(ta124).exchange_tetra_opposite(o124, tn13);
        self.tetra_mut(ta134).exchange_tetra_opposite(o134, tn22r);

        self.vertex_mut(v0).cnum += 2;
        self.vertex_mut(v1).cnum += 2;

        self.tetras_all.remove(t13);
        self.tetras_all.remove(t22);
        self.tetras.destroy(t13);
        self.tetras.destroy(t22);

        true
    }

    /// (3,2)-move, downward slab: inverse of [`Universe::move_23d`].
    pub fn move_32d(&mut self, t13: TetraId, t22l: TetraId, t22r: TetraId) -> bool {
        debug_assert!(
            self.tetra(t13).is13() && self.tetra(t22l).is22() && self.tetra(t22r).is22()
        );
        let v1 = self.tetra(t13).vs[0];
        let v3 = self.tetra(t22l).vertex_opposite_tetra(t13);
        let v4 = self.tetra(t13).vertex_opposite_tetra(t22l);

        let t31 = self.tetra(t13).tnbr[0];
        let v4pos = (0..3)
            .find(|&i| self.tetra(t31).vs[i] == v4)
            .expect("base of the paired (3,1) must contain v4");
        let v0 = self.tetra(t31).vs[(v4pos + 1) % 3];
        let v2 = self.tetra(t31).vs[(v4pos + 2) % 3];

        let ta023 = self.tetra(t22l).tetra_opposite(v1);
        let ta034 = self.tetra(t22r).tetra_opposite(v1);
        let ta123 = self.tetra(t22l).tetra_opposite(v0);
        let ta124 = self.tetra(t13).tetra_opposite(v0);
        let ta134 = self.tetra(t22r).tetra_opposite(v0);

        if self.tetra(ta023).has_vertex(v4)
            || self.tetra(ta123).has_vertex(v4)
            || self.tetra(ta034).has_vertex(v2)
            || self.tetra(ta124).has_vertex(v3)
            || self.tetra(ta134).has_vertex(v2)
        {
            return false;
        }

        let o023 = self.vertex_opposite(t22l, v1);
        let o034 = self.vertex_opposite(t22r, v1);
        let o123 = self.vertex_opposite(t22l, v0);
        let o124 = self.vertex_opposite(t13, v0);
        let o134 = self.vertex_opposite(t22r, v0);

        let tn13 = self.create_tetra();
        let tn22 = self.create_tetra();
        self.tetras_all.add(tn13);
        self.tetras_all.add(tn22);

        self.set_vertices(tn13, v3, v0, v2, v4);
        self.set_vertices(tn22, v1, v3, v2, v4);

        self.set_tetras(tn13, t31, tn22, ta034, ta023);
        self.set_tetras(tn22, tn13, ta124, ta134, ta123);

        let apex = self.tetra(t31).vs[3];
        self.tetra_mut(t31).exchange_tetra_opposite(apex, tn13);
        self.tetra_mut(ta023).exchange_tetra_opposite(o023, tn13);
        self.tetra_mut(ta034).exchange_tetra_opposite(o034, tn13);
        self.tetra_mut(ta123).exchange_tetra_opposite(o123, tn22);
        self.tetra_mut(ta124).exchange_tetra_opposite(o124, tn22);
        self.tetra_mut(ta134).exchange_tetra_opposite(o134, tn22);

        self.vertex_mut(v0).cnum -= 2;
        self.vertex_mut(v1).cnum -= 2;

        self.tetras_all.remove(t13);
        self.tetras_all.remove(t22l);
        self.tetras_all.remove(t22r);
        self.tetras.destroy(t13);
        self.tetras.destroy(t22l);
        self.tetras.destroy(t22r);

        let time = self.tetra(tn13).time;
        self.slab_sizes[time] -= 1;

        true
    }
}
