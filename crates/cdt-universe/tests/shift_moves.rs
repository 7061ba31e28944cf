use cdt_universe::{TetraId, Universe};

const MINIMAL: &str = include_str!("data/minimal_s1s2.dat");

fn shared_vertices(universe: &Universe, a: TetraId, b: TetraId) -> usize {
    let tb = universe.tetra(b);
    universe
        .tetra(a)
        .vs
        .iter()
        .filter(|&&v| tb.has_vertex(v))
        .count()
}

/// Scans (3,1)s of the slab at `time` for a valid inverse-shift triple, the
/// way the Metropolis driver samples one.
fn try_ishift_up(universe: &mut Universe, time: usize) -> bool {
    for t in universe.all_31() {
        if universe.tetra(t).time != time {
            continue;
        }
        for i in 0..3 {
            let t22l = universe.tetra(t).tnbr[i];
            let t22r = universe.tetra(t).tnbr[(i + 2) % 3];
            if !universe.tetra(t22l).is22() || !universe.tetra(t22r).is22() {
                continue;
            }
            if !universe.tetra(t22l).neighbors_tetra(t22r) {
                continue;
            }
            if shared_vertices(universe, t22l, t22r) != 3 {
                continue;
            }
            if universe.move_32u(t, t22l, t22r) {
                return true;
            }
        }
    }
    false
}

fn try_ishift_down(universe: &mut Universe, time: usize) -> bool {
    for tv in universe.all_31() {
        let t13 = universe.tetra(tv).tnbr[3];
        if universe.tetra(t13).time != time {
            continue;
        }
        for i in 0..3 {
            let t22l = universe.tetra(t13).tnbr[1 + i];
            let t22r = universe.tetra(t13).tnbr[1 + (i + 2) % 3];
            if !universe.tetra(t22l).is22() || !universe.tetra(t22r).is22() {
                continue;
            }
            if !universe.tetra(t22l).neighbors_tetra(t22r) {
                continue;
            }
            if shared_vertices(universe, t22l, t22r) != 3 {
                continue;
            }
            if universe.move_32d(t13, t22l, t22r) {
                return true;
            }
        }
    }
    false
}

#[test]
fn shift_and_inverse_shift_round_trip() {
    let mut universe = Universe::parse(MINIMAL, 0).expect("fixture parses");
    let seed = universe.all_31()[0];
    assert!(universe.move_26(seed));

    let n3 = universe.tetra_count();
    let n31 = universe.tetras31.len();
    let slabs = universe.slab_sizes.clone();
    let slices = universe.slice_sizes.clone();

    // The inserted vertex's fan exposes a (3,1) with a (2,2) neighbor.
    let origin = universe.all_vertices()[0];
    let t31 = universe.witness(origin);
    let t22 = universe.tetra(t31).tnbr[2];
    assert!(universe.tetra(t22).is22());

    assert!(universe.move_23u(t31, t22));
    universe.check();
    assert_eq!(universe.tetra_count(), n3 + 1);
    assert_eq!(universe.tetras31.len(), n31);
    assert_eq!(universe.slab_sizes, vec![slabs[0] + 1, slabs[1]]);
    assert_eq!(universe.slice_sizes, slices);

    assert!(try_ishift_up(&mut universe, 0), "inverse shift must apply");
    universe.check();
    assert_eq!(universe.tetra_count(), n3);
    assert_eq!(universe.tetras31.len(), n31);
    assert_eq!(universe.slab_sizes, slabs);
    assert_eq!(universe.slice_sizes, slices);
}

#[test]
fn downward_shift_round_trip() {
    let mut universe = Universe::parse(MINIMAL, 0).expect("fixture parses");
    let seed = universe.all_31()[0];
    assert!(universe.move_26(seed));

    let n3 = universe.tetra_count();
    let slabs = universe.slab_sizes.clone();
    let slices = universe.slice_sizes.clone();

    // Reach into the slab below through the fan's (1,3) mirror.
    let origin = universe.all_vertices()[0];
    let t13 = universe.tetra(universe.witness(origin)).tnbr[3];
    assert!(universe.tetra(t13).is13());
    let t22 = universe.tetra(t13).tnbr[3];
    assert!(universe.tetra(t22).is22());

    assert!(universe.move_23d(t13, t22));
    universe.check();
    assert_eq!(universe.tetra_count(), n3 + 1);
    assert_eq!(universe.slab_sizes, vec![slabs[0], slabs[1] + 1]);
    assert_eq!(universe.slice_sizes, slices);

    assert!(try_ishift_down(&mut universe, 1), "inverse shift must apply");
    universe.check();
    assert_eq!(universe.tetra_count(), n3);
    assert_eq!(universe.slab_sizes, slabs);
    assert_eq!(universe.slice_sizes, slices);
}
