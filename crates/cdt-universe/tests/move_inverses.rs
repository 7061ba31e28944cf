use cdt_universe::Universe;

const MINIMAL: &str = include_str!("data/minimal_s1s2.dat");

#[test]
fn vertex_insertion_bookkeeping() {
    let mut universe = Universe::parse(MINIMAL, 0).expect("fixture parses");
    let seed = universe.all_31()[0];

    assert!(universe.move_26(seed));
    universe.check();

    assert_eq!(universe.tetra_count(), 20);
    assert_eq!(universe.tetras31.len(), 6);
    assert_eq!(universe.vertex_count(), 7);
    assert_eq!(universe.slab_sizes, vec![10, 10]);
    assert_eq!(universe.slice_sizes, vec![4, 2]);

    let vn = *universe.all_vertices().last().unwrap();
    assert_eq!(universe.vertex(vn).cnum, 6);
    assert_eq!(universe.vertex(vn).scnum, 3);
    assert_eq!(universe.vertex(vn).time, 0);
}

#[test]
fn vertex_deletion_restores_the_insertion() {
    let mut universe = Universe::parse(MINIMAL, 0).expect("fixture parses");
    let signature = universe.content_signature();
    let slabs = universe.slab_sizes.clone();
    let slices = universe.slice_sizes.clone();

    let seed = universe.all_31()[0];
    assert!(universe.move_26(seed));
    let vn = *universe.all_vertices().last().unwrap();

    assert!(universe.move_62(vn));
    universe.check();

    assert_eq!(universe.tetra_count(), 16);
    assert_eq!(universe.tetras31.len(), 4);
    assert_eq!(universe.vertex_count(), 6);
    assert_eq!(universe.slab_sizes, slabs);
    assert_eq!(universe.slice_sizes, slices);
    assert_eq!(universe.content_signature(), signature);
}

#[test]
fn deletion_rejects_wrong_coordination() {
    let mut universe = Universe::parse(MINIMAL, 0).expect("fixture parses");
    let signature = universe.content_signature();

    // Every fixture vertex has coordination well above six.
    for v in universe.all_vertices() {
        assert!(!universe.move_62(v));
    }
    assert_eq!(universe.content_signature(), signature);
    universe.check();
}

#[test]
fn repeated_insertions_stay_consistent() {
    let mut universe = Universe::parse(MINIMAL, 0).expect("fixture parses");
    for round in 0..6 {
        let seed = universe.all_31()[round % universe.tetras31.len()];
        assert!(universe.move_26(seed));
        universe.check();
    }
    assert_eq!(universe.tetra_count(), 16 + 6 * 4);
    assert_eq!(universe.tetras31.len(), 4 + 6 * 2);
    assert_eq!(universe.vertex_count(), 12);
}
