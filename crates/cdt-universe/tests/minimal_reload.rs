use cdt_universe::{canonical_hash, Universe};

const MINIMAL: &str = include_str!("data/minimal_s1s2.dat");

#[test]
fn minimal_geometry_loads_and_checks() {
    let universe = Universe::parse(MINIMAL, 0).expect("fixture parses");

    assert_eq!(universe.n_slices, 2);
    assert_eq!(universe.tetra_count(), 16);
    assert_eq!(universe.vertex_count(), 6);
    assert_eq!(universe.tetras31.len(), 4);
    assert_eq!(universe.slab_sizes, vec![8, 8]);
    assert_eq!(universe.slice_sizes, vec![2, 2]);
    assert_eq!(universe.recount_slice_sizes(), universe.slice_sizes);

    universe.check();
}

#[test]
fn minimal_geometry_passes_tadpole_strictness() {
    let universe = Universe::parse(MINIMAL, 1).expect("fixture parses");
    universe.check();
}

#[test]
fn derived_connectivity_counts() {
    let mut universe = Universe::parse(MINIMAL, 0).expect("fixture parses");
    universe.update_geometry();
    universe.check();

    assert_eq!(universe.half_edge_list.len(), 3 * universe.tetras31.len());
    assert_eq!(universe.triangle_list.len(), universe.tetras31.len());

    // Every vertex of the two-pillow universe touches all five others.
    for v in universe.all_vertices() {
        assert_eq!(universe.vertex_neighbors[v.index()].len(), 5);
    }
}

#[test]
fn export_then_reload_preserves_content() {
    let universe = Universe::parse(MINIMAL, 0).expect("fixture parses");
    let serialized = universe.serialize_geometry();

    let reloaded = Universe::parse(&serialized, 0).expect("own export parses");
    reloaded.check();

    assert_eq!(reloaded.n_slices, universe.n_slices);
    assert_eq!(reloaded.slab_sizes, universe.slab_sizes);
    assert_eq!(reloaded.slice_sizes, universe.slice_sizes);
    assert_eq!(reloaded.content_signature(), universe.content_signature());
    assert_eq!(canonical_hash(&reloaded), canonical_hash(&universe));

    // A second serialization of the reload is byte-identical.
    assert_eq!(reloaded.serialize_geometry(), serialized);
}

#[test]
fn export_writes_readable_file() {
    let universe = Universe::parse(MINIMAL, 0).expect("fixture parses");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("geometry.dat");

    universe.export_geometry(&path).expect("export succeeds");
    let reloaded = Universe::load(&path, 0).expect("exported file loads");
    assert_eq!(reloaded.content_signature(), universe.content_signature());
}

#[test]
fn unordered_neighbor_rows_are_resorted() {
    // Rotate every neighbor row and flag the file as unordered; the reader
    // must recover the opposite-vertex order.
    let mut tokens: Vec<String> = MINIMAL
        .split_whitespace()
        .map(|t| t.to_string())
        .collect();
    tokens[0] = "0".to_string();
    for tetra in 0..16 {
        let base = 10 + tetra * 8 + 4;
        tokens.swap(base, base + 1);
        tokens.swap(base + 2, base + 3);
    }
    let scrambled = tokens.join("\n");

    let universe = Universe::parse(&scrambled, 0).expect("unordered file parses");
    universe.check();
    assert_eq!(
        universe.content_signature(),
        Universe::parse(MINIMAL, 0).unwrap().content_signature()
    );
}

#[test]
fn truncated_geometry_is_rejected() {
    let tokens: Vec<&str> = MINIMAL.split_whitespace().collect();
    let truncated = tokens[..tokens.len() / 2].join(" ");
    let err = Universe::parse(&truncated, 0).unwrap_err();
    assert_eq!(err.info().code, "truncated-geometry");
}

#[test]
fn bad_sentinel_is_rejected() {
    let mut tokens: Vec<String> = MINIMAL
        .split_whitespace()
        .map(|t| t.to_string())
        .collect();
    // The vertex block sentinel sits right after the six slice indices.
    tokens[8] = "7".to_string();
    let err = Universe::parse(&tokens.join(" "), 0).unwrap_err();
    assert_eq!(err.info().code, "vertex-sentinel");
}
