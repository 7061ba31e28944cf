mod common;

use std::fs;

use cdt_core::RngHandle;
use cdt_mcmc::observable::{self, BfsScratch, MeasureContext};
use cdt_mcmc::observables::{CnumHistogram, Hausdorff2d, Ricci2d, VolumeProfile};
use cdt_mcmc::Observable;
use cdt_universe::Universe;

fn prepared_universe() -> Universe {
    let mut universe = Universe::parse(common::MINIMAL, 0).expect("fixture parses");
    universe.update_geometry();
    universe
}

fn measure_once(
    observable_impl: &mut dyn Observable,
    universe: &Universe,
    target2_volume: usize,
    data_dir: &str,
) {
    let mut rng = RngHandle::from_seed(3);
    let mut scratch = BfsScratch::new();
    let mut ctx = MeasureContext {
        rng: &mut rng,
        scratch: &mut scratch,
        target2_volume,
    };
    observable::measure(observable_impl, universe, &mut ctx, data_dir).expect("measure succeeds");
}

#[test]
fn volume_profile_appends_one_line_per_measurement() {
    let universe = prepared_universe();
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().to_str().unwrap();

    let mut profile = VolumeProfile::new("obs-test");
    observable::clear(&mut profile, data_dir).expect("clear succeeds");

    measure_once(&mut profile, &universe, 0, data_dir);

    let path = dir.path().join("volume_profile-obs-test.dat");
    let contents = fs::read_to_string(&path).expect("data file exists");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);

    let sizes: Vec<usize> = lines[0]
        .split_whitespace()
        .map(|t| t.parse().unwrap())
        .collect();
    assert_eq!(sizes.len(), universe.n_slices);
    assert_eq!(sizes.iter().sum::<usize>(), universe.tetras31.len());

    measure_once(&mut profile, &universe, 0, data_dir);
    let contents = fs::read_to_string(&path).expect("data file exists");
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn clear_never_truncates() {
    let universe = prepared_universe();
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().to_str().unwrap();

    let mut profile = VolumeProfile::new("keep");
    observable::clear(&mut profile, data_dir).expect("clear succeeds");
    measure_once(&mut profile, &universe, 0, data_dir);
    observable::clear(&mut profile, data_dir).expect("second clear succeeds");

    let path = dir.path().join("volume_profile-keep.dat");
    let contents = fs::read_to_string(&path).expect("data file exists");
    assert_eq!(contents.lines().count(), 1, "clear must not drop data");
}

#[test]
fn coordination_histogram_counts_matching_slices() {
    let universe = prepared_universe();
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().to_str().unwrap();

    let mut histogram = CnumHistogram::new("obs-test");
    // Both fixture slices hold two triangles, so every vertex qualifies and
    // every one of them has two spatial neighbors.
    measure_once(&mut histogram, &universe, 2, data_dir);

    let path = dir.path().join("cnum-obs-test.dat");
    let contents = fs::read_to_string(&path).expect("data file exists");
    let bins: Vec<usize> = contents
        .lines()
        .next()
        .unwrap()
        .split_whitespace()
        .map(|t| t.parse().unwrap())
        .collect();
    assert_eq!(bins[2], 6);
    assert_eq!(bins.iter().sum::<usize>(), 6);
}

#[test]
fn slice_observables_produce_full_lines() {
    let universe = prepared_universe();
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().to_str().unwrap();

    let mut hausdorff = Hausdorff2d::new("obs-test");
    measure_once(&mut hausdorff, &universe, 2, data_dir);
    let contents =
        fs::read_to_string(dir.path().join("hausdorff2d-obs-test.dat")).expect("file exists");
    assert_eq!(contents.lines().next().unwrap().split_whitespace().count(), 30);

    let mut ricci = Ricci2d::new("obs-test");
    measure_once(&mut ricci, &universe, 2, data_dir);
    let contents =
        fs::read_to_string(dir.path().join("ricci2d-obs-test.dat")).expect("file exists");
    let values: Vec<f64> = contents
        .lines()
        .next()
        .unwrap()
        .split_whitespace()
        .map(|t| t.parse().unwrap())
        .collect();
    assert_eq!(values.len(), 10);
    for value in values {
        assert!(value.is_finite());
    }
}
