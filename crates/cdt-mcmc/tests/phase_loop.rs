mod common;

use cdt_mcmc::observables::VolumeProfile;
use cdt_mcmc::Simulation;

#[test]
fn short_run_produces_data_and_exports() {
    let universe = common::grown_universe(12);
    let n31 = universe.tetras31.len();
    let dir = tempfile::tempdir().expect("tempdir");

    let mut config = common::base_config(21);
    config.target_volume = n31;
    config.thermal_sweeps = 3;
    config.measure_sweeps = 3;
    config.ksteps = 1;
    config.output_dir = dir.path().to_str().unwrap().to_string();
    config.outfile = dir
        .path()
        .join("latest.dat")
        .to_str()
        .unwrap()
        .to_string();
    config.file_id = "phase".to_string();

    let mut simulation = Simulation::new(universe, &config);
    simulation.add_observable_3d(Box::new(VolumeProfile::new("phase")));
    simulation.start().expect("run completes");

    let data = std::fs::read_to_string(dir.path().join("volume_profile-phase.dat"))
        .expect("profile written");
    // One line per thermal sweep plus one per measurement sweep.
    assert_eq!(data.lines().count(), 6);
    for line in data.lines() {
        let sizes: Vec<usize> = line
            .split_whitespace()
            .map(|t| t.parse().unwrap())
            .collect();
        assert_eq!(sizes.len(), 2);
    }

    // Measurement sweeps settle at the fixed volume before measuring.
    let last: usize = data
        .lines()
        .last()
        .unwrap()
        .split_whitespace()
        .map(|t| t.parse::<usize>().unwrap())
        .sum();
    assert_eq!(last, n31);

    assert!(dir.path().join("latest.dat").exists());
    let exported = cdt_universe::Universe::load(dir.path().join("latest.dat"), 0)
        .expect("exported geometry loads");
    exported.check();

    simulation.universe.check();
}
