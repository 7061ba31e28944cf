mod common;

use cdt_mcmc::Simulation;

#[test]
fn add_and_delete_acceptances_balance() {
    // Neutral couplings with a soft volume fix pinning n31 near its start,
    // so the chain equilibrates instead of random-walking into the floor.
    let universe = common::grown_universe(28);
    let n31 = universe.tetras31.len();

    let mut config = common::base_config(7);
    config.target_volume = n31;
    config.volfix_switch = 0;
    config.epsilon = 0.02;

    let mut simulation = Simulation::new(universe, &config);
    let counts = simulation.perform_sweep(200_000);

    let adds = counts.accepted[0];
    let deletes = counts.accepted[1];
    assert!(adds > 1000, "add moves should flow, got {adds}");
    assert!(deletes > 1000, "delete moves should flow, got {deletes}");

    // In equilibrium accepted insertions and deletions differ only by the
    // net volume drift, which the soft fix keeps tiny.
    let spread = (adds as f64 - deletes as f64).abs();
    let sigma = ((adds + deletes) as f64).sqrt();
    assert!(
        spread < 5.0 * sigma,
        "asymmetry {spread} exceeds 5 sigma ({sigma})"
    );

    simulation.universe.check();
}

#[test]
fn soft_volume_fix_holds_the_target() {
    let universe = common::grown_universe(28);
    let n31 = universe.tetras31.len();

    let mut config = common::base_config(11);
    config.target_volume = n31;
    config.epsilon = 0.02;

    let mut simulation = Simulation::new(universe, &config);
    for _ in 0..20 {
        simulation.perform_sweep(5_000);
        let current = simulation.universe.tetras31.len() as f64;
        let target = n31 as f64;
        assert!(
            (current - target).abs() < 0.5 * target,
            "volume {current} drifted away from target {target}"
        );
    }
    simulation.universe.check();
}

#[test]
fn every_move_family_fires() {
    let universe = common::grown_universe(28);
    let n31 = universe.tetras31.len();

    let mut config = common::base_config(13);
    config.target_volume = n31;

    let mut simulation = Simulation::new(universe, &config);
    let counts = simulation.perform_sweep(100_000);

    for family in 0..5 {
        assert!(
            counts.accepted[family] > 0,
            "family {} never succeeded",
            family + 1
        );
    }
    assert_eq!(
        counts.total_accepted() + counts.rejected.iter().sum::<usize>(),
        100_000
    );
    simulation.universe.check();
}
