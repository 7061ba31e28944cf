mod common;

use cdt_mcmc::Simulation;
use cdt_universe::Universe;

fn simulation_with_target(target: usize, volfix_switch: u32) -> Simulation {
    let universe = Universe::parse(common::MINIMAL, 0).expect("fixture parses");
    let mut config = common::base_config(1);
    config.target_volume = target;
    config.volfix_switch = volfix_switch;
    Simulation::new(universe, &config)
}

#[test]
fn far_band_steps_hard() {
    // n31 = 4 against a target of 10000: deep in the far band.
    let mut simulation = simulation_with_target(10_000, 0);
    simulation.tune();
    assert!((simulation.k3() - (-1e-3)).abs() < 1e-12);
}

#[test]
fn far_band_steps_up_when_oversized() {
    // Target 2 against n31 = 4: the far band on the other side.
    let mut simulation = simulation_with_target(2, 0);
    simulation.tune();
    assert!((simulation.k3() - 1e-3).abs() < 1e-12);
}

#[test]
fn innermost_band_leaves_k3_alone() {
    // Full-volume fix with the target met exactly.
    let mut simulation = simulation_with_target(16, 1);
    assert_eq!(simulation.fix_volume(), 16);
    simulation.tune();
    assert_eq!(simulation.k3(), 0.0);
}

#[test]
fn close_band_shares_the_hard_step() {
    // n3 = 16 against target 17: between 5% and 50% off, same step size as
    // the far band.
    let mut simulation = simulation_with_target(17, 1);
    simulation.tune();
    assert!((simulation.k3() - (-1e-3)).abs() < 1e-12);
}

fn grown_simulation(insertions: usize, target: usize) -> Simulation {
    let universe = common::grown_universe(insertions);
    let mut config = common::base_config(1);
    config.target_volume = target;
    config.volfix_switch = 1;
    Simulation::new(universe, &config)
}

#[test]
fn middle_band_steps_by_one_tenth() {
    // n3 = 960 against target 1000: between 0.2% and 5% off.
    let mut simulation = grown_simulation(236, 1000);
    assert_eq!(simulation.fix_volume(), 960);
    simulation.tune();
    assert!((simulation.k3() - (-1e-4)).abs() < 1e-12);
}

#[test]
fn deep_band_steps_gently() {
    // n3 = 9984 against target 10000: between 0.01% and 0.2% off.
    let mut simulation = grown_simulation(2492, 10_000);
    assert_eq!(simulation.fix_volume(), 9984);
    simulation.tune();
    assert!((simulation.k3() - (-2e-5)).abs() < 1e-12);
}

#[test]
fn fix_volume_follows_the_switch() {
    let simulation31 = simulation_with_target(0, 0);
    assert_eq!(simulation31.fix_volume(), 4);
    let simulation3 = simulation_with_target(0, 1);
    assert_eq!(simulation3.fix_volume(), 16);
}
