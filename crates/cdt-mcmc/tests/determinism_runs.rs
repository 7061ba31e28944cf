mod common;

use cdt_mcmc::Simulation;
use cdt_universe::canonical_hash;

#[test]
fn equal_seeds_reproduce_the_run() {
    let mut first = Simulation::new(common::grown_universe(10), &common::base_config(99));
    let mut second = Simulation::new(common::grown_universe(10), &common::base_config(99));

    let counts_first = first.perform_sweep(20_000);
    let counts_second = second.perform_sweep(20_000);

    assert_eq!(counts_first, counts_second);
    assert_eq!(
        canonical_hash(&first.universe),
        canonical_hash(&second.universe)
    );
}

#[test]
fn sweeps_compose_deterministically() {
    let mut whole = Simulation::new(common::grown_universe(10), &common::base_config(5));
    let mut split = Simulation::new(common::grown_universe(10), &common::base_config(5));

    let counts = whole.perform_sweep(10_000);

    let first_half = split.perform_sweep(5_000);
    let second_half = split.perform_sweep(5_000);

    let mut combined = first_half;
    for family in 0..5 {
        combined.accepted[family] += second_half.accepted[family];
        combined.rejected[family] += second_half.rejected[family];
    }
    assert_eq!(counts, combined);
    assert_eq!(
        canonical_hash(&whole.universe),
        canonical_hash(&split.universe)
    );
}
