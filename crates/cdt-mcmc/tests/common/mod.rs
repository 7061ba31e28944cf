use cdt_mcmc::Config;
use cdt_universe::Universe;

pub const MINIMAL: &str = include_str!("../../../cdt-universe/tests/data/minimal_s1s2.dat");

/// In-memory configuration with neutral couplings; tests override fields.
pub fn base_config(seed: u64) -> Config {
    Config {
        k0: 0.0,
        k3: 0.0,
        genus: 0,
        target_volume: 0,
        target2_volume: 0,
        volfix_switch: 0,
        epsilon: 0.02,
        seed,
        output_dir: ".".to_string(),
        file_id: "test".to_string(),
        thermal_sweeps: 0,
        measure_sweeps: 0,
        ksteps: 1,
        strictness: 0,
        move_freqs: [4, 1, 10],
        infile: String::new(),
        outfile: String::new(),
    }
}

/// The two-pillow fixture, grown by repeated vertex insertion so volume
/// dynamics has room to move.
pub fn grown_universe(insertions: usize) -> Universe {
    let mut universe = Universe::parse(MINIMAL, 0).expect("fixture parses");
    for round in 0..insertions {
        let seeds = universe.all_31();
        let seed = seeds[round % seeds.len()];
        assert!(universe.move_26(seed));
    }
    universe
}
