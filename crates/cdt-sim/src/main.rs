use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use cdt_mcmc::observables::{CnumHistogram, Hausdorff2d, Ricci2d, VolumeProfile};
use cdt_mcmc::{Config, RunManifest, Simulation};
use cdt_universe::{canonical_hash, Universe};

#[derive(Parser, Debug)]
#[command(name = "cdt-sim", about = "Monte Carlo sampler for 3D causal dynamical triangulations")]
struct Cli {
    /// Flat key-value configuration file.
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    println!("{}", cli.config.display());

    let config = Config::load(&cli.config)?;
    println!("fileid: {}", config.file_id);
    println!("seed: {}", config.seed);
    println!("strictness: {}", config.strictness);

    fs::create_dir_all(&config.output_dir)?;

    let universe = Universe::load(&config.infile, config.strictness)?;

    println!();
    println!("#######################");
    println!("* * * initialized * * *");
    println!("#######################");
    println!();

    let mut simulation = Simulation::new(universe, &config);
    simulation.add_observable_3d(Box::new(VolumeProfile::new(&config.file_id)));
    if config.target2_volume > 0 {
        simulation.add_observable_2d(Box::new(CnumHistogram::new(&config.file_id)));
        simulation.add_observable_2d(Box::new(Hausdorff2d::new(&config.file_id)));
        simulation.add_observable_2d(Box::new(Ricci2d::new(&config.file_id)));
    }

    let k3_start = config.k3;
    simulation.start()?;

    println!();
    println!("####################");
    println!("* * * finished * * *");
    println!("####################");
    println!();
    println!("t31: {}", simulation.universe.tetras31.len());

    let manifest = RunManifest {
        k0: config.k0,
        k3_start,
        k3_final: simulation.k3(),
        epsilon: config.epsilon,
        seed: simulation.seed(),
        thermal_sweeps: config.thermal_sweeps,
        measure_sweeps: config.measure_sweeps,
        ksteps: config.ksteps,
        move_freqs: config.move_freqs,
        target_volume: config.target_volume,
        target2_volume: config.target2_volume,
        volfix_switch: config.volfix_switch,
        n_slices: simulation.universe.n_slices,
        final_n3: simulation.universe.tetra_count(),
        final_n31: simulation.universe.tetras31.len(),
        geometry_hash: canonical_hash(&simulation.universe),
    };
    let manifest_path =
        Path::new(&config.output_dir).join(format!("manifest-{}.json", config.file_id));
    manifest.write(&manifest_path)?;

    Ok(())
}
