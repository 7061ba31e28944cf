//! Metropolis driver: move dispatch, acceptance ratios, volume fixing,
//! coupling tuning and the thermalization/measurement phase loop.

use cdt_core::{CdtError, RngHandle};
use cdt_universe::Universe;
use rand::Rng;

use crate::config::Config;
use crate::observable::{self, BfsScratch, MeasureContext, Observable};

/// Move families, in dispatch order.
pub const FAMILY_ADD: i32 = 1;
pub const FAMILY_DELETE: i32 = 2;
pub const FAMILY_FLIP: i32 = 3;
pub const FAMILY_SHIFT: i32 = 4;
pub const FAMILY_ISHIFT: i32 = 5;

/// Per-family accepted/rejected attempt counts of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepCounts {
    /// Accepted attempts, indexed by family − 1.
    pub accepted: [usize; 5],
    /// Rejected attempts, indexed by family − 1.
    pub rejected: [usize; 5],
}

impl SweepCounts {
    /// Total accepted attempts.
    pub fn total_accepted(&self) -> usize {
        self.accepted.iter().sum()
    }
}

/// The Monte Carlo engine: one universe, one RNG stream, the registered
/// observables and the coupling state.
pub struct Simulation {
    /// The evolving triangulation.
    pub universe: Universe,
    rng: RngHandle,
    k0: f64,
    k3: f64,
    epsilon: f64,
    seed: u64,
    target_volume: usize,
    target2_volume: usize,
    volfix_switch: u32,
    move_freqs: [u32; 3],
    thermal_sweeps: usize,
    measure_sweeps: usize,
    ksteps: usize,
    data_dir: String,
    out_file: String,
    observables3d: Vec<Box<dyn Observable>>,
    observables2d: Vec<Box<dyn Observable>>,
    scratch: BfsScratch,
}

impl Simulation {
    /// Builds a driver over `universe` with the couplings and schedule from
    /// `config`. The RNG is seeded here and nowhere else.
    pub fn new(universe: Universe, config: &Config) -> Self {
        Self {
            universe,
            rng: RngHandle::from_seed(config.seed),
            k0: config.k0,
            k3: config.k3,
            epsilon: config.epsilon,
            seed: config.seed,
            target_volume: config.target_volume,
            target2_volume: config.target2_volume,
            volfix_switch: config.volfix_switch,
            move_freqs: config.move_freqs,
            thermal_sweeps: config.thermal_sweeps,
            measure_sweeps: config.measure_sweeps,
            ksteps: config.ksteps,
            data_dir: config.output_dir.clone(),
            out_file: config.outfile.clone(),
            observables3d: Vec::new(),
            observables2d: Vec::new(),
            scratch: BfsScratch::new(),
        }
    }

    /// Registers an observable measured after every sweep.
    pub fn add_observable_3d(&mut self, observable: Box<dyn Observable>) {
        self.observables3d.push(observable);
    }

    /// Registers an observable measured when a slice reaches the 2-d target
    /// volume.
    pub fn add_observable_2d(&mut self, observable: Box<dyn Observable>) {
        self.observables2d.push(observable);
    }

    /// Current cosmological coupling (drifts under tuning).
    pub fn k3(&self) -> f64 {
        self.k3
    }

    /// RNG master seed of this run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The volume the soft constraint acts on: the (3,1)-count or the full
    /// tetrahedron count, per the volfix switch.
    pub fn fix_volume(&self) -> usize {
        if self.volfix_switch == 0 {
            self.universe.tetras31.len()
        } else {
            self.universe.tetras_all.len()
        }
    }

    /// Attempts one randomly selected move. Returns the move family,
    /// positive when the move was applied and negative when it was rejected
    /// by the acceptance draw or by structural preconditions.
    pub fn attempt_move(&mut self) -> i32 {
        let freq_total: u32 = self.move_freqs.iter().sum();
        let cum1 = self.move_freqs[0];
        let cum2 = cum1 + self.move_freqs[1];

        let draw = self.rng.gen_range(0..freq_total);
        if draw < cum1 {
            if self.rng.gen_range(0..2u32) == 0 {
                if self.move_add() {
                    return FAMILY_ADD;
                }
                -FAMILY_ADD
            } else {
                if self.move_delete() {
                    return FAMILY_DELETE;
                }
                -FAMILY_DELETE
            }
        } else if draw < cum2 {
            if self.move_flip() {
                return FAMILY_FLIP;
            }
            -FAMILY_FLIP
        } else if self.rng.gen_range(0..2u32) == 0 {
            let up = self.rng.gen_range(0..2u32) == 0;
            let ok = if up {
                self.move_shift_up()
            } else {
                self.move_shift_down()
            };
            if ok {
                FAMILY_SHIFT
            } else {
                -FAMILY_SHIFT
            }
        } else {
            let up = self.rng.gen_range(0..2u32) == 0;
            let ok = if up {
                self.move_ishift_up()
            } else {
                self.move_ishift_down()
            };
            if ok {
                FAMILY_ISHIFT
            } else {
                -FAMILY_ISHIFT
            }
        }
    }

    /// Performs `n` move attempts and tallies the outcomes per family.
    pub fn perform_sweep(&mut self, n: usize) -> SweepCounts {
        let mut counts = SweepCounts::default();
        for _ in 0..n {
            let outcome = self.attempt_move();
            if outcome > 0 {
                counts.accepted[(outcome - 1) as usize] += 1;
            } else {
                counts.rejected[(-outcome - 1) as usize] += 1;
            }
        }
        counts
    }

    fn metropolis_accept(&mut self, ar: f64) -> bool {
        if ar < 1.0 {
            let u: f64 = self.rng.gen();
            if u > ar {
                return false;
            }
        }
        true
    }

    /// Volume-fixing factor for add-type proposals; the delete factor is
    /// its reciprocal.
    fn add_fix_factor(&self) -> f64 {
        if self.target_volume == 0 {
            return 1.0;
        }
        let target = self.target_volume as f64;
        if self.volfix_switch == 0 {
            let n31 = self.universe.tetras31.len() as f64;
            (4.0 * self.epsilon * (target - n31 - 1.0)).exp()
        } else {
            let n3 = self.universe.tetras_all.len() as f64;
            (8.0 * self.epsilon * (target - n3 - 2.0)).exp()
        }
    }

    /// Volume-fixing factor for shift proposals; only the full-volume fix
    /// responds to them, since they leave the (3,1)-count alone.
    fn shift_fix_factor(&self) -> f64 {
        if self.target_volume == 0 || self.volfix_switch == 0 {
            return 1.0;
        }
        let target = self.target_volume as f64;
        let n3 = self.universe.tetras_all.len() as f64;
        (self.epsilon * (2.0 * target - 2.0 * n3 - 1.0)).exp()
    }

    fn move_add(&mut self) -> bool {
        let n31 = self.universe.tetras31.len() as f64;
        let ar = (self.k0 - 4.0 * self.k3).exp() * (n31 / (n31 + 2.0)) * self.add_fix_factor();
        if !self.metropolis_accept(ar) {
            return false;
        }
        let t = self.universe.tetras31.pick(&mut self.rng);
        self.universe.move_26(t)
    }

    fn move_delete(&mut self) -> bool {
        let n31 = self.universe.tetras31.len() as f64;
        let ar = (-self.k0 + 4.0 * self.k3).exp() * (n31 / (n31 - 2.0)) / self.add_fix_factor();
        if !self.metropolis_accept(ar) {
            return false;
        }
        let v = self.universe.vertices_all.pick(&mut self.rng);
        if self.universe.vertex(v).cnum != 6 || self.universe.vertex(v).scnum != 3 {
            return false;
        }
        self.universe.move_62(v)
    }

    fn move_flip(&mut self) -> bool {
        let t012 = self.universe.tetras31.pick(&mut self.rng);
        let neighbor = self.rng.gen_range(0..3usize);
        let t230 = self.universe.tetra(t012).tnbr[neighbor];

        if !self.universe.tetra(t230).is31() {
            return false;
        }
        let mirror012 = self.universe.tetra(t012).tnbr[3];
        let mirror230 = self.universe.tetra(t230).tnbr[3];
        if !self.universe.tetra(mirror012).neighbors_tetra(mirror230) {
            return false;
        }
        self.universe.move_44(t012, t230)
    }

    fn move_shift_up(&mut self) -> bool {
        let ar = (-self.k3).exp() * self.shift_fix_factor();
        if !self.metropolis_accept(ar) {
            return false;
        }
        let t = self.universe.tetras31.pick(&mut self.rng);
        let neighbor = self.rng.gen_range(0..3usize);
        let tn = self.universe.tetra(t).tnbr[neighbor];
        if !self.universe.tetra(tn).is22() {
            return false;
        }
        self.universe.move_23u(t, tn)
    }

    fn move_shift_down(&mut self) -> bool {
        let ar = (-self.k3).exp() * self.shift_fix_factor();
        if !self.metropolis_accept(ar) {
            return false;
        }
        let tv = self.universe.tetras31.pick(&mut self.rng);
        let t13 = self.universe.tetra(tv).tnbr[3];
        let neighbor = self.rng.gen_range(1..4usize);
        let tn = self.universe.tetra(t13).tnbr[neighbor];
        if !self.universe.tetra(tn).is22() {
            return false;
        }
        self.universe.move_23d(t13, tn)
    }

    fn move_ishift_up(&mut self) -> bool {
        let ar = self.k3.exp() / self.shift_fix_factor();
        if !self.metropolis_accept(ar) {
            return false;
        }
        let t = self.universe.tetras31.pick(&mut self.rng);
        let neighbor = self.rng.gen_range(0..3usize);
        let t22l = self.universe.tetra(t).tnbr[neighbor];
        let t22r = self.universe.tetra(t).tnbr[(neighbor + 2) % 3];

        if !self.universe.tetra(t22l).is22() || !self.universe.tetra(t22r).is22() {
            return false;
        }
        if !self.universe.tetra(t22l).neighbors_tetra(t22r) {
            return false;
        }
        if self.shared_vertex_count(t22l, t22r) != 3 {
            return false;
        }
        self.universe.move_32u(t, t22l, t22r)
    }

    fn move_ishift_down(&mut self) -> bool {
        let ar = self.k3.exp() / self.shift_fix_factor();
        if !self.metropolis_accept(ar) {
            return false;
        }
        let tv = self.universe.tetras31.pick(&mut self.rng);
        let t13 = self.universe.tetra(tv).tnbr[3];
        let neighbor = self.rng.gen_range(0..3usize);
        let t22l = self.universe.tetra(t13).tnbr[1 + neighbor];
        let t22r = self.universe.tetra(t13).tnbr[1 + (neighbor + 2) % 3];

        if !self.universe.tetra(t22l).is22() || !self.universe.tetra(t22r).is22() {
            return false;
        }
        if !self.universe.tetra(t22l).neighbors_tetra(t22r) {
            return false;
        }
        if self.shared_vertex_count(t22l, t22r) != 3 {
            return false;
        }
        self.universe.move_32d(t13, t22l, t22r)
    }

    fn shared_vertex_count(&self, a: cdt_universe::TetraId, b: cdt_universe::TetraId) -> usize {
        let tb = self.universe.tetra(b);
        self.universe
            .tetra(a)
            .vs
            .iter()
            .filter(|&&v| tb.has_vertex(v))
            .count()
    }

    /// One adaptive step of the cosmological coupling toward the
    /// pseudo-critical value reproducing the target volume. Within 0.01% of
    /// the target the coupling is left alone.
    pub fn tune(&mut self) {
        const DELTA_K3: f64 = 1e-6;
        let target = self.target_volume as f64;
        let diff = target - self.fix_volume() as f64;

        let border_far = 0.5 * target;
        let border_close = 0.05 * target;
        let border_vclose = 0.002 * target;
        let border_vvclose = 0.0001 * target;

        if diff > border_far {
            self.k3 -= DELTA_K3 * 1000.0;
        } else if diff < -border_far {
            self.k3 += DELTA_K3 * 1000.0;
        } else if diff > border_close {
            self.k3 -= DELTA_K3 * 1000.0;
        } else if diff < -border_close {
            self.k3 += DELTA_K3 * 1000.0;
        } else if diff > border_vclose {
            self.k3 -= DELTA_K3 * 100.0;
        } else if diff < -border_vclose {
            self.k3 += DELTA_K3 * 100.0;
        } else if diff > border_vvclose {
            self.k3 -= DELTA_K3 * 20.0;
        } else if diff < -border_vvclose {
            self.k3 += DELTA_K3 * 20.0;
        }
    }

    /// Geometry refresh ahead of a batch of measurements.
    pub fn prepare(&mut self) {
        self.universe.update_geometry();
    }

    fn average_slice_size(&self) -> usize {
        let total: usize = self.universe.slice_sizes.iter().sum();
        total / self.universe.n_slices
    }

    fn measure_3d(&mut self) -> Result<(), CdtError> {
        let mut ctx = MeasureContext {
            rng: &mut self.rng,
            scratch: &mut self.scratch,
            target2_volume: self.target2_volume,
        };
        for obs in &mut self.observables3d {
            observable::measure(obs.as_mut(), &self.universe, &mut ctx, &self.data_dir)?;
        }
        Ok(())
    }

    fn measure_2d(&mut self) -> Result<(), CdtError> {
        let mut ctx = MeasureContext {
            rng: &mut self.rng,
            scratch: &mut self.scratch,
            target2_volume: self.target2_volume,
        };
        for obs in &mut self.observables2d {
            observable::measure(obs.as_mut(), &self.universe, &mut ctx, &self.data_dir)?;
        }
        Ok(())
    }

    /// Attempts moves until the fixed volume matches the target exactly.
    fn settle_at_target_volume(&mut self) {
        while self.fix_volume() != self.target_volume {
            self.attempt_move();
        }
    }

    /// Attempts moves until some slice holds exactly the 2-d target volume.
    fn settle_at_target2_volume(&mut self) {
        loop {
            if self
                .universe
                .slice_sizes
                .iter()
                .any(|&s| s == self.target2_volume)
            {
                return;
            }
            self.attempt_move();
        }
    }

    /// Runs the full thermalization and measurement schedule.
    pub fn start(&mut self) -> Result<(), CdtError> {
        for obs in &mut self.observables3d {
            observable::clear(obs.as_mut(), &self.data_dir)?;
        }
        for obs in &mut self.observables2d {
            observable::clear(obs.as_mut(), &self.data_dir)?;
        }

        println!(
            "k0: {}, k3: {}, epsilon: {}, thermal: {}, sweeps: {}, target: {}, target2d: {}",
            self.k0,
            self.k3,
            self.epsilon,
            self.thermal_sweeps,
            self.measure_sweeps,
            self.target_volume,
            self.target2_volume
        );

        for i in 0..self.thermal_sweeps {
            println!(
                "thermal {}: volume {}, avg slice {}, k3 {:.6}",
                i,
                self.universe.tetra_count(),
                self.average_slice_size(),
                self.k3
            );

            self.perform_sweep(self.ksteps * 1000);
            self.tune();

            if i % 10 == 0 {
                self.universe.export_geometry(&self.out_file)?;
            }
            self.prepare();
            self.measure_3d()?;
        }

        for i in 0..self.measure_sweeps {
            println!(
                "sweep {}: volume {}, avg slice {}, target {}, target2d {}",
                i,
                self.universe.tetra_count(),
                self.average_slice_size(),
                self.target_volume,
                self.target2_volume
            );

            self.perform_sweep(self.ksteps * 1000);

            if i % 10 == 0 {
                self.universe.export_geometry(&self.out_file)?;
            }

            if self.target_volume > 0 {
                self.settle_at_target_volume();
            }
            self.prepare();
            self.measure_3d()?;

            if self.target2_volume > 0 {
                self.settle_at_target2_volume();
                self.prepare();
                self.measure_2d()?;
            }
        }

        Ok(())
    }
}
