use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::direct::DirectSimulator;
use crate::incremental::IncrementalSimulator;
use crate::network::Network;
use crate::params::RunParams;
use crate::simulator::Simulator;
use crate::state::StateVector;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    pub base: StateVector,
    pub fast: StateVector,
    pub matches: bool,
    pub base_duration: Duration,
    pub fast_duration: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub num_neurons: usize,
    pub num_edges: usize,
    pub num_steps: usize,
    pub base_duration: Duration,
    pub fast_duration: Duration,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepSummary {
    pub instances: usize,
    /// Positions (in sweep order) of the instances whose results disagreed.
    pub mismatches: Vec<usize>,
}

impl SweepSummary {
    pub fn all_match(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Runs `simulator`, timing only the simulation itself.
pub fn timed_run(
    simulator: &impl Simulator,
    network: &Network,
    num_steps: usize,
) -> (StateVector, Duration) {
    let wall_start = Instant::now();
    let states = simulator.run(network, num_steps);
    (states, wall_start.elapsed())
}

/// Runs the direct and incremental simulators on `network` and compares their final states.
///
/// A mismatch is reported through [`Verification::matches`], never as an error.
pub fn verify(network: &Network, num_steps: usize, run_params: &RunParams) -> Verification {
    verify_with(
        &DirectSimulator::from_params(run_params),
        &IncrementalSimulator::from_params(run_params),
        network,
        num_steps,
    )
}

pub fn verify_with(
    base_simulator: &impl Simulator,
    fast_simulator: &impl Simulator,
    network: &Network,
    num_steps: usize,
) -> Verification {
    let (base, base_duration) = timed_run(base_simulator, network, num_steps);
    let (fast, fast_duration) = timed_run(fast_simulator, network, num_steps);

    let matches = base == fast;
    if !matches {
        let diverging: Vec<usize> = base.diff(&fast).take(10).collect();
        warn!(
            "{} and {} disagree after {} steps, first diverging neurons: {:?}",
            base_simulator.name(),
            fast_simulator.name(),
            num_steps,
            diverging
        );
    }

    debug!(
        "verify: {} {:.6}s, {} {:.6}s, match {}",
        base_simulator.name(),
        base_duration.as_secs_f64(),
        fast_simulator.name(),
        fast_duration.as_secs_f64(),
        matches
    );

    Verification {
        base,
        fast,
        matches,
        base_duration,
        fast_duration,
    }
}

/// Times both simulators on `network` without cross-checking their results.
pub fn benchmark(network: &Network, num_steps: usize, run_params: &RunParams) -> BenchmarkReport {
    let (_, base_duration) =
        timed_run(&DirectSimulator::from_params(run_params), network, num_steps);
    let (_, fast_duration) = timed_run(
        &IncrementalSimulator::from_params(run_params),
        network,
        num_steps,
    );

    BenchmarkReport {
        num_neurons: network.num_neurons(),
        num_edges: network.num_edges(),
        num_steps,
        base_duration,
        fast_duration,
    }
}

/// Verifies every instance, continuing past mismatches.
pub fn sweep<'a>(
    instances: impl IntoIterator<Item = (&'a Network, usize)>,
    run_params: &RunParams,
) -> SweepSummary {
    let mut summary = SweepSummary::default();

    for (position, (network, num_steps)) in instances.into_iter().enumerate() {
        summary.instances += 1;
        if !verify(network, num_steps, run_params).matches {
            summary.mismatches.push(position);
        }
    }

    summary
}
