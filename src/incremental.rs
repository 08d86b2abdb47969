use log::debug;
use serde::{Deserialize, Serialize};

use crate::network::{fires, Network};
use crate::params::RunParams;
use crate::simulator::{self, Simulator};
use crate::state::StateVector;

/// Revisits only the targets of the previous step's flips and stops at a fixed point.
#[derive(Debug, Clone, Default)]
pub struct IncrementalSimulator {
    trace_every: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Steps actually evaluated.
    pub steps_executed: usize,
    /// First step that changed no neuron, if reached.
    pub fixed_point_step: Option<usize>,
    /// Total number of individual state flips.
    pub flip_count: usize,
    /// Accumulator updates after the first step, one per (edge, flip) event.
    pub signal_updates: usize,
}

impl IncrementalSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params(run_params: &RunParams) -> Self {
        Self {
            trace_every: run_params.trace_every,
        }
    }

    pub fn run_with_stats(&self, network: &Network, num_steps: usize) -> (StateVector, RunStats) {
        let mut run = IncrementalRun::new(network);
        let mut stats = RunStats::default();

        for t in 1..=num_steps {
            if t == 1 {
                run.evaluate_all();
            } else {
                stats.signal_updates += run.propagate_changes();
            }
            run.apply_flips();

            stats.steps_executed = t;
            stats.flip_count += run.changed.len();
            simulator::trace_step(self.name(), self.trace_every, t, &run.states);

            if run.changed.is_empty() {
                stats.fixed_point_step = Some(t);
                debug!("incremental: fixed point reached at step {}", t);
                break;
            }
        }

        debug!(
            "incremental: {} neurons, {} edges, {} of {} steps evaluated, {} flips",
            network.num_neurons(),
            network.num_edges(),
            stats.steps_executed,
            num_steps,
            stats.flip_count
        );

        (StateVector::from(run.states), stats)
    }
}

impl Simulator for IncrementalSimulator {
    fn name(&self) -> &'static str {
        "incremental"
    }

    fn run(&self, network: &Network, num_steps: usize) -> StateVector {
        self.run_with_stats(network, num_steps).0
    }
}

pub fn run(network: &Network, num_steps: usize) -> StateVector {
    IncrementalSimulator::new().run(network, num_steps)
}

/// Mutable state of one incremental run.
struct IncrementalRun<'a> {
    network: &'a Network,
    states: Vec<bool>,
    signals: Vec<f64>,
    /// Neurons that flipped on the last applied step.
    changed: Vec<usize>,
    /// Targets whose signal may have moved, to be re-evaluated this step.
    dirty: Vec<usize>,
    is_dirty: Vec<bool>,
}

impl<'a> IncrementalRun<'a> {
    fn new(network: &'a Network) -> Self {
        let num_neurons = network.num_neurons();

        Self {
            network,
            states: network.initial_states().to_vec(),
            signals: vec![0.0; num_neurons],
            changed: Vec::new(),
            dirty: Vec::with_capacity(num_neurons),
            is_dirty: vec![false; num_neurons],
        }
    }

    /// First step: every neuron is evaluated against its full signal.
    fn evaluate_all(&mut self) {
        for nid in 0..self.network.num_neurons() {
            self.signals[nid] = self.network.incoming_signal(nid, &self.states);
        }

        self.changed.clear();
        for nid in 0..self.network.num_neurons() {
            if fires(self.signals[nid], self.network.threshold(nid)) != self.states[nid] {
                self.changed.push(nid);
            }
        }
    }

    /// Brings the signals of all targets of the last flips up to date and collects the
    /// targets that flip on this step. Returns the number of accumulator updates.
    fn propagate_changes(&mut self) -> usize {
        let exact = self.network.has_exact_signals();
        let mut signal_updates = 0;

        for &source in &self.changed {
            let delta_sign = if self.states[source] { 1.0 } else { -1.0 };

            for (target, weight) in self.network.outgoing(source) {
                if exact {
                    self.signals[target] += delta_sign * weight;
                }
                signal_updates += 1;

                if !self.is_dirty[target] {
                    self.is_dirty[target] = true;
                    self.dirty.push(target);
                }
            }
        }

        if !exact {
            for &target in &self.dirty {
                self.signals[target] = self.network.incoming_signal(target, &self.states);
            }
        }

        self.changed.clear();
        for &target in &self.dirty {
            self.is_dirty[target] = false;
            if fires(self.signals[target], self.network.threshold(target)) != self.states[target]
            {
                self.changed.push(target);
            }
        }
        self.dirty.clear();

        signal_updates
    }

    fn apply_flips(&mut self) {
        for &nid in &self.changed {
            self.states[nid] = !self.states[nid];
        }
    }
}
