use log::debug;

use crate::network::{fires, Network};
use crate::params::RunParams;
use crate::simulator::{self, Simulator};
use crate::state::StateVector;

#[derive(Debug, Clone, Default)]
pub struct DirectSimulator {
    trace_every: Option<usize>,
}

impl DirectSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params(run_params: &RunParams) -> Self {
        Self {
            trace_every: run_params.trace_every,
        }
    }
}

impl Simulator for DirectSimulator {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn run(&self, network: &Network, num_steps: usize) -> StateVector {
        let mut current = network.initial_states().to_vec();
        let mut next = vec![false; network.num_neurons()];

        for t in 1..=num_steps {
            step(network, &current, &mut next);
            std::mem::swap(&mut current, &mut next);
            simulator::trace_step(self.name(), self.trace_every, t, &current);
        }

        debug!(
            "direct: {} neurons, {} edges, {} steps",
            network.num_neurons(),
            network.num_edges(),
            num_steps
        );

        StateVector::from(current)
    }
}

pub fn run(network: &Network, num_steps: usize) -> StateVector {
    DirectSimulator::new().run(network, num_steps)
}

/// Computes the synchronous successor of `current` into `next`.
pub fn step(network: &Network, current: &[bool], next: &mut [bool]) {
    for (nid, next_state) in next.iter_mut().enumerate() {
        *next_state = fires(network.incoming_signal(nid, current), network.threshold(nid));
    }
}
