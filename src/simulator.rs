use itertools::Itertools;
use log::{log_enabled, trace, Level};

use crate::network::Network;
use crate::state::StateVector;

/// A simulation engine mapping a network and a step count to the final state.
pub trait Simulator {
    fn name(&self) -> &'static str;

    fn run(&self, network: &Network, num_steps: usize) -> StateVector;
}

pub(crate) fn is_traced_step(trace_every: Option<usize>, t: usize) -> bool {
    match trace_every {
        Some(every) if every > 0 => t % every == 0,
        _ => false,
    }
}

pub(crate) fn trace_step(engine: &str, trace_every: Option<usize>, t: usize, states: &[bool]) {
    if is_traced_step(trace_every, t) && log_enabled!(Level::Trace) {
        trace!(
            "{} step {:>4}: {}",
            engine,
            t,
            states.iter().map(|active| *active as u8).join(" ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::assert_equal;

    #[test]
    fn traced_steps_every_k() {
        assert_equal(
            (1..=10).filter(|t| is_traced_step(Some(3), *t)),
            [3, 6, 9],
        );
        assert_equal((1..=4).filter(|t| is_traced_step(Some(1), *t)), 1..=4);
    }

    #[test]
    fn tracing_disabled() {
        assert!((1..=10).all(|t| !is_traced_step(None, t)));
        assert!((1..=10).all(|t| !is_traced_step(Some(0), t)));
    }
}
