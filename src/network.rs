use serde::{Deserialize, Serialize};
use simple_error::SimpleError;

use crate::params::NumericDomain;

/// Error raised when a network description is malformed.
pub type FormatError = SimpleError;

/// Largest magnitude up to which every integer is exactly representable as `f64`.
pub(crate) const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Activation rule shared by all simulators.
#[inline]
pub fn fires(signal: f64, threshold: f64) -> bool {
    signal >= threshold
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

impl Edge {
    pub fn new(source: usize, target: usize, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    pub fn unweighted(source: usize, target: usize) -> Self {
        Self::new(source, target, 1.0)
    }
}

/// Adjacency grouped by one endpoint, in compressed row form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Adjacency {
    offsets: Vec<usize>,
    neighbors: Vec<usize>,
    weights: Vec<f64>,
}

impl Adjacency {
    /// Groups `edges` by `key`, keeping input order inside each group.
    fn group_by(
        num_neurons: usize,
        edges: &[Edge],
        key: impl Fn(&Edge) -> usize,
        neighbor: impl Fn(&Edge) -> usize,
    ) -> Self {
        let mut offsets = vec![0; num_neurons + 1];
        for edge in edges {
            offsets[key(edge) + 1] += 1;
        }
        for idx in 0..num_neurons {
            offsets[idx + 1] += offsets[idx];
        }

        let mut cursor = offsets.clone();
        let mut neighbors = vec![0; edges.len()];
        let mut weights = vec![0.0; edges.len()];

        for edge in edges {
            let slot = &mut cursor[key(edge)];
            neighbors[*slot] = neighbor(edge);
            weights[*slot] = edge.weight;
            *slot += 1;
        }

        Self {
            offsets,
            neighbors,
            weights,
        }
    }

    fn get(&self, nid: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.offsets[nid]..self.offsets[nid + 1];
        self.neighbors[range.clone()]
            .iter()
            .copied()
            .zip(self.weights[range].iter().copied())
    }

    fn degree(&self, nid: usize) -> usize {
        self.offsets[nid + 1] - self.offsets[nid]
    }
}

/// Immutable threshold network: neurons, thresholds and weighted directed edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    initial_states: Vec<bool>,
    thresholds: Vec<f64>,
    incoming: Adjacency,
    outgoing: Adjacency,
    exact_signals: bool,
}

impl Network {
    pub fn build(
        num_neurons: usize,
        initial_states: Vec<bool>,
        thresholds: Vec<f64>,
        edges: Vec<Edge>,
    ) -> Result<Self, FormatError> {
        Self::build_with(
            num_neurons,
            initial_states,
            thresholds,
            edges,
            NumericDomain::Real,
        )
    }

    pub fn build_with(
        num_neurons: usize,
        initial_states: Vec<bool>,
        thresholds: Vec<f64>,
        edges: Vec<Edge>,
        numeric_domain: NumericDomain,
    ) -> Result<Self, FormatError> {
        if initial_states.len() != num_neurons {
            return Err(SimpleError::new(format!(
                "expected {} initial states, got {}",
                num_neurons,
                initial_states.len()
            )));
        }

        if thresholds.len() != num_neurons {
            return Err(SimpleError::new(format!(
                "expected {} thresholds, got {}",
                num_neurons,
                thresholds.len()
            )));
        }

        for (nid, threshold) in thresholds.iter().enumerate() {
            validate_number(*threshold, numeric_domain)
                .map_err(|msg| SimpleError::new(format!("threshold of neuron {}: {}", nid, msg)))?;
        }

        for (idx, edge) in edges.iter().enumerate() {
            if edge.source >= num_neurons || edge.target >= num_neurons {
                return Err(SimpleError::new(format!(
                    "edge {} ({} -> {}) references a neuron outside 0..{}",
                    idx, edge.source, edge.target, num_neurons
                )));
            }

            validate_number(edge.weight, numeric_domain)
                .map_err(|msg| SimpleError::new(format!("weight of edge {}: {}", idx, msg)))?;
        }

        let exact_signals = edges.iter().all(|edge| edge.weight.fract() == 0.0)
            && edges.iter().map(|edge| edge.weight.abs()).sum::<f64>() <= MAX_EXACT_INTEGER;

        Ok(Self {
            incoming: Adjacency::group_by(num_neurons, &edges, |e| e.target, |e| e.source),
            outgoing: Adjacency::group_by(num_neurons, &edges, |e| e.source, |e| e.target),
            initial_states,
            thresholds,
            exact_signals,
        })
    }

    pub fn num_neurons(&self) -> usize {
        self.initial_states.len()
    }

    pub fn num_edges(&self) -> usize {
        self.incoming.neighbors.len()
    }

    pub fn initial_states(&self) -> &[bool] {
        &self.initial_states
    }

    pub fn threshold(&self, nid: usize) -> f64 {
        self.thresholds[nid]
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// `(source, weight)` pairs of the edges ending at `nid`, in input order.
    pub fn incoming(&self, nid: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.incoming.get(nid)
    }

    /// `(target, weight)` pairs of the edges starting at `nid`, in input order.
    pub fn outgoing(&self, nid: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.outgoing.get(nid)
    }

    pub fn in_degree(&self, nid: usize) -> usize {
        self.incoming.degree(nid)
    }

    pub fn out_degree(&self, nid: usize) -> usize {
        self.outgoing.degree(nid)
    }

    /// Edge list grouped by source.
    pub fn edges(&self) -> Vec<Edge> {
        (0..self.num_neurons())
            .flat_map(move |source| {
                self.outgoing(source)
                    .map(move |(target, weight)| Edge::new(source, target, weight))
            })
            .collect()
    }

    /// True if signals can be updated by adding and subtracting weights without rounding.
    pub fn has_exact_signals(&self) -> bool {
        self.exact_signals
    }

    /// Sum of the weights from active predecessors of `nid`, accumulated in incoming order.
    pub fn incoming_signal(&self, nid: usize, states: &[bool]) -> f64 {
        let mut signal = 0.0;
        for (source, weight) in self.incoming(nid) {
            if states[source] {
                signal += weight;
            }
        }
        signal
    }
}

fn validate_number(value: f64, numeric_domain: NumericDomain) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("must be finite");
    }

    if numeric_domain == NumericDomain::Integer && value.fract() != 0.0 {
        return Err("must be an integer");
    }

    Ok(())
}
