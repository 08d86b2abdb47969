use serde::{Deserialize, Serialize};
use simple_error::SimpleError;

use crate::network::MAX_EXACT_INTEGER;

/// Numbers accepted for weights and thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericDomain {
    Real,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// Source and target drawn uniformly.
    Random,
    /// Source of the k-th edge is `k mod num_neurons`, target drawn uniformly.
    FixedOutDegree,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunParams {
    /// Log the state after every `trace_every`-th step (at trace level).
    pub trace_every: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputParams {
    pub index_base: usize,
    pub numeric_domain: NumericDomain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorParams {
    pub num_neurons: usize,
    pub num_edges: usize,
    pub num_steps: usize,
    pub seed: Option<u64>,
    pub active_probability: f64,
    pub threshold_range: (f64, f64),
    pub weight_range: (f64, f64),
    pub numeric_domain: NumericDomain,
    pub topology: Topology,
    pub allow_self_loops: bool,
    pub allow_duplicate_edges: bool,
}

impl Default for RunParams {
    fn default() -> Self {
        Self { trace_every: None }
    }
}

impl Default for InputParams {
    fn default() -> Self {
        Self {
            index_base: 1,
            numeric_domain: NumericDomain::Real,
        }
    }
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            num_neurons: 100,
            num_edges: 300,
            num_steps: 100,
            seed: None,
            active_probability: 0.1,
            threshold_range: (0.5, 0.5),
            weight_range: (0.0, 1.0),
            numeric_domain: NumericDomain::Real,
            topology: Topology::Random,
            allow_self_loops: true,
            allow_duplicate_edges: true,
        }
    }
}

impl GeneratorParams {
    pub fn with_size(num_neurons: usize, num_edges: usize, num_steps: usize) -> Self {
        Self {
            num_neurons,
            num_edges,
            num_steps,
            ..Self::default()
        }
    }

    /// Number of distinct ordered pairs the generator may draw from.
    pub fn num_candidate_pairs(&self) -> u128 {
        let num_neurons = self.num_neurons as u128;
        if self.allow_self_loops {
            num_neurons * num_neurons
        } else {
            num_neurons * num_neurons.saturating_sub(1)
        }
    }
}

pub fn validate_run_params(run_params: &RunParams) -> Result<(), SimpleError> {
    if run_params.trace_every == Some(0) {
        return Err(SimpleError::new("trace_every must be strictly positive"));
    }

    Ok(())
}

pub fn validate_input_params(input_params: &InputParams) -> Result<(), SimpleError> {
    if input_params.index_base > 1 {
        return Err(SimpleError::new("index_base must be 0 or 1"));
    }

    Ok(())
}

pub fn validate_generator_params(generator_params: &GeneratorParams) -> Result<(), SimpleError> {
    if !(0.0..=1.0).contains(&generator_params.active_probability) {
        return Err(SimpleError::new("active_probability must be in [0, 1]"));
    }

    validate_range("threshold_range", generator_params.threshold_range)?;
    validate_range("weight_range", generator_params.weight_range)?;

    if generator_params.numeric_domain == NumericDomain::Integer {
        validate_integer_range("threshold_range", generator_params.threshold_range)?;
        validate_integer_range("weight_range", generator_params.weight_range)?;
    }

    if generator_params.num_edges == 0 {
        return Ok(());
    }

    if generator_params.num_neurons == 0 {
        return Err(SimpleError::new(
            "num_neurons must be strictly positive when num_edges is non-zero",
        ));
    }

    if !generator_params.allow_self_loops && generator_params.num_neurons == 1 {
        return Err(SimpleError::new(
            "a single neuron admits no edges when self-loops are excluded",
        ));
    }

    if !generator_params.allow_duplicate_edges
        && generator_params.num_edges as u128 > generator_params.num_candidate_pairs()
    {
        return Err(SimpleError::new(format!(
            "num_edges {} exceeds the {} distinct pairs available",
            generator_params.num_edges,
            generator_params.num_candidate_pairs()
        )));
    }

    Ok(())
}

fn validate_range(name: &str, range: (f64, f64)) -> Result<(), SimpleError> {
    if !range.0.is_finite() || !range.1.is_finite() {
        return Err(SimpleError::new(format!("{}: bounds must be finite", name)));
    }

    if range.0 > range.1 {
        return Err(SimpleError::new(format!(
            "{}: lower bound must not be greater than upper bound",
            name
        )));
    }

    if !(range.1 - range.0).is_finite() {
        return Err(SimpleError::new(format!("{}: width must be finite", name)));
    }

    Ok(())
}

fn validate_integer_range(name: &str, range: (f64, f64)) -> Result<(), SimpleError> {
    if range.0.abs() > MAX_EXACT_INTEGER || range.1.abs() > MAX_EXACT_INTEGER {
        return Err(SimpleError::new(format!(
            "{}: integer bounds must not exceed 2^53 in magnitude",
            name
        )));
    }

    if range.0.ceil() > range.1.floor() {
        return Err(SimpleError::new(format!(
            "{}: range contains no integer",
            name
        )));
    }

    Ok(())
}
