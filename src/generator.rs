use log::debug;
use rand::distributions::{Bernoulli, Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simple_error::{try_with, SimpleResult};

use crate::network::{Edge, Network};
use crate::params::{self, GeneratorParams, NumericDomain, Topology};
use crate::types::{EdgeKey, HashSet};

/// Generates a network and returns it with the configured step count.
///
/// Thresholds and weights are drawn uniformly from the closed ranges in `generator_params`.
/// Excluded self-loops and parallel edges are redrawn from the same seeded generator.
pub fn generate(generator_params: &GeneratorParams) -> SimpleResult<(Network, usize)> {
    try_with!(
        params::validate_generator_params(generator_params),
        "invalid generator parameters"
    );

    let seed = generator_params.seed.unwrap_or(0);
    let mut rng = StdRng::seed_from_u64(seed);

    let num_neurons = generator_params.num_neurons;
    let numeric_domain = generator_params.numeric_domain;

    let active_dist = try_with!(
        Bernoulli::new(generator_params.active_probability),
        "invalid active probability"
    );

    let initial_states: Vec<bool> = (0..num_neurons)
        .map(|_| active_dist.sample(&mut rng))
        .collect();

    let thresholds: Vec<f64> = (0..num_neurons)
        .map(|_| sample_in(generator_params.threshold_range, numeric_domain, &mut rng))
        .collect();

    let edges = sample_edges(generator_params, &mut rng);

    debug!(
        "generated {} neurons ({} active), {} edges with seed {}",
        num_neurons,
        initial_states.iter().filter(|active| **active).count(),
        edges.len(),
        seed
    );

    let network = try_with!(
        Network::build_with(num_neurons, initial_states, thresholds, edges, numeric_domain),
        "generated network is malformed"
    );

    Ok((network, generator_params.num_steps))
}

fn sample_edges<R: Rng>(generator_params: &GeneratorParams, rng: &mut R) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(generator_params.num_edges);
    if generator_params.num_edges == 0 {
        return edges;
    }

    let nid_dist = Uniform::new(0, generator_params.num_neurons);
    let mut seen: HashSet<EdgeKey> = HashSet::default();

    for k in 0..generator_params.num_edges {
        let (source, target) = loop {
            let source = match generator_params.topology {
                Topology::Random => nid_dist.sample(rng),
                Topology::FixedOutDegree => k % generator_params.num_neurons,
            };
            let target = nid_dist.sample(rng);

            if !generator_params.allow_self_loops && source == target {
                continue;
            }

            if !generator_params.allow_duplicate_edges && !seen.insert((source, target)) {
                continue;
            }

            break (source, target);
        };

        let weight = sample_in(
            generator_params.weight_range,
            generator_params.numeric_domain,
            rng,
        );
        edges.push(Edge::new(source, target, weight));
    }

    edges
}

fn sample_in<R: Rng>(range: (f64, f64), numeric_domain: NumericDomain, rng: &mut R) -> f64 {
    match numeric_domain {
        NumericDomain::Real => rng.gen_range(range.0..=range.1),
        NumericDomain::Integer => {
            let low = range.0.ceil() as i64;
            let high = range.1.floor() as i64;
            rng.gen_range(low..=high) as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_util;

    #[test]
    fn dimensions() {
        let params = test_util::get_template_generator_params();
        let (network, num_steps) = generate(&params).unwrap();

        assert_eq!(network.num_neurons(), params.num_neurons);
        assert_eq!(network.num_edges(), params.num_edges);
        assert_eq!(num_steps, params.num_steps);
    }

    #[test]
    fn same_seed_same_network() {
        let mut params = test_util::get_template_generator_params();
        params.seed = Some(7);

        let (first, _) = generate(&params).unwrap();
        let (second, _) = generate(&params).unwrap();
        assert_eq!(first, second);

        params.seed = Some(8);
        let (third, _) = generate(&params).unwrap();
        assert_ne!(first, third);
    }

    #[test]
    fn missing_seed_defaults_to_zero() {
        let mut params = test_util::get_template_generator_params();
        params.seed = None;
        let (unseeded, _) = generate(&params).unwrap();

        params.seed = Some(0);
        let (seeded, _) = generate(&params).unwrap();
        assert_eq!(unseeded, seeded);
    }

    #[test]
    fn values_within_ranges() {
        let mut params = test_util::get_template_generator_params();
        params.threshold_range = (-1.0, 2.0);
        params.weight_range = (-0.5, 0.5);
        let (network, _) = generate(&params).unwrap();

        assert!(network
            .thresholds()
            .iter()
            .all(|threshold| (-1.0..=2.0).contains(threshold)));
        assert!(network
            .edges()
            .iter()
            .all(|edge| (-0.5..=0.5).contains(&edge.weight)));
    }

    #[test]
    fn integer_domain_yields_exact_signals() {
        let mut params = test_util::get_template_generator_params();
        params.numeric_domain = NumericDomain::Integer;
        params.threshold_range = (-1.0, 2.0);
        params.weight_range = (-2.5, 3.5);
        let (network, _) = generate(&params).unwrap();

        assert!(network.has_exact_signals());
        assert!(network
            .edges()
            .iter()
            .all(|edge| edge.weight.fract() == 0.0 && (-2.0..=3.0).contains(&edge.weight)));
    }

    #[test]
    fn exclusions_are_honoured() {
        let mut params = test_util::get_template_generator_params();
        params.num_neurons = 6;
        params.num_edges = 30;
        params.allow_self_loops = false;
        params.allow_duplicate_edges = false;
        let (network, _) = generate(&params).unwrap();

        let edges = network.edges();
        assert_eq!(edges.len(), 30);
        assert!(edges.iter().all(|edge| edge.source != edge.target));

        let distinct: HashSet<EdgeKey> = edges
            .iter()
            .map(|edge| (edge.source, edge.target))
            .collect();
        assert_eq!(distinct.len(), 30);
    }

    #[test]
    fn fixed_out_degree() {
        let mut params = test_util::get_template_generator_params();
        params.num_neurons = 10;
        params.num_edges = 30;
        params.topology = Topology::FixedOutDegree;
        let (network, _) = generate(&params).unwrap();

        for nid in 0..10 {
            assert_eq!(network.out_degree(nid), 3);
        }
    }

    #[test]
    fn activity_probability_extremes() {
        let mut params = test_util::get_template_generator_params();
        params.active_probability = 0.0;
        let (network, _) = generate(&params).unwrap();
        assert!(network.initial_states().iter().all(|active| !active));

        params.active_probability = 1.0;
        let (network, _) = generate(&params).unwrap();
        assert!(network.initial_states().iter().all(|active| *active));
    }

    #[test]
    fn generated_networks_simulate_consistently() {
        let mut params = test_util::get_template_generator_params();
        params.weight_range = (-0.5, 1.0);

        for seed in 0..5 {
            params.seed = Some(seed);
            let (network, num_steps) = generate(&params).unwrap();
            test_util::assert_simulators_agree(&network, num_steps);
        }

        params.numeric_domain = NumericDomain::Integer;
        params.threshold_range = (0.0, 2.0);
        params.weight_range = (-1.0, 2.0);
        let (network, num_steps) = generate(&params).unwrap();
        test_util::assert_simulators_agree(&network, num_steps);
    }

    #[test]
    fn extreme_ranges_rejected() {
        let mut params = test_util::get_template_generator_params();
        params.weight_range = (-1e308, 1e308);
        assert!(generate(&params).is_err());

        let mut params = test_util::get_template_generator_params();
        params.numeric_domain = NumericDomain::Integer;
        params.threshold_range = (1e20, 1e20);
        assert!(generate(&params).is_err());
    }

    #[test]
    fn degenerate_range_yields_bound() {
        let mut params = test_util::get_template_generator_params();
        params.threshold_range = (0.5, 0.5);
        let (network, _) = generate(&params).unwrap();

        assert!(network.thresholds().iter().all(|threshold| *threshold == 0.5));
    }

    #[test]
    fn invalid_params_rejected() {
        let mut params = test_util::get_template_generator_params();
        params.weight_range = (1.0, 0.0);
        let result = generate(&params);

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .as_str()
            .starts_with("invalid generator parameters"));
    }
}
