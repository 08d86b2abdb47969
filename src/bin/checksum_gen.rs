use boolnet::generator;
use boolnet::harness;
use boolnet::incremental::IncrementalSimulator;
use boolnet::params::{GeneratorParams, NumericDomain, RunParams, Topology};

fn sweep_params(seed: u64) -> GeneratorParams {
    let integral = seed % 2 == 1;

    GeneratorParams {
        num_neurons: 500,
        num_edges: 2000,
        num_steps: 300,
        seed: Some(seed),
        active_probability: 0.05,
        threshold_range: if integral { (0.0, 3.0) } else { (0.2, 1.5) },
        weight_range: if integral { (-2.0, 3.0) } else { (-0.5, 1.0) },
        numeric_domain: if integral {
            NumericDomain::Integer
        } else {
            NumericDomain::Real
        },
        topology: if seed % 3 == 0 {
            Topology::FixedOutDegree
        } else {
            Topology::Random
        },
        allow_self_loops: seed % 4 != 0,
        allow_duplicate_edges: seed % 5 != 0,
    }
}

fn main() {
    let num_instances = 50;
    let instances: Vec<_> = (0..num_instances)
        .map(|seed| generator::generate(&sweep_params(seed)).unwrap())
        .collect();

    let mut state_checksum = 0;
    let mut flip_checksum = 0;
    let mut fixed_point_count = 0;

    for (t, (network, num_steps)) in instances.iter().enumerate() {
        let (states, stats) = IncrementalSimulator::new().run_with_stats(network, *num_steps);

        for nid in states.active_nids() {
            state_checksum += (t + 1) * nid;
        }

        flip_checksum += stats.flip_count;
        if stats.fixed_point_step.is_some() {
            fixed_point_count += 1;
        }
    }

    let summary = harness::sweep(
        instances
            .iter()
            .map(|(network, num_steps)| (network, *num_steps)),
        &RunParams::default(),
    );

    println!("sweep result:");
    println!("...instances: {}", summary.instances);
    println!("...mismatches: {:?}", summary.mismatches);
    println!("...state checksum: {}", state_checksum);
    println!("...flip checksum: {}", flip_checksum);
    println!("...instances at fixed point: {}", fixed_point_count);
}
