use boolnet::params::GeneratorParams;

/// Large sparse demo instance: 3 outgoing edges per neuron, 1% initially active.
pub fn get_scenario_params() -> GeneratorParams {
    let params_yaml_str = r#"
num_neurons: 200000
num_edges: 600000
num_steps: 1500
seed: 42
active_probability: 0.01
threshold_range: [0.5, 0.5]
weight_range: [0.0, 1.0]
numeric_domain: Real
topology: FixedOutDegree
allow_self_loops: true
allow_duplicate_edges: true
"#;

    serde_yaml::from_str(params_yaml_str).unwrap()
}
