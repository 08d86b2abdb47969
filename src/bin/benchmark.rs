use boolnet::direct::DirectSimulator;
use boolnet::generator;
use boolnet::harness::timed_run;
use boolnet::incremental::IncrementalSimulator;

#[path = "../scenario_params.rs"]
mod scenario_params;

fn main() {
    let (network, num_steps) =
        generator::generate(&scenario_params::get_scenario_params()).unwrap();

    let (base, base_time) = timed_run(&DirectSimulator::new(), &network, num_steps);

    let fast_simulator = IncrementalSimulator::new();
    let (_, stats) = fast_simulator.run_with_stats(&network, num_steps);
    let (fast, fast_time) = timed_run(&fast_simulator, &network, num_steps);

    let edge_visits = network.num_edges() as f64 * num_steps as f64;
    let base_throughput = edge_visits / base_time.as_secs_f64();

    eprintln!(
        "Instance: {} neurons, {} edges, {} steps",
        network.num_neurons(),
        network.num_edges(),
        num_steps
    );
    eprintln!(
        "Baseline: {:.3}s ({:.3} ns per edge visit)",
        base_time.as_secs_f64(),
        1e9 / base_throughput
    );
    eprintln!(
        "Fast: {:.3}s ({} steps evaluated, fixed point: {:?}, {} flips, {} signal updates)",
        fast_time.as_secs_f64(),
        stats.steps_executed,
        stats.fixed_point_step,
        stats.flip_count,
        stats.signal_updates
    );
    eprintln!(
        "Speedup: {:.1}x",
        base_time.as_secs_f64() / fast_time.as_secs_f64().max(1e-9)
    );
    eprintln!("Match: {}", base == fast);
}
