use std::error::Error;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use boolnet::direct::DirectSimulator;
use boolnet::generator;
use boolnet::harness;
use boolnet::incremental::IncrementalSimulator;
use boolnet::input::{self, Instance};
use boolnet::params::{
    self, GeneratorParams, InputParams, NumericDomain, RunParams, Topology,
};
use boolnet::report;
use boolnet::simulator::Simulator;
use clap::{Args, Parser, Subcommand};
use log::{debug, error, info};

#[path = "../scenario_params.rs"]
mod scenario_params;

#[derive(Parser, Debug)]
#[command(
    name = "boolnet",
    version,
    about = "Boolean threshold network simulator",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate with the direct simulator and print the final state
    Run(InstanceArgs),
    /// Simulate with the incremental simulator and print the final state
    RunFast(InstanceArgs),
    /// Run both simulators, compare the results and time them
    Verify {
        #[command(flatten)]
        instance: InstanceArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Time both simulators on a generated instance (defaults to the demo scenario)
    Bench {
        #[command(flatten)]
        generator: GeneratorArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a generated instance in the text input format
    Generate(GeneratorArgs),
}

#[derive(Args, Debug)]
struct InstanceArgs {
    /// Instance file, standard input if omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Neuron ids in edge lines start at 0 instead of 1
    #[arg(long)]
    zero_based: bool,

    /// Reject non-integral thresholds and weights
    #[arg(long)]
    integral: bool,

    /// Log the state every K steps (visible with -vv)
    #[arg(long, value_name = "K")]
    trace_every: Option<usize>,
}

#[derive(Args, Debug)]
struct GeneratorArgs {
    #[arg(long)]
    neurons: Option<usize>,

    #[arg(long)]
    edges: Option<usize>,

    #[arg(long)]
    steps: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Draw sources uniformly instead of giving every neuron the same out-degree
    #[arg(long)]
    uniform_sources: bool,

    /// Exclude self-loops and parallel edges
    #[arg(long)]
    simple: bool,

    /// Draw integral thresholds and weights
    #[arg(long)]
    integral: bool,
}

impl InstanceArgs {
    fn input_params(&self) -> InputParams {
        InputParams {
            index_base: if self.zero_based { 0 } else { 1 },
            numeric_domain: if self.integral {
                NumericDomain::Integer
            } else {
                NumericDomain::Real
            },
        }
    }

    fn run_params(&self) -> RunParams {
        RunParams {
            trace_every: self.trace_every,
        }
    }

    fn load(&self) -> Result<Instance, Box<dyn Error>> {
        let input_params = self.input_params();
        let instance = match &self.input {
            Some(path) => {
                info!("reading instance from {}", path.display());
                input::read_instance(File::open(path)?, &input_params)?
            }
            None => input::read_instance(io::stdin().lock(), &input_params)?,
        };

        debug!(
            "instance: {} neurons, {} edges, {} steps",
            instance.network.num_neurons(),
            instance.network.num_edges(),
            instance.num_steps
        );

        Ok(instance)
    }
}

impl GeneratorArgs {
    fn generator_params(&self) -> GeneratorParams {
        let mut generator_params = scenario_params::get_scenario_params();

        if let Some(neurons) = self.neurons {
            generator_params.num_neurons = neurons;
        }
        if let Some(edges) = self.edges {
            generator_params.num_edges = edges;
        }
        if let Some(steps) = self.steps {
            generator_params.num_steps = steps;
        }
        if self.seed.is_some() {
            generator_params.seed = self.seed;
        }
        if self.uniform_sources {
            generator_params.topology = Topology::Random;
        }
        if self.simple {
            generator_params.allow_self_loops = false;
            generator_params.allow_duplicate_edges = false;
        }
        if self.integral {
            generator_params.numeric_domain = NumericDomain::Integer;
            generator_params.threshold_range = (1.0, 2.0);
            generator_params.weight_range = (0.0, 1.0);
        }

        generator_params
    }
}

fn simulate(args: &InstanceArgs, simulator: &impl Simulator) -> Result<(), Box<dyn Error>> {
    let run_params = args.run_params();
    params::validate_run_params(&run_params)?;

    let instance = args.load()?;
    let states = simulator.run(&instance.network, instance.num_steps);
    println!("{}", states);

    Ok(())
}

fn execute(command: &Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Run(args) => simulate(args, &DirectSimulator::from_params(&args.run_params())),
        Command::RunFast(args) => {
            simulate(args, &IncrementalSimulator::from_params(&args.run_params()))
        }
        Command::Verify { instance, json } => {
            let run_params = instance.run_params();
            params::validate_run_params(&run_params)?;

            let loaded = instance.load()?;
            let verification = harness::verify(&loaded.network, loaded.num_steps, &run_params);

            if *json {
                println!("{}", serde_json::to_string_pretty(&verification)?);
            } else {
                println!("{}", report::format_verification(&verification));
            }

            Ok(())
        }
        Command::Bench { generator, json } => {
            let (network, num_steps) = generator::generate(&generator.generator_params())?;
            info!(
                "benchmarking {} neurons, {} edges, {} steps",
                network.num_neurons(),
                network.num_edges(),
                num_steps
            );
            let benchmark_report = harness::benchmark(&network, num_steps, &RunParams::default());

            if *json {
                println!("{}", serde_json::to_string_pretty(&benchmark_report)?);
            } else {
                println!("{}", report::format_benchmark(&benchmark_report));
            }

            Ok(())
        }
        Command::Generate(generator) => {
            let (network, num_steps) = generator::generate(&generator.generator_params())?;
            print!("{}", input::write_instance(&network, num_steps, 1));

            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    match execute(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
