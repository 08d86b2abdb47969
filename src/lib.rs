pub mod direct;
pub mod generator;
pub mod harness;
pub mod incremental;
pub mod input;
pub mod network;
pub mod params;
pub mod report;
pub mod simulator;
pub mod state;

mod types;
