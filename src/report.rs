use crate::harness::{BenchmarkReport, Verification};

pub fn format_match(matches: bool) -> &'static str {
    if matches {
        "True"
    } else {
        "False"
    }
}

pub fn format_verification(verification: &Verification) -> String {
    format!(
        "BASE : {}\nFAST : {}\nMATCH: {}\ntime  baseline={:.6}s  fast={:.6}s",
        verification.base,
        verification.fast,
        format_match(verification.matches),
        verification.base_duration.as_secs_f64(),
        verification.fast_duration.as_secs_f64()
    )
}

pub fn format_benchmark(report: &BenchmarkReport) -> String {
    format!(
        "[Bench] M={}, edges={}, steps={}\nbaseline: {:.3}s\nfast    : {:.3}s",
        report.num_neurons,
        report.num_edges,
        report.num_steps,
        report.base_duration.as_secs_f64(),
        report.fast_duration.as_secs_f64()
    )
}
