//! Command-line interface orchestration for otoro.
//!
//! The CLI offers a `run` command that loads a Parquet dense matrix,
//! executes the clustering pipeline, and prints a per-point label summary.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, MetricArg, RunCommand, render_summary, run_cli,
};

#[cfg(test)]
mod tests;
