//! Tests for CLI argument parsing and summary rendering.

use std::io::Cursor;
use std::path::Path;

use clap::Parser;
use otoro_core::{IlsBuilder, IlsError, Label, PointSet};
use rstest::rstest;

use super::commands::{derive_data_source_name, run_command, summarize};
use super::{Cli, CliError, Command, MetricArg, render_summary};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args.iter().copied()).expect("arguments must parse")
}

#[rstest]
fn run_parses_with_defaults() {
    let cli = parse(&["otoro", "run", "data.parquet", "--column", "embedding"]);
    let Command::Run(run) = cli.command;
    assert_eq!(run.path, Path::new("data.parquet"));
    assert_eq!(run.column, "embedding");
    assert_eq!(run.n_clusters, None);
    assert_eq!(run.min_cluster_size, None);
    assert_eq!(run.metric, MetricArg::Euclidean);
    assert!((run.sensitivity - 0.1).abs() < f32::EPSILON);
}

#[rstest]
fn run_parses_explicit_options() {
    let cli = parse(&[
        "otoro",
        "run",
        "data.parquet",
        "--column",
        "embedding",
        "--n-clusters",
        "4",
        "--min-cluster-size",
        "12",
        "--metric",
        "manhattan",
        "--sensitivity",
        "0.25",
    ]);
    let Command::Run(run) = cli.command;
    assert_eq!(run.n_clusters, Some(4));
    assert_eq!(run.min_cluster_size, Some(12));
    assert_eq!(run.metric, MetricArg::Manhattan);
    assert!((run.sensitivity - 0.25).abs() < f32::EPSILON);
}

#[rstest]
fn run_requires_a_column() {
    let result = Cli::try_parse_from(["otoro", "run", "data.parquet"]);
    assert!(result.is_err());
}

#[rstest]
#[case("euclidean", MetricArg::Euclidean)]
#[case("manhattan", MetricArg::Manhattan)]
#[case("chebyshev", MetricArg::Chebyshev)]
#[case("cosine", MetricArg::Cosine)]
fn every_registry_metric_is_selectable(#[case] name: &str, #[case] expected: MetricArg) {
    let cli = parse(&[
        "otoro", "run", "data.parquet", "--column", "embedding", "--metric", name,
    ]);
    let Command::Run(run) = cli.command;
    assert_eq!(run.metric, expected);
}

#[rstest]
fn configuration_errors_surface_before_ingestion() {
    let cli = parse(&[
        "otoro",
        "run",
        "does-not-exist.parquet",
        "--column",
        "embedding",
        "--sensitivity",
        "0",
    ]);
    let Command::Run(run) = cli.command;
    let err = run_command(run).expect_err("zero sensitivity must fail");
    assert!(matches!(
        err,
        CliError::Core(IlsError::InvalidSensitivity { .. })
    ));
}

#[rstest]
fn derive_name_prefers_the_override() {
    assert_eq!(
        derive_data_source_name(Path::new("dir/points.parquet"), Some("custom")),
        "custom"
    );
    assert_eq!(
        derive_data_source_name(Path::new("dir/points.parquet"), None),
        "points"
    );
}

#[rstest]
fn summaries_render_sizes_and_labels() {
    let points = PointSet::try_from_rows(&[
        vec![0.0],
        vec![0.1],
        vec![0.2],
        vec![10.0],
        vec![10.1],
        vec![10.2],
    ])
    .expect("test data is valid");
    let model = IlsBuilder::new()
        .with_n_clusters(2)
        .build()
        .expect("configuration is valid")
        .fit(points)
        .expect("fit must succeed");

    let summary = summarize("demo".to_owned(), &model);
    assert_eq!(summary.points, 6);
    assert_eq!(summary.cluster_count, 2);
    assert_eq!(summary.cluster_sizes, [3, 3]);
    assert_eq!(summary.labels[0], Label::new(1));

    let mut buffer = Cursor::new(Vec::new());
    render_summary(&summary, &mut buffer).expect("rendering must succeed");
    let rendered = String::from_utf8(buffer.into_inner()).expect("output is UTF-8");
    assert!(rendered.starts_with("data source: demo\n"));
    assert!(rendered.contains("points: 6 (1 dimensions)\n"));
    assert!(rendered.contains("clusters: 2\n"));
    assert!(rendered.contains("cluster 1: 3 points\n"));
    assert!(rendered.contains("0\t1\n"));
    assert!(rendered.contains("5\t2\n"));
}
