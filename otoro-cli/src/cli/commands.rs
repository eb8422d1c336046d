//! Command implementations and argument parsing for the otoro CLI.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use otoro_core::{FittedIls, IlsBuilder, IlsError, Label, Metric};
use otoro_providers_dense::{DensePointsError, points_from_parquet_path};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "otoro", about = "Cluster a point cloud with iterative label spreading.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Fit the clustering pipeline against a Parquet dense matrix.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to the Parquet file containing feature vectors.
    pub path: PathBuf,

    /// Column containing `FixedSizeList<Float32, D>` rows.
    #[arg(long)]
    pub column: String,

    /// Target number of clusters; omit to discover the count from the data.
    #[arg(long = "n-clusters")]
    pub n_clusters: Option<usize>,

    /// Minimum number of points per cluster; derived from the dataset size
    /// when omitted.
    #[arg(long = "min-cluster-size")]
    pub min_cluster_size: Option<usize>,

    /// Distance metric for the spreading passes.
    #[arg(long, value_enum, default_value_t = MetricArg::Euclidean)]
    pub metric: MetricArg,

    /// Peak prominence threshold used when no cluster count is given.
    #[arg(long, default_value_t = 0.1)]
    pub sensitivity: f32,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Metrics selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    /// Straight-line (L2) distance.
    Euclidean,
    /// Sum of absolute coordinate differences (L1).
    Manhattan,
    /// Largest absolute coordinate difference (L∞).
    Chebyshev,
    /// One minus the cosine similarity.
    Cosine,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Euclidean => Self::Euclidean,
            MetricArg::Manhattan => Self::Manhattan,
            MetricArg::Chebyshev => Self::Chebyshev,
            MetricArg::Cosine => Self::Cosine,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Dense matrix ingestion failed.
    #[error(transparent)]
    Dense(#[from] DensePointsError),
    /// Core configuration or clustering failed.
    #[error(transparent)]
    Core(#[from] IlsError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name derived for the data source.
    pub data_source: String,
    /// Number of points clustered.
    pub points: usize,
    /// Dimensionality of the points.
    pub dimension: usize,
    /// Number of regions discovered.
    pub cluster_count: usize,
    /// Number of points per region, indexed by label minus one.
    pub cluster_sizes: Vec<usize>,
    /// Final per-point labels in input order.
    pub labels: Vec<Label>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when configuration, ingestion, or clustering fails.
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(path = field::Empty, column = field::Empty, metric = field::Empty),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let RunCommand {
        path,
        column,
        n_clusters,
        min_cluster_size,
        metric,
        sensitivity,
        name,
    } = command;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    span.record("column", field::display(&column));
    span.record("metric", field::debug(metric));

    // Validate the configuration before touching the input file so
    // configuration mistakes surface immediately.
    let mut builder = IlsBuilder::new()
        .with_metric(metric.into())
        .with_sensitivity(sensitivity);
    if let Some(count) = n_clusters {
        builder = builder.with_n_clusters(count);
    }
    if let Some(size) = min_cluster_size {
        builder = builder.with_min_cluster_size(size);
    }
    let ils = builder.build()?;

    let data_source = derive_data_source_name(&path, name.as_deref());
    let points = points_from_parquet_path(&path, &column)?;
    let model = ils.fit(points)?;

    info!(
        data_source = data_source.as_str(),
        clusters = model.cluster_count(),
        "run completed"
    );
    Ok(summarize(data_source, &model))
}

pub(super) fn summarize(data_source: String, model: &FittedIls) -> ExecutionSummary {
    let labels = model.labels().to_vec();
    let mut cluster_sizes = vec![0_usize; model.cluster_count()];
    for label in &labels {
        let slot = (label.get() as usize).saturating_sub(1);
        if let Some(size) = cluster_sizes.get_mut(slot) {
            *size += 1;
        }
    }
    ExecutionSummary {
        data_source,
        points: model.points().len(),
        dimension: model.points().dimension(),
        cluster_count: model.cluster_count(),
        cluster_sizes,
        labels,
    }
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "data_source".to_owned())
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(
        writer,
        "points: {} ({} dimensions)",
        summary.points, summary.dimension
    )?;
    writeln!(writer, "clusters: {}", summary.cluster_count)?;
    for (index, size) in summary.cluster_sizes.iter().enumerate() {
        writeln!(writer, "cluster {}: {size} points", index + 1)?;
    }
    for (index, label) in summary.labels.iter().enumerate() {
        writeln!(writer, "{index}\t{label}")?;
    }
    Ok(())
}
