//! Command implementations and argument parsing for the whispers CLI.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{Span, debug, field, info, instrument};
use whispers_core::{
    ChineseWhispers, ChineseWhispersBuilder, ClusteringResult, DEFAULT_ITERATIONS, EdgeError,
    NodeSampler, PropagationStats, WhispersError,
};

use super::{
    byte_size::parse_byte_size,
    edge_list::{EdgeLineError, parse_edge_line},
};

/// Default `--max-bytes` budget for a run.
pub const DEFAULT_MAX_BYTES: &str = "4GiB";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "whispers", about = "Cluster a weighted graph with Chinese Whispers.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster the edge list stored at a path.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Edge list with one `from to [weight]` line per edge.
    pub path: PathBuf,

    /// Propagation rounds; each round samples as many nodes as the graph has.
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: u64,

    /// Seed for reproducible runs (random when omitted).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Largest estimated allocation to attempt, e.g. `512M` or `8GiB`.
    #[arg(long, default_value = DEFAULT_MAX_BYTES, value_parser = parse_byte_size)]
    pub max_bytes: u64,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file could not be opened or read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A line is not a well-formed edge.
    #[error("line {line}: {source}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        #[source]
        source: EdgeLineError,
    },
    /// A well-formed edge was rejected by the clustering core.
    #[error("line {line}: {source}")]
    Edge {
        /// One-based line number.
        line: usize,
        /// Rejection reason.
        #[source]
        source: EdgeError,
    },
    /// Core configuration failed or the graph exceeds the memory limit.
    #[error(transparent)]
    Core(#[from] WhispersError),
}

/// Outcome of a `run` command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Number of edges read from the input.
    pub edges: usize,
    /// Compacted cluster assignment per node.
    pub result: ClusteringResult,
    /// Propagation counters of the run.
    pub stats: PropagationStats,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the input cannot be read or parsed, or when the
/// graph's estimated allocation exceeds `--max-bytes`.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use whispers_cli::cli::{Cli, Command, RunCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0 1\n2 3\n")?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         path: file.path().to_path_buf(),
///         iterations: 10,
///         seed: Some(1),
///         max_bytes: 1 << 20,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.result.cluster_count(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
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
    fields(
        path = %command.path.display(),
        iterations = command.iterations,
        max_bytes = command.max_bytes,
        seed = field::Empty,
        edges = field::Empty,
    ),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let mut builder = ChineseWhispersBuilder::new()
        .with_iterations(command.iterations)
        .with_max_bytes(command.max_bytes);
    if let Some(seed) = command.seed {
        Span::current().record("seed", seed);
        builder = builder.with_seed(seed);
    }
    let mut whispers = builder.build()?;

    let reader = open_edge_reader(&command.path)?;
    let edges = load_edges(reader, &command.path, &mut whispers)?;
    Span::current().record("edges", edges);

    let clusters = whispers.try_run()?;
    info!(edges, clusters, "command completed");
    Ok(ExecutionSummary {
        edges,
        result: whispers.result().clone(),
        stats: whispers.stats(),
    })
}

#[instrument(name = "cli.open_edge_reader", err, fields(path = %path.display()))]
pub(super) fn open_edge_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Feeds every edge in `reader` to `whispers` and returns how many were read.
pub(super) fn load_edges<S: NodeSampler>(
    reader: impl BufRead,
    path: &Path,
    whispers: &mut ChineseWhispers<S>,
) -> Result<usize, CliError> {
    let mut edges = 0;
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let text = line.map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let Some(edge) = parse_edge_line(&text).map_err(|source| CliError::Parse {
            line: line_number,
            source,
        })?
        else {
            continue;
        };
        whispers
            .try_add_edge(edge.from, edge.to, edge.weight)
            .map_err(|source| CliError::Edge {
                line: line_number,
                source,
            })?;
        edges += 1;
    }
    debug!(edges, "edge list loaded");
    Ok(edges)
}

/// Renders `summary` as a cluster count followed by `node<TAB>cluster` lines.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use whispers_cli::cli::{ExecutionSummary, render_summary};
/// # use whispers_core::{ClusterId, ClusteringResult, PropagationStats};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     edges: 1,
///     result: ClusteringResult::try_from_assignments(vec![
///         ClusterId::new(0),
///         ClusterId::new(0),
///     ])?,
///     stats: PropagationStats::default(),
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "clusters: 1\n0\t0\n1\t0\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "clusters: {}", summary.result.cluster_count())?;
    for (node, cluster) in summary.result.assignments().iter().enumerate() {
        writeln!(writer, "{node}\t{}", cluster.get())?;
    }
    Ok(())
}
