//! Unit tests for the CLI commands and edge-list loading.

use std::{
    ffi::OsString,
    fs,
    io::{self, Cursor},
    path::{Path, PathBuf},
};

use clap::Parser;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use tracing::Level;
use whispers_core::{ChineseWhispersBuilder, DEFAULT_ITERATIONS, EdgeError, WhispersError};
use whispers_test_support::tracing::record;

use super::commands::{load_edges, open_edge_reader, run_command};
use super::{Cli, CliError, Command, EdgeLineError, RunCommand, render_summary, run_cli};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const TWO_COMMUNITIES: &str = "\
# two triangles joined by a weak link
0 1
1 2
0 2
3 4 1.0
4 5 1.0
3 5 1.0

2 3 0.05
";

#[fixture]
fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("temporary directory must be created")
}

fn write_input(dir: &TempDir, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join("edges.txt");
    fs::write(&path, contents)?;
    Ok(path)
}

fn run_args(path: PathBuf) -> RunCommand {
    RunCommand {
        path,
        iterations: 20,
        seed: Some(4),
        max_bytes: 1 << 30,
    }
}

#[rstest]
fn run_clusters_two_communities(temp_dir: TempDir) -> TestResult {
    let path = write_input(&temp_dir, TWO_COMMUNITIES)?;
    let summary = run_cli(Cli {
        command: Command::Run(run_args(path)),
    })?;

    assert_eq!(summary.edges, 7);
    assert_eq!(summary.stats.steps(), 120);
    let labels: Vec<u64> = summary
        .result
        .assignments()
        .iter()
        .map(|id| id.get())
        .collect();
    assert_eq!(labels, vec![0, 0, 0, 1, 1, 1]);
    Ok(())
}

#[rstest]
fn run_with_fixed_seed_is_reproducible(temp_dir: TempDir) -> TestResult {
    let path = write_input(&temp_dir, TWO_COMMUNITIES)?;
    let first = run_command(run_args(path.clone()))?;
    let second = run_command(run_args(path))?;
    assert_eq!(first.result, second.result);
    Ok(())
}

#[rstest]
fn empty_input_yields_zero_clusters(temp_dir: TempDir) -> TestResult {
    let path = write_input(&temp_dir, "# nothing here\n\n")?;
    let summary = run_command(run_args(path))?;
    assert_eq!(summary.edges, 0);
    assert_eq!(summary.result.cluster_count(), 0);
    assert!(summary.result.is_empty());
    Ok(())
}

#[rstest]
fn malformed_line_reports_its_number(temp_dir: TempDir) -> TestResult {
    let path = write_input(&temp_dir, "0 1\n\n1 two\n")?;
    let err = run_command(run_args(path)).expect_err("bad node id must fail");
    match err {
        CliError::Parse { line, source } => {
            assert_eq!(line, 3);
            assert_eq!(source, EdgeLineError::InvalidNode { token: "two".into() });
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[rstest]
fn non_finite_weight_is_rejected_by_core(temp_dir: TempDir) -> TestResult {
    let path = write_input(&temp_dir, "0 1 inf\n")?;
    let err = run_command(run_args(path)).expect_err("infinite weight must fail");
    assert!(matches!(
        err,
        CliError::Edge {
            line: 1,
            source: EdgeError::NonFiniteWeight { from: 0, to: 1, .. },
        }
    ));
    assert_eq!(err.to_string(), "line 1: edge (0, 1) has non-finite weight inf");
    Ok(())
}

#[rstest]
fn load_edges_stops_at_the_node_limit() {
    let mut whispers = ChineseWhispersBuilder::new()
        .with_node_limit(3)
        .with_seed(0)
        .build()
        .expect("configuration must be valid");
    let input = Cursor::new("0 1\n1 2\n2 3\n");

    let err = load_edges(input, Path::new("memory"), &mut whispers)
        .expect_err("node 3 is beyond the limit");

    assert!(matches!(
        err,
        CliError::Edge {
            line: 3,
            source: EdgeError::NodeLimitExceeded { node: 3, limit: 3 },
        }
    ));
    assert_eq!(whispers.edges().len(), 2);
}

#[rstest]
fn missing_file_is_an_io_error(temp_dir: TempDir) {
    let err = open_edge_reader(&temp_dir.path().join("missing.txt"))
        .expect_err("missing file must fail");
    assert!(matches!(err, CliError::Io { .. }));
    assert!(err.to_string().contains("missing.txt"));
}

#[rstest]
fn core_errors_convert_transparently() {
    let err = CliError::from(WhispersError::InvalidNodeLimit { got: 0 });
    assert_eq!(
        err.to_string(),
        WhispersError::InvalidNodeLimit { got: 0 }.to_string()
    );
}

#[rstest]
fn render_summary_lists_every_node(temp_dir: TempDir) -> TestResult {
    let path = write_input(&temp_dir, "0 1\n3 3\n")?;
    let summary = run_command(RunCommand {
        path,
        iterations: 0,
        seed: Some(0),
        max_bytes: 1 << 30,
    })?;

    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    assert_eq!(
        String::from_utf8(buffer)?,
        "clusters: 4\n0\t0\n1\t1\n2\t2\n3\t3\n"
    );
    Ok(())
}

#[rstest]
fn clap_parses_run_arguments() {
    let cli = Cli::try_parse_from(["whispers", "run", "graph.txt", "--seed", "9"])
        .expect("arguments must parse");
    let Command::Run(run) = cli.command;
    assert_eq!(run.path, PathBuf::from("graph.txt"));
    assert_eq!(run.iterations, DEFAULT_ITERATIONS);
    assert_eq!(run.seed, Some(9));
    assert_eq!(run.max_bytes, 4 << 30);
}

#[rstest]
fn clap_parses_max_bytes_suffixes() {
    let cli = Cli::try_parse_from(["whispers", "run", "graph.txt", "--max-bytes", "512M"])
        .expect("arguments must parse");
    let Command::Run(run) = cli.command;
    assert_eq!(run.max_bytes, 512 << 20);
}

#[rstest]
fn default_budget_rejects_a_huge_node_id(temp_dir: TempDir) -> TestResult {
    let path = write_input(&temp_dir, "0 4000000000\n")?;
    let args: Vec<OsString> = vec![
        "whispers".into(),
        "run".into(),
        path.into_os_string(),
        "--seed".into(),
        "1".into(),
    ];
    let cli = Cli::try_parse_from(args)?;

    let err = run_cli(cli).expect_err("four billion nodes must not be allocated");

    match &err {
        CliError::Core(WhispersError::MemoryLimitExceeded {
            node_count, limit, ..
        }) => {
            assert_eq!(*node_count, 4_000_000_001);
            assert_eq!(*limit, 4 << 30);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("memory limit"));
    Ok(())
}

#[rstest]
fn zero_budget_rejects_any_graph(temp_dir: TempDir) -> TestResult {
    let path = write_input(&temp_dir, "0 1\n")?;
    let err = run_command(RunCommand {
        max_bytes: 0,
        ..run_args(path)
    })
    .expect_err("a zero budget admits nothing");
    assert!(matches!(
        err,
        CliError::Core(WhispersError::MemoryLimitExceeded { limit: 0, .. })
    ));
    Ok(())
}

#[rstest]
#[case::missing_path(&["whispers", "run"])]
#[case::negative_iterations(&["whispers", "run", "graph.txt", "--iterations", "-1"])]
#[case::bad_max_bytes(&["whispers", "run", "graph.txt", "--max-bytes", "lots"])]
fn clap_rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
fn run_command_emits_tracing_fields(temp_dir: TempDir) -> TestResult {
    let path = write_input(&temp_dir, TWO_COMMUNITIES)?;

    let (summary, layer) = record(|| run_command(run_args(path)));
    let summary = summary?;

    let execute = layer
        .span_named("cli.execute")
        .expect("cli.execute span must exist");
    assert!(execute.field("path").is_some_and(|value| value.ends_with("edges.txt")));
    assert_eq!(execute.field("iterations"), Some("20"));
    assert_eq!(execute.field("seed"), Some("4"));
    assert_eq!(execute.field("max_bytes"), Some("1073741824"));
    assert_eq!(execute.field("edges"), Some("7"));
    assert!(layer.span_named("whispers.run").is_some());

    let completed = layer
        .event_with_message(Level::INFO, "command completed")
        .expect("completion event must be logged");
    assert_eq!(
        completed.field("clusters"),
        Some(summary.result.cluster_count().to_string().as_str())
    );
    Ok(())
}

#[rstest]
fn open_edge_reader_records_path_on_error(temp_dir: TempDir) {
    let missing = temp_dir.path().join("missing.txt");

    let (result, layer) = record(|| run_command(run_args(missing)));
    assert!(matches!(result, Err(CliError::Io { .. })));

    let reader = layer
        .span_named("cli.open_edge_reader")
        .expect("reader span must exist");
    assert!(reader.field("path").is_some_and(|value| value.ends_with("missing.txt")));
    assert!(
        layer
            .events()
            .iter()
            .any(|event| event.level == Level::ERROR)
    );
}
