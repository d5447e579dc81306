//! Tests for error codes and messages exposed by whispers-core.

use rstest::rstest;
use whispers_core::{EdgeError, EdgeErrorCode, WhispersError, WhispersErrorCode};

#[rstest]
#[case(
    EdgeError::NonFiniteWeight { from: 0, to: 1, weight: f64::NAN },
    EdgeErrorCode::NonFiniteWeight,
    "EDGE_NON_FINITE_WEIGHT",
)]
#[case(
    EdgeError::NodeLimitExceeded { node: 9, limit: 4 },
    EdgeErrorCode::NodeLimitExceeded,
    "EDGE_NODE_LIMIT_EXCEEDED",
)]
#[case(EdgeError::Unsorted { position: 3 }, EdgeErrorCode::Unsorted, "EDGE_UNSORTED")]
#[case(
    EdgeError::MissingMirror { from: 2, to: 5 },
    EdgeErrorCode::MissingMirror,
    "EDGE_MISSING_MIRROR",
)]
fn returns_expected_edge_code(
    #[case] error: EdgeError,
    #[case] expected: EdgeErrorCode,
    #[case] symbol: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), symbol);
    assert_eq!(expected.to_string(), symbol);
}

#[rstest]
#[case(
    WhispersError::InvalidNodeLimit { got: 0 },
    WhispersErrorCode::InvalidNodeLimit,
    None,
)]
#[case(
    WhispersError::Edge(EdgeError::Unsorted { position: 1 }),
    WhispersErrorCode::EdgeRejected,
    Some(EdgeErrorCode::Unsorted),
)]
#[case(
    WhispersError::MemoryLimitExceeded { node_count: 10, estimated: 900, limit: 100 },
    WhispersErrorCode::MemoryLimitExceeded,
    None,
)]
fn returns_expected_whispers_code(
    #[case] error: WhispersError,
    #[case] expected: WhispersErrorCode,
    #[case] edge_code: Option<EdgeErrorCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.edge_code(), edge_code);
}

#[rstest]
fn edge_errors_convert_transparently() {
    let inner = EdgeError::MissingMirror { from: 0, to: 1 };
    let err = WhispersError::from(inner.clone());
    assert_eq!(err.to_string(), inner.to_string());
    assert_eq!(
        err.to_string(),
        "edge (0, 1) has no mirrored edge (1, 0) with the same weight"
    );
}

#[test]
fn node_limit_message_names_the_limit() {
    let err = EdgeError::NodeLimitExceeded { node: 12, limit: 10 };
    assert_eq!(
        err.to_string(),
        "edge references node 12, but the node limit is 10"
    );
}

#[test]
fn memory_limit_message_reports_estimate_and_limit() {
    let err = WhispersError::MemoryLimitExceeded {
        node_count: 10,
        estimated: 900,
        limit: 100,
    };
    assert_eq!(err.code().as_str(), "WHISPERS_MEMORY_LIMIT_EXCEEDED");
    assert_eq!(
        err.to_string(),
        "graph of 10 nodes needs an estimated 900 bytes, over the 100-byte memory limit"
    );
}
