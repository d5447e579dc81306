//! Line parser for whitespace-separated edge lists.

use thiserror::Error;
use whispers_core::NodeId;

/// Weight used when a line omits the third column.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Edge read from one line of input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedEdge {
    /// Source node.
    pub from: NodeId,
    /// Target node.
    pub to: NodeId,
    /// Edge weight.
    pub weight: f64,
}

/// Reasons a non-blank line cannot be read as an edge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EdgeLineError {
    /// Fewer than two columns.
    #[error("expected `from to [weight]`, found {found} column(s)")]
    MissingColumns {
        /// Columns present on the line.
        found: usize,
    },
    /// More than three columns.
    #[error("unexpected trailing column `{token}`")]
    TrailingColumn {
        /// First surplus token.
        token: String,
    },
    /// A node column is not an unsigned integer.
    #[error("invalid node id `{token}`")]
    InvalidNode {
        /// Offending token.
        token: String,
    },
    /// The weight column is not a float.
    #[error("invalid weight `{token}`")]
    InvalidWeight {
        /// Offending token.
        token: String,
    },
}

/// Parses one line, returning `Ok(None)` for blank lines and comments.
///
/// Text after `#` is ignored.
///
/// # Errors
/// Returns [`EdgeLineError`] when the remaining columns do not form an edge.
///
/// # Examples
/// ```
/// use whispers_cli::cli::{ParsedEdge, parse_edge_line};
///
/// assert_eq!(
///     parse_edge_line("3 4 0.5 # weak link").expect("valid line"),
///     Some(ParsedEdge { from: 3, to: 4, weight: 0.5 }),
/// );
/// assert_eq!(parse_edge_line("   # header").expect("comment"), None);
/// ```
pub fn parse_edge_line(line: &str) -> Result<Option<ParsedEdge>, EdgeLineError> {
    let content = line.split_once('#').map_or(line, |(before, _)| before);
    let columns: Vec<&str> = content.split_whitespace().collect();
    match columns.as_slice() {
        [] => Ok(None),
        [from, to] => Ok(Some(ParsedEdge {
            from: parse_node(from)?,
            to: parse_node(to)?,
            weight: DEFAULT_WEIGHT,
        })),
        [from, to, weight] => Ok(Some(ParsedEdge {
            from: parse_node(from)?,
            to: parse_node(to)?,
            weight: parse_weight(weight)?,
        })),
        [_] => Err(EdgeLineError::MissingColumns { found: 1 }),
        [_, _, _, surplus, ..] => Err(EdgeLineError::TrailingColumn {
            token: (*surplus).to_owned(),
        }),
    }
}

fn parse_node(token: &str) -> Result<NodeId, EdgeLineError> {
    token.parse().map_err(|_| EdgeLineError::InvalidNode {
        token: token.to_owned(),
    })
}

fn parse_weight(token: &str) -> Result<f64, EdgeLineError> {
    token.parse().map_err(|_| EdgeLineError::InvalidWeight {
        token: token.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::blank("", None)]
    #[case::whitespace("  \t ", None)]
    #[case::comment("# from to weight", None)]
    #[case::unweighted("0 1", Some(ParsedEdge { from: 0, to: 1, weight: DEFAULT_WEIGHT }))]
    #[case::weighted("2\t5  0.25", Some(ParsedEdge { from: 2, to: 5, weight: 0.25 }))]
    #[case::trailing_comment("7 7 3#loop", Some(ParsedEdge { from: 7, to: 7, weight: 3.0 }))]
    fn accepts_edges_and_skips_noise(#[case] line: &str, #[case] expected: Option<ParsedEdge>) {
        assert_eq!(parse_edge_line(line), Ok(expected));
    }

    #[rstest]
    #[case::single_column("4", EdgeLineError::MissingColumns { found: 1 })]
    #[case::surplus("0 1 1.0 extra", EdgeLineError::TrailingColumn { token: "extra".into() })]
    #[case::negative_node("-1 2", EdgeLineError::InvalidNode { token: "-1".into() })]
    #[case::bad_weight("0 1 heavy", EdgeLineError::InvalidWeight { token: "heavy".into() })]
    fn rejects_malformed_lines(#[case] line: &str, #[case] expected: EdgeLineError) {
        assert_eq!(parse_edge_line(line), Err(expected));
    }

    #[rstest]
    fn non_finite_weights_parse_for_later_validation() {
        let edge = parse_edge_line("0 1 NaN")
            .expect("NaN is a float literal")
            .expect("line holds an edge");
        assert!(edge.weight.is_nan());
    }
}
