//! Error types for the whispers core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::edge::NodeId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while accepting or validating graph edges.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EdgeError {
    /// The edge weight was NaN or infinite.
    #[error("edge ({from}, {to}) has non-finite weight {weight}")]
    NonFiniteWeight {
        /// Source endpoint of the rejected edge.
        from: NodeId,
        /// Target endpoint of the rejected edge.
        to: NodeId,
        /// The offending weight.
        weight: f64,
    },
    /// An endpoint reached the configured node limit.
    #[error("edge references node {node}, but the node limit is {limit}")]
    NodeLimitExceeded {
        /// The endpoint that exceeded the limit.
        node: NodeId,
        /// Exclusive upper bound on node identifiers.
        limit: usize,
    },
    /// A pre-normalised edge slice was not sorted by `(from, to)`.
    #[error("edges are not sorted by (from, to) at position {position}")]
    Unsorted {
        /// Index of the first edge that is smaller than its predecessor.
        position: usize,
    },
    /// A pre-normalised edge slice lacked the mirror of a non-self edge.
    #[error("edge ({from}, {to}) has no mirrored edge ({to}, {from}) with the same weight")]
    MissingMirror {
        /// Source endpoint of the unmatched edge.
        from: NodeId,
        /// Target endpoint of the unmatched edge.
        to: NodeId,
    },
}

define_error_codes! {
    /// Stable codes describing [`EdgeError`] variants.
    enum EdgeErrorCode for EdgeError {
        /// The edge weight was NaN or infinite.
        NonFiniteWeight => NonFiniteWeight { .. } => "EDGE_NON_FINITE_WEIGHT",
        /// An endpoint reached the configured node limit.
        NodeLimitExceeded => NodeLimitExceeded { .. } => "EDGE_NODE_LIMIT_EXCEEDED",
        /// A pre-normalised edge slice was not sorted.
        Unsorted => Unsorted { .. } => "EDGE_UNSORTED",
        /// A pre-normalised edge slice was not symmetric.
        MissingMirror => MissingMirror { .. } => "EDGE_MISSING_MIRROR",
    }
}

/// Error type produced when configuring or feeding [`crate::ChineseWhispers`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum WhispersError {
    /// The node limit must admit at least one node.
    #[error("node_limit must be at least 1 (got {got})")]
    InvalidNodeLimit {
        /// The invalid limit supplied by the caller.
        got: usize,
    },
    /// An edge was rejected.
    #[error(transparent)]
    Edge(#[from] EdgeError),
    /// The estimated peak allocation of a run exceeds the configured budget.
    #[error(
        "graph of {node_count} nodes needs an estimated {estimated} bytes, over the {limit}-byte memory limit"
    )]
    MemoryLimitExceeded {
        /// Nodes implied by the largest endpoint.
        node_count: usize,
        /// Estimated peak bytes.
        estimated: u64,
        /// Configured budget in bytes.
        limit: u64,
    },
}

define_error_codes! {
    /// Stable codes describing [`WhispersError`] variants.
    enum WhispersErrorCode for WhispersError {
        /// The node limit must admit at least one node.
        InvalidNodeLimit => InvalidNodeLimit { .. } => "WHISPERS_INVALID_NODE_LIMIT",
        /// An edge was rejected.
        EdgeRejected => Edge(..) => "WHISPERS_EDGE_REJECTED",
        /// The estimated peak allocation exceeds the memory limit.
        MemoryLimitExceeded => MemoryLimitExceeded { .. } => "WHISPERS_MEMORY_LIMIT_EXCEEDED",
    }
}

impl WhispersError {
    /// Retrieve the inner [`EdgeErrorCode`] when the error originated from an edge.
    #[must_use]
    pub const fn edge_code(&self) -> Option<EdgeErrorCode> {
        match self {
            Self::Edge(error) => Some(error.code()),
            Self::InvalidNodeLimit { .. } | Self::MemoryLimitExceeded { .. } => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, WhispersError>;
