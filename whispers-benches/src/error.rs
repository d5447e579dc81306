//! Benchmark setup error type.

use whispers_core::WhispersError;

/// Errors that may occur while preparing a benchmark.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// A zero value was passed where a positive count was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// Parameter that was zero.
        context: &'static str,
    },
    /// The requested graph has more nodes than `usize` can index.
    #[error("graph with {communities} communities of {community_size} nodes overflows usize")]
    TooLarge {
        /// Requested community count.
        communities: usize,
        /// Requested nodes per community.
        community_size: usize,
    },
    /// The clustering core rejected the configuration.
    #[error("clustering setup failed: {0}")]
    Whispers(#[from] WhispersError),
}
