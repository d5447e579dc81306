//! Builder utilities for configuring Chinese Whispers runs.
//!
//! Collects the iteration multiplier, sampler seed and node limit, and
//! validates them before constructing [`ChineseWhispers`] instances.

use std::num::NonZeroUsize;

use crate::{
    Result,
    error::WhispersError,
    sampler::{NodeSampler, SeededSampler},
    whispers::ChineseWhispers,
};

/// Default multiplier applied to the node count to obtain the step budget.
pub const DEFAULT_ITERATIONS: u64 = 100;

/// Default exclusive upper bound on node identifiers accepted by
/// [`ChineseWhispers::try_add_edge`].
pub const DEFAULT_NODE_LIMIT: usize = u32::MAX as usize;

/// Configures and constructs [`ChineseWhispers`] instances.
///
/// # Examples
/// ```
/// use whispers_core::ChineseWhispersBuilder;
///
/// let whispers = ChineseWhispersBuilder::new()
///     .with_iterations(25)
///     .with_seed(7)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(whispers.iterations(), 25);
/// ```
#[derive(Debug, Clone)]
pub struct ChineseWhispersBuilder {
    iterations: u64,
    seed: Option<u64>,
    node_limit: usize,
    max_bytes: Option<u64>,
}

impl Default for ChineseWhispersBuilder {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            node_limit: DEFAULT_NODE_LIMIT,
            max_bytes: None,
        }
    }
}

impl ChineseWhispersBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use whispers_core::{ChineseWhispersBuilder, DEFAULT_ITERATIONS};
    ///
    /// let builder = ChineseWhispersBuilder::new();
    /// assert_eq!(builder.iterations(), DEFAULT_ITERATIONS);
    /// assert_eq!(builder.seed(), None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the iteration multiplier. Zero disables propagation.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Returns the configured iteration multiplier.
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Fixes the sampler seed so runs are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the configured seed, if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Sets the exclusive upper bound on node identifiers.
    ///
    /// # Examples
    /// ```
    /// use whispers_core::ChineseWhispersBuilder;
    ///
    /// let builder = ChineseWhispersBuilder::new().with_node_limit(1_000);
    /// assert_eq!(builder.node_limit(), 1_000);
    /// ```
    #[must_use]
    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = limit;
        self
    }

    /// Returns the configured node limit.
    #[must_use]
    pub fn node_limit(&self) -> usize {
        self.node_limit
    }

    /// Caps the estimated peak allocation accepted by
    /// [`ChineseWhispers::try_run`]. Unlimited by default.
    ///
    /// # Examples
    /// ```
    /// use whispers_core::ChineseWhispersBuilder;
    ///
    /// let builder = ChineseWhispersBuilder::new().with_max_bytes(1 << 30);
    /// assert_eq!(builder.max_bytes(), Some(1 << 30));
    /// ```
    #[must_use]
    pub fn with_max_bytes(mut self, limit: u64) -> Self {
        self.max_bytes = Some(limit);
        self
    }

    /// Returns the configured memory limit, if any.
    #[must_use]
    pub fn max_bytes(&self) -> Option<u64> {
        self.max_bytes
    }

    /// Validates the configuration and constructs an instance using a
    /// [`SeededSampler`] (entropy-seeded unless a seed was given).
    ///
    /// # Errors
    /// Returns [`WhispersError::InvalidNodeLimit`] when the node limit is zero.
    pub fn build(self) -> Result<ChineseWhispers> {
        let sampler = self
            .seed
            .map_or_else(SeededSampler::from_entropy, SeededSampler::from_seed);
        self.build_with_sampler(sampler)
    }

    /// Validates the configuration and constructs an instance that draws
    /// nodes from `sampler`. Any configured seed is ignored.
    ///
    /// # Errors
    /// Returns [`WhispersError::InvalidNodeLimit`] when the node limit is zero.
    pub fn build_with_sampler<S: NodeSampler>(self, sampler: S) -> Result<ChineseWhispers<S>> {
        let node_limit = NonZeroUsize::new(self.node_limit).ok_or(WhispersError::InvalidNodeLimit {
            got: self.node_limit,
        })?;
        Ok(ChineseWhispers::from_parts(self.iterations, node_limit, sampler)
            .with_max_bytes(self.max_bytes))
    }
}
