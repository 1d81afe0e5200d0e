//! Error types for sampling and experiment configuration.

use thiserror::Error;

/// Errors surfaced by distributions and the experiment driver.
///
/// Any error aborts the whole run: a partially computed average would be
/// indistinguishable from a complete one in the report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurpriseError {
    /// Sampling from a distribution with zero total weight.
    #[error("cannot sample from an empty distribution")]
    EmptyDistribution,

    /// A configured population has no events.
    #[error("population {index} is empty")]
    EmptyPopulation { index: usize },

    /// Any other configuration violation (sample sizes, trial count, ...).
    #[error("invalid experiment configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl SurpriseError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
