//! `sample_surprise`: how much does sample size cost you in log-odds surprise?
//!
//! A small Monte Carlo toolkit. A known "true" population defines a reference
//! categorical distribution; repeated samples of a given size train candidate
//! distributions; each candidate is scored against the reference in logit space.
//! Averaging over many trials per sample size gives a curve of estimation error
//! against sample size.
//!
//! **Pieces:**
//! - [`Categorical`]: online-learned categorical distribution (counts, exact
//!   empirical probabilities, unbiased sampling, entropy in nats).
//! - [`reward()`]: `logit(p) - logit(prior)` with both inputs clamped into
//!   `[REWARD_EPS, 1 - REWARD_EPS]`.
//! - [`expected_reward`]: unweighted mean of `|reward|` over the reference's events.
//! - [`slack()`]: exploratory small-sample correction, `0.95 · exp(-(ln x)² / 6)`.
//! - [`Experiment`] / [`run_experiment`]: the trial loop (population → sample
//!   size → trial), seedable and reproducible.
//! - [`write_report`]: the console report.
//!
//! **Why unweighted?** Rare events are rarely sampled, so their estimates are
//! noisy; but the logit geometry also makes the reward on a rare event large.
//! Averaging without frequency weights lets the two effects cancel.
//!
//! # Example
//!
//! ```rust
//! use sample_surprise::{Experiment, ExperimentConfig};
//!
//! let cfg = ExperimentConfig::new(vec![vec!["a", "b"], vec!["a", "a", "a", "b"]])
//!     .sample_sizes(vec![1, 2, 4, 8])
//!     .trials(100);
//! let results = Experiment::new(cfg).with_seed(7).run().unwrap();
//!
//! assert_eq!(results.len(), 2);
//! assert!((results[0].entropy - 2.0_f64.ln()).abs() < 1e-12);
//! let curve = results[0].reward_curve();
//! assert!(curve[3].1 < curve[0].1);
//! ```
//!
//! **Features:**
//! - `parallel`: adds `Experiment::run_parallel` and `run_experiment_parallel`,
//!   which run the trials of each batch on rayon's thread pool (events must be
//!   `Send + Sync`). Seeded results are identical to the sequential entry points.
//! - `serde`: `Serialize`/`Deserialize` for configs, results and distributions.
//!
//! **Non-goals:** persistence, plotting, other distribution families, confidence
//! intervals.

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod categorical;
pub use categorical::*;

mod reward;
pub use reward::*;

mod slack;
pub use slack::*;

mod aggregate;
pub use aggregate::*;

mod seed;
pub use seed::*;

mod experiment;
pub use experiment::*;

mod report;
pub use report::*;
