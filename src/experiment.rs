//! Monte Carlo experiment driver.
//!
//! For each population a reference [`Categorical`] is trained on the full
//! population. For each sample size, two independent batches of trials draw a
//! sample from the reference, train a fresh candidate on it and score the
//! candidate with [`expected_reward`] (first batch) or
//! [`expected_reward_with_slack`] (second batch).
//!
//! Each trial owns its candidate and its RNG, seeded via [`trial_seed`], so the
//! result of a seeded run does not depend on trial scheduling. With the
//! `parallel` feature, `Experiment::run_parallel` and
//! `run_experiment_parallel` run the trials of a batch on rayon's pool and
//! return the same numbers as their sequential counterparts.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, info_span};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::seed::{trial_seed, TrialCoord, TrialPhase};
use crate::{expected_reward, expected_reward_with_slack, Categorical, Sampler, SurpriseError};

/// Trials per sample size when not configured otherwise.
pub const DEFAULT_TRIALS: usize = 1000;

/// Bounds on event labels usable in an experiment.
///
/// The same in every build; the parallel entry points add `Send + Sync` on
/// their own.
pub trait Event: Ord + Clone {}
impl<T: Ord + Clone> Event for T {}

/// Powers of two from 1 to 4096.
pub fn default_sample_sizes() -> Vec<usize> {
    (0..=12).map(|k| 1usize << k).collect()
}

/// Experiment configuration: what to sample from, how much, how often.
///
/// # Example
///
/// ```rust
/// use sample_surprise::ExperimentConfig;
///
/// let cfg = ExperimentConfig::new(vec![vec!['a', 'b']])
///     .sample_sizes(vec![1, 2, 4])
///     .trials(50);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentConfig<E> {
    /// Ground-truth populations (events with repetition), reported in this order.
    pub populations: Vec<Vec<E>>,
    /// Strictly ascending, positive sample sizes.
    pub sample_sizes: Vec<usize>,
    /// Trials per batch (each sample size runs two batches).
    pub trials: usize,
}

impl<E> ExperimentConfig<E> {
    /// Config over `populations` with [`default_sample_sizes`] and [`DEFAULT_TRIALS`].
    pub fn new(populations: Vec<Vec<E>>) -> Self {
        Self {
            populations,
            sample_sizes: default_sample_sizes(),
            trials: DEFAULT_TRIALS,
        }
    }

    /// Set the sample sizes.
    pub fn sample_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.sample_sizes = sizes;
        self
    }

    /// Set the number of trials per batch.
    pub fn trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Check the configuration before any trial runs.
    pub fn validate(&self) -> Result<(), SurpriseError> {
        if self.populations.is_empty() {
            return Err(SurpriseError::invalid_config("no populations configured"));
        }
        if let Some(index) = self.populations.iter().position(Vec::is_empty) {
            return Err(SurpriseError::EmptyPopulation { index });
        }
        if self.sample_sizes.is_empty() {
            return Err(SurpriseError::invalid_config("no sample sizes configured"));
        }
        if self.sample_sizes.contains(&0) {
            return Err(SurpriseError::invalid_config("sample sizes must be positive"));
        }
        if self.sample_sizes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SurpriseError::invalid_config(
                "sample sizes must be strictly ascending",
            ));
        }
        if self.trials == 0 {
            return Err(SurpriseError::invalid_config("trial count must be positive"));
        }
        Ok(())
    }
}

/// Averaged outcome for one sample size.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleSizeResult {
    pub sample_size: usize,
    /// Mean of the plain expected rewards.
    pub mean_reward: f64,
    /// Mean over the independent slack-corrected batch.
    pub mean_slack_reward: f64,
    /// Per-trial plain rewards, in trial order.
    pub rewards: Vec<f64>,
}

/// Everything measured for one population.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationResult<E> {
    pub population: Vec<E>,
    /// Entropy (nats) of the reference distribution.
    pub entropy: f64,
    /// One entry per configured sample size, ascending.
    pub sample_sizes: Vec<SampleSizeResult>,
}

impl<E> PopulationResult<E> {
    /// `(sample_size, mean_reward)` pairs, ascending by sample size.
    pub fn reward_curve(&self) -> Vec<(usize, f64)> {
        self.sample_sizes
            .iter()
            .map(|r| (r.sample_size, r.mean_reward))
            .collect()
    }
}

/// A configured experiment with an optional fixed seed.
///
/// Without a seed, [`Experiment::run`] draws one from the thread RNG.
#[derive(Debug, Clone)]
pub struct Experiment<E> {
    config: ExperimentConfig<E>,
    seed: Option<u64>,
}

impl<E: Event> Experiment<E> {
    pub fn new(config: ExperimentConfig<E>) -> Self {
        Self { config, seed: None }
    }

    /// Fix the run seed (reproducible results).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &ExperimentConfig<E> {
        &self.config
    }

    /// Run every population × sample size × trial.
    pub fn run(&self) -> Result<Vec<PopulationResult<E>>, SurpriseError> {
        run_seeded(&self.config, self.run_seed(), sequential_batch::<E>)
    }

    fn run_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[cfg(feature = "parallel")]
impl<E: Event + Send + Sync> Experiment<E> {
    /// [`Experiment::run`] with the trials of each batch on rayon's pool.
    ///
    /// For a fixed seed the results are identical to [`Experiment::run`].
    pub fn run_parallel(&self) -> Result<Vec<PopulationResult<E>>, SurpriseError> {
        run_seeded(&self.config, self.run_seed(), parallel_batch::<E>)
    }
}

/// Run `config`, taking the run seed from `rng`.
pub fn run_experiment<E: Event, R: Rng + ?Sized>(
    config: &ExperimentConfig<E>,
    rng: &mut R,
) -> Result<Vec<PopulationResult<E>>, SurpriseError> {
    run_seeded(config, rng.gen(), sequential_batch::<E>)
}

/// [`run_experiment`] with the trials of each batch on rayon's pool.
#[cfg(feature = "parallel")]
pub fn run_experiment_parallel<E, R>(
    config: &ExperimentConfig<E>,
    rng: &mut R,
) -> Result<Vec<PopulationResult<E>>, SurpriseError>
where
    E: Event + Send + Sync,
    R: Rng + ?Sized,
{
    run_seeded(config, rng.gen(), parallel_batch::<E>)
}

/// Everything one batch of trials needs; `base.trial` is ignored.
struct Batch<'a, E: Ord> {
    reference: &'a Categorical<E>,
    sampler: &'a Sampler<E>,
    sample_size: usize,
    trials: usize,
    run_seed: u64,
    base: TrialCoord,
}

impl<E: Event> Batch<'_, E> {
    fn trial(&self, trial: usize) -> f64 {
        let seed = trial_seed(self.run_seed, TrialCoord { trial, ..self.base });
        run_trial(
            self.reference,
            self.sampler,
            self.sample_size,
            seed,
            self.base.phase,
        )
    }
}

fn run_seeded<E, B>(
    config: &ExperimentConfig<E>,
    seed: u64,
    run_batch: B,
) -> Result<Vec<PopulationResult<E>>, SurpriseError>
where
    E: Event,
    B: Fn(&Batch<'_, E>) -> Vec<f64>,
{
    config.validate()?;
    info!(
        seed,
        populations = config.populations.len(),
        sample_sizes = config.sample_sizes.len(),
        trials = config.trials,
        "starting experiment"
    );

    let mut out = Vec::with_capacity(config.populations.len());
    for (pi, population) in config.populations.iter().enumerate() {
        let span = info_span!("population", index = pi, size = population.len());
        let _enter = span.enter();

        let reference = Categorical::from_events(population.iter().cloned());
        let sampler = reference.sampler()?;
        let entropy = reference.entropy();
        info!(entropy, events = reference.len(), "trained reference");

        let mut results = Vec::with_capacity(config.sample_sizes.len());
        for (si, &sample_size) in config.sample_sizes.iter().enumerate() {
            let base = TrialCoord {
                population: pi,
                size_index: si,
                phase: TrialPhase::Plain,
                trial: 0,
            };
            let plain = Batch {
                reference: &reference,
                sampler: &sampler,
                sample_size,
                trials: config.trials,
                run_seed: seed,
                base,
            };
            let rewards = run_batch(&plain);
            let slack_rewards = run_batch(&Batch {
                base: TrialCoord {
                    phase: TrialPhase::Slack,
                    ..base
                },
                ..plain
            });
            let mean_reward = mean(&rewards);
            let mean_slack_reward = mean(&slack_rewards);
            debug!(sample_size, mean_reward, mean_slack_reward, "sample size done");

            results.push(SampleSizeResult {
                sample_size,
                mean_reward,
                mean_slack_reward,
                rewards,
            });
        }

        out.push(PopulationResult {
            population: population.clone(),
            entropy,
            sample_sizes: results,
        });
    }
    Ok(out)
}

fn sequential_batch<E: Event>(batch: &Batch<'_, E>) -> Vec<f64> {
    (0..batch.trials).map(|t| batch.trial(t)).collect()
}

#[cfg(feature = "parallel")]
fn parallel_batch<E: Event + Send + Sync>(batch: &Batch<'_, E>) -> Vec<f64> {
    (0..batch.trials)
        .into_par_iter()
        .map(|t| batch.trial(t))
        .collect()
}

/// One trial: sample, train a candidate, score it.
fn run_trial<E: Event>(
    reference: &Categorical<E>,
    sampler: &Sampler<E>,
    sample_size: usize,
    seed: u64,
    phase: TrialPhase,
) -> f64 {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut candidate = Categorical::new();
    for _ in 0..sample_size {
        candidate.learn(sampler.draw(&mut rng).clone());
    }
    match phase {
        TrialPhase::Plain => expected_reward(reference, &candidate),
        TrialPhase::Slack => expected_reward_with_slack(reference, &candidate),
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}
