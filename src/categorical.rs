//! Online-learned categorical distribution.
//!
//! Weights are integer counts, so probabilities are exact empirical frequencies
//! (maximum likelihood, no smoothing). Unseen events simply have probability 0;
//! the reward clamp downstream absorbs the boundary.
//!
//! Events are kept in a `BTreeMap`, so iteration order is stable and seeded runs
//! are reproducible.

use rand::Rng;
use rand_distr::{Distribution, WeightedIndex};
use std::collections::BTreeMap;

use crate::SurpriseError;

/// Categorical distribution over events of type `E`, learned one observation at a time.
///
/// # Example
///
/// ```rust
/// use sample_surprise::Categorical;
///
/// let d = Categorical::from_events(["a", "a", "b", "c"]);
/// assert_eq!(d.weight_sum(), 4);
/// assert_eq!(d.prob(&"a"), 0.5);
/// assert_eq!(d.prob(&"z"), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Categorical<E: Ord> {
    weights: BTreeMap<E, u64>,
    total: u64,
}

impl<E: Ord> Default for Categorical<E> {
    fn default() -> Self {
        Self {
            weights: BTreeMap::new(),
            total: 0,
        }
    }
}

impl<E: Ord + Clone> Categorical<E> {
    /// Create an empty distribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn every event in `events`, in order.
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = E>,
    {
        let mut d = Self::new();
        for e in events {
            d.learn(e);
        }
        d
    }

    /// Record one observation of `event`.
    pub fn learn(&mut self, event: E) {
        self.learn_weighted(event, 1);
    }

    /// Record `weight` observations of `event` at once.
    ///
    /// A zero weight is not an observation and leaves the distribution unchanged.
    pub fn learn_weighted(&mut self, event: E, weight: u64) {
        if weight == 0 {
            return;
        }
        let w = self.weights.entry(event).or_insert(0);
        *w = w.saturating_add(weight);
        self.total = self.total.saturating_add(weight);
    }

    /// Accumulated weight of `event` (0 if never seen).
    pub fn weight(&self, event: &E) -> u64 {
        self.weights.get(event).copied().unwrap_or(0)
    }

    /// Empirical probability of `event`.
    ///
    /// Returns 0 for unseen events and for an empty distribution.
    pub fn prob(&self, event: &E) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.weight(event) as f64 / self.total as f64
    }

    /// Distinct events observed so far, in ascending order.
    pub fn events(&self) -> impl Iterator<Item = &E> + '_ {
        self.weights.keys()
    }

    /// Number of distinct events.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True when nothing has been observed (`weight_sum() == 0`).
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Total accumulated weight (the number of unit `learn` calls).
    pub fn weight_sum(&self) -> u64 {
        self.total
    }

    /// Probability mass function in event order.
    pub fn pmf(&self) -> Vec<(E, f64)> {
        self.weights
            .keys()
            .map(|e| (e.clone(), self.prob(e)))
            .collect()
    }

    /// Shannon entropy in nats: `H = -Σ p ln p` over events with nonzero weight.
    ///
    /// Zero for a single-event or empty distribution.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let n = self.total as f64;
        let h: f64 = self
            .weights
            .values()
            .filter(|&&w| w > 0)
            .map(|&w| {
                let p = w as f64 / n;
                -p * p.ln()
            })
            .sum();
        // -1 * ln(1) is -0.0; report a plain zero.
        h.max(0.0)
    }

    /// Draw one event with probability `weight(e) / weight_sum()`.
    ///
    /// Uses an exact integer inverse-CDF walk over the ordered weights.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<E, SurpriseError> {
        if self.total == 0 {
            return Err(SurpriseError::EmptyDistribution);
        }
        let mut target = rng.gen_range(0..self.total);
        for (e, &w) in &self.weights {
            if target < w {
                return Ok(e.clone());
            }
            target -= w;
        }
        // Unreachable while `total == Σ weights`.
        Err(SurpriseError::EmptyDistribution)
    }

    /// Draw `n` independent events.
    pub fn sample_n<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
    ) -> Result<Vec<E>, SurpriseError> {
        let sampler = self.sampler()?;
        Ok((0..n).map(|_| sampler.draw(rng).clone()).collect())
    }

    /// Freeze the current weights into a [`Sampler`] for repeated draws.
    pub fn sampler(&self) -> Result<Sampler<E>, SurpriseError> {
        if self.total == 0 {
            return Err(SurpriseError::EmptyDistribution);
        }
        let (events, weights): (Vec<E>, Vec<u64>) = self
            .weights
            .iter()
            .map(|(e, &w)| (e.clone(), w))
            .unzip();
        let index = WeightedIndex::new(weights).map_err(|_| SurpriseError::EmptyDistribution)?;
        Ok(Sampler { events, index })
    }
}

impl<E: Ord + Clone> FromIterator<E> for Categorical<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::from_events(iter)
    }
}

impl<E: Ord + Clone> Extend<E> for Categorical<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for e in iter {
            self.learn(e);
        }
    }
}

/// Snapshot of a [`Categorical`] prepared for fast repeated sampling.
///
/// Later `learn` calls on the source distribution do not affect the snapshot.
#[derive(Debug, Clone)]
pub struct Sampler<E> {
    events: Vec<E>,
    index: WeightedIndex<u64>,
}

impl<E> Sampler<E> {
    /// Draw one event by reference.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &E {
        &self.events[self.index.sample(rng)]
    }
}

impl<E: Clone> Distribution<E> for Sampler<E> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> E {
        self.draw(rng).clone()
    }
}
