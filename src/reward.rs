//! Log-odds reward between a reference probability and an estimate.
//!
//! The reward is the difference in logits, so errors near 0 or 1 weigh much more
//! than the same absolute error near 0.5. Both inputs are clamped into
//! `[REWARD_EPS, 1 - REWARD_EPS]` first, which keeps the function finite for
//! unseen events (`p == 0`) and certain events (`p == 1`).

/// Clamp margin applied to both probabilities before taking logits.
pub const REWARD_EPS: f64 = 1e-4;

/// Clamp `p` into `[REWARD_EPS, 1 - REWARD_EPS]`.
///
/// NaN maps to `REWARD_EPS`.
#[must_use]
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        return REWARD_EPS;
    }
    p.clamp(REWARD_EPS, 1.0 - REWARD_EPS)
}

/// Log-odds `ln(p / (1 - p))` of a clamped probability.
#[must_use]
pub fn logit(p: f64) -> f64 {
    let p = clamp_probability(p);
    (p / (1.0 - p)).ln()
}

/// Reward for estimating `prior` as `p`: `logit(p) - logit(prior)`.
///
/// Positive when the estimate overshoots the reference, negative when it
/// undershoots, zero when they agree.
///
/// # Example
///
/// ```rust
/// use sample_surprise::reward;
///
/// assert_eq!(reward(0.3, 0.3), 0.0);
/// assert!(reward(0.3, 0.5) > 0.0);
/// assert!(reward(0.3, 0.0).is_finite());
/// ```
#[must_use]
pub fn reward(prior: f64, p: f64) -> f64 {
    logit(p) - logit(prior)
}
