//! Small-sample slack: an exploratory additive correction to the expected reward.

/// Peak slack, reached at a single observation.
pub const SLACK_PEAK: f64 = 0.95;

/// Width of the log-space bump (`2σ²` with `σ² = 3`).
const SLACK_LOG_WIDTH: f64 = 6.0;

/// Slack for an observation count `x`: `0.95 · exp(-(ln x)² / 6)`.
///
/// A Gaussian bump in `ln x` centred on `x = 1`, so it vanishes for large
/// samples. Non-positive or non-finite `x` yields 0 (the limit as `x → 0⁺`).
///
/// # Example
///
/// ```rust
/// use sample_surprise::slack;
///
/// assert_eq!(slack(1.0), 0.95);
/// assert!(slack(4096.0) < 1e-4);
/// ```
#[must_use]
pub fn slack(x: f64) -> f64 {
    if !(x.is_finite() && x > 0.0) {
        return 0.0;
    }
    let l = x.ln();
    SLACK_PEAK * (-(l * l) / SLACK_LOG_WIDTH).exp()
}
