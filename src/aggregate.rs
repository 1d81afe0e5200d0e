//! Expected reward of a candidate distribution against a reference.

use crate::{reward, slack, Categorical};

/// Mean absolute reward over the reference's events.
///
/// The average is deliberately **unweighted** by reference frequency: the logit
/// geometry already scores divergence on rare events more heavily, which cancels
/// the fact that rare events are rarely observed. Events the candidate never saw
/// get probability 0, which the reward clamp turns into a large penalty. Events
/// only the candidate knows are ignored.
///
/// Returns 0 for an empty reference.
///
/// # Example
///
/// ```rust
/// use sample_surprise::{expected_reward, Categorical};
///
/// let truth = Categorical::from_events(["a", "b"]);
/// assert_eq!(expected_reward(&truth, &truth), 0.0);
///
/// let skewed = Categorical::from_events(["a", "a", "a", "b"]);
/// assert!(expected_reward(&truth, &skewed) > 0.0);
/// ```
pub fn expected_reward<E: Ord + Clone>(
    reference: &Categorical<E>,
    candidate: &Categorical<E>,
) -> f64 {
    let n = reference.len();
    if n == 0 {
        return 0.0;
    }
    let total: f64 = reference
        .events()
        .map(|e| reward(reference.prob(e), candidate.prob(e)).abs())
        .sum();
    total / n as f64
}

/// [`expected_reward`] plus [`slack()`] of the candidate's observation count.
pub fn expected_reward_with_slack<E: Ord + Clone>(
    reference: &Categorical<E>,
    candidate: &Categorical<E>,
) -> f64 {
    expected_reward(reference, candidate) + slack(candidate.weight_sum() as f64)
}
