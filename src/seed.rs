//! Deterministic per-trial seed derivation.
//!
//! Every trial owns its own RNG, seeded from the run seed and the trial's
//! coordinates. Trials can then run in any order (or in parallel) and still
//! produce the same numbers. Not cryptographic.

/// Which of the two trial batches a seed belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialPhase {
    /// Trials scored with the plain expected reward.
    Plain,
    /// Independent trials scored with reward plus slack.
    Slack,
}

impl TrialPhase {
    fn tag(self) -> u64 {
        match self {
            TrialPhase::Plain => 0x504C_4149, // "PLAI"
            TrialPhase::Slack => 0x534C_4143, // "SLAC"
        }
    }
}

/// Coordinates of one trial inside a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialCoord {
    pub population: usize,
    pub size_index: usize,
    pub phase: TrialPhase,
    pub trial: usize,
}

/// Seed for the trial at `coord` in a run seeded with `run_seed`.
#[must_use]
pub fn trial_seed(run_seed: u64, coord: TrialCoord) -> u64 {
    let mut h = splitmix64(run_seed);
    h = splitmix64(h ^ coord.population as u64);
    h = splitmix64(h ^ coord.size_index as u64);
    h = splitmix64(h ^ coord.phase.tag());
    splitmix64(h ^ coord.trial as u64)
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
