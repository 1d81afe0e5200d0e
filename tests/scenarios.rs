//! End-to-end scenarios for the sample-size sweep.
//!
//! All runs are seeded, so the statistical assertions are deterministic; the
//! margins are still wide enough to hold for any seed with high probability.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sample_surprise::{
    expected_reward, expected_reward_with_slack, report_string, trial_seed, Categorical,
    Experiment, ExperimentConfig, PopulationResult, SurpriseError, TrialCoord, TrialPhase,
};

fn skewed() -> Vec<char> {
    vec!['a', 'a', 'a', 'a', 'a', 'a', 'a', 'b', 'c', 'd']
}

fn mean_reward_at(population: Vec<char>, sample_size: usize, trials: usize, seed: u64) -> f64 {
    let cfg = ExperimentConfig::new(vec![population])
        .sample_sizes(vec![sample_size])
        .trials(trials);
    let res = Experiment::new(cfg).with_seed(seed).run().unwrap();
    res[0].sample_sizes[0].mean_reward
}

#[test]
fn uniform_pair_is_easier_than_skewed_tail_at_sample_size_two() {
    let uniform = mean_reward_at(vec!['a', 'b'], 2, 1000, 2024);
    let skewed = mean_reward_at(skewed(), 2, 1000, 2024);
    assert!(uniform.is_finite() && uniform > 0.0, "uniform={uniform}");
    assert!(skewed.is_finite());
    assert!(uniform < skewed, "uniform={uniform} skewed={skewed}");
}

#[test]
fn uniform_pair_at_sample_size_two_is_about_half_the_clamp_penalty() {
    // Half of the trials see both symbols (reward 0); the other half see one
    // symbol twice (reward |logit(eps)| for both events).
    let penalty = sample_surprise::logit(sample_surprise::REWARD_EPS).abs();
    let m = mean_reward_at(vec!['a', 'b'], 2, 4000, 5);
    assert!((m - penalty / 2.0).abs() < 0.5, "m={m} penalty={penalty}");
}

#[test]
fn population_entropies() {
    let cfg = ExperimentConfig::new(vec![vec!['a', 'b'], vec!['a', 'b', 'c', 'd', 'e']])
        .sample_sizes(vec![1])
        .trials(1);
    let res = Experiment::new(cfg).with_seed(0).run().unwrap();
    assert!((res[0].entropy - std::f64::consts::LN_2).abs() < 1e-12);
    assert!((res[1].entropy - 5.0_f64.ln()).abs() < 1e-12);
    assert!((res[1].entropy - 1.609).abs() < 1e-3);
}

#[test]
fn mean_reward_does_not_increase_with_sample_size() {
    let sizes: Vec<usize> = (0..=9).map(|k| 1usize << k).collect();
    let cfg = ExperimentConfig::new(vec![skewed(), vec!['a', 'b', 'c']])
        .sample_sizes(sizes)
        .trials(500);
    let res = Experiment::new(cfg).with_seed(31).run().unwrap();
    for pop in &res {
        let curve = pop.reward_curve();
        for w in curve.windows(2) {
            let ((s0, r0), (s1, r1)) = (w[0], w[1]);
            assert!(
                r1 <= r0 + 0.02,
                "reward rose from {r0} at {s0} to {r1} at {s1} for {:?}",
                pop.population
            );
        }
        let first = curve.first().unwrap().1;
        let last = curve.last().unwrap().1;
        assert!(last < first / 10.0, "first={first} last={last}");
    }
}

#[test]
fn sampling_frequencies_converge_to_reference() {
    let reference = Categorical::from_events(skewed());
    let mut rng = StdRng::seed_from_u64(99);
    let n = 100_000;
    let sample = reference.sample_n(&mut rng, n).unwrap();
    let empirical = Categorical::from_events(sample);
    assert_eq!(empirical.weight_sum(), n as u64);
    for e in reference.events() {
        let diff = (empirical.prob(e) - reference.prob(e)).abs();
        assert!(diff < 0.01, "event {e}: diff {diff}");
    }
    // A well-converged estimate scores close to zero.
    assert!(expected_reward(&reference, &empirical) < 0.05);
}

#[test]
fn exact_sampler_and_frozen_sampler_agree_in_distribution() {
    let reference = Categorical::from_events(skewed());
    let mut rng = StdRng::seed_from_u64(8);
    let n = 50_000;
    let exact = Categorical::from_events((0..n).map(|_| reference.sample(&mut rng).unwrap()));
    let frozen = Categorical::from_events(reference.sample_n(&mut rng, n).unwrap());
    for e in reference.events() {
        assert!((exact.prob(e) - frozen.prob(e)).abs() < 0.02);
    }
}

#[test]
fn slack_batch_stays_close_to_plain_plus_slack() {
    let cfg = ExperimentConfig::new(vec![vec!['a', 'b', 'c']])
        .sample_sizes(vec![1, 8, 64])
        .trials(2000);
    let res = Experiment::new(cfg).with_seed(17).run().unwrap();
    for s in &res[0].sample_sizes {
        let expected = s.mean_reward + sample_surprise::slack(s.sample_size as f64);
        assert!(
            (s.mean_slack_reward - expected).abs() < 0.3,
            "size {}: slack mean {} vs {}",
            s.sample_size,
            s.mean_slack_reward,
            expected
        );
    }
}

/// Recompute every trial of a seeded run one at a time, in trial order, and
/// check the run reproduced each reward bit for bit.
fn assert_trials_replay(cfg: &ExperimentConfig<char>, seed: u64, res: &[PopulationResult<char>]) {
    for (pi, population) in cfg.populations.iter().enumerate() {
        let reference = Categorical::from_events(population.iter().copied());
        let sampler = reference.sampler().unwrap();
        for (si, s) in res[pi].sample_sizes.iter().enumerate() {
            let replay = |phase: TrialPhase| -> Vec<f64> {
                (0..cfg.trials)
                    .map(|trial| {
                        let coord = TrialCoord {
                            population: pi,
                            size_index: si,
                            phase,
                            trial,
                        };
                        let mut rng = StdRng::seed_from_u64(trial_seed(seed, coord));
                        let candidate: Categorical<char> =
                            (0..s.sample_size).map(|_| *sampler.draw(&mut rng)).collect();
                        match phase {
                            TrialPhase::Plain => expected_reward(&reference, &candidate),
                            TrialPhase::Slack => expected_reward_with_slack(&reference, &candidate),
                        }
                    })
                    .collect()
            };

            let plain = replay(TrialPhase::Plain);
            let got: Vec<u64> = s.rewards.iter().map(|r| r.to_bits()).collect();
            let want: Vec<u64> = plain.iter().map(|r| r.to_bits()).collect();
            assert_eq!(got, want, "population {pi}, sample size {}", s.sample_size);

            let slack = replay(TrialPhase::Slack);
            let slack_mean = slack.iter().sum::<f64>() / slack.len() as f64;
            assert_eq!(s.mean_slack_reward.to_bits(), slack_mean.to_bits());
        }
    }
}

#[test]
fn seeded_run_matches_trial_by_trial_replay() {
    let cfg = ExperimentConfig::new(vec![vec!['a', 'b'], skewed()])
        .sample_sizes(vec![1, 4, 32])
        .trials(64);
    let seed = 0x5EED;
    let res = Experiment::new(cfg.clone()).with_seed(seed).run().unwrap();
    assert_trials_replay(&cfg, seed, &res);
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_run_matches_trial_by_trial_replay() {
    let cfg = ExperimentConfig::new(vec![vec!['a', 'b'], skewed()])
        .sample_sizes(vec![1, 4, 32])
        .trials(256);
    let seed = 0x5EED;
    let exp = Experiment::new(cfg.clone()).with_seed(seed);
    let parallel = exp.run_parallel().unwrap();
    assert_trials_replay(&cfg, seed, &parallel);
    assert_eq!(parallel, exp.run().unwrap());
}

#[test]
fn empty_population_aborts_before_any_output() {
    let cfg = ExperimentConfig::new(vec![vec!['a'], vec![]])
        .sample_sizes(vec![1])
        .trials(1);
    let err = Experiment::new(cfg).run().unwrap_err();
    assert_eq!(err, SurpriseError::EmptyPopulation { index: 1 });
    assert_eq!(err.to_string(), "population 1 is empty");
}

#[test]
fn report_contains_every_population_and_sample_size() {
    let cfg = ExperimentConfig::new(vec![vec!['a', 'b'], skewed()])
        .sample_sizes(vec![1, 2, 4])
        .trials(20);
    let res = Experiment::new(cfg).with_seed(1).run().unwrap();
    let out = report_string(&res);

    assert_eq!(out.matches("-------\n").count(), 2);
    assert!(out.contains("Population: [a, b]\n"));
    assert!(out.contains("Population: [a, a, a, a, a, a, a, b, c, d]\n"));
    assert_eq!(out.matches("  Sample size: ").count(), 6);
    assert_eq!(out.matches("  Avg. Expected reward: ").count(), 6);
    let table_rows = out
        .lines()
        .filter(|l| l.split('\t').count() == 2)
        .count();
    assert_eq!(table_rows, 6);
}

#[cfg(feature = "serde")]
#[test]
fn results_round_trip_through_json() {
    let cfg = ExperimentConfig::new(vec![vec!['x', 'y']])
        .sample_sizes(vec![1, 2])
        .trials(5);
    let res = Experiment::new(cfg.clone()).with_seed(4).run().unwrap();
    let json = serde_json::to_string(&res).unwrap();
    let back: Vec<sample_surprise::PopulationResult<char>> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), res.len());
    assert_eq!(back[0].population, res[0].population);
    assert!((back[0].entropy - res[0].entropy).abs() < 1e-12);
    for (b, r) in back[0].sample_sizes.iter().zip(&res[0].sample_sizes) {
        assert_eq!(b.sample_size, r.sample_size);
        assert_eq!(b.rewards.len(), r.rewards.len());
        assert!((b.mean_reward - r.mean_reward).abs() < 1e-12);
    }

    let cfg_json = serde_json::to_string(&cfg).unwrap();
    let cfg_back: ExperimentConfig<char> = serde_json::from_str(&cfg_json).unwrap();
    assert_eq!(cfg_back, cfg);
}
