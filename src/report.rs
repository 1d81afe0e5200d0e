//! Plain-text console report.
//!
//! Per population, in input order:
//!
//! ```text
//! -------
//! Population: [a, b]
//! Entropy: 0.6931471805599453
//!   Sample size: 1
//!   Avg. Expected reward: 9.210240366975849
//!   ...
//! 1	9.2102
//! ...
//! ```
//!
//! The trailing tab-separated pairs (sample size, mean reward to 5 significant
//! digits) can be pasted straight into a curve-fitting tool.

use std::fmt::Display;
use std::io::{self, Write};

use crate::PopulationResult;

/// Significant digits in the reward table.
pub const TABLE_SIGNIFICANT_DIGITS: usize = 5;

const SEPARATOR: &str = "-------";

/// Write the report for every population.
pub fn write_report<W, E>(w: &mut W, results: &[PopulationResult<E>]) -> io::Result<()>
where
    W: Write + ?Sized,
    E: Display,
{
    for r in results {
        write_population_report(w, r)?;
    }
    Ok(())
}

/// Write the header, per-sample-size summary and reward table of one population.
pub fn write_population_report<W, E>(w: &mut W, result: &PopulationResult<E>) -> io::Result<()>
where
    W: Write + ?Sized,
    E: Display,
{
    writeln!(w, "{SEPARATOR}")?;
    writeln!(w, "Population: {}", format_population(&result.population))?;
    writeln!(w, "Entropy: {}", result.entropy)?;
    for s in &result.sample_sizes {
        writeln!(w, "  Sample size: {}", s.sample_size)?;
        writeln!(w, "  Avg. Expected reward: {}", s.mean_reward)?;
    }
    write_reward_table(w, result)
}

/// Write `sample_size<TAB>mean_reward` lines, ascending by sample size.
pub fn write_reward_table<W, E>(w: &mut W, result: &PopulationResult<E>) -> io::Result<()>
where
    W: Write + ?Sized,
{
    for (size, reward) in result.reward_curve() {
        writeln!(
            w,
            "{size}\t{}",
            format_significant(reward, TABLE_SIGNIFICANT_DIGITS)
        )?;
    }
    Ok(())
}

/// Render the report as a `String`.
pub fn report_string<E: Display>(results: &[PopulationResult<E>]) -> String {
    let mut buf = Vec::new();
    write_report(&mut buf, results).expect("writing to a Vec cannot fail");
    String::from_utf8_lossy(&buf).into_owned()
}

/// `[a, b, c]`.
pub fn format_population<E: Display>(population: &[E]) -> String {
    let items: Vec<String> = population.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Format `x` with `digits` significant digits, in positional notation.
///
/// Very large or very small magnitudes are not switched to exponent form:
/// `1e20` prints all 21 digits and `1e-20` prints its leading zeros.
///
/// ```rust
/// use sample_surprise::format_significant;
///
/// assert_eq!(format_significant(0.6931471805599453, 5), "0.69315");
/// assert_eq!(format_significant(9.999996, 5), "10.000");
/// assert_eq!(format_significant(1234567.0, 5), "1234600");
/// ```
#[must_use]
pub fn format_significant(x: f64, digits: usize) -> String {
    let digits = digits.max(1) as i32;
    if !x.is_finite() {
        return x.to_string();
    }
    if x == 0.0 {
        return format!("{:.*}", (digits - 1) as usize, 0.0);
    }
    let mut magnitude = x.abs().log10().floor() as i32;
    // Rounding can carry into the next power of ten (9.99996 -> 10.000).
    if round_to_decimals(x, digits - 1 - magnitude).abs() >= 10f64.powi(magnitude + 1) {
        magnitude += 1;
    }
    let decimals = digits - 1 - magnitude;
    if decimals >= 0 {
        format!("{:.*}", decimals as usize, x)
    } else {
        format!("{:.0}", round_to_decimals(x, decimals))
    }
}

fn round_to_decimals(x: f64, decimals: i32) -> f64 {
    if decimals >= 0 {
        let scale = 10f64.powi(decimals);
        (x * scale).round() / scale
    } else {
        let step = 10f64.powi(-decimals);
        (x / step).round() * step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SampleSizeResult;

    fn fixture() -> PopulationResult<&'static str> {
        PopulationResult {
            population: vec!["a", "b"],
            entropy: 2.0_f64.ln(),
            sample_sizes: vec![
                SampleSizeResult {
                    sample_size: 1,
                    mean_reward: 9.210240366975849,
                    mean_slack_reward: 10.16,
                    rewards: vec![9.210240366975849],
                },
                SampleSizeResult {
                    sample_size: 2,
                    mean_reward: 4.75,
                    mean_slack_reward: 5.5,
                    rewards: vec![9.5, 0.0],
                },
            ],
        }
    }

    #[test]
    fn report_layout() {
        let out = report_string(&[fixture()]);
        let expected = "\
-------
Population: [a, b]
Entropy: 0.6931471805599453
  Sample size: 1
  Avg. Expected reward: 9.210240366975849
  Sample size: 2
  Avg. Expected reward: 4.75
1\t9.2102
2\t4.7500
";
        assert_eq!(out, expected);
    }

    #[test]
    fn populations_are_reported_in_input_order() {
        let mut second = fixture();
        second.population = vec!["x"];
        let out = report_string(&[fixture(), second]);
        let first_at = out.find("Population: [a, b]").unwrap();
        let second_at = out.find("Population: [x]").unwrap();
        assert!(first_at < second_at);
        assert_eq!(out.matches(SEPARATOR).count(), 2);
    }

    #[test]
    fn significant_digits() {
        assert_eq!(format_significant(0.0, 5), "0.0000");
        assert_eq!(format_significant(-0.012345678, 3), "-0.0123");
        assert_eq!(format_significant(12.0, 5), "12.000");
        assert_eq!(format_significant(99999.7, 5), "100000");
        assert_eq!(format_significant(f64::INFINITY, 5), "inf");
    }

    #[test]
    fn extreme_magnitudes_stay_positional() {
        assert_eq!(format_significant(1e20, 3), "100000000000000000000");
        assert_eq!(format_significant(1.5e-7, 2), "0.00000015");
    }

    #[test]
    fn report_string_matches_streamed_report() {
        let results = [fixture()];
        let mut buf = Vec::new();
        write_report(&mut buf, &results).unwrap();
        assert_eq!(report_string(&results).as_bytes(), &buf[..]);
    }

    #[test]
    fn empty_population_renders_brackets() {
        assert_eq!(format_population::<u8>(&[]), "[]");
        assert_eq!(format_population(&[1, 2, 3]), "[1, 2, 3]");
    }
}
