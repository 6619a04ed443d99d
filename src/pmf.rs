//! Probability mass functions over `{0, 1, .., n-1}` and their convolution history

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::convolution::convolve_full;

/// Relative tolerance used when checking that a PMF sums to one.
pub const SUM_RTOL: f64 = 1e-5;
/// Absolute tolerance used when checking that a PMF sums to one.
pub const SUM_ATOL: f64 = 1e-8;

/// Reason a probability vector was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidDistribution {
    #[error("distribution has no entries")]
    Empty,
    #[error("entry {index} is not finite")]
    NonFinite { index: usize },
    #[error("entry {index} is negative ({value})")]
    Negative { index: usize, value: f64 },
    #[error("entries sum to {sum}, expected 1")]
    NotNormalized { sum: f64 },
    #[error("largest entry is {max}, distribution has zero variance")]
    ZeroVariance { max: f64 },
}

/// Validated probability mass function.
///
/// Entries are non-negative, sum to one within tolerance and none of them
/// reaches one, so the distribution always has non-zero variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Pmf {
    probs: Vec<f64>,
}

impl Pmf {
    /// Build a PMF, rejecting malformed input
    pub fn new(probs: Vec<f64>) -> Result<Self, InvalidDistribution> {
        Self::validate(&probs)?;
        Ok(Self { probs })
    }

    /// Fair die with `sides` faces on support `{0, .., sides-1}`
    pub fn uniform(sides: usize) -> Result<Self, InvalidDistribution> {
        Self::new(vec![1.0 / sides as f64; sides])
    }

    /// Check every precondition without taking ownership.
    ///
    /// Checks run in a fixed order: emptiness, finiteness, sign,
    /// normalisation, then variance.
    pub fn validate(probs: &[f64]) -> Result<(), InvalidDistribution> {
        if probs.is_empty() {
            return Err(InvalidDistribution::Empty);
        }

        if let Some(index) = probs.iter().position(|p| !p.is_finite()) {
            return Err(InvalidDistribution::NonFinite { index });
        }

        if let Some((index, &value)) = probs.iter().enumerate().find(|&(_, &p)| p < 0.0) {
            return Err(InvalidDistribution::Negative { index, value });
        }

        let sum: f64 = probs.iter().sum();
        if !is_close(sum, 1.0) {
            return Err(InvalidDistribution::NotNormalized { sum });
        }

        let max = probs.iter().copied().fold(0.0_f64, f64::max);
        if max >= 1.0 {
            return Err(InvalidDistribution::ZeroVariance { max });
        }

        Ok(())
    }

    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Always false for a validated PMF
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    pub fn total_mass(&self) -> f64 {
        self.probs.iter().sum()
    }

    pub fn max_prob(&self) -> f64 {
        self.probs.iter().copied().fold(0.0_f64, f64::max)
    }

    /// Expected value of the underlying random variable
    pub fn mean(&self) -> f64 {
        self.probs
            .iter()
            .enumerate()
            .map(|(k, &p)| k as f64 * p)
            .sum()
    }

    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.probs
            .iter()
            .enumerate()
            .map(|(k, &p)| {
                let d = k as f64 - mean;
                p * d * d
            })
            .sum()
    }

    /// Distribution of `X + Y` for independent `X ~ self`, `Y ~ other`.
    ///
    /// Mass and non-zero variance carry over from the inputs, so the result
    /// is not re-validated.
    pub fn convolve(&self, other: &Pmf) -> Pmf {
        Pmf {
            probs: convolve_full(&self.probs, &other.probs),
        }
    }
}

impl TryFrom<Vec<f64>> for Pmf {
    type Error = InvalidDistribution;

    fn try_from(probs: Vec<f64>) -> Result<Self, Self::Error> {
        Pmf::new(probs)
    }
}

impl From<Pmf> for Vec<f64> {
    fn from(pmf: Pmf) -> Self {
        pmf.probs
    }
}

/// Append-only sequence of PMFs produced by repeated self-convolution.
///
/// Entry `k` is the distribution of the sum of `k + 1` independent draws from
/// the initial PMF.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PmfHistory {
    entries: Vec<Pmf>,
}

impl PmfHistory {
    pub fn new(initial: Pmf) -> Self {
        Self {
            entries: vec![initial],
        }
    }

    /// Append `latest * initial` and return it
    pub fn advance(&mut self) -> &Pmf {
        let next = self.latest().convolve(self.initial());
        self.entries.push(next);
        self.latest()
    }

    pub fn initial(&self) -> &Pmf {
        &self.entries[0]
    }

    pub fn latest(&self) -> &Pmf {
        &self.entries[self.entries.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&Pmf> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false, the initial PMF is never removed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pmf> {
        self.entries.iter()
    }
}

fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= SUM_ATOL + SUM_RTOL * b.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rejects_negative_entry() {
        let err = Pmf::new(vec![-0.1, 1.1]).unwrap_err();
        assert_eq!(
            err,
            InvalidDistribution::Negative {
                index: 0,
                value: -0.1
            }
        );
    }

    #[test]
    fn test_rejects_unnormalized() {
        let err = Pmf::new(vec![0.5, 0.4]).unwrap_err();
        assert!(matches!(err, InvalidDistribution::NotNormalized { .. }));
    }

    #[test]
    fn test_rejects_point_mass() {
        let err = Pmf::new(vec![1.0]).unwrap_err();
        assert_eq!(err, InvalidDistribution::ZeroVariance { max: 1.0 });

        let err = Pmf::new(vec![0.0, 1.0, 0.0]).unwrap_err();
        assert!(matches!(err, InvalidDistribution::ZeroVariance { .. }));
    }

    #[test]
    fn test_rejects_empty_and_nan() {
        assert_eq!(Pmf::new(vec![]).unwrap_err(), InvalidDistribution::Empty);
        assert_eq!(
            Pmf::new(vec![0.5, f64::NAN]).unwrap_err(),
            InvalidDistribution::NonFinite { index: 1 }
        );
    }

    #[test]
    fn test_accepts_sum_within_tolerance() {
        assert!(Pmf::new(vec![0.1; 10]).is_ok());
        assert!(Pmf::new(vec![0.5, 0.5 + 1e-9]).is_ok());
    }

    #[test]
    fn test_uniform_die() {
        let die = Pmf::uniform(6).unwrap();
        assert_eq!(die.len(), 6);
        assert_abs_diff_eq!(die.mean(), 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(die.variance(), 35.0 / 12.0, epsilon = 1e-12);
        assert!(Pmf::uniform(1).is_err());
        assert!(Pmf::uniform(0).is_err());
    }

    #[test]
    fn test_convolve_coin_with_itself() {
        let coin = Pmf::new(vec![0.5, 0.5]).unwrap();
        let two = coin.convolve(&coin);
        assert_eq!(two.probs(), &[0.25, 0.5, 0.25]);
        assert_abs_diff_eq!(two.mean(), 2.0 * coin.mean(), epsilon = 1e-12);
        assert_abs_diff_eq!(two.variance(), 2.0 * coin.variance(), epsilon = 1e-12);
    }

    #[test]
    fn test_history_grows_by_support() {
        let pmf = Pmf::new(vec![0.2, 0.3, 0.5]).unwrap();
        let mut history = PmfHistory::new(pmf);
        history.advance();
        history.advance();

        assert_eq!(history.len(), 3);
        assert_eq!(history.get(1).map(Pmf::len), Some(5));
        assert_eq!(history.latest().len(), 7);
        assert_abs_diff_eq!(history.latest().total_mass(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let pmf: Pmf = serde_json::from_str("[0.25, 0.75]").unwrap();
        assert_eq!(pmf.probs(), &[0.25, 0.75]);
        assert!(serde_json::from_str::<Pmf>("[0.5, 0.4]").is_err());
    }
}
