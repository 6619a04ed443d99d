//! Random walk generator
//!
//! Discrete-time Brownian motion: cumulative sums of independent Gaussian
//! increments with standard deviation `sigma * sqrt(eps)`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::DemoError;

/// Upper bound on `floor(t_max / eps)`; one walk stays under 800 MB of samples
pub const MAX_WALK_STEPS: usize = 100_000_000;

/// Random walk parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkParams {
    /// Total simulated time
    pub t_max: f64,
    /// Diffusion scale
    pub sigma: f64,
    /// Time step
    pub eps: f64,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            t_max: 1.0,
            sigma: 1.0,
            eps: 0.1,
        }
    }
}

impl WalkParams {
    pub fn new(t_max: f64, sigma: f64, eps: f64) -> Self {
        Self { t_max, sigma, eps }
    }

    pub fn validate(&self) -> Result<(), DemoError> {
        if !self.eps.is_finite() || self.eps <= 0.0 {
            return Err(DemoError::InvalidWalk(format!(
                "eps must be finite and > 0, got {}",
                self.eps
            )));
        }

        if !self.t_max.is_finite() || self.t_max < 0.0 {
            return Err(DemoError::InvalidWalk(format!(
                "t_max must be finite and >= 0, got {}",
                self.t_max
            )));
        }

        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(DemoError::InvalidWalk(format!(
                "sigma must be finite and >= 0, got {}",
                self.sigma
            )));
        }

        let ratio = (self.t_max / self.eps).floor();
        if !ratio.is_finite() || ratio > MAX_WALK_STEPS as f64 {
            return Err(DemoError::InvalidWalk(format!(
                "t_max / eps must not exceed {MAX_WALK_STEPS} steps, got {ratio}"
            )));
        }

        Ok(())
    }

    /// Number of samples in the walk: `floor(t_max / eps)`
    pub fn steps(&self) -> usize {
        (self.t_max / self.eps).floor() as usize
    }

    /// Standard deviation of a single increment
    pub fn increment_std(&self) -> f64 {
        self.sigma * self.eps.sqrt()
    }
}

/// Generate a random walk from the supplied random source.
///
/// Returns the running total after every step; the starting value of zero is
/// not included. `t_max < eps` gives an empty walk.
pub fn random_walk<R: Rng + ?Sized>(
    rng: &mut R,
    params: &WalkParams,
) -> Result<Vec<f64>, DemoError> {
    params.validate()?;

    let increment = Normal::new(0.0, params.increment_std())
        .map_err(|e| DemoError::InvalidWalk(e.to_string()))?;

    let mut position = 0.0;
    let mut walk = Vec::with_capacity(params.steps());
    for _ in 0..params.steps() {
        position += increment.sample(rng);
        walk.push(position);
    }

    Ok(walk)
}

/// Generate a reproducible random walk from a seed
pub fn random_walk_seeded(params: &WalkParams, seed: u64) -> Result<Vec<f64>, DemoError> {
    let mut rng = StdRng::seed_from_u64(seed);
    random_walk(&mut rng, params)
}

/// Time stamp of every sample returned by [`random_walk`]
pub fn walk_times(params: &WalkParams) -> Vec<f64> {
    (1..=params.steps())
        .map(|k| k as f64 * params.eps)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_walk_length() {
        let walk = random_walk_seeded(&WalkParams::default(), 42).unwrap();
        assert_eq!(walk.len(), 10);
    }

    #[test]
    fn test_zero_sigma_is_flat() {
        let params = WalkParams::new(1.0, 0.0, 0.1);
        let walk = random_walk_seeded(&params, 7).unwrap();
        assert_eq!(walk, vec![0.0; 10]);
    }

    #[test]
    fn test_length_is_floor_of_ratio() {
        for &(t_max, eps) in &[(2.5, 0.3), (1.0, 0.25), (0.05, 0.1), (0.0, 0.1), (10.0, 1.0)] {
            let params = WalkParams::new(t_max, 1.0, eps);
            let walk = random_walk_seeded(&params, 1).unwrap();
            assert_eq!(walk.len(), (t_max / eps).floor() as usize);
            assert_eq!(walk_times(&params).len(), walk.len());
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let params = WalkParams::default();
        let a = random_walk_seeded(&params, 99).unwrap();
        let b = random_walk_seeded(&params, 99).unwrap();
        let c = random_walk_seeded(&params, 100).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(random_walk_seeded(&WalkParams::new(1.0, 1.0, 0.0), 0).is_err());
        assert!(random_walk_seeded(&WalkParams::new(1.0, 1.0, -0.1), 0).is_err());
        assert!(random_walk_seeded(&WalkParams::new(-1.0, 1.0, 0.1), 0).is_err());
        assert!(random_walk_seeded(&WalkParams::new(1.0, -1.0, 0.1), 0).is_err());
        assert!(random_walk_seeded(&WalkParams::new(f64::INFINITY, 1.0, 0.1), 0).is_err());
    }

    #[test]
    fn test_rejects_oversized_walk() {
        let params = WalkParams::new(1e20, 0.0, 1e-10);
        match random_walk_seeded(&params, 0) {
            Err(DemoError::InvalidWalk(msg)) => assert!(msg.contains("steps"), "{msg}"),
            other => panic!("expected InvalidWalk, got {other:?}"),
        }
        assert!(WalkParams::new(1.0, 1.0, 1e-320).validate().is_err());

        let at_limit = WalkParams::new(MAX_WALK_STEPS as f64, 1.0, 1.0);
        assert!(at_limit.validate().is_ok());
        let over_limit = WalkParams::new(MAX_WALK_STEPS as f64 + 1.0, 1.0, 1.0);
        assert!(over_limit.validate().is_err());
    }

    #[test]
    fn test_increment_variance_scales_with_eps() {
        // Var of the final value is sigma^2 * steps * eps = sigma^2 * t_max.
        let params = WalkParams::new(1.0, 2.0, 0.01);
        let mut rng = StdRng::seed_from_u64(5);
        let runs = 2000;
        let finals: Vec<f64> = (0..runs)
            .map(|_| *random_walk(&mut rng, &params).unwrap().last().unwrap())
            .collect();
        let mean = finals.iter().sum::<f64>() / runs as f64;
        let var = finals.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / runs as f64;
        assert!((var - 4.0).abs() < 0.5, "variance {var}");
    }
}
