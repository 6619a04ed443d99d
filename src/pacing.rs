//! Pacing between demo frames

use std::thread;
use std::time::Duration;

use crate::DemoError;

/// Called once after each iteration of a frame loop
pub trait Pacing {
    fn pause(&mut self, step: usize);
}

/// Runs frames back to back
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Pacing for NoDelay {
    fn pause(&mut self, _step: usize) {}
}

/// Blocking sleep of `base * (1 - decay_rate)^step`.
///
/// Early frames linger, later ones speed up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecay {
    pub base: Duration,
    pub decay_rate: f64,
}

impl Default for ExponentialDecay {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            decay_rate: 0.25,
        }
    }
}

impl ExponentialDecay {
    pub fn new(base: Duration, decay_rate: f64) -> Result<Self, DemoError> {
        if !(0.0..1.0).contains(&decay_rate) {
            return Err(DemoError::InvalidConfig(format!(
                "decay_rate must be in [0, 1), got {decay_rate}"
            )));
        }
        Ok(Self { base, decay_rate })
    }

    pub fn delay_for(&self, step: usize) -> Duration {
        self.base
            .mul_f64((1.0 - self.decay_rate).powf(step as f64))
    }
}

impl Pacing for ExponentialDecay {
    fn pause(&mut self, step: usize) {
        thread::sleep(self.delay_for(step));
    }
}

impl<P: Pacing + ?Sized> Pacing for &mut P {
    fn pause(&mut self, step: usize) {
        (**self).pause(step);
    }
}
