//! conv-demos - convolution and probability teaching demos
//!
//! Random walks built from Gaussian increments, repeated self-convolution of a
//! probability mass function (the discrete central limit theorem), and the
//! plot routines used to show delta functions, kernels and their convolutions.

pub mod config;
pub mod convolution;
pub mod demo;
pub mod output;
pub mod pacing;
pub mod plot;
pub mod pmf;
pub mod style;
pub mod walk;

use thiserror::Error;

// Re-export main types
pub use config::DemoConfig;
pub use convolution::{convolve_full, convolve_with_kernels, kronecker_delta};
pub use demo::{adding_random_numbers_demo, Frame, FrameRenderer, NullRenderer, SvgFrameWriter};
pub use pacing::{ExponentialDecay, NoDelay, Pacing};
pub use pmf::{InvalidDistribution, Pmf, PmfHistory};
pub use style::{AxesStyle, Axis, Orientation, Side};
pub use walk::{random_walk, random_walk_seeded, WalkParams, MAX_WALK_STEPS};

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("invalid distribution: {0}")]
    InvalidDistribution(#[from] InvalidDistribution),
    #[error("invalid random walk parameters: {0}")]
    InvalidWalk(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("render error: {0}")]
    Render(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
