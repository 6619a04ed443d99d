//! Adding random numbers: repeated self-convolution of a PMF
//!
//! Each frame shows the distribution of a sum of independent draws from the
//! same PMF. After a handful of steps the bars take on the familiar bell
//! shape of the central limit theorem.

use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::pacing::Pacing;
use crate::plot::{draw_pmf_frame, render_error};
use crate::pmf::{Pmf, PmfHistory};
use crate::DemoError;

/// State handed to a renderer before each convolution step
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Zero-based iteration index
    pub step: usize,
    /// Most recent entry of the history
    pub pmf: &'a Pmf,
    /// Distance between x tick labels: the input PMF length minus one
    pub tick_spacing: usize,
}

pub trait FrameRenderer {
    fn render_frame(&mut self, frame: &Frame<'_>) -> Result<(), DemoError>;
}

impl<R: FrameRenderer + ?Sized> FrameRenderer for &mut R {
    fn render_frame(&mut self, frame: &Frame<'_>) -> Result<(), DemoError> {
        (**self).render_frame(frame)
    }
}

impl<R: FrameRenderer + ?Sized> FrameRenderer for Box<R> {
    fn render_frame(&mut self, frame: &Frame<'_>) -> Result<(), DemoError> {
        (**self).render_frame(frame)
    }
}

/// Discards every frame
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl FrameRenderer for NullRenderer {
    fn render_frame(&mut self, _frame: &Frame<'_>) -> Result<(), DemoError> {
        Ok(())
    }
}

/// Writes each frame to `<dir>/frame_NNN.svg`
#[derive(Debug, Clone)]
pub struct SvgFrameWriter {
    dir: PathBuf,
    size: (u32, u32),
    written: Vec<PathBuf>,
}

impl SvgFrameWriter {
    pub fn new(dir: impl Into<PathBuf>, size: (u32, u32)) -> Self {
        Self {
            dir: dir.into(),
            size,
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths of the frames written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn frame_path(&self, step: usize) -> PathBuf {
        self.dir.join(format!("frame_{step:03}.svg"))
    }
}

impl FrameRenderer for SvgFrameWriter {
    fn render_frame(&mut self, frame: &Frame<'_>) -> Result<(), DemoError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.frame_path(frame.step);

        {
            let root = SVGBackend::new(&path, self.size).into_drawing_area();
            draw_pmf_frame(&root, frame)?;
            root.present().map_err(render_error)?;
        }

        self.written.push(path);
        Ok(())
    }
}

/// Show how the distribution of a sum of i.i.d. draws evolves.
///
/// `probs` is validated up front; a malformed PMF fails before anything is
/// rendered. Each of the `iterations` steps renders the latest PMF, convolves
/// it with the input PMF and then pauses. The returned history holds
/// `iterations + 1` entries, the input first.
pub fn adding_random_numbers_demo<R, P>(
    probs: &[f64],
    iterations: usize,
    renderer: &mut R,
    pacing: &mut P,
) -> Result<PmfHistory, DemoError>
where
    R: FrameRenderer + ?Sized,
    P: Pacing + ?Sized,
{
    let pmf = Pmf::new(probs.to_vec())?;
    let tick_spacing = pmf.len() - 1;
    let mut history = PmfHistory::new(pmf);

    for step in 0..iterations {
        renderer.render_frame(&Frame {
            step,
            pmf: history.latest(),
            tick_spacing,
        })?;
        history.advance();
        pacing.pause(step);
    }

    Ok(history)
}
