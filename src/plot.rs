//! Plot routines for signals, kernels, convolutions and distributions
//!
//! Every routine draws on the drawing area it is handed; nothing here keeps a
//! current figure around. Panels are styled through [`AxesStyle`] and the
//! helpers in [`crate::style`].

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::convolution::kronecker_delta;
use crate::demo::Frame;
use crate::pmf::Pmf;
use crate::style::{self, AxesStyle, Orientation, Side};
use crate::DemoError;

/// Chart type of every signal panel
pub type PanelChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

pub const PURPLE: RGBColor = RGBColor(128, 0, 128);

/// y limits shared by the three panels of a convolution row
pub const CONVOLUTION_Y_LIM: (f64, f64) = (-1.0, 1.5);

const CAPTION_FONT: (&str, i32) = ("sans-serif", 20);
const MARKER_SIZE: i32 = 4;

pub(crate) fn render_error<E: std::fmt::Display>(err: E) -> DemoError {
    DemoError::Render(err.to_string())
}

/// Build a cartesian panel from `style`, let `draw` add the data, then add
/// the zero lines requested by the style.
pub fn draw_panel<DB, F>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    panel_style: &AxesStyle,
    x_default: (f64, f64),
    y_default: (f64, f64),
    draw: F,
) -> Result<(), DemoError>
where
    DB: DrawingBackend,
    F: FnOnce(&mut PanelChart<'_, DB>) -> Result<(), DemoError>,
{
    let (x0, x1) = panel_style.lim_or(style::Axis::X, x_default);
    let (y0, y1) = panel_style.lim_or(style::Axis::Y, y_default);

    let mut chart = ChartBuilder::on(area)
        .caption(title, CAPTION_FONT.into_font())
        .margin(10)
        .x_label_area_size(if panel_style.shows_labels(style::Axis::X) { 30 } else { 0 })
        .y_label_area_size(if panel_style.shows_labels(style::Axis::Y) { 40 } else { 0 })
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_error)?;

    // Spines are drawn below, plotters only supplies the labels.
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .disable_y_axis()
        .draw()
        .map_err(render_error)?;

    let spines = [
        (Side::Top, [(x0, y1), (x1, y1)]),
        (Side::Right, [(x1, y0), (x1, y1)]),
        (Side::Bottom, [(x0, y0), (x1, y0)]),
        (Side::Left, [(x0, y0), (x0, y1)]),
    ];
    chart
        .draw_series(
            spines
                .iter()
                .filter(|(side, _)| panel_style.frame(*side))
                .map(|(_, points)| PathElement::new(points.to_vec(), BLACK.stroke_width(1))),
        )
        .map_err(render_error)?;

    draw(&mut chart)?;

    for orientation in &panel_style.zero_lines {
        let points = match orientation {
            Orientation::Horizontal => vec![(x0, 0.0), (x1, 0.0)],
            Orientation::Vertical => vec![(0.0, y0), (0.0, y1)],
        };
        chart
            .draw_series(std::iter::once(PathElement::new(points, BLACK.stroke_width(1))))
            .map_err(render_error)?;
    }

    Ok(())
}

/// Stems from zero to each sample, topped with a filled marker
pub fn delta_plot<DB: DrawingBackend>(
    chart: &mut PanelChart<'_, DB>,
    signal: &[f64],
    color: RGBColor,
) -> Result<(), DemoError> {
    chart
        .draw_series(signal.iter().enumerate().map(|(k, &v)| {
            PathElement::new(vec![(k as f64, 0.0), (k as f64, v)], BLACK.stroke_width(1))
        }))
        .map_err(render_error)?;

    chart
        .draw_series(
            signal
                .iter()
                .enumerate()
                .map(|(k, &v)| Circle::new((k as f64, v), MARKER_SIZE, color.filled())),
        )
        .map_err(render_error)?;

    Ok(())
}

/// Line plot with markers on a cleaned panel
pub fn plot_signal<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    signal: &[f64],
    name: &str,
) -> Result<(), DemoError> {
    area.fill(&WHITE).map_err(render_error)?;
    signal_panel(area, signal, name)
}

/// Line plot on top, the same samples as a delta plot below
pub fn plot_signal_as_delta<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    signal: &[f64],
    name: &str,
    color: RGBColor,
) -> Result<(), DemoError> {
    area.fill(&WHITE).map_err(render_error)?;
    let panels = area.split_evenly((2, 1));

    signal_panel(&panels[0], signal, name)?;

    let panel_style = cleaned_signal_style(signal.len());
    draw_panel(
        &panels[1],
        &format!("also {name}"),
        &panel_style,
        style::signal_x_lim(signal.len()),
        value_range(signal),
        |chart| delta_plot(chart, signal, color),
    )
}

pub fn plot_kronecker<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> Result<(), DemoError> {
    let pad = 2;
    let delta = kronecker_delta(pad);

    area.fill(&WHITE).map_err(render_error)?;

    let mut panel_style = AxesStyle::default();
    style::clean_plot(&mut panel_style);
    style::add_axis(&mut panel_style, Orientation::Horizontal);

    draw_panel(
        area,
        "the delta function",
        &panel_style,
        kronecker_x_lim(pad),
        value_range(&delta),
        |chart| delta_plot(chart, &delta, BLUE),
    )
}

/// A tenth of the padding beyond either end of the padded delta
fn kronecker_x_lim(pad: usize) -> (f64, f64) {
    let pad_len = pad as f64;
    (-pad_len / 10.0, 2.0 * pad_len + 1.0 + pad_len / 10.0)
}

/// One delta-plot panel per kernel, side by side
pub fn kernels_plot<DB, K, S>(
    area: &DrawingArea<DB, Shift>,
    kernels: &[K],
    names: &[S],
) -> Result<(), DemoError>
where
    DB: DrawingBackend,
    K: AsRef<[f64]>,
    S: AsRef<str>,
{
    area.fill(&WHITE).map_err(render_error)?;
    if kernels.is_empty() {
        return Ok(());
    }

    let panels = area.split_evenly((1, kernels.len()));
    for ((panel, kernel), name) in panels.iter().zip(kernels).zip(names) {
        let kernel = kernel.as_ref();
        let panel_style = cleaned_signal_style(kernel.len());
        draw_panel(
            panel,
            name.as_ref(),
            &panel_style,
            style::signal_x_lim(kernel.len()),
            value_range(kernel),
            |chart| delta_plot(chart, kernel, RED),
        )?;
    }

    Ok(())
}

/// One row per kernel: the input signal, the kernel and their convolution.
///
/// `signals[0]` is the input and `signals[i + 1]` its convolution with
/// `kernels[i]`, as produced by [`crate::convolve_with_kernels`].
pub fn convolution_plot<DB, K, S>(
    area: &DrawingArea<DB, Shift>,
    signals: &[Vec<f64>],
    signal_name: &str,
    kernels: &[K],
    kernel_names: &[S],
) -> Result<(), DemoError>
where
    DB: DrawingBackend,
    K: AsRef<[f64]>,
    S: AsRef<str>,
{
    area.fill(&WHITE).map_err(render_error)?;

    let Some((original, convolved)) = signals.split_first() else {
        return Ok(());
    };
    let rows = convolved.len().min(kernels.len()).min(kernel_names.len());
    if rows == 0 {
        return Ok(());
    }

    let panels = area.split_evenly((rows, 3));
    for (row, ((signal, kernel), kernel_name)) in convolved
        .iter()
        .zip(kernels)
        .zip(kernel_names)
        .take(rows)
        .enumerate()
    {
        let kernel = kernel.as_ref();
        let kernel_name = kernel_name.as_ref();
        let out_name = format!("{signal_name}*{kernel_name}");

        let cells: [(&str, &[f64], RGBColor); 3] = [
            (signal_name, original, BLUE),
            (kernel_name, kernel, RED),
            (&out_name, signal, PURPLE),
        ];
        for (col, (title, samples, color)) in cells.into_iter().enumerate() {
            let mut panel_style = cleaned_signal_style(samples.len());
            panel_style.y_lim = Some(CONVOLUTION_Y_LIM);
            draw_panel(
                &panels[row * 3 + col],
                title,
                &panel_style,
                style::signal_x_lim(samples.len()),
                CONVOLUTION_Y_LIM,
                |chart| delta_plot(chart, samples, color),
            )?;
        }
    }

    Ok(())
}

/// Bar chart of a PMF over its support indices
pub fn plot_distribution<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    pmf: &Pmf,
) -> Result<(), DemoError> {
    area.fill(&WHITE).map_err(render_error)?;
    draw_bars(area, "", pmf.probs(), 1)
}

/// One frame of the adding-random-numbers demo
pub fn draw_pmf_frame<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    frame: &Frame<'_>,
) -> Result<(), DemoError> {
    area.fill(&WHITE).map_err(render_error)?;
    let caption = if frame.step == 0 {
        "one number".to_string()
    } else {
        format!("sum of {} numbers", frame.step + 1)
    };
    draw_bars(area, &caption, frame.pmf.probs(), frame.tick_spacing)
}

/// Bars on a `[0, 1]` probability axis with labels every `tick_spacing` values
fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    caption: &str,
    probs: &[f64],
    tick_spacing: usize,
) -> Result<(), DemoError> {
    let last = probs.len().saturating_sub(1) as u32;
    let label_every = tick_spacing.max(1) as u32;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, CAPTION_FONT.into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..last).into_segmented(), 0.0..1.0)
        .map_err(render_error)?;

    let formatter = move |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(k) | SegmentValue::Exact(k) if k % label_every == 0 => k.to_string(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(probs.len() + 1)
        .x_label_formatter(&formatter)
        .x_desc("value")
        .y_desc("probability")
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(probs.iter().enumerate().map(|(k, &p)| {
            let k = k as u32;
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(k), 0.0), (SegmentValue::Exact(k + 1), p)],
                BLUE.filled(),
            );
            bar.set_margin(0, 0, 2, 2);
            bar
        }))
        .map_err(render_error)?;

    Ok(())
}

fn signal_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    signal: &[f64],
    name: &str,
) -> Result<(), DemoError> {
    let panel_style = cleaned_signal_style(signal.len());
    draw_panel(
        area,
        name,
        &panel_style,
        style::signal_x_lim(signal.len()),
        value_range(signal),
        |chart| {
            chart
                .draw_series(LineSeries::new(
                    signal.iter().enumerate().map(|(k, &v)| (k as f64, v)),
                    &BLACK,
                ))
                .map_err(render_error)?;
            chart
                .draw_series(
                    signal
                        .iter()
                        .enumerate()
                        .map(|(k, &v)| Circle::new((k as f64, v), MARKER_SIZE, BLACK.filled())),
                )
                .map_err(render_error)?;
            Ok(())
        },
    )
}

/// The look shared by every signal panel: cleaned, padded x limits, zero line
fn cleaned_signal_style(len: usize) -> AxesStyle {
    let mut panel_style = AxesStyle::default();
    style::clean_plot(&mut panel_style);
    style::add_axis(&mut panel_style, Orientation::Horizontal);
    panel_style.x_lim = Some(style::signal_x_lim(len));
    panel_style
}

/// y range covering zero and every sample with a tenth of margin
pub fn value_range(signal: &[f64]) -> (f64, f64) {
    let lo = signal.iter().copied().fold(0.0_f64, f64::min);
    let hi = signal.iter().copied().fold(0.0_f64, f64::max);
    let span = hi - lo;
    if span <= f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    (lo - 0.1 * span, hi + 0.1 * span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convolution::convolve_with_kernels;

    fn render_svg<F>(draw: F) -> String
    where
        F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<(), DemoError>,
    {
        let mut buf = String::new();
        {
            let root = SVGBackend::with_string(&mut buf, (800, 400)).into_drawing_area();
            draw(&root).unwrap();
            root.present().unwrap();
        }
        buf
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range(&[0.0, 0.0]), (-1.0, 1.0));
        let (lo, hi) = value_range(&[0.0, 2.0]);
        assert!((lo + 0.2).abs() < 1e-12);
        assert!((hi - 2.2).abs() < 1e-12);
        let (lo, _) = value_range(&[1.0, 3.0]);
        assert!(lo < 0.0);
    }

    #[test]
    fn test_plot_signal_draws_markers() {
        let signal = [0.0, 1.0, -0.5, 0.25];
        let svg = render_svg(|area| plot_signal(area, &signal, "a signal"));
        assert!(svg.contains("<svg"));
        assert!(svg.matches("<circle").count() >= signal.len());
    }

    #[test]
    fn test_kronecker_plot() {
        let svg = render_svg(|area| plot_kronecker(area));
        assert!(svg.contains("the delta function"));
        assert!(svg.matches("<circle").count() >= 5);
    }

    #[test]
    fn test_kronecker_x_lim() {
        let (lo, hi) = kronecker_x_lim(2);
        assert!((lo + 0.2).abs() < 1e-12);
        assert!((hi - 5.2).abs() < 1e-12);
        assert_eq!(kronecker_x_lim(0), (0.0, 1.0));
    }

    #[test]
    fn test_signal_as_delta_has_both_rows() {
        let signal = [1.0, 0.5, 0.25];
        let svg = render_svg(|area| plot_signal_as_delta(area, &signal, "decay", RED));
        assert!(svg.contains("also decay"));
        assert!(svg.matches("<circle").count() >= 2 * signal.len());
    }

    #[test]
    fn test_kernels_plot() {
        let kernels = vec![vec![1.0], vec![0.5, 0.5], vec![1.0, -1.0]];
        let names = ["identity", "average", "difference"];
        let svg = render_svg(|area| kernels_plot(area, &kernels, &names));
        for name in names {
            assert!(svg.contains(name));
        }
    }

    #[test]
    fn test_convolution_plot_titles() {
        let signal = [0.0, 1.0, 0.0, -1.0];
        let kernels = vec![vec![1.0], vec![0.5, 0.5]];
        let names = ["delta", "box"];
        let signals = convolve_with_kernels(&signal, &kernels);
        let svg = render_svg(|area| convolution_plot(area, &signals, "x", &kernels, &names));
        assert!(svg.contains("x*delta"));
        assert!(svg.contains("x*box"));
    }

    #[test]
    fn test_convolution_plot_without_kernels() {
        let svg = render_svg(|area| convolution_plot::<_, Vec<f64>, &str>(area, &[], "x", &[], &[]));
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_plot_distribution_draws_bars() {
        let pmf = Pmf::uniform(6).unwrap();
        let svg = render_svg(|area| plot_distribution(area, &pmf));
        // background plus one rectangle per bar
        assert!(svg.matches("<rect").count() > pmf.len());
    }

    #[test]
    fn test_pmf_frame_caption() {
        let pmf = Pmf::new(vec![0.25, 0.25, 0.5]).unwrap();
        let frame = Frame {
            step: 2,
            pmf: &pmf,
            tick_spacing: 2,
        };
        let svg = render_svg(|area| draw_pmf_frame(area, &frame));
        assert!(svg.contains("sum of 3 numbers"));
    }

    fn text_labels(svg: &str) -> Vec<String> {
        svg.split("<text")
            .skip(1)
            .filter_map(|chunk| {
                let start = chunk.find('>')? + 1;
                let end = chunk.find("</text>")?;
                Some(chunk[start..end].trim().to_string())
            })
            .collect()
    }

    #[test]
    fn test_pmf_frame_axes() {
        let die = Pmf::uniform(3).unwrap();
        let pmf = die.convolve(&die).convolve(&die);
        assert_eq!(pmf.len(), 7);
        assert!(pmf.max_prob() < 0.3);

        let frame = Frame {
            step: 2,
            pmf: &pmf,
            tick_spacing: 2,
        };
        let labels = text_labels(&render_svg(|area| draw_pmf_frame(area, &frame)));

        let mut x_ticks: Vec<u32> = labels.iter().filter_map(|l| l.parse().ok()).collect();
        x_ticks.sort_unstable();
        x_ticks.dedup();
        assert_eq!(x_ticks, vec![0, 2, 4, 6], "{labels:?}");

        let y_ticks: Vec<f64> = labels
            .iter()
            .filter(|l| l.contains('.'))
            .filter_map(|l| l.parse().ok())
            .collect();
        let lo = y_ticks.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = y_ticks.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(lo.abs() < 1e-9, "{labels:?}");
        assert!(hi >= 0.8 && hi <= 1.0 + 1e-9, "{labels:?}");
    }
}
