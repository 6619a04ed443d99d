//! Panel styling helpers
//!
//! Each helper mutates the [`AxesStyle`] of one panel. The plot routines read
//! the style when they build the chart, so a panel is configured first and
//! drawn afterwards.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Direction of a zero line added with [`add_axis`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Sides removed by [`remove_frames`] when the caller has no preference
pub const DEFAULT_FRAME_SIDES: [Side; 2] = [Side::Top, Side::Right];

/// Decorations of a single chart panel
#[derive(Debug, Clone, PartialEq)]
pub struct AxesStyle {
    pub x_axis_visible: bool,
    pub y_axis_visible: bool,
    pub frame_top: bool,
    pub frame_right: bool,
    pub frame_bottom: bool,
    pub frame_left: bool,
    pub x_ticks: bool,
    pub y_ticks: bool,
    /// Zero lines spanning the current limits
    pub zero_lines: Vec<Orientation>,
    pub x_lim: Option<(f64, f64)>,
    pub y_lim: Option<(f64, f64)>,
}

impl Default for AxesStyle {
    fn default() -> Self {
        Self {
            x_axis_visible: true,
            y_axis_visible: true,
            frame_top: true,
            frame_right: true,
            frame_bottom: true,
            frame_left: true,
            x_ticks: true,
            y_ticks: true,
            zero_lines: Vec::new(),
            x_lim: None,
            y_lim: None,
        }
    }
}

impl AxesStyle {
    pub fn frame(&self, side: Side) -> bool {
        match side {
            Side::Top => self.frame_top,
            Side::Right => self.frame_right,
            Side::Bottom => self.frame_bottom,
            Side::Left => self.frame_left,
        }
    }

    fn frame_mut(&mut self, side: Side) -> &mut bool {
        match side {
            Side::Top => &mut self.frame_top,
            Side::Right => &mut self.frame_right,
            Side::Bottom => &mut self.frame_bottom,
            Side::Left => &mut self.frame_left,
        }
    }

    /// Whether tick labels should be drawn for `axis`
    pub fn shows_labels(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x_axis_visible && self.x_ticks,
            Axis::Y => self.y_axis_visible && self.y_ticks,
        }
    }

    /// Limits to use for `axis`, falling back to `default`
    pub fn lim_or(&self, axis: Axis, default: (f64, f64)) -> (f64, f64) {
        let lim = match axis {
            Axis::X => self.x_lim,
            Axis::Y => self.y_lim,
        };
        lim.unwrap_or(default)
    }
}

/// Hide both axes, labels included
pub fn remove_axes(style: &mut AxesStyle) {
    style.x_axis_visible = false;
    style.y_axis_visible = false;
}

pub fn remove_frames(style: &mut AxesStyle, sides: &[Side]) {
    for &side in sides {
        *style.frame_mut(side) = false;
    }
}

pub fn remove_ticks(style: &mut AxesStyle, axes: &[Axis]) {
    for axis in axes {
        match axis {
            Axis::X => style.x_ticks = false,
            Axis::Y => style.y_ticks = false,
        }
    }
}

/// Draw a zero line across the panel
pub fn add_axis(style: &mut AxesStyle, orientation: Orientation) {
    if !style.zero_lines.contains(&orientation) {
        style.zero_lines.push(orientation);
    }
}

/// Keep only the left spine and drop all ticks
pub fn clean_plot(style: &mut AxesStyle) {
    remove_frames(style, &[Side::Top, Side::Right, Side::Bottom]);
    remove_ticks(style, &[Axis::X, Axis::Y]);
}

pub fn set_lims(style: &mut AxesStyle, x_bounds: (f64, f64), y_bounds: (f64, f64)) {
    style.x_lim = Some(x_bounds);
    style.y_lim = Some(y_bounds);
}

/// Signal panel x limits: a tenth of the length as margin on both sides
pub fn signal_x_lim(len: usize) -> (f64, f64) {
    let n = len as f64;
    (-n / 10.0, n + n / 10.0)
}
