//! Per-series appearance.

use std::fmt;
use std::sync::Arc;

use ribbon_render::Color;

/// How a series is drawn.
///
/// `Line`, `Step` and `Bar` are expanded into triangles by the interpolated
/// program; the `Native*` styles use hardware lines and points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeriesStyle {
    #[default]
    Line,
    Step,
    NativeLine,
    NativePoint,
    Bar,
}

impl SeriesStyle {
    /// Texels per stored sample.
    pub const fn records_per_sample(self) -> usize {
        match self {
            SeriesStyle::Bar => 6,
            _ => 1,
        }
    }

    /// Whether padding slots must be hidden instead of repeating an edge sample.
    ///
    /// Lines tolerate a duplicated edge point because the duplicate produces a
    /// zero-length interval; bars and points would draw it.
    pub const fn hides_padding(self) -> bool {
        matches!(self, SeriesStyle::Bar | SeriesStyle::NativePoint)
    }

    /// Value passed to the shaders.
    pub const fn shader_id(self) -> u32 {
        match self {
            SeriesStyle::Line => 0,
            SeriesStyle::Step => 1,
            SeriesStyle::NativeLine => 2,
            SeriesStyle::NativePoint => 3,
            SeriesStyle::Bar => 4,
        }
    }
}

/// A function from a sample's `a` value to a color.
pub type Colormap = Arc<dyn Fn(f32) -> Color + Send + Sync>;

/// Series color source.
#[derive(Clone)]
pub enum SeriesColor {
    /// One color; each sample's `a` scales its opacity.
    Solid(Color),
    /// Per-sample color looked up from `a`.
    Colormap(Colormap),
}

impl SeriesColor {
    pub fn colormap(f: impl Fn(f32) -> Color + Send + Sync + 'static) -> Self {
        SeriesColor::Colormap(Arc::new(f))
    }

    /// Base color uploaded as a uniform. Colormapped series use white so the
    /// per-record color passes through unchanged.
    pub fn base(&self) -> Color {
        match self {
            SeriesColor::Solid(color) => *color,
            SeriesColor::Colormap(_) => Color::WHITE,
        }
    }
}

impl Default for SeriesColor {
    fn default() -> Self {
        SeriesColor::Solid(Color::WHITE)
    }
}

impl fmt::Debug for SeriesColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesColor::Solid(color) => f.debug_tuple("Solid").field(color).finish(),
            SeriesColor::Colormap(_) => f.write_str("Colormap(..)"),
        }
    }
}

impl From<Color> for SeriesColor {
    fn from(color: Color) -> Self {
        SeriesColor::Solid(color)
    }
}

/// Configuration for one series.
#[derive(Debug, Clone)]
pub struct SeriesConfig {
    pub style: SeriesStyle,
    /// Stroke width in pixels for the interpolated styles.
    pub line_width: f32,
    /// Where along an interval a step rises, `0.0..=1.0`.
    pub step_fraction: f32,
    pub color: SeriesColor,
    pub visible: bool,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            style: SeriesStyle::Line,
            line_width: 1.0,
            step_fraction: 0.5,
            color: SeriesColor::default(),
            visible: true,
        }
    }
}

impl SeriesConfig {
    pub fn new(style: SeriesStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    pub fn line_width(mut self, width: f32) -> Self {
        self.line_width = width.max(0.0);
        self
    }

    /// Set the step rise position; clamped to `0.0..=1.0`.
    pub fn step_fraction(mut self, fraction: f32) -> Self {
        self.step_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    pub fn color(mut self, color: impl Into<SeriesColor>) -> Self {
        self.color = color.into();
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_fraction_is_clamped() {
        assert_eq!(SeriesConfig::default().step_fraction(1.5).step_fraction, 1.0);
        assert_eq!(SeriesConfig::default().step_fraction(-0.2).step_fraction, 0.0);
    }

    #[test]
    fn test_colormap_base_is_white() {
        let color = SeriesColor::colormap(|a| Color::rgb(a, 0.0, 0.0));
        assert_eq!(color.base(), Color::WHITE);
        assert_eq!(format!("{color:?}"), "Colormap(..)");
    }
}
