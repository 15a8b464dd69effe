/// Default bar half-width on each side of a sample, in data units.
pub const DEFAULT_BAR_HALF_WIDTH: f32 = 0.5;

/// One time-stamped data point.
///
/// `x` must be non-decreasing across a sequence. `a` carries the optional
/// per-point scalar: opacity for solid colors, the colormap input otherwise.
/// `None` means "no value" and renders transparent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub a: Option<f32>,
    /// Bar extent to the left of `x`.
    pub lb: f32,
    /// Bar extent to the right of `x`.
    pub rb: f32,
}

impl Sample {
    /// A fully opaque sample.
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            a: Some(1.0),
            lb: DEFAULT_BAR_HALF_WIDTH,
            rb: DEFAULT_BAR_HALF_WIDTH,
        }
    }

    /// A sample without a value; it keeps its position but is not drawn.
    pub const fn gap(x: f64, y: f64) -> Self {
        Self {
            a: None,
            ..Self::new(x, y)
        }
    }

    pub const fn with_value(mut self, a: f32) -> Self {
        self.a = Some(a);
        self
    }

    pub const fn with_bar_width(mut self, lb: f32, rb: f32) -> Self {
        self.lb = lb;
        self.rb = rb;
        self
    }
}

impl From<(f64, f64)> for Sample {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}
