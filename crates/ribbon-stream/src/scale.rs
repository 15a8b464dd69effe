//! Mapping between data values and pixel coordinates.

/// An affine mapping from a data domain to a pixel range.
pub trait Scale {
    /// Data interval `(d0, d1)`.
    fn domain(&self) -> (f64, f64);

    /// Pixel interval `(r0, r1)` that `d0` and `d1` map to.
    fn range(&self) -> (f64, f64);

    /// Map a pixel coordinate back into the data domain.
    fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain();
        let (r0, r1) = self.range();
        if r1 == r0 {
            return d0;
        }
        d0 + (pixel - r0) * (d1 - d0) / (r1 - r0)
    }

    /// Pixels per data unit. Zero for an empty domain.
    fn factor(&self) -> f64 {
        let (d0, d1) = self.domain();
        let (r0, r1) = self.range();
        if d1 == d0 { 0.0 } else { (r1 - r0) / (d1 - d0) }
    }
}

/// A plain linear scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn set_domain(&mut self, d0: f64, d1: f64) {
        self.domain = (d0, d1);
    }

    pub fn set_range(&mut self, r0: f64, r1: f64) {
        self.range = (r0, r1);
    }

    /// Map a data value to pixels.
    pub fn apply(&self, value: f64) -> f64 {
        self.range.0 + (value - self.domain.0) * self.factor()
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new((0.0, 1.0), (0.0, 1.0))
    }
}

impl Scale for LinearScale {
    fn domain(&self) -> (f64, f64) {
        self.domain
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}
