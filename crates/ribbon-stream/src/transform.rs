//! Data-to-screen transformation uniforms.
//!
//! Records are stored relative to a per-window `origin` so large timestamps
//! survive the narrowing to `f32`. The GPU applies:
//! ```text
//! screen.x = record.x * scale.x + series.origin_px + offset.x
//! screen.y = record.y * scale.y + offset.y
//! clip     = projection * screen
//! ```
//! where `origin_px = (origin - x_domain.0) * scale.x` is computed in `f64`.
//! Pan and zoom only rewrite these uniforms, never the segment textures.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use static_assertions::const_assert_eq;

use crate::{scale::Scale, style::SeriesConfig};

/// Frame uniform shared by every series (bind group 0).
///
/// Layout (80 bytes, 16-byte aligned):
/// ```text
/// offset 0:  mat4x4<f32> projection  (64 bytes)
/// offset 64: vec2<f32>   scale        (8 bytes)
/// offset 72: vec2<f32>   offset       (8 bytes)
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable, PartialEq)]
pub struct FrameUniform {
    pub projection: [[f32; 4]; 4],
    pub scale: [f32; 2],
    pub offset: [f32; 2],
}

const_assert_eq!(std::mem::size_of::<FrameUniform>(), 80);

impl FrameUniform {
    /// Transform for a viewport of `width × height` pixels.
    ///
    /// The scales map data to pixels measured from the padded plot origin:
    /// x grows to the right, y grows upward. `padding` pixels of overdraw are
    /// kept on every edge.
    pub fn for_frame(
        x_scale: &dyn Scale,
        y_scale: &dyn Scale,
        width: f32,
        height: f32,
        padding: f32,
    ) -> Self {
        let (x_r0, _) = x_scale.range();
        let (y_d0, _) = y_scale.domain();
        let (y_r0, _) = y_scale.range();
        let sx = x_scale.factor();
        let sy = y_scale.factor();

        // Screen y runs downward.
        let offset_x = f64::from(padding) + x_r0;
        let offset_y = f64::from(height) - f64::from(padding) - y_r0 + y_d0 * sy;

        Self {
            projection: ortho_matrix(width, height),
            scale: [sx as f32, -sy as f32],
            offset: [offset_x as f32, offset_y as f32],
        }
    }
}

/// Orthographic projection mapping `(0, 0)` to the top-left corner and
/// `(width, height)` to the bottom-right.
pub fn ortho_matrix(width: f32, height: f32) -> [[f32; 4]; 4] {
    Mat4::orthographic_rh(0.0, width.max(1.0), height.max(1.0), 0.0, -1.0, 1.0).to_cols_array_2d()
}

/// Per-series uniform (bind group 1).
///
/// Layout (48 bytes):
/// ```text
/// offset 0:  vec4<f32> color
/// offset 16: f32 line_width, f32 step_fraction, u32 style, u32 texture_width
/// offset 32: f32 origin_px, 3 × f32 padding
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable, PartialEq)]
pub struct SeriesUniform {
    pub color: [f32; 4],
    pub line_width: f32,
    pub step_fraction: f32,
    pub style: u32,
    pub texture_width: u32,
    pub origin_px: f32,
    pub _padding: [f32; 3],
}

const_assert_eq!(std::mem::size_of::<SeriesUniform>(), 48);

impl SeriesUniform {
    pub fn new(config: &SeriesConfig, origin: f64, x_scale: &dyn Scale, texture_width: u32) -> Self {
        let (x_d0, _) = x_scale.domain();
        Self {
            color: config.color.base().to_array(),
            line_width: config.line_width,
            step_fraction: config.step_fraction,
            style: config.style.shader_id(),
            texture_width,
            origin_px: ((origin - x_d0) * x_scale.factor()) as f32,
            _padding: [0.0; 3],
        }
    }
}

/// Data interval visible through a viewport `width` pixels wide.
///
/// Inverts the padded viewport edges through the x scale; the result is
/// ordered even when the scale's range is reversed.
pub fn visible_domain(x_scale: &dyn Scale, width: f32, padding: f32) -> (f64, f64) {
    let left = x_scale.invert(-f64::from(padding));
    let right = x_scale.invert(f64::from(width) - f64::from(padding));
    if left <= right {
        (left, right)
    } else {
        (right, left)
    }
}
