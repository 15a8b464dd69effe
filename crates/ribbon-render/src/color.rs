/// Linear RGBA color, components in `0.0..=1.0`.
///
/// ```
/// use ribbon_render::Color;
///
/// assert_eq!(Color::from_hex(0xFF8800).to_packed_rgb(), 0xFF8800);
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Packs RGB into `0xRRGGBB`, dropping alpha.
    ///
    /// The result is below 2^24, so it survives a round trip through an
    /// `f32` record channel.
    pub fn to_packed_rgb(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: f64::from(self.r),
            g: f64::from(self.g),
            b: f64::from(self.b),
            a: f64::from(self.a),
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        bytemuck::cast(self)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
