/// Renderer-wide settings.
///
/// ```
/// use ribbon_stream::RendererConfig;
///
/// let config = RendererConfig::default().texture_size(600, 16).padding(8.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Segment texture width in texels. Must be a multiple of 6 so a bar's
    /// six records never straddle a row.
    pub texture_width: u32,
    /// Segment texture height in texels.
    pub texture_height: u32,
    /// Pixels of overdraw kept visible beyond each viewport edge.
    pub padding: f32,
    /// Wrap resource creation and frames in validation error scopes.
    pub debug: bool,
    /// Format of the render target the pipelines draw into.
    pub target_format: wgpu::TextureFormat,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            texture_width: 1536,
            texture_height: 64,
            padding: 0.0,
            debug: cfg!(debug_assertions),
            target_format: wgpu::TextureFormat::Bgra8UnormSrgb,
        }
    }
}

impl RendererConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture_size(mut self, width: u32, height: u32) -> Self {
        self.texture_width = width;
        self.texture_height = height;
        self
    }

    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn target_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.target_format = format;
        self
    }

    pub fn validate(&self) -> crate::RenderResult<()> {
        if self.texture_width == 0 || self.texture_height == 0 {
            return Err(crate::RenderError::InvalidConfig(format!(
                "segment texture size {}x{} is empty",
                self.texture_width, self.texture_height
            )));
        }
        if self.texture_width % 6 != 0 {
            return Err(crate::RenderError::InvalidConfig(format!(
                "segment texture width {} is not a multiple of 6",
                self.texture_width
            )));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(crate::RenderError::InvalidConfig(format!(
                "padding {} must be a non-negative number",
                self.padding
            )));
        }
        Ok(())
    }
}
