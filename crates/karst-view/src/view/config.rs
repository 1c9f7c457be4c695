use super::Color;

/// Surface/device configuration negotiated before any GPU object exists.
///
/// The host constructs the default and passes it to
/// [`Presenter::configure`](super::Presenter::configure) for mutation.
/// Keep this structure stable and minimal. Add configuration flags only when
/// a concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Prefer an sRGB surface format when available.
    ///
    /// The actually negotiated format is reported by
    /// `GpuContext::surface_format` after creation.
    pub prefer_srgb: bool,

    /// Clear color applied by the host before the renderer draws.
    pub clear_color: Color,

    /// Present mode (swap behavior).
    ///
    /// FIFO is broadly supported and generally appropriate.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode
    /// is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly
    /// necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            clear_color: Color::BLACK,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_conservative() {
        let c = SurfaceConfig::default();
        assert!(c.prefer_srgb);
        assert_eq!(c.clear_color, Color::BLACK);
        assert_eq!(c.present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(c.alpha_mode, None);
        assert_eq!(c.required_features, wgpu::Features::empty());
        assert_eq!(c.desired_maximum_frame_latency, 2);
    }
}
