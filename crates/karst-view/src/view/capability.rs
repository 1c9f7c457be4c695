use anyhow::Result;
use winit::dpi::PhysicalSize;

use crate::device::{Frame, GpuContext};

use super::SurfaceConfig;

/// Presentation contract implemented by user code that hosts a surface.
///
/// The host calls [`configure`](Self::configure) once, before any GPU object
/// exists, then creates the device and surface, then calls
/// [`make_renderer`](Self::make_renderer) exactly once with the live handles.
pub trait Presenter {
    /// Adjusts the surface configuration (clear color, format preference, …).
    ///
    /// The default implementation leaves the defaults untouched.
    fn configure(&self, config: &mut SurfaceConfig) {
        let _ = config;
    }

    /// Builds the renderer for this surface.
    ///
    /// `gpu` is the context the renderer will later receive in its callbacks;
    /// typical implementations create their pipelines and buffers here.
    fn make_renderer(&self, gpu: &GpuContext<'_>) -> Result<Box<dyn Renderer>>;
}

/// Rendering contract: receives resize and per-frame draw notifications.
///
/// The renderer owns all of its pipeline/buffer state. The host forwards
/// exactly the notifications it receives from the platform view — no calls
/// are added, dropped, or reordered — and never inspects renderer state.
pub trait Renderer {
    /// Called after the surface has been reconfigured for `new_size`.
    ///
    /// `new_size` is in physical pixels and may be zero on some platforms
    /// while a window is minimized.
    fn resize(&mut self, gpu: &GpuContext<'_>, new_size: PhysicalSize<u32>);

    /// Called once per frame with an acquired surface view and open encoder.
    ///
    /// The host has already encoded a clear pass; render passes recorded here
    /// should use `wgpu::LoadOp::Load` on the color attachment. Submission
    /// and presentation happen after this returns.
    fn draw(&mut self, gpu: &GpuContext<'_>, frame: &mut Frame);
}
