use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::device::{GpuContext, SurfaceErrorAction};

use super::{Color, Presenter, Renderer, SurfaceConfig};

/// Result of driving one frame through [`SurfaceView::redraw`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RedrawOutcome {
    /// The frame was encoded, submitted, and presented.
    Presented,
    /// The frame was skipped (transient surface error); try again next frame.
    Skipped,
    /// The surface is unrecoverable; the host should shut down.
    Fatal,
}

/// Bridges a platform window to a user-supplied renderer.
///
/// This is a pass-through: `resize` and `redraw` each forward exactly one
/// renderer notification. The view keeps no state of its own beyond the GPU
/// context, the boxed renderer, and the configured clear color.
pub struct SurfaceView<'w> {
    gpu: GpuContext<'w>,
    renderer: Box<dyn Renderer>,
    clear_color: Color,
}

impl<'w> SurfaceView<'w> {
    /// Creates the GPU context for `window` and asks `presenter` for the
    /// renderer.
    ///
    /// Runs the presenter's configuration hook first, so the device and
    /// surface are created with the presenter's settings.
    pub async fn new(window: &'w Window, presenter: &dyn Presenter) -> Result<Self> {
        let mut config = SurfaceConfig::default();
        presenter.configure(&mut config);

        let gpu = GpuContext::new(window, &config).await?;
        let renderer = presenter
            .make_renderer(&gpu)
            .context("presenter failed to build a renderer")?;

        Ok(Self {
            gpu,
            renderer,
            clear_color: config.clear_color,
        })
    }

    /// Returns the GPU context backing this view.
    pub fn gpu(&self) -> &GpuContext<'w> {
        &self.gpu
    }

    /// Reconfigures the surface, then forwards the resize to the renderer.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
        self.renderer.resize(&self.gpu, new_size);
    }

    /// Drives one frame: acquire, clear, forward the draw, submit, present.
    ///
    /// Surface-acquisition errors never reach the renderer; the frame is
    /// skipped (possibly after reconfiguring) or reported as fatal.
    pub fn redraw(&mut self) -> RedrawOutcome {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => RedrawOutcome::Fatal,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        RedrawOutcome::Skipped
                    }
                };
            }
        };

        // Clear pass — dropped before the renderer records its own passes.
        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("karst clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        self.renderer.draw(&self.gpu, &mut frame);
        self.gpu.submit(frame);

        RedrawOutcome::Presented
    }
}
