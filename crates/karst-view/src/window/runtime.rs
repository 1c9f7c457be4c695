use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::view::{Presenter, RedrawOutcome, SurfaceView};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "karst".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
///
/// Opens one window, hosts one [`SurfaceView`] in it, and runs the platform
/// event loop until the window closes or the surface fails fatally.
pub struct Runtime;

impl Runtime {
    pub fn run<P>(config: RuntimeConfig, presenter: P) -> Result<()>
    where
        P: 'static + Presenter,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = HostState::new(config, presenter);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

/// What the runtime does with a window event.
///
/// Keeping this mapping pure keeps the forwarding contract testable: each
/// platform notification translates to at most one directive, in order.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Directive {
    /// Forward a resize with the given physical size.
    Resize(PhysicalSize<u32>),
    /// Re-query the window size and forward a resize (scale factor changed).
    ResizeToWindow,
    /// Forward a draw.
    Redraw,
    /// Tear down the view and exit.
    Close,
}

fn directive_for(event: &WindowEvent) -> Option<Directive> {
    match event {
        WindowEvent::CloseRequested => Some(Directive::Close),
        WindowEvent::Resized(new_size) => Some(Directive::Resize(*new_size)),
        WindowEvent::ScaleFactorChanged { .. } => Some(Directive::ResizeToWindow),
        WindowEvent::RedrawRequested => Some(Directive::Redraw),
        _ => None,
    }
}

#[self_referencing]
struct ViewEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    view: SurfaceView<'this>,
}

struct HostState<P>
where
    P: Presenter + 'static,
{
    config: RuntimeConfig,
    presenter: P,
    entry: Option<ViewEntry>,
    exit_requested: bool,
}

impl<P> HostState<P>
where
    P: Presenter + 'static,
{
    fn new(config: RuntimeConfig, presenter: P) -> Self {
        Self {
            config,
            presenter,
            entry: None,
            exit_requested: false,
        }
    }

    fn create_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        // Split borrows so the ouroboros closure does not capture `self`.
        let presenter = &self.presenter;

        let entry = ViewEntryTryBuilder {
            window,
            view_builder: |w| pollster::block_on(SurfaceView::new(w, presenter)),
        }
        .try_build()
        .context("surface initialization failed for window")?;

        self.entry = Some(entry);
        Ok(())
    }
}

impl<P> ApplicationHandler for HostState<P>
where
    P: Presenter + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_entry(event_loop) {
            log::error!("failed to create hosted window: {e:#}");
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; renderers that animate rely on it.
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        match directive_for(&event) {
            Some(Directive::Close) => {
                self.entry = None;
                self.exit_requested = true;
                event_loop.exit();
            }

            Some(Directive::Resize(new_size)) => {
                entry.with_view_mut(|view| view.resize(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            Some(Directive::ResizeToWindow) => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_view_mut(|view| view.resize(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            Some(Directive::Redraw) => {
                let outcome = entry.with_view_mut(|view| view.redraw());
                if outcome == RedrawOutcome::Fatal {
                    log::error!("surface lost irrecoverably; shutting down");
                    self.entry = None;
                    self.exit_requested = true;
                    event_loop.exit();
                }
            }

            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    // ── directive mapping ─────────────────────────────────────────────────

    #[test]
    fn resized_forwards_one_resize() {
        let size = PhysicalSize::new(800, 600);
        assert_eq!(
            directive_for(&WindowEvent::Resized(size)),
            Some(Directive::Resize(size))
        );
    }

    #[test]
    fn zero_size_resize_is_still_forwarded() {
        // Minimized windows report 0x0; the surface defers reconfiguration
        // but the renderer is still notified.
        let size = PhysicalSize::new(0, 0);
        assert_eq!(
            directive_for(&WindowEvent::Resized(size)),
            Some(Directive::Resize(size))
        );
    }

    #[test]
    fn redraw_request_forwards_one_draw() {
        assert_eq!(
            directive_for(&WindowEvent::RedrawRequested),
            Some(Directive::Redraw)
        );
    }

    #[test]
    fn close_request_tears_down() {
        assert_eq!(
            directive_for(&WindowEvent::CloseRequested),
            Some(Directive::Close)
        );
    }

    #[test]
    fn unrelated_events_forward_nothing() {
        assert_eq!(directive_for(&WindowEvent::Focused(true)), None);
        assert_eq!(directive_for(&WindowEvent::Occluded(false)), None);
        assert_eq!(
            directive_for(&WindowEvent::Moved(PhysicalPosition::new(10, 10))),
            None
        );
        assert_eq!(directive_for(&WindowEvent::Destroyed), None);
    }

    #[test]
    fn event_sequence_maps_one_to_one_in_order() {
        let size = PhysicalSize::new(320, 240);
        let events = [
            WindowEvent::Resized(size),
            WindowEvent::RedrawRequested,
            WindowEvent::Focused(true),
            WindowEvent::RedrawRequested,
        ];

        let directives: Vec<_> = events.iter().filter_map(directive_for).collect();
        assert_eq!(
            directives,
            vec![
                Directive::Resize(size),
                Directive::Redraw,
                Directive::Redraw,
            ]
        );
    }

    // ── config ────────────────────────────────────────────────────────────

    #[test]
    fn default_config_has_nonzero_size() {
        let c = RuntimeConfig::default();
        assert!(c.initial_size.width > 0.0 && c.initial_size.height > 0.0);
        assert!(!c.title.is_empty());
    }
}
