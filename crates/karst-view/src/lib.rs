//! karst-view crate.
//!
//! Hosts a GPU-rendered surface behind two small capability traits: a
//! [`view::Presenter`] supplies surface configuration and a renderer, and a
//! [`view::Renderer`] receives resize and per-frame draw notifications. The
//! crate owns the device/surface plumbing and the platform loop; all drawing
//! belongs to the renderer.

pub mod device;
pub mod view;
pub mod window;

pub mod logging;
