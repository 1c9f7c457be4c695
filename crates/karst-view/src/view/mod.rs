//! View-facing contracts.
//!
//! This module defines the stable interface between the hosted GPU surface
//! and user code: the two capability traits ([`Presenter`], [`Renderer`]),
//! the surface configuration they negotiate, and the pass-through host that
//! bridges platform callbacks to a renderer.

mod capability;
mod color;
mod config;
mod host;

pub use capability::{Presenter, Renderer};
pub use color::Color;
pub use config::SurfaceConfig;
pub use host::{RedrawOutcome, SurfaceView};
