//! Art Canvas Render Library
//!
//! Renderer abstraction and implementations for Art Canvas.
//! Frames are described once over the `Painter` seam; backends record them,
//! rasterize them on the CPU, or build a Vello scene for the GPU.

mod cpu;
mod recorder;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use cpu::{CpuRenderer, Raster};
pub use recorder::{DrawCommand, SceneRecorder};
pub use renderer::{
    PREVIEW_ALPHA, Painter, RenderContext, RenderResult, Renderer, RendererError, brush_style,
    paint_frame, paint_segment,
};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
