//! Platform abstraction layer
//!
//! The simulation never talks to a window, canvas, or GPU directly. Hosts
//! implement these traits:
//! - [`Host`]: surface size and frame scheduling
//! - [`Renderer`]: draws one frame of blob instances

pub mod headless;

pub use headless::{HeadlessHost, RecordingRenderer};

use crate::render::BlobInstance;

/// Handle of a scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Surface and scheduling services provided by the embedding environment
pub trait Host {
    /// Current drawing-area size in pixels, if the surface exists
    fn surface_size(&self) -> Option<(f32, f32)>;

    /// Ask for the next frame callback
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a callback requested earlier
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Draws blobs; called once per frame with every instance in body order
pub trait Renderer {
    fn begin_frame(&mut self, width: f32, height: f32);

    fn draw_blob(&mut self, blob: &BlobInstance);

    fn end_frame(&mut self) {}
}
