//! In-memory host and renderer for the native binary and tests

use super::{FrameHandle, Host, Renderer};
use crate::render::BlobInstance;

/// Host without a window: fixed surface, frame requests are just recorded
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    pub size: Option<(f32, f32)>,
    /// Frame request waiting to be served
    pub pending: Option<FrameHandle>,
    pub requested: u64,
    pub cancelled: u64,
}

impl HeadlessHost {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Some((width, height)),
            ..Self::default()
        }
    }

    /// Take the pending request, as a real host does when it fires the callback
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl Host for HeadlessHost {
    fn surface_size(&self) -> Option<(f32, f32)> {
        self.size
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.requested += 1;
        let handle = FrameHandle(self.requested);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

/// Renderer that keeps the last frame's instances
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub frames: u64,
    pub size: (f32, f32),
    pub blobs: Vec<BlobInstance>,
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, width: f32, height: f32) {
        self.frames += 1;
        self.size = (width, height);
        self.blobs.clear();
    }

    fn draw_blob(&mut self, blob: &BlobInstance) {
        self.blobs.push(*blob);
    }
}
