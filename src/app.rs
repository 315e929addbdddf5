//! Host-facing driver
//!
//! Owns the world and wires it to a [`Host`] and [`Renderer`]: one frame
//! callback runs the accumulator, draws every blob and schedules the next
//! frame until the app is unmounted.

use crate::config::SimConfig;
use crate::platform::{FrameHandle, Host, Renderer};
use crate::render::extract_instances;
use crate::sim::{PointerEvent, World, advance_frame};

/// Size used when the host has no surface yet
const DEFAULT_SURFACE: (f32, f32) = (300.0, 150.0);

/// A mounted blob simulation
pub struct App {
    world: World,
    last_time: Option<f64>,
    frame: Option<FrameHandle>,
    mounted: bool,
}

impl App {
    /// Create the world for the host's surface and request the first frame
    pub fn mount<H: Host>(config: SimConfig, host: &mut H) -> Self {
        let (width, height) = host.surface_size().unwrap_or_else(|| {
            log::warn!("Host has no surface yet, starting at {DEFAULT_SURFACE:?}");
            DEFAULT_SURFACE
        });
        let world = World::new(config, width, height);
        let frame = Some(host.request_frame());
        log::info!("Mounted ink blobs on {width}x{height}");

        Self {
            world,
            last_time: None,
            frame,
            mounted: true,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Frame callback. `now` is the host timestamp in ms.
    ///
    /// Returns the number of fixed steps run.
    pub fn on_frame<H: Host, R: Renderer>(&mut self, now: f64, host: &mut H, renderer: &mut R) -> u32 {
        if !self.mounted {
            return 0;
        }
        self.frame = None;

        let dt = self.last_time.map_or(0.0, |last| (now - last) as f32);
        self.last_time = Some(now);

        let steps = advance_frame(&mut self.world, dt);

        renderer.begin_frame(self.world.width, self.world.height);
        for blob in &extract_instances(&self.world) {
            renderer.draw_blob(blob);
        }
        renderer.end_frame();

        self.frame = Some(host.request_frame());
        steps
    }

    /// Queue a pointer event for the next tick
    pub fn on_pointer(&mut self, event: PointerEvent) {
        if self.mounted {
            self.world.queue_pointer(event);
        }
    }

    /// Pick up the host's current surface size
    pub fn on_resize<H: Host>(&mut self, host: &H) {
        if !self.mounted {
            return;
        }
        if let Some((width, height)) = host.surface_size() {
            self.world.queue_resize(width, height);
        }
    }

    /// Stop the loop: cancel the pending frame and drop queued input
    pub fn unmount<H: Host>(&mut self, host: &mut H) {
        if let Some(handle) = self.frame.take() {
            host.cancel_frame(handle);
        }
        self.world.clear_intents();
        self.mounted = false;
        log::info!("Unmounted after {} ticks", self.world.time_ticks);
    }
}
