//! Ink Blobs entry point
//!
//! Runs the simulation against the headless host and logs what happens.
//! Usage: `ink-blobs [config.json] [frames]`

#[cfg(not(target_arch = "wasm32"))]
use ink_blobs::platform::{HeadlessHost, RecordingRenderer};
#[cfg(not(target_arch = "wasm32"))]
use ink_blobs::sim::SimEvent;
#[cfg(not(target_arch = "wasm32"))]
use ink_blobs::{App, SimConfig};

/// Roughly 30 seconds at 60 fps
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_FRAMES: u64 = 1800;
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: f64 = 1000.0 / 60.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ink Blobs (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config_json = args.next().and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not read config {path}: {e}");
            None
        }
    });
    let frames = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let config = SimConfig::load_or_default(config_json.as_deref());
    let mut host = HeadlessHost::new(1280.0, 720.0);
    let mut renderer = RecordingRenderer::default();
    let mut app = App::mount(config, &mut host);
    app.world_mut().events.set_enabled(true);

    let mut steps = 0u64;
    for frame in 0..frames {
        if host.take_pending().is_none() {
            break;
        }
        steps += u64::from(app.on_frame(frame as f64 * FRAME_MS, &mut host, &mut renderer));

        for event in app.world_mut().events.drain() {
            match event {
                SimEvent::WordStarted { word, at, targets } => {
                    log::info!("{:>8.0} ms  word {} ({} targets)", at, word.as_str(), targets)
                }
                SimEvent::MovingStarted { at, cause, .. } => {
                    log::info!("{:>8.0} ms  moving ({:?})", at, cause)
                }
                other => log::debug!("{other:?}"),
            }
        }
    }

    let totals = app.world().totals;
    log::info!(
        "Ran {} frames / {} steps: {} checks, {} resolved, {} near misses",
        renderer.frames,
        steps,
        totals.checks,
        totals.resolved,
        totals.near_misses
    );
    app.unmount(&mut host);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host embeds the library directly
}
