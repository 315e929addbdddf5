//! Ink Blobs - an ambient blob background simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, phases, text layout)
//! - `config`: Data-driven tuning loaded from JSON
//! - `platform`: Host/renderer abstraction the simulation is driven through
//! - `render`: Per-frame blob instances handed to the renderer

pub mod app;
pub mod config;
pub mod platform;
pub mod render;
pub mod sim;

pub use app::App;
pub use config::{PhaseTimings, PhysicsTuning, SimConfig};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (ms)
    pub const FIXED_DT: f32 = 12.0;
    /// Frame deltas above this are clamped (ms)
    pub const MAX_FRAME_DT: f32 = 64.0;
    /// Maximum fixed steps per frame to prevent spiral of death
    pub const MAX_STEPS_PER_FRAME: u32 = 8;

    /// First moving phase after startup (ms)
    pub const MOVING_MS_INITIAL: f64 = 7000.0;
    /// Every later moving phase (ms)
    pub const MOVING_MS: f64 = 4000.0;
    /// Pointer input cannot end a word phase before this much time has passed (ms)
    pub const WORD_LOCK_MS: f64 = 5000.0;
    /// Residual events right after word entry are ignored for this long (ms)
    pub const WORD_COOLDOWN_MS: f64 = 300.0;

    /// Speed bounds during free motion (px/ms)
    pub const MIN_SPEED: f32 = 0.12;
    pub const MAX_SPEED: f32 = 1.6;
    /// Uniform launch speed for every blob (px/ms)
    pub const START_SPEED: f32 = 0.14;
    /// Safety cap on the launch speed
    pub const START_MAX_SPEED: f32 = 0.5;

    /// Exponential velocity decay per ms
    pub const FRICTION: f32 = 0.0015;
    /// Symmetric random acceleration per ms
    pub const NOISE_ACC: f32 = 0.00025;
    /// Deformation decay rate per ms
    pub const DEFORM_DECAY: f32 = 0.02;
    /// Hard bound on |deform_x| and |deform_y|
    pub const MAX_DEFORM: f32 = 0.25;
    /// Random perpendicular kick range on wall hits
    pub const WALL_KICK: f32 = 0.12;

    /// Wobble amplitude as a fraction of radius (walls, rendering)
    pub const WOBBLE_AMPLITUDE: f32 = 0.06;
    /// Wobble amplitude used for the pointer hit test
    pub const POINTER_WOBBLE_AMPLITUDE: f32 = 0.08;

    /// Collision passes per tick
    pub const COLLISION_PASSES: u32 = 3;
    /// Contact margin as a fraction of the combined radius
    pub const CONTACT_MARGIN: f32 = 0.02;
    /// Share of the overlap each body is pushed out by
    pub const SEPARATION_SHARE: f32 = 0.51;
    /// Normal restitution between blobs
    pub const RESTITUTION: f32 = 0.95;
    /// Baumgarte correction percentage and slop
    pub const CORRECTION_PERCENT: f32 = 0.8;
    pub const CORRECTION_SLOP: f32 = 0.01;
    /// Upper bound on the secondary penetration push
    pub const MAX_PENETRATION_PUSH: f32 = 8.0;
    /// Velocity transfer from penetration, divided by mass
    pub const PENETRATION_VEL_TRANSFER: f32 = 0.6;
    /// Largest deformation added by one contact
    pub const MAX_CONTACT_DEFORM: f32 = 0.16;

    /// Pointer-hit recency window (ms)
    pub const POINTER_HIT_WINDOW_MS: f64 = 300.0;
    /// Strength of momentum handed on by a recently struck blob
    pub const POINTER_TRANSFER_SCALE: f32 = 0.8;
    /// Cap on cascaded momentum per contact
    pub const MAX_POINTER_TRANSFER: f32 = 6.0;

    /// Pointer bounce restitution (> 1 for a lively kick)
    pub const POINTER_RESTITUTION: f32 = 3.0;
    /// Speed cap right after a pointer strike (px/ms)
    pub const MAX_SPEED_AFTER_POINTER: f32 = 1.5;

    /// Word-phase easing gain per step
    pub const EASE_GAIN: f32 = 0.09;
    /// Ease never drops below this so blobs cannot stall far from their target
    pub const MIN_EASE: f32 = 0.35;

    /// Minimum number of blobs regardless of word sizes
    pub const MIN_BODY_COUNT: usize = 22;

    /// Guards divisions by near-zero distances
    pub const DIST_EPSILON: f32 = 1.0e-4;
}

/// Free-motion blob radius for a drawing area
#[inline]
pub fn free_radius(width: f32, height: f32) -> f32 {
    (width.min(height) * 0.025).max(18.0)
}

/// Blob radius while forming a word
#[inline]
pub fn word_radius(width: f32, height: f32) -> f32 {
    (width.min(height) * 0.02).max(16.0)
}

/// Scale a vector down so its length does not exceed `max`
#[inline]
pub fn clamp_length_max(v: Vec2, max: f32) -> Vec2 {
    let len = v.length();
    if len > max { v * (max / len) } else { v }
}

/// Unit vector from `from` to `to` and the distance between them.
///
/// Distances below [`consts::DIST_EPSILON`] are replaced by the epsilon and
/// the direction falls back to +X, so callers never divide by zero.
#[inline]
pub fn direction_and_distance(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    let dist = delta.length();
    if dist < consts::DIST_EPSILON {
        (Vec2::X, consts::DIST_EPSILON)
    } else {
        (delta / dist, dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radii_have_floors() {
        assert_eq!(free_radius(100.0, 100.0), 18.0);
        assert_eq!(word_radius(100.0, 100.0), 16.0);
        assert!((free_radius(2000.0, 1600.0) - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_direction_handles_coincident_points() {
        let (n, d) = direction_and_distance(Vec2::new(3.0, 4.0), Vec2::new(3.0, 4.0));
        assert_eq!(n, Vec2::X);
        assert_eq!(d, consts::DIST_EPSILON);

        let (n, d) = direction_and_distance(Vec2::ZERO, Vec2::new(0.0, 5.0));
        assert!((n - Vec2::Y).length() < 1e-6);
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_length_max() {
        let v = clamp_length_max(Vec2::new(3.0, 4.0), 1.0);
        assert!((v.length() - 1.0).abs() < 1e-6);
        let w = clamp_length_max(Vec2::new(0.3, 0.4), 1.0);
        assert_eq!(w, Vec2::new(0.3, 0.4));
    }
}
