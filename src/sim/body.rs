//! Blob bodies and their free-motion integration
//!
//! Units: positions in surface pixels, velocities in px/ms, time in ms.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::config::PhysicsTuning;
use crate::consts::*;
use crate::{clamp_length_max, direction_and_distance};

/// Fixed blob color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Random mid-to-light color, channels in [80, 255)
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.random_range(80..255),
            g: rng.random_range(80..255),
            b: rng.random_range(80..255),
        }
    }

    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// A single blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub wobble_phase: f32,
    /// Radians per second
    pub wobble_speed: f32,
    pub color: Rgb,
    /// Visual squash/stretch, each axis in [-MAX_DEFORM, MAX_DEFORM]
    pub deform: Vec2,
    /// Simulation time of the last pointer strike (direct or cascaded)
    pub last_pointer_hit: f64,
    /// Set while a pointer strike is recent enough to cascade
    pub pointer_hit: bool,
    /// Pointer currently inside this blob
    pub pointer_over: bool,
    /// Touched another blob this tick (highlight only)
    #[serde(skip)]
    pub collided: bool,
}

impl Body {
    /// Create a blob somewhere in the central part of the area
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32, radius: f32) -> Self {
        let angle = rng.random_range(0.0..TAU);
        let vel = clamp_length_max(Vec2::from_angle(angle) * START_SPEED, START_MAX_SPEED);
        Self {
            pos: Vec2::new(
                rng.random_range(0.18f32..=0.82) * width,
                rng.random_range(0.18f32..=0.82) * height,
            ),
            vel,
            radius,
            wobble_phase: rng.random_range(0.0..TAU),
            wobble_speed: rng.random_range(0.3..0.6),
            color: Rgb::random(rng),
            deform: Vec2::ZERO,
            last_pointer_hit: f64::NEG_INFINITY,
            pointer_hit: false,
            pointer_over: false,
            collided: false,
        }
    }

    /// Collision mass, approximated by the radius squared
    #[inline]
    pub fn mass(&self) -> f32 {
        (self.radius * self.radius).max(0.01)
    }

    /// Radius including the current wobble, used for walls and drawing
    #[inline]
    pub fn effective_radius(&self) -> f32 {
        self.radius + self.wobble_phase.sin() * self.radius * WOBBLE_AMPLITUDE
    }

    /// Slightly more generous wobble radius for pointer hit tests
    #[inline]
    pub fn pointer_radius(&self) -> f32 {
        self.radius + self.wobble_phase.sin() * self.radius * POINTER_WOBBLE_AMPLITUDE
    }

    /// How recent the last pointer strike is: 1 right after, 0 once the window passed
    pub fn pointer_recency(&self, now: f64) -> f32 {
        if !self.pointer_hit {
            return 0.0;
        }
        let age = now - self.last_pointer_hit;
        if !(0.0..=POINTER_HIT_WINDOW_MS).contains(&age) {
            return 0.0;
        }
        (1.0 - age / POINTER_HIT_WINDOW_MS) as f32
    }

    /// Drop the pointer-hit flag once the recency window has passed
    pub fn expire_pointer_hit(&mut self, now: f64) {
        if self.pointer_hit && now - self.last_pointer_hit > POINTER_HIT_WINDOW_MS {
            self.pointer_hit = false;
        }
    }

    /// Advance free motion by `dt` ms: wobble, friction, noise, position,
    /// speed bounds and deformation decay.
    pub fn integrate<R: Rng + ?Sized>(&mut self, dt: f32, tuning: &PhysicsTuning, rng: &mut R) {
        self.wobble_phase = (self.wobble_phase + self.wobble_speed * dt * 0.001) % TAU;

        self.vel *= (1.0 - tuning.friction * dt).max(0.0);
        self.vel += Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5)
            * tuning.noise_acc
            * dt;

        self.pos += self.vel * dt;

        self.clamp_speed(tuning, rng);

        let decay = (1.0 - DEFORM_DECAY * dt).max(0.0);
        self.deform *= decay;
        self.clamp_deform();
    }

    /// Keep the speed within the free-motion bounds.
    ///
    /// A body that has come to a complete stop is relaunched in a random
    /// direction at the minimum speed.
    pub fn clamp_speed<R: Rng + ?Sized>(&mut self, tuning: &PhysicsTuning, rng: &mut R) {
        let speed = self.vel.length();
        if speed > tuning.max_speed {
            self.vel *= tuning.max_speed / speed;
        } else if speed == 0.0 {
            self.vel = Vec2::from_angle(rng.random_range(0.0..TAU)) * tuning.min_speed;
        } else if speed < tuning.min_speed {
            self.vel *= tuning.min_speed / speed;
        }
    }

    pub fn clamp_deform(&mut self) {
        self.deform = self.deform.clamp(Vec2::splat(-MAX_DEFORM), Vec2::splat(MAX_DEFORM));
    }

    /// Bounce off the area edges.
    ///
    /// Returns true if any wall was hit.
    pub fn resolve_walls<R: Rng + ?Sized>(&mut self, width: f32, height: f32, rng: &mut R) -> bool {
        let r = self.effective_radius();
        let mut hit = false;

        if self.pos.x < r {
            self.pos.x = r;
            self.vel.x = -self.vel.x;
            self.vel.y += (rng.random::<f32>() - 0.5) * WALL_KICK;
            hit = true;
        }
        if self.pos.x > width - r {
            self.pos.x = width - r;
            self.vel.x = -self.vel.x;
            self.vel.y += (rng.random::<f32>() - 0.5) * WALL_KICK;
            hit = true;
        }
        if self.pos.y < r {
            self.pos.y = r;
            self.vel.y = -self.vel.y;
            self.vel.x += (rng.random::<f32>() - 0.5) * WALL_KICK;
            hit = true;
        }
        if self.pos.y > height - r {
            self.pos.y = height - r;
            self.vel.y = -self.vel.y;
            self.vel.x += (rng.random::<f32>() - 0.5) * WALL_KICK;
            hit = true;
        }
        hit
    }

    /// Word-phase step: move a fraction of the way to `target`.
    ///
    /// The fraction follows an exponential ease-out of the remaining distance
    /// relative to `reference` (3% of the shorter area side), floored at
    /// [`MIN_EASE`] so blobs never stall far from their target.
    pub fn ease_toward(&mut self, target: Vec2, reference: f32) {
        let delta = target - self.pos;
        let dist = delta.length();
        let normalized = (dist / reference.max(1.0)).min(1.0);
        let ease = 1.0 - 2.0_f32.powf(-6.0 * normalized);
        let eff = ease.max(MIN_EASE);

        self.deform = Vec2::ZERO;
        self.pos += delta * EASE_GAIN * eff;
    }

    /// Bounce away from a pointer sitting inside the blob.
    ///
    /// Reverses the velocity component pointing at the pointer (amplified by
    /// the pointer restitution), adds a push proportional to how deep the
    /// pointer is, caps the result, and stamps the strike time so the
    /// momentum can cascade through contacts.
    pub fn pointer_strike(&mut self, pointer: Vec2, now: f64, tuning: &PhysicsTuning) {
        let radius = self.pointer_radius();
        let (n, dist) = direction_and_distance(self.pos, pointer);

        let vdot = self.vel.dot(n);
        self.vel -= tuning.pointer_restitution * vdot * n;

        let penetration = (radius - dist).max(0.0);
        let impulse = (penetration * 0.08).min(1.4);
        self.vel -= n * impulse;
        let pulse = (penetration / radius.max(1.0) * (self.radius * 0.004)).min(1.6);
        self.vel -= n * pulse;

        self.vel = clamp_length_max(self.vel, MAX_SPEED_AFTER_POINTER);

        self.pointer_over = true;
        self.pointer_hit = true;
        self.last_pointer_hit = now;
    }

    /// Whether `pointer` lies within the wobbling pointer radius
    pub fn contains_pointer(&self, pointer: Vec2) -> bool {
        self.pos.distance(pointer) < self.pointer_radius()
    }
}
