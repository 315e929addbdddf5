//! Pointer (mouse/touch) tracking and hover strikes
//!
//! Host pointer events only update [`PointerState`]; the physical response is
//! applied by the tick that follows.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::config::PhysicsTuning;

/// Raw pointer events in surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Move { x: f32, y: f32 },
    Down,
    Up,
    Leave,
}

/// Latest known pointer state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// None while the pointer is outside the surface
    pub pos: Option<Vec2>,
}

impl PointerState {
    /// Fold an event into the state.
    ///
    /// Returns true for a press, which the phase controller treats as a click.
    /// Releases carry no state of their own.
    pub fn apply(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Move { x, y } => {
                if x.is_finite() && y.is_finite() {
                    self.pos = Some(Vec2::new(x, y));
                }
                false
            }
            PointerEvent::Down => true,
            PointerEvent::Up => false,
            PointerEvent::Leave => {
                self.pos = None;
                false
            }
        }
    }
}

/// Strike every blob the pointer has just entered.
///
/// A blob is struck once on entry; it has to lose the pointer before it can be
/// struck again. Returns the number of blobs struck.
pub fn hover_strikes(
    bodies: &mut [Body],
    pointer: Option<Vec2>,
    now: f64,
    tuning: &PhysicsTuning,
) -> usize {
    let Some(p) = pointer else {
        for body in bodies.iter_mut() {
            body.pointer_over = false;
        }
        return 0;
    };

    let mut struck = 0;
    for body in bodies.iter_mut() {
        if body.contains_pointer(p) {
            if !body.pointer_over {
                body.pointer_strike(p, now, tuning);
                struck += 1;
            }
        } else {
            body.pointer_over = false;
        }
    }
    struck
}

/// Whether the pointer currently overlaps any blob
pub fn pointer_overlaps_any(bodies: &[Body], pointer: Option<Vec2>) -> bool {
    pointer.is_some_and(|p| bodies.iter().any(|b| b.contains_pointer(p)))
}
