//! Optional observability: collision counters and simulation events
//!
//! Nothing here affects physics. Hosts drain events and read counters when
//! they want them and ignore them otherwise.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::layout::Word;

/// Collision counters
///
/// The world keeps one set reset every frame and one running total; totals
/// saturate instead of wrapping on very long runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionStats {
    /// Pair distance tests performed
    pub checks: u64,
    /// Pairs closer than 1.2x their combined radius
    pub near: u64,
    /// Pairs skipped while within 5% of touching
    pub near_misses: u64,
    /// Pairs that overlapped and were separated
    pub resolved: u64,
}

impl CollisionStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn accumulate(&mut self, other: &CollisionStats) {
        self.checks = self.checks.saturating_add(other.checks);
        self.near = self.near.saturating_add(other.near);
        self.near_misses = self.near_misses.saturating_add(other.near_misses);
        self.resolved = self.resolved.saturating_add(other.resolved);
    }
}

/// Why a word phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakCause {
    PointerDown,
    PointerHover,
    TargetsUnavailable,
}

/// Notable things that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Blobs started converging into a word
    WordStarted { word: Word, at: f64, targets: usize },
    /// Word targets were empty and an evenly spaced grid was used instead
    FallbackTargets { word: Word, at: f64 },
    /// Free motion resumed; `held_ms` is how long the previous word was shown
    MovingStarted {
        at: f64,
        cause: Option<BreakCause>,
        held_ms: Option<f64>,
    },
    /// Pointer input arrived while the word was still locked
    BreakIgnored {
        at: f64,
        entered_at: f64,
        locked_until: f64,
    },
    /// The drawing area changed
    Resized { width: f32, height: f32 },
}

/// Event sink stored in the world
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: VecDeque<SimEvent>,
    /// Recording is off until a host asks for events
    enabled: bool,
}

/// Events kept before the oldest are dropped
const MAX_EVENTS: usize = 256;

impl EventLog {
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.events.clear();
        }
    }

    pub fn push(&mut self, event: SimEvent) {
        if !self.enabled {
            return;
        }
        if self.events.len() >= MAX_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Take every recorded event, oldest first
    pub fn drain(&mut self) -> Vec<SimEvent> {
        self.events.drain(..).collect()
    }
}
