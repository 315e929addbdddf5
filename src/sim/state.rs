//! Simulation world
//!
//! The world is the single owner of every blob and of all phase/pointer state.
//! Host events never touch it directly: they are queued as intents and folded
//! in by the next tick, so one `&mut World` is the only writer.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::Body;
use super::layout::{Word, fallback_grid, layout_word, target_index};
use super::phase::{Phase, PhaseEvent, transition};
use super::pointer::{PointerEvent, PointerState};
use super::stats::{BreakCause, CollisionStats, EventLog, SimEvent};
use crate::config::SimConfig;
use crate::consts::*;
use crate::{free_radius, word_radius};

/// Host input waiting for the next tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Pointer(PointerEvent),
    Resize { width: f32, height: f32 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub config: SimConfig,
    /// Drawing area
    pub width: f32,
    pub height: f32,
    /// Every blob, in stable order; the count never changes
    pub bodies: Vec<Body>,
    pub phase: Phase,
    /// Targets of the current word (empty while moving)
    pub targets: Vec<Vec2>,
    pub pointer: PointerState,
    /// Simulation clock (ms)
    pub time_ms: f64,
    /// Fixed steps run so far
    pub time_ticks: u64,
    /// Collision counters for the last frame
    pub stats: CollisionStats,
    /// Collision counters since startup
    pub totals: CollisionStats,
    pub events: EventLog,
    pub(crate) accumulator: f32,
    pub(crate) rng: Pcg32,
    intents: VecDeque<Intent>,
}

impl World {
    /// Create a world for a `width` x `height` area.
    ///
    /// Non-positive sizes are raised to one pixel so the world always has a
    /// valid area; a later resize replaces it.
    pub fn new(config: SimConfig, width: f32, height: f32) -> Self {
        let config = config.sanitized();
        let width = if width.is_finite() { width.max(1.0) } else { 1.0 };
        let height = if height.is_finite() { height.max(1.0) } else { 1.0 };

        let mut rng = Pcg32::seed_from_u64(config.seed);
        let count = body_count(width, height);
        let radius = free_radius(width, height);
        let bodies = (0..count)
            .map(|_| Body::spawn(&mut rng, width, height, radius))
            .collect();

        let phase = Phase::initial(0.0, &config.timings);
        log::info!(
            "World {}x{} with {} blobs (seed {})",
            width,
            height,
            count,
            config.seed
        );

        Self {
            config,
            width,
            height,
            bodies,
            phase,
            targets: Vec::new(),
            pointer: PointerState::default(),
            time_ms: 0.0,
            time_ticks: 0,
            stats: CollisionStats::default(),
            totals: CollisionStats::default(),
            events: EventLog::default(),
            accumulator: 0.0,
            rng,
            intents: VecDeque::new(),
        }
    }

    /// Queue a pointer event for the next tick
    pub fn queue_pointer(&mut self, event: PointerEvent) {
        self.intents.push_back(Intent::Pointer(event));
    }

    /// Queue a new drawing-area size for the next tick
    pub fn queue_resize(&mut self, width: f32, height: f32) {
        self.intents.push_back(Intent::Resize { width, height });
    }

    /// Number of intents waiting
    pub fn pending_intents(&self) -> usize {
        self.intents.len()
    }

    /// Drop all queued intents
    pub fn clear_intents(&mut self) {
        self.intents.clear();
    }

    /// Fold every queued intent into the world
    pub fn apply_intents(&mut self) {
        while let Some(intent) = self.intents.pop_front() {
            match intent {
                Intent::Pointer(event) => {
                    if self.pointer.apply(event) {
                        self.dispatch(PhaseEvent::PointerDown);
                    }
                }
                Intent::Resize { width, height } => self.resize(width, height),
            }
        }
    }

    /// Apply a new drawing-area size.
    ///
    /// Zero or invalid sizes are ignored and the previous bounds kept.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            log::debug!("Ignoring resize to {width}x{height}");
            return;
        }
        if width == self.width && height == self.height {
            return;
        }

        self.width = width;
        self.height = height;

        let radius = match self.phase.word() {
            Some(word) => {
                self.targets = self.targets_for(word);
                word_radius(width, height)
            }
            None => free_radius(width, height),
        };
        for body in &mut self.bodies {
            body.radius = radius;
        }

        log::info!("Resized to {width}x{height}");
        self.events.push(SimEvent::Resized { width, height });
    }

    /// Feed an event to the phase machine and apply the consequences of a change
    pub fn dispatch(&mut self, event: PhaseEvent) {
        let now = self.time_ms;
        let next = transition(self.phase, event, now, &self.config.timings);

        if next == self.phase {
            if let Phase::Word {
                entered_at,
                locked_until,
                ..
            } = self.phase
                && matches!(event, PhaseEvent::PointerDown)
            {
                log::debug!("Pointer press ignored, word locked until {locked_until}");
                self.events.push(SimEvent::BreakIgnored {
                    at: now,
                    entered_at,
                    locked_until,
                });
            }
            return;
        }

        let held_ms = match self.phase {
            Phase::Word { entered_at, .. } => Some(now - entered_at),
            Phase::Moving { .. } => None,
        };
        self.phase = next;
        match next {
            Phase::Word { word, .. } => self.enter_word(word),
            Phase::Moving { .. } => {
                let cause = match event {
                    PhaseEvent::PointerDown => Some(BreakCause::PointerDown),
                    PhaseEvent::PointerHover => Some(BreakCause::PointerHover),
                    PhaseEvent::TargetsUnavailable => Some(BreakCause::TargetsUnavailable),
                    PhaseEvent::Clock => None,
                };
                self.enter_moving(cause, held_ms);
            }
        }
    }

    fn enter_word(&mut self, word: Word) {
        let now = self.time_ms;
        self.targets = self.targets_for(word);
        if self.targets.is_empty() {
            log::warn!("No targets for {}, resuming free motion", word.as_str());
            self.dispatch(PhaseEvent::TargetsUnavailable);
            return;
        }

        let radius = word_radius(self.width, self.height);
        for body in &mut self.bodies {
            body.radius = radius;
        }

        log::info!(
            "Word phase: {} ({} targets) at {:.0} ms",
            word.as_str(),
            self.targets.len(),
            now
        );
        self.events.push(SimEvent::WordStarted {
            word,
            at: now,
            targets: self.targets.len(),
        });
    }

    fn enter_moving(&mut self, cause: Option<BreakCause>, held_ms: Option<f64>) {
        let now = self.time_ms;
        self.targets.clear();

        let radius = free_radius(self.width, self.height);
        for body in &mut self.bodies {
            body.radius = radius;
        }

        match held_ms {
            Some(held) => log::info!("Moving phase at {now:.0} ms ({cause:?}, word held {held:.0} ms)"),
            None => log::info!("Moving phase at {now:.0} ms ({cause:?})"),
        }
        self.events.push(SimEvent::MovingStarted {
            at: now,
            cause,
            held_ms,
        });
    }

    /// Targets for `word` in the current area, falling back to an even grid
    pub fn targets_for(&mut self, word: Word) -> Vec<Vec2> {
        let targets = layout_word(word, self.width, self.height);
        if !targets.is_empty() {
            return targets;
        }
        log::warn!("Empty layout for {}, using fallback grid", word.as_str());
        self.events.push(SimEvent::FallbackTargets {
            word,
            at: self.time_ms,
        });
        fallback_grid(self.width, self.height, self.bodies.len())
    }

    /// Target assigned to blob `index`, if a word is active
    pub fn target_for(&self, index: usize) -> Option<Vec2> {
        if self.targets.is_empty() {
            return None;
        }
        let i = target_index(index, self.bodies.len(), self.targets.len());
        self.targets.get(i).copied()
    }

    /// Ease reference distance: 3% of the shorter side
    pub fn ease_reference(&self) -> f32 {
        self.width.min(self.height) * 0.03
    }
}

/// Blob count for an area: enough for the larger word, never below the floor
pub fn body_count(width: f32, height: f32) -> usize {
    let hello = layout_word(Word::Hello, width, height).len();
    let world = layout_word(Word::World, width, height).len();
    hello.max(world).max(MIN_BODY_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(SimConfig::default(), 800.0, 600.0)
    }

    #[test]
    fn test_new_world() {
        let w = world();
        assert_eq!(w.bodies.len(), 82);
        assert!(w.phase.is_moving());
        assert!(w.targets.is_empty());
        assert!(w.bodies.iter().all(|b| b.radius == free_radius(800.0, 600.0)));
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = world();
        let b = world();
        for (x, y) in a.bodies.iter().zip(&b.bodies) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.vel, y.vel);
            assert_eq!(x.color, y.color);
        }
    }

    #[test]
    fn test_zero_resize_is_ignored() {
        let mut w = world();
        w.queue_resize(0.0, 500.0);
        w.queue_resize(1024.0, 0.0);
        w.apply_intents();
        assert_eq!((w.width, w.height), (800.0, 600.0));

        w.queue_resize(1024.0, 768.0);
        w.apply_intents();
        assert_eq!((w.width, w.height), (1024.0, 768.0));
        assert_eq!(w.pending_intents(), 0);
    }

    #[test]
    fn test_word_entry_sets_targets_and_radius() {
        let mut w = world();
        w.events.set_enabled(true);
        w.time_ms = 7000.0;
        w.dispatch(PhaseEvent::Clock);

        assert_eq!(w.phase.word(), Some(Word::Hello));
        assert_eq!(w.targets.len(), Word::Hello.dot_count());
        assert!(w.bodies.iter().all(|b| b.radius == word_radius(800.0, 600.0)));
        assert!(matches!(
            w.events.drain().as_slice(),
            [SimEvent::WordStarted {
                word: Word::Hello,
                ..
            }]
        ));
    }

    #[test]
    fn test_resize_during_word_relayouts() {
        let mut w = world();
        w.time_ms = 7000.0;
        w.dispatch(PhaseEvent::Clock);
        let before = w.targets.clone();
        w.resize(1600.0, 900.0);
        assert_eq!(w.targets.len(), before.len());
        assert_ne!(w.targets, before);
        assert!(
            w.targets
                .iter()
                .all(|p| p.x <= 1600.0 && p.y <= 900.0 && p.x >= 0.0 && p.y >= 0.0)
        );
    }

    #[test]
    fn test_locked_press_is_recorded() {
        let mut w = world();
        w.events.set_enabled(true);
        w.time_ms = 7000.0;
        w.dispatch(PhaseEvent::Clock);
        w.events.drain();

        w.time_ms = 7100.0;
        w.queue_pointer(PointerEvent::Down);
        w.apply_intents();
        assert!(w.phase.is_word());
        assert_eq!(
            w.events.drain(),
            vec![SimEvent::BreakIgnored {
                at: 7100.0,
                entered_at: 7000.0,
                locked_until: 12000.0,
            }]
        );

        w.time_ms = 12001.0;
        w.queue_pointer(PointerEvent::Down);
        w.apply_intents();
        assert!(w.phase.is_moving());
        match w.events.drain().as_slice() {
            [SimEvent::MovingStarted {
                cause, held_ms, ..
            }] => {
                assert_eq!(*cause, Some(BreakCause::PointerDown));
                assert_eq!(*held_ms, Some(5001.0));
            }
            other => panic!("unexpected events {other:?}"),
        }
        assert!(w.targets.is_empty());
        assert!(w.bodies.iter().all(|b| b.radius == free_radius(800.0, 600.0)));
    }

    #[test]
    fn test_target_mapping_covers_word() {
        let mut w = world();
        w.time_ms = 7000.0;
        w.dispatch(PhaseEvent::Clock);
        let n = w.bodies.len();
        assert_eq!(w.target_for(0), w.targets.first().copied());
        assert_eq!(w.target_for(n - 1), w.targets.last().copied());
    }
}
