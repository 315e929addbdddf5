//! Phase state machine
//!
//! The simulation alternates between free motion and forming a word. All
//! timing lives in the phase value itself, so entering a phase replaces any
//! deadline left over from the previous one.

use serde::{Deserialize, Serialize};

use super::layout::Word;
use crate::config::PhaseTimings;

/// Current phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// Free motion until `ends_at`, then `next_word` forms
    Moving { ends_at: f64, next_word: Word },
    /// Blobs hold `word`; pointer input is ignored until the lock and cooldown pass
    Word {
        word: Word,
        entered_at: f64,
        locked_until: f64,
        cooldown_until: f64,
    },
}

/// Inputs that can move the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseEvent {
    /// Time passed; checks the moving deadline
    Clock,
    /// Pointer pressed anywhere on the surface
    PointerDown,
    /// Pointer entered a blob
    PointerHover,
    /// The word could not be laid out at all
    TargetsUnavailable,
}

impl Phase {
    /// Phase at startup
    pub fn initial(now: f64, timings: &PhaseTimings) -> Self {
        Phase::Moving {
            ends_at: now + timings.initial_moving_ms,
            next_word: Word::Hello,
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, Phase::Moving { .. })
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Phase::Word { .. })
    }

    /// Word currently shown, if any
    pub fn word(&self) -> Option<Word> {
        match *self {
            Phase::Word { word, .. } => Some(word),
            Phase::Moving { .. } => None,
        }
    }

    /// Whether pointer input may end the word phase at `now`
    pub fn interaction_allowed(&self, now: f64) -> bool {
        match *self {
            Phase::Moving { .. } => true,
            Phase::Word {
                locked_until,
                cooldown_until,
                ..
            } => now >= locked_until.max(cooldown_until),
        }
    }
}

/// Pure transition function.
///
/// Returns the phase after `event` at simulation time `now`. Events that do
/// not apply to the current phase leave it unchanged.
pub fn transition(phase: Phase, event: PhaseEvent, now: f64, timings: &PhaseTimings) -> Phase {
    match (phase, event) {
        (Phase::Moving { ends_at, next_word }, PhaseEvent::Clock) if now >= ends_at => {
            Phase::Word {
                word: next_word,
                entered_at: now,
                locked_until: now + timings.word_lock_ms,
                cooldown_until: now + timings.word_cooldown_ms,
            }
        }
        (Phase::Word { word, .. }, PhaseEvent::PointerDown | PhaseEvent::PointerHover)
            if phase.interaction_allowed(now) =>
        {
            moving_after(word, now, timings)
        }
        (Phase::Word { word, .. }, PhaseEvent::TargetsUnavailable) => {
            moving_after(word, now, timings)
        }
        _ => phase,
    }
}

fn moving_after(word: Word, now: f64, timings: &PhaseTimings) -> Phase {
    Phase::Moving {
        ends_at: now + timings.moving_ms,
        next_word: word.other(),
    }
}
