//! Deterministic simulation module
//!
//! All blob behavior lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body index)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod layout;
pub mod phase;
pub mod pointer;
pub mod state;
pub mod stats;
pub mod tick;

pub use body::{Body, Rgb};
pub use collision::{resolve_all, resolve_pair};
pub use layout::{Word, fallback_grid, layout_word, target_index};
pub use phase::{Phase, PhaseEvent, transition};
pub use pointer::{PointerEvent, PointerState};
pub use state::{Intent, World, body_count};
pub use stats::{BreakCause, CollisionStats, EventLog, SimEvent};
pub use tick::{advance_frame, tick};
