//! Simulation tuning
//!
//! Defaults mirror [`crate::consts`]. Hosts may override any subset from JSON;
//! missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Phase durations in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseTimings {
    /// First moving phase after startup
    pub initial_moving_ms: f64,
    /// Every later moving phase
    pub moving_ms: f64,
    /// Interaction lock after a word appears
    pub word_lock_ms: f64,
    /// Residual-event cooldown after a word appears
    pub word_cooldown_ms: f64,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            initial_moving_ms: MOVING_MS_INITIAL,
            moving_ms: MOVING_MS,
            word_lock_ms: WORD_LOCK_MS,
            word_cooldown_ms: WORD_COOLDOWN_MS,
        }
    }
}

/// Physics coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub min_speed: f32,
    pub max_speed: f32,
    pub friction: f32,
    pub noise_acc: f32,
    /// Restitution between blobs
    pub restitution: f32,
    /// Restitution of the pointer bounce
    pub pointer_restitution: f32,
    /// Collision passes per tick
    pub collision_passes: u32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            friction: FRICTION,
            noise_acc: NOISE_ACC,
            restitution: RESTITUTION,
            pointer_restitution: POINTER_RESTITUTION,
            collision_passes: COLLISION_PASSES,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for every random draw in the simulation
    pub seed: u64,
    pub timings: PhaseTimings,
    pub physics: PhysicsTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            timings: PhaseTimings::default(),
            physics: PhysicsTuning::default(),
        }
    }
}

impl SimConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<SimConfig>(json).map(SimConfig::sanitized)
    }

    /// Parse a configuration, falling back to defaults on malformed input
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(config)) => {
                log::info!("Loaded simulation config (seed {})", config.seed);
                config
            }
            Some(Err(e)) => {
                log::warn!("Ignoring malformed simulation config: {e}");
                Self::default()
            }
            None => {
                log::info!("Using default simulation config");
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Replace values that would break simulation invariants
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        let t = &mut self.timings;
        for (value, default) in [
            (&mut t.initial_moving_ms, defaults.timings.initial_moving_ms),
            (&mut t.moving_ms, defaults.timings.moving_ms),
            (&mut t.word_lock_ms, defaults.timings.word_lock_ms),
            (&mut t.word_cooldown_ms, defaults.timings.word_cooldown_ms),
        ] {
            if !value.is_finite() || *value < 0.0 {
                *value = default;
            }
        }

        let p = &mut self.physics;
        if !(p.min_speed.is_finite() && p.max_speed.is_finite())
            || p.min_speed <= 0.0
            || p.max_speed < p.min_speed
        {
            p.min_speed = defaults.physics.min_speed;
            p.max_speed = defaults.physics.max_speed;
        }
        if !p.friction.is_finite() || p.friction < 0.0 {
            p.friction = defaults.physics.friction;
        }
        if !p.noise_acc.is_finite() || p.noise_acc < 0.0 {
            p.noise_acc = defaults.physics.noise_acc;
        }
        if !p.restitution.is_finite() {
            p.restitution = defaults.physics.restitution;
        }
        p.restitution = p.restitution.clamp(0.0, 1.0);
        if !p.pointer_restitution.is_finite() || p.pointer_restitution < 1.0 {
            p.pointer_restitution = defaults.physics.pointer_restitution;
        }
        p.collision_passes = p.collision_passes.clamp(1, 8);

        self
    }
}

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 0x1b10b5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = SimConfig::default();
        assert_eq!(config.timings.initial_moving_ms, 7000.0);
        assert_eq!(config.timings.moving_ms, 4000.0);
        assert_eq!(config.timings.word_lock_ms, 5000.0);
        assert_eq!(config.physics.min_speed, MIN_SPEED);
        assert_eq!(config.physics.max_speed, MAX_SPEED);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimConfig::from_json(r#"{ "seed": 7, "timings": { "moving_ms": 2500.0 } }"#)
            .expect("valid json");
        assert_eq!(config.seed, 7);
        assert_eq!(config.timings.moving_ms, 2500.0);
        assert_eq!(config.timings.word_lock_ms, WORD_LOCK_MS);
        assert_eq!(config.physics, PhysicsTuning::default());
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert!(SimConfig::from_json("{ not json").is_err());
        assert_eq!(SimConfig::load_or_default(Some("{ not json")), SimConfig::default());
        assert_eq!(SimConfig::load_or_default(None), SimConfig::default());
    }

    #[test]
    fn test_sanitized_repairs_invalid_values() {
        let mut config = SimConfig::default();
        config.timings.word_lock_ms = -1.0;
        config.physics.min_speed = 3.0;
        config.physics.max_speed = 1.0;
        config.physics.restitution = 4.0;
        config.physics.collision_passes = 0;

        let fixed = config.sanitized();
        assert_eq!(fixed.timings.word_lock_ms, WORD_LOCK_MS);
        assert_eq!(fixed.physics.min_speed, MIN_SPEED);
        assert_eq!(fixed.physics.max_speed, MAX_SPEED);
        assert_eq!(fixed.physics.restitution, 1.0);
        assert_eq!(fixed.physics.collision_passes, 1);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SimConfig {
            seed: 42,
            ..Default::default()
        };
        let json = config.to_json().expect("serializable");
        assert_eq!(SimConfig::from_json(&json).expect("parses"), config);
    }
}
