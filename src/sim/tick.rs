//! Fixed timestep simulation tick
//!
//! Core loop that advances the world deterministically.

use super::collision::resolve_all;
use super::phase::{Phase, PhaseEvent};
use super::pointer::{hover_strikes, pointer_overlaps_any};
use super::state::World;
use super::stats::CollisionStats;
use crate::clamp_length_max;
use crate::consts::*;

/// Advance the world by one fixed timestep of `dt` ms
pub fn tick(world: &mut World, dt: f32) {
    // Host input first, so a click lands before this step's physics
    world.apply_intents();

    world.time_ms += f64::from(dt);
    world.time_ticks += 1;
    world.dispatch(PhaseEvent::Clock);

    let now = world.time_ms;
    let tuning = world.config.physics;

    match world.phase {
        Phase::Moving { .. } => {
            let (width, height) = (world.width, world.height);
            for body in world.bodies.iter_mut() {
                body.expire_pointer_hit(now);
                body.integrate(dt, &tuning, &mut world.rng);
                body.resolve_walls(width, height, &mut world.rng);
            }
            hover_strikes(&mut world.bodies, world.pointer.pos, now, &tuning);
        }
        Phase::Word { .. } => {
            let reference = world.ease_reference();
            for i in 0..world.bodies.len() {
                let target = world.target_for(i);
                let body = &mut world.bodies[i];
                body.expire_pointer_hit(now);
                if let Some(target) = target {
                    body.ease_toward(target, reference);
                }
            }

            if world.phase.interaction_allowed(now)
                && pointer_overlaps_any(&world.bodies, world.pointer.pos)
            {
                hover_strikes(&mut world.bodies, world.pointer.pos, now, &tuning);
                world.dispatch(PhaseEvent::PointerHover);
            }
        }
    }

    let mut step_stats = CollisionStats::default();
    resolve_all(
        &mut world.bodies,
        tuning.collision_passes,
        now,
        tuning.restitution,
        &mut step_stats,
    );
    world.stats.accumulate(&step_stats);
    world.totals.accumulate(&step_stats);

    // Collisions may have pushed speeds or squash past their bounds
    let moving = world.phase.is_moving();
    for body in world.bodies.iter_mut() {
        if moving {
            body.clamp_speed(&tuning, &mut world.rng);
        } else {
            body.vel = clamp_length_max(body.vel, tuning.max_speed);
        }
        body.clamp_deform();
    }
}

/// Advance the world by one rendered frame.
///
/// The frame delta is clamped to `[0, MAX_FRAME_DT]` and fed into the
/// accumulator; whole fixed steps are run, at most `MAX_STEPS_PER_FRAME`.
/// Returns the number of steps run.
pub fn advance_frame(world: &mut World, frame_dt: f32) -> u32 {
    let frame_dt = if frame_dt.is_finite() {
        frame_dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };

    world.stats.reset();
    world.accumulator += frame_dt;

    let mut steps = 0;
    while world.accumulator >= FIXED_DT && steps < MAX_STEPS_PER_FRAME {
        tick(world, FIXED_DT);
        world.accumulator -= FIXED_DT;
        steps += 1;
    }
    // Drop any backlog the step cap left behind
    if steps == MAX_STEPS_PER_FRAME {
        world.accumulator = world.accumulator.min(FIXED_DT);
    }

    if steps > 0 {
        log::debug!(
            "frame: {} steps, {} checks, {} near, {} near misses, {} resolved",
            steps,
            world.stats.checks,
            world.stats.near,
            world.stats.near_misses,
            world.stats.resolved
        );
    }
    steps
}
