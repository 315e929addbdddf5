//! Blob-blob collision detection and response
//!
//! Every unordered pair is tested several times per tick to limit tunneling.
//! Overlapping pairs are pushed apart, exchange normal momentum as a
//! mass-weighted elastic collision, pick up a little squash, and hand on any
//! recent pointer strike so one hit can ripple through a cluster.

use glam::Vec2;

use super::body::Body;
use super::stats::CollisionStats;
use crate::consts::*;
use crate::direction_and_distance;

/// Resolve a single pair of blobs.
///
/// `now` is the simulation time used for pointer-hit recency. Returns true if
/// the pair was within contact range.
pub fn resolve_pair(
    a: &mut Body,
    b: &mut Body,
    now: f64,
    restitution: f32,
    stats: &mut CollisionStats,
) -> bool {
    let (n, dist) = direction_and_distance(a.pos, b.pos);
    let min_dist = a.radius + b.radius;
    let margin = min_dist * CONTACT_MARGIN;

    stats.checks += 1;
    if dist < min_dist * 1.2 {
        stats.near += 1;
    }
    if dist > min_dist + margin {
        if dist < min_dist * 1.05 {
            stats.near_misses += 1;
        }
        return false;
    }

    let overlap = (min_dist - dist).max(0.0);

    // Separate fully, with a little extra, so the pair cannot stay sunk
    a.pos -= n * overlap * SEPARATION_SHARE;
    b.pos += n * overlap * SEPARATION_SHARE;

    if overlap > 0.0 {
        a.collided = true;
        b.collided = true;
        stats.resolved += 1;
    }

    let m1 = a.mass();
    let m2 = b.mass();
    let t = n.perp();

    let va_n = a.vel.dot(n);
    let va_t = a.vel.dot(t);
    let vb_n = b.vel.dot(n);
    let vb_t = b.vel.dot(t);
    // Positive while closing along the normal
    let closing = va_n - vb_n;

    if closing > 0.0 {
        let va_n_after =
            (va_n * (m1 - restitution * m2) + (1.0 + restitution) * m2 * vb_n) / (m1 + m2);
        let vb_n_after =
            (vb_n * (m2 - restitution * m1) + (1.0 + restitution) * m1 * va_n) / (m1 + m2);
        a.vel = n * va_n_after + t * va_t;
        b.vel = n * vb_n_after + t * vb_t;
    }

    // Secondary push plus a small penetration-driven velocity transfer
    let push = n * overlap.min(MAX_PENETRATION_PUSH);
    a.pos -= push * 0.5;
    b.pos += push * 0.5;
    a.vel -= push * PENETRATION_VEL_TRANSFER / m1;
    b.vel += push * PENETRATION_VEL_TRANSFER / m2;

    // Recency is sampled before either side inherits a strike
    let recency_a = a.pointer_recency(now);
    let recency_b = b.pointer_recency(now);
    cascade_pointer_hit(a, b, n, closing, recency_a);
    cascade_pointer_hit(b, a, -n, closing, recency_b);

    // Baumgarte positional correction
    let correction = (overlap - CORRECTION_SLOP).max(0.0) / 2.0;
    if correction > 0.0 {
        let c = n * correction * CORRECTION_PERCENT;
        a.pos -= c;
        b.pos += c;
    }

    if closing > 0.0 {
        let amount = ((min_dist - dist + margin) / (min_dist * 0.6)).min(MAX_CONTACT_DEFORM);
        a.deform -= n * amount;
        b.deform += n * amount;
        a.clamp_deform();
        b.clamp_deform();
    }

    true
}

/// Hand extra momentum from a recently struck `source` to `target`.
///
/// `n` points from source to target. The target inherits the strike so the
/// push keeps travelling through whatever it touches next.
fn cascade_pointer_hit(source: &mut Body, target: &mut Body, n: Vec2, closing: f32, recency: f32) {
    if recency <= 0.0 {
        return;
    }

    let rel = closing.abs() + 0.5;
    let extra =
        (POINTER_TRANSFER_SCALE * recency * rel * (source.radius * 0.02)).min(MAX_POINTER_TRANSFER);
    let e = n * extra;
    source.vel -= e / source.mass();
    target.vel += e / target.mass();

    target.pointer_hit = true;
    target.last_pointer_hit = target.last_pointer_hit.max(source.last_pointer_hit);
}

/// Run every collision pass over all pairs, in index order
pub fn resolve_all(
    bodies: &mut [Body],
    passes: u32,
    now: f64,
    restitution: f32,
    stats: &mut CollisionStats,
) {
    for body in bodies.iter_mut() {
        body.collided = false;
    }

    for _ in 0..passes {
        for i in 0..bodies.len() {
            let (head, tail) = bodies.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                resolve_pair(a, b, now, restitution, stats);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn blob(pos: Vec2, vel: Vec2, radius: f32) -> Body {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut b = Body::spawn(&mut rng, 800.0, 600.0, radius);
        b.pos = pos;
        b.vel = vel;
        b
    }

    #[test]
    fn test_far_pair_is_skipped() {
        let mut stats = CollisionStats::default();
        let mut a = blob(Vec2::new(0.0, 0.0), Vec2::X, 20.0);
        let mut b = blob(Vec2::new(100.0, 0.0), -Vec2::X, 20.0);
        let hit = resolve_pair(&mut a, &mut b, 0.0, RESTITUTION, &mut stats);
        assert!(!hit);
        assert_eq!(a.vel, Vec2::X);
        assert_eq!(stats.checks, 1);
        assert_eq!(stats.resolved, 0);
    }

    #[test]
    fn test_head_on_equal_mass() {
        let mut stats = CollisionStats::default();
        let mut a = blob(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 20.0);
        let mut b = blob(Vec2::new(139.0, 100.0), Vec2::new(-1.0, 0.0), 20.0);
        let hit = resolve_pair(&mut a, &mut b, 0.0, RESTITUTION, &mut stats);

        assert!(hit);
        assert!(a.collided && b.collided);
        // Equal and opposite exit, scaled by restitution
        assert!((a.vel.x + b.vel.x).abs() < 1e-5);
        assert!((a.vel.x + 0.95).abs() < 0.01);
        assert!((b.vel.x - 0.95).abs() < 0.01);
        assert!(a.vel.y.abs() < 1e-6 && b.vel.y.abs() < 1e-6);
        // Squash along the contact normal
        assert!(a.deform.x < 0.0 && b.deform.x > 0.0);
        // Pushed apart
        assert!(b.pos.x - a.pos.x >= 40.0);
    }

    #[test]
    fn test_heavier_blob_keeps_more_momentum() {
        let mut stats = CollisionStats::default();
        let mut big = blob(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 40.0);
        let mut small = blob(Vec2::new(158.0, 100.0), Vec2::new(-1.0, 0.0), 20.0);
        resolve_pair(&mut big, &mut small, 0.0, RESTITUTION, &mut stats);
        assert!(big.vel.x.abs() < small.vel.x.abs());
        assert!(small.vel.x > 1.0);
    }

    #[test]
    fn test_tangential_velocity_preserved() {
        let mut stats = CollisionStats::default();
        let mut a = blob(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.5), 20.0);
        let mut b = blob(Vec2::new(139.0, 100.0), Vec2::new(-1.0, -0.5), 20.0);
        resolve_pair(&mut a, &mut b, 0.0, RESTITUTION, &mut stats);
        assert!((a.vel.y - 0.5).abs() < 1e-5);
        assert!((b.vel.y + 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_separating_pair_keeps_normal_velocity() {
        let mut stats = CollisionStats::default();
        let mut a = blob(Vec2::new(100.0, 100.0), Vec2::new(-1.0, 0.0), 20.0);
        let mut b = blob(Vec2::new(139.0, 100.0), Vec2::new(1.0, 0.0), 20.0);
        resolve_pair(&mut a, &mut b, 0.0, RESTITUTION, &mut stats);
        assert!(a.vel.x < -0.99);
        assert!(b.vel.x > 0.99);
        // No squash when moving apart
        assert_eq!(a.deform, Vec2::ZERO);
    }

    #[test]
    fn test_coincident_centers_are_separated() {
        let mut stats = CollisionStats::default();
        let mut a = blob(Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0);
        let mut b = blob(Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0);
        let hit = resolve_pair(&mut a, &mut b, 0.0, RESTITUTION, &mut stats);
        assert!(hit);
        assert!(a.pos.distance(b.pos) > 30.0);
        assert!(a.pos.is_finite() && b.pos.is_finite());
    }

    #[test]
    fn test_pointer_hit_cascades() {
        let mut stats = CollisionStats::default();
        let mut struck = blob(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 20.0);
        struck.pointer_hit = true;
        struck.last_pointer_hit = 1000.0;
        let mut plain = blob(Vec2::new(139.0, 100.0), Vec2::ZERO, 20.0);

        let mut reference_a = blob(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 20.0);
        let mut reference_b = blob(Vec2::new(139.0, 100.0), Vec2::ZERO, 20.0);

        resolve_pair(&mut struck, &mut plain, 1050.0, RESTITUTION, &mut stats);
        resolve_pair(&mut reference_a, &mut reference_b, 1050.0, RESTITUTION, &mut stats);

        assert!(plain.pointer_hit);
        assert_eq!(plain.last_pointer_hit, 1000.0);
        assert!(plain.vel.x > reference_b.vel.x);

        // Stale strikes do nothing
        let mut stale = blob(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 20.0);
        stale.pointer_hit = true;
        stale.last_pointer_hit = 0.0;
        let mut other = blob(Vec2::new(139.0, 100.0), Vec2::ZERO, 20.0);
        resolve_pair(&mut stale, &mut other, 1050.0, RESTITUTION, &mut stats);
        assert!(!other.pointer_hit);
    }

    #[test]
    fn test_pointer_hit_travels_down_a_chain() {
        let mut stats = CollisionStats::default();
        let mut bodies = vec![
            blob(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 20.0),
            blob(Vec2::new(139.0, 100.0), Vec2::ZERO, 20.0),
            blob(Vec2::new(178.0, 100.0), Vec2::ZERO, 20.0),
        ];
        bodies[0].pointer_hit = true;
        bodies[0].last_pointer_hit = 1000.0;

        resolve_all(&mut bodies, COLLISION_PASSES, 1050.0, RESTITUTION, &mut stats);

        for body in &bodies[1..] {
            assert!(body.pointer_hit);
            assert_eq!(body.last_pointer_hit, 1000.0);
        }
        assert!(bodies[2].vel.x > 0.0);

        // Same chain without a strike: nothing is inherited
        let mut calm = vec![
            blob(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 20.0),
            blob(Vec2::new(139.0, 100.0), Vec2::ZERO, 20.0),
            blob(Vec2::new(178.0, 100.0), Vec2::ZERO, 20.0),
        ];
        resolve_all(&mut calm, COLLISION_PASSES, 1050.0, RESTITUTION, &mut stats);
        assert!(calm.iter().all(|b| !b.pointer_hit));
    }

    #[test]
    fn test_resolve_all_clears_and_marks() {
        let mut stats = CollisionStats::default();
        let mut bodies = vec![
            blob(Vec2::new(100.0, 100.0), Vec2::new(0.5, 0.0), 20.0),
            blob(Vec2::new(130.0, 100.0), Vec2::new(-0.5, 0.0), 20.0),
            blob(Vec2::new(400.0, 400.0), Vec2::new(0.5, 0.0), 20.0),
        ];
        bodies[2].collided = true;
        resolve_all(&mut bodies, COLLISION_PASSES, 0.0, RESTITUTION, &mut stats);
        assert!(bodies[0].collided && bodies[1].collided);
        assert!(!bodies[2].collided);
        assert_eq!(stats.checks, u64::from(3 * COLLISION_PASSES));
        assert!(bodies[0].pos.distance(bodies[1].pos) >= 40.0 - 1e-3);
    }

    proptest! {
        #[test]
        fn prop_resolution_never_deepens_overlap(
            ax in 0.0f32..200.0, ay in 0.0f32..200.0,
            bx in 0.0f32..200.0, by in 0.0f32..200.0,
            avx in -1.6f32..1.6, avy in -1.6f32..1.6,
            bvx in -1.6f32..1.6, bvy in -1.6f32..1.6,
            ra in 16.0f32..40.0, rb in 16.0f32..40.0,
        ) {
            let mut stats = CollisionStats::default();
            let mut a = blob(Vec2::new(ax, ay), Vec2::new(avx, avy), ra);
            let mut b = blob(Vec2::new(bx, by), Vec2::new(bvx, bvy), rb);
            let before = a.pos.distance(b.pos);
            resolve_pair(&mut a, &mut b, 0.0, RESTITUTION, &mut stats);
            let after = a.pos.distance(b.pos);
            prop_assert!(after >= before - 1e-3);
            prop_assert!(a.deform.abs().max_element() <= MAX_DEFORM);
            prop_assert!(b.deform.abs().max_element() <= MAX_DEFORM);
        }
    }
}
