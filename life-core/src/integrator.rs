//! Per-frame state advancement: central gravity, damping, position
//! integration, and boundary reflection.

use crate::config::{Bounds, DIST_EPSILON, SimConfig};
use crate::store::ParticleStore;

/// Advances every active particle by one unit time step.
///
/// Per particle, in order:
/// 1. **Central gravity** — the vector from the bounds center to the
///    particle is measured; when its squared length (plus epsilon) exceeds
///    `gravity_min_dist_sq`, the velocity gains
///    `-2 · central_gravity / d2 · (dx, dy)`, pulling inward (or pushing
///    outward for negative gravity). The threshold keeps the force
///    non-singular near the center.
/// 2. **Damping** — `v /= 1 + damping` per axis; an implicit-Euler style
///    decay, stable for any non-negative damping.
/// 3. **Integration** — `position += velocity` (one frame = one unit step,
///    no sub-stepping).
/// 4. **Reflection** — each axis independently: a coordinate at or past
///    `particle_radius` from either edge is clamped to the edge margin and
///    that velocity component negated. A particle in a corner can reflect
///    on both axes in the same step.
///
/// No allocation and no branching on particle type; given identical inputs
/// the result is fully deterministic.
pub fn integration_phase(store: &mut ParticleStore, cfg: &SimConfig, bounds: &Bounds) {
    let center = bounds.center();
    let damp = 1.0 + cfg.damping;
    let r = cfg.particle_radius;
    let max_x = bounds.width - r;
    let max_y = bounds.height - r;

    for i in 0..store.active_count() {
        let dx = store.px[i] - center.x;
        let dy = store.py[i] - center.y;
        let d2 = dx * dx + dy * dy + DIST_EPSILON;
        if d2 > cfg.gravity_min_dist_sq {
            let g = 2.0 * cfg.central_gravity / d2;
            store.vx[i] -= g * dx;
            store.vy[i] -= g * dy;
        }

        store.vx[i] /= damp;
        store.vy[i] /= damp;

        store.px[i] += store.vx[i];
        store.py[i] += store.vy[i];

        if store.px[i] <= r {
            store.px[i] = r;
            store.vx[i] = -store.vx[i];
        } else if store.px[i] >= max_x {
            store.px[i] = max_x;
            store.vx[i] = -store.vx[i];
        }

        if store.py[i] <= r {
            store.py[i] = r;
            store.vy[i] = -store.vy[i];
        } else if store.py[i] >= max_y {
            store.py[i] = max_y;
            store.vy[i] = -store.vy[i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_particle(x: f32, y: f32, vx: f32, vy: f32) -> ParticleStore {
        let mut store = ParticleStore::from_parts(vec![(x, y)], vec![0], 1).unwrap();
        store.vx[0] = vx;
        store.vy[0] = vy;
        store
    }

    fn frictionless() -> SimConfig {
        let mut cfg = SimConfig::default();
        cfg.damping = 0.0;
        cfg.central_gravity = 0.0;
        cfg
    }

    #[test]
    fn damping_strictly_shrinks_velocity_without_reaching_zero() {
        let bounds = Bounds::new(1000.0, 1000.0);
        let mut cfg = frictionless();
        cfg.damping = 0.5;

        let mut store = single_particle(500.0, 500.0, 3.0, -4.0);
        let mut prev = store.speed_sq(0);

        for _ in 0..50 {
            integration_phase(&mut store, &cfg, &bounds);
            let cur = store.speed_sq(0);
            assert!(cur < prev, "speed did not strictly decrease");
            assert!(cur > 0.0, "speed collapsed to zero");
            prev = cur;
        }
    }

    #[test]
    fn zero_damping_preserves_velocity() {
        let bounds = Bounds::new(1000.0, 1000.0);
        let cfg = frictionless();

        let mut store = single_particle(500.0, 500.0, 1.5, -0.5);
        integration_phase(&mut store, &cfg, &bounds);

        assert_eq!(store.vx[0], 1.5);
        assert_eq!(store.vy[0], -0.5);
        assert_eq!(store.px[0], 501.5);
        assert_eq!(store.py[0], 499.5);
    }

    #[test]
    fn reflection_flips_inbound_velocity_once() {
        let bounds = Bounds::new(1000.0, 1000.0);
        let cfg = frictionless();
        let r = cfg.particle_radius;

        // Exactly on the margin, moving into the wall.
        let mut store = single_particle(r, 500.0, -1.0, 0.0);
        integration_phase(&mut store, &cfg, &bounds);

        assert_eq!(store.px[0], r);
        assert_eq!(store.vx[0], 1.0, "reflection must preserve magnitude");

        // A second step moves away from the wall and must not re-flip.
        integration_phase(&mut store, &cfg, &bounds);
        assert_eq!(store.px[0], r + 1.0);
        assert_eq!(store.vx[0], 1.0);
    }

    #[test]
    fn corner_particle_reflects_on_both_axes_in_one_step() {
        let bounds = Bounds::new(1000.0, 1000.0);
        let cfg = frictionless();
        let r = cfg.particle_radius;

        let mut store = single_particle(r + 0.5, r + 0.5, -2.0, -2.0);
        integration_phase(&mut store, &cfg, &bounds);

        assert_eq!(store.px[0], r);
        assert_eq!(store.py[0], r);
        assert_eq!(store.vx[0], 2.0);
        assert_eq!(store.vy[0], 2.0);
    }

    #[test]
    fn upper_bound_reflects_symmetrically() {
        let bounds = Bounds::new(300.0, 300.0);
        let cfg = frictionless();
        let r = cfg.particle_radius;

        let mut store = single_particle(bounds.width - r - 0.5, 150.0, 3.0, 0.0);
        integration_phase(&mut store, &cfg, &bounds);

        assert_eq!(store.px[0], bounds.width - r);
        assert_eq!(store.vx[0], -3.0);
    }

    #[test]
    fn central_gravity_pulls_inward_beyond_the_threshold() {
        let bounds = Bounds::new(1000.0, 1000.0);
        let mut cfg = frictionless();
        cfg.central_gravity = 10.0;
        cfg.gravity_min_dist_sq = 20_000.0;

        // 200 units right of center: d2 = 40000 > threshold.
        let mut store = single_particle(700.0, 500.0, 0.0, 0.0);
        integration_phase(&mut store, &cfg, &bounds);

        let dx = 200.0f32;
        let d2 = dx * dx + 0.0 * 0.0 + DIST_EPSILON;
        let expected = -(2.0 * cfg.central_gravity / d2) * dx;
        assert_eq!(store.vx[0], expected);
        assert!(store.vx[0] < 0.0, "force must point toward the center");
        assert_eq!(store.vy[0], 0.0);
    }

    #[test]
    fn central_gravity_is_inactive_inside_the_threshold() {
        let bounds = Bounds::new(1000.0, 1000.0);
        let mut cfg = frictionless();
        cfg.central_gravity = 10.0;
        cfg.gravity_min_dist_sq = 20_000.0;

        // 100 units from center: d2 = 10000 < threshold.
        let mut store = single_particle(600.0, 500.0, 0.0, 0.0);
        integration_phase(&mut store, &cfg, &bounds);

        assert_eq!(store.vx[0], 0.0);
        assert_eq!(store.vy[0], 0.0);
    }

    #[test]
    fn negative_gravity_pushes_outward() {
        let bounds = Bounds::new(1000.0, 1000.0);
        let mut cfg = frictionless();
        cfg.central_gravity = -10.0;
        cfg.gravity_min_dist_sq = 20_000.0;

        let mut store = single_particle(700.0, 500.0, 0.0, 0.0);
        integration_phase(&mut store, &cfg, &bounds);

        assert!(store.vx[0] > 0.0, "negative gravity must push away");
    }

    #[test]
    fn inert_particles_are_not_advanced() {
        let bounds = Bounds::new(1000.0, 1000.0);
        let cfg = frictionless();

        let mut store =
            ParticleStore::from_parts(vec![(500.0, 500.0), (400.0, 400.0)], vec![0, 0], 1)
                .unwrap();
        store.vx[1] = 5.0;
        store.set_active_count(1).unwrap();

        integration_phase(&mut store, &cfg, &bounds);

        assert_eq!(store.px[1], 400.0, "inert particle moved");
    }
}
