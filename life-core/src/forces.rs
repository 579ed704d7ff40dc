//! Pairwise force model: short-range collision repulsion plus the
//! longer-range directional type-pair attraction.

use crate::config::{DIST_EPSILON, SimConfig};
use crate::grid::SpatialGrid;
use crate::rules::TypeRuleTable;
use crate::store::ParticleStore;

/// Turns every qualifying neighbor pair into velocity impulses on the two
/// involved particles.
///
/// For each pair `(i, j)` reported by the grid, with
/// `(dx, dy) = position(j) - position(i)` and
/// `d2 = dx² + dy² + DIST_EPSILON`:
///
/// - **Repulsion** — when `d2` is inside the collision threshold
///   `(2 · particle_radius)²`, both particles are pushed apart with
///   magnitude `repel / d2`. This impulse is exactly equal and opposite.
/// - **Attraction** — applied to every pair regardless of whether the
///   repulsion fired (the two effects trigger independently). The base
///   magnitude `attraction / d2` is scaled by the directional coefficient
///   for each side: `i` gains `base · c[type(i)][type(j)]` along
///   `(dx, dy)`, `j` gains `base · c[type(j)][type(i)]` along
///   `(-dx, -dy)`. Because the coefficient matrix need not be symmetric,
///   the two impulses can differ in magnitude and even in sign — that
///   asymmetry is the defining particle-life behavior.
///
/// The only writes are additive updates to the velocity columns of the two
/// particles in each pair.
pub fn interaction_phase(
    store: &mut ParticleStore,
    grid: &SpatialGrid,
    rules: &TypeRuleTable,
    cfg: &SimConfig,
) {
    let collision_dist_sq = 4.0 * cfg.particle_radius * cfg.particle_radius;
    let attraction = cfg.attraction;
    let repel = cfg.repel;

    let ParticleStore {
        px,
        py,
        vx,
        vy,
        types,
        ..
    } = store;

    grid.for_each_neighbor_pair(px, py, |i, j, dx, dy| {
        let d2 = dx * dx + dy * dy + DIST_EPSILON;

        if d2 < collision_dist_sq {
            let f = repel / d2;
            vx[i] -= dx * f;
            vy[i] -= dy * f;
            vx[j] += dx * f;
            vy[j] += dy * f;
        }

        let base = attraction / d2;
        let fi = base * rules.coefficient(types[i], types[j]);
        let fj = base * rules.coefficient(types[j], types[i]);

        vx[i] += dx * fi;
        vy[i] += dy * fi;
        vx[j] -= dx * fj;
        vy[j] -= dy * fj;
    });
}
