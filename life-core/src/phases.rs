//! The per-frame simulation pipeline.
//!
//! One frame is:
//! 1. [`integrator::integration_phase`] — advance positions, damp, reflect.
//! 2. [`SpatialGrid::rebuild`] — re-index the moved particles.
//! 3. [`forces::interaction_phase`] — accumulate pairwise impulses for the
//!    next frame.
//!
//! Everything is single-threaded and synchronous: the driver calls
//! [`step`] once per rendered frame, it runs to completion, and there is
//! no in-flight state between frames beyond the store itself.

use crate::config::{Bounds, SimConfig};
use crate::forces;
use crate::grid::SpatialGrid;
use crate::integrator;
use crate::rules::TypeRuleTable;
use crate::store::ParticleStore;

/// Advances the simulation by one frame.
///
/// The grid is rebuilt with the config's current cell size, so cell-size
/// changes between frames take effect immediately.
///
/// ### Parameters
/// - `store` - Particle state; the single writer per frame.
/// - `grid` - Frame-local spatial index, rebuilt in place.
/// - `rules` - Directional force-coefficient table.
/// - `cfg` - Validated simulation parameters.
/// - `bounds` - Current simulation area.
pub fn step(
    store: &mut ParticleStore,
    grid: &mut SpatialGrid,
    rules: &TypeRuleTable,
    cfg: &SimConfig,
    bounds: &Bounds,
) {
    integrator::integration_phase(store, cfg, bounds);
    grid.rebuild(store, cfg.cell_size, bounds);
    forces::interaction_phase(store, grid, rules, cfg);
}
