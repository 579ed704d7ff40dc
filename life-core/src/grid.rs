use crate::config::Bounds;
use crate::store::ParticleStore;
use crate::types::ParticleIndex;

/// Sentinel for "no particle" in the cell-head and next-link arenas.
const EMPTY: i32 = -1;

/// Uniform spatial grid over the simulation bounds.
///
/// Each cell holds a singly-linked list of particle indices, stored as two
/// index arenas: `cell_head[cell]` is the first particle in that cell and
/// `next_in_cell[particle]` the next one, with `-1` terminating the
/// chain. The grid holds only these derived, frame-local links; it is
/// rebuilt from the [`ParticleStore`] every frame, never updated
/// incrementally (particles move every frame, so incremental maintenance
/// would add bookkeeping without reducing work).
///
/// The cell size doubles as the interaction cutoff: scanning the 3×3 block
/// of cells around a particle covers every other particle within one cell
/// size, so [`SpatialGrid::for_each_neighbor_pair`] reports exactly the
/// pairs closer than `cell_size`.
#[derive(Debug, Default)]
pub struct SpatialGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    cell_head: Vec<i32>,
    next_in_cell: Vec<i32>,
    /// How many particles the last rebuild indexed; pair iteration never
    /// runs past this even if the store grows afterwards.
    indexed: usize,
}

impl SpatialGrid {
    /// Creates an empty grid; call [`SpatialGrid::rebuild`] before
    /// querying pairs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the grid from scratch for the current particle positions.
    ///
    /// Grid dimensions are `ceil(width / cell_size)` by
    /// `ceil(height / cell_size)`, at least one cell each way. Both the
    /// cell size and the bounds may differ from the previous frame; the
    /// rebuild is always total, so no stale links survive.
    ///
    /// Particles are inserted in ascending index order, each prepended to
    /// its cell's list. Given identical inputs the resulting links are
    /// identical, so downstream pair iteration order is reproducible.
    ///
    /// ### Parameters
    /// - `store` - Particle positions; only the active range is indexed.
    /// - `cell_size` - Cell edge length; must be positive (validated at
    ///   the configuration boundary).
    /// - `bounds` - Current simulation area.
    pub fn rebuild(&mut self, store: &ParticleStore, cell_size: f32, bounds: &Bounds) {
        let cols = ((bounds.width / cell_size).ceil() as usize).max(1);
        let rows = ((bounds.height / cell_size).ceil() as usize).max(1);
        if cols != self.cols || rows != self.rows {
            log::debug!("spatial grid re-dimensioned to {cols}x{rows} cells");
        }

        self.cell_size = cell_size;
        self.cols = cols;
        self.rows = rows;

        self.cell_head.clear();
        self.cell_head.resize(cols * rows, EMPTY);

        self.indexed = store.active_count();
        self.next_in_cell.resize(self.indexed, EMPTY);

        for i in 0..self.indexed {
            let (cx, cy) = self.cell_coords(store.px[i], store.py[i]);
            let cell = cy * cols + cx;
            self.next_in_cell[i] = self.cell_head[cell];
            self.cell_head[cell] = i as i32;
        }
    }

    /// Visits every unordered pair of indexed particles closer than the
    /// cell size, exactly once per pair.
    ///
    /// For each particle `i` the 3×3 block of cells around its own cell is
    /// walked (rows and columns beyond the grid edge are skipped; there is
    /// no wraparound). Within the block, only particles `p > i` are
    /// considered, which is what makes each unordered pair unique — the
    /// tie-break is index order, not distance or type.
    ///
    /// ### Parameters
    /// - `px`, `py` - Position columns the grid was rebuilt from.
    /// - `visit` - Called as `visit(i, p, dx, dy)` with
    ///   `(dx, dy) = position(p) - position(i)` whenever
    ///   `dx² + dy² ≤ cell_size²`.
    pub fn for_each_neighbor_pair<F>(&self, px: &[f32], py: &[f32], mut visit: F)
    where
        F: FnMut(ParticleIndex, ParticleIndex, f32, f32),
    {
        if self.indexed == 0 {
            return;
        }

        let cutoff_sq = self.cell_size * self.cell_size;

        for i in 0..self.indexed {
            let (cx, cy) = self.cell_coords(px[i], py[i]);

            let gx_lo = cx.saturating_sub(1);
            let gx_hi = (cx + 1).min(self.cols - 1);
            let gy_lo = cy.saturating_sub(1);
            let gy_hi = (cy + 1).min(self.rows - 1);

            for gy in gy_lo..=gy_hi {
                for gx in gx_lo..=gx_hi {
                    let mut p = self.cell_head[gy * self.cols + gx];
                    while p != EMPTY {
                        let pu = p as usize;
                        if pu > i {
                            let dx = px[pu] - px[i];
                            let dy = py[pu] - py[i];
                            if dx * dx + dy * dy <= cutoff_sq {
                                visit(i, pu, dx, dy);
                            }
                        }
                        p = self.next_in_cell[pu];
                    }
                }
            }
        }
    }

    /// Integer cell coordinates for a position, clamped into the grid.
    ///
    /// The integrator keeps positions inside the bounds, but the exact
    /// upper edge would truncate to one past the last cell, and a bounds
    /// shrink can briefly leave particles outside; clamping keeps both
    /// cases in range.
    #[inline]
    fn cell_coords(&self, x: f32, y: f32) -> (usize, usize) {
        let cx = ((x / self.cell_size) as usize).min(self.cols - 1);
        let cy = ((y / self.cell_size) as usize).min(self.rows - 1);
        (cx, cy)
    }

    /// Grid width in cells (after the last rebuild).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Grid height in cells (after the last rebuild).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Cell-head arena; exposed for inspection and tests.
    pub fn cell_head(&self) -> &[i32] {
        &self.cell_head
    }

    /// Next-link arena; exposed for inspection and tests.
    pub fn next_in_cell(&self) -> &[i32] {
        &self.next_in_cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    fn random_store(n: usize, bounds: &Bounds, seed: u64) -> ParticleStore {
        let mut rng = StdRng::seed_from_u64(seed);
        let positions = (0..n)
            .map(|_| {
                (
                    rng.random_range(0.0..bounds.width),
                    rng.random_range(0.0..bounds.height),
                )
            })
            .collect();
        ParticleStore::from_parts(positions, vec![0; n], 1).unwrap()
    }

    fn grid_pairs(grid: &SpatialGrid, store: &ParticleStore) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        grid.for_each_neighbor_pair(&store.px, &store.py, |i, j, _dx, _dy| {
            pairs.push((i, j));
        });
        pairs
    }

    fn brute_force_pairs(store: &ParticleStore, cutoff: f32) -> BTreeSet<(usize, usize)> {
        let n = store.active_count();
        let mut pairs = BTreeSet::new();
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = store.px[j] - store.px[i];
                let dy = store.py[j] - store.py[i];
                if dx * dx + dy * dy <= cutoff * cutoff {
                    pairs.insert((i, j));
                }
            }
        }
        pairs
    }

    #[test]
    fn matches_brute_force_for_any_cell_size() {
        let bounds = Bounds::new(500.0, 400.0);
        let store = random_store(150, &bounds, 42);
        let mut grid = SpatialGrid::new();

        for cell_size in [25.0, 60.0, 130.0, 500.0] {
            grid.rebuild(&store, cell_size, &bounds);
            let from_grid: BTreeSet<_> = grid_pairs(&grid, &store).into_iter().collect();
            let expected = brute_force_pairs(&store, cell_size);
            assert_eq!(
                from_grid, expected,
                "pair sets diverge at cell size {cell_size}"
            );
        }
    }

    #[test]
    fn visits_each_pair_at_most_once_and_never_self() {
        let bounds = Bounds::new(300.0, 300.0);
        // Dense cluster: every particle within one cell of every other.
        let store = random_store(80, &Bounds::new(50.0, 50.0), 9);
        let mut grid = SpatialGrid::new();
        grid.rebuild(&store, 60.0, &bounds);

        let pairs = grid_pairs(&grid, &store);
        let unique: BTreeSet<_> = pairs.iter().copied().collect();
        assert_eq!(pairs.len(), unique.len(), "a pair was visited twice");
        for (i, j) in pairs {
            assert!(i < j, "pair ({i}, {j}) breaks the index-order tie-break");
        }
    }

    #[test]
    fn rebuild_is_deterministic() {
        let bounds = Bounds::new(400.0, 250.0);
        let store = random_store(120, &bounds, 3);

        let mut a = SpatialGrid::new();
        let mut b = SpatialGrid::new();
        a.rebuild(&store, 60.0, &bounds);
        b.rebuild(&store, 60.0, &bounds);

        assert_eq!(a.cell_head(), b.cell_head());
        assert_eq!(a.next_in_cell(), b.next_in_cell());

        // Rebuilding the same grid again must also reproduce the links.
        let head = a.cell_head().to_vec();
        let next = a.next_in_cell().to_vec();
        a.rebuild(&store, 60.0, &bounds);
        assert_eq!(a.cell_head(), &head[..]);
        assert_eq!(a.next_in_cell(), &next[..]);
    }

    #[test]
    fn tolerates_cell_size_changes_between_rebuilds() {
        let bounds = Bounds::new(600.0, 600.0);
        let store = random_store(60, &bounds, 11);
        let mut grid = SpatialGrid::new();

        grid.rebuild(&store, 200.0, &bounds);
        assert_eq!((grid.cols(), grid.rows()), (3, 3));

        grid.rebuild(&store, 30.0, &bounds);
        assert_eq!((grid.cols(), grid.rows()), (20, 20));

        let from_grid: BTreeSet<_> = grid_pairs(&grid, &store).into_iter().collect();
        assert_eq!(from_grid, brute_force_pairs(&store, 30.0));
    }

    #[test]
    fn clamps_positions_on_the_exact_upper_edge() {
        let bounds = Bounds::new(120.0, 120.0);
        // One particle exactly on the far corner, one nearby inside.
        let store = ParticleStore::from_parts(
            vec![(120.0, 120.0), (110.0, 110.0)],
            vec![0, 0],
            1,
        )
        .unwrap();
        let mut grid = SpatialGrid::new();
        grid.rebuild(&store, 60.0, &bounds);

        let pairs = grid_pairs(&grid, &store);
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn skips_inert_particles_beyond_the_active_count() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut store = ParticleStore::from_parts(
            vec![(10.0, 10.0), (12.0, 10.0), (14.0, 10.0)],
            vec![0, 0, 0],
            1,
        )
        .unwrap();
        store.set_active_count(2).unwrap();

        let mut grid = SpatialGrid::new();
        grid.rebuild(&store, 50.0, &bounds);

        let pairs = grid_pairs(&grid, &store);
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn empty_store_yields_no_pairs() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut store = ParticleStore::from_parts(vec![(5.0, 5.0)], vec![0], 1).unwrap();
        store.set_active_count(0).unwrap();

        let mut grid = SpatialGrid::new();
        grid.rebuild(&store, 50.0, &bounds);
        assert!(grid_pairs(&grid, &store).is_empty());

        // A never-rebuilt grid must also be safe to query.
        let fresh = SpatialGrid::new();
        assert!(grid_pairs(&fresh, &store).is_empty());
    }
}
