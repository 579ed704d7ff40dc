use crate::config::{Bounds, ConfigError};
use crate::types::{ParticleIndex, ParticleType};
use rand::Rng;

/// Flat, parallel particle arrays; the ground truth every other component
/// reads from or writes to.
///
/// All arrays are allocated once at the full capacity. The store never
/// frees or reorders entries: the population shrinks and grows only by
/// moving [`ParticleStore::active_count`], and indices at or beyond the
/// active count are inert and skipped by every pass.
#[derive(Debug)]
pub struct ParticleStore {
    /// Particle x positions, world coordinates.
    pub px: Vec<f32>,
    /// Particle y positions, world coordinates.
    pub py: Vec<f32>,
    /// Particle x velocities.
    pub vx: Vec<f32>,
    /// Particle y velocities.
    pub vy: Vec<f32>,
    /// Particle types; fixed at creation, never mutated.
    pub types: Vec<ParticleType>,
    /// Active prefix length; mutate only through
    /// [`ParticleStore::set_active_count`].
    pub(crate) active: usize,
}

impl ParticleStore {
    /// Creates a fully-populated store with random positions and types.
    ///
    /// Every slot up to `capacity` gets a position uniformly inside
    /// `bounds`, a zero velocity, and a type drawn from
    /// `0..type_count`, so later growth of the active count needs no
    /// re-spawning.
    ///
    /// ### Parameters
    /// - `capacity` - Total slots to allocate.
    /// - `active` - Initially active particle count, at most `capacity`.
    /// - `type_count` - Number of rows in the accompanying rule table.
    /// - `bounds` - Area to scatter particles over.
    /// - `rng` - Randomness source for positions and types.
    ///
    /// ### Returns
    /// The populated store, or an error when `active > capacity`.
    pub fn random_in_bounds(
        capacity: usize,
        active: usize,
        type_count: usize,
        bounds: &Bounds,
        rng: &mut impl Rng,
    ) -> Result<Self, ConfigError> {
        if active > capacity {
            return Err(ConfigError::ParticleCountExceedsCapacity {
                requested: active,
                capacity,
            });
        }

        let mut px = Vec::with_capacity(capacity);
        let mut py = Vec::with_capacity(capacity);
        let mut types = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            px.push(rng.random_range(0.0..bounds.width));
            py.push(rng.random_range(0.0..bounds.height));
            types.push(rng.random_range(0..type_count));
        }

        Ok(Self {
            px,
            py,
            vx: vec![0.0; capacity],
            vy: vec![0.0; capacity],
            types,
            active,
        })
    }

    /// Creates a store from explicit positions and types, all active.
    ///
    /// Rejects any type index outside `0..type_count` up front, so the
    /// simulation phases never have to range-check on the hot path.
    ///
    /// ### Parameters
    /// - `positions` - `(x, y)` pairs, one per particle.
    /// - `types` - One type per particle; must match `positions` in length.
    /// - `type_count` - Number of rows in the accompanying rule table.
    pub fn from_parts(
        positions: Vec<(f32, f32)>,
        types: Vec<ParticleType>,
        type_count: usize,
    ) -> Result<Self, ConfigError> {
        assert_eq!(positions.len(), types.len());

        for &t in &types {
            if t >= type_count {
                return Err(ConfigError::TypeOutOfRange {
                    index: t,
                    type_count,
                });
            }
        }

        let n = positions.len();
        let (px, py) = positions.into_iter().unzip();
        Ok(Self {
            px,
            py,
            vx: vec![0.0; n],
            vy: vec![0.0; n],
            types,
            active: n,
        })
    }

    /// Number of particles currently participating in the simulation.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Total allocated slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.px.len()
    }

    /// Moves the active count, keeping it within capacity.
    ///
    /// Growing re-exposes previously spawned (inert) particles with their
    /// last position, velocity, and type intact.
    pub fn set_active_count(&mut self, count: usize) -> Result<(), ConfigError> {
        if count > self.capacity() {
            return Err(ConfigError::ParticleCountExceedsCapacity {
                requested: count,
                capacity: self.capacity(),
            });
        }
        self.active = count;
        Ok(())
    }

    /// Squared speed of particle `i`; used by renderers to shade by motion.
    #[inline]
    pub fn speed_sq(&self, i: ParticleIndex) -> f32 {
        self.vx[i] * self.vx[i] + self.vy[i] * self.vy[i]
    }
}
