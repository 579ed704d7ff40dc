use glam::Vec2;
use std::fmt;

/// Hard capacity of a simulation: the flat arrays are allocated once for
/// this many particles and the active count only moves within it.
pub const MAX_PARTICLE_COUNT: usize = 5000;

/// Added to every squared distance before dividing by it, so exact-zero
/// separations never produce an infinite force.
pub const DIST_EPSILON: f32 = 0.001;

/// Rectangular simulation area with its origin at `(0, 0)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Tunable simulation parameters.
///
/// All values are range-checked once at the configuration boundary via
/// [`SimConfig::validate`]; the per-frame phases assume a valid config and
/// never re-check.
///
/// `cell_size` doubles as the interaction cutoff: the grid only reports
/// pairs closer than one cell size, so growing the cell considers forces
/// between particles that are further apart, at a cost in pair count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimConfig {
    /// Number of active particles, at most [`MAX_PARTICLE_COUNT`].
    pub particle_count: usize,
    /// Particle radius; also the boundary-reflection margin.
    pub particle_radius: f32,
    /// Spatial grid cell size and pairwise interaction cutoff.
    pub cell_size: f32,
    /// Per-frame velocity drag; `v /= 1 + damping`.
    pub damping: f32,
    /// Scale of the directional type-pair attraction.
    pub attraction: f32,
    /// Scale of the short-range collision repulsion.
    pub repel: f32,
    /// Radial pull toward the bounds center (push outward when negative).
    pub central_gravity: f32,
    /// Squared distance from center below which central gravity is not
    /// applied, keeping the force non-singular near the center.
    pub gravity_min_dist_sq: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            particle_count: 400,
            particle_radius: 4.0,
            cell_size: 60.0,
            damping: 0.02,
            attraction: 2.0,
            repel: 2.0,
            central_gravity: 0.0,
            gravity_min_dist_sq: 20_000.0,
        }
    }
}

impl SimConfig {
    /// Checks every invariant the per-frame phases rely on.
    ///
    /// ### Returns
    /// `Ok(())` for a usable config, or the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count > MAX_PARTICLE_COUNT {
            return Err(ConfigError::ParticleCountExceedsCapacity {
                requested: self.particle_count,
                capacity: MAX_PARTICLE_COUNT,
            });
        }
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !(self.particle_radius > 0.0) {
            return Err(ConfigError::InvalidParticleRadius(self.particle_radius));
        }
        if self.damping < 0.0 {
            return Err(ConfigError::NegativeDamping(self.damping));
        }
        Ok(())
    }
}

/// Violations of the configuration invariants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Requested more particles than the store has room for.
    ParticleCountExceedsCapacity { requested: usize, capacity: usize },
    /// Cell size must be strictly positive (NaN is also rejected).
    InvalidCellSize(f32),
    /// Particle radius must be strictly positive.
    InvalidParticleRadius(f32),
    /// Damping must be non-negative.
    NegativeDamping(f32),
    /// A particle was created with a type index outside the rule table.
    TypeOutOfRange { index: usize, type_count: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParticleCountExceedsCapacity {
                requested,
                capacity,
            } => write!(
                f,
                "particle count {requested} exceeds capacity {capacity}"
            ),
            ConfigError::InvalidCellSize(v) => {
                write!(f, "cell size must be positive, got {v}")
            }
            ConfigError::InvalidParticleRadius(v) => {
                write!(f, "particle radius must be positive, got {v}")
            }
            ConfigError::NegativeDamping(v) => {
                write!(f, "damping must be non-negative, got {v}")
            }
            ConfigError::TypeOutOfRange { index, type_count } => write!(
                f,
                "particle type {index} is out of range for a {type_count}-type rule table"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
