//! Core 2-D particle-life simulation library.
//!
//! Main components:
//! - [`store`] — flat particle arrays (positions, velocities, types).
//! - [`rules`] — per-type hues and the asymmetric force-coefficient matrix.
//! - [`grid`] — uniform spatial grid for near-neighbor pair queries.
//! - [`forces`] — pairwise repulsion and directional attraction.
//! - [`integrator`] — damping, central gravity, boundary reflection.
//! - [`phases`] — the per-frame pipeline composing the above.
//! - [`config`] — tunable simulation parameters and validation.
//! - [`types`] — shared type aliases.

pub mod config;
pub mod forces;
pub mod grid;
pub mod integrator;
pub mod phases;
pub mod rules;
pub mod store;
pub mod types;
