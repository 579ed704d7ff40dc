/// Index of a particle in a [`crate::store::ParticleStore`].
///
/// This is an index into the parallel position/velocity/type arrays, and
/// is only meaningful within the lifetime of a given store instance.
pub type ParticleIndex = usize;

/// Tag selecting a row of a [`crate::rules::TypeRuleTable`].
///
/// Fixed at particle creation; valid values are
/// `0..TypeRuleTable::type_count()`.
pub type ParticleType = usize;
