use crate::types::ParticleType;
use std::fmt;

/// One row of the rule table: the display hue for a particle type and the
/// force coefficients every other type exerts on it.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeRule {
    /// Display hue in degrees, `0..360`.
    pub hue: f32,
    /// `coefficients[t]` scales the force exerted ON this row's type BY a
    /// particle of type `t`. Positive attracts, negative repels.
    pub coefficients: Vec<f32>,
}

impl TypeRule {
    pub fn new(hue: f32, coefficients: Vec<f32>) -> Self {
        Self { hue, coefficients }
    }
}

/// Square table of directional force coefficients, one row per particle
/// type.
///
/// The matrix is not required to be symmetric: `coefficient(a, b)` may
/// differ from `coefficient(b, a)`, which is what produces the chasing and
/// orbiting behaviors characteristic of particle life.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeRuleTable {
    rows: Vec<TypeRule>,
}

impl TypeRuleTable {
    /// Builds a table from explicit rows, validating that it is square.
    ///
    /// ### Parameters
    /// - `rows` - One rule per type; each row must carry exactly
    ///   `rows.len()` coefficients.
    ///
    /// ### Returns
    /// The validated table, or a [`RuleError`] describing the first
    /// malformed row.
    pub fn from_rows(rows: Vec<TypeRule>) -> Result<Self, RuleError> {
        if rows.is_empty() {
            return Err(RuleError::Empty);
        }
        let expected = rows.len();
        for (row, rule) in rows.iter().enumerate() {
            if rule.coefficients.len() != expected {
                return Err(RuleError::NotSquare {
                    row,
                    expected,
                    got: rule.coefficients.len(),
                });
            }
        }
        Ok(Self { rows })
    }

    /// Number of particle types (= number of rows = row width).
    pub fn type_count(&self) -> usize {
        self.rows.len()
    }

    /// Directional coefficient for the force exerted ON type `on` BY type
    /// `by`.
    #[inline]
    pub fn coefficient(&self, on: ParticleType, by: ParticleType) -> f32 {
        self.rows[on].coefficients[by]
    }

    /// Display hue of the given type, in degrees.
    #[inline]
    pub fn hue(&self, t: ParticleType) -> f32 {
        self.rows[t].hue
    }
}

impl Default for TypeRuleTable {
    /// The stock five-type ruleset.
    fn default() -> Self {
        let rows = vec![
            TypeRule::new(0.0, vec![-0.5, 0.5, 0.1, 0.0, 0.0]),
            TypeRule::new(40.0, vec![-0.05, 0.5, -1.0, 0.0, 0.0]),
            TypeRule::new(180.0, vec![0.0, -1.0, 1.0, 0.0, 0.0]),
            TypeRule::new(200.0, vec![0.191, -0.027, 0.466, 0.945, 0.195]),
            TypeRule::new(340.0, vec![-0.639, -0.399, 0.971, 0.365, -0.035]),
        ];
        // The stock table is square by construction.
        Self { rows }
    }
}

/// Malformed rule-table definitions.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleError {
    /// A table needs at least one type.
    Empty,
    /// A row's coefficient count does not match the number of rows.
    NotSquare {
        row: usize,
        expected: usize,
        got: usize,
    },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::Empty => write!(f, "rule table must have at least one type"),
            RuleError::NotSquare { row, expected, got } => write!(
                f,
                "rule table row {row} has {got} coefficients, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for RuleError {}
