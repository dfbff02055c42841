//! Error type shared by configuration, problem validation, and the runner.

/// Boxed error produced by a user problem's `evaluate`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors reported by the AMOSA engine.
///
/// Everything except [`Error::Evaluation`] and [`Error::Io`] is a
/// configuration error and is raised before the first annealing step.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Returned when the problem declares no decision variables.
    #[error("problem must declare at least one decision variable")]
    NoVariables,

    /// Returned when the problem declares no objectives.
    #[error("problem must declare at least one objective")]
    NoObjectives,

    /// Returned when every variable has `lower == upper`.
    #[error("problem has no free variable: every lower bound equals its upper bound")]
    NoFreeVariables,

    /// Returned when a variable's bounds are unusable for its type.
    #[error("invalid bounds for variable {index}: [{lower}, {upper}] ({reason})")]
    InvalidBounds {
        /// Index of the offending variable.
        index: usize,
        /// Declared lower bound.
        lower: f64,
        /// Declared upper bound.
        upper: f64,
        /// What is wrong with the bounds.
        reason: &'static str,
    },

    /// Returned when `evaluate` yields the wrong number of objectives.
    #[error("objective count mismatch: expected {expected} values, got {got}")]
    ObjectiveCountMismatch {
        /// Declared number of objectives.
        expected: usize,
        /// Number of objectives actually returned.
        got: usize,
    },

    /// Returned when `evaluate` yields the wrong number of constraints.
    #[error("constraint count mismatch: expected {expected} values, got {got}")]
    ConstraintCountMismatch {
        /// Declared number of constraints.
        expected: usize,
        /// Number of constraints actually returned.
        got: usize,
    },

    /// Returned when `evaluate` yields a NaN or infinite value.
    #[error("evaluation returned a non-finite value in {field}[{index}]")]
    NonFiniteEvaluation {
        /// Either `"objectives"` or `"constraints"`.
        field: &'static str,
        /// Position of the offending value.
        index: usize,
    },

    /// The problem's `evaluate` failed; the run is aborted.
    #[error("problem evaluation failed")]
    Evaluation(#[source] BoxError),

    /// Writing results failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_evaluation_error_keeps_source() {
        let cause: BoxError = "solver diverged".into();
        let err = Error::Evaluation(cause);
        assert_eq!(err.to_string(), "problem evaluation failed");
        assert_eq!(
            err.source().map(|s| s.to_string()).as_deref(),
            Some("solver diverged")
        );
    }

    #[test]
    fn test_count_mismatch_message() {
        let err = Error::ObjectiveCountMismatch {
            expected: 2,
            got: 3,
        };
        assert_eq!(
            err.to_string(),
            "objective count mismatch: expected 2 values, got 3"
        );
    }
}
