//! Core types: decision variables, evaluations, solutions, and the problem trait.

use crate::error::{BoxError, Error, Result};

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Kind of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VarType {
    /// Continuous value in `[lower, upper]`.
    Real,
    /// Integral value in `[lower, upper]`.
    Integer,
    /// Either 0 or 1.
    Binary,
}

/// A bounded decision variable.
///
/// Values are stored as `f64` regardless of the type; integer and binary
/// variables only ever hold integral values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    /// Variable type.
    pub kind: VarType,
    /// Inclusive lower bound.
    pub lower: f64,
    /// Inclusive upper bound.
    pub upper: f64,
}

impl Variable {
    /// A continuous variable in `[lower, upper]`.
    pub fn real(lower: f64, upper: f64) -> Self {
        Self {
            kind: VarType::Real,
            lower,
            upper,
        }
    }

    /// An integer variable in `[lower, upper]`.
    pub fn integer(lower: i64, upper: i64) -> Self {
        Self {
            kind: VarType::Integer,
            lower: lower as f64,
            upper: upper as f64,
        }
    }

    /// A binary variable.
    pub fn binary() -> Self {
        Self {
            kind: VarType::Binary,
            lower: 0.0,
            upper: 1.0,
        }
    }

    /// Whether the bounds leave a single admissible value.
    pub fn is_fixed(&self) -> bool {
        self.lower >= self.upper
    }

    /// Projects `value` into the admissible set of this variable.
    pub fn clamp(&self, value: f64) -> f64 {
        let v = value.clamp(self.lower, self.upper);
        match self.kind {
            VarType::Real => v,
            VarType::Integer | VarType::Binary => v.round().clamp(self.lower, self.upper),
        }
    }

    /// Whether `value` lies within the bounds and matches the type.
    pub fn contains(&self, value: f64) -> bool {
        let in_range = value >= self.lower && value <= self.upper;
        match self.kind {
            VarType::Real => in_range,
            VarType::Integer | VarType::Binary => in_range && value.fract() == 0.0,
        }
    }

    fn check(&self, index: usize) -> Result<()> {
        let invalid = |reason| Error::InvalidBounds {
            index,
            lower: self.lower,
            upper: self.upper,
            reason,
        };
        if !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(invalid("bounds must be finite"));
        }
        if self.lower > self.upper {
            return Err(invalid("lower bound exceeds upper bound"));
        }
        if !(self.upper - self.lower).is_finite() {
            return Err(invalid("bound span must be finite"));
        }
        match self.kind {
            VarType::Real => {}
            VarType::Integer => {
                if self.lower.fract() != 0.0 || self.upper.fract() != 0.0 {
                    return Err(invalid("integer bounds must be integral"));
                }
                if self.lower.abs() > MAX_EXACT_INTEGER || self.upper.abs() > MAX_EXACT_INTEGER {
                    return Err(invalid("integer bounds must lie within +/-2^53"));
                }
            }
            VarType::Binary => {
                if self.lower != 0.0 || self.upper != 1.0 {
                    return Err(invalid("binary bounds must be [0, 1]"));
                }
            }
        }
        Ok(())
    }
}

/// Objective and constraint values of one decision vector.
///
/// Constraints follow the `g(x) <= 0` convention: positive values are
/// violations. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    objectives: Vec<f64>,
    constraints: Vec<f64>,
    violation: f64,
}

impl Evaluation {
    /// Builds an evaluation and computes its total violation.
    pub fn new(objectives: Vec<f64>, constraints: Vec<f64>) -> Self {
        let violation = constraints.iter().map(|&g| g.max(0.0)).sum();
        Self {
            objectives,
            constraints,
            violation,
        }
    }

    /// Builds an evaluation for a problem without constraints.
    pub fn unconstrained(objectives: Vec<f64>) -> Self {
        Self::new(objectives, Vec::new())
    }

    /// Objective values (minimized).
    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    /// Constraint values.
    pub fn constraints(&self) -> &[f64] {
        &self.constraints
    }

    /// Sum of the positive parts of the constraint values.
    pub fn violation_total(&self) -> f64 {
        self.violation
    }

    /// Whether no constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.violation == 0.0
    }

    fn check(&self, num_objectives: usize, num_constraints: usize) -> Result<()> {
        if self.objectives.len() != num_objectives {
            return Err(Error::ObjectiveCountMismatch {
                expected: num_objectives,
                got: self.objectives.len(),
            });
        }
        if self.constraints.len() != num_constraints {
            return Err(Error::ConstraintCountMismatch {
                expected: num_constraints,
                got: self.constraints.len(),
            });
        }
        if let Some(index) = self.objectives.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteEvaluation {
                field: "objectives",
                index,
            });
        }
        if let Some(index) = self.constraints.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteEvaluation {
                field: "constraints",
                index,
            });
        }
        Ok(())
    }
}

/// A decision vector paired with its evaluation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    x: Vec<f64>,
    evaluation: Evaluation,
}

impl Solution {
    /// Pairs a decision vector with an evaluation computed for it.
    pub fn new(x: Vec<f64>, evaluation: Evaluation) -> Self {
        Self { x, evaluation }
    }

    /// The decision vector.
    pub fn variables(&self) -> &[f64] {
        &self.x
    }

    /// The cached evaluation.
    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    /// Objective values.
    pub fn objectives(&self) -> &[f64] {
        self.evaluation.objectives()
    }

    /// Constraint values.
    pub fn constraints(&self) -> &[f64] {
        self.evaluation.constraints()
    }

    /// Total constraint violation.
    pub fn violation_total(&self) -> f64 {
        self.evaluation.violation_total()
    }

    /// Whether no constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.evaluation.is_feasible()
    }
}

/// Defines a multi-objective optimization problem for AMOSA.
///
/// The user declares the decision variables, the number of objectives and
/// constraints, and implements evaluation. All objectives are minimized;
/// a constraint value `g <= 0` is satisfied.
///
/// # Examples
///
/// ```
/// use u_amosa::amosa::{AmosaProblem, Evaluation, Variable};
/// use u_amosa::error::BoxError;
///
/// struct Schaffer {
///     vars: Vec<Variable>,
/// }
///
/// impl AmosaProblem for Schaffer {
///     fn variables(&self) -> &[Variable] {
///         &self.vars
///     }
///
///     fn num_objectives(&self) -> usize {
///         2
///     }
///
///     fn evaluate(&self, x: &[f64]) -> Result<Evaluation, BoxError> {
///         Ok(Evaluation::unconstrained(vec![x[0] * x[0], (x[0] - 2.0).powi(2)]))
///     }
/// }
///
/// let problem = Schaffer { vars: vec![Variable::real(-10.0, 10.0)] };
/// assert_eq!(problem.num_constraints(), 0);
/// ```
///
/// # Thread Safety
///
/// `AmosaProblem` must be `Send + Sync` because batches of evaluations
/// may run in parallel with rayon (`parallel` feature).
pub trait AmosaProblem: Send + Sync {
    /// Decision variables with their types and bounds.
    fn variables(&self) -> &[Variable];

    /// Number of objectives (at least 1).
    fn num_objectives(&self) -> usize;

    /// Number of inequality constraints.
    fn num_constraints(&self) -> usize {
        0
    }

    /// Evaluates one decision vector.
    ///
    /// Must return exactly `num_objectives()` objective values and
    /// `num_constraints()` constraint values. Errors abort the run.
    fn evaluate(&self, x: &[f64]) -> std::result::Result<Evaluation, BoxError>;
}

/// Checks the problem metadata before any evaluation.
pub(crate) fn validate_problem<P: AmosaProblem>(problem: &P) -> Result<()> {
    let vars = problem.variables();
    if vars.is_empty() {
        return Err(Error::NoVariables);
    }
    if problem.num_objectives() == 0 {
        return Err(Error::NoObjectives);
    }
    for (index, var) in vars.iter().enumerate() {
        var.check(index)?;
    }
    if vars.iter().all(Variable::is_fixed) {
        return Err(Error::NoFreeVariables);
    }
    Ok(())
}

/// Evaluates `x` and wraps it as a checked [`Solution`].
pub(crate) fn evaluate<P: AmosaProblem>(problem: &P, x: Vec<f64>) -> Result<Solution> {
    let evaluation = problem.evaluate(&x).map_err(Error::Evaluation)?;
    evaluation.check(problem.num_objectives(), problem.num_constraints())?;
    Ok(Solution::new(x, evaluation))
}

/// Evaluates a batch of decision vectors, preserving input order.
///
/// With the `parallel` feature and `parallel == true` the batch is
/// dispatched to rayon. The first failing vector (in input order)
/// determines the returned error.
pub(crate) fn evaluate_batch<P: AmosaProblem>(
    problem: &P,
    batch: Vec<Vec<f64>>,
    parallel: bool,
) -> Result<Vec<Solution>> {
    if parallel {
        evaluate_parallel(problem, batch)
    } else {
        batch.into_iter().map(|x| evaluate(problem, x)).collect()
    }
}

#[cfg(feature = "parallel")]
fn evaluate_parallel<P: AmosaProblem>(problem: &P, batch: Vec<Vec<f64>>) -> Result<Vec<Solution>> {
    use rayon::prelude::*;

    let results: Vec<Result<Solution>> = batch
        .into_par_iter()
        .map(|x| evaluate(problem, x))
        .collect();
    results.into_iter().collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_parallel<P: AmosaProblem>(problem: &P, batch: Vec<Vec<f64>>) -> Result<Vec<Solution>> {
    batch.into_iter().map(|x| evaluate(problem, x)).collect()
}
