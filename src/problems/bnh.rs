//! Binh–Korn constrained two-objective problem.

use super::linspace;
use crate::amosa::{AmosaProblem, Evaluation, Variable};
use crate::error::BoxError;

/// BNH: minimize
///
/// - `f1 = 4 x0^2 + 4 x1^2`
/// - `f2 = (x0 - 5)^2 + (x1 - 5)^2`
///
/// subject to
///
/// - `(x0 - 5)^2 + x1^2 - 25 <= 0`
/// - `7.7 - (x0 - 5)^2 - (x1 + 3)^2 <= 0`
///
/// with `x0` in `[0, 5]` and `x1` in `[0, 3]`.
#[derive(Debug, Clone)]
pub struct Bnh {
    vars: Vec<Variable>,
}

impl Bnh {
    /// BNH with its standard bounds.
    pub fn new() -> Self {
        Self {
            vars: vec![Variable::real(0.0, 5.0), Variable::real(0.0, 3.0)],
        }
    }

    fn evaluation(x: &[f64]) -> Evaluation {
        let (a, b) = (x[0], x[1]);
        let f1 = 4.0 * a * a + 4.0 * b * b;
        let f2 = (a - 5.0).powi(2) + (b - 5.0).powi(2);
        let g1 = (a - 5.0).powi(2) + b * b - 25.0;
        let g2 = 7.7 - (a - 5.0).powi(2) - (b + 3.0).powi(2);
        Evaluation::new(vec![f1, f2], vec![g1, g2])
    }

    /// About `points` samples of the Pareto-optimal set: `x0 = x1` on
    /// `[0, 3]`, then `x1 = 3` on `[3, 5]`.
    pub fn reference_set(&self, points: usize) -> Vec<Vec<f64>> {
        let half = points / 2;
        linspace(0.0, 3.0, half)
            .map(|t| vec![t, t])
            .chain(linspace(3.0, 5.0, points - half).map(|t| vec![t, 3.0]))
            .collect()
    }

    /// Objective vectors of [`reference_set`](Self::reference_set).
    pub fn reference_front(&self, points: usize) -> Vec<Vec<f64>> {
        self.reference_set(points)
            .iter()
            .map(|x| Self::evaluation(x).objectives().to_vec())
            .collect()
    }
}

impl Default for Bnh {
    fn default() -> Self {
        Self::new()
    }
}

impl AmosaProblem for Bnh {
    fn variables(&self) -> &[Variable] {
        &self.vars
    }

    fn num_objectives(&self) -> usize {
        2
    }

    fn num_constraints(&self) -> usize {
        2
    }

    fn evaluate(&self, x: &[f64]) -> Result<Evaluation, BoxError> {
        Ok(Self::evaluation(x))
    }
}
