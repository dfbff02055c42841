//! Zitzler–Deb–Thiele two-objective test problems.
//!
//! All three share the structure `f1 = f(x0)`, `f2 = g(x1..) * h(f1, g)`,
//! with `g = 1` on the Pareto-optimal set `x1.. = 0`.

use super::linspace;
use crate::amosa::{AmosaProblem, Evaluation, Variable};
use crate::error::BoxError;
use std::f64::consts::PI;

/// Pareto-optimal decision vectors `(t, 0, ..., 0)` for `t` in `[0, 1]`.
fn zero_tail_set(n: usize, points: usize) -> Vec<Vec<f64>> {
    linspace(0.0, 1.0, points)
        .map(|t| {
            let mut x = vec![0.0; n];
            x[0] = t;
            x
        })
        .collect()
}

/// ZDT1: convex front `f2 = 1 - sqrt(f1)`.
#[derive(Debug, Clone)]
pub struct Zdt1 {
    vars: Vec<Variable>,
}

impl Zdt1 {
    /// ZDT1 with `n` variables in `[0, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if `n < 2`.
    pub fn new(n: usize) -> Self {
        assert!(n >= 2, "ZDT1 needs at least 2 variables");
        Self {
            vars: vec![Variable::real(0.0, 1.0); n],
        }
    }

    fn objectives(&self, x: &[f64]) -> Vec<f64> {
        let n = x.len();
        let f1 = x[0];
        let g = 1.0 + 9.0 * x[1..].iter().sum::<f64>() / (n - 1) as f64;
        let h = 1.0 - (f1 / g).sqrt();
        vec![f1, g * h]
    }

    /// `points` samples of the Pareto-optimal set.
    pub fn reference_set(&self, points: usize) -> Vec<Vec<f64>> {
        zero_tail_set(self.vars.len(), points)
    }

    /// Objective vectors of [`reference_set`](Self::reference_set).
    pub fn reference_front(&self, points: usize) -> Vec<Vec<f64>> {
        self.reference_set(points)
            .iter()
            .map(|x| self.objectives(x))
            .collect()
    }
}

impl Default for Zdt1 {
    fn default() -> Self {
        Self::new(30)
    }
}

impl AmosaProblem for Zdt1 {
    fn variables(&self) -> &[Variable] {
        &self.vars
    }

    fn num_objectives(&self) -> usize {
        2
    }

    fn evaluate(&self, x: &[f64]) -> Result<Evaluation, BoxError> {
        Ok(Evaluation::unconstrained(self.objectives(x)))
    }
}

/// ZDT4: `f2 = 1 - sqrt(f1)` behind `21^(n-1)` local fronts.
#[derive(Debug, Clone)]
pub struct Zdt4 {
    vars: Vec<Variable>,
}

impl Zdt4 {
    /// ZDT4 with `x0` in `[0, 1]` and `n - 1` variables in `[-10, 10]`.
    ///
    /// # Panics
    ///
    /// Panics if `n < 2`.
    pub fn new(n: usize) -> Self {
        assert!(n >= 2, "ZDT4 needs at least 2 variables");
        let mut vars = vec![Variable::real(-10.0, 10.0); n];
        vars[0] = Variable::real(0.0, 1.0);
        Self { vars }
    }

    fn objectives(&self, x: &[f64]) -> Vec<f64> {
        let n = x.len();
        let f1 = x[0];
        let g = 1.0
            + 10.0 * (n - 1) as f64
            + x[1..]
                .iter()
                .map(|&xi| xi * xi - 10.0 * (4.0 * PI * xi).cos())
                .sum::<f64>();
        let h = 1.0 - (f1 / g).sqrt();
        vec![f1, g * h]
    }

    /// `points` samples of the Pareto-optimal set.
    pub fn reference_set(&self, points: usize) -> Vec<Vec<f64>> {
        zero_tail_set(self.vars.len(), points)
    }

    /// Objective vectors of [`reference_set`](Self::reference_set).
    pub fn reference_front(&self, points: usize) -> Vec<Vec<f64>> {
        self.reference_set(points)
            .iter()
            .map(|x| self.objectives(x))
            .collect()
    }
}

impl Default for Zdt4 {
    fn default() -> Self {
        Self::new(10)
    }
}

impl AmosaProblem for Zdt4 {
    fn variables(&self) -> &[Variable] {
        &self.vars
    }

    fn num_objectives(&self) -> usize {
        2
    }

    fn evaluate(&self, x: &[f64]) -> Result<Evaluation, BoxError> {
        Ok(Evaluation::unconstrained(self.objectives(x)))
    }
}

/// ZDT6: non-convex front `f2 = 1 - f1^2`, sparse near `f1 = 1`.
#[derive(Debug, Clone)]
pub struct Zdt6 {
    vars: Vec<Variable>,
}

impl Zdt6 {
    /// ZDT6 with `n` variables in `[0, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if `n < 2`.
    pub fn new(n: usize) -> Self {
        assert!(n >= 2, "ZDT6 needs at least 2 variables");
        Self {
            vars: vec![Variable::real(0.0, 1.0); n],
        }
    }

    fn objectives(&self, x: &[f64]) -> Vec<f64> {
        let n = x.len();
        let f1 = 1.0 - (-4.0 * x[0]).exp() * (6.0 * PI * x[0]).sin().powi(6);
        let g = 1.0 + 9.0 * (x[1..].iter().sum::<f64>() / (n - 1) as f64).powf(0.25);
        let h = 1.0 - (f1 / g).powi(2);
        vec![f1, g * h]
    }

    /// `points` samples of the Pareto-optimal set.
    pub fn reference_set(&self, points: usize) -> Vec<Vec<f64>> {
        zero_tail_set(self.vars.len(), points)
    }

    /// Objective vectors of [`reference_set`](Self::reference_set).
    pub fn reference_front(&self, points: usize) -> Vec<Vec<f64>> {
        self.reference_set(points)
            .iter()
            .map(|x| self.objectives(x))
            .collect()
    }
}

impl Default for Zdt6 {
    fn default() -> Self {
        Self::new(10)
    }
}

impl AmosaProblem for Zdt6 {
    fn variables(&self) -> &[Variable] {
        &self.vars
    }

    fn num_objectives(&self) -> usize {
        2
    }

    fn evaluate(&self, x: &[f64]) -> Result<Evaluation, BoxError> {
        Ok(Evaluation::unconstrained(self.objectives(x)))
    }
}
