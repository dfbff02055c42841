//! Benchmark problems from the multi-objective literature.
//!
//! Ready-made [`AmosaProblem`](crate::amosa::AmosaProblem) implementations
//! with known Pareto fronts, used to exercise and benchmark the optimizer.
//!
//! - [`Zdt1`]: convex front, real variables in `[0, 1]`
//! - [`Zdt4`]: convex front with many local fronts (multimodal)
//! - [`Zdt6`]: non-convex, non-uniformly spaced front
//! - [`Bnh`]: two variables, two inequality constraints
//!
//! Each problem can sample its Pareto-optimal set and front for comparison
//! with a run's result.
//!
//! # References
//!
//! - Zitzler, Deb & Thiele (2000), "Comparison of Multiobjective
//!   Evolutionary Algorithms: Empirical Results"
//! - Binh & Korn (1997), "MOBES: A Multiobjective Evolution Strategy for
//!   Constrained Optimization Problems"

mod bnh;
mod zdt;

pub use bnh::Bnh;
pub use zdt::{Zdt1, Zdt4, Zdt6};

/// `points` evenly spaced values from `lo` to `hi` inclusive.
pub(crate) fn linspace(lo: f64, hi: f64, points: usize) -> impl Iterator<Item = f64> {
    let step = if points > 1 {
        (hi - lo) / (points - 1) as f64
    } else {
        0.0
    };
    (0..points).map(move |i| lo + step * i as f64)
}
