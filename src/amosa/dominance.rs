//! Pareto and constraint dominance between evaluated solutions.
//!
//! All objectives are **minimized**. Constraint dominance ranks feasible
//! solutions above infeasible ones and infeasible solutions by their total
//! violation; among feasible solutions it reduces to Pareto dominance.

use super::types::Solution;

/// Outcome of comparing two solutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Pareto comparison of two objective vectors.
pub fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Whether `a` Pareto-dominates `b` on objectives alone.
///
/// `a` dominates `b` when it is no worse in every objective and strictly
/// better in at least one. Identical vectors do not dominate each other.
///
/// # Example
///
/// ```
/// use u_amosa::amosa::dominance::dominates;
/// use u_amosa::amosa::{Evaluation, Solution};
///
/// let a = Solution::new(vec![0.0], Evaluation::unconstrained(vec![1.0, 2.0]));
/// let b = Solution::new(vec![1.0], Evaluation::unconstrained(vec![1.0, 3.0]));
/// assert!(dominates(&a, &b));
/// assert!(!dominates(&b, &a));
/// assert!(!dominates(&a, &a));
/// ```
pub fn dominates(a: &Solution, b: &Solution) -> bool {
    dominance_cmp(a.objectives(), b.objectives()) == Dominance::Left
}

/// Whether `a` constraint-dominates `b`.
///
/// - both feasible: Pareto dominance on objectives
/// - exactly one feasible: the feasible one dominates
/// - both infeasible: strictly smaller total violation dominates
pub fn constraint_dominates(a: &Solution, b: &Solution) -> bool {
    match (a.is_feasible(), b.is_feasible()) {
        (true, true) => dominates(a, b),
        (true, false) => true,
        (false, true) => false,
        (false, false) => a.violation_total() < b.violation_total(),
    }
}

/// Classifies a pair under constraint dominance.
pub fn compare(a: &Solution, b: &Solution) -> Dominance {
    match (a.is_feasible(), b.is_feasible()) {
        (true, true) => dominance_cmp(a.objectives(), b.objectives()),
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        (false, false) => {
            let (va, vb) = (a.violation_total(), b.violation_total());
            if va < vb {
                Dominance::Left
            } else if vb < va {
                Dominance::Right
            } else {
                Dominance::Neither
            }
        }
    }
}

/// Normalization extents for energy computations.
///
/// `objectives[i]` is the range of objective `i` and `violation` the range
/// of total violation over some reference set of solutions. Degenerate
/// (zero) ranges are stored as 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranges {
    /// Per-objective range.
    pub objectives: Vec<f64>,
    /// Range of total violation.
    pub violation: f64,
}

impl Ranges {
    /// Computes ranges over the given solutions.
    ///
    /// Returns unit ranges for an empty input.
    pub fn from_solutions<'a, I>(solutions: I, num_objectives: usize) -> Self
    where
        I: IntoIterator<Item = &'a Solution>,
    {
        let mut lo = vec![f64::INFINITY; num_objectives];
        let mut hi = vec![f64::NEG_INFINITY; num_objectives];
        let mut v_lo = f64::INFINITY;
        let mut v_hi = f64::NEG_INFINITY;

        for s in solutions {
            for (i, &f) in s.objectives().iter().enumerate() {
                lo[i] = lo[i].min(f);
                hi[i] = hi[i].max(f);
            }
            v_lo = v_lo.min(s.violation_total());
            v_hi = v_hi.max(s.violation_total());
        }

        let objectives = lo
            .iter()
            .zip(hi.iter())
            .map(|(&l, &h)| non_degenerate(h - l))
            .collect();

        Self {
            objectives,
            violation: non_degenerate(v_hi - v_lo),
        }
    }
}

fn non_degenerate(range: f64) -> f64 {
    if range.is_finite() && range > 0.0 {
        range
    } else {
        1.0
    }
}

/// Amount by which two solutions differ, used as an energy gap.
///
/// For two feasible solutions this is the product of the normalized
/// absolute objective differences, taken over the objectives in which they
/// differ. Otherwise it is the normalized difference in total violation.
pub fn domination_amount(a: &Solution, b: &Solution, ranges: &Ranges) -> f64 {
    if a.is_feasible() && b.is_feasible() {
        let mut amount = 1.0;
        let mut differs = false;
        for ((&fa, &fb), &r) in a
            .objectives()
            .iter()
            .zip(b.objectives().iter())
            .zip(ranges.objectives.iter())
        {
            let d = (fa - fb).abs();
            if d > 0.0 {
                amount *= d / r;
                differs = true;
            }
        }
        if differs {
            amount
        } else {
            0.0
        }
    } else {
        (a.violation_total() - b.violation_total()).abs() / ranges.violation
    }
}

/// Normalized Euclidean distance between two objective vectors.
pub fn normalized_distance(a: &[f64], b: &[f64], ranges: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .zip(ranges.iter())
        .map(|((&x, &y), &r)| {
            let d = (x - y) / r;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Annealing acceptance probability `1 / (1 + exp(delta / temperature))`.
///
/// Saturates to 0 when the exponent overflows.
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    let z = (delta / temperature).exp();
    if z.is_finite() {
        1.0 / (1.0 + z)
    } else {
        0.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amosa::Evaluation;
    use proptest::prelude::*;

    fn feasible(f: &[f64]) -> Solution {
        Solution::new(vec![0.0], Evaluation::unconstrained(f.to_vec()))
    }

    fn violating(f: &[f64], g: f64) -> Solution {
        Solution::new(vec![0.0], Evaluation::new(f.to_vec(), vec![g]))
    }

    #[test]
    fn test_dominates_basic() {
        let a = feasible(&[1.0, 1.0]);
        let b = feasible(&[2.0, 2.0]);
        let c = feasible(&[0.5, 3.0]);
        assert!(dominates(&a, &b));
        assert!(!dominates(&b, &a));
        assert!(!dominates(&a, &c));
        assert!(!dominates(&c, &a));
    }

    #[test]
    fn test_dominates_weak_in_one_objective() {
        let a = feasible(&[1.0, 2.0]);
        let b = feasible(&[1.0, 3.0]);
        assert!(dominates(&a, &b));
    }

    #[test]
    fn test_dominates_not_reflexive() {
        let a = feasible(&[1.0, 2.0]);
        assert!(!dominates(&a, &a));
        assert_eq!(compare(&a, &a), Dominance::Neither);
    }

    #[test]
    fn test_feasible_beats_infeasible() {
        let good = feasible(&[10.0, 10.0]);
        let bad = violating(&[0.0, 0.0], 0.1);
        assert!(constraint_dominates(&good, &bad));
        assert!(!constraint_dominates(&bad, &good));
        assert_eq!(compare(&bad, &good), Dominance::Right);
    }

    #[test]
    fn test_infeasible_ranked_by_violation() {
        let a = violating(&[5.0, 5.0], 0.2);
        let b = violating(&[0.0, 0.0], 0.7);
        let c = violating(&[9.0, 1.0], 0.2);
        assert!(constraint_dominates(&a, &b));
        assert!(!constraint_dominates(&b, &a));
        assert!(!constraint_dominates(&a, &c));
        assert!(!constraint_dominates(&c, &a));
        assert_eq!(compare(&a, &c), Dominance::Neither);
    }

    #[test]
    fn test_ranges_degenerate_is_one() {
        let sols = [feasible(&[1.0, 5.0]), feasible(&[3.0, 5.0])];
        let r = Ranges::from_solutions(sols.iter(), 2);
        assert_eq!(r.objectives, vec![2.0, 1.0]);
        assert_eq!(r.violation, 1.0);
    }

    #[test]
    fn test_domination_amount_feasible() {
        let a = feasible(&[1.0, 1.0]);
        let b = feasible(&[2.0, 3.0]);
        let r = Ranges {
            objectives: vec![2.0, 4.0],
            violation: 1.0,
        };
        assert!((domination_amount(&a, &b, &r) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_domination_amount_skips_equal_objectives() {
        let a = feasible(&[1.0, 1.0]);
        let b = feasible(&[1.0, 3.0]);
        let r = Ranges {
            objectives: vec![1.0, 4.0],
            violation: 1.0,
        };
        assert!((domination_amount(&a, &b, &r) - 0.5).abs() < 1e-12);
        assert_eq!(domination_amount(&a, &a, &r), 0.0);
    }

    #[test]
    fn test_domination_amount_infeasible_uses_violation() {
        let a = violating(&[0.0, 0.0], 0.5);
        let b = violating(&[0.0, 0.0], 1.5);
        let r = Ranges {
            objectives: vec![1.0, 1.0],
            violation: 2.0,
        };
        assert!((domination_amount(&a, &b, &r) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_acceptance_probability_shape() {
        assert!((acceptance_probability(0.0, 1.0) - 0.5).abs() < 1e-12);
        assert!(acceptance_probability(1.0, 1.0) < 0.5);
        assert!(acceptance_probability(-1.0, 1.0) > 0.5);
        // Colder means less acceptance of the same positive gap.
        assert!(acceptance_probability(1.0, 0.1) < acceptance_probability(1.0, 10.0));
        assert_eq!(acceptance_probability(1.0, 1e-300), 0.0);
    }

    #[test]
    fn test_normalized_distance() {
        let d = normalized_distance(&[0.0, 0.0], &[3.0, 8.0], &[1.0, 2.0]);
        assert!((d - 5.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_dominance_antisymmetric(
            a in prop::collection::vec(-10.0f64..10.0, 3),
            b in prop::collection::vec(-10.0f64..10.0, 3),
        ) {
            let (sa, sb) = (feasible(&a), feasible(&b));
            prop_assert!(!(dominates(&sa, &sb) && dominates(&sb, &sa)));
            prop_assert!(!dominates(&sa, &sa));
        }

        #[test]
        fn prop_constraint_dominance_antisymmetric(
            a in prop::collection::vec(-10.0f64..10.0, 2),
            b in prop::collection::vec(-10.0f64..10.0, 2),
            ga in -1.0f64..1.0,
            gb in -1.0f64..1.0,
        ) {
            let (sa, sb) = (violating(&a, ga), violating(&b, gb));
            prop_assert!(!(constraint_dominates(&sa, &sb) && constraint_dominates(&sb, &sa)));
            prop_assert!(!constraint_dominates(&sa, &sa));
            let expected = match (constraint_dominates(&sa, &sb), constraint_dominates(&sb, &sa)) {
                (true, false) => Dominance::Left,
                (false, true) => Dominance::Right,
                _ => Dominance::Neither,
            };
            prop_assert_eq!(compare(&sa, &sb), expected);
        }
    }
}
