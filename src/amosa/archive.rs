//! Bounded archive of mutually non-dominated solutions.
//!
//! Members never constraint-dominate each other. Since a feasible solution
//! dominates every infeasible one, the archive is either entirely feasible
//! or (until the first feasible point turns up) entirely infeasible.
//!
//! When the archive grows past its soft limit it is truncated to its hard
//! limit by greedy agglomerative clustering: the closest pair of members is
//! found and one of the two is discarded, until the size fits.

use super::dominance::{constraint_dominates, normalized_distance, Ranges};
use super::types::Solution;
use rand::Rng;

/// The AMOSA archive.
#[derive(Debug, Clone)]
pub struct Archive {
    members: Vec<Solution>,
    hard_limit: usize,
    soft_limit: usize,
}

impl Archive {
    /// Creates an empty archive.
    ///
    /// `hard_limit <= soft_limit` is expected; the configuration validates it.
    pub fn new(hard_limit: usize, soft_limit: usize) -> Self {
        Self {
            members: Vec::new(),
            hard_limit,
            soft_limit,
        }
    }

    /// Post-prune size cap.
    pub fn hard_limit(&self) -> usize {
        self.hard_limit
    }

    /// Size above which [`prune_if_needed`](Self::prune_if_needed) prunes.
    pub fn soft_limit(&self) -> usize {
        self.soft_limit
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the archive holds no member.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[Solution] {
        &self.members
    }

    /// Iterates over members in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Solution> {
        self.members.iter()
    }

    /// Number of feasible members.
    pub fn feasible_count(&self) -> usize {
        self.members.iter().filter(|s| s.is_feasible()).count()
    }

    /// Whether the archive is non-empty and holds only feasible members.
    pub fn is_feasible(&self) -> bool {
        !self.members.is_empty() && self.members.iter().all(Solution::is_feasible)
    }

    /// Objective and violation ranges over the members and `extra`.
    pub fn objective_ranges<'a>(
        &'a self,
        extra: impl IntoIterator<Item = &'a Solution>,
        num_objectives: usize,
    ) -> Ranges {
        Ranges::from_solutions(self.members.iter().chain(extra), num_objectives)
    }

    /// Consumes the archive, returning its members.
    pub fn into_members(self) -> Vec<Solution> {
        self.members
    }

    /// Members that constraint-dominate `candidate`.
    pub fn dominating<'a>(&'a self, candidate: &'a Solution) -> impl Iterator<Item = &'a Solution> {
        self.members
            .iter()
            .filter(move |m| constraint_dominates(m, candidate))
    }

    /// Offers `candidate` to the archive.
    ///
    /// The candidate is rejected if a member constraint-dominates it or
    /// already holds the same decision vector. Otherwise every member it
    /// dominates is removed and the candidate is appended.
    ///
    /// Returns `true` if the candidate was added.
    pub fn try_insert(&mut self, candidate: Solution) -> bool {
        let rejected = self.members.iter().any(|m| {
            m.variables() == candidate.variables() || constraint_dominates(m, &candidate)
        });
        if rejected {
            return false;
        }
        self.members.retain(|m| !constraint_dominates(&candidate, m));
        self.members.push(candidate);
        true
    }

    /// Truncates to the hard limit if the size exceeds the soft limit.
    ///
    /// Returns `true` if a truncation happened.
    pub fn prune_if_needed(&mut self) -> bool {
        if self.members.len() > self.soft_limit {
            self.prune_to(self.hard_limit);
            true
        } else {
            false
        }
    }

    /// Truncates the archive to at most `limit` members.
    ///
    /// Distances are Euclidean over objectives normalized by the archive's
    /// per-objective range (feasible archive) or over the normalized total
    /// violation (otherwise). Each step removes one member of the closest
    /// pair: the one with the larger summed distance to the other surviving
    /// members, or the later-inserted one on a tie.
    ///
    /// O(k²) per removal for an archive of size k.
    pub fn prune_to(&mut self, limit: usize) {
        let k = self.members.len();
        if k <= limit {
            return;
        }

        let (points, scale) = self.clustering_space();
        let mut dist = vec![vec![0.0f64; k]; k];
        for i in 0..k {
            for j in (i + 1)..k {
                let d = normalized_distance(&points[i], &points[j], &scale);
                dist[i][j] = d;
                dist[j][i] = d;
            }
        }

        let mut alive = vec![true; k];
        let mut remaining = k;

        while remaining > limit {
            let mut closest: Option<(usize, usize)> = None;
            let mut closest_dist = f64::INFINITY;
            for i in (0..k).filter(|&i| alive[i]) {
                for j in ((i + 1)..k).filter(|&j| alive[j]) {
                    if closest.is_none() || dist[i][j] < closest_dist {
                        closest = Some((i, j));
                        closest_dist = dist[i][j];
                    }
                }
            }

            let discard = match closest {
                Some((i, j)) => {
                    let spread = |x: usize| -> f64 {
                        (0..k)
                            .filter(|&l| alive[l] && l != i && l != j)
                            .map(|l| dist[x][l])
                            .sum()
                    };
                    // j > i, so j is the later-inserted member.
                    if spread(i) > spread(j) {
                        i
                    } else {
                        j
                    }
                }
                // A single survivor and a zero limit.
                None => match alive.iter().position(|&a| a) {
                    Some(only) => only,
                    None => break,
                },
            };

            alive[discard] = false;
            remaining -= 1;
        }

        let mut idx = 0;
        self.members.retain(|_| {
            let keep = alive[idx];
            idx += 1;
            keep
        });
    }

    /// A uniformly chosen member, or `None` if the archive is empty.
    pub fn random_member<R: Rng>(&self, rng: &mut R) -> Option<&Solution> {
        if self.members.is_empty() {
            None
        } else {
            self.members.get(rng.random_range(0..self.members.len()))
        }
    }

    /// Positions of the members in the space used for clustering, and the
    /// per-axis scale that normalizes them.
    fn clustering_space(&self) -> (Vec<Vec<f64>>, Vec<f64>) {
        let m = self.members.first().map_or(0, |s| s.objectives().len());
        let ranges = Ranges::from_solutions(self.members.iter(), m);

        if self.members.iter().all(Solution::is_feasible) {
            let points = self
                .members
                .iter()
                .map(|s| s.objectives().to_vec())
                .collect();
            (points, ranges.objectives)
        } else {
            let points = self
                .members
                .iter()
                .map(|s| vec![s.violation_total()])
                .collect();
            (points, vec![ranges.violation])
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amosa::dominance::dominates;
    use crate::amosa::Evaluation;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn sol(x: f64, f: &[f64]) -> Solution {
        Solution::new(vec![x], Evaluation::unconstrained(f.to_vec()))
    }

    fn infeasible(x: f64, g: f64) -> Solution {
        Solution::new(vec![x], Evaluation::new(vec![0.0, 0.0], vec![g]))
    }

    fn line_point(x: f64) -> Solution {
        sol(x, &[x, 1.0 - x])
    }

    #[test]
    fn test_insert_into_empty() {
        let mut a = Archive::new(5, 10);
        assert!(a.try_insert(sol(0.0, &[1.0, 1.0])));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_insert_rejects_dominated() {
        let mut a = Archive::new(5, 10);
        a.try_insert(sol(0.0, &[1.0, 1.0]));
        assert!(!a.try_insert(sol(1.0, &[2.0, 2.0])));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_insert_removes_dominated_members() {
        let mut a = Archive::new(5, 10);
        a.try_insert(sol(0.0, &[1.0, 3.0]));
        a.try_insert(sol(1.0, &[3.0, 1.0]));
        a.try_insert(sol(2.0, &[2.5, 2.5]));
        assert_eq!(a.len(), 3);

        assert!(a.try_insert(sol(3.0, &[0.5, 0.5])));
        assert_eq!(a.len(), 1);
        assert_eq!(a.members()[0].variables(), &[3.0]);
    }

    #[test]
    fn test_insert_rejects_duplicate_vector() {
        let mut a = Archive::new(5, 10);
        assert!(a.try_insert(sol(0.5, &[1.0, 1.0])));
        assert!(!a.try_insert(sol(0.5, &[1.0, 1.0])));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_feasible_evicts_infeasible() {
        let mut a = Archive::new(5, 10);
        a.try_insert(infeasible(0.0, 0.3));
        a.try_insert(infeasible(1.0, 0.3));
        assert_eq!(a.len(), 2);
        assert!(!a.is_feasible());

        a.try_insert(sol(2.0, &[9.0, 9.0]));
        assert_eq!(a.len(), 1);
        assert!(a.is_feasible());
        assert!(!a.try_insert(infeasible(3.0, 0.01)));
    }

    #[test]
    fn test_lower_violation_wins() {
        let mut a = Archive::new(5, 10);
        a.try_insert(infeasible(0.0, 0.5));
        a.try_insert(infeasible(1.0, 0.2));
        assert_eq!(a.len(), 1);
        assert!((a.members()[0].violation_total() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_prune_if_needed_respects_limits() {
        let mut a = Archive::new(4, 8);
        for i in 0..8 {
            a.try_insert(line_point(i as f64 / 7.0));
        }
        assert!(!a.prune_if_needed());
        assert_eq!(a.len(), 8);

        a.try_insert(line_point(0.55));
        assert_eq!(a.len(), 9);
        assert!(a.prune_if_needed());
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn test_prune_removes_one_of_closest_pair() {
        let mut a = Archive::new(3, 3);
        a.try_insert(line_point(0.0));
        a.try_insert(line_point(0.5));
        a.try_insert(line_point(0.51));
        a.try_insert(line_point(1.0));
        a.prune_to(3);
        let xs: Vec<f64> = a.iter().map(|s| s.variables()[0]).collect();
        assert_eq!(xs.len(), 3);
        assert!(xs.contains(&0.0));
        assert!(xs.contains(&1.0));
        assert!(xs.contains(&0.5) ^ xs.contains(&0.51));
    }

    #[test]
    fn test_prune_tie_discards_later_inserted() {
        // Two distinct vectors mapping to the same objectives form a
        // zero-distance pair with identical spread.
        let mut a = Archive::new(2, 2);
        a.try_insert(line_point(0.0));
        a.try_insert(line_point(1.0));
        a.try_insert(sol(0.5, &[0.5, 0.5]));
        a.try_insert(sol(0.7, &[0.5, 0.5]));
        assert_eq!(a.len(), 4);
        a.prune_to(3);
        let xs: Vec<f64> = a.iter().map(|s| s.variables()[0]).collect();
        assert_eq!(xs, vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_prune_infeasible_uses_violation() {
        let mut a = Archive::new(2, 2);
        // Equal violations are incomparable, so all three stay.
        for (i, g) in [0.3, 0.3, 0.3].iter().enumerate() {
            a.try_insert(infeasible(i as f64, *g));
        }
        assert_eq!(a.len(), 3);
        a.prune_to(2);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_prune_to_zero() {
        let mut a = Archive::new(1, 1);
        a.try_insert(line_point(0.2));
        a.try_insert(line_point(0.8));
        a.prune_to(0);
        assert!(a.is_empty());
    }

    #[test]
    fn test_objective_ranges_include_extra() {
        let mut a = Archive::new(5, 10);
        a.try_insert(sol(0.0, &[0.0, 1.0]));
        a.try_insert(sol(1.0, &[1.0, 0.0]));
        assert_eq!(a.objective_ranges([], 2).objectives, vec![1.0, 1.0]);

        let far = sol(2.0, &[4.0, 4.0]);
        let r = a.objective_ranges([&far], 2);
        assert_eq!(r.objectives, vec![4.0, 4.0]);
        assert_eq!(r.violation, 1.0);
    }

    #[test]
    fn test_random_member() {
        let mut rng = create_rng(3);
        let mut a = Archive::new(5, 10);
        assert!(a.random_member(&mut rng).is_none());
        a.try_insert(line_point(0.1));
        a.try_insert(line_point(0.9));
        let mut seen = [false; 2];
        for _ in 0..64 {
            let m = a.random_member(&mut rng).unwrap();
            if m.variables()[0] < 0.5 {
                seen[0] = true;
            } else {
                seen[1] = true;
            }
        }
        assert!(seen[0] && seen[1]);
    }

    fn build(entries: &[(u8, u8, u8)], order: &[usize]) -> Vec<Vec<f64>> {
        let mut a = Archive::new(1000, 1000);
        for &i in order {
            let (f0, f1, g) = entries[i];
            a.try_insert(Solution::new(
                vec![i as f64],
                Evaluation::new(vec![f0 as f64, f1 as f64], vec![g as f64]),
            ));
        }
        let mut xs: Vec<Vec<f64>> = a.iter().map(|s| s.variables().to_vec()).collect();
        xs.sort_by(|p, q| p[0].partial_cmp(&q[0]).unwrap());
        xs
    }

    proptest! {
        #[test]
        fn prop_insertion_order_invariant(
            (entries, order) in prop::collection::vec((0u8..6, 0u8..6, 0u8..3), 1..24)
                .prop_flat_map(|v| {
                    let n = v.len();
                    (Just(v), Just((0..n).collect::<Vec<usize>>()).prop_shuffle())
                })
        ) {
            let identity: Vec<usize> = (0..entries.len()).collect();
            prop_assert_eq!(build(&entries, &identity), build(&entries, &order));
        }

        #[test]
        fn prop_archive_mutually_non_dominated(
            points in prop::collection::vec((0.0f64..1.0, 0.0f64..1.0), 1..40)
        ) {
            let mut a = Archive::new(1000, 1000);
            for (i, (f0, f1)) in points.iter().enumerate() {
                a.try_insert(sol(i as f64, &[*f0, *f1]));
            }
            for p in a.iter() {
                for q in a.iter() {
                    prop_assert!(!dominates(p, q));
                }
            }
        }

        #[test]
        fn prop_prune_respects_hard_limit(
            xs in prop::collection::vec(0.0f64..1.0, 1..60),
            hard in 1usize..10,
        ) {
            let mut a = Archive::new(hard, hard);
            for x in xs {
                a.try_insert(line_point(x));
            }
            a.prune_if_needed();
            prop_assert!(a.len() <= hard);
        }
    }
}
