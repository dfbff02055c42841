//! Per-temperature front statistics and stagnation detection.
//!
//! After each temperature level the archive is summarized: its size and
//! feasibility, how far the ideal and nadir points moved, and `phi`, the
//! mean distance from the previous front to the current one. A front that
//! stops moving for a whole window of levels triggers early termination.

use super::archive::Archive;
use super::dominance::normalized_distance;
use std::collections::VecDeque;

/// Movement below this threshold counts as no movement.
const STAGNATION_EPSILON: f64 = 1e-12;

/// Snapshot of the archive after a temperature level.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrontSummary {
    /// Temperature at the time of the snapshot.
    pub temperature: f64,
    /// Evaluations performed so far.
    pub evaluations: usize,
    /// Archive size.
    pub archive_size: usize,
    /// Feasible archive members.
    pub feasible: usize,
    /// Smallest total violation among infeasible members (0 if none).
    pub violation_min: f64,
    /// Mean total violation among infeasible members (0 if none).
    pub violation_avg: f64,
    /// Largest relative improvement of the ideal point over objectives.
    ///
    /// Infinite for the first snapshot.
    pub ideal_shift: f64,
    /// Largest relative improvement of the nadir point over objectives.
    ///
    /// Infinite for the first snapshot.
    pub nadir_shift: f64,
    /// Mean distance from each previous front point to the closest current
    /// one, in the previous front's normalized objective space.
    pub phi: f64,
}

impl FrontSummary {
    /// Whether the front moved or improved since the previous snapshot.
    pub fn improved(&self) -> bool {
        self.phi > STAGNATION_EPSILON
            || self.ideal_shift > STAGNATION_EPSILON
            || self.nadir_shift > STAGNATION_EPSILON
    }
}

/// Tracks the front between snapshots.
#[derive(Debug, Default)]
pub(crate) struct FrontTracker {
    previous: Option<Snapshot>,
}

#[derive(Debug)]
struct Snapshot {
    ideal: Vec<f64>,
    nadir: Vec<f64>,
    front: Vec<Vec<f64>>,
}

impl FrontTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Summarizes `archive` and remembers it for the next call.
    pub(crate) fn observe(
        &mut self,
        archive: &Archive,
        temperature: f64,
        evaluations: usize,
    ) -> FrontSummary {
        let front: Vec<Vec<f64>> = archive.iter().map(|s| s.objectives().to_vec()).collect();
        let m = front.first().map_or(0, Vec::len);
        let ideal: Vec<f64> = (0..m)
            .map(|i| front.iter().map(|f| f[i]).fold(f64::INFINITY, f64::min))
            .collect();
        let nadir: Vec<f64> = (0..m)
            .map(|i| front.iter().map(|f| f[i]).fold(f64::NEG_INFINITY, f64::max))
            .collect();

        let violations: Vec<f64> = archive
            .iter()
            .filter(|s| !s.is_feasible())
            .map(|s| s.violation_total())
            .collect();
        let (violation_min, violation_avg) = if violations.is_empty() {
            (0.0, 0.0)
        } else {
            (
                violations.iter().copied().fold(f64::INFINITY, f64::min),
                violations.iter().sum::<f64>() / violations.len() as f64,
            )
        };

        let (ideal_shift, nadir_shift, phi) = match &self.previous {
            None => (f64::INFINITY, f64::INFINITY, 0.0),
            Some(prev) if front.is_empty() || prev.front.is_empty() => (0.0, 0.0, 0.0),
            Some(prev) => {
                let span: Vec<f64> = (0..m)
                    .map(|i| non_degenerate(prev.nadir[i] - ideal[i]))
                    .collect();
                let ideal_shift = (0..m)
                    .map(|i| (prev.ideal[i] - ideal[i]) / span[i])
                    .fold(f64::NEG_INFINITY, f64::max);
                let nadir_shift = (0..m)
                    .map(|i| (prev.nadir[i] - nadir[i]) / span[i])
                    .fold(f64::NEG_INFINITY, f64::max);

                let scale: Vec<f64> = (0..m)
                    .map(|i| non_degenerate(prev.nadir[i] - prev.ideal[i]))
                    .collect();
                let phi = prev
                    .front
                    .iter()
                    .map(|p| {
                        front
                            .iter()
                            .map(|q| normalized_distance(p, q, &scale))
                            .fold(f64::INFINITY, f64::min)
                    })
                    .sum::<f64>()
                    / prev.front.len() as f64;

                (ideal_shift, nadir_shift, phi)
            }
        };

        self.previous = Some(Snapshot {
            ideal,
            nadir,
            front,
        });

        FrontSummary {
            temperature,
            evaluations,
            archive_size: archive.len(),
            feasible: archive.feasible_count(),
            violation_min,
            violation_avg,
            ideal_shift,
            nadir_shift,
            phi,
        }
    }
}

fn non_degenerate(span: f64) -> f64 {
    if span > 0.0 {
        span
    } else {
        1.0
    }
}

/// Sliding window over the last `size` snapshots' improvement flags.
#[derive(Debug)]
pub(crate) struct StagnationWindow {
    size: usize,
    recent: VecDeque<bool>,
}

impl StagnationWindow {
    /// A window of `size` levels; 0 never reports stagnation.
    pub(crate) fn new(size: usize) -> Self {
        Self {
            size,
            recent: VecDeque::with_capacity(size),
        }
    }

    /// Records one level. Returns `true` once the window is full and no
    /// level in it improved.
    pub(crate) fn push(&mut self, improved: bool) -> bool {
        if self.size == 0 {
            return false;
        }
        if self.recent.len() == self.size {
            self.recent.pop_front();
        }
        self.recent.push_back(improved);
        self.recent.len() == self.size && self.recent.iter().all(|&i| !i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amosa::{Evaluation, Solution};

    fn archive_of(points: &[(f64, f64)]) -> Archive {
        let mut a = Archive::new(100, 100);
        for (i, &(f0, f1)) in points.iter().enumerate() {
            a.try_insert(Solution::new(
                vec![i as f64],
                Evaluation::unconstrained(vec![f0, f1]),
            ));
        }
        a
    }

    #[test]
    fn test_first_snapshot_counts_as_improvement() {
        let mut t = FrontTracker::new();
        let s = t.observe(&archive_of(&[(0.0, 1.0), (1.0, 0.0)]), 10.0, 5);
        assert!(s.ideal_shift.is_infinite());
        assert_eq!(s.phi, 0.0);
        assert!(s.improved());
        assert_eq!(s.archive_size, 2);
        assert_eq!(s.feasible, 2);
        assert_eq!(s.evaluations, 5);
    }

    #[test]
    fn test_unchanged_front_is_stagnant() {
        let mut t = FrontTracker::new();
        let a = archive_of(&[(0.0, 1.0), (0.5, 0.5), (1.0, 0.0)]);
        t.observe(&a, 10.0, 0);
        let s = t.observe(&a, 9.0, 100);
        assert_eq!(s.phi, 0.0);
        assert_eq!(s.ideal_shift, 0.0);
        assert_eq!(s.nadir_shift, 0.0);
        assert!(!s.improved());
    }

    #[test]
    fn test_moved_front_improves() {
        let mut t = FrontTracker::new();
        t.observe(&archive_of(&[(0.0, 1.0), (1.0, 0.0)]), 10.0, 0);
        let s = t.observe(&archive_of(&[(0.0, 0.8), (0.8, 0.0)]), 9.0, 100);
        assert!(s.phi > 0.0);
        assert!(s.nadir_shift > 0.0);
        assert!(s.improved());
    }

    #[test]
    fn test_violation_stats() {
        let mut a = Archive::new(10, 10);
        for (i, g) in [0.4, 0.4].iter().enumerate() {
            a.try_insert(Solution::new(
                vec![i as f64],
                Evaluation::new(vec![0.0, 0.0], vec![*g]),
            ));
        }
        let s = FrontTracker::new().observe(&a, 1.0, 0);
        assert_eq!(s.feasible, 0);
        assert!((s.violation_min - 0.4).abs() < 1e-12);
        assert!((s.violation_avg - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_window_disabled() {
        let mut w = StagnationWindow::new(0);
        for _ in 0..10 {
            assert!(!w.push(false));
        }
    }

    #[test]
    fn test_window_requires_full_span() {
        let mut w = StagnationWindow::new(3);
        assert!(!w.push(false));
        assert!(!w.push(false));
        assert!(w.push(false));
    }

    #[test]
    fn test_window_resets_on_improvement() {
        let mut w = StagnationWindow::new(3);
        w.push(false);
        w.push(false);
        assert!(!w.push(true));
        assert!(!w.push(false));
        assert!(!w.push(false));
        assert!(w.push(false));
    }
}
