//! AMOSA execution loop.

use super::archive::Archive;
use super::config::AmosaConfig;
use super::dominance::{
    acceptance_probability, compare, domination_amount, normalized_distance, Dominance, Ranges,
};
use super::initializer::initialize_archive;
use super::perturbation::perturb;
use super::stats::{FrontSummary, FrontTracker, StagnationWindow};
use super::types::{evaluate, validate_problem, AmosaProblem, Solution};
use crate::error::{Error, Result};
use crate::random::create_rng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Why the annealing loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The temperature reached `final_temperature`.
    Cooled,
    /// The front stopped moving for `early_termination_window` levels.
    Stagnated,
    /// `max_iterations` moves were evaluated.
    IterationLimit,
    /// The cancellation flag was set.
    Cancelled,
}

/// Result of an AMOSA run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmosaResult {
    /// Final archive members, in archive order.
    pub solutions: Vec<Solution>,

    /// Number of decision variables of the problem.
    pub num_variables: usize,

    /// Number of objectives of the problem.
    pub num_objectives: usize,

    /// Annealing moves evaluated (excluding initialization).
    pub iterations: usize,

    /// Total problem evaluations, initialization included.
    pub evaluations: usize,

    /// Temperature when the loop stopped.
    pub final_temperature: f64,

    /// Moves that replaced the current solution.
    pub accepted_moves: usize,

    /// Why the loop stopped.
    pub stop_reason: StopReason,

    /// Archive snapshot after initialization and after every temperature level.
    pub history: Vec<FrontSummary>,

    /// Wall-clock run time.
    pub duration: Duration,
}

impl AmosaResult {
    /// Objective vectors of the final archive (the Pareto front).
    pub fn pareto_front(&self) -> Vec<Vec<f64>> {
        self.solutions
            .iter()
            .map(|s| s.objectives().to_vec())
            .collect()
    }

    /// Decision vectors of the final archive (the Pareto set).
    pub fn pareto_set(&self) -> Vec<Vec<f64>> {
        self.solutions
            .iter()
            .map(|s| s.variables().to_vec())
            .collect()
    }

    /// Constraint vectors of the final archive.
    pub fn constraint_violations(&self) -> Vec<Vec<f64>> {
        self.solutions
            .iter()
            .map(|s| s.constraints().to_vec())
            .collect()
    }

    /// Whether every returned solution is feasible.
    ///
    /// When no feasible point was ever found, the archive holds the
    /// least-violating solutions instead and this returns `false`.
    pub fn is_feasible(&self) -> bool {
        self.solutions.iter().all(Solution::is_feasible)
    }
}

/// Executes AMOSA.
///
/// # Usage
///
/// ```
/// use u_amosa::amosa::{AmosaConfig, AmosaRunner};
/// use u_amosa::problems::Zdt1;
///
/// let config = AmosaConfig::fast()
///     .with_initial_refinement_iterations(5)
///     .with_max_iterations(2_000)
///     .with_seed(42);
/// let result = AmosaRunner::run(&Zdt1::new(5), &config).unwrap();
/// assert!(result.solutions.len() <= config.archive_hard_limit);
/// ```
pub struct AmosaRunner;

impl AmosaRunner {
    /// Runs AMOSA on `problem`.
    ///
    /// Configuration and problem metadata are validated before anything is
    /// evaluated; evaluation errors abort the run.
    ///
    /// Infeasible solutions are returned only when no feasible one was
    /// found; check [`AmosaResult::is_feasible`] on constrained problems.
    pub fn run<P: AmosaProblem>(problem: &P, config: &AmosaConfig) -> Result<AmosaResult> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs AMOSA with an optional cancellation token.
    ///
    /// The flag is checked before every temperature level. A cancelled run
    /// still returns the archive, truncated to the hard limit.
    pub fn run_with_cancel<P: AmosaProblem>(
        problem: &P,
        config: &AmosaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AmosaResult> {
        config.validate()?;
        validate_problem(problem)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);
        let started = Instant::now();
        let vars = problem.variables();
        let num_objectives = problem.num_objectives();

        info!(
            seed,
            variables = vars.len(),
            objectives = num_objectives,
            constraints = problem.num_constraints(),
            "starting AMOSA"
        );

        let mut evaluations = 0usize;
        let mut archive = initialize_archive(problem, config, &mut rng, &mut evaluations)?;

        let mut temperature = config.initial_temperature;
        let mut tracker = FrontTracker::new();
        let mut history = vec![tracker.observe(&archive, temperature, evaluations)];
        let mut window = StagnationWindow::new(config.early_termination_window);

        let mut current = starting_point(&archive, &mut rng)?;

        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let budget_spent =
            |iterations: usize| config.max_iterations > 0 && iterations >= config.max_iterations;

        let stop_reason = loop {
            if temperature <= config.final_temperature {
                break StopReason::Cooled;
            }
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    break StopReason::Cancelled;
                }
            }

            for _ in 0..config.refinement_iterations {
                if budget_spent(iterations) {
                    break;
                }

                let candidate = evaluate(problem, perturb(current.variables(), vars, &mut rng))?;
                evaluations += 1;

                if anneal_step(
                    &mut current,
                    candidate,
                    &mut archive,
                    temperature,
                    num_objectives,
                    &mut rng,
                ) {
                    accepted_moves += 1;
                }
                iterations += 1;
            }

            temperature *= config.cooling_factor;

            let summary = tracker.observe(&archive, temperature, evaluations);
            debug!(
                temperature,
                evaluations,
                archive = summary.archive_size,
                feasible = summary.feasible,
                cv_min = summary.violation_min,
                cv_avg = summary.violation_avg,
                ideal_shift = summary.ideal_shift,
                nadir_shift = summary.nadir_shift,
                phi = summary.phi,
                "temperature level done"
            );
            let improved = summary.improved();
            history.push(summary);

            if budget_spent(iterations) {
                break StopReason::IterationLimit;
            }
            if window.push(improved) {
                warn!(
                    window = config.early_termination_window,
                    temperature, "front stagnated, terminating early"
                );
                break StopReason::Stagnated;
            }
        };

        archive.prune_to(config.archive_hard_limit);

        let duration = started.elapsed();
        info!(
            ?stop_reason,
            archive = archive.len(),
            feasible = archive.feasible_count(),
            iterations,
            evaluations,
            elapsed_ms = duration.as_millis() as u64,
            "AMOSA finished"
        );

        Ok(AmosaResult {
            solutions: archive.into_members(),
            num_variables: vars.len(),
            num_objectives,
            iterations,
            evaluations,
            final_temperature: temperature,
            accepted_moves,
            stop_reason,
            history,
            duration,
        })
    }
}

/// Picks the first `current` uniformly from the initial archive.
fn starting_point<R: Rng>(archive: &Archive, rng: &mut R) -> Result<Solution> {
    archive.random_member(rng).cloned().ok_or_else(|| {
        Error::InvalidConfig("initialization produced an empty archive".into())
    })
}

/// One move of the annealing chain.
///
/// Classifies `candidate` against `current` and applies the matching
/// acceptance rule. Energy gaps are domination amounts normalized by the
/// objective ranges of the archive together with `current` and `candidate`.
///
/// - current dominates candidate: `dE = 1 + min` domination amount over the
///   archive members dominating the candidate and `current`; the candidate
///   replaces `current` with probability `p(dE)`. Never archived.
/// - neither dominates: `dE` is the mean domination amount of the archive
///   members dominating the candidate or, when there are none, the negated
///   distance to the closest member; accepted with probability `p(dE)`.
///   Always offered to the archive.
/// - candidate dominates current: the candidate replaces `current`, unless
///   archive members dominate it, in which case the least-dominating one
///   takes its place with probability `1 - p(dE)`. Offered to the archive.
///
/// Returns `true` when `current` changed.
pub(crate) fn anneal_step<R: Rng>(
    current: &mut Solution,
    candidate: Solution,
    archive: &mut Archive,
    temperature: f64,
    num_objectives: usize,
    rng: &mut R,
) -> bool {
    let ranges = archive.objective_ranges([&*current, &candidate], num_objectives);

    match compare(current, &candidate) {
        Dominance::Left => {
            let min_amount = archive
                .dominating(&candidate)
                .chain(std::iter::once(&*current))
                .map(|s| domination_amount(s, &candidate, &ranges))
                .fold(f64::INFINITY, f64::min);
            let delta = 1.0 + min_amount;
            if rng.random::<f64>() < acceptance_probability(delta, temperature) {
                *current = candidate;
                true
            } else {
                false
            }
        }
        Dominance::Neither => {
            let amounts: Vec<f64> = archive
                .dominating(&candidate)
                .map(|s| domination_amount(s, &candidate, &ranges))
                .collect();
            let delta = if amounts.is_empty() {
                -closest_gap(archive, &candidate, &ranges)
            } else {
                amounts.iter().sum::<f64>() / amounts.len() as f64
            };
            let accept = rng.random::<f64>() < acceptance_probability(delta, temperature);
            if accept {
                *current = candidate.clone();
            }
            offer(archive, candidate);
            accept
        }
        Dominance::Right => {
            let checkpoint = archive
                .dominating(&candidate)
                .map(|s| (s, domination_amount(s, &candidate, &ranges)))
                .fold(None, |best: Option<(&Solution, f64)>, (s, d)| match best {
                    Some((_, bd)) if bd <= d => best,
                    _ => Some((s, d)),
                })
                .map(|(s, d)| (s.clone(), d));

            let next = match checkpoint {
                Some((s, delta))
                    if rng.random::<f64>() >= acceptance_probability(delta, temperature) =>
                {
                    s
                }
                _ => candidate.clone(),
            };
            offer(archive, candidate);
            *current = next;
            true
        }
    }
}

fn offer(archive: &mut Archive, candidate: Solution) {
    if archive.try_insert(candidate) {
        archive.prune_if_needed();
    }
}

/// Normalized distance from `candidate` to the closest archive member.
fn closest_gap(archive: &Archive, candidate: &Solution, ranges: &Ranges) -> f64 {
    archive
        .iter()
        .map(|s| {
            if s.is_feasible() && candidate.is_feasible() {
                normalized_distance(s.objectives(), candidate.objectives(), &ranges.objectives)
            } else {
                (s.violation_total() - candidate.violation_total()).abs() / ranges.violation
            }
        })
        .fold(None, |best: Option<f64>, d| Some(best.map_or(d, |b| b.min(d))))
        .unwrap_or(0.0)
}

// ============================================================================
// Tests
// ============================================================================
