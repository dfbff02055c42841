//! Initial archive construction.
//!
//! 1. Sample `ceil(archive_gamma * archive_soft_limit)` random points
//!    (plus the two corner points when `seed_bounds` is set)
//! 2. Evaluate them as one batch
//! 3. Refine each point by single-variable hill climbing
//! 4. Insert every refined point into the archive, then prune once
//!
//! Climbers advance in lockstep: each step draws all moves from the
//! generator first, evaluates the resulting points as one batch, then
//! applies the outcomes in order. The run is therefore identical whether
//! or not the batch is evaluated in parallel.

use super::archive::Archive;
use super::config::AmosaConfig;
use super::dominance::constraint_dominates;
use super::perturbation::{apply_move, lower_point, random_move, random_point, upper_point, Move};
use super::types::{evaluate_batch, AmosaProblem, Solution};
use crate::error::Result;
use rand::Rng;
use tracing::{debug, info};

/// Builds the initial archive. `evaluations` is incremented for every
/// evaluation performed.
pub(crate) fn initialize_archive<P: AmosaProblem, R: Rng>(
    problem: &P,
    config: &AmosaConfig,
    rng: &mut R,
    evaluations: &mut usize,
) -> Result<Archive> {
    let vars = problem.variables();

    let size = config.initial_population_size();
    let mut population = Vec::with_capacity(size.saturating_add(2));
    if config.seed_bounds {
        population.push(lower_point(vars));
        population.push(upper_point(vars));
    }
    for _ in 0..size {
        population.push(random_point(vars, rng));
    }

    *evaluations += population.len();
    let candidates = evaluate_batch(problem, population, config.parallel)?;
    debug!(candidates = candidates.len(), "initial population evaluated");

    let refined = hill_climb(
        problem,
        candidates,
        config.initial_refinement_iterations,
        config.parallel,
        rng,
        evaluations,
    )?;

    let mut archive = Archive::new(config.archive_hard_limit, config.archive_soft_limit);
    for s in refined {
        archive.try_insert(s);
    }
    archive.prune_if_needed();

    info!(
        archive = archive.len(),
        feasible = archive.feasible_count(),
        evaluations = *evaluations,
        "archive initialized"
    );
    Ok(archive)
}

/// Refines every candidate with `iterations` hill-climbing steps.
///
/// A climber repeats its last move while it keeps producing a point that
/// constraint-dominates the previous one, and draws a new variable and
/// direction after a failed step.
pub(crate) fn hill_climb<P: AmosaProblem, R: Rng>(
    problem: &P,
    candidates: Vec<Solution>,
    iterations: usize,
    parallel: bool,
    rng: &mut R,
    evaluations: &mut usize,
) -> Result<Vec<Solution>> {
    let vars = problem.variables();
    let mut climbers: Vec<(Solution, Move)> = candidates
        .into_iter()
        .map(|s| {
            let mv = random_move(vars, None, rng);
            (s, mv)
        })
        .collect();

    for _ in 0..iterations {
        let proposals: Vec<Vec<f64>> = climbers
            .iter()
            .map(|(s, mv)| apply_move(s.variables(), vars, *mv, rng))
            .collect();

        *evaluations += proposals.len();
        let evaluated = evaluate_batch(problem, proposals, parallel)?;

        for ((current, mv), next) in climbers.iter_mut().zip(evaluated) {
            if constraint_dominates(&next, current) {
                *current = next;
            } else {
                *mv = random_move(vars, Some(mv.index), rng);
            }
        }
    }

    Ok(climbers.into_iter().map(|(s, _)| s).collect())
}
