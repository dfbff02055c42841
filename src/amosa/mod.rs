//! Archived Multi-Objective Simulated Annealing (AMOSA).
//!
//! A simulated-annealing search for problems with several objectives and
//! optional inequality constraints. Instead of a single incumbent, the
//! search maintains an archive of mutually non-dominated solutions that
//! approximates the Pareto front, and uses the amount of domination between
//! solutions as the energy gap of the annealing acceptance rule.
//!
//! Users describe their problem by implementing [`AmosaProblem`]: typed,
//! bounded decision variables and an evaluation returning objectives and
//! constraint values (`g(x) <= 0` is satisfied). All objectives are
//! minimized.
//!
//! # Key Types
//!
//! - [`AmosaConfig`]: Archive limits, annealing schedule, presets
//! - [`AmosaRunner`]: Executes initialization and the annealing loop
//! - [`AmosaResult`]: Final Pareto set/front with run statistics
//! - [`Archive`]: Bounded non-dominated archive with clustering truncation
//!
//! # Submodules
//!
//! - [`dominance`]: Pareto and constraint dominance, domination amount
//! - [`archive`]: The archive and its truncation
//! - [`perturbation`]: Random points and single-variable moves
//! - [`stats`]: Per-temperature front summaries
//! - [`export`]: Delimited-text export of the final archive
//!
//! # References
//!
//! - Bandyopadhyay, Saha, Maulik & Deb (2008), "A Simulated Annealing-Based
//!   Multiobjective Optimization Algorithm: AMOSA", IEEE TEVC 12(3)
//! - Deb, Pratap, Agarwal & Meyarivan (2002), constraint-domination in NSGA-II
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

pub mod archive;
mod config;
pub mod dominance;
pub mod export;
mod initializer;
pub mod perturbation;
mod runner;
pub mod stats;
mod types;

pub use archive::Archive;
pub use config::AmosaConfig;
pub use runner::{AmosaResult, AmosaRunner, StopReason};
pub use stats::FrontSummary;
pub use types::{AmosaProblem, Evaluation, Solution, VarType, Variable};
