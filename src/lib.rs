//! Multi-objective optimization by Archived Multi-Objective Simulated
//! Annealing (AMOSA).
//!
//! Given a problem with typed, bounded decision variables, several
//! objectives to minimize and optional inequality constraints, the
//! optimizer returns an approximation of the Pareto front: a bounded set
//! of mutually non-dominated solutions.
//!
//! - [`amosa`]: the optimizer. Implement [`amosa::AmosaProblem`], build an
//!   [`amosa::AmosaConfig`] and call [`amosa::AmosaRunner::run`].
//! - [`problems`]: benchmark problems with known fronts (ZDT1, ZDT4, ZDT6,
//!   BNH).
//! - [`error`]: the crate's error type.
//! - [`random`]: seeded random number generation.
//!
//! # Features
//!
//! - `parallel`: evaluates initialization batches with rayon when
//!   [`amosa::AmosaConfig::parallel`] is set. Results are identical to a
//!   sequential run with the same seed.
//! - `serde`: `Serialize`/`Deserialize` for configuration, solutions and
//!   results.
//!
//! # Logging
//!
//! Progress is reported through `tracing` events; install a subscriber to
//! see them.

pub mod amosa;
pub mod error;
pub mod problems;
pub mod random;
