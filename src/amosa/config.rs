//! AMOSA configuration.
//!
//! [`AmosaConfig`] is an immutable value built once with `with_*` methods
//! and validated before the run starts.

use crate::error::{Error, Result};

/// Upper bound on the initial population size.
const MAX_INITIAL_POPULATION: usize = u32::MAX as usize;

/// Configuration for the AMOSA algorithm.
///
/// # Archive
///
/// The archive is truncated to `archive_hard_limit` members whenever it
/// grows past `archive_soft_limit`. The initial population holds
/// `archive_gamma * archive_soft_limit` random points, each refined by
/// `initial_refinement_iterations` hill-climbing steps.
///
/// # Annealing
///
/// The temperature starts at `initial_temperature`, is multiplied by
/// `cooling_factor` after every `refinement_iterations` moves, and the run
/// ends once it reaches `final_temperature`.
///
/// # Examples
///
/// ```
/// use u_amosa::amosa::AmosaConfig;
///
/// let config = AmosaConfig::default()
///     .with_archive_limits(20, 50)
///     .with_initial_temperature(500.0)
///     .with_final_temperature(1e-6)
///     .with_cooling_factor(0.9)
///     .with_refinement_iterations(500)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmosaConfig {
    /// Archive size after truncation.
    pub archive_hard_limit: usize,

    /// Archive size that triggers truncation. Must be `>= archive_hard_limit`.
    pub archive_soft_limit: usize,

    /// Multiplier on `archive_soft_limit` for the initial population size.
    pub archive_gamma: f64,

    /// Hill-climbing steps applied to each initial candidate.
    pub initial_refinement_iterations: usize,

    /// Moves evaluated at each temperature level.
    pub refinement_iterations: usize,

    /// Starting temperature.
    pub initial_temperature: f64,

    /// The run stops once the temperature drops to this value.
    pub final_temperature: f64,

    /// Geometric cooling factor in (0, 1).
    pub cooling_factor: f64,

    /// Number of consecutive stagnant temperature levels that ends the run.
    ///
    /// Set to 0 to disable early termination.
    pub early_termination_window: usize,

    /// Maximum total annealing moves (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Whether to seed the initial population with the all-lower and
    /// all-upper corner points.
    pub seed_bounds: bool,

    /// Whether to evaluate batches in parallel using rayon.
    ///
    /// Only effective with the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for AmosaConfig {
    fn default() -> Self {
        Self {
            archive_hard_limit: 20,
            archive_soft_limit: 50,
            archive_gamma: 2.0,
            initial_refinement_iterations: 500,
            refinement_iterations: 500,
            initial_temperature: 500.0,
            final_temperature: 1e-6,
            cooling_factor: 0.9,
            early_termination_window: 0,
            max_iterations: 0,
            seed_bounds: true,
            parallel: false,
            seed: None,
        }
    }
}

impl AmosaConfig {
    /// Sets the hard and soft archive limits.
    pub fn with_archive_limits(mut self, hard: usize, soft: usize) -> Self {
        self.archive_hard_limit = hard;
        self.archive_soft_limit = soft;
        self
    }

    pub fn with_archive_gamma(mut self, gamma: f64) -> Self {
        self.archive_gamma = gamma;
        self
    }

    pub fn with_initial_refinement_iterations(mut self, n: usize) -> Self {
        self.initial_refinement_iterations = n;
        self
    }

    pub fn with_refinement_iterations(mut self, n: usize) -> Self {
        self.refinement_iterations = n;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_final_temperature(mut self, t: f64) -> Self {
        self.final_temperature = t;
        self
    }

    pub fn with_cooling_factor(mut self, alpha: f64) -> Self {
        self.cooling_factor = alpha;
        self
    }

    /// Sets the early-termination window (0 to disable).
    pub fn with_early_termination_window(mut self, window: usize) -> Self {
        self.early_termination_window = window;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_seed_bounds(mut self, enabled: bool) -> Self {
        self.seed_bounds = enabled;
        self
    }

    /// Enables or disables parallel batch evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for quick runs: small archive, short refinement, fast cooling.
    ///
    /// - Archive: 10 / 25, Hill-climbing: 50 steps
    /// - 100 moves per level, cooling 0.8 from 100 to 1e-4
    pub fn fast() -> Self {
        Self {
            archive_hard_limit: 10,
            archive_soft_limit: 25,
            initial_refinement_iterations: 50,
            refinement_iterations: 100,
            initial_temperature: 100.0,
            final_temperature: 1e-4,
            cooling_factor: 0.8,
            early_termination_window: 10,
            ..Self::default()
        }
    }

    /// Preset balancing front quality and run time.
    ///
    /// - Archive: 20 / 50, Hill-climbing: 250 steps
    /// - 500 moves per level, cooling 0.9 from 500 to 1e-6
    pub fn balanced() -> Self {
        Self {
            initial_refinement_iterations: 250,
            early_termination_window: 15,
            ..Self::default()
        }
    }

    /// Preset for dense, well-converged fronts.
    ///
    /// - Archive: 75 / 150, Hill-climbing: 2500 steps
    /// - 2500 moves per level, cooling 0.9 from 500 to 1e-7
    pub fn quality() -> Self {
        Self {
            archive_hard_limit: 75,
            archive_soft_limit: 150,
            initial_refinement_iterations: 2500,
            refinement_iterations: 2500,
            final_temperature: 1e-7,
            early_termination_window: 15,
            ..Self::default()
        }
    }

    /// Number of random points in the initial population.
    pub fn initial_population_size(&self) -> usize {
        (self.archive_gamma * self.archive_soft_limit as f64).ceil() as usize
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));

        if self.archive_hard_limit == 0 {
            return invalid("archive_hard_limit must be positive".into());
        }
        if self.archive_hard_limit > self.archive_soft_limit {
            return invalid(format!(
                "archive_hard_limit ({}) must not exceed archive_soft_limit ({})",
                self.archive_hard_limit, self.archive_soft_limit
            ));
        }
        if !(self.archive_gamma > 0.0 && self.archive_gamma.is_finite()) {
            return invalid(format!(
                "archive_gamma must be positive, got {}",
                self.archive_gamma
            ));
        }
        let population = self.archive_gamma * self.archive_soft_limit as f64;
        if !(population.ceil() <= MAX_INITIAL_POPULATION as f64) {
            return invalid(format!(
                "archive_gamma * archive_soft_limit must not exceed {MAX_INITIAL_POPULATION}, got {population}"
            ));
        }
        if self.refinement_iterations == 0 {
            return invalid("refinement_iterations must be at least 1".into());
        }
        if !(self.final_temperature > 0.0) {
            return invalid("final_temperature must be positive".into());
        }
        if !(self.initial_temperature > self.final_temperature)
            || !self.initial_temperature.is_finite()
        {
            return invalid("initial_temperature must be greater than final_temperature".into());
        }
        if !(self.cooling_factor > 0.0 && self.cooling_factor < 1.0) {
            return invalid(format!(
                "cooling_factor must be in (0, 1), got {}",
                self.cooling_factor
            ));
        }
        Ok(())
    }
}
