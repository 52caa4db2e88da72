//! Engine configuration.
//!
//! All knobs for a run: population sizing, operator probabilities, the
//! master seed, worker-pool sizing, seeding retry budget, early-stop
//! policy, and per-constraint soft weights / enablement. Validated once
//! before the engine starts; a bad configuration never reaches the loop.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::evaluator::{HardConstraint, SoftConstraint};

/// Evaluation worker-pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerCount {
    /// Use the hardware's available parallelism.
    Auto,
    /// Pin to an explicit worker count (≥ 1).
    Fixed(usize),
}

/// Weights for the soft-penalty objective.
///
/// A zero weight disables the corresponding constraint's contribution
/// (and its computation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftWeights {
    /// Weight for group idle gaps.
    pub group_compactness: f64,
    /// Weight for instructor idle gaps.
    pub instructor_compactness: f64,
    /// Weight for groups teaching through the midday slot.
    pub midday_break: f64,
    /// Weight for fragmented course blocks.
    pub coalescence: f64,
    /// Weight for first/last-slot sessions.
    pub early_late: f64,
}

impl Default for SoftWeights {
    fn default() -> Self {
        Self {
            group_compactness: 1.0,
            instructor_compactness: 0.5,
            midday_break: 0.5,
            coalescence: 1.0,
            early_late: 0.25,
        }
    }
}

impl SoftWeights {
    /// Weight for a constraint.
    pub fn get(&self, constraint: SoftConstraint) -> f64 {
        match constraint {
            SoftConstraint::GroupCompactness => self.group_compactness,
            SoftConstraint::InstructorCompactness => self.instructor_compactness,
            SoftConstraint::MiddayBreak => self.midday_break,
            SoftConstraint::Coalescence => self.coalescence,
            SoftConstraint::EarlyLate => self.early_late,
        }
    }

    /// Sets a weight by constraint name (configuration-file surface).
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), ConfigError> {
        let constraint = SoftConstraint::from_name(name)
            .ok_or_else(|| ConfigError::UnknownConstraint(name.to_string()))?;
        if value < 0.0 {
            return Err(ConfigError::NegativeWeight {
                name: constraint.name(),
                value,
            });
        }
        match constraint {
            SoftConstraint::GroupCompactness => self.group_compactness = value,
            SoftConstraint::InstructorCompactness => self.instructor_compactness = value,
            SoftConstraint::MiddayBreak => self.midday_break = value,
            SoftConstraint::Coalescence => self.coalescence = value,
            SoftConstraint::EarlyLate => self.early_late = value,
        }
        Ok(())
    }

    /// Weights as an array indexed by [`SoftConstraint::index`].
    pub fn as_array(&self) -> [f64; SoftConstraint::COUNT] {
        let mut weights = [0.0; SoftConstraint::COUNT];
        for c in SoftConstraint::ALL {
            weights[c.index()] = self.get(c);
        }
        weights
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Individuals per generation (≥ 2).
    pub population_size: usize,
    /// Maximum generations (≥ 1).
    pub generations: usize,
    /// Probability of applying crossover to a parent pair.
    pub crossover_probability: f64,
    /// Per-gene mutation probability.
    pub mutation_probability: f64,
    /// Master RNG seed; all sub-streams derive from it.
    pub seed: u64,
    /// Evaluation worker-pool sizing.
    pub worker_count: WorkerCount,
    /// Placement attempts per gene during seeding (≥ 1).
    pub seeding_max_tries: usize,
    /// Stop early once feasible and the soft objective plateaus.
    pub early_stop_on_feasible: bool,
    /// Plateau length (generations without best-soft improvement).
    pub early_stop_plateau: usize,
    /// Slot index of the designated midday break; `None` disables the
    /// midday soft constraint.
    pub midday_slot: Option<u32>,
    /// Soft-penalty weights.
    pub soft_weights: SoftWeights,
    /// Enabled hard constraints (default: all).
    pub enabled_hard: Vec<HardConstraint>,
    /// Enabled soft constraints (default: all).
    pub enabled_soft: Vec<SoftConstraint>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 200,
            crossover_probability: 0.9,
            mutation_probability: 0.05,
            seed: 0,
            worker_count: WorkerCount::Auto,
            seeding_max_tries: 30,
            early_stop_on_feasible: false,
            early_stop_plateau: 10,
            midday_slot: None,
            soft_weights: SoftWeights::default(),
            enabled_hard: HardConstraint::ALL.to_vec(),
            enabled_soft: SoftConstraint::ALL.to_vec(),
        }
    }
}

impl EngineConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation budget.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p;
        self
    }

    /// Sets the per-gene mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    /// Sets the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the worker-pool sizing.
    pub fn with_worker_count(mut self, workers: WorkerCount) -> Self {
        self.worker_count = workers;
        self
    }

    /// Sets the seeding retry budget.
    pub fn with_seeding_max_tries(mut self, tries: usize) -> Self {
        self.seeding_max_tries = tries;
        self
    }

    /// Enables early stop once a feasible individual exists and the soft
    /// objective has not improved for `plateau` generations.
    pub fn with_early_stop(mut self, plateau: usize) -> Self {
        self.early_stop_on_feasible = true;
        self.early_stop_plateau = plateau;
        self
    }

    /// Sets the designated midday slot.
    pub fn with_midday_slot(mut self, slot: u32) -> Self {
        self.midday_slot = Some(slot);
        self
    }

    /// Removes a hard constraint from the enabled set.
    pub fn without_hard_constraint(mut self, constraint: HardConstraint) -> Self {
        self.enabled_hard.retain(|c| *c != constraint);
        self
    }

    /// Removes a soft constraint from the enabled set.
    pub fn without_soft_constraint(mut self, constraint: SoftConstraint) -> Self {
        self.enabled_soft.retain(|c| *c != constraint);
        self
    }

    /// Checks every field; returns the first offending one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if self.generations < 1 {
            return Err(ConfigError::NoGenerations);
        }
        check_probability("crossover_probability", self.crossover_probability)?;
        check_probability("mutation_probability", self.mutation_probability)?;
        if self.seeding_max_tries < 1 {
            return Err(ConfigError::NoSeedingTries);
        }
        if self.worker_count == WorkerCount::Fixed(0) {
            return Err(ConfigError::NoWorkers);
        }
        for c in SoftConstraint::ALL {
            let w = self.soft_weights.get(c);
            if w < 0.0 {
                return Err(ConfigError::NegativeWeight {
                    name: c.name(),
                    value: w,
                });
            }
        }
        Ok(())
    }

    /// The concrete worker count for this run.
    pub fn resolved_workers(&self) -> usize {
        match self.worker_count {
            WorkerCount::Fixed(n) => n,
            WorkerCount::Auto => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) || value.is_nan() {
        return Err(ConfigError::ProbabilityOutOfRange { name, value });
    }
    Ok(())
}
