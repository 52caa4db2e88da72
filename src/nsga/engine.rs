//! NSGA-II generational engine.
//!
//! A single controller thread orchestrates generations; offspring
//! evaluation is farmed out to a pinned-size rayon pool and recombined
//! in offspring order, so a fixed master seed and worker count always
//! reproduce the same run. The master RNG derives one sub-stream for
//! seeding and one for selection/variation, in that order.
//!
//! # Reference
//! Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic
//! Algorithm: NSGA-II"

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::evaluator::{ConstraintEvaluator, Evaluation, Fitness, HardConstraint, SoftConstraint};
use crate::ga::{block_crossover, targeted_mutation, Chromosome, Seeder, SessionPlan};
use crate::models::{ComponentKind, SchedulingContext};

use super::metrics::{compare_lexicographic, mean_pairwise_hamming, GenerationMetrics};
use super::sorting::{crowding_distance, fast_non_dominated_sort, rank_and_crowding};

/// Cooperative cancellation handle.
///
/// Cloneable; `cancel()` from any thread, the controller checks it
/// between generations and at the evaluation barrier.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminationReason {
    /// The configured generation budget was exhausted.
    Completed,
    /// A feasible individual was found and the soft objective plateaued.
    EarlyStop,
    /// The cancellation token fired.
    Cancelled,
}

/// One concrete scheduled session, the canonical exporter handoff.
///
/// Field names and order are stable across versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAssignment {
    /// Course id.
    pub course_id: String,
    /// Group id.
    pub group_id: String,
    /// Instructor id.
    pub instructor_id: String,
    /// Room id.
    pub room_id: String,
    /// Quantum id.
    pub quantum: u32,
    /// Day index on the calendar.
    pub day: u32,
    /// Slot index within the day.
    pub slot: u32,
    /// Component kind.
    pub kind: ComponentKind,
}

/// A Pareto-front member: its fitness and decoded schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoEntry {
    /// Fitness pair of the individual.
    pub fitness: Fitness,
    /// Decoded session list.
    pub sessions: Vec<SessionAssignment>,
}

/// Outcome of a full run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Schedule of the designated best individual (minimum hard, ties
    /// by minimum soft).
    pub best: Vec<SessionAssignment>,
    /// Fitness of the best individual.
    pub best_fitness: Fitness,
    /// Whether the best individual satisfies every hard constraint.
    pub feasible: bool,
    /// The final non-dominated front (failed evaluations excluded).
    pub front: Vec<ParetoEntry>,
    /// Per-generation metrics, generation 0 first.
    pub metrics: Vec<GenerationMetrics>,
    /// Generations actually executed.
    pub generations_run: usize,
    /// Wall-clock runtime.
    pub runtime: Duration,
    /// Why the run ended.
    pub termination: TerminationReason,
}

/// The multi-objective evolutionary scheduler.
pub struct EvolutionEngine<'a> {
    ctx: &'a SchedulingContext,
    config: EngineConfig,
    plan: SessionPlan,
    cancel: CancelToken,
}

impl<'a> EvolutionEngine<'a> {
    /// Creates an engine over a context, rejecting bad configurations
    /// and unschedulable inputs up front.
    pub fn new(ctx: &'a SchedulingContext, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        ctx.ensure_schedulable()?;
        let plan = SessionPlan::build(ctx);
        Ok(Self {
            ctx,
            config,
            plan,
            cancel: CancelToken::new(),
        })
    }

    /// The session plan derived from the context.
    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    /// A handle for cancelling this engine's run from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Runs the full generational loop.
    pub fn run(&self) -> Result<RunResult, EngineError> {
        let start = Instant::now();
        let n = self.config.population_size;
        let evaluator = ConstraintEvaluator::new(self.ctx, &self.plan, &self.config);

        let workers = self.config.resolved_workers();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| EngineError::WorkerPool(e.to_string()))?;

        // Named sub-streams, derived from the master in fixed order.
        let mut master = ChaCha8Rng::seed_from_u64(self.config.seed);
        let mut seed_rng = ChaCha8Rng::seed_from_u64(master.random());
        let mut vary_rng = ChaCha8Rng::seed_from_u64(master.random());

        info!(
            population = n,
            generations = self.config.generations,
            genes = self.plan.gene_count(),
            workers,
            seed = self.config.seed,
            "starting evolutionary run"
        );

        let seeder = Seeder::new(self.ctx, &self.plan, self.config.seeding_max_tries);
        let mut population = seeder.seed_population(n, &mut seed_rng)?;
        let (mut evaluations, seed_failures) =
            self.evaluate_batch(&pool, &evaluator, &mut population)?;

        let mut metrics = Vec::with_capacity(self.config.generations + 1);
        metrics.push(GenerationMetrics::collect(
            0,
            &evaluations,
            mean_pairwise_hamming(&population),
            seed_failures,
        ));

        let mut termination = TerminationReason::Completed;
        let mut generations_run = 0usize;
        let mut plateau = 0usize;
        let mut feasible_best_soft = f64::INFINITY;

        for generation in 1..=self.config.generations {
            if self.cancel.is_cancelled() {
                termination = TerminationReason::Cancelled;
                break;
            }

            // Parent selection works on the current population's ranks.
            let fitnesses: Vec<Fitness> = evaluations.iter().map(|e| e.fitness).collect();
            let (ranks, crowding) = rank_and_crowding(&fitnesses);

            let mut offspring = Vec::with_capacity(n + 1);
            while offspring.len() < n {
                let a = tournament(&ranks, &crowding, &mut vary_rng);
                let b = tournament(&ranks, &crowding, &mut vary_rng);

                let (mut c1, mut c2) = if vary_rng.random_bool(self.config.crossover_probability) {
                    block_crossover(&population[a], &population[b], &self.plan, &mut vary_rng)
                } else {
                    (population[a].clone(), population[b].clone())
                };
                targeted_mutation(&mut c1, self.ctx, self.config.mutation_probability, &mut vary_rng);
                targeted_mutation(&mut c2, self.ctx, self.config.mutation_probability, &mut vary_rng);
                offspring.push(c1);
                offspring.push(c2);
            }
            offspring.truncate(n);

            let (offspring_evals, failures) =
                self.evaluate_batch(&pool, &evaluator, &mut offspring)?;

            // Combine parents and offspring, then peel fronts into the
            // next population.
            population.append(&mut offspring);
            evaluations.extend(offspring_evals);

            let combined: Vec<Fitness> = evaluations.iter().map(|e| e.fitness).collect();
            let fronts = fast_non_dominated_sort(&combined);

            let mut survivors: Vec<usize> = Vec::with_capacity(n);
            for front in &fronts {
                if survivors.len() + front.len() <= n {
                    survivors.extend(front.iter().copied());
                    if survivors.len() == n {
                        break;
                    }
                } else {
                    let distances = crowding_distance(front, &combined);
                    let mut order: Vec<usize> = (0..front.len()).collect();
                    order.sort_by(|&x, &y| {
                        distances[y]
                            .partial_cmp(&distances[x])
                            .unwrap_or(std::cmp::Ordering::Equal)
                            .then(front[x].cmp(&front[y]))
                    });
                    survivors.extend(order[..n - survivors.len()].iter().map(|&w| front[w]));
                    break;
                }
            }

            population = survivors.iter().map(|&i| population[i].clone()).collect();
            evaluations = survivors.iter().map(|&i| evaluations[i]).collect();
            generations_run = generation;

            let snapshot = GenerationMetrics::collect(
                generation,
                &evaluations,
                mean_pairwise_hamming(&population),
                failures,
            );
            debug!(
                generation,
                best_hard = snapshot.best_hard,
                best_soft = snapshot.best_soft,
                diversity = snapshot.diversity,
                "generation complete"
            );

            // Early stop: feasible and the soft objective has stalled.
            if self.config.early_stop_on_feasible && snapshot.best_hard == 0 {
                let best_soft = best_of(&evaluations).map(|e| e.fitness.soft).unwrap_or(f64::INFINITY);
                if best_soft < feasible_best_soft {
                    feasible_best_soft = best_soft;
                    plateau = 0;
                } else {
                    plateau += 1;
                }
                if plateau >= self.config.early_stop_plateau {
                    metrics.push(snapshot);
                    termination = TerminationReason::EarlyStop;
                    break;
                }
            }
            metrics.push(snapshot);

            if self.cancel.is_cancelled() {
                termination = TerminationReason::Cancelled;
                break;
            }
        }

        let result = self.finish(population, evaluations, metrics, generations_run, start, termination)?;
        info!(
            termination = ?result.termination,
            best_hard = result.best_fitness.hard,
            best_soft = result.best_fitness.soft,
            generations = result.generations_run,
            "run finished"
        );
        Ok(result)
    }

    /// Evaluates a batch in the worker pool, recombining results in
    /// input order. A failed decode costs that individual worst fitness
    /// but never the run; a shape violation aborts the run.
    fn evaluate_batch(
        &self,
        pool: &rayon::ThreadPool,
        evaluator: &ConstraintEvaluator<'_>,
        batch: &mut [Chromosome],
    ) -> Result<(Vec<Evaluation>, u64), EngineError> {
        for individual in batch.iter() {
            if !self.plan.matches(&individual.genes) {
                let detail = match self.plan.first_mismatch(&individual.genes) {
                    Some(block) => format!(
                        "block (course '{}', group '{}', {:?}) drifted from the session plan",
                        self.ctx.course(block.course).id,
                        self.ctx.group(block.group).id,
                        block.kind
                    ),
                    None => "individual length differs from the session plan".to_string(),
                };
                return Err(EngineError::Invariant(detail));
            }
        }

        let outcomes: Vec<Result<Evaluation, crate::ga::DecodeError>> = pool.install(|| {
            batch
                .par_iter()
                .map(|individual| individual.decode().map(|s| evaluator.evaluate(&s)))
                .collect()
        });

        let mut failures = 0u64;
        let evaluations: Vec<Evaluation> = outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| match outcome {
                Ok(evaluation) => evaluation,
                Err(err) => {
                    warn!(offspring = index, %err, "evaluation failed; assigning worst fitness");
                    failures += 1;
                    Evaluation {
                        fitness: Fitness::WORST,
                        hard_counts: [0; HardConstraint::COUNT],
                        soft_scores: [0.0; SoftConstraint::COUNT],
                    }
                }
            })
            .collect();

        for (individual, evaluation) in batch.iter_mut().zip(&evaluations) {
            individual.fitness = Some(evaluation.fitness);
        }
        Ok((evaluations, failures))
    }

    fn finish(
        &self,
        population: Vec<Chromosome>,
        evaluations: Vec<Evaluation>,
        metrics: Vec<GenerationMetrics>,
        generations_run: usize,
        start: Instant,
        termination: TerminationReason,
    ) -> Result<RunResult, EngineError> {
        let fitnesses: Vec<Fitness> = evaluations.iter().map(|e| e.fitness).collect();
        let fronts = fast_non_dominated_sort(&fitnesses);

        let front_members: Vec<usize> = fronts
            .first()
            .map(|front| {
                front
                    .iter()
                    .copied()
                    .filter(|&i| fitnesses[i].hard != u64::MAX)
                    .collect()
            })
            .unwrap_or_default();

        let mut front = Vec::with_capacity(front_members.len());
        for &i in &front_members {
            front.push(ParetoEntry {
                fitness: fitnesses[i],
                sessions: self.to_assignments(&population[i])?,
            });
        }

        let best_index = (0..population.len())
            .filter(|&i| fitnesses[i].hard != u64::MAX)
            .min_by(|&a, &b| compare_lexicographic(&fitnesses[a], &fitnesses[b]))
            .unwrap_or(0);
        let best_fitness = fitnesses[best_index];

        Ok(RunResult {
            best: self.to_assignments(&population[best_index])?,
            best_fitness,
            feasible: best_fitness.is_feasible(),
            front,
            metrics,
            generations_run,
            runtime: start.elapsed(),
            termination,
        })
    }

    /// Decodes an individual into the exporter handoff format.
    fn to_assignments(&self, individual: &Chromosome) -> Result<Vec<SessionAssignment>, EngineError> {
        let sessions = individual
            .decode()
            .map_err(|e| EngineError::Invariant(e.to_string()))?;
        let calendar = self.ctx.calendar();
        Ok(sessions
            .iter()
            .map(|s| SessionAssignment {
                course_id: self.ctx.course(s.course).id.clone(),
                group_id: self.ctx.group(s.group).id.clone(),
                instructor_id: self.ctx.instructor(s.instructor).id.clone(),
                room_id: self.ctx.room(s.room).id.clone(),
                quantum: s.quantum,
                day: calendar.day_of(s.quantum),
                slot: calendar.slot_of(s.quantum),
                kind: s.kind,
            })
            .collect())
    }
}

/// Binary tournament: lower rank wins, ties go to higher crowding
/// distance, remaining ties to a coin flip.
fn tournament<R: Rng>(ranks: &[usize], crowding: &[f64], rng: &mut R) -> usize {
    let i = rng.random_range(0..ranks.len());
    let j = rng.random_range(0..ranks.len());
    if ranks[i] != ranks[j] {
        return if ranks[i] < ranks[j] { i } else { j };
    }
    if crowding[i] != crowding[j] {
        return if crowding[i] > crowding[j] { i } else { j };
    }
    if rng.random_bool(0.5) {
        i
    } else {
        j
    }
}

fn best_of(evaluations: &[Evaluation]) -> Option<&Evaluation> {
    evaluations
        .iter()
        .filter(|e| e.fitness.hard != u64::MAX)
        .min_by(|a, b| compare_lexicographic(&a.fitness, &b.fitness))
}
