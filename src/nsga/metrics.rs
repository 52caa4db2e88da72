//! Per-generation search metrics.
//!
//! Collected once per generation after replacement. Only the reporter
//! collaborator consumes these; the engine itself never reads them back.

use serde::{Deserialize, Serialize};

use crate::evaluator::{Evaluation, Fitness, HardConstraint, SoftConstraint};
use crate::ga::Chromosome;

/// Snapshot of population quality at one generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetrics {
    /// Generation number (0 = the seeded population).
    pub generation: usize,
    /// Lowest hard-violation count in the population.
    pub best_hard: u64,
    /// Lowest soft penalty in the population.
    pub best_soft: f64,
    /// Mean hard-violation count (failed evaluations excluded).
    pub mean_hard: f64,
    /// Mean soft penalty (failed evaluations excluded).
    pub mean_soft: f64,
    /// Mean pairwise gene-assignment Hamming distance, normalized to
    /// [0, 1].
    pub diversity: f64,
    /// Per-constraint violation counts of the best individual.
    pub best_hard_counts: [u64; HardConstraint::COUNT],
    /// Per-constraint raw scores of the best individual.
    pub best_soft_scores: [f64; SoftConstraint::COUNT],
    /// Offspring whose evaluation failed this generation.
    pub evaluation_failures: u64,
}

impl GenerationMetrics {
    /// Collects metrics from a population's evaluations.
    ///
    /// "Best" for the breakdown columns is lexicographic: minimum hard,
    /// ties broken by minimum soft.
    pub fn collect(
        generation: usize,
        evaluations: &[Evaluation],
        diversity: f64,
        evaluation_failures: u64,
    ) -> Self {
        let scored: Vec<&Evaluation> = evaluations
            .iter()
            .filter(|e| e.fitness.hard != u64::MAX)
            .collect();

        let best = scored
            .iter()
            .copied()
            .min_by(|a, b| compare_lexicographic(&a.fitness, &b.fitness));

        let best_hard = scored.iter().map(|e| e.fitness.hard).min().unwrap_or(u64::MAX);
        let best_soft = scored
            .iter()
            .map(|e| e.fitness.soft)
            .fold(f64::INFINITY, f64::min);

        let count = scored.len().max(1) as f64;
        let mean_hard = scored.iter().map(|e| e.fitness.hard as f64).sum::<f64>() / count;
        let mean_soft = scored.iter().map(|e| e.fitness.soft).sum::<f64>() / count;

        Self {
            generation,
            best_hard,
            best_soft,
            mean_hard,
            mean_soft,
            diversity,
            best_hard_counts: best.map(|e| e.hard_counts).unwrap_or_default(),
            best_soft_scores: best.map(|e| e.soft_scores).unwrap_or_default(),
            evaluation_failures,
        }
    }
}

/// Lexicographic fitness order: hard first, then soft.
pub fn compare_lexicographic(a: &Fitness, b: &Fitness) -> std::cmp::Ordering {
    a.hard.cmp(&b.hard).then(
        a.soft
            .partial_cmp(&b.soft)
            .unwrap_or(std::cmp::Ordering::Equal),
    )
}

/// Mean pairwise Hamming distance over gene assignments, normalized by
/// gene count. Two genes differ when any of their assignment fields
/// (instructor, room, quantum) differ.
pub fn mean_pairwise_hamming(population: &[Chromosome]) -> f64 {
    let n = population.len();
    if n < 2 {
        return 0.0;
    }
    let genes = population[0].genes.len();
    if genes == 0 {
        return 0.0;
    }

    let mut total = 0u64;
    for i in 0..n {
        for j in (i + 1)..n {
            total += population[i]
                .genes
                .iter()
                .zip(&population[j].genes)
                .filter(|(a, b)| {
                    a.instructor != b.instructor || a.room != b.room || a.quantum != b.quantum
                })
                .count() as u64;
        }
    }

    let pairs = (n * (n - 1) / 2) as f64;
    total as f64 / pairs / genes as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::Gene;
    use crate::models::ComponentKind;

    fn eval(hard: u64, soft: f64) -> Evaluation {
        Evaluation {
            fitness: Fitness { hard, soft },
            hard_counts: [hard, 0, 0, 0, 0, 0],
            soft_scores: [soft, 0.0, 0.0, 0.0, 0.0],
        }
    }

    fn chromosome_with_quanta(quanta: &[u32]) -> Chromosome {
        let genes = quanta
            .iter()
            .map(|&q| Gene {
                course: 0,
                group: 0,
                kind: ComponentKind::Theory,
                instructor: 0,
                room: 0,
                quantum: q,
            })
            .collect();
        Chromosome::from_genes(genes)
    }

    #[test]
    fn test_collect_bests_and_means() {
        let evals = vec![eval(2, 4.0), eval(0, 9.0), eval(1, 1.0)];
        let m = GenerationMetrics::collect(3, &evals, 0.5, 0);

        assert_eq!(m.generation, 3);
        assert_eq!(m.best_hard, 0);
        assert_eq!(m.best_soft, 1.0);
        assert!((m.mean_hard - 1.0).abs() < 1e-10);
        assert!((m.mean_soft - (14.0 / 3.0)).abs() < 1e-10);
        // Breakdown follows the lexicographic best (hard=0, soft=9).
        assert_eq!(m.best_hard_counts[0], 0);
        assert_eq!(m.best_soft_scores[0], 9.0);
    }

    #[test]
    fn test_failed_evaluations_excluded_from_means() {
        let evals = vec![
            eval(1, 2.0),
            Evaluation {
                fitness: Fitness::WORST,
                hard_counts: [0; HardConstraint::COUNT],
                soft_scores: [0.0; SoftConstraint::COUNT],
            },
        ];
        let m = GenerationMetrics::collect(0, &evals, 0.0, 1);
        assert_eq!(m.best_hard, 1);
        assert!((m.mean_hard - 1.0).abs() < 1e-10);
        assert_eq!(m.evaluation_failures, 1);
    }

    #[test]
    fn test_hamming_identical_population() {
        let pop = vec![chromosome_with_quanta(&[0, 1, 2]); 4];
        assert_eq!(mean_pairwise_hamming(&pop), 0.0);
    }

    #[test]
    fn test_hamming_fully_distinct() {
        let pop = vec![
            chromosome_with_quanta(&[0, 1, 2]),
            chromosome_with_quanta(&[3, 4, 5]),
        ];
        assert_eq!(mean_pairwise_hamming(&pop), 1.0);
    }

    #[test]
    fn test_hamming_partial() {
        let pop = vec![
            chromosome_with_quanta(&[0, 1, 2, 3]),
            chromosome_with_quanta(&[0, 1, 9, 9]),
        ];
        assert_eq!(mean_pairwise_hamming(&pop), 0.5);
    }

    #[test]
    fn test_hamming_small_population() {
        assert_eq!(mean_pairwise_hamming(&[]), 0.0);
        assert_eq!(mean_pairwise_hamming(&[chromosome_with_quanta(&[1])]), 0.0);
    }
}
