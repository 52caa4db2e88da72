//! Variation operators.
//!
//! Both operators preserve the canonical gene layout: crossover swaps
//! whole requirement blocks between shape-identical parents, and
//! mutation rewrites only a gene's assignment fields. Neither repairs
//! conflicts; the evaluator prices them.

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::models::SchedulingContext;

use super::chromosome::{Chromosome, SessionPlan};
use super::seeding::sample_quantum;

/// Single-point crossover over the block sequence.
///
/// Child A takes parent 1's genes up to the split block and parent 2's
/// from there; child B takes the complement. Because both parents share
/// the plan layout, block identities and lengths survive without repair.
pub fn block_crossover<R: Rng>(
    p1: &Chromosome,
    p2: &Chromosome,
    plan: &SessionPlan,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let blocks = plan.blocks();
    if blocks.len() < 2 {
        return (
            Chromosome::from_genes(p1.genes.clone()),
            Chromosome::from_genes(p2.genes.clone()),
        );
    }

    let split_block = rng.random_range(1..blocks.len());
    let split = blocks[split_block].start;

    let mut child_a = p1.genes[..split].to_vec();
    child_a.extend_from_slice(&p2.genes[split..]);
    let mut child_b = p2.genes[..split].to_vec();
    child_b.extend_from_slice(&p1.genes[split..]);

    (Chromosome::from_genes(child_a), Chromosome::from_genes(child_b))
}

/// Targeted per-gene mutation.
///
/// Each gene independently resamples its quantum, instructor, or room
/// with probability `p/3` per sub-action. Identity fields (course,
/// group, component) are never touched. Empty candidate sets make the
/// sub-action a no-op.
pub fn targeted_mutation<R: Rng>(
    individual: &mut Chromosome,
    ctx: &SchedulingContext,
    p: f64,
    rng: &mut R,
) {
    if p <= 0.0 {
        return;
    }
    let sub = p / 3.0;
    let mut touched = false;

    for gene in &mut individual.genes {
        if rng.random_bool(sub) {
            gene.quantum = sample_quantum(ctx, gene.instructor, rng);
            touched = true;
        }
        if rng.random_bool(sub) {
            if let Some(&instructor) = ctx.qualified_instructors(gene.course).choose(rng) {
                gene.instructor = instructor;
                touched = true;
            }
        }
        if rng.random_bool(sub) {
            if let Some(&room) = ctx.candidate_rooms(gene.course, gene.kind).choose(rng) {
                gene.room = room;
                touched = true;
            }
        }
    }

    if touched {
        individual.fitness = None;
    }
}
