//! Gene layout, session plan, and chromosome decoding.
//!
//! # Encoding
//!
//! An individual is a flat gene vector laid out by the canonical
//! [`SessionPlan`]: one contiguous block of genes per
//! (course, group, component) requirement, with block length equal to the
//! component's weekly quota rounded up. The plan is built once per run and
//! shared; every individual uses the same layout, and the operators only
//! ever rewrite a gene's assignment fields in place. Block structure is
//! therefore preserved by construction, and two individuals differ only
//! in their (instructor, room, quantum) values.
//!
//! Fractional quotas are rounded up exactly once, here; all other modules
//! reuse the cached block lengths.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evaluator::Fitness;
use crate::models::{ComponentKind, SchedulingContext};

/// Sentinel for a not-yet-assigned instructor/room/quantum field.
pub const UNASSIGNED: u32 = u32::MAX;

/// One required session occurrence.
///
/// The (course, group, kind) triple anchors the gene's identity and is
/// never mutated; only the assignment fields vary across individuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    /// Course index.
    pub course: u32,
    /// Group index.
    pub group: u32,
    /// Component the session belongs to.
    pub kind: ComponentKind,
    /// Assigned instructor index, or [`UNASSIGNED`].
    pub instructor: u32,
    /// Assigned room index, or [`UNASSIGNED`].
    pub room: u32,
    /// Assigned quantum id, or [`UNASSIGNED`].
    pub quantum: u32,
}

impl Gene {
    /// Creates a gene with identity fields set and assignments open.
    pub fn unassigned(course: u32, group: u32, kind: ComponentKind) -> Self {
        Self {
            course,
            group,
            kind,
            instructor: UNASSIGNED,
            room: UNASSIGNED,
            quantum: UNASSIGNED,
        }
    }

    /// Whether all assignment fields are set.
    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.instructor != UNASSIGNED && self.room != UNASSIGNED && self.quantum != UNASSIGNED
    }
}

/// A concrete decoded session.
///
/// Field-for-field projection of an assigned gene; adjacent quanta are
/// not aggregated (that is left to reporters).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Course index.
    pub course: u32,
    /// Group index.
    pub group: u32,
    /// Instructor index.
    pub instructor: u32,
    /// Room index.
    pub room: u32,
    /// Quantum id.
    pub quantum: u32,
    /// Component kind.
    pub kind: ComponentKind,
}

/// A contiguous gene range for one (course, group, component) requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequirementBlock {
    /// Course index.
    pub course: u32,
    /// Group index.
    pub group: u32,
    /// Component kind.
    pub kind: ComponentKind,
    /// First gene position of the block.
    pub start: usize,
    /// Number of genes (the rounded-up weekly quota).
    pub len: usize,
}

/// The canonical session requirement list.
///
/// Fixed for the run; defines every individual's gene positions.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    blocks: Vec<RequirementBlock>,
    gene_count: usize,
}

impl SessionPlan {
    /// Derives the plan from the context.
    ///
    /// Iterates courses in table order and their enrolled groups in index
    /// order, emitting a theory block and, where the course has one, a
    /// practical block. Quotas are rounded up here and cached in the
    /// block lengths.
    pub fn build(ctx: &SchedulingContext) -> Self {
        let mut blocks = Vec::new();
        let mut offset = 0usize;

        for ci in 0..ctx.courses().len() as u32 {
            let course = ctx.course(ci);
            for &gi in ctx.enrolled_groups(ci) {
                for kind in [ComponentKind::Theory, ComponentKind::Practical] {
                    let quota = course.quota_for(kind);
                    if quota <= 0.0 {
                        continue;
                    }
                    let len = quota.ceil() as usize;
                    blocks.push(RequirementBlock {
                        course: ci,
                        group: gi,
                        kind,
                        start: offset,
                        len,
                    });
                    offset += len;
                }
            }
        }

        Self {
            blocks,
            gene_count: offset,
        }
    }

    /// The requirement blocks in layout order.
    pub fn blocks(&self) -> &[RequirementBlock] {
        &self.blocks
    }

    /// Total number of genes per individual.
    pub fn gene_count(&self) -> usize {
        self.gene_count
    }

    /// A fresh gene vector in canonical layout with open assignments.
    pub fn template(&self) -> Vec<Gene> {
        let mut genes = Vec::with_capacity(self.gene_count);
        for block in &self.blocks {
            for _ in 0..block.len {
                genes.push(Gene::unassigned(block.course, block.group, block.kind));
            }
        }
        genes
    }

    /// Whether a gene vector matches this plan's shape: same length and
    /// the same (course, group, kind) identity at every position.
    pub fn matches(&self, genes: &[Gene]) -> bool {
        if genes.len() != self.gene_count {
            return false;
        }
        for block in &self.blocks {
            for g in &genes[block.start..block.start + block.len] {
                if g.course != block.course || g.group != block.group || g.kind != block.kind {
                    return false;
                }
            }
        }
        true
    }

    /// The first block whose identity diverges from the given genes, for
    /// diagnostics. `None` when the shape matches.
    pub fn first_mismatch(&self, genes: &[Gene]) -> Option<&RequirementBlock> {
        if genes.len() != self.gene_count {
            return self.blocks.first();
        }
        self.blocks.iter().find(|block| {
            genes[block.start..block.start + block.len]
                .iter()
                .any(|g| g.course != block.course || g.group != block.group || g.kind != block.kind)
        })
    }
}

/// Decoding failed on an unassigned gene.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("gene {index} (course {course}, group {group}, {kind:?}) entered decoding unassigned")]
pub struct DecodeError {
    /// Position of the offending gene.
    pub index: usize,
    /// Course index of the gene.
    pub course: u32,
    /// Group index of the gene.
    pub group: u32,
    /// Component kind of the gene.
    pub kind: ComponentKind,
}

/// An individual: a gene vector plus its cached fitness.
#[derive(Debug, Clone)]
pub struct Chromosome {
    /// Gene vector in canonical plan layout.
    pub genes: Vec<Gene>,
    /// Cached fitness; `None` until evaluated.
    pub fitness: Option<Fitness>,
}

impl Chromosome {
    /// Wraps a gene vector with no cached fitness.
    pub fn from_genes(genes: Vec<Gene>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the chromosome has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Projects genes one-for-one into decoded sessions, preserving order.
    ///
    /// Fails if any gene is unassigned; a fully seeded or varied
    /// individual never is.
    pub fn decode(&self) -> Result<Vec<Session>, DecodeError> {
        let mut sessions = Vec::with_capacity(self.genes.len());
        for (index, gene) in self.genes.iter().enumerate() {
            if !gene.is_assigned() {
                return Err(DecodeError {
                    index,
                    course: gene.course,
                    group: gene.group,
                    kind: gene.kind,
                });
            }
            sessions.push(Session {
                course: gene.course,
                group: gene.group,
                instructor: gene.instructor,
                room: gene.room,
                quantum: gene.quantum,
                kind: gene.kind,
            });
        }
        Ok(sessions)
    }
}
