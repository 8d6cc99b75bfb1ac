use serde::Serialize;
use std::fmt;

use eworld_ir::grid::{Cell, Dimension};
use eworld_ir::knowledge::KnowledgeGrid;
use eworld_smt::solver::SatOracle;

use crate::environment::EnvelopeWorld;
use crate::finder::{EnvelopeFinder, MoveOutcome, StepReport};

/// JSON schema version of [`RunReport`].
pub const RUN_REPORT_SCHEMA_VERSION: u32 = 1;

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub schema_version: u32,
    pub dimension: Dimension,
    pub envelopes: Vec<Cell>,
    pub steps: Vec<StepReport>,
    pub final_knowledge: KnowledgeGrid,
    pub excluded: usize,
    pub unknown: usize,
    pub clause_count: usize,
}

impl RunReport {
    pub fn new<O: SatOracle>(
        finder: &EnvelopeFinder<EnvelopeWorld, O>,
        steps: Vec<StepReport>,
    ) -> Self {
        let knowledge = finder.knowledge();
        Self {
            schema_version: RUN_REPORT_SCHEMA_VERSION,
            dimension: knowledge.dimension(),
            envelopes: finder.environment().envelopes().iter().copied().collect(),
            steps,
            final_knowledge: knowledge.clone(),
            excluded: knowledge.excluded_count(),
            unknown: knowledge.unknown_count(),
            clause_count: finder.session().clause_count(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Envelopes the run wrongly excluded. Empty for a sound run.
    pub fn soundness_violations(&self) -> Vec<Cell> {
        self.envelopes
            .iter()
            .copied()
            .filter(|cell| self.final_knowledge.is_excluded(*cell))
            .collect()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.steps {
            write!(f, "Step {}: ", report.step)?;
            match &report.reading {
                Some(reading) => writeln!(
                    f,
                    "{}, reading {reading}, {} newly excluded",
                    describe_move(report),
                    report.newly_excluded.len()
                )?,
                None => writeln!(f, "{}, no reading", describe_move(report))?,
            }
            writeln!(f, "{}", report.knowledge)?;
        }
        write!(
            f,
            "{} world: {} excluded, {} unknown, {} clauses asserted",
            self.dimension, self.excluded, self.unknown, self.clause_count
        )
    }
}

fn describe_move(report: &StepReport) -> String {
    match &report.movement {
        MoveOutcome::Moved(cell) => format!("moved to {cell}"),
        MoveOutcome::Rejected(position) => format!("move to {position} rejected"),
        MoveOutcome::NoStepsLeft => "no steps left".to_string(),
    }
}

/// A step whose knowledge differs from the stored snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotMismatch {
    pub step: usize,
    pub expected: Option<KnowledgeGrid>,
    pub actual: Option<KnowledgeGrid>,
}

impl fmt::Display for SnapshotMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Step {} differs.", self.step)?;
        match &self.expected {
            Some(grid) => writeln!(f, "expected:\n{grid}")?,
            None => writeln!(f, "expected: no snapshot")?,
        }
        match &self.actual {
            Some(grid) => write!(f, "actual:\n{grid}"),
            None => write!(f, "actual: step not run"),
        }
    }
}

/// Compare the knowledge after each step with the expected snapshots.
pub fn compare_snapshots(
    reports: &[StepReport],
    expected: &[KnowledgeGrid],
) -> Vec<SnapshotMismatch> {
    let len = reports.len().max(expected.len());
    (0..len)
        .filter_map(|i| {
            let actual = reports.get(i).map(|r| &r.knowledge);
            let wanted = expected.get(i);
            if actual == wanted {
                None
            } else {
                Some(SnapshotMismatch {
                    step: i + 1,
                    expected: wanted.cloned(),
                    actual: actual.cloned(),
                })
            }
        })
        .collect()
}
