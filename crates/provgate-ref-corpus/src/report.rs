//! Scenario outcomes and the run summary.

use provgate_contracts::ingest::PipelineVerdict;
use provgate_core::pipeline::{REASON_INVALID_LINEAGE, REASON_SEMANTIC_ANOMALY};
use provgate_lineage::verifier::{REASON_BAD_SIGNATURE, REASON_HASH_MISMATCH};

/// One scenario's result.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub title: &'static str,
    pub document_id: String,
    pub verdict: PipelineVerdict,
}

impl ScenarioOutcome {
    /// Rejected for its lineage: unparseable, hash mismatch, or bad
    /// signature.
    pub fn lineage_blocked(&self) -> bool {
        self.verdict.is_quarantined()
            && [REASON_INVALID_LINEAGE, REASON_HASH_MISMATCH, REASON_BAD_SIGNATURE]
                .contains(&self.verdict.reason.as_str())
    }

    pub fn semantic_blocked(&self) -> bool {
        self.verdict.is_quarantined() && self.verdict.reason == REASON_SEMANTIC_ANOMALY
    }

    pub fn print(&self) {
        println!("[{}]", self.title);
        println!("  document_id : {}", self.document_id);
        println!("  status      : {}", self.verdict.status);
        println!("  reason      : {}", self.verdict.reason);
        if let Some(path) = &self.verdict.bundle_path {
            println!("  evidence    : {}", path.display());
        }
        if let Some(scores) = &self.verdict.scores {
            for (name, value) in &scores.scores {
                println!("  {:<12}: {:?}", name, value);
            }
            println!("  suspicious  : {}", scores.is_suspicious);
        }
        println!();
    }
}

/// Counts across a batch of scenario runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub accepted: usize,
    pub quarantined: usize,
    pub lineage_blocked: usize,
    pub semantic_blocked: usize,
}

impl Summary {
    pub fn tally(outcomes: &[ScenarioOutcome]) -> Self {
        Self {
            total: outcomes.len(),
            accepted: outcomes.iter().filter(|o| o.verdict.is_accepted()).count(),
            quarantined: outcomes.iter().filter(|o| o.verdict.is_quarantined()).count(),
            lineage_blocked: outcomes.iter().filter(|o| o.lineage_blocked()).count(),
            semantic_blocked: outcomes.iter().filter(|o| o.semantic_blocked()).count(),
        }
    }

    pub fn print(&self) {
        println!("Summary");
        println!("-------");
        println!("  Total documents : {}", self.total);
        println!("  Accepted        : {}", self.accepted);
        println!("  Quarantined     : {}", self.quarantined);
        println!("  Lineage blocked : {}", self.lineage_blocked);
        println!("  Semantic blocked: {}", self.semantic_blocked);
        println!();
    }
}
