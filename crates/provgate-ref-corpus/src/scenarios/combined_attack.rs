//! Scenario: combined attack.
//!
//! Hostile text under a tampered record originally issued for benign text.
//! The lineage check fires first, so the scanner never sees the content.

use provgate_contracts::{detail::DetailValue, error::GateResult};
use provgate_lineage::create_signed_record;

use crate::{
    corpus::{ATTACKER, AUTHOR, BENIGN_TEXT, COMBINED_TEXT, SOURCE},
    gate::Gate,
    report::ScenarioOutcome,
};

pub const DOCUMENT_ID: &str = "doc-combined-attack";

pub fn run_scenario(gate: &Gate) -> GateResult<ScenarioOutcome> {
    let mut record = create_signed_record(&gate.signer, DOCUMENT_ID, BENIGN_TEXT, AUTHOR, SOURCE, None, 1);
    record.author = ATTACKER.to_string();
    record.content_hash = "BADC0FFEE".to_string();

    let verdict = gate.pipeline.process_document(
        DOCUMENT_ID,
        COMBINED_TEXT,
        Some(record.into()),
        Some([("scenario".to_string(), DetailValue::from("combined-attack"))].into()),
    )?;

    let outcome = ScenarioOutcome {
        title: "ATTACKER C: COMBINED ATTACK",
        document_id: DOCUMENT_ID.to_string(),
        verdict,
    };
    outcome.print();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use provgate_contracts::ingest::IngestStatus;
    use provgate_lineage::verifier::REASON_HASH_MISMATCH;

    use super::run_scenario;
    use crate::gate::testing::test_gate;

    #[test]
    fn test_combined_attack_blocked_at_lineage() {
        let (gate, _audit, _dir) = test_gate();
        let outcome = run_scenario(&gate).unwrap();

        assert_eq!(outcome.verdict.status, IngestStatus::Quarantined);
        assert_eq!(outcome.verdict.reason, REASON_HASH_MISMATCH);
        assert!(outcome.verdict.scores.is_none());
        assert!(outcome.lineage_blocked());
        assert!(!outcome.semantic_blocked());
    }
}
