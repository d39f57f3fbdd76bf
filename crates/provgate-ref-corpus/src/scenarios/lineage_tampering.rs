//! Scenario: lineage tampering.
//!
//! A record issued for other content is edited in transit: the content hash
//! is overwritten and the author changed.  It arrives as a loose mapping, so
//! it is parsed before verification.  The hash check rejects it.

use provgate_contracts::{detail::DetailValue, error::GateResult};
use provgate_lineage::create_signed_record;

use crate::{
    corpus::{ATTACKER, AUTHOR, ORIGINAL_APPROVED_TEXT, SOURCE, TAMPERED_TEXT},
    gate::Gate,
    report::ScenarioOutcome,
};

pub const DOCUMENT_ID: &str = "doc-lineage-attack";

pub fn run_scenario(gate: &Gate) -> GateResult<ScenarioOutcome> {
    let record = create_signed_record(
        &gate.signer,
        DOCUMENT_ID,
        ORIGINAL_APPROVED_TEXT,
        AUTHOR,
        SOURCE,
        None,
        1,
    );

    let mut tampered = record.to_detail();
    if let DetailValue::Map(fields) = &mut tampered {
        fields.insert("author".to_string(), DetailValue::from(ATTACKER));
        fields.insert("content_hash".to_string(), DetailValue::from("DEADBEEF"));
    }

    let verdict = gate.pipeline.process_document(
        DOCUMENT_ID,
        TAMPERED_TEXT,
        Some(tampered.into()),
        Some([("scenario".to_string(), DetailValue::from("lineage-tampering"))].into()),
    )?;

    let outcome = ScenarioOutcome {
        title: "ATTACKER A: LINEAGE TAMPERING",
        document_id: DOCUMENT_ID.to_string(),
        verdict,
    };
    outcome.print();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use provgate_contracts::ingest::IngestStatus;
    use provgate_lineage::verifier::REASON_HASH_MISMATCH;

    use super::{run_scenario, DOCUMENT_ID};
    use crate::gate::testing::{events_for, test_gate};

    #[test]
    fn test_tampered_lineage_quarantined() {
        let (gate, audit, _dir) = test_gate();
        let outcome = run_scenario(&gate).unwrap();

        assert_eq!(outcome.verdict.status, IngestStatus::Quarantined);
        assert_eq!(outcome.verdict.reason, REASON_HASH_MISMATCH);
        assert!(outcome.verdict.scores.is_none(), "scanner must not run");

        let bundle = outcome.verdict.bundle_path.unwrap();
        let lineage = fs::read_to_string(bundle.join("lineage_record.json")).unwrap();
        assert!(lineage.contains("DEADBEEF"));
        assert!(lineage.contains("attacker"));
        assert!(!bundle.join("detection_scores.json").exists());

        assert_eq!(
            events_for(&audit.entries(), DOCUMENT_ID),
            vec![
                ("ingest_start".to_string(), "start".to_string()),
                ("lineage_fail".to_string(), "lineage".to_string()),
            ]
        );
    }
}
