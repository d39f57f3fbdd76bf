//! Scenario: clean document.
//!
//! A correctly signed record over unchanged content that matches the
//! baseline.  Every stage passes and the document is accepted.

use provgate_contracts::{detail::DetailValue, error::GateResult};
use provgate_lineage::create_signed_record;

use crate::{
    corpus::{AUTHOR, CLEAN_TEXT, SOURCE},
    gate::Gate,
    report::ScenarioOutcome,
};

pub const DOCUMENT_ID: &str = "doc-clean";

pub fn run_scenario(gate: &Gate) -> GateResult<ScenarioOutcome> {
    let record = create_signed_record(&gate.signer, DOCUMENT_ID, CLEAN_TEXT, AUTHOR, SOURCE, None, 1);

    let verdict = gate.pipeline.process_document(
        DOCUMENT_ID,
        CLEAN_TEXT,
        Some(record.into()),
        Some([("scenario".to_string(), DetailValue::from("clean"))].into()),
    )?;

    let outcome = ScenarioOutcome {
        title: "CLEAN DOCUMENT",
        document_id: DOCUMENT_ID.to_string(),
        verdict,
    };
    outcome.print();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use provgate_contracts::ingest::IngestStatus;
    use provgate_core::pipeline::REASON_ACCEPTED;

    use super::{run_scenario, DOCUMENT_ID};
    use crate::gate::testing::{events_for, test_gate};

    #[test]
    fn test_clean_document_accepted() {
        let (gate, audit, _dir) = test_gate();
        let outcome = run_scenario(&gate).unwrap();

        assert_eq!(outcome.verdict.status, IngestStatus::Accepted);
        assert_eq!(outcome.verdict.reason, REASON_ACCEPTED);
        assert!(outcome.verdict.bundle_path.is_none());
        assert!(!outcome.verdict.scores.as_ref().unwrap().is_suspicious);

        let events: Vec<String> = events_for(&audit.entries(), DOCUMENT_ID)
            .into_iter()
            .map(|(event, _)| event)
            .collect();
        assert_eq!(events, vec!["ingest_start", "lineage_ok", "semantic_ok", "accept"]);
    }
}
