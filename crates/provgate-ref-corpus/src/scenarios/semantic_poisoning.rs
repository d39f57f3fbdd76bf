//! Scenario: semantic poisoning.
//!
//! A trusted author signs hostile instructions.  Lineage is valid; only the
//! scanner stands between the text and the corpus.

use provgate_contracts::{detail::DetailValue, error::GateResult};
use provgate_lineage::create_signed_record;

use crate::{
    corpus::{AUTHOR, POISONED_TEXT, SOURCE},
    gate::Gate,
    report::ScenarioOutcome,
};

pub const DOCUMENT_ID: &str = "doc-semantic-attack";

pub fn run_scenario(gate: &Gate) -> GateResult<ScenarioOutcome> {
    let record = create_signed_record(&gate.signer, DOCUMENT_ID, POISONED_TEXT, AUTHOR, SOURCE, None, 1);

    let verdict = gate.pipeline.process_document(
        DOCUMENT_ID,
        POISONED_TEXT,
        Some(record.into()),
        Some([("scenario".to_string(), DetailValue::from("semantic-poisoning"))].into()),
    )?;

    let outcome = ScenarioOutcome {
        title: "ATTACKER B: SEMANTIC POISONING",
        document_id: DOCUMENT_ID.to_string(),
        verdict,
    };
    outcome.print();
    Ok(outcome)
}
