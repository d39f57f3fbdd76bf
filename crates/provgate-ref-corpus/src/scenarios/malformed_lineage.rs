//! Scenario: malformed lineage input.
//!
//! The caller supplies a lineage payload missing most required fields.  The
//! gate refuses it while normalizing, before the verifier or scanner is
//! consulted.

use provgate_contracts::{detail::DetailValue, error::GateResult};

use crate::{corpus::MALFORMED_TEXT, gate::Gate, report::ScenarioOutcome};

pub const DOCUMENT_ID: &str = "doc-malformed-lineage";

pub fn run_scenario(gate: &Gate) -> GateResult<ScenarioOutcome> {
    let partial = DetailValue::map([
        ("document_id", DetailValue::from(DOCUMENT_ID)),
        ("author", DetailValue::from("unknown")),
        ("version", DetailValue::from("one")),
    ]);

    let verdict = gate.pipeline.process_document(
        DOCUMENT_ID,
        MALFORMED_TEXT,
        Some(partial.into()),
        None,
    )?;

    let outcome = ScenarioOutcome {
        title: "MALFORMED LINEAGE INPUT",
        document_id: DOCUMENT_ID.to_string(),
        verdict,
    };
    outcome.print();
    Ok(outcome)
}
