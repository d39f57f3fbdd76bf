//! Reference scenarios.
//!
//! Each scenario submits one document through a shared [`Gate`] and prints
//! the verdict.  Together they cover every terminal path of the pipeline.

pub mod clean;
pub mod combined_attack;
pub mod lineage_tampering;
pub mod malformed_lineage;
pub mod semantic_poisoning;

use provgate_contracts::error::GateResult;

use crate::{
    gate::Gate,
    report::{ScenarioOutcome, Summary},
};

/// Run every scenario in order and print the tally.
pub fn run_all(gate: &Gate) -> GateResult<Summary> {
    let outcomes: Vec<ScenarioOutcome> = vec![
        clean::run_scenario(gate)?,
        lineage_tampering::run_scenario(gate)?,
        semantic_poisoning::run_scenario(gate)?,
        malformed_lineage::run_scenario(gate)?,
        combined_attack::run_scenario(gate)?,
    ];

    let summary = Summary::tally(&outcomes);
    summary.print();
    Ok(summary)
}
