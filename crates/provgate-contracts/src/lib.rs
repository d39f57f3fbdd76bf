//! # provgate-contracts
//!
//! Shared types, canonical encoding, and error contracts for the provenance
//! gate.
//!
//! All crates in the workspace import from here.  Apart from the canonical
//! encoder and the lineage parser, no logic lives in this crate: only data
//! definitions and error types.

pub mod canonical;
pub mod detail;
pub mod digest;
pub mod error;
pub mod ingest;
pub mod lineage;

pub use detail::{DetailValue, Details};
pub use error::{GateError, GateResult};
