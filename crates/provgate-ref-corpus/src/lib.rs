//! # provgate-ref-corpus
//!
//! Reference scenarios for the provenance gate.
//!
//! Five documents are pushed through a fully wired gate (HMAC lineage
//! verifier, baseline scanner, filesystem quarantine, hash-chained audit
//! log):
//!
//! 1. **Clean document**: valid lineage, baseline content, accepted.
//! 2. **Lineage tampering**: edited record, rejected on content hash.
//! 3. **Semantic poisoning**: valid lineage, hostile content, rejected by the
//!    scanner.
//! 4. **Malformed lineage**: incomplete payload, rejected while parsing.
//! 5. **Combined attack**: tampered record over hostile content, rejected on
//!    lineage before scanning.
//!
//! All text is fictional.  No external systems are contacted.

pub mod corpus;
pub mod gate;
pub mod report;
pub mod scenarios;

pub use gate::Gate;
pub use report::{ScenarioOutcome, Summary};
