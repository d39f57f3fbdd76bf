//! # provgate-lineage
//!
//! Provenance records for documents entering the corpus.
//!
//! - [`record::create_lineage_record`] stamps a new version of a document
//!   with its content hash.
//! - [`signer::HmacSigner`] signs the record's core payload with a
//!   process-held secret.
//! - [`verifier::LineageVerifier`] implements
//!   [`provgate_core::traits::LineageCheck`]: content hash first, then
//!   signature.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use provgate_lineage::{create_signed_record, HmacSigner, LineageVerifier};
//! use provgate_core::traits::LineageCheck;
//!
//! let signer = HmacSigner::new(b"super-secret-key");
//! let record = create_signed_record(&signer, "doc-1", content, "security-team", "confluence", None, 1);
//!
//! let report = LineageVerifier::new(signer).verify_record(&record, content);
//! assert!(report.passed);
//! ```

pub mod record;
pub mod signer;
pub mod verifier;

pub use record::{create_lineage_record, create_signed_record, sign_record, CREATED_AT_FORMAT};
pub use signer::HmacSigner;
pub use verifier::LineageVerifier;

// ── Tests ─────────────────────────────────────────────────────────────────────
