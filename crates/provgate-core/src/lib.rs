//! # provgate-core
//!
//! The ingestion decision pipeline for the provenance gate.
//!
//! This crate provides:
//! - The four collaborator traits (`LineageCheck`, `AnomalyScorer`,
//!   `EvidenceStore`, `AuditSink`)
//! - The `IngestionPipeline` that sequences them in the trust order
//!
//! ## Usage
//!
//! ```rust,ignore
//! use provgate_core::{IngestionPipeline, traits::{AuditSink, AnomalyScorer}};
//!
//! let pipeline = IngestionPipeline::new(verifier, scorer, quarantine, audit);
//! let verdict = pipeline.process_document("doc-1", content, Some(record.into()), None)?;
//! ```

pub mod pipeline;
pub mod traits;

pub use pipeline::IngestionPipeline;
