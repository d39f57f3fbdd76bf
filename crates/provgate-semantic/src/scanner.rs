//! Baseline-distance anomaly scorer.
//!
//! A document is compared to a set of known-clean reference texts:
//!
//! - `semantic_score`: cosine distance to the reference centroid.
//! - `cluster_distance`: mean cosine distance to each reference.
//! - `total_score`: `alpha * semantic_score + (1 - alpha) * cluster_distance`.
//!
//! The document is suspicious when `total_score` exceeds the threshold.

use tracing::{debug, warn};

use provgate_config::ScannerConfig;
use provgate_contracts::{
    detail::DetailValue,
    error::{GateError, GateResult},
    ingest::ScanVerdict,
};
use provgate_core::traits::AnomalyScorer;

use crate::vector::TermVector;

/// Scores documents by lexical distance from a clean baseline.
///
/// Immutable once built; the baseline cannot drift between calls.
#[derive(Debug, Clone)]
pub struct BaselineScanner {
    threshold: f64,
    alpha: f64,
    references: Vec<TermVector>,
    centroid: TermVector,
}

impl BaselineScanner {
    /// Build a scanner from reference texts.
    ///
    /// Returns `GateError::ConfigError` when `alpha` is outside `[0, 1]`, the
    /// threshold is not finite, or no reference text contains a term.
    pub fn new<S: AsRef<str>>(reference_texts: &[S], threshold: f64, alpha: f64) -> GateResult<Self> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(GateError::ConfigError {
                reason: format!("alpha must be within [0, 1], got {}", alpha),
            });
        }
        if !threshold.is_finite() {
            return Err(GateError::ConfigError {
                reason: format!("threshold must be finite, got {}", threshold),
            });
        }

        let references: Vec<TermVector> = reference_texts
            .iter()
            .map(|t| TermVector::embed(t.as_ref()))
            .filter(|v| !v.is_zero())
            .collect();
        if references.is_empty() {
            return Err(GateError::ConfigError {
                reason: "baseline needs at least one reference text with terms".to_string(),
            });
        }

        let centroid = TermVector::centroid(&references);
        debug!(references = references.len(), threshold, alpha, "baseline scanner built");
        Ok(Self {
            threshold,
            alpha,
            references,
            centroid,
        })
    }

    pub fn from_config(config: &ScannerConfig) -> GateResult<Self> {
        Self::new(&config.reference_texts, config.threshold, config.alpha)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score an already-embedded document.
    pub fn compute_scores(&self, document: &TermVector) -> ScanVerdict {
        let semantic_score = document.cosine_distance(&self.centroid);
        let cluster_distance = self
            .references
            .iter()
            .map(|r| document.cosine_distance(r))
            .sum::<f64>()
            / self.references.len() as f64;
        let total_score = self.alpha * semantic_score + (1.0 - self.alpha) * cluster_distance;

        ScanVerdict {
            is_suspicious: total_score > self.threshold,
            scores: [
                ("semantic_score", semantic_score),
                ("cluster_distance", cluster_distance),
                ("total_score", total_score),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), DetailValue::Float(v)))
            .collect(),
        }
    }
}

impl AnomalyScorer for BaselineScanner {
    fn detect(&self, text: &str) -> GateResult<ScanVerdict> {
        let verdict = self.compute_scores(&TermVector::embed(text));

        if let Some((name, _)) = verdict
            .scores
            .iter()
            .find(|(_, v)| matches!(v, DetailValue::Float(f) if !f.is_finite()))
        {
            return Err(GateError::ScorerFailed {
                reason: format!("{} is not finite", name),
            });
        }

        if verdict.is_suspicious {
            warn!(scores = ?verdict.scores, "document deviates from baseline");
        } else {
            debug!(scores = ?verdict.scores, "document within baseline");
        }
        Ok(verdict)
    }
}
