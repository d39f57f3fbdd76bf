//! Sparse term-frequency vectors.

use std::collections::BTreeMap;

/// Floor applied to a vector's norm before dividing by it.
const NORM_FLOOR: f64 = 1e-8;

/// An L2-normalised bag of lowercase alphanumeric terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: BTreeMap<String, f64>,
}

impl TermVector {
    /// Tokenise `text` on non-alphanumeric characters, lowercase, count, and
    /// normalise.  Text with no terms yields the zero vector.
    pub fn embed(text: &str) -> Self {
        let mut counts: BTreeMap<String, f64> = BTreeMap::new();
        for term in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            *counts.entry(term.to_lowercase()).or_insert(0.0) += 1.0;
        }
        Self { weights: counts }.normalized()
    }

    /// Component-wise mean of `vectors`; not renormalised.
    pub fn centroid(vectors: &[TermVector]) -> Self {
        let mut weights: BTreeMap<String, f64> = BTreeMap::new();
        if vectors.is_empty() {
            return Self { weights };
        }
        let n = vectors.len() as f64;
        for v in vectors {
            for (term, w) in &v.weights {
                *weights.entry(term.clone()).or_insert(0.0) += w / n;
            }
        }
        Self { weights }
    }

    pub fn dot(&self, other: &TermVector) -> f64 {
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .filter_map(|(term, w)| large.weights.get(term).map(|o| w * o))
            .sum()
    }

    /// `1 - dot`.  For unit vectors this is the cosine distance.
    pub fn cosine_distance(&self, other: &TermVector) -> f64 {
        1.0 - self.dot(other)
    }

    pub fn is_zero(&self) -> bool {
        self.weights.is_empty()
    }

    fn normalized(mut self) -> Self {
        let norm = self.weights.values().map(|w| w * w).sum::<f64>().sqrt().max(NORM_FLOOR);
        for w in self.weights.values_mut() {
            *w /= norm;
        }
        self
    }
}
