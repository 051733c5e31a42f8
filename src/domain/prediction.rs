// ============================================================
// Layer 3 — Prediction Domain Type
// ============================================================
// Represents the model's answer for one image: a probability
// distribution over the ten digit classes.
//
// The classifier's final layer outputs log-probabilities
// (log-softmax). By the time a Prediction is constructed the
// log has been undone, so this type always holds plain
// probabilities that sum to ~1.
//
// Example:
//   probabilities: [0.01, 0.02, 0.90, ...]
//   predicted_class() → 2
//   confidence()      → 0.90
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// Number of digit classes (0 through 9)
pub const NUM_CLASSES: usize = 10;

/// A probability distribution over the ten digit classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// probabilities[d] is the model's belief that the image shows digit d.
    /// Non-negative, length 10, sums to ~1.
    pub probabilities: Vec<f64>,
}

impl Prediction {
    /// Create a new Prediction.
    ///
    /// # Panics
    /// Panics if the distribution is malformed: wrong length,
    /// negative or non-finite entries, or a sum far from 1.
    /// A malformed distribution means the model output was
    /// mishandled upstream, which should fail loudly.
    pub fn new(probabilities: Vec<f64>) -> Self {
        assert_eq!(
            probabilities.len(),
            NUM_CLASSES,
            "expected {} class probabilities, got {}",
            NUM_CLASSES,
            probabilities.len()
        );
        assert!(
            probabilities.iter().all(|p| p.is_finite() && *p >= 0.0),
            "probabilities must be finite and non-negative"
        );
        let sum: f64 = probabilities.iter().sum();
        assert!(
            (sum - 1.0).abs() < 1e-3,
            "probabilities sum to {sum}, expected ~1"
        );
        Self { probabilities }
    }

    /// The digit the model considers most likely (argmax).
    pub fn predicted_class(&self) -> usize {
        let mut best      = 0usize;
        let mut best_prob = f64::NEG_INFINITY;

        for (digit, &prob) in self.probabilities.iter().enumerate() {
            if prob > best_prob {
                best_prob = prob;
                best      = digit;
            }
        }
        best
    }

    /// The probability assigned to the predicted class.
    pub fn confidence(&self) -> f64 {
        self.probabilities[self.predicted_class()]
    }

    /// The k most likely digits, most likely first.
    /// Returns (digit, probability) pairs.
    pub fn top_k(&self, k: usize) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = self
            .probabilities
            .iter()
            .copied()
            .enumerate()
            .collect();

        // Descending by probability. Probabilities are finite
        // (checked in new), so partial_cmp cannot fail.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        ranked.truncate(k.min(NUM_CLASSES));
        ranked
    }

    /// True when the given label matches the predicted class.
    pub fn is_correct(&self, label: u8) -> bool {
        self.predicted_class() == label as usize
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn mostly_seven() -> Prediction {
        let mut probs = vec![0.02; NUM_CLASSES];
        probs[7] = 0.82;
        Prediction::new(probs)
    }

    #[test]
    fn test_predicted_class_is_argmax() {
        assert_eq!(mostly_seven().predicted_class(), 7);
    }

    #[test]
    fn test_confidence_matches_argmax_probability() {
        assert!((mostly_seven().confidence() - 0.82).abs() < 1e-9);
    }

    #[test]
    fn test_top_k_is_sorted_descending() {
        let top = mostly_seven().top_k(3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].0, 7);
        assert!(top[0].1 >= top[1].1);
        assert!(top[1].1 >= top[2].1);
    }

    #[test]
    fn test_top_k_clamps_to_class_count() {
        assert_eq!(mostly_seven().top_k(100).len(), NUM_CLASSES);
    }

    #[test]
    fn test_is_correct() {
        let p = mostly_seven();
        assert!(p.is_correct(7));
        assert!(!p.is_correct(3));
    }

    #[test]
    #[should_panic]
    fn test_rejects_distribution_not_summing_to_one() {
        let _ = Prediction::new(vec![0.5; NUM_CLASSES]);
    }

    #[test]
    #[should_panic]
    fn test_rejects_wrong_length() {
        let _ = Prediction::new(vec![0.5, 0.5]);
    }
}
