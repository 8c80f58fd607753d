use crate::normalize_word;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("Cannot compare empty embedding vectors")]
    EmptyVector,
    #[error("Embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
    #[error("Embedding vector has zero norm")]
    ZeroNorm,
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Raw cosine similarity in [-1, 1], accumulated in f64.
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, ScoringError> {
        if a.is_empty() || b.is_empty() {
            return Err(ScoringError::EmptyVector);
        }
        if a.len() != b.len() {
            return Err(ScoringError::DimensionMismatch {
                left: a.len(),
                right: b.len(),
            });
        }

        let mut dot = 0.0f64;
        let mut norm_a = 0.0f64;
        let mut norm_b = 0.0f64;
        for (&x, &y) in a.iter().zip(b) {
            let (x, y) = (x as f64, y as f64);
            dot += x * y;
            norm_a += x * x;
            norm_b += y * y;
        }

        let denominator = norm_a.sqrt() * norm_b.sqrt();
        if denominator == 0.0 || !denominator.is_finite() {
            return Err(ScoringError::ZeroNorm);
        }

        Ok(dot / denominator)
    }

    /// Cosine similarity clamped into [0, 1].
    pub fn similarity(a: &[f32], b: &[f32]) -> Result<f64, ScoringError> {
        let raw = Self::cosine_similarity(a, b)?;
        Ok(raw.clamp(0.0, 1.0))
    }

    /// 0 for the target word itself, 1 for anything else. No vocabulary
    /// ranking is computed.
    pub fn rank(guess: &str, target: &str) -> u32 {
        if Self::is_exact_match(guess, target) {
            0
        } else {
            1
        }
    }

    pub fn is_exact_match(guess: &str, target: &str) -> bool {
        normalize_word(guess) == normalize_word(target)
    }

    /// Precision stored on recorded attempts.
    pub fn round_similarity(similarity: f64) -> f64 {
        (similarity * 1_000_000.0).round() / 1_000_000.0
    }
}
