//! Summary statistics over exam scores.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreStats {
    pub count: usize,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    /// Percentage (0 to 100) of scores at or above the pass threshold.
    pub pass_rate: f64,
}

/// `None` for an empty score list.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score_stats(scores: &[f64], threshold: f64) -> Option<ScoreStats> {
    if scores.is_empty() {
        return None;
    }
    let count = scores.len();
    let sum: f64 = scores.iter().sum();
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let passed = scores.iter().filter(|score| **score >= threshold).count();
    Some(ScoreStats {
        count,
        average: sum / count as f64,
        max,
        min,
        pass_rate: passed as f64 * 100.0 / count as f64,
    })
}
