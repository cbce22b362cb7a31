use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Cosine,
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Cosine => write!(f, "cosine"),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cosine" => Ok(DistanceMetric::Cosine),
            _ => Err(format!("Unknown distance metric: {s}")),
        }
    }
}

/// Cosine distance `1 - cos(a, b)` in `[0, 2]`.
///
/// A zero-norm operand has no direction, so it sits at distance 1 from
/// everything (score 0). Non-finite input lands there too.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 1.0;
    }
    let distance = 1.0 - dot / denom;
    if !distance.is_finite() {
        return 1.0;
    }
    distance.clamp(0.0, 2.0)
}

/// Maps a cosine distance in `[0, 2]` to a similarity score in `[-1, 1]`
/// (1 = identical, 0 = orthogonal, -1 = opposite). The score is the cosine
/// similarity itself.
pub fn distance_to_score(distance: f64) -> f64 {
    1.0 - distance
}
