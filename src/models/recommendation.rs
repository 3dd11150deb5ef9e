use serde::{Deserialize, Serialize};

use super::MediaItem;

/// Per-factor similarity values, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct FactorScores {
    pub genre: f64,
    pub rating: f64,
    pub year: f64,
    pub popularity: f64,
    pub keywords: f64,
}

/// A scored candidate together with the reasons it was picked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResult {
    pub item: MediaItem,
    /// Weighted score rounded to two decimals
    pub score: f64,
    pub reasons: Vec<String>,
    pub factors: FactorScores,
}
