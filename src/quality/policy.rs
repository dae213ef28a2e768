use serde::{Deserialize, Serialize};

use crate::portfolio::MIN_SUBSTRING_MATCH_CHARS;

use super::ScoreLevel;

pub const COLLISION_WARNING_RATIO: f64 = 0.30;
pub const ONE_TO_ONE_WARNING_RATIO: f64 = 0.70;
pub const ONE_TO_ONE_INFO_RATIO: f64 = 0.50;
pub const FLAGGED_NAME_WARNING_RATIO: f64 = 0.30;
pub const OVERLAP_KEYWORD_RATIO: f64 = 0.50;
pub const OVERLAP_PENALTY_PER_FINDING: u32 = 20;
pub const OVERLAP_MAX_PENALTY: u32 = 60;
pub const L2_DIVERSITY_WARNING_RATIO: f64 = 0.50;
pub const L2_DIVERSITY_INFO_RATIO: f64 = 0.25;
pub const L2_DIVERSITY_MAX_PENALTY: f64 = 80.0;
pub const L3_CV_WARNING: f64 = 1.5;
pub const L3_CV_INFO: f64 = 0.8;
pub const L3_EMPTY_COMPONENT_WARNING_RATIO: f64 = 0.50;
pub const L3_CV_PENALTY: f64 = 50.0;
pub const GOOD_SCORE_MIN: u32 = 80;
pub const WARNING_SCORE_MIN: u32 = 60;

/// Words that mark a name as a value-delivery category rather than a product.
pub const POSITIVE_SIGNAL_WORDS: &[&str] = &[
    "transformation",
    "processing",
    "delivery",
    "management",
    "exchange",
    "integration",
    "operations",
    "storage",
    "analytics",
    "orchestration",
    "distribution",
    "optimization",
    "synthesis",
    "acquisition",
    "generation",
    "monitoring",
    "circulation",
    "assembly",
    "connection",
    "service",
    "discovery",
    "creation",
    "intelligence",
    "automation",
    "governance",
    "engagement",
    "enablement",
    "coordination",
    "knowledge",
];

/// Tunable thresholds for the quality checks. Missing fields in a policy
/// file keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityPolicy {
    pub collision_warning_ratio: f64,
    pub min_substring_match_chars: usize,
    pub one_to_one_warning_ratio: f64,
    pub one_to_one_info_ratio: f64,
    pub flagged_name_warning_ratio: f64,
    pub positive_signal_words: Vec<String>,
    pub overlap_keyword_ratio: f64,
    pub overlap_penalty_per_finding: u32,
    pub overlap_max_penalty: u32,
    pub l2_diversity_warning_ratio: f64,
    pub l2_diversity_info_ratio: f64,
    pub l2_diversity_max_penalty: f64,
    pub l3_cv_warning: f64,
    pub l3_cv_info: f64,
    pub l3_empty_component_warning_ratio: f64,
    pub l3_cv_penalty: f64,
    pub good_score_min: u32,
    pub warning_score_min: u32,
}

impl Default for QualityPolicy {
    fn default() -> Self {
        Self {
            collision_warning_ratio: COLLISION_WARNING_RATIO,
            min_substring_match_chars: MIN_SUBSTRING_MATCH_CHARS,
            one_to_one_warning_ratio: ONE_TO_ONE_WARNING_RATIO,
            one_to_one_info_ratio: ONE_TO_ONE_INFO_RATIO,
            flagged_name_warning_ratio: FLAGGED_NAME_WARNING_RATIO,
            positive_signal_words: POSITIVE_SIGNAL_WORDS
                .iter()
                .map(|word| word.to_string())
                .collect(),
            overlap_keyword_ratio: OVERLAP_KEYWORD_RATIO,
            overlap_penalty_per_finding: OVERLAP_PENALTY_PER_FINDING,
            overlap_max_penalty: OVERLAP_MAX_PENALTY,
            l2_diversity_warning_ratio: L2_DIVERSITY_WARNING_RATIO,
            l2_diversity_info_ratio: L2_DIVERSITY_INFO_RATIO,
            l2_diversity_max_penalty: L2_DIVERSITY_MAX_PENALTY,
            l3_cv_warning: L3_CV_WARNING,
            l3_cv_info: L3_CV_INFO,
            l3_empty_component_warning_ratio: L3_EMPTY_COMPONENT_WARNING_RATIO,
            l3_cv_penalty: L3_CV_PENALTY,
            good_score_min: GOOD_SCORE_MIN,
            warning_score_min: WARNING_SCORE_MIN,
        }
    }
}

impl QualityPolicy {
    pub fn score_level(&self, score: u32) -> ScoreLevel {
        if score >= self.good_score_min {
            ScoreLevel::Good
        } else if score >= self.warning_score_min {
            ScoreLevel::Warning
        } else {
            ScoreLevel::Alert
        }
    }
}
