//! Quality assessment: six independent heuristic checks over the Product
//! track, each scored 0-100 or skipped, aggregated into one report.

mod collision;
mod distribution;
mod diversity;
mod mapping;
mod naming;
mod overlap;
pub mod policy;


use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::model::ValueModelSet;
use crate::portfolio::{FeatureContributions, PortfolioNames};

pub use collision::check_product_name_collisions;
pub use distribution::check_l3_distribution;
pub use diversity::check_l2_diversity;
pub use mapping::check_one_to_one_mapping;
pub use naming::{check_layer_name_heuristics, has_positive_signal, looks_like_product_name};
pub use overlap::check_multi_file_overlap;
pub use policy::QualityPolicy;

const NO_PRODUCT_TRACK: &str = "no Product track value model";
const SCORE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    ProductNameCollision,
    OneToOneMapping,
    LayerNameHeuristic,
    MultiFileOverlap,
    L2Diversity,
    L3Distribution,
}

impl CheckId {
    /// Report order.
    pub const ALL: [CheckId; 6] = [
        CheckId::ProductNameCollision,
        CheckId::OneToOneMapping,
        CheckId::LayerNameHeuristic,
        CheckId::MultiFileOverlap,
        CheckId::L2Diversity,
        CheckId::L3Distribution,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProductNameCollision => "product_name_collision",
            Self::OneToOneMapping => "one_to_one_mapping",
            Self::LayerNameHeuristic => "layer_name_heuristic",
            Self::MultiFileOverlap => "multi_file_overlap",
            Self::L2Diversity => "l2_diversity",
            Self::L3Distribution => "l3_distribution",
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WarningLevel {
    Info,
    Warning,
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityWarning {
    pub check: CheckId,
    pub level: WarningLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

/// Outcome of one check. `score` is `None` exactly when `skipped` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityCheckResult {
    pub check: CheckId,
    pub score: Option<u32>,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub warnings: Vec<QualityWarning>,
}

impl QualityCheckResult {
    pub fn skipped(check: CheckId, reason: impl Into<String>) -> Self {
        Self {
            check,
            score: None,
            skipped: true,
            reason: Some(reason.into()),
            warnings: Vec::new(),
        }
    }

    /// Scored result; `raw` is floored and clamped to 0..=100.
    pub fn scored(check: CheckId, raw: f64) -> Self {
        Self {
            check,
            score: Some(score_from(raw)),
            skipped: false,
            reason: None,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, level: WarningLevel, message: String, details: Vec<String>) {
        self.warnings.push(QualityWarning {
            check: self.check,
            level,
            message,
            details,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreLevel {
    Good,
    Warning,
    Alert,
}

impl fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Alert => "alert",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub models_analyzed: usize,
    pub overall_score: u32,
    pub score_level: ScoreLevel,
    pub checks: Vec<QualityCheckResult>,
    pub warnings: Vec<QualityWarning>,
}

impl QualityReport {
    pub fn check(&self, id: CheckId) -> Option<&QualityCheckResult> {
        self.checks.iter().find(|result| result.check == id)
    }

    pub fn count_level(&self, level: WarningLevel) -> usize {
        self.warnings
            .iter()
            .filter(|warning| warning.level == level)
            .count()
    }
}

pub fn assess_quality(
    set: &ValueModelSet,
    portfolio: Option<&PortfolioNames>,
    contributions: Option<&FeatureContributions>,
) -> QualityReport {
    assess_quality_with_policy(set, portfolio, contributions, &QualityPolicy::default())
}

pub fn assess_quality_with_policy(
    set: &ValueModelSet,
    portfolio: Option<&PortfolioNames>,
    contributions: Option<&FeatureContributions>,
    policy: &QualityPolicy,
) -> QualityReport {
    let (models_analyzed, checks) = if set.product().is_none() {
        let checks = CheckId::ALL
            .iter()
            .map(|check| QualityCheckResult::skipped(*check, NO_PRODUCT_TRACK))
            .collect::<Vec<QualityCheckResult>>();
        (0, checks)
    } else {
        let checks = vec![
            check_product_name_collisions(set, portfolio, policy),
            check_one_to_one_mapping(contributions, policy),
            check_layer_name_heuristics(set, policy),
            check_multi_file_overlap(set, policy),
            check_l2_diversity(set, policy),
            check_l3_distribution(set, policy),
        ];
        (set.models_with_layers(), checks)
    };

    for result in &checks {
        debug!(
            check = %result.check,
            score = ?result.score,
            skipped = result.skipped,
            warnings = result.warnings.len(),
            "quality check finished"
        );
    }

    let scores = checks
        .iter()
        .filter_map(|result| result.score)
        .collect::<Vec<u32>>();
    let overall_score = if scores.is_empty() {
        100
    } else {
        score_from(scores.iter().map(|score| f64::from(*score)).sum::<f64>() / scores.len() as f64)
    };

    let warnings = checks
        .iter()
        .flat_map(|result| result.warnings.iter().cloned())
        .collect::<Vec<QualityWarning>>();

    QualityReport {
        models_analyzed,
        overall_score,
        score_level: policy.score_level(overall_score),
        checks,
        warnings,
    }
}

fn score_from(raw: f64) -> u32 {
    if raw.is_nan() {
        return 0;
    }
    (raw + SCORE_EPSILON).floor().clamp(0.0, 100.0) as u32
}

fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}
