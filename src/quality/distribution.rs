use crate::model::{Layer, ValueModelSet};

use super::{CheckId, NO_PRODUCT_TRACK, QualityCheckResult, QualityPolicy, WarningLevel};

const MIN_COMPARABLE_COMPONENTS: usize = 2;

/// Spread of sub-component counts across the components of one layer.
#[derive(Debug, Clone, PartialEq)]
struct LayerSpread {
    counts: Vec<usize>,
    mean: f64,
    cv: f64,
}

impl LayerSpread {
    /// `None` when the layer has no sub-components at all.
    fn of(layer: &Layer) -> Option<Self> {
        let counts = layer
            .components
            .iter()
            .map(|component| component.sub_components().len())
            .collect::<Vec<usize>>();
        let total = counts.iter().sum::<usize>();
        if total == 0 {
            return None;
        }

        let n = counts.len() as f64;
        let mean = total as f64 / n;
        let variance = counts
            .iter()
            .map(|count| (*count as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        Some(Self {
            mean,
            cv: variance.sqrt() / mean,
            counts,
        })
    }

    fn empty_ratio(&self) -> f64 {
        let empty = self.counts.iter().filter(|count| **count == 0).count();
        empty as f64 / self.counts.len() as f64
    }

    fn summary(&self) -> String {
        let min = self.counts.iter().min().copied().unwrap_or(0);
        let max = self.counts.iter().max().copied().unwrap_or(0);
        format!(
            "L3 count range: {min} to {max} (mean: {:.1}, CV: {:.2})",
            self.mean, self.cv
        )
    }
}

/// Scores how evenly sub-components are spread across sibling components.
pub fn check_l3_distribution(set: &ValueModelSet, policy: &QualityPolicy) -> QualityCheckResult {
    let check = CheckId::L3Distribution;
    let Some(product) = set.product() else {
        return QualityCheckResult::skipped(check, NO_PRODUCT_TRACK);
    };

    let qualifying = product
        .layers
        .iter()
        .filter(|layer| layer.components.len() >= MIN_COMPARABLE_COMPONENTS)
        .collect::<Vec<&Layer>>();
    if qualifying.is_empty() {
        return QualityCheckResult::skipped(check, "no L1 layer has two or more L2 components");
    }

    let any_sub_components = product
        .layers
        .iter()
        .flat_map(|layer| &layer.components)
        .any(|component| !component.sub_components().is_empty());
    if !any_sub_components {
        return QualityCheckResult::skipped(check, "no L2 component has sub-components");
    }

    let spreads = qualifying
        .iter()
        .filter_map(|layer| LayerSpread::of(layer).map(|spread| (*layer, spread)))
        .collect::<Vec<(&Layer, LayerSpread)>>();
    if spreads.is_empty() {
        return QualityCheckResult::skipped(
            check,
            "no L1 layer with two or more components has sub-components",
        );
    }

    let layer_scores = spreads
        .iter()
        .map(|(_, spread)| (100.0 - policy.l3_cv_penalty * spread.cv).clamp(0.0, 100.0))
        .sum::<f64>();
    let mut result = QualityCheckResult::scored(check, layer_scores / spreads.len() as f64);

    for (layer, spread) in &spreads {
        if spread.cv > policy.l3_cv_warning
            || spread.empty_ratio() > policy.l3_empty_component_warning_ratio
        {
            let mut details = vec![spread.summary()];
            details.extend(
                layer
                    .components
                    .iter()
                    .filter(|component| component.sub_components().is_empty())
                    .map(|component| format!("L2 '{}' has no sub-components", component.name)),
            );
            result.warn(
                WarningLevel::Warning,
                format!(
                    "L3 sub-components in L1 '{}' are unevenly distributed (CV={:.2}). Some L2 components may be product feature dumps while others are hollow.",
                    layer.name, spread.cv
                ),
                details,
            );
        } else if spread.cv > policy.l3_cv_info {
            result.warn(
                WarningLevel::Info,
                format!(
                    "L3 distribution in L1 '{}' is moderately uneven (CV={:.2}). Consider whether all L2 components have appropriate sub-component granularity.",
                    layer.name, spread.cv
                ),
                vec![spread.summary()],
            );
        }
    }
    result
}
