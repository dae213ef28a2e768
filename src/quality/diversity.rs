use crate::model::ValueModelSet;

use super::{CheckId, NO_PRODUCT_TRACK, QualityCheckResult, QualityPolicy, WarningLevel, percent};

/// Layers with fewer than this many components count as low diversity.
const MIN_DIVERSE_COMPONENTS: usize = 2;

pub fn check_l2_diversity(set: &ValueModelSet, policy: &QualityPolicy) -> QualityCheckResult {
    let check = CheckId::L2Diversity;
    let Some(product) = set.product() else {
        return QualityCheckResult::skipped(check, NO_PRODUCT_TRACK);
    };
    if product.layers.is_empty() {
        return QualityCheckResult::skipped(check, "Product track has no layers");
    }

    let low_diversity = product
        .layers
        .iter()
        .filter(|layer| layer.components.len() < MIN_DIVERSE_COMPONENTS)
        .map(|layer| {
            format!(
                "L1 '{}' has {} component(s)",
                layer.name,
                layer.components.len()
            )
        })
        .collect::<Vec<String>>();

    let total = product.layers.len();
    let ratio = low_diversity.len() as f64 / total as f64;
    let mut result =
        QualityCheckResult::scored(check, 100.0 - policy.l2_diversity_max_penalty * ratio);

    if ratio > policy.l2_diversity_warning_ratio {
        result.warn(
            WarningLevel::Warning,
            format!(
                "{} of L1 layers have fewer than {MIN_DIVERSE_COMPONENTS} L2 components. Low diversity may indicate layers modeled after individual products.",
                percent(ratio)
            ),
            low_diversity,
        );
    } else if ratio >= policy.l2_diversity_info_ratio {
        result.warn(
            WarningLevel::Info,
            format!(
                "{} of {total} L1 layers have fewer than {MIN_DIVERSE_COMPONENTS} components; consider whether these can be expanded",
                low_diversity.len()
            ),
            low_diversity,
        );
    }
    result
}
