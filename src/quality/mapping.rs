use std::collections::BTreeMap;

use crate::portfolio::FeatureContributions;

use super::{CheckId, QualityCheckResult, QualityPolicy, WarningLevel, percent};

struct SingleShare {
    single: usize,
    total: usize,
}

impl SingleShare {
    fn of(counts: &BTreeMap<String, usize>) -> Option<Self> {
        if counts.is_empty() {
            return None;
        }
        Some(Self {
            single: counts.values().filter(|count| **count == 1).count(),
            total: counts.len(),
        })
    }

    fn ratio(&self) -> f64 {
        self.single as f64 / self.total as f64
    }
}

/// Detects value models that mirror the feature list one-to-one instead of
/// abstracting over it.
pub fn check_one_to_one_mapping(
    contributions: Option<&FeatureContributions>,
    policy: &QualityPolicy,
) -> QualityCheckResult {
    let check = CheckId::OneToOneMapping;
    let Some(contributions) = contributions.filter(|contributions| !contributions.is_empty())
    else {
        return QualityCheckResult::skipped(check, "no feature contribution data available");
    };

    let components = SingleShare::of(&contributions.component_to_feature_count);
    let features = SingleShare::of(&contributions.feature_to_component_count);

    let mut details = Vec::new();
    if let Some(share) = &components {
        details.push(format!(
            "Components with a single feature: {}/{}",
            share.single, share.total
        ));
    }
    if let Some(share) = &features {
        details.push(format!(
            "Features with a single target component: {}/{}",
            share.single, share.total
        ));
    }

    let ratios = components
        .iter()
        .chain(features.iter())
        .map(SingleShare::ratio)
        .collect::<Vec<f64>>();
    let fraction = ratios.iter().sum::<f64>() / ratios.len() as f64;

    let mut result = QualityCheckResult::scored(check, 100.0 * (1.0 - fraction));
    if ratios
        .iter()
        .all(|ratio| *ratio > policy.one_to_one_warning_ratio)
    {
        result.warn(
            WarningLevel::Warning,
            format!(
                "{} of feature-to-component mappings are one-to-one. The value model may mirror the feature list instead of describing value delivery.",
                percent(fraction)
            ),
            details,
        );
    } else if ratios
        .iter()
        .any(|ratio| *ratio > policy.one_to_one_info_ratio)
    {
        result.warn(
            WarningLevel::Info,
            format!(
                "{} of feature-to-component mappings are one-to-one; consider whether components group related features",
                percent(fraction)
            ),
            details,
        );
    }
    result
}
