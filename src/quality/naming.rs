use crate::model::ValueModelSet;
use crate::text::has_mixed_case;

use super::{CheckId, NO_PRODUCT_TRACK, QualityCheckResult, QualityPolicy, WarningLevel};

const MIN_FLAGGED_NAME_CHARS: usize = 3;

/// True when the lower-cased name contains any of `words`.
pub fn has_positive_signal(name: &str, words: &[String]) -> bool {
    let lowered = name.to_lowercase();
    words
        .iter()
        .any(|word| !word.is_empty() && lowered.contains(&word.to_lowercase()))
}

/// Concatenated brand-style names (`IoCore`, `CarbonX`) without any
/// value-delivery vocabulary.
pub fn looks_like_product_name(name: &str, words: &[String]) -> bool {
    let name = name.trim();
    name.chars().count() >= MIN_FLAGGED_NAME_CHARS
        && !has_positive_signal(name, words)
        && has_mixed_case(name)
}

pub fn check_layer_name_heuristics(
    set: &ValueModelSet,
    policy: &QualityPolicy,
) -> QualityCheckResult {
    let check = CheckId::LayerNameHeuristic;
    let Some(product) = set.product() else {
        return QualityCheckResult::skipped(check, NO_PRODUCT_TRACK);
    };
    if product.layers.is_empty() {
        return QualityCheckResult::skipped(check, "Product track has no layers");
    }

    let words = &policy.positive_signal_words;
    let mut total = 0usize;
    let mut flagged = Vec::new();
    for layer in &product.layers {
        total += 1;
        if looks_like_product_name(&layer.name, words) {
            flagged.push(("L1", layer.name.as_str()));
        }
        for component in &layer.components {
            total += 1;
            if looks_like_product_name(&component.name, words) {
                flagged.push(("L2", component.name.as_str()));
            }
        }
    }

    let unflagged = total - flagged.len();
    let mut result = QualityCheckResult::scored(check, 100.0 * unflagged as f64 / total as f64);
    let flagged_ratio = flagged.len() as f64 / total as f64;

    if flagged.is_empty() {
        return result;
    }
    if flagged_ratio >= policy.flagged_name_warning_ratio {
        for (level, name) in &flagged {
            result.warn(
                WarningLevel::Warning,
                format!(
                    "{level} '{name}' looks like a product or brand name rather than a value delivery category"
                ),
                Vec::new(),
            );
        }
    } else {
        let details = flagged
            .iter()
            .map(|(level, name)| format!("{level} '{name}'"))
            .collect::<Vec<String>>();
        result.warn(
            WarningLevel::Info,
            format!(
                "{} of {total} layer/component names may be product or brand names rather than value delivery categories",
                flagged.len()
            ),
            details,
        );
    }
    result
}
