use crate::model::ValueModelSet;
use crate::portfolio::{PortfolioNames, match_portfolio_name};

use super::{CheckId, NO_PRODUCT_TRACK, QualityCheckResult, QualityPolicy, WarningLevel, percent};

/// Flags L1 and L2 names that reuse product, brand or offering names.
pub fn check_product_name_collisions(
    set: &ValueModelSet,
    portfolio: Option<&PortfolioNames>,
    policy: &QualityPolicy,
) -> QualityCheckResult {
    let check = CheckId::ProductNameCollision;
    let Some(portfolio) = portfolio.filter(|portfolio| !portfolio.is_empty()) else {
        return QualityCheckResult::skipped(check, "no product portfolio names available");
    };
    let Some(product) = set.product() else {
        return QualityCheckResult::skipped(check, NO_PRODUCT_TRACK);
    };

    let mut total = 0usize;
    let mut details = Vec::new();
    let mut record = |level: &str, name: &str| {
        total += 1;
        if let Some(portfolio_name) = match_portfolio_name(
            name,
            portfolio.all_names(),
            policy.min_substring_match_chars,
        ) {
            details.push(format!(
                "{level} '{name}' matches product/brand '{portfolio_name}'"
            ));
        }
    };

    for layer in &product.layers {
        record("L1", &layer.name);
        for component in &layer.components {
            record("L2", &component.name);
        }
    }

    if total == 0 {
        return QualityCheckResult::scored(check, 100.0);
    }

    let ratio = details.len() as f64 / total as f64;
    let mut result = QualityCheckResult::scored(check, 100.0 * (1.0 - ratio));
    if ratio >= policy.collision_warning_ratio {
        result.warn(
            WarningLevel::Warning,
            format!(
                "{} of L1/L2 names match product or brand names (threshold: {}). The value model may be organized as a product catalog.",
                percent(ratio),
                percent(policy.collision_warning_ratio)
            ),
            details,
        );
    } else if !details.is_empty() {
        result.warn(
            WarningLevel::Info,
            format!(
                "{} of {total} L1/L2 names match product or brand names; verify this is intentional",
                details.len()
            ),
            details,
        );
    }
    result
}
