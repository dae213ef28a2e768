use std::path::Path;

use crate::model::{Layer, ValueModel, ValueModelSet};
use crate::text::{extract_keywords, keyword_overlap};

use super::{CheckId, QualityCheckResult, QualityPolicy, WarningLevel, percent};

/// Compares layers across Product files for duplicated names or intent.
pub fn check_multi_file_overlap(
    set: &ValueModelSet,
    policy: &QualityPolicy,
) -> QualityCheckResult {
    let check = CheckId::MultiFileOverlap;
    let files = set.product_files();
    if files.len() <= 1 {
        return QualityCheckResult::skipped(check, "Product track is defined in a single file");
    }

    let mut duplicate_names = Vec::new();
    let mut similar_descriptions = Vec::new();
    for (index, left) in files.iter().enumerate() {
        for right in &files[index + 1..] {
            for left_layer in &left.layers {
                for right_layer in &right.layers {
                    if left_layer.name == right_layer.name {
                        duplicate_names.push(format!(
                            "Layer '{}' appears in {} and {}",
                            left_layer.name,
                            file_name(left),
                            file_name(right)
                        ));
                        continue;
                    }

                    let Some(overlap) = description_overlap(left_layer, right_layer) else {
                        continue;
                    };
                    if overlap >= policy.overlap_keyword_ratio {
                        similar_descriptions.push(format!(
                            "High keyword overlap ({}) between '{}' in {} and '{}' in {}",
                            percent(overlap),
                            left_layer.name,
                            file_name(left),
                            right_layer.name,
                            file_name(right)
                        ));
                    }
                }
            }
        }
    }

    let findings = (duplicate_names.len() + similar_descriptions.len()) as u32;
    let penalty = findings
        .saturating_mul(policy.overlap_penalty_per_finding)
        .min(policy.overlap_max_penalty);
    let mut result = QualityCheckResult::scored(check, 100.0 - f64::from(penalty));

    if !duplicate_names.is_empty() {
        result.warn(
            WarningLevel::Warning,
            format!(
                "Multiple Product value model files ({}) define layers with the same name. Consider consolidating into fewer files organized by independent value delivery chains.",
                files.len()
            ),
            duplicate_names,
        );
    }
    if !similar_descriptions.is_empty() {
        result.warn(
            WarningLevel::Info,
            "Layers in different Product value model files describe overlapping value domains"
                .to_string(),
            similar_descriptions,
        );
    }
    result
}

fn description_overlap(left: &Layer, right: &Layer) -> Option<f64> {
    let left = left
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())?;
    let right = right
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())?;
    Some(keyword_overlap(
        &extract_keywords(left),
        &extract_keywords(right),
    ))
}

fn file_name(model: &ValueModel) -> &str {
    Path::new(&model.file_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(&model.file_path)
}
