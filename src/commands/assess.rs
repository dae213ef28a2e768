use std::io::{self, Write};
use std::path::Path;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vmq::model::ValueModelSet;
use vmq::portfolio::{FeatureContributions, PortfolioNames};
use vmq::quality::{QualityPolicy, QualityReport, assess_quality_with_policy};
use vmq::resolver::{PathError, Resolver};

use crate::cli::AssessArgs;
use crate::commands::load_model_set;
use crate::util::{
    now_utc_string, print_json, read_json, read_json_if_exists, sha256_file, write_json_pretty,
};

pub const MIN_SCORE_ENV: &str = "VMQ_MIN_SCORE";
const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PortfolioSnapshot {
    product_names: Vec<String>,
    brand_names: Vec<String>,
    offering_names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct FeatureSnapshot {
    id: String,
    #[serde(default)]
    contributes_to: Vec<String>,
}

#[derive(Debug, Serialize)]
struct InputDigest {
    role: &'static str,
    path: String,
    sha256: String,
}

#[derive(Debug, Serialize)]
struct ReportEnvelope<'a> {
    generated_at: String,
    tool_version: &'static str,
    inputs: Vec<InputDigest>,
    report: &'a QualityReport,
}

pub fn run(args: AssessArgs) -> Result<()> {
    let set = load_model_set(&args.models)?;
    let portfolio = load_portfolio(args.portfolio.as_deref())?;
    let contributions = load_contributions(args.features.as_deref(), &set)?;
    let policy = match &args.policy {
        Some(path) => read_json::<QualityPolicy>(path)?,
        None => QualityPolicy::default(),
    };

    let report = assess_quality_with_policy(
        &set,
        portfolio.as_ref(),
        contributions.as_ref(),
        &policy,
    );

    info!(
        models_analyzed = report.models_analyzed,
        overall_score = report.overall_score,
        score_level = %report.score_level,
        warnings = report.warnings.len(),
        "quality assessment complete"
    );

    if let Some(report_path) = &args.report_path {
        let envelope = ReportEnvelope {
            generated_at: now_utc_string(),
            tool_version: env!("CARGO_PKG_VERSION"),
            inputs: input_digests(&args)?,
            report: &report,
        };
        write_json_pretty(report_path, &envelope)?;
        info!(path = %report_path.display(), "wrote quality report");
    }

    if args.json {
        print_json(&report)?;
    } else {
        let mut output = io::BufWriter::new(io::stdout().lock());
        write_text_report(&mut output, &report)?;
        output.flush()?;
    }

    if let Some(min_score) = args.min_score.or_else(resolve_min_score)
        && report.overall_score < min_score
    {
        bail!(
            "overall quality score {} is below the required minimum of {}",
            report.overall_score,
            min_score
        );
    }

    Ok(())
}

fn load_portfolio(path: Option<&Path>) -> Result<Option<PortfolioNames>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let Some(snapshot) = read_json_if_exists::<PortfolioSnapshot>(path)? else {
        warn!(path = %path.display(), "portfolio file missing; skipping name collision check");
        return Ok(None);
    };

    let names = PortfolioNames::from_lists(
        snapshot.product_names,
        snapshot.brand_names,
        snapshot.offering_names,
    );
    info!(names = names.all_names().len(), "loaded portfolio names");
    Ok(Some(names))
}

fn load_contributions(
    path: Option<&Path>,
    set: &ValueModelSet,
) -> Result<Option<FeatureContributions>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let Some(features) = read_json_if_exists::<Vec<FeatureSnapshot>>(path)? else {
        warn!(path = %path.display(), "feature file missing; skipping one-to-one mapping check");
        return Ok(None);
    };

    let resolver = Resolver::new(set);
    let unknown = unknown_targets(&features, &resolver);
    for (feature, error) in &unknown {
        debug!(
            feature = %feature,
            path = %error.path,
            reason = %error.message,
            did_you_mean = ?error.did_you_mean,
            "feature targets an unknown value model path"
        );
    }
    if !unknown.is_empty() {
        warn!(
            unknown_paths = unknown.len(),
            "feature contributions reference paths missing from the value models"
        );
    }

    let contributions =
        FeatureContributions::from_feature_targets(features.into_iter().map(|feature| {
            let targets = feature
                .contributes_to
                .iter()
                .map(|target| canonical_target(&resolver, target))
                .collect::<Vec<String>>();
            (feature.id, targets)
        }));
    info!(
        features = contributions.feature_to_component_count.len(),
        components = contributions.component_to_feature_count.len(),
        "loaded feature contributions"
    );
    Ok(Some(contributions))
}

/// Non-blank targets that do not resolve against the loaded models.
fn unknown_targets<'a>(
    features: &'a [FeatureSnapshot],
    resolver: &Resolver<'_>,
) -> Vec<(&'a str, PathError)> {
    features
        .iter()
        .flat_map(|feature| {
            feature
                .contributes_to
                .iter()
                .map(move |target| (feature.id.as_str(), target.trim()))
        })
        .filter(|(_, target)| !target.is_empty())
        .filter_map(|(feature, target)| resolver.resolve(target).err().map(|err| (feature, err)))
        .collect()
}

/// Canonical spelling of a resolvable target; anything else is kept as written
/// so it still counts toward the mapping check.
fn canonical_target(resolver: &Resolver<'_>, target: &str) -> String {
    match resolver.resolve(target) {
        Ok(resolution) => resolution.canonical_path,
        Err(_) => target.trim().to_string(),
    }
}

fn input_digests(args: &AssessArgs) -> Result<Vec<InputDigest>> {
    let candidates = [
        ("models", Some(args.models.as_path())),
        ("portfolio", args.portfolio.as_deref()),
        ("features", args.features.as_deref()),
        ("policy", args.policy.as_deref()),
    ];

    let mut digests = Vec::new();
    for (role, path) in candidates {
        let Some(path) = path.filter(|path| path.exists()) else {
            continue;
        };
        digests.push(InputDigest {
            role,
            path: path.display().to_string(),
            sha256: sha256_file(path)?,
        });
    }
    Ok(digests)
}

fn write_text_report(output: &mut impl Write, report: &QualityReport) -> Result<()> {
    writeln!(
        output,
        "Quality score: {} ({})",
        report.overall_score, report.score_level
    )?;
    writeln!(output, "Models analyzed: {}", report.models_analyzed)?;
    writeln!(output, "Checks:")?;
    for check in &report.checks {
        match (check.score, check.reason.as_deref()) {
            (Some(score), _) => writeln!(output, "\t{}\t{score}", check.check)?,
            (None, reason) => writeln!(
                output,
                "\t{}\tskipped ({})",
                check.check,
                reason.unwrap_or("not applicable")
            )?,
        }
    }

    writeln!(output, "Warnings: {}", report.warnings.len())?;
    for warning in &report.warnings {
        writeln!(
            output,
            "\t[{}] {}: {}",
            warning.level, warning.check, warning.message
        )?;
        for detail in &warning.details {
            writeln!(output, "\t\t- {detail}")?;
        }
    }
    Ok(())
}

fn resolve_min_score() -> Option<u32> {
    let raw = std::env::var(MIN_SCORE_ENV).ok()?;
    let parsed = parse_min_score(Some(&raw));
    if parsed.is_none() && !raw.trim().is_empty() {
        warn!(env = MIN_SCORE_ENV, value = %raw, "ignoring invalid minimum score");
    }
    parsed
}

fn parse_min_score(value: Option<&str>) -> Option<u32> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|score| *score <= MAX_SCORE)
}
