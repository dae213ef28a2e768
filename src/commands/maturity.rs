use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};
use vmq::maturity::{MATURITY_THRESHOLD, Rollup, TrackRollup};
use vmq::model::{MaturityDistribution, Track, ValueModel};

use crate::cli::MaturityArgs;
use crate::commands::load_model_set;
use crate::util::print_json;

pub const MATURITY_THRESHOLD_ENV: &str = "VMQ_MATURITY_THRESHOLD";

pub fn run(args: MaturityArgs) -> Result<()> {
    let set = load_model_set(&args.models)?;
    let rollup = resolve_rollup();

    let models = match &args.track {
        Some(name) => {
            let track =
                Track::normalize(name).with_context(|| format!("unknown track: {name}"))?;
            let model = set
                .track(track)
                .with_context(|| format!("no value model loaded for track {track}"))?;
            vec![model]
        }
        None => set.tracks().collect::<Vec<&ValueModel>>(),
    };

    let rollups = models
        .into_iter()
        .map(|model| rollup.track_rollup(model))
        .collect::<Vec<TrackRollup>>();

    info!(
        tracks = rollups.len(),
        threshold = rollup.threshold(),
        "computed maturity rollups"
    );

    if args.json {
        print_json(&rollups)
    } else {
        let mut output = io::BufWriter::new(io::stdout().lock());
        write_text_rollups(&mut output, &rollups)?;
        output.flush()?;
        Ok(())
    }
}

fn write_text_rollups(output: &mut impl Write, rollups: &[TrackRollup]) -> Result<()> {
    for track in rollups {
        writeln!(
            output,
            "{}: {} (layers {}, {:.1}% toward next stage, {} more needed)",
            track.track,
            track.stage,
            track.layers.len(),
            track.analysis.progress_to_next_stage(),
            track.analysis.next_stage_needed
        )?;
        for layer in &track.layers {
            writeln!(
                output,
                "\tL1 {}: {} [L2 {}] [L3 {}]",
                layer.name,
                layer.stage,
                format_distribution(&layer.l2_distribution),
                format_distribution(&layer.l3_distribution)
            )?;
            for component in &layer.components {
                writeln!(
                    output,
                    "\t\tL2 {}: {} ({} sub-components)",
                    component.name,
                    component.stage,
                    component.l3_distribution.total()
                )?;
            }
        }
    }
    Ok(())
}

fn format_distribution(distribution: &MaturityDistribution) -> String {
    format!(
        "h={} e={} p={} s={}",
        distribution.hypothetical, distribution.emerging, distribution.proven, distribution.scaled
    )
}

fn resolve_rollup() -> Rollup {
    let raw = std::env::var(MATURITY_THRESHOLD_ENV).ok();
    match parse_maturity_threshold(raw.as_deref()) {
        Some(rollup) => rollup,
        None => {
            if let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) {
                warn!(
                    env = MATURITY_THRESHOLD_ENV,
                    value = %raw,
                    default = MATURITY_THRESHOLD,
                    "ignoring invalid maturity threshold"
                );
            }
            Rollup::default()
        }
    }
}

/// Accepts a ratio in `(0, 1]`; anything else is `None`.
fn parse_maturity_threshold(value: Option<&str>) -> Option<Rollup> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<f64>().ok())
        .and_then(Rollup::with_threshold)
}

#[cfg(test)]
mod tests {
    use vmq::model::{Component, Layer, MaturityStage, SubComponent};

    use super::*;

    #[test]
    fn parse_maturity_threshold_accepts_ratios_in_range() {
        let rollup = parse_maturity_threshold(Some(" 0.6 ")).expect("0.6 is valid");
        assert!((rollup.threshold() - 0.6).abs() < 1e-12);
        assert!(parse_maturity_threshold(Some("1")).is_some());
        assert!(parse_maturity_threshold(Some("0")).is_none());
        assert!(parse_maturity_threshold(Some("80")).is_none());
        assert!(parse_maturity_threshold(Some("eighty")).is_none());
        assert!(parse_maturity_threshold(None).is_none());
    }

    #[test]
    fn text_rollups_show_each_level() {
        let model = ValueModel::new(
            Track::Product,
            "product.value_model.yaml",
            vec![Layer {
                name: "Service Delivery".to_string(),
                components: vec![Component {
                    name: "Onboarding".to_string(),
                    sub_components: vec![
                        SubComponent {
                            name: "Welcome Flow".to_string(),
                            stage: MaturityStage::Proven,
                            ..Default::default()
                        };
                        2
                    ],
                    ..Default::default()
                }],
                ..Default::default()
            }],
        );
        let rollups = vec![Rollup::default().track_rollup(&model)];

        let mut buffer = Vec::new();
        write_text_rollups(&mut buffer, &rollups).expect("rollups should render");
        let text = String::from_utf8(buffer).expect("rollups should be utf-8");

        assert!(text.starts_with("Product: proven (layers 1"));
        assert!(text.contains(
            "\tL1 Service Delivery: proven [L2 h=0 e=0 p=1 s=0] [L3 h=0 e=0 p=2 s=0]"
        ));
        assert!(text.contains("\t\tL2 Onboarding: proven (2 sub-components)"));
    }
}
