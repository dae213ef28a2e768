//! Maturity rollup: derives the stage of every composite node from its
//! children with a single inclusive percentage threshold.
//!
//! L3 sub-components carry assessed stages. A component (L2) is at stage X
//! when at least 80% of its sub-components are at X or above; layers (L1)
//! and whole tracks apply the same rule to the derived stages one level down.
//! Derived stages are recomputed per call and never written back to the tree.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::model::{
    Component, Layer, MaturityDistribution, MaturityStage, SubComponent, Track, ValueModel,
};

#[cfg(test)]
mod tests;

/// Share of children that must be at or above a stage for the parent to
/// reach it.
pub const MATURITY_THRESHOLD: f64 = 0.8;

const THRESHOLD_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rollup {
    threshold: f64,
}

impl Default for Rollup {
    fn default() -> Self {
        Self {
            threshold: MATURITY_THRESHOLD,
        }
    }
}

impl Rollup {
    /// Returns `None` unless `threshold` lies in `(0, 1]`.
    pub fn with_threshold(threshold: f64) -> Option<Self> {
        if threshold > 0.0 && threshold <= 1.0 {
            Some(Self { threshold })
        } else {
            None
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Highest stage reached by at least `threshold` of `stages`;
    /// `Hypothetical` when empty.
    pub fn calculate_stage(&self, stages: &[MaturityStage]) -> MaturityStage {
        self.stage_from_distribution(&maturity_distribution(stages))
    }

    pub fn l2_stage(&self, sub_components: &[SubComponent]) -> MaturityStage {
        self.calculate_stage(&leaf_stages(sub_components))
    }

    pub fn l1_stage(&self, components: &[Component]) -> MaturityStage {
        let stages = components
            .iter()
            .map(|component| self.l2_stage(component.sub_components()))
            .collect::<Vec<MaturityStage>>();
        self.calculate_stage(&stages)
    }

    pub fn track_stage(&self, layers: &[Layer]) -> MaturityStage {
        let stages = layers
            .iter()
            .map(|layer| self.l1_stage(&layer.components))
            .collect::<Vec<MaturityStage>>();
        self.calculate_stage(&stages)
    }

    pub fn analyze_l2(&self, sub_components: &[SubComponent]) -> MaturityAnalysis {
        self.analyze_stages(&leaf_stages(sub_components))
    }

    pub fn analyze_l1(&self, components: &[Component]) -> MaturityAnalysis {
        let stages = components
            .iter()
            .map(|component| self.l2_stage(component.sub_components()))
            .collect::<Vec<MaturityStage>>();
        self.analyze_stages(&stages)
    }

    pub fn analyze_track(&self, layers: &[Layer]) -> MaturityAnalysis {
        let stages = layers
            .iter()
            .map(|layer| self.l1_stage(&layer.components))
            .collect::<Vec<MaturityStage>>();
        self.analyze_stages(&stages)
    }

    pub fn analyze_stages(&self, stages: &[MaturityStage]) -> MaturityAnalysis {
        let distribution = maturity_distribution(stages);
        let total = distribution.total();
        let calculated_stage = self.stage_from_distribution(&distribution);

        let mut at_or_above = BTreeMap::new();
        let mut percentage = BTreeMap::new();
        for stage in MaturityStage::ALL {
            let count = distribution.count_at_or_above(stage);
            at_or_above.insert(stage, count);
            percentage.insert(stage, ratio(count, total) * 100.0);
        }

        let next = calculated_stage.next();
        let next_stage_needed = if next == calculated_stage {
            0
        } else {
            self.required_count(total)
                .saturating_sub(distribution.count_at_or_above(next))
        };

        MaturityAnalysis {
            calculated_stage,
            total,
            distribution,
            at_or_above,
            percentage,
            next_stage_needed,
            threshold: self.threshold,
        }
    }

    /// Full rollup of one track. Each component stage is derived once and
    /// reused for its layer, and each layer stage once for the track.
    pub fn track_rollup(&self, model: &ValueModel) -> TrackRollup {
        let layers = model
            .layers
            .iter()
            .map(|layer| self.layer_rollup(layer))
            .collect::<Vec<LayerRollup>>();

        let layer_stages = layers
            .iter()
            .map(|layer| layer.stage)
            .collect::<Vec<MaturityStage>>();
        let analysis = self.analyze_stages(&layer_stages);

        debug!(
            track = %model.track,
            stage = %analysis.calculated_stage,
            layers = layers.len(),
            next_stage_needed = analysis.next_stage_needed,
            "computed track maturity rollup"
        );

        TrackRollup {
            track: model.track,
            stage: analysis.calculated_stage,
            l1_distribution: analysis.distribution,
            analysis,
            layers,
        }
    }

    fn layer_rollup(&self, layer: &Layer) -> LayerRollup {
        let components = layer
            .components
            .iter()
            .map(|component| {
                let analysis = self.analyze_l2(component.sub_components());
                ComponentRollup {
                    id: component.id.clone(),
                    name: component.name.clone(),
                    stage: analysis.calculated_stage,
                    l3_distribution: analysis.distribution,
                    analysis,
                }
            })
            .collect::<Vec<ComponentRollup>>();

        let component_stages = components
            .iter()
            .map(|component| component.stage)
            .collect::<Vec<MaturityStage>>();
        let analysis = self.analyze_stages(&component_stages);

        let mut l3_distribution = MaturityDistribution::default();
        for component in &components {
            l3_distribution.merge(&component.l3_distribution);
        }

        LayerRollup {
            id: layer.id.clone(),
            name: layer.name.clone(),
            stage: analysis.calculated_stage,
            l2_distribution: analysis.distribution,
            l3_distribution,
            analysis,
            components,
        }
    }

    fn stage_from_distribution(&self, distribution: &MaturityDistribution) -> MaturityStage {
        let total = distribution.total();
        if total == 0 {
            return MaturityStage::Hypothetical;
        }

        MaturityStage::ALL
            .iter()
            .rev()
            .copied()
            .find(|stage| ratio(distribution.count_at_or_above(*stage), total) >= self.threshold)
            .unwrap_or(MaturityStage::Hypothetical)
    }

    fn required_count(&self, total: usize) -> usize {
        (self.threshold * total as f64 - THRESHOLD_EPSILON).ceil() as usize
    }
}

/// Diagnostic breakdown of one rollup step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaturityAnalysis {
    pub calculated_stage: MaturityStage,
    pub total: usize,
    pub distribution: MaturityDistribution,
    pub at_or_above: BTreeMap<MaturityStage, usize>,
    pub percentage: BTreeMap<MaturityStage, f64>,
    /// Additional children needed at or above the next stage to cross the
    /// threshold for it.
    pub next_stage_needed: usize,
    pub threshold: f64,
}

impl MaturityAnalysis {
    /// Percentage of the way to the next stage's threshold; 100 at `Scaled`.
    pub fn progress_to_next_stage(&self) -> f64 {
        if self.calculated_stage == MaturityStage::Scaled {
            return 100.0;
        }

        let next = self.calculated_stage.next();
        let current = self.percentage.get(&next).copied().unwrap_or(0.0);
        (current / (self.threshold * 100.0) * 100.0).min(100.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackRollup {
    pub track: Track,
    pub stage: MaturityStage,
    pub l1_distribution: MaturityDistribution,
    pub analysis: MaturityAnalysis,
    pub layers: Vec<LayerRollup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayerRollup {
    pub id: String,
    pub name: String,
    pub stage: MaturityStage,
    pub l2_distribution: MaturityDistribution,
    pub l3_distribution: MaturityDistribution,
    pub analysis: MaturityAnalysis,
    pub components: Vec<ComponentRollup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentRollup {
    pub id: String,
    pub name: String,
    pub stage: MaturityStage,
    pub l3_distribution: MaturityDistribution,
    pub analysis: MaturityAnalysis,
}

pub fn calculate_stage(stages: &[MaturityStage]) -> MaturityStage {
    Rollup::default().calculate_stage(stages)
}

pub fn calculate_l2_maturity(sub_components: &[SubComponent]) -> MaturityStage {
    Rollup::default().l2_stage(sub_components)
}

pub fn calculate_l1_maturity(components: &[Component]) -> MaturityStage {
    Rollup::default().l1_stage(components)
}

pub fn calculate_track_maturity(layers: &[Layer]) -> MaturityStage {
    Rollup::default().track_stage(layers)
}

pub fn analyze_l2_maturity(sub_components: &[SubComponent]) -> MaturityAnalysis {
    Rollup::default().analyze_l2(sub_components)
}

pub fn analyze_l1_maturity(components: &[Component]) -> MaturityAnalysis {
    Rollup::default().analyze_l1(components)
}

pub fn analyze_track_maturity(layers: &[Layer]) -> MaturityAnalysis {
    Rollup::default().analyze_track(layers)
}

pub fn maturity_distribution(stages: &[MaturityStage]) -> MaturityDistribution {
    let mut distribution = MaturityDistribution::default();
    for stage in stages {
        distribution.record(*stage);
    }
    distribution
}

/// Tally of raw stage labels; empty and unrecognized labels count as
/// `Hypothetical`.
pub fn maturity_distribution_from_labels<'a>(
    labels: impl IntoIterator<Item = &'a str>,
) -> MaturityDistribution {
    let mut distribution = MaturityDistribution::default();
    for label in labels {
        distribution.record(MaturityStage::from_label(label));
    }
    distribution
}

fn leaf_stages(sub_components: &[SubComponent]) -> Vec<MaturityStage> {
    sub_components.iter().map(|sub| sub.stage).collect()
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
