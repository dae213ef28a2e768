//! Dotted value model paths (`Product.CoreKnowledge.DocumentIntelligence`),
//! the keys feature contributions use to point at components.

use crate::model::{Component, Layer, SubComponent, Track, ValueModel, ValueModelSet};

/// Path segment for a node: its kebab-case id in PascalCase when present,
/// otherwise its name in PascalCase.
pub fn normalize_path_segment(id: &str, name: &str) -> String {
    let id = id.trim();
    if !id.is_empty() {
        return id
            .split('-')
            .map(capitalize_first)
            .collect::<Vec<String>>()
            .join("");
    }

    name.split_whitespace()
        .map(|word| capitalize_first(&word.to_lowercase()))
        .collect::<Vec<String>>()
        .join("")
}

pub fn layer_path(track: Track, layer: &Layer) -> String {
    format!("{}.{}", track, normalize_path_segment(&layer.id, &layer.name))
}

pub fn component_path(track: Track, layer: &Layer, component: &Component) -> String {
    format!(
        "{}.{}",
        layer_path(track, layer),
        normalize_path_segment(&component.id, &component.name)
    )
}

pub fn sub_component_path(
    track: Track,
    layer: &Layer,
    component: &Component,
    sub: &SubComponent,
) -> String {
    format!(
        "{}.{}",
        component_path(track, layer, component),
        normalize_path_segment(&sub.id, &sub.name)
    )
}

impl ValueModel {
    /// Layer, component and sub-component paths in document order.
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for layer in &self.layers {
            paths.push(layer_path(self.track, layer));
            for component in &layer.components {
                paths.push(component_path(self.track, layer, component));
                for sub in component.sub_components() {
                    paths.push(sub_component_path(self.track, layer, component, sub));
                }
            }
        }
        paths
    }
}

impl ValueModelSet {
    /// Every layer, component and sub-component path across all tracks.
    pub fn all_paths(&self) -> Vec<String> {
        self.tracks().flat_map(ValueModel::paths).collect()
    }
}

fn capitalize_first(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_prefer_ids_and_pascal_case_them() {
        assert_eq!(
            normalize_path_segment("core-knowledge-platform", "Ignored"),
            "CoreKnowledgePlatform"
        );
        assert_eq!(
            normalize_path_segment("", "Core knowledge PLATFORM"),
            "CoreKnowledgePlatform"
        );
        assert_eq!(normalize_path_segment("  ", ""), "");
    }

    #[test]
    fn all_paths_walks_every_level() {
        let set = ValueModelSet::from_files([ValueModel::new(
            Track::Product,
            "product.yaml",
            vec![Layer {
                id: "energy-transformation".to_string(),
                name: "Energy Transformation".to_string(),
                components: vec![Component {
                    name: "Heat Exchange".to_string(),
                    subs: vec![SubComponent {
                        id: "thermal-coupling".to_string(),
                        name: "Thermal Coupling".to_string(),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
        )]);

        assert_eq!(
            set.all_paths(),
            vec![
                "Product.EnergyTransformation".to_string(),
                "Product.EnergyTransformation.HeatExchange".to_string(),
                "Product.EnergyTransformation.HeatExchange.ThermalCoupling".to_string(),
            ]
        );
    }
}
