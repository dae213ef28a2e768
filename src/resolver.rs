//! Resolves dotted value model paths (`Product.CoreKnowledge.DocumentIntelligence`)
//! against a loaded [`ValueModelSet`].
//!
//! Segments match a node's id or name ignoring case, hyphens, underscores and
//! spaces, so `product.core-knowledge.document_intelligence` resolves to the
//! same node. Failed lookups carry the sibling paths that were available and,
//! when one is close enough, a suggestion.

use crate::model::{Component, Layer, SubComponent, Track, ValueModel, ValueModelSet};
use crate::paths::{component_path, layer_path, sub_component_path};

const PATH_FORMAT_HINT: &str =
    "Value model paths follow: {Track}.{L1Layer}.{L2Component}[.{L3SubComponent}]";

/// Positional matches plus the containment bonus must reach this to be
/// suggested.
const MIN_SUGGESTION_SCORE: usize = 2;
const CONTAINMENT_BONUS: usize = 5;

/// A resolved path. Nodes below `depth` are `None`.
#[derive(Debug, Clone)]
pub struct PathResolution<'a> {
    pub path: String,
    pub track: Track,
    pub model: &'a ValueModel,
    pub layer: Option<&'a Layer>,
    pub component: Option<&'a Component>,
    pub sub_component: Option<&'a SubComponent>,
    /// 1 = track, 2 = layer, 3 = component, 4 = sub-component.
    pub depth: usize,
    pub canonical_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("path resolution error for {path:?}: {message}")]
pub struct PathError {
    pub path: String,
    pub message: String,
    pub available_paths: Vec<String>,
    pub did_you_mean: Option<String>,
    pub hint: String,
}

impl PathError {
    fn without_context(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
            available_paths: Vec::new(),
            did_you_mean: None,
            hint: PATH_FORMAT_HINT.to_string(),
        }
    }

    /// Error for a missing child whose siblings are `available` full paths.
    fn missing(
        path: &str,
        message: String,
        input: &str,
        available: Vec<String>,
        hint: String,
    ) -> Self {
        let segments = last_segments(&available);
        let did_you_mean = find_closest_match(input, &segments);
        Self {
            path: path.to_string(),
            message,
            hint: format!("{hint}: {}", segments.join(", ")),
            available_paths: available,
            did_you_mean,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    models: &'a ValueModelSet,
}

impl<'a> Resolver<'a> {
    pub fn new(models: &'a ValueModelSet) -> Self {
        Self { models }
    }

    pub fn resolve(&self, path: &str) -> Result<PathResolution<'a>, PathError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(PathError::without_context(path, "path cannot be empty"));
        }
        let parts = trimmed.split('.').map(str::trim).collect::<Vec<&str>>();
        if parts.len() > 4 {
            return Err(PathError::without_context(
                path,
                format!("path has {} segments; at most 4 are allowed", parts.len()),
            ));
        }
        if parts.iter().any(|part| part.is_empty()) {
            return Err(PathError::without_context(path, "path contains an empty segment"));
        }

        let (track, model) = Track::normalize(parts[0])
            .and_then(|track| self.models.track(track).map(|model| (track, model)))
            .ok_or_else(|| track_not_found(path, parts[0]))?;

        let mut resolution = PathResolution {
            path: path.to_string(),
            track,
            model,
            layer: None,
            component: None,
            sub_component: None,
            depth: parts.len(),
            canonical_path: track.to_string(),
        };

        let Some(layer_input) = parts.get(1) else {
            return Ok(resolution);
        };
        let layer = model
            .layers
            .iter()
            .find(|layer| segment_matches(&layer.id, &layer.name, layer_input))
            .ok_or_else(|| {
                PathError::missing(
                    path,
                    format!("layer {layer_input:?} not found in track {track}"),
                    layer_input,
                    model.layers.iter().map(|layer| layer_path(track, layer)).collect(),
                    format!("Available L1 layers in {track} track"),
                )
            })?;
        resolution.layer = Some(layer);
        resolution.canonical_path = layer_path(track, layer);

        let Some(component_input) = parts.get(2) else {
            return Ok(resolution);
        };
        let component = layer
            .components
            .iter()
            .find(|component| segment_matches(&component.id, &component.name, component_input))
            .ok_or_else(|| {
                PathError::missing(
                    path,
                    format!("component {component_input:?} not found in layer {}", layer.name),
                    component_input,
                    layer
                        .components
                        .iter()
                        .map(|component| component_path(track, layer, component))
                        .collect(),
                    format!("Available L2 components in {}", layer.name),
                )
            })?;
        resolution.component = Some(component);
        resolution.canonical_path = component_path(track, layer, component);

        let Some(sub_input) = parts.get(3) else {
            return Ok(resolution);
        };
        let sub = component
            .sub_components()
            .iter()
            .find(|sub| segment_matches(&sub.id, &sub.name, sub_input))
            .ok_or_else(|| {
                PathError::missing(
                    path,
                    format!(
                        "sub-component {sub_input:?} not found in component {}",
                        component.name
                    ),
                    sub_input,
                    component
                        .sub_components()
                        .iter()
                        .map(|sub| sub_component_path(track, layer, component, sub))
                        .collect(),
                    format!("Available L3 sub-components in {}", component.name),
                )
            })?;
        resolution.sub_component = Some(sub);
        resolution.canonical_path = sub_component_path(track, layer, component, sub);

        Ok(resolution)
    }

    pub fn validate_path(&self, path: &str) -> Result<(), PathError> {
        self.resolve(path).map(|_| ())
    }

    pub fn available_paths(&self) -> Vec<String> {
        self.models.all_paths()
    }

    pub fn paths_for_track(&self, track: Track) -> Vec<String> {
        self.models
            .track(track)
            .map(|model| model.paths())
            .unwrap_or_default()
    }

    /// Known paths whose normalized form contains the normalized input.
    pub fn suggest_paths(&self, partial: &str) -> Vec<String> {
        let needle = normalize_for_comparison(partial);
        self.available_paths()
            .into_iter()
            .filter(|path| normalize_for_comparison(path).contains(&needle))
            .collect()
    }
}

/// Lower-cases and drops hyphens, underscores and spaces.
pub fn normalize_for_comparison(input: &str) -> String {
    input
        .chars()
        .filter(|character| !matches!(character, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn segment_matches(id: &str, name: &str, search: &str) -> bool {
    let search = normalize_for_comparison(search);
    if search.is_empty() {
        return false;
    }
    [id, name]
        .iter()
        .map(|candidate| normalize_for_comparison(candidate))
        .any(|candidate| candidate == search)
}

fn track_not_found(path: &str, input: &str) -> PathError {
    let available = Track::ALL
        .iter()
        .map(|track| track.to_string())
        .collect::<Vec<String>>();
    PathError {
        path: path.to_string(),
        message: format!("track {input:?} not found"),
        did_you_mean: find_closest_match(input, &available),
        hint: format!("Valid tracks are: {}", available.join(", ")),
        available_paths: available,
    }
}

fn last_segments(paths: &[String]) -> Vec<String> {
    paths
        .iter()
        .map(|path| path.rsplit('.').next().unwrap_or(path).to_string())
        .collect()
}

/// Candidate sharing the most leading-position characters with `input`,
/// with a bonus when one contains the other. Ties keep the earlier
/// candidate.
fn find_closest_match(input: &str, candidates: &[String]) -> Option<String> {
    let input = normalize_for_comparison(input);
    let mut best: Option<(usize, &String)> = None;
    for candidate in candidates {
        let normalized = normalize_for_comparison(candidate);
        let mut score = input
            .chars()
            .zip(normalized.chars())
            .filter(|(left, right)| left == right)
            .count();
        if normalized.contains(&input) || input.contains(&normalized) {
            score += CONTAINMENT_BONUS;
        }
        if best.is_none_or(|(best_score, _)| score > best_score) {
            best = Some((score, candidate));
        }
    }

    best.filter(|(score, _)| *score >= MIN_SUGGESTION_SCORE)
        .map(|(_, candidate)| candidate.clone())
}
