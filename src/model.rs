use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Maturity of a unit of value delivery, ordered from least to most proven.
///
/// Labels are lower-case on the wire. Empty or unrecognized labels fold into
/// [`MaturityStage::Hypothetical`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum MaturityStage {
    #[default]
    Hypothetical,
    Emerging,
    Proven,
    Scaled,
}

impl MaturityStage {
    /// All stages from lowest to highest.
    pub const ALL: [MaturityStage; 4] = [
        MaturityStage::Hypothetical,
        MaturityStage::Emerging,
        MaturityStage::Proven,
        MaturityStage::Scaled,
    ];

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "emerging" => Self::Emerging,
            "proven" => Self::Proven,
            "scaled" => Self::Scaled,
            _ => Self::Hypothetical,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hypothetical => "hypothetical",
            Self::Emerging => "emerging",
            Self::Proven => "proven",
            Self::Scaled => "scaled",
        }
    }

    pub fn at_or_above(self, other: MaturityStage) -> bool {
        self >= other
    }

    pub fn above(self, other: MaturityStage) -> bool {
        self > other
    }

    /// The stage one step up; `Scaled` has no successor and maps to itself.
    pub fn next(self) -> Self {
        match self {
            Self::Hypothetical => Self::Emerging,
            Self::Emerging => Self::Proven,
            Self::Proven | Self::Scaled => Self::Scaled,
        }
    }
}

impl From<String> for MaturityStage {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<MaturityStage> for String {
    fn from(value: MaturityStage) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for MaturityStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Track {
    Product,
    Strategy,
    OrgOps,
    Commercial,
}

impl Track {
    pub const ALL: [Track; 4] = [
        Track::Product,
        Track::Strategy,
        Track::OrgOps,
        Track::Commercial,
    ];

    /// Resolves a user-supplied track name, ignoring case and the common
    /// `org_ops` / `org-ops` spellings.
    pub fn normalize(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "product" => Some(Self::Product),
            "strategy" => Some(Self::Strategy),
            "orgops" | "org_ops" | "org-ops" => Some(Self::OrgOps),
            "commercial" => Some(Self::Commercial),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Strategy => "Strategy",
            Self::OrgOps => "OrgOps",
            Self::Commercial => "Commercial",
        }
    }
}

impl TryFrom<String> for Track {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value).ok_or_else(|| format!("unknown value model track: {value}"))
    }
}

impl From<Track> for String {
    fn from(value: Track) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// L3 leaf. Its stage is assigned upstream and never derived.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubComponent {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub stage: MaturityStage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_components: Vec<SubComponent>,
    /// Legacy alias for `sub_components` found in older files.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subs: Vec<SubComponent>,
}

impl Component {
    /// Sub-components from the preferred field, falling back to the legacy
    /// `subs` field only when the preferred one is empty. The two are never
    /// merged.
    pub fn sub_components(&self) -> &[SubComponent] {
        if self.sub_components.is_empty() {
            &self.subs
        } else {
            &self.sub_components
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layer {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueModel {
    #[serde(rename = "track_name", alias = "track")]
    pub track: Track,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub file_path: String,
}

impl ValueModel {
    pub fn new(track: Track, file_path: impl Into<String>, layers: Vec<Layer>) -> Self {
        Self {
            track,
            layers,
            file_path: file_path.into(),
        }
    }
}

/// Value models indexed both by track (all files merged) and by source file.
///
/// Build it through [`ValueModelSet::insert_file`] so that every per-file layer
/// also appears in the merged track model.
#[derive(Debug, Clone, Default)]
pub struct ValueModelSet {
    tracks: BTreeMap<Track, ValueModel>,
    by_file: BTreeMap<String, ValueModel>,
}

impl ValueModelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_files(models: impl IntoIterator<Item = ValueModel>) -> Self {
        let mut set = Self::new();
        for model in models {
            set.insert_file(model);
        }
        set
    }

    /// Adds one file's fragment and re-merges its track. Re-inserting a path
    /// replaces the earlier fragment, re-merging the track it used to belong
    /// to as well.
    pub fn insert_file(&mut self, model: ValueModel) {
        let track = model.track;
        let previous = self.by_file.insert(model.file_path.clone(), model);
        self.remerge(track);
        if let Some(previous) = previous
            && previous.track != track
        {
            self.remerge(previous.track);
        }
    }

    fn remerge(&mut self, track: Track) {
        let mut fragments = self
            .by_file
            .values()
            .filter(|fragment| fragment.track == track)
            .peekable();

        let Some(first) = fragments.peek() else {
            self.tracks.remove(&track);
            return;
        };

        let mut merged = ValueModel::new(track, first.file_path.clone(), Vec::new());
        for fragment in fragments {
            merged.layers.extend(fragment.layers.iter().cloned());
        }
        self.tracks.insert(track, merged);
    }

    pub fn track(&self, track: Track) -> Option<&ValueModel> {
        self.tracks.get(&track)
    }

    pub fn track_by_name(&self, name: &str) -> Option<&ValueModel> {
        Track::normalize(name).and_then(|track| self.track(track))
    }

    pub fn product(&self) -> Option<&ValueModel> {
        self.track(Track::Product)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &ValueModel> {
        self.tracks.values()
    }

    pub fn files(&self) -> impl Iterator<Item = &ValueModel> {
        self.by_file.values()
    }

    /// Per-file fragments of the Product track, ordered by path.
    pub fn product_files(&self) -> Vec<&ValueModel> {
        self.by_file
            .values()
            .filter(|fragment| fragment.track == Track::Product)
            .collect()
    }

    pub fn models_with_layers(&self) -> usize {
        self.tracks
            .values()
            .filter(|model| !model.layers.is_empty())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.by_file.is_empty()
    }
}

/// Per-stage counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityDistribution {
    pub hypothetical: usize,
    pub emerging: usize,
    pub proven: usize,
    pub scaled: usize,
}

impl MaturityDistribution {
    pub fn record(&mut self, stage: MaturityStage) {
        match stage {
            MaturityStage::Hypothetical => self.hypothetical += 1,
            MaturityStage::Emerging => self.emerging += 1,
            MaturityStage::Proven => self.proven += 1,
            MaturityStage::Scaled => self.scaled += 1,
        }
    }

    pub fn merge(&mut self, other: &MaturityDistribution) {
        self.hypothetical += other.hypothetical;
        self.emerging += other.emerging;
        self.proven += other.proven;
        self.scaled += other.scaled;
    }

    pub fn count(&self, stage: MaturityStage) -> usize {
        match stage {
            MaturityStage::Hypothetical => self.hypothetical,
            MaturityStage::Emerging => self.emerging,
            MaturityStage::Proven => self.proven,
            MaturityStage::Scaled => self.scaled,
        }
    }

    pub fn total(&self) -> usize {
        self.hypothetical + self.emerging + self.proven + self.scaled
    }

    pub fn count_at_or_above(&self, stage: MaturityStage) -> usize {
        MaturityStage::ALL
            .iter()
            .filter(|candidate| candidate.at_or_above(stage))
            .map(|candidate| self.count(*candidate))
            .sum()
    }
}
