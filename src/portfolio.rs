//! Auxiliary lookup inputs supplied by the loader: known portfolio names and
//! feature-to-component contribution counts.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::text::normalize_whitespace;

/// Names this short are never recorded; they collide with too many words.
pub const MIN_PORTFOLIO_NAME_CHARS: usize = 3;

/// Portfolio names must be at least this long to match as a substring.
pub const MIN_SUBSTRING_MATCH_CHARS: usize = 4;

/// Product, brand and offering names known from the portfolio.
///
/// `all_names` holds the lower-cased union in first-occurrence order, without
/// duplicates or entries shorter than [`MIN_PORTFOLIO_NAME_CHARS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioNames {
    pub product_names: Vec<String>,
    pub brand_names: Vec<String>,
    pub offering_names: Vec<String>,
    all_names: Vec<String>,
}

impl PortfolioNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lists(
        product_names: Vec<String>,
        brand_names: Vec<String>,
        offering_names: Vec<String>,
    ) -> Self {
        let mut names = Self {
            product_names,
            brand_names,
            offering_names,
            all_names: Vec::new(),
        };

        let sources = names
            .product_names
            .iter()
            .chain(&names.brand_names)
            .chain(&names.offering_names)
            .cloned()
            .collect::<Vec<String>>();
        for name in sources {
            names.add_name(&name);
        }
        names
    }

    /// Records one more name for matching. Re-adding a name that is already
    /// present (ignoring case) and names of two characters or fewer are
    /// no-ops.
    pub fn add_name(&mut self, name: &str) {
        let lowered = normalize_whitespace(name).to_lowercase();
        if lowered.chars().count() < MIN_PORTFOLIO_NAME_CHARS {
            return;
        }
        if self.all_names.iter().any(|existing| *existing == lowered) {
            return;
        }
        self.all_names.push(lowered);
    }

    pub fn all_names(&self) -> &[String] {
        &self.all_names
    }

    pub fn is_empty(&self) -> bool {
        self.all_names.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCollision {
    pub name: String,
    pub portfolio_name: String,
}

/// Value model names that collide with a portfolio name: an exact
/// case-insensitive match, or a portfolio name of at least
/// [`MIN_SUBSTRING_MATCH_CHARS`] appearing inside the value model name.
pub fn find_name_collisions<'a>(
    names: impl IntoIterator<Item = &'a str>,
    portfolio_names: &[String],
) -> Vec<NameCollision> {
    find_name_collisions_with(names, portfolio_names, MIN_SUBSTRING_MATCH_CHARS)
}

pub fn find_name_collisions_with<'a>(
    names: impl IntoIterator<Item = &'a str>,
    portfolio_names: &[String],
    min_substring_chars: usize,
) -> Vec<NameCollision> {
    names
        .into_iter()
        .filter_map(|name| {
            match_portfolio_name(name, portfolio_names, min_substring_chars).map(|portfolio_name| {
                NameCollision {
                    name: name.to_string(),
                    portfolio_name: portfolio_name.to_string(),
                }
            })
        })
        .collect()
}

/// First portfolio name that `name` collides with, if any.
pub fn match_portfolio_name<'p>(
    name: &str,
    portfolio_names: &'p [String],
    min_substring_chars: usize,
) -> Option<&'p str> {
    let lowered = name.to_lowercase();
    portfolio_names
        .iter()
        .find(|portfolio_name| {
            lowered == **portfolio_name
                || (portfolio_name.chars().count() >= min_substring_chars
                    && lowered.contains(portfolio_name.as_str()))
        })
        .map(String::as_str)
}

/// How many features contribute to each component path, and how many
/// components each feature contributes to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureContributions {
    #[serde(default)]
    pub component_to_feature_count: BTreeMap<String, usize>,
    #[serde(default)]
    pub feature_to_component_count: BTreeMap<String, usize>,
}

impl FeatureContributions {
    /// Derives both maps from each feature's `contributes_to` component
    /// paths. Repeated targets within one feature count once.
    pub fn from_feature_targets<F, T, P>(
        features: impl IntoIterator<Item = (F, T)>,
    ) -> Self
    where
        F: Into<String>,
        T: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut contributions = Self::default();
        for (feature_id, targets) in features {
            let targets = targets
                .into_iter()
                .map(|target| target.as_ref().trim().to_string())
                .filter(|target| !target.is_empty())
                .collect::<BTreeSet<String>>();

            contributions
                .feature_to_component_count
                .insert(feature_id.into(), targets.len());
            for target in targets {
                *contributions
                    .component_to_feature_count
                    .entry(target)
                    .or_insert(0) += 1;
            }
        }
        contributions
    }

    pub fn is_empty(&self) -> bool {
        self.component_to_feature_count.is_empty() && self.feature_to_component_count.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn from_lists_builds_lowercased_deduplicated_union() {
        let portfolio = PortfolioNames::from_lists(
            names(&["Huma", "IO"]),
            names(&["huma", "OceanForest"]),
            names(&["CDR Credits", "Ocean  Forest"]),
        );

        assert_eq!(
            portfolio.all_names(),
            names(&["huma", "oceanforest", "cdr credits", "ocean forest"]).as_slice()
        );
        assert_eq!(portfolio.product_names, names(&["Huma", "IO"]));
    }

    #[test]
    fn add_name_appends_lowercased_name() {
        let mut portfolio =
            PortfolioNames::from_lists(names(&["Existing"]), Vec::new(), Vec::new());
        portfolio.add_name("Emergent");
        assert_eq!(portfolio.all_names(), names(&["existing", "emergent"]).as_slice());
    }

    #[test]
    fn add_name_ignores_short_names() {
        let mut portfolio = PortfolioNames::new();
        portfolio.add_name("AB");
        portfolio.add_name("");
        portfolio.add_name("  x ");
        assert!(portfolio.is_empty());
    }

    #[test]
    fn add_name_is_idempotent_ignoring_case() {
        let mut portfolio = PortfolioNames::new();
        portfolio.add_name("Emergent");
        portfolio.add_name("EMERGENT");
        portfolio.add_name("emergent");
        assert_eq!(portfolio.all_names(), names(&["emergent"]).as_slice());
    }

    #[test]
    fn collisions_match_exact_names_ignoring_case() {
        let collisions =
            find_name_collisions(["Huma", "Energy Storage"], &names(&["huma", "oceanforest"]));
        assert_eq!(
            collisions,
            vec![NameCollision {
                name: "Huma".to_string(),
                portfolio_name: "huma".to_string(),
            }]
        );
    }

    #[test]
    fn collisions_match_long_portfolio_names_as_substrings() {
        let collisions = find_name_collisions(["Huma Platform Integration"], &names(&["huma"]));
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].portfolio_name, "huma");
    }

    #[test]
    fn collisions_skip_substring_match_for_short_portfolio_names() {
        let collisions = find_name_collisions(["IoT Gateway"], &names(&["io"]));
        assert!(collisions.is_empty());

        let collisions = find_name_collisions(["Io"], &names(&["io"]));
        assert_eq!(collisions.len(), 1, "exact matches ignore the substring length rule");
    }

    #[test]
    fn feature_targets_derive_both_count_maps() {
        let contributions = FeatureContributions::from_feature_targets([
            ("fd-001", vec!["Product.Energy.Storage", "Product.Energy.Exchange"]),
            ("fd-002", vec!["Product.Energy.Storage", "Product.Energy.Storage"]),
            ("fd-003", vec![]),
        ]);

        assert_eq!(contributions.feature_to_component_count["fd-001"], 2);
        assert_eq!(contributions.feature_to_component_count["fd-002"], 1);
        assert_eq!(contributions.feature_to_component_count["fd-003"], 0);
        assert_eq!(contributions.component_to_feature_count["Product.Energy.Storage"], 2);
        assert_eq!(contributions.component_to_feature_count["Product.Energy.Exchange"], 1);
        assert!(!contributions.is_empty());
        assert!(FeatureContributions::default().is_empty());
    }
}
