pub mod assess;
pub mod maturity;

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};
use vmq::model::{ValueModel, ValueModelSet};

use crate::util::read_json;

/// Loads a snapshot of per-file value models and merges it per track.
/// Fragments without a `file_path` are keyed by their position in the
/// snapshot.
pub fn load_model_set(path: &Path) -> Result<ValueModelSet> {
    let models: Vec<ValueModel> = read_json(path)?;
    if models.is_empty() {
        warn!(path = %path.display(), "value model snapshot contains no models");
    }

    let mut set = ValueModelSet::new();
    for (index, mut model) in models.into_iter().enumerate() {
        if model.file_path.trim().is_empty() {
            model.file_path = format!("{}#{index}", path.display());
        }
        set.insert_file(model);
    }

    info!(
        path = %path.display(),
        files = set.files().count(),
        tracks = set.tracks().count(),
        "loaded value models"
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use vmq::model::Track;

    use super::*;

    #[test]
    fn load_model_set_merges_snapshot_fragments() {
        let dir = std::env::temp_dir().join(format!("vmq-models-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("scratch dir should be created");
        let path = dir.join("models.json");
        let snapshot = serde_json::json!([
            {
                "track_name": "Product",
                "file_path": "values/energy.value_model.yaml",
                "layers": [{ "name": "Energy Transformation", "components": [] }]
            },
            {
                "track": "product",
                "layers": [{ "name": "Service Delivery" }]
            },
            { "track_name": "OrgOps", "layers": [] }
        ]);
        fs::write(&path, serde_json::to_vec(&snapshot).expect("fixture should serialize"))
            .expect("fixture should be written");

        let set = load_model_set(&path).expect("snapshot should load");
        let product = set.product().expect("product track should be merged");
        assert_eq!(product.layers.len(), 2);
        assert_eq!(set.product_files().len(), 2);
        assert!(set.track(Track::OrgOps).is_some());
        assert_eq!(set.models_with_layers(), 1);

        let _ = fs::remove_dir_all(&dir);
    }
}
