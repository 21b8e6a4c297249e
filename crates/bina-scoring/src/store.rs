//! Model artifacts on disk.
//!
//! ```text
//! <dir>/risk_model_<variant>.json   serialized Network
//! <dir>/meta_<variant>.json         ModelMeta
//! <dir>/dataset.jsonl               see `dataset`
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use bina_core::enums::ModelVariant;
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::nn::Network;

pub const DATASET_FILE: &str = "dataset.jsonl";
pub const MODEL_TYPE_NEURAL_NETWORK: &str = "neural_network";

/// Written next to the artifact after every training run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMeta {
    /// RFC 3339.
    pub trained_at: String,
    pub model_type: String,
    pub synthetic_data: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_samples: Option<usize>,
    #[serde(default)]
    pub variant: ModelVariant,
}

#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
    variant: ModelVariant,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>, variant: ModelVariant) -> Self {
        Self {
            dir: dir.into(),
            variant,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        self.dir.join(format!("risk_model_{}.json", self.variant))
    }

    #[must_use]
    pub fn meta_path(&self) -> PathBuf {
        self.dir.join(format!("meta_{}.json", self.variant))
    }

    #[must_use]
    pub fn dataset_path(&self) -> PathBuf {
        self.dir.join(DATASET_FILE)
    }

    /// Load the persisted network. `Ok(None)` when no artifact exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact exists but is unreadable, malformed,
    /// or does not match this store's variant.
    pub fn load_model(&self) -> Result<Option<Network>, ScoringError> {
        let file = match File::open(self.model_path()) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let network: Network = serde_json::from_reader(BufReader::new(file))?;
        if network.variant != self.variant {
            return Err(ScoringError::Shape {
                expected: self.variant.input_dim(),
                actual: network.input_dim(),
            });
        }
        network.validate()?;
        Ok(Some(network))
    }

    /// # Errors
    ///
    /// Returns `ScoringError` if the directory or file cannot be written.
    pub fn save_model(&self, network: &Network) -> Result<PathBuf, ScoringError> {
        let path = self.model_path();
        write_json(&self.dir, &path, network)?;
        Ok(path)
    }

    /// `None` when the file is missing, unreadable, or describes another variant.
    #[must_use]
    pub fn load_meta(&self) -> Option<ModelMeta> {
        let file = File::open(self.meta_path()).ok()?;
        match serde_json::from_reader::<_, ModelMeta>(BufReader::new(file)) {
            Ok(meta) if meta.variant == self.variant => Some(meta),
            Ok(meta) => {
                tracing::warn!(path = %self.meta_path().display(), found = %meta.variant, "ignoring metadata of another variant");
                None
            }
            Err(e) => {
                tracing::warn!(path = %self.meta_path().display(), error = %e, "ignoring unreadable model metadata");
                None
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ScoringError` if the directory or file cannot be written.
    pub fn save_meta(&self, meta: &ModelMeta) -> Result<(), ScoringError> {
        write_json(&self.dir, &self.meta_path(), meta)
    }
}

fn write_json<T: Serialize>(dir: &Path, path: &Path, value: &T) -> Result<(), ScoringError> {
    std::fs::create_dir_all(dir)?;
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn paths_follow_variant() {
        let store = ModelStore::new("/var/models", ModelVariant::Compact);
        assert_eq!(store.model_path(), PathBuf::from("/var/models/risk_model_compact.json"));
        assert_eq!(store.meta_path(), PathBuf::from("/var/models/meta_compact.json"));
        assert_eq!(store.dataset_path(), PathBuf::from("/var/models/dataset.jsonl"));
    }

    #[test]
    fn missing_artifacts_are_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path(), ModelVariant::Standard);
        assert!(store.load_model().unwrap().is_none());
        assert!(store.load_meta().is_none());
    }

    #[test]
    fn model_and_meta_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("nested"), ModelVariant::Standard);
        let net = Network::for_variant(ModelVariant::Standard, &mut StdRng::seed_from_u64(1));

        store.save_model(&net).unwrap();
        assert_eq!(store.load_model().unwrap(), Some(net));

        let meta = ModelMeta {
            trained_at: "2026-03-01T08:00:00+00:00".into(),
            model_type: MODEL_TYPE_NEURAL_NETWORK.into(),
            synthetic_data: true,
            n_samples: None,
            variant: ModelVariant::Standard,
        };
        store.save_meta(&meta).unwrap();
        assert_eq!(store.load_meta(), Some(meta));
    }

    #[test]
    fn artifact_of_other_variant_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let compact = Network::for_variant(ModelVariant::Compact, &mut StdRng::seed_from_u64(1));
        let path = dir.path().join("risk_model_standard.json");
        std::fs::write(&path, serde_json::to_string(&compact).unwrap()).unwrap();

        let store = ModelStore::new(dir.path(), ModelVariant::Standard);
        assert!(store.load_model().is_err());
    }

    #[test]
    fn corrupt_meta_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path(), ModelVariant::Standard);
        std::fs::write(store.meta_path(), "{").unwrap();
        assert!(store.load_meta().is_none());
    }

    #[test]
    fn meta_is_kept_per_variant() {
        let dir = tempfile::tempdir().unwrap();
        let standard = ModelStore::new(dir.path(), ModelVariant::Standard);
        let compact = ModelStore::new(dir.path(), ModelVariant::Compact);

        let meta = ModelMeta {
            trained_at: "2026-03-01T08:00:00+00:00".into(),
            model_type: MODEL_TYPE_NEURAL_NETWORK.into(),
            synthetic_data: false,
            n_samples: Some(40),
            variant: ModelVariant::Compact,
        };
        compact.save_meta(&meta).unwrap();

        assert_eq!(compact.load_meta(), Some(meta.clone()));
        assert!(standard.load_meta().is_none());

        // A mislabelled file under the standard name is not trusted either.
        std::fs::copy(compact.meta_path(), standard.meta_path()).unwrap();
        assert!(standard.load_meta().is_none());
    }
}
