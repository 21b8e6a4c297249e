//! The risk engine: one swappable model handle plus the rule-based fallback.
//!
//! All methods are synchronous and may train a network; async callers should
//! run them on a blocking thread.

use std::sync::Arc;

use bina_config::ModelConfig;
use bina_core::enums::ModelVariant;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::dataset::{DatasetLog, PredictionRecord};
use crate::error::ScoringError;
use crate::features::{LabeledSample, RiskFeatures};
use crate::formula::{adaptive_risk, fallback_risk};
use crate::nn::Network;
use crate::recommendation::RiskTier;
use crate::store::{MODEL_TYPE_NEURAL_NETWORK, ModelMeta, ModelStore};
use crate::synthetic::synthetic_dataset;
use crate::trainer::{TrainConfig, TrainingSet, fit};

pub const MODEL_USED_NETWORK: &str = "neural_network";
pub const MODEL_USED_FALLBACK: &str = "fallback";
pub const MODEL_USED_ADAPTIVE: &str = "adaptive";
/// `model_path` reported when a retrain had too few labeled samples.
pub const INSUFFICIENT_DATA: &str = "insufficient_data";
/// `model_path` reported when the network is disabled.
pub const FALLBACK_MODEL: &str = "fallback_model";

/// A trained network with the metadata of the run that produced it.
#[derive(Debug, Clone)]
pub struct RiskModel {
    pub network: Network,
    pub meta: ModelMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub risk_score: f64,
    pub recommendation: String,
    pub tier: RiskTier,
    pub model_used: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrainOutcome {
    pub samples_added: usize,
    pub trained_at: String,
    pub model_path: String,
    pub retrained: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub nn_available: bool,
    pub model_loaded: bool,
    /// `neural_network` when a trained artifact is known, otherwise `fallback`.
    pub model_type: String,
    pub trained_at: Option<String>,
    pub variant: ModelVariant,
}

pub struct RiskEngine {
    config: ModelConfig,
    store: ModelStore,
    dataset: DatasetLog,
    model: RwLock<Option<Arc<RiskModel>>>,
    /// Serializes cold-start training and retraining.
    training: Mutex<()>,
}

impl std::fmt::Debug for RiskEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskEngine")
            .field("enabled", &self.config.enabled)
            .field("variant", &self.config.variant)
            .field("dir", &self.store.dir())
            .field("model_loaded", &self.model.read().is_some())
            .finish_non_exhaustive()
    }
}

impl RiskEngine {
    #[must_use]
    pub fn new(config: ModelConfig) -> Self {
        let store = ModelStore::new(&config.dir, config.variant);
        let dataset = DatasetLog::new(store.dataset_path());
        Self {
            config,
            store,
            dataset,
            model: RwLock::new(None),
            training: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ModelConfig {
        &self.config
    }

    #[must_use]
    pub const fn variant(&self) -> ModelVariant {
        self.config.variant
    }

    #[must_use]
    pub const fn nn_available(&self) -> bool {
        self.config.enabled
    }

    /// Current model snapshot without triggering initialization.
    #[must_use]
    pub fn current_model(&self) -> Option<Arc<RiskModel>> {
        self.model.read().clone()
    }

    /// Return the model, loading or training it on first use.
    ///
    /// `None` when the network is disabled or cold-start training failed;
    /// callers then use the rule-based formula.
    pub fn ensure_model(&self) -> Option<Arc<RiskModel>> {
        if !self.config.enabled {
            return None;
        }
        if let Some(model) = self.current_model() {
            return Some(model);
        }

        let _training = self.training.lock();
        if let Some(model) = self.current_model() {
            return Some(model);
        }

        let model = match self.load_persisted() {
            Some(model) => model,
            None => match self.train_synthetic() {
                Ok(model) => model,
                Err(e) => {
                    tracing::warn!(error = %e, "cold-start training failed; using rule-based scoring");
                    return None;
                }
            },
        };
        let model = Arc::new(model);
        *self.model.write() = Some(Arc::clone(&model));
        Some(model)
    }

    fn load_persisted(&self) -> Option<RiskModel> {
        match self.store.load_model() {
            Ok(Some(network)) => {
                let meta = self.store.load_meta().unwrap_or_else(|| ModelMeta {
                    trained_at: String::new(),
                    model_type: MODEL_TYPE_NEURAL_NETWORK.into(),
                    synthetic_data: false,
                    n_samples: None,
                    variant: self.config.variant,
                });
                tracing::info!(path = %self.store.model_path().display(), "loaded risk model");
                Some(RiskModel { network, meta })
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(path = %self.store.model_path().display(), error = %e, "ignoring unusable model artifact");
                None
            }
        }
    }

    fn train_synthetic(&self) -> Result<RiskModel, ScoringError> {
        tracing::info!(variant = %self.config.variant, "training risk model on synthetic data");
        let data = synthetic_dataset(self.config.variant)?;
        let config = TrainConfig::from_model_config(&self.config);
        self.train_and_persist(&data, &config, true)
    }

    /// Train a fresh network and write it to disk. Persistence failures are
    /// logged; the trained model is still returned.
    fn train_and_persist(
        &self,
        data: &TrainingSet,
        config: &TrainConfig,
        synthetic: bool,
    ) -> Result<RiskModel, ScoringError> {
        let mut rng = StdRng::from_entropy();
        let mut network = Network::for_variant(self.config.variant, &mut rng);
        let report = fit(&mut network, data, config, &mut rng)?;
        tracing::info!(
            epochs = report.epochs_run,
            best_epoch = report.best_epoch,
            best_loss = report.best_loss,
            "risk model trained"
        );

        let meta = ModelMeta {
            trained_at: Utc::now().to_rfc3339(),
            model_type: MODEL_TYPE_NEURAL_NETWORK.into(),
            synthetic_data: synthetic,
            n_samples: (!synthetic).then_some(data.len()),
            variant: self.config.variant,
        };
        if let Err(e) = self.store.save_model(&network) {
            tracing::warn!(error = %e, "failed to persist risk model");
        }
        if let Err(e) = self.store.save_meta(&meta) {
            tracing::warn!(error = %e, "failed to persist model metadata");
        }
        Ok(RiskModel { network, meta })
    }

    /// Score a feature set and log the prediction to the dataset file.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::InvalidFeatures` for non-finite inputs.
    pub fn predict(&self, features: &RiskFeatures) -> Result<Prediction, ScoringError> {
        features.validate()?;
        let variant = self.config.variant;
        let vector = features.to_vector(variant);

        let network_score = self.ensure_model().and_then(|model| {
            model
                .network
                .predict_one(&vector)
                .map_err(|e| tracing::warn!(error = %e, "network prediction failed"))
                .ok()
        });

        let (risk_score, model_used) = match network_score {
            Some(score) => (score, MODEL_USED_NETWORK),
            None => self.rule_score(features),
        };
        let tier = RiskTier::from_score(risk_score);

        let record = PredictionRecord {
            features: vector,
            risk_score,
            model_used: model_used.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };
        if let Err(e) = self.dataset.append_prediction(&record) {
            tracing::debug!(error = %e, "prediction not logged");
        }

        Ok(Prediction {
            risk_score,
            recommendation: tier.recommendation(variant).to_string(),
            tier,
            model_used: model_used.to_string(),
        })
    }

    fn rule_score(&self, features: &RiskFeatures) -> (f64, &'static str) {
        match &self.config.adaptive_weights {
            Some(weights) => (adaptive_risk(features, weights), MODEL_USED_ADAPTIVE),
            None => (fallback_risk(features), MODEL_USED_FALLBACK),
        }
    }

    /// Append labeled samples and retrain from the full labeled history.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError` if the samples cannot be appended or training fails.
    pub fn retrain(
        &self,
        samples: &[LabeledSample],
        epochs: usize,
    ) -> Result<RetrainOutcome, ScoringError> {
        if !self.config.enabled {
            return Ok(RetrainOutcome {
                samples_added: 0,
                trained_at: Utc::now().to_rfc3339(),
                model_path: FALLBACK_MODEL.into(),
                retrained: false,
            });
        }
        for sample in samples {
            sample.features.validate()?;
        }

        let _training = self.training.lock();
        let added = self.dataset.append_samples(samples)?;

        let (data, synthetic) = match self.dataset.load_labeled() {
            Ok(history) => (TrainingSet::from_samples(&history, self.config.variant)?, false),
            Err(e) => {
                tracing::warn!(error = %e, "dataset unreadable; retraining on synthetic data");
                (synthetic_dataset(self.config.variant)?, true)
            }
        };

        if data.len() < self.config.min_retrain_samples {
            tracing::info!(
                labeled = data.len(),
                required = self.config.min_retrain_samples,
                "not enough labeled samples to retrain"
            );
            return Ok(RetrainOutcome {
                samples_added: added,
                trained_at: Utc::now().to_rfc3339(),
                model_path: INSUFFICIENT_DATA.into(),
                retrained: false,
            });
        }

        let config = TrainConfig::from_model_config(&self.config).with_epochs(epochs);
        let model = self.train_and_persist(&data, &config, synthetic)?;
        let trained_at = model.meta.trained_at.clone();
        *self.model.write() = Some(Arc::new(model));

        Ok(RetrainOutcome {
            samples_added: added,
            trained_at,
            model_path: self.store.model_path().display().to_string(),
            retrained: true,
        })
    }

    /// Discard any current model and train a new one on synthetic data.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::Training` if the network is disabled or training fails.
    pub fn retrain_synthetic(&self) -> Result<ModelMeta, ScoringError> {
        if !self.config.enabled {
            return Err(ScoringError::Training("risk network is disabled".into()));
        }
        let _training = self.training.lock();
        let model = self.train_synthetic()?;
        let meta = model.meta.clone();
        *self.model.write() = Some(Arc::new(model));
        Ok(meta)
    }

    #[must_use]
    pub fn status(&self) -> EngineStatus {
        let loaded = self.current_model();
        let meta = loaded
            .as_ref()
            .map(|m| m.meta.clone())
            .or_else(|| self.store.load_meta());
        EngineStatus {
            nn_available: self.config.enabled,
            model_loaded: loaded.is_some(),
            model_type: meta
                .as_ref()
                .map_or_else(|| MODEL_USED_FALLBACK.to_string(), |m| m.model_type.clone()),
            trained_at: meta.map(|m| m.trained_at).filter(|t| !t.is_empty()),
            variant: self.config.variant,
        }
    }
}
