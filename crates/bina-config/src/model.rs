//! Risk model configuration: where artifacts live, which variant to train,
//! and how the rule-based path weighs features.

use bina_core::enums::ModelVariant;
use serde::{Deserialize, Serialize};

const fn default_enabled() -> bool {
    true
}

fn default_dir() -> String {
    "models".to_string()
}

const fn default_epochs() -> usize {
    30
}

const fn default_batch_size() -> usize {
    64
}

const fn default_patience() -> usize {
    5
}

/// Minimum cumulative labeled samples before a retrain actually trains.
const fn default_min_retrain_samples() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// When false, the network is never built and every prediction uses the
    /// rule-based formula.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Directory holding the model artifact, its `meta_<variant>.json` and `dataset.jsonl`.
    #[serde(default = "default_dir")]
    pub dir: String,

    #[serde(default)]
    pub variant: ModelVariant,

    /// Maximum epochs for cold-start training. Retrain requests carry their own.
    #[serde(default = "default_epochs")]
    pub epochs: usize,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Early-stopping patience, in epochs without validation improvement.
    #[serde(default = "default_patience")]
    pub patience: usize,

    #[serde(default = "default_min_retrain_samples")]
    pub min_retrain_samples: usize,

    /// Switches the rule-based path from the fallback formula to the adaptive one.
    #[serde(default)]
    pub adaptive_weights: Option<AdaptiveWeights>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            dir: default_dir(),
            variant: ModelVariant::default(),
            epochs: default_epochs(),
            batch_size: default_batch_size(),
            patience: default_patience(),
            min_retrain_samples: default_min_retrain_samples(),
            adaptive_weights: None,
        }
    }
}

/// Per-feature weights for the adaptive rule formula.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct AdaptiveWeights {
    pub letters_accuracy: f64,
    pub words_accuracy: f64,
    pub arrange_accuracy: f64,
    pub speech_accuracy: f64,
    /// Multiplier on the slow-reaction penalty.
    pub reaction_time: f64,
}

impl Default for AdaptiveWeights {
    fn default() -> Self {
        Self {
            letters_accuracy: 0.3,
            words_accuracy: 0.3,
            arrange_accuracy: 0.25,
            speech_accuracy: 0.15,
            reaction_time: 0.2,
        }
    }
}

impl AdaptiveWeights {
    fn as_array(&self) -> [(&'static str, f64); 5] {
        [
            ("letters_accuracy", self.letters_accuracy),
            ("words_accuracy", self.words_accuracy),
            ("arrange_accuracy", self.arrange_accuracy),
            ("speech_accuracy", self.speech_accuracy),
            ("reaction_time", self.reaction_time),
        ]
    }

    /// First weight that is negative or not finite, if any.
    #[must_use]
    pub fn first_invalid(&self) -> Option<&'static str> {
        self.as_array()
            .into_iter()
            .find(|(_, w)| !w.is_finite() || *w < 0.0)
            .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ModelConfig::default();
        assert!(config.enabled);
        assert_eq!(config.dir, "models");
        assert_eq!(config.variant, ModelVariant::Standard);
        assert_eq!(config.epochs, 30);
        assert_eq!(config.batch_size, 64);
        assert_eq!(config.patience, 5);
        assert_eq!(config.min_retrain_samples, 10);
        assert!(config.adaptive_weights.is_none());
    }

    #[test]
    fn adaptive_weight_validation() {
        assert_eq!(AdaptiveWeights::default().first_invalid(), None);
        let bad = AdaptiveWeights {
            words_accuracy: -0.1,
            ..AdaptiveWeights::default()
        };
        assert_eq!(bad.first_invalid(), Some("words_accuracy"));
    }
}
