//! Risk feature set.
//!
//! The three accuracies always come from graded items. Speech accuracy, image
//! accuracy and reaction time are optional and fall back to the constants below.

use bina_core::enums::ModelVariant;
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

pub const DEFAULT_SPEECH_ACCURACY: f64 = 0.5;
pub const DEFAULT_IMAGE_ACCURACY: f64 = 0.5;
/// Seconds.
pub const DEFAULT_REACTION_TIME: f64 = 2.0;
/// Reaction time (seconds) at which the normalized value reaches zero.
pub const REACTION_TIME_CEILING: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFeatures {
    pub letters_accuracy: f64,
    pub words_accuracy: f64,
    pub arrange_accuracy: f64,
    #[serde(default)]
    pub speech_accuracy: Option<f64>,
    #[serde(default)]
    pub image_accuracy: Option<f64>,
    /// Mean reaction time in seconds.
    #[serde(default)]
    pub avg_reaction_time: Option<f64>,
}

impl RiskFeatures {
    /// Features from the three graded accuracies only.
    #[must_use]
    pub const fn from_accuracies(letters: f64, words: f64, arrange: f64) -> Self {
        Self {
            letters_accuracy: letters,
            words_accuracy: words,
            arrange_accuracy: arrange,
            speech_accuracy: None,
            image_accuracy: None,
            avg_reaction_time: None,
        }
    }

    #[must_use]
    pub fn speech(&self) -> f64 {
        self.speech_accuracy.unwrap_or(DEFAULT_SPEECH_ACCURACY)
    }

    #[must_use]
    pub fn image(&self) -> f64 {
        self.image_accuracy.unwrap_or(DEFAULT_IMAGE_ACCURACY)
    }

    #[must_use]
    pub fn reaction_time(&self) -> f64 {
        self.avg_reaction_time.unwrap_or(DEFAULT_REACTION_TIME)
    }

    /// `1.0` for an instant answer, `0.0` at or beyond [`REACTION_TIME_CEILING`].
    #[must_use]
    pub fn normalized_reaction_time(&self) -> f64 {
        (1.0 - self.reaction_time() / REACTION_TIME_CEILING).clamp(0.0, 1.0)
    }

    /// Network input vector for `variant`.
    ///
    /// ```text
    /// standard: [letters, words, arrange, speech, image, rt_norm]
    /// compact:  [letters, words, arrange]
    /// ```
    #[must_use]
    pub fn to_vector(&self, variant: ModelVariant) -> Vec<f64> {
        match variant {
            ModelVariant::Standard => vec![
                self.letters_accuracy,
                self.words_accuracy,
                self.arrange_accuracy,
                self.speech(),
                self.image(),
                self.normalized_reaction_time(),
            ],
            ModelVariant::Compact => vec![
                self.letters_accuracy,
                self.words_accuracy,
                self.arrange_accuracy,
            ],
        }
    }

    /// Reject non-finite values and negative reaction times.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::InvalidFeatures` naming the first bad field.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let fields = [
            ("letters_accuracy", Some(self.letters_accuracy)),
            ("words_accuracy", Some(self.words_accuracy)),
            ("arrange_accuracy", Some(self.arrange_accuracy)),
            ("speech_accuracy", self.speech_accuracy),
            ("image_accuracy", self.image_accuracy),
            ("avg_reaction_time", self.avg_reaction_time),
        ];
        for (name, value) in fields {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(ScoringError::InvalidFeatures(format!("{name} must be finite")));
            }
        }
        if self.reaction_time() < 0.0 {
            return Err(ScoringError::InvalidFeatures(
                "avg_reaction_time must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// A feature set with a risk label in `[0, 1]` (`0` low risk, `1` high risk).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    #[serde(flatten)]
    pub features: RiskFeatures,
    pub label: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn optional_features_use_defaults() {
        let f = RiskFeatures::from_accuracies(1.0, 0.5, 0.0);
        assert_eq!(
            f.to_vector(ModelVariant::Standard),
            vec![1.0, 0.5, 0.0, 0.5, 0.5, 0.6]
        );
        assert_eq!(f.to_vector(ModelVariant::Compact), vec![1.0, 0.5, 0.0]);
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(2.5, 0.5)]
    #[case(5.0, 0.0)]
    #[case(9.0, 0.0)]
    fn reaction_time_normalization(#[case] secs: f64, #[case] expected: f64) {
        let f = RiskFeatures {
            avg_reaction_time: Some(secs),
            ..RiskFeatures::from_accuracies(1.0, 1.0, 1.0)
        };
        assert!((f.normalized_reaction_time() - expected).abs() < 1e-12);
    }

    #[test]
    fn vector_length_matches_variant_input_dim() {
        let f = RiskFeatures::from_accuracies(0.2, 0.3, 0.4);
        for variant in [ModelVariant::Standard, ModelVariant::Compact] {
            assert_eq!(f.to_vector(variant).len(), variant.input_dim());
        }
    }

    #[test]
    fn missing_optional_fields_deserialize_as_none() {
        let f: RiskFeatures = serde_json::from_str(
            r#"{"letters_accuracy": 0.5, "words_accuracy": 0.25, "arrange_accuracy": 1.0}"#,
        )
        .unwrap();
        assert_eq!(f, RiskFeatures::from_accuracies(0.5, 0.25, 1.0));
    }

    #[test]
    fn labeled_sample_is_flat() {
        let json = r#"{"letters_accuracy":0.1,"words_accuracy":0.2,"arrange_accuracy":0.3,"speech_accuracy":0.9,"label":1.0}"#;
        let sample: LabeledSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.features.speech_accuracy, Some(0.9));
        assert!((sample.label - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_finite_is_rejected() {
        let f = RiskFeatures::from_accuracies(f64::NAN, 0.0, 0.0);
        assert!(matches!(f.validate(), Err(ScoringError::InvalidFeatures(_))));

        let slow = RiskFeatures {
            avg_reaction_time: Some(-1.0),
            ..RiskFeatures::from_accuracies(0.0, 0.0, 0.0)
        };
        assert!(slow.validate().is_err());
    }
}
