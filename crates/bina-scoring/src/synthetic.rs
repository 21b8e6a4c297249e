//! Synthetic cold-start datasets.
//!
//! `standard`: 1000 draws from per-feature normal distributions (exponential
//! for reaction time), labelled high risk when a noisy weighted deficit
//! exceeds 0.6. `compact`: 2000 uniform accuracy triples from a fixed seed,
//! labelled high risk when the mean is below 0.6 or both letters and words are
//! below 0.55.
//!
//! The standard threshold sits high in the deficit distribution, so only about
//! 2% of standard rows are positive. A network trained on it alone rarely
//! scores above the medium tier even for an all-wrong child; retraining on
//! labeled samples is what moves it.

use bina_core::enums::ModelVariant;
use ndarray::{Array2, Axis};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal};

use crate::error::ScoringError;
use crate::features::{REACTION_TIME_CEILING, RiskFeatures};
use crate::trainer::TrainingSet;

pub const STANDARD_SAMPLES: usize = 1000;
pub const COMPACT_SAMPLES: usize = 2000;
pub const COMPACT_SEED: u64 = 42;

const STANDARD_LABEL_THRESHOLD: f64 = 0.6;

/// The cold-start dataset for `variant`. The standard set is freshly random
/// on every call; the compact set is identical on every call.
///
/// # Errors
///
/// Returns `ScoringError::Training` if a sampling distribution cannot be built.
pub fn synthetic_dataset(variant: ModelVariant) -> Result<TrainingSet, ScoringError> {
    match variant {
        ModelVariant::Standard => standard_dataset(STANDARD_SAMPLES, &mut StdRng::from_entropy()),
        ModelVariant::Compact => Ok(compact_dataset(
            COMPACT_SAMPLES,
            &mut StdRng::seed_from_u64(COMPACT_SEED),
        )),
    }
}

fn normal(mean: f64, std: f64) -> Result<Normal<f64>, ScoringError> {
    Normal::new(mean, std).map_err(|e| ScoringError::Training(format!("normal({mean}, {std}): {e}")))
}

/// Six-feature samples in the standard layout.
///
/// # Errors
///
/// Returns `ScoringError::Training` if a sampling distribution cannot be built.
pub fn standard_dataset<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<TrainingSet, ScoringError> {
    let letters = normal(0.7, 0.2)?;
    let words = normal(0.65, 0.25)?;
    let arrange = normal(0.6, 0.3)?;
    let speech = normal(0.75, 0.2)?;
    let image = normal(0.6, 0.25)?;
    let noise = normal(0.0, 0.05)?;
    // Mean reaction time of 2 s.
    let reaction = Exp::<f64>::new(0.5).map_err(|e| ScoringError::Training(format!("exp(0.5): {e}")))?;

    let mut x = Array2::zeros((n, ModelVariant::Standard.input_dim()));
    let mut y = Array2::zeros((n, 1));

    for (mut row, mut label) in x.axis_iter_mut(Axis(0)).zip(y.axis_iter_mut(Axis(0))) {
        let clip = |v: f64| v.clamp(0.0, 1.0);
        let features = RiskFeatures {
            letters_accuracy: clip(letters.sample(rng)),
            words_accuracy: clip(words.sample(rng)),
            arrange_accuracy: clip(arrange.sample(rng)),
            speech_accuracy: Some(clip(speech.sample(rng))),
            image_accuracy: Some(clip(image.sample(rng))),
            avg_reaction_time: Some(reaction.sample(rng).clamp(0.5, 2.0 * REACTION_TIME_CEILING)),
        };
        let rt_norm = features.normalized_reaction_time();

        let deficit = (1.0 - features.letters_accuracy) * 0.25
            + (1.0 - features.words_accuracy) * 0.25
            + (1.0 - features.arrange_accuracy) * 0.20
            + (1.0 - features.speech()) * 0.15
            + (1.0 - features.image()) * 0.10
            + (1.0 - rt_norm) * 0.05;
        let risk = (deficit + noise.sample(rng)).clamp(0.0, 1.0);

        for (slot, value) in row.iter_mut().zip(features.to_vector(ModelVariant::Standard)) {
            *slot = value;
        }
        label[0] = if risk > STANDARD_LABEL_THRESHOLD { 1.0 } else { 0.0 };
    }

    Ok(TrainingSet { x, y })
}

/// Three-feature uniform samples in the compact layout.
pub fn compact_dataset<R: Rng + ?Sized>(n: usize, rng: &mut R) -> TrainingSet {
    let x = Array2::random_using((n, ModelVariant::Compact.input_dim()), Uniform::new(0.0, 1.0), rng);
    let y = Array2::from_shape_fn((n, 1), |(i, _)| {
        let row = x.row(i);
        let mean = row.mean().unwrap_or(0.0);
        let weak_reading = row[0] < 0.55 && row[1] < 0.55;
        if mean < 0.6 || weak_reading { 1.0 } else { 0.0 }
    });
    TrainingSet { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_shape_and_ranges() {
        let mut rng = StdRng::seed_from_u64(5);
        let set = standard_dataset(500, &mut rng).unwrap();
        assert_eq!(set.x.dim(), (500, 6));
        assert_eq!(set.y.dim(), (500, 1));
        assert!(set.x.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(set.y.iter().all(|v| *v == 0.0 || *v == 1.0));

        let positives = set.y.iter().filter(|v| **v == 1.0).count();
        assert!(positives > 0 && positives < 500, "{positives} positives");
    }

    #[test]
    fn compact_is_deterministic() {
        let a = synthetic_dataset(ModelVariant::Compact).unwrap();
        let b = synthetic_dataset(ModelVariant::Compact).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.x.dim(), (COMPACT_SAMPLES, 3));
    }

    #[test]
    fn compact_labels_follow_rule() {
        let mut rng = StdRng::seed_from_u64(8);
        let set = compact_dataset(300, &mut rng);
        for (row, label) in set.x.rows().into_iter().zip(set.y.iter()) {
            let mean = (row[0] + row[1] + row[2]) / 3.0;
            let expected = mean < 0.6 || (row[0] < 0.55 && row[1] < 0.55);
            assert_eq!(*label == 1.0, expected);
        }
    }

    #[test]
    fn standard_default_size() {
        let set = synthetic_dataset(ModelVariant::Standard).unwrap();
        assert_eq!(set.len(), STANDARD_SAMPLES);
    }
}
