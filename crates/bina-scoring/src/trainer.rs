//! Mini-batch training with a held-out validation tail and early stopping.

use bina_config::ModelConfig;
use bina_core::enums::ModelVariant;
use ndarray::{Array2, Axis, Slice};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::ScoringError;
use crate::features::LabeledSample;
use crate::nn::{Adam, Network};

/// Feature matrix and `(n, 1)` label column.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
}

impl TrainingSet {
    /// Build from labeled samples using `variant`'s feature layout.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::Training` if the rows cannot form a matrix.
    pub fn from_samples(samples: &[LabeledSample], variant: ModelVariant) -> Result<Self, ScoringError> {
        let dim = variant.input_dim();
        let flat: Vec<f64> = samples
            .iter()
            .flat_map(|s| s.features.to_vector(variant))
            .collect();
        let labels: Vec<f64> = samples.iter().map(|s| s.label.clamp(0.0, 1.0)).collect();

        let x = Array2::from_shape_vec((samples.len(), dim), flat)
            .map_err(|e| ScoringError::Training(e.to_string()))?;
        let y = Array2::from_shape_vec((samples.len(), 1), labels)
            .map_err(|e| ScoringError::Training(e.to_string()))?;
        Ok(Self { x, y })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Split off the last `fraction` of rows as validation data, unshuffled.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn split_tail(&self, fraction: f64) -> (Self, Option<Self>) {
        let n = self.len();
        let n_val = ((n as f64) * fraction.clamp(0.0, 1.0)).floor() as usize;
        if n_val == 0 || n_val >= n {
            return (self.clone(), None);
        }
        let cut = n - n_val;
        let train = Self {
            x: self.x.slice_axis(Axis(0), Slice::from(..cut)).to_owned(),
            y: self.y.slice_axis(Axis(0), Slice::from(..cut)).to_owned(),
        };
        let val = Self {
            x: self.x.slice_axis(Axis(0), Slice::from(cut..)).to_owned(),
            y: self.y.slice_axis(Axis(0), Slice::from(cut..)).to_owned(),
        };
        (train, Some(val))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub patience: usize,
    pub learning_rate: f64,
    pub validation_split: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 30,
            batch_size: 64,
            patience: 5,
            learning_rate: Adam::DEFAULT_LEARNING_RATE,
            validation_split: 0.2,
        }
    }
}

impl TrainConfig {
    #[must_use]
    pub fn from_model_config(config: &ModelConfig) -> Self {
        Self {
            epochs: config.epochs,
            batch_size: config.batch_size,
            patience: config.patience,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub epochs_run: usize,
    /// Epoch (1-based) whose weights were kept.
    pub best_epoch: usize,
    /// Monitored loss at `best_epoch`: validation loss when a split exists,
    /// otherwise training loss.
    pub best_loss: f64,
    pub stopped_early: bool,
    pub train_losses: Vec<f64>,
    pub val_losses: Vec<f64>,
}

/// Train `network` in place.
///
/// Training rows are reshuffled every epoch. When validation loss fails to
/// improve for `patience` epochs, training stops; the best weights seen are
/// always restored before returning.
///
/// # Errors
///
/// Returns `ScoringError::Training` for an empty set or zero batch size, and
/// `ScoringError::Shape` if the set's width does not match the network.
#[allow(clippy::cast_precision_loss)]
pub fn fit<R: Rng + ?Sized>(
    network: &mut Network,
    data: &TrainingSet,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainReport, ScoringError> {
    if data.is_empty() {
        return Err(ScoringError::Training("no training samples".into()));
    }
    if config.batch_size == 0 {
        return Err(ScoringError::Training("batch size must be positive".into()));
    }
    if data.x.ncols() != network.input_dim() {
        return Err(ScoringError::Shape {
            expected: network.input_dim(),
            actual: data.x.ncols(),
        });
    }

    let (train, val) = data.split_tail(config.validation_split);
    tracing::info!(
        train = train.len(),
        validation = val.as_ref().map_or(0, TrainingSet::len),
        epochs = config.epochs,
        "training risk network"
    );

    let mut optimizer = Adam::new(config.learning_rate, &network.layers);
    let mut indices: Vec<usize> = (0..train.len()).collect();

    let mut report = TrainReport {
        epochs_run: 0,
        best_epoch: 0,
        best_loss: f64::INFINITY,
        stopped_early: false,
        train_losses: Vec::with_capacity(config.epochs),
        val_losses: Vec::new(),
    };
    let mut best_layers = network.layers.clone();
    let mut since_best = 0;

    for epoch in 1..=config.epochs {
        indices.shuffle(rng);
        let mut total = 0.0;
        let mut batches = 0_usize;
        for chunk in indices.chunks(config.batch_size) {
            let xb = train.x.select(Axis(0), chunk);
            let yb = train.y.select(Axis(0), chunk);
            let (loss, grads) = network.loss_and_gradients(&xb, &yb, rng);
            optimizer.step(&mut network.layers, &grads);
            total += loss;
            batches += 1;
        }
        let train_loss = total / batches.max(1) as f64;
        report.train_losses.push(train_loss);
        report.epochs_run = epoch;

        let monitored = match &val {
            Some(v) => {
                let loss = network.evaluate(&v.x, &v.y);
                report.val_losses.push(loss);
                loss
            }
            None => train_loss,
        };
        tracing::debug!(epoch, train_loss, monitored, "epoch finished");

        if monitored < report.best_loss {
            report.best_loss = monitored;
            report.best_epoch = epoch;
            best_layers.clone_from(&network.layers);
            since_best = 0;
        } else {
            since_best += 1;
            if since_best >= config.patience {
                tracing::info!(epoch, best_epoch = report.best_epoch, "early stopping");
                report.stopped_early = true;
                break;
            }
        }
    }

    network.layers = best_layers;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::RiskFeatures;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn separable(n: usize) -> Vec<LabeledSample> {
        (0..n)
            .map(|i| {
                let high = i % 2 == 0;
                let acc = if high { 0.1 } else { 0.9 };
                LabeledSample {
                    features: RiskFeatures::from_accuracies(acc, acc, acc),
                    label: if high { 1.0 } else { 0.0 },
                }
            })
            .collect()
    }

    #[test]
    fn split_keeps_tail_for_validation() {
        let set = TrainingSet::from_samples(&separable(10), ModelVariant::Compact).unwrap();
        let (train, val) = set.split_tail(0.2);
        let val = val.unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(val.len(), 2);
        assert_eq!(val.x.row(1), set.x.row(9));
    }

    #[test]
    fn split_preserves_columns_and_label_alignment() {
        let set = TrainingSet::from_samples(&separable(20), ModelVariant::Standard).unwrap();
        let (train, val) = set.split_tail(0.25);
        let val = val.unwrap();
        assert_eq!(train.x.dim(), (15, 6));
        assert_eq!(train.y.dim(), (15, 1));
        assert_eq!(val.x.dim(), (5, 6));
        assert_eq!(val.y.dim(), (5, 1));
        assert_eq!(train.x.row(0), set.x.row(0));
        assert_eq!(train.y.row(14), set.y.row(14));
        assert_eq!(val.x.row(0), set.x.row(15));
        assert_eq!(val.y.row(4), set.y.row(19));
    }

    #[test]
    fn tiny_sets_have_no_validation() {
        let set = TrainingSet::from_samples(&separable(3), ModelVariant::Compact).unwrap();
        let (train, val) = set.split_tail(0.2);
        assert_eq!(train.len(), 3);
        assert!(val.is_none());
    }

    #[test]
    fn training_reduces_loss_on_separable_data() {
        let mut rng = StdRng::seed_from_u64(42);
        let set = TrainingSet::from_samples(&separable(200), ModelVariant::Compact).unwrap();
        let mut net = Network::for_variant(ModelVariant::Compact, &mut rng);
        let before = net.evaluate(&set.x, &set.y);

        let config = TrainConfig {
            epochs: 200,
            batch_size: 16,
            learning_rate: 0.01,
            patience: 200,
            ..TrainConfig::default()
        };
        let report = fit(&mut net, &set, &config, &mut rng).unwrap();
        let after = net.evaluate(&set.x, &set.y);

        assert!(after < before, "loss {before} -> {after}");
        assert!(report.best_epoch >= 1);
        let high = net.predict_one(&[0.1, 0.1, 0.1]).unwrap();
        let low = net.predict_one(&[0.9, 0.9, 0.9]).unwrap();
        assert!(high > low);
    }

    #[test]
    fn best_weights_are_restored() {
        let mut rng = StdRng::seed_from_u64(9);
        let set = TrainingSet::from_samples(&separable(50), ModelVariant::Compact).unwrap();
        let mut net = Network::for_variant(ModelVariant::Compact, &mut rng);

        let config = TrainConfig {
            epochs: 40,
            patience: 3,
            ..TrainConfig::default()
        };
        let report = fit(&mut net, &set, &config, &mut rng).unwrap();

        let (_, val) = set.split_tail(config.validation_split);
        let val = val.unwrap();
        let restored = net.evaluate(&val.x, &val.y);
        assert!((restored - report.best_loss).abs() < 1e-9);
        assert_eq!(report.val_losses.len(), report.epochs_run);
    }

    #[test]
    fn empty_set_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let set = TrainingSet::from_samples(&[], ModelVariant::Compact).unwrap();
        let mut net = Network::for_variant(ModelVariant::Compact, &mut rng);
        assert!(matches!(
            fit(&mut net, &set, &TrainConfig::default(), &mut rng),
            Err(ScoringError::Training(_))
        ));
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let set = TrainingSet::from_samples(&separable(20), ModelVariant::Standard).unwrap();
        let mut net = Network::for_variant(ModelVariant::Compact, &mut rng);
        assert!(matches!(
            fit(&mut net, &set, &TrainConfig::default(), &mut rng),
            Err(ScoringError::Shape { expected: 3, actual: 6 })
        ));
    }
}
