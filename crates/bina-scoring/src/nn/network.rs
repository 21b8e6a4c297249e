//! The risk network: a stack of dense layers ending in one sigmoid unit.

use bina_core::enums::ModelVariant;
use ndarray::{Array2, ArrayView2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::activation::Activation;
use super::layer::{DenseLayer, LayerCache, LayerGradients};
use crate::error::ScoringError;

/// Dropout applied after the first hidden layer of the standard variant.
pub const STANDARD_DROPOUT: f64 = 0.2;

/// Clamp for probabilities inside the loss, matching the usual backend epsilon.
const LOSS_EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub variant: ModelVariant,
    pub layers: Vec<DenseLayer>,
}

impl Network {
    /// Fresh randomly initialized network for `variant`.
    ///
    /// ```text
    /// standard: 6 -> 32 relu (dropout 0.2) -> 16 relu -> 8 relu -> 1 sigmoid
    /// compact:  3 -> 8 relu -> 4 relu -> 1 sigmoid
    /// ```
    pub fn for_variant<R: Rng + ?Sized>(variant: ModelVariant, rng: &mut R) -> Self {
        let input = variant.input_dim();
        let layers = match variant {
            ModelVariant::Standard => vec![
                DenseLayer::new(input, 32, Activation::Relu, rng).with_dropout(STANDARD_DROPOUT),
                DenseLayer::new(32, 16, Activation::Relu, rng),
                DenseLayer::new(16, 8, Activation::Relu, rng),
                DenseLayer::new(8, 1, Activation::Sigmoid, rng),
            ],
            ModelVariant::Compact => vec![
                DenseLayer::new(input, 8, Activation::Relu, rng),
                DenseLayer::new(8, 4, Activation::Relu, rng),
                DenseLayer::new(4, 1, Activation::Sigmoid, rng),
            ],
        };
        Self { variant, layers }
    }

    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::input_size)
    }

    #[must_use]
    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(DenseLayer::num_parameters).sum()
    }

    /// Check that the layer stack is wired consistently and matches the variant.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::Shape` for the first mismatch found.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let expected = self.variant.input_dim();
        if self.input_dim() != expected {
            return Err(ScoringError::Shape {
                expected,
                actual: self.input_dim(),
            });
        }
        for pair in self.layers.windows(2) {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(ScoringError::Shape {
                    expected: pair[0].output_size(),
                    actual: pair[1].input_size(),
                });
            }
        }
        let out = self.layers.last().map_or(0, DenseLayer::output_size);
        if out != 1 {
            return Err(ScoringError::Shape {
                expected: 1,
                actual: out,
            });
        }
        Ok(())
    }

    /// Batch inference. Returns one probability per row.
    #[must_use]
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Vec<f64> {
        let mut out = x.to_owned();
        for layer in &self.layers {
            out = layer.forward(&out);
        }
        out.column(0).to_vec()
    }

    /// Probability for a single feature vector.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::Shape` if `features` has the wrong length.
    pub fn predict_one(&self, features: &[f64]) -> Result<f64, ScoringError> {
        let mismatch = || ScoringError::Shape {
            expected: self.input_dim(),
            actual: features.len(),
        };
        if features.len() != self.input_dim() {
            return Err(mismatch());
        }
        let x = ArrayView2::from_shape((1, features.len()), features).map_err(|_| mismatch())?;
        Ok(self
            .predict(x)
            .first()
            .copied()
            .unwrap_or(0.0)
            .clamp(0.0, 1.0))
    }

    /// One gradient computation on a batch: forward with dropout, binary
    /// cross-entropy loss, backward. Returns the batch loss and per-layer gradients.
    pub(crate) fn loss_and_gradients<R: Rng + ?Sized>(
        &self,
        x: &Array2<f64>,
        y: &Array2<f64>,
        rng: &mut R,
    ) -> (f64, Vec<LayerGradients>) {
        let mut caches: Vec<LayerCache> = Vec::with_capacity(self.layers.len());
        let mut out = x.clone();
        for layer in &self.layers {
            let (next, cache) = layer.forward_train(&out, rng);
            caches.push(cache);
            out = next;
        }

        let loss = binary_cross_entropy(&out, y);
        let mut grad = bce_gradient(&out, y);

        let mut grads = Vec::with_capacity(self.layers.len());
        for (layer, cache) in self.layers.iter().zip(&caches).rev() {
            let g = layer.backward(cache, &grad);
            grad = g.input.clone();
            grads.push(g);
        }
        grads.reverse();
        (loss, grads)
    }

    /// Mean binary cross-entropy over a dataset without dropout.
    #[must_use]
    pub fn evaluate(&self, x: &Array2<f64>, y: &Array2<f64>) -> f64 {
        let mut out = x.clone();
        for layer in &self.layers {
            out = layer.forward(&out);
        }
        binary_cross_entropy(&out, y)
    }
}

#[allow(clippy::cast_precision_loss)]
fn binary_cross_entropy(p: &Array2<f64>, y: &Array2<f64>) -> f64 {
    if p.is_empty() {
        return 0.0;
    }
    let n = p.len() as f64;
    let p = p.mapv(|v| v.clamp(LOSS_EPSILON, 1.0 - LOSS_EPSILON));
    let per_sample = y * &p.mapv(f64::ln) + &(1.0 - y) * &(1.0 - &p).mapv(f64::ln);
    -per_sample.sum() / n
}

#[allow(clippy::cast_precision_loss)]
fn bce_gradient(p: &Array2<f64>, y: &Array2<f64>) -> Array2<f64> {
    let n = p.nrows().max(1) as f64;
    let p = p.mapv(|v| v.clamp(LOSS_EPSILON, 1.0 - LOSS_EPSILON));
    (&p - y) / (&p * &(1.0 - &p)) / n
}
