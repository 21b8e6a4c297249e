//! Dense (fully connected) layer: `output = activation(input · weights + biases)`.

use ndarray::{Array1, Array2, Axis};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::activation::Activation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    /// `(input_size, output_size)`
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
    pub activation: Activation,
    /// Fraction of outputs zeroed during training. `0.0` disables dropout.
    #[serde(default)]
    pub dropout: f64,
}

/// Values captured by a training forward pass and consumed by `backward`.
#[derive(Debug, Clone)]
pub struct LayerCache {
    input: Array2<f64>,
    z: Array2<f64>,
    mask: Option<Array2<f64>>,
}

#[derive(Debug, Clone)]
pub struct LayerGradients {
    pub input: Array2<f64>,
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
}

impl DenseLayer {
    /// Xavier/Glorot uniform initialization, zero biases.
    #[allow(clippy::cast_precision_loss)]
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let limit = (6.0 / (input_size + output_size) as f64).sqrt();
        Self {
            weights: Array2::random_using((input_size, output_size), Uniform::new(-limit, limit), rng),
            biases: Array1::zeros(output_size),
            activation,
            dropout: 0.0,
        }
    }

    #[must_use]
    pub fn with_dropout(mut self, rate: f64) -> Self {
        self.dropout = rate.clamp(0.0, 0.95);
        self
    }

    #[must_use]
    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    #[must_use]
    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    #[must_use]
    pub fn num_parameters(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    fn linear(&self, input: &Array2<f64>) -> Array2<f64> {
        input.dot(&self.weights) + &self.biases
    }

    /// Inference pass. Dropout is inactive.
    #[must_use]
    pub fn forward(&self, input: &Array2<f64>) -> Array2<f64> {
        self.activation.forward(&self.linear(input))
    }

    /// Training pass with inverted dropout: kept units are scaled by
    /// `1 / (1 - dropout)` so inference needs no rescaling.
    pub fn forward_train<R: Rng + ?Sized>(
        &self,
        input: &Array2<f64>,
        rng: &mut R,
    ) -> (Array2<f64>, LayerCache) {
        let z = self.linear(input);
        let mut output = self.activation.forward(&z);

        let mask = (self.dropout > 0.0).then(|| {
            let keep = 1.0 - self.dropout;
            let scale = 1.0 / keep;
            Array2::from_shape_fn(output.dim(), |_| if rng.gen_bool(keep) { scale } else { 0.0 })
        });
        if let Some(mask) = &mask {
            output *= mask;
        }

        let cache = LayerCache {
            input: input.clone(),
            z,
            mask,
        };
        (output, cache)
    }

    /// Backpropagate `output_grad` (dL/d output) through the layer.
    #[must_use]
    pub fn backward(&self, cache: &LayerCache, output_grad: &Array2<f64>) -> LayerGradients {
        let grad = match &cache.mask {
            Some(mask) => output_grad * mask,
            None => output_grad.clone(),
        };
        let delta = grad * self.activation.derivative(&cache.z);

        LayerGradients {
            input: delta.dot(&self.weights.t()),
            weights: cache.input.t().dot(&delta),
            biases: delta.sum_axis(Axis(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn shapes_and_parameter_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let layer = DenseLayer::new(6, 32, Activation::Relu, &mut rng);
        assert_eq!(layer.weights.dim(), (6, 32));
        assert_eq!(layer.biases.len(), 32);
        assert_eq!(layer.num_parameters(), 6 * 32 + 32);

        let out = layer.forward(&Array2::ones((4, 6)));
        assert_eq!(out.dim(), (4, 32));
    }

    #[test]
    fn xavier_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let layer = DenseLayer::new(10, 6, Activation::Relu, &mut rng);
        let limit = (6.0_f64 / 16.0).sqrt();
        assert!(layer.weights.iter().all(|w| w.abs() <= limit));
    }

    #[test]
    fn dropout_only_applies_in_training() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut layer = DenseLayer::new(3, 200, Activation::Relu, &mut rng).with_dropout(0.5);
        layer.weights.fill(1.0);
        let input = Array2::ones((1, 3));

        assert!(layer.forward(&input).iter().all(|v| (*v - 3.0).abs() < 1e-12));

        let (trained, _) = layer.forward_train(&input, &mut rng);
        let zeros = trained.iter().filter(|v| **v == 0.0).count();
        assert!(zeros > 50 && zeros < 150, "{zeros} of 200 dropped");
        assert!(trained.iter().all(|v| *v == 0.0 || (*v - 6.0).abs() < 1e-12));
    }

    #[test]
    fn backward_matches_finite_difference() {
        let mut rng = StdRng::seed_from_u64(11);
        let layer = DenseLayer::new(2, 1, Activation::Sigmoid, &mut rng);
        let input = ndarray::array![[0.3, -0.8]];

        let (_, cache) = layer.forward_train(&input, &mut rng);
        let grads = layer.backward(&cache, &Array2::ones((1, 1)));

        let eps = 1e-6;
        let mut nudged = layer.clone();
        nudged.weights[[0, 0]] += eps;
        let numeric = (nudged.forward(&input)[[0, 0]] - layer.forward(&input)[[0, 0]]) / eps;
        assert!((numeric - grads.weights[[0, 0]]).abs() < 1e-5);
    }
}
