//! Adam (adaptive moment estimation) with one moment pair per layer.

use ndarray::{Array1, Array2};

use super::layer::{DenseLayer, LayerGradients};

#[derive(Debug, Clone)]
struct Moments {
    m_w: Array2<f64>,
    v_w: Array2<f64>,
    m_b: Array1<f64>,
    v_b: Array1<f64>,
}

impl Moments {
    fn zeros_like(layer: &DenseLayer) -> Self {
        Self {
            m_w: Array2::zeros(layer.weights.dim()),
            v_w: Array2::zeros(layer.weights.dim()),
            m_b: Array1::zeros(layer.biases.len()),
            v_b: Array1::zeros(layer.biases.len()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    t: i32,
    moments: Vec<Moments>,
}

impl Adam {
    pub const DEFAULT_LEARNING_RATE: f64 = 1e-3;

    #[must_use]
    pub fn new(learning_rate: f64, layers: &[DenseLayer]) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            t: 0,
            moments: layers.iter().map(Moments::zeros_like).collect(),
        }
    }

    /// Apply one update to every layer. `grads[i]` belongs to `layers[i]`.
    pub fn step(&mut self, layers: &mut [DenseLayer], grads: &[LayerGradients]) {
        self.t = self.t.saturating_add(1);
        let lr = self.learning_rate;
        let (b1, b2, eps) = (self.beta1, self.beta2, self.epsilon);
        let correction1 = 1.0 - b1.powi(self.t);
        let correction2 = 1.0 - b2.powi(self.t);

        for ((layer, grad), m) in layers.iter_mut().zip(grads).zip(&mut self.moments) {
            m.m_w = &m.m_w * b1 + &grad.weights * (1.0 - b1);
            m.v_w = &m.v_w * b2 + &grad.weights.mapv(|g| g * g) * (1.0 - b2);
            let m_hat = &m.m_w / correction1;
            let v_hat = &m.v_w / correction2;
            layer.weights -= &(m_hat * lr / (v_hat.mapv(f64::sqrt) + eps));

            m.m_b = &m.m_b * b1 + &grad.biases * (1.0 - b1);
            m.v_b = &m.v_b * b2 + &grad.biases.mapv(|g| g * g) * (1.0 - b2);
            let m_hat = &m.m_b / correction1;
            let v_hat = &m.v_b / correction2;
            layer.biases -= &(m_hat * lr / (v_hat.mapv(f64::sqrt) + eps));
        }
    }
}
