use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Sigmoid,
}

impl Activation {
    #[must_use]
    pub fn forward(self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Self::Relu => z.mapv(|v| v.max(0.0)),
            Self::Sigmoid => z.mapv(sigmoid),
        }
    }

    /// Derivative with respect to the pre-activation `z`.
    #[must_use]
    pub fn derivative(self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Self::Relu => z.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Self::Sigmoid => z.mapv(|v| {
                let s = sigmoid(v);
                s * (1.0 - s)
            }),
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn relu_clips_negatives() {
        let z = array![[-2.0, 0.0, 3.0]];
        assert_eq!(Activation::Relu.forward(&z), array![[0.0, 0.0, 3.0]]);
        assert_eq!(Activation::Relu.derivative(&z), array![[0.0, 0.0, 1.0]]);
    }

    #[test]
    fn sigmoid_is_stable_for_large_inputs() {
        let z = array![[-1000.0, 0.0, 1000.0]];
        let out = Activation::Sigmoid.forward(&z);
        assert!(out.iter().all(|v| v.is_finite()));
        assert!((out[[0, 1]] - 0.5).abs() < 1e-12);
        assert!(out[[0, 0]] < 1e-12);
        assert!((out[[0, 2]] - 1.0).abs() < 1e-12);
    }
}
