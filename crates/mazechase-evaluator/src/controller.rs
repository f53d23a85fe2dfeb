//! The decision-maker boundary.
//!
//! A [`Controller`] maps a vision vector to one activation per candidate action.
//! The evaluator treats it as a black box; [`NeuralController`] is the
//! feed-forward network the rest of the workspace evolves and loads from disk.

use std::fmt;

pub trait Controller: fmt::Debug + Send + Sync {
    /// Identity used to tag evaluation failures.
    #[must_use]
    fn id(&self) -> &str;

    fn decide(&self, vision: &[f32]) -> Result<Vec<f32>, ControllerError>;
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ControllerError {
    #[display("expected {expected} inputs, got {actual}")]
    InputLength { expected: usize, actual: usize },
    #[display("non-finite activation at output {index}")]
    NonFinite {
        #[error(not(source))]
        index: usize,
    },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum NetworkShapeError {
    #[display("a network needs at least an input and an output layer, got {_0} layers")]
    TooFewLayers(#[error(not(source))] usize),
    #[display("layer {_0} has no units")]
    EmptyLayer(#[error(not(source))] usize),
    #[display("expected {expected} weights, got {actual}")]
    WeightCount { expected: usize, actual: usize },
}

/// Fully connected feed-forward network.
///
/// Hidden layers use a logistic sigmoid; the output layer is linear. Weights are
/// stored layer by layer, each unit's incoming weights followed by its bias.
#[derive(Debug, Clone)]
pub struct NeuralController {
    id: String,
    layer_sizes: Vec<usize>,
    weights: Vec<f32>,
}

impl NeuralController {
    /// Number of weights (biases included) a network of this shape needs.
    #[must_use]
    pub fn weight_count(layer_sizes: &[usize]) -> usize {
        layer_sizes
            .windows(2)
            .map(|pair| (pair[0] + 1) * pair[1])
            .sum()
    }

    pub fn new(
        id: impl Into<String>,
        layer_sizes: Vec<usize>,
        weights: Vec<f32>,
    ) -> Result<Self, NetworkShapeError> {
        if layer_sizes.len() < 2 {
            return Err(NetworkShapeError::TooFewLayers(layer_sizes.len()));
        }
        if let Some(index) = layer_sizes.iter().position(|size| *size == 0) {
            return Err(NetworkShapeError::EmptyLayer(index));
        }
        let expected = Self::weight_count(&layer_sizes);
        if weights.len() != expected {
            return Err(NetworkShapeError::WeightCount {
                expected,
                actual: weights.len(),
            });
        }
        Ok(Self {
            id: id.into(),
            layer_sizes,
            weights,
        })
    }

    #[must_use]
    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    #[must_use]
    pub fn input_len(&self) -> usize {
        self.layer_sizes[0]
    }

    #[must_use]
    pub fn output_len(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

impl Controller for NeuralController {
    fn id(&self) -> &str {
        &self.id
    }

    fn decide(&self, vision: &[f32]) -> Result<Vec<f32>, ControllerError> {
        if vision.len() != self.input_len() {
            return Err(ControllerError::InputLength {
                expected: self.input_len(),
                actual: vision.len(),
            });
        }

        let last = self.layer_sizes.len() - 2;
        let mut activations = vision.to_vec();
        let mut weights = self.weights.as_slice();
        for (layer, pair) in self.layer_sizes.windows(2).enumerate() {
            let (inputs, outputs) = (pair[0], pair[1]);
            let (layer_weights, rest) = weights.split_at((inputs + 1) * outputs);
            weights = rest;
            let next = layer_weights
                .chunks_exact(inputs + 1)
                .map(|unit| {
                    let (incoming, bias) = unit.split_at(inputs);
                    let sum = incoming
                        .iter()
                        .zip(&activations)
                        .map(|(w, a)| w * a)
                        .sum::<f32>()
                        + bias[0];
                    if layer == last { sum } else { sigmoid(sum) }
                })
                .collect::<Vec<_>>();
            activations = next;
        }

        if let Some(index) = activations.iter().position(|value| !value.is_finite()) {
            return Err(ControllerError::NonFinite { index });
        }
        Ok(activations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_count() {
        assert_eq!(NeuralController::weight_count(&[120, 4]), 121 * 4);
        assert_eq!(NeuralController::weight_count(&[8, 6, 4]), 9 * 6 + 7 * 4);
    }

    #[test]
    fn test_shape_errors() {
        assert!(matches!(
            NeuralController::new("n", vec![4], vec![]),
            Err(NetworkShapeError::TooFewLayers(1))
        ));
        assert!(matches!(
            NeuralController::new("n", vec![4, 0, 4], vec![]),
            Err(NetworkShapeError::EmptyLayer(1))
        ));
        assert!(matches!(
            NeuralController::new("n", vec![2, 1], vec![0.0; 2]),
            Err(NetworkShapeError::WeightCount {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_linear_output_layer() {
        // out0 = 2*a - b + 0.5, out1 = b
        let net =
            NeuralController::new("linear", vec![2, 2], vec![2.0, -1.0, 0.5, 0.0, 1.0, 0.0])
                .unwrap();
        assert_eq!(net.decide(&[1.0, 3.0]).unwrap(), vec![-0.5, 3.0]);
    }

    #[test]
    fn test_hidden_layer_is_sigmoid() {
        // one hidden unit with zero input weight and zero bias outputs 0.5
        let net = NeuralController::new("hidden", vec![1, 1, 1], vec![0.0, 0.0, 2.0, 1.0]).unwrap();
        assert_eq!(net.decide(&[123.0]).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_input_length_mismatch() {
        let net = NeuralController::new("n", vec![2, 1], vec![0.0; 3]).unwrap();
        assert!(matches!(
            net.decide(&[1.0]),
            Err(ControllerError::InputLength {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_non_finite_output() {
        let net = NeuralController::new("n", vec![1, 1], vec![f32::INFINITY, 0.0]).unwrap();
        assert!(matches!(
            net.decide(&[1.0]),
            Err(ControllerError::NonFinite { index: 0 })
        ));
    }
}
