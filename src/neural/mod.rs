pub mod activations;
pub mod trainer;
pub mod utils;

use crate::prelude::*;
use std::sync::Arc;

use crate::matrix::{
    ops::{Dot, Transpose},
    Matrix2,
};
use rand::{distributions::Open01, Rng};

use self::activations::Activation;

/// Derivative of the loss with respect to one output unit, given
/// `(actual, target)`.
pub type LossDerivative = dyn Fn(f64, f64) -> f64 + Send + Sync;

/// Fully-connected network without bias terms.
///
/// Weight matrix `k` connects layer `k` to layer `k + 1` and has shape
/// `sizes[k + 1] x sizes[k]`. Activations and gradients are per-sample
/// scratch buffers; only the weights carry over between training steps.
#[derive(Clone)]
pub struct NeuralNet {
    sizes: Vec<usize>,
    weights: Vec<Matrix2<f64>>,
    activations: Vec<Vec<f64>>,
    gradients: Vec<Vec<f64>>,
    learning_rate: f64,
    activation: Arc<dyn Activation>,
    forwarded: bool,
}

impl NeuralNet {
    /// Creates a network with one layer per entry of `sizes` (input first).
    /// Weights are drawn uniformly from (-1, 1).
    pub fn new(
        sizes: &[usize],
        learning_rate: f64,
        activation: impl Activation + 'static,
    ) -> Result<Self> {
        Self::with_rng(sizes, learning_rate, activation, &mut rand::thread_rng())
    }

    /// Same as [`NeuralNet::new`] but draws the initial weights from `rng`.
    pub fn with_rng<R: Rng>(
        sizes: &[usize],
        learning_rate: f64,
        activation: impl Activation + 'static,
        rng: &mut R,
    ) -> Result<Self> {
        validate(sizes, learning_rate)?;

        let mut weights = Vec::with_capacity(sizes.len() - 1);
        for pair in sizes.windows(2) {
            weights.push(Matrix2::from_fn(pair[1], pair[0], |_, _| random_weight(rng)));
        }

        Ok(Self::assemble(
            sizes.to_vec(),
            weights,
            learning_rate,
            Arc::new(activation),
        ))
    }

    /// Builds a network around explicit weight matrices. Matrix `k` must have
    /// as many columns as matrix `k - 1` has rows.
    pub fn from_weights(
        weights: Vec<Matrix2<f64>>,
        learning_rate: f64,
        activation: impl Activation + 'static,
    ) -> Result<Self> {
        let first = weights.first().ok_or(Error::TooFewLayers(1))?;

        if weights.windows(2).any(|pair| pair[0].rows() != pair[1].cols()) {
            return Err(Error::DimensionErr);
        }

        let sizes: Vec<usize> = std::iter::once(first.cols())
            .chain(weights.iter().map(Matrix2::rows))
            .collect();
        validate(&sizes, learning_rate)?;

        Ok(Self::assemble(
            sizes,
            weights,
            learning_rate,
            Arc::new(activation),
        ))
    }

    fn assemble(
        sizes: Vec<usize>,
        weights: Vec<Matrix2<f64>>,
        learning_rate: f64,
        activation: Arc<dyn Activation>,
    ) -> Self {
        let zeroed: Vec<Vec<f64>> = sizes.iter().map(|&size| vec![0.0; size]).collect();
        Self {
            activations: zeroed.clone(),
            gradients: zeroed,
            sizes,
            weights,
            learning_rate,
            activation,
            forwarded: false,
        }
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn weights(&self) -> &[Matrix2<f64>] {
        &self.weights
    }

    pub fn activations(&self) -> &[Vec<f64>] {
        &self.activations
    }

    pub fn gradients(&self) -> &[Vec<f64>] {
        &self.gradients
    }

    /// Activations of the output layer from the latest forward pass.
    pub fn output(&self) -> &[f64] {
        &self.activations[self.activations.len() - 1]
    }

    /// Root-mean-square of the output-layer gradient from the latest backward
    /// pass.
    pub fn rms_gradient(&self) -> f64 {
        let grad = &self.gradients[self.gradients.len() - 1];
        (grad.iter().map(|g| g * g).sum::<f64>() / grad.len() as f64).sqrt()
    }

    /// Propagates `input` through every layer and returns the output layer.
    pub fn forward(&mut self, input: &[f64]) -> Result<&[f64]> {
        if input.len() != self.sizes[0] {
            return Err(Error::InputSize {
                expected: self.sizes[0],
                actual: input.len(),
            });
        }

        for layer in &mut self.activations {
            layer.fill(0.0);
        }
        self.activations[0].copy_from_slice(input);

        for k in 0..self.weights.len() {
            let sums = self.weights[k].dot(self.activations[k].as_slice())?;
            for (a, z) in self.activations[k + 1].iter_mut().zip(sums) {
                *a = self.activation.call(z);
            }
        }

        self.forwarded = true;
        Ok(self.output())
    }

    /// Backpropagates the error against `target` and applies one gradient
    /// descent step to every weight.
    ///
    /// Uses the activations of the latest [`NeuralNet::forward`] call, so a
    /// forward pass on the matching input must come first. Without `loss_d`
    /// the output error is the derivative of mean-squared error.
    pub fn backward(&mut self, target: &[f64], loss_d: Option<&LossDerivative>) -> Result<()> {
        let last = self.sizes.len() - 1;
        if target.len() != self.sizes[last] {
            return Err(Error::TargetSize {
                expected: self.sizes[last],
                actual: target.len(),
            });
        }
        if !self.forwarded {
            return Err(Error::NotForwarded);
        }

        for grad in &mut self.gradients {
            grad.fill(0.0);
        }

        let scale = 2.0 / self.sizes[last] as f64;
        for ((grad, &actual), &ideal) in self.gradients[last]
            .iter_mut()
            .zip(&self.activations[last])
            .zip(target)
        {
            *grad = match loss_d {
                Some(loss_d) => loss_d(actual, ideal),
                None => scale * (actual - ideal),
            };
        }

        // k -- weight matrix between layer k and k + 1
        // i -- unit of layer k + 1
        // j -- unit of layer k
        for k in (0..self.weights.len()).rev() {
            let slopes: Vec<f64> = self.activations[k + 1]
                .iter()
                .map(|&a| self.activation.derivative(a))
                .collect();

            // Must read the weights before this layer's update below.
            if k > 0 {
                let deltas: Vec<f64> = slopes
                    .iter()
                    .zip(&self.gradients[k + 1])
                    .map(|(slope, grad)| slope * grad)
                    .collect();
                self.gradients[k] = self.weights[k].transpose().dot(deltas.as_slice())?;
            }

            let rate = self.learning_rate;
            let weights = &mut self.weights[k];
            for (i, (&slope, &grad)) in slopes.iter().zip(&self.gradients[k + 1]).enumerate() {
                for (w, &a) in weights.row_mut(i).iter_mut().zip(&self.activations[k]) {
                    *w -= rate * a * slope * grad;
                }
            }
        }

        Ok(())
    }
}

fn validate(sizes: &[usize], learning_rate: f64) -> Result<()> {
    if sizes.len() < 2 {
        return Err(Error::TooFewLayers(sizes.len()));
    }
    if let Some(layer) = sizes.iter().position(|&size| size == 0) {
        return Err(Error::EmptyLayer { layer });
    }
    if !(learning_rate.is_finite() && learning_rate > 0.0) {
        return Err(Error::InvalidLearningRate(learning_rate));
    }
    Ok(())
}

/// Uniform sample from the open interval (-1, 1).
fn random_weight<R: Rng>(rng: &mut R) -> f64 {
    let unit: f64 = rng.sample(Open01);
    2.0 * unit - 1.0
}
