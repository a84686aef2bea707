use crate::prelude::*;

use super::NeuralNet;

/// Mean-squared error between an output and its target.
pub fn mse(output: &[f64], target: &[f64]) -> f64 {
    let sum: f64 = output
        .iter()
        .zip(target)
        .map(|(a, t)| (a - t) * (a - t))
        .sum();
    sum / output.len() as f64
}

/// Centered finite-difference estimate of `d mse / d weights[layer][(row, col)]`
/// for a single sample. Works on a copy, `net` is left as it was.
pub fn numerical_gradient(
    net: &NeuralNet,
    input: &[f64],
    target: &[f64],
    layer: usize,
    row: usize,
    col: usize,
    eps: f64,
) -> Result<f64> {
    let weight = net.weights.get(layer).ok_or(Error::DimensionErr)?;
    if row >= weight.rows() || col >= weight.cols() {
        return Err(Error::DimensionErr);
    }
    let output_width = net.sizes[net.sizes.len() - 1];
    if target.len() != output_width {
        return Err(Error::TargetSize {
            expected: output_width,
            actual: target.len(),
        });
    }

    let saved = weight[(row, col)];
    let mut probe = net.clone();

    let mut loss_at = |w: f64| -> Result<f64> {
        probe.weights[layer][(row, col)] = w;
        let output = probe.forward(input)?;
        Ok(mse(output, target))
    };

    let above = loss_at(saved + eps)?;
    let below = loss_at(saved - eps)?;
    Ok((above - below) / (2.0 * eps))
}
