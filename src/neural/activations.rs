use std::fmt;

pub trait Activation: Send + Sync {
    /// Returns activation function at x
    fn call(&self, x: f64) -> f64;
    /// Returns derivative of activation function with respect to the function at x.
    /// For example, if our activation is sigmoid, then we would express the
    /// derivative as `a_x * (1-a_x)` instead of `sigmoid(a_x)(1-sigmoid(a_x))`.
    fn derivative(&self, a_x: f64) -> f64;
}

/// Adapts a pair of plain functions into an [`Activation`]. The derivative
/// receives the activation's output, not its input.
#[derive(Clone, Copy)]
pub struct FnActivation<F, D> {
    function: F,
    derivative: D,
}

impl<F, D> FnActivation<F, D>
where
    F: Fn(f64) -> f64 + Send + Sync,
    D: Fn(f64) -> f64 + Send + Sync,
{
    pub fn new(function: F, derivative: D) -> Self {
        Self {
            function,
            derivative,
        }
    }
}

impl<F, D> Activation for FnActivation<F, D>
where
    F: Fn(f64) -> f64 + Send + Sync,
    D: Fn(f64) -> f64 + Send + Sync,
{
    fn call(&self, x: f64) -> f64 {
        (self.function)(x)
    }

    fn derivative(&self, a_x: f64) -> f64 {
        (self.derivative)(a_x)
    }
}

impl<F, D> fmt::Debug for FnActivation<F, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnActivation")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activations {
    Identity,
    Sigmoid,
    Tanh,
    Arctan,
    ReLU,
}

impl Activation for Activations {
    fn call(&self, x: f64) -> f64 {
        use Activations::*;
        match self {
            Identity => x,
            Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Tanh => x.tanh(),
            Arctan => x.atan(),
            ReLU => x.max(0.0),
        }
    }

    fn derivative(&self, a_x: f64) -> f64 {
        use Activations::*;
        match self {
            Identity => 1.0,
            Sigmoid => a_x * (1.0 - a_x),
            Tanh => 1.0 - a_x * a_x,
            Arctan => 1.0 / (1.0 + a_x.tan() * a_x.tan()),
            ReLU => {
                if a_x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}
