use thiserror::Error;

/// Error type for backprop_nn
#[derive(Debug, PartialEq, Error)]
pub enum Error {
    /// Indicates some dimension is incorrect in a Matrix operation.
    #[error("matrix dimensions do not match")]
    DimensionErr,
    /// A network needs an input and an output layer.
    #[error("a network needs at least 2 layers, got {0}")]
    TooFewLayers(usize),
    #[error("layer {layer} has no units")]
    EmptyLayer { layer: usize },
    #[error("learning rate must be positive and finite, got {0}")]
    InvalidLearningRate(f64),
    #[error("input has {actual} values but the input layer has {expected} units")]
    InputSize { expected: usize, actual: usize },
    #[error("target has {actual} values but the output layer has {expected} units")]
    TargetSize { expected: usize, actual: usize },
    /// Backward was called before any forward pass filled the activations.
    #[error("backward pass requested before any forward pass")]
    NotForwarded,
    #[error("training needs at least one epoch")]
    NoEpochs,
    #[error("training dataset is empty")]
    EmptyDataset,
    /// The training thread panicked or its channel closed early.
    #[error("training thread failed")]
    ThreadErr,
}

pub type Result<T> = std::result::Result<T, Error>;
