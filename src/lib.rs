//! A minimal fully-connected feedforward network trained by per-sample
//! gradient descent, with the backward pass written out by hand.
//!
//! ```
//! use backprop_nn::neural::{activations::Activations, trainer::Trainer, NeuralNet};
//!
//! let data: Vec<_> = [-2.0, -1.0, 0.0, 1.0, 2.0]
//!     .into_iter()
//!     .map(|x: f64| (vec![x * x, x, 1.0], vec![x * x + 2.0 * x + 3.0]))
//!     .collect();
//!
//! let mut net = NeuralNet::new(&[3, 1], 0.01, Activations::Identity).unwrap();
//! let reports = Trainer::new(100).with_log(Some(5)).train(&mut net, &data).unwrap();
//! assert_eq!(reports.len(), 5);
//! ```

pub mod matrix;
pub mod neural;
pub mod prelude;
#[cfg(feature = "gui")]
pub mod viz;

pub use neural::{
    activations::{Activation, Activations, FnActivation},
    trainer::{EpochReport, Sample, Trainer},
    NeuralNet,
};
pub use prelude::{Error, Result};
