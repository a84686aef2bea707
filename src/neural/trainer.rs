use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    matrix::Matrix2,
    neural::{LossDerivative, NeuralNet},
    prelude::*,
};

#[cfg(feature = "gui")]
use std::sync::mpsc;

#[cfg(feature = "gui")]
use crate::viz::Visualizer;

/// One training example: `(input, target)`.
pub type Sample = (Vec<f64>, Vec<f64>);

/// Summary produced after each scheduled epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    /// 1-based epoch number.
    pub epoch: usize,
    /// RMS of the output-layer gradient after the epoch's last sample.
    pub rms_gradient: f64,
    /// Snapshot of every weight matrix at the end of the epoch.
    pub weights: Vec<Matrix2<f64>>,
}

/// Per-sample stochastic gradient descent over a dataset.
#[derive(Clone)]
pub struct Trainer {
    epochs: usize,
    log_count: Option<usize>,
    loss_derivative: Option<Arc<LossDerivative>>,
}

impl Trainer {
    /// Trains for `epochs` epochs, reporting once after the final epoch.
    pub fn new(epochs: usize) -> Self {
        Self {
            epochs,
            log_count: Some(1),
            loss_derivative: None,
        }
    }

    /// Number of reports to spread over the run. `Some(0)` reports after the
    /// final epoch only, `None` turns reporting off.
    pub fn with_log(mut self, log_count: Option<usize>) -> Self {
        self.log_count = log_count;
        self
    }

    /// Replaces the mean-squared error derivative used for the output error.
    pub fn with_loss_derivative(
        mut self,
        loss_d: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.loss_derivative = Some(Arc::new(loss_d));
        self
    }

    pub fn set_epochs(&mut self, epochs: usize) {
        self.epochs = epochs;
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// Epochs between two reports, or `None` when reporting is off.
    pub fn log_interval(&self) -> Option<usize> {
        let log_count = self.log_count?;
        let interval = if log_count == 0 {
            self.epochs
        } else if log_count >= self.epochs {
            1
        } else {
            self.epochs / log_count
        };
        Some(interval.max(1))
    }

    /// Runs the full training schedule and returns the reports of the
    /// scheduled epochs.
    pub fn train(&self, net: &mut NeuralNet, data: &[Sample]) -> Result<Vec<EpochReport>> {
        let mut reports = Vec::new();
        self.train_with(net, data, |report| {
            reports.push(report.clone());
            Ok(())
        })?;
        Ok(reports)
    }

    /// Runs the full training schedule, handing every report to `on_log`.
    /// Reporting reads the network but never changes it.
    pub fn train_with<F>(&self, net: &mut NeuralNet, data: &[Sample], mut on_log: F) -> Result<()>
    where
        F: FnMut(&EpochReport) -> Result<()>,
    {
        self.check(net, data)?;

        let interval = self.log_interval();
        let loss_d = self.loss_derivative.as_deref();

        for epoch in 1..=self.epochs {
            for (input, target) in data {
                net.forward(input)?;
                net.backward(target, loss_d)?;
            }

            if interval.is_some_and(|interval| epoch % interval == 0) {
                let report = EpochReport {
                    epoch,
                    rms_gradient: net.rms_gradient(),
                    weights: net.weights().to_vec(),
                };
                info!("Epoch {epoch} loss: {}", report.rms_gradient);
                debug!("Epoch {epoch} weights: {}", WeightDump(&report.weights));
                on_log(&report)?;
            }
        }
        Ok(())
    }

    /// Trains on a worker thread while `Gui` renders the reports.
    #[cfg(feature = "gui")]
    pub fn train_gui<Gui: Visualizer>(&self, net: &mut NeuralNet, data: &[Sample]) -> Result<()> {
        self.check(net, data)?;

        std::thread::scope(|scope| -> Result<()> {
            let (tx, rx) = mpsc::channel();
            let handle = scope.spawn(move || -> Result<()> {
                self.train_with(net, data, |report| {
                    tx.send(report.clone()).map_err(|_| Error::ThreadErr)
                })
            });

            let _ = eframe::run_native(
                "backprop_nn",
                eframe::NativeOptions::default(),
                Box::new(|cc| Box::new(Gui::new(cc, rx))),
            );

            handle.join().map_err(|_| Error::ThreadErr)??;
            Ok(())
        })
    }

    /// Rejects a run before any weight is touched.
    fn check(&self, net: &NeuralNet, data: &[Sample]) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::NoEpochs);
        }
        if data.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let sizes = net.sizes();
        let (input_width, output_width) = (sizes[0], sizes[sizes.len() - 1]);
        for (input, target) in data {
            if input.len() != input_width {
                return Err(Error::InputSize {
                    expected: input_width,
                    actual: input.len(),
                });
            }
            if target.len() != output_width {
                return Err(Error::TargetSize {
                    expected: output_width,
                    actual: target.len(),
                });
            }
        }
        Ok(())
    }
}

struct WeightDump<'a>(&'a [Matrix2<f64>]);

impl std::fmt::Display for WeightDump<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (k, weight) in self.0.iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{weight}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::activations::Activations;
    use rand::{rngs::StdRng, SeedableRng};

    fn quadratic(x: f64) -> f64 {
        x * x + 2.0 * x + 3.0
    }

    fn quadratic_data() -> Vec<Sample> {
        [-2.0, -1.0, 0.0, 1.0, 2.0]
            .into_iter()
            .map(|x| (vec![x * x, x, 1.0], vec![quadratic(x)]))
            .collect()
    }

    fn seeded(sizes: &[usize], rate: f64, activation: Activations, seed: u64) -> NeuralNet {
        let mut rng = StdRng::seed_from_u64(seed);
        NeuralNet::with_rng(sizes, rate, activation, &mut rng).unwrap()
    }

    #[test]
    fn log_interval_policy() {
        assert_eq!(Trainer::new(100).log_interval(), Some(100));
        assert_eq!(Trainer::new(100).with_log(Some(0)).log_interval(), Some(100));
        assert_eq!(Trainer::new(100).with_log(Some(5)).log_interval(), Some(20));
        assert_eq!(Trainer::new(10).with_log(Some(3)).log_interval(), Some(3));
        assert_eq!(Trainer::new(10).with_log(Some(10)).log_interval(), Some(1));
        assert_eq!(Trainer::new(10).with_log(Some(50)).log_interval(), Some(1));
        assert_eq!(Trainer::new(10).with_log(None).log_interval(), None);
    }

    #[test]
    fn reports_on_schedule() {
        let mut net = seeded(&[3, 1], 0.01, Activations::Identity, 1);

        let reports = Trainer::new(100)
            .with_log(Some(5))
            .train(&mut net, &quadratic_data())
            .unwrap();

        let epochs: Vec<usize> = reports.iter().map(|r| r.epoch).collect();
        assert_eq!(epochs, [20, 40, 60, 80, 100]);

        let last = reports.last().unwrap();
        assert_eq!(last.weights, net.weights());
        assert_eq!(last.rms_gradient, net.rms_gradient());
    }

    #[test]
    fn uneven_schedule_skips_final_epoch() {
        let mut net = seeded(&[3, 1], 0.01, Activations::Identity, 1);

        let reports = Trainer::new(10)
            .with_log(Some(3))
            .train(&mut net, &quadratic_data())
            .unwrap();

        let epochs: Vec<usize> = reports.iter().map(|r| r.epoch).collect();
        assert_eq!(epochs, [3, 6, 9]);
    }

    #[test]
    fn quadratic_fit_converges() {
        let data = quadratic_data();
        let mut net = seeded(&[3, 1], 0.01, Activations::Identity, 3);
        let mut trainer = Trainer::new(1).with_log(Some(1));

        let after_one = trainer.train(&mut net, &data).unwrap()[0].rms_gradient;

        trainer.set_epochs(99);
        let after_hundred = trainer.train(&mut net, &data).unwrap()[0].rms_gradient;

        assert!(
            after_hundred < after_one,
            "{after_hundred} should be below {after_one}"
        );
    }

    #[test]
    fn quadratic_fit_recovers_coefficients() {
        let data = quadratic_data();
        let mut net = seeded(&[3, 1], 0.01, Activations::Identity, 11);

        Trainer::new(2_000)
            .with_log(None)
            .train(&mut net, &data)
            .unwrap();

        let weights = net.weights()[0].row(0);
        for (w, expected) in weights.iter().zip([1.0, 2.0, 3.0]) {
            assert!((w - expected).abs() < 1e-3, "{weights:?}");
        }
    }

    #[test]
    fn logging_does_not_change_training() {
        let data = quadratic_data();
        let mut silent = seeded(&[3, 4, 1], 0.001, Activations::Tanh, 5);
        Trainer::new(50)
            .with_log(None)
            .train(&mut silent, &data)
            .unwrap();

        for log_count in [Some(0), Some(1), Some(7), Some(50), Some(500)] {
            let mut logged = seeded(&[3, 4, 1], 0.001, Activations::Tanh, 5);
            let reports = Trainer::new(50)
                .with_log(log_count)
                .train(&mut logged, &data)
                .unwrap();

            assert!(!reports.is_empty());
            assert_eq!(logged.weights(), silent.weights());
        }
    }

    #[test]
    fn train_with_sees_every_report() {
        let mut net = seeded(&[3, 1], 0.01, Activations::Identity, 2);
        let mut seen = Vec::new();

        Trainer::new(4)
            .with_log(Some(4))
            .train_with(&mut net, &quadratic_data(), |report| {
                seen.push(report.epoch);
                Ok(())
            })
            .unwrap();

        assert_eq!(seen, [1, 2, 3, 4]);
    }

    #[test]
    fn custom_loss_derivative_is_used() {
        let data = quadratic_data();
        let mut default_loss = seeded(&[3, 1], 0.01, Activations::Identity, 9);
        let mut halved = seeded(&[3, 1], 0.01, Activations::Identity, 9);

        Trainer::new(1).train(&mut default_loss, &data).unwrap();
        Trainer::new(1)
            .with_loss_derivative(|actual, target| actual - target)
            .train(&mut halved, &data)
            .unwrap();

        assert_ne!(default_loss.weights(), halved.weights());
    }

    #[test]
    fn rejects_bad_runs_before_training() {
        let mut net = seeded(&[3, 1], 0.01, Activations::Identity, 4);
        let before = net.weights().to_vec();

        assert_eq!(
            Trainer::new(0).train(&mut net, &quadratic_data()),
            Err(Error::NoEpochs)
        );
        assert_eq!(Trainer::new(5).train(&mut net, &[]), Err(Error::EmptyDataset));

        let mut data = quadratic_data();
        data.push((vec![1.0, 1.0, 1.0], vec![6.0, 0.0]));
        assert_eq!(
            Trainer::new(5).train(&mut net, &data),
            Err(Error::TargetSize {
                expected: 1,
                actual: 2
            })
        );

        data.push((vec![1.0], vec![6.0]));
        data.swap(0, 6);
        assert_eq!(
            Trainer::new(5).train(&mut net, &data),
            Err(Error::InputSize {
                expected: 3,
                actual: 1
            })
        );

        assert_eq!(net.weights(), before.as_slice());
    }

    #[test]
    fn callback_error_stops_training() {
        let mut net = seeded(&[3, 1], 0.01, Activations::Identity, 4);
        let mut calls = 0;

        let res = Trainer::new(10)
            .with_log(Some(10))
            .train_with(&mut net, &quadratic_data(), |_| {
                calls += 1;
                Err(Error::ThreadErr)
            });

        assert_eq!(res, Err(Error::ThreadErr));
        assert_eq!(calls, 1);
    }

    #[test]
    fn weight_dump_format() {
        let weights = vec![
            Matrix2::from_array([[1.0, 2.0]]),
            Matrix2::from_array([[0.5]]),
        ];
        assert_eq!(WeightDump(&weights).to_string(), "{{{1, 2}}, {{0.5}}}");
    }
}
