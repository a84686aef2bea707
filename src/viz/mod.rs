use std::{
    collections::VecDeque,
    sync::{mpsc::Receiver, Arc, Mutex},
    thread,
};

use eframe::CreationContext;
use egui::plot::{Line, Plot};

use crate::neural::trainer::EpochReport;

/// Any type that can be rendered and updated during training
pub trait Visualizer: eframe::App + 'static {
    const DATA_LIMIT: usize = 20_000;
    fn new(cc: &CreationContext, rx: Receiver<EpochReport>) -> Self;
}

/// Default gui that plots the RMS output gradient per reported epoch
pub struct NNGui {
    data: Arc<Mutex<VecDeque<EpochReport>>>,
}

impl Visualizer for NNGui {
    /// Initialize NNGui, but also start a thread that listens to a receiver and updates the state
    fn new(cc: &CreationContext, rx: Receiver<EpochReport>) -> Self {
        let data = Arc::new(Mutex::new(VecDeque::new()));
        let data_clone = data.clone();

        let ctx = cc.egui_ctx.clone();
        thread::spawn(move || {
            // Ends once training finishes and drops the sender.
            while let Ok(report) = rx.recv() {
                let Ok(mut data) = data_clone.lock() else {
                    return;
                };

                if data.len() == Self::DATA_LIMIT {
                    data.pop_front();
                }

                data.push_back(report);
                ctx.request_repaint()
            }
        });

        Self { data }
    }
}

impl eframe::App for NNGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let reports = self.get_data();
        let points: Vec<[f64; 2]> = reports
            .iter()
            .map(|report| [report.epoch as f64, report.rms_gradient])
            .collect();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical(|ui| {
                match reports.last() {
                    Some(report) => ui.heading(format!(
                        "Epoch {} loss: {}",
                        report.epoch, report.rms_gradient
                    )),
                    None => ui.heading("Waiting for the first report"),
                };
                Plot::new("Loss").show(ui, |plot_ui| plot_ui.line(Line::new(points)));
                if let Some(report) = reports.last() {
                    for (k, weight) in report.weights.iter().enumerate() {
                        ui.label(format!("weights[{k}] = {weight}"));
                    }
                }
            });
        });
    }
}

impl NNGui {
    /// Returns a clone of the data as a vec
    /// Blocks until it can get a lock on its state data
    pub fn get_data(&self) -> Vec<EpochReport> {
        self.data
            .lock()
            .map(|data| data.iter().cloned().collect())
            .unwrap_or_default()
    }
}
