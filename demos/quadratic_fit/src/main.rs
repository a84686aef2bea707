use backprop_nn::neural::{
    activations::FnActivation,
    trainer::{Sample, Trainer},
    NeuralNet,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn target_func(x: f64) -> f64 {
    x * x + 2.0 * x + 3.0
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // A single linear unit over (x², x, 1) can represent the target exactly.
    let identity = FnActivation::new(|x: f64| x, |_: f64| 1.0);

    let data: Vec<Sample> = [-2.0, -1.0, 0.0, 1.0, 2.0]
        .into_iter()
        .map(|x| (vec![x * x, x, 1.0], vec![target_func(x)]))
        .collect();

    let mut net = match NeuralNet::new(&[3, 1], 0.01, identity) {
        Ok(net) => net,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let trainer = Trainer::new(100).with_log(Some(5));
    if let Err(e) = trainer.train(&mut net, &data) {
        error!("{e}");
        std::process::exit(1);
    }

    info!("Learned coefficients: {}", net.weights()[0]);
    for x in [-3.0, 0.5, 4.0] {
        match net.forward(&[x * x, x, 1.0]) {
            Ok(out) => info!("f({x}) = {:.4}, expected {:.4}", out[0], target_func(x)),
            Err(e) => error!("{e}"),
        }
    }
}
