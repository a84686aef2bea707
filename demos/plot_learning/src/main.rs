use backprop_nn::{
    neural::{activations::Activations, trainer::Sample, trainer::Trainer, NeuralNet},
    viz::NNGui,
};

fn main() {
    const BITS: u32 = 3; // Number of bits per number to add

    fn to_bitvec(x: u32, size: u32) -> Vec<f64> {
        (0..size).map(|i| f64::from(x >> i & 1)).collect()
    }

    let mut data: Vec<Sample> = Vec::new();
    for i in 0..1 << BITS {
        for j in 0..1 << BITS {
            data.push((
                [to_bitvec(i, BITS), to_bitvec(j, BITS)].concat(),
                to_bitvec(i + j, BITS + 1),
            ));
        }
    }

    let sizes = [2 * BITS as usize, 2 * BITS as usize + 1, BITS as usize + 1];
    let mut net = NeuralNet::new(&sizes, 0.5, Activations::Sigmoid).expect("valid layer sizes");

    let trainer = Trainer::new(20_000).with_log(Some(2_000));
    if let Err(e) = trainer.train_gui::<NNGui>(&mut net, &data) {
        eprintln!("training failed: {e}");
        return;
    }

    let mut correct = 0;
    for (input, target) in &data {
        let Ok(out) = net.forward(input) else { continue };
        if out.iter().zip(target).all(|(o, t)| o.round() == *t) {
            correct += 1;
        }
    }
    println!("Accuracy = {}", correct as f64 / data.len() as f64);
}
