use mlp_sgd::{DataSet, Matrix, Network};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> mlp_sgd::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::WARN).init();

    let mut rng = StdRng::seed_from_u64(2024);
    let mut network = Network::new(&[2, 4, 1], &mut rng)?;

    let inputs = vec![
        Matrix::column(vec![1.0, 0.0]),
        Matrix::column(vec![1.0, 1.0]),
        Matrix::column(vec![0.0, 1.0]),
        Matrix::column(vec![0.0, 0.0]),
    ];
    let targets = vec![
        Matrix::column(vec![1.0]),
        Matrix::column(vec![0.0]),
        Matrix::column(vec![1.0]),
        Matrix::column(vec![0.0]),
    ];
    let data = DataSet::new(inputs, targets)?;

    let history = network.train(&data, None, 4, 5000, 2.0, &mut rng)?;
    if let Some(last) = history.last() {
        println!("Final cost: {:.6}", last.train_cost);
    }

    for (input, target) in data.iter() {
        let output = network.predict(input)?;
        println!(
            "Input: {:?} -> Output: {:.4} (expected {})",
            input.to_vec(),
            output.get(0, 0),
            target.get(0, 0)
        );
    }

    Ok(())
}
