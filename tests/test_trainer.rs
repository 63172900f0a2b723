// Epoch loop: validation of arguments, batching policy, reproducibility.

use std::sync::mpsc;

use mlp_sgd::{train_loop, BatchRemainder, DataSet, Matrix, MlpError, Network, TrainConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Points on either side of the diagonal: x0 > x1 → class 0.
fn diagonal_set(n: usize, seed: u64) -> DataSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut inputs = Vec::with_capacity(n);
    let mut targets = Vec::with_capacity(n);
    for i in 0..n {
        let low: f64 = rng.gen_range(0.0..0.3);
        let high: f64 = rng.gen_range(0.7..1.0);
        if i % 2 == 0 {
            inputs.push(Matrix::column(vec![high, low]));
            targets.push(Matrix::column(vec![1.0, 0.0]));
        } else {
            inputs.push(Matrix::column(vec![low, high]));
            targets.push(Matrix::column(vec![0.0, 1.0]));
        }
    }
    DataSet::new(inputs, targets).unwrap()
}

fn bits(net: &Network) -> Vec<u64> {
    net.weights()
        .iter()
        .chain(net.biases())
        .flat_map(|m| m.to_vec())
        .map(f64::to_bits)
        .collect()
}

#[test]
fn zero_epochs_leave_parameters_bit_identical() {
    let data = diagonal_set(20, 1);
    let mut net = Network::new(&[2, 3, 2], &mut StdRng::seed_from_u64(2)).unwrap();
    let before = bits(&net);

    let history = net
        .train(&data, Some(&data), 5, 0, 3.0, &mut StdRng::seed_from_u64(3))
        .unwrap();

    assert!(history.is_empty());
    assert_eq!(bits(&net), before);
}

#[test]
fn invalid_batch_sizes_fail_before_training() {
    let data = diagonal_set(6, 1);
    let mut net = Network::new(&[2, 2], &mut StdRng::seed_from_u64(2)).unwrap();
    let before = bits(&net);
    let mut rng = StdRng::seed_from_u64(0);

    assert!(matches!(
        net.train(&data, None, 0, 1, 1.0, &mut rng),
        Err(MlpError::InvalidBatchConfiguration { batch_size: 0, samples: 6 })
    ));
    assert!(matches!(
        net.train(&data, None, 7, 1, 1.0, &mut rng),
        Err(MlpError::InvalidBatchConfiguration { batch_size: 7, samples: 6 })
    ));
    assert_eq!(bits(&net), before);
}

#[test]
fn empty_training_set_fails() {
    let mut net = Network::new(&[2, 2], &mut StdRng::seed_from_u64(2)).unwrap();
    assert!(matches!(
        net.train(&DataSet::default(), None, 1, 1, 1.0, &mut StdRng::seed_from_u64(0)),
        Err(MlpError::EmptyDataSet("train"))
    ));
}

#[test]
fn mis_shaped_training_sample_fails() {
    let data = DataSet::new(
        vec![Matrix::column(vec![0.1, 0.2]), Matrix::column(vec![0.1])],
        vec![Matrix::column(vec![1.0, 0.0]), Matrix::column(vec![0.0, 1.0])],
    )
    .unwrap();
    let mut net = Network::new(&[2, 2], &mut StdRng::seed_from_u64(2)).unwrap();
    assert!(matches!(
        net.train(&data, None, 1, 1, 1.0, &mut StdRng::seed_from_u64(0)),
        Err(MlpError::ShapeMismatch { context: "input vector", .. })
    ));
}

#[test]
fn trailing_partial_batch_is_dropped_by_default() {
    let data = diagonal_set(10, 4);
    let mut net = Network::new(&[2, 2], &mut StdRng::seed_from_u64(5)).unwrap();
    let history = net
        .train(&data, None, 3, 2, 1.0, &mut StdRng::seed_from_u64(6))
        .unwrap();

    assert_eq!(history.len(), 2);
    for stats in &history {
        assert_eq!(stats.batches, 3);
        assert_eq!(stats.skipped, 1);
        assert!(stats.validation.is_none());
    }
}

#[test]
fn trailing_partial_batch_can_be_included() {
    let data = diagonal_set(10, 4);
    let mut net = Network::new(&[2, 2], &mut StdRng::seed_from_u64(5)).unwrap();
    let mut config = TrainConfig::new(1, 3, 1.0);
    config.remainder = BatchRemainder::Include;

    let history =
        train_loop(&mut net, &data, None, &config, &mut StdRng::seed_from_u64(6)).unwrap();
    assert_eq!(history[0].batches, 4);
    assert_eq!(history[0].skipped, 0);
}

#[test]
fn same_seeds_reproduce_training() {
    let data = diagonal_set(24, 7);
    let run = || {
        let mut net = Network::new(&[2, 3, 2], &mut StdRng::seed_from_u64(8)).unwrap();
        net.train(&data, None, 4, 3, 2.0, &mut StdRng::seed_from_u64(9)).unwrap();
        bits(&net)
    };
    assert_eq!(run(), run());
}

#[test]
fn shuffle_seed_changes_batch_order() {
    let data = diagonal_set(24, 7);
    let run = |shuffle_seed| {
        let mut net = Network::new(&[2, 3, 2], &mut StdRng::seed_from_u64(8)).unwrap();
        net.train(&data, None, 4, 1, 2.0, &mut StdRng::seed_from_u64(shuffle_seed))
            .unwrap();
        bits(&net)
    };
    assert_ne!(run(10), run(11));
}

#[test]
fn progress_channel_receives_every_epoch() {
    let data = diagonal_set(12, 2);
    let (tx, rx) = mpsc::channel();
    let mut config = TrainConfig::new(3, 4, 1.0);
    config.progress_tx = Some(tx);

    let mut net = Network::new(&[2, 2], &mut StdRng::seed_from_u64(1)).unwrap();
    let history =
        train_loop(&mut net, &data, Some(&data), &config, &mut StdRng::seed_from_u64(1)).unwrap();

    let received: Vec<_> = rx.try_iter().collect();
    assert_eq!(received, history);
    assert_eq!(received.iter().map(|s| s.epoch).collect::<Vec<_>>(), vec![1, 2, 3]);
    for stats in &received {
        assert_eq!(stats.total_epochs, 3);
        assert_eq!(stats.validation.map(|v| v.total), Some(12));
    }
}

#[test]
fn dropped_receiver_does_not_stop_training() {
    let data = diagonal_set(8, 2);
    let (tx, rx) = mpsc::channel();
    drop(rx);
    let mut config = TrainConfig::new(2, 4, 1.0);
    config.progress_tx = Some(tx);

    let mut net = Network::new(&[2, 2], &mut StdRng::seed_from_u64(1)).unwrap();
    let history =
        train_loop(&mut net, &data, None, &config, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(history.len(), 2);
}

#[test]
fn empty_validation_set_is_ignored() {
    let data = diagonal_set(8, 3);
    let mut net = Network::new(&[2, 2], &mut StdRng::seed_from_u64(1)).unwrap();
    let history = net
        .train(&data, Some(&DataSet::default()), 4, 1, 1.0, &mut StdRng::seed_from_u64(1))
        .unwrap();
    assert!(history[0].validation.is_none());
}

#[test]
fn learns_a_separable_problem() {
    let training = diagonal_set(40, 10);
    let validation = diagonal_set(20, 11);
    let mut net = Network::new(&[2, 2], &mut StdRng::seed_from_u64(12)).unwrap();

    let history = net
        .train(&training, Some(&validation), 4, 300, 3.0, &mut StdRng::seed_from_u64(13))
        .unwrap();

    let first = history.first().unwrap().train_cost;
    let last = history.last().unwrap().train_cost;
    assert!(last < first, "training cost went from {} to {}", first, last);
    assert_eq!(net.evaluate(&validation).unwrap(), 1.0);
}
