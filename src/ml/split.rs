use crate::error::{Result, RiceIntelError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices of a train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Stratified, seeded train/test split over encoded labels.
///
/// Each class contributes `round(n * test_size)` rows to the test partition,
/// clamped so both partitions get at least one row of every class.
pub fn stratified_split(
    labels: &[usize],
    n_classes: usize,
    test_size: f64,
    seed: u64,
) -> Result<Split> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(RiceIntelError::Config(format!(
            "test_size must be between 0 and 1, got {}",
            test_size
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(labels.len());
    let mut test = Vec::new();

    for class in 0..n_classes {
        let mut members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == class)
            .map(|(i, _)| i)
            .collect();

        if members.len() < 2 {
            return Err(RiceIntelError::Data(format!(
                "Class {} has {} row(s); stratified split needs at least 2",
                class,
                members.len()
            )));
        }

        members.shuffle(&mut rng);
        let n_test = ((members.len() as f64 * test_size).round() as usize)
            .clamp(1, members.len() - 1);

        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();

    tracing::debug!(
        "Stratified split: {} train rows, {} test rows (seed {})",
        train.len(),
        test.len(),
        seed
    );

    Ok(Split { train, test })
}
