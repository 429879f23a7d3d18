//! Per-block train/validation/test splits
//!
//! For block `b` (2-based), the prefix `[0, boundary[b-1])` of the canonical
//! shuffle is re-shuffled and divided into validation (first
//! `round(val_frac * prefix_len)` instances) and train (the rest); the test
//! set is the canonical-order slice `[boundary[b-1], boundary[b])`.

use rand::Rng;
use rand::seq::SliceRandom;

use super::schedule::BlockSchedule;
use crate::{OnlineMdlError, Result};

/// Disjoint instance subsets for one sent block.
#[derive(Debug, Clone)]
pub struct BlockSplit<T> {
    pub train: Vec<T>,
    pub validation: Vec<T>,
    pub test: Vec<T>,
}

/// Build the split for `block` (2 ..= num_blocks).
///
/// `dataset` must be in canonical shuffle order; the test slice is taken from
/// it untouched, while the prefix is cloned and re-shuffled with `rng`.
pub fn build_split<T, R>(
    dataset: &[T],
    schedule: &BlockSchedule,
    block: usize,
    val_frac: f64,
    rng: &mut R,
) -> Result<BlockSplit<T>>
where
    T: Clone,
    R: Rng,
{
    debug_assert!(
        block >= 2 && block <= schedule.num_blocks(),
        "block index {} out of range",
        block
    );
    let boundaries = schedule.boundaries();
    let prefix_end = boundaries[block - 1];
    let test_end = boundaries[block];

    if prefix_end == 0 {
        return Err(OnlineMdlError::DegenerateSchedule(format!(
            "block {} has an empty training prefix",
            block
        )));
    }

    let mut prefix: Vec<T> = dataset[..prefix_end].to_vec();
    prefix.shuffle(rng);

    let val_size = (val_frac * prefix.len() as f64).round() as usize;
    let train = prefix.split_off(val_size);
    let validation = prefix;
    let test = dataset[prefix_end..test_end].to_vec();

    Ok(BlockSplit {
        train,
        validation,
        test,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use test_case::test_case;

    fn schedule_1000() -> BlockSchedule {
        BlockSchedule::build(1000, 100, 0, 3).unwrap()
    }

    #[test]
    fn test_split_partitions_prefix() {
        let dataset: Vec<usize> = (0..1000).collect();
        let schedule = schedule_1000();
        let mut rng = StdRng::seed_from_u64(7);

        let split = build_split(&dataset, &schedule, 2, 0.1, &mut rng).unwrap();

        // Prefix is [0, 100): 10 validation + 90 train, disjoint, exhaustive.
        assert_eq!(split.validation.len(), 10);
        assert_eq!(split.train.len(), 90);
        let train: HashSet<_> = split.train.iter().collect();
        let validation: HashSet<_> = split.validation.iter().collect();
        assert!(train.is_disjoint(&validation));
        let prefix: HashSet<_> = dataset[..100].iter().collect();
        assert_eq!(&train | &validation, prefix);
    }

    #[test]
    fn test_test_slice_is_canonical_order() {
        let dataset: Vec<usize> = (0..1000).collect();
        let schedule = schedule_1000();
        let mut rng = StdRng::seed_from_u64(7);

        let split = build_split(&dataset, &schedule, 3, 0.1, &mut rng).unwrap();
        assert_eq!(split.test, dataset[316..1000].to_vec());
        assert_eq!(split.test.len(), schedule.block_sizes()[2]);
    }

    #[test_case(50, 0.1, 5, 45; "tenth of fifty")]
    #[test_case(100, 0.25, 25, 75; "quarter of hundred")]
    #[test_case(3, 0.5, 2, 1; "rounds half up")]
    fn test_val_size_rounds(prefix: usize, val_frac: f64, val: usize, train: usize) {
        let dataset: Vec<usize> = (0..prefix + 1).collect();
        let schedule = BlockSchedule::build(prefix + 1, prefix, 0, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let split = build_split(&dataset, &schedule, 2, val_frac, &mut rng).unwrap();
        assert_eq!(split.validation.len(), val);
        assert_eq!(split.train.len(), train);
    }

    #[test]
    fn test_deterministic_under_seed() {
        let dataset: Vec<usize> = (0..1000).collect();
        let schedule = schedule_1000();

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = build_split(&dataset, &schedule, 2, 0.1, &mut rng_a).unwrap();
        let b = build_split(&dataset, &schedule, 2, 0.1, &mut rng_b).unwrap();

        assert_eq!(a.train, b.train);
        assert_eq!(a.validation, b.validation);
        assert_eq!(a.test, b.test);
    }
}
