//! Block schedule computation
//!
//! Boundaries are spaced equally in log10 between the minimum block size and
//! the number of usable examples, rounded to the nearest integer, with 0
//! prepended. Rounding at small block counts can collapse two boundaries; that
//! is rejected as a degenerate schedule rather than silently nudged, because
//! nudging would change how many instances the early blocks test on.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{OnlineMdlError, Result};

/// Strictly increasing block boundaries for one run.
///
/// `boundaries` has length `num_blocks + 1`, starts at 0, and ends at the
/// effective dataset size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSchedule {
    boundaries: Vec<usize>,
}

impl BlockSchedule {
    /// Compute the schedule for `num_blocks` blocks over `dataset_size`
    /// examples, capped at `max_block_size` (0 for uncapped).
    pub fn build(
        dataset_size: usize,
        min_block_size: usize,
        max_block_size: usize,
        num_blocks: usize,
    ) -> Result<Self> {
        if num_blocks < 1 {
            return Err(OnlineMdlError::InvalidConfig(
                "num_blocks must be >= 1".to_string(),
            ));
        }
        if min_block_size < 1 {
            return Err(OnlineMdlError::InvalidConfig(
                "min_block_size must be >= 1".to_string(),
            ));
        }
        let effective_size = if max_block_size == 0 {
            dataset_size
        } else {
            max_block_size.min(dataset_size)
        };
        if min_block_size > effective_size {
            return Err(OnlineMdlError::InvalidConfig(format!(
                "min_block_size {} exceeds the {} usable examples",
                min_block_size, effective_size
            )));
        }

        // A single point in log space degenerates to the endpoint, so the last
        // boundary is always the effective size.
        let points: Array1<f64> = if num_blocks == 1 {
            Array1::from_elem(1, effective_size as f64)
        } else {
            Array1::linspace(
                (min_block_size as f64).log10(),
                (effective_size as f64).log10(),
                num_blocks,
            )
            .mapv(|exp| 10f64.powf(exp))
        };

        let mut boundaries = Vec::with_capacity(num_blocks + 1);
        boundaries.push(0);
        for point in points.iter() {
            boundaries.push(point.round() as usize);
        }

        for pair in boundaries.windows(2) {
            if pair[1] <= pair[0] {
                return Err(OnlineMdlError::DegenerateSchedule(format!(
                    "rounding collapsed boundaries {} and {}; use fewer blocks \
                     or a smaller min_block_size",
                    pair[0], pair[1]
                )));
            }
        }

        Ok(Self { boundaries })
    }

    /// Boundary indices, length `num_blocks + 1`.
    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    /// Number of blocks in the schedule.
    pub fn num_blocks(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Number of usable examples (the last boundary).
    pub fn effective_size(&self) -> usize {
        *self.boundaries.last().unwrap_or(&0)
    }

    /// Per-block sizes: consecutive boundary differences. Sums to the
    /// effective size.
    pub fn block_sizes(&self) -> Vec<usize> {
        self.boundaries
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect()
    }
}
