//! Online coding core
//!
//! Implements the block schedule, per-block train/validation/test splits,
//! codelength aggregation, and the orchestration loop that ties them to the
//! training oracle.

pub mod mdl;
pub mod pipeline;
pub mod schedule;
pub mod splits;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::oracle::ArgTemplate;
use crate::{OnlineMdlError, Result};

/// Generator used when re-shuffling the train/validation prefix of each block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReshuffleRng {
    /// One seeded generator threaded through the whole run: the prefix shuffle
    /// for block `b` depends on every shuffle before it. Matches the strictly
    /// sequential protocol and is the default.
    SharedCursor,
    /// An independent generator seeded with `seed + b` per block, so a single
    /// block's split can be reproduced without replaying earlier blocks.
    PerBlock,
}

/// Configuration for one online-coding run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Training arguments handed to the oracle. Must contain the literal
    /// placeholders `TRAIN_FILE`, `VALIDATION_FILE`, and `TEST_FILE`.
    pub training_args: String,
    /// Directory under which per-block split files are written.
    pub data_dir: PathBuf,
    /// File extension for materialized split files.
    pub data_file_ext: String,
    /// Number of blocks N sent; N-1 models are trained, since the first block
    /// is sent with the uniform prior.
    pub num_blocks: usize,
    /// Minimum number of examples in a block (inclusive).
    pub min_block_size: usize,
    /// Maximum number of usable examples. 0 means all examples.
    pub max_block_size: usize,
    /// Fraction of the training prefix split off for validation.
    pub val_frac: f64,
    /// Seed for the deterministic shuffles.
    pub seed: u64,
    /// For classification, the number of output classes; for regression, the
    /// width of the output interval. Sets the uniform-prior codelength for the
    /// first block.
    pub label_range: f64,
    /// How the per-block prefix re-shuffle is seeded.
    pub reshuffle: ReshuffleRng,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            training_args: String::new(),
            data_dir: PathBuf::from("data"),
            data_file_ext: "json".to_string(),
            num_blocks: 9,
            min_block_size: 64,
            max_block_size: 0,
            val_frac: 0.1,
            seed: 0,
            label_range: 2.0,
            reshuffle: ReshuffleRng::SharedCursor,
        }
    }
}

impl RunConfig {
    /// Number of usable examples given the dataset size and the block cap.
    pub fn effective_size(&self, dataset_size: usize) -> usize {
        if self.max_block_size == 0 {
            dataset_size
        } else {
            self.max_block_size.min(dataset_size)
        }
    }

    /// Validate every numeric range and the argument template eagerly, before
    /// any file is written or any model trained.
    pub fn validate(&self, dataset_size: usize) -> Result<()> {
        if dataset_size < 1 {
            return Err(OnlineMdlError::InvalidConfig(
                "dataset must contain at least one instance".to_string(),
            ));
        }
        if self.num_blocks < 1 {
            return Err(OnlineMdlError::InvalidConfig(
                "num_blocks must be >= 1".to_string(),
            ));
        }
        if self.min_block_size < 1 {
            return Err(OnlineMdlError::InvalidConfig(
                "min_block_size must be >= 1".to_string(),
            ));
        }
        if !(self.val_frac > 0.0 && self.val_frac < 1.0) {
            return Err(OnlineMdlError::InvalidConfig(format!(
                "val_frac must be in (0, 1), got {}",
                self.val_frac
            )));
        }
        if self.label_range <= 0.0 {
            return Err(OnlineMdlError::InvalidConfig(format!(
                "label_range must be > 0, got {}",
                self.label_range
            )));
        }
        let effective = self.effective_size(dataset_size);
        if self.min_block_size > effective {
            return Err(OnlineMdlError::InvalidConfig(format!(
                "min_block_size {} exceeds the {} usable examples",
                self.min_block_size, effective
            )));
        }
        // Oracle calls only happen for runs with at least two blocks.
        if self.num_blocks > 1 {
            ArgTemplate::new(&self.training_args)?;
        }
        Ok(())
    }
}
