//! Orchestration loop
//!
//! Shuffles the dataset once into canonical order, then sends blocks strictly
//! in sequence: for each block after the first, materialize the split files,
//! resolve the training arguments, and invoke the oracle. Any oracle or I/O
//! failure aborts the run; a partial MDL is never reported.

use std::fs;

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use super::mdl::{self, MdlReport};
use super::schedule::BlockSchedule;
use super::splits::{build_split, BlockSplit};
use super::{ReshuffleRng, RunConfig};
use crate::data::save_jsonl;
use crate::oracle::{ArgTemplate, TrainingOracle};
use crate::Result;

/// Run the full online-coding protocol and return the MDL report.
///
/// Consumes the dataset because the canonical shuffle happens in place. The
/// same seed, dataset, and configuration always produce identical splits and
/// an identical report (given a deterministic oracle).
pub fn run<T, O>(config: &RunConfig, mut dataset: Vec<T>, oracle: &mut O) -> Result<MdlReport>
where
    T: Serialize + Clone,
    O: TrainingOracle,
{
    config.validate(dataset.len())?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    dataset.shuffle(&mut rng);

    let schedule = BlockSchedule::build(
        dataset.len(),
        config.min_block_size,
        config.max_block_size,
        config.num_blocks,
    )?;
    info!(
        "Block boundaries: {:?} ({} usable examples)",
        schedule.boundaries(),
        schedule.effective_size()
    );

    // Block 1 is sent with the uniform prior; no model is trained for it.
    let mut nlls = vec![mdl::uniform_prior_nll(config.label_range)];

    for block in 2..=config.num_blocks {
        let split = match config.reshuffle {
            ReshuffleRng::SharedCursor => {
                build_split(&dataset, &schedule, block, config.val_frac, &mut rng)?
            }
            ReshuffleRng::PerBlock => {
                let mut block_rng =
                    StdRng::seed_from_u64(config.seed.wrapping_add(block as u64));
                build_split(&dataset, &schedule, block, config.val_frac, &mut block_rng)?
            }
        };

        let args = materialize_split(config, block, &split)?;
        info!(
            "Sending block {}/{}: {} train, {} validation, {} test",
            block,
            config.num_blocks,
            split.train.len(),
            split.validation.len(),
            split.test.len()
        );

        let nll = oracle.train_and_eval(&args)?;
        info!("Block {} test NLL: {:.6} nats", block, nll);
        nlls.push(nll);
    }

    Ok(mdl::aggregate(&nlls, &schedule))
}

/// Write the three split files for `block` and resolve the training-argument
/// template against them.
fn materialize_split<T: Serialize>(
    config: &RunConfig,
    block: usize,
    split: &BlockSplit<T>,
) -> Result<String> {
    let block_dir = config.data_dir.join(format!("send_block_{}", block - 1));
    fs::create_dir_all(&block_dir)?;

    let path_for = |name: &str| block_dir.join(format!("{}.{}", name, config.data_file_ext));
    let train_path = path_for("train");
    let validation_path = path_for("validation");
    let test_path = path_for("test");

    save_jsonl(&split.train, &train_path)?;
    save_jsonl(&split.validation, &validation_path)?;
    save_jsonl(&split.test, &test_path)?;

    let template = ArgTemplate::new(&config.training_args)?;
    Ok(template.resolve(&train_path, &validation_path, &test_path))
}
