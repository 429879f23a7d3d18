//! Online MDL Estimation Library
//!
//! Estimates the Minimum Description Length (MDL) of a labeled dataset under a
//! model family using the online (prequential) coding protocol: the dataset is
//! partitioned into geometrically growing blocks, a fresh model is trained on
//! each prefix of blocks and evaluated on the next block, and the per-block
//! negative log-likelihoods are accumulated into a single codelength statistic.
//!
//! # Protocol
//!
//! - **Block schedule**: block boundaries are spaced log-uniformly between the
//!   minimum block size and the usable dataset size, so early blocks are small
//!   (cheap to train on, high marginal information) and later blocks large.
//! - **Block 1** is "sent" with a uniform prior over `label_range` outcomes;
//!   no model is ever trained for it.
//! - **Blocks 2..N** are scored by an external training oracle that receives
//!   train/validation/test files and returns the test-set average NLL in nats.
//! - **MDL** = sum over blocks of `block_size * nll / ln 2` bits.
//!
//! # Example
//!
//! ```rust,no_run
//! use online_mdl::coding::{pipeline, RunConfig};
//! use online_mdl::oracle::CommandOracle;
//!
//! fn main() -> online_mdl::Result<()> {
//!     let config = RunConfig {
//!         training_args: "--train_file TRAIN_FILE --validation_file VALIDATION_FILE \
//!                         --test_file TEST_FILE".to_string(),
//!         label_range: 2.0,
//!         ..RunConfig::default()
//!     };
//!     let dataset: Vec<serde_json::Value> = vec![/* loaded elsewhere */];
//!     let mut oracle = CommandOracle::new("train-model");
//!     let report = pipeline::run(&config, dataset, &mut oracle)?;
//!     println!("MDL: {} bits", report.total_bits);
//!     Ok(())
//! }
//! ```

pub mod coding;
pub mod data;
pub mod oracle;

// Re-export commonly used types
pub use coding::{
    mdl::MdlReport,
    schedule::BlockSchedule,
    RunConfig, ReshuffleRng,
};
pub use data::{DatasetProvider, JsonlProvider};
pub use oracle::{ArgTemplate, CommandOracle, TrainingOracle};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types
#[derive(thiserror::Error, Debug)]
pub enum OnlineMdlError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Degenerate block schedule: {0}")]
    DegenerateSchedule(String),

    #[error("Training oracle failed: {0}")]
    OracleFailure(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, OnlineMdlError>;
