//! Dataset loading and split materialization
//!
//! Instances are opaque to the core: it only needs their count and order. The
//! reference instance type is `serde_json::Value`, one record per line
//! (JSON-lines), matching what the training oracle consumes.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::Result;

/// Source of instances for one run.
pub trait DatasetProvider {
    type Instance;

    fn load(&self, source: &Path) -> Result<Vec<Self::Instance>>;
}

/// JSON-lines dataset provider: one JSON record per non-empty line.
#[derive(Debug, Default)]
pub struct JsonlProvider;

impl DatasetProvider for JsonlProvider {
    type Instance = serde_json::Value;

    fn load(&self, source: &Path) -> Result<Vec<serde_json::Value>> {
        let file = File::open(source)?;
        let reader = BufReader::new(file);
        let mut instances = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                instances.push(serde_json::from_str(&line)?);
            }
        }
        debug!("Loaded {} instances from {}", instances.len(), source.display());

        Ok(instances)
    }
}

/// Write one serialized record per line, the format the training oracle reads
/// split files in.
pub fn save_jsonl<T: Serialize>(instances: &[T], destination: &Path) -> Result<()> {
    let file = File::create(destination)?;
    let mut writer = BufWriter::new(file);

    for instance in instances {
        serde_json::to_writer(&mut writer, instance)?;
        writeln!(writer)?;
    }
    writer.flush()?;

    Ok(())
}
