//! Training oracle seam
//!
//! The core never trains a model itself. It hands the oracle a resolved
//! argument string pointing at materialized train/validation/test files and
//! gets back one scalar: the test-set average NLL in nats. The call is
//! blocking and may take arbitrarily long; any failure aborts the run.

use std::path::Path;
use std::process::Command;

use log::{debug, info};

use crate::{OnlineMdlError, Result};

/// Placeholders the training-argument template must contain.
pub const PLACEHOLDERS: [&str; 3] = ["TRAIN_FILE", "VALIDATION_FILE", "TEST_FILE"];

/// Training-argument template with all three split-file placeholders.
#[derive(Debug, Clone)]
pub struct ArgTemplate {
    raw: String,
}

impl ArgTemplate {
    /// Validate that `raw` contains every placeholder.
    pub fn new(raw: &str) -> Result<Self> {
        for placeholder in PLACEHOLDERS {
            if !raw.contains(placeholder) {
                return Err(OnlineMdlError::InvalidConfig(format!(
                    "expected {} in training args",
                    placeholder
                )));
            }
        }
        Ok(Self {
            raw: raw.to_string(),
        })
    }

    /// Substitute the real split-file paths for the placeholders.
    pub fn resolve(&self, train: &Path, validation: &Path, test: &Path) -> String {
        self.raw
            .replace("TRAIN_FILE", &train.to_string_lossy())
            .replace("VALIDATION_FILE", &validation.to_string_lossy())
            .replace("TEST_FILE", &test.to_string_lossy())
    }
}

/// External component that trains a model on the given splits and returns the
/// test-set average NLL in nats. Must signal failure rather than return a
/// sentinel value.
pub trait TrainingOracle {
    fn train_and_eval(&mut self, args: &str) -> Result<f64>;
}

/// Oracle backed by an external training program.
///
/// Spawns `program` with the resolved arguments whitespace-split and parses
/// the last non-empty stdout line as the NLL.
pub struct CommandOracle {
    program: String,
}

impl CommandOracle {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl TrainingOracle for CommandOracle {
    fn train_and_eval(&mut self, args: &str) -> Result<f64> {
        info!("Invoking training oracle: {} {}", self.program, args);
        let output = Command::new(&self.program)
            .args(args.split_whitespace())
            .output()?;

        if !output.status.success() {
            return Err(OnlineMdlError::OracleFailure(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let last_line = stdout
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .ok_or_else(|| {
                OnlineMdlError::OracleFailure(format!("{} produced no output", self.program))
            })?;
        debug!("Oracle output line: {}", last_line.trim());

        last_line.trim().parse::<f64>().map_err(|err| {
            OnlineMdlError::OracleFailure(format!(
                "could not parse NLL from {:?}: {}",
                last_line.trim(),
                err
            ))
        })
    }
}

/// Test oracle returning a fixed sequence of NLLs and recording the argument
/// strings it was called with.
#[derive(Debug, Default)]
pub struct StubOracle {
    nlls: Vec<f64>,
    next: usize,
    pub seen_args: Vec<String>,
}

impl StubOracle {
    pub fn new(nlls: Vec<f64>) -> Self {
        Self {
            nlls,
            next: 0,
            seen_args: Vec::new(),
        }
    }
}

impl TrainingOracle for StubOracle {
    fn train_and_eval(&mut self, args: &str) -> Result<f64> {
        self.seen_args.push(args.to_string());
        let nll = self.nlls.get(self.next).copied().ok_or_else(|| {
            OnlineMdlError::OracleFailure("stub oracle has no more NLLs queued".to_string())
        })?;
        self.next += 1;
        Ok(nll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_template_requires_all_placeholders() {
        assert!(ArgTemplate::new("--train_file TRAIN_FILE").is_err());
        assert!(ArgTemplate::new(
            "--train_file TRAIN_FILE --validation_file VALIDATION_FILE --test_file TEST_FILE"
        )
        .is_ok());
    }

    #[test]
    fn test_template_resolution() {
        let template = ArgTemplate::new(
            "--lr 3e-5 --train_file TRAIN_FILE --validation_file VALIDATION_FILE \
             --test_file TEST_FILE",
        )
        .unwrap();

        let resolved = template.resolve(
            &PathBuf::from("data/send_block_1/train.json"),
            &PathBuf::from("data/send_block_1/validation.json"),
            &PathBuf::from("data/send_block_1/test.json"),
        );

        assert!(resolved.contains("--train_file data/send_block_1/train.json"));
        assert!(resolved.contains("--validation_file data/send_block_1/validation.json"));
        assert!(resolved.contains("--test_file data/send_block_1/test.json"));
        assert!(!resolved.contains("TRAIN_FILE"));
    }

    #[test]
    fn test_stub_oracle_sequence_and_exhaustion() {
        let mut oracle = StubOracle::new(vec![0.5, 0.3]);
        assert_eq!(oracle.train_and_eval("a").unwrap(), 0.5);
        assert_eq!(oracle.train_and_eval("b").unwrap(), 0.3);
        assert!(matches!(
            oracle.train_and_eval("c"),
            Err(OnlineMdlError::OracleFailure(_))
        ));
        assert_eq!(oracle.seen_args, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_command_oracle_parses_last_line() {
        // `echo` stands in for a training program that logs and then prints
        // its test NLL last.
        let mut oracle = CommandOracle::new("echo");
        let nll = oracle.train_and_eval("0.25").unwrap();
        assert!((nll - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_command_oracle_rejects_garbage_output() {
        let mut oracle = CommandOracle::new("echo");
        assert!(matches!(
            oracle.train_and_eval("not-a-number"),
            Err(OnlineMdlError::OracleFailure(_))
        ));
    }

    #[test]
    fn test_command_oracle_spawn_failure() {
        let mut oracle = CommandOracle::new("nonexistent-training-program");
        assert!(oracle.train_and_eval("--seed 0").is_err());
    }
}
