//! Append-only JSON-lines dataset.
//!
//! Holds two kinds of record, one JSON object per line: labeled training
//! samples (appended by retrain requests) and unlabeled prediction logs
//! (appended after every prediction). Only labeled lines are used for training.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::features::LabeledSample;

/// A logged prediction. `features` is the network input vector for the
/// variant that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub features: Vec<f64>,
    pub risk_score: f64,
    pub model_used: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatasetRecord {
    Labeled(LabeledSample),
    Prediction(PredictionRecord),
}

#[derive(Debug, Clone)]
pub struct DatasetLog {
    path: PathBuf,
}

impl DatasetLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> Result<(), ScoringError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent)?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Append labeled samples. Returns how many were written.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::Io` if the file cannot be opened or written.
    pub fn append_samples(&self, samples: &[LabeledSample]) -> Result<usize, ScoringError> {
        if samples.is_empty() {
            return Ok(0);
        }
        self.ensure_parent()?;
        serde_jsonlines::append_json_lines(&self.path, samples.iter().map(|s| DatasetRecord::Labeled(*s)))?;
        Ok(samples.len())
    }

    /// Append one prediction log record.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::Io` if the file cannot be opened or written.
    pub fn append_prediction(&self, record: &PredictionRecord) -> Result<(), ScoringError> {
        self.ensure_parent()?;
        serde_jsonlines::append_json_lines(&self.path, [record])?;
        Ok(())
    }

    /// Every labeled sample in file order. Prediction records are ignored and
    /// unparseable lines are skipped with a warning. A missing file is empty.
    ///
    /// # Errors
    ///
    /// Returns `ScoringError::Io` if the file exists but cannot be read.
    pub fn load_labeled(&self) -> Result<Vec<LabeledSample>, ScoringError> {
        let lines = match serde_jsonlines::json_lines::<DatasetRecord, _>(&self.path) {
            Ok(lines) => lines,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut samples = Vec::new();
        for (line_no, record) in (1_usize..).zip(lines) {
            match record {
                Ok(DatasetRecord::Labeled(sample)) => samples.push(sample),
                Ok(DatasetRecord::Prediction(_)) => {}
                Err(e) if matches!(e.kind(), ErrorKind::InvalidData | ErrorKind::UnexpectedEof) => {
                    tracing::warn!(path = %self.path.display(), line = line_no, error = %e, "skipping malformed dataset line");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::RiskFeatures;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn sample(label: f64) -> LabeledSample {
        LabeledSample {
            features: RiskFeatures::from_accuracies(0.2, 0.4, 0.6),
            label,
        }
    }

    fn prediction() -> PredictionRecord {
        PredictionRecord {
            features: vec![0.2, 0.4, 0.6],
            risk_score: 0.5,
            model_used: "fallback".into(),
            timestamp: "2026-01-01T00:00:00+00:00".into(),
        }
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = DatasetLog::new(dir.path().join("dataset.jsonl"));
        assert!(log.load_labeled().unwrap().is_empty());
    }

    #[test]
    fn only_labeled_lines_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let log = DatasetLog::new(dir.path().join("models/dataset.jsonl"));

        log.append_samples(&[sample(1.0)]).unwrap();
        log.append_prediction(&prediction()).unwrap();
        log.append_samples(&[sample(0.0), sample(0.5)]).unwrap();

        let labels: Vec<f64> = log.load_labeled().unwrap().iter().map(|s| s.label).collect();
        assert_eq!(labels, vec![1.0, 0.0, 0.5]);
    }

    #[test]
    fn prediction_lines_parse_as_predictions() {
        let line = serde_json::to_string(&prediction()).unwrap();
        let record: DatasetRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(record, DatasetRecord::Prediction(prediction()));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.jsonl");
        let log = DatasetLog::new(&path);
        log.append_samples(&[sample(1.0)]).unwrap();
        {
            let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(f, "{{not json").unwrap();
            writeln!(f, r#"{{"letters_accuracy": "high"}}"#).unwrap();
        }
        log.append_samples(&[sample(0.0)]).unwrap();

        assert_eq!(log.load_labeled().unwrap().len(), 2);
    }
}
