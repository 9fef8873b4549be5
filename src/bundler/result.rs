//! Per-bundler results and the aggregate output of a run

use std::path::PathBuf;
use std::time::Duration;

use miette::Diagnostic;
use serde::{Serialize, Serializer};

use super::{BundleStage, BundleType};
use crate::error::{ErrorKind, StackError};

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

/// Outcome of one bundler
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleResult {
    pub bundler_type: BundleType,
    pub files: Vec<PathBuf>,
    pub size: u64,
    #[serde(rename = "durationMs", serialize_with = "as_millis")]
    pub duration: Duration,
    pub success: bool,
}

impl BundleResult {
    /// Empty successful result
    pub fn new(bundler_type: BundleType) -> Self {
        Self {
            bundler_type,
            files: Vec::new(),
            size: 0,
            duration: Duration::ZERO,
            success: true,
        }
    }

    pub(crate) fn failed(bundler_type: BundleType, duration: Duration) -> Self {
        Self {
            duration,
            success: false,
            ..Self::new(bundler_type)
        }
    }

    pub fn add_file(&mut self, path: PathBuf, size: u64) {
        self.files.push(path);
        self.size += size;
    }
}

/// Failure attributed to a bundler and lifecycle stage
///
/// `kind` and `code` come from the error the plugin returned, so callers can
/// tell a timeout from a rejected recipe without parsing `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleError {
    pub bundler_type: BundleType,
    pub stage: BundleStage,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

impl BundleError {
    pub fn new(bundler_type: BundleType, stage: BundleStage, error: &StackError) -> Self {
        Self {
            bundler_type,
            stage,
            kind: error.kind(),
            code: error.code().map(|code| code.to_string()),
            message: error.to_string(),
        }
    }
}

/// Aggregate of one `make` call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleOutput {
    pub results: Vec<BundleResult>,
    pub errors: Vec<BundleError>,
    pub total_size: u64,
    pub total_files: usize,
    #[serde(rename = "totalDurationMs", serialize_with = "as_millis")]
    pub total_duration: Duration,
    pub output_dir: PathBuf,
}

impl BundleOutput {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            results: Vec::new(),
            errors: Vec::new(),
            total_size: 0,
            total_files: 0,
            total_duration: Duration::ZERO,
            output_dir,
        }
    }

    /// Record a successful bundler; totals only count successes
    pub fn push_success(&mut self, mut result: BundleResult) {
        result.success = true;
        self.total_size += result.size;
        self.total_files += result.files.len();
        self.results.push(result);
    }

    /// Record a failed bundler as an unsuccessful result plus its error
    pub fn push_failure(&mut self, error: BundleError, duration: Duration) {
        self.results
            .push(BundleResult::failed(error.bundler_type.clone(), duration));
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn result(&self, bundle_type: &BundleType) -> Option<&BundleResult> {
        self.results.iter().find(|r| &r.bundler_type == bundle_type)
    }

    pub fn successes(&self) -> impl Iterator<Item = &BundleResult> {
        self.results.iter().filter(|r| r.success)
    }
}
