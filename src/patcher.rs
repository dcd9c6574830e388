//! Patcher - runs the keymap steps with idempotency checks
//!
//! This module provides the high-level entry points that:
//! - Plan each step against the current text, in order
//! - Apply the planned edit before the next step runs
//! - Report a result for every step
//! - Write the patched keymap back atomically

use crate::config::{DanceConfig, ValidationError};
use crate::edit::{atomic_write, EditError};
use crate::keymap::{Locator, Step, StepPlan};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Result of running a single step
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "StepResult should be checked for applied/already-applied/skipped"]
pub enum StepResult {
    /// The step's marker matched and its edit ran
    Applied { message: String },
    /// The step's change was already present
    AlreadyApplied { message: String },
    /// The step's marker was not found
    Skipped { reason: String },
}

impl StepResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, StepResult::Applied { .. })
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepResult::Applied { message } => write!(f, "{message}"),
            StepResult::AlreadyApplied { message } => write!(f, "Already applied: {message}"),
            StepResult::Skipped { reason } => write!(f, "Skipped: {reason}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dance config: {0}")]
    Config(#[from] ValidationError),

    #[error("invalid marker pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("edit error in step {step}: {source}")]
    Edit {
        step: Step,
        #[source]
        source: EditError,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: EditError,
    },
}

/// The patched document and what each step did to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub content: String,
    pub steps: Vec<(Step, StepResult)>,
}

impl PatchOutcome {
    pub fn applied_count(&self) -> usize {
        self.steps.iter().filter(|(_, r)| r.is_applied()).count()
    }
}

/// Whether `patch_file` may touch the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Write,
    /// Run every step in memory only
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub original: String,
    pub outcome: PatchOutcome,
    /// False when nothing changed or in check mode
    pub written: bool,
}

impl FileReport {
    pub fn changed(&self) -> bool {
        self.original != self.outcome.content
    }
}

/// Applies one dance definition to keymap sources.
#[derive(Debug, Clone)]
pub struct Patcher {
    config: DanceConfig,
    locator: Locator,
}

impl Patcher {
    pub fn new(config: DanceConfig) -> Result<Self, PatchError> {
        config.validate()?;
        let locator = Locator::new(&config)?;
        Ok(Self { config, locator })
    }

    pub fn config(&self) -> &DanceConfig {
        &self.config
    }

    /// Run every step over `content` in order.
    ///
    /// Missing markers are not errors; the step is reported as skipped.
    pub fn patch_str(&self, content: &str) -> Result<PatchOutcome, PatchError> {
        let mut current = content.to_string();
        let mut steps = Vec::with_capacity(Step::ALL.len());

        for step in Step::ALL {
            let result = match step.plan(&current, &self.config, &self.locator) {
                StepPlan::Edit { edit, message } => {
                    debug!(
                        step = %step,
                        byte_start = edit.byte_start,
                        byte_end = edit.byte_end,
                        "applying edit"
                    );
                    current = edit
                        .apply_to(&current)
                        .map_err(|source| PatchError::Edit { step, source })?;
                    StepResult::Applied { message }
                }
                StepPlan::AlreadyApplied { message } => {
                    debug!(step = %step, "{message}");
                    StepResult::AlreadyApplied { message }
                }
                StepPlan::Skipped { reason } => {
                    debug!(step = %step, "skipped: {reason}");
                    StepResult::Skipped { reason }
                }
            };
            steps.push((step, result));
        }

        Ok(PatchOutcome {
            content: current,
            steps,
        })
    }

    /// Read `path`, patch it, and write it back when the text changed.
    pub fn patch_file(&self, path: &Path, mode: WriteMode) -> Result<FileReport, PatchError> {
        let original = fs::read_to_string(path).map_err(|source| PatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let outcome = self.patch_str(&original)?;

        let written = mode == WriteMode::Write && outcome.content != original;
        if written {
            atomic_write(path, outcome.content.as_bytes()).map_err(|source| {
                PatchError::Write {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            debug!(path = %path.display(), "wrote patched keymap");
        } else {
            debug!(path = %path.display(), ?mode, "keymap left untouched");
        }

        Ok(FileReport {
            path: path.to_path_buf(),
            original,
            outcome,
            written,
        })
    }
}

/// Patch `path` in place with the built-in dance.
pub fn patch_keymap(path: impl AsRef<Path>) -> Result<FileReport, PatchError> {
    Patcher::new(DanceConfig::default())?.patch_file(path.as_ref(), WriteMode::Write)
}
