//! Keymap Patcher: inject a custom tap dance into an Oryx-generated QMK keymap
//!
//! Oryx regenerates `keymap.c` from scratch on every export, dropping any hand
//! edits. This crate re-applies one tap dance definition to a fresh export by
//! textual patching, and does nothing the second time it runs.
//!
//! # Architecture
//!
//! Every change compiles down to a single primitive: [`Edit`], a verified
//! byte-span replacement. Each [`Step`] locates its marker with a regex and
//! plans at most one edit; the [`Patcher`] applies the steps in order:
//!
//! 1. add `DANCE_<n>` to the `tap_dance_codes` enum
//! 2. grow `static tap dance_state[N];` to at least `n + 1`
//! 3. inject the dance callbacks before `tap_dance_actions`
//! 4. append the `ACTION_TAP_DANCE_FN_ADVANCED` entry
//! 5. swap the last target key in the layer's layout for `TD(DANCE_<n>)`
//!
//! A step whose marker is missing is skipped; a step whose change is already
//! present is left alone.
//!
//! # Example
//!
//! ```no_run
//! use keymap_patcher::{DanceConfig, Patcher, WriteMode};
//! use std::path::Path;
//!
//! let patcher = Patcher::new(DanceConfig::default())?;
//! let report = patcher.patch_file(Path::new("keymap.c"), WriteMode::Write)?;
//! for (step, result) in &report.outcome.steps {
//!     println!("{step}: {result}");
//! }
//! # Ok::<(), keymap_patcher::PatchError>(())
//! ```

pub mod config;
pub mod edit;
pub mod keymap;
pub mod patcher;

// Re-exports
pub use config::{
    load_from_path, load_from_str, ConfigError, ConfigSource, DanceConfig, GestureConfig,
};
pub use edit::{Edit, EditError, EditVerification};
pub use keymap::{Gesture, KeyAction, Step, StepPlan};
pub use patcher::{
    patch_keymap, FileReport, PatchError, PatchOutcome, Patcher, StepResult, WriteMode,
};
