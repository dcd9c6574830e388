//! Keymap-specific knowledge: where the markers are, what gets generated,
//! and the ordered steps that combine the two.

pub mod codegen;
pub mod gesture;
pub mod locate;
pub mod steps;

pub use gesture::{Gesture, KeyAction};
pub use locate::{BraceBlock, Locator};
pub use steps::{Step, StepPlan};
