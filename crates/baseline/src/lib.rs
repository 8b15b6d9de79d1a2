//! Baseline dataset collaborator
//!
//! Turns a baseline configuration into the artifact layout the baseline
//! analysis reads from and writes to.

pub mod layout;

pub use layout::*;
