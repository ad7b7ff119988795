//! Utility functions module.

pub mod notes;
