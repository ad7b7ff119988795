//! Application state management module.
//!
//! This module contains the core state management for the application:
//! - Main `State` struct that holds all application data
//! - Navigation types (`View`, role-gated view lists)
//! - State error handling

mod error;
mod navigation;

pub use error::StateError;
pub use navigation::{visible_views, View};

#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::{State, REPORT_COLUMNS};
