//! swa library
//!
//! This module exposes the application modules for use in integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod refresh;
pub mod ui;
