//! Empire of Cotton timeline viewer library
//!
//! Re-exports modules for use by the binary and tests.

pub mod app;
pub mod config;
pub mod logging;
pub mod timeline;
pub mod view;
