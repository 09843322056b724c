//! # Configuration
//!
//! Client configuration shared by the web dashboard and the CLI. Loading from
//! files and the environment is only available on native targets; the web
//! build bakes its values in at compile time.

mod client;

pub use client::{ClientConfig, ConfigError, LogFormat};
