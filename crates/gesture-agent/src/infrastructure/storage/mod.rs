//! Storage infrastructure: the configuration file.
//!
//! The `config` sub-module reads the TOML configuration from the
//! platform-appropriate directory, falls back to defaults on first run and
//! writes the effective configuration back when asked.

pub mod config;
