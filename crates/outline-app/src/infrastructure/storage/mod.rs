//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML settings file from the
//! platform-appropriate directory, supplies defaults on first run, and writes
//! a default file on request.  The overlay engine itself persists nothing.

pub mod config;
