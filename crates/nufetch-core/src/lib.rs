//! Core input types for nufetch.
//!
//! This crate defines what a user asks for (root package specifications) and
//! how the tool is configured (`~/.nufetch/config.toml`).
//!
//! This crate is intentionally free of async code and network I/O.

/// Flat-container endpoint of the public nuget.org feed.
pub const DEFAULT_SOURCE_URL: &str = "https://api.nuget.org/v3-flatcontainer";

pub mod config;
pub mod dependency;
