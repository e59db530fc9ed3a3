//! NuGet v3 flat container protocol: version index, nuspec parsing, package
//! download, authentication, and the local package store.

pub mod auth;
pub mod download;
pub mod index;
pub mod nuspec;
pub mod provider;
pub mod repository;
pub mod store;
