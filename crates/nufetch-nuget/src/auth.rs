//! Package source authentication using credentials from the global config.
//!
//! ```toml
//! [sources]
//! private = { url = "https://pkgs.example.com/v3-flatcontainer", username = "ci", password = "secret" }
//! feed = { url = "https://feed.example.com/flat", password = "api-token" }
//! ```
//!
//! A password without a username is sent as a bearer token.

use reqwest::RequestBuilder;

use crate::repository::PackageSource;

/// Apply authentication to a request if the source has credentials.
pub fn apply_auth(request: RequestBuilder, source: &PackageSource) -> RequestBuilder {
    match (&source.username, &source.password) {
        (Some(user), Some(pass)) => request.basic_auth(user, Some(pass)),
        (Some(user), None) => request.basic_auth(user, None::<&str>),
        (None, Some(token)) => request.bearer_auth(token),
        (None, None) => request,
    }
}
