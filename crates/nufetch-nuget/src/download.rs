//! Fetching flat container files from remote or local sources.

use std::path::Path;
use std::time::Duration;

use nufetch_util::errors::NufetchError;
use reqwest::Client;

use crate::auth;
use crate::repository::{PackageSource, SourceLocation};

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Build a shared reqwest client for package sources.
pub fn build_client() -> miette::Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("nufetch/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            NufetchError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            }
            .into()
        })
}

/// Fetch a file at `relative` (a flat container path) from `source`.
///
/// Returns `Ok(None)` when the source does not have it.
pub async fn fetch(
    client: &Client,
    source: &PackageSource,
    relative: &str,
) -> miette::Result<Option<Vec<u8>>> {
    match &source.location {
        SourceLocation::Remote(base) => {
            let url = format!("{base}/{relative}");
            download_bytes(client, source, &url).await
        }
        SourceLocation::Local(root) => read_local(&root.join(relative)).await,
    }
}

/// Fetch a text file (index or nuspec) from `source`.
pub async fn fetch_text(
    client: &Client,
    source: &PackageSource,
    relative: &str,
) -> miette::Result<Option<String>> {
    match fetch(client, source, relative).await? {
        Some(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        None => Ok(None),
    }
}

async fn read_local(path: &Path) -> miette::Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(NufetchError::Io(e).into()),
    }
}

/// Download raw bytes from a URL, with authentication and retries.
///
/// Timeouts, connection failures and 5xx responses are retried with a linear
/// back-off. Returns `Ok(None)` for 404.
pub async fn download_bytes(
    client: &Client,
    source: &PackageSource,
    url: &str,
) -> miette::Result<Option<Vec<u8>>> {
    let mut last_err = String::new();

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            tracing::debug!("retrying {url} (attempt {})", attempt + 1);
            tokio::time::sleep(RETRY_DELAY * attempt).await;
        }

        let req = auth::apply_auth(client.get(url), source);

        match req.send().await {
            Ok(resp) => {
                let status = resp.status();
                if status == reqwest::StatusCode::NOT_FOUND {
                    tracing::debug!("GET {url}: not found");
                    return Ok(None);
                }
                if status.is_server_error() {
                    last_err = format!("HTTP {status} from {url}");
                    continue;
                }
                if !status.is_success() {
                    return Err(NufetchError::Network {
                        message: format!("HTTP {status} fetching {url}"),
                    }
                    .into());
                }

                let bytes = resp.bytes().await.map_err(|e| NufetchError::Network {
                    message: format!("Failed to read response from {url}: {e}"),
                })?;
                tracing::debug!("GET {url}: {} bytes", bytes.len());
                return Ok(Some(bytes.to_vec()));
            }
            Err(e) if e.is_timeout() || e.is_connect() => {
                last_err = format!("{e}");
                continue;
            }
            Err(e) => {
                return Err(NufetchError::Network {
                    message: format!("Request to {url} failed: {e}"),
                }
                .into());
            }
        }
    }

    Err(NufetchError::Network {
        message: format!("Failed after {MAX_RETRIES} attempts for {url}: {last_err}"),
    }
    .into())
}
