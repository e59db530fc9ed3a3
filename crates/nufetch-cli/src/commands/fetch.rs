//! Handler for `nufetch fetch`.

use std::path::PathBuf;

use miette::Result;
use nufetch_core::config::GlobalConfig;
use nufetch_ops::ops_fetch::{self, FetchOptions};
use nufetch_ops::PackageRequest;
use nufetch_util::errors::NufetchError;

pub async fn exec(
    config: &GlobalConfig,
    request: PackageRequest,
    output: Option<PathBuf>,
    force: bool,
    jobs: Option<usize>,
) -> Result<()> {
    if jobs == Some(0) {
        return Err(NufetchError::Generic {
            message: "--jobs must be at least 1".to_string(),
        }
        .into());
    }

    let opts = FetchOptions {
        output,
        force,
        jobs,
    };
    ops_fetch::fetch(config, &request, &opts).await?;
    Ok(())
}
