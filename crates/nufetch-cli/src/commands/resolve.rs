//! Handler for `nufetch resolve`.

use miette::Result;
use nufetch_core::config::GlobalConfig;
use nufetch_ops::ops_resolve::{self, ResolveOptions};
use nufetch_ops::PackageRequest;

pub async fn exec(
    config: &GlobalConfig,
    request: PackageRequest,
    tree: bool,
    depth: Option<usize>,
    why: Option<String>,
) -> Result<()> {
    let opts = ResolveOptions { tree, depth, why };
    ops_resolve::resolve(config, &request, &opts).await
}
