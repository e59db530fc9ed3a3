//! Operation: resolve and download every package as a `.nupkg`.

use std::path::PathBuf;
use std::sync::Arc;

use nufetch_core::config::GlobalConfig;
use nufetch_nuget::provider::NuGetProvider;
use nufetch_nuget::store::PackageStore;
use nufetch_resolver::PackageIdentity;
use nufetch_util::errors::NufetchError;
use nufetch_util::progress::{progress_bar, status};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::{build_provider, resolve_request, PackageRequest};

/// Options for `nufetch fetch`.
#[derive(Debug, Default)]
pub struct FetchOptions {
    /// Output directory; the configured one when unset.
    pub output: Option<PathBuf>,
    /// Re-download packages whose artifact already exists.
    pub force: bool,
    /// Concurrent downloads; the configured number when unset.
    pub jobs: Option<usize>,
}

/// Counts reported after a fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub fetched: usize,
    pub up_to_date: usize,
}

/// Resolve `request`, then write one artifact per resolved package.
pub async fn fetch(
    config: &GlobalConfig,
    request: &PackageRequest,
    opts: &FetchOptions,
) -> miette::Result<FetchSummary> {
    let provider = Arc::new(build_provider(config, request)?);
    let resolution = resolve_request(&provider, request).await?;

    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| nufetch_util::fs::expand_home(&config.fetch.output));
    let store = PackageStore::new(output);
    let overwrite = opts.force || config.fetch.overwrite;
    let jobs = opts.jobs.unwrap_or(config.fetch.jobs).max(1);

    let (present, pending): (Vec<PackageIdentity>, Vec<PackageIdentity>) = resolution
        .into_resolved()
        .into_iter()
        .partition(|package| !overwrite && store.contains(package));

    for package in &present {
        tracing::debug!("{package}: {} exists, skipping", store.path_for(package).display());
    }

    let fetched = download_all(&provider, &store, pending, jobs).await?;
    let summary = FetchSummary {
        fetched,
        up_to_date: present.len(),
    };

    status(
        "Fetched",
        &format!(
            "{} packages into {}, {} downloaded, {} up-to-date",
            summary.fetched + summary.up_to_date,
            store.root().display(),
            summary.fetched,
            summary.up_to_date
        ),
    );
    Ok(summary)
}

/// Download `packages` with at most `jobs` in flight. The first failure
/// aborts the remaining downloads.
async fn download_all(
    provider: &Arc<NuGetProvider>,
    store: &PackageStore,
    packages: Vec<PackageIdentity>,
    jobs: usize,
) -> miette::Result<usize> {
    let pb = progress_bar(packages.len() as u64, "Downloading");
    let semaphore = Arc::new(Semaphore::new(jobs));
    let mut set = JoinSet::new();

    for package in packages {
        let provider = Arc::clone(provider);
        let store = store.clone();
        let semaphore = Arc::clone(&semaphore);
        set.spawn(async move {
            let _permit = semaphore.acquire_owned().await.map_err(|e| NufetchError::Generic {
                message: format!("download queue closed: {e}"),
            })?;
            let Some(bytes) = provider.download_package(&package).await? else {
                return Err(NufetchError::Network {
                    message: format!("{package} was not found in any source"),
                }
                .into());
            };
            let path = store.put(&package, &bytes)?;
            tracing::debug!("{package}: wrote {}", path.display());
            Ok::<_, miette::Report>(package)
        });
    }

    let mut fetched = 0;
    while let Some(joined) = set.join_next().await {
        let package = joined.map_err(|e| NufetchError::Generic {
            message: format!("download task failed: {e}"),
        })??;
        pb.set_message(format!("Downloaded {package}"));
        pb.inc(1);
        fetched += 1;
    }
    pb.finish_and_clear();
    Ok(fetched)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    /// App 1.0.0 -> Lib [1.0.0, )
    fn feed() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "app/index.json", r#"{"versions":["1.0.0"]}"#);
        write(
            root,
            "app/1.0.0/app.nuspec",
            r#"<package><metadata><id>App</id><version>1.0.0</version>
               <dependencies><dependency id="Lib" version="1.0.0" /></dependencies>
               </metadata></package>"#,
        );
        write(root, "app/1.0.0/app.1.0.0.nupkg", "app");
        write(root, "lib/index.json", r#"{"versions":["1.0.0","1.1.0"]}"#);
        write(
            root,
            "lib/1.0.0/lib.nuspec",
            "<package><metadata><id>Lib</id><version>1.0.0</version></metadata></package>",
        );
        write(root, "lib/1.0.0/lib.1.0.0.nupkg", "lib");
        dir
    }

    fn request(feed: &Path) -> PackageRequest {
        PackageRequest {
            roots: vec!["App".to_string()],
            sources: vec![feed.to_str().unwrap().to_string()],
            framework: None,
        }
    }

    #[tokio::test]
    async fn fetch_then_skip_then_force() {
        let feed = feed();
        let out = tempfile::tempdir().unwrap();
        let config = GlobalConfig::default();
        let opts = FetchOptions {
            output: Some(out.path().to_path_buf()),
            jobs: Some(2),
            ..Default::default()
        };

        let first = fetch(&config, &request(feed.path()), &opts).await.unwrap();
        assert_eq!(first, FetchSummary { fetched: 2, up_to_date: 0 });
        assert_eq!(
            std::fs::read_to_string(out.path().join("lib.1.0.0.nupkg")).unwrap(),
            "lib"
        );

        let second = fetch(&config, &request(feed.path()), &opts).await.unwrap();
        assert_eq!(second, FetchSummary { fetched: 0, up_to_date: 2 });

        let forced = FetchOptions { force: true, ..opts };
        let third = fetch(&config, &request(feed.path()), &forced).await.unwrap();
        assert_eq!(third.fetched, 2);
    }

    #[tokio::test]
    async fn missing_artifact_fails() {
        let feed = feed();
        std::fs::remove_file(feed.path().join("lib/1.0.0/lib.1.0.0.nupkg")).unwrap();
        let out = tempfile::tempdir().unwrap();
        let opts = FetchOptions {
            output: Some(out.path().to_path_buf()),
            ..Default::default()
        };

        let err = fetch(&GlobalConfig::default(), &request(feed.path()), &opts)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Lib 1.0.0"));
    }
}
