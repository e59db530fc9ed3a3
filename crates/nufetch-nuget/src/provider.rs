//! [`MetadataProvider`] backed by one or more NuGet flat container sources.

use async_trait::async_trait;
use miette::WrapErr;
use nufetch_resolver::{DependencyDecl, MetadataProvider, NuGetVersion, PackageIdentity};
use nufetch_util::errors::NufetchError;
use reqwest::Client;

use crate::download::{self, build_client};
use crate::index::parse_index;
use crate::nuspec::parse_nuspec;
use crate::repository::PackageSource;

/// Reads package metadata and artifacts from configured sources, in order.
///
/// For every lookup the first source with a non-empty answer wins.
pub struct NuGetProvider {
    client: Client,
    sources: Vec<PackageSource>,
    target_framework: Option<String>,
}

impl NuGetProvider {
    pub fn new(sources: Vec<PackageSource>, target_framework: Option<String>) -> miette::Result<Self> {
        Ok(Self {
            client: build_client()?,
            sources,
            target_framework,
        })
    }

    pub fn target_framework(&self) -> Option<&str> {
        self.target_framework.as_deref()
    }

    /// Download the `.nupkg` for a resolved package from the first source that has it.
    pub async fn download_package(&self, package: &PackageIdentity) -> miette::Result<Option<Vec<u8>>> {
        let relative = PackageSource::package_path(&package.id, &package.version);
        for source in &self.sources {
            let bytes = download::fetch(&self.client, source, &relative)
                .await
                .wrap_err_with(|| format!("downloading {package} from {source}"))?;
            if let Some(bytes) = bytes {
                tracing::debug!("{package}: {} bytes from {}", bytes.len(), source.name);
                return Ok(Some(bytes));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl MetadataProvider for NuGetProvider {
    async fn list_versions(&self, id: &str) -> miette::Result<Vec<NuGetVersion>> {
        let relative = PackageSource::index_path(id);
        for source in &self.sources {
            let text = download::fetch_text(&self.client, source, &relative)
                .await
                .wrap_err_with(|| format!("listing versions of {id} from {source}"))?;
            let Some(text) = text else {
                continue;
            };
            let versions = parse_index(id, &text)?;
            if !versions.is_empty() {
                tracing::debug!("{id}: {} versions from {}", versions.len(), source.name);
                return Ok(versions);
            }
        }
        Ok(Vec::new())
    }

    async fn list_dependencies(
        &self,
        id: &str,
        version: &NuGetVersion,
    ) -> miette::Result<Vec<DependencyDecl>> {
        let relative = PackageSource::nuspec_path(id, version);
        for source in &self.sources {
            let text = download::fetch_text(&self.client, source, &relative)
                .await
                .wrap_err_with(|| format!("reading nuspec of {id} {version} from {source}"))?;
            if let Some(text) = text {
                let spec = parse_nuspec(&text)
                    .wrap_err_with(|| format!("in nuspec of {id} {version} from {source}"))?;
                return spec.dependencies_for(self.target_framework.as_deref());
            }
        }
        Err(NufetchError::Metadata {
            message: format!("no nuspec for {id} {version} in any source"),
        }
        .into())
    }
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

    fn local(name: &str, root: &Path) -> PackageSource {
        PackageSource::from_url(name, root.to_str().unwrap())
    }

    fn v(s: &str) -> NuGetVersion {
        NuGetVersion::parse(s).unwrap()
    }

    #[tokio::test]
    async fn first_source_with_versions_wins() {
        let empty = tempfile::tempdir().unwrap();
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write(empty.path(), "lib/index.json", r#"{"versions":[]}"#);
        write(first.path(), "lib/index.json", r#"{"versions":["1.0.0"]}"#);
        write(second.path(), "lib/index.json", r#"{"versions":["2.0.0"]}"#);

        let provider = NuGetProvider::new(
            vec![
                local("empty", empty.path()),
                local("first", first.path()),
                local("second", second.path()),
            ],
            None,
        )
        .unwrap();
        assert_eq!(provider.list_versions("Lib").await.unwrap(), vec![v("1.0.0")]);
        assert!(provider.list_versions("Other").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dependencies_use_target_framework() {
        let feed = tempfile::tempdir().unwrap();
        write(
            feed.path(),
            "app/1.0.0/app.nuspec",
            r#"<package><metadata><id>App</id><version>1.0.0</version><dependencies>
                <group targetFramework="net6.0"><dependency id="A" version="1.0" /></group>
                <group targetFramework="net8.0"><dependency id="B" version="1.0" /></group>
            </dependencies></metadata></package>"#,
        );

        let provider =
            NuGetProvider::new(vec![local("feed", feed.path())], Some("net8.0".to_string()))
                .unwrap();
        let deps = provider.list_dependencies("App", &v("1.0")).await.unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].id, "B");

        let err = provider
            .list_dependencies("App", &v("2.0"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no nuspec"));
    }

    #[tokio::test]
    async fn download_package_reads_nupkg() {
        let feed = tempfile::tempdir().unwrap();
        write(feed.path(), "lib/1.2.0/lib.1.2.0.nupkg", "PK");

        let provider = NuGetProvider::new(vec![local("feed", feed.path())], None).unwrap();
        let bytes = provider
            .download_package(&PackageIdentity::new("Lib", v("1.2")))
            .await
            .unwrap();
        assert_eq!(bytes.as_deref(), Some(&b"PK"[..]));

        let missing = provider
            .download_package(&PackageIdentity::new("Lib", v("9.0")))
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
