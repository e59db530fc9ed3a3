//! Nuspec parsing: package identity and dependency declarations, flat or
//! grouped by target framework.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use nufetch_resolver::{DependencyDecl, VersionRange};
use nufetch_util::errors::NufetchError;

/// A parsed `.nuspec` manifest, reduced to what resolution needs.
#[derive(Debug, Clone, Default)]
pub struct Nuspec {
    pub id: Option<String>,
    pub version: Option<String>,
    pub dependencies: Vec<NuspecDependency>,
}

/// A `<dependency>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NuspecDependency {
    pub id: String,
    /// Raw range attribute; absent means any version.
    pub range: Option<String>,
    /// `targetFramework` of the enclosing `<group>`. `None` for ungrouped
    /// dependencies and groups without the attribute, which apply everywhere.
    pub target_framework: Option<String>,
}

const DEPENDENCY: &str = "package>metadata>dependencies>dependency";
const GROUP: &str = "package>metadata>dependencies>group";
const GROUP_DEPENDENCY: &str = "package>metadata>dependencies>group>dependency";

impl Nuspec {
    /// Declared dependencies that apply to `framework`, or every declaration
    /// when no framework is given.
    pub fn dependencies_for(&self, framework: Option<&str>) -> miette::Result<Vec<DependencyDecl>> {
        self.dependencies
            .iter()
            .filter(|d| match (framework, d.target_framework.as_deref()) {
                (Some(wanted), Some(group)) => frameworks_match(wanted, group),
                _ => true,
            })
            .map(|d| {
                let range = VersionRange::parse(d.range.as_deref().unwrap_or("")).map_err(|e| {
                    NufetchError::Metadata {
                        message: format!(
                            "{} declares dependency `{}` with {e}",
                            self.id.as_deref().unwrap_or("package"),
                            d.id
                        ),
                    }
                })?;
                Ok(DependencyDecl::new(d.id.clone(), range))
            })
            .collect()
    }
}

/// Compare target framework monikers loosely: `.NETStandard2.0` matches
/// `netstandard2.0` and `.NETFramework4.5` matches `net45`.
pub fn frameworks_match(a: &str, b: &str) -> bool {
    normalize_framework(a) == normalize_framework(b)
}

fn normalize_framework(tfm: &str) -> String {
    let lower: String = tfm
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| *c != '.')
        .collect();
    match lower.strip_prefix("netframework") {
        Some(rest) => format!("net{rest}"),
        None => lower,
    }
}

/// Parse a nuspec XML string.
pub fn parse_nuspec(xml: &str) -> miette::Result<Nuspec> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut spec = Nuspec::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();
    let mut group_framework: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                path.push(element_name(e));
                text_buf.clear();
                open_element(&mut spec, &path.join(">"), e, &mut group_framework)?;
            }
            Ok(Event::Empty(ref e)) => {
                path.push(element_name(e));
                let ctx = path.join(">");
                open_element(&mut spec, &ctx, e, &mut group_framework)?;
                if ctx == GROUP {
                    group_framework = None;
                }
                path.pop();
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                match path.join(">").as_str() {
                    "package>metadata>id" => spec.id = Some(text_buf.clone()),
                    "package>metadata>version" => spec.version = Some(text_buf.clone()),
                    GROUP => group_framework = None,
                    _ => {}
                }
                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(NufetchError::Metadata {
                    message: format!("Failed to parse nuspec: {e}"),
                }
                .into());
            }
            _ => {}
        }
    }

    Ok(spec)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_string()
}

fn open_element(
    spec: &mut Nuspec,
    ctx: &str,
    e: &BytesStart<'_>,
    group_framework: &mut Option<String>,
) -> miette::Result<()> {
    match ctx {
        GROUP => *group_framework = attribute(e, "targetFramework")?,
        DEPENDENCY | GROUP_DEPENDENCY => {
            let Some(id) = attribute(e, "id")? else {
                return Err(NufetchError::Metadata {
                    message: "nuspec <dependency> is missing its `id` attribute".to_string(),
                }
                .into());
            };
            spec.dependencies.push(NuspecDependency {
                id,
                range: attribute(e, "version")?,
                target_framework: if ctx == GROUP_DEPENDENCY {
                    group_framework.clone()
                } else {
                    None
                },
            });
        }
        _ => {}
    }
    Ok(())
}

fn attribute(e: &BytesStart<'_>, name: &str) -> miette::Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| NufetchError::Metadata {
            message: format!("Malformed nuspec attribute: {err}"),
        })?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let value = attr.unescape_value().map_err(|err| NufetchError::Metadata {
                message: format!("Malformed nuspec attribute `{name}`: {err}"),
            })?;
            let value = value.trim();
            return Ok((!value.is_empty()).then(|| value.to_string()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUPED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata>
    <id>Serilog.Sinks.File</id>
    <version>5.0.0</version>
    <dependencies>
      <group targetFramework=".NETFramework4.5">
        <dependency id="Serilog" version="2.10.0" exclude="Build,Analyzers" />
      </group>
      <group targetFramework=".NETStandard2.0">
        <dependency id="Serilog" version="2.10.0" />
        <dependency id="System.Text.Encoding" version="[4.3.0, 5.0.0)" />
      </group>
      <group targetFramework="net5.0" />
    </dependencies>
  </metadata>
</package>"#;

    #[test]
    fn parse_identity() {
        let spec = parse_nuspec(GROUPED).unwrap();
        assert_eq!(spec.id.as_deref(), Some("Serilog.Sinks.File"));
        assert_eq!(spec.version.as_deref(), Some("5.0.0"));
    }

    #[test]
    fn grouped_dependencies_remember_their_framework() {
        let spec = parse_nuspec(GROUPED).unwrap();
        assert_eq!(spec.dependencies.len(), 3);
        assert_eq!(
            spec.dependencies[0].target_framework.as_deref(),
            Some(".NETFramework4.5")
        );
        assert_eq!(spec.dependencies[2].id, "System.Text.Encoding");
        assert_eq!(spec.dependencies[2].range.as_deref(), Some("[4.3.0, 5.0.0)"));
    }

    #[test]
    fn framework_filter_selects_one_group() {
        let spec = parse_nuspec(GROUPED).unwrap();
        let deps = spec.dependencies_for(Some("netstandard2.0")).unwrap();
        let ids: Vec<&str> = deps.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["Serilog", "System.Text.Encoding"]);

        assert_eq!(spec.dependencies_for(Some("net45")).unwrap().len(), 1);
        assert!(spec.dependencies_for(Some("net5.0")).unwrap().is_empty());
    }

    #[test]
    fn no_filter_returns_every_declaration() {
        let spec = parse_nuspec(GROUPED).unwrap();
        assert_eq!(spec.dependencies_for(None).unwrap().len(), 3);
    }

    #[test]
    fn flat_dependencies_apply_to_every_framework() {
        let xml = r#"<package><metadata><id>Old</id><version>1.0</version>
            <dependencies>
              <dependency id="Json" version="6.0.4" />
              <dependency id="Any" />
            </dependencies></metadata></package>"#;
        let spec = parse_nuspec(xml).unwrap();
        let deps = spec.dependencies_for(Some("net8.0")).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[1].range, VersionRange::any());
    }

    #[test]
    fn dependency_without_id_is_rejected() {
        let xml = r#"<package><metadata><dependencies><dependency version="1.0" /></dependencies></metadata></package>"#;
        assert!(parse_nuspec(xml).is_err());
    }

    #[test]
    fn bad_range_is_reported_with_package() {
        let xml = r#"<package><metadata><id>Pkg</id><dependencies><dependency id="X" version="[2.0, 1.0]" /></dependencies></metadata></package>"#;
        let spec = parse_nuspec(xml).unwrap();
        let err = spec.dependencies_for(None).unwrap_err();
        assert!(err.to_string().contains("Pkg"));
    }

    #[test]
    fn framework_monikers_compare_loosely() {
        assert!(frameworks_match(".NETStandard2.0", "netstandard2.0"));
        assert!(frameworks_match(".NETFramework4.7.2", "net472"));
        assert!(frameworks_match("NET6.0", "net6.0"));
        assert!(!frameworks_match("net6.0", "net7.0"));
    }
}
