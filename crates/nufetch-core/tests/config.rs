use nufetch_core::config::{GlobalConfig, SourceEntry};
use nufetch_core::DEFAULT_SOURCE_URL;

#[test]
fn test_global_config_defaults() {
    let config = GlobalConfig::default();
    assert!(config.sources.is_empty());
    assert_eq!(config.fetch.output, "packages");
    assert_eq!(config.fetch.jobs, 8);
    assert!(!config.fetch.overwrite);
    assert!(config.resolve.target_framework.is_none());
}

#[test]
fn test_global_config_empty_toml_uses_defaults() {
    let config = GlobalConfig::parse("").unwrap();
    assert_eq!(config.fetch.jobs, 8);
    assert_eq!(config.fetch.output, "packages");
}

#[test]
fn test_effective_sources_falls_back_to_nuget_org() {
    let config = GlobalConfig::default();
    let sources = config.effective_sources();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].1.url(), DEFAULT_SOURCE_URL);
}

#[test]
fn test_global_config_parse_from_toml() {
    let toml = r#"
[sources]
nuget = "https://api.nuget.org/v3-flatcontainer"
private = { url = "https://pkgs.example/v3-flat", username = "u", password = "p" }

[fetch]
output = "/tmp/pkgs"
jobs = 2
overwrite = true

[resolve]
target-framework = "netstandard2.0"
"#;
    let config = GlobalConfig::parse(toml).unwrap();
    assert_eq!(config.fetch.output, "/tmp/pkgs");
    assert_eq!(config.fetch.jobs, 2);
    assert!(config.fetch.overwrite);
    assert_eq!(
        config.resolve.target_framework.as_deref(),
        Some("netstandard2.0")
    );

    let sources = config.effective_sources();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].0, "nuget");
    assert_eq!(
        sources[1].1,
        SourceEntry::Detailed {
            url: "https://pkgs.example/v3-flat".to_string(),
            username: Some("u".to_string()),
            password: Some("p".to_string()),
        }
    );
    assert_eq!(sources[1].1.url(), "https://pkgs.example/v3-flat");
}

#[test]
fn test_load_from_reports_parse_errors() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "[fetch]\njobs = \"many\"\n").unwrap();
    let err = GlobalConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Configuration error"), "got: {err}");
}

#[test]
fn test_load_from_missing_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(GlobalConfig::load_from(&tmp.path().join("absent.toml")).is_err());
}

#[test]
fn test_load_from_reads_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "[fetch]\njobs = 3\n").unwrap();
    let config = GlobalConfig::load_from(&path).unwrap();
    assert_eq!(config.fetch.jobs, 3);
}
