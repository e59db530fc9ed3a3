use nufetch_core::dependency::RootSpec;

#[test]
fn root_spec_parse_id_only() {
    let spec = RootSpec::parse("Newtonsoft.Json").unwrap();
    assert_eq!(spec.id, "Newtonsoft.Json");
    assert!(spec.version.is_none());
    assert!(!spec.is_pinned());
}

#[test]
fn root_spec_parse_pinned() {
    let spec = RootSpec::parse("Serilog:2.12.0").unwrap();
    assert_eq!(spec.id, "Serilog");
    assert_eq!(spec.version.as_deref(), Some("2.12.0"));
    assert!(spec.is_pinned());
}

#[test]
fn root_spec_parse_trims_whitespace() {
    let spec = RootSpec::parse("  Serilog : 2.12.0 ").unwrap();
    assert_eq!(spec.id, "Serilog");
    assert_eq!(spec.version.as_deref(), Some("2.12.0"));
}

#[test]
fn root_spec_parse_empty_version_is_unpinned() {
    let spec = RootSpec::parse("Serilog:").unwrap();
    assert!(spec.version.is_none());
}

#[test]
fn root_spec_parse_keeps_unvalidated_version() {
    // Validation against the registry happens during resolution.
    let spec = RootSpec::parse("Serilog:not-a-version").unwrap();
    assert_eq!(spec.version.as_deref(), Some("not-a-version"));
}

#[test]
fn root_spec_parse_empty_id_fails() {
    assert!(RootSpec::parse("").is_err());
    assert!(RootSpec::parse(":1.0.0").is_err());
}

#[test]
fn root_spec_parse_extra_separator_fails() {
    assert!(RootSpec::parse("a:1.0:2.0").is_err());
}

#[test]
fn root_spec_from_str() {
    let spec: RootSpec = "A:1.0.0".parse().unwrap();
    assert_eq!(spec, RootSpec::new("A", Some("1.0.0")));
}

#[test]
fn root_spec_display_roundtrip() {
    for s in ["A", "A:1.0.0-beta"] {
        assert_eq!(RootSpec::parse(s).unwrap().to_string(), s);
    }
}
