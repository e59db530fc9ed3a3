use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

/// A `nufetch` command isolated from the user's config.
pub fn nufetch_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nufetch").unwrap();
    cmd.env("NUFETCH_HOME", home).env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn add_package(root: &Path, id: &str, version: &str, dependencies: &[(&str, &str)]) {
    let lower = id.to_ascii_lowercase();
    let deps: String = dependencies
        .iter()
        .map(|(dep, range)| format!(r#"<dependency id="{dep}" version="{range}" />"#))
        .collect();
    write(
        root,
        &format!("{lower}/{version}/{lower}.nuspec"),
        &format!(
            "<package><metadata><id>{id}</id><version>{version}</version>\
             <dependencies>{deps}</dependencies></metadata></package>"
        ),
    );
    write(
        root,
        &format!("{lower}/{version}/{lower}.{version}.nupkg"),
        &format!("{id} {version}"),
    );
}

/// Local flat container feed:
/// A {1.0.0, 1.1.0}, A 1.1.0 -> B [1.0.0, 2.0.0); B {1.0.0, 1.5.0};
/// Pinned 1.0.0 -> A [2.0.0, ).
pub fn feed() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "a/index.json", r#"{"versions":["1.0.0","1.1.0"]}"#);
    add_package(root, "A", "1.0.0", &[]);
    add_package(root, "A", "1.1.0", &[("B", "[1.0.0, 2.0.0)")]);
    write(root, "b/index.json", r#"{"versions":["1.0.0","1.5.0"]}"#);
    add_package(root, "B", "1.0.0", &[]);
    add_package(root, "B", "1.5.0", &[]);
    write(root, "pinned/index.json", r#"{"versions":["1.0.0"]}"#);
    add_package(root, "Pinned", "1.0.0", &[("A", "[2.0.0, )")]);
    dir
}
