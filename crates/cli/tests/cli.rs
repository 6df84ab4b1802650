use std::path::PathBuf;

use assert_cmd::Command;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("bookrent-cli").unwrap();
    cmd.env("BOOKRENT_CONFIG_DIR", fixture("no-config"))
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn catalog_lists_books_with_availability() {
    let output = cli()
        .args(["catalog", "--path"])
        .arg(fixture("books.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "123\t2/2\tDune\n456\t1/3\tEmma\n2 books\n"
    );
}

#[test]
fn malformed_catalog_fails() {
    let output = cli()
        .args(["catalog", "--path"])
        .arg(fixture("broken.json"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("is not usable"));
}

#[test]
fn missing_catalog_fails() {
    cli()
        .args(["catalog", "--path", "no/such/books.json"])
        .assert()
        .failure();
}

#[test]
fn config_prints_resolved_settings() {
    let output = cli()
        .arg("config")
        .env("BOOKRENT_SERVER__PORT", "9191")
        .output()
        .unwrap();

    assert!(output.status.success());
    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["server"]["port"], 9191);
    assert_eq!(settings["catalog"]["path"], "books.json");
    assert_eq!(settings["environment"], "local");
}
