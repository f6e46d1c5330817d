//! Smoke tests for the administration CLI

use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("bookshelf-cli").unwrap();
    cmd.env("BOOKSHELF_CONFIG_DIR", std::env::temp_dir().join("bookshelf-cli-no-config"))
        .env_remove("BOOKSHELF_ENV")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("routes"));
}

#[test]
fn test_config_redacts_password() {
    cli()
        .arg("config")
        .env("BOOKSHELF_DATABASE__PASSWORD", "hunter2")
        .env("BOOKSHELF_DATABASE__NAME", "catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"catalog\""))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_routes_lists_book_paths() {
    cli()
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains("/api/v1/books/{id}"))
        .stdout(predicate::str::contains("PATCH"));
}

#[test]
fn test_unknown_environment_fails() {
    cli()
        .args(["--env", "qa", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported environment"));
}

#[test]
fn test_env_flag_uses_config_dir_from_environment() {
    let dir = std::env::temp_dir().join("bookshelf-cli-staging-config");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("staging.toml"), "[database]\nname = \"staging_books\"\n").unwrap();

    cli()
        .env("BOOKSHELF_CONFIG_DIR", &dir)
        .args(["--env", "staging", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"environment\": \"staging\""))
        .stdout(predicate::str::contains("\"name\": \"staging_books\""));
}

#[test]
fn test_config_keeps_zero_padded_values() {
    cli()
        .arg("config")
        .env("BOOKSHELF_DATABASE__NAME", "0123")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"0123\""));
}
