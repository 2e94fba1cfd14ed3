use assert_cmd::Command;
use predicates::str::contains;

fn updraft() -> Command {
    Command::cargo_bin("updraft").unwrap()
}

#[test]
fn help_lists_subcommands() {
    updraft()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("push"))
        .stdout(contains("send"))
        .stdout(contains("fetch"));
}

#[test]
fn version_prints() {
    updraft().arg("--version").assert().success();
}

#[test]
fn push_requires_endpoint_urls() {
    updraft()
        .arg("push")
        .arg("report.bin")
        .env_remove("UPDRAFT_URL")
        .env_remove("UPDRAFT_AUTH_URL")
        .assert()
        .failure()
        .stderr(contains("--url"));
}

#[test]
fn login_without_password_is_rejected() {
    updraft()
        .args([
            "fetch",
            "--url",
            "http://portal.example/data",
            "--auth-url",
            "http://portal.example/token",
            "--login",
            "alice",
        ])
        .env_remove("UPDRAFT_PASSWORD")
        .assert()
        .failure()
        .stderr(contains("--password or --password-file is required"));
}

#[test]
fn send_requires_exactly_one_document_source() {
    updraft()
        .args([
            "send",
            "--url",
            "http://portal.example/data",
            "--auth-url",
            "http://portal.example/token",
        ])
        .env_remove("UPDRAFT_LOGIN")
        .assert()
        .failure()
        .stderr(contains("exactly one of --json or --json-file"));

    updraft()
        .args([
            "send",
            "--json",
            "{}",
            "--json-file",
            "doc.json",
            "--url",
            "http://portal.example/data",
            "--auth-url",
            "http://portal.example/token",
        ])
        .env_remove("UPDRAFT_LOGIN")
        .assert()
        .failure()
        .stderr(contains("exactly one of --json or --json-file"));
}

#[test]
fn send_rejects_invalid_json() {
    updraft()
        .args([
            "send",
            "--json",
            "{not json",
            "--url",
            "http://portal.example/data",
            "--auth-url",
            "http://portal.example/token",
        ])
        .env_remove("UPDRAFT_LOGIN")
        .assert()
        .failure()
        .stderr(contains("invalid JSON document"));
}

#[test]
fn invalid_target_url_is_rejected_before_any_io() {
    updraft()
        .args([
            "fetch",
            "--url",
            "not a url",
            "--auth-url",
            "http://portal.example/token",
        ])
        .env_remove("UPDRAFT_LOGIN")
        .assert()
        .failure()
        .stderr(contains("invalid target URL"));
}
