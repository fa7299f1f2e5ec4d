use assert_cmd::Command;
use predicates::prelude::*;

fn gavel() -> Command {
    let mut cmd = Command::cargo_bin("gavel").expect("gavel binary builds");
    // Keep the test hermetic: credentials come only from explicit args.
    cmd.env_remove("GAVEL_PORTAL_USERNAME");
    cmd.env_remove("GAVEL_PORTAL_PASSWORD");
    cmd
}

#[test]
fn test_help_lists_commands() {
    gavel()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scrape"))
        .stdout(predicate::str::contains("completion"));
}

#[test]
fn test_scrape_without_credentials_names_env_vars() {
    gavel()
        .args([
            "scrape",
            "--portal-url",
            "https://cjs.example.gov/CJS/Account/Login",
            "--division",
            "Division I - Judge Paula Skahan=Division 1",
            "--from",
            "01/10/2022",
            "--to",
            "01/14/2022",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GAVEL_PORTAL_USERNAME"))
        .stderr(predicate::str::contains("GAVEL_PORTAL_PASSWORD"));
}

#[test]
fn test_scrape_without_portal_url_fails_before_browser_work() {
    gavel()
        .args([
            "scrape",
            "--username",
            "clerk",
            "--password",
            "hunter2",
            "--division",
            "Division I - Judge Paula Skahan=Division 1",
            "--from",
            "01/10/2022",
            "--to",
            "01/14/2022",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--portal-url"));
}

#[test]
fn test_scrape_rejects_malformed_date() {
    gavel()
        .args([
            "scrape",
            "--username",
            "clerk",
            "--password",
            "hunter2",
            "--portal-url",
            "https://cjs.example.gov/CJS/Account/Login",
            "--division",
            "Division I - Judge Paula Skahan=Division 1",
            "--from",
            "2022-01-10",
            "--to",
            "01/14/2022",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("MM/DD/YYYY"));
}

#[test]
fn test_scrape_requires_a_division() {
    gavel()
        .args([
            "scrape",
            "--username",
            "clerk",
            "--password",
            "hunter2",
            "--portal-url",
            "https://cjs.example.gov/CJS/Account/Login",
            "--from",
            "01/10/2022",
            "--to",
            "01/14/2022",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No divisions"));
}

#[test]
fn test_scrape_rejects_malformed_division_arg() {
    gavel()
        .args([
            "scrape",
            "--username",
            "clerk",
            "--password",
            "hunter2",
            "--portal-url",
            "https://cjs.example.gov/CJS/Account/Login",
            "--division",
            "Division I - Judge Paula Skahan",
            "--from",
            "01/10/2022",
            "--to",
            "01/14/2022",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("JUDGE LABEL=Courtroom N"));
}

#[test]
fn test_scrape_reports_unreadable_config_file() {
    gavel()
        .args([
            "scrape",
            "--username",
            "clerk",
            "--password",
            "hunter2",
            "--config",
            "does-not-exist.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.json"));
}
