use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn stokwell(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stokwell").unwrap();
    cmd.env("STOKWELL_DATA_DIR", dir.path())
        .env_remove("STOKWELL_PASSWORD")
        .env_remove("STOKWELL_PASSPHRASE");
    cmd
}

fn register(dir: &TempDir, username: &str, password: &str) {
    stokwell(dir)
        .args(["user", "register", username, "--password", password])
        .assert()
        .success();
}

#[test]
fn test_register_and_login() {
    let dir = TempDir::new().unwrap();

    stokwell(&dir)
        .args(["user", "register", "alice", "--password", "pw1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("User alice registered successfully!"));

    stokwell(&dir)
        .args(["user", "login", "-u", "alice", "--password", "pw1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome back, alice!"));
}

#[test]
fn test_password_from_environment() {
    let dir = TempDir::new().unwrap();
    register(&dir, "alice", "pw1");

    stokwell(&dir)
        .env("STOKWELL_PASSWORD", "pw1")
        .args(["user", "login", "-u", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome back, alice!"));
}

#[test]
fn test_duplicate_register_fails() {
    let dir = TempDir::new().unwrap();
    register(&dir, "alice", "pw1");

    stokwell(&dir)
        .args(["user", "register", "alice", "--password", "other"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Username already exists"));
}

#[test]
fn test_wrong_password_fails() {
    let dir = TempDir::new().unwrap();
    register(&dir, "alice", "pw1");

    stokwell(&dir)
        .args(["user", "login", "-u", "alice", "--password", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials."));
}

#[test]
fn test_stokvel_lifecycle() {
    let dir = TempDir::new().unwrap();
    register(&dir, "alice", "pw1");

    stokwell(&dir)
        .args(["stokvel", "create", "SavingsCircle", "-u", "alice", "--password", "pw1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Stokvel 'SavingsCircle' created and you have joined it!",
        ));

    stokwell(&dir)
        .args([
            "stokvel",
            "contribute",
            "SavingsCircle",
            "100",
            "-u",
            "alice",
            "--password",
            "pw1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "You contributed R100.00 to SavingsCircle.",
        ));

    stokwell(&dir)
        .args(["stokvel", "show", "SavingsCircle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stokvel: SavingsCircle"))
        .stdout(predicate::str::contains("R100.00"));

    stokwell(&dir)
        .args(["stokvel", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SavingsCircle"))
        .stdout(predicate::str::contains("TOTAL"));
}

#[test]
fn test_non_member_cannot_contribute() {
    let dir = TempDir::new().unwrap();
    register(&dir, "alice", "pw1");
    register(&dir, "bob", "pw2");

    stokwell(&dir)
        .args(["stokvel", "create", "SavingsCircle", "-u", "alice", "--password", "pw1"])
        .assert()
        .success();

    stokwell(&dir)
        .args([
            "stokvel",
            "contribute",
            "SavingsCircle",
            "50",
            "-u",
            "bob",
            "--password",
            "pw2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bob is not a member of SavingsCircle"));
}

#[test]
fn test_export_contributions_to_stdout() {
    let dir = TempDir::new().unwrap();
    register(&dir, "alice", "pw1");

    stokwell(&dir)
        .args(["stokvel", "create", "SavingsCircle", "-u", "alice", "--password", "pw1"])
        .assert()
        .success();
    stokwell(&dir)
        .args([
            "stokvel",
            "contribute",
            "SavingsCircle",
            "25.50",
            "-u",
            "alice",
            "--password",
            "pw1",
        ])
        .assert()
        .success();

    stokwell(&dir)
        .args(["export", "contributions"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Stokvel,Member,Amount,Date"))
        .stdout(predicate::str::contains("SavingsCircle,alice,25.50"));
}

#[test]
fn test_full_export_omits_password_digests() {
    let dir = TempDir::new().unwrap();
    register(&dir, "alice", "pw1");

    stokwell(&dir)
        .args(["export", "full", "--pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"username\": \"alice\""))
        .stdout(predicate::str::contains("password_hash").not());
}

#[test]
fn test_backup_create_and_list() {
    let dir = TempDir::new().unwrap();
    register(&dir, "alice", "pw1");

    stokwell(&dir)
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup created:"));

    stokwell(&dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1 backup(s)"));
}

#[test]
fn test_encryption_status_defaults_to_disabled() {
    let dir = TempDir::new().unwrap();

    stokwell(&dir)
        .args(["encrypt", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Encryption: DISABLED"));
}

#[test]
fn test_bad_date_format_in_settings_is_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"date_format": "%Q"}"#).unwrap();

    stokwell(&dir)
        .args(["user", "register", "alice", "--password", "pw1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid date format: %Q"));
}

#[test]
fn test_overly_precise_amount_is_rejected() {
    let dir = TempDir::new().unwrap();
    register(&dir, "alice", "pw1");
    stokwell(&dir)
        .args(["stokvel", "create", "SavingsCircle", "-u", "alice", "--password", "pw1"])
        .assert()
        .success();

    stokwell(&dir)
        .args([
            "stokvel",
            "contribute",
            "SavingsCircle",
            "1.999",
            "-u",
            "alice",
            "--password",
            "pw1",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid amount format"));
}

#[test]
fn test_config_shows_paths() {
    let dir = TempDir::new().unwrap();

    stokwell(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("StokWELL Configuration"))
        .stdout(predicate::str::contains("ledger.json"));
}
