use assert_cmd::Command;
use predicates::str::{contains, starts_with};
use tempfile::TempDir;

fn carelog(data_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("carelog"));
    cmd.env("CARELOG_DIR", data_dir.path())
        .env_remove("RUST_LOG")
        .args(["--config"])
        .arg(data_dir.path().join("config.toml"));
    cmd
}

fn data_dir_with_config(backend: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        format!("[history]\nmax_length = 8000\n\n[storage]\nbackend = \"{backend}\"\n"),
    )
    .unwrap();
    dir
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("carelog"));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("Carelog"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("carelog"));
    cmd.arg("--version").assert().success();
}

#[test]
fn test_cli_completions() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("carelog"));
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(starts_with("_carelog"));
}

#[test]
fn test_show_empty_history() {
    let dir = data_dir_with_config("redb");
    carelog(&dir)
        .args(["history", "show", "p-1"])
        .assert()
        .success()
        .stdout(contains("No history for p-1"));
}

#[test]
fn test_append_then_show_and_list() {
    let dir = data_dir_with_config("fs");

    carelog(&dir)
        .args([
            "history",
            "append",
            "p-1",
            "--requester",
            "Olá",
            "--responder",
            "Como posso ajudar?",
        ])
        .assert()
        .success()
        .stdout(contains("Appended entry for p-1"));

    carelog(&dir)
        .args(["history", "show", "p-1"])
        .assert()
        .success()
        .stdout(contains("Paciente/Profissional: Olá"))
        .stdout(contains("Assistente: Como posso ajudar?"));

    carelog(&dir)
        .args(["--format", "json", "history", "show", "p-1"])
        .assert()
        .success()
        .stdout(contains("\"requester\": \"Olá\""));

    carelog(&dir)
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(contains("p-1"));

    assert!(dir.path().join("blobs/documents/ai-history/p-1.txt").exists());
}

#[test]
fn test_clear_history() {
    let dir = data_dir_with_config("redb");

    carelog(&dir)
        .args(["history", "append", "p-1", "--requester", "a", "--responder", "b"])
        .assert()
        .success();

    carelog(&dir)
        .args(["history", "clear", "p-1"])
        .assert()
        .success()
        .stdout(contains("Deleted history for p-1"));

    carelog(&dir)
        .args(["history", "clear", "p-1"])
        .assert()
        .success()
        .stdout(contains("No history for p-1"));
}

#[test]
fn test_append_with_invalid_subject_does_not_fail() {
    let dir = data_dir_with_config("redb");
    carelog(&dir)
        .args(["history", "append", "a/b", "--requester", "x", "--responder", "y"])
        .assert()
        .success()
        .stderr(contains("History not saved"));
}

#[test]
fn test_show_with_invalid_subject_fails() {
    let dir = data_dir_with_config("redb");
    carelog(&dir)
        .args(["history", "show", "a/b"])
        .assert()
        .failure()
        .stderr(contains("invalid subject id"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    carelog(&dir)
        .args(["history", "list"])
        .assert()
        .failure()
        .stderr(contains("Failed to read config file"));
}

#[test]
fn test_list_skips_blobs_with_unusable_subject_names() {
    let dir = data_dir_with_config("fs");

    carelog(&dir)
        .args(["history", "append", "p-1", "--requester", "a", "--responder", "b"])
        .assert()
        .success();

    let foreign = dir.path().join("blobs/documents/ai-history/ .txt");
    std::fs::write(foreign, "\n\n--- 04/03/2025, 09:05 ---\nPaciente/Profissional: x\nAssistente: y")
        .unwrap();

    carelog(&dir)
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(contains("p-1"))
        .stderr(contains("Skipping unreadable history"));
}
