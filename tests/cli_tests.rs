//! CLI tests for Playlens
//!
//! Runs the binary against replay files with `assert_cmd`. Output is always
//! piped here, so the updating mode falls back to plain rendering.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile, TempDir};

const ONE_PLAY: &str = r#"{"type":"PlaybookStart","play_count":1}
{"type":"PlayStart","name":"Prep"}
{"type":"TaskStart","name":"ping"}
{"type":"RunnerOK","host":"node1"}
{"type":"PlaybookEnd"}
"#;

/// Command isolated from the caller's config files and color settings.
fn playlens_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("playlens").unwrap();
    cmd.env("HOME", home.path())
        .current_dir(home.path())
        .env_remove("NO_COLOR")
        .env_remove("PLAYLENS_NO_COLOR")
        .env_remove("PLAYLENS_MODE")
        .env_remove("PLAYLENS_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn replay_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file
}

#[test]
fn test_help() {
    let home = tempdir().unwrap();
    playlens_cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--no-color"));
}

#[test]
fn test_replay_file_default_mode_on_pipe() {
    let home = tempdir().unwrap();
    let replay = replay_file(ONE_PLAY);

    playlens_cmd(&home)
        .arg(replay.path())
        .assert()
        .success()
        .stdout("1/1....  Prep  [OK]\n");
}

#[test]
fn test_replay_from_stdin_in_verbose_mode() {
    let home = tempdir().unwrap();

    playlens_cmd(&home)
        .args(["-v", "-"])
        .write_stdin(ONE_PLAY)
        .assert()
        .success()
        .stdout(
            "1/1....  Prep\n\
             - Running task: ping\n\
             [OK]   node1\n\
             1/1.... Prep Finished\n",
        );
}

#[test]
fn test_forced_color() {
    let home = tempdir().unwrap();
    let replay = replay_file(ONE_PLAY);

    playlens_cmd(&home)
        .args(["--color", "always", "--mode", "verbose"])
        .arg(replay.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1b}["));
}

#[test]
fn test_no_color_env() {
    let home = tempdir().unwrap();
    let replay = replay_file(ONE_PLAY);

    playlens_cmd(&home)
        .env("NO_COLOR", "1")
        .args(["--mode", "verbose"])
        .arg(replay.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn test_config_file_selects_mode() {
    let home = tempdir().unwrap();
    let config = home.path().join("custom.toml");
    std::fs::write(&config, "[output]\nmode = \"verbose\"\ncolor = \"never\"\n").unwrap();
    let replay = replay_file(ONE_PLAY);

    playlens_cmd(&home)
        .arg("--config")
        .arg(&config)
        .arg(replay.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("- Running task: ping"));
}

#[test]
fn test_project_config_is_picked_up() {
    let home = tempdir().unwrap();
    std::fs::write(
        home.path().join("playlens.toml"),
        "[output]\nmode = \"verbose\"\n",
    )
    .unwrap();
    let replay = replay_file(ONE_PLAY);

    playlens_cmd(&home)
        .arg(replay.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Prep Finished"));
}

#[test]
fn test_failed_play_output() {
    let home = tempdir().unwrap();
    let replay = replay_file(
        r#"{"type":"PlaybookStart","play_count":1}
{"type":"PlayStart","name":"Install"}
{"type":"TaskStart","name":"install docker"}
{"type":"RunnerFailed","host":"node2","message":"no package","stderr":"E: unable to locate"}
{"type":"PlaybookEnd"}
"#,
    );

    playlens_cmd(&home)
        .arg(replay.path())
        .assert()
        .success()
        .stdout(
            "1/1....  Install\n\
             - Running task: install docker\n\
             [ERR]   node2: no package\n\
             ---- STDERR ----\n\
             E: unable to locate\n\
             ---------------\n",
        );
}

#[test]
fn test_malformed_replay_exits_with_replay_code() {
    let home = tempdir().unwrap();
    let replay = replay_file("{\"type\":\"PlaybookStart\",\"play_count\":1}\nnot json\n");

    playlens_cmd(&home)
        .arg(replay.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_missing_replay_file() {
    let home = tempdir().unwrap();

    playlens_cmd(&home)
        .arg(home.path().join("nope.jsonl"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to open replay file"));
}

#[test]
fn test_missing_config_file() {
    let home = tempdir().unwrap();

    playlens_cmd(&home)
        .args(["--config", "absent.toml", "-"])
        .write_stdin("")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_invalid_mode_is_rejected_by_parser() {
    let home = tempdir().unwrap();

    playlens_cmd(&home)
        .args(["--mode", "fancy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
