use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn config_file(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, content).unwrap();
    path
}

fn cmd(config: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("channel-insights").unwrap();
    cmd.env_remove("YOUTUBE_API_KEY")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("channel-insights")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("transcript"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn report_rejects_unsupported_url() {
    let dir = TempDir::new().unwrap();
    let config = config_file(&dir, "report:\n  max_videos: 5\n");

    cmd(&config)
        .args(["--api-key", "test-key", "-q", "report", "https://example.com/not-a-channel"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid YouTube URL"));
}

#[test]
fn report_requires_api_key() {
    let dir = TempDir::new().unwrap();
    let config = config_file(&dir, "report:\n  max_videos: 5\n");

    cmd(&config)
        .args(["report", "https://www.youtube.com/channel/UCabc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key is not configured"));
}

#[test]
fn config_show_reads_file_and_masks_key() {
    let dir = TempDir::new().unwrap();
    let config = config_file(
        &dir,
        "api:\n  api_key: AIzaSecretValue\ntranscript:\n  endpoint: https://transcripts.example.test/transcript\n",
    );

    cmd(&config)
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Transcript endpoint: https://transcripts.example.test/transcript",
        ))
        .stdout(predicate::str::contains("AIza******"))
        .stdout(predicate::str::contains("AIzaSecretValue").not());
}

#[test]
fn config_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    let config = config_file(&dir, "report:\n  cpm_low: 5.0\n  cpm_high: 1.0\n");

    cmd(&config)
        .args(["config", "--show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CPM rates"));
}

#[test]
fn config_init_writes_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    cmd(&path).args(["config", "--init"]).assert().success();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("max_videos: 100"));
    assert!(written.contains("youtubetotranscript.com"));
}

#[test]
fn resolve_canonical_channel_url() {
    let dir = TempDir::new().unwrap();
    let config = config_file(&dir, "{}\n");

    cmd(&config)
        .args([
            "--api-key",
            "test-key",
            "resolve",
            "https://www.youtube.com/channel/UCX6OQ3DkcsbYNE6H8uQQuVA/videos",
        ])
        .assert()
        .success()
        .stdout("UCX6OQ3DkcsbYNE6H8uQQuVA\n");
}

#[test]
fn resolve_short_video_link() {
    let dir = TempDir::new().unwrap();
    let config = config_file(&dir, "{}\n");

    cmd(&config)
        .args(["resolve", "--video", "https://youtu.be/dQw4w9WgXcQ?t=42"])
        .assert()
        .success()
        .stdout("dQw4w9WgXcQ\n");
}

#[test]
fn transcript_rejects_unrecognised_input() {
    let dir = TempDir::new().unwrap();
    let config = config_file(&dir, "{}\n");

    cmd(&config)
        .args(["-q", "transcript", "https://vimeo.com/12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid YouTube URL"));
}

#[test]
fn transcript_rejects_plain_word() {
    let dir = TempDir::new().unwrap();
    let config = config_file(&dir, "{}\n");

    cmd(&config)
        .args(["-q", "transcript", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid YouTube URL: hello"));
}
