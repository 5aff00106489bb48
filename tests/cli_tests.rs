//! Integration tests for the skinrender CLI
//!
//! These run the binary against the stand-in profile service and check exit
//! codes, output files and messages.

mod common;

use common::FakeUpstream;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary from `dir` with upstream URLs pointing at `base_url` and no
/// config file in reach.
async fn run_cli(dir: &Path, base_url: &str, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_skinrender"));
    command
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir)
        .env("HOME", dir)
        .env("SKINRENDER_API_BASE_URL", base_url)
        .env("SKINRENDER_SESSION_BASE_URL", base_url)
        .env_remove("RUST_LOG");
    tokio::task::spawn_blocking(move || command.output().unwrap()).await.unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn png_dimensions(path: &Path) -> (u32, u32) {
    let image = image::open(path).unwrap();
    (image.width(), image.height())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_renders_avatar_to_default_output() {
    let upstream = FakeUpstream::start().await;
    let temp = TempDir::new().unwrap();

    let output = run_cli(temp.path(), &upstream.base_url, &["avatar", "Notch", "--size", "64"]).await;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(png_dimensions(&temp.path().join("output.png")), (64, 64));
    let out = stdout(&output);
    assert!(out.contains("Player id: 069a79f444e94726a5befca90e38aaf5"), "{}", out);
    assert!(out.contains("Saved to: output.png"), "{}", out);
    assert!(out.contains("Size: 64px"), "{}", out);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_renders_body_to_named_file() {
    let upstream = FakeUpstream::start().await;
    let temp = TempDir::new().unwrap();

    let output =
        run_cli(temp.path(), &upstream.base_url, &["BODY", "Notch", "-o", "renders/body.png", "-s", "32"]).await;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(png_dimensions(&temp.path().join("renders/body.png")), (32, 64));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_output_directory() {
    let upstream = FakeUpstream::start().await;
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("heads")).unwrap();

    let output = run_cli(temp.path(), &upstream.base_url, &["cube", "Notch", "-o", "heads", "-s", "16"]).await;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(png_dimensions(&temp.path().join("heads/Notch_cube.png")), (16, 16));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_skin_download() {
    let upstream = FakeUpstream::start().await;
    let temp = TempDir::new().unwrap();

    let output = run_cli(temp.path(), &upstream.base_url, &["skin", "oldtimer", "-o", "skin.png"]).await;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let saved = temp.path().join("skin.png");
    assert_eq!(png_dimensions(&saved), (64, 32));
    let bytes = std::fs::metadata(&saved).unwrap().len();
    let out = stdout(&output);
    assert!(out.contains(&format!("Size: {} bytes", bytes)), "{}", out);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_base_url_flag_beats_environment() {
    let upstream = FakeUpstream::start().await;
    let temp = TempDir::new().unwrap();

    let output = run_cli(
        temp.path(),
        "http://127.0.0.1:9",
        &["avatar", "Notch", "-s", "16", "--api-base-url", &upstream.base_url],
    )
    .await;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(png_dimensions(&temp.path().join("output.png")), (16, 16));
    assert_eq!(upstream.calls(), (1, 1, 1));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unusable_api_base_url_flag_exits_2() {
    let upstream = FakeUpstream::start().await;
    let temp = TempDir::new().unwrap();

    let output =
        run_cli(temp.path(), &upstream.base_url, &["avatar", "Notch", "--api-base-url", "ftp://skins.example"]).await;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("api.api_base_url"), "{}", stderr(&output));
    assert_eq!(upstream.calls(), (0, 0, 0));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_arguments_exit_2() {
    let upstream = FakeUpstream::start().await;
    let temp = TempDir::new().unwrap();

    for args in [vec!["hologram", "Notch"], vec!["avatar", "Notch", "-s", "4"], vec!["avatar"]] {
        let output = run_cli(temp.path(), &upstream.base_url, &args).await;
        assert_eq!(output.status.code(), Some(2), "{:?}", args);
    }
    assert_eq!(upstream.calls(), (0, 0, 0));
    assert!(!temp.path().join("output.png").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blank_player_exits_2() {
    let upstream = FakeUpstream::start().await;
    let temp = TempDir::new().unwrap();

    let output = run_cli(temp.path(), &upstream.base_url, &["avatar", "  "]).await;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Error: Missing username parameter"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_player_exits_1() {
    let upstream = FakeUpstream::start().await;
    let temp = TempDir::new().unwrap();

    let output = run_cli(temp.path(), &upstream.base_url, &["bust", "nobody"]).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: player not found: nobody"));
    assert!(!temp.path().join("output.png").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_skinless_player_exits_1() {
    let upstream = FakeUpstream::start().await;
    let temp = TempDir::new().unwrap();

    let output = run_cli(temp.path(), &upstream.base_url, &["avatar", "Skinless"]).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: Skin not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_file_sets_default_size() {
    let upstream = FakeUpstream::start().await;
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("skinrender.toml"), "[render]\ndefault_size = 24\n").unwrap();

    let output = run_cli(temp.path(), &upstream.base_url, &["avatar", "Notch"]).await;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(png_dimensions(&temp.path().join("output.png")), (24, 24));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_broken_config_exits_1() {
    let upstream = FakeUpstream::start().await;
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("custom.toml"), "[render\n").unwrap();

    let output = run_cli(temp.path(), &upstream.base_url, &["avatar", "Notch", "--config", "custom.toml"]).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to parse skinrender.toml"));
}
