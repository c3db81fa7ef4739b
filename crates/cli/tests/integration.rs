//! Integration tests for the depot CLI
//!
//! The fs-backed tests run against temporary directories and need nothing
//! external. The s3 tests require a running S3-compatible server and are
//! gated behind the `integration` feature.
//!
//! Run the s3 tests with:
//! ```bash
//! docker run -d --name minio -p 9000:9000 \
//!     -e MINIO_ROOT_USER=accesskey \
//!     -e MINIO_ROOT_PASSWORD=secretkey \
//!     minio/minio server /data
//!
//! TEST_S3_ENDPOINT=http://localhost:9000 \
//! TEST_S3_ACCESS_KEY=accesskey \
//! TEST_S3_SECRET_KEY=secretkey \
//! cargo test -p depot-cli --features integration
//! ```

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Get the path to the depot binary
fn depot_binary() -> std::path::PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_depot") {
        return std::path::PathBuf::from(path);
    }

    // Try debug first, then release
    let debug = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("target/debug/depot");

    if debug.exists() {
        return debug;
    }

    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("target/release/depot")
}

/// Run depot with an isolated config directory
fn run_depot(args: &[&str], config_dir: &Path) -> Output {
    let mut cmd = Command::new(depot_binary());
    cmd.args(args);
    cmd.env("DEPOT_CONFIG_DIR", config_dir);
    cmd.output().expect("Failed to execute depot command")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_success(output: &Output, context: &str) {
    assert!(
        output.status.success(),
        "{context} failed: {}",
        stderr_of(output)
    );
}

mod fs_backend {
    use super::*;

    /// Isolated config dir plus a data root registered as profile `local`
    fn setup() -> (TempDir, TempDir) {
        let config_dir = tempfile::tempdir().expect("config dir");
        let data_root = tempfile::tempdir().expect("data root");

        let output = run_depot(
            &[
                "profile",
                "set",
                "local",
                data_root.path().to_str().unwrap(),
                "--backend",
                "fs",
            ],
            config_dir.path(),
        );
        assert_success(&output, "profile set");

        (config_dir, data_root)
    }

    #[test]
    fn test_profile_set_list_remove() {
        let (config_dir, _data_root) = setup();

        let output = run_depot(&["profile", "list", "--json"], config_dir.path());
        assert_success(&output, "profile list");
        let stdout = stdout_of(&output);
        assert!(stdout.contains("\"local\""));
        assert!(stdout.contains("\"fs\""));

        let output = run_depot(&["profile", "remove", "local"], config_dir.path());
        assert_success(&output, "profile remove");

        let output = run_depot(&["profile", "list"], config_dir.path());
        assert_success(&output, "profile list");
        assert!(stdout_of(&output).contains("No profiles configured"));
    }

    #[test]
    fn test_profile_remove_missing_is_not_found() {
        let config_dir = tempfile::tempdir().unwrap();
        let output = run_depot(&["profile", "remove", "ghost"], config_dir.path());
        assert_eq!(output.status.code(), Some(5));
    }

    #[test]
    fn test_s3_profile_requires_credentials() {
        let config_dir = tempfile::tempdir().unwrap();
        let output = run_depot(
            &["profile", "set", "remote", "http://localhost:9000"],
            config_dir.path(),
        );
        assert_eq!(output.status.code(), Some(2));
        assert!(stderr_of(&output).contains("--access-key"));
    }

    #[test]
    fn test_end_to_end_roundtrip() {
        let (config_dir, _data_root) = setup();
        let work = tempfile::tempdir().unwrap();

        let output = run_depot(&["mb", "local/docs"], config_dir.path());
        assert_success(&output, "mb");

        let source = work.path().join("hello.txt");
        std::fs::write(&source, "hello from depot\n").unwrap();
        let output = run_depot(
            &["put", source.to_str().unwrap(), "local/docs"],
            config_dir.path(),
        );
        assert_success(&output, "put");

        // Listed under the name derived from the file name
        let output = run_depot(&["ls", "local/docs", "--json"], config_dir.path());
        assert_success(&output, "ls");
        let stdout = stdout_of(&output);
        assert!(stdout.contains("\"hello.txt\""));
        assert!(stdout.contains("\"size_bytes\": 17"));

        let output = run_depot(&["cat", "local/docs/hello.txt"], config_dir.path());
        assert_success(&output, "cat");
        assert_eq!(stdout_of(&output), "hello from depot\n");

        let output = run_depot(&["stat", "local/docs/hello.txt", "--json"], config_dir.path());
        assert_success(&output, "stat");
        let stdout = stdout_of(&output);
        assert!(stdout.contains("\"url\": \"file://"));
        assert!(stdout.contains("\"size_bytes\": 17"));

        let dest = work.path().join("out");
        std::fs::create_dir(&dest).unwrap();
        let output = run_depot(
            &[
                "get",
                "local/docs/hello.txt",
                dest.to_str().unwrap(),
                "--no-progress",
            ],
            config_dir.path(),
        );
        assert_success(&output, "get");
        let downloaded = std::fs::read_to_string(dest.join("hello.txt")).unwrap();
        assert_eq!(downloaded, "hello from depot\n");

        let output = run_depot(&["rm", "local/docs/hello.txt"], config_dir.path());
        assert_success(&output, "rm");

        let output = run_depot(&["ls", "local/docs", "--json"], config_dir.path());
        assert_success(&output, "ls after rm");
        assert!(!stdout_of(&output).contains("hello.txt"));

        let output = run_depot(&["rb", "local/docs"], config_dir.path());
        assert_success(&output, "rb");
    }

    #[test]
    fn test_put_nested_key_and_prefix_listing() {
        let (config_dir, _data_root) = setup();
        let work = tempfile::tempdir().unwrap();

        assert_success(&run_depot(&["mb", "local/media"], config_dir.path()), "mb");

        let source = work.path().join("clip.mp4");
        std::fs::write(&source, b"not really video").unwrap();
        assert_success(
            &run_depot(
                &["put", source.to_str().unwrap(), "local/media/videos/2024/clip.mp4"],
                config_dir.path(),
            ),
            "put nested",
        );
        assert_success(
            &run_depot(
                &["put", source.to_str().unwrap(), "local/media/audio.mp3"],
                config_dir.path(),
            ),
            "put flat",
        );

        // Prefix narrows to the nested branch
        let output = run_depot(&["ls", "local/media/videos/", "--json"], config_dir.path());
        assert_success(&output, "ls prefix");
        let stdout = stdout_of(&output);
        assert!(stdout.contains("videos/2024/clip.mp4"));
        assert!(!stdout.contains("audio.mp3"));
    }

    #[test]
    fn test_mb_existing_conflicts_unless_ignored() {
        let (config_dir, _data_root) = setup();

        assert_success(&run_depot(&["mb", "local/docs"], config_dir.path()), "mb");

        let output = run_depot(&["mb", "local/docs"], config_dir.path());
        assert_eq!(output.status.code(), Some(6));

        let output = run_depot(&["mb", "local/docs", "-p"], config_dir.path());
        assert_success(&output, "mb -p");
    }

    #[test]
    fn test_missing_profile_is_not_found() {
        let config_dir = tempfile::tempdir().unwrap();
        let output = run_depot(&["ls", "ghost"], config_dir.path());
        assert_eq!(output.status.code(), Some(5));
    }

    #[test]
    fn test_missing_item_is_not_found() {
        let (config_dir, _data_root) = setup();
        assert_success(&run_depot(&["mb", "local/docs"], config_dir.path()), "mb");

        let output = run_depot(&["cat", "local/docs/nope.txt"], config_dir.path());
        assert_eq!(output.status.code(), Some(5));

        let output = run_depot(&["rm", "local/docs/nope.txt"], config_dir.path());
        assert_eq!(output.status.code(), Some(5));
    }

    #[test]
    fn test_container_only_commands_reject_keys() {
        let (config_dir, _data_root) = setup();

        let output = run_depot(&["mb", "local"], config_dir.path());
        assert_eq!(output.status.code(), Some(2));

        let output = run_depot(&["mb", "local/docs/key.txt"], config_dir.path());
        assert_eq!(output.status.code(), Some(2));

        let output = run_depot(&["cat", "local/docs"], config_dir.path());
        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_rb_removes_non_empty_container() {
        let (config_dir, _data_root) = setup();
        let work = tempfile::tempdir().unwrap();

        assert_success(&run_depot(&["mb", "local/docs"], config_dir.path()), "mb");
        let source = work.path().join("a.txt");
        std::fs::write(&source, "a").unwrap();
        assert_success(
            &run_depot(&["put", source.to_str().unwrap(), "local/docs"], config_dir.path()),
            "put",
        );

        // The fs backend drops the whole tree without needing --force
        let output = run_depot(&["rb", "local/docs"], config_dir.path());
        assert_success(&output, "rb");

        let output = run_depot(&["ls", "local", "--json"], config_dir.path());
        assert_success(&output, "ls");
        assert!(!stdout_of(&output).contains("docs"));
    }

    #[test]
    fn test_quiet_suppresses_stdout() {
        let (config_dir, _data_root) = setup();

        let output = run_depot(&["mb", "local/docs", "--quiet"], config_dir.path());
        assert_success(&output, "mb --quiet");
        assert_eq!(stdout_of(&output), "");
    }

    #[test]
    fn test_json_errors_go_to_stderr() {
        let (config_dir, _data_root) = setup();

        let output = run_depot(&["cat", "local/docs/nope.txt", "--json"], config_dir.path());
        assert_eq!(output.status.code(), Some(5));
        assert_eq!(stdout_of(&output), "");
        assert!(stderr_of(&output).contains("\"error\""));
    }

    #[test]
    fn test_ls_summarize_totals() {
        let (config_dir, _data_root) = setup();
        let work = tempfile::tempdir().unwrap();

        assert_success(&run_depot(&["mb", "local/docs"], config_dir.path()), "mb");
        for name in ["a.txt", "b.txt"] {
            let source = work.path().join(name);
            std::fs::write(&source, "12345").unwrap();
            assert_success(
                &run_depot(&["put", source.to_str().unwrap(), "local/docs"], config_dir.path()),
                "put",
            );
        }

        let output = run_depot(
            &["ls", "local/docs", "--summarize", "--json"],
            config_dir.path(),
        );
        assert_success(&output, "ls --summarize");
        let stdout = stdout_of(&output);
        assert!(stdout.contains("\"total_items\": 2"));
        assert!(stdout.contains("\"total_size_bytes\": 10"));
    }
}

#[cfg(feature = "integration")]
mod s3_backend {
    use super::*;
    use std::time::Duration;

    /// Get S3 test configuration from environment
    fn get_test_config() -> Option<(String, String, String)> {
        let endpoint = std::env::var("TEST_S3_ENDPOINT").ok()?;
        let access_key = std::env::var("TEST_S3_ACCESS_KEY").ok()?;
        let secret_key = std::env::var("TEST_S3_SECRET_KEY").ok()?;
        Some((endpoint, access_key, secret_key))
    }

    /// Wait for the S3 service to respond to list requests
    fn wait_for_s3_ready(config_dir: &Path) -> bool {
        for _ in 0..30 {
            let output = run_depot(&["ls", "test", "--json"], config_dir);
            if output.status.success() {
                return true;
            }
            std::thread::sleep(Duration::from_secs(1));
        }
        false
    }

    /// Generate unique suffix for test resources
    fn unique_suffix() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        format!("{:x}", duration.as_nanos() % 0xFFFF_FFFF)
    }

    /// Register a `test` profile for the configured server
    fn setup() -> Option<TempDir> {
        let (endpoint, access_key, secret_key) = get_test_config()?;
        let config_dir = tempfile::tempdir().ok()?;

        let output = run_depot(
            &[
                "profile",
                "set",
                "test",
                &endpoint,
                "--backend",
                "s3",
                "--access-key",
                &access_key,
                "--secret-key",
                &secret_key,
            ],
            config_dir.path(),
        );
        if !output.status.success() {
            eprintln!("Failed to set profile: {}", stderr_of(&output));
            return None;
        }

        if !wait_for_s3_ready(config_dir.path()) {
            eprintln!("S3 service did not become ready in time");
            return None;
        }

        Some(config_dir)
    }

    #[test]
    fn test_container_lifecycle() {
        let Some(config_dir) = setup() else {
            eprintln!("Skipping: S3 test config not available");
            return;
        };
        let container = format!("depot-test-{}", unique_suffix());
        let target = format!("test/{container}");

        assert_success(&run_depot(&["mb", &target], config_dir.path()), "mb");

        let output = run_depot(&["ls", "test", "--json"], config_dir.path());
        assert_success(&output, "ls");
        assert!(stdout_of(&output).contains(&container));

        // Duplicate creation is a conflict against a live server
        let output = run_depot(&["mb", &target], config_dir.path());
        assert_eq!(output.status.code(), Some(6));

        assert_success(&run_depot(&["rb", &target], config_dir.path()), "rb");

        let output = run_depot(&["rb", &target], config_dir.path());
        assert_eq!(output.status.code(), Some(5));
    }

    #[test]
    fn test_object_roundtrip() {
        let Some(config_dir) = setup() else {
            eprintln!("Skipping: S3 test config not available");
            return;
        };
        let container = format!("depot-test-{}", unique_suffix());
        let target = format!("test/{container}");
        let work = tempfile::tempdir().unwrap();

        assert_success(&run_depot(&["mb", &target], config_dir.path()), "mb");

        let source = work.path().join("payload.bin");
        std::fs::write(&source, vec![0x42u8; 4096]).unwrap();
        assert_success(
            &run_depot(
                &["put", source.to_str().unwrap(), &format!("{target}/data/payload.bin")],
                config_dir.path(),
            ),
            "put",
        );

        let output = run_depot(
            &["stat", &format!("{target}/data/payload.bin"), "--json"],
            config_dir.path(),
        );
        assert_success(&output, "stat");
        let stdout = stdout_of(&output);
        assert!(stdout.contains("\"size_bytes\": 4096"));
        assert!(stdout.contains("\"url\": \"s3://"));

        let dest = work.path().join("back.bin");
        assert_success(
            &run_depot(
                &[
                    "get",
                    &format!("{target}/data/payload.bin"),
                    dest.to_str().unwrap(),
                    "--no-progress",
                ],
                config_dir.path(),
            ),
            "get",
        );
        assert_eq!(std::fs::read(&dest).unwrap(), vec![0x42u8; 4096]);

        // Cleanup: --force drains the container before removing it
        assert_success(&run_depot(&["rb", &target, "--force"], config_dir.path()), "rb --force");
    }

    #[test]
    fn test_rb_non_empty_requires_force() {
        let Some(config_dir) = setup() else {
            eprintln!("Skipping: S3 test config not available");
            return;
        };
        let container = format!("depot-test-{}", unique_suffix());
        let target = format!("test/{container}");
        let work = tempfile::tempdir().unwrap();

        assert_success(&run_depot(&["mb", &target], config_dir.path()), "mb");
        let source = work.path().join("a.txt");
        std::fs::write(&source, "a").unwrap();
        assert_success(
            &run_depot(&["put", source.to_str().unwrap(), &target], config_dir.path()),
            "put",
        );

        let output = run_depot(&["rb", &target], config_dir.path());
        assert_eq!(output.status.code(), Some(6));

        assert_success(&run_depot(&["rb", &target, "--force"], config_dir.path()), "rb --force");
    }
}
