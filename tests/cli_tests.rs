use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary isolated from any config file or PERSEUS_* variables of the host
fn perseus(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("perseus").unwrap();
    cmd.current_dir(dir.path());
    for key in [
        "PERSEUS_CONFIG",
        "PERSEUS_FFMPEG",
        "PERSEUS_FFPROBE",
        "PERSEUS_RESOURCES_DIR",
        "PERSEUS_DEFAULT_DURATION",
        "PERSEUS_GENERATE_PREVIEWS",
        "PERSEUS_THREADS",
        "PERSEUS_NOTIFICATION_TIMEOUT",
        "PERSEUS_LOG_LEVEL",
        "PERSEUS_LOG_FORMAT",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    // Probing always fails, so imports fall back to the default duration
    cmd.args(["--ffprobe", "/nonexistent/bin/ffprobe", "--log-level", "warn"]);
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    perseus(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("probe")
                .and(predicate::str::contains("plan"))
                .and(predicate::str::contains("render"))
                .and(predicate::str::contains("session")),
        );
}

#[test]
fn test_plan_prints_ordered_segments() {
    let dir = TempDir::new().unwrap();
    let output = perseus(&dir)
        .args([
            "--default-duration",
            "30",
            "--no-previews",
            "plan",
            "--clip",
            "/nonexistent/a.mp4@0-10",
            "--clip",
            "/nonexistent/b.mp4@5-15",
            "--output",
            "out.mp4",
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let segments = plan["job"]["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0]["source_path"], "/nonexistent/a.mp4");
    assert_eq!(segments[0]["trim_start"], 0.0);
    assert_eq!(segments[0]["trim_end"], 10.0);
    assert_eq!(segments[1]["source_path"], "/nonexistent/b.mp4");
    assert_eq!(segments[1]["trim_start"], 5.0);
    assert_eq!(segments[1]["trim_end"], 15.0);
    assert_eq!(plan["total_duration"], 20.0);

    let args: Vec<&str> = plan["args"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|arg| arg.as_str())
        .collect();
    assert_eq!(args.last(), Some(&"out.mp4"));
    assert!(args.contains(&"-filter_complex"));
}

#[test]
fn test_plan_rejects_inverted_range() {
    let dir = TempDir::new().unwrap();
    perseus(&dir)
        .args(["plan", "--clip", "a.mp4@10-5", "--output", "out.mp4"])
        .assert()
        .failure();
}

#[test]
fn test_missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    perseus(&dir)
        .args(["--config", "missing.toml", "plan", "--clip", "a.mp4", "--output", "out.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn test_config_file_in_working_directory_is_used() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("perseus.toml"), "[import]\ndefault_duration = 42.0\n").unwrap();

    let output = perseus(&dir)
        .args(["--no-previews", "plan", "--clip", "/nonexistent/a.mp4", "--output", "out.mp4"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["total_duration"], 42.0);
}

#[test]
fn test_session_script() {
    let dir = TempDir::new().unwrap();
    let script = "\
import /nonexistent/a.mp4 /nonexistent/b.mp4
select 1
split 4
move 3 1
seek 2
play
tick 1
status
bogus
quit
";
    perseus(&dir)
        .args(["--default-duration", "12", "--no-previews", "session"])
        .write_stdin(script)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Imported 2 clip(s)")
                .and(predicate::str::contains("a.mp4 (Part 2)"))
                .and(predicate::str::contains("Total: 24.0s"))
                .and(predicate::str::contains("playing"))
                .and(predicate::str::contains("error: unknown command 'bogus'")),
        );
}
