use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
        }
    }

    /// Point the client at a local port nothing listens on.
    fn write_unreachable_config(&self) {
        let dir = self.xdg_config.join("loglens");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(
            dir.join("config.toml"),
            "[service]\nbase_url = \"http://127.0.0.1:9\"\ntimeout_secs = 2\n",
        )
        .expect("failed to write config");
    }
}

fn run_cli(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("loglens-cli"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute loglens-cli: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "loglens-cli {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

#[test]
fn config_shows_defaults() {
    let env = CliTestEnv::new();

    let output = run_cli(&env, &["config"]);
    assert_success(&["config"], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("loglens Configuration"));
    assert!(stdout.contains("Service URL:     http://localhost:5000"));
    assert!(stdout.contains("Fallback name:   logfile_report.pdf"));

    let log_dir = env.xdg_state.join("loglens");
    assert!(
        stdout.contains(&format!("Log dir:         {}", log_dir.display())),
        "expected XDG state log dir, got:\n{stdout}"
    );
}

#[test]
fn config_reads_xdg_config_file() {
    let env = CliTestEnv::new();
    env.write_unreachable_config();

    let output = run_cli(&env, &["config"]);
    assert_success(&["config"], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Service URL:     http://127.0.0.1:9"),
        "expected configured URL, got:\n{stdout}"
    );
    assert!(stdout.contains("Timeout:         2s"));
}

#[test]
fn analyze_missing_file_fails_cleanly() {
    let env = CliTestEnv::new();
    env.write_unreachable_config();
    let missing = env.home.join("missing.log");
    let missing = missing.to_string_lossy();

    let output = run_cli(&env, &["analyze", &missing]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Upload failed"), "stderr was:\n{stderr}");
}

#[test]
fn analyze_with_unreachable_service_reports_failure() {
    let env = CliTestEnv::new();
    env.write_unreachable_config();
    let log = env.home.join("server.log");
    fs::write(&log, "2024-01-01 12:00:00 ERROR disk full\n").expect("failed to write log");
    let log = log.to_string_lossy();

    let output = run_cli(&env, &["analyze", &log, "--export"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Upload failed"), "stderr was:\n{stderr}");
    assert!(!env.home.join("server_report.pdf").exists());
}
