//! Shared helpers for CLI specs.

use std::path::{Path, PathBuf};
use std::process::Output;

/// A vigil invocation bound to an isolated working directory.
pub struct Vigil {
    work_dir: PathBuf,
}

impl Vigil {
    pub fn new(work_dir: &Path) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
        }
    }

    /// Run the binary with the given arguments.
    pub fn run(&self, args: &[&str]) -> Run {
        let mut cmd = assert_cmd::Command::cargo_bin("vigil").unwrap();
        cmd.env("VIGIL_WORK_DIR", &self.work_dir);
        // Keep specs hermetic: no env leakage from the developer's shell.
        cmd.env_remove("VIGIL_SERVER_ADDR");
        cmd.env_remove("VIGIL_NATS_URL");
        cmd.args(args);
        Run {
            output: cmd.output().unwrap(),
        }
    }
}

/// Result of a CLI run for chaining assertions
pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert the command exited zero.
    #[track_caller]
    pub fn passes(self) -> Self {
        assert!(
            self.output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            self.output.status.code(),
            self.stdout(),
            self.stderr(),
        );
        self
    }

    /// Assert the command exited non-zero.
    #[track_caller]
    pub fn fails(self) -> Self {
        assert!(
            !self.output.status.success(),
            "expected command to fail, but it passed\nstdout: {}",
            self.stdout(),
        );
        self
    }

    /// Assert stdout contains substring.
    #[track_caller]
    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout missing {expected:?}\nstdout: {stdout}"
        );
        self
    }

    /// Assert stdout does not contain substring.
    #[track_caller]
    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout unexpectedly contains {unexpected:?}\nstdout: {stdout}"
        );
        self
    }

    /// Assert stderr contains substring.
    #[track_caller]
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr missing {expected:?}\nstderr: {stderr}"
        );
        self
    }
}

/// A valid detect job spec as the control plane would publish it.
pub fn detect_spec_json(uuid: &str) -> String {
    format!(
        r#"{{
            "uuid": "{uuid}",
            "kind": "detect",
            "input": "rtsp://camera/stream",
            "enabled": true,
            "updateTime": "2024-01-01T00:00:00Z",
            "detectOptions": {{
                "model": "m",
                "interval": 1000,
                "labels": ["person", "car"],
                "triggerCount": 2,
                "triggerInterval": 5
            }}
        }}"#
    )
}

/// A spec whose option block contradicts its kind tag.
pub fn mismatched_spec_json(uuid: &str) -> String {
    format!(
        r#"{{
            "uuid": "{uuid}",
            "kind": "video-segment",
            "input": "rtsp://camera/stream",
            "enabled": true,
            "updateTime": "2024-01-01T00:00:00Z",
            "detectOptions": {{
                "model": "m",
                "interval": 1000,
                "labels": ["person"],
                "triggerCount": 1,
                "triggerInterval": 1
            }}
        }}"#
    )
}
