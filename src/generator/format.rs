use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{DispatchGenError, Result};

/// Environment variable overriding the `rustfmt` binary (used by tests).
pub const RUSTFMT_BIN_ENV: &str = "DISPATCHGEN_RUSTFMT_BIN";

/// Pipe `source` through `rustfmt` and return the formatted text.
///
/// Formatting happens before writing or checking, so `--check` compares against the same
/// text `generate` would write.
pub fn format_source(source: &str) -> Result<String> {
    let rustfmt_bin = std::env::var(RUSTFMT_BIN_ENV).unwrap_or_else(|_| "rustfmt".to_string());

    let mut child = Command::new(&rustfmt_bin)
        .args(["--edition", "2021", "--emit", "stdout"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| DispatchGenError::Format {
            detail: format!("could not run {rustfmt_bin}: {e}"),
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(source.as_bytes()) {
            // rustfmt exited early; its status and stderr explain why
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Err(e) => {
                return Err(DispatchGenError::Format {
                    detail: format!("writing to {rustfmt_bin}: {e}"),
                })
            }
            Ok(()) => {}
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|e| DispatchGenError::Format {
            detail: format!("waiting for {rustfmt_bin}: {e}"),
        })?;
    if !output.status.success() {
        return Err(DispatchGenError::Format {
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8(output.stdout).map_err(|e| DispatchGenError::Format {
        detail: format!("non UTF-8 output: {e}"),
    })
}

#[cfg(all(test, unix))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::env;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::sync::{Mutex, OnceLock};

    // Serialize environment mutations to avoid test races
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn stub(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("rustfmt");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn with_stub<T>(body: &str, f: impl FnOnce() -> T) -> T {
        let dir = tempfile::tempdir().unwrap();
        let bin = stub(dir.path(), body);
        let _guard = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let old_bin = env::var(RUSTFMT_BIN_ENV).ok();
        env::set_var(RUSTFMT_BIN_ENV, &bin);
        let res = f();
        match old_bin {
            Some(v) => env::set_var(RUSTFMT_BIN_ENV, v),
            None => env::remove_var(RUSTFMT_BIN_ENV),
        }
        res
    }

    #[test]
    fn test_format_source_passes_text_through() {
        let out = with_stub("cat", || format_source("fn a() {}\n")).unwrap();
        assert_eq!(out, "fn a() {}\n");
    }

    #[test]
    fn test_format_source_failure_reports_stderr() {
        let err = with_stub("echo 'expected item' >&2\nexit 1", || format_source("fn")).unwrap_err();
        match err {
            DispatchGenError::Format { detail } => assert!(detail.contains("expected item")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_format_source_missing_binary() {
        let _guard = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let old_bin = env::var(RUSTFMT_BIN_ENV).ok();
        env::set_var(RUSTFMT_BIN_ENV, "/nonexistent/dispatchgen-rustfmt");
        let res = format_source("fn a() {}");
        match old_bin {
            Some(v) => env::set_var(RUSTFMT_BIN_ENV, v),
            None => env::remove_var(RUSTFMT_BIN_ENV),
        }
        assert!(matches!(res, Err(DispatchGenError::Format { .. })));
    }
}
