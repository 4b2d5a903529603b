use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{DispatchGenError, Result};

/// Replace the contents of `path` with `contents`.
///
/// The text goes to a temporary file in the destination directory which is then renamed
/// over `path`, so readers see either the old file or the new one. Missing parent
/// directories are created.
///
/// # Errors
///
/// Returns [`DispatchGenError::Io`] if the directory or file cannot be written. A
/// read-only `path` is refused with [`io::ErrorKind::PermissionDenied`] rather than
/// replaced through the rename.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let existing = fs::metadata(path).ok().map(|meta| meta.permissions());
    if existing.as_ref().is_some_and(fs::Permissions::readonly) {
        return Err(DispatchGenError::io(
            path,
            io::Error::new(io::ErrorKind::PermissionDenied, "output file is read-only"),
        ));
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| DispatchGenError::io(dir, e))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".dispatchgen")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| DispatchGenError::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| DispatchGenError::io(tmp.path(), e))?;
    tmp.flush().map_err(|e| DispatchGenError::io(tmp.path(), e))?;

    if let Some(perms) = existing.or_else(default_permissions) {
        fs::set_permissions(tmp.path(), perms).map_err(|e| DispatchGenError::io(tmp.path(), e))?;
    }

    tmp.persist(path)
        .map_err(|e| DispatchGenError::io(path, e.error))?;
    debug!(output = %path.display(), bytes = contents.len(), "wrote generated file");
    Ok(())
}

// Temp files are created 0600; generated sources should look like any other file.
#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

/// Compare `path` against `expected` without writing.
///
/// # Errors
///
/// [`DispatchGenError::Stale`] if the file is missing or differs, [`DispatchGenError::Io`]
/// if it exists but cannot be read.
pub fn check_up_to_date(path: &Path, expected: &str) -> Result<()> {
    match fs::read_to_string(path) {
        Ok(current) if current == expected => Ok(()),
        Ok(_) => Err(DispatchGenError::Stale {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(DispatchGenError::Stale {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(DispatchGenError::io(path, e)),
    }
}
