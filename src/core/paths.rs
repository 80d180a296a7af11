use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Dispatcher config file name, looked up in the repository root.
pub const CONFIG_FILE: &str = "ob-dispatch.json";

/// Expand `~` and `$VAR` in a user-supplied path.
///
/// Paths that are not valid UTF-8 are returned as given.
pub fn expand(path: &Path) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };

    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).into_owned()),
    }
}

/// Repository root holding the component directories.
///
/// Defaults to the current working directory. The result is canonicalized
/// when the directory exists so error messages show absolute paths.
pub fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
    let root = match root {
        Some(r) => expand(r),
        None => env::current_dir().map_err(|e| {
            Error::internal_io(e.to_string(), Some("read current directory".to_string()))
        })?,
    };

    Ok(root.canonicalize().unwrap_or(root))
}

/// Default config file path for a root.
pub fn config_file(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}
