//! Path resolution for emitted configuration values.

use std::path::{Component, Path, PathBuf};

/// Join `segments` onto `root` and normalize `.` and `..` lexically.
///
/// Nothing is checked against the filesystem: a wrong segment yields a path the
/// bundler later fails to find.
pub fn resolve_path(root: &Path, segments: &[&str]) -> PathBuf {
    let mut joined = root.to_path_buf();
    for segment in segments {
        joined.push(segment);
    }

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// [`resolve_path`] rendered as a string for the bundler.
pub fn resolve_path_string(root: &Path, segments: &[&str]) -> String {
    resolve_path(root, segments).to_string_lossy().into_owned()
}

/// Make `root` absolute, preferring its canonical form when it exists.
pub fn absolute_root(root: &Path) -> std::io::Result<PathBuf> {
    match dunce::canonicalize(root) {
        Ok(canonical) => Ok(canonical),
        Err(_) if root.is_absolute() => Ok(resolve_path(root, &[])),
        Err(_) => {
            let relative = root.to_string_lossy();
            Ok(resolve_path(&std::env::current_dir()?, &[relative.as_ref()]))
        }
    }
}
