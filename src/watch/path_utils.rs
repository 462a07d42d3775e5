// src/watch/path_utils.rs

use std::path::Path;

/// `path` relative to `root`, with `/` separators.
///
/// Event paths do not always share the root's prefix (symlinked temp dirs
/// on macOS report `/private/var/...`), so a failed `strip_prefix` is
/// retried on canonical forms before giving up.
pub fn relative_to(root: &Path, path: &Path) -> Option<String> {
    let to_slash = |p: &Path| p.to_string_lossy().replace('\\', "/");

    if let Ok(rel) = path.strip_prefix(root) {
        return Some(to_slash(rel));
    }

    let root = root.canonicalize().ok()?;
    let path = path.canonicalize().ok()?;
    path.strip_prefix(&root).ok().map(to_slash)
}
