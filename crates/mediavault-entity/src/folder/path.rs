//! Materialized folder paths.
//!
//! A folder's path is the chain of its ancestors' uids followed by its own,
//! each prefixed with `/`. Paths are built from uids rather than names so a
//! rename never invalidates them.

use uuid::Uuid;

use super::model::Folder;

/// Compute the path of a folder with the given uid under `parent`.
pub fn compute_path(parent: Option<&Folder>, uid: Uuid) -> String {
    match parent {
        Some(parent) => format!("{}/{uid}", parent.path),
        None => format!("/{uid}"),
    }
}

/// Check whether `path` equals `ancestor` or lies below it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    match path.strip_prefix(ancestor) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Replace the `old_prefix` part of `path` with `new_prefix`.
///
/// Paths outside `old_prefix` are returned unchanged.
pub fn rebase_path(path: &str, old_prefix: &str, new_prefix: &str) -> String {
    if is_within(path, old_prefix) {
        format!("{new_prefix}{}", &path[old_prefix.len()..])
    } else {
        path.to_string()
    }
}
