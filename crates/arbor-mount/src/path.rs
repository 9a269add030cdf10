//! Repository path helpers.
//!
//! Repository paths are `/`-separated, absolute and normalized: no empty,
//! `.` or `..` segments and no trailing slash except for the root.

use crate::error::{MountError, MountResult};

/// The root path.
pub const ROOT_PATH: &str = "/";

/// Check that `path` is a normalized absolute repository path.
pub fn validate(path: &str) -> MountResult<()> {
    let invalid = |reason| MountError::InvalidPath {
        path: path.to_string(),
        reason,
    };

    if !path.starts_with('/') {
        return Err(invalid("path must be absolute"));
    }
    if path == ROOT_PATH {
        return Ok(());
    }
    if path.ends_with('/') {
        return Err(invalid("path must not end with '/'"));
    }
    for segment in path[1..].split('/') {
        match segment {
            "" => return Err(invalid("path contains an empty segment")),
            "." | ".." => return Err(invalid("path contains a relative segment")),
            _ => {}
        }
    }
    Ok(())
}

/// Whether `ancestor` is a strict ancestor of `path`.
pub fn is_ancestor(ancestor: &str, path: &str) -> bool {
    if ancestor == path {
        return false;
    }
    if ancestor == ROOT_PATH {
        return path.starts_with('/');
    }
    path.strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Whether `path` equals `ancestor` or lies below it.
pub fn is_same_or_descendant(path: &str, ancestor: &str) -> bool {
    path == ancestor || is_ancestor(ancestor, path)
}

/// Whether one path equals, contains or lies below the other.
pub fn is_related(a: &str, b: &str) -> bool {
    is_same_or_descendant(a, b) || is_ancestor(a, b)
}

/// The parent path, or `None` for the root.
pub fn parent(path: &str) -> Option<&str> {
    if path == ROOT_PATH {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some(ROOT_PATH),
        Some(index) => Some(&path[..index]),
        None => None,
    }
}
