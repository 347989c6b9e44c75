//! Request path resolution
//!
//! Lexically resolves a request path against the public root. Traversal
//! is rejected here, before any filesystem access happens.

use std::path::{Component, Path, PathBuf};

use crate::http::query;

/// Why a request path could not be resolved.
#[derive(Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// The path climbs out of the public root.
    Traversal,
}

/// Resolve a request path to a file path under `public_root`.
///
/// The empty path maps to `default_document`. `.` segments are dropped
/// and `..` segments pop the previous segment; popping past the root is
/// a traversal error, as is any absolute segment.
pub fn resolve_request_path(
    public_root: &str,
    request_path: &str,
    default_document: &str,
) -> Result<PathBuf, ResolveError> {
    let decoded = query::decode_path(request_path);
    let trimmed = decoded.trim_start_matches('/');

    let relative = if trimmed.is_empty() {
        default_document
    } else {
        trimmed
    };

    let mut resolved = PathBuf::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(segment) => resolved.push(segment),
            Component::ParentDir => {
                if !resolved.pop() {
                    return Err(ResolveError::Traversal);
                }
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return Err(ResolveError::Traversal),
        }
    }

    // A path made entirely of dot segments collapses to the root itself.
    if resolved.as_os_str().is_empty() {
        resolved.push(default_document);
    }

    Ok(Path::new(public_root).join(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(path: &str) -> Result<PathBuf, ResolveError> {
        resolve_request_path("public", path, "index.html")
    }

    #[test]
    fn test_root_maps_to_default_document() {
        assert_eq!(resolve("/").expect("resolves"), Path::new("public/index.html"));
        assert_eq!(resolve("").expect("resolves"), Path::new("public/index.html"));
    }

    #[test]
    fn test_nested_path_resolves_under_root() {
        assert_eq!(
            resolve("/css/app.css").expect("resolves"),
            Path::new("public/css/app.css")
        );
    }

    #[test]
    fn test_dot_segments_collapse() {
        assert_eq!(
            resolve("/a/./b/../c.txt").expect("resolves"),
            Path::new("public/a/c.txt")
        );
        assert_eq!(resolve("/a/..").expect("resolves"), Path::new("public/index.html"));
    }

    #[test]
    fn test_traversal_is_rejected() {
        assert_eq!(resolve("/../secret.txt"), Err(ResolveError::Traversal));
        assert_eq!(resolve("/a/../../secret.txt"), Err(ResolveError::Traversal));
        assert_eq!(resolve("../../../etc/passwd"), Err(ResolveError::Traversal));
    }

    #[test]
    fn test_encoded_traversal_is_rejected() {
        assert_eq!(resolve("/%2e%2e/passwd"), Err(ResolveError::Traversal));
        assert_eq!(resolve("/a/%2E%2E/%2e%2e/passwd"), Err(ResolveError::Traversal));
    }

    #[test]
    fn test_resolution_is_lexical_only() {
        // The root does not exist; resolution and rejection still work
        // because no filesystem access is involved.
        let missing_root = "definitely-missing-root-dir";
        assert_eq!(
            resolve_request_path(missing_root, "/a.txt", "index.html").expect("resolves"),
            Path::new("definitely-missing-root-dir/a.txt")
        );
        assert_eq!(
            resolve_request_path(missing_root, "/../a.txt", "index.html"),
            Err(ResolveError::Traversal)
        );
    }
}
