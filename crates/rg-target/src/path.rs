//! Lexical path arithmetic
//!
//! Nothing here touches the filesystem: paths are compared component by
//! component after cleaning, so the result only depends on the input strings.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

use crate::error::{Result, TargetError};

/// A path split into its root (empty for relative paths) and cleaned parts.
#[derive(Debug, PartialEq, Eq)]
struct Lexical<'a> {
    root: String,
    parts: Vec<&'a str>,
}

impl<'a> Lexical<'a> {
    fn new(path: &'a Utf8Path) -> Self {
        let mut root = String::new();
        let mut parts: Vec<&'a str> = Vec::new();

        for component in path.components() {
            match component {
                Utf8Component::Prefix(prefix) => root.push_str(prefix.as_str()),
                Utf8Component::RootDir => root.push_str(component.as_str()),
                Utf8Component::CurDir => {}
                Utf8Component::ParentDir => {
                    if parts.last().is_some_and(|last| *last != "..") {
                        parts.pop();
                    } else if root.is_empty() {
                        parts.push("..");
                    }
                    // `/..` is `/`
                }
                Utf8Component::Normal(part) => parts.push(part),
            }
        }

        Self { root, parts }
    }

    fn into_path(self) -> Utf8PathBuf {
        if self.root.is_empty() && self.parts.is_empty() {
            return Utf8PathBuf::from(".");
        }
        let mut path = Utf8PathBuf::from(self.root);
        for part in self.parts {
            path.push(part);
        }
        path
    }
}

/// Lexically clean a path: drop `.` components, fold `..` into the preceding
/// component where possible, and turn an empty path into `.`.
pub fn clean(path: &Utf8Path) -> Utf8PathBuf {
    Lexical::new(path).into_path()
}

/// Compute the path that, joined onto `base`, names `target`.
///
/// Both paths are cleaned first. The result is itself clean, and is `.` when
/// the two paths are the same.
///
/// # Errors
///
/// - [`TargetError::IncompatibleRoots`] if one path is absolute and the other
///   is relative (or they sit under different prefixes).
/// - [`TargetError::BaseEscapesPrefix`] if `base` still has `..` components
///   past the common prefix, since the directory names those stand for are
///   unknown.
pub fn relative_path(base: &Utf8Path, target: &Utf8Path) -> Result<Utf8PathBuf> {
    let from = Lexical::new(base);
    let to = Lexical::new(target);

    if from.root != to.root {
        return Err(TargetError::IncompatibleRoots {
            base: base.to_owned(),
            target: target.to_owned(),
        });
    }

    let common = from
        .parts
        .iter()
        .zip(&to.parts)
        .take_while(|(a, b)| a == b)
        .count();

    let climb = &from.parts[common..];
    if climb.contains(&"..") {
        return Err(TargetError::BaseEscapesPrefix {
            base: base.to_owned(),
            target: target.to_owned(),
        });
    }

    let mut parts: Vec<&str> = vec![".."; climb.len()];
    parts.extend_from_slice(&to.parts[common..]);

    Ok(Lexical {
        root: String::new(),
        parts,
    }
    .into_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(base: &str, target: &str) -> Result<Utf8PathBuf> {
        relative_path(Utf8Path::new(base), Utf8Path::new(target))
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(Utf8Path::new("")), Utf8PathBuf::from("."));
        assert_eq!(clean(Utf8Path::new("./a/./b/")), Utf8PathBuf::from("a/b"));
        assert_eq!(clean(Utf8Path::new("a/b/../c")), Utf8PathBuf::from("a/c"));
        assert_eq!(clean(Utf8Path::new("a/../..")), Utf8PathBuf::from(".."));
        assert_eq!(clean(Utf8Path::new("/../a")), Utf8PathBuf::from("/a"));
    }

    #[test]
    fn test_relative_climbs_to_ancestor() {
        assert_eq!(
            rel("repo/proj/sub/pkg", "repo/proj").unwrap(),
            Utf8PathBuf::from("../..")
        );
    }

    #[test]
    fn test_relative_same_path_is_dot() {
        assert_eq!(rel("repo/proj", "repo/proj").unwrap(), Utf8PathBuf::from("."));
        assert_eq!(rel("repo/proj/", "./repo/proj").unwrap(), Utf8PathBuf::from("."));
        assert_eq!(rel("", "").unwrap(), Utf8PathBuf::from("."));
    }

    #[test]
    fn test_relative_from_workspace_root() {
        assert_eq!(rel("", "a/b").unwrap(), Utf8PathBuf::from("a/b"));
        assert_eq!(rel("a/b", "").unwrap(), Utf8PathBuf::from("../.."));
    }

    #[test]
    fn test_relative_across_siblings() {
        assert_eq!(rel("a/b/c", "a/x").unwrap(), Utf8PathBuf::from("../../x"));
        assert_eq!(rel("/srv/a", "/srv/b/c").unwrap(), Utf8PathBuf::from("../b/c"));
    }

    #[test]
    fn test_relative_rejects_mixed_roots() {
        let err = rel("/abs/pkg", "rel/root").unwrap_err();
        assert!(matches!(err, TargetError::IncompatibleRoots { .. }));
    }

    #[test]
    fn test_relative_rejects_escaping_base() {
        let err = rel("../pkg", "root").unwrap_err();
        assert!(matches!(err, TargetError::BaseEscapesPrefix { .. }));
    }

    #[test]
    fn test_relative_allows_shared_parent_prefix() {
        assert_eq!(rel("../a/b", "../a").unwrap(), Utf8PathBuf::from(".."));
    }
}
