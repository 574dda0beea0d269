//! Mapping source paths into the output tree.
//!
//! For a source root, an output root and a file under the source root:
//!
//! ```text
//! root    /site
//! output  /site/dist
//! file    /site/posts/a.md
//!
//! relative_path   posts/a.md
//! mirror_path     /site/dist/posts/a.md      (copies and directories)
//! record_path     /site/dist/posts/a.json    (content record on disk)
//! content_path    /posts/a.json              (what the manifest stores)
//! ```
//!
//! All functions are pure; nothing here touches the filesystem.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("{file} is not inside source root {root}")]
    OutsideRoot { root: PathBuf, file: PathBuf },
}

/// Root-relative path of `file`, `/`-separated, without a leading separator.
///
/// A file directly under the root yields just its file name.
pub fn relative_path(root: &Path, file: &Path) -> Result<String, PathError> {
    let rel = file
        .strip_prefix(root)
        .map_err(|_| PathError::OutsideRoot {
            root: root.to_path_buf(),
            file: file.to_path_buf(),
        })?;
    Ok(rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Where `file` lands in the output tree when mirrored verbatim.
pub fn mirror_path(root: &Path, output: &Path, file: &Path) -> Result<PathBuf, PathError> {
    let rel = relative_path(root, file)?;
    Ok(if rel.is_empty() {
        output.to_path_buf()
    } else {
        output.join(rel)
    })
}

/// Where the JSON content record for `file` is written.
pub fn record_path(root: &Path, output: &Path, file: &Path) -> Result<PathBuf, PathError> {
    Ok(mirror_path(root, output, file)?.with_extension("json"))
}

/// The output-relative form of [`record_path`], as stored in `contentPath`.
///
/// Independent of where the output root lives.
pub fn content_path(root: &Path, file: &Path) -> Result<String, PathError> {
    let rel = relative_path(root, file)?;
    Ok(ensure_leading_slash(&replace_extension(&rel, "json")))
}

/// Strip the final extension of the last path segment.
///
/// Dotfiles (`.htaccess`) and extension-less names are returned unchanged.
pub fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[name_start..].rfind('.') {
        Some(0) | None => path,
        Some(dot) => &path[..name_start + dot],
    }
}

fn replace_extension(path: &str, ext: &str) -> String {
    format!("{}.{}", strip_extension(path), ext)
}

/// Prefix `/` unless already present.
pub fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_nested_file() {
        let root = Path::new("/site");
        let output = Path::new("/site/dist");
        let file = Path::new("/site/posts/a.md");

        assert_eq!(relative_path(root, file).unwrap(), "posts/a.md");
        assert_eq!(
            mirror_path(root, output, file).unwrap(),
            PathBuf::from("/site/dist/posts/a.md")
        );
        assert_eq!(
            record_path(root, output, file).unwrap(),
            PathBuf::from("/site/dist/posts/a.json")
        );
        assert_eq!(content_path(root, file).unwrap(), "/posts/a.json");
    }

    #[test]
    fn maps_file_at_root() {
        let root = Path::new("/site");
        let output = Path::new("/out");
        let file = Path::new("/site/index.html");

        assert_eq!(relative_path(root, file).unwrap(), "index.html");
        assert_eq!(
            record_path(root, output, file).unwrap(),
            PathBuf::from("/out/index.json")
        );
        assert_eq!(content_path(root, file).unwrap(), "/index.json");
    }

    #[test]
    fn only_last_extension_is_replaced() {
        let root = Path::new("/site");
        let file = Path::new("/site/notes/v1.2/read.me.txt");
        assert_eq!(
            content_path(root, file).unwrap(),
            "/notes/v1.2/read.me.json"
        );
    }

    #[test]
    fn file_outside_root_is_error() {
        let result = relative_path(Path::new("/site"), Path::new("/elsewhere/a.md"));
        assert!(matches!(result, Err(PathError::OutsideRoot { .. })));
    }

    #[test]
    fn strip_extension_cases() {
        assert_eq!(strip_extension("posts/a.md"), "posts/a");
        assert_eq!(strip_extension("/blog/hello"), "/blog/hello");
        assert_eq!(strip_extension("dir.v2/file"), "dir.v2/file");
        assert_eq!(strip_extension(".htaccess"), ".htaccess");
        assert_eq!(strip_extension("a.tar.gz"), "a.tar");
    }

    #[test]
    fn leading_slash_enforced_once() {
        assert_eq!(ensure_leading_slash("a/b"), "/a/b");
        assert_eq!(ensure_leading_slash("/a/b"), "/a/b");
        assert_eq!(ensure_leading_slash(""), "/");
    }
}
