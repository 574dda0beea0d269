//! Source tree enumeration.
//!
//! Walks the content root recursively and returns every file, directory and
//! symlink that survives filtering, in a stable depth-first order (siblings
//! sorted by file name, a directory before its children).
//!
//! Two filters are hard-wired and cannot be overridden by configuration:
//!
//! - anything with a path component starting with `.` (`.git/`, `.DS_Store`)
//! - anything inside the build's own output directory
//!
//! Both prune whole subtrees. The configurable include/exclude rules from
//! [`PatternSet`] are then applied per entry against the root-relative path;
//! they never prune, so `posts/*` still admits `posts/a.md` even though the
//! `posts` directory itself does not match.

use crate::paths;
use crate::pattern::PatternSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Source root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Invalid include/exclude pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// What kind of filesystem object an entry is. Symlinks are never followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
}

/// A filesystem object found under the source root.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    /// Absolute (root-joined) path.
    pub path: PathBuf,
    /// Root-relative path, `/`-separated, no leading separator.
    pub relative: String,
    pub kind: EntryKind,
    /// Modification time as reported by the OS, if available.
    pub modified: Option<SystemTime>,
}

/// Configurable tree walker.
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    patterns: PatternSet,
    skip_dirs: Vec<PathBuf>,
}

impl Walker {
    pub fn new(root: &Path, patterns: PatternSet) -> Self {
        Self {
            root: root.to_path_buf(),
            patterns,
            skip_dirs: Vec::new(),
        }
    }

    /// Never enter `dir` (used for the output directory).
    pub fn skip_dir(mut self, dir: &Path) -> Self {
        self.skip_dirs.push(dir.to_path_buf());
        self
    }

    pub fn walk(&self) -> Result<Vec<SourceEntry>, WalkError> {
        if !self.root.is_dir() {
            return Err(WalkError::NotADirectory(self.root.clone()));
        }

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_pruned(e.path()));

        let mut entries = Vec::new();
        for item in walker {
            let dir_entry = match item {
                Ok(e) => e,
                Err(err) => {
                    log::warn!("skipping unreadable entry: {err}");
                    continue;
                }
            };

            let relative = relative_path(&self.root, dir_entry.path());
            if !self.patterns.admits(&relative) {
                continue;
            }

            let file_type = dir_entry.file_type();
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };

            let modified = dir_entry.metadata().ok().and_then(|m| m.modified().ok());

            entries.push(SourceEntry {
                path: dir_entry.into_path(),
                relative,
                kind,
                modified,
            });
        }

        Ok(entries)
    }

    fn is_pruned(&self, path: &Path) -> bool {
        if self.skip_dirs.iter().any(|d| path.starts_with(d)) {
            return true;
        }
        is_hidden(&relative_path(&self.root, path))
    }
}

/// Walk `root`, keeping entries admitted by the include/exclude rules.
pub fn walk(
    root: &Path,
    includes: &[String],
    excludes: &[String],
) -> Result<Vec<SourceEntry>, WalkError> {
    let patterns = PatternSet::new(includes, excludes)?;
    Walker::new(root, patterns).walk()
}

/// True when any component of a relative path starts with `.`.
pub fn is_hidden(relative: &str) -> bool {
    relative
        .split('/')
        .any(|segment| segment.starts_with('.') && segment != "." && segment != "..")
}

fn relative_path(root: &Path, path: &Path) -> String {
    paths::relative_path(root, path).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use std::fs;
    use tempfile::TempDir;

    fn relatives(entries: &[SourceEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.relative.as_str()).collect()
    }

    #[test]
    fn walk_lists_files_and_directories_in_order() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "posts/b.md", "b");
        write_file(tmp.path(), "posts/a.md", "a");
        write_file(tmp.path(), "about.md", "about");

        let entries = walk(tmp.path(), &[], &[]).unwrap();
        assert_eq!(
            relatives(&entries),
            vec!["about.md", "posts", "posts/a.md", "posts/b.md"]
        );
        assert_eq!(entries[1].kind, EntryKind::Directory);
        assert_eq!(entries[2].kind, EntryKind::File);
        assert!(entries[2].modified.is_some());
    }

    #[test]
    fn hidden_segments_are_never_walked() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), ".git/config", "[core]");
        write_file(tmp.path(), "posts/.draft.md", "x");
        write_file(tmp.path(), "posts/a.md", "a");

        let includes = vec!["*".to_string(), ".git/*".to_string()];
        let entries = walk(tmp.path(), &includes, &[]).unwrap();
        assert_eq!(relatives(&entries), vec!["posts", "posts/a.md"]);
    }

    #[test]
    fn include_and_exclude_rules_apply_to_relative_paths() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "posts/a.md", "a");
        write_file(tmp.path(), "posts/b.txt", "b");
        write_file(tmp.path(), "drafts/c.md", "c");

        let entries = walk(
            tmp.path(),
            &["*.md".to_string()],
            &["drafts/*".to_string()],
        )
        .unwrap();
        assert_eq!(relatives(&entries), vec!["posts/a.md"]);
    }

    #[test]
    fn skipped_directory_is_pruned() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "dist/site.json", "{}");
        write_file(tmp.path(), "index.md", "x");

        let entries = Walker::new(tmp.path(), PatternSet::default())
            .skip_dir(&tmp.path().join("dist"))
            .walk()
            .unwrap();
        assert_eq!(relatives(&entries), vec!["index.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_reported_not_followed() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "real/a.md", "a");
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link")).unwrap();

        let entries = walk(tmp.path(), &[], &[]).unwrap();
        let link = entries.iter().find(|e| e.relative == "link").unwrap();
        assert_eq!(link.kind, EntryKind::Symlink);
        assert!(!entries.iter().any(|e| e.relative == "link/a.md"));
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            walk(&missing, &[], &[]),
            Err(WalkError::NotADirectory(_))
        ));
    }

    #[test]
    fn file_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f.md");
        fs::write(&file, "x").unwrap();
        assert!(walk(&file, &[], &[]).is_err());
    }

    #[test]
    fn is_hidden_checks_every_segment() {
        assert!(is_hidden(".git"));
        assert!(is_hidden("a/.cache/b.md"));
        assert!(!is_hidden("a/b.md"));
        assert!(!is_hidden("a/b.c/d.md"));
    }
}
