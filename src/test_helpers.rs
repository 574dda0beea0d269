//! Shared test utilities for the webify test suite.
//!
//! Provides fixture setup, single-file writers and manifest lookups.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = build_fixtures(&tmp);
//!
//! let page = find_page(&manifest, "blog/first-post.md");
//! assert_eq!(page.title, "Hello, World");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::config::{self, CONFIG_FILE_NAME};
use crate::site::{self, SiteManifest};
use crate::types::PageRecord;
use crate::walk::{EntryKind, SourceEntry};

// =========================================================================
// Fixture setup
// =========================================================================

/// A scratch site seeded from `fixtures/site/`, free to mutate.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    mirror_fixture_tree(&fixtures, tmp.path());
    tmp
}

/// Recreate `src` under `dst` in walk order, directories before their files.
fn mirror_fixture_tree(src: &Path, dst: &Path) {
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.unwrap();
        let target = dst.join(entry.path().strip_prefix(src).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).unwrap();
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

/// Run a full build of a fixture copy into its default output directory.
pub fn build_fixtures(tmp: &TempDir) -> SiteManifest {
    let config = config::load_config(&tmp.path().join(CONFIG_FILE_NAME)).unwrap();
    let output = config.output_dir(tmp.path());
    site::build(tmp.path(), &output, &config, None).unwrap()
}

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Build a [`SourceEntry`] for an existing path, as the walker would.
pub fn entry_for(root: &Path, relative: &str) -> SourceEntry {
    let path = root.join(relative);
    let meta = fs::symlink_metadata(&path).unwrap();
    let kind = if meta.file_type().is_symlink() {
        EntryKind::Symlink
    } else if meta.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::File
    };
    SourceEntry {
        path,
        relative: relative.to_string(),
        kind,
        modified: meta.modified().ok(),
    }
}

// =========================================================================
// Manifest lookups: panic with a clear message on miss
// =========================================================================

/// Find a page by id. Panics if not found.
pub fn find_page<'a>(manifest: &'a SiteManifest, id: &str) -> &'a PageRecord {
    manifest
        .pages
        .iter()
        .find(|p| p.id == id)
        .unwrap_or_else(|| {
            let ids = page_ids(manifest);
            panic!("page '{id}' not found. Available: {ids:?}")
        })
}

/// All page ids in manifest order.
pub fn page_ids(manifest: &SiteManifest) -> Vec<&str> {
    manifest.pages.iter().map(|p| p.id.as_str()).collect()
}
