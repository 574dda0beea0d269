//! Per-entry classification and dispatch.
//!
//! Every walked entry ends in exactly one terminal action:
//!
//! | Entry | Action | Record |
//! |-------|--------|--------|
//! | symlink | skipped | no |
//! | directory | mirrored in the output tree (idempotent) | no |
//! | non-text extension, or not valid UTF-8 | copied byte for byte | no |
//! | text extension, no front matter | copied byte for byte | no |
//! | text extension with front matter | content record written | one [`PageRecord`] |
//!
//! The text extensions and the content type written for them both come from
//! [`ContentType::from_extension`], so a file is only ever processed when it
//! has a known content type.
//!
//! [`classify`] decides without writing anything (used by `check`);
//! [`execute`] performs a decided action and [`dispatch`] does both.
//! [`target_path`] names the file an action will write, so a caller running
//! entries in parallel can refuse two entries writing the same file
//! (`a.md` and `a.html` both become `a.json`).

use crate::front_matter::{self, FrontMatter, FrontMatterError};
use crate::metadata::{self, DeriveOptions, PageSource, RejectedDate};
use crate::paths::{self, PathError};
use crate::types::{ContentRecord, ContentType, PageRecord};
use crate::walk::{EntryKind, SourceEntry};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Front matter error: {0}")]
    FrontMatter(#[from] FrontMatterError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("{} is already written by {first}", .target.display())]
    TargetTaken { target: PathBuf, first: String },
}

/// Why a file was copied instead of processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyReason {
    /// Not a recognised text extension, or not valid UTF-8.
    Binary,
    /// A text file without a front-matter block.
    NoFrontMatter,
}

/// A text file ready to become a page.
#[derive(Debug, Clone)]
pub struct PendingPage {
    pub front_matter: FrontMatter,
    pub body: String,
    pub content_type: ContentType,
}

/// What will happen to an entry.
#[derive(Debug, Clone)]
pub enum Disposition {
    SkipSymlink,
    CreateDirectory,
    Copy(CopyReason),
    Process(Box<PendingPage>),
}

/// What happened to an entry.
#[derive(Debug, Clone)]
pub enum Outcome {
    SkippedSymlink,
    DirectoryCreated,
    Copied(CopyReason),
    Processed {
        record: Box<PageRecord>,
        rejected_dates: Vec<RejectedDate>,
    },
}

/// Where dispatch reads from and writes to.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    pub root: &'a Path,
    pub output: &'a Path,
    pub options: DeriveOptions<'a>,
}

/// Decide what to do with an entry. Reads text files, writes nothing.
pub fn classify(entry: &SourceEntry) -> Result<Disposition, DispatchError> {
    match entry.kind {
        EntryKind::Symlink => return Ok(Disposition::SkipSymlink),
        EntryKind::Directory => return Ok(Disposition::CreateDirectory),
        EntryKind::File => {}
    }

    let content_type = entry
        .path
        .extension()
        .map(|e| ContentType::from_extension(&e.to_string_lossy()))
        .unwrap_or(ContentType::Unknown);
    if !content_type.is_text() {
        return Ok(Disposition::Copy(CopyReason::Binary));
    }

    let Ok(text) = String::from_utf8(fs::read(&entry.path)?) else {
        return Ok(Disposition::Copy(CopyReason::Binary));
    };

    let (front_matter, body) = front_matter::extract(&text)?;
    if front_matter.is_empty() {
        return Ok(Disposition::Copy(CopyReason::NoFrontMatter));
    }

    Ok(Disposition::Process(Box::new(PendingPage {
        front_matter,
        body,
        content_type,
    })))
}

/// The file an action writes, if it writes one. Directories are not files.
pub fn target_path(
    entry: &SourceEntry,
    disposition: &Disposition,
    ctx: &DispatchContext<'_>,
) -> Result<Option<PathBuf>, PathError> {
    match disposition {
        Disposition::SkipSymlink | Disposition::CreateDirectory => Ok(None),
        Disposition::Copy(_) => paths::mirror_path(ctx.root, ctx.output, &entry.path).map(Some),
        Disposition::Process(_) => paths::record_path(ctx.root, ctx.output, &entry.path).map(Some),
    }
}

/// Classify an entry and carry out the resulting action.
pub fn dispatch(entry: &SourceEntry, ctx: &DispatchContext<'_>) -> Result<Outcome, DispatchError> {
    execute(entry, classify(entry)?, ctx)
}

/// Carry out an action decided by [`classify`].
pub fn execute(
    entry: &SourceEntry,
    disposition: Disposition,
    ctx: &DispatchContext<'_>,
) -> Result<Outcome, DispatchError> {
    match disposition {
        Disposition::SkipSymlink => Ok(Outcome::SkippedSymlink),
        Disposition::CreateDirectory => {
            fs::create_dir_all(paths::mirror_path(ctx.root, ctx.output, &entry.path)?)?;
            Ok(Outcome::DirectoryCreated)
        }
        Disposition::Copy(reason) => {
            let dest = paths::mirror_path(ctx.root, ctx.output, &entry.path)?;
            ensure_parent(&dest)?;
            fs::copy(&entry.path, &dest)?;
            Ok(Outcome::Copied(reason))
        }
        Disposition::Process(page) => process(entry, &page, ctx),
    }
}

fn process(
    entry: &SourceEntry,
    page: &PendingPage,
    ctx: &DispatchContext<'_>,
) -> Result<Outcome, DispatchError> {
    let source = PageSource {
        front_matter: &page.front_matter,
        body: &page.body,
        relative: &entry.relative,
        modified: entry.modified,
        content_type: page.content_type,
        content_path: paths::content_path(ctx.root, &entry.path)?,
    };
    let derived = metadata::derive(&source, &ctx.options);

    let dest = paths::record_path(ctx.root, ctx.output, &entry.path)?;
    ensure_parent(&dest)?;
    let content = ContentRecord {
        record: &derived.record,
        data: BASE64.encode(page.body.as_bytes()),
    };
    fs::write(&dest, serde_json::to_string_pretty(&content)?)?;

    Ok(Outcome::Processed {
        record: Box::new(derived.record),
        rejected_dates: derived.rejected_dates,
    })
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}
