//! Site manifest assembly.
//!
//! [`build`] runs the whole pipeline for one content tree:
//!
//! ```text
//! prepare output   create dist/, or empty it if it exists
//! walk             enumerate entries (hidden and dist/ pruned, include/exclude applied)
//! classify         decide what each entry becomes (parallel, order preserved)
//! claim            give each output file to the first entry writing it
//! dispatch         act on every entry (parallel, order preserved)
//! collect          append page records in walk order, emit one event per entry
//! write            dist/site.json
//! ```
//!
//! ## Output
//!
//! ```text
//! dist/
//! ├── site.json            # SiteManifest: site fields + every PageRecord
//! ├── posts/
//! │   ├── hello.json       # content record for posts/hello.md
//! │   └── cover.png        # copied verbatim
//! └── notes.txt            # text without front matter, copied verbatim
//! ```
//!
//! ## Failure model
//!
//! Problems with a single entry (unreadable file, broken front matter, copy
//! failure) become a [`BuildEvent::Failed`] and the entry contributes nothing;
//! the rest of the build carries on. Only problems with the build as a whole
//! (missing root, unusable output directory, manifest write) are returned as
//! [`BuildError`]. Output preparation is not transactional: a failed build can
//! leave a partially populated output directory.

use crate::config::{Author, SiteConfig, SiteSection};
use crate::dispatch::{self, CopyReason, DispatchContext, DispatchError, Disposition, Outcome};
use crate::metadata::DeriveOptions;
use crate::pattern::PatternSet;
use crate::types::PageRecord;
use crate::walk::{SourceEntry, WalkError, Walker};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Name of the manifest file written at the output root.
pub const MANIFEST_FILE_NAME: &str = "site.json";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error("Refusing to use {output} as output: it contains the source root {root}")]
    UnsafeOutput { root: PathBuf, output: PathBuf },
}

/// The build's root output object, written to `site.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteManifest {
    pub title: String,
    pub base_url: String,
    pub name: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<SiteSection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socials: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<serde_json::Value>,
    pub pages: Vec<PageRecord>,
}

impl SiteManifest {
    /// An empty manifest carrying the site-level fields of `config`.
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            base_url: config.base_url.clone(),
            name: config.name.clone(),
            icon: config.icon.clone(),
            author: config.author.clone(),
            sections: config.sections.clone(),
            socials: config.socials.clone(),
            theme: config.theme.clone(),
            pages: Vec::new(),
        }
    }
}

/// Progress and diagnostics emitted while building.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    Started {
        root: PathBuf,
        output: PathBuf,
        entries: usize,
    },
    SymlinkSkipped {
        relative: String,
    },
    DirectoryCreated {
        relative: String,
    },
    Copied {
        relative: String,
        reason: CopyReason,
    },
    PageWritten {
        relative: String,
        content_path: String,
    },
    DateRejected {
        relative: String,
        field: &'static str,
        value: String,
    },
    Failed {
        relative: String,
        error: String,
    },
    ManifestWritten {
        path: PathBuf,
        pages: usize,
    },
}

impl BuildEvent {
    /// Per-entry progress is debug output; anything the author should look
    /// at is a warning.
    pub fn level(&self) -> log::Level {
        match self {
            Self::Started { .. } | Self::ManifestWritten { .. } => log::Level::Info,
            Self::DirectoryCreated { .. } | Self::Copied { .. } | Self::PageWritten { .. } => {
                log::Level::Debug
            }
            Self::SymlinkSkipped { .. } | Self::DateRejected { .. } | Self::Failed { .. } => {
                log::Level::Warn
            }
        }
    }
}

/// Build the site rooted at `root` into `output`.
///
/// Events are sent to `events` as entries are collected; the sender is
/// dropped when the build returns, which ends any receiving loop.
pub fn build(
    root: &Path,
    output: &Path,
    config: &SiteConfig,
    events: Option<Sender<BuildEvent>>,
) -> Result<SiteManifest, BuildError> {
    let emit = |event: BuildEvent| {
        if let Some(tx) = &events {
            let _ = tx.send(event);
        }
    };

    let root = canonical_root(root)?;
    let output = prepare_output(&root, output)?;
    let entries = source_entries(&root, &output, config)?;
    emit(BuildEvent::Started {
        root: root.clone(),
        output: output.clone(),
        entries: entries.len(),
    });

    let ctx = DispatchContext {
        root: &root,
        output: &output,
        options: DeriveOptions {
            words_per_minute: config.build.words_per_minute,
            sections: config.sections(),
        },
    };
    let decided: Vec<Result<Disposition, DispatchError>> =
        entries.par_iter().map(dispatch::classify).collect();
    let jobs = claim_targets(&entries, decided, &ctx);
    let outcomes: Vec<Result<Outcome, DispatchError>> = entries
        .par_iter()
        .zip(jobs.into_par_iter())
        .map(|(entry, job)| job.and_then(|d| dispatch::execute(entry, d, &ctx)))
        .collect();

    let mut manifest = SiteManifest::from_config(config);
    for (entry, outcome) in entries.iter().zip(outcomes) {
        let relative = entry.relative.clone();
        match outcome {
            Ok(Outcome::SkippedSymlink) => emit(BuildEvent::SymlinkSkipped { relative }),
            Ok(Outcome::DirectoryCreated) => emit(BuildEvent::DirectoryCreated { relative }),
            Ok(Outcome::Copied(reason)) => emit(BuildEvent::Copied { relative, reason }),
            Ok(Outcome::Processed {
                record,
                rejected_dates,
            }) => {
                for rejected in rejected_dates {
                    emit(BuildEvent::DateRejected {
                        relative: relative.clone(),
                        field: rejected.field,
                        value: rejected.value,
                    });
                }
                emit(BuildEvent::PageWritten {
                    relative,
                    content_path: record.content_path.clone(),
                });
                manifest.pages.push(*record);
            }
            Err(err) => emit(BuildEvent::Failed {
                relative,
                error: err.to_string(),
            }),
        }
    }

    let manifest_path = output.join(MANIFEST_FILE_NAME);
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
    emit(BuildEvent::ManifestWritten {
        path: manifest_path,
        pages: manifest.pages.len(),
    });

    Ok(manifest)
}

/// Classify every entry without writing anything.
pub fn plan(
    root: &Path,
    output: &Path,
    config: &SiteConfig,
) -> Result<Vec<(SourceEntry, Result<Disposition, DispatchError>)>, BuildError> {
    let root = canonical_root(root)?;
    let output = if output.exists() {
        fs::canonicalize(output)?
    } else {
        std::path::absolute(output)?
    };
    let entries = source_entries(&root, &output, config)?;
    let ctx = DispatchContext {
        root: &root,
        output: &output,
        options: DeriveOptions {
            words_per_minute: config.build.words_per_minute,
            sections: config.sections(),
        },
    };
    let decided = entries.iter().map(dispatch::classify).collect();
    let jobs = claim_targets(&entries, decided, &ctx);
    Ok(entries.into_iter().zip(jobs).collect())
}

/// Create `output`, or empty it if it already exists.
///
/// Returns the canonical output path. Refuses an output directory that is,
/// or contains, the source root.
pub fn prepare_output(root: &Path, output: &Path) -> Result<PathBuf, BuildError> {
    fs::create_dir_all(output)?;
    let output = fs::canonicalize(output)?;
    if root.starts_with(&output) {
        return Err(BuildError::UnsafeOutput {
            root: root.to_path_buf(),
            output,
        });
    }

    for entry in fs::read_dir(&output)? {
        let path = entry?.path();
        if fs::symlink_metadata(&path)?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(output)
}

/// Give every output file to the first entry, in walk order, that writes it.
/// Later entries aiming at the same file fail instead of racing for it.
fn claim_targets(
    entries: &[SourceEntry],
    decided: Vec<Result<Disposition, DispatchError>>,
    ctx: &DispatchContext<'_>,
) -> Vec<Result<Disposition, DispatchError>> {
    let mut claimed: HashMap<PathBuf, &str> = HashMap::new();
    entries
        .iter()
        .zip(decided)
        .map(|(entry, disposition)| {
            let disposition = disposition?;
            if let Some(target) = dispatch::target_path(entry, &disposition, ctx)? {
                if let Some(first) = claimed.get(&target) {
                    return Err(DispatchError::TargetTaken {
                        target,
                        first: first.to_string(),
                    });
                }
                claimed.insert(target, &entry.relative);
            }
            Ok(disposition)
        })
        .collect()
}

fn canonical_root(root: &Path) -> Result<PathBuf, BuildError> {
    if !root.is_dir() {
        return Err(WalkError::NotADirectory(root.to_path_buf()).into());
    }
    Ok(fs::canonicalize(root)?)
}

fn source_entries(
    root: &Path,
    output: &Path,
    config: &SiteConfig,
) -> Result<Vec<SourceEntry>, BuildError> {
    let patterns = PatternSet::new(&config.build.include, &config.build.exclude)
        .map_err(WalkError::from)?;
    Ok(Walker::new(root, patterns).skip_dir(output).walk()?)
}
