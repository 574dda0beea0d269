//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Pages are listed by their positional index and title; the source path
//! or written record is shown as secondary context. Files that are copied or
//! skipped are listed by their root-relative path, since the path is all the
//! identity they have.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Pages
//!     001 Hello, World
//!         Source: blog/first-post.md
//!
//! Copied
//!     assets/logo.png
//!     notes.md (no front matter)
//!
//! Errors
//!     drafts/bad.md: Front matter error: ...
//!
//! 1 page, 2 copied, 1 error
//! ```
//!
//! ## Build
//!
//! Progress goes through the logger one line per [`BuildEvent`]; the final
//! summary is printed to stdout:
//!
//! ```text
//! Pages
//!     001 Hello, World (blog) → /blog/first-post.json
//!     002 About → /about.json
//!
//! Built 2 pages in 0.01s
//! ```
//!
//! # Architecture
//!
//! Every display has a `format_*` function (pure, returns lines) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::dispatch::{CopyReason, DispatchError, Disposition};
use crate::metadata;
use crate::site::{BuildEvent, SiteManifest};
use crate::walk::SourceEntry;
use std::path::Path;
use std::time::Duration;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn copy_note(reason: CopyReason) -> &'static str {
    match reason {
        CopyReason::Binary => "",
        CopyReason::NoFrontMatter => " (no front matter)",
    }
}

// ============================================================================
// Build events
// ============================================================================

/// Format a build event as a single log line.
pub fn format_build_event(event: &BuildEvent) -> String {
    match event {
        BuildEvent::Started {
            root,
            output,
            entries,
        } => format!(
            "Building {} \u{2192} {} ({})",
            root.display(),
            output.display(),
            plural(*entries, "entry", "entries")
        ),
        BuildEvent::SymlinkSkipped { relative } => format!("{relative}: symlink skipped"),
        BuildEvent::DirectoryCreated { relative } => format!("{relative}/"),
        BuildEvent::Copied { relative, reason } => {
            format!("{relative}: copied{}", copy_note(*reason))
        }
        BuildEvent::PageWritten {
            relative,
            content_path,
        } => format!("{relative} \u{2192} {content_path}"),
        BuildEvent::DateRejected {
            relative,
            field,
            value,
        } => format!("{relative}: could not parse {field} {value:?}, recorded as -1"),
        BuildEvent::Failed { relative, error } => format!("{relative}: {error}"),
        BuildEvent::ManifestWritten { path, pages } => format!(
            "Wrote {} ({})",
            path.display(),
            plural(*pages, "page", "pages")
        ),
    }
}

// ============================================================================
// Build summary
// ============================================================================

/// Format the page list and totals of a finished build.
pub fn format_summary(manifest: &SiteManifest, elapsed: Duration) -> Vec<String> {
    let mut lines = Vec::new();

    if !manifest.pages.is_empty() {
        lines.push("Pages".to_string());
        for (i, page) in manifest.pages.iter().enumerate() {
            let section = if page.section.is_empty() {
                String::new()
            } else {
                format!(" ({})", page.section)
            };
            lines.push(format!(
                "{}{} {}{} \u{2192} {}",
                indent(1),
                format_index(i + 1),
                page.title,
                section,
                page.content_path
            ));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "Built {} in {:.2}s",
        plural(manifest.pages.len(), "page", "pages"),
        elapsed.as_secs_f64()
    ));
    lines
}

pub fn print_summary(manifest: &SiteManifest, elapsed: Duration) {
    for line in format_summary(manifest, elapsed) {
        println!("{}", line);
    }
}

// ============================================================================
// Check (dry run)
// ============================================================================

/// Format what a build would do with each entry.
///
/// Pages show the title the build would resolve for them, falling back to
/// the file stem.
pub fn format_check_output(
    planned: &[(SourceEntry, Result<Disposition, DispatchError>)],
) -> Vec<String> {
    let mut page_count = 0;
    let mut pages = Vec::new();
    let mut copied = Vec::new();
    let mut skipped = Vec::new();
    let mut errors = Vec::new();

    for (entry, disposition) in planned {
        match disposition {
            Ok(Disposition::Process(page)) => {
                let stem = Path::new(&entry.relative)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let fm_title = page.front_matter.text("title");
                let title = metadata::resolve(&[fm_title.as_deref(), Some(stem.as_str())])
                    .unwrap_or_default();
                page_count += 1;
                pages.push(format!("{}{} {}", indent(1), format_index(page_count), title));
                pages.push(format!("{}Source: {}", indent(2), entry.relative));
            }
            Ok(Disposition::Copy(reason)) => {
                copied.push(format!("{}{}{}", indent(1), entry.relative, copy_note(*reason)));
            }
            Ok(Disposition::SkipSymlink) => {
                skipped.push(format!("{}{} (symlink)", indent(1), entry.relative));
            }
            Ok(Disposition::CreateDirectory) => {}
            Err(err) => errors.push(format!("{}{}: {}", indent(1), entry.relative, err)),
        }
    }

    let copy_count = copied.len();
    let error_count = errors.len();

    let mut lines = Vec::new();
    for (header, group) in [
        ("Pages", pages),
        ("Copied", copied),
        ("Skipped", skipped),
        ("Errors", errors),
    ] {
        if group.is_empty() {
            continue;
        }
        lines.push(header.to_string());
        lines.extend(group);
        lines.push(String::new());
    }

    let mut totals = vec![
        plural(page_count, "page", "pages"),
        format!("{copy_count} copied"),
    ];
    if error_count > 0 {
        totals.push(plural(error_count, "error", "errors"));
    }
    lines.push(totals.join(", "));
    lines
}

pub fn print_check_output(planned: &[(SourceEntry, Result<Disposition, DispatchError>)]) {
    for line in format_check_output(planned) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
