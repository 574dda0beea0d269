//! Page metadata derivation.
//!
//! Turns extracted front matter plus a few facts about the source file into a
//! [`PageRecord`]. Everything here is pure: the caller supplies the
//! modification time and content path, nothing touches the filesystem.
//!
//! ## Resolution rules
//!
//! Each field is resolved independently; the first available source wins.
//!
//! - **Title**: front matter `title` → file stem
//! - **Path**: front matter `path` → source-relative path, then the extension
//!   is stripped and a leading `/` enforced
//! - **Date**: front matter `date` → file modification time → -1
//! - **Expiry**: front matter `expiry` → -1
//! - **Published**: front matter `published` (an explicit `false` is honored) → true
//! - **Tags / alias**: front matter list → empty
//! - **Category / description / series**: front matter text → empty
//! - **Content type**: file extension only, front matter cannot override it
//! - **Section**: first configured section whose id prefixes the relative
//!   path, in configuration order (not longest match)
//!
//! A front-matter date that cannot be parsed resolves to -1 and is reported
//! in [`Derived::rejected_dates`]; it never fails the page.

use crate::config::{SectionKind, SiteSection};
use crate::front_matter::FrontMatter;
use crate::paths::{ensure_leading_slash, strip_extension};
use crate::types::{ContentType, PageRecord, PageType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_yaml::Value;
use std::time::SystemTime;

/// Average adult silent reading speed.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 238;

/// Sentinel for "no date".
pub const NO_DATE: i64 = -1;

/// Everything the deriver needs to know about one page.
#[derive(Debug, Clone)]
pub struct PageSource<'a> {
    pub front_matter: &'a FrontMatter,
    pub body: &'a str,
    /// Source-relative path, e.g. `posts/a.md`.
    pub relative: &'a str,
    pub modified: Option<SystemTime>,
    pub content_type: ContentType,
    /// Output-relative content record path, e.g. `/posts/a.json`.
    pub content_path: String,
}

/// Build-wide settings that influence derivation.
#[derive(Debug, Clone, Copy)]
pub struct DeriveOptions<'a> {
    pub words_per_minute: u32,
    pub sections: &'a [SiteSection],
}

impl Default for DeriveOptions<'_> {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            sections: &[],
        }
    }
}

/// A front-matter date value that could not be understood.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedDate {
    pub field: &'static str,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Derived {
    pub record: PageRecord,
    pub rejected_dates: Vec<RejectedDate>,
}

pub fn derive(source: &PageSource<'_>, options: &DeriveOptions<'_>) -> Derived {
    let fm = source.front_matter;
    let mut rejected_dates = Vec::new();

    let stem = file_stem(source.relative);
    let title = resolve(&[fm.text("title").as_deref(), Some(stem)]).unwrap_or_default();

    let path = ensure_leading_slash(strip_extension(
        &resolve(&[fm.text("path").as_deref(), Some(source.relative)]).unwrap_or_default(),
    ));

    let date = resolve_date(fm.get("date"), source.modified).unwrap_or_else(|value| {
        rejected_dates.push(RejectedDate {
            field: "date",
            value,
        });
        NO_DATE
    });
    let expiry = resolve_date(fm.get("expiry"), None).unwrap_or_else(|value| {
        rejected_dates.push(RejectedDate {
            field: "expiry",
            value,
        });
        NO_DATE
    });

    let section = find_section(options.sections, source.relative);
    let page_type = match section.map(|s| s.kind) {
        Some(SectionKind::Blog) => PageType::Post,
        _ => PageType::Page,
    };

    let record = PageRecord {
        id: source.relative.to_string(),
        title,
        path,
        category: fm.text("category").unwrap_or_default(),
        description: fm.text("description").unwrap_or_default(),
        date,
        published: fm.flag("published").unwrap_or(true),
        expiry,
        tags: fm.list("tags"),
        series: fm.text("series").unwrap_or_default(),
        alias: fm.list("alias"),
        content_type: source.content_type,
        reading_time: reading_time(source.body, options.words_per_minute),
        content_path: source.content_path.clone(),
        page_type,
        section: section.map(|s| s.id.clone()).unwrap_or_default(),
    };

    Derived {
        record,
        rejected_dates,
    }
}

/// First candidate that still has text after trimming, best candidate first.
/// Blank front-matter values fall through to the next source.
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .flatten()
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Minutes needed to read `body`, rounded up. An empty body reads in 0.
pub fn reading_time(body: &str, words_per_minute: u32) -> u64 {
    let words = body.split_whitespace().count() as u64;
    words.div_ceil(u64::from(words_per_minute.max(1)))
}

/// Resolve a date field to epoch millis.
///
/// A present, non-blank value must parse; on failure the raw value is
/// returned as the error. An absent or blank value falls back to `fallback`,
/// then to [`NO_DATE`]. Integers are taken as epoch millis.
pub fn resolve_date(value: Option<&Value>, fallback: Option<SystemTime>) -> Result<i64, String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => {
            parse_date(s).ok_or_else(|| s.clone())
        }
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| n.to_string()),
        Some(Value::Null) | Some(Value::String(_)) | None => {
            Ok(fallback.map(system_time_millis).unwrap_or(NO_DATE))
        }
        Some(other) => Err(format!("{other:?}")),
    }
}

/// Parse a date string to epoch millis. Naive dates and times are UTC.
pub fn parse_date(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp_millis());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn system_time_millis(t: SystemTime) -> i64 {
    DateTime::<Utc>::from(t).timestamp_millis()
}

/// First section (in configured order) whose id prefixes `relative`.
pub fn find_section<'a>(sections: &'a [SiteSection], relative: &str) -> Option<&'a SiteSection> {
    let relative = relative.trim_start_matches('/');
    sections.iter().find(|s| relative.starts_with(s.id.as_str()))
}

fn file_stem(relative: &str) -> &str {
    let name = relative.rsplit('/').next().unwrap_or(relative);
    strip_extension(name)
}
