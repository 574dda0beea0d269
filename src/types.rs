//! Types serialized into the build output.
//!
//! [`PageRecord`] appears twice on disk: once inside `site.json` and once,
//! flattened next to the encoded body, in the page's own content record. Both
//! use camelCase keys so the front-end reads them without remapping.

use serde::{Deserialize, Serialize};

/// Content type of a page, derived from the source file extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Markdown,
    Html,
    Text,
    Unknown,
}

impl ContentType {
    /// Map an extension (without the dot, any case) to a content type.
    ///
    /// This table is also the set of text extensions: anything mapping to
    /// [`ContentType::Unknown`] is treated as a binary asset.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Self::Markdown,
            "html" | "htm" => Self::Html,
            "txt" | "text" => Self::Text,
            _ => Self::Unknown,
        }
    }

    pub fn is_text(self) -> bool {
        self != Self::Unknown
    }
}

/// Whether a page belongs to a blog section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Post,
    #[default]
    Page,
}

/// Metadata for one processed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// Source-relative path, unique within a build.
    pub id: String,
    pub title: String,
    /// Public path: leading slash, no extension.
    pub path: String,
    pub category: String,
    pub description: String,
    /// Creation date in epoch millis, -1 when unknown.
    pub date: i64,
    pub published: bool,
    /// Expiry date in epoch millis, -1 when none.
    pub expiry: i64,
    pub tags: Vec<String>,
    pub series: String,
    pub alias: Vec<String>,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Estimated reading time in whole minutes.
    pub reading_time: u64,
    /// Output-relative path of this page's content record.
    pub content_path: String,
    pub page_type: PageType,
    /// Id of the first configured section whose id prefixes the page id.
    pub section: String,
}

/// The per-page JSON file: the record plus the base64-encoded body.
#[derive(Debug, Serialize)]
pub struct ContentRecord<'a> {
    #[serde(flatten)]
    pub record: &'a PageRecord,
    pub data: String,
}
