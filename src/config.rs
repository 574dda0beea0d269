//! Site configuration module.
//!
//! Handles locating, loading and validating `webify.json`. The file lives at
//! the root of the content tree; its directory is the source root of the
//! build.
//!
//! ## Configuration Options
//!
//! ```json
//! {
//!   "title": "My Site",
//!   "baseUrl": "https://example.com",
//!   "name": "example",
//!   "icon": "/favicon.png",
//!   "author": { "name": "Jane", "email": "jane@example.com", "url": "https://example.com" },
//!   "socials": [{ "type": "github", "url": "https://github.com/jane" }],
//!   "sections": [
//!     { "id": "blog", "title": "Blog", "description": "Posts", "type": "blog", "feed": true },
//!     { "id": "links", "title": "Links", "description": "Elsewhere", "type": "link" }
//!   ],
//!   "build": {
//!     "include": [],          // wildcard rules, empty = everything
//!     "exclude": ["*.bak"],
//!     "output": "dist",       // relative to the config file's directory
//!     "wordsPerMinute": 238,
//!     "maxProcesses": 4       // omit for all cores
//!   },
//!   "theme": { "any": "value" }
//! }
//! ```
//!
//! `theme` and `socials` are never interpreted, only copied into `site.json`.
//! Keys webify does not know are ignored, so a front end can keep its own
//! settings in the same file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up in a content directory.
pub const CONFIG_FILE_NAME: &str = "webify.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `webify.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub title: String,
    pub base_url: String,
    pub name: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    /// Social links, passed through to the manifest untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socials: Option<serde_json::Value>,
    /// Content sections, matched against page paths in this order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<SiteSection>>,
    pub build: BuildOptions,
    /// Front-end theme settings, passed through to the manifest untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub email: String,
    pub url: String,
}

/// What a section holds. Pages in a `blog` section become posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Blog,
    Link,
}

/// A named partition of the site, matched by path prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSection {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed: Option<bool>,
    #[serde(rename = "type")]
    pub kind: SectionKind,
}

/// Settings for the build itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildOptions {
    /// Wildcard rules an entry must match one of (empty = all).
    pub include: Vec<String>,
    /// Wildcard rules that drop an entry; these win over includes.
    pub exclude: Vec<String>,
    /// Output directory, relative to the config file's directory.
    pub output: String,
    pub words_per_minute: u32,
    /// Maximum number of parallel workers. `None` uses all cores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            output: "dist".to_string(),
            words_per_minute: crate::metadata::DEFAULT_WORDS_PER_MINUTE,
            max_processes: None,
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build.words_per_minute == 0 {
            return Err(ConfigError::Validation(
                "build.wordsPerMinute must be greater than 0".into(),
            ));
        }
        if self.build.output.trim().is_empty() {
            return Err(ConfigError::Validation(
                "build.output must not be empty".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for section in self.sections() {
            if section.id.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "section id must not be empty".into(),
                ));
            }
            if !seen.insert(section.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate section id: {}",
                    section.id
                )));
            }
        }
        Ok(())
    }

    /// Configured sections, empty when none are configured.
    pub fn sections(&self) -> &[SiteSection] {
        self.sections.as_deref().unwrap_or_default()
    }

    /// Output directory resolved against the source root.
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.build.output)
    }
}

/// Worker threads for a build: `build.maxProcesses` when set, never more
/// than the machine has cores, and every core when unset.
pub fn effective_threads(build: &BuildOptions) -> usize {
    let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
    match build.max_processes {
        Some(wanted) => wanted.clamp(1, cores),
        None => cores,
    }
}

/// Find the config file for a CLI argument.
///
/// - a directory → `<dir>/webify.json`
/// - a file → that file
/// - nothing → `./webify.json`
///
/// The result is absolute so its parent is always a usable source root.
pub fn resolve_config_path(arg: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = match arg {
        Some(p) if p.is_dir() => p.join(CONFIG_FILE_NAME),
        Some(p) => p.to_path_buf(),
        None => {
            log::info!("no config file given, using {CONFIG_FILE_NAME}");
            PathBuf::from(CONFIG_FILE_NAME)
        }
    };
    Ok(std::path::absolute(path)?)
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate config JSON.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// A starter config with every option filled in, for `gen-config`.
pub fn example_config() -> SiteConfig {
    SiteConfig {
        title: "My Site".to_string(),
        base_url: "https://example.com".to_string(),
        name: "my-site".to_string(),
        icon: "/favicon.png".to_string(),
        author: Some(Author {
            name: "Your Name".to_string(),
            email: "you@example.com".to_string(),
            url: "https://example.com".to_string(),
        }),
        socials: Some(serde_json::json!([
            { "type": "github", "url": "https://github.com/you" }
        ])),
        sections: Some(vec![
            SiteSection {
                id: "blog".to_string(),
                title: "Blog".to_string(),
                description: "Writing".to_string(),
                archive: Some(true),
                feed: Some(true),
                kind: SectionKind::Blog,
            },
            SiteSection {
                id: "links".to_string(),
                title: "Links".to_string(),
                description: "Elsewhere on the web".to_string(),
                archive: None,
                feed: None,
                kind: SectionKind::Link,
            },
        ]),
        build: BuildOptions {
            exclude: vec!["*.bak".to_string(), "drafts/*".to_string()],
            ..BuildOptions::default()
        },
        theme: Some(serde_json::json!({})),
    }
}
