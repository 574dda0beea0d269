//! # Webify
//!
//! A content-tree compiler for static sites. Point it at a directory of
//! markdown, HTML and text files with YAML front matter and it produces a
//! mirrored output tree: one JSON content record per page, every other file
//! copied verbatim, and a single `site.json` manifest listing every page.
//!
//! Rendering is somebody else's job. The output is plain data meant to be
//! consumed by a front end that fetches `site.json` and then the content
//! records it points to.
//!
//! # Architecture: One Pass, Three Phases
//!
//! ```text
//! 1. Walk      content/           →  Vec<SourceEntry>   (filtered, stable order)
//! 2. Dispatch  each SourceEntry   →  dist/...           (copy, mirror, or content record)
//! 3. Collect   outcomes           →  dist/site.json     (site fields + PageRecords)
//! ```
//!
//! Dispatch is the only parallel phase. Before it starts, every output file
//! is claimed by the first entry in walk order that writes it (`a.html` and
//! `a.md` both want `a.json`), so entries never contend. Outcomes are
//! collected back in walk order, which keeps `site.json` byte-for-byte
//! reproducible between builds of an unchanged tree.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `webify.json` location, loading and validation |
//! | [`pattern`] | Shell-style wildcard matching for include/exclude rules |
//! | [`walk`] | Recursive enumeration with hidden-path and output-dir pruning |
//! | [`paths`] | Source → output path mapping and URL-style path helpers |
//! | [`front_matter`] | YAML front-matter block extraction |
//! | [`metadata`] | Page metadata derivation: titles, dates, reading time, sections |
//! | [`dispatch`] | Per-entry classification and the copy / mirror / record actions |
//! | [`site`] | Build orchestration, output preparation and `site.json` |
//! | [`types`] | Serialized record types shared across modules (`PageRecord`) |
//! | [`output`] | CLI output formatting for build events, summaries and `check` |
//!
//! # Design Decisions
//!
//! ## Records Carry Base64 Bodies
//!
//! A content record embeds the page body as base64 in `data`. The front end
//! decodes it once and gets the exact bytes the author wrote after front
//! matter, with no JSON escaping surprises around HTML or unicode.
//!
//! ## Per-File Failures Don't Fail the Build
//!
//! One broken front-matter block should not keep the rest of the site from
//! building. Per-entry errors are reported as warnings and the entry is left
//! out; only problems with the build as a whole abort it.
//!
//! ## No Front Matter, No Page
//!
//! A text file becomes a page only if it opens with a `---` YAML block. Plain
//! markdown files (a `README.md`, say) are copied like any other asset.

pub mod config;
pub mod dispatch;
pub mod front_matter;
pub mod metadata;
pub mod output;
pub mod paths;
pub mod pattern;
pub mod site;
pub mod types;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;
