//! Wildcard matching for the `build.include` / `build.exclude` rules.
//!
//! Patterns use two wildcards:
//!
//! - `*` matches zero or more characters (including `/`)
//! - `?` matches exactly one character
//!
//! Everything else is literal. A pattern is compiled into an anchored,
//! case-insensitive regular expression, so it must consume the whole
//! candidate: `*.md` matches `post.md` but not `post.md.bak`.
//!
//! Candidates are root-relative paths with forward slashes and no leading
//! separator, e.g. `posts/2024/hello.md`.

use regex::Regex;

/// A compiled wildcard pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&wildcard_to_regex(pattern))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

/// Translate a wildcard pattern into an anchored, case-insensitive regex.
fn wildcard_to_regex(pattern: &str) -> String {
    let mut re = String::with_capacity(pattern.len() + 8);
    re.push_str("(?is)^");
    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '*' | '?' => {
                re.push_str(&regex::escape(&literal));
                literal.clear();
                re.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    re.push_str(&regex::escape(&literal));
    re.push('$');
    re
}

/// One-shot match of `candidate` against a wildcard `pattern`.
///
/// Prefer [`Pattern`] or [`PatternSet`] when matching many candidates.
pub fn matches(pattern: &str, candidate: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.is_match(candidate))
        .unwrap_or(false)
}

/// Compiled include and exclude rules.
///
/// An entry is admitted when it matches at least one include (or there are
/// no includes) and matches no exclude. Excludes always win.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl PatternSet {
    pub fn new<I, E>(includes: I, excludes: E) -> Result<Self, regex::Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let includes = includes
            .into_iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let excludes = excludes
            .into_iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { includes, excludes })
    }

    /// Decide whether a root-relative path survives the rules.
    pub fn admits(&self, relative: &str) -> bool {
        let relative = relative.trim_start_matches('/');

        if !self.includes.is_empty() && !self.includes.iter().any(|p| p.is_match(relative)) {
            log::debug!("excluding {relative}: matches no include rule");
            return false;
        }

        if let Some(rule) = self.excludes.iter().find(|p| p.is_match(relative)) {
            log::debug!("excluding {relative}: matches exclude rule {}", rule.as_str());
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // matches()
    // =========================================================================

    #[test]
    fn star_matches_suffix() {
        assert!(matches("*.md", "post.md"));
        assert!(matches("*.md", "posts/2024/post.md"));
    }

    #[test]
    fn full_string_must_be_consumed() {
        assert!(!matches("*.md", "post.md.bak"));
        assert!(!matches("post", "post.md"));
    }

    #[test]
    fn match_is_case_insensitive() {
        assert!(matches("*.MD", "post.md"));
        assert!(matches("Drafts/*", "drafts/x.md"));
    }

    #[test]
    fn question_mark_matches_exactly_one_char() {
        assert!(matches("post?.md", "post1.md"));
        assert!(!matches("post?.md", "post.md"));
        assert!(!matches("post?.md", "post12.md"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        assert!(matches("a+b(1).md", "a+b(1).md"));
        assert!(!matches("a.md", "aXmd"));
        assert!(matches("[draft]*", "[draft] notes.txt"));
        assert!(matches("$^|{}", "$^|{}"));
    }

    #[test]
    fn empty_pattern_matches_only_empty_string() {
        assert!(matches("", ""));
        assert!(!matches("", "a"));
    }

    #[test]
    fn star_alone_matches_everything() {
        assert!(matches("*", ""));
        assert!(matches("*", "any/path/at/all.png"));
    }

    // =========================================================================
    // PatternSet
    // =========================================================================

    #[test]
    fn no_rules_admits_everything() {
        let set = PatternSet::default();
        assert!(set.admits("posts/a.md"));
    }

    #[test]
    fn include_requires_a_match() {
        let set = PatternSet::new(["*.md", "*.png"], Vec::<String>::new()).unwrap();
        assert!(set.admits("a.md"));
        assert!(set.admits("img/logo.png"));
        assert!(!set.admits("notes.txt"));
    }

    #[test]
    fn exclude_dominates_include() {
        let set = PatternSet::new(["*.md"], ["drafts/*"]).unwrap();
        assert!(set.admits("posts/a.md"));
        assert!(!set.admits("drafts/a.md"));
    }

    #[test]
    fn leading_separator_is_ignored() {
        let set = PatternSet::new(["posts/*"], Vec::<String>::new()).unwrap();
        assert!(set.admits("/posts/a.md"));
    }
}
