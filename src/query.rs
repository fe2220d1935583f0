//! Query compilation into positional character-capture patterns

use regex::{Captures, Regex, RegexBuilder};

use crate::error::{Error, Result};
use crate::types::SEPARATOR;

/// Build the raw pattern source for one query segment
///
/// Every character becomes a literal capture, with a non-greedy
/// "zero or more non-separator characters" capture between consecutive
/// literals: `"foo"` compiles to `(f)([^/]*?)(o)([^/]*?)(o)`. The literal
/// captures and the fillers alternate, which is what lets the scorer later
/// tell matched query characters apart from filler. An empty segment
/// compiles to a single empty capture and matches everything.
#[must_use]
pub fn make_pattern(segment: &str) -> String {
    if segment.is_empty() {
        return "()".to_string();
    }

    let separator = regex::escape(&SEPARATOR.to_string());
    let mut source = String::new();
    for character in segment.chars() {
        if !source.is_empty() {
            source.push_str(&format!("([^{separator}]*?)"));
        }
        source.push('(');
        source.push_str(&regex::escape(&character.to_string()));
        source.push(')');
    }
    source
}

/// Build the raw pattern source for the directory segments of a query
///
/// Segment patterns are joined with a capture requiring at least one
/// separator between them, so each query segment must match in a distinct,
/// strictly later path component. Leading and trailing "any characters"
/// captures let the match sit at any depth.
#[must_use]
pub fn make_path_pattern(segments: &[&str]) -> String {
    let separator = regex::escape(&SEPARATOR.to_string());
    let joiner = format!("(.*?{separator}.*?)");
    let body = segments.iter().copied().map(make_pattern).collect::<Vec<_>>().join(&joiner);
    format!("^(.*?){body}(.*?)$")
}

/// Compiled pattern for the file-name segment of a query
#[derive(Debug)]
pub struct FilePattern {
    regex: Regex,
}

impl FilePattern {
    /// Compile the file-name segment of a query
    ///
    /// The segment pattern is wrapped in leading and trailing "any
    /// characters" captures so the match need not anchor to the whole name.
    /// Matching is case-insensitive.
    ///
    /// # Errors
    /// Returns [`Error::Pattern`] if the compiled pattern is rejected by the
    /// regex engine.
    pub fn compile(segment: &str) -> Result<Self> {
        let source = format!("^(.*?){}(.*)$", make_pattern(segment));
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::pattern(&format!("unusable file pattern: {e}")))?;
        Ok(Self { regex })
    }

    pub(crate) fn captures<'t>(&self, name: &'t str) -> Option<Captures<'t>> {
        self.regex.captures(name)
    }
}

/// Compiled pattern for the directory segments of a query
#[derive(Debug)]
pub struct PathPattern {
    regex:    Regex,
    segments: usize,
}

impl PathPattern {
    /// Compile the directory segments of a query
    ///
    /// # Errors
    /// Returns [`Error::Pattern`] if the compiled pattern is rejected by the
    /// regex engine.
    pub fn compile(segments: &[&str]) -> Result<Self> {
        let source = make_path_pattern(segments);
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::pattern(&format!("unusable path pattern: {e}")))?;
        Ok(Self { regex, segments: segments.len() })
    }

    /// Number of query segments this pattern was compiled from
    #[must_use]
    pub const fn segments(&self) -> usize {
        self.segments
    }

    pub(crate) fn captures<'t>(&self, name: &'t str) -> Option<Captures<'t>> {
        self.regex.captures(name)
    }
}

/// Directory constraint of a query: a compiled pattern, or none at all
///
/// A query without directory segments constrains nothing; every directory
/// matches trivially with a full score.
#[derive(Debug)]
pub enum PathFilter {
    /// The query carries directory segments that candidates must satisfy
    Constrained(PathPattern),
    /// The query names only a file; directories match unconditionally
    Unconstrained,
}

/// Compiled stripper for the shared root prefix
///
/// Candidate names are stripped of the longest common root prefix before
/// matching, so results read as paths relative to the common ancestor.
#[derive(Debug)]
pub struct PrefixPattern {
    regex: Regex,
}

impl PrefixPattern {
    /// Compile a stripper for the given shared prefix
    ///
    /// An empty prefix compiles to a pattern that strips nothing.
    ///
    /// # Errors
    /// Returns [`Error::Pattern`] if the compiled pattern is rejected by the
    /// regex engine.
    pub fn compile(prefix: &str) -> Result<Self> {
        let mut source = format!("^{}", regex::escape(prefix));
        if !prefix.is_empty() {
            source.push_str(&regex::escape(&SEPARATOR.to_string()));
        }
        let regex = Regex::new(&source)
            .map_err(|e| Error::pattern(&format!("unusable prefix pattern: {e}")))?;
        Ok(Self { regex })
    }

    /// Strip the shared prefix (and its trailing separator) from a candidate
    #[must_use]
    pub fn strip<'t>(&self, candidate: &'t str) -> std::borrow::Cow<'t, str> {
        self.regex.replace(candidate, "")
    }
}
