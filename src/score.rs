//! Match scoring, highlighting and abbreviation

use std::fmt;

use regex::Captures;

use crate::types::SEPARATOR;

/// One maximal fragment of a matched string
///
/// Fragments tagged `inside` belong to the literal query characters;
/// untagged fragments are filler between them. Adjacent fragments with the
/// same tag are merged while the match result is built.
#[derive(Debug)]
pub struct CharacterRun {
    /// The fragment's characters
    pub text:   String,
    /// Whether the fragment belongs to the query pattern
    pub inside: bool,
}

impl fmt::Display for CharacterRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inside {
            write!(f, "({})", self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

/// Score and rendering for one matched path component
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Relevance between 0 and 1
    pub score:  f32,
    /// The component with matched characters parenthesized
    pub text:   String,
    /// Set when the component failed to match; the score is then moot and
    /// every file beneath the component is suppressed
    pub missed: bool,
}

/// Derive the score and highlighted rendering from a successful match
///
/// Skipping the implicit whole-match group, the capture list alternates
/// filler and literal fragments: odd-positioned captures are the query's
/// literal characters, even-positioned ones are filler. Adjacent fragments
/// with the same tag merge into one run. The score multiplies two ratios:
/// `inside_segments` over the number of inside runs (fewer, more contiguous
/// runs are better) and matched characters over all captured characters,
/// separators excluded (better coverage of the candidate is better).
#[allow(clippy::cast_precision_loss)]
pub fn build_match_result(captures: &Captures<'_>, inside_segments: usize) -> MatchResult {
    let mut runs: Vec<CharacterRun> = Vec::new();
    let mut inside_chars = 0_usize;
    let mut total_chars = 0_usize;

    for (index, group) in captures.iter().skip(1).enumerate() {
        let Some(capture) = group else {
            continue;
        };
        let fragment = capture.as_str();
        if fragment.is_empty() {
            continue;
        }

        let inside = index % 2 == 1;
        total_chars += fragment.chars().filter(|&c| c != SEPARATOR).count();
        if inside {
            inside_chars += fragment.chars().count();
        }

        match runs.last_mut() {
            Some(last) if last.inside == inside => last.text.push_str(fragment),
            _ => runs.push(CharacterRun { text: fragment.to_string(), inside }),
        }
    }

    let inside_runs = runs.iter().filter(|run| run.inside).count();
    let run_ratio =
        if inside_runs == 0 { 1.0 } else { inside_segments as f32 / inside_runs as f32 };
    let char_ratio =
        if total_chars == 0 { 1.0 } else { inside_chars as f32 / total_chars as f32 };

    let text = runs.iter().map(ToString::to_string).collect::<String>();
    MatchResult { score: run_ratio * char_ratio, text, missed: false }
}

/// Collapse unhighlighted path components to their first character
///
/// Components of the highlighted directory that carry no highlight marker
/// shrink to one character; matched components are kept verbatim. The result
/// reads like `a/(m)odels` and stays scannable at a glance.
pub fn abbreviate(highlighted_directory: &str) -> String {
    let separator = SEPARATOR.to_string();
    highlighted_directory
        .split(SEPARATOR)
        .map(|component| {
            if component.contains('(') {
                component.to_string()
            } else {
                component.chars().next().map_or_else(String::new, |c| c.to_string())
            }
        })
        .collect::<Vec<_>>()
        .join(&separator)
}
