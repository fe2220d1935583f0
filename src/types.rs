//! Common types and constants for `fuzzfind`

use std::fmt;

/// Maximum number of files a live scan may accumulate before aborting
pub const DEFAULT_CEILING: usize = 10_000;

/// Path separator used when splitting queries and joining rendered paths
pub const SEPARATOR: char = std::path::MAIN_SEPARATOR;

/// A single matched file with its rendered and scored representations
///
/// Produced once per match and handed to the caller; the engine keeps no
/// reference to it afterwards.
#[derive(Debug, Clone)]
pub struct FileMatch {
    /// Full path to the file
    pub path:                  String,
    /// Highlighted path with unmatched directory components collapsed to
    /// their first character
    pub abbreviated_path:      String,
    /// Full path of the containing directory
    pub directory:             String,
    /// Base name of the file, no separators
    pub name:                  String,
    /// Prefix-stripped directory with matched characters parenthesized
    pub highlighted_directory: String,
    /// File name with matched characters parenthesized
    pub highlighted_name:      String,
    /// Highlighted directory and name joined with the separator
    pub highlighted_path:      String,
    /// Relevance between 0 and 1, where 1 is an exact match
    pub score:                 f32,
}

impl fmt::Display for FileMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.highlighted_path)
    }
}

const _: () = {
    assert!(DEFAULT_CEILING > 0);
};
