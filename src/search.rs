//! Search orchestration over the file tree

use std::collections::HashMap;
use std::path;
use std::path::PathBuf;

use crate::crawler::{Crawler, FileSystem, GlobIgnore, Ignore, OsFileSystem};
use crate::error::{Error, Result};
use crate::query::{FilePattern, PathFilter, PathPattern, PrefixPattern};
use crate::score::{MatchResult, abbreviate, build_match_result};
use crate::tree::{DirId, FileEntry, Tree, join_path};
use crate::types::{DEFAULT_CEILING, FileMatch, SEPARATOR};

/// Construction options for a [`Finder`]
#[derive(Debug, Clone)]
pub struct FinderOptions {
    /// Root directories to scan live; defaults to the current directory
    /// when neither input is given
    pub directories:     Vec<PathBuf>,
    /// Complete file paths defining the tree directly, with no file-system
    /// access; takes precedence over `directories`
    pub full_file_names: Vec<String>,
    /// Maximum files a live scan may accumulate before failing
    pub ceiling:         usize,
    /// Glob patterns handed to the default ignore predicate
    pub ignores:         Vec<String>,
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self {
            directories:     Vec::new(),
            full_file_names: Vec::new(),
            ceiling:         DEFAULT_CEILING,
            ignores:         Vec::new(),
        }
    }
}

/// Fuzzy path-matching engine over a fixed tree of files
///
/// The engine is synchronous and single-threaded: a [`Search`] borrows the
/// finder immutably, so the tree cannot be rescanned while a search is in
/// flight.
#[derive(Debug)]
pub struct Finder {
    tree:          Tree,
    shared_prefix: String,
    prefix:        PrefixPattern,
    ceiling:       usize,
    live_roots:    bool,
    fs:            Box<dyn FileSystem>,
    ignore:        Box<dyn Ignore>,
}

impl Finder {
    /// Create a finder with the default collaborators
    ///
    /// Uses `std::fs` for enumeration and a glob set compiled from
    /// `options.ignores` as the exclusion policy. When `directories` are
    /// given (or defaulted), the initial scan happens here.
    ///
    /// # Errors
    /// Returns [`Error::Config`] for an invalid ignore pattern, and any
    /// error of [`Finder::rescan`] from the initial scan.
    pub fn new(options: FinderOptions) -> Result<Self> {
        let ignore = GlobIgnore::new(&options.ignores)?;
        Self::with_collaborators(options, Box::new(OsFileSystem), Box::new(ignore))
    }

    /// Create a finder with explicit collaborators
    ///
    /// `options.ignores` is not consulted here; the supplied predicate is
    /// used as-is.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if a root directory cannot be normalized, and
    /// any error of [`Finder::rescan`] from the initial scan.
    pub fn with_collaborators(
        options: FinderOptions,
        fs: Box<dyn FileSystem>,
        ignore: Box<dyn Ignore>,
    ) -> Result<Self> {
        if !options.full_file_names.is_empty() {
            let tree = Tree::from_full_file_names(&options.full_file_names);
            let shared_prefix = tree.shared_prefix();
            let prefix = PrefixPattern::compile(&shared_prefix)?;
            return Ok(Self {
                tree,
                shared_prefix,
                prefix,
                ceiling: options.ceiling,
                live_roots: false,
                fs,
                ignore,
            });
        }

        let mut directories = options.directories;
        if directories.is_empty() {
            directories.push(PathBuf::from("."));
        }

        let mut names: Vec<String> = Vec::new();
        for directory in &directories {
            let mut name = path::absolute(directory)?.to_string_lossy().into_owned();
            while name.len() > 1 && name.ends_with(SEPARATOR) {
                name.pop();
            }
            if !names.contains(&name) {
                names.push(name);
            }
        }

        let mut tree = Tree::new();
        for name in names {
            tree.add_root(name);
        }
        let shared_prefix = tree.shared_prefix();
        let prefix = PrefixPattern::compile(&shared_prefix)?;

        let mut finder = Self {
            tree,
            shared_prefix,
            prefix,
            ceiling: options.ceiling,
            live_roots: true,
            fs,
            ignore,
        };
        finder.rescan()?;
        Ok(finder)
    }

    /// Rebuild the file list from the live file system
    ///
    /// The scan runs against a fresh tree that replaces the current one only
    /// on success; an aborted scan never publishes a partial tree.
    ///
    /// # Errors
    /// Returns [`Error::TooManyEntries`] when the scan crosses the ceiling,
    /// [`Error::Io`] from the file-system collaborator, or [`Error::Config`]
    /// when the tree was built from explicit file paths.
    pub fn rescan(&mut self) -> Result<()> {
        if !self.live_roots {
            return Err(Error::config("tree was built from explicit file paths"));
        }

        let mut fresh = Tree::new();
        for root in self.tree.roots() {
            fresh.add_root(self.tree.dir(*root).name.clone());
        }

        let crawler =
            Crawler::new(self.fs.as_ref(), self.ignore.as_ref(), &self.prefix, self.ceiling);
        crawler.crawl(&mut fresh)?;

        self.tree = fresh;
        Ok(())
    }

    /// Stream every file matching the query
    ///
    /// Spaces are stripped from the query, which then splits on the path
    /// separator into directory segments plus a trailing file-name segment.
    /// A query ending in a separator has an empty file-name segment and
    /// matches any file name. The returned iterator is lazy: files are
    /// examined one by one as matches are pulled, and each directory is
    /// path-matched at most once per search.
    ///
    /// # Errors
    /// Returns [`Error::Pattern`] if the query cannot be compiled.
    pub fn search(&self, query: &str) -> Result<Search<'_>> {
        let query = query.replace(' ', "");
        let mut parts: Vec<&str> = query.split(SEPARATOR).collect();
        let file_part = parts.pop().unwrap_or("");

        let file_pattern = FilePattern::compile(file_part)?;
        let path_filter = if parts.is_empty() {
            PathFilter::Unconstrained
        } else {
            PathFilter::Constrained(PathPattern::compile(&parts)?)
        };

        Ok(Search {
            finder: self,
            file_pattern,
            path_filter,
            cache: HashMap::new(),
            next: 0,
        })
    }

    /// Collect up to `max` matches for the query
    ///
    /// Scanning stops as soon as enough matches are found; the remaining
    /// candidates are never examined.
    ///
    /// # Errors
    /// Returns [`Error::Pattern`] if the query cannot be compiled.
    pub fn find(&self, query: &str, max: usize) -> Result<Vec<FileMatch>> {
        Ok(self.search(query)?.take(max).collect())
    }

    /// The underlying tree of directories and files
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Longest path prefix common to all roots
    #[must_use]
    pub fn shared_prefix(&self) -> &str {
        &self.shared_prefix
    }

    /// Configured maximum file count for live scans
    #[must_use]
    pub const fn ceiling(&self) -> usize {
        self.ceiling
    }
}

/// Lazy stream of matches for one query
///
/// Holds the compiled patterns and the per-search directory cache; the
/// cache lives and dies with this iterator and is never shared between
/// searches.
#[derive(Debug)]
pub struct Search<'a> {
    finder:       &'a Finder,
    file_pattern: FilePattern,
    path_filter:  PathFilter,
    cache:        HashMap<DirId, MatchResult>,
    next:         usize,
}

impl Search<'_> {
    /// Match a directory against the path filter, memoized per search
    fn path_match(&mut self, dir: DirId) -> MatchResult {
        if let Some(cached) = self.cache.get(&dir) {
            return cached.clone();
        }

        let finder = self.finder;
        // The trailing separator makes the last component matchable as a
        // complete unit and lets the prefix stripper consume a root name
        // that equals the shared prefix exactly.
        let with_separator = format!("{}{SEPARATOR}", finder.tree.dir(dir).name);
        let stripped = finder.prefix.strip(&with_separator);
        let matchable = stripped.strip_suffix(SEPARATOR).unwrap_or(&stripped).to_string();

        let outcome = match &self.path_filter {
            PathFilter::Unconstrained => {
                MatchResult { score: 1.0, text: matchable, missed: false }
            },
            PathFilter::Constrained(pattern) => match pattern.captures(&matchable) {
                Some(captures) => build_match_result(&captures, pattern.segments()),
                None => MatchResult { score: 1.0, text: matchable.clone(), missed: true },
            },
        };

        self.cache.insert(dir, outcome.clone());
        outcome
    }

    /// Match one file's base name and compose the full result
    fn match_file(&self, file: &FileEntry, path_match: &MatchResult) -> Option<FileMatch> {
        let finder = self.finder;
        let captures = self.file_pattern.captures(&file.name)?;
        let name_match = build_match_result(&captures, 1);

        let highlighted_path = join_rendered(&path_match.text, &name_match.text);
        let abbreviated_path = join_rendered(&abbreviate(&path_match.text), &name_match.text);

        Some(FileMatch {
            path: finder.tree.file_path(file),
            abbreviated_path,
            directory: finder.tree.dir(file.parent).name.clone(),
            name: file.name.clone(),
            highlighted_directory: path_match.text.clone(),
            highlighted_name: name_match.text,
            highlighted_path,
            score: path_match.score * name_match.score,
        })
    }
}

impl Iterator for Search<'_> {
    type Item = FileMatch;

    fn next(&mut self) -> Option<FileMatch> {
        let finder = self.finder;
        while self.next < finder.tree.files().len() {
            let file = &finder.tree.files()[self.next];
            self.next += 1;

            let path_match = self.path_match(file.parent);
            if path_match.missed {
                continue;
            }
            if let Some(found) = self.match_file(file, &path_match) {
                return Some(found);
            }
        }
        None
    }
}

/// Join rendered directory and file texts, directory-less when empty
fn join_rendered(directory: &str, name: &str) -> String {
    if directory.is_empty() {
        return name.to_string();
    }
    join_path(directory, name)
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use tempfile::TempDir;

    use super::*;

    fn finder_for(paths: &[&str]) -> Finder {
        let options = FinderOptions {
            full_file_names: paths.iter().map(ToString::to_string).collect(),
            ..FinderOptions::default()
        };
        Finder::new(options).unwrap()
    }

    #[test]
    fn test_find_matches_file_names() {
        let finder = finder_for(&["app/models/story.rb", "app/models/chapter.rb"]);

        let results = finder.find("stry", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "story.rb");
        assert_eq!(results[0].highlighted_name, "(st)o(ry).rb");
        assert_eq!(results[0].path, "app/models/story.rb");
    }

    #[test]
    fn test_exact_name_scores_highest() {
        let finder = finder_for(&["lib/story.rb", "lib/s_t_o_r_y_gen.rb"]);

        let results = finder.find("story.rb", 10).unwrap();
        assert_eq!(results.len(), 2);
        let exact = results.iter().find(|m| m.name == "story.rb").unwrap();
        let scattered = results.iter().find(|m| m.name == "s_t_o_r_y_gen.rb").unwrap();
        assert!((exact.score - 1.0).abs() < f32::EPSILON);
        assert!(scattered.score < exact.score);
    }

    #[test]
    fn test_directory_segment_must_match_distinct_component() {
        let finder = finder_for(&["app/models/user.rb", "app/models_user.rb"]);

        let results = finder.find("models/user", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "app/models/user.rb");
    }

    #[test]
    fn test_multi_segment_query() {
        let finder = finder_for(&[
            "src/controllers/admin/home_controller.rb",
            "src/controllers/public/home_controller.rb",
            "src/helpers/admin/home_helper.rb",
        ]);

        let results = finder.find("cont/adm/home", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "src/controllers/admin/home_controller.rb");
    }

    #[test]
    fn test_trailing_separator_matches_any_file_name() {
        let finder = finder_for(&["app/models/story.rb", "app/views/story.html"]);

        let query = format!("models{SEPARATOR}");
        let results = finder.find(&query, 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "story.rb");
    }

    #[test]
    fn test_empty_query_matches_every_file() {
        let finder = finder_for(&["a/one.txt", "a/two.txt", "b/three.txt"]);

        let results = finder.find("", 10).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_spaces_are_stripped_from_the_query() {
        let finder = finder_for(&["app/models/story.rb"]);

        let spaced = finder.find("st ry", 10).unwrap();
        let plain = finder.find("stry", 10).unwrap();
        assert_eq!(spaced.len(), plain.len());
        assert_eq!(spaced[0].highlighted_name, plain[0].highlighted_name);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let finder = finder_for(&["app/models/Story.rb"]);

        let results = finder.find("story", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].highlighted_name, "(Story).rb");
    }

    #[test]
    fn test_find_respects_max() {
        let finder = finder_for(&[
            "a/story_one.rb",
            "a/story_two.rb",
            "a/story_three.rb",
            "a/story_four.rb",
        ]);

        let results = finder.find("story", 2).unwrap();
        assert_eq!(results.len(), 2);

        let none = finder.find("story", 0).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_search_is_lazy() {
        let finder = finder_for(&["a/story_one.rb", "a/story_two.rb", "a/story_three.rb"]);

        let mut search = finder.search("story").unwrap();
        assert!(search.next().is_some());
        // Two candidates remain untouched; pulling continues where we left off.
        assert_eq!(search.count(), 2);
    }

    #[test]
    fn test_abbreviated_path_collapses_unmatched_directories() {
        let finder = finder_for(&["app/models/story.rb"]);

        let results = finder.find("story", 10).unwrap();
        assert_eq!(results.len(), 1);
        let expected = format!("m{SEPARATOR}(story).rb");
        assert_eq!(results[0].abbreviated_path, expected);
        assert_eq!(results[0].highlighted_directory, "models");
    }

    #[test]
    fn test_matched_directories_survive_abbreviation() {
        let finder = finder_for(&["app/models/story.rb", "app/helpers/story_helper.rb"]);

        let results = finder.find("mod/story", 10).unwrap();
        assert_eq!(results.len(), 1);
        let expected = format!("(mod)els{SEPARATOR}(story).rb");
        assert_eq!(results[0].abbreviated_path, expected);
    }

    #[test]
    fn test_directory_and_file_scores_multiply() {
        let finder = finder_for(&["app/models/story.rb"]);

        let by_name = finder.find("story", 10).unwrap();
        let by_both = finder.find("models/story", 10).unwrap();
        assert!(by_both[0].score < by_name[0].score);
        assert!(by_both[0].score > 0.0);
    }

    #[test]
    fn test_scores_stay_within_bounds() {
        let finder = finder_for(&[
            "app/models/story.rb",
            "app/models/chapter.rb",
            "lib/tasks/story.rake",
        ]);

        for query in ["story", "mod/story", "s", "story.rb", ""] {
            for result in finder.search(query).unwrap() {
                assert!(result.score >= 0.0, "query {query:?}");
                assert!(result.score <= 1.0, "query {query:?}");
            }
        }
    }

    #[test]
    fn test_display_renders_the_highlighted_path() {
        let finder = finder_for(&["app/models/story.rb"]);

        let results = finder.find("story", 10).unwrap();
        assert_eq!(results[0].to_string(), results[0].highlighted_path);
    }

    #[test]
    fn test_rescan_rejects_path_defined_trees() {
        let mut finder = finder_for(&["app/models/story.rb"]);

        assert!(matches!(finder.rescan(), Err(Error::Config(_))));
    }

    #[test]
    fn test_live_scan_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let models = temp_dir.path().join("app").join("models");
        std::fs::create_dir_all(&models).unwrap();
        File::create(models.join("story.rb")).unwrap();
        File::create(models.join("chapter.rb")).unwrap();

        let options = FinderOptions {
            directories: vec![temp_dir.path().to_path_buf()],
            ..FinderOptions::default()
        };
        let finder = Finder::new(options).unwrap();
        assert_eq!(finder.tree().files().len(), 2);

        let results = finder.find("stry", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "story.rb");
        assert!(results[0].path.ends_with("story.rb"));
        let expected_dir = format!("app{SEPARATOR}models");
        assert_eq!(results[0].highlighted_directory, expected_dir);
    }

    #[test]
    fn test_construction_fails_above_ceiling() {
        let temp_dir = TempDir::new().unwrap();
        for i in 0..5 {
            File::create(temp_dir.path().join(format!("file_{i}.txt"))).unwrap();
        }

        let options = FinderOptions {
            directories: vec![temp_dir.path().to_path_buf()],
            ceiling: 2,
            ..FinderOptions::default()
        };
        match Finder::new(options) {
            Err(Error::TooManyEntries(2)) => (),
            other => panic!("Expected TooManyEntries error, got {other:?}"),
        }
    }

    #[test]
    fn test_rescan_picks_up_new_files() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("first.txt")).unwrap();

        let options = FinderOptions {
            directories: vec![temp_dir.path().to_path_buf()],
            ..FinderOptions::default()
        };
        let mut finder = Finder::new(options).unwrap();
        assert_eq!(finder.tree().files().len(), 1);

        File::create(temp_dir.path().join("second.txt")).unwrap();
        finder.rescan().unwrap();
        assert_eq!(finder.tree().files().len(), 2);
    }

    #[test]
    fn test_failed_rescan_keeps_the_previous_tree() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("first.txt")).unwrap();

        let options = FinderOptions {
            directories: vec![temp_dir.path().to_path_buf()],
            ceiling: 2,
            ..FinderOptions::default()
        };
        let mut finder = Finder::new(options).unwrap();

        for i in 0..5 {
            File::create(temp_dir.path().join(format!("extra_{i}.txt"))).unwrap();
        }
        assert!(matches!(finder.rescan(), Err(Error::TooManyEntries(2))));
        assert_eq!(finder.tree().files().len(), 1);
    }

    #[test]
    fn test_duplicate_roots_are_merged() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("only.txt")).unwrap();

        let options = FinderOptions {
            directories: vec![temp_dir.path().to_path_buf(), temp_dir.path().to_path_buf()],
            ..FinderOptions::default()
        };
        let finder = Finder::new(options).unwrap();
        assert_eq!(finder.tree().roots().len(), 1);
        assert_eq!(finder.tree().files().len(), 1);
    }

    #[test]
    fn test_ignores_apply_during_live_scan() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("keep.txt")).unwrap();
        File::create(temp_dir.path().join("skip.log")).unwrap();

        let options = FinderOptions {
            directories: vec![temp_dir.path().to_path_buf()],
            ignores: vec!["*.log".to_string()],
            ..FinderOptions::default()
        };
        let finder = Finder::new(options).unwrap();
        assert_eq!(finder.tree().files().len(), 1);
        assert_eq!(finder.tree().files()[0].name, "keep.txt");
    }
}
