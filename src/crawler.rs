//! Live directory crawler and its collaborator interfaces

use std::fmt;
use std::fs;
use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::{Error, Result};
use crate::query::PrefixPattern;
use crate::tree::{DirId, Tree};

/// One immediate child of a scanned directory
#[derive(Debug, Clone)]
pub struct DirEntry {
    /// Base name of the entry
    pub name:   String,
    /// Full path of the entry
    pub path:   String,
    /// Whether the entry is itself a directory
    pub is_dir: bool,
}

/// File-system enumeration capability supplied by the environment
///
/// The crawler never touches the file system directly; everything it learns
/// about a directory comes through this trait.
pub trait FileSystem: fmt::Debug {
    /// List the immediate children of a directory
    ///
    /// # Errors
    /// Returns an error if the directory cannot be read.
    fn entries(&self, dir: &Path) -> Result<Vec<DirEntry>>;
}

/// [`FileSystem`] backed by `std::fs`
///
/// Children are sorted by name so repeated scans of an unchanged tree
/// produce files in the same order.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn entries(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            entries.push(DirEntry {
                name:   entry.file_name().to_string_lossy().into_owned(),
                path:   entry.path().to_string_lossy().into_owned(),
                is_dir: file_type.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Exclusion policy consulted during a scan
///
/// The crawler asks twice per file: once with the bare name and once with
/// the prefix-stripped path. Either answer excludes the file.
pub trait Ignore: fmt::Debug {
    /// Whether the candidate name or path should be excluded
    fn is_ignored(&self, candidate: &str) -> bool;
}

/// [`Ignore`] backed by a compiled set of glob patterns
#[derive(Debug)]
pub struct GlobIgnore {
    set: GlobSet,
}

impl GlobIgnore {
    /// Compile an exclusion set from glob patterns
    ///
    /// An empty pattern list excludes nothing.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if a pattern is not a valid glob.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .literal_separator(true)
                .build()
                .map_err(|e| Error::config(&format!("invalid ignore pattern: {e}")))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| Error::config(&format!("invalid ignore patterns: {e}")))?;
        Ok(Self { set })
    }
}

impl Ignore for GlobIgnore {
    fn is_ignored(&self, candidate: &str) -> bool {
        self.set.is_match(candidate)
    }
}

/// Depth-first walker that populates a [`Tree`] from the live file system
#[derive(Debug)]
pub struct Crawler<'a> {
    fs:      &'a dyn FileSystem,
    ignore:  &'a dyn Ignore,
    prefix:  &'a PrefixPattern,
    ceiling: usize,
}

impl<'a> Crawler<'a> {
    /// Create a crawler over the given collaborators
    #[must_use]
    pub const fn new(
        fs: &'a dyn FileSystem,
        ignore: &'a dyn Ignore,
        prefix: &'a PrefixPattern,
        ceiling: usize,
    ) -> Self {
        Self { fs, ignore, prefix, ceiling }
    }

    /// Walk every root of the tree depth-first and record its files
    ///
    /// Discovered directories are attached as children of their parent, so
    /// every recorded file's parent stays reachable from the forest.
    ///
    /// # Errors
    /// Returns [`Error::TooManyEntries`] when the file count would cross the
    /// ceiling, or an IO error from the file-system collaborator. The tree
    /// is left partially populated and must be discarded by the caller.
    pub fn crawl(&self, tree: &mut Tree) -> Result<()> {
        for root in tree.roots().to_vec() {
            self.follow(tree, root)?;
        }
        Ok(())
    }

    fn follow(&self, tree: &mut Tree, dir: DirId) -> Result<()> {
        let dir_name = tree.dir(dir).name.clone();
        for entry in self.fs.entries(Path::new(&dir_name))? {
            if self.ignore.is_ignored(&entry.name) {
                continue;
            }
            if entry.is_dir {
                let child = tree.add_child(dir, entry.path);
                self.follow(tree, child)?;
            } else {
                let stripped = self.prefix.strip(&entry.path);
                if self.ignore.is_ignored(&stripped) {
                    continue;
                }
                if tree.files().len() >= self.ceiling {
                    return Err(Error::TooManyEntries(self.ceiling));
                }
                tree.add_file(dir, entry.name);
            }
        }
        Ok(())
    }
}
