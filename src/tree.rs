//! Directory and file tree model with shared-prefix resolution

use crate::types::SEPARATOR;

/// Index of a [`Directory`] within its [`Tree`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirId(usize);

/// A directory node
///
/// Directories are owned by the [`Tree`] arena; parents refer to children by
/// [`DirId`]. The name is the full normalized path of the directory, not just
/// its last segment.
#[derive(Debug)]
pub struct Directory {
    /// Full normalized path of the directory
    pub name:    String,
    /// Whether this node is a scan root
    pub is_root: bool,
    children:    Vec<DirId>,
}

impl Directory {
    /// Child directories in creation order
    #[must_use]
    pub fn children(&self) -> &[DirId] {
        &self.children
    }
}

/// A file beneath one directory of the forest
///
/// The parent reference is a non-owning arena index; directories own their
/// children, never the other way around.
#[derive(Debug)]
pub struct FileEntry {
    /// Arena index of the owning directory
    pub parent: DirId,
    /// Base name of the file, no separators
    pub name:   String,
}

/// Forest of directories plus the flat list of known files
///
/// Built once, either from explicit full file paths or by a live scan; nodes
/// are immutable afterwards except for child-list growth during construction.
#[derive(Debug, Default)]
pub struct Tree {
    dirs:  Vec<Directory>,
    roots: Vec<DirId>,
    files: Vec<FileEntry>,
}

impl Tree {
    /// Create an empty tree
    #[must_use]
    pub const fn new() -> Self {
        Self { dirs: Vec::new(), roots: Vec::new(), files: Vec::new() }
    }

    /// Build a tree from complete file paths, with no file-system access
    ///
    /// Paths are sorted lexicographically first so sibling order is
    /// deterministic. Directory nodes are reused when a node with the same
    /// case-insensitive full name already exists at that level. A path with
    /// no directory part is attached beneath a root with an empty name; a
    /// path ending in a separator names no file and is skipped.
    #[must_use]
    pub fn from_full_file_names(names: &[String]) -> Self {
        let mut sorted: Vec<&String> = names.iter().collect();
        sorted.sort();

        let mut tree = Self::new();
        for name in sorted {
            let segments: Vec<&str> = name.split(SEPARATOR).collect();
            let Some((file_name, dir_segments)) = segments.split_last() else {
                continue;
            };
            if file_name.is_empty() {
                continue;
            }

            let mut current: Option<DirId> = None;
            for &segment in dir_segments {
                current = Some(tree.make_directory(current, segment));
            }
            let parent = current.unwrap_or_else(|| tree.make_directory(None, ""));
            tree.add_file(parent, (*file_name).to_string());
        }
        tree
    }

    /// Find or create the directory for one path segment beneath `parent`
    ///
    /// With no parent the segment names a root; otherwise the node's full
    /// name is the parent's name joined with the segment. Lookup is
    /// case-insensitive.
    fn make_directory(&mut self, parent: Option<DirId>, segment: &str) -> DirId {
        match parent {
            None => {
                let existing = self
                    .roots
                    .iter()
                    .copied()
                    .find(|id| self.dirs[id.0].name.eq_ignore_ascii_case(segment));
                match existing {
                    Some(id) => id,
                    None => self.add_root(segment.to_string()),
                }
            },
            Some(parent_id) => {
                let full_name = join_path(&self.dirs[parent_id.0].name, segment);
                let existing = self.dirs[parent_id.0]
                    .children
                    .iter()
                    .copied()
                    .find(|id| self.dirs[id.0].name.eq_ignore_ascii_case(&full_name));
                match existing {
                    Some(id) => id,
                    None => self.add_child(parent_id, full_name),
                }
            },
        }
    }

    /// Append a new root directory
    pub fn add_root(&mut self, name: String) -> DirId {
        let id = DirId(self.dirs.len());
        self.dirs.push(Directory { name, is_root: true, children: Vec::new() });
        self.roots.push(id);
        id
    }

    /// Append a new directory beneath `parent`
    ///
    /// The name must be the child's full path, as produced by the scan or by
    /// [`join_path`] during construction from file names.
    pub fn add_child(&mut self, parent: DirId, name: String) -> DirId {
        let id = DirId(self.dirs.len());
        self.dirs.push(Directory { name, is_root: false, children: Vec::new() });
        self.dirs[parent.0].children.push(id);
        id
    }

    /// Record a file beneath `parent`
    pub fn add_file(&mut self, parent: DirId, name: String) {
        self.files.push(FileEntry { parent, name });
    }

    /// Look up a directory by its arena index
    #[must_use]
    pub fn dir(&self, id: DirId) -> &Directory {
        &self.dirs[id.0]
    }

    /// Root directories in creation order
    #[must_use]
    pub fn roots(&self) -> &[DirId] {
        &self.roots
    }

    /// All known files in tree-construction order
    #[must_use]
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Full path of a file, derived from its parent directory
    #[must_use]
    pub fn file_path(&self, file: &FileEntry) -> String {
        join_path(&self.dirs[file.parent.0].name, &file.name)
    }

    /// Longest path prefix common to all roots
    ///
    /// Empty with no roots; the root's own name with exactly one root; the
    /// longest common sequence of leading separator-delimited segments
    /// otherwise. The prefix is stripped from candidate names before
    /// matching so results read relative to the common ancestor.
    #[must_use]
    pub fn shared_prefix(&self) -> String {
        if self.roots.is_empty() {
            return String::new();
        }
        if self.roots.len() == 1 {
            return self.dirs[self.roots[0].0].name.clone();
        }

        let split: Vec<Vec<&str>> = self
            .roots
            .iter()
            .map(|id| self.dirs[id.0].name.split(SEPARATOR).collect())
            .collect();
        let Some((master, rest)) = split.split_last() else {
            return String::new();
        };

        let separator = SEPARATOR.to_string();
        for (index, segment) in master.iter().enumerate() {
            if !rest.iter().all(|segments| segments.get(index) == Some(segment)) {
                return master[..index].join(&separator);
            }
        }
        master.join(&separator)
    }
}

/// Join a directory path and a trailing segment without doubling separators
pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        return name.to_string();
    }
    if parent.ends_with(SEPARATOR) {
        return format!("{parent}{name}");
    }
    format!("{parent}{SEPARATOR}{name}")
}
