//! File grouping.
//!
//! Within one directory, files sharing a base name (extension removed) belong
//! together: `42.txt` is the message and `42.cats` its category labels.
//! Directories are visited depth-first in file-name order so output is
//! reproducible; a directory's own files come before its subdirectories.

use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::Options;
use crate::error::Result;

/// Why a group produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Only a category file, nothing to attach it to.
    MissingEmail {
        /// The orphaned category file, if any.
        category: Option<String>,
    },
    /// The email is multipart and deliberately not converted.
    Multipart,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEmail { category: Some(c) } => {
                write!(f, "category file {c} has no corresponding email file")
            }
            Self::MissingEmail { category: None } => write!(f, "no email file"),
            Self::Multipart => write!(f, "email is multipart"),
        }
    }
}

/// Sibling files sharing a base name within one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    /// Directory holding the files.
    pub dir: PathBuf,
    /// File name with its extension removed.
    pub base: String,
    /// Member file names, sorted.
    pub filenames: Vec<String>,
}

/// The files a group resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFiles {
    /// The email file name.
    pub email: String,
    /// The category sidecar file name, if present.
    pub category: Option<String>,
}

impl FileGroup {
    /// Full path of a member file.
    #[must_use]
    pub fn path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Picks the email and category files of this group.
    ///
    /// The first file ending in the category suffix is the category file.
    /// The first remaining file is the email; if several remain, the others
    /// are ignored with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SkipReason::MissingEmail`] if no email file remains.
    pub fn resolve(&self, options: &Options) -> std::result::Result<GroupFiles, SkipReason> {
        let category = self
            .filenames
            .iter()
            .find(|f| options.is_category_file(f))
            .cloned();

        let mut candidates = self
            .filenames
            .iter()
            .filter(|f| Some(*f) != category.as_ref());

        let Some(email) = candidates.next().cloned() else {
            return Err(SkipReason::MissingEmail { category });
        };

        let ignored: Vec<&String> = candidates.collect();
        if !ignored.is_empty() {
            warn!(
                dir = %self.dir.display(),
                chosen = %email,
                ?ignored,
                "Group has more than one email candidate, using the first"
            );
        }

        Ok(GroupFiles { email, category })
    }
}

/// Strips the last extension the way `a.b.txt` -> `a.b`, keeping dotfiles whole.
#[must_use]
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if name[..i].chars().any(|c| c != '.') => &name[..i],
        _ => name,
    }
}

/// Files of one directory collected so far, keyed by stem.
#[derive(Debug)]
struct DirFiles {
    dir: PathBuf,
    by_stem: BTreeMap<String, Vec<String>>,
}

impl DirFiles {
    fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            by_stem: BTreeMap::new(),
        }
    }

    fn add(&mut self, name: &str) {
        self.by_stem
            .entry(file_stem(name).to_string())
            .or_default()
            .push(name.to_string());
    }

    fn into_groups(self) -> impl Iterator<Item = FileGroup> {
        let dir = self.dir;
        self.by_stem.into_iter().map(move |(base, mut filenames)| {
            filenames.sort();
            FileGroup {
                dir: dir.clone(),
                base,
                filenames,
            }
        })
    }
}

/// Orders directory entries files first, then by name.
///
/// Every directory's files therefore arrive in one run, right after the
/// directory itself and before any of its subdirectories.
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Lazy sequence of file groups over a directory tree.
///
/// The tree is read once, depth-first. A directory's groups are released as
/// soon as its last file has been seen. An entry that cannot be read yields
/// an error and traversal continues.
pub struct FileGroups {
    entries: walkdir::IntoIter,
    current: Option<DirFiles>,
    pending: VecDeque<FileGroup>,
    options: Options,
}

impl FileGroups {
    /// Starts a walk at `root`.
    #[must_use]
    pub fn new(root: impl AsRef<Path>, options: &Options) -> Self {
        Self {
            entries: WalkDir::new(root).sort_by(files_first).into_iter(),
            current: None,
            pending: VecDeque::new(),
            options: options.clone(),
        }
    }

    /// Moves the groups of the directory being collected to the queue.
    fn flush(&mut self) {
        if let Some(files) = self.current.take() {
            self.pending.extend(files.into_groups());
        }
    }

    fn add_file(&mut self, dir: &Path, name: &str) {
        if self.current.as_ref().is_none_or(|files| files.dir != dir) {
            self.flush();
            self.current = Some(DirFiles::new(dir));
        }
        if let Some(files) = self.current.as_mut() {
            files.add(name);
        }
    }
}

impl Iterator for FileGroups {
    type Item = Result<FileGroup>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(group) = self.pending.pop_front() {
                if self.options.is_ignored_group(&group.filenames) {
                    warn!(
                        dir = %group.dir.display(),
                        files = ?group.filenames,
                        "Skipping corpus artifact"
                    );
                    continue;
                }
                return Some(Ok(group));
            }

            let entry = match self.entries.next() {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => return Some(Err(e.into())),
                None if self.current.is_some() => {
                    self.flush();
                    continue;
                }
                None => return None,
            };

            if entry.file_type().is_dir() {
                self.flush();
                debug!(dir = %entry.path().display(), "Scanning directory");
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let (Some(dir), Some(name)) = (path.parent(), path.file_name().and_then(|n| n.to_str()))
            else {
                warn!(path = %path.display(), "Skipping file with non UTF-8 name");
                continue;
            };
            self.add_file(dir, name);
        }
    }
}
