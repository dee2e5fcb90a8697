//! Filesystem-safe, collision-free output paths
//!
//! Every file an export run writes is requested through a single
//! [`PathAllocator`]. It sanitizes notebook, stack and note names, keeps
//! filenames under the usual 255 byte limit, and remembers which paths it has
//! already handed out so two notes titled the same never share a file.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{EnbakError, Result};

/// Longest filename, in UTF-8 bytes, most filesystems accept
pub const MAX_FILENAME_BYTES: usize = 255;

/// Substituted for names that sanitize to nothing
pub const FALLBACK_NAME: &str = "Untitled";

const MAX_EXTENSION_BYTES: usize = 16;

/// Separators plus the characters Windows refuses in names
const RESERVED_CHARS: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

/// Disk access needed by the allocator
pub trait TargetFs {
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl TargetFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Hands out unique file paths below a target directory for one export run
#[derive(Debug)]
pub struct PathAllocator<F: TargetFs = LocalFs> {
    root: PathBuf,
    overwrite: bool,
    issued: HashSet<PathBuf>,
    fs: F,
}

impl PathAllocator<LocalFs> {
    pub fn new(root: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self::with_fs(root, overwrite, LocalFs)
    }
}

impl<F: TargetFs> PathAllocator<F> {
    pub fn with_fs(root: impl Into<PathBuf>, overwrite: bool, fs: F) -> Self {
        Self {
            root: root.into(),
            overwrite,
            issued: HashSet::new(),
            fs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `filename` inside the nested `dirs` below the root
    ///
    /// Directories are created as needed. Unless overwriting, a path that was
    /// already issued or already exists gets a ` (N)` suffix before its
    /// extension, with the smallest free N starting at 1.
    pub fn allocate<S: AsRef<str>>(&mut self, dirs: &[S], filename: &str) -> Result<PathBuf> {
        let mut dir = self.root.clone();
        for component in dirs {
            dir.push(sanitize_name(component.as_ref()));
        }

        self.fs
            .create_dir_all(&dir)
            .map_err(|e| EnbakError::filesystem("create directory", &dir, e))?;

        let (stem, extension) = split_extension(filename);
        let stem = sanitize_name(stem);

        if self.overwrite {
            return Ok(dir.join(fit_filename(&stem, "", extension)));
        }

        let mut attempt: u32 = 0;
        loop {
            let suffix = if attempt == 0 {
                String::new()
            } else {
                format!(" ({})", attempt)
            };
            let candidate = dir.join(fit_filename(&stem, &suffix, extension));

            if !self.issued.contains(&candidate) && !self.fs.exists(&candidate) {
                if attempt > 0 {
                    tracing::debug!(path = %candidate.display(), "name taken, using suffix");
                }
                self.issued.insert(candidate.clone());
                return Ok(candidate);
            }

            attempt += 1;
        }
    }
}

/// Strip characters no filesystem accepts in a single path component
///
/// Never returns an empty or special (`.`/`..`) component.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && !RESERVED_CHARS.contains(c))
        .collect();
    let trimmed = cleaned.trim();

    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Split off a short alphanumeric extension, dot included
fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) => {
            let extension = &filename[idx..];
            let valid = extension.len() > 1
                && extension.len() <= MAX_EXTENSION_BYTES
                && extension[1..].chars().all(|c| c.is_ascii_alphanumeric());
            if valid {
                (&filename[..idx], extension)
            } else {
                (filename, "")
            }
        }
        None => (filename, ""),
    }
}

/// Join stem, suffix and extension, shortening the stem to stay in budget
fn fit_filename(stem: &str, suffix: &str, extension: &str) -> String {
    let budget = MAX_FILENAME_BYTES.saturating_sub(suffix.len() + extension.len());
    format!(
        "{}{}{}",
        truncate_to_bytes(stem, budget).trim_end(),
        suffix,
        extension
    )
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char
fn truncate_to_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }

    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
