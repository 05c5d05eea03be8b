//! Locating trace files under a directory tree.
//!
//! File names are matched against shell-style globs (`*` and `?`) which are
//! compiled to anchored regexes. Extra path predicates narrow the result,
//! e.g. to the output directory of one tagged run.

use crate::utils::config::DEFAULT_INCLUDE;
use crate::utils::error::{CollectError, ConfigError};
use log::debug;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

type PathFilter = Box<dyn Fn(&Path) -> bool>;

/// Finds candidate trace files by name pattern and predicates
pub struct TraceFinder {
    include: Regex,
    exclude: Option<Regex>,
    filters: Vec<PathFilter>,
}

impl TraceFinder {
    /// Build a finder from an include glob and an optional exclude glob
    pub fn new(include: &str, exclude: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self {
            include: glob_to_regex(include)?,
            exclude: exclude.map(glob_to_regex).transpose()?,
            filters: Vec::new(),
        })
    }

    /// Add a predicate every returned path must satisfy
    pub fn with_filter(mut self, filter: impl Fn(&Path) -> bool + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Keep only paths containing `token` (e.g. a random run tag)
    pub fn with_token(self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.with_filter(move |p| p.to_string_lossy().contains(&token))
    }

    /// Whether a single file path is selected
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };

        self.include.is_match(&name)
            && !self.exclude.as_ref().is_some_and(|re| re.is_match(&name))
            && self.filters.iter().all(|f| f(path))
    }

    /// Recursively find matching files below `root`, sorted by path
    ///
    /// # Errors
    /// * `CollectError::FileAccess` - `root` does not exist or cannot be listed
    pub fn find(&self, root: impl AsRef<Path>) -> Result<Vec<PathBuf>, CollectError> {
        let root = root.as_ref();

        let meta = fs::metadata(root).map_err(|source| CollectError::FileAccess {
            path: root.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        if meta.is_file() {
            if self.accepts(root) {
                files.push(root.to_path_buf());
            }
            return Ok(files);
        }

        self.walk(root, &mut files)?;
        files.sort();

        debug!("Found {} trace files under {}", files.len(), root.display());
        Ok(files)
    }

    fn walk(&self, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), CollectError> {
        let entries = fs::read_dir(dir).map_err(|source| CollectError::FileAccess {
            path: dir.to_path_buf(),
            source,
        })?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                // Skip hidden dirs.
                let hidden = path
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with('.'));
                if !hidden {
                    self.walk(&path, out)?;
                }
            } else if path.is_file() && self.accepts(&path) {
                out.push(path);
            }
        }

        Ok(())
    }
}

impl Default for TraceFinder {
    fn default() -> Self {
        Self {
            include: glob_to_regex(DEFAULT_INCLUDE).expect("default include glob is valid"),
            exclude: None,
            filters: Vec::new(),
        }
    }
}

/// Compile a file-name glob (`*`, `?`) into an anchored regex
pub fn glob_to_regex(glob: &str) -> Result<Regex, ConfigError> {
    let mut pattern = String::with_capacity(glob.len() + 8);
    pattern.push('^');

    for c in glob.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');

    Regex::new(&pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: glob.to_string(),
        source,
    })
}
