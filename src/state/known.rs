use std::collections::HashSet;
use std::path::Path;

/// Keys (homepage URLs or internal scene ids) already persisted by the caller
///
/// Matching is exact after trimming surrounding whitespace; no case folding
/// or URL normalization is applied. Extractors consult the set before
/// fetching a detail page, but nothing depends on the skip for correctness:
/// re-emitting a known scene is harmless.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownScenes {
    keys: HashSet<String>,
}

impl KnownScenes {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one key per line
    ///
    /// Blank lines and lines starting with `#` are ignored.
    pub fn from_lines(content: &str) -> Self {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect()
    }

    /// Loads keys from a file with one key per line
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_lines(&content))
    }

    /// Adds a key; returns false if it was already present or empty
    pub fn insert(&mut self, key: impl AsRef<str>) -> bool {
        let key = key.as_ref().trim();
        if key.is_empty() {
            return false;
        }
        self.keys.insert(key.to_string())
    }

    /// Returns true if `key` was already persisted
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key.trim())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for KnownScenes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut known = Self::new();
        known.extend(iter);
        known
    }
}

impl<S: AsRef<str>> Extend<S> for KnownScenes {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
