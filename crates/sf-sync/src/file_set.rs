//! The flat relative-path to bytes mapping exchanged with the remote system.

use std::collections::btree_map::{self, BTreeMap};

use crate::error::{Error, ErrorKind, Result};

/// Relative, `/`-separated path → raw file content.
///
/// Keys are validated on insert; iteration is in key order so that output
/// derived from a `FileSet` is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    files: BTreeMap<String, Vec<u8>>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `content` under `path`, returning the previous content if any.
    ///
    /// `\` separators are normalised to `/`. Empty, absolute and
    /// parent-escaping (`..`) paths are rejected.
    pub fn insert(&mut self, path: &str, content: impl Into<Vec<u8>>) -> Result<Option<Vec<u8>>> {
        let key = normalize_key(path)?;
        Ok(self.files.insert(key, content.into()))
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.files.iter(),
        }
    }
}

pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, Vec<u8>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(path, content)| (path.as_str(), content.as_slice()))
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = (&'a str, &'a [u8]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn normalize_key(path: &str) -> Result<String> {
    let key = path.replace('\\', "/");

    let invalid = |reason: &str| {
        Err(Error::new(ErrorKind::InvalidPath(format!(
            "{:?} {}",
            path, reason
        ))))
    };

    if key.is_empty() {
        return invalid("is empty");
    }
    if key.starts_with('/') || key.as_bytes().get(1) == Some(&b':') {
        return invalid("is not relative");
    }
    if key.split('/').any(|segment| segment == "..") {
        return invalid("escapes its root");
    }
    if key.split('/').any(str::is_empty) {
        return invalid("has an empty segment");
    }
    Ok(key)
}
