//! Materializing a [`FileSet`] on disk and reading a directory back into one.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, ErrorKind, Result};
use crate::file_set::FileSet;

/// Manifest that must sit at the root of every metadata directory.
pub const PACKAGE_MANIFEST: &str = "package.xml";

/// OS-generated files that are never part of a deploy.
const IGNORED_FILE_NAMES: &[&str] = &[".DS_Store"];

/// Host path for a FileSet key below `root`.
pub fn host_path(root: &Path, key: &str) -> PathBuf {
    key.split('/')
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// Write every entry of `files` below `root`, creating parent directories and
/// overwriting existing files. The first failure aborts the write.
pub fn write_tree(root: &Path, files: &FileSet) -> Result<usize> {
    let mut written = 0;

    for (key, content) in files {
        let path = host_path(root, key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(&path, content).map_err(|e| Error::io(&path, e))?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote file");
        written += 1;
    }

    Ok(written)
}

/// Read the metadata directory at `root` into a [`FileSet`].
///
/// `root` must contain a `package.xml`. Regular files are keyed by their
/// `/`-separated path relative to `root`; directories, symbolic links and
/// OS-generated files are skipped.
pub fn read_tree(root: &Path) -> Result<FileSet> {
    if !root.join(PACKAGE_MANIFEST).exists() {
        return Err(Error::usage(
            "Must specify a directory that contains metadata files",
        ));
    }

    let mut files = FileSet::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if IGNORED_FILE_NAMES.iter().any(|ignored| *ignored == name) {
            tracing::debug!(path = %entry.path().display(), "Skipping OS artifact");
            continue;
        }

        let key = relative_key(root, entry.path())?;
        let content = fs::read(entry.path()).map_err(|e| Error::io(entry.path(), e))?;
        tracing::debug!(key = %key, bytes = content.len(), "Read file");
        files.insert(&key, content)?;
    }

    Ok(files)
}

fn relative_key(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        Error::new(ErrorKind::InvalidPath(format!(
            "{} is not below {}",
            path.display(),
            root.display()
        )))
    })?;

    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(segments.join("/"))
}
