//! Expansion of zip-packaged static resources into bundle directories.
//!
//! After a fetch, every `<name>.resource-meta.xml` whose `contentType` is
//! `application/zip` gets its sibling `<name>.resource` unpacked into
//! `<name>/` next to it. Opening an archive is all-or-nothing; extracting
//! its members is best-effort.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use zip::ZipArchive;

use crate::error::{Error, ErrorKind, Result};
use crate::file_set::FileSet;
use crate::tree::{host_path, PACKAGE_MANIFEST};

/// Component type whose files are always considered for expansion.
pub const STATIC_RESOURCE_TYPE: &str = "StaticResource";

const META_SUFFIX: &str = ".resource-meta.xml";
const META_EXTENSION: &str = "resource-meta";
const BINARY_EXTENSION: &str = "resource";
const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Archive members with this prefix are platform metadata (`__MACOSX`).
const SKIPPED_MEMBER_PREFIX: &str = "__";

/// The fields of a `.resource-meta.xml` file that matter here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticResourceMeta {
    #[serde(default)]
    pub cache_control: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl StaticResourceMeta {
    pub fn parse(content: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(content)
            .map_err(|e| Error::with_source(ErrorKind::Parse(e.to_string()), e))?;
        quick_xml::de::from_str(text)
            .map_err(|e| Error::with_source(ErrorKind::Parse(e.to_string()), e))
    }

    pub fn is_zip(&self) -> bool {
        self.content_type.as_deref() == Some(ZIP_CONTENT_TYPE)
    }
}

/// Whether a fetched file should be looked at for expansion.
pub fn is_resource_candidate(component_type: &str, key: &str) -> bool {
    if key == PACKAGE_MANIFEST {
        return false;
    }
    component_type == STATIC_RESOURCE_TYPE || key.ends_with(META_SUFFIX)
}

/// `Logo` for `staticresources/Logo.resource-meta.xml`; `None` for anything
/// whose file name does not split into a base name and `resource-meta`.
pub fn meta_base_name(key: &str) -> Option<&str> {
    let file_name = key.rsplit('/').next()?;
    let mut parts = file_name.split('.');
    let base = parts.next().filter(|base| !base.is_empty())?;
    (parts.next() == Some(META_EXTENSION)).then_some(base)
}

/// Zip resources found in a fetch: resource base name → `.resource` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceManifest {
    resources: BTreeMap<String, PathBuf>,
}

impl ResourceManifest {
    /// Scan the fetched `files` (already written below `root`) for zip resources.
    ///
    /// The binary is not checked for existence here; a missing one fails when
    /// the archive is opened.
    pub fn scan(root: &Path, component_type: &str, files: &FileSet) -> Self {
        let mut manifest = Self::default();

        for (key, content) in files {
            if !is_resource_candidate(component_type, key) {
                continue;
            }
            let Some(base) = meta_base_name(key) else {
                continue;
            };

            let meta = match StaticResourceMeta::parse(content) {
                Ok(meta) => meta,
                Err(err) => {
                    tracing::warn!(file = key, error = %err, "Unreadable static resource metadata, not expanding");
                    continue;
                }
            };
            if !meta.is_zip() {
                continue;
            }

            let meta_path = host_path(root, key);
            let dir = meta_path.parent().unwrap_or(root);
            let binary = dir.join(format!("{}.{}", base, BINARY_EXTENSION));
            tracing::debug!(resource = base, binary = %binary.display(), "Registered zip resource");
            manifest.resources.insert(base.to_string(), binary);
        }

        manifest
    }

    pub fn insert(&mut self, name: impl Into<String>, binary: impl Into<PathBuf>) {
        self.resources.insert(name.into(), binary.into());
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.resources.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.resources
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

/// A member that could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionProblem {
    pub archive: PathBuf,
    pub member: String,
    pub message: String,
}

impl std::fmt::Display for ExtractionProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.archive.display(),
            self.member,
            self.message
        )
    }
}

/// Outcome of expanding every registered resource.
#[derive(Debug, Clone, Default)]
pub struct ExpansionReport {
    /// Bundle directories that were populated.
    pub bundles: Vec<PathBuf>,
    /// Files and directories written.
    pub extracted: usize,
    /// Platform metadata members that were left out.
    pub skipped: usize,
    pub problems: Vec<ExtractionProblem>,
}

/// Unpack every resource in `manifest` into `<dir>/<name>/`.
///
/// Fails on the first archive that cannot be created or opened, even if
/// earlier ones were already expanded. Member failures are collected in the
/// report and extraction continues.
pub fn expand(manifest: &ResourceManifest) -> Result<ExpansionReport> {
    let mut report = ExpansionReport::default();

    for (name, binary) in manifest.iter() {
        let dest = binary
            .parent()
            .map(|dir| dir.join(name))
            .unwrap_or_else(|| PathBuf::from(name));
        tracing::info!(resource = name, dest = %dest.display(), "Expanding static resource");
        expand_archive(binary, &dest, &mut report)?;
        report.bundles.push(dest);
    }

    Ok(report)
}

fn expand_archive(archive_path: &Path, dest: &Path, report: &mut ExpansionReport) -> Result<()> {
    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;

    let file = File::open(archive_path).map_err(|e| {
        Error::with_source(
            ErrorKind::Archive(format!("{}: {}", archive_path.display(), e)),
            e,
        )
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| Error::archive(archive_path, e))?;

    for index in 0..archive.len() {
        let mut member = match archive.by_index(index) {
            Ok(member) => member,
            Err(err) => {
                record_problem(report, archive_path, &format!("#{}", index), err.to_string());
                continue;
            }
        };

        let name = member.name().to_string();
        if name.starts_with(SKIPPED_MEMBER_PREFIX) {
            report.skipped += 1;
            continue;
        }
        let Some(relative) = member.enclosed_name() else {
            record_problem(
                report,
                archive_path,
                &name,
                "path escapes the bundle directory".to_string(),
            );
            continue;
        };
        let target = dest.join(relative);

        let mode = member.unix_mode();
        let outcome = if member.is_dir() {
            extract_dir(mode, &target)
        } else {
            extract_file(&mut member, mode, &target).map(|bytes| {
                tracing::debug!(path = %target.display(), bytes, "Extracted");
            })
        };

        match outcome {
            Ok(()) => report.extracted += 1,
            Err(err) => record_problem(
                report,
                archive_path,
                &name,
                format!("{}: {}", target.display(), err),
            ),
        }
    }

    Ok(())
}

fn record_problem(report: &mut ExpansionReport, archive: &Path, member: &str, message: String) {
    tracing::warn!(archive = %archive.display(), member, "{}", message);
    report.problems.push(ExtractionProblem {
        archive: archive.to_path_buf(),
        member: member.to_string(),
        message,
    });
}

/// Create a directory member. The owner keeps full access so that later
/// members can still be written below it.
fn extract_dir(mode: Option<u32>, target: &Path) -> io::Result<()> {
    fs::create_dir_all(target)?;
    apply_mode(target, mode.map(|mode| mode | 0o700))
}

/// Copy one member to `target`, truncating any existing file.
fn extract_file(reader: &mut impl Read, mode: Option<u32>, target: &Path) -> io::Result<u64> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = File::create(target)?;
    let written = io::copy(reader, &mut out)?;
    apply_mode(target, mode)?;
    Ok(written)
}

#[cfg(unix)]
fn apply_mode(target: &Path, mode: Option<u32>) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    match mode {
        Some(mode) => fs::set_permissions(target, fs::Permissions::from_mode(mode & 0o7777)),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn apply_mode(_target: &Path, _mode: Option<u32>) -> io::Result<()> {
    Ok(())
}
