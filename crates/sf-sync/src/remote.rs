//! The remote collaborator for fetch and import.
//!
//! [`RemoteSyncClient`] is the seam the orchestration talks to. [`MetadataRemote`]
//! implements it on top of the SOAP Metadata API: retrieves and deploys are
//! asynchronous there, so every call polls until the operation is done.

use std::io::{Cursor, Read, Write};

use base64::{engine::general_purpose, Engine as _};
use busbar_sf_metadata::{MetadataClient, PackageManifest};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::config::SyncConfig;
use crate::deploy::{DeployResult, DeploymentOptions};
use crate::error::{Error, ErrorKind, Result};
use crate::file_set::FileSet;
use crate::query::MetadataQueryElement;

/// Folder the Metadata API nests an unpackaged retrieve under.
const UNPACKAGED_ROOT: &str = "unpackaged";

/// Retrieve and deploy metadata against a remote org.
#[allow(async_fn_in_trait)]
pub trait RemoteSyncClient {
    /// Retrieve the components named by `query`.
    async fn retrieve(&self, query: &[MetadataQueryElement]) -> Result<FileSet>;

    /// Retrieve every component of the package `name`.
    async fn retrieve_package(&self, name: &str) -> Result<FileSet>;

    /// Deploy `files` as one package. A deploy the org rejects is still `Ok`;
    /// its problems are in the result.
    async fn deploy(&self, files: &FileSet, options: &DeploymentOptions) -> Result<DeployResult>;
}

/// [`RemoteSyncClient`] backed by the Metadata API.
#[derive(Debug)]
pub struct MetadataRemote {
    client: MetadataClient,
    config: SyncConfig,
}

impl MetadataRemote {
    pub fn new(client: MetadataClient, config: SyncConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &MetadataClient {
        &self.client
    }

    fn manifest(&self, query: &[MetadataQueryElement]) -> PackageManifest {
        query
            .iter()
            .fold(PackageManifest::new(self.client.api_version()), |manifest, element| {
                manifest.add_member(&element.component_type, element.name.as_str())
            })
    }
}

impl RemoteSyncClient for MetadataRemote {
    async fn retrieve(&self, query: &[MetadataQueryElement]) -> Result<FileSet> {
        let manifest = self.manifest(query);
        tracing::info!(types = manifest.types.len(), "Retrieving metadata");

        let result = self
            .client
            .retrieve_unpackaged_and_wait(&manifest, self.config.poll_options())
            .await?;

        unpack_retrieve_zip(result.zip_file.as_deref().unwrap_or_default(), UNPACKAGED_ROOT)
    }

    async fn retrieve_package(&self, name: &str) -> Result<FileSet> {
        tracing::info!(package = %name, "Retrieving package");

        let result = self
            .client
            .retrieve_packaged_and_wait(name, self.config.poll_options())
            .await?;

        unpack_retrieve_zip(result.zip_file.as_deref().unwrap_or_default(), name)
    }

    async fn deploy(&self, files: &FileSet, options: &DeploymentOptions) -> Result<DeployResult> {
        let package = pack_deploy_zip(files)?;
        tracing::info!(files = files.len(), bytes = package.len(), "Deploying metadata");

        let result = self
            .client
            .deploy_and_wait(&package, options.into(), self.config.poll_options())
            .await?;

        Ok(result.into())
    }
}

/// Decode the base64 zip of a retrieve result into a [`FileSet`].
///
/// Entries are keyed with the leading `prefix/` folder removed. Directory
/// entries are skipped. An empty payload yields an empty set.
pub fn unpack_retrieve_zip(encoded: &str, prefix: &str) -> Result<FileSet> {
    let mut files = FileSet::new();

    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        tracing::warn!("Retrieve returned no zip payload");
        return Ok(files);
    }

    let bytes = general_purpose::STANDARD.decode(compact.as_bytes()).map_err(|e| {
        Error::with_source(
            ErrorKind::Parse(format!("retrieve payload is not valid base64: {}", e)),
            e,
        )
    })?;

    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let folder = format!("{}/", prefix);

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let key = name.strip_prefix(&folder).unwrap_or(&name).to_string();

        let mut content = Vec::new();
        entry.read_to_end(&mut content)?;
        files.insert(&key, content)?;
    }

    tracing::debug!(files = files.len(), "Unpacked retrieve payload");
    Ok(files)
}

/// Pack `files` into a deflated zip with `package.xml` at its root.
pub fn pack_deploy_zip(files: &FileSet) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (key, content) in files {
        writer.start_file(key, options)?;
        writer.write_all(content)?;
    }

    Ok(writer.finish()?.into_inner())
}
