//! Fetch: retrieve components and materialize them below a root directory.
//!
//! Runs `build query → retrieve → write files → expand resources`. The query
//! is built by [`FetchArgs::parse`](crate::query::FetchArgs::parse) before this
//! module is reached; every later step aborts the fetch on its first fatal error.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::query::{FetchArgs, FetchRequest};
use crate::remote::RemoteSyncClient;
use crate::resource::{self, ExpansionReport, ResourceManifest};
use crate::tree;

/// What a completed fetch did.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub root: PathBuf,
    pub files_written: usize,
    /// `None` when unpacking was not requested or nothing qualified.
    pub expansion: Option<ExpansionReport>,
}

/// Retrieve what `args` asks for and write it below `root`.
pub async fn fetch<C: RemoteSyncClient>(
    client: &C,
    args: &FetchArgs,
    root: &Path,
) -> Result<FetchOutcome> {
    let files = match &args.request {
        FetchRequest::Package(name) => client.retrieve_package(name).await?,
        FetchRequest::Components(query) => client.retrieve(query).await?,
    };
    tracing::info!(files = files.len(), root = %root.display(), "Retrieved metadata");

    let files_written = tree::write_tree(root, &files)?;

    let expansion = if args.unpack {
        let manifest = ResourceManifest::scan(root, &args.component_type, &files);
        if manifest.is_empty() {
            tracing::info!("No zip static resources to expand");
            None
        } else {
            Some(resource::expand(&manifest)?)
        }
    } else {
        None
    };

    Ok(FetchOutcome {
        root: root.to_path_buf(),
        files_written,
        expansion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::file_set::FileSet;
    use crate::query::MetadataQueryElement;
    use crate::testing::{Call, FakeRemote};
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const ZIP_META: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
        <StaticResource xmlns=\"http://soap.sforce.com/2006/04/metadata\">\
        <cacheControl>Private</cacheControl>\
        <contentType>application/zip</contentType>\
        </StaticResource>";

    fn bundle() -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in [
            ("css/app.css", "body {}"),
            ("js/app.js", "init();"),
            ("__MACOSX/._app.js", "junk"),
        ] {
            writer.start_file(name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn args(tokens: &[&str]) -> FetchArgs {
        FetchArgs::parse(tokens).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_components_without_unpack() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("metadata");
        let mut files = FileSet::new();
        files.insert("objects/Book__c.object", "<CustomObject/>").unwrap();
        files.insert("objects/Author__c.object", "<CustomObject/>").unwrap();
        let remote = FakeRemote::returning(files);

        let outcome = fetch(
            &remote,
            &args(&["CustomObject", "Book__c", "Author__c"]),
            &root,
        )
        .await
        .unwrap();

        assert_eq!(
            remote.calls(),
            vec![Call::Retrieve(vec![
                MetadataQueryElement::new("CustomObject", "Book__c"),
                MetadataQueryElement::new("CustomObject", "Author__c"),
            ])]
        );
        assert_eq!(outcome.files_written, 2);
        assert!(outcome.expansion.is_none());
        assert!(root.join("objects").join("Book__c.object").is_file());
        assert!(root.join("objects").join("Author__c.object").is_file());
    }

    #[tokio::test]
    async fn test_fetch_static_resource_with_unpack() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("metadata");
        let mut files = FileSet::new();
        files.insert("package.xml", "<Package/>").unwrap();
        files
            .insert("staticresources/MyResource.resource", bundle())
            .unwrap();
        files
            .insert("staticresources/MyResource.resource-meta.xml", ZIP_META)
            .unwrap();
        let remote = FakeRemote::returning(files);

        let outcome = fetch(
            &remote,
            &args(&["StaticResource", "MyResource", "--unpack"]),
            &root,
        )
        .await
        .unwrap();

        let bundle_dir = root.join("staticresources").join("MyResource");
        let expansion = outcome.expansion.unwrap();
        assert_eq!(expansion.bundles, vec![bundle_dir.clone()]);
        assert!(expansion.problems.is_empty());
        assert_eq!(
            std::fs::read_to_string(bundle_dir.join("css").join("app.css")).unwrap(),
            "body {}"
        );
        assert!(bundle_dir.join("js").join("app.js").is_file());
        assert!(!bundle_dir.join("__MACOSX").exists());
    }

    #[tokio::test]
    async fn test_fetch_package_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = FileSet::new();
        files.insert("package.xml", "<Package/>").unwrap();
        let remote = FakeRemote::returning(files);

        let outcome = fetch(&remote, &args(&["package", "Library", "-u"]), dir.path())
            .await
            .unwrap();

        assert_eq!(remote.calls(), vec![Call::RetrievePackage("Library".to_string())]);
        assert_eq!(outcome.files_written, 1);
        assert!(outcome.expansion.is_none());
    }

    #[tokio::test]
    async fn test_fetch_missing_archive_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = FileSet::new();
        files
            .insert("staticresources/Gone.resource-meta.xml", ZIP_META)
            .unwrap();
        let remote = FakeRemote::returning(files);

        let err = fetch(&remote, &args(&["StaticResource", "-u"]), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Archive(_)));
    }

    #[tokio::test]
    async fn test_fetch_transport_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("metadata");
        let remote = FakeRemote {
            fail_with: Some("INVALID_TYPE: Bogus".to_string()),
            ..FakeRemote::default()
        };

        let err = fetch(&remote, &args(&["Bogus"]), &root).await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Transport(_)));
        assert!(!root.exists());
    }
}
