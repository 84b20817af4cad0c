//! End-to-end scenarios for `force fetch` and `force import` against an
//! in-memory remote org.

use std::cell::RefCell;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use busbar_sf_force::cli::{self, Command};
use busbar_sf_force::sync::{
    DeployProblem, DeployResult, DeploySuccess, DeploymentOptions, ErrorKind, FileSet,
    MetadataQueryElement, RemoteSyncClient, Result,
};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

#[derive(Default)]
struct InMemoryOrg {
    components: FileSet,
    deploy_result: DeployResult,
    queries: RefCell<Vec<Vec<MetadataQueryElement>>>,
    deploys: RefCell<Vec<(FileSet, DeploymentOptions)>>,
}

impl RemoteSyncClient for InMemoryOrg {
    async fn retrieve(&self, query: &[MetadataQueryElement]) -> Result<FileSet> {
        self.queries.borrow_mut().push(query.to_vec());
        Ok(self.components.clone())
    }

    async fn retrieve_package(&self, _name: &str) -> Result<FileSet> {
        Ok(self.components.clone())
    }

    async fn deploy(&self, files: &FileSet, options: &DeploymentOptions) -> Result<DeployResult> {
        self.deploys.borrow_mut().push((files.clone(), *options));
        Ok(self.deploy_result.clone())
    }
}

async fn force(org: &InMemoryOrg, cwd: &Path, args: &[&str]) -> anyhow::Result<String> {
    let command = Command::parse(args, cwd)?;
    let mut out = Vec::new();
    cli::run(org, &command, &mut out).await?;
    Ok(String::from_utf8(out)?)
}

fn site_bundle() -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .add_directory("img/", SimpleFileOptions::default())
        .unwrap();
    for (name, content) in [
        ("index.html", "<html></html>"),
        ("img/logo.svg", "<svg/>"),
        ("__MACOSX/._index.html", "resource fork"),
    ] {
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[tokio::test]
async fn fetch_objects_writes_files_without_scanning_resources() {
    let cwd = tempfile::tempdir().unwrap();
    let mut components = FileSet::new();
    components
        .insert("objects/Book__c.object", "<CustomObject/>")
        .unwrap();
    components
        .insert("objects/Author__c.object", "<CustomObject/>")
        .unwrap();
    let org = InMemoryOrg {
        components,
        ..InMemoryOrg::default()
    };

    let output = force(&org, cwd.path(), &["fetch", "CustomObject", "Book__c", "Author__c"])
        .await
        .unwrap();

    assert_eq!(
        org.queries.borrow().as_slice(),
        &[vec![
            MetadataQueryElement::new("CustomObject", "Book__c"),
            MetadataQueryElement::new("CustomObject", "Author__c"),
        ]]
    );
    let root = cwd.path().join("metadata");
    assert!(root.join("objects/Book__c.object").is_file());
    assert!(root.join("objects/Author__c.object").is_file());
    assert_eq!(output, format!("Exported to {}\n", root.display()));
}

#[tokio::test]
async fn fetch_without_names_asks_for_everything() {
    let cwd = tempfile::tempdir().unwrap();
    let org = InMemoryOrg::default();

    force(&org, cwd.path(), &["fetch", "ApexClass"]).await.unwrap();

    assert_eq!(
        org.queries.borrow().as_slice(),
        &[vec![MetadataQueryElement::new("ApexClass", "*")]]
    );
}

#[tokio::test]
async fn fetch_static_resource_with_unpack_expands_bundle() {
    let cwd = tempfile::tempdir().unwrap();
    let mut components = FileSet::new();
    components.insert("package.xml", "<Package/>").unwrap();
    components
        .insert("staticresources/MyResource.resource", site_bundle())
        .unwrap();
    components
        .insert(
            "staticresources/MyResource.resource-meta.xml",
            "<StaticResource><cacheControl>Public</cacheControl>\
             <contentType>application/zip</contentType></StaticResource>",
        )
        .unwrap();
    let org = InMemoryOrg {
        components,
        ..InMemoryOrg::default()
    };

    force(&org, cwd.path(), &["fetch", "StaticResource", "MyResource", "--unpack"])
        .await
        .unwrap();

    let bundle = cwd.path().join("metadata/staticresources/MyResource");
    assert_eq!(
        fs::read_to_string(bundle.join("index.html")).unwrap(),
        "<html></html>"
    );
    assert!(bundle.join("img").is_dir());
    assert!(bundle.join("img/logo.svg").is_file());
    for entry in fs::read_dir(&bundle).unwrap() {
        let name = entry.unwrap().file_name();
        assert!(!name.to_string_lossy().starts_with("__"));
    }
}

#[tokio::test]
async fn fetch_non_zip_resource_is_left_alone() {
    let cwd = tempfile::tempdir().unwrap();
    let mut components = FileSet::new();
    components
        .insert("staticresources/Styles.resource", "body {}")
        .unwrap();
    components
        .insert(
            "staticresources/Styles.resource-meta.xml",
            "<StaticResource><contentType>text/css</contentType></StaticResource>",
        )
        .unwrap();
    let org = InMemoryOrg {
        components,
        ..InMemoryOrg::default()
    };

    force(&org, cwd.path(), &["fetch", "StaticResource", "-u"])
        .await
        .unwrap();

    assert!(!cwd.path().join("metadata/staticresources/Styles").exists());
}

#[tokio::test]
async fn import_without_package_xml_fails_before_deploying() {
    let cwd = tempfile::tempdir().unwrap();
    fs::create_dir(cwd.path().join("metadata")).unwrap();
    let org = InMemoryOrg::default();

    let err = force(&org, cwd.path(), &["import"]).await.unwrap_err();

    let err = err.downcast_ref::<busbar_sf_force::sync::Error>().unwrap();
    assert!(matches!(err.kind, ErrorKind::Usage(_)));
    assert_eq!(
        err.to_string(),
        "Must specify a directory that contains metadata files"
    );
    assert!(org.deploys.borrow().is_empty());
}

#[tokio::test]
async fn import_reports_problems_without_failing() {
    let cwd = tempfile::tempdir().unwrap();
    let root = cwd.path().join("org/schema");
    fs::create_dir_all(root.join("objects")).unwrap();
    fs::write(root.join("package.xml"), "<Package/>").unwrap();
    fs::write(root.join("objects/Book__c.object"), "<CustomObject/>").unwrap();
    let org = InMemoryOrg {
        deploy_result: DeployResult {
            successes: vec![],
            problems: vec![
                DeployProblem {
                    full_name: "Book__c".to_string(),
                    problem: "Must specify a label".to_string(),
                },
                DeployProblem {
                    full_name: String::new(),
                    problem: "Deploy rolled back".to_string(),
                },
            ],
        },
        ..InMemoryOrg::default()
    };

    let output = force(
        &org,
        cwd.path(),
        &["import", "-checkonly", "-rollbackonerror", "org/schema", "-v"],
    )
    .await
    .unwrap();

    assert_eq!(
        output,
        format!(
            "\nFailures - 2\nBook__c: Must specify a label\nDeploy rolled back\n\
             \nSuccesses - 0\nImported from {}\n",
            root.display()
        )
    );

    let deploys = org.deploys.borrow();
    let (files, options) = &deploys[0];
    assert_eq!(files.len(), 2);
    assert!(options.check_only && options.rollback_on_error);
    assert!(!options.run_all_tests);
}

#[tokio::test]
async fn import_verbose_lists_successes_except_manifest() {
    let cwd = tempfile::tempdir().unwrap();
    let root = cwd.path().join("metadata");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("package.xml"), "<Package/>").unwrap();
    let org = InMemoryOrg {
        deploy_result: DeployResult {
            successes: vec![
                DeploySuccess {
                    full_name: "package.xml".to_string(),
                    changed: true,
                    ..DeploySuccess::default()
                },
                DeploySuccess {
                    full_name: "BookController".to_string(),
                    changed: true,
                    created: true,
                    id: "01p000000000001".to_string(),
                    ..DeploySuccess::default()
                },
            ],
            problems: vec![],
        },
        ..InMemoryOrg::default()
    };

    let output = force(&org, cwd.path(), &["import", "--verbose"])
        .await
        .unwrap();

    assert!(output.contains("\nSuccesses - 2\n"));
    assert!(output.contains("BookController\n\tstatus: changed\n\tid=01p000000000001\n"));
    assert!(!output.contains("package.xml"));
}
