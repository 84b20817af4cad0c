//! Import: read a metadata directory and deploy it as one change-set.

use std::path::{Path, PathBuf};

use crate::deploy::{DeployResult, DeploymentOptions};
use crate::error::Result;
use crate::remote::RemoteSyncClient;
use crate::tree;

/// What a completed import did.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub root: PathBuf,
    pub files_sent: usize,
    pub result: DeployResult,
}

/// Deploy the tree at `root`.
///
/// Fails before contacting the remote system when `root` has no `package.xml`
/// or cannot be read. Problems reported by the deploy are part of the outcome,
/// not an error.
pub async fn import<C: RemoteSyncClient>(
    client: &C,
    root: &Path,
    options: &DeploymentOptions,
) -> Result<ImportOutcome> {
    let files = tree::read_tree(root)?;
    tracing::info!(files = files.len(), root = %root.display(), ?options, "Deploying directory");

    let result = client.deploy(&files, options).await?;
    tracing::info!(
        successes = result.successes.len(),
        problems = result.problems.len(),
        "Deploy finished"
    );

    Ok(ImportOutcome {
        root: root.to_path_buf(),
        files_sent: files.len(),
        result,
    })
}
