//! # busbar-sf-sync
//!
//! Bidirectional sync between Salesforce metadata components and a local
//! directory tree.
//!
//! ## Features
//!
//! - **Fetch** - Retrieve components or a package and mirror them on disk
//! - **Static resource expansion** - Unpack zip static resources into bundle directories
//! - **Import** - Deploy a local metadata directory as one change-set
//! - **Reporting** - Render deploy successes and problems
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_sync::{fetch, import, FetchArgs, DeploymentOptions, Session, SyncConfig};
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), busbar_sf_sync::Error> {
//!     let session = Session::from_env()?;
//!     let remote = session.connect(&SyncConfig::from_env()?);
//!
//!     let args = FetchArgs::parse(&["StaticResource", "--unpack"])?;
//!     fetch(&remote, &args, Path::new("metadata")).await?;
//!
//!     let outcome = import(&remote, Path::new("metadata"), &DeploymentOptions::default()).await?;
//!     println!("{} problems", outcome.result.problems.len());
//!     Ok(())
//! }
//! ```

mod config;
mod deploy;
mod error;
mod fetch;
mod file_set;
mod import;
mod query;
mod remote;
mod report;
mod resource;
mod session;
mod tree;

#[cfg(test)]
mod testing;

pub use config::{SyncConfig, SyncConfigBuilder, DEFAULT_ROOT_DIR};
pub use deploy::{ComponentStatus, DeployProblem, DeployResult, DeploySuccess, DeploymentOptions};
pub use error::{Error, ErrorKind, Result};
pub use fetch::{fetch, FetchOutcome};
pub use file_set::FileSet;
pub use import::{import, ImportOutcome};
pub use query::{
    build_query, FetchArgs, FetchRequest, MetadataQueryElement, PACKAGE_TYPE, UNPACK_FLAGS,
    WILDCARD,
};
pub use remote::{pack_deploy_zip, unpack_retrieve_zip, MetadataRemote, RemoteSyncClient};
pub use report::{write_fetch_report, write_import_report};
pub use resource::{
    expand, is_resource_candidate, meta_base_name, ExpansionReport, ExtractionProblem,
    ResourceManifest, StaticResourceMeta, STATIC_RESOURCE_TYPE,
};
pub use session::Session;
pub use tree::{host_path, read_tree, write_tree, PACKAGE_MANIFEST};
