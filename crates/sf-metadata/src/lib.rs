//! # busbar-sf-metadata
//!
//! Salesforce Metadata API client for deploying and retrieving metadata.
//!
//! ## Features
//!
//! - **Deploy** - Deploy a zipped metadata package via the SOAP API
//! - **Retrieve** - Retrieve unpackaged metadata or a named package from an org
//! - **Status Polling** - Automatic polling for async operations
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_metadata::{MetadataClient, DeployOptions, PackageManifest, PollOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_metadata::Error> {
//!     let client = MetadataClient::from_parts("https://na1.salesforce.com", "00D...")
//!         .with_api_version("62.0");
//!
//!     // Deploy a package
//!     let zip_bytes = std::fs::read("package.zip")?;
//!     let async_id = client.deploy(&zip_bytes, DeployOptions::default()).await?;
//!     let result = client.wait_for_deploy(&async_id, PollOptions::default()).await?;
//!     println!("Deploy status: {:?}", result.status);
//!
//!     // Retrieve metadata (with secure XML escaping)
//!     let manifest = PackageManifest::new("62.0").add_member("ApexClass", "*");
//!     let retrieved = client
//!         .retrieve_unpackaged_and_wait(&manifest, PollOptions::default())
//!         .await?;
//!     println!("zip present: {}", retrieved.zip_file.is_some());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod deploy;
mod error;
mod retrieve;
mod types;
pub mod xml;

pub use client::MetadataClient;
pub use deploy::{ComponentFailure, ComponentSuccess, DeployOptions, DeployResult, TestFailure};
pub use error::{Error, ErrorKind, Result};
pub use retrieve::{PackageManifest, PackageTypeMembers, RetrieveMessage, RetrieveResult};
pub use types::{AsyncStatus, PollOptions, SoapFault, DEFAULT_API_VERSION};
