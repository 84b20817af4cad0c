//! # busbar-sf-force
//!
//! Fetch Salesforce metadata into a local directory and import it back.
//!
//! ## Crates
//!
//! - **busbar-sf-metadata** - Metadata API: retrieve, deploy and status polling over SOAP
//! - **busbar-sf-sync** - Query building, local tree materialization, static resource
//!   expansion, fetch and import orchestration
//!
//! ## Quick Start
//!
//! ```sh
//! export SF_INSTANCE_URL='https://na1.salesforce.com'
//! export SF_ACCESS_TOKEN='00D...'
//! force fetch StaticResource --unpack
//! force import -checkonly -v
//! ```

pub mod cli;

// Re-export all crates for convenient access
pub use busbar_sf_metadata as metadata;
pub use busbar_sf_sync as sync;

pub use busbar_sf_sync::{Session, SyncConfig};
