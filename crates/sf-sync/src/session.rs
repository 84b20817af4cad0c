//! The remote session handle, built once by the command layer and passed down.
//!
//! The access token is redacted in Debug output and never logged.

use busbar_sf_metadata::{MetadataClient, DEFAULT_API_VERSION};

use crate::config::SyncConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::remote::MetadataRemote;

#[derive(Clone)]
pub struct Session {
    instance_url: String,
    access_token: String,
    api_version: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl Session {
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            instance_url: instance_url.into(),
            access_token: access_token.into(),
            api_version: api_version.into(),
        }
    }

    /// Load the session from environment variables.
    ///
    /// Required:
    /// - `SF_INSTANCE_URL` or `SALESFORCE_INSTANCE_URL`
    /// - `SF_ACCESS_TOKEN` or `SALESFORCE_ACCESS_TOKEN`
    ///
    /// Optional:
    /// - `SF_API_VERSION` or `SALESFORCE_API_VERSION` (default: "62.0")
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let either = |primary: &str, fallback: &str| {
            lookup(primary)
                .or_else(|| lookup(fallback))
                .filter(|value| !value.trim().is_empty())
        };

        let instance_url = either("SF_INSTANCE_URL", "SALESFORCE_INSTANCE_URL").ok_or_else(|| {
            Error::new(ErrorKind::Config(
                "SF_INSTANCE_URL environment variable is not set".to_string(),
            ))
        })?;
        let access_token = either("SF_ACCESS_TOKEN", "SALESFORCE_ACCESS_TOKEN").ok_or_else(|| {
            Error::new(ErrorKind::Config(
                "SF_ACCESS_TOKEN environment variable is not set".to_string(),
            ))
        })?;
        let api_version = either("SF_API_VERSION", "SALESFORCE_API_VERSION")
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        Ok(Self::new(instance_url, access_token, api_version))
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// A Metadata API client bound to this session.
    pub fn metadata_client(&self) -> MetadataClient {
        MetadataClient::from_parts(&self.instance_url, &self.access_token)
            .with_api_version(&self.api_version)
    }

    /// The remote collaborator used by fetch and import.
    pub fn connect(&self, config: &SyncConfig) -> MetadataRemote {
        tracing::debug!(instance_url = %self.instance_url, api_version = %self.api_version, "Connecting");
        MetadataRemote::new(self.metadata_client(), config.clone())
    }
}
