//! Sync configuration.

use std::time::Duration;

use busbar_sf_metadata::PollOptions;

use crate::error::{Error, ErrorKind, Result};

/// Directory fetched into and imported from when none is given.
pub const DEFAULT_ROOT_DIR: &str = "metadata";

/// How the Metadata API transport waits on asynchronous operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Delay between status checks.
    pub poll_interval: Duration,
    /// Give up on a retrieve or deploy after this long.
    pub timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(600),
        }
    }
}

impl SyncConfig {
    /// Create a new sync config builder.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Defaults, overridden by `SF_POLL_INTERVAL_SECS` and `SF_POLL_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(secs) = seconds(&lookup, "SF_POLL_INTERVAL_SECS")? {
            builder = builder.with_poll_interval(secs);
        }
        if let Some(secs) = seconds(&lookup, "SF_POLL_TIMEOUT_SECS")? {
            builder = builder.with_timeout(secs);
        }
        Ok(builder.build())
    }

    pub fn poll_options(&self) -> PollOptions {
        PollOptions {
            interval: self.poll_interval,
            timeout: self.timeout,
        }
    }
}

fn seconds(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<Duration>> {
    let Some(value) = lookup(name) else {
        return Ok(None);
    };
    let secs = value.trim().parse::<u64>().map_err(|e| {
        Error::with_source(
            ErrorKind::Config(format!("{} must be a number of seconds, got {:?}", name, value)),
            e,
        )
    })?;
    if secs == 0 {
        return Err(Error::new(ErrorKind::Config(format!(
            "{} must be at least 1 second",
            name
        ))));
    }
    Ok(Some(Duration::from_secs(secs)))
}

/// Builder for SyncConfig.
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    config: SyncConfig,
}

impl SyncConfigBuilder {
    /// Set the delay between status checks.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set the overall wait limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the sync configuration.
    pub fn build(self) -> SyncConfig {
        self.config
    }
}
