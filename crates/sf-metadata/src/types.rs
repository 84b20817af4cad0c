//! Shapes shared by retrieve and deploy.

use std::time::Duration;

/// Metadata API version requests are made against unless overridden.
pub const DEFAULT_API_VERSION: &str = "62.0";

/// A `<soapenv:Fault>` returned instead of a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    pub fault_code: String,
    pub fault_string: String,
}

impl std::fmt::Display for SoapFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.fault_code, self.fault_string)
    }
}

impl std::error::Error for SoapFault {}

/// State of an asynchronous retrieve or deploy, as reported in `<status>`.
///
/// Unrecognised values read as `Pending` so that polling carries on until
/// `<done>` says otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AsyncStatus {
    #[default]
    Pending,
    InProgress,
    Succeeded,
    SucceededPartial,
    Failed,
    Canceling,
    Canceled,
}

impl AsyncStatus {
    pub fn parse(value: &str) -> Option<Self> {
        let status = match value {
            "Pending" => Self::Pending,
            "InProgress" => Self::InProgress,
            "Succeeded" => Self::Succeeded,
            "SucceededPartial" => Self::SucceededPartial,
            "Failed" => Self::Failed,
            "Canceling" => Self::Canceling,
            "Canceled" => Self::Canceled,
            _ => return None,
        };
        Some(status)
    }
}

/// How long to wait on an asynchronous operation, and how often to ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(600),
        }
    }
}
