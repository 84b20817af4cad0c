//! Metadata API client.

use std::future::Future;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{Error, ErrorKind, Result};
use crate::types::{PollOptions, DEFAULT_API_VERSION};
use crate::xml;

mod deploy;
mod retrieve;
mod xml_helpers;

static SOAP_ACTION_HEADER: HeaderName = HeaderName::from_static("soapaction");

/// Namespace of every Metadata API request element.
pub(crate) const METADATA_NS: &str = "http://soap.sforce.com/2006/04/metadata";

/// Salesforce Metadata API client, bound to one org session.
pub struct MetadataClient {
    instance_url: String,
    access_token: String,
    api_version: String,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for MetadataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataClient")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl MetadataClient {
    /// Client for the org at `instance_url`, authenticated with `access_token`.
    pub fn from_parts(instance_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    fn endpoint(&self) -> String {
        format!("{}/services/Soap/m/{}", self.instance_url, self.api_version)
    }

    fn headers(&self, soap_action: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/xml;charset=UTF-8"));
        headers.insert(SOAP_ACTION_HEADER.clone(), HeaderValue::from_str(soap_action)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.access_token))?,
        );
        Ok(headers)
    }

    fn envelope(&self, body: &str) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="utf-8"?>"#,
                r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">"#,
                r#"<soapenv:Header><SessionHeader xmlns="{ns}"><sessionId>{session}</sessionId></SessionHeader></soapenv:Header>"#,
                r#"<soapenv:Body>{body}</soapenv:Body>"#,
                r#"</soapenv:Envelope>"#,
            ),
            ns = METADATA_NS,
            session = xml::escape(&self.access_token),
            body = body,
        )
    }

    /// POST `body` as the SOAP action `soap_action` and return the raw
    /// response. A fault in the response is an error regardless of the HTTP
    /// status.
    pub(crate) async fn call(&self, soap_action: &str, body: &str) -> Result<String> {
        tracing::debug!(action = soap_action, "Metadata API call");

        let response = self
            .http_client
            .post(self.endpoint())
            .headers(self.headers(soap_action)?)
            .body(self.envelope(body))
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if let Some(fault) = self.parse_soap_fault(&text) {
            return Err(Error::with_source(ErrorKind::SoapFault(fault.to_string()), fault));
        }
        if !status.is_success() {
            return Err(Error::new(ErrorKind::Http(format!(
                "{} from {}",
                status, soap_action
            ))));
        }

        Ok(text)
    }

    /// The `<id>` of an asynchronous operation that was just started.
    pub(crate) fn async_process_id(&self, response: &str, operation: &str) -> Result<String> {
        self.extract_element(response, "id").ok_or_else(|| {
            Error::new(ErrorKind::InvalidResponse(format!(
                "no async process id in {} response",
                operation
            )))
        })
    }
}

/// Run `check` every `poll.interval` until `is_done` accepts its result.
///
/// Fails with [`ErrorKind::Timeout`] once `poll.timeout` has elapsed.
pub(crate) async fn wait_until_done<T, F, Fut>(
    poll: PollOptions,
    is_done: fn(&T) -> bool,
    mut check: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let polling = async {
        loop {
            let result = check().await?;
            if is_done(&result) {
                return Ok::<T, Error>(result);
            }
            tokio::time::sleep(poll.interval).await;
        }
    };

    tokio::time::timeout(poll.timeout, polling)
        .await
        .map_err(|_| Error::new(ErrorKind::Timeout))?
}
