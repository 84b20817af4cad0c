use super::{wait_until_done, METADATA_NS};
use crate::error::{Error, ErrorKind, Result};
use crate::retrieve::{PackageManifest, RetrieveResult};
use crate::types::PollOptions;
use crate::xml;

impl super::MetadataClient {
    /// Start retrieving the components listed in `manifest`. Returns the
    /// async process id to poll with [`check_retrieve_status`](Self::check_retrieve_status).
    ///
    /// ```rust,ignore
    /// let manifest = PackageManifest::new("62.0").add_member("CustomObject", "Book__c");
    /// let async_id = client.retrieve_unpackaged(&manifest).await?;
    /// ```
    pub async fn retrieve_unpackaged(&self, manifest: &PackageManifest) -> Result<String> {
        let request = format!("<unpackaged>{}</unpackaged>", manifest.to_xml());
        self.start_retrieve(&request).await
    }

    /// Start retrieving every component of the package named `package_name`.
    pub async fn retrieve_packaged(&self, package_name: &str) -> Result<String> {
        let request = format!("<packageNames>{}</packageNames>", xml::escape(package_name));
        self.start_retrieve(&request).await
    }

    async fn start_retrieve(&self, request: &str) -> Result<String> {
        let body = format!(
            "<retrieve xmlns=\"{ns}\"><retrieveRequest>\
             <apiVersion>{version}</apiVersion>{request}\
             </retrieveRequest></retrieve>",
            ns = METADATA_NS,
            version = xml::escape(&self.api_version),
            request = request,
        );
        let response = self.call("retrieve", &body).await?;
        self.async_process_id(&response, "retrieve")
    }

    pub async fn check_retrieve_status(
        &self,
        async_process_id: &str,
        include_zip: bool,
    ) -> Result<RetrieveResult> {
        let body = format!(
            "<checkRetrieveStatus xmlns=\"{ns}\">\
             <asyncProcessId>{id}</asyncProcessId><includeZip>{include_zip}</includeZip>\
             </checkRetrieveStatus>",
            ns = METADATA_NS,
            id = xml::escape(async_process_id),
        );
        let response = self.call("checkRetrieveStatus", &body).await?;
        self.parse_retrieve_result(&response)
    }

    /// Poll a retrieve until it is done and return the result with its zip.
    ///
    /// A retrieve that finishes unsuccessfully is [`ErrorKind::RetrieveFailed`].
    /// Per-file messages of a successful retrieve are logged as warnings.
    pub async fn wait_for_retrieve(
        &self,
        async_process_id: &str,
        poll: PollOptions,
    ) -> Result<RetrieveResult> {
        let result = wait_until_done(poll, |r: &RetrieveResult| r.done, || {
            self.check_retrieve_status(async_process_id, true)
        })
        .await?;

        if !result.success {
            let message = result
                .error_message
                .unwrap_or_else(|| format!("retrieve {} finished as {:?}", result.id, result.status));
            return Err(Error::new(ErrorKind::RetrieveFailed(message)));
        }
        for message in &result.messages {
            tracing::warn!(file = %message.file_name, "{}", message.problem);
        }
        Ok(result)
    }

    pub async fn retrieve_unpackaged_and_wait(
        &self,
        manifest: &PackageManifest,
        poll: PollOptions,
    ) -> Result<RetrieveResult> {
        let async_id = self.retrieve_unpackaged(manifest).await?;
        self.wait_for_retrieve(&async_id, poll).await
    }

    pub async fn retrieve_packaged_and_wait(
        &self,
        package_name: &str,
        poll: PollOptions,
    ) -> Result<RetrieveResult> {
        let async_id = self.retrieve_packaged(package_name).await?;
        self.wait_for_retrieve(&async_id, poll).await
    }
}
