use base64::{engine::general_purpose, Engine as _};

use super::{wait_until_done, METADATA_NS};
use crate::deploy::{DeployOptions, DeployResult};
use crate::error::Result;
use crate::types::PollOptions;
use crate::xml;

impl super::MetadataClient {
    /// Start deploying `package_zip`, a zip with `package.xml` at its root
    /// and components under their type directories. Returns the async
    /// process id.
    pub async fn deploy(&self, package_zip: &[u8], options: DeployOptions) -> Result<String> {
        let body = format!(
            "<deploy xmlns=\"{ns}\"><ZipFile>{zip}</ZipFile>\
             <DeployOptions>{options}</DeployOptions></deploy>",
            ns = METADATA_NS,
            zip = general_purpose::STANDARD.encode(package_zip),
            options = options.to_xml(),
        );
        let response = self.call("deploy", &body).await?;
        self.async_process_id(&response, "deploy")
    }

    pub async fn check_deploy_status(
        &self,
        async_process_id: &str,
        include_details: bool,
    ) -> Result<DeployResult> {
        let body = format!(
            "<checkDeployStatus xmlns=\"{ns}\">\
             <asyncProcessId>{id}</asyncProcessId><includeDetails>{include_details}</includeDetails>\
             </checkDeployStatus>",
            ns = METADATA_NS,
            id = xml::escape(async_process_id),
        );
        let response = self.call("checkDeployStatus", &body).await?;
        self.parse_deploy_result(&response)
    }

    /// Poll a deploy until it is done and return the result with details.
    ///
    /// An unsuccessful deploy is still `Ok`: its problems are in the result.
    pub async fn wait_for_deploy(
        &self,
        async_process_id: &str,
        poll: PollOptions,
    ) -> Result<DeployResult> {
        let result = wait_until_done(poll, |r: &DeployResult| r.done, || {
            self.check_deploy_status(async_process_id, true)
        })
        .await?;

        tracing::debug!(
            id = %result.id,
            status = ?result.status,
            deployed = result.components_deployed,
            errors = result.component_errors,
            total = result.components_total,
            "Deploy finished"
        );
        Ok(result)
    }

    pub async fn deploy_and_wait(
        &self,
        package_zip: &[u8],
        options: DeployOptions,
        poll: PollOptions,
    ) -> Result<DeployResult> {
        let async_id = self.deploy(package_zip, options).await?;
        self.wait_for_deploy(&async_id, poll).await
    }
}
