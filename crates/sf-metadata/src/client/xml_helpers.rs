//! Text-level reading of Metadata API responses.
//!
//! Responses are matched by element name, ignoring namespace prefixes, and
//! nested detail blocks are stripped before reading summary fields so that
//! e.g. a component `<id>` never shadows the process `<id>`.

use crate::deploy::{ComponentFailure, ComponentSuccess, DeployResult, TestFailure};
use crate::error::{Error, ErrorKind, Result};
use crate::retrieve::{RetrieveMessage, RetrieveResult};
use crate::types::{AsyncStatus, SoapFault};
use crate::xml;

impl super::MetadataClient {
    /// Parse a SOAP fault from the response.
    pub(crate) fn parse_soap_fault(&self, xml: &str) -> Option<SoapFault> {
        if !xml.contains("faultcode") {
            return None;
        }

        let fault_code = self.extract_element(xml, "faultcode")?;
        let fault_string = self
            .extract_element(xml, "faultstring")
            .unwrap_or_else(|| "Unknown error".to_string());

        Some(SoapFault {
            fault_code,
            fault_string,
        })
    }

    /// Extract a simple element value from XML, with entity references decoded.
    pub(crate) fn extract_element(&self, xml: &str, tag: &str) -> Option<String> {
        for prefix in ["", "sf:", "met:", "tns:"] {
            let start = format!("<{}{}>", prefix, tag);
            let end = format!("</{}{}>", prefix, tag);

            if let Some(start_idx) = xml.find(&start) {
                let search_from = &xml[start_idx + start.len()..];
                if let Some(end_idx) = search_from.find(&end) {
                    return Some(xml::unescape(&search_from[..end_idx]).into_owned());
                }
            }
        }
        None
    }

    /// Iterate over the complete `<tag>...</tag>` blocks in `xml`.
    fn blocks<'a>(&self, xml: &'a str, tag: &str) -> Vec<&'a str> {
        let start_tag = format!("<{}>", tag);
        let end_tag = format!("</{}>", tag);
        let mut blocks = Vec::new();
        let mut search_from = xml;

        while let Some(start) = search_from.find(&start_tag) {
            let remaining = &search_from[start..];
            match remaining.find(&end_tag) {
                Some(end) => {
                    blocks.push(&remaining[..end + end_tag.len()]);
                    search_from = &remaining[end + end_tag.len()..];
                }
                None => break,
            }
        }
        blocks
    }

    /// Remove `<tag>...</tag>` blocks so summary fields are not shadowed by nested ones.
    fn without_blocks(&self, xml: &str, tag: &str) -> String {
        let mut summary = xml.to_string();
        for block in self.blocks(xml, tag) {
            summary = summary.replacen(block, "", 1);
        }
        summary
    }

    fn flag(&self, xml: &str, tag: &str) -> bool {
        self.extract_element(xml, tag)
            .map(|s| s == "true")
            .unwrap_or(false)
    }

    fn count(&self, xml: &str, tag: &str) -> u32 {
        self.extract_element(xml, tag)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    fn status(&self, xml: &str) -> AsyncStatus {
        self.extract_element(xml, "status")
            .and_then(|s| AsyncStatus::parse(&s))
            .unwrap_or_default()
    }

    /// Parse deploy result from XML.
    pub(crate) fn parse_deploy_result(&self, xml: &str) -> Result<DeployResult> {
        let summary = self.without_blocks(xml, "details");

        let id = self
            .extract_element(&summary, "id")
            .ok_or_else(|| Error::new(ErrorKind::InvalidResponse("Missing id".to_string())))?;

        Ok(DeployResult {
            id,
            done: self.flag(&summary, "done"),
            status: self.status(&summary),
            success: self.flag(&summary, "success"),
            error_message: self.extract_element(&summary, "errorMessage"),
            components_deployed: self.count(&summary, "numberComponentsDeployed"),
            component_errors: self.count(&summary, "numberComponentErrors"),
            components_total: self.count(&summary, "numberComponentsTotal"),
            component_failures: self.parse_component_failures(xml),
            component_successes: self.parse_component_successes(xml),
            test_failures: self.parse_test_failures(xml),
        })
    }

    /// Parse component failures from XML.
    pub(crate) fn parse_component_failures(&self, xml: &str) -> Vec<ComponentFailure> {
        self.blocks(xml, "componentFailures")
            .into_iter()
            .map(|block| ComponentFailure {
                component_type: self.extract_element(block, "componentType"),
                file_name: self.extract_element(block, "fileName"),
                full_name: self.extract_element(block, "fullName"),
                problem: self
                    .extract_element(block, "problem")
                    .unwrap_or_else(|| "Unknown problem".to_string()),
                problem_type: self
                    .extract_element(block, "problemType")
                    .unwrap_or_else(|| "Error".to_string()),
            })
            .collect()
    }

    /// Parse component successes from XML.
    pub(crate) fn parse_component_successes(&self, xml: &str) -> Vec<ComponentSuccess> {
        self.blocks(xml, "componentSuccesses")
            .into_iter()
            .map(|block| ComponentSuccess {
                component_type: self.extract_element(block, "componentType"),
                file_name: self.extract_element(block, "fileName"),
                full_name: self.extract_element(block, "fullName"),
                id: self.extract_element(block, "id"),
                created: self.flag(block, "created"),
                changed: self.flag(block, "changed"),
                deleted: self.flag(block, "deleted"),
            })
            .collect()
    }

    /// Parse test failures from XML.
    pub(crate) fn parse_test_failures(&self, xml: &str) -> Vec<TestFailure> {
        self.blocks(xml, "failures")
            .into_iter()
            .map(|block| TestFailure {
                name: self.extract_element(block, "name"),
                method_name: self.extract_element(block, "methodName"),
                message: self.extract_element(block, "message"),
                stack_trace: self.extract_element(block, "stackTrace"),
            })
            .collect()
    }

    /// Parse retrieve result from XML.
    pub(crate) fn parse_retrieve_result(&self, xml: &str) -> Result<RetrieveResult> {
        let summary = self.without_blocks(
            &self.without_blocks(xml, "fileProperties"),
            "messages",
        );

        let id = self
            .extract_element(&summary, "id")
            .ok_or_else(|| Error::new(ErrorKind::InvalidResponse("Missing id".to_string())))?;

        Ok(RetrieveResult {
            id,
            done: self.flag(&summary, "done"),
            status: self.status(&summary),
            success: self.flag(&summary, "success"),
            error_message: self.extract_element(&summary, "errorMessage"),
            zip_file: self.extract_element(&summary, "zipFile"),
            messages: self.parse_retrieve_messages(xml),
        })
    }

    /// Parse retrieve messages from XML.
    pub(crate) fn parse_retrieve_messages(&self, xml: &str) -> Vec<RetrieveMessage> {
        self.blocks(xml, "messages")
            .into_iter()
            .filter_map(|block| {
                Some(RetrieveMessage {
                    file_name: self.extract_element(block, "fileName")?,
                    problem: self.extract_element(block, "problem")?,
                })
            })
            .collect()
    }
}
