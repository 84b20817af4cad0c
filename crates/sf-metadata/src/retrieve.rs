//! Retrieve manifests and the result of `checkRetrieveStatus`.

use crate::types::AsyncStatus;
use crate::xml;

/// The `<unpackaged>` manifest of a retrieve request.
///
/// Names are escaped when rendered, so member and type names can come
/// straight from user input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    pub types: Vec<PackageTypeMembers>,
    pub version: String,
}

/// One `<types>` entry: a metadata type and the members to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTypeMembers {
    pub name: String,
    pub members: Vec<String>,
}

impl PackageManifest {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            types: Vec::new(),
            version: version.into(),
        }
    }

    /// Add `member` under `type_name`. Types keep the order in which they
    /// first appear; members keep the order they were added.
    pub fn add_member(mut self, type_name: &str, member: impl Into<String>) -> Self {
        let member = member.into();
        match self.types.iter_mut().find(|t| t.name == type_name) {
            Some(entry) => entry.members.push(member),
            None => self.types.push(PackageTypeMembers {
                name: type_name.to_string(),
                members: vec![member],
            }),
        }
        self
    }

    pub(crate) fn to_xml(&self) -> String {
        let mut out = String::new();
        for entry in &self.types {
            out.push_str("<types>");
            for member in &entry.members {
                out.push_str(&format!("<members>{}</members>", xml::escape(member)));
            }
            out.push_str(&format!("<name>{}</name></types>", xml::escape(&entry.name)));
        }
        out.push_str(&format!("<version>{}</version>", xml::escape(&self.version)));
        out
    }
}

/// `checkRetrieveStatus` result.
#[derive(Debug, Clone, Default)]
pub struct RetrieveResult {
    pub id: String,
    pub done: bool,
    pub status: AsyncStatus,
    pub success: bool,
    pub error_message: Option<String>,
    /// Base64 zip of the retrieved files, present once the retrieve is done.
    pub zip_file: Option<String>,
    /// Non-fatal problems, e.g. a requested member that does not exist.
    pub messages: Vec<RetrieveMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrieveMessage {
    pub file_name: String,
    pub problem: String,
}
