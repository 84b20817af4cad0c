//! Turning `fetch` arguments into a retrieve request.

use crate::error::{Error, Result};

/// Component type token that selects a whole package instead of components.
pub const PACKAGE_TYPE: &str = "package";

/// Member name meaning "every component of this type".
pub const WILDCARD: &str = "*";

/// Tokens that enable static resource expansion.
pub const UNPACK_FLAGS: &[&str] = &["--unpack", "-u"];

/// One `(type, name)` pair of a metadata query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataQueryElement {
    pub component_type: String,
    pub name: String,
}

impl MetadataQueryElement {
    pub fn new(component_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            name: name.into(),
        }
    }
}

/// What to ask the remote system for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// Retrieve a named package as a unit.
    Package(String),
    /// Retrieve explicit components, in the order given.
    Components(Vec<MetadataQueryElement>),
}

/// Parsed `fetch` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchArgs {
    /// The component type token as given (`"package"` for package retrieval).
    pub component_type: String,
    pub request: FetchRequest,
    /// Expand zip static resources into bundle directories.
    pub unpack: bool,
}

impl FetchArgs {
    /// Parse `<type> [<name>...] [--unpack|-u]`.
    ///
    /// Flags are separated from positionals first, so `--unpack` may appear
    /// anywhere among the names.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let (flags, positionals): (Vec<&str>, Vec<&str>) = args
            .iter()
            .map(AsRef::as_ref)
            .partition(|token| UNPACK_FLAGS.contains(token));

        let unpack = !flags.is_empty();

        let Some((component_type, names)) = positionals.split_first() else {
            return Err(Error::usage("must specify object type and/or object name"));
        };

        let request = if *component_type == PACKAGE_TYPE {
            let Some((package_name, ignored)) = names.split_first() else {
                return Err(Error::usage("must specify a package name"));
            };
            if !ignored.is_empty() {
                tracing::debug!(?ignored, "Ignoring extra names for package retrieval");
            }
            FetchRequest::Package(package_name.to_string())
        } else {
            FetchRequest::Components(build_query(component_type, names))
        };

        Ok(Self {
            component_type: component_type.to_string(),
            request,
            unpack,
        })
    }
}

/// One element per name, or a single wildcard element when no names are given.
pub fn build_query<S: AsRef<str>>(component_type: &str, names: &[S]) -> Vec<MetadataQueryElement> {
    if names.is_empty() {
        return vec![MetadataQueryElement::new(component_type, WILDCARD)];
    }
    names
        .iter()
        .map(|name| MetadataQueryElement::new(component_type, name.as_ref()))
        .collect()
}
