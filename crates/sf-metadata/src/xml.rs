//! XML escaping for values placed into SOAP envelopes.
//!
//! Every user-provided value (member names, package names, process IDs)
//! MUST pass through [`escape`] before it is interpolated into a request body.

use std::borrow::Cow;

/// Escape a string for safe inclusion in XML content.
///
/// ```rust
/// use busbar_sf_metadata::xml;
///
/// let safe = xml::escape("Book__c <script>");
/// assert_eq!(safe, "Book__c &lt;script&gt;");
/// ```
#[must_use]
pub fn escape(value: &str) -> String {
    quick_xml::escape::escape(value).into_owned()
}

/// Decode entity references in element text taken from a response.
///
/// Text with malformed entities is returned as-is.
pub fn unescape(value: &str) -> Cow<'_, str> {
    match quick_xml::escape::unescape(value) {
        Ok(text) => text,
        Err(_) => Cow::Borrowed(value),
    }
}
