//! Pattern-based extraction of `<meta>`/`<link>` attribute values.
//!
//! This is deliberately not an HTML parser. Each field is located by
//! a byte regex ("the first `<meta ...>` whose `name` is X, up to its
//! `content=`"), then the quoted value is sliced out by hand. A
//! document with no match yields an empty value, never an error.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::core::html::MAX_FIELD_LEN;
use crate::core::types::ExtractedMetadata;

/// Matches the opening `<title ...>` tag
static TITLE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s-u)<\s*title[^>]*>").expect("title pattern"));

/// Literal closing tag searched for byte-by-byte, not via the tag machine
const TITLE_CLOSE: &[u8] = b"</title>";

/// A precompiled locator for one attribute value inside one tag kind.
///
/// The pattern matches up to and including the value attribute's `=`;
/// the quoted value after it is extracted by [`AttributePattern::extract`].
#[derive(Debug, Clone)]
pub struct AttributePattern {
    re: Regex,
}

impl AttributePattern {
    /// `<meta ... name="<name>" ... content=`
    pub fn meta(name: &str) -> Self {
        Self::new("meta", "name", name, "content")
    }

    /// `<link ... rel="<rel>" ... href=`
    pub fn link(rel: &str) -> Self {
        Self::new("link", "rel", rel, "href")
    }

    /// Build a locator for `<tag ... match_attr="match_value" ... value_attr=`.
    ///
    /// Attribute names match case-sensitively; arbitrary intervening
    /// attributes and whitespace are tolerated.
    pub fn new(tag: &str, match_attr: &str, match_value: &str, value_attr: &str) -> Self {
        let pattern = format!(
            r#"(?s-u)<{tag}\s[^>]*?{match_attr}\s*=\s*["']{value}["'][^>]*?{value_attr}\s*=\s*"#,
            tag = regex::escape(tag),
            match_attr = regex::escape(match_attr),
            value = regex::escape(match_value),
            value_attr = regex::escape(value_attr),
        );
        Self {
            re: Regex::new(&pattern).expect("attribute pattern"),
        }
    }

    /// Extract the attribute value from `doc`, or empty if absent.
    ///
    /// The byte right after the matched `=` must be `"` or `'`; an
    /// unquoted or unterminated value extracts nothing. A delimiter
    /// preceded by `\` does not close the value. The result is capped
    /// at [`MAX_FIELD_LEN`] bytes.
    pub fn extract(&self, doc: &[u8]) -> Vec<u8> {
        let Some(m) = self.re.find(doc) else {
            return Vec::new();
        };
        let value_start = m.end();
        let Some(&delimiter) = doc.get(value_start) else {
            return Vec::new();
        };
        if delimiter != b'"' && delimiter != b'\'' {
            return Vec::new();
        }
        let mut i = value_start + 1;
        while i < doc.len() {
            if doc[i] == delimiter && doc[i - 1] != b'\\' {
                let end = (value_start + 1 + MAX_FIELD_LEN).min(i);
                return doc[value_start + 1..end].to_vec();
            }
            i += 1;
        }
        Vec::new()
    }
}

/// Extract the `<title>` text: everything between the end of the
/// first opening title tag and the literal `</title>`, capped at
/// [`MAX_FIELD_LEN`] bytes. Empty if either tag is missing.
pub fn extract_title(doc: &[u8]) -> Vec<u8> {
    let Some(m) = TITLE_OPEN.find(doc) else {
        return Vec::new();
    };
    let text_start = m.end();
    let Some(rel) = find_subsequence(&doc[text_start..], TITLE_CLOSE) else {
        return Vec::new();
    };
    let end = (text_start + MAX_FIELD_LEN).min(text_start + rel);
    doc[text_start..end].to_vec()
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Extracts the full metadata set for a document in one call.
///
/// Patterns are compiled once at construction and reused across the
/// whole indexing batch.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    description: AttributePattern,
    keywords: AttributePattern,
    robots: AttributePattern,
    canonical: AttributePattern,
}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self {
            description: AttributePattern::meta("description"),
            keywords: AttributePattern::meta("keywords"),
            robots: AttributePattern::meta("robots"),
            canonical: AttributePattern::link("canonical"),
        }
    }

    /// Pull all metadata fields from a raw document buffer.
    ///
    /// Pure function of the buffer; absent fields come back empty.
    pub fn extract(&self, doc: &[u8]) -> ExtractedMetadata {
        ExtractedMetadata {
            title: extract_title(doc),
            description: self.description.extract(doc),
            keywords: self.keywords.extract(doc),
            robots: self.robots.extract(doc),
            canonical: self.canonical.extract(doc),
        }
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}
