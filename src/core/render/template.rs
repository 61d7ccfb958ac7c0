//! Directive-based result-page templating.
//!
//! A template is markup with `{{ ... }}` directives; exactly three
//! directive names exist (`results`, `search`, `search_escaped`) and
//! anything else is a parse error. Templates are parsed once, at
//! configuration load, and rendered per query against a pre-built
//! result-list fragment. Rendering streams to an `io::Write` sink so
//! a large result page never needs one contiguous doubling buffer.

use std::io::Write;

use crate::core::error::{Result, SitefindError};
use crate::core::record::ResultRecord;

/// One parsed template node, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateNode {
    /// Literal bytes copied through unchanged
    Text(Vec<u8>),
    /// Replaced by the pre-rendered result-list fragment
    Results,
    /// Replaced by the raw query bytes
    QueryRaw,
    /// Replaced by the query with every `'` prefixed by `\`
    QueryEscaped,
}

/// A parsed, reusable template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<TemplateNode>,
}

impl Template {
    /// Parse template source into a node sequence.
    ///
    /// Whitespace inside the braces is ignored; an unknown directive
    /// name fails with [`SitefindError::TemplateParse`] and no
    /// partial template is produced. A `{{` with no closing `}}` is
    /// literal text, not a directive.
    pub fn parse(source: &[u8]) -> Result<Self> {
        let mut nodes = Vec::new();
        let mut rest = source;

        while let Some(open) = find(rest, b"{{") {
            let Some(close_rel) = find(&rest[open + 2..], b"}}") else {
                break;
            };
            if open > 0 {
                nodes.push(TemplateNode::Text(rest[..open].to_vec()));
            }

            let body = &rest[open + 2..open + 2 + close_rel];
            let directive = trim_ascii(body);
            let node = match directive {
                b"results" => TemplateNode::Results,
                b"search" => TemplateNode::QueryRaw,
                b"search_escaped" => TemplateNode::QueryEscaped,
                other => {
                    return Err(SitefindError::TemplateParse(
                        String::from_utf8_lossy(other).into_owned(),
                    ))
                }
            };
            nodes.push(node);
            rest = &rest[open + 2 + close_rel + 2..];
        }

        if !rest.is_empty() {
            nodes.push(TemplateNode::Text(rest.to_vec()));
        }

        Ok(Self { nodes })
    }

    /// Render against a query and a pre-rendered result fragment,
    /// emitting to `sink`. Returns the total number of bytes written.
    pub fn render<W: Write>(
        &self,
        query: &[u8],
        results_fragment: &[u8],
        sink: &mut W,
    ) -> Result<usize> {
        let mut total = 0usize;
        for node in &self.nodes {
            match node {
                TemplateNode::Text(bytes) => {
                    sink.write_all(bytes)?;
                    total += bytes.len();
                }
                TemplateNode::Results => {
                    sink.write_all(results_fragment)?;
                    total += results_fragment.len();
                }
                TemplateNode::QueryRaw => {
                    sink.write_all(query)?;
                    total += query.len();
                }
                TemplateNode::QueryEscaped => {
                    for &b in query {
                        if b == b'\'' {
                            sink.write_all(b"\\")?;
                            total += 1;
                        }
                        sink.write_all(&[b])?;
                        total += 1;
                    }
                }
            }
        }
        Ok(total)
    }

    /// Node sequence, for inspection
    pub fn nodes(&self) -> &[TemplateNode] {
        &self.nodes
    }
}

/// Build the result-list fragment substituted for `{{ results }}`:
/// one fixed markup block per record, in ranked order. The canonical
/// URL is the link target, falling back to the record path.
pub fn render_result_fragments(records: &[ResultRecord]) -> Vec<u8> {
    let mut out = Vec::new();
    for record in records {
        let href: &[u8] = if record.url.is_empty() {
            &record.path
        } else {
            &record.url
        };
        out.extend_from_slice(b"<li class=\"search-result\"><a href=\"");
        out.extend_from_slice(href);
        out.extend_from_slice(b"\"><h3>");
        out.extend_from_slice(&record.title);
        out.extend_from_slice(b"</h3><p>");
        out.extend_from_slice(&record.description);
        out.extend_from_slice(b"</p></a></li>");
    }
    out
}

/// Render a ranked record list through a parsed template in one
/// call: builds the result fragment, then streams the template to
/// `sink`. Returns the total number of bytes written.
pub fn render_template<W: Write>(
    template: &Template,
    query: &[u8],
    records: &[ResultRecord],
    sink: &mut W,
) -> Result<usize> {
    let fragment = render_result_fragments(records);
    template.render(query, &fragment, sink)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |p| p + 1);
    &bytes[start..end]
}
