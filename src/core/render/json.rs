//! Minimal JSON rendering of result records.
//!
//! Deliberately not serde_json: the escaping contract is part of the
//! stored-payload format's public behavior and is intentionally
//! minimal. Only `"` is escaped: a quote byte is prefixed with `\`
//! unless the byte before it already is a `\`. Everything else is
//! copied verbatim (no `\n`, `\t`, unicode or control escapes).
//! Output buffers grow as needed; there is no fixed capacity to
//! overrun.

use std::io::{self, Write};

use crate::core::error::Result;
use crate::core::record::ResultRecord;

/// Append `value` to `out` with quote-only escaping. Returns the
/// number of bytes written.
pub fn write_escaped(out: &mut Vec<u8>, value: &[u8]) -> usize {
    let before = out.len();
    for (i, &b) in value.iter().enumerate() {
        if b == b'"' && (i == 0 || value[i - 1] != b'\\') {
            out.push(b'\\');
        }
        out.push(b);
    }
    out.len() - before
}

/// Append `"<name>":"<escaped value>"` to `out`. Returns the number
/// of bytes written.
pub fn write_json_field(out: &mut Vec<u8>, name: &str, value: &[u8]) -> usize {
    let before = out.len();
    out.push(b'"');
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(b"\":\"");
    write_escaped(out, value);
    out.push(b'"');
    out.len() - before
}

/// Render one record as a JSON object: `path`, `title`,
/// `description`, plus `url` when non-empty.
pub fn render_record(record: &ResultRecord) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        record.path.len() + record.title.len() + record.description.len() + record.url.len() + 64,
    );
    out.push(b'{');
    write_json_field(&mut out, "path", &record.path);
    out.push(b',');
    write_json_field(&mut out, "title", &record.title);
    out.push(b',');
    write_json_field(&mut out, "description", &record.description);
    if !record.url.is_empty() {
        out.push(b',');
        write_json_field(&mut out, "url", &record.url);
    }
    out.push(b'}');
    out
}

/// Stream a ranked result list as `{"results":[ ... ]}` to `sink`,
/// one record at a time. Returns the total number of bytes written.
pub fn render_results<'a, I, W>(records: I, sink: &mut W) -> Result<usize>
where
    I: IntoIterator<Item = &'a ResultRecord>,
    W: Write,
{
    let mut total = 0usize;

    let prefix: &[u8] = b"{\"results\":[";
    sink.write_all(prefix)?;
    total += prefix.len();

    for (i, record) in records.into_iter().enumerate() {
        if i > 0 {
            sink.write_all(b",")?;
            total += 1;
        }
        let rendered = render_record(record);
        sink.write_all(&rendered)?;
        total += rendered.len();
    }

    sink.write_all(b"]}")?;
    total += 2;
    Ok(total)
}

/// Convenience wrapper collecting [`render_results`] into a buffer
pub fn render_results_to_vec<'a, I>(records: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a ResultRecord>,
{
    let mut out = io::Cursor::new(Vec::new());
    render_results(records, &mut out)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &[u8], title: &[u8], description: &[u8], url: &[u8]) -> ResultRecord {
        ResultRecord {
            path: path.to_vec(),
            title: title.to_vec(),
            description: description.to_vec(),
            url: url.to_vec(),
        }
    }

    #[test]
    fn test_field_basic() {
        let mut out = Vec::new();
        let written = write_json_field(&mut out, "title", b"hello");
        assert_eq!(out, b"\"title\":\"hello\"");
        assert_eq!(written, out.len());
    }

    #[test]
    fn test_quote_escaped() {
        let mut out = Vec::new();
        write_escaped(&mut out, b"He said \"hi\"");
        assert_eq!(out, b"He said \\\"hi\\\"".to_vec());
    }

    #[test]
    fn test_already_escaped_quote_left_alone() {
        let mut out = Vec::new();
        write_escaped(&mut out, b"pre \\\" post");
        assert_eq!(out, b"pre \\\" post".to_vec());
    }

    #[test]
    fn test_control_bytes_copied_verbatim() {
        // Deliberately minimal: no \n or \t escaping
        let mut out = Vec::new();
        write_escaped(&mut out, b"a\nb\tc\x00d");
        assert_eq!(out, b"a\nb\tc\x00d".to_vec());
    }

    #[test]
    fn test_record_with_url() {
        let rendered = render_record(&record(b"/a.html", b"A", b"first page", b"https://x/a"));
        assert_eq!(
            rendered,
            br#"{"path":"/a.html","title":"A","description":"first page","url":"https://x/a"}"#
                .to_vec()
        );
    }

    #[test]
    fn test_record_omits_empty_url() {
        let rendered = render_record(&record(b"/a.html", b"A", b"d", b""));
        assert_eq!(
            rendered,
            br#"{"path":"/a.html","title":"A","description":"d"}"#.to_vec()
        );
    }

    #[test]
    fn test_record_escapes_title_quotes() {
        let rendered = render_record(&record(b"/q.html", b"He said \"hi\"", b"d", b""));
        let text = String::from_utf8_lossy(&rendered).into_owned();
        assert!(text.contains(r#""title":"He said \"hi\"""#));
    }

    #[test]
    fn test_results_envelope() {
        let records = vec![
            record(b"/a.html", b"A", b"da", b""),
            record(b"/b.html", b"B", b"db", b"https://x/b"),
        ];
        let out = render_results_to_vec(&records).unwrap();
        let text = String::from_utf8_lossy(&out).into_owned();
        assert!(text.starts_with(r#"{"results":["#));
        assert!(text.ends_with("]}"));
        assert_eq!(text.matches("\"path\"").count(), 2);
        assert!(text.contains("},{"));
    }

    #[test]
    fn test_empty_result_list() {
        let out = render_results_to_vec(std::iter::empty()).unwrap();
        assert_eq!(out, b"{\"results\":[]}".to_vec());
    }

    #[test]
    fn test_byte_count_matches_output() {
        let records = vec![record(b"/a.html", b"A", b"da", b"")];
        let mut sink = io::Cursor::new(Vec::new());
        let total = render_results(&records, &mut sink).unwrap();
        assert_eq!(total, sink.into_inner().len());
    }
}
