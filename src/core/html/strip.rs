//! Single-pass HTML tag stripping.
//!
//! Converts a raw document buffer into indexable plain text while
//! honoring the reserved no-index class token and skipping script
//! bodies. This is a best-effort heuristic, not an HTML parser:
//! malformed markup never fails, it just degrades ("rest of the
//! buffer stays in the current state").
//!
//! # The quote-state quirk
//!
//! The quoting state is global, not tag-scoped: a literal apostrophe
//! or double quote in prose toggles it exactly as one inside an
//! attribute value would, so an `'` in body text suppresses tag
//! recognition until the next `'`. This mirrors the upstream parser
//! byte-for-byte and can be disabled with
//! [`TagStripper::with_quote_tracking`].

/// Parser state: where in the markup the cursor currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Outside any tag
    Text,
    /// Between `<` and the tag's closing `>`
    TagBody,
    /// Inside `<script>...</script>`, scanned only for the literal
    /// closing tag
    ScriptBody,
}

/// Crosscutting quoting state, toggled by unescaped quote characters
/// anywhere in the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Unquoted,
    SingleQuoted,
    DoubleQuoted,
}

/// Literal script close; never fed through the tag machine
const SCRIPT_CLOSE: &[u8] = b"</script>";

/// Output of one stripping pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrippedDocument {
    /// Plain text with every tag replaced by a single space
    pub text: Vec<u8>,

    /// True when the document's root element carried the no-index
    /// class token, opting the whole page out
    pub root_noindex: bool,
}

/// Tag-stripping parser configured with the reserved no-index token.
///
/// Holds no per-document state; `strip` may be called concurrently
/// from multiple threads.
#[derive(Debug, Clone)]
pub struct TagStripper {
    noindex_token: Vec<u8>,
    quote_tracking_in_text: bool,
}

/// What the tag machine learned about one completed tag
struct TagInfo<'a> {
    name: &'a [u8],
    is_close: bool,
    self_closing: bool,
    has_noindex_class: bool,
}

impl TagStripper {
    pub fn new(noindex_token: &str) -> Self {
        Self {
            noindex_token: noindex_token.as_bytes().to_vec(),
            quote_tracking_in_text: true,
        }
    }

    /// Toggle the global quote-state quirk (on by default)
    pub fn with_quote_tracking(mut self, enabled: bool) -> Self {
        self.quote_tracking_in_text = enabled;
        self
    }

    /// Strip `doc` to indexable plain text.
    ///
    /// Every completed tag is replaced by a single space. Text inside
    /// a no-index region (any element whose `class` contains the
    /// reserved token, plus its whole subtree) is dropped. Script
    /// bodies are dropped. There is no error path.
    pub fn strip(&self, doc: &[u8]) -> StrippedDocument {
        let mut out = Vec::with_capacity(doc.len() / 2);
        let mut state = State::Text;
        let mut quote = Quote::Unquoted;

        // -1 = not suppressing; >= 0 = nesting depth inside a
        // no-index region
        let mut depth: i32 = -1;
        let mut copy_from = 0usize;
        let mut tag_start = 0usize;
        let mut elements_seen = 0usize;
        let mut root_noindex = false;

        let mut i = 0;
        while i < doc.len() {
            let b = doc[i];
            match state {
                State::Text => match quote {
                    Quote::Unquoted => {
                        if b == b'<' {
                            tag_start = i;
                            state = State::TagBody;
                        } else if self.quote_tracking_in_text && is_unescaped(doc, i, b'\'') {
                            quote = Quote::SingleQuoted;
                        } else if self.quote_tracking_in_text && is_unescaped(doc, i, b'"') {
                            quote = Quote::DoubleQuoted;
                        }
                    }
                    Quote::SingleQuoted => {
                        if is_unescaped(doc, i, b'\'') {
                            quote = Quote::Unquoted;
                        }
                    }
                    Quote::DoubleQuoted => {
                        if is_unescaped(doc, i, b'"') {
                            quote = Quote::Unquoted;
                        }
                    }
                },
                State::TagBody => match quote {
                    Quote::Unquoted => {
                        if b == b'>' {
                            let suppress_before = depth >= 0;
                            let info = parse_tag_body(&doc[tag_start + 1..i], &self.noindex_token);

                            if info.is_close {
                                if depth >= 0 {
                                    depth -= 1;
                                }
                            } else if !info.self_closing {
                                if depth >= 0 {
                                    depth += 1;
                                } else if info.has_noindex_class {
                                    if elements_seen == 0 {
                                        root_noindex = true;
                                    }
                                    depth = 0;
                                }
                                if !info.name.starts_with(b"!") {
                                    elements_seen += 1;
                                }
                            } else if info.has_noindex_class && depth < 0 && elements_seen == 0 {
                                root_noindex = true;
                            }

                            if !suppress_before {
                                out.extend_from_slice(&doc[copy_from..tag_start]);
                                out.push(b' ');
                            }
                            copy_from = i + 1;

                            state = if !info.is_close && info.name == b"script" && !info.self_closing
                            {
                                State::ScriptBody
                            } else {
                                State::Text
                            };
                        } else if is_unescaped(doc, i, b'\'') {
                            quote = Quote::SingleQuoted;
                        } else if is_unescaped(doc, i, b'"') {
                            quote = Quote::DoubleQuoted;
                        }
                    }
                    Quote::SingleQuoted => {
                        if is_unescaped(doc, i, b'\'') {
                            quote = Quote::Unquoted;
                        }
                    }
                    Quote::DoubleQuoted => {
                        if is_unescaped(doc, i, b'"') {
                            quote = Quote::Unquoted;
                        }
                    }
                },
                State::ScriptBody => {
                    if doc[i..].starts_with(SCRIPT_CLOSE) {
                        // Counts as a close element for depth
                        // bookkeeping; the body is never copied.
                        let suppress_before = depth >= 0;
                        if depth >= 0 {
                            depth -= 1;
                        }
                        if !suppress_before {
                            out.push(b' ');
                        }
                        i += SCRIPT_CLOSE.len();
                        copy_from = i;
                        state = State::Text;
                        continue;
                    }
                }
            }
            i += 1;
        }

        // Flush the trailing text span. An unterminated tag or
        // no-index region keeps its bytes out of the output.
        if depth < 0 {
            match state {
                State::Text => out.extend_from_slice(&doc[copy_from..]),
                State::TagBody => out.extend_from_slice(&doc[copy_from..tag_start]),
                State::ScriptBody => {}
            }
        }

        StrippedDocument {
            text: out,
            root_noindex,
        }
    }
}

/// True when `doc[i]` is `ch` and not preceded by a backslash
fn is_unescaped(doc: &[u8], i: usize, ch: u8) -> bool {
    doc[i] == ch && (i == 0 || doc[i - 1] != b'\\')
}

/// Parse a completed tag body (the bytes between `<` and `>`):
/// tag name, close/self-close flags, and whether a `class` attribute
/// contains the reserved no-index token.
fn parse_tag_body<'a>(body: &'a [u8], noindex_token: &[u8]) -> TagInfo<'a> {
    let is_close = body.first() == Some(&b'/');
    let trimmed_end = body
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |p| p + 1);
    let self_closing = !is_close && trimmed_end > 0 && body[trimmed_end - 1] == b'/';

    let name_start = usize::from(is_close);
    let mut name_end = name_start;
    while name_end < body.len()
        && !body[name_end].is_ascii_whitespace()
        && body[name_end] != b'/'
        && body[name_end] != b'='
    {
        name_end += 1;
    }
    let name = &body[name_start..name_end];

    let mut has_noindex_class = false;
    let mut i = name_end;
    while i < body.len() {
        // Skip whitespace and stray slashes between attributes
        while i < body.len() && (body[i].is_ascii_whitespace() || body[i] == b'/') {
            i += 1;
        }
        if i >= body.len() {
            break;
        }

        // Attribute name
        let attr_start = i;
        while i < body.len()
            && !body[i].is_ascii_whitespace()
            && body[i] != b'='
            && body[i] != b'/'
        {
            i += 1;
        }
        let attr_name = &body[attr_start..i];

        while i < body.len() && body[i].is_ascii_whitespace() {
            i += 1;
        }

        // Attribute value, if any
        let mut value: &[u8] = &[];
        if i < body.len() && body[i] == b'=' {
            i += 1;
            while i < body.len() && body[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < body.len() && (body[i] == b'"' || body[i] == b'\'') {
                let delimiter = body[i];
                let value_start = i + 1;
                i = value_start;
                while i < body.len() && !(body[i] == delimiter && body[i - 1] != b'\\') {
                    i += 1;
                }
                value = &body[value_start..i.min(body.len())];
                if i < body.len() {
                    i += 1; // past the closing delimiter
                }
            } else {
                let value_start = i;
                while i < body.len() && !body[i].is_ascii_whitespace() {
                    i += 1;
                }
                value = &body[value_start..i];
            }
        }

        if attr_name == b"class"
            && value
                .split(|b| b.is_ascii_whitespace())
                .any(|token| token == noindex_token)
        {
            has_noindex_class = true;
        }
    }

    TagInfo {
        name,
        is_close,
        self_closing,
        has_noindex_class,
    }
}
