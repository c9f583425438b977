use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::Read;

use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::space0,
    sequence::{pair, terminated},
    IResult,
};

use crate::error::Error;
use crate::scan::{LineScanner, Terminator, Token};
use crate::text::ascii;
use crate::text::encoding::decode_unstructured;
use crate::text::whitespace::is_wsp;

/// Header field name, compared case-insensitively.
#[derive(Debug, Clone, Eq)]
pub struct HeaderName(String);

impl HeaderName {
    /// Fails unless `name` is made of printable ASCII other than `:`.
    pub fn new(name: &str) -> Option<Self> {
        match field_name_text(name.as_bytes()) {
            Ok((rest, _)) if rest.is_empty() => Some(Self(name.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for HeaderName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl PartialEq<str> for HeaderName {
    fn eq(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for HeaderName {
    fn eq(&self, other: &&str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl Hash for HeaderName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl AsRef<str> for HeaderName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single header field, immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    name: HeaderName,
    raw_value: Vec<u8>,
    unfolded_value: String,
    offset: u64,
}

impl HeaderField {
    pub fn new(name: HeaderName, raw_value: Vec<u8>, offset: u64) -> Self {
        let unfolded_value = String::from_utf8_lossy(&unfold(&raw_value)).into_owned();
        Self {
            name,
            raw_value,
            unfolded_value,
            offset,
        }
    }

    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    /// Everything after the colon, folds included.
    pub fn raw_value(&self) -> &[u8] {
        &self.raw_value
    }

    pub fn unfolded_value(&self) -> &str {
        &self.unfolded_value
    }

    /// Unfolded value without charset interpretation, for structured fields.
    pub fn unfolded_bytes(&self) -> Vec<u8> {
        unfold(&self.raw_value)
    }

    /// Unfolded value with RFC 2047 encoded words decoded.
    pub fn decoded_value(&self) -> String {
        decode_unstructured(&self.unfolded_bytes())
    }

    /// Absolute offset of the field's first byte.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

/// Header fields of a part, in order of appearance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Headers(Vec<HeaderField>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: HeaderField) {
        self.0.push(field)
    }

    /// First field named `name`.
    pub fn get(&self, name: &str) -> Option<&HeaderField> {
        self.0.iter().find(|f| f.name == name)
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a HeaderField> + 'a {
        self.0.iter().filter(move |f| f.name == name)
    }

    /// Unfolded value of the first field named `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|f| f.unfolded_value())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeaderField> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a HeaderField;
    type IntoIter = std::slice::Iter<'a, HeaderField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<HeaderField> for Headers {
    fn from_iter<I: IntoIterator<Item = HeaderField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// ```abnf
/// ftext      =   %d33-57 /          ; Printable US-ASCII
///                %d59-126           ;  characters not including
///                                   ;  ":".
/// ```
fn is_ftext(c: u8) -> bool {
    (ascii::EXCLAMATION..=ascii::TILDE).contains(&c) && c != ascii::COL
}

fn field_name_text(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while1(is_ftext)(input)
}

/// Optional field
///
/// ```abnf
/// field      =   field-name ":" unstructured CRLF
/// field-name =   1*ftext
/// ```
///
/// Whitespace between the name and the colon is tolerated.
pub fn field_name(input: &[u8]) -> IResult<&[u8], &[u8]> {
    terminated(field_name_text, pair(space0, tag(":")))(input)
}

/// Split a logical header line into a field, `None` if it is malformed.
pub fn field(raw: &[u8], offset: u64) -> Option<HeaderField> {
    let (value, name) = field_name(raw).ok()?;
    // ftext is ASCII, the conversion cannot fail
    let name = std::str::from_utf8(name).ok()?;
    Some(HeaderField::new(
        HeaderName(name.to_string()),
        value.to_vec(),
        offset,
    ))
}

/// Replace every fold (line terminator plus following blanks) with a single
/// space and trim the result.
pub fn unfold(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            ascii::CR | ascii::LF => {
                if raw[i] == ascii::CR && raw.get(i + 1) == Some(&ascii::LF) {
                    i += 1;
                }
                i += 1;
                while i < raw.len() && is_wsp(raw[i]) {
                    i += 1;
                }
                out.push(ascii::SP);
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    let start = out.iter().position(|c| !is_wsp(*c)).unwrap_or(out.len());
    let end = out.iter().rposition(|c| !is_wsp(*c)).map_or(start, |p| p + 1);
    out[start..end].to_vec()
}

/// Result of reading a header block.
#[derive(Debug, Default)]
pub struct HeaderBlock {
    pub headers: Headers,
    /// Offsets of the lines that were skipped as malformed.
    pub malformed: Vec<u64>,
    /// Whether the blank separator line was seen, as opposed to the block
    /// being cut by a delimiter or the end of the stream.
    pub terminated: bool,
}

struct Pending {
    offset: u64,
    raw: Vec<u8>,
    terminator: Terminator,
}

impl Pending {
    fn flush(self, block: &mut HeaderBlock) {
        match field(&self.raw, self.offset) {
            Some(f) => block.headers.push(f),
            None => block.malformed.push(self.offset),
        }
    }
}

/// Read header fields up to and including the blank separator line.
///
/// A delimiter, `From ` line or the end of the stream also ends the block;
/// that token is handed back to the scanner.
pub fn parse_headers<R: Read>(scanner: &mut LineScanner<R>) -> Result<HeaderBlock, Error> {
    let mut block = HeaderBlock::default();
    let mut pending: Option<Pending> = None;

    loop {
        let line = match scanner.next_token()? {
            Token::Line(line) => line,
            other => {
                scanner.unread(other);
                break;
            }
        };

        if line.is_blank() {
            block.terminated = true;
            break;
        }

        let folded = line.continued || line.bytes.first().map_or(false, |c| is_wsp(*c));
        if folded {
            match pending.as_mut() {
                Some(p) => {
                    p.raw.extend_from_slice(p.terminator.as_bytes());
                    p.raw.extend_from_slice(&line.bytes);
                    p.terminator = line.terminator;
                }
                None if line.continued => (),
                None => {
                    tracing::debug!(offset = line.offset, "continuation without field");
                    block.malformed.push(line.offset);
                }
            }
            continue;
        }

        if let Some(p) = pending.take() {
            p.flush(&mut block);
        }
        pending = Some(Pending {
            offset: line.offset,
            raw: line.bytes,
            terminator: line.terminator,
        });
    }

    if let Some(p) = pending.take() {
        p.flush(&mut block);
    }
    Ok(block)
}
