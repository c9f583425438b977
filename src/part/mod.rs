/// Streaming construction of the part tree
pub mod builder;

/// Undecoded leaf bodies with lazy decoding
pub mod leaf;

use std::fmt;

use crate::error::ParseWarning;
use crate::header::Headers;
use crate::imf::{datetime, mime::Version};
use crate::mime::charset;
use crate::mime::{ContentDisposition, ContentType, TransferEncoding};

pub use leaf::Leaf;

/// Absolute byte offsets of a part in its source stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartOffsets {
    /// First byte of the header block.
    pub headers: u64,
    /// First byte after the blank separator line.
    pub body: u64,
    /// End of the part's content. The line terminator before a following
    /// delimiter or `From ` line is not included.
    pub end: u64,
}

/// Children of a multipart, with the text around them.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Multipart {
    pub preamble: Vec<u8>,
    pub parts: Vec<MimePart>,
    pub epilogue: Vec<u8>,
}

impl fmt::Debug for Multipart {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("part::Multipart")
            .field("parts", &self.parts)
            .field("preamble", &String::from_utf8_lossy(&self.preamble))
            .field("epilogue", &String::from_utf8_lossy(&self.epilogue))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Leaf(Leaf),
    Multipart(Multipart),
    Message(Box<MimePart>),
}

/// A node of the message tree. Every child has exactly one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimePart {
    pub headers: Headers,
    /// Effective type: the declared one, or the contextual default.
    pub content_type: ContentType,
    pub encoding: TransferEncoding,
    pub disposition: Option<ContentDisposition>,
    pub body: Body,
    pub offsets: PartOffsets,
}

impl MimePart {
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match &self.body {
            Body::Leaf(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_multipart(&self) -> Option<&Multipart> {
        match &self.body {
            Body::Multipart(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&MimePart> {
        match &self.body {
            Body::Message(x) => Some(x),
            _ => None,
        }
    }

    /// Direct children: multipart parts, or the embedded message.
    pub fn children(&self) -> &[MimePart] {
        match &self.body {
            Body::Leaf(_) => &[],
            Body::Multipart(m) => &m.parts,
            Body::Message(m) => std::slice::from_ref(m.as_ref()),
        }
    }

    /// Follow child indices from this part.
    pub fn find(&self, path: &[usize]) -> Option<&MimePart> {
        path.iter()
            .try_fold(self, |part, i| part.children().get(*i))
    }

    /// Depth-first, pre-order walk over this part and its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Transfer-decoded body of a leaf, decoded on first access.
    pub fn decoded(&self) -> Option<&[u8]> {
        self.as_leaf().map(|l| l.decoded(&self.encoding))
    }

    /// Decoded body of a leaf interpreted with its `charset` parameter.
    pub fn text(&self) -> Option<String> {
        let bytes = self.decoded()?;
        let label = self.content_type.charset().unwrap_or("us-ascii");
        Some(charset::decode(label.as_bytes(), bytes).into_owned())
    }

    /// `Subject` with RFC 2047 encoded words decoded.
    pub fn subject(&self) -> Option<String> {
        self.header_text("subject")
    }

    pub fn date(&self) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        let field = self.headers.get("date")?;
        datetime::parse(&field.unfolded_bytes())
    }

    pub fn mime_version(&self) -> Option<Version> {
        let field = self.headers.get("mime-version")?;
        crate::imf::mime::version(&field.unfolded_bytes())
            .ok()
            .map(|(_, v)| v)
    }

    /// Disposition `filename`, falling back to the Content-Type `name`.
    pub fn filename(&self) -> Option<&str> {
        self.disposition
            .as_ref()
            .and_then(|d| d.filename())
            .or_else(|| self.content_type.params.get("name"))
    }

    /// RFC 2047-decoded value of the first `name` header.
    pub fn header_text(&self, name: &str) -> Option<String> {
        self.headers.get(name).map(|f| f.decoded_value())
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a MimePart>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a MimePart;

    fn next(&mut self) -> Option<Self::Item> {
        let part = self.stack.pop()?;
        self.stack.extend(part.children().iter().rev());
        Some(part)
    }
}

/// Outcome of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub root: MimePart,
    pub warnings: Vec<ParseWarning>,
}

impl ParseResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
