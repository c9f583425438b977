use nom::{
    bytes::complete::tag,
    combinator::{eof, map},
    sequence::{terminated, tuple},
    IResult,
};
use std::fmt;

use crate::mime::parameter::{parameter_list, split_segments, Parameters};
use crate::text::words::mime_atom;

// --------- NAIVE TYPE
/// `type "/" subtype`, both sides raw.
pub fn naive_type(input: &[u8]) -> IResult<&[u8], (&[u8], &[u8])> {
    map(
        terminated(tuple((mime_atom, tag("/"), mime_atom)), eof),
        |(main, _, sub)| (main, sub),
    )(input)
}

// -------- TYPE
/// A parsed `Content-Type` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Lower-cased top level type.
    pub main: String,
    /// Lower-cased subtype.
    pub sub: String,
    pub params: Parameters,
}

impl ContentType {
    pub fn new(main: &str, sub: &str) -> Self {
        Self {
            main: main.to_ascii_lowercase(),
            sub: sub.to_ascii_lowercase(),
            params: Parameters::new(),
        }
    }

    /// `text/plain; charset=us-ascii`, RFC 2045 section 5.2.
    pub fn text_plain() -> Self {
        let mut ct = Self::new("text", "plain");
        ct.params.insert("charset", "us-ascii");
        ct
    }

    /// Default type of the children of a `multipart/digest`.
    pub fn message_rfc822() -> Self {
        Self::new("message", "rfc822")
    }

    pub fn is(&self, main: &str, sub: &str) -> bool {
        self.main.eq_ignore_ascii_case(main) && self.sub.eq_ignore_ascii_case(sub)
    }

    pub fn is_multipart(&self) -> bool {
        self.main == "multipart"
    }

    pub fn is_message(&self) -> bool {
        self.main == "message"
    }

    pub fn is_text(&self) -> bool {
        self.main == "text"
    }

    pub fn multipart_subtype(&self) -> Option<MultipartSubtype> {
        self.is_multipart()
            .then(|| MultipartSubtype::from(self.sub.as_str()))
    }

    pub fn boundary(&self) -> Option<&str> {
        self.params.get("boundary").filter(|b| !b.is_empty())
    }

    pub fn charset(&self) -> Option<&str> {
        self.params.get("charset")
    }

    /// `type/subtype` without parameters.
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main, self.sub)
    }
}

impl Default for ContentType {
    fn default() -> Self {
        Self::text_plain()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main, self.sub)?;
        for (k, v) in self.params.iter() {
            write!(f, "; {}=\"{}\"", k, v.replace('\\', "\\\\").replace('"', "\\\""))?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MultipartSubtype {
    Alternative,
    Mixed,
    Digest,
    Parallel,
    Report,
    Related,
    Signed,
    Encrypted,
    Unknown,
}

impl From<&str> for MultipartSubtype {
    fn from(sub: &str) -> Self {
        match sub.to_ascii_lowercase().as_str() {
            "alternative" => Self::Alternative,
            "mixed" => Self::Mixed,
            "digest" => Self::Digest,
            "parallel" => Self::Parallel,
            "report" => Self::Report,
            "related" => Self::Related,
            "signed" => Self::Signed,
            "encrypted" => Self::Encrypted,
            _ => Self::Unknown,
        }
    }
}

/// Parse a full `Content-Type` value.
///
/// Returns `None` when the `type/subtype` part is unusable, in which case
/// the caller applies the contextual default.
pub fn content_type(input: &[u8]) -> Option<ContentType> {
    let segments = split_segments(input);
    let (first, rest) = segments.split_first()?;
    let (_, (main, sub)) = naive_type(first).ok()?;

    Some(ContentType {
        main: String::from_utf8_lossy(main).to_ascii_lowercase(),
        sub: String::from_utf8_lossy(sub).to_ascii_lowercase(),
        params: parameter_list(rest),
    })
}
