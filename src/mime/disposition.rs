use crate::mime::parameter::{parameter_list, split_segments, Parameters};
use crate::text::words::mime_atom;
use nom::{combinator::eof, sequence::terminated};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispositionType {
    Inline,
    Attachment,
    Other(String),
}

impl From<&[u8]> for DispositionType {
    fn from(token: &[u8]) -> Self {
        match token.to_ascii_lowercase().as_slice() {
            b"inline" => Self::Inline,
            b"attachment" => Self::Attachment,
            other => Self::Other(String::from_utf8_lossy(other).into_owned()),
        }
    }
}

/// `Content-Disposition` (RFC 2183).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    pub kind: DispositionType,
    pub params: Parameters,
}

impl ContentDisposition {
    pub fn is_attachment(&self) -> bool {
        self.kind == DispositionType::Attachment
    }

    pub fn filename(&self) -> Option<&str> {
        self.params.get("filename")
    }
}

/// Parse a `Content-Disposition` value. An unusable disposition type
/// yields `None`.
pub fn content_disposition(input: &[u8]) -> Option<ContentDisposition> {
    let segments = split_segments(input);
    let (first, rest) = segments.split_first()?;
    let (_, kind) = terminated(mime_atom, eof)(*first).ok()?;

    Some(ContentDisposition {
        kind: DispositionType::from(kind),
        params: parameter_list(rest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment() {
        let cd = content_disposition(b"Attachment; filename=\"genome.jpeg\";\r\n modification-date=\"Wed, 12 Feb 1997 16:29:51 -0500\"").unwrap();
        assert!(cd.is_attachment());
        assert_eq!(cd.filename(), Some("genome.jpeg"));
        assert_eq!(
            cd.params.get("modification-date"),
            Some("Wed, 12 Feb 1997 16:29:51 -0500")
        );
    }

    #[test]
    fn test_other() {
        let cd = content_disposition(b"x-custom").unwrap();
        assert_eq!(cd.kind, DispositionType::Other("x-custom".into()));
        assert!(cd.params.is_empty());
        assert!(content_disposition(b"; filename=a").is_none());
    }
}
