use std::fmt;
use std::io;

use thiserror::Error;

/// Fatal failure: the byte source became unreadable.
#[derive(Error, Debug)]
pub enum Error {
    #[error("stream error: {0}")]
    Io(#[from] io::Error),
}

/// Structural problems the parser recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Warning {
    /// A multipart declared no usable `boundary` parameter.
    MissingBoundary,
    /// The stream or an enclosing boundary ended a multipart before its
    /// closing delimiter.
    TruncatedMultipart,
    /// A header line without colon, with an invalid name, or a
    /// continuation without a field to continue.
    MalformedHeaderLine,
    /// Composite nesting reached the configured maximum.
    MaxDepthExceeded,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Warning::MissingBoundary => "multipart without boundary",
            Warning::TruncatedMultipart => "truncated multipart",
            Warning::MalformedHeaderLine => "malformed header line",
            Warning::MaxDepthExceeded => "maximum nesting depth exceeded",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub kind: Warning,
    /// Absolute byte offset where the problem was detected.
    pub offset: u64,
    /// Child indices leading from the root to the affected part.
    pub path: Vec<usize>,
}

impl ParseWarning {
    pub fn new(kind: Warning, offset: u64, path: &[usize]) -> Self {
        tracing::warn!(kind=%kind, offset, path=?path, "recovered from malformed input");
        Self {
            kind,
            offset,
            path: path.to_vec(),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.offset)?;
        if !self.path.is_empty() {
            let path = self
                .path
                .iter()
                .map(|i| (i + 1).to_string())
                .collect::<Vec<_>>()
                .join(".");
            write!(f, " (part {})", path)?;
        }
        Ok(())
    }
}
