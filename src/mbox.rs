//! Splitting a Unix mbox file into messages.
//!
//! Messages are separated by lines starting with `From `. The separator is
//! not part of the message it introduces; a multipart cut short by the next
//! separator is closed with [`crate::error::Warning::TruncatedMultipart`].

use std::fmt;
use std::io::Read;

use crate::config::ParserConfig;
use crate::error::Error;
use crate::part::builder::Builder;
use crate::part::ParseResult;
use crate::scan::{LineScanner, Token};

/// One message of a mailbox.
#[derive(Clone, PartialEq, Eq)]
pub struct MboxMessage {
    /// The `From ` separator line, without its terminator.
    pub from_line: Vec<u8>,
    /// Offset of the separator line.
    pub offset: u64,
    pub result: ParseResult,
}

impl fmt::Debug for MboxMessage {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("mbox::MboxMessage")
            .field("from_line", &String::from_utf8_lossy(&self.from_line))
            .field("offset", &self.offset)
            .field("result", &self.result)
            .finish()
    }
}

pub struct MboxReader<R> {
    scanner: LineScanner<R>,
    builder: Builder,
    done: bool,
}

impl<R: Read> MboxReader<R> {
    pub fn new(reader: R, config: ParserConfig) -> Self {
        let mut scanner = LineScanner::new(reader, &config);
        scanner.set_from_mode(true);
        Self {
            scanner,
            builder: Builder::new(config),
            done: false,
        }
    }

    /// Offset of the next unread byte.
    pub fn offset(&self) -> u64 {
        self.scanner.offset()
    }

    pub fn into_inner(self) -> LineScanner<R> {
        self.scanner
    }

    /// Skip to the next separator line.
    fn separator(&mut self) -> Result<Option<(Vec<u8>, u64)>, Error> {
        loop {
            match self.scanner.next_token()? {
                Token::FromLine { line, offset } => return Ok(Some((line, offset))),
                Token::Eof { .. } => return Ok(None),
                Token::Line(l) => {
                    tracing::debug!(offset = l.offset, "skipping line outside of any message")
                }
                Token::Delimiter { offset, .. } => {
                    tracing::debug!(offset, "skipping stray delimiter")
                }
            }
        }
    }

    fn message(&mut self) -> Result<Option<MboxMessage>, Error> {
        let Some((from_line, offset)) = self.separator()? else {
            return Ok(None);
        };
        let result = self.builder.parse_scanner(&mut self.scanner, None)?;
        tracing::debug!(offset, warnings = result.warnings.len(), "mbox message");
        Ok(Some(MboxMessage {
            from_line,
            offset,
            result,
        }))
    }
}

impl<R: Read> Iterator for MboxReader<R> {
    type Item = Result<MboxMessage, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.message().transpose();
        if !matches!(next, Some(Ok(_))) {
            self.done = true;
        }
        next
    }
}
