use std::io::Read;

use crate::config::ParserConfig;
use crate::error::Error;
use crate::stream::RawMessageStream;
use crate::text::boundary::{classify, Delimiter};

/// How a physical line ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    CrLf,
    Lf,
    /// Last line of the stream, or a chunk of an over-long line.
    None,
}

impl Terminator {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Terminator::CrLf => b"\r\n",
            Terminator::Lf => b"\n",
            Terminator::None => b"",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Content without terminator.
    pub bytes: Vec<u8>,
    pub terminator: Terminator,
    /// Absolute offset of the first byte.
    pub offset: u64,
    /// True when this chunk continues an over-long physical line.
    pub continued: bool,
}

impl Line {
    pub fn is_blank(&self) -> bool {
        !self.continued && self.bytes.is_empty() && self.terminator != Terminator::None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Line(Line),
    /// A delimiter of the boundary at `level` in the boundary stack,
    /// 0 being the outermost multipart.
    Delimiter {
        level: usize,
        kind: Delimiter,
        offset: u64,
    },
    /// `From ` separator line in mbox mode.
    FromLine { line: Vec<u8>, offset: u64 },
    Eof { offset: u64 },
}

impl Token {
    pub fn offset(&self) -> u64 {
        match self {
            Token::Line(l) => l.offset,
            Token::Delimiter { offset, .. } => *offset,
            Token::FromLine { offset, .. } => *offset,
            Token::Eof { offset } => *offset,
        }
    }
}

/// Splits a message stream into lines, recognizing the delimiters of every
/// open multipart.
pub struct LineScanner<R> {
    stream: RawMessageStream<R>,
    boundaries: Vec<Vec<u8>>,
    pushback: Option<Token>,
    from_mode: bool,
    midline: bool,
    max_line_length: usize,
}

impl<R: Read> LineScanner<R> {
    pub fn new(reader: R, config: &ParserConfig) -> Self {
        Self::with_stream(
            RawMessageStream::with_chunk_size(reader, config.read_chunk),
            config,
        )
    }

    pub fn with_stream(stream: RawMessageStream<R>, config: &ParserConfig) -> Self {
        Self {
            stream,
            boundaries: vec![],
            pushback: None,
            from_mode: false,
            midline: false,
            max_line_length: config.max_line_length,
        }
    }

    pub fn stream(&self) -> &RawMessageStream<R> {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut RawMessageStream<R> {
        &mut self.stream
    }

    pub fn into_stream(self) -> RawMessageStream<R> {
        self.stream
    }

    /// Report lines starting with `From ` as [`Token::FromLine`].
    pub fn set_from_mode(&mut self, on: bool) {
        self.from_mode = on;
    }

    /// Open a multipart; returns its level.
    pub fn push_boundary(&mut self, boundary: &[u8]) -> usize {
        self.boundaries.push(boundary.to_vec());
        self.boundaries.len() - 1
    }

    pub fn pop_boundary(&mut self) {
        self.boundaries.pop();
    }

    /// Number of open multiparts.
    pub fn depth(&self) -> usize {
        self.boundaries.len()
    }

    /// Offset of the next token.
    pub fn offset(&self) -> u64 {
        match &self.pushback {
            Some(t) => t.offset(),
            None => self.stream.offset(),
        }
    }

    /// Hand a token back; the next call to [`Self::next_token`] returns it.
    pub fn unread(&mut self, token: Token) {
        debug_assert!(self.pushback.is_none());
        self.pushback = Some(token);
    }

    pub fn peek(&mut self) -> Result<&Token, Error> {
        let token = match self.pushback.take() {
            Some(t) => t,
            None => self.next_token()?,
        };
        Ok(self.pushback.insert(token))
    }

    pub fn next_token(&mut self) -> Result<Token, Error> {
        if let Some(token) = self.pushback.take() {
            return Ok(token);
        }

        let offset = self.stream.offset();
        let at_line_start = !self.midline;
        let Some(raw) = self.stream.read_line(self.max_line_length)? else {
            return Ok(Token::Eof { offset });
        };
        let (bytes, terminator) = split_terminator(raw);
        self.midline = terminator == Terminator::None;

        if at_line_start {
            for (level, boundary) in self.boundaries.iter().enumerate().rev() {
                if let Some(kind) = classify(&bytes, boundary) {
                    tracing::trace!(level, ?kind, offset, "delimiter");
                    return Ok(Token::Delimiter {
                        level,
                        kind,
                        offset,
                    });
                }
            }
            if self.from_mode && bytes.starts_with(b"From ") {
                tracing::trace!(offset, "from line");
                return Ok(Token::FromLine {
                    line: bytes,
                    offset,
                });
            }
        }

        Ok(Token::Line(Line {
            bytes,
            terminator,
            offset,
            continued: !at_line_start,
        }))
    }
}

fn split_terminator(mut raw: Vec<u8>) -> (Vec<u8>, Terminator) {
    if raw.ends_with(b"\r\n") {
        raw.truncate(raw.len() - 2);
        (raw, Terminator::CrLf)
    } else if raw.ends_with(b"\n") {
        raw.truncate(raw.len() - 1);
        (raw, Terminator::Lf)
    } else {
        (raw, Terminator::None)
    }
}
