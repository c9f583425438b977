use std::io::Read;

use crate::config::ParserConfig;
use crate::error::{Error, ParseWarning, Warning};
use crate::header::parse_headers;
use crate::mime::{ContentType, MimeFields, MultipartSubtype};
use crate::part::{Body, Leaf, MimePart, Multipart, ParseResult, PartOffsets};
use crate::scan::{LineScanner, Token};
use crate::stream::RawMessageStream;
use crate::text::boundary::Delimiter;

/// Parse a whole message with the default limits.
///
/// `content_type_hint` replaces `text/plain` as the type assumed when the
/// root part declares none.
pub fn build<R: Read>(
    stream: RawMessageStream<R>,
    content_type_hint: Option<ContentType>,
) -> Result<ParseResult, Error> {
    let config = ParserConfig::default();
    let mut scanner = LineScanner::with_stream(stream, &config);
    Builder::new(config).parse_scanner(&mut scanner, content_type_hint)
}

/// Builds the part tree of a message in a single forward pass.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    config: ParserConfig,
}

impl Builder {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse<R: Read>(&self, reader: R) -> Result<ParseResult, Error> {
        let mut scanner = LineScanner::new(reader, &self.config);
        self.parse_scanner(&mut scanner, None)
    }

    pub fn parse_stream<R: Read>(&self, stream: RawMessageStream<R>) -> Result<ParseResult, Error> {
        let mut scanner = LineScanner::with_stream(stream, &self.config);
        self.parse_scanner(&mut scanner, None)
    }

    /// Parse one message from `scanner`. Stops at the end of the stream or,
    /// in `From ` mode, before the next `From ` line.
    pub fn parse_scanner<R: Read>(
        &self,
        scanner: &mut LineScanner<R>,
        content_type_hint: Option<ContentType>,
    ) -> Result<ParseResult, Error> {
        let mut ctx = Context {
            scanner,
            config: &self.config,
            warnings: vec![],
            path: vec![],
            end: 0,
        };
        let root = ctx.part(content_type_hint.unwrap_or_default(), 0)?;
        tracing::debug!(
            end = root.offsets.end,
            warnings = ctx.warnings.len(),
            "message parsed"
        );
        Ok(ParseResult {
            root,
            warnings: ctx.warnings,
        })
    }
}

struct Context<'a, R> {
    scanner: &'a mut LineScanner<R>,
    config: &'a ParserConfig,
    warnings: Vec<ParseWarning>,
    path: Vec<usize>,
    /// End of the last body read.
    end: u64,
}

/// What the body of a part turned out to be.
enum Shape {
    Leaf,
    Multipart { boundary: String, digest: bool },
    Message,
}

impl<'a, R: Read> Context<'a, R> {
    fn warn(&mut self, kind: Warning, offset: u64) {
        self.warnings
            .push(ParseWarning::new(kind, offset, &self.path));
    }

    /// Headers then body of one part; `default` applies when no usable
    /// Content-Type is declared.
    fn part(&mut self, default: ContentType, depth: usize) -> Result<MimePart, Error> {
        let headers_offset = self.scanner.offset();
        let block = parse_headers(self.scanner)?;
        for offset in block.malformed.iter() {
            self.warn(Warning::MalformedHeaderLine, *offset);
        }
        let headers = block.headers;
        let fields = headers.iter().collect::<MimeFields>();
        let body_offset = self.scanner.offset();

        let mut content_type = fields.ctype.unwrap_or(default);
        let mut encoding = fields.transfer_encoding.unwrap_or_default();
        tracing::trace!(path=?self.path, ctype=%content_type, depth, "part");

        let shape = match (content_type.is_multipart(), content_type.is_message()) {
            (false, false) => Shape::Leaf,
            _ if depth >= self.config.max_depth => {
                self.warn(Warning::MaxDepthExceeded, body_offset);
                content_type = ContentType::text_plain();
                Shape::Leaf
            }
            (true, _) => match content_type.boundary().map(str::to_string) {
                Some(boundary) => Shape::Multipart {
                    boundary,
                    digest: content_type.multipart_subtype() == Some(MultipartSubtype::Digest),
                },
                None => {
                    self.warn(Warning::MissingBoundary, body_offset);
                    content_type = ContentType::text_plain();
                    Shape::Leaf
                }
            },
            (false, true) => Shape::Message,
        };

        let body = match shape {
            Shape::Leaf => Body::Leaf(Leaf::new(self.raw_body()?)),
            Shape::Multipart { boundary, digest } => {
                encoding = encoding.for_composite();
                Body::Multipart(self.multipart(&boundary, digest, depth)?)
            }
            Shape::Message => {
                encoding = encoding.for_composite();
                self.path.push(0);
                let inner = self.part(ContentType::text_plain(), depth + 1);
                self.path.pop();
                Body::Message(Box::new(inner?))
            }
        };

        Ok(MimePart {
            disposition: fields.disposition,
            headers,
            content_type,
            encoding,
            body,
            offsets: PartOffsets {
                headers: headers_offset,
                body: body_offset,
                end: self.end,
            },
        })
    }

    /// Lines up to the next delimiter, `From ` line or end of stream.
    ///
    /// The terminator of the last line belongs to a following delimiter but
    /// stays in the body at the end of the stream.
    fn raw_body(&mut self) -> Result<Vec<u8>, Error> {
        let mut body = vec![];
        let mut pending: &'static [u8] = b"";
        loop {
            match self.scanner.next_token()? {
                Token::Line(line) => {
                    body.extend_from_slice(pending);
                    body.extend_from_slice(&line.bytes);
                    pending = line.terminator.as_bytes();
                }
                end @ Token::Eof { .. } => {
                    body.extend_from_slice(pending);
                    self.end = end.offset();
                    self.scanner.unread(end);
                    return Ok(body);
                }
                other => {
                    self.end = other.offset() - pending.len() as u64;
                    self.scanner.unread(other);
                    return Ok(body);
                }
            }
        }
    }

    fn multipart(&mut self, boundary: &str, digest: bool, depth: usize) -> Result<Multipart, Error> {
        let level = self.scanner.push_boundary(boundary.as_bytes());
        let result = self.multipart_body(level, digest, depth);
        self.scanner.pop_boundary();
        let mut multipart = result?;

        if multipart.closed {
            multipart.inner.epilogue = self.raw_body()?;
        }
        Ok(multipart.inner)
    }

    fn multipart_body(&mut self, level: usize, digest: bool, depth: usize) -> Result<OpenMultipart, Error> {
        let preamble = self.raw_body()?;
        let mut parts = vec![];

        let closed = loop {
            match self.scanner.next_token()? {
                Token::Delimiter {
                    level: l,
                    kind: Delimiter::Next,
                    ..
                } if l == level => {
                    let default = match digest {
                        true => ContentType::message_rfc822(),
                        false => ContentType::text_plain(),
                    };
                    self.path.push(parts.len());
                    let child = self.part(default, depth + 1);
                    self.path.pop();
                    parts.push(child?);
                }
                Token::Delimiter {
                    level: l,
                    kind: Delimiter::Last,
                    ..
                } if l == level => break true,
                other => {
                    self.warn(Warning::TruncatedMultipart, other.offset());
                    self.scanner.unread(other);
                    break false;
                }
            }
        };

        Ok(OpenMultipart {
            inner: Multipart {
                preamble,
                parts,
                epilogue: vec![],
            },
            closed,
        })
    }
}

struct OpenMultipart {
    inner: Multipart,
    closed: bool,
}
