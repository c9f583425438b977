use ::charset::Charset;
use nom::{
    branch::alt,
    bytes::complete::{tag, take, take_while, take_while1},
    character::complete::one_of,
    character::is_alphanumeric,
    combinator::map,
    multi::{many0, many1},
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::decode::base64;
use crate::mime::charset::lookup;
use crate::text::ascii;
use crate::text::whitespace::is_wsp;
use crate::text::words;

// NOTE: this is part of the comment syntax, so should not
// recurse and call CFWS itself, for parsing efficiency reasons.
pub fn encoded_word_plain(input: &[u8]) -> IResult<&[u8], EncodedWord<'_>> {
    alt((encoded_word_quoted, encoded_word_base64))(input)
}

pub fn encoded_word_quoted(input: &[u8]) -> IResult<&[u8], EncodedWord<'_>> {
    let (rest, (_, label, _, _, _, txt, _)) = tuple((
        tag("=?"),
        words::mime_atom_plain,
        tag("?"),
        one_of("Qq"),
        tag("?"),
        ptext,
        tag("?="),
    ))(input)?;

    let parsed = EncodedWord::Quoted(QuotedWord {
        enc: lookup(label),
        chunks: txt,
    });
    Ok((rest, parsed))
}

pub fn encoded_word_base64(input: &[u8]) -> IResult<&[u8], EncodedWord<'_>> {
    let (rest, (_, label, _, _, _, txt, _)) = tuple((
        tag("=?"),
        words::mime_atom_plain,
        tag("?"),
        one_of("Bb"),
        tag("?"),
        btext,
        tag("?="),
    ))(input)?;

    let parsed = EncodedWord::Base64(Base64Word {
        enc: lookup(label),
        content: txt,
    });
    Ok((rest, parsed))
}

#[derive(PartialEq, Debug, Clone)]
pub enum EncodedWord<'a> {
    Quoted(QuotedWord<'a>),
    Base64(Base64Word<'a>),
}
impl<'a> EncodedWord<'a> {
    pub fn to_string(&self) -> String {
        match self {
            EncodedWord::Quoted(v) => v.to_string(),
            EncodedWord::Base64(v) => v.to_string(),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Base64Word<'a> {
    pub enc: Charset,
    pub content: &'a [u8],
}

impl<'a> Base64Word<'a> {
    pub fn to_string(&self) -> String {
        let bytes = base64::decode_lenient(self.content);
        self.enc.decode_without_bom_handling(&bytes).0.into_owned()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct QuotedWord<'a> {
    pub enc: Charset,
    pub chunks: Vec<QuotedChunk<'a>>,
}

impl<'a> QuotedWord<'a> {
    pub fn to_string(&self) -> String {
        // Decode once so multi-byte sequences spread over chunks survive.
        let bytes = self.chunks.iter().fold(Vec::new(), |mut acc, c| {
            match c {
                QuotedChunk::Safe(v) => acc.extend_from_slice(v),
                QuotedChunk::Space => acc.push(ascii::SP),
                QuotedChunk::Encoded(v) => acc.extend_from_slice(v),
            };
            acc
        });
        self.enc.decode_without_bom_handling(&bytes).0.into_owned()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum QuotedChunk<'a> {
    Safe(&'a [u8]),
    Encoded(Vec<u8>),
    Space,
}

//quoted_printable
pub fn ptext(input: &[u8]) -> IResult<&[u8], Vec<QuotedChunk<'_>>> {
    many0(alt((safe_char2, encoded_space, many_hex_octet)))(input)
}

fn safe_char2(input: &[u8]) -> IResult<&[u8], QuotedChunk<'_>> {
    map(take_while1(is_safe_char2), QuotedChunk::Safe)(input)
}

/// RFC2047 section 4.2
/// 8-bit values which correspond to printable ASCII characters other
/// than "=", "?", and "_" (underscore), MAY be represented as those
/// characters.
fn is_safe_char2(c: u8) -> bool {
    c >= ascii::SP && c != ascii::UNDERSCORE && c != ascii::QUESTION && c != ascii::EQ
}

fn encoded_space(input: &[u8]) -> IResult<&[u8], QuotedChunk<'_>> {
    map(tag("_"), |_| QuotedChunk::Space)(input)
}

fn hex_octet(input: &[u8]) -> IResult<&[u8], u8> {
    use nom::error::*;

    let (rest, hbytes) = preceded(tag("="), take(2usize))(input)?;

    let hstr = String::from_utf8_lossy(hbytes);
    let parsed = u8::from_str_radix(hstr.as_ref(), 16)
        .map_err(|_| nom::Err::Error(Error::new(input, ErrorKind::Verify)))?;

    Ok((rest, parsed))
}

fn many_hex_octet(input: &[u8]) -> IResult<&[u8], QuotedChunk<'_>> {
    map(many1(hex_octet), QuotedChunk::Encoded)(input)
}

//base64
pub fn btext(input: &[u8]) -> IResult<&[u8], &[u8]> {
    terminated(take_while(is_bchar), many0(tag("=")))(input)
}

fn is_bchar(c: u8) -> bool {
    is_alphanumeric(c) || c == ascii::PLUS || c == ascii::SLASH
}

/// Decode an unstructured header value (RFC 2047 section 5.1).
///
/// Encoded words are replaced by their decoded text, whitespace separating
/// two encoded words is dropped, and anything that does not parse as an
/// encoded word is kept as is.
pub fn decode_unstructured(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_ws: &[u8] = b"";
    let mut prev_encoded = false;
    let mut rest = input;

    while !rest.is_empty() {
        let ws_len = rest.iter().take_while(|c| is_space(**c)).count();
        if ws_len > 0 {
            pending_ws = &rest[..ws_len];
            rest = &rest[ws_len..];
            continue;
        }

        let word_len = rest.iter().take_while(|c| !is_space(**c)).count();
        let (word, tail) = rest.split_at(word_len);
        rest = tail;

        let mut decoded = String::new();
        let mut remaining = word;
        while let Ok((r, ew)) = encoded_word_plain(remaining) {
            decoded.push_str(&ew.to_string());
            remaining = r;
        }
        let encoded = remaining.len() < word.len();

        if !(encoded && prev_encoded) {
            out.push_str(&String::from_utf8_lossy(pending_ws));
        }
        out.push_str(&decoded);
        out.push_str(&String::from_utf8_lossy(remaining));

        prev_encoded = encoded && remaining.is_empty();
        pending_ws = b"";
    }
    out.push_str(&String::from_utf8_lossy(pending_ws));
    out
}

fn is_space(c: u8) -> bool {
    is_wsp(c) || c == ascii::CR || c == ascii::LF
}
