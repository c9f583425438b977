//! Transfer decoding of leaf bodies (RFC 2045 section 6).
//!
//! Decoding never fails: stray or invalid input degrades to literal
//! pass-through.

pub mod base64;
pub mod quoted_printable;

use std::borrow::Cow;

use crate::mime::mechanism::TransferEncoding;

/// Undo one content transfer encoding.
pub trait Decoder: Send + Sync {
    fn decode<'a>(&self, raw: &'a [u8]) -> Cow<'a, [u8]>;
}

/// 7bit, 8bit, binary and unknown mechanisms.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

#[derive(Debug, Clone, Copy, Default)]
pub struct Base64;

#[derive(Debug, Clone, Copy, Default)]
pub struct QuotedPrintable;

impl Decoder for Identity {
    fn decode<'a>(&self, raw: &'a [u8]) -> Cow<'a, [u8]> {
        Cow::Borrowed(raw)
    }
}

impl Decoder for Base64 {
    fn decode<'a>(&self, raw: &'a [u8]) -> Cow<'a, [u8]> {
        Cow::Owned(base64::decode_lenient(raw))
    }
}

impl Decoder for QuotedPrintable {
    fn decode<'a>(&self, raw: &'a [u8]) -> Cow<'a, [u8]> {
        quoted_printable::decode(raw)
    }
}

/// Decode `raw` according to `encoding`. Pure.
pub fn decode<'a>(raw: &'a [u8], encoding: &TransferEncoding) -> Cow<'a, [u8]> {
    encoding.decoder().decode(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch() {
        assert_eq!(decode(b"aGVsbG8=", &TransferEncoding::Base64).as_ref(), b"hello");
        assert_eq!(
            decode(b"caf=C3=A9", &TransferEncoding::QuotedPrintable).as_ref(),
            "café".as_bytes()
        );
        assert_eq!(decode(b"=C3", &TransferEncoding::SevenBit).as_ref(), b"=C3");
        assert_eq!(
            decode(b"=C3", &TransferEncoding::Unknown("x-uuencode".into())).as_ref(),
            b"=C3"
        );
    }

    #[test]
    fn test_identity_is_idempotent() {
        let raw = b"already decoded\r\n=41 stays";
        let once = decode(raw, &TransferEncoding::SevenBit).into_owned();
        let twice = decode(&once, &TransferEncoding::SevenBit).into_owned();
        assert_eq!(once, raw.to_vec());
        assert_eq!(twice, once);
    }
}
