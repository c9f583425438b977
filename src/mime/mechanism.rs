use nom::{
    combinator::{eof, map},
    sequence::terminated,
    IResult,
};
use std::fmt;

use crate::decode::{Base64, Decoder, Identity, QuotedPrintable};
use crate::text::words::mime_atom;

/// `Content-Transfer-Encoding` value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    #[default]
    SevenBit,
    EightBit,
    Binary,
    Base64,
    QuotedPrintable,
    /// Unrecognized mechanism, lower-cased.
    Unknown(String),
}

impl TransferEncoding {
    pub fn as_str(&self) -> &str {
        match self {
            Self::SevenBit => "7bit",
            Self::EightBit => "8bit",
            Self::Binary => "binary",
            Self::Base64 => "base64",
            Self::QuotedPrintable => "quoted-printable",
            Self::Unknown(v) => v.as_str(),
        }
    }

    /// Decoder for leaves carrying this encoding.
    pub fn decoder(&self) -> &'static dyn Decoder {
        match self {
            Self::Base64 => &Base64,
            Self::QuotedPrintable => &QuotedPrintable,
            Self::SevenBit | Self::EightBit | Self::Binary | Self::Unknown(_) => &Identity,
        }
    }

    /// Composite bodies may only be 7bit, 8bit or binary (RFC 2045 6.4).
    pub fn for_composite(self) -> Self {
        match self {
            Self::EightBit => Self::EightBit,
            Self::Binary => Self::Binary,
            _ => Self::SevenBit,
        }
    }
}

impl From<&[u8]> for TransferEncoding {
    fn from(token: &[u8]) -> Self {
        match token.to_ascii_lowercase().as_slice() {
            b"7bit" => Self::SevenBit,
            b"8bit" => Self::EightBit,
            b"binary" => Self::Binary,
            b"quoted-printable" => Self::QuotedPrintable,
            b"base64" => Self::Base64,
            other => Self::Unknown(String::from_utf8_lossy(other).into_owned()),
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn mechanism(input: &[u8]) -> IResult<&[u8], TransferEncoding> {
    map(terminated(mime_atom, eof), TransferEncoding::from)(input)
}

/// Parse a header value, never failing: an empty value is 7bit, garbage
/// is kept as an unknown mechanism.
pub fn transfer_encoding(input: &[u8]) -> TransferEncoding {
    match mechanism(input) {
        Ok((_, m)) => m,
        Err(_) => {
            let raw = String::from_utf8_lossy(input);
            match raw.trim() {
                "" => TransferEncoding::SevenBit,
                other => TransferEncoding::Unknown(other.to_ascii_lowercase()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mechanism() {
        assert_eq!(mechanism(b"7bit").unwrap().1, TransferEncoding::SevenBit);

        assert_eq!(
            mechanism(b"(youhou) 8bit").unwrap().1,
            TransferEncoding::EightBit,
        );

        assert_eq!(
            mechanism(b"(blip) bInArY (blip blip)").unwrap().1,
            TransferEncoding::Binary,
        );

        assert_eq!(mechanism(b" base64 ").unwrap().1, TransferEncoding::Base64);

        assert_eq!(
            mechanism(b" Quoted-Printable ").unwrap().1,
            TransferEncoding::QuotedPrintable,
        );
    }

    #[test]
    fn test_transfer_encoding_fallback() {
        assert_eq!(transfer_encoding(b"  "), TransferEncoding::SevenBit);
        assert_eq!(
            transfer_encoding(b"x-uuencode"),
            TransferEncoding::Unknown("x-uuencode".into())
        );
        assert_eq!(
            transfer_encoding(b"base 64"),
            TransferEncoding::Unknown("base 64".into())
        );
    }

    #[test]
    fn test_for_composite() {
        assert_eq!(
            TransferEncoding::Base64.for_composite(),
            TransferEncoding::SevenBit
        );
        assert_eq!(
            TransferEncoding::Binary.for_composite(),
            TransferEncoding::Binary
        );
    }
}
