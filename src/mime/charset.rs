use std::borrow::Cow;

use ::charset::Charset;

/// Resolve a MIME charset label.
///
/// Labels are matched the way `encoding_rs` does (WHATWG), extended with the
/// mail specific aliases known by the `charset` crate (UTF-7, ...). An RFC 2231
/// language suffix (`us-ascii*en`) is ignored. Unknown labels resolve to UTF-8.
pub fn lookup(label: &[u8]) -> Charset {
    resolve(label).unwrap_or_else(|| Charset::for_encoding(encoding_rs::UTF_8))
}

/// Same as [`lookup`] but reports unknown labels.
pub fn resolve(label: &[u8]) -> Option<Charset> {
    let label = match label.iter().position(|c| *c == b'*') {
        Some(pos) => &label[..pos],
        None => label,
    };
    Charset::for_label(label.trim_ascii())
}

/// Decode `bytes` according to `label`, replacing invalid sequences.
pub fn decode<'a>(label: &[u8], bytes: &'a [u8]) -> Cow<'a, str> {
    lookup(label).decode_without_bom_handling(bytes).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup(b"utf-8").name(), "UTF-8");
        assert_eq!(lookup(b" ISO-8859-1 ").name(), "windows-1252");
        assert_eq!(lookup(b"us-ascii*en").name(), "windows-1252");
        assert_eq!(lookup(b"x-no-such-charset").name(), "UTF-8");
        assert!(resolve(b"x-no-such-charset").is_none());
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode(b"iso-8859-1", b"caf\xe9"), "café");
        assert_eq!(decode(b"utf-8", b"caf\xc3\xa9"), "café");
        assert_eq!(decode(b"bogus", b"a\xffb"), "a\u{fffd}b");
    }
}
