use std::borrow::Cow;

fn hex(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

/// Decodes quoted-printable encoding, as described by RFC 2045.
///
/// `=XX` escapes (either case) are decoded and soft line breaks, with DOS
/// or UNIX endings, are discarded. Blanks between a soft break `=` and the
/// line ending are tolerated. Every other `=` sequence, including a final
/// `=`, is passed through untransformed. Never fails.
pub fn decode(input: &[u8]) -> Cow<'_, [u8]> {
    if memchr::memchr(b'=', input).is_none() {
        return Cow::Borrowed(input);
    }

    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let c = input[i];
        if c != b'=' {
            out.push(c);
            i += 1;
            continue;
        }

        let blanks = input[i + 1..]
            .iter()
            .take_while(|b| **b == b' ' || **b == b'\t')
            .count();
        let after = &input[i + 1 + blanks..];
        if after.starts_with(b"\r\n") {
            i += 1 + blanks + 2;
            continue;
        }
        if after.starts_with(b"\n") {
            i += 1 + blanks + 1;
            continue;
        }

        match (input.get(i + 1).copied().and_then(hex), input.get(i + 2).copied().and_then(hex)) {
            (Some(hi), Some(lo)) => {
                out.push(hi << 4 | lo);
                i += 3;
            }
            _ => {
                out.push(b'=');
                i += 1;
            }
        }
    }
    Cow::Owned(out)
}
