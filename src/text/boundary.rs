use nom::{
    bytes::complete::tag,
    combinator::{eof, map, opt},
    sequence::{terminated, tuple},
    IResult,
};

/// Kind of a multipart delimiter line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `--boundary`: a sibling part follows.
    Next,
    /// `--boundary--`: the multipart is closed.
    Last,
}

/// Match a whole line (terminator already stripped) against a boundary.
///
/// ```abnf
/// dash-boundary := "--" boundary
/// delimiter := dash-boundary [ "--" ]
/// ```
///
/// The comparison is byte exact: transport padding after the delimiter is
/// not accepted.
pub fn delimiter<'a, 'b>(
    boundary: &'b [u8],
) -> impl Fn(&'a [u8]) -> IResult<&'a [u8], Delimiter> + 'b {
    move |input: &'a [u8]| {
        map(
            terminated(tuple((tag(b"--"), tag(boundary), opt(tag(b"--")))), eof),
            |(_, _, last)| match last {
                Some(_) => Delimiter::Last,
                None => Delimiter::Next,
            },
        )(input)
    }
}

/// Convenience wrapper around [`delimiter`].
pub fn classify(line: &[u8], boundary: &[u8]) -> Option<Delimiter> {
    delimiter(boundary)(line).ok().map(|(_, d)| d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_next() {
        assert_eq!(delimiter(b"hello")(b"--hello"), Ok((&b""[..], Delimiter::Next)));
    }

    #[test]
    fn test_boundary_last() {
        assert_eq!(delimiter(b"hello")(b"--hello--"), Ok((&b""[..], Delimiter::Last)));
    }

    #[test]
    fn test_boundary_exact() {
        assert_eq!(classify(b"--hello ", b"hello"), None);
        assert_eq!(classify(b"--hello-- ", b"hello"), None);
        assert_eq!(classify(b"--hellothere", b"hello"), None);
        assert_eq!(classify(b"-hello", b"hello"), None);
        assert_eq!(classify(b"--hello", b"hello"), Some(Delimiter::Next));
    }
}
