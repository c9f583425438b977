use nom::{
    bytes::complete::tag,
    character::complete::digit1,
    combinator::{map_res, opt},
    sequence::tuple,
    IResult,
};
use std::fmt;

use crate::text::whitespace::cfws;

/// `MIME-Version` header value.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// ```abnf
/// version := [CFWS] 1*DIGIT [CFWS] "." [CFWS] 1*DIGIT [CFWS]
/// ```
pub fn version(input: &[u8]) -> IResult<&[u8], Version> {
    let (rest, (_, major, _, _, _, minor, _)) = tuple((
        opt(cfws),
        map_res(digit1, ascii_to_u64),
        opt(cfws),
        tag(b"."),
        opt(cfws),
        map_res(digit1, ascii_to_u64),
        opt(cfws),
    ))(input)?;
    Ok((rest, Version { major, minor }))
}

fn ascii_to_u64(c: &[u8]) -> Result<u64, std::num::ParseIntError> {
    String::from_utf8_lossy(c).parse()
}
