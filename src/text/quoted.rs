use nom::{
    branch::alt,
    bytes::complete::{tag, take, take_while1},
    combinator::{map, opt},
    multi::many0,
    sequence::preceded,
    IResult,
};

use crate::text::ascii;
use crate::text::whitespace::{cfws, is_obs_no_ws_ctl, is_wsp};

#[derive(Debug, PartialEq, Default, Clone)]
pub struct QuotedString<'a>(pub Vec<&'a [u8]>);

impl<'a> QuotedString<'a> {
    pub fn push(&mut self, e: &'a [u8]) {
        self.0.push(e)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.concat()
    }
}

/// Quoted pair
///
/// ```abnf
///    quoted-pair     =   ("\" (VCHAR / WSP)) / obs-qp
///    obs-qp          =   "\" (%d0 / obs-NO-WS-CTL / LF / CR)
/// ```
pub fn quoted_pair(input: &[u8]) -> IResult<&[u8], &[u8]> {
    preceded(tag(&[ascii::BACKSLASH]), take(1usize))(input)
}

/// Allowed characters in quote
///
/// ```abnf
///   qtext           =   %d33 /             ; Printable US-ASCII
///                       %d35-91 /          ;  characters not including
///                       %d93-126 /         ;  "\" or the quote character
///                       obs-qtext
/// ```
fn is_restr_qtext(c: u8) -> bool {
    c == ascii::EXCLAMATION
        || (ascii::NUM..=ascii::LEFT_BRACKET).contains(&c)
        || (ascii::RIGHT_BRACKET..=ascii::TILDE).contains(&c)
}

// RFC 6532 extends qtext to any non-ASCII byte.
fn is_qtext(c: u8) -> bool {
    is_restr_qtext(c) || is_obs_no_ws_ctl(c) || c >= 0x80
}

/// Quoted pair content
///
/// ```abnf
///   qcontent        =   qtext / quoted-pair
/// ```
fn qcontent(input: &[u8]) -> IResult<&[u8], &[u8]> {
    alt((take_while1(is_qtext), quoted_pair))(input)
}

/// White space inside a quoted string, line breaks of folds included.
fn qspace(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while1(|c| is_wsp(c) || c == ascii::CR || c == ascii::LF)(input)
}

/// Quoted string
///
/// ```abnf
/// quoted-string   =   [CFWS]
///                     DQUOTE *([FWS] qcontent) [FWS] DQUOTE
///                     [CFWS]
/// ```
///
/// White space between the quotes is kept as written. Only the line breaks
/// of folds are dropped.
pub fn quoted_string(input: &[u8]) -> IResult<&[u8], QuotedString> {
    let (input, _) = opt(cfws)(input)?;
    let (input, _) = tag("\"")(input)?;
    let (input, content) = many0(alt((
        map(qspace, |s| (true, s)),
        map(qcontent, |s| (false, s)),
    )))(input)?;

    let qstring = content
        .into_iter()
        .fold(QuotedString::default(), |mut acc, (is_space, c)| {
            if is_space {
                c.split(|b| *b == ascii::CR || *b == ascii::LF)
                    .filter(|run| !run.is_empty())
                    .for_each(|run| acc.push(run));
            } else {
                acc.push(c);
            }
            acc
        });

    let (input, _) = tag("\"")(input)?;
    let (input, _) = opt(cfws)(input)?;
    Ok((input, qstring))
}

/// Unterminated quoted string
///
/// Everything after the opening quote is taken as content, with quoted
/// pairs resolved. Real-world mail regularly forgets the closing quote.
pub fn unterminated_quoted_string(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let (input, _) = opt(cfws)(input)?;
    let (input, _) = tag("\"")(input)?;

    let mut out = Vec::with_capacity(input.len());
    let mut iter = input.iter();
    while let Some(&c) = iter.next() {
        match c {
            ascii::BACKSLASH => {
                if let Some(&n) = iter.next() {
                    out.push(n);
                }
            }
            ascii::DQUOTE => (),
            _ => out.push(c),
        }
    }
    while out.last().map_or(false, |c| *c == ascii::SP || *c == ascii::HT) {
        out.pop();
    }
    Ok((&input[input.len()..], out))
}
