use nom::{combinator::eof, sequence::terminated, IResult};

use crate::mime::charset;
use crate::text::ascii;
use crate::text::quoted::{quoted_string, unterminated_quoted_string};
use crate::text::words::mime_atom;

/// Ordered parameter set of a structured MIME field.
///
/// Names are stored lower-cased. The first occurrence of a name wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameters(Vec<(String, String)>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns false and keeps the existing value when `name` is already set.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into().to_ascii_lowercase();
        if self.get(&name).is_some() {
            return false;
        }
        self.0.push((name, value.into()));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Split a structured field on `;`, ignoring separators inside quoted
/// strings and comments.
pub fn split_segments(input: &[u8]) -> Vec<&[u8]> {
    let mut segments = vec![];
    let mut start = 0;
    let mut in_quote = false;
    let mut comment_depth = 0usize;
    let mut escaped = false;

    for (i, c) in input.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match *c {
            ascii::BACKSLASH if in_quote || comment_depth > 0 => escaped = true,
            ascii::DQUOTE if comment_depth == 0 => in_quote = !in_quote,
            ascii::LEFT_PAR if !in_quote => comment_depth += 1,
            ascii::RIGHT_PAR if !in_quote => comment_depth = comment_depth.saturating_sub(1),
            ascii::SEM_COL if !in_quote && comment_depth == 0 => {
                segments.push(&input[start..i]);
                start = i + 1;
            }
            _ => (),
        }
    }
    segments.push(&input[start..]);
    segments
}

/// Parameter name, the part before the first `=`.
///
/// ```abnf
/// attribute := [CFWS] 1*attribute-char [CFWS]
/// ```
fn attribute(input: &[u8]) -> IResult<&[u8], &[u8]> {
    terminated(mime_atom, eof)(input)
}

/// Parameter value, the part after the first `=`.
///
/// A quoted string loses one layer of quoting, an unterminated quoted string
/// takes the rest of the segment, a token is taken as is. Anything else is
/// kept verbatim minus surrounding whitespace.
pub fn value(input: &[u8]) -> Vec<u8> {
    if let Ok((_, q)) = terminated(quoted_string, eof)(input) {
        return q.to_bytes();
    }
    if let Ok((_, v)) = unterminated_quoted_string(input) {
        return v;
    }
    if let Ok((_, v)) = terminated(mime_atom, eof)(input) {
        return v.to_vec();
    }
    trim(input).to_vec()
}

fn trim(input: &[u8]) -> &[u8] {
    let is_space = |c: &u8| matches!(*c, ascii::SP | ascii::HT | ascii::CR | ascii::LF);
    let start = input.iter().position(|c| !is_space(c)).unwrap_or(input.len());
    let end = input.iter().rposition(|c| !is_space(c)).map_or(start, |p| p + 1);
    &input[start..end]
}

/// Split a raw `name=value` segment on its first `=`.
pub fn raw_parameter(segment: &[u8]) -> Option<(String, Vec<u8>)> {
    let eq = segment.iter().position(|c| *c == ascii::EQ)?;
    let (_, name) = attribute(&segment[..eq]).ok()?;
    Some((
        String::from_utf8_lossy(name).to_ascii_lowercase(),
        value(&segment[eq + 1..]),
    ))
}

/// Parse every `; name=value` segment of a structured field.
pub fn parameter_list(segments: &[&[u8]]) -> Parameters {
    let raw = segments
        .iter()
        .filter_map(|s| raw_parameter(s))
        .collect::<Vec<_>>();
    assemble(raw)
}

// --- RFC 2231

#[derive(Debug)]
struct Section {
    index: u32,
    encoded: bool,
    value: Vec<u8>,
}

/// `name*`, `name*0`, `name*1*`...: returns the base name, the section
/// index and whether the section is percent encoded.
fn extended_name(name: &str) -> Option<(&str, u32, bool)> {
    let (base, rest) = name.split_once('*')?;
    if base.is_empty() {
        return None;
    }
    if rest.is_empty() {
        return Some((base, 0, true));
    }
    let encoded = rest.ends_with('*');
    let digits = rest.strip_suffix('*').unwrap_or(rest);
    let index = digits.parse::<u32>().ok()?;
    Some((base, index, encoded))
}

fn percent_decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == ascii::PERCENT && i + 2 < input.len() {
            if let Some(b) = hex_byte(input[i + 1], input[i + 2]) {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(input[i]);
        i += 1;
    }
    out
}

fn hex_byte(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

/// `charset'language'data`
fn extended_initial(input: &[u8]) -> (Option<&[u8]>, &[u8]) {
    let mut parts = input.splitn(3, |c| *c == ascii::SQUOTE);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(cs), Some(_lang), Some(data)) => (Some(cs).filter(|cs| !cs.is_empty()), data),
        _ => (None, input),
    }
}

fn join_sections(mut sections: Vec<Section>) -> String {
    sections.sort_by_key(|s| s.index);
    sections.dedup_by_key(|s| s.index);

    let mut label = None;
    let mut bytes = vec![];
    for section in sections.iter() {
        match (section.index, section.encoded) {
            (0, true) => {
                let (cs, data) = extended_initial(&section.value);
                label = cs;
                bytes.extend(percent_decode(data));
            }
            (_, true) => bytes.extend(percent_decode(&section.value)),
            (_, false) => bytes.extend_from_slice(&section.value),
        }
    }

    match label {
        Some(label) => charset::decode(label, &bytes).into_owned(),
        None => String::from_utf8_lossy(&bytes).into_owned(),
    }
}

/// Reassemble RFC 2231 sections and build the final parameter set.
///
/// An extended value takes precedence over a plain parameter of the same
/// base name; otherwise the first occurrence wins.
fn assemble(raw: Vec<(String, Vec<u8>)>) -> Parameters {
    let mut groups: Vec<(String, Vec<Section>)> = vec![];
    let mut order: Vec<(String, Option<Vec<u8>>)> = vec![];

    for (name, value) in raw {
        match extended_name(&name) {
            Some((base, index, encoded)) => {
                let section = Section {
                    index,
                    encoded,
                    value,
                };
                match groups.iter_mut().find(|(b, _)| b == base) {
                    Some((_, sections)) => sections.push(section),
                    None => {
                        order.push((base.to_string(), None));
                        groups.push((base.to_string(), vec![section]));
                    }
                }
            }
            None => order.push((name, Some(value))),
        }
    }

    let mut params = Parameters::new();
    let mut groups = groups
        .into_iter()
        .map(|(b, s)| (b, Some(s)))
        .collect::<Vec<_>>();
    for (name, plain) in order {
        match groups.iter_mut().find(|(b, _)| *b == name) {
            Some((_, sections)) => {
                if let Some(sections) = sections.take() {
                    params.insert(name, join_sections(sections));
                }
            }
            None => {
                if let Some(value) = plain {
                    params.insert(name, String::from_utf8_lossy(&value).into_owned());
                }
            }
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(input: &[u8]) -> Parameters {
        parameter_list(&split_segments(input))
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(
            split_segments(b"text/plain; name=\"a;b\"; (c;d) x=y"),
            vec![&b"text/plain"[..], &b" name=\"a;b\""[..], &b" (c;d) x=y"[..]],
        );
    }

    #[test]
    fn test_quoted_and_token() {
        let p = params(b"; charset=\"utf-8\" ; Format=flowed (comment)");
        assert_eq!(p.get("charset"), Some("utf-8"));
        assert_eq!(p.get("format"), Some("flowed"));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_escapes() {
        let p = params(b"; name=\"say \\\"hi\\\".txt\"");
        assert_eq!(p.get("name"), Some("say \"hi\".txt"));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let p = params(b"; boundary=one; BOUNDARY=two");
        assert_eq!(p.get("boundary"), Some("one"));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn test_unterminated_quote() {
        let p = params(b"; filename=\"report; final.pdf");
        assert_eq!(p.get("filename"), Some("report; final.pdf"));
    }

    #[test]
    fn test_first_equal_sign() {
        let p = params(b"; boundary==_NextPart=_01");
        assert_eq!(p.get("boundary"), Some("=_NextPart=_01"));
    }

    #[test]
    fn test_no_equal_ignored() {
        let p = params(b"; garbage; charset=us-ascii");
        assert_eq!(p.get("charset"), Some("us-ascii"));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn test_unquoted_with_spaces() {
        let p = params(b"; name=my file.pdf");
        assert_eq!(p.get("name"), Some("my file.pdf"));
    }

    #[test]
    fn test_rfc2231_extended() {
        let p = params(b"; filename*=iso-8859-1'en'caf%E9.txt");
        assert_eq!(p.get("filename"), Some("café.txt"));
    }

    #[test]
    fn test_rfc2231_continuations() {
        let p = params(
            b"; title*1*=%20part; title*0*=us-ascii'en'This%20is; title*2=\" end\"",
        );
        assert_eq!(p.get("title"), Some("This is part end"));
    }

    #[test]
    fn test_rfc2231_wins_over_plain() {
        let p = params(b"; filename=\"fallback.txt\"; filename*=UTF-8''r%C3%A9el.txt");
        assert_eq!(p.get("filename"), Some("réel.txt"));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn test_rfc2231_missing_first_section() {
        let p = params(b"; title*1*=it's%20a'b; title*2=\" end\"");
        assert_eq!(p.get("title"), Some("it's a'b end"));
    }

    #[test]
    fn test_quoted_spaces_kept() {
        let p = params(b"; boundary=\"a  b\"; name=\"  two  spaces.txt  \"; x=\"\tz\"");
        assert_eq!(p.get("boundary"), Some("a  b"));
        assert_eq!(p.get("name"), Some("  two  spaces.txt  "));
        assert_eq!(p.get("x"), Some("\tz"));
    }

    #[test]
    fn test_percent_decode_invalid() {
        assert_eq!(percent_decode(b"100%zz%4"), b"100%zz%4".to_vec());
        assert_eq!(percent_decode(b"%41%42"), b"AB".to_vec());
    }
}
