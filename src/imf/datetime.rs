use chrono::{DateTime, FixedOffset};

use crate::text::ascii;
use crate::text::whitespace::{comment, is_wsp};

/// Parse a `Date:` style value.
///
/// Accepts RFC 5322 section 3.3 dates plus the obsolete forms of section
/// 4.3: two digit years, named zones, and comments or folding anywhere.
pub fn parse(input: &[u8]) -> Option<DateTime<FixedOffset>> {
    let text = normalize(input);
    match DateTime::parse_from_rfc2822(&text) {
        Ok(dt) => Some(dt),
        Err(e) => {
            tracing::debug!(err=%e, value=%text, "unparseable date");
            None
        }
    }
}

/// Drop comments, collapse white space and glue the fields of the time of
/// day back together.
fn normalize(input: &[u8]) -> String {
    let mut out = Vec::with_capacity(input.len());
    let mut rest = input;
    while let Some((&c, tail)) = rest.split_first() {
        if c == ascii::LEFT_PAR {
            // an unbalanced comment runs to the end of the value
            rest = comment(rest).map_or(&b""[..], |(r, _)| r);
            push_space(&mut out);
            continue;
        }
        match c {
            ascii::CR | ascii::LF => push_space(&mut out),
            c if is_wsp(c) => push_space(&mut out),
            c => out.push(c),
        }
        rest = tail;
    }

    String::from_utf8_lossy(&out)
        .trim()
        .replace(" :", ":")
        .replace(": ", ":")
}

fn push_space(out: &mut Vec<u8>) {
    if out.last().map_or(false, |c| *c != ascii::SP) {
        out.push(ascii::SP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const HOUR: i32 = 3600;

    #[test]
    fn test_date_time_rfc_strict() {
        assert_eq!(
            parse(b"Fri, 21 Nov 1997 09:55:06 -0600"),
            Some(
                FixedOffset::west_opt(6 * HOUR)
                    .unwrap()
                    .with_ymd_and_hms(1997, 11, 21, 9, 55, 6)
                    .unwrap()
            ),
        );
    }

    #[test]
    fn test_date_time_received() {
        assert_eq!(
            parse(b"Sun, 18 Jun 2023 15:39:08 +0200 (CEST)"),
            Some(
                FixedOffset::east_opt(2 * HOUR)
                    .unwrap()
                    .with_ymd_and_hms(2023, 6, 18, 15, 39, 8)
                    .unwrap()
            ),
        );
    }

    #[test]
    fn test_date_time_rfc_ws() {
        assert_eq!(
            parse(
                r#"Thu,
         13
           Feb
             1969
         23:32
                  -0330 (Newfoundland Time)"#
                    .as_bytes()
            ),
            Some(
                FixedOffset::west_opt(3 * HOUR + 30 * 60)
                    .unwrap()
                    .with_ymd_and_hms(1969, 2, 13, 23, 32, 0)
                    .unwrap()
            ),
        );
    }

    #[test]
    fn test_date_time_rfc_obs() {
        assert_eq!(
            parse(b"21 Nov 97 09:55:06 GMT"),
            Some(
                FixedOffset::east_opt(0)
                    .unwrap()
                    .with_ymd_and_hms(1997, 11, 21, 9, 55, 6)
                    .unwrap()
            ),
        );
    }

    #[test]
    fn test_date_time_rfc_obs_ws() {
        assert_eq!(
            normalize(b"Fri, 21 Nov 1997 09(comment):   55  :  06 -0600"),
            "Fri, 21 Nov 1997 09:55:06 -0600"
        );
        assert_eq!(
            parse(b"Fri, 21 Nov 1997 09(comment):   55  :  06 -0600"),
            parse(b"Fri, 21 Nov 1997 09:55:06 -0600"),
        );
        assert!(parse(b"Fri, 21 Nov 1997 09:55:06 -0600").is_some());
    }

    #[test]
    fn test_unbalanced_comment() {
        assert_eq!(
            normalize(b"Tue, 13 Jun 2023 10:01:10 +0200 (oops"),
            "Tue, 13 Jun 2023 10:01:10 +0200"
        );
    }

    #[test]
    fn test_garbage() {
        assert_eq!(parse(b"Monday, March 12"), None);
        assert_eq!(parse(b""), None);
    }
}
