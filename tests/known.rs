use chrono::{FixedOffset, TimeZone};
use eml_stream::mime::{DispositionType, TransferEncoding};
use eml_stream::{parse, MimePart, ParseResult, Warning};
use pretty_assertions::assert_eq;

fn parser<F>(input: &[u8], func: F)
where
    F: FnOnce(&ParseResult),
{
    let result = parse(input).unwrap();
    func(&result);
}

fn kinds(r: &ParseResult) -> Vec<Warning> {
    r.warnings.iter().map(|w| w.kind).collect()
}

#[test]
fn test_headers() {
    let fullmail: &[u8] = r#"Return-Path: <gitlab@example.com>
Delivered-To: quentin@example.com
Received: from smtp.example.com ([10.83.2.2])
	by doradille with LMTP
	id xyzabcd
	(envelope-from <gitlab@example.com>)
	for <quentin@example.com>; Tue, 13 Jun 2023 19:01:08 +0000
Date: Tue, 13 Jun 2023 10:01:10 +0200
From: Mary Smith
 <mary@example.net>, "A\lan" <alan@example>
Sender: imf@example.com
Reply-To: "Mary Smith: Personal Account" <smith@home.example>
To: John Doe <jdoe@machine.example>
Cc: imf2@example.com
Bcc: (hidden)
Subject: Re: Saying Hello
Comments: A simple message
Comments: Not that complicated
comments : not valid header name but should be accepted
    by the parser.
Keywords: hello, world
HÃ©ron: RatÃ©
 RatÃ© ratÃ©
Keywords: salut, le, monde
Not a real header but should still recover
Message-ID: <3456@example.net>
In-Reply-To: <1234@local.machine.example>
References: <1234@local.machine.example>
Unknown: unknown

This is a reply to your hello.
"#
    .as_bytes();
    parser(fullmail, |parsed| {
        let root = &parsed.root;
        assert_eq!(
            kinds(parsed),
            vec![Warning::MalformedHeaderLine, Warning::MalformedHeaderLine]
        );

        assert_eq!(
            root.date(),
            Some(
                FixedOffset::east_opt(2 * 3600)
                    .unwrap()
                    .with_ymd_and_hms(2023, 6, 13, 10, 1, 10)
                    .unwrap()
            )
        );
        assert_eq!(root.subject().as_deref(), Some("Re: Saying Hello"));
        assert_eq!(
            root.headers.value("from"),
            Some(r#"Mary Smith <mary@example.net>, "A\lan" <alan@example>"#)
        );
        assert_eq!(
            root.headers.value("received"),
            Some("from smtp.example.com ([10.83.2.2]) by doradille with LMTP id xyzabcd (envelope-from <gitlab@example.com>) for <quentin@example.com>; Tue, 13 Jun 2023 19:01:08 +0000")
        );
        assert_eq!(
            root.headers
                .get_all("COMMENTS")
                .map(|f| f.unfolded_value())
                .collect::<Vec<_>>(),
            vec![
                "A simple message",
                "Not that complicated",
                "not valid header name but should be accepted by the parser.",
            ]
        );
        assert_eq!(root.headers.get_all("keywords").count(), 2);
        assert_eq!(
            root.headers
                .iter()
                .map(|f| f.name().as_str())
                .collect::<Vec<_>>(),
            vec![
                "Return-Path",
                "Delivered-To",
                "Received",
                "Date",
                "From",
                "Sender",
                "Reply-To",
                "To",
                "Cc",
                "Bcc",
                "Subject",
                "Comments",
                "Comments",
                "comments",
                "Keywords",
                "Keywords",
                "Message-ID",
                "In-Reply-To",
                "References",
                "Unknown",
            ]
        );

        assert_eq!(root.content_type.essence(), "text/plain");
        assert_eq!(root.text().as_deref(), Some("This is a reply to your hello.\n"));
    });
}

#[test]
fn test_multipart_with_attachment() {
    let fullmail: &[u8] = b"Date: Sat, 8 Jul 2023 07:14:29 +0200\r
From: Grrrnd Zero <grrrndzero@example.org>\r
To: John Doe <jdoe@machine.example>\r
Subject: =?iso-8859-1?Q?Pour_un_=E9v=E8nement_qui_?=\r
 =?iso-8859-1?Q?ne_sera_pas?=\r
MIME-Version: 1.0\r
Content-Type: multipart/mixed;\r
 boundary=\"b1_e376dc71bafc953c0b0fdeb9983a9956\"\r
\r
This is a multi-part message in MIME format.\r
\r
--b1_e376dc71bafc953c0b0fdeb9983a9956\r
Content-Type: multipart/alternative; boundary=\"b2\"\r
\r
--b2\r
Content-Type: text/plain; charset=iso-8859-1\r
Content-Transfer-Encoding: quoted-printable\r
\r
J'interdis aux marchands de vanter trop leurs marchandises. Car ils se font=\r
 vite p=E9dagogues.\r
--b2\r
Content-Type: text/html; charset=utf-8\r
Content-Transfer-Encoding: base64\r
\r
PGgxPkNhZsOpPC9oMT4=\r
--b2--\r
\r
--b1_e376dc71bafc953c0b0fdeb9983a9956\r
Content-Type: application/pdf; name=\"ignored.pdf\"\r
Content-Disposition: attachment;\r
 filename*=utf-8''r%C3%A9sum%C3%A9.pdf\r
Content-Transfer-Encoding: base64\r
\r
JVBERi0x\r
LjQK\r
--b1_e376dc71bafc953c0b0fdeb9983a9956--\r
";
    parser(fullmail, |parsed| {
        assert!(!parsed.has_warnings());
        let root = &parsed.root;
        assert_eq!(
            root.subject().as_deref(),
            Some("Pour un \u{e9}v\u{e8}nement qui ne sera pas")
        );
        assert_eq!(root.mime_version().map(|v| v.to_string()).as_deref(), Some("1.0"));

        let mixed = root.as_multipart().unwrap();
        assert_eq!(
            String::from_utf8_lossy(&mixed.preamble),
            "This is a multi-part message in MIME format.\r\n"
        );
        assert_eq!(mixed.parts.len(), 2);
        assert!(mixed.epilogue.is_empty());

        let alternative = root.find(&[0]).unwrap();
        assert_eq!(alternative.content_type.essence(), "multipart/alternative");
        assert_eq!(alternative.children().len(), 2);
        assert_eq!(
            alternative.as_multipart().unwrap().epilogue,
            b"".to_vec(),
        );

        let plain = root.find(&[0, 0]).unwrap();
        assert_eq!(plain.encoding, TransferEncoding::QuotedPrintable);
        assert_eq!(
            plain.text().as_deref(),
            Some("J'interdis aux marchands de vanter trop leurs marchandises. Car ils se font vite p\u{e9}dagogues.")
        );

        let html = root.find(&[0, 1]).unwrap();
        assert_eq!(html.text().as_deref(), Some("<h1>Caf\u{e9}</h1>"));

        let pdf = root.find(&[1]).unwrap();
        let disposition = pdf.disposition.as_ref().unwrap();
        assert_eq!(disposition.kind, DispositionType::Attachment);
        assert_eq!(pdf.filename(), Some("r\u{e9}sum\u{e9}.pdf"));
        assert_eq!(pdf.decoded(), Some(&b"%PDF-1.4\n"[..]));
        assert_eq!(pdf.as_leaf().unwrap().raw(), b"JVBERi0x\r\nLjQK");

        let essences: Vec<_> = root.walk().map(|p| p.content_type.essence()).collect();
        assert_eq!(
            essences,
            vec![
                "multipart/mixed",
                "multipart/alternative",
                "text/plain",
                "text/html",
                "application/pdf",
            ]
        );
    });
}

#[test]
fn test_forwarded_message() {
    let fullmail: &[u8] = b"Subject: Fwd: report
Content-Type: multipart/mixed; boundary=outer

--outer
Content-Type: text/plain

See below.
--outer
Content-Type: message/rfc822
Content-Disposition: inline

Subject: report
Content-Type: multipart/alternative; boundary=inner

--inner

numbers
--inner--
--outer--
";
    parser(fullmail, |parsed| {
        assert!(parsed.warnings.is_empty());
        let forwarded = parsed.root.find(&[1]).unwrap();
        assert!(forwarded.content_type.is_message());
        assert_eq!(forwarded.encoding, TransferEncoding::SevenBit);

        let inner: &MimePart = forwarded.as_message().unwrap();
        assert_eq!(inner.subject().as_deref(), Some("report"));
        assert_eq!(parsed.root.find(&[1, 0, 0]).unwrap().text().as_deref(), Some("numbers"));
        assert_eq!(parsed.root.walk().count(), 5);
    });
}

#[test]
fn test_offsets() {
    let fullmail: &[u8] = b"Content-Type: multipart/mixed; boundary=x\n\n--x\nA: b\n\none\n--x--\n";
    parser(fullmail, |parsed| {
        let root = &parsed.root;
        assert_eq!(root.offsets.headers, 0);
        assert_eq!(root.offsets.body, 43);
        assert_eq!(root.offsets.end, fullmail.len() as u64);

        let child = root.find(&[0]).unwrap();
        assert_eq!(child.offsets.headers, 47);
        assert_eq!(child.offsets.body, 53);
        assert_eq!(child.offsets.end, 56);
        assert_eq!(&fullmail[53..56], b"one");
    });
}
