use crate::header::HeaderField;
use crate::mime::disposition::{content_disposition, ContentDisposition};
use crate::mime::mechanism::{transfer_encoding, TransferEncoding};
use crate::mime::r#type::{content_type, ContentType};

/// A MIME header understood by the structure builder.
#[derive(Debug, PartialEq)]
pub enum Content {
    Type(ContentType),
    TransferEncoding(TransferEncoding),
    Disposition(ContentDisposition),
}

impl Content {
    pub fn ctype(&self) -> Option<&ContentType> {
        match self {
            Content::Type(v) => Some(v),
            _ => None,
        }
    }
    pub fn transfer_encoding(&self) -> Option<&TransferEncoding> {
        match self {
            Content::TransferEncoding(v) => Some(v),
            _ => None,
        }
    }
    pub fn disposition(&self) -> Option<&ContentDisposition> {
        match self {
            Content::Disposition(v) => Some(v),
            _ => None,
        }
    }
}

impl TryFrom<&HeaderField> for Content {
    type Error = ();

    fn try_from(f: &HeaderField) -> Result<Self, Self::Error> {
        let value = f.unfolded_bytes();
        match f.name().as_str().to_ascii_lowercase().as_str() {
            "content-type" => content_type(&value).map(Content::Type).ok_or(()),
            "content-transfer-encoding" => {
                Ok(Content::TransferEncoding(transfer_encoding(&value)))
            }
            "content-disposition" => content_disposition(&value)
                .map(Content::Disposition)
                .ok_or(()),
            _ => Err(()),
        }
    }
}

/// MIME fields of one part; the first valid occurrence of each wins.
#[derive(Debug, Default, PartialEq)]
pub struct MimeFields {
    pub ctype: Option<ContentType>,
    pub transfer_encoding: Option<TransferEncoding>,
    pub disposition: Option<ContentDisposition>,
}

impl FromIterator<Content> for MimeFields {
    fn from_iter<I: IntoIterator<Item = Content>>(it: I) -> Self {
        it.into_iter().fold(MimeFields::default(), |mut section, field| {
            match field {
                Content::Type(v) => {
                    section.ctype.get_or_insert(v);
                }
                Content::TransferEncoding(v) => {
                    section.transfer_encoding.get_or_insert(v);
                }
                Content::Disposition(v) => {
                    section.disposition.get_or_insert(v);
                }
            };
            section
        })
    }
}

impl<'a> FromIterator<&'a HeaderField> for MimeFields {
    fn from_iter<I: IntoIterator<Item = &'a HeaderField>>(it: I) -> Self {
        it.into_iter()
            .filter_map(|f| Content::try_from(f).ok())
            .collect()
    }
}
