#![doc = include_str!("../README.md")]

pub mod classify;
pub mod config;
pub mod decode;
pub mod error;
pub mod header;
pub mod imf;
pub mod mbox;
pub mod mime;
pub mod part;
pub mod scan;
pub mod stream;
pub mod text;

use std::io::Read;

pub use classify::{JunkFilter, Verdict};
pub use config::ParserConfig;
pub use error::{Error, ParseWarning, Warning};
pub use header::{HeaderField, HeaderName, Headers};
pub use mbox::{MboxMessage, MboxReader};
pub use part::builder::{build, Builder};
pub use part::{Body, Leaf, MimePart, Multipart, ParseResult};
pub use stream::{CancelHandle, RawMessageStream};

/// Parse one message from `reader` with the default limits.
pub fn parse<R: Read>(reader: R) -> Result<ParseResult, Error> {
    Builder::default().parse(reader)
}

