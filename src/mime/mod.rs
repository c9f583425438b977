/// Character set lookup and decoding
pub mod charset;

/// Content-Disposition representation
pub mod disposition;

/// MIME specific headers
pub mod field;

/// Transfer-Encoding representation
pub mod mechanism;

/// Structured field parameters (RFC 2045, RFC 2231)
pub mod parameter;

/// Content-Type representation
pub mod r#type;

pub use disposition::{ContentDisposition, DispositionType};
pub use field::MimeFields;
pub use mechanism::TransferEncoding;
pub use parameter::Parameters;
pub use r#type::{ContentType, MultipartSubtype};
