//! Parse IMF (Internet Message Format) field values (RFC822, RFC5322)

/// Origination date (RFC 5322 section 3.3)
pub mod datetime;

/// MIME-Version (RFC 2045 section 4)
pub mod mime;
