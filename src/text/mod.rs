/// Named ASCII bytes
pub mod ascii;

/// Multipart delimiter lines (RFC 2046 section 5.1.1)
pub mod boundary;

/// Encoded words (RFC 2047)
pub mod encoding;

/// Quoted strings and quoted pairs
pub mod quoted;

/// Folding white space and comments
pub mod whitespace;

/// Atoms and tokens
pub mod words;
