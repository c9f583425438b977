use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

use crate::decode::decode;
use crate::mime::TransferEncoding;

/// Body bytes of a discrete part, kept exactly as transferred.
///
/// Decoding happens on first access and is cached; concurrent readers
/// share one decode. An identity decode is not copied.
#[derive(Clone, Default)]
pub struct Leaf {
    raw: Vec<u8>,
    decoded: OnceLock<Option<Vec<u8>>>,
}

impl Leaf {
    pub fn new(raw: Vec<u8>) -> Self {
        Self {
            raw,
            decoded: OnceLock::new(),
        }
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.raw
    }

    /// Decoded body. The first call fixes the cached result, so a leaf
    /// must always be decoded with its part's encoding.
    pub fn decoded(&self, encoding: &TransferEncoding) -> &[u8] {
        let cached = self.decoded.get_or_init(|| match decode(&self.raw, encoding) {
            Cow::Borrowed(_) => None,
            Cow::Owned(v) => Some(v),
        });
        cached.as_deref().unwrap_or(&self.raw)
    }

    pub fn is_decoded(&self) -> bool {
        self.decoded.get().is_some()
    }
}

impl PartialEq for Leaf {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Leaf {}

impl fmt::Debug for Leaf {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("part::Leaf")
            .field(
                "raw",
                &format_args!("\"{}\"", String::from_utf8_lossy(&self.raw)),
            )
            .field("decoded", &self.is_decoded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_decode() {
        let leaf = Leaf::new(b"aGVsbG8=".to_vec());
        assert!(!leaf.is_decoded());
        assert_eq!(leaf.decoded(&TransferEncoding::Base64), b"hello");
        assert!(leaf.is_decoded());
        assert_eq!(leaf.raw(), b"aGVsbG8=");
    }

    #[test]
    fn test_identity_borrows_raw() {
        let leaf = Leaf::new(b"plain".to_vec());
        let decoded = leaf.decoded(&TransferEncoding::SevenBit);
        assert_eq!(decoded.as_ptr(), leaf.raw().as_ptr());
    }

    #[test]
    fn test_shared_between_threads() {
        let leaf = std::sync::Arc::new(Leaf::new(b"Zm9v".to_vec()));
        let handles = (0..4)
            .map(|_| {
                let leaf = leaf.clone();
                std::thread::spawn(move || leaf.decoded(&TransferEncoding::Base64).to_vec())
            })
            .collect::<Vec<_>>();
        for h in handles {
            assert_eq!(h.join().unwrap(), b"foo".to_vec());
        }
    }
}
