/// Parser limits.
///
/// There is no configuration file: callers build a value and hand it to
/// [`crate::part::builder::Builder`] or [`crate::mbox::MboxReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Composite parts nested this deep become opaque leaves.
    pub max_depth: usize,
    /// Lines whose content, terminator excluded, is longer than this are
    /// delivered in chunks.
    pub max_line_length: usize,
    /// Size of a single read on the underlying source.
    pub read_chunk: usize,
}

pub const DEFAULT_MAX_DEPTH: usize = 100;
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;
pub const DEFAULT_READ_CHUNK: usize = 8 * 1024;

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            read_chunk: DEFAULT_READ_CHUNK,
        }
    }
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Clamped to at least 2 bytes so a chunk can always make progress.
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length.max(2);
        self
    }

    pub fn with_read_chunk(mut self, read_chunk: usize) -> Self {
        self.read_chunk = read_chunk.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters() {
        let c = ParserConfig::default()
            .with_max_depth(3)
            .with_max_line_length(0)
            .with_read_chunk(0);
        assert_eq!(c.max_depth, 3);
        assert_eq!(c.max_line_length, 2);
        assert_eq!(c.read_chunk, 1);
        assert_eq!(ParserConfig::default().max_depth, 100);
    }
}
