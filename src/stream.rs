use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::DEFAULT_READ_CHUNK;
use crate::error::Error;

/// Lets another thread stop a parse in progress.
///
/// Once triggered the stream reports end of input; the parser then closes
/// whatever parts are open, exactly as with a truncated message.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Exclusive, forward-only reader over a message source.
pub struct RawMessageStream<R> {
    reader: R,
    buf: Vec<u8>,
    pos: usize,
    offset: u64,
    chunk: usize,
    eof: bool,
    closed: CancelHandle,
}

impl<R: Read> RawMessageStream<R> {
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_READ_CHUNK)
    }

    pub fn with_chunk_size(reader: R, chunk: usize) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(chunk),
            pos: 0,
            offset: 0,
            chunk: chunk.max(1),
            eof: false,
            closed: CancelHandle::default(),
        }
    }

    /// Absolute offset of the next byte to be consumed.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.closed.clone()
    }

    /// Any further read reports end of stream.
    pub fn close(&mut self) {
        self.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Read up to `max_bytes`, `None` at end of stream.
    pub fn read(&mut self, max_bytes: usize) -> Result<Option<Vec<u8>>, Error> {
        if self.is_closed() {
            return Ok(None);
        }
        if self.pos == self.buf.len() && !self.fill()? {
            return Ok(None);
        }
        let n = (self.buf.len() - self.pos).min(max_bytes.max(1));
        Ok(Some(self.consume(n)))
    }

    /// Next physical line with its terminator.
    ///
    /// `max_len` bounds the content of a line, its terminator is not counted.
    /// When the content is longer a chunk of at most `max_len` bytes without
    /// terminator is returned instead. A chunk never ends with a CR so that a
    /// CRLF pair is not split across two reads.
    pub fn read_line(&mut self, max_len: usize) -> Result<Option<Vec<u8>>, Error> {
        let max_len = max_len.max(2);
        loop {
            if self.is_closed() {
                return Ok(None);
            }

            let avail = &self.buf[self.pos..];
            let window = avail.len().min(max_len + 2);
            let too_long = match memchr::memchr(b'\n', &avail[..window]) {
                Some(lf) => {
                    let content = match lf.checked_sub(1).map(|i| avail[i]) {
                        Some(b'\r') => lf - 1,
                        _ => lf,
                    };
                    if content <= max_len {
                        return Ok(Some(self.consume(lf + 1)));
                    }
                    true
                }
                None => avail.len() >= max_len + 2,
            };
            if too_long {
                let n = self.chunk_len(max_len);
                return Ok(Some(self.consume(n)));
            }

            if !self.fill()? {
                let rest = self.buf.len() - self.pos;
                let n = match rest > max_len {
                    true => self.chunk_len(max_len),
                    false => rest,
                };
                return Ok((n > 0).then(|| self.consume(n)));
            }
        }
    }

    fn chunk_len(&self, max_len: usize) -> usize {
        match self.buf[self.pos + max_len - 1] {
            b'\r' => max_len - 1,
            _ => max_len,
        }
    }

    fn consume(&mut self, n: usize) -> Vec<u8> {
        let out = self.buf[self.pos..self.pos + n].to_vec();
        self.pos += n;
        self.offset += n as u64;
        out
    }

    /// Pull more bytes from the source; false once the source is exhausted.
    fn fill(&mut self) -> Result<bool, Error> {
        if self.eof {
            return Ok(false);
        }
        if self.pos > 0 {
            self.buf.drain(..self.pos);
            self.pos = 0;
        }

        let old = self.buf.len();
        self.buf.resize(old + self.chunk, 0);
        loop {
            if self.is_closed() {
                self.buf.truncate(old);
                return Ok(false);
            }
            match self.reader.read(&mut self.buf[old..]) {
                Ok(0) => {
                    self.buf.truncate(old);
                    self.eof = true;
                    return Ok(false);
                }
                Ok(n) => {
                    self.buf.truncate(old + n);
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::NotConnected
                            | io::ErrorKind::ConnectionAborted
                            | io::ErrorKind::BrokenPipe
                    ) =>
                {
                    tracing::debug!(err=?e, "source went away, treating as end of stream");
                    self.buf.truncate(old);
                    self.eof = true;
                    return Ok(false);
                }
                Err(e) => {
                    self.buf.truncate(old);
                    return Err(e.into());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out its content a few bytes at a time.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl<'a> Read for Trickle<'a> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct Failing(io::ErrorKind);

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(self.0, "nope"))
        }
    }

    fn lines(mut s: RawMessageStream<impl Read>, max: usize) -> Vec<Vec<u8>> {
        let mut out = vec![];
        while let Some(l) = s.read_line(max).unwrap() {
            out.push(l);
        }
        out
    }

    #[test]
    fn test_read_line() {
        let s = RawMessageStream::with_chunk_size(
            Trickle {
                data: b"one\r\ntwo\nthree",
                step: 2,
            },
            3,
        );
        assert_eq!(
            lines(s, 1024),
            vec![b"one\r\n".to_vec(), b"two\n".to_vec(), b"three".to_vec()]
        );
    }

    #[test]
    fn test_long_line_chunks() {
        let s = RawMessageStream::new(&b"abcdefg\n"[..]);
        assert_eq!(
            lines(s, 3),
            vec![b"abc".to_vec(), b"def".to_vec(), b"g\n".to_vec()]
        );
    }

    #[test]
    fn test_chunk_never_ends_on_cr() {
        let s = RawMessageStream::new(&b"ab\rcdef\n"[..]);
        assert_eq!(
            lines(s, 3),
            vec![b"ab".to_vec(), b"\rcd".to_vec(), b"ef\n".to_vec()]
        );
    }

    #[test]
    fn test_terminator_not_counted() {
        let s = RawMessageStream::new(&b"abc\r\n--X\nabcd\r\nabcdefg"[..]);
        assert_eq!(
            lines(s, 3),
            vec![
                b"abc\r\n".to_vec(),
                b"--X\n".to_vec(),
                b"abc".to_vec(),
                b"d\r\n".to_vec(),
                b"abc".to_vec(),
                b"def".to_vec(),
                b"g".to_vec(),
            ]
        );
    }

    #[test]
    fn test_offset_and_read() {
        let mut s = RawMessageStream::new(&b"hello\nworld"[..]);
        assert_eq!(s.read(3).unwrap(), Some(b"hel".to_vec()));
        assert_eq!(s.offset(), 3);
        assert_eq!(s.read_line(100).unwrap(), Some(b"lo\n".to_vec()));
        assert_eq!(s.offset(), 6);
        assert_eq!(s.read(100).unwrap(), Some(b"world".to_vec()));
        assert_eq!(s.read(100).unwrap(), None);
    }

    #[test]
    fn test_close_is_eof() {
        let mut s = RawMessageStream::new(&b"a\nb\n"[..]);
        let handle = s.cancel_handle();
        assert_eq!(s.read_line(100).unwrap(), Some(b"a\n".to_vec()));
        handle.cancel();
        assert!(s.is_closed());
        assert_eq!(s.read_line(100).unwrap(), None);

        let mut s = RawMessageStream::new(&b"a\n"[..]);
        s.close();
        assert_eq!(s.read(10).unwrap(), None);
    }

    #[test]
    fn test_disconnect_is_eof() {
        let mut s = RawMessageStream::new(Failing(io::ErrorKind::BrokenPipe));
        assert_eq!(s.read_line(100).unwrap(), None);
    }

    #[test]
    fn test_io_error() {
        let mut s = RawMessageStream::new(Failing(io::ErrorKind::PermissionDenied));
        assert!(matches!(s.read_line(100), Err(Error::Io(_))));
    }
}
