//! Byte sources the decoder can pull from.

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read};

use bufprims_ring::{Alignment, PcBuffer};
use bytes::{Buf, BytesMut};
use tracing::debug;

const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Anything that can hand out one byte at a time.
///
/// `None` means nothing is available right now; the decoder stops and
/// picks up where it left off on the next dispatch.
pub trait ByteSource {
    fn pop(&mut self) -> Option<u8>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn pop(&mut self) -> Option<u8> {
        (**self).pop()
    }
}

impl ByteSource for VecDeque<u8> {
    fn pop(&mut self) -> Option<u8> {
        self.pop_front()
    }
}

impl<const DEPTH: usize, A: Alignment> ByteSource for PcBuffer<DEPTH, u8, A> {
    fn pop(&mut self) -> Option<u8> {
        PcBuffer::pop(self)
    }
}

/// Yields the bytes of a borrowed slice.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
}

impl<'a> SliceSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> &'a [u8] {
        self.bytes
    }
}

impl ByteSource for SliceSource<'_> {
    fn pop(&mut self) -> Option<u8> {
        let (first, rest) = self.bytes.split_first()?;
        self.bytes = rest;
        Some(*first)
    }
}

/// Buffers any [`Read`] stream into a byte source.
///
/// Reads happen in chunks when the internal buffer runs dry. End of
/// stream and I/O errors both end the source; the error is kept for the
/// caller to inspect with [`take_error`](Self::take_error).
pub struct ReaderSource<R> {
    inner: R,
    buf: BytesMut,
    eof: bool,
    error: Option<io::Error>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(READ_CHUNK_SIZE),
            eof: false,
            error: None,
        }
    }

    /// True once the stream has ended or failed.
    pub fn is_done(&self) -> bool {
        self.eof || self.error.is_some()
    }

    /// The error that ended the stream, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> bool {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return false;
                }
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    return true;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => return false,
                Err(err) => {
                    debug!(error = %err, "byte source read failed");
                    self.error = Some(err);
                    return false;
                }
            }
        }
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn pop(&mut self) -> Option<u8> {
        if !self.buf.has_remaining() && (self.is_done() || !self.fill()) {
            return None;
        }
        Some(self.buf.get_u8())
    }
}

impl<R> std::fmt::Debug for ReaderSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderSource")
            .field("buffered", &self.buf.len())
            .field("eof", &self.eof)
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn drain(source: &mut impl ByteSource) -> Vec<u8> {
        std::iter::from_fn(|| source.pop()).collect()
    }

    #[test]
    fn slice_source_yields_in_order() {
        let mut source = SliceSource::new(b"abc");
        assert_eq!(source.pop(), Some(b'a'));
        assert_eq!(source.remaining(), b"bc");
        assert_eq!(drain(&mut source), b"bc");
        assert_eq!(source.pop(), None);
    }

    #[test]
    fn deque_source_pops_front() {
        let mut source: VecDeque<u8> = vec![1, 2, 3].into();
        assert_eq!(drain(&mut source), vec![1, 2, 3]);
    }

    #[test]
    fn pc_buffer_source() {
        let mut buf = PcBuffer::<8>::new();
        buf.push_n(&[4, 5]).unwrap();
        assert_eq!(drain(&mut buf), vec![4, 5]);
        assert!(buf.empty());
    }

    #[test]
    fn reader_source_spans_chunks() {
        let data: Vec<u8> = (0..READ_CHUNK_SIZE * 2 + 10).map(|i| i as u8).collect();
        let mut source = ReaderSource::new(Cursor::new(data.clone()));
        assert_eq!(drain(&mut source), data);
        assert!(source.is_done());
        assert!(source.take_error().is_none());
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn reader_source_keeps_error() {
        let mut source = ReaderSource::new(Failing);
        assert_eq!(source.pop(), None);
        assert!(source.is_done());
        let err = source.take_error().unwrap();
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
    }

    #[test]
    fn by_reference() {
        let mut inner = SliceSource::new(&[9]);
        let mut source = &mut inner;
        assert_eq!(ByteSource::pop(&mut source), Some(9));
    }
}
