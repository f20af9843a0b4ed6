//! Write transactions.
//!
//! A [`MessageContext`] stages any number of writes as one message. When
//! it closes, the bytes written since it opened are compared against the
//! free space captured at open time: within budget they are committed as
//! a single message, otherwise the whole buffer is cleared. A message is
//! never committed truncated.

use bufprims_ring::{Endian, Scalar, WireStruct};
use tracing::{debug, warn};

use crate::buffer::MessageBuffer;

/// How a transaction ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
    /// The staged elements were recorded as one message of this length.
    Committed(usize),
    /// Nothing was staged; no message was recorded.
    Empty,
    /// The writes overran the budget and the buffer was cleared.
    RolledBack { written: usize, max: usize },
}

impl TransactionOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// An open write transaction on a [`MessageBuffer`].
///
/// Dropping the context closes it. Use [`finish`](Self::finish) to close it
/// explicitly and learn the outcome.
pub struct MessageContext<'a, const DEPTH: usize, const MAX_MESSAGES: usize, E: Copy + Default> {
    buf: &'a mut MessageBuffer<DEPTH, MAX_MESSAGES, E>,
    max: usize,
    start: usize,
    closed: bool,
}

impl<'a, const DEPTH: usize, const MAX_MESSAGES: usize, E: Copy + Default>
    MessageContext<'a, DEPTH, MAX_MESSAGES, E>
{
    pub(crate) fn new(buf: &'a mut MessageBuffer<DEPTH, MAX_MESSAGES, E>) -> Self {
        // with every slot taken there is nowhere to record the length
        let max = if buf.full(0) { 0 } else { buf.space() };
        let start = buf.data.cursors().write_cursor;
        Self {
            buf,
            max,
            start,
            closed: false,
        }
    }

    /// Budget captured when the transaction opened.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Elements written so far.
    pub fn written(&self) -> usize {
        self.buf.data.cursors().write_cursor.wrapping_sub(self.start)
    }

    /// Elements that can still be written without overrunning.
    pub fn remaining(&self) -> usize {
        self.max.saturating_sub(self.written())
    }

    /// True once the writes exceed the budget; closing will roll back.
    pub fn overrun(&self) -> bool {
        self.written() > self.max
    }

    pub fn write_single(&mut self, elem: E) -> usize {
        self.buf.data.write_single(elem)
    }

    pub fn write_n(&mut self, elems: &[E]) -> usize {
        if elems.is_empty() {
            return 0;
        }
        self.buf.data.write_n(elems)
    }

    /// Count `count` elements towards the message without writing them.
    pub fn reserve(&mut self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        self.buf.data.reserve(count)
    }

    /// Close the transaction and report what happened.
    pub fn finish(mut self) -> TransactionOutcome {
        self.close()
    }

    fn close(&mut self) -> TransactionOutcome {
        self.closed = true;
        let written = self.written();

        if written > self.max {
            warn!(
                written,
                max = self.max,
                "message transaction overran, clearing buffer"
            );
            self.buf.clear();
            return TransactionOutcome::RolledBack {
                written,
                max: self.max,
            };
        }
        if written == 0 {
            return TransactionOutcome::Empty;
        }

        self.buf.add_message(written);
        debug!(len = written, "message committed");
        TransactionOutcome::Committed(written)
    }
}

/// Typed writes for byte buffers.
impl<const DEPTH: usize, const MAX_MESSAGES: usize> MessageContext<'_, DEPTH, MAX_MESSAGES, u8> {
    /// Write `value` in byte order `order`.
    pub fn write<T: Scalar>(&mut self, value: T, order: Endian) -> usize {
        self.buf.data.write(value, order)
    }

    /// Write a wire struct in byte order `order`.
    pub fn write_struct<S: WireStruct>(&mut self, value: &S, order: Endian) -> usize {
        self.buf.data.write_struct(value, order)
    }

    /// Write `discriminator` followed by the raw `bytes`.
    pub fn custom<T: Scalar>(&mut self, discriminator: T, bytes: &[u8], order: Endian) -> usize {
        self.write(discriminator, order) + self.write_n(bytes)
    }

    /// Write `S::ID` followed by `value`, both in byte order `order`.
    pub fn point<S: WireStruct>(&mut self, value: &S, order: Endian) -> usize {
        self.write(S::ID, order) + self.write_struct(value, order)
    }
}

impl<const DEPTH: usize, const MAX_MESSAGES: usize, E: Copy + Default> Drop
    for MessageContext<'_, DEPTH, MAX_MESSAGES, E>
{
    fn drop(&mut self) {
        if !self.closed {
            self.close();
        }
    }
}

impl<const DEPTH: usize, const MAX_MESSAGES: usize, E: Copy + Default> std::fmt::Debug
    for MessageContext<'_, DEPTH, MAX_MESSAGES, E>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageContext")
            .field("max", &self.max)
            .field("written", &self.written())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use bufprims_ring::BufferState;

    use super::*;
    use crate::error::MessageError;

    type Buf = MessageBuffer<256, 4>;

    #[test]
    fn dropped_context_commits_one_message() {
        let mut buf = Buf::new();
        {
            let mut ctx = buf.context();
            for byte in b"hello" {
                ctx.write(*byte, Endian::NATIVE);
            }
            assert_eq!(ctx.written(), 5);
            assert_eq!(ctx.max(), 256);
        }

        let mut out = [0u8; 16];
        assert_eq!(buf.get_message(&mut out), Ok(5));
        assert_eq!(&out[..5], b"hello");
        assert!(buf.empty());
    }

    #[test]
    fn finish_reports_commit() {
        let mut buf = Buf::new();
        let mut ctx = buf.context();
        ctx.write(0x1234u16, Endian::Big);
        ctx.write(1.5f32, Endian::Little);
        assert_eq!(ctx.finish(), TransactionOutcome::Committed(6));

        let mut out = [0u8; 6];
        assert_eq!(buf.get_message(&mut out), Ok(6));
        assert_eq!(&out[..2], &[0x12, 0x34]);
        assert_eq!(&out[2..], &1.5f32.to_le_bytes());
    }

    #[test]
    fn overrun_clears_the_buffer() {
        let mut buf = MessageBuffer::<16, 4>::new();
        buf.put_message(&[1; 10]).unwrap();

        let mut ctx = buf.context();
        assert_eq!(ctx.max(), 6);
        ctx.write_n(&[2; 5]);
        assert!(!ctx.overrun());
        assert_eq!(ctx.remaining(), 1);
        ctx.write(0u16, Endian::NATIVE);
        assert!(ctx.overrun());
        assert_eq!(
            ctx.finish(),
            TransactionOutcome::RolledBack { written: 7, max: 6 }
        );

        assert!(buf.empty());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.data_size(), 0);
        assert_eq!(buf.space(), 16);
    }

    #[test]
    fn exact_budget_commits() {
        let mut buf = MessageBuffer::<8, 2>::new();
        let outcome = {
            let mut ctx = buf.context();
            ctx.write(u64::MAX, Endian::Big);
            ctx.finish()
        };
        assert_eq!(outcome, TransactionOutcome::Committed(8));
        assert!(buf.full(1));
    }

    #[test]
    fn empty_transaction_records_nothing() {
        let mut buf = Buf::new();
        assert_eq!(buf.context().finish(), TransactionOutcome::Empty);
        assert!(buf.empty());
    }

    #[test]
    fn no_free_slot_means_zero_budget() {
        let mut buf = MessageBuffer::<64, 1>::new();
        buf.put_message(b"x").unwrap();

        let mut ctx = buf.context();
        assert_eq!(ctx.max(), 0);
        ctx.write(1u8, Endian::NATIVE);
        assert!(!ctx.finish().is_committed());
        assert!(buf.empty());
    }

    #[test]
    fn custom_prefixes_discriminator() {
        let mut buf = Buf::new();
        let mut ctx = buf.context();
        assert_eq!(ctx.custom(7u16, b"abc", Endian::Big), 5);
        drop(ctx);

        let mut out = [0u8; 8];
        assert_eq!(buf.get_message(&mut out), Ok(5));
        assert_eq!(&out[..5], &[0, 7, b'a', b'b', b'c']);
    }

    #[test]
    fn point_prefixes_struct_id() {
        let mut buf = Buf::new();
        let state = BufferState::new(1, 2, 3, 4);
        let mut ctx = buf.context();
        assert_eq!(ctx.point(&state, Endian::Big), 2 + BufferState::SIZE);
        drop(ctx);

        let mut out = [0u8; 32];
        let len = buf.get_message(&mut out).unwrap();
        assert_eq!(len, 18);
        assert_eq!(u16::from_be_bytes([out[0], out[1]]), BufferState::ID);
        let decoded = BufferState::decode(&out[2..len], Endian::Big);
        assert_eq!(decoded, state);
    }

    #[test]
    fn reserve_counts_towards_the_message() {
        let mut buf = Buf::new();
        let mut ctx = buf.context();
        ctx.write_single(9);
        ctx.reserve(3);
        assert_eq!(ctx.finish(), TransactionOutcome::Committed(4));
        assert_eq!(buf.next_len(), Some(4));
    }

    #[test]
    fn buffer_usable_after_rollback() {
        let mut buf = MessageBuffer::<4, 2>::new();
        {
            let mut ctx = buf.context();
            ctx.write_n(&[0; 5]);
        }
        assert!(buf.empty());

        buf.put_message(&[1, 2, 3, 4]).unwrap();
        let mut out = [0u8; 4];
        assert_eq!(buf.get_message(&mut out), Ok(4));
        assert_eq!(out, [1, 2, 3, 4]);
        assert_eq!(buf.get_message(&mut out), Err(MessageError::Empty));
    }
}
