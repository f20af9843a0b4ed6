//! Message-boundary bookkeeping over a ring buffer.
//!
//! A [`MessageBuffer`] stores message payloads back to back in one data
//! ring and their lengths in a second, smaller ring. Messages come out in
//! the order they went in, each whole.

use bufprims_ring::RingBuffer;
use tracing::debug;

use crate::context::MessageContext;
use crate::error::{MessageError, Result};

/// A FIFO of up to `MAX_MESSAGES` messages sharing `DEPTH` elements of storage.
pub struct MessageBuffer<const DEPTH: usize, const MAX_MESSAGES: usize, E = u8> {
    pub(crate) data: RingBuffer<DEPTH, E>,
    sizes: RingBuffer<MAX_MESSAGES, usize>,
    num_messages: usize,
    data_size: usize,
}

impl<const DEPTH: usize, const MAX_MESSAGES: usize, E: Copy + Default> Default
    for MessageBuffer<DEPTH, MAX_MESSAGES, E>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEPTH: usize, const MAX_MESSAGES: usize, E: Copy + Default>
    MessageBuffer<DEPTH, MAX_MESSAGES, E>
{
    pub fn new() -> Self {
        const { assert!(MAX_MESSAGES > 0, "message limit must be non-zero") };
        Self {
            data: RingBuffer::new(),
            sizes: RingBuffer::new(),
            num_messages: 0,
            data_size: 0,
        }
    }

    /// Store `data` as one message.
    ///
    /// Fails without touching any state when `data` is empty, every message
    /// slot is taken, or the payload does not fit next to what is staged.
    pub fn put_message(&mut self, data: &[E]) -> Result<()> {
        let len = data.len();
        if len == 0 {
            return Err(MessageError::ZeroLength);
        }
        if self.num_messages >= MAX_MESSAGES {
            return Err(MessageError::TooManyMessages { max: MAX_MESSAGES });
        }
        if self.full(len) {
            return Err(MessageError::InsufficientSpace {
                len,
                available: self.space(),
            });
        }

        self.data.write_n(data);
        self.add_message(len);
        Ok(())
    }

    /// Move the oldest message into `out` and return its length.
    ///
    /// If `out` is too short the message stays pending.
    pub fn get_message(&mut self, out: &mut [E]) -> Result<usize> {
        let len = self.next_len().ok_or(MessageError::Empty)?;
        if len > out.len() {
            return Err(MessageError::OutputTooSmall {
                len,
                capacity: out.len(),
            });
        }

        self.remove_message();
        self.data.read_n(&mut out[..len]);
        Ok(len)
    }

    /// Length of the oldest pending message.
    pub fn next_len(&self) -> Option<usize> {
        if self.empty() {
            return None;
        }
        Some(self.sizes.peek())
    }

    /// Open a write transaction.
    ///
    /// The context borrows the buffer exclusively; nothing else can touch
    /// it until the context is finished or dropped, at which point the
    /// staged bytes are committed as one message or rolled back.
    pub fn context(&mut self) -> MessageContext<'_, DEPTH, MAX_MESSAGES, E> {
        MessageContext::new(self)
    }

    pub fn empty(&self) -> bool {
        self.num_messages == 0
    }

    /// True if no message slot is left, or `check` more elements would not fit.
    pub fn full(&self, check: usize) -> bool {
        self.num_messages >= MAX_MESSAGES || self.data_size + check > DEPTH
    }

    /// Elements not taken by pending messages.
    pub fn space(&self) -> usize {
        DEPTH.saturating_sub(self.data_size)
    }

    /// Drop every pending message and reset both rings.
    pub fn clear(&mut self) {
        if self.num_messages > 0 {
            debug!(
                messages = self.num_messages,
                elements = self.data_size,
                "clearing message buffer"
            );
        }
        self.data.reset();
        self.sizes.reset();
        self.num_messages = 0;
        self.data_size = 0;
    }

    /// Pending message count.
    pub fn len(&self) -> usize {
        self.num_messages
    }

    pub fn is_empty(&self) -> bool {
        self.empty()
    }

    /// Elements staged across all pending messages.
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    pub const fn capacity(&self) -> usize {
        DEPTH
    }

    pub const fn max_messages(&self) -> usize {
        MAX_MESSAGES
    }

    /// The underlying data ring.
    pub fn ring(&self) -> &RingBuffer<DEPTH, E> {
        &self.data
    }

    pub(crate) fn add_message(&mut self, len: usize) {
        self.sizes.write_single(len);
        self.num_messages += 1;
        self.data_size += len;
    }

    fn remove_message(&mut self) -> usize {
        let len = self.sizes.read_single();
        self.num_messages -= 1;
        self.data_size -= len;
        len
    }
}

impl<const DEPTH: usize, const MAX_MESSAGES: usize, E> std::fmt::Debug
    for MessageBuffer<DEPTH, MAX_MESSAGES, E>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBuffer")
            .field("depth", &DEPTH)
            .field("max_messages", &MAX_MESSAGES)
            .field("num_messages", &self.num_messages)
            .field("data_size", &self.data_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPTH: usize = 256;

    type Buf = MessageBuffer<DEPTH, 4>;

    #[test]
    fn empty_buffer_has_nothing_to_get() {
        let mut buf = Buf::new();
        let mut out = [0u8; DEPTH];
        assert!(buf.empty());
        assert_eq!(buf.get_message(&mut out), Err(MessageError::Empty));
        assert_eq!(buf.next_len(), None);
    }

    #[test]
    fn full_depth_message_fits_exactly_once() {
        let mut buf = Buf::new();
        let data = [0x5au8; DEPTH];
        buf.put_message(&data).unwrap();
        assert_eq!(
            buf.put_message(&data),
            Err(MessageError::InsufficientSpace {
                len: DEPTH,
                available: 0
            })
        );

        let mut out = [0u8; DEPTH];
        assert_eq!(buf.get_message(&mut out), Ok(DEPTH));
        assert_eq!(out, data);
        assert_eq!(buf.get_message(&mut out), Err(MessageError::Empty));
    }

    #[test]
    fn messages_come_out_in_order() {
        let mut buf = Buf::new();
        buf.put_message(b"one").unwrap();
        buf.put_message(b"three").unwrap();
        buf.put_message(b"two").unwrap();
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.data_size(), 11);

        let mut out = [0u8; 16];
        for expected in [&b"one"[..], b"three", b"two"] {
            let len = buf.get_message(&mut out).unwrap();
            assert_eq!(&out[..len], expected);
        }
        assert!(buf.empty());
        assert_eq!(buf.data_size(), 0);
    }

    #[test]
    fn refusals_leave_state_unchanged() {
        let mut buf = MessageBuffer::<8, 2>::new();
        assert_eq!(buf.put_message(&[]), Err(MessageError::ZeroLength));
        assert_eq!(
            buf.put_message(&[1; 9]),
            Err(MessageError::InsufficientSpace {
                len: 9,
                available: 8
            })
        );

        buf.put_message(&[1, 2]).unwrap();
        buf.put_message(&[3]).unwrap();
        assert_eq!(
            buf.put_message(&[4]),
            Err(MessageError::TooManyMessages { max: 2 })
        );

        assert_eq!(buf.len(), 2);
        assert_eq!(buf.data_size(), 3);
        assert_eq!(buf.ring().cursors().write_cursor, 3);
    }

    #[test]
    fn short_output_keeps_message_pending() {
        let mut buf = Buf::new();
        buf.put_message(b"hello").unwrap();

        let mut small = [0u8; 4];
        assert_eq!(
            buf.get_message(&mut small),
            Err(MessageError::OutputTooSmall {
                len: 5,
                capacity: 4
            })
        );
        assert_eq!(buf.next_len(), Some(5));

        let mut out = [0u8; 5];
        assert_eq!(buf.get_message(&mut out), Ok(5));
        assert_eq!(&out, b"hello");
    }

    #[test]
    fn full_reports_slots_and_bytes() {
        let mut buf = MessageBuffer::<8, 2>::new();
        assert!(!buf.full(0));
        assert!(!buf.full(8));
        assert!(buf.full(9));

        buf.put_message(&[0; 6]).unwrap();
        assert_eq!(buf.space(), 2);
        assert!(buf.full(3));

        buf.put_message(&[0; 1]).unwrap();
        assert!(buf.full(0));
    }

    #[test]
    fn data_wraps_across_the_ring_end() {
        let mut buf = MessageBuffer::<8, 4>::new();
        let mut out = [0u8; 8];

        buf.put_message(&[1, 2, 3, 4, 5, 6]).unwrap();
        buf.get_message(&mut out).unwrap();

        buf.put_message(&[7, 8, 9, 10, 11]).unwrap();
        assert_eq!(buf.get_message(&mut out), Ok(5));
        assert_eq!(&out[..5], &[7, 8, 9, 10, 11]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut buf = Buf::new();
        buf.put_message(b"a").unwrap();
        buf.put_message(b"bc").unwrap();
        buf.clear();

        assert!(buf.empty());
        assert_eq!(buf.data_size(), 0);
        assert_eq!(buf.space(), DEPTH);
        assert_eq!(buf.ring().cursors(), Default::default());
    }

    #[test]
    fn wide_elements() {
        let mut buf = MessageBuffer::<16, 4, u32>::new();
        buf.put_message(&[0xdead_beef, 7]).unwrap();

        let mut out = [0u32; 4];
        assert_eq!(buf.get_message(&mut out), Ok(2));
        assert_eq!(&out[..2], &[0xdead_beef, 7]);
    }
}
