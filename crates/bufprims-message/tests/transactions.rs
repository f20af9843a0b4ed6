use bufprims_message::{MessageBuffer, MessageError, TransactionOutcome};
use bufprims_ring::{BufferState, Endian, RingBuffer, WireStruct};

const DEPTH: usize = 256;

#[test]
fn put_get_and_transactions_share_one_fifo() {
    let mut msg_buf = MessageBuffer::<DEPTH, 4>::new();
    let mut out = [0u8; DEPTH];

    assert_eq!(msg_buf.get_message(&mut out), Err(MessageError::Empty));

    let full = [0u8; DEPTH];
    msg_buf.put_message(&full).unwrap();
    assert!(msg_buf.put_message(&full).is_err());
    assert_eq!(msg_buf.get_message(&mut out), Ok(DEPTH));
    assert_eq!(msg_buf.get_message(&mut out), Err(MessageError::Empty));

    {
        let mut ctx = msg_buf.context();
        for byte in b"hello\0" {
            ctx.write(*byte, Endian::NATIVE);
        }
    }
    let len = msg_buf.get_message(&mut out).unwrap();
    assert_eq!(&out[..len], b"hello\0");
    assert_eq!(msg_buf.get_message(&mut out), Err(MessageError::Empty));

    // two full-depth writes cannot fit; nothing is committed
    {
        let mut ctx = msg_buf.context();
        ctx.write_n(&full);
        ctx.write_n(&full);
    }
    assert_eq!(msg_buf.get_message(&mut out), Err(MessageError::Empty));

    let state = BufferState::new(256, 65536, 3, 4);
    {
        let mut ctx = msg_buf.context();
        ctx.point(&state, Endian::NATIVE);
    }
    let len = msg_buf.get_message(&mut out).unwrap();

    // replay the message through a plain ring and parse it back
    let mut ring = RingBuffer::<DEPTH>::new();
    ring.write_n(&out[..len]);
    assert_eq!(ring.read::<u16>(Endian::NATIVE), BufferState::ID);
    let parsed: BufferState = ring.read_struct(Endian::NATIVE);
    assert_eq!(parsed.write_cursor(), 256);
    assert_eq!(parsed.read_cursor(), 65536);
    assert_eq!(parsed.read_count(), 3);
    assert_eq!(parsed.write_count(), 4);
}

#[test]
fn rollback_discards_earlier_messages_too() {
    let mut buf = MessageBuffer::<32, 8>::new();
    buf.put_message(b"kept?").unwrap();
    buf.put_message(b"no").unwrap();

    let outcome = {
        let mut ctx = buf.context();
        ctx.write_n(&[0xaa; 26]);
        ctx.finish()
    };
    assert_eq!(
        outcome,
        TransactionOutcome::RolledBack {
            written: 26,
            max: 25
        }
    );
    assert!(buf.empty());
    assert_eq!(buf.len(), 0);
}

#[test]
fn many_messages_cycle_through_the_ring() {
    let mut buf = MessageBuffer::<16, 3>::new();
    let mut out = [0u8; 16];

    for round in 0u8..50 {
        let len = usize::from(round % 7) + 1;
        let payload: Vec<u8> = (0..len as u8).map(|i| i.wrapping_add(round)).collect();

        let mut ctx = buf.context();
        ctx.write_n(&payload);
        assert!(ctx.finish().is_committed());

        let got = buf.get_message(&mut out).unwrap();
        assert_eq!(&out[..got], payload.as_slice());
    }

    assert!(buf.empty());
    assert_eq!(buf.data_size(), 0);
}
