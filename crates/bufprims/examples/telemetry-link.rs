//! Telemetry over a lossy serial link, end to end in one process.
//!
//! A producer stages records in a message buffer, frames them, and pushes
//! the frames through a small transmit ring whose "data available"
//! callback plays the UART, moving bytes onto a simulated wire. A
//! consumer decodes the wire after some bytes are flipped to zero.
//!
//! Run with:
//!   cargo run --example telemetry-link

use std::cell::RefCell;
use std::collections::VecDeque;

use bufprims::cobs::{encode, MessageDecoder};
use bufprims::message::MessageBuffer;
use bufprims::ring::{critical, Endian, NoopLock, PcBuffer, RingBuffer};
use bytes::BytesMut;

const TX_DEPTH: usize = 32;

thread_local! {
    static WIRE: RefCell<VecDeque<u8>> = const { RefCell::new(VecDeque::new()) };
}

/// Drain the transmit ring onto the wire.
fn uart_flush(tx: &mut PcBuffer<TX_DEPTH>) {
    let mut chunk = [0u8; TX_DEPTH];
    let len = tx.pop_all(&mut chunk);
    WIRE.with(|wire| wire.borrow_mut().extend(&chunk[..len]));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let lock = NoopLock;
    let mut outbox = MessageBuffer::<1024, 16>::new();
    let mut sensor = RingBuffer::<64>::new();

    for sample in 0u32..8 {
        sensor.write_n(&[sample as u8; 3]);
        sensor.skip(2);

        critical(&lock, || {
            let mut ctx = outbox.context();
            ctx.write(sample, Endian::NETWORK);
            ctx.write(sample as f32 * 0.5, Endian::NETWORK);
            ctx.point(&sensor.state(), Endian::NETWORK);
        });
    }
    eprintln!("staged {} records", outbox.len());

    let mut tx = PcBuffer::<TX_DEPTH>::with_data_available(uart_flush);
    let mut staging = [0u8; 1024];
    let mut frame = BytesMut::new();
    while let Ok(len) = outbox.get_message(&mut staging) {
        frame.clear();
        encode(&staging[..len], &mut frame)?;
        tx.push_n_blocking(&frame)?;
    }
    uart_flush(&mut tx);

    let mut wire = WIRE.with(|wire| std::mem::take(&mut *wire.borrow_mut()));
    // line noise: two corrupted bytes
    for index in [17, 90] {
        if let Some(byte) = wire.get_mut(index) {
            *byte = 0;
        }
    }

    let mut decoder = MessageDecoder::<256>::new();
    decoder.dispatch(&mut wire, |msg| {
        let [a, b, c, d, ..] = *msg else {
            eprintln!("received {} byte fragment", msg.len());
            return;
        };
        let sample = u32::from_be_bytes([a, b, c, d]);
        eprintln!("received sample {sample} ({} bytes)", msg.len());
    });

    if let Some(stats) = decoder.stats() {
        eprintln!(
            "delivered={} dropped={} partial={}",
            stats.message_count, stats.bytes_dropped, stats.buffer_load
        );
    }
    Ok(())
}
