use bytes::{BufMut, BytesMut};

use crate::decoder::{DELIMITER, OVERHEAD_CHAIN};
use crate::error::{CobsError, Result};

/// Longest run of non-zero bytes one pointer can cover.
pub const MAX_RUN: usize = 254;

/// Upper bound on the encoded size of a `len` byte payload, delimiter included.
pub const fn max_encoded_len(len: usize) -> usize {
    len + len / MAX_RUN + 2
}

/// Encode `payload` as one delimited frame, appending it to `dst`.
///
/// The leading run of non-zero bytes is split across `0xFF` overhead
/// pointers as needed. After the first data zero every zero becomes a
/// pointer, so runs there are limited to [`MAX_RUN`] bytes; a longer run
/// returns [`CobsError::UnencodableRun`] and leaves `dst` untouched.
/// An empty payload encodes to a lone delimiter, which decoders skip.
///
/// Wire format:
/// ```text
/// ┌────────────────────────┬──────────────┬──────────────────────────┬──────┐
/// │ 0xFF + 254 bytes (×n)  │ len+1, lead  │ len+1, run (per data 0)  │ 0x00 │
/// │ leading run, chained   │ rest of lead │                          │      │
/// └────────────────────────┴──────────────┴──────────────────────────┴──────┘
/// ```
pub fn encode(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let start = dst.len();
    dst.reserve(max_encoded_len(payload.len()));

    if !payload.is_empty() {
        if let Err(err) = encode_body(payload, dst) {
            dst.truncate(start);
            return Err(err);
        }
    }

    dst.put_u8(DELIMITER);
    Ok(())
}

fn encode_body(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let split = payload
        .iter()
        .position(|b| *b == 0)
        .unwrap_or(payload.len());
    let (lead, rest) = payload.split_at(split);

    let mut chunks = lead.chunks_exact(MAX_RUN);
    for chunk in &mut chunks {
        dst.put_u8(OVERHEAD_CHAIN);
        dst.put_slice(chunk);
    }

    // a lead that ends exactly on a chained pointer needs no closing pointer
    let tail = chunks.remainder();
    if !tail.is_empty() || !rest.is_empty() {
        put_run(dst, tail);
    }

    if rest.is_empty() {
        return Ok(());
    }

    let mut offset = split + 1;
    for run in rest[1..].split(|b| *b == 0) {
        if run.len() > MAX_RUN {
            return Err(CobsError::UnencodableRun {
                offset,
                len: run.len(),
            });
        }
        put_run(dst, run);
        offset += run.len() + 1;
    }
    Ok(())
}

fn put_run(dst: &mut BytesMut, run: &[u8]) {
    dst.put_u8(run.len() as u8 + 1);
    dst.put_slice(run);
}
