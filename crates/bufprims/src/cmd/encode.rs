use bufprims_cobs::{encode, max_encoded_len};
use bytes::BytesMut;
use tracing::debug;

use crate::cmd::{resolve_input, EncodeArgs};
use crate::exit::{cobs_error, CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = match &args.data {
        Some(data) => data.as_bytes().to_vec(),
        None => resolve_input(args.hex.as_deref(), args.file.as_ref())?,
    };

    let mut wire = BytesMut::with_capacity(max_encoded_len(payload.len()));
    encode(&payload, &mut wire).map_err(|err| cobs_error("encode failed", err))?;
    debug!(
        payload = payload.len(),
        encoded = wire.len(),
        "payload encoded"
    );

    print_encoded(payload.len(), &wire, format);
    Ok(SUCCESS)
}
