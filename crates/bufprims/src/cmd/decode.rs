use bufprims_cobs::{DecoderConfig, MessageDecoder, ReaderSource, SliceSource};
use tracing::{debug, warn};

use crate::cmd::{resolve_input, DecodeArgs};
use crate::exit::{io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_messages, print_stats, OutputFormat};

/// Largest frame the CLI can reassemble.
pub const DECODE_MTU: usize = 16 * 1024;

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = DecoderConfig {
        max_message_size: args.max_message_size.unwrap_or(DECODE_MTU),
    };
    let mut decoder = MessageDecoder::<DECODE_MTU>::with_config(config);
    let mut messages = Vec::new();

    if args.hex.is_some() || args.file.is_some() {
        let input = resolve_input(args.hex.as_deref(), args.file.as_ref())?;
        decoder.dispatch(&mut SliceSource::new(&input), |msg| messages.push(msg.to_vec()));
    } else {
        let mut source = ReaderSource::new(std::io::stdin().lock());
        decoder.dispatch(&mut source, |msg| messages.push(msg.to_vec()));
        if let Some(err) = source.take_error() {
            return Err(io_error("failed reading stdin", err));
        }
    }

    let stats = decoder.snapshot();
    debug!(
        messages = stats.message_count,
        dropped = stats.bytes_dropped,
        "stream decoded"
    );
    if stats.bytes_dropped > 0 {
        warn!(dropped = stats.bytes_dropped, "bytes dropped while decoding");
    }
    if stats.buffer_load > 0 {
        warn!(partial = stats.buffer_load, "stream ended inside a frame");
    }

    print_messages(&messages, format);
    print_stats(&stats, format);

    if args.strict && (stats.bytes_dropped > 0 || stats.buffer_load > 0) {
        return Err(CliError::new(
            DATA_INVALID,
            format!(
                "lossy stream: {} bytes dropped, {} bytes unfinished",
                stats.bytes_dropped, stats.buffer_load
            ),
        ));
    }
    Ok(SUCCESS)
}
