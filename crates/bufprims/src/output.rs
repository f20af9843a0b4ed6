use std::io::{IsTerminal, Write};

use bufprims_cobs::DecoderStats;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput {
    payload_size: usize,
    encoded_size: usize,
    encoded: String,
}

#[derive(Serialize)]
struct MessageOutput {
    index: usize,
    size: usize,
    payload: String,
    hex: String,
}

#[derive(Serialize)]
struct StatsOutput {
    messages: u32,
    bytes_dropped: u32,
    buffer_load: usize,
}

pub fn print_encoded(payload_size: usize, encoded: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                payload_size,
                encoded_size: encoded.len(),
                encoded: to_hex(encoded),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PAYLOAD", "ENCODED", "BYTES"])
                .add_row(vec![
                    payload_size.to_string(),
                    encoded.len().to_string(),
                    to_hex(encoded),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "payload={} encoded={} bytes={}",
                payload_size,
                encoded.len(),
                to_hex(encoded)
            );
        }
        OutputFormat::Raw => print_raw(encoded),
    }
}

pub fn print_messages(messages: &[Vec<u8>], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for (index, payload) in messages.iter().enumerate() {
                let out = MessageOutput {
                    index,
                    size: payload.len(),
                    payload: payload_preview(payload),
                    hex: to_hex(payload),
                };
                print_json(&out);
            }
        }
        OutputFormat::Table => {
            if messages.is_empty() {
                return;
            }
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "SIZE", "PAYLOAD"]);
            for (index, payload) in messages.iter().enumerate() {
                table.add_row(vec![
                    index.to_string(),
                    payload.len().to_string(),
                    payload_preview(payload),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (index, payload) in messages.iter().enumerate() {
                println!(
                    "message={} size={} payload={}",
                    index,
                    payload.len(),
                    payload_preview(payload)
                );
            }
        }
        OutputFormat::Raw => {
            for payload in messages {
                print_raw(payload);
            }
        }
    }
}

pub fn print_stats(stats: &DecoderStats, format: OutputFormat) {
    let out = StatsOutput {
        messages: stats.message_count,
        bytes_dropped: stats.bytes_dropped,
        buffer_load: stats.buffer_load,
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["MESSAGES", "DROPPED", "PARTIAL"])
                .add_row(vec![
                    out.messages.to_string(),
                    out.bytes_dropped.to_string(),
                    out.buffer_load.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "messages={} dropped={} partial={}",
                out.messages, out.bytes_dropped, out.buffer_load
            );
        }
        // raw output carries payload bytes only
        OutputFormat::Raw => {}
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json(value: &impl Serialize) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) if !text.contains('\0') => text.to_string(),
        _ => format!("<binary {} bytes>", payload.len()),
    }
}

pub fn to_hex(data: &[u8]) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_lowercase_pairs() {
        assert_eq!(to_hex(&[0x00, 0x0a, 0xff]), "000aff");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn preview_flags_binary() {
        assert_eq!(payload_preview(b"hello"), "hello");
        assert_eq!(payload_preview(b"a\0b"), "<binary 3 bytes>");
        assert_eq!(payload_preview(&[0xff, 0xfe]), "<binary 2 bytes>");
    }
}
