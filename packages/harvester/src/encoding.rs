//! Encoding decoding: transcode the extracted document from the publisher's
//! legacy single-byte code page into UTF-8.
//!
//! The document is read in fixed-size chunks so the raw bytes are never held
//! in memory as a single buffer; only the decoded string accumulates.
//! Malformed byte sequences abort the run, there is no best-effort
//! substitution.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use encoding_rs::{DecoderResult, Encoding};

use crate::config::SOURCE_ENCODING;
use crate::error::{HarvesterError, Result};

/// Bytes read from disk per decoder feed.
const CHUNK_SIZE: usize = 8 * 1024;

/// Decode the extracted document using the configured source encoding.
///
/// # Arguments
/// * `path` - Path of the extracted document
///
/// # Returns
/// The whole document as a UTF-8 string
pub fn decode_file(path: &Path) -> Result<String> {
    let encoding = Encoding::for_label(SOURCE_ENCODING.as_bytes()).ok_or_else(|| {
        HarvesterError::Encoding {
            encoding: SOURCE_ENCODING.to_string(),
            context: "unknown encoding label".to_string(),
        }
    })?;

    let file = File::open(path)?;
    decode_reader(BufReader::new(file), encoding, &path.display().to_string())
}

/// Stream a byte source through a decoder into a single string.
///
/// # Arguments
/// * `reader` - Byte source for the raw document
/// * `encoding` - Source encoding to decode from
/// * `context` - Human-readable description of the source, used in errors
pub fn decode_reader<R: Read>(
    mut reader: R,
    encoding: &'static Encoding,
    context: &str,
) -> Result<String> {
    let mut decoder = encoding.new_decoder();
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut decoded = String::with_capacity(CHUNK_SIZE);

    loop {
        let read = reader.read(&mut chunk)?;
        let last = read == 0;
        let mut input = &chunk[..read];

        loop {
            let worst_case = decoder
                .max_utf8_buffer_length_without_replacement(input.len())
                .unwrap_or(CHUNK_SIZE);
            decoded.reserve(worst_case.max(16));

            let (result, consumed) =
                decoder.decode_to_string_without_replacement(input, &mut decoded, last);
            input = &input[consumed..];

            match result {
                DecoderResult::InputEmpty => break,
                DecoderResult::OutputFull => continue,
                DecoderResult::Malformed(..) => {
                    return Err(HarvesterError::Encoding {
                        encoding: encoding.name().to_string(),
                        context: context.to_string(),
                    });
                }
            }
        }

        if last {
            break;
        }
    }

    Ok(decoded)
}
