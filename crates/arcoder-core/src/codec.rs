//! One-call helpers that run a fresh encoder or decoder over a whole buffer.

use crate::byte_buffer::ByteBuffer;
use crate::coder_options::CoderOptions;
#[cfg(feature = "decoder")]
use crate::adaptive_range_decoder::AdaptiveRangeDecoder;
#[cfg(feature = "encoder")]
use crate::adaptive_range_encoder::AdaptiveRangeEncoder;
use crate::status::{CoderError, StatusResult};

/// Compresses `source` with default options.
#[cfg(feature = "encoder")]
pub fn encode_bytes(source: &[u8]) -> StatusResult<Vec<u8>> {
    encode_bytes_with_options(source, CoderOptions::default())
}

#[cfg(feature = "encoder")]
pub fn encode_bytes_with_options(source: &[u8], options: CoderOptions) -> StatusResult<Vec<u8>> {
    let expected_size = u32::try_from(source.len())
        .map_err(|_| CoderError::invalid_argument("source exceeds the 32-bit length limit"))?;
    let mut encoder = AdaptiveRangeEncoder::with_options(options)?;
    encoder.initialize(ByteBuffer::new(), expected_size)?;
    encoder.encode(source)?;
    take(encoder.take_output())
}

/// Decompresses `encoded` back into `original_len` bytes with default options.
#[cfg(feature = "decoder")]
pub fn decode_bytes(encoded: &[u8], original_len: u32) -> StatusResult<Vec<u8>> {
    decode_bytes_with_options(encoded, original_len, CoderOptions::default())
}

#[cfg(feature = "decoder")]
pub fn decode_bytes_with_options(
    encoded: &[u8],
    original_len: u32,
    options: CoderOptions,
) -> StatusResult<Vec<u8>> {
    let mut decoder = AdaptiveRangeDecoder::with_options(options)?;
    decoder.initialize(ByteBuffer::new(), original_len)?;
    decoder.decode(encoded)?;
    take(decoder.take_output())
}

#[cfg(any(feature = "encoder", feature = "decoder"))]
fn take(output: Option<ByteBuffer>) -> StatusResult<Vec<u8>> {
    output
        .map(ByteBuffer::into_vec)
        .ok_or_else(|| CoderError::invalid_state("output buffer missing after coding"))
}
