//! Adaptive range coder core
//!
//! Lossless order-0 compression of byte buffers with a 32-bit range coder
//! driven by an adaptive frequency model. Whole buffers are coded in a single
//! call. The compressed stream does not carry the original length, so callers
//! keep it alongside the stream and hand it to the decoder.
//!
//! ```
//! use arcoder_core::{decode_bytes, encode_bytes};
//!
//! let source = vec![7u8; 10_000];
//! let compressed = encode_bytes(&source).unwrap();
//! assert!(compressed.len() < 100);
//! assert_eq!(decode_bytes(&compressed, source.len() as u32).unwrap(), source);
//! ```

// =============================================================================
// Core modules - always available
// =============================================================================

pub mod byte_buffer;
pub mod codec;
pub mod coder_options;
pub mod probability_model;
pub mod range_coder;
pub mod status;

// =============================================================================
// Direction-specific modules
// =============================================================================

#[cfg(feature = "decoder")]
pub mod adaptive_range_decoder;
#[cfg(feature = "encoder")]
pub mod adaptive_range_encoder;

// =============================================================================
// Re-exports
// =============================================================================

pub use byte_buffer::ByteBuffer;
pub use coder_options::{
    CoderOptions, ALPHABET_SIZE, DEFAULT_INCREMENT, FLUSH_BYTES, MAX_TOTAL_FREQUENCY, TOP_VALUE,
};
pub use probability_model::ProbabilityModel;
pub use range_coder::{RangeDecoderCore, RangeEncoderCore};
pub use status::{CoderError, CodingSummary, Status, StatusCode, StatusResult};

#[cfg(feature = "decoder")]
pub use adaptive_range_decoder::AdaptiveRangeDecoder;
#[cfg(feature = "decoder")]
pub use codec::{decode_bytes, decode_bytes_with_options};

#[cfg(feature = "encoder")]
pub use adaptive_range_encoder::AdaptiveRangeEncoder;
#[cfg(feature = "encoder")]
pub use codec::{encode_bytes, encode_bytes_with_options};
