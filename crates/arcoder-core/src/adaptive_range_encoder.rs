use tracing::debug;

use crate::byte_buffer::ByteBuffer;
use crate::coder_options::{CoderOptions, FLUSH_BYTES};
use crate::probability_model::ProbabilityModel;
use crate::range_coder::RangeEncoderCore;
use crate::status::{CoderError, CodingSummary, Status, StatusResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncoderState {
    Uninitialized,
    Ready,
    Finished,
}

/// Order-0 adaptive range encoder over whole buffers.
///
/// Usage is `initialize` → `encode` → `take_output`. One `encode` per
/// `initialize`; the compressed stream does not record the source length, so
/// the caller passes it to the decoder separately.
///
/// # Example
///
/// ```
/// use arcoder_core::{AdaptiveRangeEncoder, ByteBuffer};
///
/// let source = b"aaaaaaaaaab";
/// let mut encoder = AdaptiveRangeEncoder::new();
/// encoder.initialize(ByteBuffer::new(), source.len() as u32).unwrap();
/// let summary = encoder.encode(source).unwrap();
/// assert_eq!(summary.symbols, 11);
/// let compressed = encoder.take_output().unwrap();
/// assert_eq!(compressed.size(), summary.output_bytes);
/// ```
#[derive(Debug, Clone)]
pub struct AdaptiveRangeEncoder {
    options: CoderOptions,
    core: RangeEncoderCore,
    model: ProbabilityModel,
    output: Option<ByteBuffer>,
    expected_size: u32,
    state: EncoderState,
}

impl Default for AdaptiveRangeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveRangeEncoder {
    pub fn new() -> Self {
        Self {
            options: CoderOptions::default(),
            core: RangeEncoderCore::new(),
            model: ProbabilityModel::new(),
            output: None,
            expected_size: 0,
            state: EncoderState::Uninitialized,
        }
    }

    /// Encoder using non-default model parameters. The decoder must be built
    /// with the same options.
    pub fn with_options(options: CoderOptions) -> StatusResult<Self> {
        let mut encoder = Self::new();
        encoder.model = ProbabilityModel::from_options(&options)?;
        encoder.options = options;
        Ok(encoder)
    }

    pub fn options(&self) -> &CoderOptions {
        &self.options
    }

    /// Binds `output` and resets the coder for a fresh stream.
    ///
    /// `output` is cleared and sized for `expected_size` source bytes.
    pub fn initialize(&mut self, mut output: ByteBuffer, expected_size: u32) -> Status {
        self.state = EncoderState::Uninitialized;
        output.clear();
        output.reserve(expected_size as usize + FLUSH_BYTES)?;
        self.output = Some(output);
        self.expected_size = expected_size;
        self.core.reset();
        self.model.reset();
        self.state = EncoderState::Ready;
        Ok(())
    }

    /// Compresses all of `source` into the bound output and flushes.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if not initialized, or already used since `initialize`
    /// - `InvalidArgument` if `source` is longer than `u32::MAX` bytes
    /// - `AllocationFailure` if the output cannot grow
    pub fn encode(&mut self, source: &[u8]) -> StatusResult<CodingSummary> {
        if self.state != EncoderState::Ready {
            return Err(CoderError::invalid_state(
                "encoder must be initialized before each encode",
            ));
        }
        self.state = EncoderState::Finished;
        let symbols = u32::try_from(source.len()).map_err(|_| {
            CoderError::invalid_argument(format!(
                "source of {} bytes exceeds the 32-bit length limit",
                source.len()
            ))
        })?;
        let output = self
            .output
            .as_mut()
            .ok_or_else(|| CoderError::invalid_state("no output buffer bound"))?;

        for &symbol in source {
            let cumulative = self.model.cumulative_before(symbol);
            let frequency = self.model.frequency_of(symbol);
            self.core.encode(cumulative, frequency, self.model.total(), output)?;
            self.model.update(symbol);
        }
        self.core.flush(output)?;

        debug!(
            symbols,
            expected = self.expected_size,
            compressed = output.size(),
            rescales = self.model.rescale_count(),
            "range encode finished"
        );
        Ok(CodingSummary::success(symbols, source.len(), output.size()))
    }

    /// Compressed bytes written so far, if a buffer is bound.
    pub fn output(&self) -> Option<&ByteBuffer> {
        self.output.as_ref()
    }

    /// Releases the bound output buffer.
    pub fn take_output(&mut self) -> Option<ByteBuffer> {
        self.state = EncoderState::Uninitialized;
        self.output.take()
    }

    pub fn model(&self) -> &ProbabilityModel {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusCode;

    #[test]
    fn test_encode_requires_initialize() {
        let mut encoder = AdaptiveRangeEncoder::new();
        let err = encoder.encode(b"abc").unwrap_err();
        assert_eq!(err.code(), StatusCode::InvalidState);
    }

    #[test]
    fn test_encode_twice_requires_reinitialize() {
        let mut encoder = AdaptiveRangeEncoder::new();
        encoder.initialize(ByteBuffer::new(), 3).unwrap();
        encoder.encode(b"abc").unwrap();
        let err = encoder.encode(b"abc").unwrap_err();
        assert_eq!(err.code(), StatusCode::InvalidState);

        encoder.initialize(ByteBuffer::new(), 3).unwrap();
        assert!(encoder.encode(b"abc").is_ok());
    }

    #[test]
    fn test_initialize_reserves_capacity() {
        let mut encoder = AdaptiveRangeEncoder::new();
        encoder.initialize(ByteBuffer::new(), 1000).unwrap();
        assert!(encoder.output().unwrap().capacity() >= 1000 + FLUSH_BYTES);
    }

    #[test]
    fn test_initialize_clears_previous_content() {
        let mut encoder = AdaptiveRangeEncoder::new();
        encoder.initialize(ByteBuffer::from(vec![9, 9, 9]), 0).unwrap();
        let summary = encoder.encode(&[]).unwrap();
        assert_eq!(summary.output_bytes, FLUSH_BYTES);
        assert_eq!(encoder.take_output().unwrap().data(), &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_model_updated_per_symbol() {
        let mut encoder = AdaptiveRangeEncoder::new();
        encoder.initialize(ByteBuffer::new(), 4).unwrap();
        encoder.encode(b"zzzz").unwrap();
        let increment = encoder.options().increment();
        assert_eq!(encoder.model().frequency_of(b'z'), 1 + 4 * increment);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let err = AdaptiveRangeEncoder::with_options(CoderOptions::new().with_increment(0)).unwrap_err();
        assert_eq!(err.code(), StatusCode::InvalidArgument);
    }
}
