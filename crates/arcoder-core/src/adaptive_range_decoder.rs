use tracing::debug;

use crate::byte_buffer::ByteBuffer;
use crate::coder_options::CoderOptions;
use crate::probability_model::ProbabilityModel;
use crate::range_coder::RangeDecoderCore;
use crate::status::{CoderError, CodingSummary, Status, StatusResult};

/// Order-0 adaptive range decoder, the mirror of
/// [`AdaptiveRangeEncoder`](crate::AdaptiveRangeEncoder).
///
/// The number of bytes to produce is given to [`initialize`](Self::initialize);
/// the stream itself has no terminator. The decoder's model receives exactly
/// the updates the encoder's model did, which is what keeps them in step.
///
/// # Example
///
/// ```
/// use arcoder_core::{encode_bytes, AdaptiveRangeDecoder, ByteBuffer};
///
/// let compressed = encode_bytes(b"aaaaaaaaaab").unwrap();
/// let mut decoder = AdaptiveRangeDecoder::new();
/// decoder.initialize(ByteBuffer::new(), 11).unwrap();
/// decoder.decode(&compressed).unwrap();
/// assert_eq!(decoder.take_output().unwrap().data(), b"aaaaaaaaaab");
/// ```
#[derive(Debug, Clone)]
pub struct AdaptiveRangeDecoder {
    options: CoderOptions,
    model: ProbabilityModel,
    output: Option<ByteBuffer>,
    expected_size: u32,
    ready: bool,
}

impl Default for AdaptiveRangeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveRangeDecoder {
    pub fn new() -> Self {
        Self {
            options: CoderOptions::default(),
            model: ProbabilityModel::new(),
            output: None,
            expected_size: 0,
            ready: false,
        }
    }

    /// Decoder matching an encoder built with the same `options`.
    pub fn with_options(options: CoderOptions) -> StatusResult<Self> {
        let mut decoder = Self::new();
        decoder.model = ProbabilityModel::from_options(&options)?;
        decoder.options = options;
        Ok(decoder)
    }

    pub fn options(&self) -> &CoderOptions {
        &self.options
    }

    /// Binds `output` and records how many bytes the next decode produces.
    pub fn initialize(&mut self, mut output: ByteBuffer, expected_size: u32) -> Status {
        self.ready = false;
        output.clear();
        output.reserve(expected_size as usize)?;
        self.output = Some(output);
        self.expected_size = expected_size;
        self.model.reset();
        self.ready = true;
        Ok(())
    }

    /// Decodes `encoded` into the bound output, producing exactly the
    /// `expected_size` bytes given to `initialize`.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if not initialized, or already used since `initialize`
    /// - `InvalidArgument` if `encoded` is empty
    /// - `CorruptedInput` if the stream is truncated or its leading byte is wrong
    ///
    /// Other damage is not detected and yields wrong bytes.
    pub fn decode(&mut self, encoded: &[u8]) -> StatusResult<CodingSummary> {
        if !self.ready {
            return Err(CoderError::invalid_state(
                "decoder must be initialized before each decode",
            ));
        }
        self.ready = false;
        if encoded.is_empty() {
            return Err(CoderError::invalid_argument("compressed input is empty"));
        }
        let output = self
            .output
            .as_mut()
            .ok_or_else(|| CoderError::invalid_state("no output buffer bound"))?;

        let mut core = RangeDecoderCore::new(encoded)?;
        for _ in 0..self.expected_size {
            let value = core.decode_value(self.model.total());
            let symbol = self.model.descend(value);
            core.narrow(self.model.cumulative_before(symbol), self.model.frequency_of(symbol))?;
            output.push(symbol)?;
            self.model.update(symbol);
        }

        debug!(
            symbols = self.expected_size,
            consumed = core.position(),
            available = encoded.len(),
            rescales = self.model.rescale_count(),
            "range decode finished"
        );
        Ok(CodingSummary::success(self.expected_size, core.position(), output.size()))
    }

    pub fn output(&self) -> Option<&ByteBuffer> {
        self.output.as_ref()
    }

    pub fn take_output(&mut self) -> Option<ByteBuffer> {
        self.ready = false;
        self.output.take()
    }

    pub fn model(&self) -> &ProbabilityModel {
        &self.model
    }
}
