use crate::status::{CoderError, Status};

/// Renormalization threshold `T`: the coder keeps `range >= TOP_VALUE`.
pub const TOP_VALUE: u32 = 1 << 24;

/// Precision ceiling `C`: the model total never exceeds this after an update.
pub const MAX_TOTAL_FREQUENCY: u32 = 1 << 16;

/// Smallest ceiling accepted by [`CoderOptions::validate`].
pub const MIN_TOTAL_FREQUENCY: u32 = 2 * ALPHABET_SIZE as u32;

/// Frequency added to a symbol each time it is coded.
pub const DEFAULT_INCREMENT: u32 = 32;

pub const ALPHABET_SIZE: usize = 256;

/// Bytes written by the encoder flush, and read by the decoder when priming.
pub const FLUSH_BYTES: usize = 5;

/// Tunables shared by [`AdaptiveRangeEncoder`](crate::AdaptiveRangeEncoder)
/// and [`AdaptiveRangeDecoder`](crate::AdaptiveRangeDecoder).
///
/// Both sides must use equal options. They are not stored in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoderOptions {
    increment: u32,
    max_total: u32,
}

impl Default for CoderOptions {
    fn default() -> Self {
        Self {
            increment: DEFAULT_INCREMENT,
            max_total: MAX_TOTAL_FREQUENCY,
        }
    }
}

impl CoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_increment(mut self, increment: u32) -> Self {
        self.increment = increment;
        self
    }

    pub fn with_max_total(mut self, max_total: u32) -> Self {
        self.max_total = max_total;
        self
    }

    pub fn increment(&self) -> u32 {
        self.increment
    }

    pub fn max_total(&self) -> u32 {
        self.max_total
    }

    /// Checks the options against the coder's fixed-width arithmetic.
    pub fn validate(&self) -> Status {
        if !(MIN_TOTAL_FREQUENCY..=MAX_TOTAL_FREQUENCY).contains(&self.max_total) {
            return Err(CoderError::invalid_argument(format!(
                "max_total {} outside [{}, {}]",
                self.max_total, MIN_TOTAL_FREQUENCY, MAX_TOTAL_FREQUENCY
            )));
        }
        if self.increment == 0 || self.increment > self.max_total / 2 {
            return Err(CoderError::invalid_argument(format!(
                "increment {} outside [1, {}]",
                self.increment,
                self.max_total / 2
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusCode;

    #[test]
    fn test_defaults_are_valid() {
        let options = CoderOptions::default();
        assert_eq!(options.increment(), DEFAULT_INCREMENT);
        assert_eq!(options.max_total(), MAX_TOTAL_FREQUENCY);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_increment() {
        let err = CoderOptions::new().with_increment(0).validate().unwrap_err();
        assert_eq!(err.code(), StatusCode::InvalidArgument);
    }

    #[test]
    fn test_rejects_ceiling_out_of_range() {
        assert!(CoderOptions::new().with_max_total(1 << 17).validate().is_err());
        assert!(CoderOptions::new().with_max_total(256).validate().is_err());
        assert!(CoderOptions::new()
            .with_max_total(1 << 12)
            .with_increment(8)
            .validate()
            .is_ok());
    }
}
