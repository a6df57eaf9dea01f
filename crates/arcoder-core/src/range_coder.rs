//! Fixed-precision interval arithmetic shared by the adaptive coders.
//!
//! The encoder keeps `low` in a 64-bit register so that a carry out of the
//! 32-bit window is visible as bit 32. Output bytes are held back in a cache
//! plus a run of pending 0xFF bytes until it is known whether a later carry
//! rounds them up. The decoder mirrors the interval with a `code` register
//! that is kept relative to `low`, so it never needs `low` itself.

use crate::byte_buffer::ByteBuffer;
use crate::coder_options::{FLUSH_BYTES, TOP_VALUE};
use crate::status::{CoderError, Status, StatusResult};

const BYTE_SHIFT: u32 = 8;
const LOW_MASK: u64 = 0xFFFF_FFFF;
const CARRY_FREE_LIMIT: u64 = 0xFF00_0000;

/// Encoder half of the range coder.
#[derive(Debug, Clone)]
pub struct RangeEncoderCore {
    low: u64,
    range: u32,
    cache: u8,
    /// Bytes owed to the output: the cache itself plus the pending 0xFF run.
    pending: u64,
}

impl Default for RangeEncoderCore {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeEncoderCore {
    pub fn new() -> Self {
        Self {
            low: 0,
            range: u32::MAX,
            cache: 0,
            pending: 1,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    pub fn low(&self) -> u64 {
        self.low
    }

    /// Narrows the interval to `[cumulative, cumulative + frequency)` out of
    /// `total`, then renormalizes into `out`.
    ///
    /// Callers guarantee `frequency > 0`, `cumulative + frequency <= total`
    /// and `total <= MAX_TOTAL_FREQUENCY`.
    #[inline]
    pub fn encode(&mut self, cumulative: u32, frequency: u32, total: u32, out: &mut ByteBuffer) -> Status {
        debug_assert!(frequency > 0 && cumulative + frequency <= total);
        self.range /= total;
        self.low += u64::from(cumulative) * u64::from(self.range);
        self.range *= frequency;
        while self.range < TOP_VALUE {
            self.range <<= BYTE_SHIFT;
            self.shift_low(out)?;
        }
        Ok(())
    }

    /// Writes the bytes needed for the decoder to resolve the final interval.
    pub fn flush(&mut self, out: &mut ByteBuffer) -> Status {
        for _ in 0..FLUSH_BYTES {
            self.shift_low(out)?;
        }
        Ok(())
    }

    /// Moves the top byte of the 32-bit window out of `low`.
    ///
    /// The byte cannot be written yet when it is 0xFF and no carry has
    /// happened: a later carry would turn it into 0x00 and bump the cache.
    fn shift_low(&mut self, out: &mut ByteBuffer) -> Status {
        if self.low < CARRY_FREE_LIMIT || self.low > LOW_MASK {
            let carry = (self.low >> 32) as u8;
            out.push(self.cache.wrapping_add(carry))?;
            let owed = self.pending - 1;
            if owed > 0 {
                let run = usize::try_from(owed)
                    .map_err(|_| CoderError::AllocationFailure { requested: usize::MAX })?;
                out.push_repeated(0xFF_u8.wrapping_add(carry), run)?;
            }
            self.pending = 0;
            self.cache = ((self.low >> 24) & 0xFF) as u8;
        }
        self.pending += 1;
        self.low = (self.low & 0x00FF_FFFF) << BYTE_SHIFT;
        Ok(())
    }
}

/// Decoder half of the range coder, reading from a borrowed compressed slice.
#[derive(Debug, Clone)]
pub struct RangeDecoderCore<'a> {
    input: &'a [u8],
    position: usize,
    range: u32,
    code: u32,
}

impl<'a> RangeDecoderCore<'a> {
    /// Primes the `code` register from the first bytes of `input`.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::CorruptedInput` if fewer than five bytes are
    /// available or the leading byte is not the encoder's zero byte.
    pub fn new(input: &'a [u8]) -> StatusResult<Self> {
        let mut decoder = Self {
            input,
            position: 0,
            range: u32::MAX,
            code: 0,
        };
        let lead = decoder.next_byte()?;
        if lead != 0 {
            return Err(CoderError::corrupted_input(format!(
                "stream must start with a zero byte, found {:#04x}",
                lead
            )));
        }
        for _ in 1..FLUSH_BYTES {
            decoder.code = (decoder.code << BYTE_SHIFT) | u32::from(decoder.next_byte()?);
        }
        Ok(decoder)
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    /// Bytes of input consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Scales the interval by `total` and returns the cumulative value the
    /// current code falls on, clamped to `total - 1`.
    ///
    /// Must be followed by exactly one [`narrow`](Self::narrow).
    #[inline]
    pub fn decode_value(&mut self, total: u32) -> u32 {
        self.range /= total;
        (self.code / self.range).min(total - 1)
    }

    /// Narrows to the interval of the symbol found for the last value, then
    /// renormalizes.
    #[inline]
    pub fn narrow(&mut self, cumulative: u32, frequency: u32) -> Status {
        self.code -= cumulative * self.range;
        self.range *= frequency;
        while self.range < TOP_VALUE {
            self.code = (self.code << BYTE_SHIFT) | u32::from(self.next_byte()?);
            self.range <<= BYTE_SHIFT;
        }
        Ok(())
    }

    #[inline]
    fn next_byte(&mut self) -> StatusResult<u8> {
        match self.input.get(self.position) {
            Some(&byte) => {
                self.position += 1;
                Ok(byte)
            }
            None => Err(CoderError::corrupted_input(format!(
                "compressed stream truncated after {} bytes",
                self.input.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusCode;

    /// Codes `symbols` with a fixed 4-symbol distribution.
    const TABLE: [(u32, u32); 4] = [(0, 5), (5, 1), (6, 9), (15, 1)];
    const TABLE_TOTAL: u32 = 16;

    fn encode_fixed(symbols: &[usize]) -> Vec<u8> {
        let mut core = RangeEncoderCore::new();
        let mut out = ByteBuffer::new();
        for &s in symbols {
            let (cum, freq) = TABLE[s];
            core.encode(cum, freq, TABLE_TOTAL, &mut out).unwrap();
        }
        core.flush(&mut out).unwrap();
        out.into_vec()
    }

    fn decode_fixed(bytes: &[u8], count: usize) -> Vec<usize> {
        let mut core = RangeDecoderCore::new(bytes).unwrap();
        let mut symbols = Vec::with_capacity(count);
        for _ in 0..count {
            let value = core.decode_value(TABLE_TOTAL);
            let s = TABLE
                .iter()
                .position(|&(cum, freq)| value >= cum && value < cum + freq)
                .unwrap();
            core.narrow(TABLE[s].0, TABLE[s].1).unwrap();
            symbols.push(s);
        }
        assert_eq!(core.position(), bytes.len());
        symbols
    }

    #[test]
    fn test_empty_flush_is_five_zero_bytes() {
        assert_eq!(encode_fixed(&[]), vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_fixed_distribution_roundtrip() {
        let symbols: Vec<usize> = (0..5000).map(|i| (i * 7 + i / 3) % 4).collect();
        let bytes = encode_fixed(&symbols);
        assert_eq!(bytes[0], 0);
        assert_eq!(decode_fixed(&bytes, symbols.len()), symbols);
    }

    #[test]
    fn test_carry_through_pending_ff_run() {
        // Repeatedly taking the top interval drives `low` into 0xFF.. territory
        // and forces pending 0xFF runs to resolve through carries.
        let mut symbols = vec![3usize; 400];
        symbols.extend(std::iter::repeat(2).take(50));
        symbols.extend(std::iter::repeat(3).take(400));
        symbols.push(0);
        let bytes = encode_fixed(&symbols);
        assert_eq!(decode_fixed(&bytes, symbols.len()), symbols);
    }

    #[test]
    fn test_range_stays_normalized() {
        let mut core = RangeEncoderCore::new();
        let mut out = ByteBuffer::new();
        for i in 0..1000u32 {
            let (cum, freq) = TABLE[(i % 4) as usize];
            core.encode(cum, freq, TABLE_TOTAL, &mut out).unwrap();
            assert!(core.range() >= TOP_VALUE);
            // At most one pending carry bit above the 32-bit window.
            assert!(core.low() < 1 << 33);
        }
    }

    #[test]
    fn test_short_input_is_corrupted() {
        let err = RangeDecoderCore::new(&[0, 0, 0]).unwrap_err();
        assert_eq!(err.code(), StatusCode::CorruptedInput);
    }

    #[test]
    fn test_nonzero_lead_byte_is_corrupted() {
        let err = RangeDecoderCore::new(&[1, 0, 0, 0, 0]).unwrap_err();
        assert_eq!(err.code(), StatusCode::CorruptedInput);
    }
}
