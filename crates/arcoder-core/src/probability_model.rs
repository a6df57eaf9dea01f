//! Adaptive order-0 frequency model over the byte alphabet.
//!
//! Frequencies live in a plain array for O(1) `frequency_of` and in a
//! Fenwick tree for O(log 256) prefix sums and inverse lookup. The encoder and
//! the decoder each own a model and must call [`ProbabilityModel::update`]
//! with the same symbol sequence; nothing in the stream detects divergence.

use tracing::trace;

use crate::coder_options::{CoderOptions, ALPHABET_SIZE};
use crate::status::{CoderError, StatusResult};

/// Span of the root Fenwick node. It always holds the full total, so the
/// descent starts one level below it.
const FENWICK_TOP_STEP: usize = ALPHABET_SIZE;

#[derive(Debug, Clone)]
pub struct ProbabilityModel {
    frequency: [u32; ALPHABET_SIZE],
    /// Fenwick tree, 1-based: `tree[i]` covers `frequency[i - lowbit(i) .. i]`.
    tree: [u32; ALPHABET_SIZE + 1],
    total: u32,
    increment: u32,
    max_total: u32,
    rescale_count: u64,
}

impl Default for ProbabilityModel {
    fn default() -> Self {
        let options = CoderOptions::default();
        Self::with_parameters(options.increment(), options.max_total())
    }
}

impl ProbabilityModel {
    /// Uniform model with the default increment and ceiling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform model configured from validated options.
    pub fn from_options(options: &CoderOptions) -> StatusResult<Self> {
        options.validate()?;
        Ok(Self::with_parameters(options.increment(), options.max_total()))
    }

    fn with_parameters(increment: u32, max_total: u32) -> Self {
        let mut model = Self {
            frequency: [1; ALPHABET_SIZE],
            tree: [0; ALPHABET_SIZE + 1],
            total: ALPHABET_SIZE as u32,
            increment,
            max_total,
            rescale_count: 0,
        };
        model.rebuild_tree();
        model
    }

    /// Returns the model to the uniform starting distribution.
    pub fn reset(&mut self) {
        self.frequency = [1; ALPHABET_SIZE];
        self.total = ALPHABET_SIZE as u32;
        self.rescale_count = 0;
        self.rebuild_tree();
    }

    #[inline]
    pub fn frequency_of(&self, symbol: u8) -> u32 {
        self.frequency[symbol as usize]
    }

    /// Sum of the frequencies of all symbols strictly below `symbol`.
    #[inline]
    pub fn cumulative_before(&self, symbol: u8) -> u32 {
        let mut index = symbol as usize;
        let mut sum = 0;
        while index > 0 {
            sum += self.tree[index];
            index &= index - 1;
        }
        sum
    }

    #[inline]
    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn frequencies(&self) -> &[u32; ALPHABET_SIZE] {
        &self.frequency
    }

    pub fn rescale_count(&self) -> u64 {
        self.rescale_count
    }

    /// Finds the symbol whose interval `[cumulative_before, cumulative_before + frequency)`
    /// contains `value`.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::InvalidArgument` if `value >= total()`.
    pub fn find_symbol(&self, value: u32) -> StatusResult<u8> {
        if value >= self.total {
            return Err(CoderError::invalid_argument(format!(
                "cumulative value {} outside model total {}",
                value, self.total
            )));
        }
        Ok(self.descend(value))
    }

    /// Fenwick descent; caller guarantees `value < total`.
    #[inline]
    pub(crate) fn descend(&self, mut value: u32) -> u8 {
        let mut position = 0usize;
        let mut step = FENWICK_TOP_STEP / 2;
        while step > 0 {
            let next = position + step;
            if self.tree[next] <= value {
                value -= self.tree[next];
                position = next;
            }
            step >>= 1;
        }
        // `position` symbols have cumulative frequency <= value.
        position as u8
    }

    /// Records one occurrence of `symbol`, rescaling if the total passes the
    /// ceiling.
    #[inline]
    pub fn update(&mut self, symbol: u8) {
        self.frequency[symbol as usize] += self.increment;
        self.total += self.increment;
        let mut index = symbol as usize + 1;
        while index <= ALPHABET_SIZE {
            self.tree[index] += self.increment;
            index += index & index.wrapping_neg();
        }
        while self.total > self.max_total {
            self.rescale();
        }
    }

    /// Halves every frequency, keeping each at least 1.
    pub fn rescale(&mut self) {
        let mut total = 0;
        for frequency in self.frequency.iter_mut() {
            *frequency = (*frequency / 2).max(1);
            total += *frequency;
        }
        self.total = total;
        self.rescale_count += 1;
        self.rebuild_tree();
        trace!(total, rescales = self.rescale_count, "probability model rescaled");
    }

    fn rebuild_tree(&mut self) {
        self.tree[0] = 0;
        self.tree[1..].copy_from_slice(&self.frequency);
        for index in 1..=ALPHABET_SIZE {
            let parent = index + (index & index.wrapping_neg());
            if parent <= ALPHABET_SIZE {
                self.tree[parent] += self.tree[index];
            }
        }
    }
}
