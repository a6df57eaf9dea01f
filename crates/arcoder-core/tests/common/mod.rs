#![allow(dead_code)]

use arcoder_core::{decode_bytes, encode_bytes};

/// Deterministic xorshift64* byte source.
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        self.0.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| (self.next_u64() >> 56) as u8).collect()
    }
}

pub fn roundtrip(source: &[u8]) -> Vec<u8> {
    let encoded = encode_bytes(source).expect("encode failed");
    let decoded = decode_bytes(&encoded, source.len() as u32).expect("decode failed");
    assert_eq!(decoded.len(), source.len(), "decoded length mismatch");
    assert!(decoded == source, "round-trip mismatch for {} bytes", source.len());
    encoded
}
