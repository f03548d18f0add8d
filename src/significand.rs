use bitvec::prelude::*;

#[derive(Clone, PartialEq, PartialOrd)]
// where msb0 is big endian.
pub struct Significand {
    vec: BitVec<u8, Msb0>,
}

/// Significand is the 4-bit mantissa portion of an FP8 byte. The stored bits
/// are the fractional sixteenths of a significand normalized to [1, 2); the
/// leading 1 is implicit.
impl Significand {
    pub fn from_bits(bits: &BitSlice<u8, Msb0>) -> Self {
        Significand {
            vec: bits.to_bitvec(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.to_num() == 0
    }

    /// The raw mantissa field, 0 through 15.
    pub fn to_num(&self) -> u8 {
        self.vec.load_be::<u8>()
    }

    /// The full significand with the implicit leading 1 restored, in [1, 2).
    pub fn to_fraction(&self) -> f64 {
        1.0 + f64::from(self.to_num()) / 16.0
    }
}
