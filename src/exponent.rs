use bitvec::prelude::*;

#[derive(Clone, PartialEq, PartialOrd)]
// where msb0 is big endian.
pub struct Exponent {
    vec: BitVec<u8, Msb0>,
}

/// Exponent is the 3-bit portion of an FP8 byte that follows the sign bit,
/// stored with a bias of 7 so the field stays non-negative. Raw field values
/// 0 through 7 represent unbiased exponents -7 through 0.
impl Exponent {
    pub const BIAS: i8 = 7;

    pub fn from_bits(bits: &BitSlice<u8, Msb0>) -> Self {
        Exponent {
            vec: bits.to_bitvec(),
        }
    }

    /// Build the field from an unbiased exponent, clamping the biased value
    /// to what 3 bits can hold.
    pub fn from_adjusted(adjusted: i8) -> Self {
        let biased = (adjusted + Self::BIAS).max(0).min(7) as u8;
        let mut vec = bitvec![u8, Msb0; 0; 3];
        vec.store_be(biased);
        Exponent { vec }
    }

    pub fn is_zero(&self) -> bool {
        self.to_num() == 0
    }

    pub fn to_num(&self) -> u8 {
        self.vec.load_be::<u8>()
    }

    // compare current exponent value with the exponent bias; the result is
    // the power of two the significand is scaled by.
    pub fn to_adjusted(&self) -> i8 {
        self.to_num() as i8 - Self::BIAS
    }
}
