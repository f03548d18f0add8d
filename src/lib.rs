use std::fmt;

use bitvec::prelude::*;
use failure::ensure;

pub mod arithmetic;
mod exponent;
mod matrix;
mod significand;

pub use crate::exponent::Exponent;
pub use crate::matrix::Matrix2;
pub use crate::significand::Significand;

/// A custom 8-bit floating point value ("FP8").
///
/// FP8 bits are broken down like so:
/// [1bit]   [ 3bits ]   [ 4bits ]
///  sign     exponent    mantissa
///
/// The exponent is stored with a bias of 7 and the mantissa is the fractional
/// part of a significand normalized to [1, 2), so the decoded value is
/// `(-1)^sign * (1 + mantissa/16) * 2^(exponent - 7)`.
///
/// This is not IEEE 754: there are no subnormals, infinities or NaNs, and
/// encoding truncates toward zero instead of rounding to nearest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fp8 {
    bits: u8,
}

impl Fp8 {
    /// Encode a real number into a packed FP8 byte.
    ///
    /// The magnitude is normalized into [1, 2) by repeated halving or
    /// doubling, saturating once the raw exponent reaches ±7. The bias is
    /// then added without clamping to the 3-bit field: for any magnitude of
    /// 2 or more the biased exponent spills into the sign bit and the packed
    /// byte decodes to an unrelated value. `encode(3.75)` is byte 142, which
    /// decodes to -0.0146484375. Callers that want the corrected behavior
    /// should use [`Fp8::encode_saturating`] or [`Fp8::try_encode`].
    pub fn encode(value: f64) -> Fp8 {
        let (sign, exp_raw, significand) = normalize(value);
        let exp_biased = (exp_raw + Exponent::BIAS) as u8;
        // Truncate the fractional offset and keep its low four bits. When the
        // saturated significand is still below 1 (zero is the usual case) the
        // offset is negative and wraps modulo 16; for plain zero it wraps to
        // exactly 0, making 0x00 the canonical zero byte.
        let fraction = (((significand - 1.0) * 16.0) as i64 & 0xF) as u8;
        let bits = ((sign as u8) << 7) | (exp_biased << 4) | fraction;
        Fp8 { bits }
    }

    /// Encode with the biased exponent clamped to its 3-bit field and the
    /// fraction clamped to [0, 15], so no field can overlap another.
    ///
    /// This diverges from [`Fp8::encode`] for every magnitude of 2 or more:
    /// out-of-range values saturate at the largest representable magnitude
    /// (1.9375) instead of producing a corrupted byte.
    pub fn encode_saturating(value: f64) -> Fp8 {
        let (sign, exp_raw, significand) = normalize(value);
        let exponent = Exponent::from_adjusted(exp_raw);
        let fraction = (((significand - 1.0) * 16.0) as i64).max(0).min(15) as u8;
        let mut bits = bitvec![u8, Msb0; 0; 8];
        bits.set(0, sign);
        bits[1..4].store_be(exponent.to_num());
        bits[4..8].store_be(fraction);
        Fp8 {
            bits: bits.load_be::<u8>(),
        }
    }

    /// Encode, rejecting inputs the packed format cannot represent instead of
    /// silently corrupting them. Accepts any finite value with magnitude
    /// below 2; magnitudes below 2^-7 still saturate quietly at the bottom of
    /// the exponent range, exactly as [`Fp8::encode`] does.
    pub fn try_encode(value: f64) -> Result<Fp8, failure::Error> {
        ensure!(value.is_finite(), "cannot encode non-finite value {}", value);
        ensure!(
            value.abs() < 2.0,
            "magnitude {} exceeds the representable range [0, 2)",
            value.abs()
        );
        Ok(Fp8::encode(value))
    }

    /// Decode a packed FP8 byte back into a real number. Total: every one of
    /// the 256 byte patterns has a well-defined decoded value, including
    /// patterns unreachable through a non-overflowing encode.
    pub fn decode(self) -> f64 {
        let magnitude =
            self.significand().to_fraction() * 2f64.powi(i32::from(self.exponent().to_adjusted()));
        if self.sign() {
            -magnitude
        } else {
            magnitude
        }
    }

    pub fn from_bits(bits: u8) -> Fp8 {
        Fp8 { bits }
    }

    pub fn to_bits(self) -> u8 {
        self.bits
    }

    /// Sign bit: true for negative.
    pub fn sign(self) -> bool {
        self.bits.view_bits::<Msb0>()[0]
    }

    pub fn exponent(self) -> Exponent {
        Exponent::from_bits(&self.bits.view_bits::<Msb0>()[1..4])
    }

    pub fn significand(self) -> Significand {
        Significand::from_bits(&self.bits.view_bits::<Msb0>()[4..8])
    }
}

impl From<u8> for Fp8 {
    fn from(bits: u8) -> Fp8 {
        Fp8::from_bits(bits)
    }
}

impl From<Fp8> for u8 {
    fn from(value: Fp8) -> u8 {
        value.to_bits()
    }
}

impl fmt::Display for Fp8 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.decode())
    }
}

/// Split a value into sign, raw exponent and normalized significand.
///
/// The significand lands in [1, 2) unless the loop saturates at a raw
/// exponent of ±7 first, in which case it may end up at or above 2 (top
/// saturation) or below 1 (bottom saturation, zero included).
fn normalize(value: f64) -> (bool, i8, f64) {
    let sign = value < 0.0;
    let mut magnitude = value.abs();
    let mut exp_raw: i8 = 0;
    if magnitude >= 1.0 {
        while magnitude >= 2.0 && exp_raw < 7 {
            magnitude /= 2.0;
            exp_raw += 1;
        }
    } else {
        while magnitude < 1.0 && exp_raw > -7 {
            magnitude *= 2.0;
            exp_raw -= 1;
        }
    }
    (sign, exp_raw, magnitude)
}

#[cfg(test)]
mod tests {
    use super::Fp8;

    #[test]
    fn zero_encodes_to_the_canonical_zero_byte() {
        assert_eq!(Fp8::encode(0.0).to_bits(), 0x00);
        assert_eq!(Fp8::encode(-0.0).to_bits(), 0x00);
        assert!(Fp8::from_bits(0x00).exponent().is_zero());
        assert!(Fp8::from_bits(0x00).significand().is_zero());
        // 0x00 is not a true zero: it decodes to the smallest magnitude.
        assert_eq!(Fp8::from_bits(0x00).decode(), 0.0078125);
    }

    #[test]
    fn biased_exponent_overflows_into_the_sign_bit_at_magnitude_two() {
        // 2.0 normalizes to exp_raw = 1, biased 8, which needs four bits.
        let packed = Fp8::encode(2.0);
        assert_eq!(packed.to_bits(), 0b1000_0000);
        assert!(packed.sign());
        assert_eq!(packed.decode(), -0.0078125);
    }

    #[test]
    fn tiny_magnitudes_saturate_at_the_bottom_of_the_exponent_range() {
        // 2^-10 doubles seven times to 0.125, still below 1, and the
        // fractional offset wraps modulo 16.
        let packed = Fp8::encode(0.0009765625);
        assert_eq!(packed.to_bits(), 0b0000_0010);
        assert_eq!(packed.decode(), 0.0087890625);
    }

    #[test]
    fn saturating_encode_clamps_instead_of_corrupting() {
        assert_eq!(Fp8::encode_saturating(3.75).to_bits(), 0b0111_1110);
        assert_eq!(Fp8::encode_saturating(3.75).decode(), 1.875);
        assert_eq!(Fp8::encode_saturating(1e6).to_bits(), 0b0111_1111);
        assert_eq!(Fp8::encode_saturating(1e6).decode(), 1.9375);
        assert_eq!(Fp8::encode_saturating(-1e6).to_bits(), 0b1111_1111);
        assert_eq!(Fp8::encode_saturating(0.0).to_bits(), 0x00);
        // In range the two modes agree bit for bit.
        assert_eq!(
            Fp8::encode_saturating(0.75).to_bits(),
            Fp8::encode(0.75).to_bits()
        );
    }

    #[test]
    fn try_encode_rejects_out_of_range_magnitudes() {
        assert!(Fp8::try_encode(3.75).is_err());
        assert!(Fp8::try_encode(-2.0).is_err());
        assert!(Fp8::try_encode(std::f64::INFINITY).is_err());
        assert!(Fp8::try_encode(std::f64::NAN).is_err());
        assert_eq!(Fp8::try_encode(1.9375).unwrap().to_bits(), 0b0111_1111);
    }

    #[test]
    fn field_accessors_match_the_bit_layout() {
        // 0b1110_1010: sign 1, biased exponent 6, mantissa 10.
        let packed = Fp8::from_bits(0b1110_1010);
        assert!(packed.sign());
        assert_eq!(packed.exponent().to_num(), 6);
        assert_eq!(packed.exponent().to_adjusted(), -1);
        assert_eq!(packed.significand().to_num(), 10);
        assert_eq!(packed.significand().to_fraction(), 1.625);
        assert_eq!(packed.decode(), -0.8125);
    }
}
