//! Arithmetic over packed FP8 values.
//!
//! Each operation decodes both operands, performs the real-valued operation
//! once, and re-encodes the result. That single re-encoding is a fresh
//! quantization event, so error compounds across chained operations; callers
//! must not expect higher-precision intermediate accumulation. The operations
//! have no error outcomes of their own and inherit whatever exponent-overflow
//! behavior [`Fp8::encode`] exhibits for the computed result.

use std::ops::{Add, Mul};

use crate::Fp8;

/// `encode(decode(a) + decode(b))`.
pub fn add(a: Fp8, b: Fp8) -> Fp8 {
    Fp8::encode(a.decode() + b.decode())
}

/// `encode(decode(a) * decode(b))`.
pub fn multiply(a: Fp8, b: Fp8) -> Fp8 {
    Fp8::encode(a.decode() * b.decode())
}

impl Add for Fp8 {
    type Output = Fp8;

    fn add(self, rhs: Fp8) -> Fp8 {
        add(self, rhs)
    }
}

impl Mul for Fp8 {
    type Output = Fp8;

    fn mul(self, rhs: Fp8) -> Fp8 {
        multiply(self, rhs)
    }
}
