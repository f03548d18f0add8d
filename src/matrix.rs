use byteorder::ReadBytesExt;
use failure::ensure;
use std::io::Cursor;

use crate::arithmetic;
use crate::Fp8;

/// A fixed 2x2 matrix of packed FP8 values, row-major.
///
/// Matrices are plain values: copied around, never mutated in place, with no
/// shared ownership between inputs and results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Matrix2 {
    rows: [[Fp8; 2]; 2],
}

impl Matrix2 {
    pub fn new(rows: [[Fp8; 2]; 2]) -> Matrix2 {
        Matrix2 { rows }
    }

    /// Encode each entry of a real-valued matrix.
    pub fn encode(values: [[f64; 2]; 2]) -> Matrix2 {
        let mut rows = [[Fp8::from_bits(0); 2]; 2];
        for i in 0..2 {
            for j in 0..2 {
                rows[i][j] = Fp8::encode(values[i][j]);
            }
        }
        Matrix2 { rows }
    }

    /// Build a matrix from 4 row-major packed bytes.
    pub fn from_raw_buf(buffer: &[u8]) -> Result<Matrix2, failure::Error> {
        ensure!(buffer.len() == 4, "buffer should be 4 bytes");
        let mut rdr = Cursor::new(buffer);
        let mut rows = [[Fp8::from_bits(0); 2]; 2];
        for i in 0..2 {
            for j in 0..2 {
                rows[i][j] = Fp8::from_bits(rdr.read_u8()?);
            }
        }
        Ok(Matrix2 { rows })
    }

    pub fn rows(&self) -> &[[Fp8; 2]; 2] {
        &self.rows
    }

    pub fn get(&self, i: usize, j: usize) -> Fp8 {
        self.rows[i][j]
    }

    /// Multiply two matrices entirely in the packed domain.
    ///
    /// Each output cell is a fold of [`arithmetic::add`] over the per-k
    /// products, seeded with `encode(0.0)`: every intermediate product and
    /// partial sum is re-quantized to a full packed value before the next
    /// step, so precision loss compounds with every multiply-add. Cells are
    /// computed independently, with no state shared between them.
    pub fn multiply(&self, other: &Matrix2) -> Matrix2 {
        let mut rows = [[Fp8::from_bits(0); 2]; 2];
        for i in 0..2 {
            for j in 0..2 {
                rows[i][j] = (0..2)
                    .map(|k| arithmetic::multiply(self.rows[i][k], other.rows[k][j]))
                    .fold(Fp8::encode(0.0), arithmetic::add);
            }
        }
        Matrix2 { rows }
    }

    /// Decode every entry.
    pub fn decode(&self) -> [[f64; 2]; 2] {
        let mut values = [[0.0; 2]; 2];
        for i in 0..2 {
            for j in 0..2 {
                values[i][j] = self.rows[i][j].decode();
            }
        }
        values
    }
}
