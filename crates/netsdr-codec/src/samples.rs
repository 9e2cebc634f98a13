//! Sample extraction from data item payloads.
//!
//! Samples are packed little-endian cells of 1-4 bytes. The cell width is
//! agreed out of band and never appears on the wire.

use std::iter::FusedIterator;
use std::slice::ChunksExact;

use crate::error::{CodecError, Result};

/// Widest supported sample cell, in bytes.
pub const MAX_SAMPLE_BYTES: usize = 4;

/// Lazily decode `payload` into samples of `sample_bit_width` bits.
///
/// The byte width is `sample_bit_width / 8` and must be 1-4. Each cell is
/// zero-extended, not sign-extended, so an 8-bit `0xFF` reads as 255.
/// A trailing partial cell is ignored.
pub fn samples(sample_bit_width: u16, payload: &[u8]) -> Result<Samples<'_>> {
    let width = usize::from(sample_bit_width / 8);
    if width == 0 || width > MAX_SAMPLE_BYTES {
        return Err(CodecError::InvalidArgument(format!(
            "sample width of {sample_bit_width} bits is not 1-{MAX_SAMPLE_BYTES} bytes"
        )));
    }

    Ok(Samples {
        cells: payload.chunks_exact(width),
    })
}

/// Iterator over the samples of a payload. Cells are decoded on demand.
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    cells: ChunksExact<'a, u8>,
}

impl Samples<'_> {
    /// Bytes at the end of the payload that do not form a whole cell.
    pub fn remainder(&self) -> &[u8] {
        self.cells.remainder()
    }
}

fn widen(cell: &[u8]) -> i32 {
    let mut bytes = [0u8; MAX_SAMPLE_BYTES];
    bytes[..cell.len()].copy_from_slice(cell);
    i32::from_le_bytes(bytes)
}

impl Iterator for Samples<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        self.cells.next().map(widen)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cells.size_hint()
    }

    fn nth(&mut self, n: usize) -> Option<i32> {
        self.cells.nth(n).map(widen)
    }
}

impl ExactSizeIterator for Samples<'_> {}

impl FusedIterator for Samples<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_bit_cells_are_zero_extended() {
        let out: Vec<i32> = samples(8, &[0x05, 0xFF]).unwrap().collect();
        assert_eq!(out, vec![5, 255]);
    }

    #[test]
    fn sixteen_bit_cells() {
        let out: Vec<i32> = samples(16, &[0x01, 0x02, 0xFF, 0xFF]).unwrap().collect();
        assert_eq!(out, vec![0x0201, 0xFFFF]);
    }

    #[test]
    fn twenty_four_bit_cells() {
        let out: Vec<i32> = samples(24, &[0x00, 0x00, 0x80, 0x01, 0x00, 0x00])
            .unwrap()
            .collect();
        assert_eq!(out, vec![0x0080_0000, 1]);
    }

    #[test]
    fn thirty_two_bit_cells_keep_sign() {
        let out: Vec<i32> = samples(32, &[0xFF, 0xFF, 0xFF, 0xFF, 0x02, 0x00, 0x00, 0x00])
            .unwrap()
            .collect();
        assert_eq!(out, vec![-1, 2]);
    }

    #[test]
    fn trailing_partial_cell_is_dropped() {
        let iter = samples(16, &[0x01, 0x00, 0x02, 0x00, 0x03]).unwrap();
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.remainder(), &[0x03]);
        assert_eq!(iter.collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn empty_payload_yields_nothing() {
        let mut iter = samples(16, &[]).unwrap();
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn width_is_bits_divided_by_eight() {
        // 15 bits rounds down to one byte per cell.
        let out: Vec<i32> = samples(15, &[0x01, 0x02]).unwrap().collect();
        assert_eq!(out, vec![1, 2]);
    }

    #[test]
    fn rejects_widths_outside_one_to_four_bytes() {
        for bits in [0u16, 7, 40, 64, u16::MAX] {
            assert!(
                matches!(samples(bits, &[0u8; 8]), Err(CodecError::InvalidArgument(_))),
                "{bits} bits should be rejected"
            );
        }
    }

    #[test]
    fn partial_consumption_is_lazy() {
        let payload = vec![0xAB; 3 * 1000];
        let mut iter = samples(24, &payload).unwrap();
        assert_eq!(iter.next(), Some(0x00AB_ABAB));
        assert_eq!(iter.len(), 999);
        assert_eq!(iter.nth(997), Some(0x00AB_ABAB));
        assert_eq!(iter.len(), 1);
    }
}
