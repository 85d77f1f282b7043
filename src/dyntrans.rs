//! Key-derived bit transposition over fixed-width blocks.

use crate::random::{generate_and_shuffle, invert_permutation};
use crate::{BitGenerator, Error};

/// Upper bound on the transposition width in bits.
pub const MAX_WIDTH: usize = 8192;

fn get_bit(block: &[u8], i: usize) -> bool {
    block[i / 8] >> (7 - i % 8) & 1 != 0
}

fn set_bit(block: &mut [u8], i: usize) {
    block[i / 8] |= 1 << (7 - i % 8);
}

/// A fixed bit permutation drawn from a generator at construction.
///
/// Bits are numbered MSB-first within each byte, matching the feed order
/// used everywhere else in the crate. The forward and inverse constructors
/// consume identical draws, so a pair built from clones of one generator
/// (or from two generators in the same state) invert each other.
pub struct DynTrans {
    trans: Vec<usize>,
}

impl DynTrans {
    /// Forward transposition of `w` bits.
    pub fn new<G: BitGenerator + ?Sized>(gen: &mut G, w: usize) -> Result<Self, Error> {
        if w > MAX_WIDTH {
            return Err(Error::WidthMismatch {
                want: MAX_WIDTH,
                got: w,
            });
        }
        Ok(DynTrans {
            trans: generate_and_shuffle(gen, w, 2),
        })
    }

    /// The transposition inverting [`DynTrans::new`] for the same draws.
    pub fn new_inverse<G: BitGenerator + ?Sized>(gen: &mut G, w: usize) -> Result<Self, Error> {
        let fwd = Self::new(gen, w)?;
        Ok(DynTrans {
            trans: invert_permutation(&fwd.trans),
        })
    }

    /// Width in bits.
    pub fn width(&self) -> usize {
        self.trans.len()
    }

    /// Permute the block's bits: input bit `i` moves to position
    /// `trans[i]`. The block must supply exactly the transposition's width.
    pub fn xfrm(&self, input: &[u8]) -> Result<Vec<u8>, Error> {
        if input.len() * 8 != self.trans.len() {
            return Err(Error::WidthMismatch {
                want: self.trans.len(),
                got: input.len() * 8,
            });
        }
        let mut out = vec![0u8; input.len()];
        for (i, &to) in self.trans.iter().enumerate() {
            if get_bit(input, i) {
                set_bit(&mut out, to);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Bits(u64);

    impl BitGenerator for Bits {
        fn next_bit(&mut self) -> bool {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            self.0 >> 63 != 0
        }
    }

    #[test]
    fn rejects_oversized_widths() {
        let mut g = Bits(1);
        assert!(DynTrans::new(&mut g, MAX_WIDTH).is_ok());
        assert_eq!(
            DynTrans::new(&mut g, MAX_WIDTH + 8).err(),
            Some(Error::WidthMismatch {
                want: MAX_WIDTH,
                got: MAX_WIDTH + 8
            })
        );
    }

    #[test]
    fn rejects_wrong_block_widths() {
        let mut g = Bits(2);
        let t = DynTrans::new(&mut g, 64).unwrap();
        assert_eq!(
            t.xfrm(&[0u8; 7]),
            Err(Error::WidthMismatch { want: 64, got: 56 })
        );
    }

    #[test]
    fn transposition_preserves_population() {
        let mut g = Bits(3);
        let t = DynTrans::new(&mut g, 64).unwrap();
        let block = 0xdead_beef_0123_4567u64.to_be_bytes();
        let out = t.xfrm(&block).unwrap();
        let popcount = |b: &[u8]| b.iter().map(|x| x.count_ones()).sum::<u32>();
        assert_eq!(popcount(&block), popcount(&out));
    }

    #[test]
    fn inverse_round_trips() {
        let fwd = DynTrans::new(&mut Bits(99), 128).unwrap();
        let inv = DynTrans::new_inverse(&mut Bits(99), 128).unwrap();
        let block: Vec<u8> = (0..16u8).map(|i| i.wrapping_mul(17).wrapping_add(3)).collect();
        let enc = fwd.xfrm(&block).unwrap();
        assert_eq!(inv.xfrm(&enc).unwrap(), block);
        assert_ne!(enc, block);
    }

    #[test]
    fn xsg_driven_round_trip() {
        use crate::xsg512::distill;
        let gen = distill(b"lakakona").unwrap();
        let fwd = DynTrans::new(&mut gen.clone(), 64).unwrap();
        let inv = DynTrans::new_inverse(&mut gen.clone(), 64).unwrap();
        let block = *b"transpos";
        assert_eq!(inv.xfrm(&fwd.xfrm(&block).unwrap()).unwrap(), block.to_vec());
    }
}
