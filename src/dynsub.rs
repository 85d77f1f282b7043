//! Key-driven self-modifying byte substitutions.
//!
//! Each substitution owns a clone of a bit generator and a 256-entry table
//! pair that it reshuffles after every byte. A forward instance and an
//! inverse instance built from clones of the same generator consume the
//! same draws in the same order, so their tables evolve in lockstep and the
//! inverse undoes the forward byte-for-byte.

use crate::random::{generate_and_shuffle, rand_range};
use crate::{BitGenerator, Error};

/// The four substitution schedules.
///
/// `S`/`D` before `R` is how many random draws pick the swap target;
/// before `D` it is how many times the data byte passes through the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubKind {
    /// Single random, single data: output `fwd[c]`, swap `fwd[c] ↔ fwd[r]`.
    Srsd,
    /// Single random, double data: output `fwd[fwd[c]]`, swap at `fwd[c]`.
    Srdd,
    /// Double random, single data: swap target `r = draw ⊕ fwd[draw]`.
    Drsd,
    /// Double random, double data.
    Drdd,
}

/// One byte-stream dynamic substitution, forward or inverse.
#[derive(Clone, Debug)]
pub struct DynSub<G: BitGenerator + Clone> {
    gen: G,
    kind: SubKind,
    inverse: bool,
    fwd: [u8; 256],
    inv: [u8; 256],
}

impl<G: BitGenerator + Clone> DynSub<G> {
    /// Build a forward substitution from a clone of the generator.
    pub fn new(kind: SubKind, gen: &G) -> Self {
        Self::build(kind, false, gen)
    }

    /// Build the inverse of the substitution [`DynSub::new`] would build
    /// from the same generator.
    pub fn new_inverse(kind: SubKind, gen: &G) -> Self {
        Self::build(kind, true, gen)
    }

    fn build(kind: SubKind, inverse: bool, gen: &G) -> Self {
        let mut gen = gen.clone();
        let perm = generate_and_shuffle(&mut gen, 256, 2);
        let mut fwd = [0u8; 256];
        for (i, &v) in perm.iter().enumerate() {
            fwd[i] = v as u8;
        }
        let mut inv = [0u8; 256];
        for (i, &v) in fwd.iter().enumerate() {
            inv[v as usize] = i as u8;
        }
        DynSub {
            gen,
            kind,
            inverse,
            fwd,
            inv,
        }
    }

    /// Swap two forward entries and patch the inverse to match, so
    /// `inv[fwd[c]] == c` keeps holding for every byte.
    fn swap_fwd(&mut self, p: u8, q: u8) {
        self.fwd.swap(p as usize, q as usize);
        self.inv[self.fwd[p as usize] as usize] = p;
        self.inv[self.fwd[q as usize] as usize] = q;
    }

    fn draw(&mut self) -> u8 {
        rand_range(&mut self.gen, 0, 256) as u8
    }

    /// Swap target for the double-random schedules: a bare draw XOR the
    /// table image of a second draw.
    fn double_draw(&mut self) -> u8 {
        let a = self.draw();
        let b = self.draw();
        a ^ self.fwd[b as usize]
    }

    /// Map one byte and advance the substitution.
    pub fn xfrm(&mut self, c: u8) -> u8 {
        if self.inverse {
            self.backward(c)
        } else {
            self.forward(c)
        }
    }

    fn forward(&mut self, c: u8) -> u8 {
        match self.kind {
            SubKind::Srsd => {
                let out = self.fwd[c as usize];
                let r = self.draw();
                self.swap_fwd(c, r);
                out
            }
            SubKind::Srdd => {
                let mid = self.fwd[c as usize];
                let out = self.fwd[mid as usize];
                let r = self.draw();
                self.swap_fwd(mid, r);
                out
            }
            SubKind::Drsd => {
                let out = self.fwd[c as usize];
                let r = self.double_draw();
                self.swap_fwd(c, r);
                out
            }
            SubKind::Drdd => {
                let mid = self.fwd[c as usize];
                let out = self.fwd[mid as usize];
                let r = self.double_draw();
                self.swap_fwd(mid, r);
                out
            }
        }
    }

    // The inverse swaps the same forward positions the forward instance
    // swaps: its output (single-data) or `inv[c]` (double-data) is exactly
    // the position the forward side read the data through.
    fn backward(&mut self, c: u8) -> u8 {
        match self.kind {
            SubKind::Srsd => {
                let out = self.inv[c as usize];
                let r = self.draw();
                self.swap_fwd(out, r);
                out
            }
            SubKind::Srdd => {
                let mid = self.inv[c as usize];
                let out = self.inv[mid as usize];
                let r = self.draw();
                self.swap_fwd(mid, r);
                out
            }
            SubKind::Drsd => {
                let out = self.inv[c as usize];
                let r = self.double_draw();
                self.swap_fwd(out, r);
                out
            }
            SubKind::Drdd => {
                let mid = self.inv[c as usize];
                let out = self.inv[mid as usize];
                let r = self.double_draw();
                self.swap_fwd(mid, r);
                out
            }
        }
    }
}

/// Fixed-width block of independent per-position substitutions.
pub struct DynSubBlock<G: BitGenerator + Clone> {
    subs: Vec<DynSub<G>>,
}

impl<G: BitGenerator + Clone> DynSubBlock<G> {
    /// One forward substitution per block position, each cloned from its
    /// own generator.
    pub fn new(kind: SubKind, gens: &[G]) -> Self {
        DynSubBlock {
            subs: gens.iter().map(|g| DynSub::new(kind, g)).collect(),
        }
    }

    /// The matching block of inverse substitutions.
    pub fn new_inverse(kind: SubKind, gens: &[G]) -> Self {
        DynSubBlock {
            subs: gens.iter().map(|g| DynSub::new_inverse(kind, g)).collect(),
        }
    }

    /// Block width in bytes.
    pub fn width(&self) -> usize {
        self.subs.len()
    }

    /// Transform one block, byte `i` through substitution `i`.
    pub fn xfrm(&mut self, input: &[u8]) -> Result<Vec<u8>, Error> {
        if input.len() != self.subs.len() {
            return Err(Error::WidthMismatch {
                want: self.subs.len(),
                got: input.len(),
            });
        }
        Ok(input
            .iter()
            .zip(self.subs.iter_mut())
            .map(|(&c, sub)| sub.xfrm(c))
            .collect())
    }
}
