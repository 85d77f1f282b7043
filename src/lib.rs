//! Cross-stepped generator (XSG): a keyed pseudorandom bit generator and
//! variable-width hash function.
//!
//! The engine is a cascade of five prime-length Galois LFSRs. A master
//! register decides which of four slave registers steps on each tick, and
//! the stepping slave takes up to seven extra steps chosen by majority
//! votes across the other slaves, each voter contributing a state bit
//! addressed by an inversive congruential generator. Key material enters
//! bit-serially through the registers' feedback ends; output leaves as the
//! XOR of the slave output bits.
//!
//! On top of the engine sit a variable-width hashing protocol
//! ([`Hasher`]), the key-distillation procedure that turns a byte key into
//! a fully parameterised generator ([`xsg512::distill`]), and two
//! bit-stream-driven block transforms: dynamic substitution ([`DynSub`])
//! and dynamic transposition ([`DynTrans`]).
//!
//! Everything is deterministic: an output bit is a pure function of the
//! construction parameters and the call sequence, and clones diverge only
//! if stepped differently. No cryptanalytic strength is claimed.
//!
//! ```
//! use rand_xsg::{xsg512, Hasher};
//!
//! let mut gen = xsg512::distill(b"lakakona")?;
//! let digest = gen.hash(b"The quick brown fox jumps over the lazy dog", 128);
//! assert_eq!(digest.len(), 32);
//! # Ok::<(), rand_xsg::Error>(())
//! ```

pub mod dynsub;
pub mod dyntrans;
pub mod error;
pub mod icg;
pub mod lfsr;
pub mod omega;
pub mod random;
pub mod xsg;
pub mod xsg512;

pub use dynsub::{DynSub, DynSubBlock, SubKind};
pub use dyntrans::DynTrans;
pub use error::Error;
pub use icg::Icg;
pub use lfsr::Lfsr;
pub use random::{
    generate_and_shuffle, generate_permutation, invert_permutation, rand_range,
    shuffle_permutation,
};
pub use xsg::{Taps, Xsg};

/// A stream of pseudorandom bits.
///
/// One bit per call, advancing the producer by one tick. Producers are
/// plain values; consumers that need an independent stream clone the
/// producer and let the copies diverge.
pub trait BitGenerator {
    fn next_bit(&mut self) -> bool;
}

/// Incremental variable-width hashing.
pub trait Hasher {
    /// Hash `s` into a `w`-bit digest, rendered as lowercase hex.
    fn hash(&mut self, s: &[u8], w: usize) -> String;

    /// Feed more bytes into an ongoing hash.
    fn hash_add(&mut self, s: &[u8]) -> &mut Self;

    /// Digest of everything fed so far, leaving the state untouched.
    fn hash_partial(&self, w: usize) -> String;

    /// Finalize and return the digest.
    fn hash_final(&mut self, w: usize) -> String;
}
