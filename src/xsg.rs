#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand_core::RngCore;

use crate::icg::Icg;
use crate::lfsr::Lfsr;
use crate::omega::omega_code;
use crate::{BitGenerator, Error, Hasher};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Pack an output bit buffer into the hasher's hexadecimal form.
///
/// Nibbles are assembled from the latest bit backwards, up to four at a
/// time, the first-taken bit most significant within its nibble, and every
/// finished nibble is prepended, so the string reads earliest-nibble-first.
fn hex_string(bits: &[bool]) -> String {
    let mut digits = Vec::new();
    let mut end = bits.len();
    while end > 0 {
        let take = end.min(4);
        let mut d = 0usize;
        for k in 0..take {
            d = (d << 1) | usize::from(bits[end - 1 - k]);
        }
        end -= take;
        digits.push(HEX[d] as char);
    }
    digits.iter().rev().collect()
}

/// Which bit of a 3-bit step count an index generator feeds.
#[derive(Clone, Copy)]
enum Lane {
    Low,
    Mid,
    High,
}

/// The three index generators one register contributes to another register's
/// step count, one per bit of the count.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Taps {
    pub low: Icg,
    pub mid: Icg,
    pub high: Icg,
}

impl Taps {
    fn lane_mut(&mut self, lane: Lane) -> &mut Icg {
        match lane {
            Lane::Low => &mut self.low,
            Lane::Mid => &mut self.mid,
            Lane::High => &mut self.high,
        }
    }
}

/// Cross-stepped generator.
///
/// A master register doles out stepping turns to four slave registers of
/// distinct prime lengths; the slave that steps also takes up to seven
/// additional steps, decided bit-by-bit through majority votes over the
/// other three slaves, each voter contributing the state bit addressed by a
/// fresh draw from one of its index generators. The output bit is the XOR
/// of the slave output bits (and the master's, when included).
///
/// Cloning yields a deep, independent copy; two clones fed the same call
/// sequence produce the same bits forever.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Xsg {
    master: Lfsr,
    slaves: [Lfsr; 4],
    /// `taps[j][t]` addresses slave `j`'s state on behalf of the `t`-th
    /// other slave, others taken in ascending index order.
    taps: [[Taps; 3]; 4],
    include_master: bool,
}

/// Position of target `i` among the three others of slave `j`.
fn slot(j: usize, i: usize) -> usize {
    if i < j {
        i
    } else {
        i - 1
    }
}

impl Xsg {
    /// Assemble a generator from its registers and index generators.
    ///
    /// The master length must be odd, and every index generator in
    /// `taps[j]` must have the length of slave `j` as its modulus so its
    /// draws always address a valid state bit.
    pub fn new(
        master: Lfsr,
        include_master: bool,
        slaves: [Lfsr; 4],
        taps: [[Taps; 3]; 4],
    ) -> Result<Self, Error> {
        if master.len() % 2 == 0 {
            return Err(Error::InvalidMasterLength(master.len()));
        }
        for (j, set) in taps.iter().enumerate() {
            let len = slaves[j].len();
            for t in set {
                for icg in [&t.low, &t.mid, &t.high] {
                    if icg.modulus() != len as u64 {
                        return Err(Error::ModulusMismatch {
                            modulus: icg.modulus(),
                            len,
                        });
                    }
                }
            }
        }
        Ok(Xsg {
            master,
            slaves,
            taps,
            include_master,
        })
    }

    /// Current output bit.
    pub fn get(&self) -> bool {
        self.slaves[0].get(0)
            ^ self.slaves[1].get(0)
            ^ self.slaves[2].get(0)
            ^ self.slaves[3].get(0)
            ^ (self.include_master && self.master.get(0))
    }

    /// One majority vote for slave `i`'s step count: each other slave, in
    /// ascending order, contributes the state bit addressed by a fresh draw
    /// from its matching index generator.
    fn vote(&mut self, i: usize, lane: Lane) -> bool {
        let mut count = 0u8;
        for j in 0..4 {
            if j == i {
                continue;
            }
            let k = self.taps[j][slot(j, i)].lane_mut(lane).next() as usize;
            count += u8::from(self.slaves[j].get(k));
        }
        count > 1
    }

    /// Step slave `i` once with the fed bit, then take the voted number of
    /// additional unfed steps.
    fn step_slave(&mut self, i: usize, val: bool) {
        self.slaves[i].step(val);
        let high = self.vote(i, Lane::High);
        let mid = self.vote(i, Lane::Mid);
        let low = self.vote(i, Lane::Low);
        let additional = 4 * usize::from(high) + 2 * usize::from(mid) + usize::from(low);
        for _ in 0..additional {
            self.slaves[i].step(false);
        }
    }

    /// Advance the generator one tick, XORing `val` into the chosen slave.
    ///
    /// Two fresh master output bits select the slave, the first bit carrying
    /// weight 1 and the second weight 2. When the master participates in the
    /// output it takes one extra step of its own.
    pub fn step(&mut self, val: bool) -> &mut Self {
        let sel = usize::from(self.master.next(false)) + 2 * usize::from(self.master.next(false));
        self.step_slave(sel, val);
        if self.include_master {
            self.master.step(false);
        }
        self
    }

    /// Step and return the new output bit.
    pub fn next(&mut self, val: bool) -> bool {
        self.step(val).get()
    }

    /// Step every slave through its full width, `rounds + 1` times over, so
    /// any just-fed bit has reached every position of every register. The
    /// master joins in when it is part of the output or when `im` forces it.
    pub fn blend(&mut self, rounds: usize, im: bool) -> &mut Self {
        if self.include_master || im {
            for _ in 0..(rounds + 1) * self.master.len() {
                self.master.step(false);
            }
        }
        for slave in self.slaves.iter_mut() {
            for _ in 0..(rounds + 1) * slave.len() {
                slave.step(false);
            }
        }
        self
    }

    /// Feed a key into the generator unambiguously.
    ///
    /// The key bits go in twice, bracketing the ω-code of the key's byte
    /// length, with a blend (master included) after each of the three feeds;
    /// the last blend runs `rounds + 1` times over.
    pub fn inject(&mut self, key: &[u8], rounds: usize) -> &mut Self {
        self.feed(key);
        self.blend(1, true);
        for bit in omega_code(key.len() as u64) {
            self.step(bit);
        }
        self.blend(1, true);
        self.feed(key);
        self.blend(rounds, true);
        self
    }

    /// Feed bytes MSB-first.
    fn feed(&mut self, bytes: &[u8]) {
        for &b in bytes {
            for i in (0..8).rev() {
                self.step(b >> i & 1 != 0);
            }
        }
    }
}

impl BitGenerator for Xsg {
    fn next_bit(&mut self) -> bool {
        self.next(false)
    }
}

impl Hasher for Xsg {
    fn hash(&mut self, s: &[u8], w: usize) -> String {
        self.hash_add(s).hash_final(w)
    }

    fn hash_add(&mut self, s: &[u8]) -> &mut Self {
        self.feed(s);
        self
    }

    fn hash_partial(&self, w: usize) -> String {
        self.clone().hash_final(w)
    }

    fn hash_final(&mut self, w: usize) -> String {
        self.blend(1, false);
        // Pseudohash: extract, mix the width in, then seal with the
        // extracted bits before producing the real digest.
        let pseudo: Vec<bool> = (0..w).map(|_| self.next(false)).collect();
        for bit in omega_code(w as u64) {
            self.step(bit);
        }
        self.blend(1, false);
        for &bit in &pseudo {
            self.step(bit);
        }
        self.blend(1, false);
        let out: Vec<bool> = (0..w).map(|_| self.next(false)).collect();
        hex_string(&out)
    }
}

impl RngCore for Xsg {
    fn next_u32(&mut self) -> u32 {
        (0..32).fold(0u32, |acc, _| (acc << 1) | u32::from(self.next(false)))
    }

    fn next_u64(&mut self) -> u64 {
        (0..64).fold(0u64, |acc, _| (acc << 1) | u64::from(self.next(false)))
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest.iter_mut() {
            *byte = (0..8).fold(0u8, |acc, _| (acc << 1) | u8::from(self.next(false)));
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taps_for(m: u64) -> [Taps; 3] {
        std::array::from_fn(|t| Taps {
            low: Icg::new(m, 1, 1, t as u64).unwrap(),
            mid: Icg::new(m, 1, 2, t as u64 + 1).unwrap(),
            high: Icg::new(m, 1, 3, t as u64 + 2).unwrap(),
        })
    }

    fn tiny(include_master: bool) -> Xsg {
        let master = Lfsr::new(3, vec![0b001], vec![0b011]).unwrap();
        let slaves = [
            Lfsr::new(5, vec![0x01], vec![0x05]).unwrap(),
            Lfsr::new(7, vec![0x03], vec![0x48]).unwrap(),
            Lfsr::new(11, vec![0x0f], vec![0x301]).unwrap(),
            Lfsr::new(13, vec![0xff], vec![0x1b01]).unwrap(),
        ];
        let taps = [taps_for(5), taps_for(7), taps_for(11), taps_for(13)];
        Xsg::new(master, include_master, slaves, taps).unwrap()
    }

    #[test]
    fn rejects_even_master() {
        let master = Lfsr::new(4, vec![0x1], vec![0x3]).unwrap();
        let slaves = [
            Lfsr::new(5, vec![0x01], vec![0x05]).unwrap(),
            Lfsr::new(7, vec![0x03], vec![0x48]).unwrap(),
            Lfsr::new(11, vec![0x0f], vec![0x301]).unwrap(),
            Lfsr::new(13, vec![0xff], vec![0x1b01]).unwrap(),
        ];
        let taps = [taps_for(5), taps_for(7), taps_for(11), taps_for(13)];
        assert_eq!(
            Xsg::new(master, false, slaves, taps),
            Err(Error::InvalidMasterLength(4))
        );
    }

    #[test]
    fn rejects_modulus_mismatch() {
        let master = Lfsr::new(3, vec![0x1], vec![0x3]).unwrap();
        let slaves = [
            Lfsr::new(5, vec![0x01], vec![0x05]).unwrap(),
            Lfsr::new(7, vec![0x03], vec![0x48]).unwrap(),
            Lfsr::new(11, vec![0x0f], vec![0x301]).unwrap(),
            Lfsr::new(13, vec![0xff], vec![0x1b01]).unwrap(),
        ];
        // Slave 1's triples must run mod 7, not mod 5.
        let taps = [taps_for(5), taps_for(5), taps_for(11), taps_for(13)];
        assert_eq!(
            Xsg::new(master, false, slaves, taps),
            Err(Error::ModulusMismatch { modulus: 5, len: 7 })
        );
    }

    #[test]
    fn clones_track_each_other() {
        let mut a = tiny(false);
        let mut b = a.clone();
        for i in 0..500 {
            assert_eq!(a.next(i % 5 == 0), b.next(i % 5 == 0));
        }
    }

    #[test]
    fn fed_bits_change_the_stream() {
        let mut a = tiny(false);
        let mut b = a.clone();
        a.step(false);
        b.step(true);
        a.blend(1, false);
        b.blend(1, false);
        let diverged = (0..200).any(|_| a.next(false) != b.next(false));
        assert!(diverged);
    }

    #[test]
    fn master_inclusion_changes_the_output() {
        let mut a = tiny(false);
        let mut b = tiny(true);
        let diverged = (0..200).any(|_| a.next(false) != b.next(false));
        assert!(diverged);
    }

    #[test]
    fn hash_partial_leaves_the_generator_untouched() {
        let mut a = tiny(false);
        let mut b = a.clone();
        let partial = a.hash_partial(32);
        assert_eq!(partial.len(), 8);
        for _ in 0..300 {
            assert_eq!(a.next(false), b.next(false));
        }
    }

    #[test]
    fn hash_final_widths() {
        assert_eq!(tiny(false).hash_final(8).len(), 2);
        assert_eq!(tiny(false).hash_final(128).len(), 32);
        // Partial nibbles round up.
        assert_eq!(tiny(false).hash_final(7).len(), 2);
        assert_eq!(tiny(false).hash_final(0), "");
    }

    #[test]
    fn fill_bytes_packs_bits_msb_first() {
        let mut a = tiny(false);
        let mut b = a.clone();
        let mut buf = [0u8; 16];
        a.fill_bytes(&mut buf);
        for byte in buf {
            let manual = (0..8).fold(0u8, |acc, _| (acc << 1) | u8::from(b.next(false)));
            assert_eq!(byte, manual);
        }
    }

    #[test]
    fn hex_string_reads_earliest_nibble_first() {
        assert_eq!(hex_string(&[]), "");
        assert_eq!(hex_string(&[true, false, false, false]), "1");
        assert_eq!(hex_string(&[false, false, false, true]), "8");
        // Five bits: the earliest bit forms its own leading nibble.
        assert_eq!(hex_string(&[true, false, false, false, true]), "18");
        let sixteen: Vec<bool> = (0..16).map(|i| i % 4 == 3).collect();
        assert_eq!(hex_string(&sixteen), "8888");
    }
}
