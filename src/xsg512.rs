//! The canonical XSG-512 instance: register lengths, generator polynomials,
//! π seeds and mother-multiplier tables, the bootstrap generator they
//! define, and key distillation.
//!
//! The five register lengths are primes above 512 whose cycle lengths
//! `2^n − 1` share no common factors, and the smallest factor of any cycle
//! length is far beyond the largest burst of steps a register ever takes at
//! once. The hex constants are normative: two implementations agree
//! bit-for-bit only if they share every table below.

use crate::icg::Icg;
use crate::lfsr::{words_from_bits, words_from_hex, Lfsr};
use crate::random::rand_range;
use crate::xsg::{Taps, Xsg};
use crate::Error;

/// Master register length.
pub const MASTER_LEN: usize = 521;

/// Slave register lengths, ascending.
pub const SLAVE_LENS: [usize; 4] = [523, 541, 547, 557];

// Primitive generator polynomials, big-endian hex.
const GEN_521: &str = "1986842c7f1620218c78e583637aa0baf82558ef35d875948b22ce317ba47cce076f48541f1a593896ee3f9e3c9541b4d3e65941170c721e4d5c879a51bff933e1f";
const GEN_523: &str = "6105ba99822ea4b0b57c26d5aa74c6b17f150b4c33147b4bd570e9aa1cbc663291ef6185805aa700b61672751f068eda9a1698c62b3fe4e7b034f3b8d899dfcfd92";
const GEN_541: &str = "1ec09c4098c55499ac20b3925f4297c214e193d3dae3cea7f18afc422f315b82967b4b0f2c6bb5c4ae568ce242144d568731dbfeeb91d60ba4af6380a7428e7567c7e2df";
const GEN_547: &str = "64f78024e326cc0d2dff541adc8737fc1843235fdb1feade3971cb90a49a8d2e1327babeaba4323e7481208590446fc35f9b2aa49a3a945b19e0a511148fbca3693f7a62b";
const GEN_557: &str = "16e4b48a1c95a2964c7e25d6d874610f3c8b062e65c3612a0159ff1db7cc37ca400b419d54f6862d9c9e99cea9c7c631d58c2d4b1fb3898ca473ad780d5cb815897e4c2fdffc";

// Successive prefixes of the binary expansion of π, big-endian hex; they
// seed the bootstrap registers.
const PI_521: &str = "121fb54442d18469898cc51701b839a252049c1114cf98e804177d4c76273644a29410f31c6809bbdf2a33679a748636605614dbe4be286e9fc26adadaa3848bc90";
const PI_523: &str = "5b576625e7ec6f44c42e9a637ed6b0bff5cb6f406b7edee386bfb5a899fa5ae9f24117c4b1fe649286651ece45b3dc2007cb8a163bf0598da48361c55d39a69163f";
const PI_541: &str = "151fa499ebf06caba47b9475b2c38c5e6ac410aa5773daa520ee12d2cdace186a9c95793009e2e8d811943042f86520bc8c5c6d9c77c73cee58301d0c07364f0745d80f4";
const PI_547: &str = "28fb5c55df06f4c52c9de2bcbf6955817183995497cea956ae515d2261898fa051015728e5a8aaac42dad33170d04507a33a85521abdf1cba64ecfb850458dbef0a8aea71";
const PI_557: &str = "0aeba0c18fb672e1f0b4dc3c98f57eb5d19b61267ae3d1929c0944ac33b9dc7a44c35a5dcd7e25ff40db31410c9b0ec04e67d90d4c8a43e56302ef6401977c22eaef4c2bad8e";

// Mother multipliers attaining maximum period for each slave modulus.
const MOTHERS_523: [u64; 84] = [
    15, 16, 23, 25, 28, 31, 36, 49, 66, 68, 74, 89, 91, 96, 100, 102, 107, 111, 117, 131, 135,
    143, 151, 157, 166, 169, 171, 175, 176, 185, 190, 201, 202, 207, 209, 221, 223, 235, 241, 249,
    255, 257, 258, 275, 278, 281, 287, 290, 292, 296, 301, 318, 319, 324, 326, 339, 356, 367, 376,
    377, 381, 383, 391, 395, 419, 425, 426, 430, 437, 438, 439, 440, 443, 448, 454, 467, 475, 476,
    478, 489, 493, 505, 518, 521,
];
const MOTHERS_541: [u64; 66] = [
    18, 24, 37, 62, 65, 67, 68, 73, 83, 91, 96, 98, 117, 127, 152, 153, 181, 197, 206, 208, 218,
    220, 224, 248, 261, 263, 267, 280, 283, 284, 291, 293, 297, 318, 321, 328, 335, 344, 358, 365,
    383, 385, 388, 403, 409, 410, 413, 415, 427, 428, 434, 443, 445, 458, 468, 473, 474, 476, 479,
    486, 490, 511, 523, 527, 528, 531,
];
const MOTHERS_547: [u64; 71] = [
    4, 15, 16, 19, 25, 36, 49, 60, 66, 74, 82, 86, 97, 99, 115, 116, 118, 135, 137, 142, 143, 144,
    160, 171, 177, 183, 193, 202, 206, 208, 214, 225, 227, 249, 250, 256, 266, 275, 287, 289, 313,
    317, 324, 326, 328, 336, 344, 346, 361, 385, 394, 395, 400, 401, 406, 413, 438, 443, 452, 455,
    489, 490, 497, 499, 502, 504, 514, 515, 530, 535, 542,
];
const MOTHERS_557: [u64; 88] = [
    3, 5, 11, 13, 14, 21, 31, 41, 44, 52, 86, 87, 89, 91, 92, 95, 107, 108, 125, 126, 128, 134,
    136, 147, 152, 162, 166, 176, 177, 186, 189, 191, 192, 200, 224, 228, 237, 238, 247, 264, 275,
    279, 286, 287, 291, 300, 315, 319, 325, 331, 333, 340, 346, 348, 350, 356, 363, 365, 369, 393,
    396, 405, 409, 427, 432, 437, 447, 449, 454, 459, 466, 470, 472, 473, 477, 479, 501, 504, 505,
    507, 509, 510, 519, 520, 530, 534, 544, 549,
];

// Offsets of the bootstrap index generators. The sequence is normative as
// written: the ninth entry is the literal 22, and 29 is absent.
const BOOT_OFFSETS: [u64; 36] = [
    2, 3, 5, 7, 11, 13, 17, 19, 22, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157,
];

fn slave_gens() -> [&'static str; 4] {
    [GEN_523, GEN_541, GEN_547, GEN_557]
}

fn mothers(j: usize) -> &'static [u64] {
    match j {
        0 => &MOTHERS_523,
        1 => &MOTHERS_541,
        2 => &MOTHERS_547,
        _ => &MOTHERS_557,
    }
}

/// Build slave `j`'s three index triples from nine (mother, offset, init)
/// parameter sets, laid out target-major with low/mid/high inside each
/// target.
fn slave_taps(
    j: usize,
    mothers: &[u64; 9],
    offsets: &[u64; 9],
    inits: &[u64; 9],
) -> Result<[Taps; 3], Error> {
    let m = SLAVE_LENS[j] as u64;
    let icg = |k: usize| Icg::from_mother(m, mothers[k], offsets[k], inits[k]);
    Ok([
        Taps {
            low: icg(0)?,
            mid: icg(1)?,
            high: icg(2)?,
        },
        Taps {
            low: icg(3)?,
            mid: icg(4)?,
            high: icg(5)?,
        },
        Taps {
            low: icg(6)?,
            mid: icg(7)?,
            high: icg(8)?,
        },
    ])
}

/// Parameters of the bootstrap's `k = 9j..9j+9`-th index generators: the
/// `k`-th entry of the owning slave's mother table, the `k`-th bootstrap
/// offset, and `k` itself as the initial state.
fn boot_taps(j: usize) -> Result<[Taps; 3], Error> {
    let mut ms = [0u64; 9];
    let mut offs = [0u64; 9];
    let mut inits = [0u64; 9];
    for k in 0..9 {
        let global = 9 * j + k;
        ms[k] = mothers(j)[global];
        offs[k] = BOOT_OFFSETS[global];
        inits[k] = global as u64;
    }
    slave_taps(j, &ms, &offs, &inits)
}

/// The canonical bootstrap generator, blended and ready for distillation.
///
/// Registers are seeded from π prefixes; slave `j`'s nine index generators
/// take the globally `k = 9j..9j+9`-th entries of its mother table, the
/// `k`-th bootstrap offset and `k` itself as the initial state. The master
/// is excluded from the output.
pub fn bootstrap() -> Result<Xsg, Error> {
    let master = Lfsr::from_hex(MASTER_LEN, PI_521, GEN_521)?;
    let slaves = [
        Lfsr::from_hex(SLAVE_LENS[0], PI_523, GEN_523)?,
        Lfsr::from_hex(SLAVE_LENS[1], PI_541, GEN_541)?,
        Lfsr::from_hex(SLAVE_LENS[2], PI_547, GEN_547)?,
        Lfsr::from_hex(SLAVE_LENS[3], PI_557, GEN_557)?,
    ];
    let taps = [
        boot_taps(0)?,
        boot_taps(1)?,
        boot_taps(2)?,
        boot_taps(3)?,
    ];
    let mut boot = Xsg::new(master, false, slaves, taps)?;
    boot.blend(4, true);
    Ok(boot)
}

/// Distil a byte key into a fully parameterised production generator,
/// starting from the canonical bootstrap.
pub fn distill(key: &[u8]) -> Result<Xsg, Error> {
    let mut boot = bootstrap()?;
    distill_from(key, &mut boot)
}

/// Distil a key through a caller-supplied bootstrap generator.
///
/// The key is injected with four extra blending rounds, then the bootstrap
/// serves as the entropy source for every production parameter, in a fixed
/// order: the five register states bit-by-bit, then 36 mother multipliers,
/// then 36 offsets, then 36 initial states, each block slave-major with
/// low/mid/high inside ascending targets. Offsets are drawn as
/// `1 + rand(len − 1)` over the register length, and initial states as
/// `rand(len)`. The production generator excludes its master from the
/// output and finishes with a four-round blend.
pub fn distill_from(key: &[u8], boot: &mut Xsg) -> Result<Xsg, Error> {
    boot.inject(key, 4);

    let master_bits = draw_bits(boot, MASTER_LEN);
    let slave_bits = [
        draw_bits(boot, SLAVE_LENS[0]),
        draw_bits(boot, SLAVE_LENS[1]),
        draw_bits(boot, SLAVE_LENS[2]),
        draw_bits(boot, SLAVE_LENS[3]),
    ];

    let mut ms = [[0u64; 9]; 4];
    for (j, row) in ms.iter_mut().enumerate() {
        let table = mothers(j);
        for slot in row.iter_mut() {
            *slot = table[rand_range(boot, 0, table.len() as u64) as usize];
        }
    }
    let mut offs = [[0u64; 9]; 4];
    for (j, row) in offs.iter_mut().enumerate() {
        let span = SLAVE_LENS[j] as u64 - 1;
        for slot in row.iter_mut() {
            *slot = 1 + rand_range(boot, 0, span);
        }
    }
    let mut inits = [[0u64; 9]; 4];
    for (j, row) in inits.iter_mut().enumerate() {
        for slot in row.iter_mut() {
            *slot = rand_range(boot, 0, SLAVE_LENS[j] as u64);
        }
    }

    let master = Lfsr::new(
        MASTER_LEN,
        words_from_bits(&master_bits),
        words_from_hex(MASTER_LEN, GEN_521),
    )?;
    let gens = slave_gens();
    let slaves = [
        Lfsr::new(SLAVE_LENS[0], words_from_bits(&slave_bits[0]), words_from_hex(SLAVE_LENS[0], gens[0]))?,
        Lfsr::new(SLAVE_LENS[1], words_from_bits(&slave_bits[1]), words_from_hex(SLAVE_LENS[1], gens[1]))?,
        Lfsr::new(SLAVE_LENS[2], words_from_bits(&slave_bits[2]), words_from_hex(SLAVE_LENS[2], gens[2]))?,
        Lfsr::new(SLAVE_LENS[3], words_from_bits(&slave_bits[3]), words_from_hex(SLAVE_LENS[3], gens[3]))?,
    ];
    let taps = [
        slave_taps(0, &ms[0], &offs[0], &inits[0])?,
        slave_taps(1, &ms[1], &offs[1], &inits[1])?,
        slave_taps(2, &ms[2], &offs[2], &inits[2])?,
        slave_taps(3, &ms[3], &offs[3], &inits[3])?,
    ];

    let mut xsg = Xsg::new(master, false, slaves, taps)?;
    xsg.blend(4, true);
    Ok(xsg)
}

fn draw_bits(gen: &mut Xsg, n: usize) -> Vec<bool> {
    (0..n).map(|_| gen.next(false)).collect()
}
