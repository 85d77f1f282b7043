use thiserror::Error;

/// Errors raised while building generators or applying block transforms.
///
/// Every variant is an argument-validation failure: once a generator or
/// transform has been constructed, stepping, blending and hashing cannot
/// fail.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// An LFSR was given an all-zero generator polynomial.
    #[error("zero generator polynomial")]
    InvalidGenerator,
    /// An ICG offset reduced to zero modulo the modulus.
    #[error("ICG offset is zero modulo the modulus")]
    InvalidOffset,
    /// The master register of an XSG must have odd length.
    #[error("master register length {0} is not odd")]
    InvalidMasterLength(usize),
    /// An index ICG's modulus does not match the register it addresses.
    #[error("ICG modulus {modulus} does not match register length {len}")]
    ModulusMismatch { modulus: u64, len: usize },
    /// A block transform was given a block of the wrong width.
    #[error("width mismatch: got {got}, expected {want}")]
    WidthMismatch { want: usize, got: usize },
}
