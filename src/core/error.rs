use thiserror::Error;

/// Validation failures surfaced by the counting core.
///
/// These are the only runtime failures the core has: every parameter is
/// checked before any counting work starts. Empty sequences, sequences
/// with no recognized bases, and subsequences shorter than k are all
/// defined zero-window cases, not errors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CountError {
    /// k must lie in [1, MAX_K] so that 4^k fits a u64 rank.
    #[error("k-mer size must be between 1 and 31, got {got}")]
    KmerSizeOutOfRange { got: usize },

    /// The rank space cannot be partitioned into zero bins.
    #[error("number of bins must be at least 1")]
    ZeroBins,

    /// Raised only by the buffer-filling entry point: an input shorter
    /// than k has no windows to rank.
    #[error("encoded sequence holds {n} codes but the window size is {k}")]
    SequenceTooShort { n: usize, k: usize },

    /// Raised only by the buffer-filling entry point: the output buffer
    /// must hold exactly one slot per window.
    #[error("rank buffer holds {got} slots but {need} are required")]
    RankBufferMismatch { need: usize, got: usize },
}
