//! Binned k-mer rank histogram counter.
//!
//! Encodes DNA sequences into 2-bit codes, assigns every length-k window
//! a unique integer rank with a rolling update, shards the rank space into
//! contiguous bins counted independently, and merges the per-bin tables
//! into one rank-sorted histogram.

pub mod cli;
pub mod core;

pub use crate::core::engine::{CountConfig, DEFAULT_NUM_BINS, Histogram, count, count_seqs};
pub use crate::core::error::CountError;
pub use crate::core::rank::{MAX_K, fill_kmer_ranks, kmer_ranks, rank_to_kmer};
