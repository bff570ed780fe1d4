use crate::core::engine::DEFAULT_NUM_BINS;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rankmer", version, about = "Binned k-mer rank histogram counter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Count(CountArgs),
}

#[derive(Parser)]
pub struct CountArgs {
    /// FASTA or FASTQ input, optionally gzip-compressed.
    pub input: PathBuf,

    #[arg(short = 'k', long)]
    pub kmer_size: usize,

    #[arg(long, default_value_t = DEFAULT_NUM_BINS)]
    pub num_bins: usize,

    #[arg(long, default_value_t = num_cpus::get())]
    pub threads: usize,

    #[arg(long, value_enum, default_value_t = OutputArg::Hist)]
    pub output: OutputArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputArg {
    /// One "rank: count" line per distinct k-mer, ascending by rank.
    #[value(name = "hist")]
    Hist,
    /// Same table with ranks decoded back to k-mer strings.
    #[value(name = "kmers")]
    Kmers,
}
