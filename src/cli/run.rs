use crate::cli::args::{Cli, Commands, CountArgs, OutputArg};
use crate::core::engine::{self, CountConfig};
use crate::core::io::InputBytes;
use crate::core::rank;
use crate::core::seq;
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::env;
use std::io::{BufWriter, Write};
use std::time::{Duration, Instant};

pub fn entry() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Count(args) => run_count(args),
    }
}

fn run_count(args: CountArgs) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    if args.input.as_os_str() == "-" {
        bail!("stdin is not supported; provide a FASTA/FASTQ file path");
    }
    if !args.input.is_file() {
        bail!("input file not found: {}", args.input.display());
    }
    if args.threads == 0 {
        bail!("--threads must be >= 1");
    }

    let t_read = Instant::now();
    let input = InputBytes::open(&args.input, args.threads)?;
    let sequences = seq::extract_sequences(input.bytes())
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    stage_done(stats, "read", t_read);
    if stats {
        eprintln!(
            "RANKMER_STATS input={} bytes={} sequences={}",
            args.input.display(),
            input.bytes().len(),
            sequences.len()
        );
    }

    let config = CountConfig {
        kmer_size: args.kmer_size,
        num_bins: args.num_bins,
        threads: args.threads,
    };
    let t_count = Instant::now();
    let histogram = engine::count_seqs(&sequences, &config)?;
    stage_done(stats, "count", t_count);

    let t_print = Instant::now();
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match args.output {
        OutputArg::Hist => {
            for (rank, count) in &histogram {
                writeln!(out, "{}: {}", rank, count)?;
            }
        }
        OutputArg::Kmers => {
            for (rank, count) in &histogram {
                writeln!(out, "{}: {}", rank::rank_to_kmer(*rank, args.kmer_size), count)?;
            }
        }
    }
    out.flush()?;
    stage_done(stats, "print", t_print);

    if stats {
        eprintln!("RANKMER_STATS total={}", fmt_dur(t0.elapsed()));
    }
    Ok(())
}

fn stats_enabled() -> bool {
    matches!(env::var("RANKMER_STATS").as_deref(), Ok("1"))
}

fn stage_done(stats: bool, name: &str, t: Instant) {
    if stats {
        eprintln!("RANKMER_STATS stage={} time={}", name, fmt_dur(t.elapsed()));
    }
}

fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}
