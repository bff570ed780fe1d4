use crate::core::alphabet;
use crate::core::bins::{self, BinRouter};
use crate::core::error::CountError;
use crate::core::rank::{self, kmer_ranks};
use crossbeam_channel as channel;
use std::thread;
use std::time::{Duration, Instant};

/// Sorted, deduplicated (rank, count) table; counts are >= 1 and ranks
/// strictly ascending.
pub type Histogram = Vec<(u64, u64)>;

pub const DEFAULT_NUM_BINS: usize = 1000;

pub struct CountConfig {
    pub kmer_size: usize,
    pub num_bins: usize,
    pub threads: usize,
}

/// Counts every length-`kmer_size` window across `sequences` with the
/// available parallelism. See [`count_seqs`] for the full contract.
pub fn count<S: AsRef<[u8]>>(
    sequences: &[S],
    kmer_size: usize,
    num_bins: usize,
) -> Result<Histogram, CountError> {
    count_seqs(
        sequences,
        &CountConfig {
            kmer_size,
            num_bins,
            threads: num_cpus::get(),
        },
    )
}

/// Full counting pipeline: encode and split each sequence at
/// unrecognized bytes, rank every window, route ranks into range bins,
/// count each bin independently, and merge in bin order. The histogram
/// is identical for any `num_bins`; the knob only trades per-bin memory
/// against worker granularity.
///
/// Parameters are validated before any work: `kmer_size` in [1, 31] and
/// `num_bins >= 1`, otherwise the corresponding [`CountError`].
pub fn count_seqs<S: AsRef<[u8]>>(
    sequences: &[S],
    cfg: &CountConfig,
) -> Result<Histogram, CountError> {
    rank::validate_kmer_size(cfg.kmer_size)?;
    if cfg.num_bins == 0 {
        return Err(CountError::ZeroBins);
    }
    let stats = stats_enabled();
    let k = cfg.kmer_size;

    let t_route = Instant::now();
    let mut router = BinRouter::new(rank::rank_space(k), cfg.num_bins);
    let mut windows = 0u64;
    for seq in sequences {
        for subseq in alphabet::split_encode(seq.as_ref()) {
            for r in kmer_ranks(&subseq, k) {
                router.route(r);
                windows += 1;
            }
        }
    }
    log_stage(stats, "engine.route", t_route);
    if stats {
        eprintln!("RANKMER_STATS windows={} bins={}", windows, cfg.num_bins);
    }

    let t_count = Instant::now();
    let hists = count_bins(router.into_bins(), cfg.threads.max(1));
    log_stage(stats, "engine.count", t_count);

    let t_merge = Instant::now();
    let merged = bins::merge_bins(hists);
    log_stage(stats, "engine.merge", t_merge);
    if stats {
        eprintln!("RANKMER_STATS distinct={}", merged.len());
    }
    Ok(merged)
}

/// Counts the bins on a small worker pool. Bins share no mutable state,
/// so workers need no locks; results come back tagged with the bin index
/// and are reassembled positionally, which keeps the final order
/// independent of worker scheduling. All workers are joined before the
/// caller merges, so nothing partial escapes.
fn count_bins(bin_bufs: Vec<Vec<u64>>, threads: usize) -> Vec<Histogram> {
    let num_bins = bin_bufs.len();
    let workers = threads.min(num_bins);
    if workers <= 1 {
        return bin_bufs.iter().map(|buf| bins::count_bin(buf)).collect();
    }

    let (task_tx, task_rx) = channel::unbounded::<(usize, Vec<u64>)>();
    let (result_tx, result_rx) = channel::unbounded::<(usize, Histogram)>();
    for task in bin_bufs.into_iter().enumerate() {
        let _ = task_tx.send(task);
    }
    drop(task_tx);

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let rx = task_rx.clone();
        let tx = result_tx.clone();
        handles.push(thread::spawn(move || {
            for (index, buf) in rx.iter() {
                if tx.send((index, bins::count_bin(&buf))).is_err() {
                    break;
                }
            }
        }));
    }
    drop(task_rx);
    drop(result_tx);

    let mut parts: Vec<Option<Histogram>> = vec![None; num_bins];
    for (index, hist) in result_rx.iter() {
        parts[index] = Some(hist);
    }
    for handle in handles {
        let _ = handle.join();
    }
    parts.into_iter().map(|p| p.unwrap_or_default()).collect()
}

fn stats_enabled() -> bool {
    matches!(std::env::var("RANKMER_STATS").as_deref(), Ok("1"))
}

fn log_stage(stats: bool, name: &str, t: Instant) {
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
