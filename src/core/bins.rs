use std::collections::HashMap;

/// Width of each bin's rank range: ceil(rank_space / num_bins). The last
/// bin may own a shorter range; together the bins cover [0, rank_space)
/// with disjoint contiguous intervals.
#[inline]
pub fn bin_step(rank_space: u64, num_bins: usize) -> u64 {
    rank_space.div_ceil(num_bins as u64)
}

/// Routes ranks into per-bin buffers by range. Which bin a rank lands in
/// depends on the rank alone, never on arrival order or on which
/// subsequence produced it.
pub struct BinRouter {
    step: u64,
    bins: Vec<Vec<u64>>,
}

impl BinRouter {
    /// `num_bins` must be >= 1; the engine validates this up front.
    pub fn new(rank_space: u64, num_bins: usize) -> Self {
        Self {
            step: bin_step(rank_space, num_bins),
            bins: vec![Vec::new(); num_bins],
        }
    }

    #[inline]
    pub fn bin_of(&self, rank: u64) -> usize {
        (rank / self.step) as usize
    }

    #[inline]
    pub fn route(&mut self, rank: u64) {
        let index = self.bin_of(rank);
        self.bins[index].push(rank);
    }

    pub fn into_bins(self) -> Vec<Vec<u64>> {
        self.bins
    }
}

/// Counts one bin's rank buffer into a rank-sorted (rank, count) table.
/// Map iteration order is arbitrary, so the sort here is what the merge
/// step's no-global-sort guarantee rests on. Bins share no state; any
/// number of them can be counted on separate workers.
pub fn count_bin(ranks: &[u64]) -> Vec<(u64, u64)> {
    let mut counts: HashMap<u64, u64> = HashMap::new();
    for &rank in ranks {
        *counts.entry(rank).or_insert(0) += 1;
    }
    let mut hist: Vec<(u64, u64)> = counts.into_iter().collect();
    hist.sort_unstable();
    hist
}

/// Concatenates per-bin histograms in ascending bin order. Bin ranges
/// are disjoint and increasing, so the result is globally rank-sorted
/// without another sort. Pre-sized from the summed bin lengths.
pub fn merge_bins(hists: Vec<Vec<(u64, u64)>>) -> Vec<(u64, u64)> {
    let total: usize = hists.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    for hist in hists {
        merged.extend(hist);
    }
    merged
}
