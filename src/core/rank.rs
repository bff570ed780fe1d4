use crate::core::alphabet::DECODE;
use crate::core::error::CountError;

/// Largest supported window size: 4^31 = 2^62 still fits a u64 rank.
pub const MAX_K: usize = 31;

/// Size of the rank space for window size `k`, i.e. 4^k.
/// Callers validate `k <= MAX_K` first; the shift is exact below that.
#[inline]
pub fn rank_space(k: usize) -> u64 {
    1u64 << (2 * k)
}

pub fn validate_kmer_size(k: usize) -> Result<(), CountError> {
    if k == 0 || k > MAX_K {
        return Err(CountError::KmerSizeOutOfRange { got: k });
    }
    Ok(())
}

/// Ranks of every length-`k` window of `codes`, most significant base
/// first. Inputs shorter than `k` have no windows and produce an empty
/// vector. O(n): after the first window, each rank drops the outgoing
/// leading base, shifts, and appends the incoming one.
///
/// `k` must already be validated via [`validate_kmer_size`].
pub fn kmer_ranks(codes: &[u8], k: usize) -> Vec<u64> {
    debug_assert!(k >= 1 && k <= MAX_K);
    let n = codes.len();
    if n < k {
        return Vec::new();
    }
    let mask = rank_space(k) - 1;
    let mut out = Vec::with_capacity(n - k + 1);
    let mut rank = 0u64;
    for &code in &codes[..k] {
        rank = (rank << 2) | code as u64;
    }
    out.push(rank);
    for &code in &codes[k..] {
        rank = ((rank << 2) | code as u64) & mask;
        out.push(rank);
    }
    out
}

/// Buffer-filling variant for callers that own the output allocation.
/// Validates what [`kmer_ranks`] takes as given: `k` in range, at least
/// one window, and exactly `codes.len() - k + 1` output slots. Nothing
/// is written unless every check passes.
pub fn fill_kmer_ranks(codes: &[u8], out: &mut [u64], k: usize) -> Result<(), CountError> {
    validate_kmer_size(k)?;
    let n = codes.len();
    if n < k {
        return Err(CountError::SequenceTooShort { n, k });
    }
    let need = n - k + 1;
    if out.len() != need {
        return Err(CountError::RankBufferMismatch {
            need,
            got: out.len(),
        });
    }
    let mask = rank_space(k) - 1;
    let mut rank = 0u64;
    for &code in &codes[..k] {
        rank = (rank << 2) | code as u64;
    }
    out[0] = rank;
    for (slot, &code) in out[1..].iter_mut().zip(&codes[k..]) {
        rank = ((rank << 2) | code as u64) & mask;
        *slot = rank;
    }
    Ok(())
}

/// Decodes `rank` back into its k-mer string: base-4 digits least
/// significant first, mapped through the inverse alphabet, padded with
/// 'A' to width `k`, reversed. Left inverse of the rank generator for
/// every rank in [0, 4^k).
pub fn rank_to_kmer(mut rank: u64, k: usize) -> String {
    let mut buf = vec![b'A'; k];
    for slot in buf.iter_mut().rev() {
        *slot = DECODE[(rank & 0x3) as usize];
        rank >>= 2;
    }
    String::from_utf8_lossy(&buf).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::encode_base;

    fn rank_of(kmer: &str) -> u64 {
        let codes: Vec<u8> = kmer
            .bytes()
            .map(|b| encode_base(b).expect("test k-mer must be ACGT"))
            .collect();
        kmer_ranks(&codes, codes.len())[0]
    }

    #[test]
    fn validate_rejects_out_of_range_k() {
        assert_eq!(
            validate_kmer_size(0),
            Err(CountError::KmerSizeOutOfRange { got: 0 })
        );
        assert_eq!(
            validate_kmer_size(32),
            Err(CountError::KmerSizeOutOfRange { got: 32 })
        );
        assert_eq!(validate_kmer_size(1), Ok(()));
        assert_eq!(validate_kmer_size(MAX_K), Ok(()));
    }

    #[test]
    fn rank_space_matches_pow4() {
        assert_eq!(rank_space(1), 4);
        assert_eq!(rank_space(2), 16);
        assert_eq!(rank_space(MAX_K), 1u64 << 62);
    }

    #[test]
    fn first_window_is_positional_base4() {
        // ACGT = 0*64 + 1*16 + 2*4 + 3
        assert_eq!(rank_of("ACGT"), 27);
        assert_eq!(rank_of("AAAA"), 0);
        assert_eq!(rank_of("TTTT"), 255);
        assert_eq!(rank_of("T"), 3);
    }

    #[test]
    fn rolling_matches_direct_computation() {
        let codes: Vec<u8> = b"ACGTACGTTGCA"
            .iter()
            .map(|&b| encode_base(b).unwrap())
            .collect();
        for k in 1..=codes.len() {
            let rolled = kmer_ranks(&codes, k);
            assert_eq!(rolled.len(), codes.len() - k + 1);
            for (i, &rank) in rolled.iter().enumerate() {
                let direct = codes[i..i + k]
                    .iter()
                    .fold(0u64, |acc, &c| acc * 4 + c as u64);
                assert_eq!(rank, direct, "window {i} at k={k}");
            }
        }
    }

    #[test]
    fn short_input_has_no_windows() {
        assert_eq!(kmer_ranks(&[], 4), Vec::<u64>::new());
        assert_eq!(kmer_ranks(&[0, 1, 2], 4), Vec::<u64>::new());
    }

    #[test]
    fn fill_matches_vec_variant() {
        let codes: Vec<u8> = b"GATTACA".iter().map(|&b| encode_base(b).unwrap()).collect();
        let mut out = vec![0u64; codes.len() - 3 + 1];
        fill_kmer_ranks(&codes, &mut out, 3).unwrap();
        assert_eq!(out, kmer_ranks(&codes, 3));
    }

    #[test]
    fn fill_rejects_bad_preconditions_without_writing() {
        let codes = [0u8, 1, 2];
        let mut out = [u64::MAX; 4];
        assert_eq!(
            fill_kmer_ranks(&codes, &mut out, 4),
            Err(CountError::SequenceTooShort { n: 3, k: 4 })
        );
        assert_eq!(
            fill_kmer_ranks(&codes, &mut out, 2),
            Err(CountError::RankBufferMismatch { need: 2, got: 4 })
        );
        assert_eq!(
            fill_kmer_ranks(&codes, &mut out, 0),
            Err(CountError::KmerSizeOutOfRange { got: 0 })
        );
        assert_eq!(out, [u64::MAX; 4]);
    }

    #[test]
    fn rank_to_kmer_pads_and_orders() {
        assert_eq!(rank_to_kmer(0, 4), "AAAA");
        assert_eq!(rank_to_kmer(27, 4), "ACGT");
        assert_eq!(rank_to_kmer(255, 4), "TTTT");
        assert_eq!(rank_to_kmer(3, 1), "T");
    }

    #[test]
    fn round_trip_exhaustive_small_k() {
        for k in 1..=8usize {
            for r in 0..rank_space(k) {
                assert_eq!(rank_of(&rank_to_kmer(r, k)), r, "k={k} r={r}");
            }
        }
    }

    #[test]
    fn round_trip_sampled_large_k() {
        for k in 9..=MAX_K {
            let top = rank_space(k) - 1;
            for r in [0, 1, top / 7, top / 3, top - 1, top] {
                assert_eq!(rank_of(&rank_to_kmer(r, k)), r, "k={k} r={r}");
            }
        }
    }
}
