/// Sentinel in the encode table for bytes outside the alphabet.
const UNRECOGNIZED: u8 = 0xFF;

/// Byte to 2-bit nucleotide code, case-insensitive: A/a=0, C/c=1,
/// G/g=2, T/t=3. Everything else maps to the sentinel.
const ENCODE: [u8; 256] = encode_table();

/// Nucleotide code back to its canonical uppercase symbol.
pub const DECODE: [u8; 4] = [b'A', b'C', b'G', b'T'];

const fn encode_table() -> [u8; 256] {
    let mut table = [UNRECOGNIZED; 256];
    table[b'A' as usize] = 0;
    table[b'a' as usize] = 0;
    table[b'C' as usize] = 1;
    table[b'c' as usize] = 1;
    table[b'G' as usize] = 2;
    table[b'g' as usize] = 2;
    table[b'T' as usize] = 3;
    table[b't' as usize] = 3;
    table
}

#[inline]
pub fn encode_base(b: u8) -> Option<u8> {
    match ENCODE[b as usize] {
        UNRECOGNIZED => None,
        code => Some(code),
    }
}

/// Splits `seq` into maximal runs of recognized bases, each run encoded
/// to nucleotide codes. Every unrecognized byte closes the current run
/// and opens a new one, so consecutive unrecognized bytes leave empty
/// runs behind and empty input yields a single empty run. Downstream
/// rank generation treats runs shorter than k as zero-window inputs, so
/// the empty runs are harmless but part of the contract.
pub fn split_encode(seq: &[u8]) -> Vec<Vec<u8>> {
    let mut runs = vec![Vec::new()];
    let mut cur = 0usize;
    for &b in seq {
        match encode_base(b) {
            Some(code) => runs[cur].push(code),
            None => {
                runs.push(Vec::new());
                cur += 1;
            }
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_case_insensitive() {
        for (upper, lower, code) in [(b'A', b'a', 0), (b'C', b'c', 1), (b'G', b'g', 2), (b'T', b't', 3)] {
            assert_eq!(encode_base(upper), Some(code));
            assert_eq!(encode_base(lower), Some(code));
        }
        assert_eq!(encode_base(b'N'), None);
        assert_eq!(encode_base(b'n'), None);
        assert_eq!(encode_base(b'\n'), None);
        assert_eq!(encode_base(0), None);
    }

    #[test]
    fn decode_inverts_encode() {
        for code in 0..4u8 {
            assert_eq!(encode_base(DECODE[code as usize]), Some(code));
        }
    }

    #[test]
    fn split_keeps_single_run_intact() {
        assert_eq!(split_encode(b"ACGT"), vec![vec![0, 1, 2, 3]]);
        assert_eq!(split_encode(b"acgt"), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn split_breaks_at_unrecognized_bytes() {
        assert_eq!(
            split_encode(b"ACGTNNACGT"),
            vec![vec![0, 1, 2, 3], vec![], vec![0, 1, 2, 3]]
        );
    }

    #[test]
    fn unrecognized_runs_leave_empty_runs() {
        assert_eq!(split_encode(b"NNN"), vec![vec![], vec![], vec![], vec![]]);
        assert_eq!(split_encode(b"NA"), vec![vec![], vec![0]]);
        assert_eq!(split_encode(b"AN"), vec![vec![0], vec![]]);
    }

    #[test]
    fn empty_input_yields_one_empty_run() {
        assert_eq!(split_encode(b""), vec![Vec::<u8>::new()]);
    }
}
