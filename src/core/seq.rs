use anyhow::{Result, bail};
use memchr::memchr;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SeqFormat {
    Fasta,
    Fastq,
}

/// Format from content, not extension: the first non-whitespace byte is
/// '>' for FASTA and '@' for FASTQ. Empty input parses as FASTA with
/// zero records.
pub fn detect_format(bytes: &[u8]) -> Result<SeqFormat> {
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'>') => Ok(SeqFormat::Fasta),
        Some(b'@') => Ok(SeqFormat::Fastq),
        Some(&b) => bail!(
            "unrecognized sequence format: input starts with {:?}, expected '>' or '@'",
            b as char
        ),
        None => Ok(SeqFormat::Fasta),
    }
}

/// Pulls the raw sequence bytes out of a FASTA or FASTQ buffer. Headers
/// and quality lines are dropped; the counting core does its own
/// alphabet handling, so sequences are passed through unmodified.
pub fn extract_sequences(bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
    match detect_format(bytes)? {
        SeqFormat::Fasta => parse_fasta(bytes),
        SeqFormat::Fastq => parse_fastq(bytes),
    }
}

struct Lines<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        let rest = &self.bytes[self.pos..];
        let (line, advance) = match memchr(b'\n', rest) {
            Some(nl) => (&rest[..nl], nl + 1),
            None => (rest, rest.len()),
        };
        self.pos += advance;
        Some(line.strip_suffix(b"\r").unwrap_or(line))
    }
}

fn parse_fasta(bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut sequences = Vec::new();
    let mut in_record = false;
    for line in Lines::new(bytes) {
        if line.first() == Some(&b'>') {
            sequences.push(Vec::new());
            in_record = true;
        } else if in_record {
            // Multi-line records concatenate into one sequence.
            let last = sequences.len() - 1;
            sequences[last].extend_from_slice(line);
        } else if !line.is_empty() {
            bail!("FASTA sequence data before the first '>' header");
        }
    }
    Ok(sequences)
}

fn parse_fastq(bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut sequences = Vec::new();
    let mut lines = Lines::new(bytes);
    let mut record = 0usize;
    while let Some(header) = lines.next() {
        if header.is_empty() {
            continue;
        }
        record += 1;
        if header.first() != Some(&b'@') {
            bail!("FASTQ record {} does not start with '@'", record);
        }
        let Some(seq) = lines.next() else {
            bail!("FASTQ record {} is truncated after the header", record);
        };
        let Some(plus) = lines.next() else {
            bail!("FASTQ record {} is missing its '+' separator", record);
        };
        if plus.first() != Some(&b'+') {
            bail!("FASTQ record {} has a malformed '+' separator", record);
        }
        let Some(qual) = lines.next() else {
            bail!("FASTQ record {} is missing its quality line", record);
        };
        if qual.len() != seq.len() {
            bail!(
                "FASTQ record {} quality length {} does not match sequence length {}",
                record,
                qual.len(),
                seq.len()
            );
        }
        sequences.push(seq.to_vec());
    }
    Ok(sequences)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_from_first_byte() {
        assert_eq!(detect_format(b">id\nACGT\n").unwrap(), SeqFormat::Fasta);
        assert_eq!(
            detect_format(b"@id\nACGT\n+\nIIII\n").unwrap(),
            SeqFormat::Fastq
        );
        assert_eq!(detect_format(b"\n  \n>x\n").unwrap(), SeqFormat::Fasta);
        assert!(detect_format(b"ACGT\n").is_err());
        assert_eq!(detect_format(b"").unwrap(), SeqFormat::Fasta);
    }

    #[test]
    fn fasta_concatenates_multi_line_records() {
        let seqs = extract_sequences(b">one\nACGT\nTTAA\n>two desc\nGG\n").unwrap();
        assert_eq!(seqs, vec![b"ACGTTTAA".to_vec(), b"GG".to_vec()]);
    }

    #[test]
    fn fasta_keeps_empty_records_and_crlf() {
        let seqs = extract_sequences(b">a\r\nAC\r\n>empty\r\n>b\r\nGT\r\n").unwrap();
        assert_eq!(seqs, vec![b"AC".to_vec(), b"".to_vec(), b"GT".to_vec()]);
    }

    #[test]
    fn fastq_takes_sequence_lines_only() {
        let seqs = extract_sequences(b"@r1\nACGT\n+\nIIII\n@r2\nTTNN\n+r2\n!!!!\n").unwrap();
        assert_eq!(seqs, vec![b"ACGT".to_vec(), b"TTNN".to_vec()]);
    }

    #[test]
    fn fastq_rejects_truncated_records() {
        assert!(extract_sequences(b"@r1\nACGT\n").is_err());
        assert!(extract_sequences(b"@r1\nACGT\nIIII\nX\n").is_err());
        assert!(extract_sequences(b"@r1\nACGT\n+\nIII\n").is_err());
    }

    #[test]
    fn empty_input_has_no_records() {
        assert_eq!(extract_sequences(b"").unwrap(), Vec::<Vec<u8>>::new());
    }
}
