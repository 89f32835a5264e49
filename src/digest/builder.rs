//! In-silico restriction digest of a FASTA reference.
//!
//! Produces the digest file consumed by [`DigestIndex`](super::index::DigestIndex):
//! one line per fragment, `reference\tstart\tend\tindex`, 1-based inclusive.

use std::io::{BufRead, Write};

use noodles::fasta;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum DigestBuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid restriction site '{site}': {reason}")]
    InvalidSite { site: String, reason: &'static str },

    #[error("Reference {0} contains no sequence")]
    EmptySequence(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("No sequences found in FASTA input")]
    NoSequences,
}

/// A restriction enzyme recognition sequence with its cut position.
///
/// Written with a single `^` at the cut site, e.g. `^GATC` (`MboI`) or
/// `A^AGCTT` (`HindIII`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionSite {
    sequence: Vec<u8>,
    cut_offset: usize,
}

impl RestrictionSite {
    /// Parse a site such as `A^AGCTT` (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns `DigestBuildError::InvalidSite` if the site doesn't contain
    /// exactly one `^`, contains characters other than `ACGT^`, or has no bases.
    pub fn parse(site: &str) -> Result<Self, DigestBuildError> {
        let invalid = |reason| DigestBuildError::InvalidSite {
            site: site.to_string(),
            reason,
        };

        if site.matches('^').count() != 1 {
            return Err(invalid("must contain exactly one '^' at the cut site"));
        }

        let upper = site.to_ascii_uppercase();
        if upper.chars().any(|c| !matches!(c, 'A' | 'C' | 'G' | 'T' | '^')) {
            return Err(invalid("must only contain A, C, G, T and '^'"));
        }

        let cut_offset = upper.find('^').unwrap_or(0);
        let sequence: Vec<u8> = upper.bytes().filter(|&b| b != b'^').collect();
        if sequence.is_empty() {
            return Err(invalid("must contain at least one base"));
        }

        Ok(Self {
            sequence,
            cut_offset,
        })
    }

    /// Recognition sequence without the cut marker
    #[must_use]
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    /// Offset of the cut from the start of the recognition sequence
    #[must_use]
    pub fn cut_offset(&self) -> usize {
        self.cut_offset
    }
}

impl std::str::FromStr for RestrictionSite {
    type Err = DigestBuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for RestrictionSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (left, right) = self.sequence.split_at(self.cut_offset);
        write!(
            f,
            "{}^{}",
            String::from_utf8_lossy(left),
            String::from_utf8_lossy(right)
        )
    }
}

/// One output line of a digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestRecord {
    pub reference: String,
    pub start: u64,
    pub end: u64,
    pub index: u64,
}

impl std::fmt::Display for DigestRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.reference, self.start, self.end, self.index
        )
    }
}

/// Cut one reference sequence into restriction fragments.
///
/// Sites are matched case-insensitively and without overlap. A site at the
/// very start of the sequence produces no cut. The last fragment always runs
/// to the end of the sequence.
///
/// # Errors
///
/// Returns `DigestBuildError::EmptySequence` if `sequence` is empty.
pub fn digest_sequence(
    reference: &str,
    sequence: &[u8],
    site: &RestrictionSite,
) -> Result<Vec<DigestRecord>, DigestBuildError> {
    if sequence.is_empty() {
        return Err(DigestBuildError::EmptySequence(reference.to_string()));
    }

    let pattern = site.sequence();
    let length = sequence.len() as u64;
    let mut records = Vec::new();
    let mut previous_end: u64 = 0;
    let mut pos = 0;

    while pos + pattern.len() <= sequence.len() {
        let window = &sequence[pos..pos + pattern.len()];
        if !window.eq_ignore_ascii_case(pattern) {
            pos += 1;
            continue;
        }

        if pos > 0 {
            let end = (pos + site.cut_offset()) as u64;
            if end > previous_end && end < length {
                records.push(DigestRecord {
                    reference: reference.to_string(),
                    start: previous_end + 1,
                    end,
                    index: records.len() as u64 + 1,
                });
                previous_end = end;
            }
        }
        pos += pattern.len();
    }

    records.push(DigestRecord {
        reference: reference.to_string(),
        start: previous_end + 1,
        end: length,
        index: records.len() as u64 + 1,
    });

    Ok(records)
}

/// Digest every record of a FASTA stream and write the fragments.
///
/// Returns the number of fragments written.
///
/// # Errors
///
/// Returns `DigestBuildError::Noodles` if the FASTA can't be parsed,
/// `DigestBuildError::EmptySequence` for a record without sequence,
/// `DigestBuildError::NoSequences` for empty input, or an IO error on write.
pub fn write_digest<R: BufRead, W: Write>(
    reader: &mut fasta::io::Reader<R>,
    writer: &mut W,
    site: &RestrictionSite,
) -> Result<usize, DigestBuildError> {
    let mut total = 0;
    let mut references = 0;

    for result in reader.records() {
        let record = result
            .map_err(|e| DigestBuildError::Noodles(format!("Failed to parse FASTA record: {e}")))?;
        let name = String::from_utf8_lossy(record.name()).to_string();

        info!(reference = %name, "Digesting reference");
        let fragments = digest_sequence(&name, record.sequence().as_ref(), site)?;
        if fragments.len() == 1 {
            warn!(reference = %name, site = %site, "No restriction sites found");
        }

        for fragment in &fragments {
            writeln!(writer, "{fragment}")?;
        }
        total += fragments.len();
        references += 1;
    }

    if references == 0 {
        return Err(DigestBuildError::NoSequences);
    }

    writer.flush()?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn ends(records: &[DigestRecord]) -> Vec<(u64, u64, u64)> {
        records.iter().map(|r| (r.start, r.end, r.index)).collect()
    }

    #[test]
    fn test_parse_restriction_site() {
        let site = RestrictionSite::parse("a^agctt").unwrap();
        assert_eq!(site.sequence(), b"AAGCTT");
        assert_eq!(site.cut_offset(), 1);
        assert_eq!(site.to_string(), "A^AGCTT");

        let site: RestrictionSite = "^GATC".parse().unwrap();
        assert_eq!(site.cut_offset(), 0);
    }

    #[test]
    fn test_invalid_restriction_sites() {
        assert!(RestrictionSite::parse("GATC").is_err());
        assert!(RestrictionSite::parse("^GA^TC").is_err());
        assert!(RestrictionSite::parse("^GANC").is_err());
        assert!(RestrictionSite::parse("^").is_err());
    }

    #[test]
    fn test_digest_sequence() {
        // MboI cuts before GATC
        let site = RestrictionSite::parse("^GATC").unwrap();
        let records = digest_sequence("chr1", b"AAAAGATCCCCCGATCTT", &site).unwrap();
        assert_eq!(ends(&records), vec![(1, 4, 1), (5, 12, 2), (13, 18, 3)]);
    }

    #[test]
    fn test_digest_sequence_cut_offset_and_case() {
        // HindIII cuts after the first A
        let site = RestrictionSite::parse("A^AGCTT").unwrap();
        let records = digest_sequence("chr1", b"ccccaagcttgg", &site).unwrap();
        assert_eq!(ends(&records), vec![(1, 5, 1), (6, 12, 2)]);
    }

    #[test]
    fn test_site_at_sequence_start_is_skipped() {
        let site = RestrictionSite::parse("^GATC").unwrap();
        let records = digest_sequence("chr1", b"GATCAAAA", &site).unwrap();
        assert_eq!(ends(&records), vec![(1, 8, 1)]);
    }

    #[test]
    fn test_digest_without_sites() {
        let site = RestrictionSite::parse("^GATC").unwrap();
        let records = digest_sequence("chrM", b"ACACACAC", &site).unwrap();
        assert_eq!(ends(&records), vec![(1, 8, 1)]);
    }

    #[test]
    fn test_digest_empty_sequence() {
        let site = RestrictionSite::parse("^GATC").unwrap();
        assert!(matches!(
            digest_sequence("chr1", b"", &site),
            Err(DigestBuildError::EmptySequence(_))
        ));
    }

    #[test]
    fn test_write_digest_from_fasta() {
        let fasta_content: &[u8] = b">chr1 description\nAAAAGATC\nCCCC\n>chr2\nTTTT\n";
        let mut reader = fasta::io::Reader::new(BufReader::new(fasta_content));
        let site = RestrictionSite::parse("^GATC").unwrap();

        let mut out = Vec::new();
        let written = write_digest(&mut reader, &mut out, &site).unwrap();

        assert_eq!(written, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "chr1\t1\t4\t1\nchr1\t5\t12\t2\nchr2\t1\t4\t1\n"
        );
    }

    #[test]
    fn test_write_digest_output_builds_index() {
        use crate::digest::index::DigestIndex;

        let fasta_content: &[u8] = b">chr1\nAAAAGATCCCCCGATCTT\n";
        let mut reader = fasta::io::Reader::new(BufReader::new(fasta_content));
        let site = RestrictionSite::parse("^GATC").unwrap();

        let mut out = Vec::new();
        write_digest(&mut reader, &mut out, &site).unwrap();

        let index = DigestIndex::from_reader(out.as_slice()).unwrap();
        assert_eq!(index.fragment_count("chr1"), Some(3));
        assert_eq!(index.locate(13, "chr1").unwrap().index, 3);
    }

    #[test]
    fn test_write_digest_empty_input() {
        let mut reader = fasta::io::Reader::new(BufReader::new(&b""[..]));
        let site = RestrictionSite::parse("^GATC").unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            write_digest(&mut reader, &mut out, &site),
            Err(DigestBuildError::NoSequences)
        ));
    }
}
