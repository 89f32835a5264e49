use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::core::fragment::Fragment;
use crate::parsing::digest::{parse_digest_line, DigestEntry, DigestFormatError};
use crate::utils::io::open_input;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    #[error("Reference '{0}' not found in restriction digest")]
    UnknownReference(String),

    #[error("Position {position} is beyond the last fragment end {last_end} on reference '{reference}'")]
    PositionBeyondDigest {
        reference: String,
        position: u64,
        last_end: u64,
    },
}

/// Restriction fragment boundaries for every reference in a digest.
///
/// For each reference the fragment end positions are stored in index order,
/// so the rank of an end in its vector is the fragment's 0-based rank. The
/// index is read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct DigestIndex {
    ends: HashMap<String, Vec<u64>>,
}

impl DigestIndex {
    /// Build from digest text
    ///
    /// # Errors
    ///
    /// Returns a `DigestFormatError` if any line is malformed, a reference's
    /// first fragment doesn't start at position 1 with index 1, or fragment
    /// ends are not strictly increasing.
    pub fn from_text(text: &str) -> Result<Self, DigestFormatError> {
        Self::from_reader(text.as_bytes())
    }

    /// Build from a digest file, decompressing `.gz` files
    ///
    /// # Errors
    ///
    /// Returns `DigestFormatError::Io` if the file cannot be read, or any of
    /// the format errors of [`DigestIndex::from_reader`].
    pub fn from_path(path: &Path) -> Result<Self, DigestFormatError> {
        let reader = open_input(path)?;
        let index = Self::from_reader(reader)?;
        debug!(
            path = %path.display(),
            references = index.reference_count(),
            "Loaded restriction digest"
        );
        Ok(index)
    }

    /// Build from any buffered reader of digest lines.
    ///
    /// Fragment ends are appended in arrival order; the digest must already be
    /// sorted by fragment index within each reference.
    ///
    /// # Errors
    ///
    /// See [`DigestIndex::from_text`].
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DigestFormatError> {
        let mut ends: HashMap<String, Vec<u64>> = HashMap::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_num = i + 1;
            let Some(entry) = parse_digest_line(&line, line_num)? else {
                continue;
            };

            match ends.get_mut(&entry.reference) {
                Some(reference_ends) => push_end(reference_ends, &entry, line_num)?,
                None => {
                    if entry.start != 1 || entry.index != 1 {
                        return Err(DigestFormatError::InvalidFirstFragment {
                            line: line_num,
                            reference: entry.reference,
                            start: entry.start,
                            index: entry.index,
                        });
                    }
                    ends.insert(entry.reference, vec![entry.end]);
                }
            }
        }

        Ok(Self { ends })
    }

    /// Find the fragment containing a 1-based position.
    ///
    /// Uses a leftmost binary search for the first fragment end that is not
    /// less than `position`.
    ///
    /// # Errors
    ///
    /// Returns `LocateError::UnknownReference` if the reference isn't in the
    /// digest, or `LocateError::PositionBeyondDigest` if the position lies past
    /// the reference's last fragment.
    pub fn locate(&self, position: u64, reference: &str) -> Result<Fragment, LocateError> {
        let ends = self
            .ends
            .get(reference)
            .ok_or_else(|| LocateError::UnknownReference(reference.to_string()))?;

        let rank = ends.partition_point(|&end| end < position);
        let Some(&end) = ends.get(rank) else {
            return Err(LocateError::PositionBeyondDigest {
                reference: reference.to_string(),
                position,
                last_end: ends.last().copied().unwrap_or(0),
            });
        };
        let start = if rank == 0 { 1 } else { ends[rank - 1] + 1 };

        // Fragment counts are bounded to u32 when the index is built
        let index = u32::try_from(rank + 1).unwrap_or(u32::MAX);
        Ok(Fragment::new(index, start, end))
    }

    #[must_use]
    pub fn contains(&self, reference: &str) -> bool {
        self.ends.contains_key(reference)
    }

    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.ends.len()
    }

    /// Number of fragments on a reference, if present
    #[must_use]
    pub fn fragment_count(&self, reference: &str) -> Option<usize> {
        self.ends.get(reference).map(Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }
}

fn push_end(
    ends: &mut Vec<u64>,
    entry: &DigestEntry,
    line_num: usize,
) -> Result<(), DigestFormatError> {
    if let Some(&previous) = ends.last() {
        if entry.end <= previous {
            return Err(DigestFormatError::UnsortedFragments {
                line: line_num,
                reference: entry.reference.clone(),
                end: entry.end,
                previous,
            });
        }
    }
    if u32::try_from(ends.len() + 1).is_err() {
        return Err(DigestFormatError::TooManyFragments(entry.reference.clone()));
    }
    ends.push(entry.end);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "chr1\t1\t100\t1\nchr1\t101\t250\t2\nchr1\t251\t400\t3\nchr2\t1\t50\t1\n";

    #[test]
    fn test_build_index() {
        let index = DigestIndex::from_text(DIGEST).unwrap();
        assert_eq!(index.reference_count(), 2);
        assert_eq!(index.fragment_count("chr1"), Some(3));
        assert_eq!(index.fragment_count("chr2"), Some(1));
        assert!(index.contains("chr2"));
        assert!(!index.contains("chrX"));
    }

    #[test]
    fn test_locate_boundaries() {
        let index = DigestIndex::from_text(DIGEST).unwrap();

        assert_eq!(index.locate(1, "chr1").unwrap(), Fragment::new(1, 1, 100));
        assert_eq!(index.locate(40, "chr1").unwrap(), Fragment::new(1, 1, 100));
        assert_eq!(index.locate(100, "chr1").unwrap(), Fragment::new(1, 1, 100));
        assert_eq!(index.locate(101, "chr1").unwrap(), Fragment::new(2, 101, 250));
        assert_eq!(index.locate(250, "chr1").unwrap(), Fragment::new(2, 101, 250));
        assert_eq!(index.locate(251, "chr1").unwrap(), Fragment::new(3, 251, 400));
        assert_eq!(index.locate(50, "chr2").unwrap(), Fragment::new(1, 1, 50));
    }

    #[test]
    fn test_every_position_in_fragment_maps_to_it() {
        let index = DigestIndex::from_text(DIGEST).unwrap();
        for (fragment_index, start, end) in [(1, 1, 100), (2, 101, 250), (3, 251, 400)] {
            for position in start..=end {
                let fragment = index.locate(position, "chr1").unwrap();
                assert_eq!(fragment.index, fragment_index, "position {position}");
                assert_eq!((fragment.start, fragment.end), (start, end));
            }
        }
    }

    #[test]
    fn test_locate_unknown_reference() {
        let index = DigestIndex::from_text(DIGEST).unwrap();
        assert_eq!(
            index.locate(10, "chrX"),
            Err(LocateError::UnknownReference("chrX".to_string()))
        );
    }

    #[test]
    fn test_locate_beyond_last_fragment() {
        let index = DigestIndex::from_text(DIGEST).unwrap();
        assert!(matches!(
            index.locate(401, "chr1"),
            Err(LocateError::PositionBeyondDigest { last_end: 400, .. })
        ));
    }

    #[test]
    fn test_invalid_first_fragment() {
        let err = DigestIndex::from_text("chr1\t5\t100\t1\n").unwrap_err();
        assert!(matches!(
            err,
            DigestFormatError::InvalidFirstFragment { start: 5, index: 1, .. }
        ));

        let err = DigestIndex::from_text("chr1\t1\t100\t2\n").unwrap_err();
        assert!(matches!(
            err,
            DigestFormatError::InvalidFirstFragment { index: 2, .. }
        ));
    }

    #[test]
    fn test_first_fragment_checked_per_reference() {
        let text = "chr1\t1\t100\t1\nchr2\t101\t200\t2\n";
        let err = DigestIndex::from_text(text).unwrap_err();
        match err {
            DigestFormatError::InvalidFirstFragment {
                line, reference, ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(reference, "chr2");
            }
            other => panic!("expected InvalidFirstFragment, got {other:?}"),
        }
    }

    #[test]
    fn test_unsorted_digest_is_rejected() {
        let text = "chr1\t1\t100\t1\nchr1\t101\t250\t2\nchr1\t1\t90\t3\n";
        assert!(matches!(
            DigestIndex::from_text(text),
            Err(DigestFormatError::UnsortedFragments { line: 3, .. })
        ));
    }

    #[test]
    fn test_non_positive_start_is_rejected() {
        assert!(matches!(
            DigestIndex::from_text("chr1\t0\t100\t1\n"),
            Err(DigestFormatError::NonPositivePosition { .. })
        ));
    }

    #[test]
    fn test_empty_digest() {
        let index = DigestIndex::from_text("# no fragments\n").unwrap();
        assert!(index.is_empty());
    }
}
