use thiserror::Error;

use crate::core::record::AlignmentRecord;

/// Why two adjacent records are not a valid mate pair
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidPair {
    #[error("Qname mismatch: {0} {1} - is the input name sorted?")]
    NameMismatch(String, String),

    #[error("{0} is not paired")]
    NotPaired(String),

    #[error("R1 and R2 flags in {0} not correctly set")]
    SegmentFlags(String),

    #[error("Mate position mismatch in {0}")]
    MatePosition(String),
}

/// Check that two adjacent records form one mate pair.
///
/// Conditions are checked in order and the first failure is returned:
/// equal query names, both flagged paired, exactly one flagged first in pair,
/// and each record's mate position equal to the other's leftmost position.
///
/// # Errors
///
/// Returns the [`InvalidPair`] variant for the first failing condition.
pub fn validate(r1: &AlignmentRecord, r2: &AlignmentRecord) -> Result<(), InvalidPair> {
    if !r1.same_name(r2) {
        return Err(InvalidPair::NameMismatch(r1.qname(), r2.qname()));
    }
    if !(r1.is_paired() && r2.is_paired()) {
        return Err(InvalidPair::NotPaired(r1.qname()));
    }
    if r1.is_first_in_pair() == r2.is_first_in_pair() {
        return Err(InvalidPair::SegmentFlags(r1.qname()));
    }
    if r1.mate_pos() != r2.left_pos() || r2.mate_pos() != r1.left_pos() {
        return Err(InvalidPair::MatePosition(r1.qname()));
    }
    Ok(())
}

#[must_use]
pub fn is_valid(r1: &AlignmentRecord, r2: &AlignmentRecord) -> bool {
    validate(r1, r2).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::tests::record;
    use noodles::core::Position;
    use noodles::sam::alignment::record::Flags;

    fn mates() -> (AlignmentRecord, AlignmentRecord) {
        (
            record("q1", "chr1", 40, 50, false, true, 150),
            record("q1", "chr1", 150, 71, true, false, 40),
        )
    }

    #[test]
    fn test_valid_pair() {
        let (r1, r2) = mates();
        assert!(validate(&r1, &r2).is_ok());
        assert!(is_valid(&r2, &r1));
    }

    #[test]
    fn test_name_mismatch() {
        let (r1, mut r2) = mates();
        *r2.record_mut().name_mut() = Some("q2".into());
        assert_eq!(
            validate(&r1, &r2),
            Err(InvalidPair::NameMismatch("q1".to_string(), "q2".to_string()))
        );
    }

    #[test]
    fn test_one_mate_not_paired() {
        let (r1, mut r2) = mates();
        r2.record_mut().flags_mut().remove(Flags::SEGMENTED);
        assert_eq!(
            validate(&r1, &r2),
            Err(InvalidPair::NotPaired("q1".to_string()))
        );
    }

    #[test]
    fn test_both_flagged_first_segment() {
        let (r1, mut r2) = mates();
        r2.record_mut().flags_mut().insert(Flags::FIRST_SEGMENT);
        assert_eq!(
            validate(&r1, &r2),
            Err(InvalidPair::SegmentFlags("q1".to_string()))
        );
    }

    #[test]
    fn test_neither_flagged_first_segment() {
        let (mut r1, r2) = mates();
        r1.record_mut().flags_mut().remove(Flags::FIRST_SEGMENT);
        assert!(matches!(
            validate(&r1, &r2),
            Err(InvalidPair::SegmentFlags(_))
        ));
    }

    #[test]
    fn test_mate_position_mismatch() {
        let (r1, mut r2) = mates();
        *r2.record_mut().mate_alignment_start_mut() = Position::new(41);
        assert_eq!(
            validate(&r1, &r2),
            Err(InvalidPair::MatePosition("q1".to_string()))
        );

        let (mut r1, r2) = mates();
        *r1.record_mut().mate_alignment_start_mut() = Position::new(151);
        assert!(!is_valid(&r1, &r2));
    }

    #[test]
    fn test_first_failure_wins() {
        let (r1, mut r2) = mates();
        *r2.record_mut().name_mut() = Some("other".into());
        *r2.record_mut().mate_alignment_start_mut() = Position::new(1);
        assert!(matches!(
            validate(&r1, &r2),
            Err(InvalidPair::NameMismatch(..))
        ));
    }
}
