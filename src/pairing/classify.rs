use serde::Serialize;

use crate::core::fragment::Fragment;
use crate::core::record::{AlignmentRecord, HicTags};
use crate::core::types::{InteractionType, Orientation, Strand};
use crate::digest::index::{DigestIndex, LocateError};

/// Derived metrics for one canonically ordered read pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairMetrics {
    pub orientation: Orientation,
    pub interaction: InteractionType,
    pub ditag_length: i64,
    pub insert_size: i64,
    pub fragment_separation: u32,
    /// Fragment of the left read
    pub read1_fragment: Fragment,
    /// Fragment of the right read
    pub read2_fragment: Fragment,
}

impl PairMetrics {
    /// Tags for the left (`first == true`) or right read
    #[must_use]
    pub fn tags(&self, first: bool) -> HicTags {
        let fragment = if first {
            self.read1_fragment
        } else {
            self.read2_fragment
        };
        HicTags {
            orientation: Some(self.orientation),
            interaction: Some(self.interaction),
            ditag_length: Some(self.ditag_length),
            insert_size: Some(self.insert_size),
            fragment_separation: Some(self.fragment_separation),
            fragment_index: Some(fragment.index),
        }
    }
}

/// A read pair in canonical order together with its metrics
#[derive(Debug, Clone)]
pub struct ClassifiedPair {
    pub left: AlignmentRecord,
    pub right: AlignmentRecord,
    pub metrics: PairMetrics,
    /// True if `left` was the second record of the input pair
    pub swapped: bool,
}

impl ClassifiedPair {
    /// Attach the Hi-C tags to both records and return them in input order
    #[must_use]
    pub fn into_tagged_records(self) -> (AlignmentRecord, AlignmentRecord) {
        let Self {
            mut left,
            mut right,
            metrics,
            swapped,
        } = self;
        left.tags = metrics.tags(true);
        right.tags = metrics.tags(false);
        if swapped {
            (right, left)
        } else {
            (left, right)
        }
    }
}

#[must_use]
pub fn interaction_type(r1: &AlignmentRecord, r2: &AlignmentRecord) -> InteractionType {
    if r1.reference_name() == r2.reference_name() {
        InteractionType::Cis
    } else {
        InteractionType::Trans
    }
}

/// Whether [`reorder`] would swap the pair
#[must_use]
pub fn needs_swap(r1: &AlignmentRecord, r2: &AlignmentRecord) -> bool {
    interaction_type(r1, r2) == InteractionType::Cis && r1.left_pos() > r2.left_pos()
}

/// Put a cis pair in left-to-right order. Trans pairs are returned unchanged.
#[must_use]
pub fn reorder<'a>(
    r1: &'a AlignmentRecord,
    r2: &'a AlignmentRecord,
) -> (&'a AlignmentRecord, &'a AlignmentRecord) {
    if needs_swap(r1, r2) {
        (r2, r1)
    } else {
        (r1, r2)
    }
}

/// Relative orientation of an already reordered pair
#[must_use]
pub fn orientation(left: &AlignmentRecord, right: &AlignmentRecord) -> Orientation {
    Orientation::from_strands(left.strand(), right.strand())
}

/// Distance from the read's five-prime end to the far end of its fragment,
/// measured in the read's direction of sequencing.
#[must_use]
pub fn tag_length(read: &AlignmentRecord, fragment: &Fragment) -> i64 {
    let five_prime = to_signed(read.five_prime_pos());
    match read.strand() {
        Strand::Reverse => five_prime - to_signed(fragment.start) + 1,
        Strand::Forward => to_signed(fragment.end) - five_prime + 1,
    }
}

/// Fragment containing the read's five-prime end
///
/// # Errors
///
/// Returns a `LocateError` if the read's reference is not in the digest or
/// the position lies beyond its last fragment.
pub fn locate_read(read: &AlignmentRecord, index: &DigestIndex) -> Result<Fragment, LocateError> {
    index.locate(read.five_prime_pos(), read.reference_name())
}

/// Metrics for a pair that is already in canonical order
#[must_use]
pub fn pair_metrics(
    left: &AlignmentRecord,
    right: &AlignmentRecord,
    left_fragment: Fragment,
    right_fragment: Fragment,
) -> PairMetrics {
    PairMetrics {
        orientation: orientation(left, right),
        interaction: interaction_type(left, right),
        ditag_length: tag_length(left, &left_fragment) + tag_length(right, &right_fragment),
        insert_size: to_signed(right.right_pos()) - to_signed(left.left_pos()) + 1,
        fragment_separation: left_fragment.separation(&right_fragment),
        read1_fragment: left_fragment,
        read2_fragment: right_fragment,
    }
}

/// Reorder a validated pair, locate both reads and compute its metrics.
///
/// Must only be called on pairs that passed validation.
///
/// # Errors
///
/// Returns a `LocateError` if either read can't be placed on a fragment.
pub fn classify(
    r1: AlignmentRecord,
    r2: AlignmentRecord,
    index: &DigestIndex,
) -> Result<ClassifiedPair, LocateError> {
    let swapped = needs_swap(&r1, &r2);
    let (left, right) = if swapped { (r2, r1) } else { (r1, r2) };

    let left_fragment = locate_read(&left, index)?;
    let right_fragment = locate_read(&right, index)?;
    let metrics = pair_metrics(&left, &right, left_fragment, right_fragment);

    Ok(ClassifiedPair {
        left,
        right,
        metrics,
        swapped,
    })
}

fn to_signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
