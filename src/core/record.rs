use noodles::core::Position;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record::Flags;
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::alignment::record_buf::Data;
use noodles::sam::alignment::RecordBuf;
use tracing::warn;

use crate::core::types::{InteractionType, Orientation, Strand};

/// Pair-level annotations written as SAM optional fields.
///
/// Each field maps to one tag: `or:Z`, `it:Z`, `dt:i`, `is:i`, `fs:i`, `fn:i`.
/// All but the fragment index are identical on both mates of a pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HicTags {
    pub orientation: Option<Orientation>,
    pub interaction: Option<InteractionType>,
    pub ditag_length: Option<i64>,
    pub insert_size: Option<i64>,
    pub fragment_separation: Option<u32>,
    pub fragment_index: Option<u32>,
}

impl HicTags {
    pub const ORIENTATION: Tag = Tag::new(b'o', b'r');
    pub const INTERACTION: Tag = Tag::new(b'i', b't');
    pub const DITAG_LENGTH: Tag = Tag::new(b'd', b't');
    pub const INSERT_SIZE: Tag = Tag::new(b'i', b's');
    pub const FRAGMENT_SEPARATION: Tag = Tag::new(b'f', b's');
    pub const FRAGMENT_INDEX: Tag = Tag::new(b'f', b'n');

    const NAMED: [(Tag, &'static str); 6] = [
        (Self::ORIENTATION, "or"),
        (Self::INTERACTION, "it"),
        (Self::DITAG_LENGTH, "dt"),
        (Self::INSERT_SIZE, "is"),
        (Self::FRAGMENT_SEPARATION, "fs"),
        (Self::FRAGMENT_INDEX, "fn"),
    ];

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Two-letter name if `tag` is one of ours
    #[must_use]
    pub fn name_of(tag: Tag) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, name)| *name)
    }

    /// Move every Hi-C field out of `data`, keeping the other fields in order.
    ///
    /// Returns the parsed tags and the names of Hi-C fields that were dropped
    /// because of an unexpected type or value.
    pub fn take_from(data: &mut Data) -> (Self, Vec<&'static str>) {
        let mut tags = Self::default();
        let mut malformed = Vec::new();

        let fields = std::mem::take(data);
        for (tag, value) in fields.iter() {
            match Self::name_of(tag) {
                Some(name) => {
                    if !tags.absorb(tag, value) {
                        malformed.push(name);
                    }
                }
                None => {
                    data.insert(tag, value.clone());
                }
            }
        }

        (tags, malformed)
    }

    /// Write the set fields into `data`, replacing existing values
    pub fn insert_into(&self, data: &mut Data) {
        if let Some(v) = self.orientation {
            data.insert(Self::ORIENTATION, Value::String(v.as_str().into()));
        }
        if let Some(v) = self.interaction {
            data.insert(Self::INTERACTION, Value::String(v.as_str().into()));
        }
        if let Some(v) = self.ditag_length {
            data.insert(Self::DITAG_LENGTH, Value::from(sam_int(v)));
        }
        if let Some(v) = self.insert_size {
            data.insert(Self::INSERT_SIZE, Value::from(sam_int(v)));
        }
        if let Some(v) = self.fragment_separation {
            data.insert(Self::FRAGMENT_SEPARATION, Value::from(sam_int(i64::from(v))));
        }
        if let Some(v) = self.fragment_index {
            data.insert(Self::FRAGMENT_INDEX, Value::from(sam_int(i64::from(v))));
        }
    }

    /// Store one of our fields. Returns `false` on a wrong type or unknown value.
    fn absorb(&mut self, tag: Tag, value: &Value) -> bool {
        if tag == Self::ORIENTATION {
            string_value(value)
                .and_then(Orientation::parse)
                .map(|v| self.orientation = Some(v))
                .is_some()
        } else if tag == Self::INTERACTION {
            string_value(value)
                .and_then(InteractionType::parse)
                .map(|v| self.interaction = Some(v))
                .is_some()
        } else if tag == Self::DITAG_LENGTH {
            int_value(value)
                .map(|v| self.ditag_length = Some(v))
                .is_some()
        } else if tag == Self::INSERT_SIZE {
            int_value(value).map(|v| self.insert_size = Some(v)).is_some()
        } else if tag == Self::FRAGMENT_SEPARATION {
            int_value(value)
                .and_then(|v| u32::try_from(v).ok())
                .map(|v| self.fragment_separation = Some(v))
                .is_some()
        } else if tag == Self::FRAGMENT_INDEX {
            int_value(value)
                .and_then(|v| u32::try_from(v).ok())
                .filter(|&v| v > 0)
                .map(|v| self.fragment_index = Some(v))
                .is_some()
        } else {
            false
        }
    }
}

fn string_value(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => std::str::from_utf8(s.as_ref()).ok(),
        _ => None,
    }
}

fn int_value(value: &Value) -> Option<i64> {
    match *value {
        Value::Int8(n) => Some(i64::from(n)),
        Value::UInt8(n) => Some(i64::from(n)),
        Value::Int16(n) => Some(i64::from(n)),
        Value::UInt16(n) => Some(i64::from(n)),
        Value::Int32(n) => Some(i64::from(n)),
        Value::UInt32(n) => Some(i64::from(n)),
        _ => None,
    }
}

// SAM `i` fields are 32-bit
fn sam_int(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

fn position(p: Option<Position>) -> u64 {
    p.map_or(0, |p| usize::from(p) as u64)
}

/// Whether a CIGAR operation advances along the reference
#[must_use]
pub fn consumes_reference(kind: Kind) -> bool {
    match kind {
        Kind::Match | Kind::Deletion | Kind::Skip | Kind::SequenceMatch | Kind::SequenceMismatch => {
            true
        }
        Kind::Insertion | Kind::SoftClip | Kind::HardClip | Kind::Pad => false,
    }
}

/// A SAM alignment record with the positions Hi-C classification needs.
///
/// The Hi-C fields are held in `tags` rather than in the record's data and
/// are written back by [`AlignmentRecord::into_record_buf`].
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    record: RecordBuf,
    reference: String,
    pub tags: HicTags,
}

impl AlignmentRecord {
    /// Wrap a record whose reference name was resolved against the header.
    ///
    /// Hi-C fields already present in the data are moved into `tags`. Any of
    /// them with an unexpected type or value is dropped with a warning.
    pub fn new(mut record: RecordBuf, reference: impl Into<String>) -> Self {
        let (tags, malformed) = HicTags::take_from(record.data_mut());
        let read = Self {
            record,
            reference: reference.into(),
            tags,
        };
        for name in malformed {
            warn!(qname = %read.qname(), tag = name, "Dropping malformed Hi-C tag");
        }
        read
    }

    #[must_use]
    pub fn record(&self) -> &RecordBuf {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut RecordBuf {
        &mut self.record
    }

    /// Query name, `*` when absent
    #[must_use]
    pub fn qname(&self) -> String {
        self.record
            .name()
            .map_or_else(|| "*".to_string(), |n| n.to_string())
    }

    #[must_use]
    pub fn same_name(&self, other: &AlignmentRecord) -> bool {
        self.record.name() == other.record.name()
    }

    /// Reference sequence name, `*` when unmapped
    #[must_use]
    pub fn reference_name(&self) -> &str {
        &self.reference
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        self.record.flags()
    }

    #[must_use]
    pub fn is_paired(&self) -> bool {
        self.flags().is_segmented()
    }

    #[must_use]
    pub fn is_first_in_pair(&self) -> bool {
        self.flags().is_first_segment()
    }

    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.flags().is_reverse_complemented()
    }

    #[must_use]
    pub fn strand(&self) -> Strand {
        if self.is_reverse() {
            Strand::Reverse
        } else {
            Strand::Forward
        }
    }

    /// Number of reference bases covered by the alignment
    #[must_use]
    pub fn reference_length(&self) -> u64 {
        self.record
            .cigar()
            .as_ref()
            .iter()
            .filter(|op| consumes_reference(op.kind()))
            .map(|op| op.len() as u64)
            .sum()
    }

    /// Leftmost reference-aligned base (0 when unmapped)
    #[must_use]
    pub fn left_pos(&self) -> u64 {
        position(self.record.alignment_start())
    }

    /// Rightmost reference-aligned base
    #[must_use]
    pub fn right_pos(&self) -> u64 {
        match self.reference_length() {
            0 => self.left_pos(),
            span => self.left_pos().saturating_add(span - 1),
        }
    }

    /// Mate's leftmost position (0 when unavailable)
    #[must_use]
    pub fn mate_pos(&self) -> u64 {
        position(self.record.mate_alignment_start())
    }

    /// Leading edge of the alignment in the direction of sequencing
    #[must_use]
    pub fn five_prime_pos(&self) -> u64 {
        match self.strand() {
            Strand::Forward => self.left_pos(),
            Strand::Reverse => self.right_pos(),
        }
    }

    #[must_use]
    pub fn three_prime_pos(&self) -> u64 {
        match self.strand() {
            Strand::Forward => self.right_pos(),
            Strand::Reverse => self.left_pos(),
        }
    }

    /// The record with its Hi-C fields written back into the data
    #[must_use]
    pub fn into_record_buf(self) -> RecordBuf {
        let mut record = self.record;
        self.tags.insert_into(record.data_mut());
        record
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use noodles::sam::alignment::record::cigar::Op;
    use noodles::sam::alignment::record::MappingQuality;
    use noodles::sam::alignment::record_buf::Cigar;

    /// Build a mapped, paired record for tests
    pub(crate) fn record(
        qname: &str,
        rname: &str,
        pos: usize,
        cigar_len: usize,
        reverse: bool,
        first: bool,
        mate_pos: usize,
    ) -> AlignmentRecord {
        let mut flags = Flags::SEGMENTED;
        if reverse {
            flags |= Flags::REVERSE_COMPLEMENTED;
        }
        flags |= if first {
            Flags::FIRST_SEGMENT
        } else {
            Flags::LAST_SEGMENT
        };

        let mut buf = RecordBuf::default();
        *buf.name_mut() = Some(qname.into());
        *buf.flags_mut() = flags;
        *buf.reference_sequence_id_mut() = Some(0);
        *buf.alignment_start_mut() = Position::new(pos);
        *buf.mapping_quality_mut() = MappingQuality::new(42);
        *buf.cigar_mut() = Cigar::from(vec![Op::new(Kind::Match, cigar_len)]);
        *buf.mate_reference_sequence_id_mut() = Some(0);
        *buf.mate_alignment_start_mut() = Position::new(mate_pos);

        AlignmentRecord::new(buf, rname)
    }

    #[test]
    fn test_forward_positions() {
        let read = record("q", "chr1", 40, 50, false, true, 150);
        assert_eq!(read.left_pos(), 40);
        assert_eq!(read.right_pos(), 89);
        assert_eq!(read.five_prime_pos(), 40);
        assert_eq!(read.three_prime_pos(), 89);
        assert_eq!(read.mate_pos(), 150);
        assert_eq!(read.strand(), Strand::Forward);
        assert_eq!(read.qname(), "q");
        assert_eq!(read.reference_name(), "chr1");
    }

    #[test]
    fn test_reverse_positions_swap_five_and_three_prime() {
        let read = record("q", "chr1", 150, 71, true, false, 40);
        assert_eq!(read.left_pos(), 150);
        assert_eq!(read.right_pos(), 220);
        assert_eq!(read.five_prime_pos(), 220);
        assert_eq!(read.three_prime_pos(), 150);
    }

    #[test]
    fn test_reference_length_skips_clips_and_insertions() {
        let mut read = record("q", "chr1", 100, 0, false, true, 0);
        *read.record_mut().cigar_mut() = Cigar::from(vec![
            Op::new(Kind::SoftClip, 5),
            Op::new(Kind::Match, 20),
            Op::new(Kind::Insertion, 3),
            Op::new(Kind::Deletion, 2),
            Op::new(Kind::Match, 10),
            Op::new(Kind::HardClip, 4),
        ]);
        assert_eq!(read.reference_length(), 32);
        assert_eq!(read.right_pos(), 131);
    }

    #[test]
    fn test_missing_cigar_has_single_base_span() {
        let mut read = record("q", "chr1", 100, 0, true, true, 0);
        *read.record_mut().cigar_mut() = Cigar::default();
        assert_eq!(read.right_pos(), 100);
        assert_eq!(read.five_prime_pos(), 100);
    }

    #[test]
    fn test_right_pos_saturates() {
        let mut read = record("q", "chr1", 1, 50, false, true, 0);
        *read.record_mut().alignment_start_mut() = Position::new(usize::MAX);
        assert_eq!(read.right_pos(), usize::MAX as u64);
    }

    #[test]
    fn test_unmapped_positions_are_zero() {
        let mut read = record("q", "*", 1, 10, false, true, 1);
        *read.record_mut().alignment_start_mut() = None;
        *read.record_mut().mate_alignment_start_mut() = None;
        assert_eq!(read.left_pos(), 0);
        assert_eq!(read.mate_pos(), 0);
    }

    #[test]
    fn test_take_hic_tags_keeps_other_fields_in_order() {
        let mut data = Data::default();
        data.insert(Tag::new(b'N', b'M'), Value::from(0_i32));
        data.insert(HicTags::ORIENTATION, Value::String("Inward".into()));
        data.insert(Tag::new(b'A', b'S'), Value::from(40_i32));
        data.insert(HicTags::DITAG_LENGTH, Value::from(-12_i32));
        data.insert(HicTags::FRAGMENT_INDEX, Value::UInt8(3));

        let (tags, malformed) = HicTags::take_from(&mut data);

        assert!(malformed.is_empty());
        assert_eq!(tags.orientation, Some(Orientation::Inward));
        assert_eq!(tags.ditag_length, Some(-12));
        assert_eq!(tags.fragment_index, Some(3));
        assert!(tags.interaction.is_none());

        let remaining: Vec<Tag> = data.iter().map(|(tag, _)| tag).collect();
        assert_eq!(remaining, vec![Tag::new(b'N', b'M'), Tag::new(b'A', b'S')]);
    }

    #[test]
    fn test_malformed_hic_tags_are_dropped() {
        let mut data = Data::default();
        data.insert(HicTags::ORIENTATION, Value::String("inward".into()));
        data.insert(HicTags::FRAGMENT_SEPARATION, Value::from(-1_i32));
        data.insert(HicTags::INTERACTION, Value::from(1_i32));
        data.insert(Tag::new(b'N', b'M'), Value::from(0_i32));

        let (tags, malformed) = HicTags::take_from(&mut data);

        assert!(tags.is_empty());
        assert_eq!(malformed, vec!["or", "fs", "it"]);
        assert_eq!(data.iter().count(), 1);
        assert!(data.get(&HicTags::ORIENTATION).is_none());
    }

    #[test]
    fn test_into_record_buf_writes_tags_after_other_fields() {
        let mut read = record("q", "chr1", 40, 50, false, true, 150);
        read.record_mut()
            .data_mut()
            .insert(Tag::new(b'N', b'M'), Value::from(0_i32));
        read.tags.interaction = Some(InteractionType::Cis);
        read.tags.fragment_index = Some(1);

        let buf = read.into_record_buf();
        let tags: Vec<Tag> = buf.data().iter().map(|(tag, _)| tag).collect();
        assert_eq!(
            tags,
            vec![Tag::new(b'N', b'M'), HicTags::INTERACTION, HicTags::FRAGMENT_INDEX]
        );
        assert_eq!(
            buf.data().get(&HicTags::INTERACTION),
            Some(&Value::String("cis".into()))
        );
        assert_eq!(buf.data().get(&HicTags::FRAGMENT_INDEX), Some(&Value::from(1_i32)));
    }

    #[test]
    fn test_new_lifts_existing_tags() {
        let mut buf = record("q", "chr1", 40, 50, false, true, 150).into_record_buf();
        buf.data_mut()
            .insert(HicTags::ORIENTATION, Value::String("Outward".into()));

        let read = AlignmentRecord::new(buf, "chr1");
        assert_eq!(read.tags.orientation, Some(Orientation::Outward));
        assert!(read.record().data().get(&HicTags::ORIENTATION).is_none());
    }
}
