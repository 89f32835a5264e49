use std::io::BufRead;

use noodles::sam;
use noodles::sam::alignment::RecordBuf;
use thiserror::Error;

use crate::core::record::AlignmentRecord;

/// Largest POS or PNEXT a SAM record may carry
pub const MAX_POSITION: u64 = i32::MAX as u64;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SAM: {0}")]
    Noodles(String),

    #[error("Invalid {field} in record '{qname}': '{value}'")]
    InvalidField {
        qname: String,
        field: &'static str,
        value: String,
    },
}

/// Reads SAM text into [`AlignmentRecord`]s.
///
/// The header is read on construction. Reference names of the records are
/// resolved against its `@SQ` lines, so a record on an undeclared reference
/// is an error.
pub struct SamRecordReader<R> {
    reader: sam::io::Reader<R>,
    header: sam::Header,
    buf: RecordBuf,
    records_read: usize,
}

impl<R: BufRead> SamRecordReader<R> {
    /// Wrap `inner` and read its header
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Noodles` if the header is malformed.
    pub fn new(inner: R) -> Result<Self, ParseError> {
        let mut reader = sam::io::Reader::new(inner);
        let header = reader
            .read_header()
            .map_err(|e| ParseError::Noodles(e.to_string()))?;

        Ok(Self {
            reader,
            header,
            buf: RecordBuf::default(),
            records_read: 0,
        })
    }

    #[must_use]
    pub fn header(&self) -> &sam::Header {
        &self.header
    }

    /// Number of records read so far, counting one that failed to parse
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Read the next record, or `None` at end of input
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Noodles` for a malformed line and
    /// `ParseError::InvalidField` for a position past [`MAX_POSITION`].
    pub fn read_record(&mut self) -> Result<Option<AlignmentRecord>, ParseError> {
        match self.reader.read_record_buf(&self.header, &mut self.buf) {
            Ok(0) => return Ok(None),
            Ok(_) => self.records_read += 1,
            Err(e) => {
                self.records_read += 1;
                return Err(ParseError::Noodles(e.to_string()));
            }
        }

        let record = std::mem::take(&mut self.buf);
        check_position(&record, "POS", record.alignment_start())?;
        check_position(&record, "PNEXT", record.mate_alignment_start())?;

        let reference = record
            .reference_sequence_id()
            .and_then(|id| self.header.reference_sequences().get_index(id))
            .map_or_else(|| "*".to_string(), |(name, _)| name.to_string());

        Ok(Some(AlignmentRecord::new(record, reference)))
    }
}

fn check_position(
    record: &RecordBuf,
    field: &'static str,
    position: Option<noodles::core::Position>,
) -> Result<(), ParseError> {
    match position {
        Some(p) if usize::from(p) as u64 > MAX_POSITION => Err(ParseError::InvalidField {
            qname: record
                .name()
                .map_or_else(|| "*".to_string(), |n| n.to_string()),
            field,
            value: usize::from(p).to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{InteractionType, Orientation};
    use noodles::sam::alignment::record::data::field::Tag;

    const HEADER: &str = "@HD\tVN:1.6\tSO:queryname\n@SQ\tSN:chr1\tLN:1000\n@SQ\tSN:chr2\tLN:1000\n";
    const LINE: &str = "read1\t99\tchr1\t40\t60\t10S40M\t=\t150\t181\t*\t*\tNM:i:0\tAS:i:40";

    fn read_one(line: &str) -> Result<Option<AlignmentRecord>, ParseError> {
        let text = format!("{HEADER}{line}\n");
        let mut reader = SamRecordReader::new(text.as_bytes())?;
        reader.read_record()
    }

    #[test]
    fn test_read_record() {
        let record = read_one(LINE).unwrap().unwrap();
        assert_eq!(record.qname(), "read1");
        assert!(record.is_paired());
        assert!(record.is_first_in_pair());
        assert!(!record.is_reverse());
        assert_eq!(record.reference_name(), "chr1");
        assert_eq!(record.left_pos(), 40);
        assert_eq!(record.reference_length(), 40);
        assert_eq!(record.right_pos(), 79);
        assert_eq!(record.mate_pos(), 150);
        assert_eq!(record.record().template_length(), 181);
        assert_eq!(record.record().data().iter().count(), 2);
        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_header_is_read_first() {
        let text = format!("{HEADER}{LINE}\n");
        let mut reader = SamRecordReader::new(text.as_bytes()).unwrap();
        assert_eq!(reader.header().reference_sequences().len(), 2);
        assert_eq!(reader.records_read(), 0);
        assert!(reader.read_record().unwrap().is_some());
        assert!(reader.read_record().unwrap().is_none());
        assert_eq!(reader.records_read(), 1);
    }

    #[test]
    fn test_existing_hic_tags_are_lifted() {
        let line = format!("{LINE}\tor:Z:Outward\tit:Z:trans\tfn:i:7");
        let record = read_one(&line).unwrap().unwrap();
        assert_eq!(record.tags.orientation, Some(Orientation::Outward));
        assert_eq!(record.tags.interaction, Some(InteractionType::Trans));
        assert_eq!(record.tags.fragment_index, Some(7));

        let data = record.record().data();
        assert_eq!(data.iter().count(), 2);
        assert!(data.get(&Tag::new(b'f', b'n')).is_none());
    }

    #[test]
    fn test_unmapped_reference_is_star() {
        let line = "read1\t77\t*\t0\t0\t*\t*\t0\t0\tACGT\tIIII";
        let record = read_one(line).unwrap().unwrap();
        assert_eq!(record.reference_name(), "*");
        assert_eq!(record.left_pos(), 0);
    }

    #[test]
    fn test_undeclared_reference_is_rejected() {
        let line = LINE.replace("\tchr1\t", "\tchrM\t");
        assert!(matches!(read_one(&line), Err(ParseError::Noodles(_))));
    }

    #[test]
    fn test_invalid_flag_is_rejected() {
        let line = LINE.replace("\t99\t", "\tninety\t");
        assert!(matches!(read_one(&line), Err(ParseError::Noodles(_))));
    }

    #[test]
    fn test_position_past_sam_limit_is_rejected() {
        let line = LINE.replace("\t=\t150\t", "\t=\t3000000000\t");
        assert!(read_one(&line).is_err());

        let line = LINE.replace("\tchr1\t40\t", "\tchr1\t2147483648\t");
        assert!(read_one(&line).is_err());
    }

    #[test]
    fn test_check_position_names_field() {
        let mut buf = RecordBuf::default();
        *buf.name_mut() = Some("big".into());
        let position = noodles::core::Position::new(MAX_POSITION as usize + 1);
        match check_position(&buf, "PNEXT", position) {
            Err(ParseError::InvalidField { qname, field, value }) => {
                assert_eq!(qname, "big");
                assert_eq!(field, "PNEXT");
                assert_eq!(value, "2147483648");
            }
            other => panic!("expected InvalidField, got {other:?}"),
        }
        let at_limit = noodles::core::Position::new(MAX_POSITION as usize);
        assert!(check_position(&buf, "POS", at_limit).is_ok());
    }
}
