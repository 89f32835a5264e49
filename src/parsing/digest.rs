//! Parser for restriction digest files.
//!
//! One fragment per line: `reference\tstart\tend\tindex`, 1-based inclusive
//! coordinates, fragments of each reference ordered by index starting at 1.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigestFormatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: expected 4 fields (reference, start, end, index), found {found}")]
    MissingFields { line: usize, found: usize },

    #[error("Line {line}: invalid {field} '{value}' on reference {reference}")]
    InvalidNumber {
        line: usize,
        reference: String,
        field: &'static str,
        value: String,
    },

    #[error("Line {line}: fragment start/end must be positive on reference {reference}")]
    NonPositivePosition { line: usize, reference: String },

    #[error("Line {line}: fragment end {end} precedes start {start} on reference {reference}")]
    EndBeforeStart {
        line: usize,
        reference: String,
        start: u64,
        end: u64,
    },

    #[error(
        "Line {line}: invalid first fragment on reference {reference} \
         (start {start}, index {index}; expected start 1, index 1)"
    )]
    InvalidFirstFragment {
        line: usize,
        reference: String,
        start: u64,
        index: u64,
    },

    #[error(
        "Line {line}: fragment end {end} is not after previous end {previous} on reference \
         {reference}; is the digest sorted?"
    )]
    UnsortedFragments {
        line: usize,
        reference: String,
        end: u64,
        previous: u64,
    },

    #[error("Too many fragments on reference {0}")]
    TooManyFragments(String),
}

/// One parsed line of a digest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestEntry {
    pub reference: String,
    pub start: u64,
    pub end: u64,
    pub index: u64,
}

/// Parse a single digest line.
///
/// Returns `Ok(None)` for blank lines and `#` comments. `line_num` is 1-based
/// and only used for error context.
///
/// # Errors
///
/// Returns `DigestFormatError::MissingFields` if fewer than 4 fields are present,
/// `DigestFormatError::InvalidNumber` if a coordinate is not an integer,
/// `DigestFormatError::NonPositivePosition` if start or end is zero, or
/// `DigestFormatError::EndBeforeStart` for an inverted fragment.
pub fn parse_digest_line(
    line: &str,
    line_num: usize,
) -> Result<Option<DigestEntry>, DigestFormatError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(DigestFormatError::MissingFields {
            line: line_num,
            found: fields.len(),
        });
    }

    let reference = fields[0];
    let number = |field: &'static str, value: &str| -> Result<u64, DigestFormatError> {
        // Negative values are reported as non-positive rather than unparseable
        if value.starts_with('-') && value[1..].parse::<u64>().is_ok() {
            return Err(DigestFormatError::NonPositivePosition {
                line: line_num,
                reference: reference.to_string(),
            });
        }
        value.parse().map_err(|_| DigestFormatError::InvalidNumber {
            line: line_num,
            reference: reference.to_string(),
            field,
            value: value.to_string(),
        })
    };

    let start = number("start", fields[1])?;
    let end = number("end", fields[2])?;
    let index = number("index", fields[3])?;

    if start == 0 || end == 0 {
        return Err(DigestFormatError::NonPositivePosition {
            line: line_num,
            reference: reference.to_string(),
        });
    }

    if end < start {
        return Err(DigestFormatError::EndBeforeStart {
            line: line_num,
            reference: reference.to_string(),
            start,
            end,
        });
    }

    Ok(Some(DigestEntry {
        reference: reference.to_string(),
        start,
        end,
        index,
    }))
}
