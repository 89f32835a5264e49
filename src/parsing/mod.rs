//! Readers for the two text inputs of the pipeline.
//!
//! - **SAM**: a header declaring every reference, then name-sorted records
//!   with Hi-C optional fields, read through noodles
//! - **Restriction digest files**: one fragment per line
//!
//! ## Example
//!
//! ```rust
//! use hic_tools::parsing::sam::SamRecordReader;
//!
//! let text = "@SQ\tSN:chr1\tLN:1000\n@SQ\tSN:chr2\tLN:1000\n\
//!             q1\t65\tchr1\t40\t60\t50M\tchr2\t900\t0\t*\t*\tit:Z:trans\n";
//! let mut reader = SamRecordReader::new(text.as_bytes()).unwrap();
//! let record = reader.read_record().unwrap().unwrap();
//! assert_eq!(record.right_pos(), 89);
//! ```
//!
//! ## Recognised Tags
//!
//! | Tag  | Description | Type |
//! |------|-------------|------|
//! | or   | Pair orientation | Z |
//! | it   | Interaction type (cis/trans) | Z |
//! | dt   | Ditag length | i |
//! | is   | Insert size | i |
//! | fs   | Fragment separation | i |
//! | fn   | Restriction fragment index of this read | i |

pub mod digest;
pub mod sam;
