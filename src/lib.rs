//! # hic-tools
//!
//! A library for annotating and filtering Hi-C read pairs.
//!
//! Hi-C libraries are made by cutting chromatin with a restriction enzyme and
//! ligating the ends that lie close together in space. Sequencing a ligation
//! product gives a read pair whose two reads can land on distant restriction
//! fragments, or even on different chromosomes. Many pairs are artefacts:
//! undigested or self-ligated fragments, dangling ends, or ditags too long to
//! be real ligation junctions.
//!
//! `hic-tools` places both reads of every pair on the restriction fragments of
//! a digest and derives the metrics used to tell real contacts from artefacts.
//!
//! ## Features
//!
//! - **Digest generation**: Cut a reference FASTA at every restriction site
//! - **Fragment lookup**: Binary search over per-reference fragment ends
//! - **Pair classification**: Orientation, cis/trans, ditag length, insert size
//!   and fragment separation
//! - **Filtering**: Threshold rules applied in a fixed priority order, with a
//!   per-category summary
//!
//! ## Example
//!
//! ```rust
//! use hic_tools::digest::DigestIndex;
//! use hic_tools::pairing::classify;
//! use hic_tools::pairing::PairStream;
//!
//! let index = DigestIndex::from_text("chr1\t1\t100\t1\nchr1\t101\t250\t2\n").unwrap();
//!
//! let sam = "@SQ\tSN:chr1\tLN:250\n\
//!            q1\t99\tchr1\t40\t60\t50M\t=\t150\t181\t*\t*\n\
//!            q1\t147\tchr1\t150\t60\t71M\t=\t40\t-181\t*\t*\n";
//! let mut pairs = PairStream::new(sam.as_bytes()).unwrap();
//! let (r1, r2) = pairs.next().unwrap().unwrap();
//!
//! let pair = classify(r1, r2, &index).unwrap();
//! assert_eq!(pair.metrics.orientation.as_str(), "Inward");
//! assert_eq!(pair.metrics.fragment_separation, 1);
//! assert_eq!(pair.metrics.ditag_length, 181);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for fragments, alignment records and pair classes
//! - [`parsing`]: Readers for SAM records and digest files
//! - [`digest`]: Digest generation and fragment lookup
//! - [`pairing`]: Pair validation, classification, filtering and the stream driver
//! - [`diagnostics`]: Sink for recoverable problems found while processing
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod diagnostics;
pub mod digest;
pub mod pairing;
pub mod parsing;
pub mod utils;

pub use crate::core::{AlignmentRecord, FilterDecision, Fragment, Orientation};
pub use digest::DigestIndex;
pub use pairing::{Driver, FilterConfig, FilterEngine, Mode, Summary};
