//! Restriction digests: generation from FASTA and fragment lookup.
//!
//! - [`builder`]: Cut a reference at every restriction site and write the digest file
//! - [`index`]: Load a digest file and locate the fragment containing a position

pub mod builder;
pub mod index;

pub use builder::{digest_sequence, write_digest, DigestBuildError, RestrictionSite};
pub use index::{DigestIndex, LocateError};
