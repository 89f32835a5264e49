//! Read-pair processing: validation, classification, filtering and the
//! streaming driver that ties them together.
//!
//! A pair flows through the stages in this order:
//!
//! 1. [`validation`]: check the two records are mates of one another
//! 2. [`classify`]: put the pair in left-to-right order, locate both reads on
//!    restriction fragments and derive orientation, ditag length, insert size
//!    and fragment separation
//! 3. [`filter`]: apply the configured thresholds
//! 4. [`driver`]: write tagged records and count outcomes for the [`summary`]

pub mod classify;
pub mod driver;
pub mod filter;
pub mod summary;
pub mod validation;

pub use classify::{classify, ClassifiedPair, PairMetrics};
pub use driver::{Driver, DriverError, Mode, PairStream};
pub use filter::{FilterConfig, FilterCounts, FilterEngine, FilterError};
pub use summary::Summary;
pub use validation::{is_valid, validate, InvalidPair};
