//! Core data types for Hi-C read pair processing.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`AlignmentRecord`]: A SAM alignment record with derived positions
//! - [`HicTags`]: The typed pair annotations written as SAM optional fields
//! - [`Fragment`]: A restriction fragment on one reference sequence
//! - [`Orientation`], [`InteractionType`], [`FilterDecision`]: Pair classification types
//!
//! ## Positions
//!
//! All positions are 1-based and inclusive, as in SAM. For a read aligned to
//! the forward strand the five-prime end is its leftmost aligned base; for a
//! reverse-strand read it is the rightmost.
//!
//! | Strand  | five-prime | three-prime |
//! |---------|------------|-------------|
//! | forward | left_pos   | right_pos   |
//! | reverse | right_pos  | left_pos    |

pub mod fragment;
pub mod record;
pub mod types;

pub use fragment::Fragment;
pub use record::{AlignmentRecord, HicTags};
pub use types::{FilterDecision, InteractionType, Orientation, Strand};
