use serde::Serialize;
use thiserror::Error;

use crate::core::types::{FilterDecision, InteractionType, Orientation};
use crate::pairing::classify::PairMetrics;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("No filter settings defined: set at least one of min-inward, min-outward, max-ditag, min-ditag")]
    NoFilterCriteria,

    #[error("Filter threshold {0} must be a positive integer")]
    NonPositiveThreshold(&'static str),
}

/// Thresholds for the filter rules. Unset thresholds disable their rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterConfig {
    /// Minimum insert size for inward-facing cis pairs
    pub min_inward: Option<u64>,
    /// Minimum insert size for outward-facing cis pairs
    pub min_outward: Option<u64>,
    /// Maximum ditag length
    pub max_ditag: Option<u64>,
    /// Minimum ditag length
    pub min_ditag: Option<u64>,
}

impl FilterConfig {
    #[must_use]
    pub fn has_criteria(&self) -> bool {
        self.min_inward.is_some()
            || self.min_outward.is_some()
            || self.max_ditag.is_some()
            || self.min_ditag.is_some()
    }

    /// Check that at least one threshold is set and all set thresholds are positive
    ///
    /// # Errors
    ///
    /// Returns `FilterError::NoFilterCriteria` if every threshold is unset, or
    /// `FilterError::NonPositiveThreshold` if one is zero.
    pub fn validate(&self) -> Result<(), FilterError> {
        if !self.has_criteria() {
            return Err(FilterError::NoFilterCriteria);
        }
        for (name, value) in [
            ("min_inward", self.min_inward),
            ("min_outward", self.min_outward),
            ("max_ditag", self.max_ditag),
            ("min_ditag", self.min_ditag),
        ] {
            if value == Some(0) {
                return Err(FilterError::NonPositiveThreshold(name));
            }
        }
        Ok(())
    }
}

/// Applies the filter rules to classified pairs
#[derive(Debug, Clone)]
pub struct FilterEngine {
    config: FilterConfig,
}

impl FilterEngine {
    /// Create an engine, refusing a configuration without any threshold
    ///
    /// # Errors
    ///
    /// See [`FilterConfig::validate`].
    pub fn new(config: FilterConfig) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Decide the fate of one pair. `None` means the pair failed validation.
    ///
    /// Rules are applied in priority order and the first match wins:
    /// invalid format, ditag above maximum, ditag below minimum, then for cis
    /// pairs only: same fragment, inward insert below minimum, outward insert
    /// below minimum.
    #[must_use]
    pub fn decide(&self, metrics: Option<&PairMetrics>) -> FilterDecision {
        let Some(m) = metrics else {
            return FilterDecision::InvalidFormat;
        };
        let config = &self.config;

        if config.max_ditag.is_some_and(|max| m.ditag_length > to_signed(max)) {
            return FilterDecision::AboveMaxDitag;
        }
        if config.min_ditag.is_some_and(|min| m.ditag_length < to_signed(min)) {
            return FilterDecision::BelowMinDitag;
        }

        if m.interaction == InteractionType::Cis {
            if m.fragment_separation == 0 {
                return FilterDecision::SameFragment;
            }
            match m.orientation {
                Orientation::Inward
                    if config.min_inward.is_some_and(|min| m.insert_size < to_signed(min)) =>
                {
                    return FilterDecision::BelowMinInward;
                }
                Orientation::Outward
                    if config.min_outward.is_some_and(|min| m.insert_size < to_signed(min)) =>
                {
                    return FilterDecision::BelowMinOutward;
                }
                _ => {}
            }
        }

        FilterDecision::Retained
    }
}

/// Running per-category pair counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub total: u64,
    pub retained: u64,
    pub invalid: u64,
    pub above_max_ditag: u64,
    pub below_min_ditag: u64,
    pub same_fragment: u64,
    pub below_min_inward: u64,
    pub below_min_outward: u64,
}

impl FilterCounts {
    pub fn record(&mut self, decision: FilterDecision) {
        self.total += 1;
        let counter = match decision {
            FilterDecision::Retained => &mut self.retained,
            FilterDecision::InvalidFormat => &mut self.invalid,
            FilterDecision::AboveMaxDitag => &mut self.above_max_ditag,
            FilterDecision::BelowMinDitag => &mut self.below_min_ditag,
            FilterDecision::SameFragment => &mut self.same_fragment,
            FilterDecision::BelowMinInward => &mut self.below_min_inward,
            FilterDecision::BelowMinOutward => &mut self.below_min_outward,
        };
        *counter += 1;
    }

    /// Pairs that were not retained
    #[must_use]
    pub fn filtered(&self) -> u64 {
        self.total - self.retained
    }

    #[must_use]
    pub fn count(&self, decision: FilterDecision) -> u64 {
        match decision {
            FilterDecision::Retained => self.retained,
            FilterDecision::InvalidFormat => self.invalid,
            FilterDecision::AboveMaxDitag => self.above_max_ditag,
            FilterDecision::BelowMinDitag => self.below_min_ditag,
            FilterDecision::SameFragment => self.same_fragment,
            FilterDecision::BelowMinInward => self.below_min_inward,
            FilterDecision::BelowMinOutward => self.below_min_outward,
        }
    }

    /// Combine counts accumulated separately, e.g. by different workers
    pub fn merge(&mut self, other: &FilterCounts) {
        self.total += other.total;
        self.retained += other.retained;
        self.invalid += other.invalid;
        self.above_max_ditag += other.above_max_ditag;
        self.below_min_ditag += other.below_min_ditag;
        self.same_fragment += other.same_fragment;
        self.below_min_inward += other.below_min_inward;
        self.below_min_outward += other.below_min_outward;
    }
}

fn to_signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
