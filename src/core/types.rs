use serde::{Deserialize, Serialize};

/// Strand a read aligned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strand {
    Forward,
    Reverse,
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "+"),
            Self::Reverse => write!(f, "-"),
        }
    }
}

/// Relative orientation of a canonically ordered read pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Both reads on the forward strand
    #[serde(rename = "Same-forward")]
    SameForward,
    /// Left read forward, right read reverse
    Inward,
    /// Left read reverse, right read forward
    Outward,
    /// Both reads on the reverse strand
    #[serde(rename = "Same-reverse")]
    SameReverse,
}

impl Orientation {
    /// Orientation from the strands of the left and right reads.
    ///
    /// Only meaningful once the pair has been put in canonical order.
    #[must_use]
    pub fn from_strands(left: Strand, right: Strand) -> Self {
        match (left, right) {
            (Strand::Forward, Strand::Forward) => Self::SameForward,
            (Strand::Forward, Strand::Reverse) => Self::Inward,
            (Strand::Reverse, Strand::Forward) => Self::Outward,
            (Strand::Reverse, Strand::Reverse) => Self::SameReverse,
        }
    }

    /// Value written to the `or:Z` tag
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SameForward => "Same-forward",
            Self::Inward => "Inward",
            Self::Outward => "Outward",
            Self::SameReverse => "Same-reverse",
        }
    }

    /// Parse the `or:Z` tag value
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Same-forward" => Some(Self::SameForward),
            "Inward" => Some(Self::Inward),
            "Outward" => Some(Self::Outward),
            "Same-reverse" => Some(Self::SameReverse),
            _ => None,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether both reads of a pair map to the same reference sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Cis,
    Trans,
}

impl InteractionType {
    /// Value written to the `it:Z` tag
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cis => "cis",
            Self::Trans => "trans",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cis" => Some(Self::Cis),
            "trans" => Some(Self::Trans),
            _ => None,
        }
    }
}

impl std::fmt::Display for InteractionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of running a read pair through the filter rules
///
/// Variants are listed in rule priority order; the first matching rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDecision {
    /// The two records do not form a valid mate pair
    InvalidFormat,
    /// Ditag length above the configured maximum
    AboveMaxDitag,
    /// Ditag length below the configured minimum
    BelowMinDitag,
    /// Both reads of a cis pair fall on the same restriction fragment
    SameFragment,
    /// Inward-facing cis pair with an insert below the configured minimum
    BelowMinInward,
    /// Outward-facing cis pair with an insert below the configured minimum
    BelowMinOutward,
    /// Pair passed every configured rule
    Retained,
}

impl FilterDecision {
    #[must_use]
    pub fn is_retained(self) -> bool {
        matches!(self, Self::Retained)
    }
}

impl std::fmt::Display for FilterDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "Invalid"),
            Self::AboveMaxDitag => write!(f, "Above maximum ditag"),
            Self::BelowMinDitag => write!(f, "Below minimum ditag"),
            Self::SameFragment => write!(f, "Same fragment"),
            Self::BelowMinInward => write!(f, "Below minimum inward insert"),
            Self::BelowMinOutward => write!(f, "Below minimum outward insert"),
            Self::Retained => write!(f, "Retained"),
        }
    }
}
