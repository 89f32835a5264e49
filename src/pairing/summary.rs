use std::fmt::Display;
use std::io::{self, Write};

use serde::Serialize;

use crate::pairing::filter::{FilterConfig, FilterCounts};

/// Per-sample filtering statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub sample: String,
    pub counts: FilterCounts,
    /// `None` when no filter rules were applied
    pub config: Option<FilterConfig>,
}

impl Summary {
    #[must_use]
    pub fn new(sample: impl Into<String>, counts: FilterCounts, config: Option<FilterConfig>) -> Self {
        Self {
            sample: sample.into(),
            counts,
            config,
        }
    }

    /// Category labels and counts, in report order
    #[must_use]
    pub fn rows(&self) -> Vec<(String, u64)> {
        let config = self.config.unwrap_or_default();
        let c = &self.counts;
        vec![
            ("Total".to_string(), c.total),
            ("Retained".to_string(), c.retained),
            ("Filtered".to_string(), c.filtered()),
            ("Invalid".to_string(), c.invalid),
            (format!("Ditag > {}bp", threshold(config.max_ditag)), c.above_max_ditag),
            (format!("Ditag < {}bp", threshold(config.min_ditag)), c.below_min_ditag),
            ("Same fragment".to_string(), c.same_fragment),
            (
                format!("Inward insert < {}bp", threshold(config.min_inward)),
                c.below_min_inward,
            ),
            (
                format!("Outward insert < {}bp", threshold(config.min_outward)),
                c.below_min_outward,
            ),
        ]
    }

    /// Write one `sample\tcategory\tcount` line per category
    ///
    /// # Errors
    ///
    /// Returns an IO error if writing fails.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (label, count) in self.rows() {
            writeln!(writer, "{}\t{}\t{}", self.sample, label, count)?;
        }
        Ok(())
    }
}

fn threshold(value: Option<u64>) -> Box<dyn Display> {
    match value {
        Some(v) => Box::new(v),
        None => Box::new("NA"),
    }
}
