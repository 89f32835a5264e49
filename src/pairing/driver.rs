use std::io::{self, BufRead, Write};

use noodles::sam;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use thiserror::Error;
use tracing::debug;

use crate::core::record::{AlignmentRecord, HicTags};
use crate::core::types::{FilterDecision, InteractionType, Orientation};
use crate::diagnostics::{Diagnostics, Severity};
use crate::digest::index::{DigestIndex, LocateError};
use crate::pairing::classify::{classify, ClassifiedPair, PairMetrics};
use crate::pairing::filter::{FilterCounts, FilterEngine};
use crate::pairing::summary::Summary;
use crate::pairing::validation::validate;
use crate::parsing::sam::{ParseError, SamRecordReader};

/// Columns of the extract table
pub const EXTRACT_HEADER: &str =
    "sample\torientation\tinteraction_type\tditag_length\tinsert_size\tfragment_separation";

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Odd number of alignments: no mate for '{qname}'")]
    TruncatedStream { qname: String },

    #[error("Record {record}: {source}")]
    Parse {
        record: usize,
        #[source]
        source: ParseError,
    },

    #[error("Read pair '{qname}': {source}")]
    Locate {
        qname: String,
        #[source]
        source: LocateError,
    },

    #[error("Read pair '{qname}' has no Hi-C tags and no digest was given")]
    MissingAnnotation { qname: String },

    #[error("A restriction digest is required to {0} read pairs")]
    MissingDigest(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Splits a name-sorted SAM stream into consecutive record pairs.
///
/// The header is read up front and is available from [`PairStream::header`].
pub struct PairStream<R> {
    reader: SamRecordReader<R>,
    done: bool,
}

impl<R: BufRead> PairStream<R> {
    /// # Errors
    ///
    /// Returns `DriverError::Parse` if the header can't be read.
    pub fn new(inner: R) -> Result<Self, DriverError> {
        let reader =
            SamRecordReader::new(inner).map_err(|source| DriverError::Parse { record: 0, source })?;
        Ok(Self {
            reader,
            done: false,
        })
    }

    #[must_use]
    pub fn header(&self) -> &sam::Header {
        self.reader.header()
    }

    fn next_record(&mut self) -> Result<Option<AlignmentRecord>, DriverError> {
        self.reader
            .read_record()
            .map_err(|source| DriverError::Parse {
                record: self.reader.records_read(),
                source,
            })
    }

    fn next_pair(&mut self) -> Result<Option<(AlignmentRecord, AlignmentRecord)>, DriverError> {
        let Some(first) = self.next_record()? else {
            return Ok(None);
        };
        let Some(second) = self.next_record()? else {
            return Err(DriverError::TruncatedStream {
                qname: first.qname(),
            });
        };
        Ok(Some((first, second)))
    }
}

impl<R: BufRead> Iterator for PairStream<R> {
    type Item = Result<(AlignmentRecord, AlignmentRecord), DriverError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_pair().transpose();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

/// What to do with each classified pair
#[derive(Debug, Clone)]
pub enum Mode {
    /// Write only pairs that pass the filter rules
    Filter(FilterEngine),
    /// Write every pair, tagging the valid ones
    Annotate,
    /// Write one table row per valid pair instead of SAM
    Extract,
}

impl Mode {
    /// Subcommand name of the mode
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Filter(_) => "filter",
            Self::Annotate => "annotate",
            Self::Extract => "extract",
        }
    }
}

/// Pair-level columns of one extract row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ExtractRow {
    orientation: Orientation,
    interaction: InteractionType,
    ditag_length: i64,
    insert_size: i64,
    fragment_separation: u32,
}

impl ExtractRow {
    fn from_metrics(m: &PairMetrics) -> Self {
        Self {
            orientation: m.orientation,
            interaction: m.interaction,
            ditag_length: m.ditag_length,
            insert_size: m.insert_size,
            fragment_separation: m.fragment_separation,
        }
    }

    /// Row from tags left by an earlier `annotate` run
    fn from_tags(tags: &HicTags) -> Option<Self> {
        Some(Self {
            orientation: tags.orientation?,
            interaction: tags.interaction?,
            ditag_length: tags.ditag_length?,
            insert_size: tags.insert_size?,
            fragment_separation: tags.fragment_separation?,
        })
    }

    fn write<W: Write>(&self, output: &mut W, sample: &str) -> io::Result<()> {
        writeln!(
            output,
            "{sample}\t{}\t{}\t{}\t{}\t{}",
            self.orientation,
            self.interaction,
            self.ditag_length,
            self.insert_size,
            self.fragment_separation
        )
    }
}

/// Runs a SAM stream through validation, classification and filtering
pub struct Driver<'a> {
    index: Option<&'a DigestIndex>,
    diagnostics: &'a dyn Diagnostics,
    sample: String,
}

impl<'a> Driver<'a> {
    /// Without an index only [`Mode::Extract`] can run, and it reads the
    /// metrics from the Hi-C tags already on the records.
    pub fn new(
        index: Option<&'a DigestIndex>,
        diagnostics: &'a dyn Diagnostics,
        sample: impl Into<String>,
    ) -> Self {
        Self {
            index,
            diagnostics,
            sample: sample.into(),
        }
    }

    /// Process the whole stream and return the per-category counts.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed record, unpaired trailing record, read on
    /// a reference missing from the digest, or write failure. No summary is
    /// returned in that case.
    pub fn run<R: BufRead, W: Write>(
        &self,
        input: R,
        output: &mut W,
        mode: &Mode,
    ) -> Result<Summary, DriverError> {
        if self.index.is_none() && !matches!(mode, Mode::Extract) {
            return Err(DriverError::MissingDigest(mode.name()));
        }

        let pairs = PairStream::new(input)?;
        let header = pairs.header().clone();
        let mut writer = sam::io::Writer::new(output);

        match mode {
            Mode::Extract => writeln!(writer.get_mut(), "{EXTRACT_HEADER}")?,
            Mode::Filter(_) | Mode::Annotate => writer.write_header(&header)?,
        }

        let mut counts = FilterCounts::default();
        for pair in pairs {
            let (r1, r2) = pair?;
            let decision = self.process_pair(r1, r2, &mut writer, &header, mode)?;
            counts.record(decision);
        }
        writer.get_mut().flush()?;

        self.diagnostics.report(
            Severity::Info,
            &format!(
                "{}: {} read pairs, {} retained",
                self.sample, counts.total, counts.retained
            ),
        );

        let config = match mode {
            Mode::Filter(engine) => Some(*engine.config()),
            Mode::Annotate | Mode::Extract => None,
        };
        Ok(Summary::new(self.sample.clone(), counts, config))
    }

    fn process_pair<W: Write>(
        &self,
        mut r1: AlignmentRecord,
        mut r2: AlignmentRecord,
        writer: &mut sam::io::Writer<W>,
        header: &sam::Header,
        mode: &Mode,
    ) -> Result<FilterDecision, DriverError> {
        if let Err(invalid) = validate(&r1, &r2) {
            self.diagnostics.report(Severity::Warning, &invalid.to_string());
            if matches!(mode, Mode::Annotate) {
                // Stale annotations from an earlier run would no longer hold
                r1.tags = HicTags::default();
                r2.tags = HicTags::default();
                write_pair(writer, header, r1, r2)?;
            }
            return Ok(FilterDecision::InvalidFormat);
        }

        let Some(index) = self.index else {
            let row = ExtractRow::from_tags(&r1.tags)
                .ok_or_else(|| DriverError::MissingAnnotation { qname: r1.qname() })?;
            row.write(writer.get_mut(), &self.sample)?;
            return Ok(FilterDecision::Retained);
        };

        let qname = r1.qname();
        let pair = classify(r1, r2, index).map_err(|source| DriverError::Locate { qname, source })?;

        match mode {
            Mode::Filter(engine) => {
                let decision = engine.decide(Some(&pair.metrics));
                if decision.is_retained() {
                    emit_tagged(writer, header, pair)?;
                } else {
                    debug!("{}: {decision}", pair.left.qname());
                }
                Ok(decision)
            }
            Mode::Annotate => {
                emit_tagged(writer, header, pair)?;
                Ok(FilterDecision::Retained)
            }
            Mode::Extract => {
                ExtractRow::from_metrics(&pair.metrics).write(writer.get_mut(), &self.sample)?;
                Ok(FilterDecision::Retained)
            }
        }
    }
}

fn emit_tagged<W: Write>(
    writer: &mut sam::io::Writer<W>,
    header: &sam::Header,
    pair: ClassifiedPair,
) -> io::Result<()> {
    let (first, second) = pair.into_tagged_records();
    write_pair(writer, header, first, second)
}

fn write_pair<W: Write>(
    writer: &mut sam::io::Writer<W>,
    header: &sam::Header,
    first: AlignmentRecord,
    second: AlignmentRecord,
) -> io::Result<()> {
    writer.write_alignment_record(header, &first.into_record_buf())?;
    writer.write_alignment_record(header, &second.into_record_buf())
}
