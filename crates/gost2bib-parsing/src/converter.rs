use gost2bib_core::{
    BibEntry, CitationLine, ConversionResult, ParseError, ParseFailure, ParseOutcome, RecordKind,
};

use crate::config::ParsingConfig;
use crate::fields::{self, Extraction};
use crate::render::{self, EntryShape};
use crate::{classify, text_processing};

/// A configurable citation conversion pipeline.
///
/// Holds a [`ParsingConfig`] and exposes each pipeline step as a method.
/// The default constructor uses built-in defaults; use [`Converter::with_config`]
/// to supply custom boilerplate, author style or entry style.
pub struct Converter {
    config: ParsingConfig,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    /// Create a converter with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    /// Create a converter with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Normalize a raw line (step 1).
    pub fn normalize(&self, text: &str) -> String {
        text_processing::normalize_with_config(text, &self.config)
    }

    /// Decide the record kind of a normalized line (step 2).
    pub fn classify(&self, normalized: &str) -> Result<RecordKind, ParseError> {
        classify::classify(normalized)
    }

    /// Extract and post-process the fields of a classified line (step 3).
    pub fn extract(&self, normalized: &str, kind: RecordKind) -> Result<Extraction, ParseError> {
        fields::extract_fields_with_config(normalized, kind, &self.config)
    }

    /// Render an extraction as a BibTeX record (step 4).
    pub fn render(&self, number: usize, extraction: &Extraction) -> String {
        let shape = EntryShape::for_kind(extraction.kind, extraction.paged);
        render::render_entry(
            shape,
            number,
            &extraction.fields,
            self.config.entry_style(),
        )
    }

    /// Run normalization, classification and extraction without rendering.
    pub fn inspect_line(&self, line: &CitationLine) -> LineReport {
        let normalized = self.normalize(&line.text);
        let result = self
            .classify(&normalized)
            .and_then(|kind| self.extract(&normalized, kind));
        LineReport {
            number: line.number,
            normalized,
            result,
        }
    }

    /// Convert one line into exactly one outcome.
    pub fn convert_line(&self, line: &CitationLine) -> ParseOutcome {
        let report = self.inspect_line(line);

        match report.result {
            Ok(extraction) => {
                tracing::debug!(
                    number = line.number,
                    kind = %extraction.kind,
                    paged = extraction.paged,
                    "converted citation"
                );
                let text = self.render(line.number, &extraction);
                ParseOutcome::Entry(BibEntry {
                    number: line.number,
                    kind: extraction.kind,
                    paged: extraction.paged,
                    fields: extraction.fields,
                    text,
                })
            }
            Err(error) => {
                tracing::debug!(
                    number = line.number,
                    reason = %error,
                    normalized = %report.normalized,
                    "citation not converted"
                );
                ParseOutcome::Failed(ParseFailure {
                    number: line.number,
                    error,
                    text: line.text.clone(),
                })
            }
        }
    }

    /// Convert a whole list. Output order follows input order; a failing line
    /// never stops the ones after it.
    pub fn convert_lines<I>(&self, lines: I) -> ConversionResult
    where
        I: IntoIterator<Item = CitationLine>,
    {
        let mut result = ConversionResult::default();

        for line in lines {
            let outcome = self.convert_line(&line);
            result.stats.record(&outcome);
            match outcome {
                ParseOutcome::Entry(entry) => result.entries.push(entry),
                ParseOutcome::Failed(failure) => result.failures.push(failure),
            }
        }

        tracing::debug!(
            total = result.stats.total_lines,
            converted = result.stats.converted(),
            failed = result.stats.failed(),
            "conversion finished"
        );

        result
    }
}

/// Intermediate state of one line, for dry runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineReport {
    pub number: usize,
    pub normalized: String,
    pub result: Result<Extraction, ParseError>,
}

/// Split decoded file contents into numbered citation lines.
///
/// Numbers count physical lines starting at `start`; blank lines are skipped
/// but still consume a number, so diagnostics point at the right line.
pub fn citation_lines(content: &str, start: usize) -> Vec<CitationLine> {
    content
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(idx, text)| CitationLine::new(start + idx, text))
        .collect()
}
