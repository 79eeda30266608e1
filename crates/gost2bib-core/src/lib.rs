use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config_file;

/// One raw line of a reference list together with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationLine {
    pub number: usize,
    pub text: String,
}

impl CitationLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// The publication kind a citation line describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Article,
    Dissertation,
    Chapter,
    Book,
}

impl RecordKind {
    /// BibTeX entry type for this kind.
    pub fn bibtex_type(self) -> &'static str {
        match self {
            RecordKind::Article => "article",
            RecordKind::Dissertation => "phdthesis",
            RecordKind::Chapter => "incollection",
            RecordKind::Book => "book",
        }
    }

    /// Short name used in diagnostics ("Error diss 4: ...").
    pub fn short_name(self) -> &'static str {
        match self {
            RecordKind::Article => "article",
            RecordKind::Dissertation => "diss",
            RecordKind::Chapter => "chapter",
            RecordKind::Book => "book",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Article => "Article",
            RecordKind::Dissertation => "Dissertation",
            RecordKind::Chapter => "Chapter",
            RecordKind::Book => "Book",
        };
        f.write_str(name)
    }
}

/// Names of the fields an extractor can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Authors,
    Title,
    Journal,
    Booktitle,
    Year,
    Volume,
    Issue,
    Pages,
    City,
    Publisher,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Authors => "authors",
            Field::Title => "title",
            Field::Journal => "journal",
            Field::Booktitle => "booktitle",
            Field::Year => "year",
            Field::Volume => "volume",
            Field::Issue => "issue",
            Field::Pages => "pages",
            Field::City => "city",
            Field::Publisher => "publisher",
        }
    }

    /// Inverse of [`Field::as_str`]; also used to map regex group names.
    pub fn from_name(name: &str) -> Option<Field> {
        let field = match name {
            "authors" => Field::Authors,
            "title" => Field::Title,
            "journal" => Field::Journal,
            "booktitle" => Field::Booktitle,
            "year" => Field::Year,
            "volume" => Field::Volume,
            "issue" => Field::Issue,
            "pages" => Field::Pages,
            "city" => Field::City,
            "publisher" => Field::Publisher,
            _ => return None,
        };
        Some(field)
    }

    /// Free-text fields lose trailing periods during post-processing.
    pub fn is_free_text(self) -> bool {
        matches!(self, Field::Title | Field::Journal | Field::Booktitle)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracted key/value pairs for one citation line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<Field, String>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Field, &mut String)> {
        self.0.iter_mut().map(|(k, v)| (*k, v))
    }
}

/// A successfully converted citation line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BibEntry {
    pub number: usize,
    pub kind: RecordKind,
    /// Whether the paged variant of the kind matched.
    pub paged: bool,
    pub fields: FieldMap,
    /// The rendered BibTeX record.
    pub text: String,
}

/// Why a citation line could not be converted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// None of the kind markers were found.
    #[error("Bad bib entry")]
    UnclassifiableLine,
    /// The line was classified but its kind-specific pattern did not match.
    #[error("Error {}", mismatch_tag(.kind, .paged))]
    PatternMismatch { kind: RecordKind, paged: bool },
}

fn mismatch_tag(kind: &RecordKind, paged: &bool) -> String {
    if *paged {
        format!("paged {}", kind.short_name())
    } else {
        kind.short_name().to_string()
    }
}

/// A per-line failure diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub number: usize,
    pub error: ParseError,
    /// The original, un-normalized line.
    pub text: String,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.error, self.number, self.text)
    }
}

/// Result of converting a single line.
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Entry(BibEntry),
    Failed(ParseFailure),
}

impl ParseOutcome {
    pub fn entry(&self) -> Option<&BibEntry> {
        match self {
            ParseOutcome::Entry(e) => Some(e),
            ParseOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ParseFailure> {
        match self {
            ParseOutcome::Entry(_) => None,
            ParseOutcome::Failed(f) => Some(f),
        }
    }
}

/// Per-kind counters collected while converting a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub total_lines: usize,
    pub articles: usize,
    pub dissertations: usize,
    pub chapters: usize,
    pub books: usize,
    pub unclassifiable: usize,
    pub mismatched: usize,
}

impl ConversionStats {
    pub fn converted(&self) -> usize {
        self.articles + self.dissertations + self.chapters + self.books
    }

    pub fn failed(&self) -> usize {
        self.unclassifiable + self.mismatched
    }

    pub fn record(&mut self, outcome: &ParseOutcome) {
        self.total_lines += 1;
        match outcome {
            ParseOutcome::Entry(entry) => match entry.kind {
                RecordKind::Article => self.articles += 1,
                RecordKind::Dissertation => self.dissertations += 1,
                RecordKind::Chapter => self.chapters += 1,
                RecordKind::Book => self.books += 1,
            },
            ParseOutcome::Failed(failure) => match failure.error {
                ParseError::UnclassifiableLine => self.unclassifiable += 1,
                ParseError::PatternMismatch { .. } => self.mismatched += 1,
            },
        }
    }
}

/// Result of converting a whole reference list, in input order.
#[derive(Debug, Clone, Default)]
pub struct ConversionResult {
    pub entries: Vec<BibEntry>,
    pub failures: Vec<ParseFailure>,
    pub stats: ConversionStats,
}
