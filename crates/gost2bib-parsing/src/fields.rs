//! Kind-specific field extraction.
//!
//! Every pattern is anchored at the start of the normalized line and uses the
//! structural tokens of the citation (`//`, `№`, `:`, `С.`, the comma before
//! the year) to bound greedy free-text spans. Named groups carry the field
//! names from [`Field::as_str`], so a match converts directly into a
//! [`FieldMap`].

use once_cell::sync::Lazy;
use regex::Regex;

use gost2bib_core::{Field, FieldMap, ParseError, RecordKind};

use crate::authors;
use crate::config::ParsingConfig;
use crate::text_processing;

/// Fields extracted from one line, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub kind: RecordKind,
    pub paged: bool,
    pub fields: FieldMap,
}

// Leading "Surname I.I., Surname I. " run. The author list itself is built
// separately by `authors`; here the run only has to be skipped.
macro_rules! authors_prefix {
    () => {
        r"^(?:\S+\s+(?:[А-ЯЁ]\.){1,2},?\s)+\s*"
    };
}

macro_rules! pages {
    () => {
        r"(?P<pages>[0-9\-–—]+)"
    };
}

static ARTICLE_PAGED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        authors_prefix!(),
        r"(?P<title>[^/]+)//\s*(?P<journal>.+)(?P<year>\d{4,})\.\s*(?:[ТT]\.)?\s*(?P<volume>[\d\-]+)?[.,]?",
        r"\s*№\s*(?P<issue>[\d\-]+)[.,][^С]*С\.\s*",
        pages!(),
    ))
    .unwrap()
});

static ARTICLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        authors_prefix!(),
        r"(?P<title>[^/]+)//\s*(?P<journal>.+)(?P<year>\d{4,})\.\s*(?:[ТT]\.)?\s*(?P<volume>[\d\-]+)?[.,]?",
        r"\s*№\s*(?P<issue>[\d\-]+)",
    ))
    .unwrap()
});

static DISS_DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        authors_prefix!(),
        r"(?P<title>.+)Дисс.*наук\.\s*(?P<city>[^,]+?)\.?,\s*(?P<year>\d+)",
    ))
    .unwrap()
});

static DISS_DISCIPLINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        authors_prefix!(),
        r"(?P<title>.+)Дисс.*логии\.\s*(?P<city>[^,]+?)\.?,\s*(?P<year>\d+)",
    ))
    .unwrap()
});

static CHAPTER_PAGED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        authors_prefix!(),
        r"(?P<title>[^/]+)//(?P<booktitle>.+)\s(?P<city>[^\s:]+?)\.?:\s*(?P<publisher>[^,]+),\s*(?P<year>\d+)",
        r"[.,]\s*С\.\s*",
        pages!(),
    ))
    .unwrap()
});

static CHAPTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        authors_prefix!(),
        r"(?P<title>[^/]+)//(?P<booktitle>.+)\s(?P<city>[^\s:]+?)\.?:\s*(?P<publisher>[^,]+),\s*(?P<year>\d+)",
    ))
    .unwrap()
});

static BOOK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        authors_prefix!(),
        r"(?P<title>[^.]+)\.\s*(?P<city>[^:]+?)\.?\s*:\s*(?P<publisher>[^,]+),\s*(?P<year>\d+)",
    ))
    .unwrap()
});

/// A page reference: "С." followed by a page number. Initials such as
/// "С.С." do not count.
pub fn has_page_marker(text: &str) -> bool {
    static PAGE_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"С\.\s*\d").unwrap());
    PAGE_MARKER_RE.is_match(text)
}

/// Where the author-bearing prefix of each kind ends, in order of preference.
/// Books have no separator; their authors precede the title-ending period.
fn author_delimiters(kind: RecordKind) -> &'static [&'static str] {
    match kind {
        RecordKind::Article | RecordKind::Chapter => &["//"],
        RecordKind::Dissertation => &["//", "Дисс"],
        RecordKind::Book => &[],
    }
}

/// Choose the dissertation pattern by the anchor that precedes the city.
fn dissertation_pattern(text: &str) -> Option<&'static Regex> {
    if text.contains("наук") {
        Some(&*DISS_DEGREE_RE)
    } else if text.contains("логии") {
        Some(&*DISS_DISCIPLINE_RE)
    } else {
        None
    }
}

/// Extract the fields of a normalized line already classified as `kind`.
pub fn extract_fields(text: &str, kind: RecordKind) -> Result<Extraction, ParseError> {
    extract_fields_with_config(text, kind, &ParsingConfig::default())
}

/// Config-aware version of [`extract_fields`].
pub(crate) fn extract_fields_with_config(
    text: &str,
    kind: RecordKind,
    config: &ParsingConfig,
) -> Result<Extraction, ParseError> {
    let (pattern, paged): (&Regex, bool) = match kind {
        RecordKind::Article if has_page_marker(text) => (&*ARTICLE_PAGED_RE, true),
        RecordKind::Article => (&*ARTICLE_RE, false),
        RecordKind::Dissertation => (
            dissertation_pattern(text).ok_or(ParseError::UnclassifiableLine)?,
            false,
        ),
        RecordKind::Chapter if has_page_marker(text) => (&*CHAPTER_PAGED_RE, true),
        RecordKind::Chapter => (&*CHAPTER_RE, false),
        RecordKind::Book => (&*BOOK_RE, false),
    };

    let caps = pattern
        .captures(text)
        .ok_or(ParseError::PatternMismatch { kind, paged })?;

    let mut fields = FieldMap::new();
    for name in pattern.capture_names().flatten() {
        if let (Some(field), Some(m)) = (Field::from_name(name), caps.name(name)) {
            fields.insert(field, m.as_str());
        }
    }

    let end = authors::span_end(text, author_delimiters(kind));
    fields.insert(
        Field::Authors,
        authors::extract_authors_with_style(text, end, config.author_style),
    );

    text_processing::post_process(&mut fields);

    tracing::debug!(kind = %kind, paged, fields = fields.len(), "extracted fields");

    Ok(Extraction {
        kind,
        paged,
        fields,
    })
}
