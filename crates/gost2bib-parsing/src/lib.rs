pub mod authors;
pub mod classify;
pub mod config;
pub mod converter;
pub mod fields;
pub mod render;
pub mod text_processing;

pub use authors::AuthorStyle;
pub use config::{ConfigError, ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use converter::{citation_lines, Converter, LineReport};
pub use fields::Extraction;
pub use render::{EntryShape, EntryStyle};
// Re-export domain types from core (canonical definitions live there)
pub use gost2bib_core::{
    BibEntry, CitationLine, ConversionResult, ConversionStats, Field, FieldMap, ParseError,
    ParseFailure, ParseOutcome, RecordKind,
};

/// Convert a single citation line with the default configuration.
///
/// Pipeline:
/// 1. Normalize the raw text (enumeration prefix, quotes, boilerplate)
/// 2. Classify it as article, dissertation, chapter or book
/// 3. Extract the kind-specific fields and the author list
/// 4. Post-process the field values
/// 5. Render the BibTeX record
pub fn convert_line(number: usize, text: &str) -> ParseOutcome {
    Converter::new().convert_line(&CitationLine::new(number, text))
}
