use gost2bib_core::{ParseError, RecordKind};

/// One row of the classification table: if `marker` occurs in the
/// normalized text, the line is of kind `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindRule {
    pub kind: RecordKind,
    pub marker: &'static str,
    pub case_insensitive: bool,
}

impl KindRule {
    pub fn matches(&self, text: &str) -> bool {
        if self.case_insensitive {
            text.to_lowercase().contains(self.marker)
        } else {
            text.contains(self.marker)
        }
    }
}

/// Classification rules in priority order. Markers can co-occur (an article
/// about a dissertation, a chapter whose booktitle has a colon), so the
/// first matching rule wins.
pub const RULES: [KindRule; 4] = [
    KindRule {
        kind: RecordKind::Article,
        marker: "№",
        case_insensitive: false,
    },
    KindRule {
        kind: RecordKind::Dissertation,
        marker: "дисс",
        case_insensitive: true,
    },
    KindRule {
        kind: RecordKind::Chapter,
        marker: "//",
        case_insensitive: false,
    },
    KindRule {
        kind: RecordKind::Book,
        marker: ":",
        case_insensitive: false,
    },
];

/// Decide the record kind of a normalized citation line.
pub fn classify(text: &str) -> Result<RecordKind, ParseError> {
    RULES
        .iter()
        .find(|rule| rule.matches(text))
        .map(|rule| rule.kind)
        .ok_or(ParseError::UnclassifiableLine)
}
