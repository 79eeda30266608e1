use gost2bib_core::{Field, FieldMap, RecordKind};

/// Decorative output conventions that do not depend on the citation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryStyle {
    /// Entry-key prefix; `None` uses the BibTeX type (`article3`, `book4`).
    pub key_prefix: Option<String>,
    /// Constant language tag rendered as a trailing `langid` field.
    pub language: Option<String>,
}

/// How a value is written after `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    Braced,
    Bare,
}

/// One `name = value` line of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub name: &'static str,
    pub field: Field,
    pub quoting: Quoting,
}

const fn braced(name: &'static str, field: Field) -> Slot {
    Slot {
        name,
        field,
        quoting: Quoting::Braced,
    }
}

const fn bare(name: &'static str, field: Field) -> Slot {
    Slot {
        name,
        field,
        quoting: Quoting::Bare,
    }
}

const ARTICLE_PAGED: &[Slot] = &[
    braced("author", Field::Authors),
    braced("title", Field::Title),
    braced("journal", Field::Journal),
    bare("year", Field::Year),
    bare("issue", Field::Issue),
    braced("pages", Field::Pages),
];

const ARTICLE: &[Slot] = &[
    braced("author", Field::Authors),
    braced("title", Field::Title),
    braced("journal", Field::Journal),
    bare("year", Field::Year),
    bare("issue", Field::Issue),
];

const BOOK: &[Slot] = &[
    braced("author", Field::Authors),
    braced("title", Field::Title),
    braced("publisher", Field::Publisher),
    bare("year", Field::Year),
    braced("address", Field::City),
];

const THESIS: &[Slot] = &[
    braced("author", Field::Authors),
    braced("title", Field::Title),
    bare("year", Field::Year),
    braced("address", Field::City),
];

const CHAPTER_PAGED: &[Slot] = &[
    braced("author", Field::Authors),
    braced("title", Field::Title),
    braced("booktitle", Field::Booktitle),
    braced("pages", Field::Pages),
    braced("publisher", Field::Publisher),
    bare("year", Field::Year),
    braced("address", Field::City),
];

const CHAPTER: &[Slot] = &[
    braced("author", Field::Authors),
    braced("title", Field::Title),
    braced("booktitle", Field::Booktitle),
    braced("publisher", Field::Publisher),
    bare("year", Field::Year),
    braced("address", Field::City),
];

/// The six output templates, keyed by record kind and paged variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryShape {
    ArticlePaged,
    Article,
    Book,
    Thesis,
    ChapterPaged,
    Chapter,
}

impl EntryShape {
    /// Books and dissertations have no paged variant; `paged` is ignored for them.
    pub fn for_kind(kind: RecordKind, paged: bool) -> Self {
        match (kind, paged) {
            (RecordKind::Article, true) => EntryShape::ArticlePaged,
            (RecordKind::Article, false) => EntryShape::Article,
            (RecordKind::Book, _) => EntryShape::Book,
            (RecordKind::Dissertation, _) => EntryShape::Thesis,
            (RecordKind::Chapter, true) => EntryShape::ChapterPaged,
            (RecordKind::Chapter, false) => EntryShape::Chapter,
        }
    }

    pub fn kind(self) -> RecordKind {
        match self {
            EntryShape::ArticlePaged | EntryShape::Article => RecordKind::Article,
            EntryShape::Book => RecordKind::Book,
            EntryShape::Thesis => RecordKind::Dissertation,
            EntryShape::ChapterPaged | EntryShape::Chapter => RecordKind::Chapter,
        }
    }

    pub fn slots(self) -> &'static [Slot] {
        match self {
            EntryShape::ArticlePaged => ARTICLE_PAGED,
            EntryShape::Article => ARTICLE,
            EntryShape::Book => BOOK,
            EntryShape::Thesis => THESIS,
            EntryShape::ChapterPaged => CHAPTER_PAGED,
            EntryShape::Chapter => CHAPTER,
        }
    }
}

/// Entry key, e.g. `article12` or `ref12` with a custom prefix.
pub fn entry_key(kind: RecordKind, number: usize, style: &EntryStyle) -> String {
    let prefix = style.key_prefix.as_deref().unwrap_or(kind.bibtex_type());
    format!("{}{}", prefix, number)
}

/// BibTeX only accepts plain digit runs unbraced; ranges like "7-8" are not.
fn is_bare_number(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Render one BibTeX record. Values are inserted verbatim.
pub fn render_entry(
    shape: EntryShape,
    number: usize,
    fields: &FieldMap,
    style: &EntryStyle,
) -> String {
    let kind = shape.kind();
    let slots = shape.slots();

    let mut lines: Vec<(&str, String)> = slots
        .iter()
        .map(|slot| {
            let value = fields.get(slot.field).unwrap_or("");
            let rendered = match slot.quoting {
                Quoting::Bare if is_bare_number(value) => value.to_string(),
                _ => format!("{{{}}}", value),
            };
            (slot.name, rendered)
        })
        .collect();

    if let Some(language) = &style.language {
        lines.push(("langid", format!("{{{}}}", language)));
    }

    let width = lines.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut out = format!(
        "@{}{{{},\n",
        kind.bibtex_type(),
        entry_key(kind, number, style)
    );
    let body: Vec<String> = lines
        .iter()
        .map(|(name, value)| format!("  {:<width$} = {}", name, value, width = width))
        .collect();
    out.push_str(&body.join(",\n"));
    out.push_str("\n}\n");
    out
}
