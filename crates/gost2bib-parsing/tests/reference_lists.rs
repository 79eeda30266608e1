//! End-to-end conversion of whole reference lists.
//!
//! Each list is split into numbered lines, converted, and the rendered
//! BibTeX is parsed back with `biblatex` to check that the output is a
//! well-formed bibliography carrying the extracted values.

use anyhow::{anyhow, Result};
use gost2bib_parsing::{
    citation_lines, Converter, ConversionResult, ParseError, ParsingConfigBuilder, RecordKind,
};

const REFERENCE_LIST: &str = "\
1. Иванов И.И., Петров П.П. Анализ систем // Журнал теории. 2019. Т. 5. № 2. С. 10-20
2. Сидоров С.С. Теория и практика. М.: Наука, 2001
3. Кузнецов К.К. Методы анализа. Дисс. ... канд. наук. Москва, 2010

5. Петров П.П. Глава о методах // Сборник трудов / Отв. ред. Сидоров С.С. М.: Наука, 2005. С. 15-30
6. Смирнова А.В. Новые данные // Вопросы истории. 2004. № 7
7. Орлова О.О. Городская среда. Дисс. ... канд. социологии. СПб., 2008
8. Сидоров С.С. Теория и практика. Москва, 2001
9. Иванов И.И. Статья // Журнал. № 2. С. 10-20
10. Петров П.П., Орлов О.О. и др. Глава // Сборник. Новосибирск: «Наука», 2007
11. Смирнова А.В. Новые данные // Вопросы истории. 2004. Т. 12. № 7-8
";

fn convert(content: &str) -> ConversionResult {
    Converter::new().convert_lines(citation_lines(content, 1))
}

/// Convert biblatex chunks to a plain string.
fn chunks_to_string(chunks: &[biblatex::Spanned<biblatex::Chunk>]) -> String {
    chunks
        .iter()
        .map(|c| match &c.v {
            biblatex::Chunk::Normal(s) => s.as_str(),
            biblatex::Chunk::Verbatim(s) => s.as_str(),
            biblatex::Chunk::Math(s) => s.as_str(),
        })
        .collect::<Vec<_>>()
        .join("")
}

fn parse_bibliography(result: &ConversionResult) -> Result<biblatex::Bibliography> {
    let text: String = result
        .entries
        .iter()
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    biblatex::Bibliography::parse(&text).map_err(|e| anyhow!("rendered BibTeX is invalid: {:?}", e))
}

fn field(bib: &biblatex::Bibliography, key: &str, name: &str) -> Option<String> {
    bib.get(key)
        .and_then(|entry| entry.get(name))
        .map(chunks_to_string)
}

#[test]
fn every_line_yields_exactly_one_outcome() {
    let result = convert(REFERENCE_LIST);
    let lines = citation_lines(REFERENCE_LIST, 1);

    assert_eq!(lines.len(), 10);
    assert_eq!(result.stats.total_lines, lines.len());
    assert_eq!(result.entries.len() + result.failures.len(), lines.len());

    for line in &lines {
        let entries = result.entries.iter().filter(|e| e.number == line.number).count();
        let failures = result.failures.iter().filter(|f| f.number == line.number).count();
        assert_eq!(entries + failures, 1, "line {} has {} outcomes", line.number, entries + failures);
    }
}

#[test]
fn outcomes_follow_input_order() {
    let result = convert(REFERENCE_LIST);

    let converted: Vec<_> = result.entries.iter().map(|e| (e.number, e.kind)).collect();
    assert_eq!(
        converted,
        vec![
            (1, RecordKind::Article),
            (2, RecordKind::Book),
            (3, RecordKind::Dissertation),
            (5, RecordKind::Chapter),
            (6, RecordKind::Article),
            (7, RecordKind::Dissertation),
            (10, RecordKind::Chapter),
            (11, RecordKind::Article),
        ]
    );

    let failed: Vec<_> = result.failures.iter().map(|f| (f.number, f.error.clone())).collect();
    assert_eq!(
        failed,
        vec![
            (8, ParseError::UnclassifiableLine),
            (
                9,
                ParseError::PatternMismatch {
                    kind: RecordKind::Article,
                    paged: true
                }
            ),
        ]
    );
    assert_eq!(
        result.failures[0].to_string(),
        "Bad bib entry 8: 8. Сидоров С.С. Теория и практика. Москва, 2001"
    );
}

#[test]
fn rendered_output_is_valid_bibtex() -> Result<()> {
    let result = convert(REFERENCE_LIST);
    let bib = parse_bibliography(&result)?;

    assert_eq!(bib.len(), result.entries.len());
    for key in [
        "article1",
        "book2",
        "phdthesis3",
        "incollection5",
        "article6",
        "phdthesis7",
        "incollection10",
        "article11",
    ] {
        assert!(bib.get(key).is_some(), "missing entry {}", key);
    }

    assert_eq!(field(&bib, "article1", "title").as_deref(), Some("Анализ систем"));
    assert_eq!(field(&bib, "article1", "journal").as_deref(), Some("Журнал теории"));
    assert_eq!(field(&bib, "article1", "year").as_deref(), Some("2019"));
    assert_eq!(field(&bib, "article1", "issue").as_deref(), Some("2"));
    assert_eq!(field(&bib, "article1", "pages").as_deref(), Some("10-20"));
    assert_eq!(field(&bib, "article6", "pages"), None);
    assert_eq!(field(&bib, "article11", "issue").as_deref(), Some("7-8"));
    assert_eq!(field(&bib, "article11", "year").as_deref(), Some("2004"));

    assert_eq!(field(&bib, "book2", "publisher").as_deref(), Some("Наука"));
    assert_eq!(field(&bib, "book2", "address").as_deref(), Some("М"));

    assert_eq!(field(&bib, "phdthesis3", "address").as_deref(), Some("Москва"));
    assert_eq!(field(&bib, "phdthesis7", "address").as_deref(), Some("СПб"));

    assert_eq!(field(&bib, "incollection5", "pages").as_deref(), Some("15-30"));
    assert_eq!(
        field(&bib, "incollection10", "publisher").as_deref(),
        Some("<<Наука>>")
    );

    Ok(())
}

#[test]
fn author_lists_parse_as_people() -> Result<()> {
    let result = convert(REFERENCE_LIST);
    let bib = parse_bibliography(&result)?;

    let entry = bib.get("article1").ok_or_else(|| anyhow!("article1 missing"))?;
    let people = entry
        .author()
        .map_err(|e| anyhow!("author field unreadable: {:?}", e))?;
    let names: Vec<_> = people
        .iter()
        .map(|p| (p.name.as_str(), p.given_name.as_str()))
        .collect();
    assert_eq!(names, vec![("Иванов", "И.И."), ("Петров", "П.П.")]);

    // "и др." is dropped during normalization
    let entry = bib.get("incollection10").ok_or_else(|| anyhow!("incollection10 missing"))?;
    let people = entry
        .author()
        .map_err(|e| anyhow!("author field unreadable: {:?}", e))?;
    assert_eq!(people.len(), 2);

    Ok(())
}

#[test]
fn custom_style_output_is_valid_bibtex() -> Result<()> {
    let config = ParsingConfigBuilder::new()
        .key_prefix("ref")
        .language("russian")
        .build()?;
    let result = Converter::with_config(config).convert_lines(citation_lines(REFERENCE_LIST, 1));
    let bib = parse_bibliography(&result)?;

    assert_eq!(bib.len(), 8);
    assert_eq!(field(&bib, "ref2", "langid").as_deref(), Some("russian"));
    assert_eq!(field(&bib, "ref7", "year").as_deref(), Some("2008"));
    assert!(bib.get("book2").is_none());

    Ok(())
}

#[test]
fn numbering_can_start_at_zero() {
    let result = Converter::new().convert_lines(citation_lines(REFERENCE_LIST, 0));
    assert_eq!(result.entries[0].number, 0);
    assert!(result.entries[0].text.starts_with("@article{article0,"));
}
