use once_cell::sync::Lazy;
use regex::Regex;

use gost2bib_core::FieldMap;

use crate::config::ParsingConfig;

/// Phrases that carry no bibliographic data: "et al.", "ed. by",
/// the abstract marker and the issue-number label.
pub const DEFAULT_BOILERPLATE: &[&str] = &["и др.", "Отв. ред.", "А/р.", "Вып."];

pub(crate) static DEFAULT_BOILERPLATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    DEFAULT_BOILERPLATE
        .iter()
        .map(|phrase| Regex::new(&regex::escape(phrase)).unwrap())
        .collect()
});

/// Normalize a raw citation line before classification.
///
/// - `"12. Иванов И.И. ..."` → `"Иванов И.И. ..."` (enumeration prefix)
/// - `«Наука»` → `<<Наука>>`
/// - `"и др."`, `"Отв. ред."`, `"А/р."`, `"Вып."` are removed
/// - `"дисс"` → `"Дисс"`
pub fn normalize(text: &str) -> String {
    normalize_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`normalize`].
///
/// Only the first leading enumeration prefix is stripped. The remaining
/// substitutions are repeated until the text stops changing, so a removal
/// that exposes another removable phrase is handled.
pub(crate) fn normalize_with_config(text: &str, config: &ParsingConfig) -> String {
    static ENUM_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.").unwrap());

    let patterns = config.boilerplate.resolve(&DEFAULT_BOILERPLATE_PATTERNS);

    let mut current = ENUM_PREFIX.replace(text.trim(), "").trim().to_string();
    loop {
        let next = normalize_once(&current, &patterns);
        if next == current {
            tracing::trace!(normalized = %next, "normalized citation line");
            return next;
        }
        current = next;
    }
}

fn normalize_once(text: &str, boilerplate: &[Regex]) -> String {
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

    let mut text = text.replace('«', "<<").replace('»', ">>");

    for re in boilerplate {
        text = re.replace_all(&text, "").into_owned();
    }

    let text = text.replace("дисс", "Дисс");
    WS_RE.replace_all(text.trim(), " ").into_owned()
}

/// Clean one extracted value: trim whitespace and, for free-text fields,
/// drop trailing periods so the template's closing brace follows the text.
pub fn clean_value(value: &str, free_text: bool) -> String {
    let value = value.trim();
    if free_text {
        value
            .trim_end_matches(|c: char| c == '.' || c.is_whitespace())
            .to_string()
    } else {
        value.to_string()
    }
}

/// Apply [`clean_value`] to every entry of a field map.
pub fn post_process(fields: &mut FieldMap) {
    for (field, value) in fields.iter_mut() {
        *value = clean_value(value, field.is_free_text());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gost2bib_core::Field;

    #[test]
    fn test_strips_enumeration_prefix() {
        assert_eq!(
            normalize("12. Иванов И.И. Книга. М.: Наука, 2001"),
            "Иванов И.И. Книга. М.: Наука, 2001"
        );
        assert_eq!(normalize("Иванов И.И. Книга"), "Иванов И.И. Книга");
    }

    #[test]
    fn test_strips_only_one_enumeration_prefix() {
        assert_eq!(
            normalize("1. 2019. Иванов И.И. Книга. М.: Наука, 2001"),
            "2019. Иванов И.И. Книга. М.: Наука, 2001"
        );
        assert_eq!(
            normalize("  7.Иванов И.И. Книга"),
            "Иванов И.И. Книга"
        );
    }

    #[test]
    fn test_replaces_guillemets() {
        assert_eq!(
            normalize("Иванов И.И. Книга. М.: «Наука», 2001"),
            "Иванов И.И. Книга. М.: <<Наука>>, 2001"
        );
    }

    #[test]
    fn test_removes_boilerplate() {
        assert_eq!(
            normalize("Иванов И.И., Петров П.П. и др. Статья // Журнал. 2001. Вып. № 3"),
            "Иванов И.И., Петров П.П. Статья // Журнал. 2001. № 3"
        );
        assert_eq!(
            normalize("Сборник / Отв. ред. Сидоров С.С. А/р. М.: Наука, 2003"),
            "Сборник / Сидоров С.С. М.: Наука, 2003"
        );
    }

    #[test]
    fn test_capitalizes_dissertation_marker() {
        assert_eq!(
            normalize("Кузнецов К.К. Методы. дисс. ... канд. наук. Москва, 2010"),
            "Кузнецов К.К. Методы. Дисс. ... канд. наук. Москва, 2010"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "1. Иванов И.И. Книга. М.: Наука, 2001",
            "Иванов И.И. ВыВып.п. Статья",
            "  3.  Иванов И.И.  и др.  «Книга»  дисс  ",
            "",
            "без маркеров",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_custom_boilerplate() {
        use crate::ParsingConfigBuilder;
        let config = ParsingConfigBuilder::new()
            .add_boilerplate_pattern(r"Под ред\. [А-Я]\.[А-Я]\. [А-Я][а-я]+\.".to_string())
            .build()
            .unwrap();
        assert_eq!(
            normalize_with_config("Сборник. Под ред. И.И. Иванова. и др. М.: Наука, 2003", &config),
            "Сборник. М.: Наука, 2003"
        );

        // Replacing the list drops the built-in phrases
        let config = ParsingConfigBuilder::new()
            .set_boilerplate_patterns(vec!["А/р\\.".to_string()])
            .build()
            .unwrap();
        assert_eq!(
            normalize_with_config("Иванов И.И. и др. А/р. Книга", &config),
            "Иванов И.И. и др. Книга"
        );
    }

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value("  Журнал теории. ", true), "Журнал теории");
        assert_eq!(clean_value("Журнал теории. . ", true), "Журнал теории");
        assert_eq!(clean_value(" М. ", false), "М.");
        assert_eq!(clean_value("", true), "");
    }

    #[test]
    fn test_post_process_is_idempotent() {
        let mut fields = FieldMap::new();
        fields.insert(Field::Title, " Анализ систем.. ");
        fields.insert(Field::Journal, "Вестник. ");
        fields.insert(Field::Year, " 2019 ");
        fields.insert(Field::City, "СПб. ");

        post_process(&mut fields);
        assert_eq!(fields.get(Field::Title), Some("Анализ систем"));
        assert_eq!(fields.get(Field::Journal), Some("Вестник"));
        assert_eq!(fields.get(Field::Year), Some("2019"));
        assert_eq!(fields.get(Field::City), Some("СПб."));

        let once = fields.clone();
        post_process(&mut fields);
        assert_eq!(fields, once);
    }
}
