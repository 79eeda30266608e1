use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ConfigError;

/// How a matched author is written into the BibTeX author list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorStyle {
    /// `"Иванов, И.И."`: surname, comma, initials. BibTeX reads this as
    /// family name / given names unambiguously.
    #[default]
    SurnameInitials,
    /// The matched slice as written in the source, e.g. `"Иванов И.И."`.
    Verbatim,
}

impl FromStr for AuthorStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "surname_initials" => Ok(AuthorStyle::SurnameInitials),
            "verbatim" => Ok(AuthorStyle::Verbatim),
            _ => Err(ConfigError::UnknownAuthorStyle(s.to_string())),
        }
    }
}

/// Surname (capitalized Cyrillic word, hyphens allowed), optional comma,
/// then one or two initials.
static AUTHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<surname>[А-ЯЁ][а-яА-ЯёЁ\-]+),?\s+(?P<initials>(?:[А-ЯЁ]\.){1,2})").unwrap()
});

/// Byte offset where the author-bearing prefix ends: the first delimiter
/// (tried in order) found in `text`, or `None` for "no limit".
pub fn span_end(text: &str, delimiters: &[&str]) -> Option<usize> {
    delimiters.iter().find_map(|d| text.find(d))
}

/// Extract the author list from `text[..end]` (or the whole text when `end`
/// is `None`), joined with `" and "`.
///
/// Returns an empty string when no "Surname I.I." group is found.
pub fn extract_authors(text: &str, end: Option<usize>) -> String {
    extract_authors_with_style(text, end, AuthorStyle::default())
}

/// Style-aware version of [`extract_authors`].
pub fn extract_authors_with_style(text: &str, end: Option<usize>, style: AuthorStyle) -> String {
    let span = match end {
        Some(end) if end <= text.len() => &text[..end],
        _ => text,
    };

    AUTHOR_RE
        .captures_iter(span)
        .map(|caps| match style {
            AuthorStyle::SurnameInitials => format!("{}, {}", &caps["surname"], &caps["initials"]),
            AuthorStyle::Verbatim => caps[0].to_string(),
        })
        .collect::<Vec<_>>()
        .join(" and ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str =
        "Иванов И.И., Петров П.П. Анализ систем // Журнал теории. 2019. Т. 5. № 2. С. 10-20";

    #[test]
    fn test_two_authors_before_separator() {
        let end = span_end(ARTICLE, &["//"]);
        assert_eq!(
            extract_authors(ARTICLE, end),
            "Иванов, И.И. and Петров, П.П."
        );
    }

    #[test]
    fn test_verbatim_style() {
        let end = span_end(ARTICLE, &["//"]);
        assert_eq!(
            extract_authors_with_style(ARTICLE, end, AuthorStyle::Verbatim),
            "Иванов И.И. and Петров П.П."
        );
    }

    #[test]
    fn test_span_excludes_text_after_separator() {
        let text = "Иванов И.И. Глава // Сборник / Под ред. Сидоров С.С. М.: Наука, 2005";
        let end = span_end(text, &["//"]);
        assert_eq!(extract_authors(text, end), "Иванов, И.И.");
        assert_eq!(
            extract_authors(text, None),
            "Иванов, И.И. and Сидоров, С.С."
        );
    }

    #[test]
    fn test_span_end_fallback_order() {
        let text = "Кузнецов К.К. Методы анализа. Дисс. ... канд. наук. Москва, 2010";
        assert_eq!(span_end(text, &["//", "Дисс"]), text.find("Дисс"));
        assert_eq!(span_end(text, &["//"]), None);
        assert_eq!(span_end(text, &[]), None);
    }

    #[test]
    fn test_single_initial_and_hyphenated_surname() {
        let text = "Римский-Корсаков Н. Теория. М.: Музыка, 1950";
        assert_eq!(extract_authors(text, None), "Римский-Корсаков, Н.");
    }

    #[test]
    fn test_comma_between_surname_and_initials() {
        let text = "Сидоров, С.С. Теория и практика. М.: Наука, 2001";
        assert_eq!(extract_authors(text, None), "Сидоров, С.С.");
    }

    #[test]
    fn test_empty_and_authorless() {
        assert_eq!(extract_authors("", None), "");
        assert_eq!(extract_authors("", Some(0)), "");
        assert_eq!(extract_authors("Сборник статей. М.: Наука, 2003", None), "");
        assert_eq!(extract_authors(ARTICLE, Some(0)), "");
    }

    #[test]
    fn test_author_style_from_str() {
        assert_eq!(
            "surname_initials".parse::<AuthorStyle>().unwrap(),
            AuthorStyle::SurnameInitials
        );
        assert_eq!("Verbatim".parse::<AuthorStyle>().unwrap(), AuthorStyle::Verbatim);
        assert_eq!(
            "surname-initials".parse::<AuthorStyle>().unwrap(),
            AuthorStyle::SurnameInitials
        );
        assert!("initials_first".parse::<AuthorStyle>().is_err());
    }
}
