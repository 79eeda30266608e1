use std::io::Write;

use gost2bib_parsing::{BibEntry, ConversionResult, ConversionStats, LineReport, ParseFailure};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Write the rendered BibTeX records, separated by blank lines.
pub fn write_bibtex(w: &mut dyn Write, entries: &[BibEntry]) -> std::io::Result<()> {
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        write!(w, "{}", entry.text)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    number: usize,
    reason: String,
    text: &'a str,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    entries: &'a [BibEntry],
    failures: Vec<JsonFailure<'a>>,
    stats: &'a ConversionStats,
}

/// Write the whole conversion result as pretty-printed JSON.
pub fn write_json(w: &mut dyn Write, result: &ConversionResult) -> anyhow::Result<()> {
    let report = JsonReport {
        entries: &result.entries,
        failures: result
            .failures
            .iter()
            .map(|f| JsonFailure {
                number: f.number,
                reason: f.error.to_string(),
                text: &f.text,
            })
            .collect(),
        stats: &result.stats,
    };
    serde_json::to_writer_pretty(&mut *w, &report)?;
    writeln!(w)?;
    Ok(())
}

/// Print one failure diagnostic: "<reason> <n>: <original text>".
pub fn print_failure(
    w: &mut dyn Write,
    failure: &ParseFailure,
    color: ColorMode,
) -> std::io::Result<()> {
    let tag = format!("{} {}:", failure.error, failure.number);
    if color.enabled() {
        writeln!(w, "{} {}", tag.red(), failure.text)
    } else {
        writeln!(w, "{} {}", tag, failure.text)
    }
}

/// Print the per-kind summary after a conversion.
pub fn print_summary(
    w: &mut dyn Write,
    stats: &ConversionStats,
    color: ColorMode,
) -> std::io::Result<()> {
    let headline = format!(
        "Converted {} of {} lines",
        stats.converted(),
        stats.total_lines
    );
    let breakdown = format!(
        "({} articles, {} dissertations, {} chapters, {} books)",
        stats.articles, stats.dissertations, stats.chapters, stats.books
    );

    if color.enabled() {
        if stats.failed() == 0 {
            writeln!(w, "{} {}", headline.green(), breakdown.dimmed())?;
        } else {
            writeln!(w, "{} {}", headline.yellow(), breakdown.dimmed())?;
        }
    } else {
        writeln!(w, "{} {}", headline, breakdown)?;
    }

    if stats.failed() > 0 {
        let failed = format!(
            "{} failed: {} unclassifiable, {} pattern mismatches",
            stats.failed(),
            stats.unclassifiable,
            stats.mismatched
        );
        if color.enabled() {
            writeln!(w, "{}", failed.red())?;
        } else {
            writeln!(w, "{}", failed)?;
        }
    }
    Ok(())
}

/// Print the dry-run view of one line: normalized text, then either the
/// detected kind and fields or the failure reason.
pub fn print_line_report(
    w: &mut dyn Write,
    report: &LineReport,
    color: ColorMode,
) -> std::io::Result<()> {
    let number = format!("[{}]", report.number);
    if color.enabled() {
        writeln!(w, "{} {}", number.bold(), report.normalized)?;
    } else {
        writeln!(w, "{} {}", number, report.normalized)?;
    }

    match &report.result {
        Ok(extraction) => {
            let variant = if extraction.paged { " (paged)" } else { "" };
            if color.enabled() {
                writeln!(
                    w,
                    "    {}{}",
                    extraction.kind.to_string().green(),
                    variant
                )?;
            } else {
                writeln!(w, "    {}{}", extraction.kind, variant)?;
            }
            for (field, value) in extraction.fields.iter() {
                if color.enabled() {
                    writeln!(w, "    {:<10} {}", field.as_str().dimmed(), value)?;
                } else {
                    writeln!(w, "    {:<10} {}", field.as_str(), value)?;
                }
            }
        }
        Err(error) => {
            if color.enabled() {
                writeln!(w, "    {}", error.to_string().red())?;
            } else {
                writeln!(w, "    {}", error)?;
            }
        }
    }
    writeln!(w)?;
    Ok(())
}
