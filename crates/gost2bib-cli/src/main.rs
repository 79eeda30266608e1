use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gost2bib_core::config_file::{self, ConfigFile};
use gost2bib_parsing::{
    AuthorStyle, CitationLine, Converter, ParsingConfigBuilder, citation_lines,
};

mod input;
mod output;

use output::ColorMode;

/// Convert GOST-style Russian reference lists into BibTeX
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert every line of a reference list into a BibTeX record
    Convert {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// Path to the output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Bibtex)]
        format: OutputFormat,

        /// Disable colored diagnostics
        #[arg(long)]
        no_color: bool,

        /// Exit with an error if any line fails to convert
        #[arg(long)]
        strict: bool,
    },

    /// Dry run: show normalized text, kind and extracted fields per line
    Inspect {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Path to the reference list, one citation per line
    file_path: PathBuf,

    /// Text encoding of the input file [default: windows-1251]
    #[arg(long)]
    encoding: Option<String>,

    /// Sequence number of the first line [default: 1]
    #[arg(long)]
    start_at: Option<usize>,
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// Author formatting: surname_initials or verbatim
    #[arg(long)]
    author_style: Option<AuthorStyle>,

    /// Entry-key prefix (default: the BibTeX entry type)
    #[arg(long)]
    key_prefix: Option<String>,

    /// Constant language tag added to every entry as `langid`
    #[arg(long)]
    language: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Bibtex,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let file_config = config_file::load_config();

    match cli.command {
        Command::Convert {
            input,
            style,
            output,
            format,
            no_color,
            strict,
        } => convert(input, style, output, format, no_color, strict, &file_config),
        Command::Inspect {
            input,
            style,
            no_color,
        } => inspect(input, style, no_color, &file_config),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "gost2bib=warn",
        1 => "gost2bib=debug",
        _ => "gost2bib=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Resolve configuration: CLI flags > config file > defaults.
fn build_converter(style: StyleArgs, file_config: &ConfigFile) -> Result<Converter> {
    let mut builder =
        ParsingConfigBuilder::from_config_file(file_config).context("invalid config file")?;

    if let Some(author_style) = style.author_style {
        builder = builder.author_style(author_style);
    }
    if let Some(prefix) = &style.key_prefix {
        builder = builder.key_prefix(prefix);
    }
    if let Some(language) = &style.language {
        builder = builder.language(language);
    }

    let config = builder.build().context("invalid parsing configuration")?;
    Ok(Converter::with_config(config))
}

fn read_lines(input: &InputArgs, file_config: &ConfigFile) -> Result<Vec<CitationLine>> {
    if !input.file_path.exists() {
        anyhow::bail!("File not found: {}", input.file_path.display());
    }

    let encoding = input
        .encoding
        .clone()
        .or_else(|| file_config.input.as_ref().and_then(|i| i.encoding.clone()))
        .unwrap_or_else(|| input::DEFAULT_ENCODING.to_string());
    let start_at = input
        .start_at
        .or_else(|| file_config.output.as_ref().and_then(|o| o.start_number))
        .unwrap_or(1);

    let content = input::read_reference_list(&input.file_path, &encoding)?;
    let lines = citation_lines(&content, start_at);
    tracing::info!(lines = lines.len(), start_at, "loaded reference list");
    Ok(lines)
}

fn convert(
    input: InputArgs,
    style: StyleArgs,
    output: Option<PathBuf>,
    format: OutputFormat,
    no_color: bool,
    strict: bool,
    file_config: &ConfigFile,
) -> Result<()> {
    let converter = build_converter(style, file_config)?;
    let lines = read_lines(&input, file_config)?;
    let result = converter.convert_lines(lines);

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(
            std::fs::File::create(output_path)
                .with_context(|| format!("failed to create {}", output_path.display()))?,
        )
    } else {
        Box::new(std::io::stdout())
    };

    match format {
        OutputFormat::Bibtex => output::write_bibtex(&mut writer, &result.entries)?,
        OutputFormat::Json => output::write_json(&mut writer, &result)?,
    }
    writer.flush()?;

    // Diagnostics go to stderr so stdout stays a clean bibliography
    let color = ColorMode(!no_color);
    let mut stderr = std::io::stderr();
    for failure in &result.failures {
        output::print_failure(&mut stderr, failure, color)?;
    }
    output::print_summary(&mut stderr, &result.stats, color)?;

    if strict && result.stats.failed() > 0 {
        anyhow::bail!(
            "{} of {} lines could not be converted",
            result.stats.failed(),
            result.stats.total_lines
        );
    }
    Ok(())
}

fn inspect(
    input: InputArgs,
    style: StyleArgs,
    no_color: bool,
    file_config: &ConfigFile,
) -> Result<()> {
    let converter = build_converter(style, file_config)?;
    let lines = read_lines(&input, file_config)?;

    let color = ColorMode(!no_color);
    let mut stdout = std::io::stdout();
    for line in &lines {
        let report = converter.inspect_line(line);
        output::print_line_report(&mut stdout, &report, color)?;
    }
    Ok(())
}
