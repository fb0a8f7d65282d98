//! epubmd - EPUB to Markdown converter

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use epubmd::{
    ContentDocument, ConvertOptions, EpubReader, Error, Metadata, SpineItem, clean, convert,
    default_output_path,
};

#[derive(Parser)]
#[command(name = "epubmd")]
#[command(version, about = "Convert an EPUB e-book into a single Markdown document", long_about = None)]
#[command(after_help = "EXAMPLES:
    epubmd book.epub              Write book.md next to the input
    epubmd book.epub out.md       Write to out.md
    epubmd -i book.epub           Show book metadata
    epubmd --clean page.html      Print the readable text of an HTML file")]
struct Cli {
    /// Input file (EPUB, or HTML with --clean)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (defaults to INPUT with a .md extension)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Show book metadata without converting
    #[arg(short, long, conflicts_with = "clean")]
    info: bool,

    /// Print metadata as JSON (with --info)
    #[arg(long, requires = "info")]
    json: bool,

    /// Extract plain text from an HTML file instead of converting an EPUB
    #[arg(long)]
    clean: bool,

    /// Recover from malformed XHTML instead of failing
    #[arg(long)]
    lenient: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// More log output (-v, -vv, -vvv); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = if cli.info {
        show_info(&cli.input, cli.json)
    } else if cli.clean {
        clean_file(&cli.input, cli.output.as_deref())
    } else {
        run_convert(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("epubmd={level}"))),
        )
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn run_convert(cli: &Cli) -> Result<(), Error> {
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    let mut options = ConvertOptions::new();
    if cli.lenient {
        options = options.lenient();
    }

    let done = convert(&cli.input, &output, &options)?;
    if !cli.quiet {
        println!(
            "Wrote {} ({} documents, {} bytes)",
            done.output.display(),
            done.documents,
            done.bytes
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct Info<'a> {
    file: &'a Path,
    metadata: &'a Metadata,
    spine: &'a [SpineItem],
}

fn show_info(path: &Path, json: bool) -> Result<(), Error> {
    let reader = EpubReader::open(path)?;
    let meta = reader.metadata();

    if json {
        let info = Info {
            file: path,
            metadata: meta,
            spine: reader.spine(),
        };
        let text = serde_json::to_string_pretty(&info)
            .map_err(|e| Error::InvalidEpub(format!("cannot serialize metadata: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    println!("File: {}", path.display());
    if let Some(title) = &meta.title {
        println!("Title: {title}");
    }
    if !meta.authors.is_empty() {
        println!("Authors: {}", meta.authors.join(", "));
    }
    if let Some(language) = &meta.language {
        println!("Language: {language}");
    }
    if let Some(identifier) = &meta.identifier {
        println!("Identifier: {identifier}");
    }
    if let Some(publisher) = &meta.publisher {
        println!("Publisher: {publisher}");
    }
    if let Some(date) = &meta.date {
        println!("Date: {date}");
    }
    if let Some(desc) = &meta.description {
        let desc = desc.trim();
        if desc.chars().count() > 200 {
            let short: String = desc.chars().take(200).collect();
            println!("Description: {short}...");
        } else {
            println!("Description: {desc}");
        }
    }
    let spine = reader.spine();
    println!("Spine items: {}", spine.len());
    println!(
        "Content documents: {}",
        spine.iter().filter(|item| item.is_content()).count()
    );

    Ok(())
}

fn clean_file(input: &Path, output: Option<&Path>) -> Result<(), Error> {
    let data = fs::read(input)?;
    let markup = ContentDocument::new(0, input.display().to_string(), data).decode()?;
    let text = clean(&markup);

    match output {
        Some(path) => fs::write(path, format!("{text}\n")).map_err(|source| Error::Sink {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
