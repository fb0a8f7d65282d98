//! EPUB file → Markdown file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::epub::EpubReader;
use crate::error::{Error, Result};
use crate::markdown::{MarkdownRenderer, MarkupMode, RenderConfig};

/// Options for a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub markup: MarkupMode,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every document with HTML recovery rules.
    pub fn lenient(mut self) -> Self {
        self.markup = MarkupMode::Html;
        self
    }

    pub fn with_markup(mut self, markup: MarkupMode) -> Self {
        self.markup = markup;
        self
    }

    fn render_config(&self) -> RenderConfig {
        RenderConfig::new().with_markup(self.markup)
    }
}

/// Outcome of a successful [`convert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub output: PathBuf,
    /// Content documents rendered.
    pub documents: usize,
    /// Bytes written.
    pub bytes: usize,
}

/// Default output path: the input path with an `.md` extension.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("md")
}

/// Convert an EPUB into Markdown text.
pub fn convert_to_string(input: impl AsRef<Path>, options: &ConvertOptions) -> Result<String> {
    render_file(input.as_ref(), options).map(|(text, _)| text)
}

/// Convert an EPUB file and write the Markdown to `output`.
///
/// The output is written only after the whole book rendered; on any
/// conversion error the output path is left untouched.
pub fn convert(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<Conversion> {
    let input = input.as_ref();
    let output = output.as_ref();

    let (text, documents) = render_file(input, options)?;
    fs::write(output, &text).map_err(|source| Error::Sink {
        path: output.to_path_buf(),
        source,
    })?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        documents,
        bytes = text.len(),
        "converted"
    );

    Ok(Conversion {
        output: output.to_path_buf(),
        documents,
        bytes: text.len(),
    })
}

fn render_file(input: &Path, options: &ConvertOptions) -> Result<(String, usize)> {
    let mut reader = EpubReader::open(input)?;
    let documents = reader.documents()?;
    let renderer = MarkdownRenderer::with_config(options.render_config());
    let text = renderer.render(reader.metadata(), &documents)?;
    Ok((text, documents.len()))
}
