use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use crate::book::{ContentDocument, Metadata, SpineItem};
use crate::error::{Error, Result};
use crate::util::strip_bom;

use super::parser::{parse_container_xml, parse_opf};

/// Reads an EPUB container: package metadata, spine, and content documents.
///
/// Supports EPUB 2 and EPUB 3 packages. Only the parts needed for text
/// extraction are loaded; images, stylesheets and fonts are never read.
///
/// # Example
///
/// ```no_run
/// use epubmd::EpubReader;
///
/// let mut reader = EpubReader::open("path/to/book.epub")?;
/// println!("Title: {:?}", reader.metadata().title);
/// for doc in reader.documents()? {
///     println!("{} ({} bytes)", doc.href, doc.data.len());
/// }
/// # Ok::<(), epubmd::Error>(())
/// ```
pub struct EpubReader<R> {
    archive: ZipArchive<R>,
    metadata: Metadata,
    spine: Vec<SpineItem>,
    /// Directory of the OPF file inside the archive (e.g. "OEBPS").
    opf_dir: String,
}

impl EpubReader<File> {
    /// Open an EPUB file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl EpubReader<Cursor<Vec<u8>>> {
    /// Read an EPUB held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }
}

impl<R: Read + Seek> EpubReader<R> {
    /// Read an EPUB from any [`Read`] + [`Seek`] source.
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;

        // 1. Find the OPF file path from container.xml
        let container = read_archive_file_bytes(&mut archive, "META-INF/container.xml")?;
        let opf_path = parse_container_xml(&container)?;
        let opf_dir = Path::new(&opf_path)
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        // 2. Parse the OPF file
        let opf_bytes = read_archive_file_bytes(&mut archive, &opf_path)?;
        let opf_content = String::from_utf8(strip_bom(&opf_bytes).to_vec())
            .map_err(|e| Error::InvalidEpub(format!("{opf_path} is not UTF-8: {e}")))?;
        let opf = parse_opf(&opf_content)?;

        // 3. Build spine from spine IDs
        let mut spine = Vec::with_capacity(opf.spine.len());
        for (id, linear) in opf.spine {
            match opf.manifest.get(&id) {
                Some((href, media_type)) => spine.push(SpineItem {
                    id,
                    href: href.clone(),
                    media_type: media_type.clone(),
                    linear,
                }),
                None => tracing::warn!(idref = %id, "spine entry has no manifest item, skipping"),
            }
        }

        tracing::debug!(
            opf = %opf_path,
            spine = spine.len(),
            manifest = opf.manifest.len(),
            "parsed package document"
        );

        Ok(Self {
            archive,
            metadata: opf.metadata,
            spine,
            opf_dir,
        })
    }

    /// Book metadata from the package document.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Every spine item, including non-content ones.
    pub fn spine(&self) -> &[SpineItem] {
        &self.spine
    }

    /// Load the content documents in reading order.
    ///
    /// Spine items that are not (X)HTML are skipped. A content document
    /// listed in the manifest but absent from the archive is an error.
    pub fn documents(&mut self) -> Result<Vec<ContentDocument>> {
        let mut documents = Vec::new();

        for (index, item) in self.spine.iter().enumerate() {
            if !item.is_content() {
                tracing::debug!(
                    href = %item.href,
                    media_type = %item.media_type,
                    "skipping non-content spine item"
                );
                continue;
            }

            let path = resolve_path(&self.opf_dir, &item.href);
            let data = read_archive_file_bytes(&mut self.archive, &path).map_err(|e| match e {
                Error::Zip(zip::result::ZipError::FileNotFound) => {
                    Error::MissingElement(format!("content document {path}"))
                }
                other => other,
            })?;

            documents.push(
                ContentDocument::new(index, item.href.clone(), data)
                    .with_media_type(item.media_type.clone()),
            );
        }

        Ok(documents)
    }
}

fn read_archive_file_bytes<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<Vec<u8>> {
    // Try direct lookup first
    match archive.by_name(path) {
        Ok(mut file) => {
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            return Ok(contents);
        }
        Err(zip::result::ZipError::FileNotFound) => {}
        Err(e) => return Err(e.into()),
    }

    // Fallback: try percent-decoded path (handles malformed EPUBs)
    let decoded = percent_encoding::percent_decode_str(path)
        .decode_utf8()
        .map_err(|_| Error::InvalidEpub(format!("Invalid UTF-8 in path: {}", path)))?;

    let mut file = archive.by_name(&decoded)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

fn resolve_path(base: &str, href: &str) -> String {
    if base.is_empty() {
        href.to_string()
    } else {
        format!("{}/{}", base, href)
    }
}
