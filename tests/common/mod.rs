//! Synthetic EPUB builder for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const CONTAINER_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

struct Chapter {
    href: String,
    media_type: String,
    data: Vec<u8>,
}

/// Builds a minimal EPUB 3 package in memory.
#[derive(Default)]
pub struct EpubBuilder {
    title: Option<String>,
    creators: Vec<String>,
    chapters: Vec<Chapter>,
    /// Manifest items listed but never written to the archive.
    phantom: Vec<String>,
}

impl EpubBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn creator(mut self, creator: &str) -> Self {
        self.creators.push(creator.to_string());
        self
    }

    /// Add an XHTML chapter whose body is `body`, wrapped in a full document.
    pub fn chapter(self, href: &str, body: &str) -> Self {
        let doc = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>{href}</title></head>
<body>
{body}
</body>
</html>"#
        );
        self.raw(href, "application/xhtml+xml", doc.into_bytes())
    }

    /// Add a spine document with exact bytes and media type.
    pub fn raw(mut self, href: &str, media_type: &str, data: Vec<u8>) -> Self {
        self.chapters.push(Chapter {
            href: href.to_string(),
            media_type: media_type.to_string(),
            data,
        });
        self
    }

    /// List a content document in the manifest and spine without storing it.
    pub fn missing(mut self, href: &str) -> Self {
        self.phantom.push(href.to_string());
        self
    }

    fn opf(&self) -> String {
        let mut metadata = String::new();
        if let Some(title) = &self.title {
            metadata.push_str(&format!("    <dc:title>{title}</dc:title>\n"));
        }
        for creator in &self.creators {
            metadata.push_str(&format!("    <dc:creator>{creator}</dc:creator>\n"));
        }

        let mut manifest = String::new();
        let mut spine = String::new();
        let hrefs = self
            .chapters
            .iter()
            .map(|c| (c.href.as_str(), c.media_type.as_str()))
            .chain(
                self.phantom
                    .iter()
                    .map(|h| (h.as_str(), "application/xhtml+xml")),
            );
        for (i, (href, media_type)) in hrefs.enumerate() {
            manifest.push_str(&format!(
                "    <item id=\"item{i}\" href=\"{href}\" media-type=\"{media_type}\"/>\n"
            ));
            spine.push_str(&format!("    <itemref idref=\"item{i}\"/>\n"));
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:uuid:test</dc:identifier>
{metadata}  </metadata>
  <manifest>
    <item id="css" href="style.css" media-type="text/css"/>
{manifest}  </manifest>
  <spine>
{spine}  </spine>
</package>"#
        )
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("mimetype", stored).unwrap();
        zip.write_all(b"application/epub+zip").unwrap();

        zip.start_file("META-INF/container.xml", deflated).unwrap();
        zip.write_all(CONTAINER_XML).unwrap();

        zip.start_file("OEBPS/content.opf", deflated).unwrap();
        zip.write_all(self.opf().as_bytes()).unwrap();

        zip.start_file("OEBPS/style.css", deflated).unwrap();
        zip.write_all(b"p { margin: 0 }").unwrap();

        for chapter in &self.chapters {
            zip.start_file(format!("OEBPS/{}", chapter.href), deflated)
                .unwrap();
            zip.write_all(&chapter.data).unwrap();
        }

        zip.finish().unwrap().into_inner()
    }

    /// Write the EPUB to `path`.
    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }
}
