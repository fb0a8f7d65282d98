//! EPUB package parsing (container.xml and OPF).

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::book::Metadata;
use crate::error::{Error, Result};
use crate::util::strip_bom;

/// Parsed OPF package data.
#[derive(Debug, Default)]
pub struct OpfData {
    pub metadata: Metadata,
    /// Maps manifest id -> (href, media_type)
    pub manifest: HashMap<String, (String, String)>,
    /// Spine idrefs in reading order, with their `linear` flag.
    pub spine: Vec<(String, bool)>,
}

/// Parse META-INF/container.xml to find the OPF path.
pub fn parse_container_xml(bytes: &[u8]) -> Result<String> {
    let content = String::from_utf8(strip_bom(bytes).to_vec())
        .map_err(|e| Error::InvalidEpub(format!("container.xml is not UTF-8: {e}")))?;

    let mut reader = Reader::from_str(&content);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Empty(e) | Event::Start(e) if local_name(e.name().as_ref()) == b"rootfile" => {
                if let Some(path) = attribute(&e, b"full-path")? {
                    return Ok(path);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(Error::MissingElement(
        "rootfile in META-INF/container.xml".into(),
    ))
}

/// Parse OPF package document.
pub fn parse_opf(content: &str) -> Result<OpfData> {
    // Text is trimmed per element, not per event, so "Rock &amp; Roll" keeps its spaces
    let mut reader = Reader::from_str(content);

    let mut opf = OpfData::default();
    let mut in_metadata = false;
    let mut current_element: Option<String> = None;
    let mut buf_text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) if !is_package_entry(&e) => match local_name(e.name().as_ref()) {
                b"metadata" => in_metadata = true,
                local @ (b"title" | b"creator" | b"language" | b"identifier" | b"publisher"
                | b"description" | b"date")
                    if in_metadata =>
                {
                    current_element = Some(String::from_utf8_lossy(local).into_owned());
                    buf_text.clear();
                }
                _ => {}
            },
            // Manifest items and spine refs may be written as <item></item>
            Event::Start(e) | Event::Empty(e) => match local_name(e.name().as_ref()) {
                b"item" => {
                    let id = attribute(&e, b"id")?.unwrap_or_default();
                    let href = attribute(&e, b"href")?.unwrap_or_default();
                    let media_type = attribute(&e, b"media-type")?.unwrap_or_default();
                    if !id.is_empty() {
                        opf.manifest.insert(id, (href, media_type));
                    }
                }
                b"itemref" => {
                    if let Some(idref) = attribute(&e, b"idref")? {
                        let linear = attribute(&e, b"linear")?.is_none_or(|v| v != "no");
                        opf.spine.push((idref, linear));
                    }
                }
                _ => {}
            },
            Event::Text(e) => {
                if current_element.is_some() {
                    buf_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::CData(e) => {
                if current_element.is_some() {
                    buf_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::GeneralRef(e) => {
                if current_element.is_some() {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    if let Some(resolved) = resolve_entity(&entity) {
                        buf_text.push_str(&resolved);
                    }
                }
            }
            Event::End(e) => {
                if local_name(e.name().as_ref()) == b"metadata" {
                    in_metadata = false;
                }

                if let Some(elem) = current_element.take() {
                    let value = buf_text.trim().to_string();
                    buf_text.clear();
                    if value.is_empty() {
                        continue;
                    }
                    let meta = &mut opf.metadata;
                    match elem.as_str() {
                        // Only the first title/identifier counts; later ones are subtitles or alternates
                        "title" if meta.title.is_none() => meta.title = Some(value),
                        "identifier" if meta.identifier.is_none() => meta.identifier = Some(value),
                        "creator" => meta.authors.push(value),
                        "language" if meta.language.is_none() => meta.language = Some(value),
                        "publisher" => meta.publisher = Some(value),
                        "description" => meta.description = Some(value),
                        "date" if meta.date.is_none() => meta.date = Some(value),
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(opf)
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

/// Read an attribute by (unprefixed) name.
fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        if local_name(attr.key.as_ref()) == name {
            let value = String::from_utf8(attr.value.to_vec())
                .map_err(|err| Error::InvalidEpub(format!("attribute is not UTF-8: {err}")))?;
            return Ok(Some(value));
        }
    }
    Ok(None)
}

fn is_package_entry(e: &BytesStart<'_>) -> bool {
    matches!(local_name(e.name().as_ref()), b"item" | b"itemref")
}

/// Extract local name from namespaced XML name (e.g., "dc:title" -> "title").
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };
    char::from_u32(code).map(|c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"title"), b"title");
        assert_eq!(local_name(b"dc:title"), b"title");
        assert_eq!(local_name(b"opf:meta"), b"meta");
        assert_eq!(local_name(b""), b"");
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("apos"), Some("'".to_string()));
        assert_eq!(resolve_entity("amp"), Some("&".to_string()));
        assert_eq!(resolve_entity("#65"), Some("A".to_string()));
        assert_eq!(resolve_entity("#x2019"), Some("\u{2019}".to_string()));
        assert_eq!(resolve_entity("nbsp"), None);
        assert_eq!(resolve_entity("#xZZ"), None);
    }

    #[test]
    fn test_parse_container_xml() {
        let container = br#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

        assert_eq!(parse_container_xml(container).unwrap(), "OEBPS/content.opf");
    }

    #[test]
    fn test_parse_container_xml_with_bom() {
        let mut container = vec![0xEF, 0xBB, 0xBF];
        container.extend_from_slice(
            br#"<container><rootfiles><rootfile full-path="content.opf"/></rootfiles></container>"#,
        );
        assert_eq!(parse_container_xml(&container).unwrap(), "content.opf");
    }

    #[test]
    fn test_parse_container_xml_without_rootfile() {
        let err = parse_container_xml(b"<container><rootfiles/></container>").unwrap_err();
        assert!(matches!(err, Error::MissingElement(_)));
    }

    #[test]
    fn test_parse_opf_metadata() {
        let opf = r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Don&apos;t Panic</dc:title>
    <dc:title>A Subtitle</dc:title>
    <dc:creator>Author One</dc:creator>
    <dc:creator>Author Two</dc:creator>
    <dc:language>en</dc:language>
    <dc:identifier>urn:isbn:1234567890</dc:identifier>
    <dc:publisher>
      Rock &amp; Roll Press
    </dc:publisher>
    <dc:date>2024-01-15</dc:date>
  </metadata>
  <manifest>
    <item id="chapter1" href="chapter1.xhtml" media-type="application/xhtml+xml"/>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
  </manifest>
  <spine toc="ncx">
    <itemref idref="chapter1"/>
    <itemref idref="notes" linear="no"/>
  </spine>
</package>"#;

        let result = parse_opf(opf).unwrap();

        assert_eq!(result.metadata.title.as_deref(), Some("Don't Panic"));
        assert_eq!(result.metadata.authors, vec!["Author One", "Author Two"]);
        assert_eq!(result.metadata.creator(), Some("Author One"));
        assert_eq!(result.metadata.language.as_deref(), Some("en"));
        assert_eq!(result.metadata.identifier.as_deref(), Some("urn:isbn:1234567890"));
        assert_eq!(result.metadata.publisher.as_deref(), Some("Rock & Roll Press"));
        assert_eq!(result.metadata.date.as_deref(), Some("2024-01-15"));

        assert_eq!(
            result.manifest.get("chapter1"),
            Some(&(
                "chapter1.xhtml".to_string(),
                "application/xhtml+xml".to_string()
            ))
        );
        assert_eq!(
            result.spine,
            vec![("chapter1".to_string(), true), ("notes".to_string(), false)]
        );
    }

    #[test]
    fn test_parse_opf_entries_with_end_tags() {
        let opf = r#"<package>
  <manifest>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"></item>
    <item id="ch2" href="ch2.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine>
    <itemref idref="ch1"></itemref>
    <itemref idref="ch2" linear="no"/>
  </spine>
</package>"#;
        let result = parse_opf(opf).unwrap();
        assert_eq!(result.manifest.len(), 2);
        assert_eq!(
            result.manifest.get("ch1"),
            Some(&(
                "ch1.xhtml".to_string(),
                "application/xhtml+xml".to_string()
            ))
        );
        assert_eq!(
            result.spine,
            vec![("ch1".to_string(), true), ("ch2".to_string(), false)]
        );
    }

    #[test]
    fn test_parse_opf_without_metadata() {
        let opf = r#"<package><metadata><dc:title xmlns:dc="x">  </dc:title></metadata><manifest/><spine/></package>"#;
        let result = parse_opf(opf).unwrap();
        assert_eq!(result.metadata, Metadata::default());
        assert!(result.spine.is_empty());
    }

    #[test]
    fn test_parse_opf_ignores_title_outside_metadata() {
        let opf = r#"<package>
  <metadata><dc:creator xmlns:dc="http://purl.org/dc/elements/1.1/">Someone</dc:creator></metadata>
  <guide><title>Not the book title</title></guide>
</package>"#;
        let result = parse_opf(opf).unwrap();
        assert_eq!(result.metadata.title, None);
        assert_eq!(result.metadata.creator(), Some("Someone"));
    }

    #[test]
    fn test_parse_opf_malformed() {
        let err = parse_opf("<package><metadata></package>").unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }
}
