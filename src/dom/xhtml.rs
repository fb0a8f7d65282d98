//! XHTML parsing with XML rules.
//!
//! EPUB content documents declared as `application/xhtml+xml` are XML, so
//! `<title/>` and `<p/>` are complete elements and CDATA sections are text.
//! html5ever would read them as HTML, so these documents are built straight
//! from the quick-xml event stream instead. The first well-formedness
//! violation is reported as an error.

use html5ever::data::NAMED_ENTITIES;
use html5ever::{LocalName, QualName, ns};
use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};

use super::arena::{ArenaDom, ArenaNodeId};

/// Build an arena DOM from well-formed XHTML.
///
/// Returns a description of the first problem: a syntax error, an end tag
/// that does not match the open element, a stray end tag, a malformed
/// attribute, or an element still open at end of input. Comments,
/// processing instructions and the doctype are dropped.
pub fn parse_xhtml(markup: &str) -> Result<ArenaDom, String> {
    let mut reader = Reader::from_str(markup);
    // Mismatches are reported below with both tag names
    reader.config_mut().check_end_names = false;

    let mut dom = ArenaDom::new();
    let mut open: Vec<(String, ArenaNodeId)> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("{e} (near byte {})", reader.buffer_position()))?;
        let parent = open.last().map_or(dom.document(), |&(_, id)| id);

        match event {
            Event::Start(e) => {
                let id = element(&mut dom, parent, &e)?;
                open.push((tag_name(&e), id));
            }
            Event::Empty(e) => {
                element(&mut dom, parent, &e)?;
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match open.pop() {
                    Some((expected, _)) if expected == name => {}
                    Some((expected, _)) => {
                        return Err(format!(
                            "expected </{expected}>, found </{name}> (near byte {})",
                            reader.buffer_position()
                        ));
                    }
                    None => {
                        return Err(format!(
                            "unexpected </{name}> (near byte {})",
                            reader.buffer_position()
                        ));
                    }
                }
            }
            Event::Text(e) => {
                let text = e.xml10_content().map_err(|err| err.to_string())?;
                dom.append_text(parent, &text);
            }
            Event::CData(e) => {
                let text = e.xml10_content().map_err(|err| err.to_string())?;
                dom.append_text(parent, &text);
            }
            Event::GeneralRef(e) => {
                let text = resolve_reference(&e)?;
                dom.append_text(parent, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match open.pop() {
        Some((unclosed, _)) => Err(format!("<{unclosed}> is never closed")),
        None => Ok(dom),
    }
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Validate attributes and attach a new element under `parent`.
fn element(
    dom: &mut ArenaDom,
    parent: ArenaNodeId,
    e: &BytesStart<'_>,
) -> Result<ArenaNodeId, String> {
    for attr in e.attributes() {
        attr.map_err(|err| format!("bad attribute on <{}>: {err}", tag_name(e)))?;
    }
    let local = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
    let id = dom.create_element(QualName::new(None, ns!(html), LocalName::from(local)));
    dom.append(parent, id);
    Ok(id)
}

/// Expand a character or entity reference.
///
/// Named references use the HTML entity table, since XHTML content commonly
/// relies on `&nbsp;` and friends without a DTD. Unknown names stay literal.
fn resolve_reference(e: &BytesRef<'_>) -> Result<String, String> {
    if let Some(ch) = e.resolve_char_ref().map_err(|err| err.to_string())? {
        return Ok(ch.to_string());
    }

    let name = e.decode().map_err(|err| err.to_string())?;
    let resolved = NAMED_ENTITIES
        .get(format!("{name};").as_str())
        .map(|&(first, second)| {
            [first, second]
                .into_iter()
                .filter(|&cp| cp != 0)
                .filter_map(char::from_u32)
                .collect::<String>()
        });
    Ok(resolved.unwrap_or_else(|| format!("&{name};")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(dom: &ArenaDom) -> String {
        dom.descendants(dom.document())
            .filter_map(|id| dom.text_content(id))
            .collect()
    }

    fn tags(dom: &ArenaDom) -> Vec<String> {
        dom.descendants(dom.document())
            .filter_map(|id| dom.element_name(id).map(|n| n.to_string()))
            .collect()
    }

    #[test]
    fn test_well_formed_documents() {
        assert!(parse_xhtml("<h1>Intro</h1><p>Hello  World</p>").is_ok());
        assert!(
            parse_xhtml(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head><title>Ch 1</title><style>p { margin: 0 }</style></head>
<body><section epub:type="chapter"><h2>One</h2><p>A&nbsp;b<br/>c &amp; d</p></section></body>
</html>"#
            )
            .is_ok()
        );
        assert!(parse_xhtml("").is_ok());
    }

    #[test]
    fn test_self_closing_elements_are_complete() {
        let dom = parse_xhtml(
            r#"<html><head><title/><script src="a.js"/></head><body><p/><h1>One</h1></body></html>"#,
        )
        .unwrap();
        assert_eq!(
            tags(&dom),
            vec!["html", "head", "title", "script", "body", "p", "h1"]
        );
        let body = dom
            .descendants(dom.document())
            .find(|&id| dom.element_name(id).is_some_and(|n| n.as_ref() == "body"))
            .unwrap();
        assert_eq!(dom.children(body).len(), 2);
    }

    #[test]
    fn test_references_and_cdata_become_text() {
        let dom =
            parse_xhtml("<p>Fish &amp; chips&nbsp;&#8212;&#x41; <![CDATA[a < b]]> &bogus;</p>")
                .unwrap();
        assert_eq!(texts(&dom), "Fish & chips\u{a0}\u{2014}A a < b &bogus;");
    }

    #[test]
    fn test_comments_and_prefixes() {
        let dom = parse_xhtml(r#"<x:P xmlns:x="http://www.w3.org/1999/xhtml">a<!-- no -->b</x:P>"#)
            .unwrap();
        assert_eq!(tags(&dom), vec!["p"]);
        assert_eq!(texts(&dom), "ab");
    }

    #[test]
    fn test_mismatched_end_tag() {
        let err = parse_xhtml("<p><b>bold</p></b>").unwrap_err();
        assert!(err.contains("expected </b>, found </p>"), "{err}");
    }

    #[test]
    fn test_stray_end_tag() {
        let err = parse_xhtml("<p>text</p></div>").unwrap_err();
        assert!(err.contains("unexpected </div>"), "{err}");
    }

    #[test]
    fn test_unclosed_element() {
        let err = parse_xhtml("<body><p>never closed</body>").unwrap_err();
        assert!(err.contains("</p>"), "{err}");

        let err = parse_xhtml("<p>line<br>break</p>").unwrap_err();
        assert!(err.contains("</br>") || err.contains("<br>"), "{err}");

        let err = parse_xhtml("<div><p>open</p>").unwrap_err();
        assert_eq!(err, "<div> is never closed");
    }

    #[test]
    fn test_bad_attribute() {
        let err = parse_xhtml("<p class=plain>x</p>").unwrap_err();
        assert!(err.starts_with("bad attribute on <p>"), "{err}");
    }
}
