//! Byte-level helpers: BOM handling and declared-encoding decoding.

use encoding_rs::Encoding;

/// Strip UTF-8 BOM if present.
pub fn strip_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    }
}

/// The encoding label a document declares for itself.
///
/// A byte order mark wins, then the `encoding` pseudo-attribute of the XML
/// declaration. Documents that declare nothing are UTF-8.
pub fn declared_encoding(bytes: &[u8]) -> &str {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding.name();
    }
    extract_xml_encoding(bytes).unwrap_or("UTF-8")
}

/// Decode bytes with the given encoding label, refusing malformed input.
///
/// Returns `None` when the label is unknown or the bytes are not valid in
/// that encoding. A BOM, when present, overrides the label.
pub fn decode_strict(bytes: &[u8], label: &str) -> Option<String> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (Encoding::for_label(label.trim().as_bytes())?, bytes),
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
}

/// Extract encoding from XML declaration.
///
/// Looks for `<?xml ... encoding="..."?>` in the first 100 bytes.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(100);
    let prefix = &bytes[..check_len];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];
    let decl_end = after_xml
        .windows(2)
        .position(|w| w == b"?>")
        .unwrap_or(after_xml.len());
    let decl = &after_xml[..decl_end];

    let enc_pos = decl
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &decl[enc_pos + 9..];

    let (&quote, rest) = after_enc.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let value_end = rest.iter().position(|&b| b == quote)?;

    std::str::from_utf8(&rest[..value_end]).ok()
}
