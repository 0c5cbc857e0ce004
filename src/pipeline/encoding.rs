//! Document text decoding: UTF-8 first, Big5 as the legacy fallback.

use encoding_rs::BIG5;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encoding a document was read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, optionally with a byte order mark.
    Utf8 {
        /// Whether the file started with a UTF-8 BOM.
        bom: bool,
    },
    /// Traditional Chinese legacy encoding.
    Big5,
}

/// Decoded document text and the encoding it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// The document text, without any BOM.
    pub text: String,
    /// Encoding the bytes were decoded with.
    pub encoding: TextEncoding,
}

/// Decodes `bytes` as UTF-8, falling back to Big5.
///
/// Returns `None` if the bytes are valid in neither encoding.
#[must_use]
pub fn decode_document(bytes: &[u8]) -> Option<DecodedText> {
    let (body, bom) = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => (rest, true),
        None => (bytes, false),
    };
    if let Ok(text) = std::str::from_utf8(body) {
        return Some(DecodedText {
            text: text.to_string(),
            encoding: TextEncoding::Utf8 { bom },
        });
    }

    BIG5.decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| DecodedText {
            text: text.into_owned(),
            encoding: TextEncoding::Big5,
        })
}

/// Bytes to write back for `text` read with `encoding`.
///
/// Rewritten documents are always written as UTF-8. A BOM present on the
/// original UTF-8 file is kept.
#[must_use]
pub fn encode_document(text: &str, encoding: TextEncoding) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() + UTF8_BOM.len());
    if matches!(encoding, TextEncoding::Utf8 { bom: true }) {
        bytes.extend_from_slice(UTF8_BOM);
    }
    bytes.extend_from_slice(text.as_bytes());
    bytes
}
