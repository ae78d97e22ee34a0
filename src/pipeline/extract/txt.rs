//! Plain-text decoding.
//!
//! A byte-order mark always wins. Without one the configured encoding label
//! is used (any WHATWG label `encoding_rs` knows, e.g. `gbk`, `big5`,
//! `windows-1252`), falling back to UTF-8. Malformed input is an error, not
//! replacement characters.

use super::{Conversion, ConvertOptions, Converter};
use crate::error::ReaderError;
use encoding_rs::{Encoding, UTF_8};
use tracing::debug;

/// Converter for `.txt` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxtConverter;

impl Converter for TxtConverter {
    fn name(&self) -> &'static str {
        "txt"
    }

    fn convert(&self, bytes: &[u8], options: &ConvertOptions) -> Result<Conversion, ReaderError> {
        decode(bytes, options.text_encoding.as_deref()).map(Conversion::text)
    }
}

/// Decode `bytes` into a `String`.
pub fn decode(bytes: &[u8], label: Option<&str>) -> Result<String, ReaderError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (resolve_label(label)?, bytes),
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        return Err(ReaderError::EncodingError {
            encoding: encoding.name().to_string(),
            detail: invalid_detail(encoding, body),
        });
    }
    debug!("Decoded {} bytes as {}", body.len(), encoding.name());
    Ok(text.into_owned())
}

fn resolve_label(label: Option<&str>) -> Result<&'static Encoding, ReaderError> {
    match label {
        None => Ok(UTF_8),
        Some(l) => Encoding::for_label(l.trim().as_bytes()).ok_or_else(|| {
            ReaderError::EncodingError {
                encoding: l.to_string(),
                detail: "unknown encoding label".into(),
            }
        }),
    }
}

fn invalid_detail(encoding: &'static Encoding, body: &[u8]) -> String {
    if encoding == UTF_8 {
        if let Err(e) = std::str::from_utf8(body) {
            return format!("invalid byte sequence at offset {}", e.valid_up_to());
        }
    }
    "invalid byte sequence".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_by_default() {
        assert_eq!(decode("héllo 中文".as_bytes(), None).unwrap(), "héllo 中文");
    }

    #[test]
    fn bom_is_stripped_and_honoured() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"abc");
        assert_eq!(decode(&bytes, None).unwrap(), "abc");

        // UTF-16LE BOM overrides a conflicting label.
        let utf16: Vec<u8> = [0xFF, 0xFE, b'h', 0, b'i', 0].to_vec();
        assert_eq!(decode(&utf16, Some("gbk")).unwrap(), "hi");
    }

    #[test]
    fn labelled_legacy_encoding() {
        // "中文" in GBK.
        let bytes = [0xD6, 0xD0, 0xCE, 0xC4];
        assert_eq!(decode(&bytes, Some("gbk")).unwrap(), "中文");
    }

    #[test]
    fn invalid_utf8_is_an_encoding_error() {
        match decode(&[b'o', b'k', 0xFF, 0xFE, 0xFD], None) {
            Err(ReaderError::EncodingError { encoding, detail }) => {
                assert_eq!(encoding, "UTF-8");
                assert!(detail.contains("offset 2"), "{detail}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unknown_label_is_an_encoding_error() {
        assert!(matches!(
            decode(b"abc", Some("klingon")),
            Err(ReaderError::EncodingError { .. })
        ));
    }

    #[test]
    fn converter_returns_text_lines() {
        let conv = TxtConverter
            .convert(b"one\r\ntwo\n", &ConvertOptions::default())
            .unwrap();
        assert_eq!(conv.page_count, None);
        assert_eq!(conv.into_lines(), vec!["one", "two", ""]);
    }
}
