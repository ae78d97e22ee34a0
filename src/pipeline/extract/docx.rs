//! Word document extraction: the text of every `w:p` in
//! `word/document.xml`, one line per paragraph.
//!
//! Explicit line breaks (`w:br`, `w:cr`) inside a paragraph split it into
//! several lines; tabs become `\t`. Legacy binary `.doc` files (OLE
//! compound documents) are rejected with a conversion failure.

use super::{Conversion, ConvertOptions, Converter};
use crate::error::ReaderError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use tracing::debug;

const DOCUMENT_XML: &str = "word/document.xml";

/// Magic number of OLE compound files (legacy `.doc`).
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Converter for `.docx` (and WordprocessingML `.doc`) files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxConverter;

impl Converter for DocxConverter {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn convert(&self, bytes: &[u8], _options: &ConvertOptions) -> Result<Conversion, ReaderError> {
        if bytes.starts_with(&OLE_MAGIC) {
            return Err(ReaderError::conversion(
                "doc",
                "legacy binary .doc is not supported; save the file as .docx",
            ));
        }

        let mut zip = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ReaderError::conversion("docx", format!("not a valid zip: {}", e)))?;
        let mut xml = String::new();
        zip.by_name(DOCUMENT_XML)
            .map_err(|e| ReaderError::conversion("docx", format!("{}: {}", DOCUMENT_XML, e)))?
            .read_to_string(&mut xml)
            .map_err(|e| ReaderError::conversion("docx", format!("{}: {}", DOCUMENT_XML, e)))?;

        let lines = paragraph_lines(&xml)?;
        debug!("DOCX: {} lines", lines.len());
        Ok(Conversion::lines(lines))
    }
}

fn local_name(q: &[u8]) -> &[u8] {
    match q.iter().position(|&b| b == b':') {
        Some(i) => &q[i + 1..],
        None => q,
    }
}

/// Extract paragraph text from a WordprocessingML body.
pub fn paragraph_lines(xml: &str) -> Result<Vec<String>, ReaderError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut buf = Vec::new();

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match local_name(e.name().as_ref()) {
                b"p" => current.clear(),
                b"t" => in_text = true,
                b"br" | b"cr" => current.push('\n'),
                b"tab" => current.push('\t'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match local_name(e.name().as_ref()) {
                b"br" | b"cr" => current.push('\n'),
                b"tab" => current.push('\t'),
                b"p" => lines.push(String::new()),
                _ => {}
            },
            Ok(Event::End(e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"p" => {
                    lines.extend(current.split('\n').map(str::to_string));
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ReaderError::conversion("docx", format!("bad text: {}", e)))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ReaderError::conversion(
                    "docx",
                    format!("XML error at {}: {}", reader.buffer_position(), e),
                ))
            }
        }
    }
    Ok(lines)
}
