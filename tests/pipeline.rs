//! End-to-end tests for the bionic-reader pipeline.
//!
//! Inputs are built in memory (plain text, a zipped WordprocessingML
//! document, a hand-written PDF) so no fixtures are needed. The PDF test
//! needs the pdfium shared library and is skipped unless `PDFIUM_LIB_PATH`
//! is set.
//!
//! Run with:
//!   cargo test --test pipeline -- --nocapture

use bionic_reader::pipeline::extract::{Conversion, ConvertOptions};
use bionic_reader::pipeline::markup::strip_bold;
use bionic_reader::pipeline::truncate::notice_paragraph;
use bionic_reader::{
    process, process_file, Converter, ConverterRegistry, DocumentFormat, ProcessingConfig,
    ReaderError,
};
use std::io::{Cursor, Write};
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless pdfium can be bound.
macro_rules! skip_unless_pdfium {
    () => {{
        if std::env::var("PDFIUM_LIB_PATH").is_err() {
            println!("SKIP: set PDFIUM_LIB_PATH to run PDF tests");
            return;
        }
    }};
}

fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut cursor);
        zip.start_file("word/document.xml", zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    cursor.into_inner()
}

/// A one-page PDF with two lines of Helvetica text.
fn pdf_bytes(lines: &[&str]) -> Vec<u8> {
    let mut stream = String::from("BT /F1 12 Tf 72 720 Td 14 TL ");
    for line in lines {
        stream.push_str(&format!("({line}) Tj T* "));
    }
    stream.push_str("ET");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{}\nendstream", stream.len(), stream),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, obj) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, obj).as_bytes());
    }
    let xref = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for off in offsets {
        pdf.extend_from_slice(format!("{off:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref
        )
        .as_bytes(),
    );
    pdf
}

// ── Plain text ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_txt_two_sentences() {
    let doc = process(
        b"Hello world.\nThis is bionic reading.\n".to_vec(),
        "sample.txt",
        &ProcessingConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(doc.metadata.content_type, "html");
    assert_eq!(doc.stats.paragraph_count, 2);
    assert_eq!(doc.content.matches("<p>").count(), 2);
    assert!(doc.content.contains("<b>"));
    assert_eq!(
        strip_bold(&doc.content),
        "<p>Hello world.</p><p>This is bionic reading.</p>"
    );
}

#[tokio::test]
async fn test_wrapped_lines_are_rejoined() {
    let text = "The quick brown fox jumps over the lazy dog and\n\
                keeps running across the field until sunset.\n\
                \n\
                Chapter Two.\n";
    let config = ProcessingConfig::builder()
        .bionic_enabled(false)
        .build()
        .unwrap();
    let doc = process(text.as_bytes().to_vec(), "wrap.txt", &config)
        .await
        .unwrap();
    assert_eq!(
        doc.content,
        "<p>The quick brown fox jumps over the lazy dog and keeps running across the field until sunset.</p>\
         <p>Chapter Two.</p>"
    );
    assert_eq!(doc.stats.heading_count, 1);
}

#[tokio::test]
async fn test_chinese_text() {
    let config = ProcessingConfig::builder()
        .terminal_marks(['.', '。'])
        .build()
        .unwrap();
    let doc = process("仿生阅读，的。\n".as_bytes().to_vec(), "zh.txt", &config)
        .await
        .unwrap();
    assert_eq!(doc.content, "<p><b>仿生</b>阅读，<b>的</b>。</p>");
}

#[tokio::test]
async fn test_legacy_encoding() {
    // "中文字。" in GBK.
    let bytes = vec![0xD6, 0xD0, 0xCE, 0xC4, 0xD7, 0xD6, 0xA1, 0xA3];
    let config = ProcessingConfig::builder()
        .text_encoding("gbk")
        .build()
        .unwrap();
    let doc = process(bytes, "old.txt", &config).await.unwrap();
    assert_eq!(doc.content, "<p><b>中文</b>字。</p>");
}

#[tokio::test]
async fn test_html_in_text_is_escaped() {
    let doc = process(
        b"<script>alert(1)</script>".to_vec(),
        "x.txt",
        &ProcessingConfig::default(),
    )
    .await
    .unwrap();
    assert!(!doc.content.contains("<script>"));
    assert!(doc.content.contains("&lt;"));
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_file_too_large() {
    let bytes = vec![b'a'; 5 * 1024 * 1024 + 1];
    let err = process(bytes, "big.txt", &ProcessingConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ReaderError::FileTooLarge { .. }), "{err:?}");
}

#[tokio::test]
async fn test_local_file_too_large() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.txt");
    std::fs::write(&path, vec![b'a'; 2048]).unwrap();

    let config = ProcessingConfig::builder()
        .max_file_size(1024)
        .build()
        .unwrap();
    let err = process_file(path.to_str().unwrap(), &config)
        .await
        .unwrap_err();
    match err {
        ReaderError::FileTooLarge { size, limit } => {
            assert_eq!(size, 2048);
            assert_eq!(limit, 1024);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_unsupported_format() {
    let err = process(b"x".to_vec(), "slides.pptx", &ProcessingConfig::default())
        .await
        .unwrap_err();
    match err {
        ReaderError::UnsupportedFormat { extension } => assert_eq!(extension, "pptx"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_utf8() {
    let err = process(vec![0xC3, 0x28, b'a'], "bad.txt", &ProcessingConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ReaderError::EncodingError { .. }), "{err:?}");
    assert!(err.is_client_error());
}

#[tokio::test]
async fn test_missing_input_file() {
    let err = process_file("/no/such/dir/file.txt", &ProcessingConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ReaderError::FileNotFound { .. }), "{err:?}");
}

// ── Word ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_docx_document() {
    let bytes = docx_bytes(&[
        "Introduction.",
        "Bionic reading guides the eye",
        "through every sentence of a long document.",
    ]);
    let doc = process(bytes, "paper.DOCX", &ProcessingConfig::default())
        .await
        .unwrap();

    assert_eq!(doc.metadata.extension, "docx");
    assert_eq!(doc.stats.paragraph_count, 2);
    assert_eq!(
        strip_bold(&doc.content),
        "<p>Introduction.</p><p>Bionic reading guides the eye through every sentence of a long document.</p>"
    );
}

#[tokio::test]
async fn test_doc_extension_uses_word_converter() {
    let bytes = docx_bytes(&["Saved with a .doc name."]);
    let doc = process(bytes, "legacy.doc", &ProcessingConfig::default())
        .await
        .unwrap();
    assert_eq!(doc.metadata.extension, "doc");
    assert_eq!(strip_bold(&doc.content), "<p>Saved with a .doc name.</p>");
}

#[tokio::test]
async fn test_corrupt_docx() {
    let err = process(b"PK not really".to_vec(), "a.docx", &ProcessingConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ReaderError::ConversionFailure { .. }), "{err:?}");
}

// ── Truncation and ordering ──────────────────────────────────────────────────

#[tokio::test]
async fn test_long_document_is_truncated_at_paragraph_boundary() {
    let text: String = (0..200)
        .map(|i| format!("Paragraph number {i} has a few words in it.\n"))
        .collect();
    let config = ProcessingConfig::builder()
        .max_content_length(2_000)
        .truncation_notice("[cut]")
        .build()
        .unwrap();
    let doc = process(text.into_bytes(), "long.txt", &config).await.unwrap();

    assert!(doc.stats.truncated);
    let notice = notice_paragraph("[cut]");
    assert!(doc.content.ends_with(&notice));
    assert!(doc.content.chars().count() <= 2_000 + notice.chars().count());
    let body = doc.content.trim_end_matches(&notice);
    assert!(body.ends_with("</p>"));
    assert_eq!(body.matches("<p>").count(), body.matches("</p>").count());
}

#[tokio::test]
async fn test_paragraph_order_survives_concurrency() {
    let text: String = (0..500).map(|i| format!("Sentence {i} ends.\n")).collect();
    let config = ProcessingConfig::builder()
        .render_batch_size(7)
        .concurrency(8)
        .max_content_length(1_000_000)
        .build()
        .unwrap();
    let doc = process(text.into_bytes(), "order.txt", &config).await.unwrap();

    let expected: String = (0..500).map(|i| format!("<p>Sentence {i} ends.</p>")).collect();
    assert_eq!(strip_bold(&doc.content), expected);
    assert_eq!(doc.paragraphs.len(), 500);
}

// ── Custom converters ────────────────────────────────────────────────────────

struct HtmlService;

impl Converter for HtmlService {
    fn name(&self) -> &'static str {
        "html-service"
    }

    fn convert(&self, _bytes: &[u8], _: &ConvertOptions) -> Result<Conversion, ReaderError> {
        Ok(Conversion::html(
            "<h1>Heading.</h1><p>Body text that <em>spans</em> an inline tag</p>",
        ))
    }
}

#[tokio::test]
async fn test_replaced_converter_output_is_normalised() {
    let config = ProcessingConfig::builder()
        .converters(ConverterRegistry::default().with(DocumentFormat::Docx, Arc::new(HtmlService)))
        .bionic_enabled(false)
        .build()
        .unwrap();
    let doc = process(b"ignored".to_vec(), "a.docx", &config).await.unwrap();
    assert_eq!(
        doc.content,
        "<p>Heading.</p><p>Body text that spans an inline tag</p>"
    );
}

// ── JSON shape ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_document_json_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("note.txt");
    std::fs::write(&path, "Reading quickly.").unwrap();

    let doc = process_file(path.to_str().unwrap(), &ProcessingConfig::default())
        .await
        .unwrap();
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["type"], "html");
    assert_eq!(json["filename"], "note.txt");
    assert_eq!(json["extension"], "txt");
    assert_eq!(json["fileSize"], 16);
    assert_eq!(json["content"], "<p><b>Rea</b>ding <b>qui</b>ckly.</p>");
    assert!(json.get("pageCount").is_none());
}

// ── PDF ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_pdf_document() {
    skip_unless_pdfium!();

    let bytes = pdf_bytes(&["Hello world.", "This is bionic reading."]);
    let doc = process(bytes, "two-lines.pdf", &ProcessingConfig::default())
        .await
        .unwrap();

    assert_eq!(doc.metadata.page_count, Some(1));
    let plain = strip_bold(&doc.content);
    assert!(plain.contains("Hello world."), "{plain}");
    assert!(plain.contains("This is bionic reading."), "{plain}");
}
