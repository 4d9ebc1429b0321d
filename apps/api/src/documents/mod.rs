//! Document text extraction: turns an uploaded file into a normalized string.

pub mod handlers;

use std::io::Read;

use crate::errors::AppError;

/// Supported upload formats, derived from the declared file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> Result<Self, AppError> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            other => Err(AppError::UnsupportedDocument(other.to_string())),
        }
    }

    pub fn from_filename(name: &str) -> Result<Self, AppError> {
        match name.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Err(AppError::UnsupportedDocument(name.to_string())),
        }
    }
}

/// Extracts plain text from an uploaded document.
/// Failures are wrapped with a descriptive message and surfaced to the caller.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<String, AppError> {
    match kind {
        DocumentKind::Text => String::from_utf8(bytes.to_vec())
            .map_err(|e| AppError::Extraction(format!("file is not valid UTF-8: {e}"))),
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map(|text| text.trim().to_string())
            .map_err(|e| AppError::Extraction(format!("failed to read PDF: {e}"))),
        DocumentKind::Docx => extract_docx_text(bytes),
    }
}

/// A .docx file is a zip archive with the body in `word/document.xml`.
fn extract_docx_text(bytes: &[u8]) -> Result<String, AppError> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)
        .map_err(|e| AppError::Extraction(format!("failed to read DOCX archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| AppError::Extraction(format!("DOCX has no document body: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| AppError::Extraction(format!("failed to read DOCX body: {e}")))?;

    Ok(document_xml_to_text(&xml))
}

/// Strips XML tags, turning paragraph ends (`</w:p>`) into newlines.
fn document_xml_to_text(xml: &str) -> String {
    let mut out = String::new();
    let mut tag = String::new();
    let mut in_tag = false;

    for ch in xml.chars() {
        match ch {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' => {
                in_tag = false;
                if tag == "/w:p" {
                    out.push('\n');
                }
            }
            _ if in_tag => tag.push(ch),
            _ => out.push(ch),
        }
    }

    decode_entities(&out).trim().to_string()
}

fn decode_entities(text: &str) -> String {
    // `&amp;` last, so decoded ampersands never re-trigger another entity
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
