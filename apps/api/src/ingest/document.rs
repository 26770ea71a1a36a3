//! Resume text extraction from uploaded PDF and DOCX files.
//!
//! Works on in-memory bytes only. Every failure path returns an empty string;
//! the upload handler turns that into a user-facing validation error.

use std::io::{Cursor, Read};
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};
use zip::ZipArchive;

/// Part of a DOCX container that holds the document body.
const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Maps a filename to a supported kind by its (case-insensitive) extension.
    /// Uploads are accepted only when this returns `Some`.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }
}

/// Raw text pulled out of an uploaded document, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub kind: DocumentKind,
    pub text: String,
}

impl ExtractedDocument {
    pub fn extract(bytes: &[u8], kind: DocumentKind) -> Self {
        let text = match kind {
            DocumentKind::Pdf => extract_pdf(bytes),
            DocumentKind::Docx => extract_docx(bytes),
        };
        debug!("Extracted {} chars from {:?} upload", text.len(), kind);
        Self { kind, text }
    }
}

/// Extracts text from `bytes` as the declared kind. Unsupported kinds yield "".
pub fn extract(bytes: &[u8], declared_kind: Option<DocumentKind>) -> String {
    match declared_kind {
        Some(kind) => ExtractedDocument::extract(bytes, kind).text,
        None => String::new(),
    }
}

/// Page texts are concatenated in document order; pages without a text layer add nothing.
fn extract_pdf(bytes: &[u8]) -> String {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    match outcome {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("Failed to extract text from PDF: {e}");
            String::new()
        }
        Err(_) => {
            warn!("PDF parser panicked while extracting text");
            String::new()
        }
    }
}

fn extract_docx(bytes: &[u8]) -> String {
    match read_docx_body(bytes) {
        Ok(xml) => docx_xml_to_text(&xml),
        Err(e) => {
            warn!("Failed to extract text from DOCX: {e}");
            String::new()
        }
    }
}

fn read_docx_body(bytes: &[u8]) -> Result<String, zip::result::ZipError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entry = archive.by_name(DOCX_BODY_PART)?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Flattens WordprocessingML into plain text: one line per paragraph.
fn docx_xml_to_text(xml: &str) -> String {
    let with_breaks = xml
        .replace("</w:p>", "\n")
        .replace("<w:tab/>", "\t")
        .replace("<w:br/>", "\n");

    let mut text = String::with_capacity(with_breaks.len());
    let mut in_tag = false;
    for ch in with_breaks.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    decode_xml_entities(&text).trim().to_string()
}

fn decode_xml_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
