//! Reading the instruction document from disk.

use std::fs;
use std::path::Path;

use crate::document::paragraph_texts;
use crate::error::Result;

/// Flatten a WordprocessingML instruction document to text.
///
/// Paragraphs become lines; the text starts and ends with a newline so the
/// first contract marker sits at a line start.
///
/// # Errors
/// Returns an error if the XML is malformed or has no `w:body`.
pub fn instruction_text_from_xml(source: &str) -> Result<String> {
    let paragraphs = paragraph_texts(source)?;
    Ok(format!("\n{}\n", paragraphs.join("\n")))
}

/// Read instruction text from a file.
///
/// Files with an `.xml` extension are read as WordprocessingML, anything
/// else as plain text.
///
/// # Errors
/// Returns an error if the file cannot be read or its XML cannot be parsed.
pub fn read_instruction_text(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    let is_xml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));

    if is_xml {
        instruction_text_from_xml(&content)
    } else {
        Ok(content)
    }
}
