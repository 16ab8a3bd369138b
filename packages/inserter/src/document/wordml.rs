//! Reading WordprocessingML into the document model.
//!
//! Accepts either the main document part (`word/document.xml`) or a Word
//! "Flat XML" package, which bundles the styles part in the same file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};
use tracing::warn;

use super::model::{ContractDocument, NumberingRef, Paragraph, Run, RunPiece};
use crate::error::{InserterError, Result};
use crate::numbering::{LevelIndex, ListId};
use crate::xml::{
    find_by_path, find_child, find_children, get_attribute, get_tag_name, get_val, has_tag, is_on,
};

/// `w:numId` value Word uses to switch numbering off.
const NUMBERING_OFF: &str = "0";

/// Deepest `w:ilvl` Word defines (levels 0 through 8).
const MAX_LEVEL: LevelIndex = 8;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

impl ContractDocument {
    /// Parse a document from its XML source.
    ///
    /// # Errors
    /// Returns an error if the XML is malformed or has no `w:body`.
    pub fn parse(source: String) -> Result<Self> {
        let (prefix, paragraphs) = {
            let doc = Document::parse(&source)?;
            let body = doc
                .descendants()
                .find(|n| has_tag(*n, "body"))
                .ok_or_else(|| InserterError::MissingElement {
                    element: "body".to_string(),
                    context: "document".to_string(),
                })?;

            let prefix = body
                .tag_name()
                .namespace()
                .and_then(|ns| body.lookup_prefix(ns))
                .unwrap_or_default()
                .to_string();

            let styles = style_numbering(&doc);
            let paragraphs = find_children(body, "p")
                .map(|p| read_paragraph(p, &styles))
                .collect();

            (prefix, paragraphs)
        };

        Ok(Self {
            source,
            prefix,
            paragraphs,
        })
    }

    /// Read and parse a document file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::parse(source)
    }
}

/// Texts of the body paragraphs of a WordprocessingML source, in order.
///
/// # Errors
/// Returns an error if the XML is malformed or has no `w:body`.
pub fn paragraph_texts(source: &str) -> Result<Vec<String>> {
    let document = ContractDocument::parse(source.to_string())?;
    Ok(document.paragraphs().iter().map(Paragraph::text).collect())
}

/// Numbering read from a `w:numPr` element.
///
/// A `numPr` without `numId`, or with Word's "off" id, yields `None`. So
/// does a level Word cannot display (not a number, or deeper than
/// [`MAX_LEVEL`]).
fn read_num_pr(num_pr: Node<'_, '_>) -> Option<NumberingRef> {
    let num_id = find_child(num_pr, "numId").and_then(get_val)?;
    if num_id == NUMBERING_OFF {
        return None;
    }

    let level = match find_child(num_pr, "ilvl").and_then(get_val) {
        None => 0,
        Some(value) => match value.parse::<LevelIndex>() {
            Ok(level) if level <= MAX_LEVEL => level,
            _ => {
                warn!(num_id, ilvl = value, "invalid numbering level");
                return None;
            }
        },
    };

    Some(NumberingRef::new(ListId::new(num_id), level))
}

/// Paragraph styles that carry numbering, keyed by style id.
fn style_numbering(doc: &Document<'_>) -> HashMap<String, NumberingRef> {
    doc.descendants()
        .filter(|n| has_tag(*n, "style"))
        .filter_map(|style| {
            let id = get_attribute(style, "styleId")?;
            let num_pr = find_by_path(style, "pPr/numPr")?;
            Some((id.to_string(), read_num_pr(num_pr)?))
        })
        .collect()
}

fn read_paragraph(p: Node<'_, '_>, styles: &HashMap<String, NumberingRef>) -> Paragraph {
    let properties = find_child(p, "pPr");
    let style_id = properties
        .and_then(|ppr| find_child(ppr, "pStyle"))
        .and_then(get_val)
        .map(String::from);

    // Direct numbering wins over the style's, even when it is incomplete
    let numbering = match properties.and_then(|ppr| find_child(ppr, "numPr")) {
        Some(num_pr) => read_num_pr(num_pr),
        None => style_id.as_ref().and_then(|id| styles.get(id)).cloned(),
    };

    Paragraph {
        range: p.range(),
        properties: properties.map(|n| n.range()),
        style_id,
        numbering,
        runs: find_children(p, "r").map(read_run).collect(),
    }
}

fn read_run(r: Node<'_, '_>) -> Run {
    let properties = find_child(r, "rPr");
    let bold = properties
        .and_then(|rpr| find_child(rpr, "b"))
        .is_some_and(is_on);

    let pieces = r
        .children()
        .filter(|n| n.is_element())
        .filter_map(|child| match get_tag_name(child) {
            "t" => read_text(child),
            "tab" => Some(RunPiece::Literal('\t')),
            "br" | "cr" => Some(RunPiece::Literal('\n')),
            _ => None,
        })
        .collect();

    Run {
        range: r.range(),
        properties: properties.map(|n| n.range()),
        bold,
        pieces,
    }
}

/// Read a `w:t` element. Empty elements have no character data to edit.
fn read_text(t: Node<'_, '_>) -> Option<RunPiece> {
    let text_node = t.first_child().filter(|n| n.is_text())?;
    let space = t
        .attributes()
        .find(|attr| attr.namespace() == Some(XML_NAMESPACE) && attr.name() == "space")
        .map(|attr| attr.range_value());

    Some(RunPiece::Text {
        text: text_node.text()?.to_string(),
        raw: text_node.range(),
        space,
    })
}
