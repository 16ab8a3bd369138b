//! Building the XML of an inserted section.
//!
//! The new paragraph borrows its look from the paragraph it is inserted
//! before: paragraph style, spacing, indentation and alignment, and the
//! font of its first run. Defined terms in smart quotes are bolded, and
//! when the base section opens with a bold heading the first sentence of
//! the payload becomes a bold, underlined heading as well.

use regex::Regex;
use roxmltree::{Document, Node};
use std::ops::Range;
use std::sync::LazyLock;

use super::model::{ContractDocument, NumberingRef, Paragraph};
use crate::xml::{escape_text, find_child, source_text};

/// A defined term in smart quotes: “Services”.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static QUOTED_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"“[^”]+”").expect("valid regex"));

/// Paragraph properties copied from the base paragraph, in schema order.
const COPIED_PARAGRAPH_PROPERTIES: [&str; 3] = ["spacing", "ind", "jc"];

/// Run properties copied from the base run, in schema order after `w:b`.
const COPIED_RUN_PROPERTIES: [&str; 5] = ["i", "iCs", "color", "sz", "szCs"];

/// One chunk of payload text and how to emphasise it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    text: String,
    bold: bool,
    /// `None` keeps the base run's underline.
    underline: Option<bool>,
}

impl Segment {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            underline: None,
        }
    }

    fn bold(text: impl Into<String>, underline: Option<bool>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            underline,
        }
    }
}

/// Raw formatting snippets taken from the base paragraph.
#[derive(Debug, Default)]
struct BaseFormat {
    style: Option<String>,
    paragraph_properties: Vec<String>,
    fonts: Option<String>,
    run_properties: Vec<String>,
    underline: Option<String>,
    starts_bold: bool,
}

impl BaseFormat {
    fn from_paragraph(document: &ContractDocument, base: &Paragraph) -> Self {
        let mut format = Self {
            starts_bold: base.starts_bold(),
            ..Self::default()
        };

        let source = document.source();
        let Ok(doc) = Document::parse(source) else {
            return format;
        };
        let element_at = |range: &Range<usize>| {
            doc.descendants()
                .find(|n| n.is_element() && n.range() == *range)
        };

        if let Some(ppr) = base.properties.as_ref().and_then(|r| element_at(r)) {
            format.style = child_snippets(ppr, source, &["pStyle"]).pop();
            format.paragraph_properties =
                child_snippets(ppr, source, &COPIED_PARAGRAPH_PROPERTIES);
        }

        let first_run = base.runs.first().and_then(|run| run.properties.as_ref());
        if let Some(rpr) = first_run.and_then(|r| element_at(r)) {
            format.fonts = child_snippets(rpr, source, &["rFonts"]).pop();
            format.run_properties = child_snippets(rpr, source, &COPIED_RUN_PROPERTIES);
            format.underline = child_snippets(rpr, source, &["u"]).pop();
        }

        format
    }
}

/// Source snippets of the named children of a properties element, in the
/// order of `names`.
///
/// Snippets keep the prefixes they are written with; the namespaces they
/// use are declared by the document the new paragraph goes into.
fn child_snippets<'input>(
    properties: Node<'_, 'input>,
    source: &'input str,
    names: &[&str],
) -> Vec<String> {
    names
        .iter()
        .filter_map(|name| find_child(properties, name))
        .map(|node| source_text(node, source).to_string())
        .collect()
}

/// Split text after each period followed by whitespace, dropping the
/// whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '.' {
            continue;
        }
        let end = i + c.len_utf8();
        let mut resume = end;
        while let Some(&(j, next)) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            resume = j + next.len_utf8();
            chars.next();
        }
        if resume > end {
            sentences.push(&text[start..end]);
            start = resume;
        }
    }

    sentences.push(&text[start..]);
    sentences
}

/// Break payload text into emphasised segments.
fn segments(text: &str, starts_bold: bool) -> Vec<Segment> {
    enum Chunk<'a> {
        Quoted(&'a str),
        Plain(&'a str),
    }

    let mut chunks = Vec::new();
    let mut last = 0;
    for m in QUOTED_TERM.find_iter(text) {
        chunks.extend(
            split_sentences(&text[last..m.start()])
                .into_iter()
                .map(Chunk::Plain),
        );
        chunks.push(Chunk::Quoted(m.as_str()));
        last = m.end();
    }
    chunks.extend(
        split_sentences(&text[last..])
            .into_iter()
            .map(Chunk::Plain),
    );

    let mut out = Vec::new();
    let chunks = chunks.into_iter().filter_map(|chunk| match chunk {
        Chunk::Quoted(q) => Some(Chunk::Quoted(q)),
        Chunk::Plain(p) => Some(p.trim()).filter(|p| !p.is_empty()).map(Chunk::Plain),
    });

    for (i, chunk) in chunks.enumerate() {
        match chunk {
            Chunk::Quoted(term) => {
                let inner = term.trim_start_matches('“').trim_end_matches('”');
                out.push(Segment::plain("“"));
                out.push(Segment::bold(inner, None));
                out.push(Segment::plain("” "));
            }
            Chunk::Plain(sentence) if i == 0 && starts_bold => match sentence.find('.') {
                Some(dot) => {
                    out.push(Segment::bold(&sentence[..dot], Some(true)));
                    out.push(Segment::bold(format!("{} ", &sentence[dot..]), Some(false)));
                }
                None => out.push(Segment::bold(format!("{sentence} "), Some(true))),
            },
            Chunk::Plain(sentence) => out.push(Segment::plain(format!("{sentence} "))),
        }
    }

    out
}

/// Render the XML of a numbered paragraph holding `text`, formatted after
/// paragraph `base_index`.
///
/// Returns `None` if `base_index` is out of range.
#[must_use]
pub fn section_paragraph_xml(
    document: &ContractDocument,
    base_index: usize,
    numbering: &NumberingRef,
    text: &str,
) -> Option<String> {
    let base = document.paragraph(base_index)?;
    let format = BaseFormat::from_paragraph(document, base);
    let q = |local: &str| document.qname(local);

    let mut xml = String::new();
    xml.push_str(&format!("<{}>", q("p")));

    xml.push_str(&format!("<{}>", q("pPr")));
    if let Some(style) = &format.style {
        xml.push_str(style);
    }
    xml.push_str(&format!(
        r#"<{num_pr}><{ilvl} {val}="{level}"/><{num_id} {val}="{list}"/></{num_pr}>"#,
        num_pr = q("numPr"),
        ilvl = q("ilvl"),
        num_id = q("numId"),
        val = q("val"),
        level = numbering.level,
        list = escape_text(numbering.list.as_str()),
    ));
    for property in &format.paragraph_properties {
        xml.push_str(property);
    }
    xml.push_str(&format!("</{}>", q("pPr")));

    for segment in segments(text, format.starts_bold) {
        xml.push_str(&run_xml(document, &format, &segment));
    }

    xml.push_str(&format!("</{}>", q("p")));
    Some(xml)
}

fn run_xml(document: &ContractDocument, format: &BaseFormat, segment: &Segment) -> String {
    let q = |local: &str| document.qname(local);

    let mut rpr = String::new();
    if let Some(fonts) = &format.fonts {
        rpr.push_str(fonts);
    }
    if segment.bold {
        rpr.push_str(&format!("<{}/>", q("b")));
    }
    for property in &format.run_properties {
        rpr.push_str(property);
    }
    match segment.underline {
        Some(true) => rpr.push_str(&format!(r#"<{} {}="single"/>"#, q("u"), q("val"))),
        Some(false) => rpr.push_str(&format!(r#"<{} {}="none"/>"#, q("u"), q("val"))),
        None => {
            if let Some(underline) = &format.underline {
                rpr.push_str(underline);
            }
        }
    }

    let mut xml = format!("<{}>", q("r"));
    if !rpr.is_empty() {
        xml.push_str(&format!("<{0}>{rpr}</{0}>", q("rPr")));
    }
    xml.push_str(&format!(
        r#"<{0} xml:space="preserve">{1}</{0}>"#,
        q("t"),
        escape_text(&segment.text)
    ));
    xml.push_str(&format!("</{}>", q("r")));
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numbering::ListId;
    use pretty_assertions::assert_eq;

    const W: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn document(body: &str) -> ContractDocument {
        ContractDocument::parse(format!(r#"<w:document {W}><w:body>{body}</w:body></w:document>"#))
            .unwrap()
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("One. Two.  Three"),
            vec!["One.", "Two.", "Three"]
        );
        assert_eq!(split_sentences("No period"), vec!["No period"]);
        assert_eq!(
            split_sentences("3.5 percent. Next."),
            vec!["3.5 percent.", "Next."]
        );
        assert_eq!(split_sentences("End. "), vec!["End.", ""]);
    }

    #[test]
    fn test_segments_plain_sentences() {
        assert_eq!(
            segments("First sentence. Second sentence.", false),
            vec![
                Segment::plain("First sentence. "),
                Segment::plain("Second sentence. "),
            ]
        );
    }

    #[test]
    fn test_segments_quoted_terms_are_bold() {
        assert_eq!(
            segments("The “Services” means the work.", false),
            vec![
                Segment::plain("The "),
                Segment::plain("“"),
                Segment::bold("Services", None),
                Segment::plain("” "),
                Segment::plain("means the work. "),
            ]
        );
    }

    #[test]
    fn test_segments_bold_heading() {
        assert_eq!(
            segments("Insurance. The Supplier shall insure.", true),
            vec![
                Segment::bold("Insurance", Some(true)),
                Segment::bold(". ", Some(false)),
                Segment::plain("The Supplier shall insure. "),
            ]
        );
    }

    #[test]
    fn test_segments_bold_heading_without_period() {
        assert_eq!(
            segments("Insurance", true),
            vec![Segment::bold("Insurance ", Some(true))]
        );
    }

    #[test]
    fn test_section_paragraph_copies_base_format() {
        let doc = document(
            r#"<w:p><w:pPr><w:pStyle w:val="Body"/><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr><w:spacing w:after="120"/><w:jc w:val="both"/></w:pPr><w:r><w:rPr><w:rFonts w:ascii="Arial"/><w:b/><w:sz w:val="22"/></w:rPr><w:t>Fees.</w:t></w:r></w:p>"#,
        );
        let numbering = NumberingRef::new(ListId::new("1"), 0);
        let xml = section_paragraph_xml(&doc, 0, &numbering, "Insurance. Keep it.").unwrap();

        assert!(xml.starts_with(r#"<w:p><w:pPr><w:pStyle w:val="Body"/><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr><w:spacing w:after="120"/><w:jc w:val="both"/></w:pPr>"#));
        assert!(xml.contains(r#"<w:r><w:rPr><w:rFonts w:ascii="Arial"/><w:b/><w:sz w:val="22"/><w:u w:val="single"/></w:rPr><w:t xml:space="preserve">Insurance</w:t></w:r>"#));
        assert!(xml.contains(r#"<w:t xml:space="preserve">Keep it. </w:t>"#));
        assert!(xml.ends_with("</w:p>"));
        assert!(roxmltree::Document::parse(&format!("<x {W}>{xml}</x>")).is_ok());
    }

    #[test]
    fn test_section_paragraph_without_base_properties() {
        let doc = document(r#"<w:p><w:r><w:t>Plain</w:t></w:r></w:p>"#);
        let numbering = NumberingRef::new(ListId::new("5"), 1);
        let xml = section_paragraph_xml(&doc, 0, &numbering, "A & B.").unwrap();

        assert_eq!(
            xml,
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="1"/><w:numId w:val="5"/></w:numPr></w:pPr><w:r><w:t xml:space="preserve">A &amp; B. </w:t></w:r></w:p>"#
        );
    }

    #[test]
    fn test_section_paragraph_out_of_range() {
        let doc = document(r#"<w:p/>"#);
        let numbering = NumberingRef::new(ListId::new("1"), 0);
        assert!(section_paragraph_xml(&doc, 3, &numbering, "x").is_none());
    }

    #[test]
    fn test_section_paragraph_copies_format_next_to_other_namespaces() {
        let doc = ContractDocument::parse(format!(
            r#"<w:document {W} xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml"><w:body><w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="2"/></w:numPr><w:ind w:left="720"/><w14:textId/></w:pPr><w:r><w:rPr><w:rFonts w:ascii="Calibri"/><w14:glow w14:rad="0"/><w:color w:val="1F1F1F"/><w:sz w:val="20"/></w:rPr><w:t>Scope.</w:t></w:r></w:p></w:body></w:document>"#
        ))
        .unwrap();
        let numbering = NumberingRef::new(ListId::new("2"), 0);
        let xml = section_paragraph_xml(&doc, 0, &numbering, "Term.").unwrap();

        assert!(xml.contains(r#"</w:numPr><w:ind w:left="720"/></w:pPr>"#));
        assert!(xml.contains(
            r#"<w:rPr><w:rFonts w:ascii="Calibri"/><w:color w:val="1F1F1F"/><w:sz w:val="20"/></w:rPr>"#
        ));
        assert!(!xml.contains("w14:"));
    }

    #[test]
    fn test_child_snippets_in_requested_order() {
        let source = r#"<w:rPr xmlns:w="urn:w"><w:color w:val="FF0000"/><w:i/></w:rPr>"#;
        let doc = Document::parse(source).unwrap();
        let snippets = child_snippets(doc.root_element(), source, &["rFonts", "i", "color"]);
        assert_eq!(snippets, vec![r#"<w:i/>"#, r#"<w:color w:val="FF0000"/>"#]);
    }

    #[test]
    fn test_child_snippets_unprefixed() {
        let source = r#"<pPr><jc val="center"/></pPr>"#;
        let doc = Document::parse(source).unwrap();
        let snippets = child_snippets(doc.root_element(), source, &["jc"]);
        assert_eq!(snippets, vec![r#"<jc val="center"/>"#]);
    }
}
