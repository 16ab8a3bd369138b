//! XML utility functions for navigating WordprocessingML trees and editing
//! their source text.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use clause_inserter::xml::get_tag_name;
///
/// let xml = r#"<w:body xmlns:w="urn:w"><w:p/></w:body>"#;
/// let doc = Document::parse(xml).unwrap();
/// let p = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(p), "p");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Check if a node is an element with a specific tag name.
pub fn has_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && get_tag_name(node) == tag
}

/// Find the first child element with the given tag name.
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| has_tag(*child, tag))
}

/// Find all child elements with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use clause_inserter::xml::find_children;
///
/// let xml = r#"<p><r/><pPr/><r/></p>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(find_children(doc.root_element(), "r").count(), 2);
/// ```
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |child| has_tag(*child, tag))
}

/// Find a descendant element matching a path of tag names.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use clause_inserter::xml::find_by_path;
///
/// let xml = r#"<p><pPr><numPr><ilvl/></numPr></pPr></p>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert!(find_by_path(doc.root_element(), "pPr/numPr/ilvl").is_some());
/// assert!(find_by_path(doc.root_element(), "pPr/rPr").is_none());
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    path.split('/')
        .try_fold(node, |current, part| find_child(current, part))
}

/// Get an attribute value by local name, ignoring its namespace.
///
/// WordprocessingML qualifies almost every attribute (`w:val`), which makes
/// namespace-exact lookups noisy.
pub fn get_attribute<'a>(node: Node<'a, '_>, local_name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|attr| attr.name() == local_name)
        .map(|attr| attr.value())
}

/// The `w:val` attribute of an element.
pub fn get_val<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    get_attribute(node, "val")
}

/// Whether an on/off property element (`<w:b/>`, `<w:b w:val="0"/>`) is on.
pub fn is_on(node: Node<'_, '_>) -> bool {
    !matches!(get_val(node), Some("0" | "false" | "off" | "none"))
}

/// Source text of a node, as written in the input.
pub fn source_text<'input>(node: Node<'_, 'input>, input: &'input str) -> &'input str {
    &input[node.range()]
}

/// Escape text for use as XML character data.
///
/// # Examples
/// ```
/// use clause_inserter::xml::escape_text;
///
/// assert_eq!(escape_text("A & B <C>"), "A &amp; B &lt;C&gt;");
/// ```
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Byte offset in raw (escaped) character data of the `char_offset`-th
/// decoded character.
///
/// Entity and character references count as one decoded character. Offsets
/// past the end map to the end of `raw`.
///
/// # Examples
/// ```
/// use clause_inserter::xml::raw_offset_for_char;
///
/// assert_eq!(raw_offset_for_char("a&amp;b", 2), 6);
/// assert_eq!(raw_offset_for_char("abc", 10), 3);
/// ```
pub fn raw_offset_for_char(raw: &str, char_offset: usize) -> usize {
    let mut decoded = 0;
    let mut iter = raw.char_indices();

    while let Some((byte, c)) = iter.next() {
        if decoded == char_offset {
            return byte;
        }
        if c == '&' {
            // Skip to the end of the reference
            for (_, next) in iter.by_ref() {
                if next == ';' {
                    break;
                }
            }
        }
        decoded += 1;
    }

    raw.len()
}
