//! Splitting instruction text into per-contract directives.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

use super::matchers::classify;
use crate::types::{ContractId, InsertionDirective};

/// Block marker: "Contract 3:" or "Contract 3" at the end of a line.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CONTRACT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\n)Contract\s+(\d+)[:\n]").expect("valid regex"));

/// Gap between the instruction sentence and the payload: one or more blank lines.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BLANK_LINE_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n)+").expect("valid regex"));

/// A contract block that could not be turned into a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    /// Contract named by the block header.
    pub contract: ContractId,
    /// Why the block was skipped.
    pub reason: String,
}

/// Result of parsing an instruction document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInstructions {
    /// Directives in document order, including unrecognised ones.
    pub directives: Vec<InsertionDirective>,
    /// Blocks without an instruction/payload split.
    pub skipped: Vec<SkippedBlock>,
}

/// Parse instruction text into insertion directives.
///
/// Blocks lacking the blank-line gap between instruction and payload are
/// dropped; use [`parse_instructions_detailed`] to see them.
///
/// # Examples
/// ```
/// use clause_inserter::instructions::parse_instructions;
///
/// let raw = "\nContract 1:\nInsert this clause as section 1A\n\nPayload text here.\n";
/// let directives = parse_instructions(raw);
/// assert_eq!(directives.len(), 1);
/// assert_eq!(directives[0].contract.to_string(), "Contract 1");
/// assert_eq!(directives[0].text, "Payload text here.");
/// ```
#[must_use]
pub fn parse_instructions(raw: &str) -> Vec<InsertionDirective> {
    parse_instructions_detailed(raw).directives
}

/// Parse instruction text, also reporting skipped blocks.
#[must_use]
pub fn parse_instructions_detailed(raw: &str) -> ParsedInstructions {
    let text: String = raw.replace("\r\n", "\n").nfc().collect();
    let mut parsed = ParsedInstructions::default();

    for (contract, content) in split_contract_blocks(&text) {
        match split_instruction(content) {
            Some((sentence, payload)) => {
                let mode = classify(sentence);
                if mode.insert_type().is_none() {
                    tracing::warn!(
                        contract = %contract,
                        instruction = %sentence,
                        "Instruction phrasing not recognised, directive will be ignored"
                    );
                }
                parsed
                    .directives
                    .push(InsertionDirective::new(contract, mode, payload));
            }
            None => {
                tracing::warn!(
                    contract = %contract,
                    "Instruction block has no blank line between instruction and text, skipping"
                );
                parsed.skipped.push(SkippedBlock {
                    contract,
                    reason: "no blank line between instruction and text".to_string(),
                });
            }
        }
    }

    parsed
}

/// Split text into `(contract, block content)` pairs.
///
/// Text before the first marker is ignored.
fn split_contract_blocks(text: &str) -> Vec<(ContractId, &str)> {
    let markers: Vec<_> = CONTRACT_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?.as_str();
            Some((ContractId::new(number), whole.start(), whole.end()))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, (contract, _, content_start))| {
            let content_end = markers.get(i + 1).map_or(text.len(), |next| next.1);
            (contract.clone(), &text[*content_start..content_end])
        })
        .collect()
}

/// Split block content into instruction sentence and payload.
fn split_instruction(content: &str) -> Option<(&str, &str)> {
    let content = content.trim();
    let gap = BLANK_LINE_GAP.find(content)?;
    let sentence = &content[..gap.start()];
    let payload = content[gap.end()..].trim();

    if payload.is_empty() {
        return None;
    }
    Some((sentence, payload))
}
