//! Core data types shared by the parser, the resolver and the batch driver.

use serde::Serialize;

use crate::config::contract_file_name;

/// Contract number as written in the instructions (e.g. "1", "007").
///
/// The digits are kept verbatim because they name the contract file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractId(String);

impl ContractId {
    /// Create a contract identifier from its number.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// The contract number.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.0
    }

    /// File name of the contract document, e.g. `Contract 1.xml`.
    ///
    /// # Examples
    /// ```
    /// use clause_inserter::types::ContractId;
    ///
    /// assert_eq!(ContractId::new("3").file_name(), "Contract 3.xml");
    /// ```
    #[must_use]
    pub fn file_name(&self) -> String {
        contract_file_name(&self.0)
    }
}

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Contract {}", self.0)
    }
}

/// How a payload is inserted into its contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertionMode {
    /// Insert as a new numbered section placed before the section that
    /// currently carries `section`, so the new one takes over that label.
    AsNewSection { section: String },

    /// Insert inside the paragraph of `section`, after sentence
    /// `sentence_after`. `None` means the ordinal word was not recognised.
    WithinSection {
        section: String,
        sentence_after: Option<u32>,
    },

    /// The instruction sentence matched neither phrasing. Such directives
    /// are carried along so they can be reported, but never applied.
    Unrecognized,
}

impl InsertionMode {
    /// Short tag used in directive records: `as`, `in`, or none.
    #[must_use]
    pub fn insert_type(&self) -> Option<&'static str> {
        match self {
            Self::AsNewSection { .. } => Some("as"),
            Self::WithinSection { .. } => Some("in"),
            Self::Unrecognized => None,
        }
    }

    /// Target section label, if any.
    #[must_use]
    pub fn section(&self) -> Option<&str> {
        match self {
            Self::AsNewSection { section } | Self::WithinSection { section, .. } => Some(section),
            Self::Unrecognized => None,
        }
    }
}

/// One parsed insertion instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionDirective {
    /// Contract the payload goes into.
    pub contract: ContractId,

    /// Where and how to insert.
    pub mode: InsertionMode,

    /// Text to insert, trimmed.
    pub text: String,
}

impl InsertionDirective {
    /// Create a new directive.
    #[must_use]
    pub fn new(contract: ContractId, mode: InsertionMode, text: impl Into<String>) -> Self {
        Self {
            contract,
            mode,
            text: text.into(),
        }
    }

    /// Whether this directive can never be applied.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.mode == InsertionMode::Unrecognized
    }
}

/// Flat, serialisable form of a directive.
///
/// This is the record shape shown to users and written to reports:
/// `{contract, insert_type, section_name, sentence_after, text}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectiveRecord {
    pub contract: String,
    pub insert_type: Option<String>,
    pub section_name: Option<String>,
    pub sentence_after: Option<u32>,
    pub text: String,
}

impl From<&InsertionDirective> for DirectiveRecord {
    fn from(directive: &InsertionDirective) -> Self {
        let sentence_after = match directive.mode {
            InsertionMode::WithinSection { sentence_after, .. } => sentence_after,
            _ => None,
        };

        Self {
            contract: directive.contract.to_string(),
            insert_type: directive.mode.insert_type().map(String::from),
            section_name: directive.mode.section().map(String::from),
            sentence_after,
            text: directive.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_contract_id_display() {
        let id = ContractId::new("12");
        assert_eq!(id.to_string(), "Contract 12");
        assert_eq!(id.number(), "12");
        assert_eq!(id.file_name(), "Contract 12.xml");
    }

    #[test]
    fn test_contract_id_keeps_leading_zeros() {
        assert_eq!(ContractId::new("007").to_string(), "Contract 007");
    }

    #[test]
    fn test_insertion_mode_accessors() {
        let as_mode = InsertionMode::AsNewSection {
            section: "1A".to_string(),
        };
        assert_eq!(as_mode.insert_type(), Some("as"));
        assert_eq!(as_mode.section(), Some("1A"));

        let in_mode = InsertionMode::WithinSection {
            section: "11".to_string(),
            sentence_after: Some(2),
        };
        assert_eq!(in_mode.insert_type(), Some("in"));
        assert_eq!(in_mode.section(), Some("11"));

        assert_eq!(InsertionMode::Unrecognized.insert_type(), None);
        assert_eq!(InsertionMode::Unrecognized.section(), None);
    }

    #[test]
    fn test_directive_record_within_section() {
        let directive = InsertionDirective::new(
            ContractId::new("2"),
            InsertionMode::WithinSection {
                section: "11".to_string(),
                sentence_after: Some(2),
            },
            "Inserted sentence.",
        );

        assert_eq!(
            DirectiveRecord::from(&directive),
            DirectiveRecord {
                contract: "Contract 2".to_string(),
                insert_type: Some("in".to_string()),
                section_name: Some("11".to_string()),
                sentence_after: Some(2),
                text: "Inserted sentence.".to_string(),
            }
        );
    }

    #[test]
    fn test_directive_record_unrecognized_serializes_nulls() {
        let directive =
            InsertionDirective::new(ContractId::new("4"), InsertionMode::Unrecognized, "Text.");
        assert!(directive.is_noop());

        let json = serde_json::to_value(DirectiveRecord::from(&directive)).unwrap();
        assert_eq!(json["insert_type"], serde_json::Value::Null);
        assert_eq!(json["section_name"], serde_json::Value::Null);
        assert_eq!(json["sentence_after"], serde_json::Value::Null);
        assert_eq!(json["contract"], "Contract 4");
    }
}
