//! Configuration constants and validation functions for the clause inserter.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{InserterError, Result};

/// Default directory holding the contract documents.
pub const DEFAULT_CONTRACTS_DIR: &str = "contracts";

/// Default directory the updated contracts are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "updated";

/// File extension of contract documents.
pub const CONTRACT_FILE_EXTENSION: &str = "xml";

/// List id given to a new section when its base paragraph is unnumbered.
pub const FALLBACK_LIST_ID: &str = "1";

/// Text wrap width for payload previews on the terminal.
pub const PREVIEW_WRAP_WIDTH: usize = 80;

/// Maximum number of characters shown in a paragraph preview.
pub const PREVIEW_MAX_CHARS: usize = 60;

/// Contract number pattern: one or more digits.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CONTRACT_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));

/// Validate a contract number.
///
/// # Arguments
/// * `number` - The contract number, as written after `Contract`
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(InserterError::InvalidContractNumber)` if invalid
///
/// # Examples
/// ```
/// use clause_inserter::config::validate_contract_number;
///
/// assert!(validate_contract_number("12").is_ok());
/// assert!(validate_contract_number("12a").is_err());
/// ```
pub fn validate_contract_number(number: &str) -> Result<()> {
    if CONTRACT_NUMBER_PATTERN.is_match(number) {
        Ok(())
    } else {
        Err(InserterError::InvalidContractNumber(number.to_string()))
    }
}

/// File name of a contract document.
///
/// # Panics
/// Debug builds panic if `number` is not a valid contract number.
pub fn contract_file_name(number: &str) -> String {
    debug_assert!(
        CONTRACT_NUMBER_PATTERN.is_match(number),
        "contract number should be validated before calling contract_file_name"
    );
    format!("Contract {number}.{CONTRACT_FILE_EXTENSION}")
}

/// Path of a contract document inside `dir`.
pub fn contract_path(dir: &Path, number: &str) -> PathBuf {
    dir.join(contract_file_name(number))
}
