//! Clause Inserter - Insert attorney-drafted clauses into contract documents.
//!
//! This crate reads an instruction document describing, per contract, where
//! a clause or sentence goes, and applies those instructions to contracts
//! stored as WordprocessingML XML without disturbing their formatting.
//!
//! # Example
//!
//! ```
//! use clause_inserter::instructions::parse_instructions;
//! use clause_inserter::numbering::{locate_section, NumberingTracker, ListId};
//!
//! let raw = "Contract 1:\nInsert this clause as section 1A\n\nThe Supplier shall insure.\n";
//! let directives = parse_instructions(raw);
//! assert_eq!(directives[0].mode.section(), Some("1A"));
//!
//! let list = ListId::new("1");
//! let mut tracker = NumberingTracker::new();
//! let labels: Vec<String> = [0, 1, 0].iter().map(|&level| tracker.advance(&list, level)).collect();
//! assert_eq!(locate_section(&labels, "1A"), Some(1));
//! ```
//!
//! # Architecture
//!
//! The inserter is organized into several modules:
//!
//! - [`config`]: Configuration constants and validation
//! - [`types`]: Core data types (ContractId, InsertionDirective, etc.)
//! - [`error`]: Error types and Result alias
//! - [`numbering`]: Outline counters, labels and section lookup
//! - [`instructions`]: Instruction document parsing
//! - [`sentence`]: Sentence boundaries inside multi-run paragraphs
//! - [`xml`]: XML utilities
//! - [`document`]: WordprocessingML reading and editing
//! - [`resolve`]: Mapping directives onto a document
//! - [`batch`]: Applying instructions to a directory of contracts
//! - [`output`]: File output and terminal formatting
//! - [`cli`]: Command-line interface

pub mod batch;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod instructions;
pub mod numbering;
pub mod output;
pub mod resolve;
pub mod sentence;
pub mod types;
pub mod xml;

// Re-export commonly used items
pub use batch::{BatchOptions, BatchReport, BatchRunner};
pub use config::validate_contract_number;
pub use document::ContractDocument;
pub use error::{InserterError, Result};
pub use instructions::{parse_instructions, parse_instructions_detailed};
pub use resolve::{Resolution, Resolver, SkipReason};
pub use types::{ContractId, DirectiveRecord, InsertionDirective, InsertionMode};
