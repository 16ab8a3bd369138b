//! Contract documents stored as WordprocessingML XML.
//!
//! - [`model`]: paragraphs, runs and their source ranges
//! - `wordml`: reading the XML into the model
//! - `style`: formatting of inserted sections
//! - `edit`: splicing sections and sentences into the source

mod edit;
pub mod model;
mod style;
mod wordml;

pub use model::{ContractDocument, NumberingRef, Paragraph, Run, RunPiece};
pub use wordml::paragraph_texts;
