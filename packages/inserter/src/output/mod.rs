//! Writing updated contracts and run reports, and formatting text for the
//! terminal.

mod text;
mod writer;

pub use text::{preview, wrap_preview};
pub use writer::{generate_report, save_contract, save_report, write_atomic};
