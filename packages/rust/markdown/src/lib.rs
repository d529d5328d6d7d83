//! Markdown reading and rewriting for DocAtlas corpora.
//!
//! Extraction helpers ([`first_h1`], [`content_level`]) feed the corpus
//! consolidator; the style fixes ([`Fix`]) and the copyright enforcer rewrite
//! pages in place through [`run_fix`] and [`enforce_copyright`].

mod batch;
pub mod copyright;
mod extract;
mod fixes;

pub use batch::{BatchSummary, enforce_copyright, markdown_targets, run_fix};
pub use extract::{CONTENT_LEVEL_SCAN_LINES, content_level, first_h1};
pub use fixes::{Fix, Rewrite};
