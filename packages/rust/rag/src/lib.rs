//! Markdown corpus consolidation for retrieval-augmented generation.
//!
//! Flattens a documentation tree into a single staging directory of
//! uniquely named pages, each paired with a `<name>.md.metadata.json`
//! sidecar, and zips the result.

pub mod archive;
pub mod consolidate;
pub mod history;
pub mod metadata;
pub mod naming;

pub use archive::write_archive;
pub use consolidate::{
    ConsolidateProgress, ConsolidateResult, Consolidator, OutputRecord, SilentProgress,
    reset_staging,
};
pub use history::{Clock, GitHistory, NoHistory, RevisionHistory, SystemClock};
pub use metadata::{METADATA_SUFFIX, build_metadata, source_uri};
pub use naming::{NameRegistry, NumericPrefix, base_name, dir_hash, numeric_prefix, sanitize_title};
