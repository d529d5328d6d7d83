//! Shared types, error model, and configuration for DocAtlas.
//!
//! This crate is the foundation depended on by all other DocAtlas crates.
//! It provides:
//! - [`DocAtlasError`], the unified error type
//! - Domain types ([`ContentLevel`], [`RagMetadata`], [`RagAttributes`])
//! - Configuration ([`AppConfig`], [`RagConfig`], [`CopyrightConfig`], config loading)
//! - Corpus traversal helpers ([`collect_files`], [`require_dir`])

pub mod config;
pub mod error;
pub mod types;
pub mod walk;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ARCHIVE_FILE_NAME, CopyrightConfig, CopyrightSection, DEFAULT_BASE_URL,
    DEFAULT_COPYRIGHT_NOTICE, DEFAULT_DOCUMENT_TYPE, RagConfig, RagSection, STAGING_DIR_NAME,
    config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{DocAtlasError, Result};
pub use types::{CONTENT_TYPE_MARKDOWN, ContentLevel, METADATA_VERSION, RagAttributes, RagMetadata};
pub use walk::{collect_files, has_extension, require_dir};
