//! Core domain types for DocAtlas corpora.

use serde::{Deserialize, Serialize};

/// Value of the `ContentType` field for every consolidated page.
pub const CONTENT_TYPE_MARKDOWN: &str = "MD";

/// Value of the `_version` attribute.
pub const METADATA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// ContentLevel
// ---------------------------------------------------------------------------

/// Audience depth tag (100/200/300/400) embedded near the top of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentLevel(pub u64);

impl ContentLevel {
    /// Level assumed when a page carries no marker.
    pub const DEFAULT: Self = Self(100);

    /// Levels the style guide allows.
    pub const STANDARD: [u64; 4] = [100, 200, 300, 400];

    /// Whether this is one of the documented levels.
    pub fn is_standard(self) -> bool {
        Self::STANDARD.contains(&self.0)
    }

    /// The `level-<N>` attribute value.
    pub fn attribute(self) -> String {
        format!("level-{}", self.0)
    }
}

impl Default for ContentLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for ContentLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Metadata sidecar
// ---------------------------------------------------------------------------

/// The `<name>.md.metadata.json` sidecar written next to each staged page.
///
/// Field order matches the published schema; `serde_json` preserves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagMetadata {
    /// H1 text, or the file stem when the page has none.
    #[serde(rename = "Title")]
    pub title: String,
    /// Always [`CONTENT_TYPE_MARKDOWN`].
    #[serde(rename = "ContentType")]
    pub content_type: String,
    /// Retrieval attributes.
    #[serde(rename = "Attributes")]
    pub attributes: RagAttributes,
}

/// The `Attributes` object of a metadata sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagAttributes {
    #[serde(rename = "type")]
    pub doc_type: String,
    /// `YYYY-MM-DD`, same instant as `created_at`.
    pub creation_date: String,
    #[serde(rename = "_version")]
    pub version: u32,
    /// `level-<N>`.
    pub level: String,
    /// Published HTML page for this source file.
    #[serde(rename = "_source_uri")]
    pub source_uri: String,
    /// `YYYY-MM-DDTHH:MM:SS+00:00`.
    #[serde(rename = "_created_at")]
    pub created_at: String,
}
