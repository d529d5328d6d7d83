//! Metadata sidecar derivation.

use std::path::{Component, Path};

use chrono::{DateTime, Utc};

use docatlas_shared::{
    CONTENT_TYPE_MARKDOWN, ContentLevel, METADATA_VERSION, RagAttributes, RagConfig, RagMetadata,
};

/// Suffix appended to a staged page's file name to name its sidecar.
pub const METADATA_SUFFIX: &str = ".metadata.json";

/// Leading path segment already present in the base URL.
const TOPICS_SEGMENT: &str = "topics";

/// Build the sidecar for one page.
///
/// `modified` feeds both `_created_at` and `creation_date`.
pub fn build_metadata(
    config: &RagConfig,
    title: &str,
    level: ContentLevel,
    modified: DateTime<Utc>,
    source_uri: String,
) -> RagMetadata {
    RagMetadata {
        title: title.to_string(),
        content_type: CONTENT_TYPE_MARKDOWN.to_string(),
        attributes: RagAttributes {
            doc_type: config.document_type.clone(),
            creation_date: modified.format("%Y-%m-%d").to_string(),
            version: METADATA_VERSION,
            level: level.attribute(),
            source_uri,
            created_at: modified.format("%Y-%m-%dT%H:%M:%S+00:00").to_string(),
        },
    }
}

/// Published URL of the HTML page generated from `file`.
///
/// `<base>/<dir relative to root>/<stem>.html`, with a leading `topics`
/// directory dropped because the base URL already ends in it.
pub fn source_uri(base_url: &str, root: &Path, file: &Path) -> String {
    let html_name = file
        .with_extension("html")
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut segments: Vec<String> = file
        .parent()
        .and_then(|dir| dir.strip_prefix(root).ok())
        .map(|rel| {
            rel.components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if segments.first().is_some_and(|s| s == TOPICS_SEGMENT) {
        segments.remove(0);
    }

    segments.push(html_name);
    format!("{}/{}", base_url.trim_end_matches('/'), segments.join("/"))
}
