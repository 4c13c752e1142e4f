//! # sanetap
//!
//! Extracts users, spaces and content nodes from EdgeDB query rows and emits
//! them as a Singer message stream.
//!
//! Content nodes carry their rich text as a list of block groups in two
//! historical schemas. This crate classifies each block into a typed
//! [`Block`] and renders the whole node to a single Markdown document.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sanetap::{blocks_from_json, render, RenderOptions};
//!
//! fn main() -> sanetap::Result<()> {
//!     let groups = blocks_from_json(r#"[
//!         {"block_type": "text", "block_data": "[{\"type\":\"text\",\"isHeading\":true,\"content\":\"Intro\"}]"}
//!     ]"#)?;
//!
//!     let markdown = render::to_markdown(&groups, &RenderOptions::default())?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Both block schemas**: current typed lists and legacy single mappings
//! - **Hard failure on unknown types**: no silently truncated content
//! - **Singer output**: `SCHEMA`, `RECORD` and `STATE` messages with bookmarks
//! - **Parallel processing**: uses Rayon to render many nodes at once

pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod stream;
pub mod sync;

// Re-export commonly used types
pub use config::{RenderErrorPolicy, TapConfig};
pub use error::{Error, Result};
pub use model::{
    Block, BlockData, ContentBlockGroup, GroupShape, ImageBlock, LinkBlock, PdfBlock, TextBlock,
    TextKind, WeblinkBlock, YoutubeBlock,
};
pub use render::{BlockRenderer, MarkdownBuilder, RenderOptions, RenderResult, RenderStats};
pub use stream::StreamKind;
pub use sync::{JsonSource, Message, RecordSource, State, Tap};

/// Parse block groups from JSON text.
///
/// Accepts an array of groups, `null`, or a node row carrying the groups in
/// its `child_blocks` field.
///
/// # Example
///
/// ```
/// use sanetap::blocks_from_json;
///
/// let groups = blocks_from_json(r#"[{"block_data": "{}"}, null]"#).unwrap();
/// assert_eq!(groups.len(), 1);
/// ```
pub fn blocks_from_json(data: &str) -> Result<Vec<ContentBlockGroup>> {
    let mut value: serde_json::Value = serde_json::from_str(data)?;
    if let Some(child_blocks) = value.get_mut("child_blocks") {
        value = child_blocks.take();
    }
    model::groups_from_value(value)
}

/// Render block groups to Markdown with default options.
///
/// # Example
///
/// ```
/// use sanetap::{render_blocks, ContentBlockGroup};
/// use serde_json::json;
///
/// let groups = vec![ContentBlockGroup::new(json!({"isNumberedListItem": true, "content": "Step 1"}))];
/// assert_eq!(render_blocks(&groups).unwrap(), "1. Step 1");
/// ```
pub fn render_blocks(groups: &[ContentBlockGroup]) -> Result<String> {
    render::to_markdown(groups, &RenderOptions::default())
}

/// Render block groups given as JSON text to Markdown with default options.
pub fn render_json(data: &str) -> Result<String> {
    let groups = blocks_from_json(data)?;
    render_blocks(&groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json_null_and_empty() {
        assert_eq!(render_json("null").unwrap(), "");
        assert_eq!(render_json("[]").unwrap(), "");
        assert_eq!(render_json(r#"{"child_blocks": null}"#).unwrap(), "");
    }

    #[test]
    fn test_render_json_from_node_row() {
        let data = r#"{
            "node_id": "n1",
            "child_blocks": [{"block_data": "{\"isBulletListItem\": true, \"content\": \"eggs\"}"}]
        }"#;
        assert_eq!(render_json(data).unwrap(), "- eggs");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(render_json("[oops"), Err(Error::Json(_))));
    }
}
