//! Rendering module for converting block groups to Markdown.

mod blocks;
mod builder;
mod options;
mod result;

pub use blocks::{to_markdown, to_markdown_with_stats, BlockRenderer};
pub use builder::MarkdownBuilder;
pub use options::{RenderOptions, DEFAULT_FILE_BASE_URL};
pub use result::{RenderResult, RenderStats};
