//! Rendering result with statistics.

use serde::{Deserialize, Serialize};

/// Result of rendering block content, including statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered Markdown
    pub content: String,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: RenderStats) -> Self {
        Self { content, stats }
    }
}

/// Statistics collected while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Block groups received
    pub group_count: u32,

    /// Groups that contributed nothing
    pub empty_group_count: u32,

    /// Headings rendered
    pub heading_count: u32,

    /// List items rendered (ordered and unordered)
    pub list_item_count: u32,

    /// Text runs and paragraphs rendered
    pub text_count: u32,

    /// Images rendered
    pub image_count: u32,

    /// Links rendered (inline, file, web and video)
    pub link_count: u32,

    /// Character count of the output (excluding whitespace)
    pub char_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of blocks rendered.
    pub fn block_count(&self) -> u32 {
        self.heading_count
            + self.list_item_count
            + self.text_count
            + self.image_count
            + self.link_count
    }

    /// Add character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &RenderStats) {
        self.group_count += other.group_count;
        self.empty_group_count += other.empty_group_count;
        self.heading_count += other.heading_count;
        self.list_item_count += other.list_item_count;
        self.text_count += other.text_count;
        self.image_count += other.image_count;
        self.link_count += other.link_count;
        self.char_count += other.char_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_text() {
        let mut stats = RenderStats::new();
        stats.count_text("### Hello\n\n- a b");
        assert_eq!(stats.char_count, 11);
    }

    #[test]
    fn test_merge_and_block_count() {
        let mut stats1 = RenderStats {
            heading_count: 1,
            link_count: 2,
            ..Default::default()
        };
        let stats2 = RenderStats {
            heading_count: 2,
            image_count: 1,
            group_count: 4,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.heading_count, 3);
        assert_eq!(stats1.group_count, 4);
        assert_eq!(stats1.block_count(), 6);
    }
}
