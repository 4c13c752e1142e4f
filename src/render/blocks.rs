//! Markdown rendering for content block groups.

use crate::error::Result;
use crate::model::{Block, ContentBlockGroup, TextKind};

use super::{MarkdownBuilder, RenderOptions, RenderResult, RenderStats};

/// Convert block groups to Markdown.
pub fn to_markdown(groups: &[ContentBlockGroup], options: &RenderOptions) -> Result<String> {
    let renderer = BlockRenderer::new(options.clone());
    renderer.render(groups)
}

/// Convert block groups to Markdown with statistics.
pub fn to_markdown_with_stats(
    groups: &[ContentBlockGroup],
    options: &RenderOptions,
) -> Result<RenderResult> {
    let renderer = BlockRenderer::new(options.clone());
    renderer.render_with_stats(groups)
}

/// Block group renderer.
///
/// Each renderer owns its builder, so independent renders never share state.
pub struct BlockRenderer {
    options: RenderOptions,
    stats: RenderStats,
}

impl BlockRenderer {
    /// Create a new block renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: RenderStats::new(),
        }
    }

    /// Render block groups to Markdown.
    pub fn render(mut self, groups: &[ContentBlockGroup]) -> Result<String> {
        self.render_internal(groups)
    }

    /// Render block groups to Markdown with statistics.
    pub fn render_with_stats(mut self, groups: &[ContentBlockGroup]) -> Result<RenderResult> {
        self.options.collect_stats = true;
        let content = self.render_internal(groups)?;

        self.stats.count_text(&content);

        Ok(RenderResult::new(content, self.stats))
    }

    fn render_internal(&mut self, groups: &[ContentBlockGroup]) -> Result<String> {
        if groups.is_empty() {
            return Ok(String::new());
        }

        // Classify everything first so a bad block leaves no partial output.
        let blocks = self.classify(groups)?;

        let mut output = MarkdownBuilder::new();
        for block in &blocks {
            self.render_block(&mut output, block);
        }

        Ok(output.build())
    }

    fn classify(&mut self, groups: &[ContentBlockGroup]) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();
        for (index, group) in groups.iter().enumerate() {
            let classified = if group.is_empty_marker() {
                Vec::new()
            } else {
                group.blocks()?
            };
            log::debug!("group {} classified into {} blocks", index, classified.len());

            if self.options.collect_stats {
                self.stats.group_count += 1;
                if classified.is_empty() {
                    self.stats.empty_group_count += 1;
                }
            }
            blocks.extend(classified);
        }
        Ok(blocks)
    }

    fn render_block(&mut self, output: &mut MarkdownBuilder, block: &Block) {
        match block {
            Block::Text(text) => {
                match text.kind {
                    TextKind::Heading => {
                        output.heading(&text.text);
                    }
                    TextKind::BulletItem => {
                        output.unordered_list_item(&text.text);
                    }
                    TextKind::NumberedItem => {
                        output.ordered_list_item(&text.text);
                    }
                    TextKind::Plain => {
                        output.raw_text(&text.text);
                    }
                }
                if self.options.collect_stats {
                    match text.kind {
                        TextKind::Heading => self.stats.heading_count += 1,
                        TextKind::BulletItem | TextKind::NumberedItem => {
                            self.stats.list_item_count += 1
                        }
                        TextKind::Plain => self.stats.text_count += 1,
                    }
                }
            }
            Block::Paragraph(text) => {
                if self.options.collect_stats {
                    self.stats.text_count += 1;
                }
                output.paragraph(text);
            }
            Block::Image(image) => {
                if self.options.collect_stats {
                    self.stats.image_count += 1;
                }
                output.image(&image.src, "");
            }
            Block::Pdf(pdf) => {
                self.count_link();
                let url = self.options.file_url(&pdf.file_key);
                output.link(pdf.label(), &url, "");
            }
            Block::Link(link) => {
                self.count_link();
                output.inline_link(link.label(), &link.href);
            }
            Block::Weblink(weblink) => {
                self.count_link();
                output.link(&weblink.title, &weblink.url, &weblink.description);
            }
            Block::Youtube(video) => {
                self.count_link();
                output.link("", &video.src, "");
            }
        }
    }

    fn count_link(&mut self) {
        if self.options.collect_stats {
            self.stats.link_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(groups: &[ContentBlockGroup]) -> Result<String> {
        to_markdown(groups, &RenderOptions::default())
    }

    #[test]
    fn test_render_empty_input() {
        assert_eq!(render(&[]).unwrap(), "");
        assert_eq!(render(&[ContentBlockGroup::encoded("{}")]).unwrap(), "");
    }

    #[test]
    fn test_render_new_format_list() {
        let group = ContentBlockGroup::new(json!([
            {"type": "text", "isHeading": true, "content": "Intro"},
            {"type": "text", "text": "Read "},
            {"type": "link", "href": "http://x", "content": [{"text": "site"}]},
            {"type": "text", "text": " today."}
        ]));
        assert_eq!(
            render(&[group]).unwrap(),
            "### Intro\n\nRead [site](http://x) today."
        );
    }

    #[test]
    fn test_render_pdf() {
        let group = ContentBlockGroup::new(json!([
            {"type": "pdf", "pdfFileKey": "abc123", "originalFilename": "doc.pdf"}
        ]));
        let options = RenderOptions::new().with_file_base_url("https://files.test");
        assert_eq!(
            to_markdown(&[group], &options).unwrap(),
            "[doc.pdf](https://files.test/abc123)"
        );
    }

    #[test]
    fn test_render_legacy_blocks() {
        let groups = vec![
            ContentBlockGroup::new(json!({"isHeading": true, "content": "Recipe"})),
            ContentBlockGroup::new(json!({"isNumberedListItem": true, "content": "Step 1"})),
            ContentBlockGroup::new(json!({"imageSrc": {"filename": null}})),
            ContentBlockGroup::new(json!({"youtubeSrc": "https://youtu.be/x"})),
            ContentBlockGroup::new(json!({
                "type": "weblink",
                "title": "Docs",
                "url": "https://docs.rs",
                "description": "API docs"
            })),
            ContentBlockGroup::new(json!([{"text": "The end"}])),
        ];
        assert_eq!(
            render(&groups).unwrap(),
            "### Recipe\n\n1. Step 1\n[](https://youtu.be/x)\n[Docs](https://docs.rs) API docs\nThe end"
        );
    }

    #[test]
    fn test_unrecognized_type_aborts_render() {
        let groups = vec![
            ContentBlockGroup::new(json!({"text": "kept?"})),
            ContentBlockGroup::new(json!([{"type": "unknown_widget"}])),
        ];
        assert!(matches!(
            render(&groups),
            Err(crate::Error::UnrecognizedBlockType { .. })
        ));
    }

    #[test]
    fn test_render_with_stats() {
        let groups = vec![
            ContentBlockGroup::encoded("{}"),
            ContentBlockGroup::new(json!([
                {"type": "text", "isBulletListItem": true, "text": "milk"},
                {"type": "image", "imageSrc": "http://img/a.png"}
            ])),
            ContentBlockGroup::new(json!({"imageSrc": null})),
        ];
        let result = to_markdown_with_stats(&groups, &RenderOptions::default()).unwrap();
        assert_eq!(result.content, "- milk\n![](http://img/a.png)");
        assert_eq!(result.stats.group_count, 3);
        assert_eq!(result.stats.empty_group_count, 2);
        assert_eq!(result.stats.list_item_count, 1);
        assert_eq!(result.stats.image_count, 1);
        assert_eq!(result.stats.block_count(), 2);
    }
}
