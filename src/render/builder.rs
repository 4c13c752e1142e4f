//! Append-only Markdown builder.

/// Builds a Markdown document one fragment at a time.
///
/// Every operation appends a complete fragment and returns the builder so
/// calls can be chained. Arguments are written verbatim.
#[derive(Debug, Clone, Default)]
pub struct MarkdownBuilder {
    content: String,
}

impl MarkdownBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// `### text` followed by a blank line.
    pub fn heading(&mut self, text: &str) -> &mut Self {
        self.content.push_str("### ");
        self.content.push_str(text);
        self.content.push_str("\n\n");
        self
    }

    /// A line of text.
    pub fn paragraph(&mut self, text: &str) -> &mut Self {
        self.content.push_str(text);
        self.content.push('\n');
        self
    }

    /// Text with no trailing newline.
    pub fn raw_text(&mut self, text: &str) -> &mut Self {
        self.content.push_str(text);
        self
    }

    /// `[label](url)` with no trailing newline.
    pub fn inline_link(&mut self, label: &str, url: &str) -> &mut Self {
        self.push_link(label, url);
        self
    }

    /// A standalone link line, with the description after it when non-empty.
    pub fn link(&mut self, label: &str, url: &str, description: &str) -> &mut Self {
        self.push_link(label, url);
        if !description.is_empty() {
            self.content.push(' ');
            self.content.push_str(description);
        }
        self.content.push('\n');
        self
    }

    /// `![alt](url)` followed by a blank line.
    pub fn image(&mut self, url: &str, alt: &str) -> &mut Self {
        self.content.push('!');
        self.push_link(alt, url);
        self.content.push_str("\n\n");
        self
    }

    /// `1. text`. Items are never renumbered.
    pub fn ordered_list_item(&mut self, text: &str) -> &mut Self {
        self.content.push_str("1. ");
        self.content.push_str(text);
        self.content.push('\n');
        self
    }

    /// `- text`.
    pub fn unordered_list_item(&mut self, text: &str) -> &mut Self {
        self.content.push_str("- ");
        self.content.push_str(text);
        self.content.push('\n');
        self
    }

    /// A blank line.
    pub fn linebreak(&mut self) -> &mut Self {
        self.content.push('\n');
        self
    }

    /// The accumulated document with surrounding whitespace trimmed.
    ///
    /// Does not reset the builder.
    pub fn build(&self) -> String {
        self.content.trim().to_string()
    }

    fn push_link(&mut self, label: &str, url: &str) {
        self.content.push('[');
        self.content.push_str(label);
        self.content.push_str("](");
        self.content.push_str(url);
        self.content.push(')');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragments() {
        assert_eq!(MarkdownBuilder::new().heading("Intro").build(), "### Intro");
        assert_eq!(
            MarkdownBuilder::new().image("http://img", "").build(),
            "![](http://img)"
        );
        assert_eq!(
            MarkdownBuilder::new()
                .link("Rust", "https://rust-lang.org", "A language")
                .build(),
            "[Rust](https://rust-lang.org) A language"
        );
        assert_eq!(
            MarkdownBuilder::new().link("", "https://youtu.be/x", "").build(),
            "[](https://youtu.be/x)"
        );
    }

    #[test]
    fn test_chaining_layout() {
        let md = MarkdownBuilder::new()
            .heading("List")
            .unordered_list_item("milk")
            .ordered_list_item("one")
            .ordered_list_item("two")
            .linebreak()
            .paragraph("done")
            .build();
        assert_eq!(md, "### List\n\n- milk\n1. one\n1. two\n\ndone");
    }

    #[test]
    fn test_inline_runs_share_a_line() {
        let md = MarkdownBuilder::new()
            .raw_text("See ")
            .inline_link("site", "http://x")
            .raw_text(" for more")
            .build();
        assert_eq!(md, "See [site](http://x) for more");
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut builder = MarkdownBuilder::new();
        builder.paragraph("  padded  ");
        assert_eq!(builder.build(), "padded");
        assert_eq!(builder.build(), builder.build());
        assert_eq!(MarkdownBuilder::new().build(), "");
    }
}
