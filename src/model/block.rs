//! Typed content blocks and their classification from raw JSON.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// How a text block is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// Level-three heading
    Heading,
    /// Unordered list item
    BulletItem,
    /// Ordered list item
    NumberedItem,
    /// Inline text run, composes with following inline links
    Plain,
}

/// A text block with its presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    /// Presentation kind
    pub kind: TextKind,
    /// Text content
    pub text: String,
}

impl TextBlock {
    /// Create a new text block.
    pub fn new(kind: TextKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// An image referenced by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlock {
    /// Image URL
    pub src: String,
}

/// An uploaded PDF referenced by its storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfBlock {
    /// Key of the file in upload storage
    pub file_key: String,
    /// Name of the file as uploaded
    pub original_filename: Option<String>,
}

impl PdfBlock {
    /// Display label: the uploaded filename, else the storage key.
    pub fn label(&self) -> &str {
        self.original_filename.as_deref().unwrap_or(&self.file_key)
    }
}

/// An inline hyperlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBlock {
    /// Link target
    pub href: String,
    /// Link text, if the block carried any
    pub label: Option<String>,
}

impl LinkBlock {
    /// Display label: the link text, else the target itself.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.href)
    }
}

/// A legacy web link card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeblinkBlock {
    /// Link target
    pub url: String,
    /// Card title
    pub title: String,
    /// Card description (may be empty)
    pub description: String,
}

/// A legacy embedded YouTube video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YoutubeBlock {
    /// Video URL
    pub src: String,
}

/// A content block, classified from its raw shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Heading, list item or inline text
    Text(TextBlock),
    /// Image
    Image(ImageBlock),
    /// Uploaded PDF
    Pdf(PdfBlock),
    /// Inline link
    Link(LinkBlock),
    /// Legacy web link card
    Weblink(WeblinkBlock),
    /// Legacy YouTube embed
    Youtube(YoutubeBlock),
    /// Legacy free-form paragraph
    Paragraph(String),
}

impl Block {
    /// Classify one entry of a new-format block list.
    ///
    /// Returns `Ok(None)` when the block resolves to nothing (an image whose
    /// source is null).
    pub fn from_new_format(raw: &Value) -> Result<Option<Block>> {
        let block = RawBlock::parse(raw)?;

        // `imageSrc` wins over whatever the type tag says.
        if let Some(ref src) = block.image_src {
            return image_from(src, raw);
        }

        let tag = match &block.block_type {
            None | Some(Value::Null) => return Err(Error::unrecognized("<missing>", raw)),
            Some(Value::String(tag)) => tag.as_str(),
            Some(other) => return Err(Error::unrecognized(other.to_string(), raw)),
        };

        match tag {
            "text" => {
                let (kind, text) = if block.is_heading {
                    (TextKind::Heading, block.content_first())
                } else if block.is_bullet_list_item {
                    (TextKind::BulletItem, block.text_first())
                } else if block.is_numbered_list_item {
                    (TextKind::NumberedItem, block.text_first())
                } else {
                    (TextKind::Plain, block.text_first())
                };
                let field = if kind == TextKind::Heading {
                    "content"
                } else {
                    "text"
                };
                let text = text.ok_or_else(|| Error::malformed(field, raw))?;
                Ok(Some(Block::Text(TextBlock::new(kind, text))))
            }
            "pdf" => block.pdf(raw).map(Some),
            "image" => Err(Error::malformed("imageSrc", raw)),
            "link" => {
                let href = required_str(&block.href, "href", raw)?;
                Ok(Some(Block::Link(LinkBlock {
                    href,
                    label: block.link_label(),
                })))
            }
            other => Err(Error::unrecognized(other, raw)),
        }
    }

    /// Classify a legacy single-mapping block.
    ///
    /// Discriminators are checked in a fixed order and the first match wins.
    /// Returns `Ok(None)` for blocks that contribute nothing.
    pub fn from_legacy(raw: &Value) -> Result<Option<Block>> {
        if raw.as_object().is_some_and(|map| map.is_empty()) {
            return Ok(None);
        }

        let block = RawBlock::parse(raw)?;

        let list_kind = if block.is_bullet_list_item {
            Some(TextKind::BulletItem)
        } else if block.is_numbered_list_item {
            Some(TextKind::NumberedItem)
        } else if block.is_heading {
            Some(TextKind::Heading)
        } else {
            None
        };
        if let Some(kind) = list_kind {
            let text = block
                .content_first()
                .ok_or_else(|| Error::malformed("content", raw))?;
            return Ok(Some(Block::Text(TextBlock::new(kind, text))));
        }

        if let Some(ref src) = block.image_src {
            return image_from(src, raw);
        }

        if is_truthy(&block.youtube_src) {
            let src = block
                .youtube_src
                .as_ref()
                .and_then(Value::as_str)
                .ok_or_else(|| Error::malformed("youtubeSrc", raw))?;
            return Ok(Some(Block::Youtube(YoutubeBlock {
                src: src.to_string(),
            })));
        }

        if str_field(&block.block_type) == Some("weblink") {
            let title = required_str(&block.title, "title", raw)?;
            let url = required_str(&block.url, "url", raw)?;
            let description = optional_str(&block.description, "description", raw)?;
            return Ok(Some(Block::Weblink(WeblinkBlock {
                url,
                title,
                description: description.unwrap_or_default(),
            })));
        }

        if is_truthy(&block.pdf_file_key) {
            return block.pdf(raw).map(Some);
        }

        let text = str_field(&block.text).ok_or_else(|| Error::malformed("text", raw))?;
        Ok(Some(Block::Paragraph(text.to_string())))
    }
}

/// Every field any block shape may carry. Fields absent from the JSON stay
/// at their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawBlock {
    #[serde(rename = "type")]
    block_type: Option<Value>,
    content: Option<Value>,
    text: Option<Value>,
    #[serde(deserialize_with = "truthy")]
    is_heading: bool,
    #[serde(deserialize_with = "truthy")]
    is_bullet_list_item: bool,
    #[serde(deserialize_with = "truthy")]
    is_numbered_list_item: bool,
    /// Present (even as null) means the block is an image.
    #[serde(deserialize_with = "present")]
    image_src: Option<Value>,
    youtube_src: Option<Value>,
    pdf_file_key: Option<Value>,
    original_filename: Option<Value>,
    href: Option<Value>,
    url: Option<Value>,
    title: Option<Value>,
    description: Option<Value>,
}

impl RawBlock {
    fn parse(raw: &Value) -> Result<Self> {
        if !raw.is_object() {
            return Err(Error::malformed("block", raw));
        }
        RawBlock::deserialize(raw).map_err(|e| {
            log::debug!("block failed to deserialize: {}", e);
            Error::malformed("block", raw)
        })
    }

    fn content_first(&self) -> Option<String> {
        str_field(&self.content)
            .or_else(|| str_field(&self.text))
            .map(str::to_string)
    }

    fn text_first(&self) -> Option<String> {
        str_field(&self.text)
            .or_else(|| str_field(&self.content))
            .map(str::to_string)
    }

    fn link_label(&self) -> Option<String> {
        self.content
            .as_ref()
            .and_then(Value::as_array)
            .and_then(|runs| runs.first())
            .and_then(|first| first.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn pdf(&self, raw: &Value) -> Result<Block> {
        Ok(Block::Pdf(PdfBlock {
            file_key: required_str(&self.pdf_file_key, "pdfFileKey", raw)?,
            original_filename: optional_str(&self.original_filename, "originalFilename", raw)?,
        }))
    }
}

/// Resolve an `imageSrc` value: a URL string, or a mapping whose `filename`
/// holds the URL. A null URL resolves to no block.
fn image_from(src: &Value, raw: &Value) -> Result<Option<Block>> {
    let url = match src {
        Value::String(url) => Some(url.as_str()),
        Value::Object(map) => match map.get("filename") {
            None | Some(Value::Null) => None,
            Some(Value::String(url)) => Some(url.as_str()),
            Some(_) => return Err(Error::malformed("imageSrc", raw)),
        },
        Value::Null => None,
        _ => return Err(Error::malformed("imageSrc", raw)),
    };

    Ok(url.map(|src| {
        Block::Image(ImageBlock {
            src: src.to_string(),
        })
    }))
}

fn str_field(value: &Option<Value>) -> Option<&str> {
    value.as_ref().and_then(Value::as_str)
}

fn required_str(value: &Option<Value>, field: &'static str, raw: &Value) -> Result<String> {
    str_field(value)
        .map(str::to_string)
        .ok_or_else(|| Error::malformed(field, raw))
}

/// Absent or null reads as `None`; any other non-string is malformed.
fn optional_str(
    value: &Option<Value>,
    field: &'static str,
    raw: &Value,
) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::malformed(field, raw)),
    }
}

/// JSON truthiness: null, false, zero and empty containers are false.
pub(crate) fn is_truthy(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

fn truthy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|v| is_truthy(&Some(v)))
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
