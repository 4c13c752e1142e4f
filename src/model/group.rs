//! Block groups as retrieved per content node.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::Block;
use crate::error::{Error, Result};

/// Raw `block_data` that marks a group with no content.
pub const EMPTY_OBJECT_MARKER: &str = "{}";

/// The `block_data` of a group, as the database hands it over.
///
/// The database's `json` type usually arrives serialized as text; some
/// producers inline the decoded value instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockData {
    /// JSON encoded as a string
    Encoded(String),
    /// Already-decoded JSON
    Decoded(Value),
}

impl Default for BlockData {
    fn default() -> Self {
        BlockData::Decoded(Value::Null)
    }
}

/// One group of blocks attached to a content node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentBlockGroup {
    /// Block type recorded on the group (informational only)
    #[serde(default)]
    pub block_type: Option<String>,

    /// Block payload
    #[serde(default)]
    pub block_data: BlockData,
}

/// The structural shape of a group's data.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupShape {
    /// Contributes nothing
    Empty,
    /// Current schema: ordered list of typed blocks
    NewFormat(Vec<Value>),
    /// Oldest schema: one mapping describing one block
    Legacy(Value),
}

impl ContentBlockGroup {
    /// Create a group from decoded JSON.
    pub fn new(block_data: Value) -> Self {
        Self {
            block_type: None,
            block_data: BlockData::Decoded(block_data),
        }
    }

    /// Create a group from string-encoded JSON.
    pub fn encoded(block_data: impl Into<String>) -> Self {
        Self {
            block_type: None,
            block_data: BlockData::Encoded(block_data.into()),
        }
    }

    /// Whether the raw data is the literal empty-object marker.
    pub fn is_empty_marker(&self) -> bool {
        matches!(&self.block_data, BlockData::Encoded(s) if s == EMPTY_OBJECT_MARKER)
    }

    /// Decode and classify the group's data by shape.
    pub fn shape(&self) -> Result<GroupShape> {
        let value = match &self.block_data {
            BlockData::Encoded(s) if s == EMPTY_OBJECT_MARKER => return Ok(GroupShape::Empty),
            BlockData::Encoded(s) => serde_json::from_str(s).map_err(|e| {
                log::debug!("block_data is not valid JSON: {}", e);
                Error::malformed("block_data", &Value::String(s.clone()))
            })?,
            BlockData::Decoded(v) => v.clone(),
        };

        match value {
            Value::Null => Ok(GroupShape::Empty),
            Value::Object(map) if map.is_empty() => Ok(GroupShape::Empty),
            Value::Object(map) => Ok(GroupShape::Legacy(Value::Object(map))),
            Value::Array(entries) if entries.is_empty() => Ok(GroupShape::Empty),
            Value::Array(mut entries) => {
                if let Some(bad) = entries.iter().find(|entry| !entry.is_object()) {
                    return Err(Error::malformed("block_data", bad));
                }
                if entries.len() == 1 && is_wrapped_legacy(&entries[0]) {
                    Ok(GroupShape::Legacy(entries.remove(0)))
                } else {
                    Ok(GroupShape::NewFormat(entries))
                }
            }
            other => Err(Error::malformed("block_data", &other)),
        }
    }

    /// Classify the group into typed blocks, in order.
    pub fn blocks(&self) -> Result<Vec<Block>> {
        let blocks = match self.shape()? {
            GroupShape::Empty => Vec::new(),
            GroupShape::NewFormat(entries) => {
                let mut blocks = Vec::with_capacity(entries.len());
                for entry in &entries {
                    blocks.extend(Block::from_new_format(entry)?);
                }
                blocks
            }
            GroupShape::Legacy(value) => Block::from_legacy(&value)?.into_iter().collect(),
        };
        Ok(blocks)
    }
}

/// A lone list entry with neither a new-format type tag nor an image source
/// is an old single block wrapped in a list.
fn is_wrapped_legacy(entry: &Value) -> bool {
    if entry.get("imageSrc").is_some() {
        return false;
    }
    match entry.get("type") {
        None | Some(Value::Null) => true,
        Some(Value::String(tag)) => tag == "weblink",
        Some(_) => false,
    }
}

/// Build groups from a JSON value: `null` means no groups and `null` entries
/// are dropped.
pub fn groups_from_value(value: Value) -> Result<Vec<ContentBlockGroup>> {
    let groups: Option<Vec<Option<ContentBlockGroup>>> = serde_json::from_value(value)?;
    Ok(groups.unwrap_or_default().into_iter().flatten().collect())
}

/// Serde adapter with the same semantics as [`groups_from_value`].
pub fn deserialize_groups<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<ContentBlockGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    let groups: Option<Vec<Option<ContentBlockGroup>>> = Option::deserialize(deserializer)?;
    Ok(groups.unwrap_or_default().into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TextBlock, TextKind};
    use serde_json::json;

    #[test]
    fn test_empty_shapes() {
        assert!(ContentBlockGroup::encoded("{}").is_empty_marker());
        assert_eq!(
            ContentBlockGroup::encoded("{}").shape().unwrap(),
            GroupShape::Empty
        );
        assert_eq!(
            ContentBlockGroup::encoded("[]").shape().unwrap(),
            GroupShape::Empty
        );
        assert_eq!(
            ContentBlockGroup::new(json!({})).shape().unwrap(),
            GroupShape::Empty
        );
        assert_eq!(
            ContentBlockGroup::new(Value::Null).shape().unwrap(),
            GroupShape::Empty
        );
        assert!(!ContentBlockGroup::new(json!({})).is_empty_marker());
    }

    #[test]
    fn test_new_format_shape() {
        let group = ContentBlockGroup::new(json!([{"type": "text", "text": "a"}]));
        assert!(matches!(group.shape().unwrap(), GroupShape::NewFormat(ref v) if v.len() == 1));
    }

    #[test]
    fn test_wrapped_legacy_shape() {
        let group = ContentBlockGroup::new(json!([{"isHeading": true, "content": "Title"}]));
        assert!(matches!(group.shape().unwrap(), GroupShape::Legacy(_)));

        let group = ContentBlockGroup::new(json!([{
            "type": "weblink",
            "title": "t",
            "url": "u"
        }]));
        assert!(matches!(group.shape().unwrap(), GroupShape::Legacy(_)));
    }

    #[test]
    fn test_encoded_data_is_decoded() {
        let group = ContentBlockGroup::encoded(r#"{"isBulletListItem": true, "content": "eggs"}"#);
        assert_eq!(
            group.blocks().unwrap(),
            vec![Block::Text(TextBlock::new(TextKind::BulletItem, "eggs"))]
        );
    }

    #[test]
    fn test_malformed_shapes() {
        assert!(ContentBlockGroup::new(json!(7)).shape().is_err());
        assert!(ContentBlockGroup::new(json!(["text"])).shape().is_err());
        assert!(matches!(
            ContentBlockGroup::encoded("not json").shape(),
            Err(Error::MalformedBlock {
                field: "block_data",
                ..
            })
        ));
    }

    #[test]
    fn test_groups_from_value_drops_nulls() {
        let groups = groups_from_value(json!([null, {"block_data": "{}"}])).unwrap();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_empty_marker());

        assert!(groups_from_value(Value::Null).unwrap().is_empty());
    }
}
