//! Row and record types for each stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StreamRow;
use crate::error::Result;
use crate::model::{deserialize_groups, ContentBlockGroup};
use crate::render::{to_markdown, RenderOptions};

/// Node type whose child blocks are rendered.
pub const TEXT_NODE_TYPE: &str = "Text";

/// A user as returned by the users query.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRow {
    /// User id
    #[serde(alias = "id")]
    pub user_id: String,
    /// Login name
    pub username: Option<String>,
    /// Profile text
    #[serde(default)]
    pub bio: Option<String>,
    /// Account creation time, the replication key
    pub created: DateTime<Utc>,
    /// Account is marked deleted
    #[serde(default)]
    pub deletion: bool,
    /// Ids of spaces the user owns
    #[serde(default)]
    pub space_list: Vec<String>,
    /// Ids of users this user follows
    #[serde(default)]
    pub following_list: Vec<String>,
}

/// A `sane_users` record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    /// User id
    pub id: String,
    /// Login name
    pub username: Option<String>,
    /// Profile text
    pub bio: Option<String>,
    /// Account creation time
    pub created: DateTime<Utc>,
    /// Account is marked deleted
    pub deletion: bool,
    /// Owned space ids
    pub spaces: Vec<String>,
    /// Followed user ids
    pub following: Vec<String>,
}

impl StreamRow for UserRow {
    type Record = UserRecord;

    fn replication_value(&self) -> DateTime<Utc> {
        self.created
    }

    fn into_record(self, _options: &RenderOptions) -> Result<UserRecord> {
        Ok(UserRecord {
            id: self.user_id,
            username: self.username,
            bio: self.bio,
            created: self.created,
            deletion: self.deletion,
            spaces: self.space_list,
            following: self.following_list,
        })
    }
}

/// A space as returned by the spaces query.
#[derive(Debug, Clone, Deserialize)]
pub struct SpaceRow {
    /// Space id
    #[serde(alias = "id")]
    pub space_id: String,
    /// Space title
    pub title: Option<String>,
    /// Space description
    #[serde(default)]
    pub description: Option<String>,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Last update, the replication key
    pub updated: DateTime<Utc>,
    /// Space is marked deleted
    #[serde(default)]
    pub deleted: bool,
    /// Visible to everyone
    #[serde(default)]
    pub is_public: bool,
    /// Id of the owning user
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Ids of nodes in the space
    #[serde(default)]
    pub nodes_list: Vec<String>,
    /// Ids of following users
    #[serde(default)]
    pub followers_list: Vec<String>,
    /// Category names
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A `sane_spaces` record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceRecord {
    /// Space id
    pub id: String,
    /// Space title
    pub title: Option<String>,
    /// Space description
    pub description: Option<String>,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Last update
    pub updated: DateTime<Utc>,
    /// Visible to everyone
    pub is_public: bool,
    /// Space is marked deleted
    pub deletion: bool,
    /// Owning user id
    pub owner: Option<String>,
    /// Node ids
    pub nodes: Vec<String>,
    /// Follower ids
    pub followers: Vec<String>,
    /// Category names
    pub categories: Vec<String>,
}

impl StreamRow for SpaceRow {
    type Record = SpaceRecord;

    fn replication_value(&self) -> DateTime<Utc> {
        self.updated
    }

    fn into_record(self, _options: &RenderOptions) -> Result<SpaceRecord> {
        Ok(SpaceRecord {
            id: self.space_id,
            title: self.title,
            description: self.description,
            created: self.created,
            updated: self.updated,
            is_public: self.is_public,
            deletion: self.deleted,
            owner: self.owner_id,
            nodes: self.nodes_list,
            followers: self.followers_list,
            categories: self.categories,
        })
    }
}

/// A content node as returned by the nodes query.
#[derive(Debug, Clone, Deserialize)]
pub struct SpaceNodeRow {
    /// Node id
    #[serde(alias = "id")]
    pub node_id: String,
    /// Id of the containing space
    #[serde(default)]
    pub space_id: Option<String>,
    /// Id of the space owner
    #[serde(default)]
    pub user_id: Option<String>,
    /// Node title
    pub title: Option<String>,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Last update, the replication key
    pub updated: DateTime<Utc>,
    /// Node is marked deleted
    #[serde(default)]
    pub deleted: bool,
    /// Free-form content (URL for media nodes)
    #[serde(default)]
    pub node_content: Option<String>,
    /// Node kind, e.g. `Text` or `Video`
    #[serde(default)]
    pub node_type: Option<String>,
    /// External URL
    #[serde(default)]
    pub node_url: Option<String>,
    /// Block groups in display order
    #[serde(default, deserialize_with = "deserialize_groups")]
    pub child_blocks: Vec<ContentBlockGroup>,
    /// Category names
    #[serde(default)]
    pub categories: Vec<String>,
}

impl SpaceNodeRow {
    /// Whether the node's child blocks are rendered.
    pub fn is_text(&self) -> bool {
        self.node_type.as_deref() == Some(TEXT_NODE_TYPE)
    }
}

/// A `sane_space_nodes` record, with child blocks flattened to Markdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceNodeRecord {
    /// Node id
    pub id: String,
    /// Containing space id
    pub space_id: Option<String>,
    /// Space owner id
    pub user_id: Option<String>,
    /// Node title
    pub title: Option<String>,
    /// Node is marked deleted
    pub deletion: bool,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Last update
    pub updated: DateTime<Utc>,
    /// Rendered Markdown, empty unless the node is `Text`
    pub child_blocks: String,
    /// Free-form content, empty when absent
    pub node_content: String,
    /// Node kind
    pub node_type: Option<String>,
    /// External URL, empty when absent
    pub node_url: String,
    /// Category names
    pub categories: Vec<String>,
}

impl StreamRow for SpaceNodeRow {
    type Record = SpaceNodeRecord;

    fn replication_value(&self) -> DateTime<Utc> {
        self.updated
    }

    fn into_record(self, options: &RenderOptions) -> Result<SpaceNodeRecord> {
        let child_blocks = if self.is_text() {
            to_markdown(&self.child_blocks, options)?
        } else {
            String::new()
        };

        Ok(SpaceNodeRecord {
            id: self.node_id,
            space_id: self.space_id,
            user_id: self.user_id,
            title: self.title,
            deletion: self.deleted,
            created: self.created,
            updated: self.updated,
            child_blocks,
            node_content: self.node_content.unwrap_or_default(),
            node_type: self.node_type,
            node_url: self.node_url.unwrap_or_default(),
            categories: self.categories,
        })
    }
}
