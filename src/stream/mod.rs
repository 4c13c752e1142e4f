//! Stream catalog: the record types the tap emits.
//!
//! Each stream pairs a row type (the shape the retrieval query returns) with
//! the record type written downstream, and declares its replication key.

mod records;

pub use records::{
    SpaceNodeRecord, SpaceNodeRow, SpaceRecord, SpaceRow, UserRecord, UserRow, TEXT_NODE_TYPE,
};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::render::RenderOptions;

/// A row returned by the retrieval query for one stream.
pub trait StreamRow: DeserializeOwned + Send {
    /// Record emitted for this row.
    type Record: Serialize + Send;

    /// Value of the stream's replication key.
    fn replication_value(&self) -> DateTime<Utc>;

    /// Convert the row into its emitted record.
    fn into_record(self, options: &RenderOptions) -> Result<Self::Record>;
}

/// The streams this tap can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StreamKind {
    /// `sane_users`
    Users,
    /// `sane_spaces`
    Spaces,
    /// `sane_space_nodes`
    SpaceNodes,
}

impl StreamKind {
    /// All streams in emission order.
    pub const ALL: [StreamKind; 3] = [
        StreamKind::Users,
        StreamKind::Spaces,
        StreamKind::SpaceNodes,
    ];

    /// Stream name as written in messages.
    pub fn name(&self) -> &'static str {
        match self {
            StreamKind::Users => "sane_users",
            StreamKind::Spaces => "sane_spaces",
            StreamKind::SpaceNodes => "sane_space_nodes",
        }
    }

    /// Field holding the replication key.
    pub fn replication_key(&self) -> &'static str {
        match self {
            StreamKind::Users => "created",
            StreamKind::Spaces | StreamKind::SpaceNodes => "updated",
        }
    }

    /// Primary key fields.
    pub fn key_properties(&self) -> &'static [&'static str] {
        &["id"]
    }

    /// JSON schema of the stream's records.
    pub fn schema(&self) -> Value {
        let string = json!({"type": ["string", "null"]});
        let datetime = json!({"type": ["string", "null"], "format": "date-time"});
        let boolean = json!({"type": ["boolean", "null"]});
        let strings = json!({"type": ["array", "null"], "items": {"type": "string"}});

        let properties = match self {
            StreamKind::Users => json!({
                "id": string,
                "username": string,
                "bio": string,
                "created": datetime,
                "deletion": boolean,
                "spaces": strings,
                "following": strings,
            }),
            StreamKind::Spaces => json!({
                "id": string,
                "title": string,
                "description": string,
                "created": datetime,
                "updated": datetime,
                "deletion": boolean,
                "nodes": strings,
                "owner": string,
                "followers": strings,
                "is_public": boolean,
                "categories": strings,
            }),
            StreamKind::SpaceNodes => json!({
                "id": string,
                "space_id": string,
                "user_id": string,
                "title": string,
                "deletion": boolean,
                "created": datetime,
                "updated": datetime,
                "child_blocks": string,
                "node_content": string,
                "node_type": string,
                "node_url": string,
                "categories": strings,
            }),
        };

        json!({"type": "object", "properties": properties})
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StreamKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StreamKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownStream(s.to_string()))
    }
}
