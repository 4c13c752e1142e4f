//! Content model for node block data.
//!
//! Raw block groups arrive as loosely-shaped JSON produced by the database.
//! This module classifies them up front into the typed [`Block`] variants so
//! that rendering never has to probe fields.

mod block;
mod group;

pub use block::{
    Block, ImageBlock, LinkBlock, PdfBlock, TextBlock, TextKind, WeblinkBlock, YoutubeBlock,
};
pub use group::{
    deserialize_groups, groups_from_value, BlockData, ContentBlockGroup, GroupShape,
    EMPTY_OBJECT_MARKER,
};
