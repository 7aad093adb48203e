//! The block model.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The type of a single block.
///
/// Only the kinds the parser can produce are modelled. Anything else the
/// remote store returns is kept as `Unsupported` with its wire type name so
/// it can still be located and archived.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    NumberedListItem,
    BulletedListItem,
    /// A remote block type with no local model (to-do, image, divider, ...).
    Unsupported(String),
}

impl BlockKind {
    /// Heading kind for a level in `1..=3`.
    pub fn heading(level: usize) -> Option<Self> {
        match level {
            1 => Some(BlockKind::Heading1),
            2 => Some(BlockKind::Heading2),
            3 => Some(BlockKind::Heading3),
            _ => None,
        }
    }

    /// Whether this kind bounds a section.
    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            BlockKind::Heading1 | BlockKind::Heading2 | BlockKind::Heading3
        )
    }

    /// Wire name of the kind, e.g. `heading_2` or `bulleted_list_item`.
    pub fn type_name(&self) -> &str {
        match self {
            BlockKind::Heading1 => "heading_1",
            BlockKind::Heading2 => "heading_2",
            BlockKind::Heading3 => "heading_3",
            BlockKind::Paragraph => "paragraph",
            BlockKind::NumberedListItem => "numbered_list_item",
            BlockKind::BulletedListItem => "bulleted_list_item",
            BlockKind::Unsupported(name) => name,
        }
    }

    /// Inverse of `type_name`. Never fails: unknown names become `Unsupported`.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "heading_1" => BlockKind::Heading1,
            "heading_2" => BlockKind::Heading2,
            "heading_3" => BlockKind::Heading3,
            "paragraph" => BlockKind::Paragraph,
            "numbered_list_item" => BlockKind::NumberedListItem,
            "bulleted_list_item" => BlockKind::BulletedListItem,
            other => BlockKind::Unsupported(other.to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, BlockKind::Unsupported(_))
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl Serialize for BlockKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.type_name())
    }
}

impl<'de> Deserialize<'de> for BlockKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(BlockKind::from_type_name(&name))
    }
}

/// One flat content unit of a document.
///
/// Blocks parsed from caller text have no `remote_id`; blocks fetched from
/// the store always do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}

impl Block {
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            remote_id: None,
        }
    }

    pub fn heading1(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Heading1, text)
    }

    pub fn heading2(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Heading2, text)
    }

    pub fn heading3(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Heading3, text)
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, text)
    }

    pub fn numbered(text: impl Into<String>) -> Self {
        Self::new(BlockKind::NumberedListItem, text)
    }

    pub fn bulleted(text: impl Into<String>) -> Self {
        Self::new(BlockKind::BulletedListItem, text)
    }

    /// Attach the id the remote store knows this block by.
    pub fn with_remote_id(mut self, id: impl Into<String>) -> Self {
        self.remote_id = Some(id.into());
        self
    }

    pub fn is_heading(&self) -> bool {
        self.kind.is_heading()
    }

    /// A copy of this block without its remote id, ready to be appended.
    pub fn detached(&self) -> Self {
        Self::new(self.kind.clone(), self.text.clone())
    }
}
