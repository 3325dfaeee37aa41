//! Rich-text delta operations as produced by the editor.

use serde::{Deserialize, Deserializer, Serialize};

/// One rich-text insert operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    /// Inserted text. Embeds (images, formulas) carry no text and decode as empty.
    #[serde(default, deserialize_with = "insert_text")]
    pub insert: String,

    /// Formatting attributes, absent for plain text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl Delta {
    /// Create a plain insert.
    pub fn plain(insert: impl Into<String>) -> Self {
        Self {
            insert: insert.into(),
            attributes: None,
        }
    }

    /// Create an insert with attributes.
    pub fn styled(insert: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            insert: insert.into(),
            attributes: Some(attributes),
        }
    }

    /// A lone newline carrying attributes terminates a block.
    pub fn is_block_terminator(&self) -> bool {
        self.insert == "\n" && self.attributes.is_some()
    }
}

/// Formatting attributes of a delta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Strikethrough text
    #[serde(rename = "strike")]
    pub strikethrough: bool,

    /// Inline code
    #[serde(rename = "code")]
    pub inline_code: bool,

    /// Foreground color as sent by the editor
    pub color: Option<String>,

    /// Highlight color as sent by the editor
    pub background: Option<String>,

    /// Sub/superscript
    pub script: Script,

    /// List membership of the block
    pub list: ListKind,

    /// List nesting level
    pub indent: u32,

    /// Heading level (0 = none)
    pub header: u8,
}

/// Vertical script position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    /// Subscript
    Sub,
    /// Superscript
    Super,
    /// Normal baseline
    #[default]
    #[serde(other)]
    None,
}

/// List style of a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// Bulleted item
    Bullet,
    /// Numbered item
    Ordered,
    /// Not a list item
    #[default]
    #[serde(other)]
    None,
}

fn insert_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}
