//! Section content: the ordered items rendered into one section.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Declared type of a content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentKind {
    /// Plain text passed through the markdown renderer
    Text,
    /// Base64 image payload
    Image,
    /// Comma-delimited table text
    Table,
    /// Base64 PDF attachment embedded page by page
    File,
    /// Source listing
    Code,
    /// Base64 spreadsheet workbook
    Excel,
    /// Base64 JSON array of rich-text deltas
    RichText,
    /// Anything else; rendered as a marker
    Unknown(String),
}

impl ContentKind {
    /// Parse a declared type, ignoring case.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "text" => ContentKind::Text,
            "image" => ContentKind::Image,
            "table" => ContentKind::Table,
            "file" => ContentKind::File,
            "code" => ContentKind::Code,
            "excel" => ContentKind::Excel,
            "richtext" => ContentKind::RichText,
            _ => ContentKind::Unknown(s.to_string()),
        }
    }

    /// Wire name of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
            ContentKind::Table => "table",
            ContentKind::File => "file",
            ContentKind::Code => "code",
            ContentKind::Excel => "excel",
            ContentKind::RichText => "richtext",
            ContentKind::Unknown(s) => s,
        }
    }
}

impl From<String> for ContentKind {
    fn from(s: String) -> Self {
        ContentKind::parse(&s)
    }
}

impl From<ContentKind> for String {
    fn from(kind: ContentKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One renderable unit within a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Declared type
    pub kind: ContentKind,

    /// Payload (text, CSV, or base64 depending on kind)
    pub value: String,

    /// Original file name (used as the heading of code listings)
    pub file_name: String,

    /// Figure/table caption
    pub caption: String,

    /// Render on a flipped (landscape) page
    pub landscape: bool,
}

impl ContentItem {
    /// Create a portrait item with no file name or caption.
    pub fn new(kind: ContentKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            file_name: String::new(),
            caption: String::new(),
            landscape: false,
        }
    }

    /// Create a plain text item.
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(ContentKind::Text, value)
    }

    /// Set the caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Set the file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Set the landscape flag.
    pub fn landscape(mut self, landscape: bool) -> Self {
        self.landscape = landscape;
        self
    }
}

/// A section's renderable payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawContent", into = "RawContent")]
pub struct Content {
    /// Items in render order
    pub items: Vec<ContentItem>,
}

impl Content {
    /// Create empty content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create content from items.
    pub fn from_items(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Persisted shape of a content record: index-aligned sequences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawContent {
    /// Declared item count
    pub no_of_items: usize,
    /// Item types
    #[serde(default)]
    pub content_type: Vec<String>,
    /// Item file names
    #[serde(default)]
    pub file_name: Vec<String>,
    /// Item payloads
    #[serde(default)]
    pub value: Vec<String>,
    /// Item captions
    #[serde(default)]
    pub captions: Vec<String>,
    /// Item orientation; may be empty for records written before it existed
    #[serde(default)]
    pub landscape: Vec<bool>,
}

impl TryFrom<RawContent> for Content {
    type Error = Error;

    fn try_from(raw: RawContent) -> Result<Self> {
        let expected = raw.no_of_items;
        let check = |field: &'static str, found: usize| {
            if found == expected {
                Ok(())
            } else {
                Err(Error::MalformedContent {
                    expected,
                    field,
                    found,
                })
            }
        };
        check("ContentType", raw.content_type.len())?;
        check("FileName", raw.file_name.len())?;
        check("Value", raw.value.len())?;
        check("Captions", raw.captions.len())?;
        if !raw.landscape.is_empty() {
            check("Landscape", raw.landscape.len())?;
        }

        let mut landscape = raw.landscape.into_iter();
        let items = raw
            .content_type
            .into_iter()
            .zip(raw.file_name)
            .zip(raw.value)
            .zip(raw.captions)
            .map(|(((kind, file_name), value), caption)| ContentItem {
                kind: ContentKind::parse(&kind),
                value,
                file_name,
                caption,
                landscape: landscape.next().unwrap_or(false),
            })
            .collect();

        Ok(Content { items })
    }
}

impl From<Content> for RawContent {
    fn from(content: Content) -> Self {
        let mut raw = RawContent {
            no_of_items: content.items.len(),
            ..Default::default()
        };
        for item in content.items {
            raw.content_type.push(item.kind.into());
            raw.file_name.push(item.file_name);
            raw.value.push(item.value);
            raw.captions.push(item.caption);
            raw.landscape.push(item.landscape);
        }
        raw
    }
}
