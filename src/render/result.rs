//! Rendering result with statistics.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of rendering a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// Path of the written `main.typ`
    pub markup_path: PathBuf,

    /// The assembled markup
    pub markup: String,

    /// Render statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(markup_path: PathBuf, markup: String, stats: RenderStats) -> Self {
        Self {
            markup_path,
            markup,
            stats,
        }
    }

    /// Get the markup length in bytes.
    pub fn markup_len(&self) -> usize {
        self.markup.len()
    }
}

/// Counters collected while rendering one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Sections composed
    pub section_count: u32,

    /// Text items rendered
    pub text_count: u32,

    /// Images written to `images/`
    pub image_count: u32,

    /// Tables built (delimited and spreadsheet)
    pub table_count: u32,

    /// PDF attachments converted
    pub attachment_count: u32,

    /// SVG pages embedded from attachments
    pub attachment_page_count: u32,

    /// Code listings rendered
    pub code_count: u32,

    /// Rich-text items rendered
    pub rich_text_count: u32,

    /// Items dropped because a resource could not be allocated
    pub skipped_count: u32,

    /// Items with an unrecognised type
    pub unknown_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of items that produced markup.
    pub fn rendered_items(&self) -> u32 {
        self.text_count
            + self.image_count
            + self.table_count
            + self.attachment_count
            + self.code_count
            + self.rich_text_count
    }

    /// Merge statistics from another render.
    pub fn merge(&mut self, other: &RenderStats) {
        self.section_count += other.section_count;
        self.text_count += other.text_count;
        self.image_count += other.image_count;
        self.table_count += other.table_count;
        self.attachment_count += other.attachment_count;
        self.attachment_page_count += other.attachment_page_count;
        self.code_count += other.code_count;
        self.rich_text_count += other.rich_text_count;
        self.skipped_count += other.skipped_count;
        self.unknown_count += other.unknown_count;
    }
}
