//! Data model for stored document content.
//!
//! These types describe what the content store hands to the renderer:
//! per-section content items, rich-text deltas, tables and the
//! document/subsystem metadata used by the front matter.

mod content;
mod delta;
mod details;
mod table;

pub use content::{Content, ContentItem, ContentKind, RawContent};
pub use delta::{Attributes, Delta, ListKind, Script};
pub use details::{DocumentDetails, SubsystemDetails};
pub use table::{Table, TableRow};
