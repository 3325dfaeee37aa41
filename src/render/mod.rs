//! Rendering engine: turns stored document content into Typst markup.

pub mod delta;
mod document;
mod front_matter;
mod item;
pub mod markup;
mod options;
mod result;
pub mod section;
mod session;
pub mod table;

pub use delta::{deltas_to_markup, render_rich_text, DeltaInterpreter};
pub use document::{
    render_document, render_document_in, render_document_with_stats, render_many,
    render_signature_page,
};
pub use front_matter::{front_matter, signature_page, title_variables};
pub use item::{render_content, render_item};
pub use options::{RenderOptions, DEFAULT_MARKDOWN_PACKAGE, DEFAULT_MAX_ATTACHMENT_PAGES};
pub use result::{RenderResult, RenderStats};
pub use section::{ChapterPolicy, ChapterSpec, HeadingMode, SectionSpec, CHAPTERS};
pub use session::{PageConverter, RenderSession, MARKUP_FILE};
pub use table::{build_from_delimited, build_from_spreadsheet};
