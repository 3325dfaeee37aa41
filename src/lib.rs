//! # istdoc
//!
//! Integrated Spacecraft Test Document assembly for Rust.
//!
//! This library reads per-section content records from a content store and
//! assembles them into a single Typst source (`main.typ`) with its images
//! and attachment pages laid out beside it, ready for the Typst compiler.
//!
//! ## Quick Start
//!
//! ```no_run
//! use istdoc::{compile, render_document, JsonStore, RenderOptions, ToolSpec};
//!
//! fn main() -> istdoc::Result<()> {
//!     let store = JsonStore::open("store");
//!
//!     // Assemble the markup and resources
//!     let options = RenderOptions::default();
//!     render_document(&store, "GSAT-30 Power", "out/gsat30", &options)?;
//!
//!     // Typeset
//!     let pdf = compile("out/gsat30", &ToolSpec::default_compiler())?;
//!     std::fs::write("gsat30.pdf", pdf)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typed content items**: text, images, tables, PDF attachments, code,
//!   spreadsheets and rich-text deltas
//! - **Fixed chapter plan**: Introduction, Checkout Details, Test Details and
//!   the lettered Annexure
//! - **Partial-failure tolerance**: a bad item is skipped, not fatal
//! - **Parallel processing**: Uses Rayon to render independent documents

pub mod compile;
pub mod error;
pub mod model;
pub mod render;
pub mod store;
pub mod tool;

// Re-export commonly used types
pub use compile::compile;
pub use error::{Error, Result};
pub use model::{
    Attributes, Content, ContentItem, ContentKind, Delta, DocumentDetails, RawContent,
    SubsystemDetails, Table, TableRow,
};
pub use render::{
    render_document, render_document_with_stats, render_many, render_signature_page,
    RenderOptions, RenderResult, RenderSession, RenderStats,
};
pub use store::{ContentStore, JsonStore, MemoryStore, SECTION_KEYS, SIGNED_PAGE_KEY};
pub use tool::ToolSpec;

use std::path::{Path, PathBuf};

/// Render a document and compile it, returning the PDF bytes.
///
/// The working directory is left in place for inspection.
pub fn render_and_compile(
    store: &dyn ContentStore,
    document: &str,
    root: impl AsRef<Path>,
    options: &RenderOptions,
    compiler: &ToolSpec,
) -> Result<Vec<u8>> {
    let root = root.as_ref();
    render_document(store, document, root, options)?;
    compile(root, compiler)
}

/// Default working directory for a document: `{base}/{document}`.
///
/// Names that would resolve outside `base` are rejected.
pub fn session_dir(base: impl AsRef<Path>, document: &str) -> Result<PathBuf> {
    store::validate_name(document)?;
    Ok(base.as_ref().join(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_dir() {
        assert_eq!(
            session_dir("/tmp/out", "GSAT").unwrap(),
            PathBuf::from("/tmp/out/GSAT")
        );
        assert!(matches!(
            session_dir("/tmp/out", "../GSAT"),
            Err(Error::InvalidName(_))
        ));
    }

    #[test]
    fn test_render_unknown_document() {
        let store = MemoryStore::new();
        let tmp = std::env::temp_dir().join("istdoc-unknown-document");
        let result = render_and_compile(
            &store,
            "nope",
            &tmp,
            &RenderOptions::default(),
            &ToolSpec::default_compiler(),
        );
        assert!(matches!(result, Err(Error::DocumentNotFound(_))));
    }
}
