//! Content Store: where section content and document details come from.
//!
//! The renderer only reads through [`ContentStore`]. Two implementations
//! are provided: [`MemoryStore`] for embedding and tests, and
//! [`JsonStore`] which keeps one JSON file per record on disk.

mod json;
mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::error::{Error, Result};
use crate::model::{Content, DocumentDetails, SubsystemDetails};

/// Every section slot created for a new document, in chapter order.
pub const SECTION_KEYS: [&str; 16] = [
    "Introduction-Acronyms",
    "Introduction-SSIntroduction",
    "Introduction-SSSpecification",
    "Introduction-Telecommand",
    "Introduction-Telemetry",
    "Introduction-Pages",
    "Checkout-Interface",
    "Checkout-SpecificRequirements",
    "Checkout-SafetyRequirements",
    "Checkout-TestPhilosophy",
    "Checkout-SubsystemClarifications",
    "TestMatrix",
    "TestPlans",
    "TestProcedures",
    "Annexure-EID",
    "Annexure-TestResultsFormat",
];

/// Section holding the scanned, signed approval page. Not created with
/// the document; present only once a scan has been stored.
pub const SIGNED_PAGE_KEY: &str = "Information-SignedPage";

/// Read access to stored documents.
pub trait ContentStore {
    /// Content of one section.
    fn content(&self, document: &str, section: &str) -> Result<Content>;

    /// Document and subsystem details.
    fn details(&self, document: &str) -> Result<(DocumentDetails, SubsystemDetails)>;
}

impl<S: ContentStore + ?Sized> ContentStore for &S {
    fn content(&self, document: &str, section: &str) -> Result<Content> {
        (**self).content(document, section)
    }

    fn details(&self, document: &str) -> Result<(DocumentDetails, SubsystemDetails)> {
        (**self).details(document)
    }
}

/// Check that a document or section name is a single plain path component.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}
