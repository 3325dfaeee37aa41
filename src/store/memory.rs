//! In-memory content store.

use std::collections::{BTreeMap, HashMap};

use log::debug;

use super::{ContentStore, SECTION_KEYS};
use crate::error::{Error, Result};
use crate::model::{Content, DocumentDetails, SubsystemDetails};

#[derive(Debug, Clone, Default)]
struct StoredDocument {
    details: DocumentDetails,
    subsystem: SubsystemDetails,
    sections: HashMap<String, Content>,
}

/// Content store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: BTreeMap<String, StoredDocument>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document with default details and empty content for every
    /// catalogued section.
    pub fn add_document(&mut self, name: &str) -> Result<()> {
        if self.documents.contains_key(name) {
            return Err(Error::DuplicateDocument(name.to_string()));
        }
        let sections = SECTION_KEYS
            .iter()
            .map(|key| (key.to_string(), Content::new()))
            .collect();
        self.documents.insert(
            name.to_string(),
            StoredDocument {
                sections,
                ..Default::default()
            },
        );
        debug!("created document {}", name);
        Ok(())
    }

    /// Replace the document and subsystem details.
    pub fn set_details(
        &mut self,
        name: &str,
        details: DocumentDetails,
        subsystem: SubsystemDetails,
    ) -> Result<()> {
        let doc = self.document_mut(name)?;
        doc.details = details;
        doc.subsystem = subsystem;
        Ok(())
    }

    /// Replace the content of one section wholesale.
    pub fn set_content(&mut self, name: &str, section: &str, content: Content) -> Result<()> {
        self.document_mut(name)?
            .sections
            .insert(section.to_string(), content);
        Ok(())
    }

    /// Copy a document, details and catalogued sections, under a new name.
    pub fn copy_document(&mut self, from: &str, to: &str) -> Result<()> {
        if self.documents.contains_key(to) {
            return Err(Error::DuplicateDocument(to.to_string()));
        }
        let source = self.document(from)?;
        let sections = SECTION_KEYS
            .iter()
            .filter_map(|key| {
                source
                    .sections
                    .get(*key)
                    .map(|content| (key.to_string(), content.clone()))
            })
            .collect();
        let copy = StoredDocument {
            details: source.details.clone(),
            subsystem: source.subsystem.clone(),
            sections,
        };
        self.documents.insert(to.to_string(), copy);
        Ok(())
    }

    /// Remove a document.
    pub fn delete_document(&mut self, name: &str) -> Result<()> {
        self.documents
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::DocumentNotFound(name.to_string()))
    }

    /// Names of all documents, sorted.
    pub fn document_names(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }

    fn document(&self, name: &str) -> Result<&StoredDocument> {
        self.documents
            .get(name)
            .ok_or_else(|| Error::DocumentNotFound(name.to_string()))
    }

    fn document_mut(&mut self, name: &str) -> Result<&mut StoredDocument> {
        self.documents
            .get_mut(name)
            .ok_or_else(|| Error::DocumentNotFound(name.to_string()))
    }
}

impl ContentStore for MemoryStore {
    fn content(&self, document: &str, section: &str) -> Result<Content> {
        self.document(document)?
            .sections
            .get(section)
            .cloned()
            .ok_or_else(|| Error::SectionNotFound {
                document: document.to_string(),
                section: section.to_string(),
            })
    }

    fn details(&self, document: &str) -> Result<(DocumentDetails, SubsystemDetails)> {
        let doc = self.document(document)?;
        Ok((doc.details.clone(), doc.subsystem.clone()))
    }
}
