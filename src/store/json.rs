//! Directory-backed content store.
//!
//! ```text
//! {root}/{document}/DocumentDetails.json
//! {root}/{document}/SubsystemDetails.json
//! {root}/{document}/{SectionKey}.json
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{validate_name, ContentStore, SECTION_KEYS};
use crate::error::{Error, Result};
use crate::model::{Content, DocumentDetails, SubsystemDetails};

const DOCUMENT_DETAILS: &str = "DocumentDetails";
const SUBSYSTEM_DETAILS: &str = "SubsystemDetails";

/// Content store keeping one JSON file per record.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `root`. The directory is created on first write.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a document with default details and empty sections.
    pub fn add_document(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        let dir = self.root.join(name);
        if dir.exists() {
            return Err(Error::DuplicateDocument(name.to_string()));
        }
        fs::create_dir_all(&dir)?;
        self.write(name, DOCUMENT_DETAILS, &DocumentDetails::default())?;
        self.write(name, SUBSYSTEM_DETAILS, &SubsystemDetails::default())?;
        for key in SECTION_KEYS {
            self.write(name, key, &Content::new())?;
        }
        debug!("created document {} in {}", name, self.root.display());
        Ok(())
    }

    /// Replace the document and subsystem details.
    pub fn set_details(
        &self,
        name: &str,
        details: &DocumentDetails,
        subsystem: &SubsystemDetails,
    ) -> Result<()> {
        self.ensure_document(name)?;
        self.write(name, DOCUMENT_DETAILS, details)?;
        self.write(name, SUBSYSTEM_DETAILS, subsystem)
    }

    /// Replace the content of one section.
    pub fn set_content(&self, name: &str, section: &str, content: &Content) -> Result<()> {
        self.ensure_document(name)?;
        validate_name(section)?;
        self.write(name, section, content)
    }

    /// Names of all documents, sorted. An absent root holds no documents.
    pub fn document_names(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn ensure_document(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        if self.root.join(name).is_dir() {
            Ok(())
        } else {
            Err(Error::DocumentNotFound(name.to_string()))
        }
    }

    fn record_path(&self, name: &str, record: &str) -> PathBuf {
        self.root.join(name).join(format!("{}.json", record))
    }

    fn write<T: Serialize>(&self, name: &str, record: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.record_path(name, record), json)?;
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, name: &str, record: &str) -> Result<T> {
        let data = fs::read(self.record_path(name, record))?;
        Ok(serde_json::from_slice(&data)?)
    }
}

impl ContentStore for JsonStore {
    fn content(&self, document: &str, section: &str) -> Result<Content> {
        self.ensure_document(document)?;
        validate_name(section)?;
        if !self.record_path(document, section).is_file() {
            return Err(Error::SectionNotFound {
                document: document.to_string(),
                section: section.to_string(),
            });
        }
        self.read(document, section)
    }

    fn details(&self, document: &str) -> Result<(DocumentDetails, SubsystemDetails)> {
        self.ensure_document(document)?;
        Ok((
            self.read(document, DOCUMENT_DETAILS)?,
            self.read(document, SUBSYSTEM_DETAILS)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentItem, ContentKind};
    use tempfile::TempDir;

    #[test]
    fn test_add_and_read_document() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path().join("store"));
        assert!(store.document_names().unwrap().is_empty());

        store.add_document("GSAT").unwrap();
        assert!(tmp.path().join("store/GSAT/TestPlans.json").is_file());
        assert!(store.content("GSAT", "Annexure-EID").unwrap().is_empty());
        assert_eq!(store.document_names().unwrap(), vec!["GSAT"]);
        assert!(store.add_document("GSAT").is_err());
    }

    #[test]
    fn test_content_round_trip_on_disk() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path());
        store.add_document("D").unwrap();
        let content = Content::from_items(vec![
            ContentItem::text("x"),
            ContentItem::new(ContentKind::Table, "A\n1").landscape(true),
        ]);
        store.set_content("D", "TestMatrix", &content).unwrap();

        let raw = fs::read_to_string(tmp.path().join("D/TestMatrix.json")).unwrap();
        assert!(raw.contains("\"NoOfItems\": 2"));
        assert_eq!(store.content("D", "TestMatrix").unwrap(), content);
    }

    #[test]
    fn test_malformed_record_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path());
        store.add_document("D").unwrap();
        fs::write(
            tmp.path().join("D/TestPlans.json"),
            r#"{"NoOfItems":2,"ContentType":["text"],"FileName":[""],"Value":[""],"Captions":[""]}"#,
        )
        .unwrap();
        assert!(matches!(
            store.content("D", "TestPlans"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_names_cannot_leave_the_root() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path().join("store"));
        store.add_document("D").unwrap();

        assert!(matches!(store.add_document("../x"), Err(Error::InvalidName(_))));
        assert!(!tmp.path().join("x").exists());
        assert!(matches!(store.details(".."), Err(Error::InvalidName(_))));
        assert!(matches!(
            store.content("D", "../D/DocumentDetails"),
            Err(Error::InvalidName(_))
        ));
        assert!(matches!(
            store.set_content("D", "../escape", &Content::new()),
            Err(Error::InvalidName(_))
        ));
        assert!(!tmp.path().join("store/escape.json").exists());
    }

    #[test]
    fn test_missing_section_and_document() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path());
        store.add_document("D").unwrap();
        assert!(matches!(
            store.content("D", "Information-SignedPage"),
            Err(Error::SectionNotFound { .. })
        ));
        assert!(matches!(
            store.details("other"),
            Err(Error::DocumentNotFound(_))
        ));
    }
}
