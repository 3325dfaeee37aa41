//! Per-render working directory and resource allocation.
//!
//! A [`RenderSession`] owns one directory laid out as
//!
//! ```text
//! {root}/main.typ
//! {root}/images/{logo.png, scImage.png, signImage.png, images<N>.png}
//! {root}/files/{file<N>.pdf, file<N>-<NNN>.svg}
//! ```
//!
//! and the three monotonic counters used to name images, attachments and
//! table variables. A session is never shared between renders.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info};

use super::RenderStats;
use crate::error::Result;
use crate::tool::ToolSpec;

/// Name of the assembled markup file.
pub const MARKUP_FILE: &str = "main.typ";

const IMAGES_DIR: &str = "images";
const FILES_DIR: &str = "files";

/// Converts a PDF into one SVG per page.
pub trait PageConverter {
    /// Convert `pdf_name` inside `dir`, writing pages named by the printf
    /// style `page_pattern` (e.g. `file0-%03d.svg`, numbered from 1).
    fn convert(&self, dir: &Path, pdf_name: &str, page_pattern: &str) -> Result<()>;
}

impl PageConverter for ToolSpec {
    fn convert(&self, dir: &Path, pdf_name: &str, page_pattern: &str) -> Result<()> {
        self.run(dir, pdf_name, page_pattern).map(|_| ())
    }
}

/// Working directory and counters of one document render.
pub struct RenderSession {
    root: PathBuf,
    converter: Box<dyn PageConverter>,
    next_image: usize,
    next_file: usize,
    next_table: u32,
    stats: RenderStats,
}

impl RenderSession {
    /// Create the session directory tree under `root`.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(IMAGES_DIR))?;
        fs::create_dir_all(root.join(FILES_DIR))?;
        info!("render session at {}", root.display());
        Ok(Self {
            root,
            converter: Box::new(ToolSpec::default_converter()),
            next_image: 0,
            next_file: 0,
            next_table: 0,
            stats: RenderStats::new(),
        })
    }

    /// Replace the attachment converter.
    pub fn with_converter(mut self, converter: Box<dyn PageConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Session root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding attachments and their pages.
    pub fn files_dir(&self) -> PathBuf {
        self.root.join(FILES_DIR)
    }

    /// Statistics gathered so far.
    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut RenderStats {
        &mut self.stats
    }

    /// Decode a base64 image into `images/images<N>.png` and return the
    /// file name. The index advances even when decoding fails.
    pub fn allocate_image(&mut self, payload: &str) -> Result<String> {
        let name = format!("images{}.png", self.next_image);
        self.next_image += 1;
        let data = STANDARD.decode(payload)?;
        fs::write(self.root.join(IMAGES_DIR).join(&name), data)?;
        debug!("allocated image {}", name);
        Ok(name)
    }

    /// Decode a base64 PDF into `files/file<N>.pdf`, convert it to SVG
    /// pages and return `N`. The index advances even on failure.
    pub fn allocate_attachment(&mut self, payload: &str) -> Result<usize> {
        let index = self.next_file;
        self.next_file += 1;
        let data = STANDARD.decode(payload)?;
        let pdf_name = format!("file{}.pdf", index);
        let dir = self.files_dir();
        fs::write(dir.join(&pdf_name), data)?;
        self.converter
            .convert(&dir, &pdf_name, &format!("file{}-%03d.svg", index))?;
        debug!("allocated attachment {}", pdf_name);
        Ok(index)
    }

    /// Next table number, starting at 1.
    pub fn allocate_table_number(&mut self) -> u32 {
        self.next_table += 1;
        self.next_table
    }

    /// Relative paths of the converted pages of attachment `index`, probing
    /// `-001.svg` up to `-{max_pages}.svg` and stopping at the first gap.
    pub fn attachment_pages(&self, index: usize, max_pages: u32) -> Vec<String> {
        let dir = self.files_dir();
        let mut pages = Vec::new();
        for page in 1..=max_pages {
            let name = format!("file{}-{:03}.svg", index, page);
            if !dir.join(&name).is_file() {
                debug!("attachment {} ends before page {}", index, page);
                break;
            }
            pages.push(format!("{}/{}", FILES_DIR, name));
        }
        pages
    }

    /// Decode a base64 image into `images/{name}` and return its relative path.
    pub fn write_image(&self, name: &str, payload: &str) -> Result<String> {
        let data = STANDARD.decode(payload)?;
        fs::write(self.root.join(IMAGES_DIR).join(name), data)?;
        Ok(format!("{}/{}", IMAGES_DIR, name))
    }

    /// Copy the header logo into `images/logo.png`.
    pub fn install_logo(&self, source: &Path) -> Result<()> {
        fs::copy(source, self.root.join(IMAGES_DIR).join("logo.png"))?;
        Ok(())
    }

    /// Write the assembled markup to `main.typ`.
    pub fn write_markup(&self, markup: &str) -> Result<PathBuf> {
        let path = self.root.join(MARKUP_FILE);
        fs::write(&path, markup)?;
        info!("wrote {} ({} bytes)", path.display(), markup.len());
        Ok(path)
    }

    /// Delete the working directory.
    pub fn remove(self) -> Result<()> {
        fs::remove_dir_all(&self.root)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// 1x1 transparent PNG.
    pub(crate) const PIXEL_PNG: &str =
        "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    /// Converter that writes the listed page numbers.
    pub(crate) struct FakeConverter {
        pub pages: Vec<u32>,
        pub calls: Rc<Cell<u32>>,
    }

    impl FakeConverter {
        pub(crate) fn boxed(pages: &[u32]) -> Box<dyn PageConverter> {
            Box::new(FakeConverter {
                pages: pages.to_vec(),
                calls: Rc::new(Cell::new(0)),
            })
        }
    }

    impl PageConverter for FakeConverter {
        fn convert(&self, dir: &Path, pdf_name: &str, page_pattern: &str) -> Result<()> {
            assert!(dir.join(pdf_name).is_file());
            self.calls.set(self.calls.get() + 1);
            for page in &self.pages {
                let name = page_pattern.replace("%03d", &format!("{:03}", page));
                fs::write(dir.join(name), "<svg/>")?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_create_layout() {
        let tmp = TempDir::new().unwrap();
        let session = RenderSession::create(tmp.path().join("doc")).unwrap();
        assert!(session.root().join("images").is_dir());
        assert!(session.files_dir().is_dir());
    }

    #[test]
    fn test_allocate_image_sequence() {
        let tmp = TempDir::new().unwrap();
        let mut session = RenderSession::create(tmp.path()).unwrap();

        assert_eq!(session.allocate_image(PIXEL_PNG).unwrap(), "images0.png");
        assert!(session.allocate_image("***not base64***").is_err());
        assert_eq!(session.allocate_image(PIXEL_PNG).unwrap(), "images2.png");
        assert!(tmp.path().join("images/images2.png").is_file());
        assert!(!tmp.path().join("images/images1.png").exists());
    }

    #[test]
    fn test_table_numbers_start_at_one() {
        let tmp = TempDir::new().unwrap();
        let mut session = RenderSession::create(tmp.path()).unwrap();
        assert_eq!(session.allocate_table_number(), 1);
        assert_eq!(session.allocate_table_number(), 2);
    }

    #[test]
    fn test_attachment_page_discovery_stops_at_gap() {
        let tmp = TempDir::new().unwrap();
        let mut session = RenderSession::create(tmp.path())
            .unwrap()
            .with_converter(FakeConverter::boxed(&[1, 2, 4]));

        let index = session.allocate_attachment(PIXEL_PNG).unwrap();
        assert_eq!(index, 0);
        assert!(tmp.path().join("files/file0.pdf").is_file());
        assert_eq!(
            session.attachment_pages(index, 299),
            vec!["files/file0-001.svg", "files/file0-002.svg"]
        );
    }

    #[test]
    fn test_attachment_page_limit() {
        let tmp = TempDir::new().unwrap();
        let mut session = RenderSession::create(tmp.path())
            .unwrap()
            .with_converter(FakeConverter::boxed(&[1, 2, 3]));
        let index = session.allocate_attachment(PIXEL_PNG).unwrap();
        assert_eq!(session.attachment_pages(index, 2).len(), 2);
    }

    #[test]
    fn test_attachment_decode_failure_skips_converter() {
        let tmp = TempDir::new().unwrap();
        let calls = Rc::new(Cell::new(0));
        let converter = FakeConverter {
            pages: vec![1],
            calls: Rc::clone(&calls),
        };
        let mut session = RenderSession::create(tmp.path())
            .unwrap()
            .with_converter(Box::new(converter));

        assert!(session.allocate_attachment("%%%").is_err());
        assert_eq!(calls.get(), 0);
        assert_eq!(session.allocate_attachment(PIXEL_PNG).unwrap(), 1);
    }

    #[test]
    fn test_remove() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("doc");
        let session = RenderSession::create(&root).unwrap();
        session.write_markup("= Hi").unwrap();
        session.remove().unwrap();
        assert!(!root.exists());
    }
}
