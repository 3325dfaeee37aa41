//! Rendering options and configuration.

use chrono::{Local, NaiveDate};
use std::path::PathBuf;

use crate::tool::ToolSpec;

/// Highest attachment page suffix probed when embedding a PDF.
pub const DEFAULT_MAX_ATTACHMENT_PAGES: u32 = 299;

/// Markdown package imported by the preamble for text items.
pub const DEFAULT_MARKDOWN_PACKAGE: &str = "@preview/cmarker:0.1.0";

/// Options for rendering a document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Logo copied to `images/logo.png` for the page header
    pub logo_path: PathBuf,

    /// Issue date printed in the header and change history (today if unset)
    pub issue_date: Option<NaiveDate>,

    /// PDF-to-SVG converter used for attachments
    pub converter: ToolSpec,

    /// Highest `-NNN.svg` suffix probed per attachment
    pub max_attachment_pages: u32,

    /// Typst package providing `cmarker.render`
    pub markdown_package: String,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the logo source.
    pub fn with_logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo_path = path.into();
        self
    }

    /// Pin the issue date.
    pub fn with_issue_date(mut self, date: NaiveDate) -> Self {
        self.issue_date = Some(date);
        self
    }

    /// Set the attachment converter.
    pub fn with_converter(mut self, converter: ToolSpec) -> Self {
        self.converter = converter;
        self
    }

    /// Set the attachment page limit.
    pub fn with_max_attachment_pages(mut self, pages: u32) -> Self {
        self.max_attachment_pages = pages;
        self
    }

    /// Set the markdown package import.
    pub fn with_markdown_package(mut self, package: impl Into<String>) -> Self {
        self.markdown_package = package.into();
        self
    }

    /// Issue date, falling back to today.
    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            logo_path: PathBuf::from("resources/logo.png"),
            issue_date: None,
            converter: ToolSpec::default_converter(),
            max_attachment_pages: DEFAULT_MAX_ATTACHMENT_PAGES,
            markdown_package: DEFAULT_MARKDOWN_PACKAGE.to_string(),
        }
    }
}
