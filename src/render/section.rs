//! Section composer and the fixed chapter plan.
//!
//! A chapter is a top-level heading followed by a fixed list of sections,
//! each resolved from the content store by key. How a failed lookup is
//! handled depends on the chapter's [`ChapterPolicy`].

use std::fmt::Write;

use log::{debug, warn};

use super::item::render_content;
use super::markup::PAGE_BREAK;
use super::table::build_from_delimited;
use super::{RenderOptions, RenderSession};
use crate::error::{Error, Result};
use crate::model::{Content, SubsystemDetails};
use crate::store::ContentStore;

/// One named content slot of a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    /// Content store key
    pub key: &'static str,

    /// Second-level heading; `None` renders the content directly under
    /// the chapter heading
    pub title: Option<&'static str>,

    /// Start the section on a new page
    pub page_break_before: bool,

    /// Precede the content with an index table of item captions and file names
    pub procedure_index: bool,
}

impl SectionSpec {
    const fn titled(key: &'static str, title: &'static str) -> Self {
        Self {
            key,
            title: Some(title),
            page_break_before: false,
            procedure_index: false,
        }
    }

    const fn untitled(key: &'static str) -> Self {
        Self {
            key,
            title: None,
            page_break_before: false,
            procedure_index: false,
        }
    }

    const fn new_page(self) -> Self {
        Self {
            page_break_before: true,
            ..self
        }
    }

    const fn with_procedure_index(self) -> Self {
        Self {
            procedure_index: true,
            ..self
        }
    }

    /// Label used in error messages.
    pub fn label(&self) -> &'static str {
        self.title.unwrap_or(self.key)
    }
}

/// What a failed section lookup does to its chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterPolicy {
    /// Inline the error, render the section as empty, and continue
    BestEffort,
    /// Fail the chapter and with it the whole render
    Mandatory,
}

/// Heading numbering in effect for a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingMode {
    /// `1.1` numbering, listed in the table of contents
    Numbered,
    /// Unnumbered top level with lettered appendix numbering
    Appendix,
}

/// A top-level chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterSpec {
    /// First-level heading
    pub title: &'static str,

    /// Failure handling for section lookups
    pub policy: ChapterPolicy,

    /// Heading numbering
    pub mode: HeadingMode,

    /// Open with the generated abstract
    pub with_abstract: bool,

    /// Sections in order
    pub sections: &'static [SectionSpec],
}

/// The document's chapters, in order.
pub const CHAPTERS: [ChapterSpec; 5] = [
    ChapterSpec {
        title: "Introduction",
        policy: ChapterPolicy::BestEffort,
        mode: HeadingMode::Numbered,
        with_abstract: true,
        sections: &[
            SectionSpec::titled("Introduction-Acronyms", "Acronyms"),
            SectionSpec::titled("Introduction-SSIntroduction", "Introduction to Subsystem"),
            SectionSpec::titled("Introduction-SSSpecification", "Specification of Subsystem"),
            SectionSpec::titled("Introduction-Telecommand", "Telecommand Details").new_page(),
            SectionSpec::titled("Introduction-Telemetry", "Telemetry Details").new_page(),
            SectionSpec::titled("Introduction-Pages", "Pages").new_page(),
        ],
    },
    ChapterSpec {
        title: "Checkout Details",
        policy: ChapterPolicy::Mandatory,
        mode: HeadingMode::Numbered,
        with_abstract: false,
        sections: &[
            SectionSpec::titled("Checkout-Interface", "Checkout Interface"),
            SectionSpec::titled("Checkout-SpecificRequirements", "Specific Requirements").new_page(),
            SectionSpec::titled("Checkout-SafetyRequirements", "Safety Requirements"),
            SectionSpec::titled("Checkout-TestPhilosophy", "Test Philosophy"),
            SectionSpec::titled("Checkout-SubsystemClarifications", "Subsystem Clarification"),
        ],
    },
    ChapterSpec {
        title: "Test Details",
        policy: ChapterPolicy::BestEffort,
        mode: HeadingMode::Numbered,
        with_abstract: false,
        sections: &[
            SectionSpec::titled("TestMatrix", "Test Matrix"),
            SectionSpec::titled("TestPlans", "Test Plan"),
            SectionSpec::titled("TestProcedures", "Test Procedures")
                .new_page()
                .with_procedure_index(),
        ],
    },
    ChapterSpec {
        title: "EID",
        policy: ChapterPolicy::Mandatory,
        mode: HeadingMode::Appendix,
        with_abstract: false,
        sections: &[SectionSpec::untitled("Annexure-EID")],
    },
    ChapterSpec {
        title: "Test Result Format",
        policy: ChapterPolicy::Mandatory,
        mode: HeadingMode::Appendix,
        with_abstract: false,
        sections: &[SectionSpec::untitled("Annexure-TestResultsFormat")],
    },
];

/// Markup switching heading numbering from `from` to `to`.
///
/// Entering appendix mode opens the unnumbered "Annexure" heading and
/// applies the `appendix` show rule defined in the preamble. There is no
/// way back to numbered headings.
pub fn heading_mode_switch(from: HeadingMode, to: HeadingMode) -> &'static str {
    match (from, to) {
        (HeadingMode::Numbered, HeadingMode::Appendix) => {
            "#set heading(numbering: none, supplement:none, outlined:false, bookmarked:false)\n\
             = Annexure\n\n\
             #show: appendix\n\n"
        }
        _ => "",
    }
}

/// Compose one chapter from the store.
pub fn compose_chapter(
    chapter: &ChapterSpec,
    store: &dyn ContentStore,
    document: &str,
    subsystem: &SubsystemDetails,
    session: &mut RenderSession,
    options: &RenderOptions,
) -> Result<String> {
    debug!("composing chapter {}", chapter.title);
    let mut out = format!("\n= {}\n", chapter.title);
    if chapter.with_abstract {
        out.push_str(&abstract_markup(subsystem));
        out.push('\n');
    }

    for section in chapter.sections {
        let content = match store.content(document, section.key) {
            Ok(content) => content,
            Err(e) => match chapter.policy {
                ChapterPolicy::Mandatory => return Err(Error::chapter(chapter.title, e)),
                ChapterPolicy::BestEffort => {
                    warn!("{}: {} unavailable: {}", chapter.title, section.key, e);
                    out.push_str(&section_heading(section));
                    let _ = writeln!(out, "Error in {}: {}\n", section.label(), e);
                    out.push_str(&section_body(section, &Content::new(), session, options));
                    session.stats_mut().section_count += 1;
                    continue;
                }
            },
        };
        out.push_str(&compose_section(section, &content, session, options));
    }

    if chapter.mode == HeadingMode::Appendix {
        out.push_str("\n\n");
    }
    out.push_str(PAGE_BREAK);
    out.push('\n');
    Ok(out)
}

/// Compose one section: optional page break and heading, then its items.
pub fn compose_section(
    section: &SectionSpec,
    content: &Content,
    session: &mut RenderSession,
    options: &RenderOptions,
) -> String {
    session.stats_mut().section_count += 1;
    let mut out = section_heading(section);
    out.push_str(&section_body(section, content, session, options));
    out
}

fn section_heading(section: &SectionSpec) -> String {
    let mut out = String::new();
    if section.page_break_before {
        out.push_str(PAGE_BREAK);
        out.push('\n');
    }
    if let Some(title) = section.title {
        let _ = writeln!(out, "\n== {}", title);
    }
    out
}

fn section_body(
    section: &SectionSpec,
    content: &Content,
    session: &mut RenderSession,
    options: &RenderOptions,
) -> String {
    if !section.procedure_index {
        return render_content(content, session, options);
    }

    let mut out = String::from("#set block(spacing:1.2em)\n#set par(leading:0.65em)\n");
    let table_no = session.allocate_table_number();
    session.stats_mut().table_count += 1;
    out.push_str(&build_from_delimited(
        &procedure_index(content),
        "Procedure List",
        false,
        table_no,
    ));
    out.push_str("\n\n");
    out.push_str(&render_content(content, session, options));
    out.push_str("\n#set block(spacing:1.5em)\n#set par(leading:1.15em)\n\n");
    out
}

/// Delimited index of a procedure section: one row per item.
fn procedure_index(content: &Content) -> String {
    let mut out = String::from("Title,Procedure\n");
    for item in &content.items {
        let _ = writeln!(out, "{},{}", item.caption, item.file_name);
    }
    out
}

/// Generated abstract naming the subsystem, satellite and satellite class.
fn abstract_markup(subsystem: &SubsystemDetails) -> String {
    let mut out = String::from("\n== Abstract\n");
    let _ = writeln!(
        out,
        "This document briefly describes the #ssName of #satName an {} class of Satellite, \
         and gives all aspects related to Integrated satellite test(IST), namely",
        subsystem.satellite_class
    );
    for topic in [
        "Mnemonics for TM and TC",
        "TM Pages",
        "Possible status displays for TM parameters",
        "IST test matrix",
        "IST plans",
        "IST Procedures",
        "IST Test Report Formats",
        "Any Specific Requirements",
    ] {
        let _ = writeln!(out, "- {}", topic);
    }
    out.push_str("\n\nAbove aspects are covered in various chapters as given in the contents.\n");
    out
}
