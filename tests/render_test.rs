//! Integration tests for document rendering.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tempfile::TempDir;

use istdoc::error::{Error, Result};
use istdoc::render::{render_document_in, PageConverter};
use istdoc::{
    render_document, render_many, render_signature_page, Content, ContentItem, ContentKind,
    ContentStore, DocumentDetails, JsonStore, MemoryStore, RenderOptions, RenderSession,
    SubsystemDetails, SIGNED_PAGE_KEY,
};

/// 1x1 PNG.
const PIXEL_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Converter writing a fixed number of pages.
struct PagesConverter(u32);

impl PageConverter for PagesConverter {
    fn convert(&self, dir: &Path, _pdf_name: &str, page_pattern: &str) -> Result<()> {
        for page in 1..=self.0 {
            let name = page_pattern.replace("%03d", &format!("{:03}", page));
            fs::write(dir.join(name), "<svg/>")?;
        }
        Ok(())
    }
}

fn fixture(tmp: &TempDir) -> (MemoryStore, RenderOptions) {
    let logo = tmp.path().join("logo.png");
    fs::write(&logo, STANDARD.decode(PIXEL_PNG).unwrap()).unwrap();

    let mut store = MemoryStore::new();
    store.add_document("GSAT-30 Power").unwrap();
    store
        .set_details(
            "GSAT-30 Power",
            DocumentDetails {
                document_number: "URSC-IST-042".into(),
                prepared_by: "Test Engineer".into(),
                ..Default::default()
            },
            SubsystemDetails {
                satellite_class: "I-3K".into(),
                satellite_name: "GSAT-30".into(),
                subsystem_name: "Power".into(),
                satellite_image: PIXEL_PNG.into(),
            },
        )
        .unwrap();
    (store, RenderOptions::new().with_logo(logo))
}

fn render(tmp: &TempDir, store: &dyn ContentStore, options: &RenderOptions, pages: u32) -> String {
    let mut session = RenderSession::create(tmp.path().join("out"))
        .unwrap()
        .with_converter(Box::new(PagesConverter(pages)));
    render_document_in(&mut session, store, "GSAT-30 Power", options)
        .unwrap()
        .markup
}

#[test]
fn test_text_then_image() {
    let tmp = TempDir::new().unwrap();
    let (mut store, options) = fixture(&tmp);
    store
        .set_content(
            "GSAT-30 Power",
            "Introduction-SSIntroduction",
            Content::from_items(vec![
                ContentItem::text("Hello"),
                ContentItem::new(ContentKind::Image, PIXEL_PNG).with_caption("Bus"),
            ]),
        )
        .unwrap();

    let markup = render(&tmp, &store, &options, 0);
    let text_at = markup.find("#cmarker.render(\"\nHello\n\")").unwrap();
    let figure_at = markup
        .find("#figure(image(\"images/images0.png\"),caption:\"Bus\")")
        .unwrap();
    assert!(text_at < figure_at);
    assert!(tmp.path().join("out/images/images0.png").is_file());
}

#[test]
fn test_empty_document_is_not_applicable_everywhere() {
    let tmp = TempDir::new().unwrap();
    let (store, options) = fixture(&tmp);
    let markup = render(&tmp, &store, &options, 0);
    assert_eq!(markup.matches("Not Applicable").count(), 16);
    assert!(!markup.contains("#page(flipped: true)"));
}

#[test]
fn test_landscape_items_are_flipped() {
    let tmp = TempDir::new().unwrap();
    let (mut store, options) = fixture(&tmp);
    store
        .set_content(
            "GSAT-30 Power",
            "TestMatrix",
            Content::from_items(vec![
                ContentItem::new(ContentKind::Table, "Test,Mode\nTM-1,Nominal")
                    .with_caption("Matrix")
                    .landscape(true),
                ContentItem::text("portrait note"),
            ]),
        )
        .unwrap();

    let markup = render(&tmp, &store, &options, 0);
    assert_eq!(markup.matches("#page(flipped: true)[").count(), 1);
    let flip_at = markup.find("#page(flipped: true)[").unwrap();
    let table_at = markup.find("csv.decode(\"1,TM-1,Nominal\n\")").unwrap();
    assert!(flip_at < table_at);
}

#[test]
fn test_attachment_pages_embedded_in_order() {
    let tmp = TempDir::new().unwrap();
    let (mut store, options) = fixture(&tmp);
    store
        .set_content(
            "GSAT-30 Power",
            "Annexure-EID",
            Content::from_items(vec![ContentItem::new(ContentKind::File, STANDARD.encode("%PDF"))]),
        )
        .unwrap();

    let markup = render(&tmp, &store, &options, 3);
    let first = markup.find("files/file0-001.svg").unwrap();
    let third = markup.find("files/file0-003.svg").unwrap();
    assert!(first < third);
    assert!(!markup.contains("files/file0-004.svg"));
    assert!(tmp.path().join("out/files/file0.pdf").is_file());
}

#[test]
fn test_bad_items_do_not_abort() {
    let tmp = TempDir::new().unwrap();
    let (mut store, options) = fixture(&tmp);
    store
        .set_content(
            "GSAT-30 Power",
            "TestPlans",
            Content::from_items(vec![
                ContentItem::new(ContentKind::Image, "not base64"),
                ContentItem::new(ContentKind::RichText, "not base64"),
                ContentItem::new(ContentKind::Excel, "not base64"),
                ContentItem::new(ContentKind::parse("hologram"), ""),
                ContentItem::text("still here"),
            ]),
        )
        .unwrap();

    let markup = render(&tmp, &store, &options, 0);
    assert!(markup.contains("Content Cannot be added"));
    assert!(markup.contains("Excel file cannot be decoded"));
    assert!(markup.contains("unknown content type"));
    assert!(markup.contains("still here"));
}

#[test]
fn test_rich_text_section() {
    let tmp = TempDir::new().unwrap();
    let (mut store, options) = fixture(&tmp);
    let deltas = r#"[
        {"insert":"Power On"},
        {"insert":"\n","attributes":{"header":2}},
        {"insert":"Check "},
        {"insert":"bus","attributes":{"bold":true}},
        {"insert":"\n","attributes":{"list":"bullet"}}
    ]"#;
    store
        .set_content(
            "GSAT-30 Power",
            "Checkout-TestPhilosophy",
            Content::from_items(vec![ContentItem::new(
                ContentKind::RichText,
                STANDARD.encode(deltas),
            )]),
        )
        .unwrap();

    let markup = render(&tmp, &store, &options, 0);
    assert!(markup.contains("== Power On\n- Check * bus *\n"));
}

/// Store that fails lookups for one section.
struct Broken<'a> {
    inner: &'a MemoryStore,
    section: &'static str,
}

impl ContentStore for Broken<'_> {
    fn content(&self, document: &str, section: &str) -> Result<Content> {
        if section == self.section {
            return Err(Error::Other("disk error".into()));
        }
        self.inner.content(document, section)
    }

    fn details(&self, document: &str) -> Result<(DocumentDetails, SubsystemDetails)> {
        self.inner.details(document)
    }
}

#[test]
fn test_introduction_is_best_effort() {
    let tmp = TempDir::new().unwrap();
    let (store, options) = fixture(&tmp);
    let broken = Broken {
        inner: &store,
        section: "Introduction-Acronyms",
    };
    let markup = render(&tmp, &broken, &options, 0);
    assert!(markup.contains("Error in Acronyms: disk error"));
    assert!(markup.contains("= Checkout Details"));
}

#[test]
fn test_checkout_is_mandatory() {
    let tmp = TempDir::new().unwrap();
    let (store, options) = fixture(&tmp);
    let broken = Broken {
        inner: &store,
        section: "Checkout-Interface",
    };
    let mut session = RenderSession::create(tmp.path().join("out")).unwrap();
    let err = render_document_in(&mut session, &broken, "GSAT-30 Power", &options).unwrap_err();
    assert!(matches!(err, Error::Chapter { chapter: "Checkout Details", .. }));
    assert!(!tmp.path().join("out/main.typ").exists());
}

#[test]
fn test_annexure_is_mandatory() {
    let tmp = TempDir::new().unwrap();
    let (store, options) = fixture(&tmp);
    let broken = Broken {
        inner: &store,
        section: "Annexure-TestResultsFormat",
    };
    let mut session = RenderSession::create(tmp.path().join("out")).unwrap();
    let err = render_document_in(&mut session, &broken, "GSAT-30 Power", &options).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot create Test Result Format: disk error"
    );
}

#[test]
fn test_signed_page_replaces_generated_page() {
    let tmp = TempDir::new().unwrap();
    let (mut store, options) = fixture(&tmp);
    let before = render(&tmp, &store, &options, 0);
    assert!(before.contains("Reviewed By,"));

    store
        .set_content(
            "GSAT-30 Power",
            SIGNED_PAGE_KEY,
            Content::from_items(vec![ContentItem::new(ContentKind::Image, PIXEL_PNG)]),
        )
        .unwrap();
    let after = render(&tmp, &store, &options, 0);
    assert!(!after.contains("Reviewed By,"));
    assert!(tmp.path().join("out/images/signImage.png").is_file());
}

#[test]
fn test_signature_page_render() {
    let tmp = TempDir::new().unwrap();
    let (store, options) = fixture(&tmp);
    let path = render_signature_page(&store, "GSAT-30 Power", tmp.path().join("sig"), &options)
        .unwrap();
    let markup = fs::read_to_string(path).unwrap();
    assert!(markup.contains("#let preparedBy = \"Test Engineer\""));
    assert!(markup.contains("Approved By,"));
    assert!(!markup.contains("= Introduction"));
}

#[test]
fn test_json_store_render() {
    let tmp = TempDir::new().unwrap();
    let (_, options) = fixture(&tmp);
    let store = JsonStore::open(tmp.path().join("store"));
    store.add_document("D1").unwrap();
    store
        .set_content(
            "D1",
            "TestProcedures",
            &Content::from_items(vec![ContentItem::new(ContentKind::Code, "PWR ON\n")
                .with_file_name("power.tcl")
                .with_caption("Power On")]),
        )
        .unwrap();

    let path = render_document(&store, "D1", tmp.path().join("out"), &options).unwrap();
    let markup = fs::read_to_string(path).unwrap();
    assert!(markup.contains("csv.decode(\"1,Power On,power.tcl\n\")"));
    assert!(markup.contains("=== power.tcl\n\n```\nPWR ON\n```"));
}

#[test]
fn test_render_many_isolates_documents() {
    let tmp = TempDir::new().unwrap();
    let (_, options) = fixture(&tmp);
    let mut store = MemoryStore::new();
    for name in ["A", "B"] {
        store.add_document(name).unwrap();
        store
            .set_content(
                name,
                "TestPlans",
                Content::from_items(vec![ContentItem::new(ContentKind::Image, PIXEL_PNG)]),
            )
            .unwrap();
    }
    let documents = vec!["A".to_string(), "missing".to_string(), "B".to_string()];
    let results = render_many(&store, &documents, tmp.path().join("out"), &options);

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(Error::DocumentNotFound(_))));
    let b = results[2].as_ref().unwrap();
    assert_eq!(b.stats.image_count, 1);
    assert!(tmp.path().join("out/A/images/images0.png").is_file());
    assert!(tmp.path().join("out/B/images/images0.png").is_file());
}

#[test]
fn test_render_many_rejects_escaping_names() {
    let tmp = TempDir::new().unwrap();
    let (store, options) = fixture(&tmp);
    let documents = vec!["../GSAT-30 Power".to_string(), "GSAT-30 Power".to_string()];
    let results = render_many(&store, &documents, tmp.path().join("out"), &options);

    assert!(matches!(results[0], Err(Error::InvalidName(_))));
    assert!(results[1].is_ok());
    assert!(!tmp.path().join("GSAT-30 Power").exists());
}
