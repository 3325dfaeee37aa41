//! Document assembler.
//!
//! One render reads the details, prepares the session directory, emits
//! the front matter and then every chapter of [`CHAPTERS`] in order,
//! switching heading numbering when the annexure starts. The result is
//! written to `{root}/main.typ`.

use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;

use super::front_matter::{front_matter, signature_page};
use super::section::{compose_chapter, heading_mode_switch, HeadingMode, CHAPTERS};
use super::{RenderOptions, RenderResult, RenderSession};
use crate::error::Result;
use crate::session_dir;
use crate::store::{ContentStore, SIGNED_PAGE_KEY};

const SATELLITE_IMAGE: &str = "scImage.png";
const SIGNED_IMAGE: &str = "signImage.png";

/// Render a document into `root` and return the path of `main.typ`.
///
/// # Example
///
/// ```no_run
/// use istdoc::render::{render_document, RenderOptions};
/// use istdoc::store::JsonStore;
///
/// let store = JsonStore::open("store");
/// let path = render_document(&store, "GSAT-30 Power", "out/gsat30", &RenderOptions::default())?;
/// println!("{}", path.display());
/// # Ok::<(), istdoc::Error>(())
/// ```
pub fn render_document(
    store: &dyn ContentStore,
    document: &str,
    root: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<PathBuf> {
    Ok(render_document_with_stats(store, document, root, options)?.markup_path)
}

/// Render a document and return the markup with statistics.
pub fn render_document_with_stats(
    store: &dyn ContentStore,
    document: &str,
    root: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<RenderResult> {
    // Details first: a missing document must not leave a directory behind.
    store.details(document)?;
    let mut session = RenderSession::create(root.as_ref())?
        .with_converter(Box::new(options.converter.clone()));
    render_document_in(&mut session, store, document, options)
}

/// Render a document into an existing session.
pub fn render_document_in(
    session: &mut RenderSession,
    store: &dyn ContentStore,
    document: &str,
    options: &RenderOptions,
) -> Result<RenderResult> {
    info!("rendering {} into {}", document, session.root().display());
    let (details, subsystem) = store.details(document)?;

    session.install_logo(&options.logo_path)?;
    if let Err(e) = session.write_image(SATELLITE_IMAGE, &subsystem.satellite_image) {
        warn!("satellite image not written: {}", e);
    }
    let signed = signed_page_image(session, store, document);

    let mut markup = front_matter(&details, &subsystem, signed.as_deref(), options);
    markup.push('\n');

    let mut mode = HeadingMode::Numbered;
    for chapter in &CHAPTERS {
        markup.push_str(heading_mode_switch(mode, chapter.mode));
        mode = chapter.mode;
        let text = compose_chapter(chapter, store, document, &subsystem, session, options)?;
        markup.push_str(&text);
        markup.push('\n');
    }

    let path = session.write_markup(&markup)?;
    let result = RenderResult::new(path, markup, session.stats().clone());
    info!(
        "rendered {}: {} sections, {} items, {} bytes",
        document,
        result.stats.section_count,
        result.stats.rendered_items(),
        result.markup_len()
    );
    Ok(result)
}

/// Write the stored signed page, if any, and return its relative path.
fn signed_page_image(
    session: &RenderSession,
    store: &dyn ContentStore,
    document: &str,
) -> Option<String> {
    let content = store.content(document, SIGNED_PAGE_KEY).ok()?;
    let item = content.items.first()?;
    match session.write_image(SIGNED_IMAGE, &item.value) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("signed page not usable: {}", e);
            None
        }
    }
}

/// Render only the approval page, for signing.
pub fn render_signature_page(
    store: &dyn ContentStore,
    document: &str,
    root: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<PathBuf> {
    let (details, subsystem) = store.details(document)?;
    let session = RenderSession::create(root.as_ref())?;
    session.install_logo(&options.logo_path)?;
    let markup = signature_page(&details, &subsystem, options);
    session.write_markup(&markup)
}

/// Render several documents in parallel, each into `{root}/{document}`.
///
/// Results are returned in input order; one failure does not stop the
/// other renders.
pub fn render_many<S: ContentStore + Sync>(
    store: &S,
    documents: &[String],
    root: impl AsRef<Path>,
    options: &RenderOptions,
) -> Vec<Result<RenderResult>> {
    let root = root.as_ref();
    documents
        .par_iter()
        .map(|document| {
            let dir = session_dir(root, document)?;
            render_document_with_stats(store, document, dir, options)
        })
        .collect()
}
