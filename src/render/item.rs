//! Content item renderer: dispatches one item by kind to its converter.

use std::fmt::Write;

use log::{debug, warn};

use super::delta::render_rich_text;
use super::markup::{flip_page, string_literal, NOT_APPLICABLE, PAGE_BREAK, UNKNOWN_CONTENT};
use super::table::{build_from_delimited, build_from_spreadsheet};
use super::{RenderOptions, RenderSession};
use crate::model::{Content, ContentItem, ContentKind};

/// Render all items of a section, in order.
///
/// Empty content renders as [`NOT_APPLICABLE`]. An item whose resources
/// cannot be allocated is skipped; the remaining items still render.
pub fn render_content(
    content: &Content,
    session: &mut RenderSession,
    options: &RenderOptions,
) -> String {
    if content.is_empty() {
        return format!("{}\n", NOT_APPLICABLE);
    }

    let mut out = String::new();
    for (index, item) in content.items.iter().enumerate() {
        match render_item(item, session, options) {
            Some(fragment) => {
                out.push_str(&fragment);
                out.push('\n');
            }
            None => debug!("item {} ({}) skipped", index, item.kind),
        }
    }
    out
}

/// Render one item, or `None` if it had to be skipped.
pub fn render_item(
    item: &ContentItem,
    session: &mut RenderSession,
    options: &RenderOptions,
) -> Option<String> {
    let fragment = match &item.kind {
        ContentKind::Text => {
            session.stats_mut().text_count += 1;
            text_markup(&item.value)
        }
        ContentKind::Image => match session.allocate_image(&item.value) {
            Ok(name) => {
                session.stats_mut().image_count += 1;
                flip_page(image_markup(&name, &item.caption), item.landscape)
            }
            Err(e) => {
                warn!("cannot add image: {}", e);
                session.stats_mut().skipped_count += 1;
                return None;
            }
        },
        ContentKind::Table => {
            let table_no = session.allocate_table_number();
            session.stats_mut().table_count += 1;
            let mut table =
                build_from_delimited(&item.value, &item.caption, item.landscape, table_no);
            table.push('\n');
            table
        }
        ContentKind::File => match session.allocate_attachment(&item.value) {
            Ok(index) => {
                let pages = session.attachment_pages(index, options.max_attachment_pages);
                let stats = session.stats_mut();
                stats.attachment_count += 1;
                stats.attachment_page_count += pages.len() as u32;
                flip_page(attachment_markup(&pages), item.landscape)
            }
            Err(e) => {
                warn!("cannot add file: {}", e);
                session.stats_mut().skipped_count += 1;
                return None;
            }
        },
        ContentKind::Code => {
            session.stats_mut().code_count += 1;
            code_markup(&item.file_name, &item.value)
        }
        ContentKind::Excel => {
            session.stats_mut().table_count += 1;
            build_from_spreadsheet(&item.value, &item.caption, item.landscape)
        }
        ContentKind::RichText => {
            session.stats_mut().rich_text_count += 1;
            flip_page(render_rich_text(&item.value), item.landscape)
        }
        ContentKind::Unknown(kind) => {
            warn!("unknown content type {:?}", kind);
            session.stats_mut().unknown_count += 1;
            format!("{}\n", UNKNOWN_CONTENT)
        }
    };

    let unflipped = matches!(
        item.kind,
        ContentKind::Text | ContentKind::Code | ContentKind::Unknown(_)
    );
    if item.landscape && unflipped {
        return Some(flip_page(fragment, true));
    }
    Some(fragment)
}

/// Markdown text handed to `cmarker`; single newlines become paragraph breaks.
fn text_markup(text: &str) -> String {
    let text = string_literal(text).replace('\n', "\n\n");
    format!("#cmarker.render(\"\n{}\n\")\n\n\n", text)
}

fn image_markup(name: &str, caption: &str) -> String {
    format!(
        "#figure(image(\"images/{}\"),caption:\"{}\")\n",
        name,
        string_literal(caption)
    )
}

fn attachment_markup(pages: &[String]) -> String {
    let mut out = String::new();
    for page in pages {
        let _ = writeln!(
            out,
            "\n#image(\"{}\", width: 90%, height:90%, fit:\"stretch\")",
            page
        );
    }
    out
}

/// Code listing on its own page, non-ASCII characters removed.
fn code_markup(file_name: &str, code: &str) -> String {
    let mut sanitised: String = code.chars().filter(|c| *c < '\u{7f}').collect();
    if !sanitised.is_empty() && !sanitised.ends_with('\n') {
        sanitised.push('\n');
    }
    format!("{}\n=== {}\n\n```\n{}```\n", PAGE_BREAK, file_name, sanitised)
}
