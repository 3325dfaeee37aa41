//! Small Typst fragments shared by the renderers.

/// Opening of a landscape page block.
pub const PAGE_FLIP: &str = "#page(flipped: true)[";

/// Explicit page break.
pub const PAGE_BREAK: &str = "#pagebreak()";

/// Marker rendered for a section with no items.
pub const NOT_APPLICABLE: &str = "Not Applicable";

/// Marker rendered for an item of unrecognised type.
pub const UNKNOWN_CONTENT: &str = "unknown content type";

/// Escape text for use inside a Typst string literal.
pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Wrap `body` in a flipped page when `landscape` is set.
pub fn flip_page(body: String, landscape: bool) -> String {
    if landscape {
        format!("{}\n{}]\n\n", PAGE_FLIP, body)
    } else {
        body
    }
}
